/// Clock abstraction and localized date formatting
pub mod datetime;
/// Localized alerts, confirms and button states
pub mod feedback;
/// Prefixed logging helpers
pub mod logging;
/// Event form validation
pub mod validation;
