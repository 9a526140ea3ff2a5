use tracing::{debug, error, info, warn};

/// Logs an outgoing backend request with consistent format
pub fn log_api_request(method: &str, endpoint: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("API_REQUEST: {} {} - {}", method, endpoint, d),
        None => debug!("API_REQUEST: {} {}", method, endpoint),
    }
}

/// Logs a successful backend response with consistent format
pub fn log_api_success(method: &str, endpoint: &str, status: u16) {
    debug!("API_SUCCESS: {} {} -> {}", method, endpoint, status);
}

/// Logs backend failures with consistent format
pub fn log_api_error(method: &str, endpoint: &str, error: &str) {
    error!("API_ERROR: {} {} failed: {}", method, endpoint, error);
}

/// Logs validation errors with consistent format
pub fn log_validation_error(flow: &str, field: &str, error: &str) {
    warn!("VALIDATION_ERROR: {} - field '{}' invalid: {}", flow, field, error);
}

/// Logs host bridge interactions (popups, buttons, links)
pub fn log_host_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("HOST: {} - {}", event, d),
        None => debug!("HOST: {}", event),
    }
}

/// Logs screen flow transitions with consistent format
pub fn log_flow_event(flow: &str, event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("FLOW: {} {} - {}", flow, event, d),
        None => info!("FLOW: {} {}", flow, event),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
