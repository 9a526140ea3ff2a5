use crate::api::EventsApi;
use crate::host::{route_from_start_param, HostBridge, Route};
use crate::utils::logging::{log_flow_event, log_system_event};

/// Decides the first screen.
///
/// Outside Telegram, when the host cannot initialize, or when the backend
/// rejects the init data the app shows the unsupported-environment screen.
/// Otherwise a valid `startapp` payload opens the public event, anything
/// else lands on the home screen.
pub async fn bootstrap(host: &dyn HostBridge, api: &dyn EventsApi) -> Route {
    if !host.is_telegram_env() {
        log_flow_event("bootstrap", "unsupported", Some("not running inside Telegram"));
        return Route::EnvUnsupported;
    }

    if let Err(e) = host.init() {
        log_flow_event("bootstrap", "unsupported", Some(&e.to_string()));
        return Route::EnvUnsupported;
    }

    if let Err(e) = api.validate().await {
        log_flow_event("bootstrap", "unsupported", Some(&format!("validation failed: {e}")));
        return Route::EnvUnsupported;
    }

    host.ready();
    log_system_event("Mini app initialized", None);

    let route = host
        .launch_params()
        .start_param
        .as_deref()
        .and_then(route_from_start_param)
        .unwrap_or(Route::Home);
    log_flow_event("bootstrap", "routed", Some(&route.to_string()));
    route
}
