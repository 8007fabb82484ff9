//! Middleware for the EcoCropShare API.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// Returns the standard request logger:
/// remote-ip "request-line" status-code response-size "referrer" "user-agent"
pub fn standard_middleware() -> Logger {
    Logger::default()
}

/// Permissive CORS for the single-page UI. Only the verbs the API actually
/// serves are allowed.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_header()
        .allowed_methods(vec!["GET", "POST", "PUT"])
        .max_age(3600)
}
