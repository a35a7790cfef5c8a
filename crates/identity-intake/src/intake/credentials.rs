use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::EvaluationCredentials;

/// Standard base64 of `id:secret`, the token carried in an HTTP Basic header.
pub fn encode(id: &str, secret: &str) -> String {
    STANDARD.encode(format!("{id}:{secret}"))
}

/// Full `Authorization` header value for the configured credentials.
pub fn basic_authorization(credentials: &EvaluationCredentials) -> String {
    format!("Basic {}", encode(credentials.id(), credentials.secret()))
}
