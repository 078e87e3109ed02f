use serde_json::Value;
use thiserror::Error;

/// Failure of a remote call made by an entity service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The API could not be reached, answered 5xx, or sent an undecodable body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API rejected the request with a 4xx other than 404.
    #[error("Validation error ({status}): {message}")]
    Validation { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    /// Maps a non-2xx response to the error taxonomy.
    pub fn from_status(status: u16, body: &Value) -> Self {
        let message = error_message(body);
        match status {
            404 => ServiceError::NotFound(message.unwrap_or_else(|| "HTTP 404".to_string())),
            400..=499 => ServiceError::Validation {
                status,
                message: message.unwrap_or_else(|| format!("HTTP {}", status)),
            },
            _ => match message {
                Some(message) => ServiceError::Transport(format!("HTTP {}: {}", status, message)),
                None => ServiceError::Transport(format!("HTTP {}", status)),
            },
        }
    }

    pub fn decode(err: serde_json::Error) -> Self {
        ServiceError::Transport(format!("Invalid response body: {}", err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Accepts `{"message": ..}`, `{"error": ..}`, `{"detail": ..}` or a bare string.
fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_404_maps_to_not_found() {
        let err = ServiceError::from_status(404, &json!({"message": "Product 9 not found"}));
        assert_eq!(err, ServiceError::NotFound("Product 9 not found".to_string()));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_4xx_maps_to_validation() {
        let err = ServiceError::from_status(
            422,
            &json!({"error": "validation_error", "message": "name too long"}),
        );
        assert_eq!(
            err,
            ServiceError::Validation {
                status: 422,
                message: "name too long".to_string()
            }
        );
    }

    #[test]
    fn test_5xx_maps_to_transport() {
        let err = ServiceError::from_status(503, &Value::Null);
        assert_eq!(err, ServiceError::Transport("HTTP 503".to_string()));

        let err = ServiceError::from_status(500, &json!({"message": "db down"}));
        assert_eq!(err.to_string(), "Transport error: HTTP 500: db down");
    }

    #[test]
    fn test_plain_string_body() {
        let err = ServiceError::from_status(400, &json!("bad order"));
        assert_eq!(err.to_string(), "Validation error (400): bad order");
    }
}
