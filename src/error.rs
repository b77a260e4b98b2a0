//! Error handling types and utilities.

use crate::store::StoreError;

/// A specialized Result type for configuration and startup.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods.
pub type Result<T> = anyhow::Result<T>;

/// Failures while serving a single action event.
///
/// None of these escape [`ActionServer::handle`](crate::server::ActionServer::handle);
/// each is rendered into an error envelope of the detected shape.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Unknown function: {function}")]
    UnknownFunction { function: String },

    #[error("Unknown API route: {http_method} {api_path}")]
    UnknownRoute {
        api_path: String,
        http_method: String,
    },

    /// The event lacks the fields needed to tell its shape or read its arguments.
    #[error("Invalid event: {0}")]
    MalformedEvent(String),

    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to encode response body: {0}")]
    Encode(#[from] serde_json::Error),

    /// A panic caught at the server boundary.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// HTTP-equivalent status for this failure.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnknownFunction { .. } | Self::UnknownRoute { .. } | Self::MalformedEvent(_) => {
                400
            }
            Self::Store(_) | Self::Encode(_) | Self::Internal(_) => 500,
        }
    }

    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn status_codes() {
        check!(
            ActionError::UnknownFunction {
                function: "list_classes".to_string()
            }
            .status_code()
                == 400
        );
        check!(ActionError::MalformedEvent("no shape".to_string()).status_code() == 400);
        check!(ActionError::Store(StoreError::new("throttled")).status_code() == 500);
    }

    #[test]
    fn store_error_message_keeps_cause() {
        let error = ActionError::from(StoreError::new("connection refused"));
        check!(error.to_string() == "Database error: record store scan failed: connection refused");
        check!(!error.is_client_error());
    }
}
