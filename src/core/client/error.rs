//! Transport error types.

/// Errors from talking to the chat service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service returned HTTP {0}")]
    Status(u16),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// True when retrying the same request could succeed (timeouts, 5xx, connection loss).
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect(),
            ClientError::Status(code) => *code >= 500,
            ClientError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_has_code() {
        assert_eq!(ClientError::Status(502).to_string(), "Service returned HTTP 502");
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(ClientError::Status(503).is_transient());
        assert!(!ClientError::Status(404).is_transient());
    }

    #[test]
    fn decode_errors_are_not_transient() {
        let e = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ClientError::from(e).is_transient());
    }
}
