//! Tests for the error taxonomy

#[cfg(test)]
mod tests {
    use super::super::error::SentinelError;

    #[test]
    fn test_recoverable_errors_trigger_fallback() {
        assert!(SentinelError::DataInsufficient { needed: 5, got: 3 }.is_recoverable());
        assert!(SentinelError::Training("fit blew up".to_string()).is_recoverable());
        assert!(SentinelError::Inference("bad row".to_string()).is_recoverable());
    }

    #[test]
    fn test_upstream_is_fatal() {
        assert!(!SentinelError::Upstream("no data".to_string()).is_recoverable());
    }

    #[test]
    fn test_ambient_errors_are_fatal() {
        assert!(!SentinelError::Internal("oops".to_string()).is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = SentinelError::DataInsufficient { needed: 5, got: 2 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: need 5 usable bars, have 2"
        );

        let err = SentinelError::Upstream("ticker NOPE not found".to_string());
        assert_eq!(err.to_string(), "Upstream data unavailable: ticker NOPE not found");

        let err = SentinelError::Training("singular matrix".to_string());
        assert_eq!(err.to_string(), "Training failed: singular matrix");
    }

    #[test]
    fn test_sqlx_error_converts() {
        let err: SentinelError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, SentinelError::Database(_)));
        assert!(!err.is_recoverable());
    }
}
