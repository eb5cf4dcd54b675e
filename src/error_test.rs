#[cfg(test)]
mod tests {
    use super::super::error::YgoError;

    #[test]
    fn test_not_found_error() {
        let error = YgoError::NotFound("Dark Magician".to_string());

        let msg = error.to_string();
        assert!(msg.contains("Not found"));
        assert!(msg.contains("Dark Magician"));

        let hint = error.hint();
        assert!(hint.is_some());
        assert!(hint.unwrap().contains("ygodb list"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_http_status_message() {
        let error = YgoError::HttpStatus {
            status: 404,
            message: "page missing".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("page missing"));
        assert!(error.hint().is_none());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(YgoError::Timeout(30).is_retryable());
        assert!(YgoError::RateLimit.is_retryable());
        assert!(YgoError::ServerError("502".to_string()).is_retryable());

        assert!(!YgoError::Parse("bad".to_string()).is_retryable());
        assert!(!YgoError::UnknownKind("lore".to_string()).is_retryable());
        assert!(!YgoError::Cancelled.is_retryable());
    }

    #[test]
    fn test_timeout_hint_mentions_offline() {
        let hint = YgoError::Timeout(5).hint().unwrap();
        assert!(hint.contains("--offline"));
    }

    #[test]
    fn test_unknown_kind_message() {
        let error = YgoError::UnknownKind("errata".to_string());
        assert_eq!(error.to_string(), "Unknown additional info kind: errata");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing db");
        let error: YgoError = io.into();
        match error {
            YgoError::Io(_) => (),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
