use thiserror::Error;

/// Top-level error type for the Statchat system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// StatChatError` so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for StatChatError {
    fn from(err: toml::de::Error) -> Self {
        StatChatError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for StatChatError {
    fn from(err: toml::ser::Error) -> Self {
        StatChatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for StatChatError {
    fn from(err: serde_json::Error) -> Self {
        StatChatError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Statchat operations.
pub type Result<T> = std::result::Result<T, StatChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatChatError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(StatChatError, &str)> = vec![
            (
                StatChatError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                StatChatError::Catalog("unreadable root".to_string()),
                "Catalog error: unreadable root",
            ),
            (
                StatChatError::Llm("model unavailable".to_string()),
                "Language model error: model unavailable",
            ),
            (
                StatChatError::Backend("exit code 2".to_string()),
                "Backend error: exit code 2",
            ),
            (
                StatChatError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StatChatError = io_err.into();
        assert!(matches!(err, StatChatError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(parsed.is_err());
        let err: StatChatError = parsed.unwrap_err().into();
        assert!(matches!(err, StatChatError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        assert!(parsed.is_err());
        let err: StatChatError = parsed.unwrap_err().into();
        assert!(matches!(err, StatChatError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }

    #[test]
    fn test_error_debug_impl() {
        let err = StatChatError::Backend("test debug".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Backend"));
        assert!(debug_str.contains("test debug"));
    }
}
