//! Error types for the YARA generation crate.

use std::fmt;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GenError {
    ConfigError(String),
    AdapterError(String),
    RecordError(String),
    RuleParseError(String),
    SerializationError(String),
    IoError(String),
    YamlError(String),
    JsonError(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            GenError::AdapterError(msg) => write!(f, "Adapter error: {msg}"),
            GenError::RecordError(msg) => write!(f, "Record error: {msg}"),
            GenError::RuleParseError(msg) => write!(f, "Rule parsing error: {msg}"),
            GenError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            GenError::IoError(msg) => write!(f, "IO error: {msg}"),
            GenError::YamlError(msg) => write!(f, "YAML parsing error: {msg}"),
            GenError::JsonError(msg) => write!(f, "JSON parsing error: {msg}"),
        }
    }
}

impl std::error::Error for GenError {}

impl From<std::io::Error> for GenError {
    fn from(err: std::io::Error) -> Self {
        GenError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for GenError {
    fn from(err: serde_yaml::Error) -> Self {
        GenError::YamlError(err.to_string())
    }
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> Self {
        GenError::JsonError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error() {
        let error = GenError::ConfigError("min_ngram must be >= 1".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: min_ngram must be >= 1"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_adapter_error() {
        let error = GenError::AdapterError("missing column 'text'".to_string());
        assert_eq!(error.to_string(), "Adapter error: missing column 'text'");
    }

    #[test]
    fn test_record_error() {
        let error = GenError::RecordError("line 7: invalid JSON".to_string());
        assert_eq!(error.to_string(), "Record error: line 7: invalid JSON");
    }

    #[test]
    fn test_rule_parse_error() {
        let error = GenError::RuleParseError("unterminated string".to_string());
        assert_eq!(error.to_string(), "Rule parsing error: unterminated string");
    }

    #[test]
    fn test_serialization_error() {
        let error = GenError::SerializationError("empty pattern".to_string());
        assert_eq!(error.to_string(), "Serialization error: empty pattern");
    }

    #[test]
    fn test_io_error() {
        let error = GenError::IoError("file not found".to_string());
        assert_eq!(error.to_string(), "IO error: file not found");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let gen_error: GenError = io_error.into();

        match gen_error {
            GenError::IoError(msg) => assert!(msg.contains("file not found")),
            _ => panic!("Expected IoError variant"),
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: yaml: [").unwrap_err();
        let gen_error: GenError = yaml_err.into();
        assert!(matches!(gen_error, GenError::YamlError(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let gen_error: GenError = json_err.into();
        assert!(matches!(gen_error, GenError::JsonError(_)));
    }

    #[test]
    fn test_error_equality() {
        let error1 = GenError::ConfigError("test".to_string());
        let error2 = GenError::ConfigError("test".to_string());
        let error3 = GenError::ConfigError("different".to_string());

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
        assert_ne!(
            GenError::AdapterError("test".to_string()),
            GenError::RecordError("test".to_string())
        );
    }

    #[test]
    fn test_error_clone() {
        let errors = vec![
            GenError::ConfigError("test".to_string()),
            GenError::AdapterError("test".to_string()),
            GenError::RecordError("test".to_string()),
            GenError::RuleParseError("test".to_string()),
            GenError::SerializationError("test".to_string()),
            GenError::IoError("test".to_string()),
            GenError::YamlError("test".to_string()),
            GenError::JsonError("test".to_string()),
        ];

        for error in errors {
            let cloned = error.clone();
            assert_eq!(error, cloned);
        }
    }

    #[test]
    fn test_error_debug() {
        let error = GenError::SerializationError("empty".to_string());
        let debug_str = format!("{error:?}");
        assert!(debug_str.contains("SerializationError"));
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors = vec![
            GenError::ConfigError("c".to_string()),
            GenError::AdapterError("a".to_string()),
            GenError::RecordError("r".to_string()),
            GenError::RuleParseError("p".to_string()),
            GenError::SerializationError("s".to_string()),
            GenError::IoError("i".to_string()),
            GenError::YamlError("y".to_string()),
            GenError::JsonError("j".to_string()),
        ];

        for error in errors {
            let display_str = error.to_string();
            assert!(!display_str.is_empty());
            assert!(display_str.contains(inner_detail(&error)));
        }
    }

    fn inner_detail(error: &GenError) -> &str {
        match error {
            GenError::ConfigError(m)
            | GenError::AdapterError(m)
            | GenError::RecordError(m)
            | GenError::RuleParseError(m)
            | GenError::SerializationError(m)
            | GenError::IoError(m)
            | GenError::YamlError(m)
            | GenError::JsonError(m) => m,
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn test_function() -> Result<i32> {
            Ok(42)
        }

        let result = test_function();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_result_type_alias_error() {
        fn test_function() -> Result<i32> {
            Err(GenError::ConfigError("test error".to_string()))
        }

        let result = test_function();
        assert!(result.is_err());
        match result.unwrap_err() {
            GenError::ConfigError(msg) => assert_eq!(msg, "test error"),
            _ => panic!("Expected ConfigError"),
        }
    }
}
