//! Error types for `superglue-client`.

use thiserror::Error;

/// Failure to decode a wire payload into a typed record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required field is missing, or a field has the wrong JSON type.
    #[error("Schema error at '{path}': {message}")]
    Schema { path: String, message: String },

    /// A string is not one of the literals of a closed enum.
    #[error("Invalid value '{value}' for {enum_name}")]
    InvalidEnumValue {
        enum_name: &'static str,
        value: String,
    },

    /// A timestamp field is not ISO-8601.
    #[error("Invalid timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },
}

impl ModelError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            path: String::new(),
            message: message.into(),
        }
    }

    /// Prefix the location of a schema error with an outer field name or index.
    #[must_use]
    pub(crate) fn at(self, segment: &str) -> Self {
        match self {
            Self::Schema { path, message } => {
                let path = if path.is_empty() {
                    segment.to_string()
                } else if path.starts_with('[') {
                    format!("{segment}{path}")
                } else {
                    format!("{segment}.{path}")
                };
                Self::Schema { path, message }
            }
            other => other,
        }
    }
}

/// Main error type for client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration errors (invalid base URL, bad environment values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured header name or value is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The server answered with a status code the operation does not declare.
    #[error("Unexpected status {status}: {}", String::from_utf8_lossy(.body))]
    UnexpectedStatus { status: u16, body: Vec<u8> },

    /// A response body did not match the documented schema.
    #[error("Response decode error: {0}")]
    Model(#[from] ModelError),

    /// Connectivity, TLS or timeout errors raised by the HTTP transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::ModelError;

    #[test]
    fn at_builds_dotted_and_indexed_paths() {
        let err = ModelError::schema("expected string")
            .at("systemId")
            .at("[2]")
            .at("steps");
        assert_eq!(
            err,
            ModelError::Schema {
                path: "steps[2].systemId".to_string(),
                message: "expected string".to_string(),
            }
        );
    }

    #[test]
    fn at_leaves_enum_errors_untouched() {
        let err = ModelError::InvalidEnumValue {
            enum_name: "RunStatus",
            value: "paused".to_string(),
        };
        assert_eq!(err.clone().at("status"), err);
    }
}
