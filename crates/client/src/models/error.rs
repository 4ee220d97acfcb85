use crate::error::ModelError;
use crate::field::Field;
use crate::wire::{WireModel, WireReader, WireWriter, wire_model_serde};
use serde_json::{Map, Value};

/// Error payload returned with 4xx responses, `{"error": {...}}`.
///
/// These are ordinary outcomes of an operation, not client errors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub additional_properties: Map<String, Value>,
}

impl ErrorResponse {
    /// The server's message, if it sent one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.error.message.as_option().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorDetail {
    pub message: Field<String>,
    pub code: Field<String>,
    pub additional_properties: Map<String, Value>,
}

impl WireModel for ErrorResponse {
    const NAME: &'static str = "Error";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .required("error", &self.error)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            error: r.required("error")?,
            additional_properties: r.finish(),
        })
    }
}

impl WireModel for ErrorDetail {
    const NAME: &'static str = "ErrorError";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .optional("message", &self.message)
            .optional("code", &self.code)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            message: r.optional("message")?,
            code: r.optional("code")?,
            additional_properties: r.finish(),
        })
    }
}

wire_model_serde!(ErrorResponse, ErrorDetail);

#[cfg(test)]
mod tests {
    use super::ErrorResponse;
    use crate::error::ModelError;
    use crate::wire::WireModel;
    use serde_json::json;

    #[test]
    fn keeps_unknown_detail_fields() {
        let body = json!({
            "error": {"message": "Run already exists", "code": "CONFLICT", "runId": "r-1"},
        });
        let err = ErrorResponse::from_json(body.clone()).expect("decode");
        assert_eq!(err.message(), Some("Run already exists"));
        assert_eq!(err.error.additional_properties.get("runId"), Some(&json!("r-1")));
        assert_eq!(err.to_json(), body);
    }

    #[test]
    fn error_object_is_required() {
        let err = ErrorResponse::from_json(json!({"message": "flat"})).expect_err("no error key");
        assert!(matches!(err, ModelError::Schema { ref path, .. } if path == "error"));
    }
}
