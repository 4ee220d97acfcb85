use crate::error::ModelError;
use crate::field::Field;
use crate::models::enums::{PaginationType, ToolStepFailureBehavior, ToolStepMethod};
use crate::wire::{WireModel, WireReader, WireWriter, wire_model_serde};
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

/// A multi-step workflow that executes one or more protocol-specific operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub id: String,
    /// Ordered execution steps. Expected to be non-empty.
    pub steps: Vec<ToolStep>,
    pub name: Field<String>,
    /// Semantic version string (`major.minor.patch`).
    pub version: Field<String>,
    pub instruction: Field<String>,
    /// JSON Schema for tool inputs.
    pub input_schema: Field<Map<String, Value>>,
    /// JSON Schema for tool outputs (after the output transform).
    pub output_schema: Field<Map<String, Value>>,
    /// Final output transform, `(sourceData) => expression`.
    pub output_transform: Field<String>,
    pub created_at: Field<DateTime<FixedOffset>>,
    pub updated_at: Field<DateTime<FixedOffset>>,
    pub additional_properties: Map<String, Value>,
}

impl Tool {
    #[must_use]
    pub fn new(id: impl Into<String>, steps: Vec<ToolStep>) -> Self {
        Self {
            id: id.into(),
            steps,
            name: Field::Unset,
            version: Field::Unset,
            instruction: Field::Unset,
            input_schema: Field::Unset,
            output_schema: Field::Unset,
            output_transform: Field::Unset,
            created_at: Field::Unset,
            updated_at: Field::Unset,
            additional_properties: Map::new(),
        }
    }
}

impl WireModel for Tool {
    const NAME: &'static str = "Tool";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .required("id", &self.id)
            .required("steps", &self.steps)
            .optional("name", &self.name)
            .optional("version", &self.version)
            .optional("instruction", &self.instruction)
            .optional("inputSchema", &self.input_schema)
            .optional("outputSchema", &self.output_schema)
            .optional("outputTransform", &self.output_transform)
            .optional("createdAt", &self.created_at)
            .optional("updatedAt", &self.updated_at)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            id: r.required("id")?,
            steps: r.required("steps")?,
            name: r.optional("name")?,
            version: r.optional("version")?,
            instruction: r.optional("instruction")?,
            input_schema: r.optional("inputSchema")?,
            output_schema: r.optional("outputSchema")?,
            output_transform: r.optional("outputTransform")?,
            created_at: r.optional("createdAt")?,
            updated_at: r.optional("updatedAt")?,
            additional_properties: r.finish(),
        })
    }
}

/// Protocol of a step, inferred from its URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProtocol {
    Http,
    Postgres,
    Ftp(FtpVariant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpVariant {
    Ftp,
    Ftps,
    Sftp,
}

/// A single execution step.
///
/// `query_params`, `headers` and `body` may embed `<<(sourceData) => ...>>`
/// template expressions; they are sent verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStep {
    pub id: String,
    /// Full URL including the protocol scheme.
    pub url: String,
    pub method: ToolStepMethod,
    /// System holding stored credentials and documentation for this step.
    pub system_id: String,
    /// HTTP only. Values are usually strings but servers also send numbers and booleans.
    pub query_params: Field<Map<String, Value>>,
    /// HTTP only.
    pub headers: Field<Map<String, Value>>,
    /// Protocol-specific payload: any HTTP body, a JSON `{query, params}` for
    /// Postgres, a JSON `{operation, path, content?}` for FTP/SFTP.
    pub body: Field<String>,
    /// HTTP only.
    pub pagination: Field<Pagination>,
    pub instruction: Field<String>,
    /// Whether the self-healing process may alter this step.
    pub modify: Field<bool>,
    /// Selects data for loop execution, `(sourceData) => expression`.
    pub data_selector: Field<String>,
    pub failure_behavior: Field<ToolStepFailureBehavior>,
    pub additional_properties: Map<String, Value>,
}

impl ToolStep {
    /// A step with the documented defaults: `modify = false`, `failure_behavior = fail`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        method: ToolStepMethod,
        system_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            method,
            system_id: system_id.into(),
            query_params: Field::Unset,
            headers: Field::Unset,
            body: Field::Unset,
            pagination: Field::Unset,
            instruction: Field::Unset,
            modify: Field::Value(false),
            data_selector: Field::Unset,
            failure_behavior: Field::Value(ToolStepFailureBehavior::Fail),
            additional_properties: Map::new(),
        }
    }

    /// `None` when the URL has no scheme or an unsupported one.
    #[must_use]
    pub fn protocol(&self) -> Option<StepProtocol> {
        let (scheme, _) = self.url.split_once("://")?;
        match scheme.to_ascii_lowercase().as_str() {
            "http" | "https" => Some(StepProtocol::Http),
            "postgres" | "postgresql" => Some(StepProtocol::Postgres),
            "ftp" => Some(StepProtocol::Ftp(FtpVariant::Ftp)),
            "ftps" => Some(StepProtocol::Ftp(FtpVariant::Ftps)),
            "sftp" => Some(StepProtocol::Ftp(FtpVariant::Sftp)),
            _ => None,
        }
    }

    /// A query parameter as it would be sent; non-string scalars are rendered as JSON.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<String> {
        entry_as_string(&self.query_params, key)
    }

    #[must_use]
    pub fn header(&self, key: &str) -> Option<String> {
        entry_as_string(&self.headers, key)
    }

    /// Unset failure behavior means `fail`.
    #[must_use]
    pub fn effective_failure_behavior(&self) -> ToolStepFailureBehavior {
        self.failure_behavior
            .as_option()
            .copied()
            .unwrap_or(ToolStepFailureBehavior::Fail)
    }
}

fn entry_as_string(map: &Field<Map<String, Value>>, key: &str) -> Option<String> {
    match map.as_option()?.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl WireModel for ToolStep {
    const NAME: &'static str = "ToolStep";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .required("id", &self.id)
            .required("url", &self.url)
            .required("method", &self.method)
            .required("systemId", &self.system_id)
            .optional("queryParams", &self.query_params)
            .optional("headers", &self.headers)
            .optional("body", &self.body)
            .optional("pagination", &self.pagination)
            .optional("instruction", &self.instruction)
            .optional("modify", &self.modify)
            .optional("dataSelector", &self.data_selector)
            .optional("failureBehavior", &self.failure_behavior)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            id: r.required("id")?,
            url: r.required("url")?,
            method: r.required("method")?,
            system_id: r.required("systemId")?,
            query_params: r.optional("queryParams")?,
            headers: r.optional("headers")?,
            body: r.optional("body")?,
            pagination: r.optional("pagination")?,
            instruction: r.optional("instruction")?,
            modify: r.optional("modify")?,
            data_selector: r.optional("dataSelector")?,
            failure_behavior: r.optional("failureBehavior")?,
            additional_properties: r.finish(),
        })
    }
}

/// How to walk a paged HTTP response (HTTP/HTTPS steps only).
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub pagination_type: PaginationType,
    /// Items per page, exposed to templates as `sourceData.limit`.
    pub page_size: Field<String>,
    /// JSONPath to the next-page cursor in the response body.
    pub cursor_path: Field<String>,
    /// `(response, pageInfo) => boolean`; `true` stops pagination.
    pub stop_condition: Field<String>,
    pub additional_properties: Map<String, Value>,
}

impl Pagination {
    #[must_use]
    pub fn new(pagination_type: PaginationType) -> Self {
        Self {
            pagination_type,
            page_size: Field::Unset,
            cursor_path: Field::Unset,
            stop_condition: Field::Unset,
            additional_properties: Map::new(),
        }
    }
}

impl WireModel for Pagination {
    const NAME: &'static str = "Pagination";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .required("type", &self.pagination_type)
            .optional("pageSize", &self.page_size)
            .optional("cursorPath", &self.cursor_path)
            .optional("stopCondition", &self.stop_condition)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            pagination_type: r.required("type")?,
            page_size: r.optional("pageSize")?,
            cursor_path: r.optional("cursorPath")?,
            stop_condition: r.optional("stopCondition")?,
            additional_properties: r.finish(),
        })
    }
}

wire_model_serde!(Tool, ToolStep, Pagination);

#[cfg(test)]
mod tests {
    use super::{FtpVariant, Pagination, StepProtocol, Tool, ToolStep};
    use crate::error::ModelError;
    use crate::field::Field;
    use crate::models::enums::{PaginationType, ToolStepFailureBehavior, ToolStepMethod};
    use crate::wire::{WireModel, parse_timestamp};
    use serde_json::{Map, Value, json};

    fn full_tool() -> Tool {
        let mut step = ToolStep::new(
            "step-1",
            "https://api.example.com/search",
            ToolStepMethod::Get,
            "sys-1",
        );
        step.query_params = Field::Value(Map::from_iter([(
            "q".to_string(),
            json!("<<(sourceData) => sourceData.query>>"),
        )]));
        step.headers = Field::Value(Map::from_iter([(
            "Authorization".to_string(),
            json!("Bearer <<(sourceData) => sourceData.credentials.apiKey>>"),
        )]));
        step.body = Field::Value(r#"{"query":"x"}"#.to_string());
        let mut pagination = Pagination::new(PaginationType::CursorBased);
        pagination.page_size = Field::Value("50".to_string());
        pagination.cursor_path = Field::Value("meta.next_cursor".to_string());
        pagination.stop_condition =
            Field::Value("(response, pageInfo) => !response.data.has_more".to_string());
        pagination
            .additional_properties
            .insert("maxPages".to_string(), json!(10));
        step.pagination = Field::Value(pagination);
        step.instruction = Field::Value("Fetch results".to_string());
        step.data_selector = Field::Value("(sourceData) => sourceData.items".to_string());
        step.failure_behavior = Field::Value(ToolStepFailureBehavior::Continue);
        step.additional_properties
            .insert("loopMaxIters".to_string(), json!(5));

        let mut tool = Tool::new("tool-1", vec![step]);
        tool.name = "Web Search".into();
        tool.version = "2.1.0".into();
        tool.instruction = "Search the web".into();
        tool.input_schema = Field::Value(
            json!({"type": "object", "required": ["query"]})
                .as_object()
                .cloned()
                .expect("object"),
        );
        tool.output_schema = Field::Null;
        tool.output_transform = "(sourceData) => sourceData".into();
        tool.created_at =
            Field::Value(parse_timestamp("2024-01-02T03:04:05+00:00").expect("timestamp"));
        tool.updated_at =
            Field::Value(parse_timestamp("2024-01-03T03:04:05.5-05:00").expect("timestamp"));
        tool.additional_properties
            .insert("folder".to_string(), json!("search"));
        tool
    }

    #[test]
    fn full_tool_round_trips() {
        let tool = full_tool();
        let decoded = Tool::from_wire(tool.to_wire()).expect("decode");
        assert_eq!(decoded, tool);
    }

    #[test]
    fn minimal_tool_round_trips_and_omits_unset_fields() {
        let tool = Tool::new("t", Vec::new());
        let wire = tool.to_wire();
        assert_eq!(Value::Object(wire.clone()), json!({"id": "t", "steps": []}));
        assert_eq!(Tool::from_wire(wire).expect("decode"), tool);
    }

    #[test]
    fn wire_keys_are_camel_case() {
        let wire = full_tool().to_wire();
        let keys: Vec<&str> = wire.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "folder",
                "id",
                "steps",
                "name",
                "version",
                "instruction",
                "inputSchema",
                "outputSchema",
                "outputTransform",
                "createdAt",
                "updatedAt",
            ]
        );
        assert_eq!(wire["outputSchema"], Value::Null);
        let step = &wire["steps"][0];
        assert_eq!(step["systemId"], "sys-1");
        assert_eq!(step["failureBehavior"], "continue");
        assert_eq!(step["pagination"]["type"], "cursorBased");
        assert_eq!(step["pagination"]["maxPages"], 10);
    }

    #[test]
    fn constructor_defaults_are_sent_but_decoded_absence_stays_unset() {
        let step = ToolStep::new("s", "https://x", ToolStepMethod::Post, "sys");
        let wire = step.to_wire();
        assert_eq!(wire["modify"], json!(false));
        assert_eq!(wire["failureBehavior"], json!("fail"));

        let decoded = ToolStep::from_json(json!({
            "id": "s",
            "url": "https://x",
            "method": "POST",
            "systemId": "sys",
        }))
        .expect("decode");
        assert!(decoded.modify.is_unset());
        assert!(decoded.failure_behavior.is_unset());
        assert_eq!(
            decoded.effective_failure_behavior(),
            ToolStepFailureBehavior::Fail
        );
        assert!(!decoded.to_wire().contains_key("modify"));
    }

    #[test]
    fn query_params_accept_non_string_values() {
        let body = br#"{
            "id": "search",
            "steps": [{
                "id": "s",
                "url": "https://api.example.com/search",
                "method": "GET",
                "systemId": "sys",
                "queryParams": {"q": "<<(sourceData) => sourceData.query>>", "limit": 10},
                "headers": {"X-Debug": true}
            }]
        }"#;
        let tool = Tool::from_slice(body).expect("decode");
        let step = &tool.steps[0];
        assert_eq!(
            step.query_param("q").as_deref(),
            Some("<<(sourceData) => sourceData.query>>")
        );
        assert_eq!(step.query_param("limit").as_deref(), Some("10"));
        assert_eq!(step.query_param("missing"), None);
        assert_eq!(step.header("X-Debug").as_deref(), Some("true"));
        assert_eq!(tool.to_wire()["steps"][0]["queryParams"]["limit"], json!(10));
    }

    #[test]
    fn missing_required_step_field_reports_its_path() {
        let err = Tool::from_json(json!({
            "id": "t",
            "steps": [
                {"id": "a", "url": "https://x", "method": "GET", "systemId": "s"},
                {"id": "b", "url": "https://x", "method": "GET"},
            ],
        }))
        .expect_err("missing systemId");
        assert_eq!(
            err,
            ModelError::Schema {
                path: "steps[1].systemId".to_string(),
                message: "missing required field".to_string(),
            }
        );
    }

    #[test]
    fn unknown_method_is_an_enum_error() {
        let err = ToolStep::from_json(json!({
            "id": "a", "url": "https://x", "method": "TRACE", "systemId": "s",
        }))
        .expect_err("TRACE is not declared");
        assert!(matches!(err, ModelError::InvalidEnumValue { enum_name: "ToolStepMethod", .. }));
    }

    #[test]
    fn bad_timestamp_is_a_timestamp_error() {
        let err = Tool::from_json(json!({"id": "t", "steps": [], "createdAt": "last tuesday"}))
            .expect_err("bad timestamp");
        assert!(matches!(err, ModelError::InvalidTimestamp { .. }));
    }

    #[test]
    fn protocol_is_inferred_from_scheme() {
        let cases = [
            ("https://api.example.com", Some(StepProtocol::Http)),
            ("HTTP://api.example.com", Some(StepProtocol::Http)),
            ("postgres://u:p@db:5432/app", Some(StepProtocol::Postgres)),
            ("postgresql://db/app", Some(StepProtocol::Postgres)),
            ("ftp://host/path", Some(StepProtocol::Ftp(FtpVariant::Ftp))),
            ("ftps://host/path", Some(StepProtocol::Ftp(FtpVariant::Ftps))),
            ("sftp://host:22/path", Some(StepProtocol::Ftp(FtpVariant::Sftp))),
            ("mysql://db", None),
            ("not a url", None),
        ];
        for (url, expected) in cases {
            let step = ToolStep::new("s", url, ToolStepMethod::Post, "sys");
            assert_eq!(step.protocol(), expected, "{url}");
        }
    }

    #[test]
    fn serde_delegates_to_the_wire_mapping() {
        let tool = full_tool();
        let value = serde_json::to_value(&tool).expect("serialize");
        assert_eq!(value, tool.to_json());
        let back: Tool = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, tool);
    }
}
