use crate::error::ModelError;
use crate::field::Field;
use crate::models::enums::RunStatus;
use crate::wire::{WireModel, WireReader, WireWriter, wire_model_serde};
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One execution of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub run_id: String,
    pub tool_id: String,
    pub status: RunStatus,
    pub metadata: RunMetadata,
    /// Tool metadata at the time of the run (not the full configuration).
    pub tool: Field<RunToolSnapshot>,
    /// Inputs and options as submitted.
    pub tool_payload: Field<RunToolPayload>,
    /// Results; only present when `status` is `success`.
    pub data: Field<Map<String, Value>>,
    /// Only present when `status` is `failed` or `aborted`.
    pub error: Field<String>,
    pub step_results: Field<Vec<StepResult>>,
    pub options: Field<RunOptions>,
    /// Where the run was initiated, e.g. `api`.
    pub request_source: Field<String>,
    pub trace_id: Field<String>,
    pub additional_properties: Map<String, Value>,
}

impl Run {
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        tool_id: impl Into<String>,
        status: RunStatus,
        metadata: RunMetadata,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            tool_id: tool_id.into(),
            status,
            metadata,
            tool: Field::Unset,
            tool_payload: Field::Unset,
            data: Field::Unset,
            error: Field::Unset,
            step_results: Field::Unset,
            options: Field::Unset,
            request_source: Field::Unset,
            trace_id: Field::Unset,
            additional_properties: Map::new(),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

impl WireModel for Run {
    const NAME: &'static str = "Run";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .required("runId", &self.run_id)
            .required("toolId", &self.tool_id)
            .required("status", &self.status)
            .required("metadata", &self.metadata)
            .optional("tool", &self.tool)
            .optional("toolPayload", &self.tool_payload)
            .optional("data", &self.data)
            .optional("error", &self.error)
            .optional("stepResults", &self.step_results)
            .optional("options", &self.options)
            .optional("requestSource", &self.request_source)
            .optional("traceId", &self.trace_id)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            run_id: r.required("runId")?,
            tool_id: r.required("toolId")?,
            status: r.required("status")?,
            metadata: r.required("metadata")?,
            tool: r.optional("tool")?,
            tool_payload: r.optional("toolPayload")?,
            data: r.optional("data")?,
            error: r.optional("error")?,
            step_results: r.optional("stepResults")?,
            options: r.optional("options")?,
            request_source: r.optional("requestSource")?,
            trace_id: r.optional("traceId")?,
            additional_properties: r.finish(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunMetadata {
    pub started_at: Field<DateTime<FixedOffset>>,
    /// Only present once the run has finished.
    pub completed_at: Field<DateTime<FixedOffset>>,
    pub duration_ms: Field<i64>,
    pub additional_properties: Map<String, Value>,
}

impl WireModel for RunMetadata {
    const NAME: &'static str = "RunMetadata";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .optional("startedAt", &self.started_at)
            .optional("completedAt", &self.completed_at)
            .optional("durationMs", &self.duration_ms)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            started_at: r.optional("startedAt")?,
            completed_at: r.optional("completedAt")?,
            duration_ms: r.optional("durationMs")?,
            additional_properties: r.finish(),
        })
    }
}

/// Snapshot of the executed tool's metadata carried on a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunToolSnapshot {
    pub id: Field<String>,
    pub name: Field<String>,
    pub version: Field<String>,
    pub instruction: Field<String>,
    pub additional_properties: Map<String, Value>,
}

impl WireModel for RunToolSnapshot {
    const NAME: &'static str = "RunTool";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .optional("id", &self.id)
            .optional("name", &self.name)
            .optional("version", &self.version)
            .optional("instruction", &self.instruction)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            id: r.optional("id")?,
            name: r.optional("name")?,
            version: r.optional("version")?,
            instruction: r.optional("instruction")?,
            additional_properties: r.finish(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunToolPayload {
    pub inputs: Field<Map<String, Value>>,
    pub options: Field<Map<String, Value>>,
    pub additional_properties: Map<String, Value>,
}

impl WireModel for RunToolPayload {
    const NAME: &'static str = "RunToolPayload";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .optional("inputs", &self.inputs)
            .optional("options", &self.options)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            inputs: r.optional("inputs")?,
            options: r.optional("options")?,
            additional_properties: r.finish(),
        })
    }
}

/// Outcome of one step of a multi-step run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepResult {
    pub step_id: Field<String>,
    pub success: Field<bool>,
    /// JSON `null` is always [`Field::Null`]; build with [`Field::from_json_value`].
    pub data: Field<Value>,
    pub error: Field<String>,
    pub additional_properties: Map<String, Value>,
}

impl WireModel for StepResult {
    const NAME: &'static str = "RunStepResultsItem";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .optional("stepId", &self.step_id)
            .optional("success", &self.success)
            .optional("data", &self.data)
            .optional("error", &self.error)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            step_id: r.optional("stepId")?,
            success: r.optional("success")?,
            data: r.optional("data")?,
            error: r.optional("error")?,
            additional_properties: r.finish(),
        })
    }
}

/// Body of a run-tool request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunRequest {
    /// Caller-generated run id, used as an idempotency key.
    pub run_id: Field<String>,
    pub inputs: Field<Map<String, Value>>,
    /// Runtime credentials overriding stored system credentials. Never persisted by the server.
    pub credentials: Field<BTreeMap<String, String>>,
    pub options: Field<RunOptions>,
    pub additional_properties: Map<String, Value>,
}

impl WireModel for RunRequest {
    const NAME: &'static str = "RunRequest";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .optional("runId", &self.run_id)
            .optional("inputs", &self.inputs)
            .optional("credentials", &self.credentials)
            .optional("options", &self.options)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            run_id: r.optional("runId")?,
            inputs: r.optional("inputs")?,
            credentials: r.optional("credentials")?,
            options: r.optional("options")?,
            additional_properties: r.finish(),
        })
    }
}

/// Execution options of a run request, echoed back on [`Run::options`].
///
/// `async_execution` asks the server to answer `202 Accepted` and run the tool in the
/// background; it is unrelated to whether the client itself is async.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub async_execution: Field<bool>,
    /// Seconds; synchronous execution only.
    pub timeout: Field<i64>,
    /// Receives a POST with the finished [`Run`], or `tool:<toolId>` to chain a tool.
    pub webhook_url: Field<String>,
    pub trace_id: Field<String>,
    pub additional_properties: Map<String, Value>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            async_execution: Field::Value(false),
            timeout: Field::Unset,
            webhook_url: Field::Unset,
            trace_id: Field::Unset,
            additional_properties: Map::new(),
        }
    }
}

impl WireModel for RunOptions {
    const NAME: &'static str = "RunOptions";

    fn to_wire(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .optional("async", &self.async_execution)
            .optional("timeout", &self.timeout)
            .optional("webhookUrl", &self.webhook_url)
            .optional("traceId", &self.trace_id)
            .finish()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            async_execution: r.optional("async")?,
            timeout: r.optional("timeout")?,
            webhook_url: r.optional("webhookUrl")?,
            trace_id: r.optional("traceId")?,
            additional_properties: r.finish(),
        })
    }
}

wire_model_serde!(
    Run,
    RunMetadata,
    RunToolSnapshot,
    RunToolPayload,
    StepResult,
    RunRequest,
    RunOptions,
);
