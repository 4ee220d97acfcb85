#![allow(dead_code)]

use serde_json::{Value, json};
use superglue_client::ClientConfig;
use superglue_test_support::MockApi;

pub use superglue_test_support::{MockResponse, RecordedRequest};

pub const TOKEN: &str = "sk_test_123";

pub fn config(api: &MockApi) -> anyhow::Result<ClientConfig> {
    Ok(ClientConfig::new(&api.base_url())?.with_token(TOKEN))
}

pub fn run_json(run_id: &str, status: &str) -> Value {
    json!({
        "runId": run_id,
        "toolId": "tool-1",
        "status": status,
        "metadata": {
            "startedAt": "2025-01-01T00:00:00Z",
            "durationMs": 120
        },
        "requestSource": "api"
    })
}

pub fn error_json(message: &str) -> Value {
    json!({ "error": { "message": message, "code": "E_TEST" } })
}
