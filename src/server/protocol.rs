use crate::synth::NormalizeMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Request {
        command: String,
        arguments: Option<Value>,
    },
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        message: Option<String>,
        body: Option<Value>,
    },
    Event {
        event: String,
        body: Option<Value>,
    },
}

/// Arguments of `functionContext`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionContextArgs {
    pub source: String,
    pub debug_line: usize,
}

/// Arguments of `postProcess`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProcessArgs {
    pub source: String,
    #[serde(default)]
    pub normalize_mode: NormalizeMode,
    #[serde(default)]
    pub step_edge: Option<f32>,
}
