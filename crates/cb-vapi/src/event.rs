//! Events posted to the Vapi webhook

use serde_json::Value;

/// A webhook event, classified by its `type` field
#[derive(Debug, Clone, PartialEq)]
pub enum VapiEvent {
    CallStarted {
        call_id: Option<String>,
    },
    CallEnded {
        call_id: Option<String>,
        duration_secs: Option<f64>,
    },
    Transcript {
        text: Option<String>,
    },
    FunctionCall {
        name: Option<String>,
    },
    Other {
        event_type: Option<String>,
    },
}

impl VapiEvent {
    /// Classify a webhook body. Never fails; unknown shapes become `Other`.
    pub fn parse(body: &Value) -> Self {
        let text_at = |pointer: &str| body.pointer(pointer).and_then(Value::as_str).map(str::to_string);

        match body.get("type").and_then(Value::as_str) {
            Some("call-started") => Self::CallStarted {
                call_id: text_at("/call/id"),
            },
            Some("call-ended") => Self::CallEnded {
                call_id: text_at("/call/id"),
                duration_secs: body.pointer("/call/duration").and_then(Value::as_f64),
            },
            Some("transcript") => Self::Transcript {
                text: text_at("/transcript/text"),
            },
            Some("function-call") => Self::FunctionCall {
                name: text_at("/functionCall/name"),
            },
            other => Self::Other {
                event_type: other.map(str::to_string),
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::CallStarted { .. } => "call-started",
            Self::CallEnded { .. } => "call-ended",
            Self::Transcript { .. } => "transcript",
            Self::FunctionCall { .. } => "function-call",
            Self::Other { .. } => "other",
        }
    }
}
