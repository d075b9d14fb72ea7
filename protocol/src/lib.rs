use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INPUTS_PATH: &str = "/v1/inputs";
pub const HEALTH_PATH: &str = "/health";

pub const DEMO_SOURCE: &str = "plugin";
pub const DEMO_CHANNEL: &str = "equipment";
pub const DEMO_NAME: &str = "TEMP_READING";
pub const DEMO_TRACE_PREFIX: &str = "NODE-DEMO";
pub const DEMO_BASE_TEMP_C: f64 = 90.0;

/// One external input, the body of `POST /v1/inputs`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InputPayload {
    pub source: String,
    pub channel: String,
    pub name: String,
    pub data: TempReading,
    pub trace_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TempReading {
    pub temp_c: f64,
}

impl InputPayload {
    /// The synthetic reading sent on iteration `index` of a demo run.
    pub fn demo(index: u64) -> Self {
        Self {
            source: DEMO_SOURCE.to_string(),
            channel: DEMO_CHANNEL.to_string(),
            name: DEMO_NAME.to_string(),
            data: TempReading {
                temp_c: DEMO_BASE_TEMP_C + index as f64,
            },
            trace_id: format!("{}-{}", DEMO_TRACE_PREFIX, index),
        }
    }
}

/// Parsed response body of the ingest endpoint. Any JSON value parses. The
/// body is kept as received, key order included, next to a typed view of it.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReply {
    body: Value,
    kind: ReplyKind,
}

/// Known reply shapes, tried in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyKind {
    Accepted(Ack),
    Rejected(Rejection),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(default)]
    pub queue_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Rejection {
    pub detail: Value,
}

impl IngestReply {
    pub fn from_value(body: Value) -> Self {
        let kind = if let Ok(ack) = Ack::deserialize(&body) {
            ReplyKind::Accepted(ack)
        } else if let Ok(rejection) = Rejection::deserialize(&body) {
            ReplyKind::Rejected(rejection)
        } else {
            ReplyKind::Other
        };
        Self { body, kind }
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn kind(&self) -> &ReplyKind {
        &self.kind
    }

    pub fn is_ack(&self) -> bool {
        matches!(self.kind, ReplyKind::Accepted(Ack { ok: true, .. }))
    }

    pub fn queue_path(&self) -> Option<&str> {
        match &self.kind {
            ReplyKind::Accepted(ack) => ack.queue_path.as_deref(),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for IngestReply {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Serialize for IngestReply {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.body.serialize(serializer)
    }
}

// compact JSON, keys in the order they arrived
impl fmt::Display for IngestReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.body, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthReply {
    pub status: String,
}

impl HealthReply {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
