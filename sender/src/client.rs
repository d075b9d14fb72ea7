use protocol::{HealthReply, IngestReply, InputPayload, HEALTH_PATH, INPUTS_PATH};
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {}: {}", .status.as_u16(), .body)]
    Rejected { status: StatusCode, body: IngestReply },

    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("ingest server is unhealthy: status {status:?}")]
    Unhealthy { status: String },
}

impl SendError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SendError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngestClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl IngestClient {
    // no timeouts: a hung request holds the run until the process is killed
    pub fn new(base_url: impl Into<String>) -> Result<Self, SendError> {
        let http_client = reqwest::ClientBuilder::new().build()?;
        Ok(Self {
            base_url: base_url.into(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn inputs_url(&self) -> String {
        self.base_url.clone() + INPUTS_PATH
    }

    pub fn health_url(&self) -> String {
        self.base_url.clone() + HEALTH_PATH
    }

    /// POSTs one payload. The body is parsed as JSON whatever the status; a
    /// non-2xx status is an error carrying that body.
    pub async fn post_input(&self, payload: &InputPayload) -> Result<IngestReply, SendError> {
        let url = self.inputs_url();
        let resp = self.http_client.post(&url).json(payload).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        tracing::debug!(%url, ?status, trace_id = %payload.trace_id, "ingest response");

        let body: IngestReply = serde_json::from_slice(&bytes)?;
        if !status.is_success() {
            return Err(SendError::Rejected { status, body });
        }
        println!("POST OK: {}", body);
        Ok(body)
    }

    pub async fn check_health(&self) -> Result<HealthReply, SendError> {
        let url = self.health_url();
        let resp = self.http_client.get(&url).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        tracing::debug!(%url, ?status, "health response");

        if !status.is_success() {
            let body: IngestReply = serde_json::from_slice(&bytes)?;
            return Err(SendError::Rejected { status, body });
        }
        let health: HealthReply = serde_json::from_slice(&bytes)?;
        if !health.is_ok() {
            return Err(SendError::Unhealthy {
                status: health.status,
            });
        }
        Ok(health)
    }
}
