use anyhow::{Context, Result};
use protocol::InputPayload;
use tracing::Instrument;

use crate::client::IngestClient;
use crate::options::RunConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: u64,
}

/// Builds the client, optionally checks health, then runs the send loop.
pub async fn execute(config: &RunConfig) -> Result<RunSummary> {
    let client = IngestClient::new(config.base_url.clone())?;

    if config.check_health {
        let health = client
            .check_health()
            .await
            .with_context(|| format!("checking health of {}", client.health_url()))?;
        tracing::info!(status = %health.status, "ingest server is up");
    }

    run(&client, config).await
}

/// Sends `config.n` demo payloads one at a time, sleeping `config.sleep_ms`
/// after each successful send. The first failure ends the run.
pub async fn run(client: &IngestClient, config: &RunConfig) -> Result<RunSummary> {
    let delay = config.sleep();
    let mut summary = RunSummary::default();

    tracing::info!(url = %client.inputs_url(), n = config.n, ?delay, "starting run");

    for index in 0..config.n {
        let payload = InputPayload::demo(index);
        let span = tracing::debug_span!("send", index, trace_id = %payload.trace_id);
        async {
            client
                .post_input(&payload)
                .await
                .with_context(|| format!("sending {}", payload.trace_id))?;
            tracing::debug!(?delay, "sent, waiting");
            tokio::time::sleep(delay).await;
            Ok::<(), anyhow::Error>(())
        }
        .instrument(span)
        .await?;
        summary.sent += 1;
    }

    Ok(summary)
}
