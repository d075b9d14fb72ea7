use anyhow::Result;

use sender::{options::RunConfig, run};

#[tokio::main]
async fn main() -> Result<()> {
    common::util::setup_logging()?;
    let _ = common::util::load_env(".env");

    let config = RunConfig::from_env_args()?;
    tracing::debug!(?config, "parsed options");

    let summary = run::execute(&config).await?;
    tracing::info!(sent = summary.sent, "done");

    Ok(())
}
