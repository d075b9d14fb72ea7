use anyhow::Result;

pub fn setup_logging() -> Result<()> {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::prelude::*;

    let mut regular_filter = EnvFilter::from_default_env();
    if std::env::var(EnvFilter::DEFAULT_ENV).is_err() {
        regular_filter = regular_filter
            .add_directive("warn".parse()?)
            .add_directive("common=info".parse()?)
            .add_directive("protocol=info".parse()?)
            .add_directive("sender=info".parse()?)
            .add_directive("input_sender=info".parse()?);
    }

    // stdout belongs to the POST OK lines, so everything here goes to stderr
    let registry = tracing_subscriber::registry();

    if !atty::is(atty::Stream::Stderr) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_level(true)
                    .with_filter(regular_filter),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(regular_filter),
            )
            .try_init()?;
    }

    Ok(())
}

/// Loads `KEY=value` lines from `path` into the process environment.
/// Blank lines and `#` comments are skipped. Existing variables are overwritten.
pub fn load_env(path: &str) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once('='))
        .for_each(|(k, v)| std::env::set_var(k.trim(), v.trim()));
    tracing::info!("set env vars from {}", path);
    Ok(())
}
