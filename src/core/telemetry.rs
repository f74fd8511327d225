use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::Settings;

// Driver and middleware crates stay quiet unless RUST_LOG asks otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["sqlx=warn", "hyper=warn", "tower_http=info"];

fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = vec![level.to_string()];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|directive| directive.to_string()));
    EnvFilter::new(directives.join(","))
}

pub(crate) fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let telemetry = settings.telemetry();
    let builder = fmt()
        .with_env_filter(build_filter(&telemetry.log_level))
        .with_target(false)
        .with_span_events(fmt::format::FmtSpan::CLOSE);

    let result = if telemetry.json { builder.json().try_init() } else { builder.try_init() };
    result.map_err(|err| anyhow::anyhow!(err.to_string()))?;

    tracing::debug!(json = telemetry.json, level = %telemetry.log_level, "Tracing initialised");
    Ok(())
}
