use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;
use crate::db::types::Role;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_http(status: u16, latency: Duration) {
    let status = status.to_string();
    metrics::counter!("http_requests_total", "status" => status.clone()).increment(1);
    metrics::histogram!("http_request_duration_seconds", "status" => status)
        .record(latency.as_secs_f64());
}

pub(crate) fn record_login(role: Role, succeeded: bool) {
    let outcome = if succeeded { "success" } else { "failure" };
    metrics::counter!("auth_logins_total", "role" => role.as_str(), "outcome" => outcome)
        .increment(1);
}

pub(crate) fn record_submission(reviewed: bool) {
    let stage = if reviewed { "reviewed" } else { "submitted" };
    metrics::counter!("student_responses_total", "stage" => stage).increment(1);
}
