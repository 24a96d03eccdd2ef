// src/sink.rs
//! Output sinks: where a finished pass goes. Failures here are reported to the
//! caller but never affect the computed bundle.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::dashboard::TeamDashboard;
use crate::engine::ResultBundle;

pub const BUNDLE_FILE: &str = "readiness.json";
pub const DASHBOARD_DIR: &str = "dashboards";
pub const METRICS_FILE: &str = "metrics.prom";

#[async_trait::async_trait]
pub trait ResultSink: Send + Sync {
    async fn publish(&self, bundle: &ResultBundle, dashboards: &[TeamDashboard]) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Writes `readiness.json`, one file per team under `dashboards/`, and the
/// Prometheus exposition when a recorder handle is attached.
#[derive(Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
    metrics: Option<PrometheusHandle>,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn dashboard_path(&self, d: &TeamDashboard) -> PathBuf {
        let file = format!(
            "{}_{}.json",
            file_safe(&d.readiness.sport),
            file_safe(&d.readiness.team_id)
        );
        self.dir.join(DASHBOARD_DIR).join(file)
    }
}

#[async_trait::async_trait]
impl ResultSink for JsonFileSink {
    async fn publish(&self, bundle: &ResultBundle, dashboards: &[TeamDashboard]) -> Result<()> {
        let dash_dir = self.dir.join(DASHBOARD_DIR);
        fs::create_dir_all(&dash_dir)
            .await
            .with_context(|| format!("creating {}", dash_dir.display()))?;

        let body = serde_json::to_vec_pretty(bundle).context("serializing result bundle")?;
        let path = self.dir.join(BUNDLE_FILE);
        fs::write(&path, body)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        for d in dashboards {
            let p = self.dashboard_path(d);
            let body = serde_json::to_vec_pretty(d).context("serializing dashboard")?;
            fs::write(&p, body)
                .await
                .with_context(|| format!("writing {}", p.display()))?;
        }

        if let Some(h) = &self.metrics {
            let p = self.dir.join(METRICS_FILE);
            fs::write(&p, h.render())
                .await
                .with_context(|| format!("writing {}", p.display()))?;
        }

        tracing::debug!(target: "sink", dir = %self.dir.display(), dashboards = dashboards.len(), "results written");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}

fn file_safe(s: &str) -> String {
    let out: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        "_".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(file_safe("ny/yankees 1"), "ny_yankees_1");
        assert_eq!(file_safe(""), "_");
        assert_eq!(file_safe("../etc"), "___etc");
    }
}
