//! Readiness Engine — Binary Entrypoint
//! One-shot pass by default; `--monitor` re-runs the pass on a fixed interval.
//!
//! Usage: readiness-engine [--data PATH] [--out DIR] [--monitor] [--interval-ms N]

use anyhow::{bail, Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use readiness_engine::config::EngineConfig;
use readiness_engine::runner::Runner;
use readiness_engine::sink::JsonFileSink;

#[derive(Debug, Default)]
struct Cli {
    data: Option<PathBuf>,
    out: Option<PathBuf>,
    monitor: bool,
    interval_ms: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Cli> {
    let mut cli = Cli::default();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--monitor" => cli.monitor = true,
            "--data" => cli.data = Some(args.next().context("--data needs a path")?.into()),
            "--out" => cli.out = Some(args.next().context("--out needs a directory")?.into()),
            "--interval-ms" => {
                let v = args.next().context("--interval-ms needs a value")?;
                cli.interval_ms = Some(v.parse().with_context(|| format!("bad --interval-ms: {v}"))?);
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(cli)
}

/// Compact logs by default, JSON when READINESS_LOG_JSON=1.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("readiness_engine=info,warn"));

    let json = std::env::var("READINESS_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = parse_args(std::env::args().skip(1))?;

    let mut config = EngineConfig::load_default()?;
    if let Some(p) = cli.data {
        config.data_path = p;
    }
    if let Some(p) = cli.out {
        config.output_dir = p;
    }
    if let Some(ms) = cli.interval_ms {
        config.monitor_interval_ms = ms;
    }
    let config = config.sanitized();

    let mut sink = JsonFileSink::new(config.output_dir.clone());
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => sink = sink.with_metrics(handle),
        Err(e) => tracing::warn!("prometheus recorder not installed: {e}"),
    }

    let runner = Runner::new(config)?
        .with_sink(Box::new(sink))
        .restore_history()
        .await;

    if cli.monitor {
        runner.run_monitor(None).await;
        return Ok(());
    }

    let bundle = runner.run_once().await?;
    tracing::info!(
        teams = bundle.team_count(),
        featured = bundle.featured.len(),
        alerts = bundle.alerts.len(),
        out = %runner.config().output_dir.display(),
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> impl Iterator<Item = String> {
        s.iter().map(|x| x.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_flags() {
        let cli = parse_args(args(&["--monitor", "--interval-ms", "5000", "--data", "d.json"])).unwrap();
        assert!(cli.monitor);
        assert_eq!(cli.interval_ms, Some(5000));
        assert_eq!(cli.data, Some(PathBuf::from("d.json")));
        assert_eq!(cli.out, None);
    }

    #[test]
    fn rejects_unknown_and_incomplete() {
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--interval-ms"])).is_err());
        assert!(parse_args(args(&["--interval-ms", "soon"])).is_err());
    }
}
