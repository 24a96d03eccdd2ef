// tests/runner_io.rs
//
// Runner against real files in a temp dir: one-shot output, sink failures,
// history snapshots and a bounded monitor loop.

use readiness_engine::config::EngineConfig;
use readiness_engine::history::{self, HistoryStore};
use readiness_engine::runner::Runner;
use readiness_engine::sink::{JsonFileSink, BUNDLE_FILE, DASHBOARD_DIR};
use std::path::Path;

fn config_in(dir: &Path) -> EngineConfig {
    let data = dir.join("dataset.json");
    std::fs::write(&data, include_str!("fixtures/dataset.json")).unwrap();
    EngineConfig {
        data_path: data,
        output_dir: dir.join("out"),
        monitor_interval_ms: 10,
        ..EngineConfig::default()
    }
}

#[tokio::test]
async fn run_once_writes_bundle_and_dashboards() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_in(tmp.path());
    let out = cfg.output_dir.clone();
    let runner = Runner::new(cfg)
        .unwrap()
        .with_sink(Box::new(JsonFileSink::new(out.clone())));

    let bundle = runner.run_once().await.unwrap();

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out.join(BUNDLE_FILE)).unwrap()).unwrap();
    assert!(written["sports"]["mlb"]["teams"].is_array());
    assert_eq!(
        written["featured"].as_array().unwrap().len(),
        bundle.featured.len()
    );
    assert_eq!(written["alerts"][0]["type"], serde_json::json!("critical"));

    let dashboards = std::fs::read_dir(out.join(DASHBOARD_DIR)).unwrap().count();
    assert_eq!(dashboards, bundle.team_count());
    assert!(out.join(DASHBOARD_DIR).join("nfl_kc.json").exists());
}

#[tokio::test]
async fn sink_failure_does_not_fail_the_pass() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config_in(tmp.path());
    // a regular file where the output directory should be
    let blocker = tmp.path().join("blocked");
    std::fs::write(&blocker, b"x").unwrap();

    let runner = Runner::new(cfg)
        .unwrap()
        .with_sink(Box::new(JsonFileSink::new(blocker)));
    let bundle = runner.run_once().await.unwrap();
    assert_eq!(bundle.team_count(), 7);
    assert_eq!(runner.history().get("lad").len(), 1);
}

#[tokio::test]
async fn missing_dataset_is_an_error_and_history_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = EngineConfig {
        data_path: tmp.path().join("nope.json"),
        ..EngineConfig::default()
    };
    let runner = Runner::new(cfg).unwrap();
    assert!(runner.run_once().await.is_err());
    assert!(runner.history().snapshot().is_empty());
}

#[tokio::test]
async fn monitor_runs_bounded_ticks_and_persists_history() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = config_in(tmp.path());
    let hist_path = tmp.path().join("state").join("history.json");
    cfg.history_path = Some(hist_path.clone());

    let runner = Runner::new(cfg.clone()).unwrap().restore_history().await;
    runner.run_monitor(Some(3)).await;
    assert_eq!(runner.history().get("kc").len(), 3);

    let snap = history::load_snapshot(&hist_path).await.unwrap();
    assert_eq!(snap["kc"].len(), 3);

    // a fresh runner picks the windows back up
    let again = Runner::new(cfg).unwrap().restore_history().await;
    assert_eq!(again.history().get("kc").len(), 3);
}

#[tokio::test]
async fn weight_overrides_are_applied_from_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = config_in(tmp.path());
    let wpath = tmp.path().join("weights.toml");
    std::fs::write(
        &wpath,
        r#"
[weights.nba]
recent_performance = 0.20
injury_impact = 0.20
momentum = 0.20
rest_factor = 0.20
home_field = 0.20
"#,
    )
    .unwrap();
    cfg.weights_path = Some(wpath);

    let runner = Runner::new(cfg).unwrap();
    let nba = runner.registry().profile("nba");
    assert_eq!(nba.weight_of("home_field"), Some(0.20));
}
