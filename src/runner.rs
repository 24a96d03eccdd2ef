//! Pass orchestration: load → score → publish, once or on a fixed interval.
//!
//! Only dataset loading can fail a pass. Sink and history-snapshot failures are
//! logged and the computed bundle is still returned.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::time;

use crate::config::EngineConfig;
use crate::dashboard;
use crate::dataset;
use crate::engine::{self, ResultBundle};
use crate::history::{self, HistoryStore, InMemoryHistory};
use crate::sink::ResultSink;
use crate::weights::{SportRegistry, WeightOverrides};

pub struct Runner {
    config: EngineConfig,
    registry: SportRegistry,
    history: Arc<InMemoryHistory>,
    sinks: Vec<Box<dyn ResultSink>>,
}

impl Runner {
    /// Builds the registry (with overrides, if configured) and validates it.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let mut registry = SportRegistry::builtin();
        if let Some(p) = &config.weights_path {
            match WeightOverrides::load_from_file(p) {
                Ok(o) => {
                    registry.apply_overrides(&o);
                }
                Err(e) => tracing::warn!(target: "runner", "weight overrides not loaded: {e:#}"),
            }
        }
        registry.validate()?;

        let history = Arc::new(InMemoryHistory::with_capacity(config.history_capacity));
        Ok(Self {
            config,
            registry,
            history,
            sinks: Vec::new(),
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Replace the history store, e.g. with one restored from a snapshot.
    pub fn with_history(mut self, history: Arc<InMemoryHistory>) -> Self {
        self.history = history;
        self
    }

    /// Restore history from `history_path`, if configured. Errors are logged.
    pub async fn restore_history(self) -> Self {
        let Some(path) = self.config.history_path.clone() else {
            return self;
        };
        match history::load_snapshot(&path).await {
            Ok(snap) => {
                tracing::info!(target: "runner", teams = snap.len(), path = %path.display(), "history restored");
                let cap = self.config.history_capacity;
                self.with_history(Arc::new(InMemoryHistory::from_snapshot(snap, cap)))
            }
            Err(e) => {
                tracing::warn!(target: "runner", "history snapshot not restored: {e:#}");
                self
            }
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &SportRegistry {
        &self.registry
    }

    pub fn history(&self) -> &InMemoryHistory {
        &self.history
    }

    /// One full pass.
    pub async fn run_once(&self) -> Result<ResultBundle> {
        let ds = dataset::load(&self.config.data_path).await?;
        let bundle = engine::run_cycle(&ds, &self.registry, self.history.as_ref(), Utc::now());
        let dashboards = dashboard::build(&bundle.sports);

        for sink in &self.sinks {
            if let Err(e) = sink.publish(&bundle, &dashboards).await {
                tracing::warn!(target: "runner", sink = sink.name(), "publish failed: {e:#}");
            }
        }

        if let Some(path) = &self.config.history_path {
            if let Err(e) = history::save_snapshot(path, &self.history.snapshot()).await {
                tracing::warn!(target: "runner", "history snapshot not saved: {e:#}");
            }
        }

        Ok(bundle)
    }

    /// Re-run the pass every `monitor_interval_ms`. A failed tick is logged and
    /// the next tick retries. `max_ticks` bounds the loop (tests); `None` runs
    /// forever.
    pub async fn run_monitor(&self, max_ticks: Option<u64>) {
        let period = time::Duration::from_millis(self.config.monitor_interval_ms);
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        tracing::info!(target: "runner", interval_ms = self.config.monitor_interval_ms, "monitor started");

        let mut ticks = 0u64;
        loop {
            if max_ticks.is_some_and(|m| ticks >= m) {
                break;
            }
            ticker.tick().await;
            ticks += 1;

            match self.run_once().await {
                Ok(b) => tracing::debug!(target: "runner", tick = ticks, alerts = b.alerts.len(), "monitor tick ok"),
                Err(e) => tracing::warn!(target: "runner", tick = ticks, "monitor tick failed: {e:#}"),
            }
        }
    }
}
