// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod model;

// Scoring core (pure, no I/O)
pub mod alerts;
pub mod components;
pub mod dashboard;
pub mod engine;
pub mod featured;
pub mod history;
pub mod leverage;
pub mod readiness;
pub mod trend;
pub mod weights;

// Edge: config, dataset loading, output, scheduling
pub mod config;
pub mod dataset;
pub mod runner;
pub mod sink;

// ---- Re-exports for stable public API ----
pub use crate::engine::{evaluate, run_cycle, ResultBundle, SportSummary};
pub use crate::history::{HistoryStore, InMemoryHistory};
pub use crate::model::{Dataset, Player, Status, Team, TeamReadiness, Trend};
pub use crate::weights::SportRegistry;
