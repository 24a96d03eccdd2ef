//! Dataset adapter: reads the loader's JSON output into a `Dataset`.

use anyhow::{Context, Result};
use std::path::Path;

use crate::model::Dataset;

pub async fn load(path: &Path) -> Result<Dataset> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading dataset {}", path.display()))?;
    parse(&bytes).with_context(|| format!("parsing dataset {}", path.display()))
}

pub fn parse(bytes: &[u8]) -> Result<Dataset> {
    let ds: Dataset = serde_json::from_slice(bytes)?;
    tracing::debug!(target: "dataset", teams = ds.teams.len(), players = ds.players.len(), "dataset parsed");
    Ok(ds)
}
