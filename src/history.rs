//! history.rs — bounded per-team readiness history feeding the trend analyzer.
//!
//! The engine never owns this state: it reads a snapshot before a pass and
//! appends each team's new score only after that team's computation finished.
//! Read-then-append is serialized per team key; different teams never contend.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Default number of past scores kept per team.
pub const DEFAULT_CAPACITY: usize = 30;

/// team id → past scores, oldest first.
pub type HistorySnapshot = BTreeMap<String, Vec<f64>>;

pub trait HistoryStore: Send + Sync {
    /// Past scores for a team, oldest first. Unknown team → empty.
    fn get(&self, team_id: &str) -> Vec<f64>;

    /// Append one score, evicting the oldest entries past capacity.
    fn append(&self, team_id: &str, score: f64);

    /// Copy of every window.
    fn snapshot(&self) -> HistorySnapshot;
}

type Window = Arc<Mutex<VecDeque<f64>>>;

#[derive(Debug)]
pub struct InMemoryHistory {
    windows: RwLock<HashMap<String, Window>>,
    cap: usize,
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InMemoryHistory {
    /// Capacity 0 is bumped to 1.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            cap: cap.max(1),
        }
    }

    /// Rebuild from a snapshot, trimming each window to capacity (newest kept).
    pub fn from_snapshot(snapshot: HistorySnapshot, cap: usize) -> Self {
        let store = Self::with_capacity(cap);
        {
            let mut map = store.windows.write().unwrap_or_else(PoisonError::into_inner);
            for (team, scores) in snapshot {
                let start = scores.len().saturating_sub(store.cap);
                let buf: VecDeque<f64> = scores[start..].iter().copied().collect();
                map.insert(team, Arc::new(Mutex::new(buf)));
            }
        }
        store
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    fn window(&self, team_id: &str) -> Window {
        if let Some(w) = self
            .windows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(team_id)
        {
            return Arc::clone(w);
        }
        let mut map = self.windows.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            map.entry(team_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(VecDeque::with_capacity(self.cap)))),
        )
    }
}

impl HistoryStore for InMemoryHistory {
    fn get(&self, team_id: &str) -> Vec<f64> {
        let map = self.windows.read().unwrap_or_else(PoisonError::into_inner);
        match map.get(team_id) {
            Some(w) => w
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }

    fn append(&self, team_id: &str, score: f64) {
        let w = self.window(team_id);
        let mut buf = w.lock().unwrap_or_else(PoisonError::into_inner);
        buf.push_back(score);
        while buf.len() > self.cap {
            buf.pop_front();
        }
    }

    fn snapshot(&self) -> HistorySnapshot {
        let map = self.windows.read().unwrap_or_else(PoisonError::into_inner);
        map.iter()
            .map(|(k, w)| {
                let buf = w.lock().unwrap_or_else(PoisonError::into_inner);
                (k.clone(), buf.iter().copied().collect())
            })
            .collect()
    }
}

/// Read a snapshot written by `save_snapshot`. Missing file → empty snapshot.
pub async fn load_snapshot(path: &Path) -> Result<HistorySnapshot> {
    match tokio::fs::read_to_string(path).await {
        Ok(s) => serde_json::from_str(&s)
            .with_context(|| format!("parsing history snapshot {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HistorySnapshot::new()),
        Err(e) => Err(e).with_context(|| format!("reading history snapshot {}", path.display())),
    }
}

pub async fn save_snapshot(path: &Path, snapshot: &HistorySnapshot) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(snapshot).context("serializing history snapshot")?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("writing history snapshot {}", path.display()))
}
