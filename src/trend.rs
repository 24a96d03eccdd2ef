//! # Trend
//! Short-term direction of a team's readiness.
//!
//! Compares the mean of the latest 3 scores with the mean of the (up to) 3
//! scores before them. The window passed in must NOT contain the current
//! pass's score yet; the engine appends it only after classification.

use crate::model::Trend;

/// Minimum number of past points before a direction is reported.
pub const MIN_POINTS: usize = 3;
/// Size of each comparison window.
pub const WINDOW: usize = 3;
/// Mean shift (in score points) that counts as a move.
pub const THRESHOLD: f64 = 5.0;

pub fn classify(history: &[f64]) -> Trend {
    match delta(history) {
        Some(d) if d >= THRESHOLD => Trend::Rising,
        Some(d) if d <= -THRESHOLD => Trend::Declining,
        _ => Trend::Stable,
    }
}

/// mean(latest 3) − mean(previous ≤3). `None` when there's nothing to compare:
/// fewer than 3 points, or no points before the latest 3.
///
/// With 4–5 points the previous window is shorter than 3 and its mean is
/// taken over whatever is there.
pub fn delta(history: &[f64]) -> Option<f64> {
    let len = history.len();
    if len < MIN_POINTS {
        return None;
    }
    let split = len - WINDOW;
    let recent = &history[split..];
    let previous = &history[split.saturating_sub(WINDOW)..split];
    Some(mean(recent)? - mean(previous)?)
}

fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}
