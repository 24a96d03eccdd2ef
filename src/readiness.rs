//! Readiness aggregation: weighted sum of component scores → 0–100 + status.

use crate::model::{clamp_score, ComponentScores, Status};
use crate::weights::SportProfile;

/// Σ(component × weight), rounded to the nearest integer and classified.
///
/// A component the profile doesn't know contributes zero; calculators are
/// expected to supply every name the profile lists.
pub fn aggregate(scores: &ComponentScores, profile: &SportProfile) -> (u8, Status) {
    let raw: f64 = scores
        .iter()
        .map(|(name, value)| value * profile.weight_of(name).unwrap_or(0.0))
        .sum();
    let rounded = clamp_score(raw).round();
    (rounded as u8, Status::from_score(rounded))
}
