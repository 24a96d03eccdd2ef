//! Per-team dashboard records: readiness, percentile within the sport, and
//! recommended actions for weak components.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::alerts::AlertKind;
use crate::engine::SportSummary;
use crate::model::TeamReadiness;

/// Components below this get an action.
pub const ACTION_BELOW: f64 = 40.0;
/// ...and below this the action is critical.
pub const CRITICAL_BELOW: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub component: String,
    pub score: f64,
    pub severity: AlertKind,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDashboard {
    #[serde(flatten)]
    pub readiness: TeamReadiness,
    /// 0–100; share of the sport's teams scoring below this one, ties at mid-rank.
    pub percentile: u8,
    pub sport_team_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<RecommendedAction>,
}

/// One dashboard per scored team, sports in lexical order.
pub fn build(sports: &BTreeMap<String, SportSummary>) -> Vec<TeamDashboard> {
    let mut out = Vec::new();
    for summary in sports.values() {
        let mut ascending: Vec<u8> = summary.teams.iter().map(|r| r.score).collect();
        ascending.sort_unstable();
        for r in &summary.teams {
            out.push(TeamDashboard {
                readiness: r.clone(),
                percentile: percentile(&ascending, r.score),
                sport_team_count: ascending.len(),
                actions: actions(r),
            });
        }
    }
    out
}

/// Percentile of `score` within `ascending` (sorted scores of one sport).
///
/// Tied scores share the mid-rank of their run, so every team in a tie gets
/// the same value, halfway between the first and last tied position.
pub fn percentile(ascending: &[u8], score: u8) -> u8 {
    let n = ascending.len();
    if n == 0 {
        return 0;
    }
    let first = ascending.partition_point(|&s| s < score);
    let end = ascending.partition_point(|&s| s <= score);
    if first == end {
        // not in the list; rank it where it would be inserted
        return (first as f64 / n as f64 * 100.0).round() as u8;
    }
    let mid = (first + end - 1) as f64 / 2.0;
    (mid / n as f64 * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn actions(r: &TeamReadiness) -> Vec<RecommendedAction> {
    r.components
        .iter()
        .filter(|(_, v)| *v < ACTION_BELOW)
        .map(|(name, v)| RecommendedAction {
            component: name.to_string(),
            score: v,
            severity: if v < CRITICAL_BELOW {
                AlertKind::Critical
            } else {
                AlertKind::Warning
            },
            recommendation: recommendation(name),
        })
        .collect()
}

pub fn recommendation(component: &str) -> String {
    let text = match component {
        "recent_performance" => "Review film from recent losses and simplify the game plan",
        "injury_impact" => "Manage workloads and confirm depth behind injured starters",
        "momentum" => "Focus practice on execution in close-game situations to stop the slide",
        "rest_factor" => "Adjust travel and practice intensity to recover before the next game",
        "standing_strength" => "Prioritize winnable games to climb the standings",
        "head_to_head" => "Scout the opponent's tendencies from previous meetings",
        "matchup_edge" => "Game-plan around the opponent's strengths to offset the ranking gap",
        "poll_ranking" => "Schedule and win statement games to move up the poll",
        "home_field" => "Prepare for crowd noise and travel fatigue on the road",
        other => return format!("Monitor {} closely ahead of the next game", other.replace('_', " ")),
    };
    text.to_string()
}
