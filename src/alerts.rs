//! # Alerts
//! Threshold alerts over one pass's scored teams.
//!
//! - warning:  trend declining AND readiness < 40
//! - critical: leverage > 80 AND readiness < 50
//!
//! Both may fire for the same team. Every pass re-evaluates from scratch; there
//! is no deduplication or cooldown across passes. Output order is fixed
//! (sports lexically, teams in ranking order, warning before critical), so the
//! same input always yields the same list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::SportSummary;
use crate::model::{TeamReadiness, Trend};

pub const WARNING_READINESS_MAX: u8 = 40;
pub const CRITICAL_LEVERAGE_MIN: u8 = 80;
pub const CRITICAL_READINESS_MAX: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Critical,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Warning => "warning",
            AlertKind::Critical => "critical",
        }
    }
}

/// Numbers that tripped the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMetrics {
    pub readiness: u8,
    pub leverage: u8,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub sport: String,
    pub team: String,
    pub message: String,
    pub metrics: AlertMetrics,
}

/// Alerts for a single team, warning first.
pub fn evaluate(r: &TeamReadiness) -> Vec<Alert> {
    let mut out = Vec::new();
    let metrics = AlertMetrics {
        readiness: r.score,
        leverage: r.leverage,
        trend: r.trend,
    };

    if r.trend == Trend::Declining && r.score < WARNING_READINESS_MAX {
        out.push(Alert {
            kind: AlertKind::Warning,
            sport: r.sport.clone(),
            team: r.team_name.clone(),
            message: format!(
                "{} readiness is declining and down to {} (below {WARNING_READINESS_MAX})",
                r.team_name, r.score
            ),
            metrics,
        });
    }

    if r.leverage > CRITICAL_LEVERAGE_MIN && r.score < CRITICAL_READINESS_MAX {
        out.push(Alert {
            kind: AlertKind::Critical,
            sport: r.sport.clone(),
            team: r.team_name.clone(),
            message: format!(
                "{} heads into a high-leverage game ({}) with readiness at only {}",
                r.team_name, r.leverage, r.score
            ),
            metrics,
        });
    }

    out
}

pub fn generate(sports: &BTreeMap<String, SportSummary>) -> Vec<Alert> {
    sports
        .values()
        .flat_map(|s| s.teams.iter())
        .flat_map(evaluate)
        .collect()
}
