//! model.rs — input dataset shapes and the per-team readiness output.
//!
//! Inputs (`Dataset`, `Team`, `Player`) are produced by the dataset loader and
//! are read-only to the engine. Almost every field is optional; calculators
//! fall back to neutral defaults when something is missing.
//!
//! Outputs (`TeamReadiness`, `ComponentScores`, ...) are built once per pass and
//! never mutated afterwards; the next pass supersedes them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status thresholds: green ≥ 75 > yellow ≥ 50 > red.
pub const GREEN_MIN: f64 = 75.0;
pub const YELLOW_MIN: f64 = 50.0;

/// Everything the loader hands to the engine for one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Entries that fail to parse are dropped with a warning.
    #[serde(default, deserialize_with = "lenient::skip_invalid")]
    pub teams: Vec<Team>,
    #[serde(default, deserialize_with = "lenient::skip_invalid")]
    pub players: Vec<Player>,
}

/// One finished game from the team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub won: bool,
    #[serde(default, deserialize_with = "lenient::opt_i32", skip_serializing_if = "Option::is_none")]
    pub points_for: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_i32", skip_serializing_if = "Option::is_none")]
    pub points_against: Option<i32>,
}

impl GameResult {
    pub fn win() -> Self {
        Self {
            won: true,
            points_for: None,
            points_against: None,
        }
    }

    pub fn loss() -> Self {
        Self {
            won: false,
            points_for: None,
            points_against: None,
        }
    }
}

/// Win/loss tally (e.g. season series against the next opponent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient::count")]
    pub wins: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub losses: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Free-form league tag ("mlb", "NFL", "college-football", ...).
    /// Empty when absent; scored with the default profile.
    #[serde(default, deserialize_with = "lenient::string")]
    pub sport: String,
    /// Oldest first; the last element is the most recent game.
    #[serde(default, deserialize_with = "lenient::skip_invalid")]
    pub recent_games: Vec<GameResult>,
    /// Days since the last game.
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub rest_days: Option<i32>,
    /// Poll / power ranking, 1 = best.
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub ranking: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub opponent_ranking: Option<i32>,
    /// Seed / standing position, 1 = top seed.
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub playoff_position: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub wildcard_games_back: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_record")]
    pub head_to_head: Option<Record>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub next_opponent: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub next_opponent_rival: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub next_opponent_division: bool,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub next_game_home: Option<bool>,
    /// Negative counts clamp to 0.
    #[serde(default, deserialize_with = "lenient::opt_count")]
    pub games_remaining: Option<u32>,
}

impl Team {
    /// Minimal team with only identity fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, sport: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sport: sport.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub team_id: String,
    /// `None` means healthy.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub injury_status: Option<String>,
    /// Composite skill score; used as the player's weight in injury impact.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub skill_score: Option<f64>,
}

/// Players at or above this skill score count as "stars" in the roster summary.
pub const STAR_SKILL_MIN: f64 = 80.0;

/// Traffic-light classification of a readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Green,
    Yellow,
    Red,
}

impl Status {
    /// Pure step function over the ordered thresholds.
    pub fn from_score(score: f64) -> Self {
        if score >= GREEN_MIN {
            Status::Green
        } else if score >= YELLOW_MIN {
            Status::Yellow
        } else {
            Status::Red
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Green => "green",
            Status::Yellow => "yellow",
            Status::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

/// Component name → 0–100 value, keyed by name (stable serialization order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentScores(BTreeMap<String, f64>);

impl ComponentScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, clamped to [0,100]. NaN collapses to the neutral 50.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), clamp_score(value));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for ComponentScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub total: u32,
    pub available: u32,
    pub stars: u32,
}

/// Result of one pass for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReadiness {
    pub team_id: String,
    pub team_name: String,
    /// Grouping key: canonical sport id, or the lowercased tag for unknown sports.
    pub sport: String,
    pub score: u8,
    pub status: Status,
    pub components: ComponentScores,
    pub leverage: u8,
    pub trend: Trend,
    pub roster: RosterSummary,
}

/// Field-level deserializers for loader output.
///
/// A value of the wrong shape (string where a number belongs, `2.0` for a day
/// count, `null` for a flag) degrades to "absent" instead of failing the whole
/// dataset. Numeric strings are accepted; floats are rounded for integer fields.
mod lenient {
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};
    use serde_json::Value;

    use super::Record;

    fn number(v: &Value) -> Option<f64> {
        let x = match v {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        x.is_finite().then_some(x)
    }

    fn value<'de, D: Deserializer<'de>>(d: D) -> Result<Value, D::Error> {
        Option::<Value>::deserialize(d).map(|v| v.unwrap_or(Value::Null))
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(number(&value(d)?))
    }

    pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        Ok(number(&value(d)?).map(|x| x.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32))
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(number(&value(d)?).map(|x| x.round().clamp(0.0, u32::MAX as f64) as u32))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        opt_count(d).map(Option::unwrap_or_default)
    }

    pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(match value(d)? {
            Value::Bool(b) => Some(b),
            _ => None,
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        opt_bool(d).map(Option::unwrap_or_default)
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match value(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        opt_string(d).map(Option::unwrap_or_default)
    }

    pub fn opt_record<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Record>, D::Error> {
        Ok(match value(d)? {
            v @ Value::Object(_) => serde_json::from_value(v).ok(),
            _ => None,
        })
    }

    /// Parse each element on its own; drop (and log) the ones that fail.
    pub fn skip_invalid<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(items) = value(d)? else {
            return Ok(Vec::new());
        };
        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| match serde_json::from_value(v) {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!(target: "dataset", index = i, kind = std::any::type_name::<T>(), error = %e, "skipping malformed entry");
                    None
                }
            })
            .collect())
    }
}

/// Clamp to [0,100]; NaN → 50.
pub fn clamp_score(x: f64) -> f64 {
    if x.is_nan() {
        50.0
    } else {
        x.clamp(0.0, 100.0)
    }
}
