//! # Weight Profiles
//!
//! Maps a sport identifier (e.g. "mlb", "NFL", "college-football") to its
//! fixed set of five named components, the calculator behind each name, and
//! the fractional weight of each component.
//!
//! - Case-insensitive lookup with normalization of dashes/underscores.
//! - Aliases map alternative spellings to canonical sport ids.
//! - Unknown sports fall back to the baseball profile, so the pipeline stays
//!   total when a new league shows up in the data.
//! - Weights can be overridden from a TOML or JSON file; an override must name
//!   exactly the profile's components and sum to 1.0, otherwise it is ignored.
//!
//! `SportRegistry::validate` is meant to run once at startup.

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::Path,
};

use crate::components::{self, Calculator, TeamContext};
use crate::model::ComponentScores;

/// Tolerance for "weights sum to 1.0".
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Every profile has exactly this many components.
pub const COMPONENTS_PER_SPORT: usize = 5;

/// Canonical id of the fallback profile.
pub const DEFAULT_SPORT: &str = "mlb";

/// One named, weighted input to the readiness score.
#[derive(Debug, Clone, Copy)]
pub struct ComponentSpec {
    pub name: &'static str,
    pub calculator: Calculator,
    pub weight: f64,
}

fn spec(name: &'static str, calculator: Calculator, weight: f64) -> ComponentSpec {
    ComponentSpec {
        name,
        calculator,
        weight,
    }
}

#[derive(Debug, Clone)]
pub struct SportProfile {
    /// Canonical id ("mlb", "nfl", "nba", "ncaaf").
    pub id: &'static str,
    pub label: &'static str,
    /// Last standing position that qualifies for the postseason.
    pub playoff_line: i32,
    pub components: [ComponentSpec; COMPONENTS_PER_SPORT],
}

impl SportProfile {
    /// Weight of a component; `None` if the profile doesn't know the name.
    pub fn weight_of(&self, name: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.weight)
    }

    pub fn weight_sum(&self) -> f64 {
        self.components.iter().map(|c| c.weight).sum()
    }

    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.iter().map(|c| c.name)
    }

    /// Run every calculator of this profile against one team.
    pub fn score_components(&self, ctx: &TeamContext<'_>) -> ComponentScores {
        self.components
            .iter()
            .map(|c| (c.name.to_string(), (c.calculator)(ctx)))
            .collect()
    }
}

fn builtin_profiles() -> Vec<SportProfile> {
    use components::*;
    vec![
        SportProfile {
            id: "mlb",
            label: "Professional Baseball",
            playoff_line: 6,
            components: [
                spec("recent_performance", recent_performance, 0.30),
                spec("injury_impact", injury_impact, 0.20),
                spec("standing_strength", standing_strength, 0.20),
                spec("head_to_head", head_to_head, 0.15),
                spec("rest_factor", rest_factor, 0.15),
            ],
        },
        SportProfile {
            id: "nfl",
            label: "Professional Football",
            playoff_line: 7,
            components: [
                spec("recent_performance", recent_performance, 0.25),
                spec("injury_impact", injury_impact, 0.25),
                spec("rest_factor", rest_factor, 0.20),
                spec("matchup_edge", matchup_edge, 0.20),
                spec("home_field", home_field, 0.10),
            ],
        },
        SportProfile {
            id: "nba",
            label: "Professional Basketball",
            playoff_line: 6,
            components: [
                spec("recent_performance", recent_performance, 0.25),
                spec("injury_impact", injury_impact, 0.25),
                spec("momentum", momentum, 0.20),
                spec("rest_factor", rest_factor, 0.20),
                spec("home_field", home_field, 0.10),
            ],
        },
        SportProfile {
            id: "ncaaf",
            label: "College Football",
            playoff_line: 4,
            components: [
                spec("poll_ranking", poll_ranking, 0.30),
                spec("recent_performance", recent_performance, 0.25),
                spec("momentum", momentum, 0.15),
                spec("injury_impact", injury_impact, 0.15),
                spec("matchup_edge", matchup_edge, 0.15),
            ],
        },
    ]
}

static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("baseball", "mlb"),
        ("major league baseball", "mlb"),
        ("football", "nfl"),
        ("pro football", "nfl"),
        ("basketball", "nba"),
        ("pro basketball", "nba"),
        ("ncaa", "ncaaf"),
        ("ncaa football", "ncaaf"),
        ("college football", "ncaaf"),
        ("college", "ncaaf"),
        ("cfb", "ncaaf"),
    ])
});

/// All known sport profiles.
#[derive(Debug, Clone)]
pub struct SportRegistry {
    profiles: Vec<SportProfile>,
}

impl Default for SportRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SportRegistry {
    pub fn builtin() -> Self {
        Self {
            profiles: builtin_profiles(),
        }
    }

    /// Profile for a sport id, or the baseball profile for unknown sports.
    pub fn profile(&self, sport: &str) -> &SportProfile {
        match self.resolve(sport) {
            Some(p) => p,
            None => {
                tracing::debug!(target: "weights", sport, fallback = DEFAULT_SPORT, "unknown sport, using default profile");
                self.default_profile()
            }
        }
    }

    /// Strict lookup: `None` for unknown sports.
    pub fn resolve(&self, sport: &str) -> Option<&SportProfile> {
        let s = normalize(sport);
        let canon = ALIASES.get(s.as_str()).copied().unwrap_or(s.as_str());
        self.profiles.iter().find(|p| p.id == canon)
    }

    pub fn default_profile(&self) -> &SportProfile {
        // builtin() always contains DEFAULT_SPORT
        self.profiles
            .iter()
            .find(|p| p.id == DEFAULT_SPORT)
            .unwrap_or(&self.profiles[0])
    }

    pub fn profiles(&self) -> &[SportProfile] {
        &self.profiles
    }

    /// Startup check: distinct names, weights in [0,1], sums equal 1.0.
    pub fn validate(&self) -> Result<()> {
        if self.profiles.is_empty() {
            bail!("sport registry is empty");
        }
        if self.resolve(DEFAULT_SPORT).is_none() {
            bail!("default sport profile '{DEFAULT_SPORT}' is missing");
        }
        for p in &self.profiles {
            let names: BTreeSet<&str> = p.component_names().collect();
            if names.len() != COMPONENTS_PER_SPORT {
                bail!("profile '{}' has duplicate component names", p.id);
            }
            if let Some(c) = p.components.iter().find(|c| !(0.0..=1.0).contains(&c.weight)) {
                bail!("profile '{}': weight of '{}' out of range: {}", p.id, c.name, c.weight);
            }
            let sum = p.weight_sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
                bail!("profile '{}': weights sum to {sum}, expected 1.0", p.id);
            }
        }
        Ok(())
    }

    /// Apply weight overrides; returns how many sports were updated.
    /// Invalid overrides are logged and skipped.
    pub fn apply_overrides(&mut self, overrides: &WeightOverrides) -> usize {
        let mut applied = 0;
        for (sport, weights) in &overrides.weights {
            let Some(canon) = self.resolve(sport).map(|p| p.id) else {
                tracing::warn!(target: "weights", sport = %sport, "override for unknown sport ignored");
                continue;
            };
            let Some(profile) = self.profiles.iter_mut().find(|p| p.id == canon) else {
                continue;
            };
            match check_override(profile, weights) {
                Ok(()) => {
                    for c in profile.components.iter_mut() {
                        if let Some(&w) = weights.get(c.name) {
                            c.weight = w;
                        }
                    }
                    tracing::info!(target: "weights", sport = canon, "weight override applied");
                    applied += 1;
                }
                Err(e) => {
                    tracing::warn!(target: "weights", sport = canon, "weight override rejected: {e:#}");
                }
            }
        }
        applied
    }
}

fn check_override(profile: &SportProfile, weights: &HashMap<String, f64>) -> Result<()> {
    let expected: BTreeSet<&str> = profile.component_names().collect();
    let given: BTreeSet<&str> = weights.keys().map(String::as_str).collect();
    if expected != given {
        return Err(anyhow!(
            "component names {:?} do not match profile {:?}",
            given,
            expected
        ));
    }
    if let Some((k, w)) = weights.iter().find(|(_, w)| !(0.0..=1.0).contains(*w)) {
        bail!("weight of '{k}' out of range: {w}");
    }
    let sum: f64 = weights.values().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
        bail!("weights sum to {sum}, expected 1.0");
    }
    Ok(())
}

/// Override file shape (TOML shown; JSON uses the same structure):
///
/// ```toml
/// [weights.nfl]
/// recent_performance = 0.30
/// injury_impact = 0.20
/// rest_factor = 0.20
/// matchup_edge = 0.20
/// home_field = 0.10
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightOverrides {
    #[serde(default)]
    pub weights: HashMap<String, HashMap<String, f64>>,
}

impl WeightOverrides {
    /// Load overrides from a `.toml` or `.json` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading weight overrides from {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content).context("parsing weight overrides JSON")
        } else {
            toml::from_str(&content).context("parsing weight overrides TOML")
        }
    }
}

/// Lowercase, turn separators into spaces, collapse whitespace.
fn normalize(s: &str) -> String {
    let out = s.trim().to_ascii_lowercase().replace(['-', '_', '/', '.'], " ");
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
