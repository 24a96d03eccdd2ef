//! # Readiness Engine
//! One computation pass: dataset → per-sport rankings, featured matchups,
//! alerts.
//!
//! `evaluate` is pure with respect to the history store: it only reads each
//! team's past scores. `run_cycle` evaluates the whole dataset first and only
//! then appends every new score, so an abandoned pass leaves history untouched.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::alerts::{self, Alert};
use crate::components::{self, TeamContext};
use crate::featured::{self, FeaturedMatchup};
use crate::history::HistoryStore;
use crate::leverage::leverage;
use crate::model::{Dataset, Player, RosterSummary, Team, TeamReadiness, STAR_SKILL_MIN};
use crate::readiness::aggregate;
use crate::trend;
use crate::weights::SportRegistry;

/// How many teams `top_teams` / `bottom_teams` list.
pub const SUMMARY_SIZE: usize = 5;

const UNKNOWN_SPORT: &str = "unknown";

/// Rankings for one sport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportSummary {
    /// Sorted by score, descending.
    pub teams: Vec<TeamReadiness>,
    pub average_readiness: f64,
    pub top_teams: Vec<TeamReadiness>,
    pub bottom_teams: Vec<TeamReadiness>,
}

impl SportSummary {
    /// Sort (score desc, then name, then id) and derive the summary fields.
    pub fn from_scored(mut teams: Vec<TeamReadiness>) -> Self {
        teams.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.team_name.cmp(&b.team_name))
                .then_with(|| a.team_id.cmp(&b.team_id))
        });

        let average_readiness = if teams.is_empty() {
            0.0
        } else {
            let sum: f64 = teams.iter().map(|t| t.score as f64).sum();
            (sum / teams.len() as f64 * 10.0).round() / 10.0
        };
        let top_teams = teams.iter().take(SUMMARY_SIZE).cloned().collect();
        let bottom_teams = teams[teams.len().saturating_sub(SUMMARY_SIZE)..].to_vec();

        Self {
            teams,
            average_readiness,
            top_teams,
            bottom_teams,
        }
    }
}

/// Everything one pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub timestamp: DateTime<Utc>,
    pub sports: BTreeMap<String, SportSummary>,
    pub featured: Vec<FeaturedMatchup>,
    pub alerts: Vec<Alert>,
}

impl ResultBundle {
    pub fn team_count(&self) -> usize {
        self.sports.values().map(|s| s.teams.len()).sum()
    }

    pub fn all_teams(&self) -> impl Iterator<Item = &TeamReadiness> {
        self.sports.values().flat_map(|s| s.teams.iter())
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("readiness_passes_total", "Completed computation passes.");
        describe_counter!("readiness_teams_scored_total", "Teams scored across all passes.");
        describe_counter!("readiness_alerts_total", "Alerts emitted, labelled by kind.");
        describe_gauge!("readiness_last_pass_ts", "Unix ts of the last completed pass.");
    });
}

/// Key a team is grouped under: canonical id for known sports, otherwise the
/// trimmed lowercase tag (scored with the default profile).
pub fn sport_key(registry: &SportRegistry, sport: &str) -> String {
    match registry.resolve(sport) {
        Some(p) => p.id.to_string(),
        None => {
            let s = sport.trim().to_ascii_lowercase();
            if s.is_empty() {
                UNKNOWN_SPORT.to_string()
            } else {
                s
            }
        }
    }
}

/// Score one team. `past` is its history before this pass.
pub fn score_team(
    team: &Team,
    players: &[&Player],
    registry: &SportRegistry,
    past: &[f64],
) -> TeamReadiness {
    let profile = registry.profile(&team.sport);
    let ctx = TeamContext::new(team, players);
    let components = profile.score_components(&ctx);
    let (score, status) = aggregate(&components, profile);

    TeamReadiness {
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        sport: sport_key(registry, &team.sport),
        score,
        status,
        components,
        leverage: leverage(team, profile.playoff_line),
        trend: trend::classify(past),
        roster: roster_summary(players),
    }
}

pub fn roster_summary(players: &[&Player]) -> RosterSummary {
    let mut out = RosterSummary::default();
    for p in players {
        out.total += 1;
        if components::is_available(p) {
            out.available += 1;
        }
        if p.skill_score.is_some_and(|s| s >= STAR_SKILL_MIN) {
            out.stars += 1;
        }
    }
    out
}

/// Score every team without touching history.
///
/// Team ids are unique within a pass: a repeated id keeps its first entry and
/// the rest are dropped with a warning.
pub fn evaluate(
    dataset: &Dataset,
    registry: &SportRegistry,
    history: &dyn HistoryStore,
    now: DateTime<Utc>,
) -> ResultBundle {
    let mut roster: HashMap<&str, Vec<&Player>> = HashMap::new();
    for p in &dataset.players {
        roster.entry(p.team_id.as_str()).or_default().push(p);
    }

    let mut by_id: HashMap<&str, &Team> = HashMap::new();
    let mut grouped: BTreeMap<String, Vec<TeamReadiness>> = BTreeMap::new();
    for team in &dataset.teams {
        if by_id.contains_key(team.id.as_str()) {
            tracing::warn!(target: "engine", team = %team.id, name = %team.name, "duplicate team id, keeping the first entry");
            continue;
        }
        by_id.insert(team.id.as_str(), team);
        let players = roster.get(team.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        let past = history.get(&team.id);
        let r = score_team(team, players, registry, &past);
        tracing::trace!(target: "engine", team = %r.team_id, score = r.score, leverage = r.leverage, trend = r.trend.as_str(), "team scored");
        grouped.entry(r.sport.clone()).or_default().push(r);
    }

    let sports: BTreeMap<String, SportSummary> = grouped
        .into_iter()
        .map(|(k, v)| (k, SportSummary::from_scored(v)))
        .collect();

    let featured = featured::select(&sports, &by_id);
    let alerts = alerts::generate(&sports);

    ResultBundle {
        timestamp: now,
        sports,
        featured,
        alerts,
    }
}

/// Full pass: evaluate, then commit every new score to the history store.
pub fn run_cycle(
    dataset: &Dataset,
    registry: &SportRegistry,
    history: &dyn HistoryStore,
    now: DateTime<Utc>,
) -> ResultBundle {
    ensure_metrics_described();

    let bundle = evaluate(dataset, registry, history, now);

    for r in bundle.all_teams() {
        history.append(&r.team_id, r.score as f64);
    }

    let teams = bundle.team_count();
    counter!("readiness_passes_total").increment(1);
    counter!("readiness_teams_scored_total").increment(teams as u64);
    for a in &bundle.alerts {
        counter!("readiness_alerts_total", "kind" => a.kind.as_str()).increment(1);
    }
    gauge!("readiness_last_pass_ts").set(now.timestamp() as f64);

    tracing::info!(
        target: "engine",
        sports = bundle.sports.len(),
        teams,
        featured = bundle.featured.len(),
        alerts = bundle.alerts.len(),
        "readiness pass complete"
    );

    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistory;
    use crate::model::{GameResult, Status};

    fn team(id: &str, sport: &str, wins: usize) -> Team {
        let mut t = Team::new(id, id.to_uppercase(), sport);
        t.recent_games = (0..10)
            .map(|i| if i < wins { GameResult::win() } else { GameResult::loss() })
            .collect();
        t
    }

    #[test]
    fn groups_by_canonical_sport() {
        let ds = Dataset {
            teams: vec![team("a", "NBA", 5), team("b", "basketball", 5), team("c", "cricket", 5)],
            players: vec![],
        };
        let h = InMemoryHistory::default();
        let b = evaluate(&ds, &SportRegistry::builtin(), &h, Utc::now());
        assert_eq!(b.sports.keys().collect::<Vec<_>>(), vec!["cricket", "nba"]);
        assert_eq!(b.sports["nba"].teams.len(), 2);
    }

    #[test]
    fn summary_sorted_desc_with_top_and_bottom() {
        let ds = Dataset {
            teams: (0..8).map(|i| team(&format!("t{i}"), "nba", i)).collect(),
            players: vec![],
        };
        let h = InMemoryHistory::default();
        let b = evaluate(&ds, &SportRegistry::builtin(), &h, Utc::now());
        let s = &b.sports["nba"];
        assert!(s.teams.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(s.top_teams.len(), SUMMARY_SIZE);
        assert_eq!(s.bottom_teams.len(), SUMMARY_SIZE);
        assert_eq!(s.top_teams[0], s.teams[0]);
        assert_eq!(s.bottom_teams.last(), s.teams.last());
    }

    #[test]
    fn evaluate_does_not_append_but_run_cycle_does() {
        let ds = Dataset {
            teams: vec![team("a", "mlb", 7)],
            players: vec![],
        };
        let reg = SportRegistry::builtin();
        let h = InMemoryHistory::default();
        evaluate(&ds, &reg, &h, Utc::now());
        assert!(h.get("a").is_empty());
        let b = run_cycle(&ds, &reg, &h, Utc::now());
        assert_eq!(h.get("a"), vec![b.sports["mlb"].teams[0].score as f64]);
    }

    #[test]
    fn duplicate_ids_keep_the_first_team() {
        let mut second = team("x", "nfl", 0);
        second.name = "Impostor".into();
        let ds = Dataset {
            teams: vec![team("x", "nba", 10), second, team("y", "nba", 3)],
            players: vec![],
        };
        let reg = SportRegistry::builtin();
        let h = InMemoryHistory::default();
        let b = run_cycle(&ds, &reg, &h, Utc::now());

        assert_eq!(b.team_count(), 2);
        assert!(!b.sports.contains_key("nfl"));
        assert_eq!(b.all_teams().find(|t| t.team_id == "x").map(|t| t.team_name.as_str()), Some("X"));
        assert_eq!(h.get("x").len(), 1);
        run_cycle(&ds, &reg, &h, Utc::now());
        assert_eq!(h.get("x").len(), 2);
    }

    #[test]
    fn team_without_data_is_neutral() {
        let t = Team::new("x", "X", "nfl");
        let r = score_team(&t, &[], &SportRegistry::builtin(), &[]);
        assert_eq!(r.score, 50);
        assert_eq!(r.status, Status::Yellow);
        assert_eq!(r.leverage, 50);
        assert_eq!(r.roster, RosterSummary::default());
        assert_eq!(r.components.len(), 5);
    }

    #[test]
    fn roster_counts() {
        let ps = [
            Player { id: "1".into(), team_id: "a".into(), injury_status: None, skill_score: Some(92.0) },
            Player { id: "2".into(), team_id: "a".into(), injury_status: Some("Out".into()), skill_score: Some(85.0) },
            Player { id: "3".into(), team_id: "a".into(), injury_status: Some("questionable".into()), skill_score: None },
        ];
        let refs: Vec<&Player> = ps.iter().collect();
        assert_eq!(
            roster_summary(&refs),
            RosterSummary { total: 3, available: 2, stars: 2 }
        );
    }
}
