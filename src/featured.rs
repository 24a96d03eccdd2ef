//! # Featured Matchups
//! Cross-sport shortlist of high-stakes games where the team is ready.
//!
//! Per sport: keep teams with leverage > 70 and readiness > 60, at most two,
//! in ranking order. Then sort everything by readiness + leverage and keep 5.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::engine::SportSummary;
use crate::model::{Status, Team, TeamReadiness, Trend};

pub const MIN_LEVERAGE: u8 = 70;
pub const MIN_READINESS: u8 = 60;
pub const PER_SPORT: usize = 2;
pub const MAX_FEATURED: usize = 5;

const UNKNOWN_OPPONENT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedMatchup {
    pub sport: String,
    pub team: String,
    pub opponent: String,
    pub readiness: u8,
    pub leverage: u8,
    pub status: Status,
    pub headline: String,
}

/// Which headline rule fired. First matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlineKind {
    Primed,
    UphillBattle,
    Surging,
    Showdown,
    Generic,
}

impl HeadlineKind {
    pub fn pick(r: &TeamReadiness, rival: bool) -> Self {
        if r.score >= 80 && r.leverage >= 85 {
            HeadlineKind::Primed
        } else if r.score < 70 && r.leverage >= 85 {
            HeadlineKind::UphillBattle
        } else if r.trend == Trend::Rising {
            HeadlineKind::Surging
        } else if rival {
            HeadlineKind::Showdown
        } else {
            HeadlineKind::Generic
        }
    }
}

pub fn headline(kind: HeadlineKind, team: &str, opponent: &str, status: Status) -> String {
    match kind {
        HeadlineKind::Primed => format!("{team} primed for a statement game against {opponent}"),
        HeadlineKind::UphillBattle => {
            format!("{team} faces an uphill battle in a must-win spot against {opponent}")
        }
        HeadlineKind::Surging => format!("{team} surging into the matchup with {opponent}"),
        HeadlineKind::Showdown => format!("Rivalry showdown: {team} vs {opponent}"),
        HeadlineKind::Generic => format!(
            "{team} ({} readiness) takes on {opponent}",
            status.as_str()
        ),
    }
}

/// `teams` maps team id → input team, used for opponent name and rivalry flag.
pub fn select(
    sports: &BTreeMap<String, SportSummary>,
    teams: &HashMap<&str, &Team>,
) -> Vec<FeaturedMatchup> {
    let mut out: Vec<FeaturedMatchup> = Vec::new();

    for (sport, summary) in sports {
        let picks = summary
            .teams
            .iter()
            .filter(|r| r.leverage > MIN_LEVERAGE && r.score > MIN_READINESS)
            .take(PER_SPORT);

        for r in picks {
            let team = teams.get(r.team_id.as_str());
            let opponent = team
                .and_then(|t| t.next_opponent.as_deref())
                .filter(|o| !o.trim().is_empty())
                .unwrap_or(UNKNOWN_OPPONENT);
            let rival = team.is_some_and(|t| t.next_opponent_rival);
            let kind = HeadlineKind::pick(r, rival);

            out.push(FeaturedMatchup {
                sport: sport.clone(),
                team: r.team_name.clone(),
                opponent: opponent.to_string(),
                readiness: r.score,
                leverage: r.leverage,
                status: r.status,
                headline: headline(kind, &r.team_name, opponent, r.status),
            });
        }
    }

    // stable: ties keep sport/ranking order
    out.sort_by_key(|m| std::cmp::Reverse(m.readiness as u16 + m.leverage as u16));
    out.truncate(MAX_FEATURED);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentScores, RosterSummary};

    fn readiness(id: &str, sport: &str, score: u8, leverage: u8, trend: Trend) -> TeamReadiness {
        TeamReadiness {
            team_id: id.into(),
            team_name: id.to_uppercase(),
            sport: sport.into(),
            score,
            status: Status::from_score(score as f64),
            components: ComponentScores::new(),
            leverage,
            trend,
            roster: RosterSummary::default(),
        }
    }

    fn summary(teams: Vec<TeamReadiness>) -> SportSummary {
        SportSummary::from_scored(teams)
    }

    #[test]
    fn filters_are_strict() {
        let mut sports = BTreeMap::new();
        sports.insert(
            "nfl".to_string(),
            summary(vec![
                readiness("a", "nfl", 90, 70, Trend::Stable),
                readiness("b", "nfl", 60, 95, Trend::Stable),
                readiness("c", "nfl", 61, 71, Trend::Stable),
            ]),
        );
        let out = select(&sports, &HashMap::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].team, "C");
        assert_eq!(out[0].opponent, UNKNOWN_OPPONENT);
    }

    #[test]
    fn at_most_two_per_sport_and_five_total() {
        let mut sports = BTreeMap::new();
        for sport in ["mlb", "nba", "nfl", "ncaaf"] {
            let teams = (0..4)
                .map(|i| readiness(&format!("{sport}{i}"), sport, 90 - i, 90, Trend::Stable))
                .collect();
            sports.insert(sport.to_string(), summary(teams));
        }
        let out = select(&sports, &HashMap::new());
        assert_eq!(out.len(), MAX_FEATURED);
        for sport in ["mlb", "nba", "nfl", "ncaaf"] {
            assert!(out.iter().filter(|m| m.sport == sport).count() <= PER_SPORT);
        }
        // sorted by readiness + leverage, desc
        assert!(out.windows(2).all(|w| {
            w[0].readiness as u16 + w[0].leverage as u16 >= w[1].readiness as u16 + w[1].leverage as u16
        }));
    }

    #[test]
    fn headline_priority() {
        let primed = readiness("a", "nba", 85, 90, Trend::Rising);
        assert_eq!(HeadlineKind::pick(&primed, true), HeadlineKind::Primed);

        let uphill = readiness("a", "nba", 65, 90, Trend::Rising);
        assert_eq!(HeadlineKind::pick(&uphill, true), HeadlineKind::UphillBattle);

        let surging = readiness("a", "nba", 75, 80, Trend::Rising);
        assert_eq!(HeadlineKind::pick(&surging, true), HeadlineKind::Surging);

        let showdown = readiness("a", "nba", 75, 80, Trend::Stable);
        assert_eq!(HeadlineKind::pick(&showdown, true), HeadlineKind::Showdown);
        assert_eq!(HeadlineKind::pick(&showdown, false), HeadlineKind::Generic);
    }

    #[test]
    fn uses_opponent_and_rivalry_from_team() {
        let mut team = Team::new("bos", "Red Sox", "mlb");
        team.next_opponent = Some("Yankees".into());
        team.next_opponent_rival = true;
        let mut r = readiness("bos", "mlb", 75, 80, Trend::Stable);
        r.team_name = "Red Sox".into();

        let mut sports = BTreeMap::new();
        sports.insert("mlb".to_string(), summary(vec![r]));
        let teams = HashMap::from([("bos", &team)]);

        let out = select(&sports, &teams);
        assert_eq!(out[0].opponent, "Yankees");
        assert_eq!(out[0].headline, "Rivalry showdown: Red Sox vs Yankees");
    }
}
