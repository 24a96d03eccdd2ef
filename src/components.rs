//! # Component Calculators
//! Pure functions turning one team's raw state into a 0–100 sub-score.
//!
//! - Every calculator is total: absent inputs or zero denominators yield the
//!   neutral `NEUTRAL` (50) instead of failing.
//! - Every output is clamped to [0,100], even for impossible inputs
//!   (negative counts, ranks below 1, NaN skill scores).
//!
//! Which calculators a sport uses, and how much each weighs, lives in
//! `weights.rs`.

use crate::model::{clamp_score, Player, Team};

/// Neutral value used whenever an input is missing.
pub const NEUTRAL: f64 = 50.0;

/// Window sizes for the form-based components.
pub const RECENT_WINDOW: usize = 10;
pub const MOMENTUM_WINDOW: usize = 5;

/// What a calculator sees: the team plus its own players.
#[derive(Debug, Clone, Copy)]
pub struct TeamContext<'a> {
    pub team: &'a Team,
    pub players: &'a [&'a Player],
}

impl<'a> TeamContext<'a> {
    pub fn new(team: &'a Team, players: &'a [&'a Player]) -> Self {
        Self { team, players }
    }
}

/// Signature shared by all calculators.
pub type Calculator = fn(&TeamContext<'_>) -> f64;

/// Win fraction over the last 10 games × 100.
pub fn recent_performance(ctx: &TeamContext<'_>) -> f64 {
    let games = last_n(&ctx.team.recent_games, RECENT_WINDOW);
    if games.is_empty() {
        return NEUTRAL;
    }
    let wins = games.iter().filter(|g| g.won).count();
    clamp_score(wins as f64 / games.len() as f64 * 100.0)
}

/// Wins in the last 5 games: 5 → 100, none → 0, otherwise wins × 20.
/// A shorter history is not a perfect run: 2 of 2 scores 40.
pub fn momentum(ctx: &TeamContext<'_>) -> f64 {
    let games = last_n(&ctx.team.recent_games, MOMENTUM_WINDOW);
    if games.is_empty() {
        return NEUTRAL;
    }
    let wins = games.iter().filter(|g| g.won).count();
    let raw = if wins == MOMENTUM_WINDOW {
        100.0
    } else if wins == 0 {
        0.0
    } else {
        wins as f64 * 20.0
    };
    clamp_score(raw)
}

/// Days-since-last-game lookup: 1–2 optimal, back-to-back penalized,
/// long layoffs neutral.
pub fn rest_factor(ctx: &TeamContext<'_>) -> f64 {
    match ctx.team.rest_days {
        None => NEUTRAL,
        Some(d) if d <= 0 => 25.0,
        Some(1..=2) => 100.0,
        Some(d) if d > 4 => 50.0,
        Some(_) => 75.0,
    }
}

/// Roster availability, weighted by skill score where known:
/// Σ(weight × availability) / Σ(weight).
pub fn injury_impact(ctx: &TeamContext<'_>) -> f64 {
    if ctx.players.is_empty() {
        return NEUTRAL;
    }
    let mut weighted = 0.0;
    let mut total = 0.0;
    for p in ctx.players {
        let w = player_weight(p);
        weighted += w * availability(p.injury_status.as_deref());
        total += w;
    }
    if total <= 0.0 {
        return NEUTRAL;
    }
    clamp_score(weighted / total * 100.0)
}

/// Standing position: 1st → 100, each place below costs 10.
pub fn standing_strength(ctx: &TeamContext<'_>) -> f64 {
    match ctx.team.playoff_position {
        Some(pos) => clamp_score(100.0 - (pos as f64 - 1.0) * 10.0),
        None => NEUTRAL,
    }
}

/// Season series against the next opponent.
pub fn head_to_head(ctx: &TeamContext<'_>) -> f64 {
    match ctx.team.head_to_head {
        Some(r) if r.wins + r.losses > 0 => {
            clamp_score(r.wins as f64 / (r.wins + r.losses) as f64 * 100.0)
        }
        _ => NEUTRAL,
    }
}

/// Rank differential: 50 + (opponent rank − own rank) × 2.
pub fn matchup_edge(ctx: &TeamContext<'_>) -> f64 {
    match (ctx.team.ranking, ctx.team.opponent_ranking) {
        (Some(own), Some(opp)) => clamp_score(NEUTRAL + (opp as f64 - own as f64) * 2.0),
        _ => NEUTRAL,
    }
}

/// Poll position: #1 → 100, each spot below costs 3.
pub fn poll_ranking(ctx: &TeamContext<'_>) -> f64 {
    match ctx.team.ranking {
        Some(rank) => clamp_score(100.0 - (rank as f64 - 1.0) * 3.0),
        None => NEUTRAL,
    }
}

pub fn home_field(ctx: &TeamContext<'_>) -> f64 {
    match ctx.team.next_game_home {
        Some(true) => 75.0,
        Some(false) => 40.0,
        None => NEUTRAL,
    }
}

/// Availability factor for a free-text injury status.
/// Unknown designations count as available.
pub fn availability(status: Option<&str>) -> f64 {
    let Some(raw) = status else { return 1.0 };
    let s = normalize_status(raw);
    match s.as_str() {
        "" | "healthy" | "active" | "available" => 1.0,
        "probable" => 0.75,
        "questionable" | "day to day" | "dtd" | "game time decision" => 0.5,
        "doubtful" => 0.25,
        "out" | "injured" | "ir" | "injured reserve" | "suspended" | "inactive" | "pup" => 0.0,
        _ if s.starts_with("out") || s.contains("injured list") || s.starts_with("il") => 0.0,
        _ => 1.0,
    }
}

/// Whether a player counts as available in the roster summary.
pub fn is_available(p: &Player) -> bool {
    availability(p.injury_status.as_deref()) >= 0.5
}

fn player_weight(p: &Player) -> f64 {
    match p.skill_score {
        Some(s) if s.is_finite() => s.max(0.0),
        Some(_) => 0.0,
        None => 1.0,
    }
}

fn normalize_status(s: &str) -> String {
    let out = s.trim().to_ascii_lowercase().replace(['-', '_', '/'], " ");
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}
