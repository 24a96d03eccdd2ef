//! # Leverage
//! How much a team's next game matters, 0–100. Independent of readiness.
//!
//! Base 50, then fixed increments:
//!   - contention tier (exclusive, highest applicable only):
//!     top seed +20, inside the playoff line +15, wild-card race +10
//!   - rivalry +15, divisional +10
//!   - end of season: < 10 games left +15, < 5 left a further +10

use crate::model::Team;

const BASE: i32 = 50;
const TOP_SEED: i32 = 20;
const PLAYOFF_POSITION: i32 = 15;
const WILDCARD_RACE: i32 = 10;
const RIVALRY: i32 = 15;
const DIVISION: i32 = 10;
const LATE_SEASON: i32 = 15;
const FINAL_STRETCH: i32 = 10;

/// Games back at or under which a team counts as in the wild-card race.
pub const WILDCARD_GAMES_BACK_MAX: f64 = 3.0;

/// `playoff_line` is the last qualifying position for the team's sport.
pub fn leverage(team: &Team, playoff_line: i32) -> u8 {
    let mut lev = BASE + contention(team, playoff_line);

    if team.next_opponent_rival {
        lev += RIVALRY;
    }
    if team.next_opponent_division {
        lev += DIVISION;
    }
    if let Some(left) = team.games_remaining {
        if left < 10 {
            lev += LATE_SEASON;
        }
        if left < 5 {
            lev += FINAL_STRETCH;
        }
    }

    lev.clamp(0, 100) as u8
}

fn contention(team: &Team, playoff_line: i32) -> i32 {
    match team.playoff_position {
        Some(1) => return TOP_SEED,
        Some(p) if (1..=playoff_line).contains(&p) => return PLAYOFF_POSITION,
        _ => {}
    }
    match team.wildcard_games_back {
        Some(gb) if gb.is_finite() && gb <= WILDCARD_GAMES_BACK_MAX => WILDCARD_RACE,
        _ => 0,
    }
}
