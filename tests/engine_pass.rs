// tests/engine_pass.rs
//
// Full passes over the fixture dataset through the public library surface.

use chrono::{TimeZone, Utc};
use readiness_engine::alerts::AlertKind;
use readiness_engine::dashboard;
use readiness_engine::history::{HistorySnapshot, DEFAULT_CAPACITY};
use readiness_engine::{
    evaluate, run_cycle, Dataset, HistoryStore, InMemoryHistory, SportRegistry, Status, Trend,
};

fn fixture() -> Dataset {
    readiness_engine::dataset::parse(include_bytes!("fixtures/dataset.json"))
        .expect("fixture dataset should parse")
}

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
}

#[test]
fn fixture_pass_groups_scores_and_features() {
    let ds = fixture();
    let h = InMemoryHistory::default();
    let b = evaluate(&ds, &SportRegistry::builtin(), &h, t0());

    let sports: Vec<&str> = b.sports.keys().map(String::as_str).collect();
    assert_eq!(sports, vec!["cricket", "mlb", "nba", "ncaaf", "nfl"]);

    let mlb = &b.sports["mlb"];
    assert_eq!(mlb.teams[0].team_name, "Dodgers");
    assert_eq!(mlb.teams[0].score, 86);
    assert_eq!(mlb.teams[0].status, Status::Green);
    assert_eq!(mlb.teams[0].leverage, 100);
    assert_eq!(mlb.teams[1].score, 13);
    assert_eq!(mlb.teams[1].status, Status::Red);
    assert_eq!(mlb.teams[1].leverage, 60);
    assert!((mlb.average_readiness - 49.5).abs() < 1e-9);

    // unknown sport is scored with the baseball profile, all neutral
    let cricket = &b.sports["cricket"].teams[0];
    assert_eq!(cricket.score, 50);
    assert!(cricket.components.get("standing_strength").is_some());

    let featured: Vec<&str> = b.featured.iter().map(|f| f.team.as_str()).collect();
    assert_eq!(featured, vec!["Celtics", "Dodgers", "Georgia", "Chiefs"]);
    assert!(b.featured.iter().all(|f| f.headline.contains("primed")));
    assert_eq!(b.featured[1].opponent, "Giants");

    // three straight wins is momentum 60, not a perfect run
    let georgia = &b.sports["ncaaf"].teams[0];
    assert_eq!(georgia.components.get("momentum"), Some(60.0));
    assert_eq!(georgia.score, 83);

    assert_eq!(b.alerts.len(), 1);
    assert_eq!(b.alerts[0].kind, AlertKind::Critical);
    assert_eq!(b.alerts[0].team, "Jets");
    assert_eq!(b.alerts[0].metrics.readiness, 13);
}

#[test]
fn declining_history_raises_a_warning() {
    let ds = fixture();
    let mut snap = HistorySnapshot::new();
    snap.insert("col".into(), vec![90.0, 90.0, 90.0, 60.0, 60.0, 60.0]);
    let h = InMemoryHistory::from_snapshot(snap, DEFAULT_CAPACITY);

    let b = evaluate(&ds, &SportRegistry::builtin(), &h, t0());
    let rockies = b.sports["mlb"].teams.iter().find(|t| t.team_id == "col").unwrap();
    assert_eq!(rockies.trend, Trend::Declining);

    let warnings: Vec<_> = b
        .alerts
        .iter()
        .filter(|a| a.kind == AlertKind::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].team, "Rockies");
}

#[test]
fn same_input_and_history_give_identical_alerts() {
    let ds = fixture();
    let reg = SportRegistry::builtin();
    let h = InMemoryHistory::default();
    for _ in 0..4 {
        run_cycle(&ds, &reg, &h, t0());
    }
    let a = serde_json::to_vec(&evaluate(&ds, &reg, &h, t0()).alerts).unwrap();
    let b = serde_json::to_vec(&evaluate(&ds, &reg, &h, t0()).alerts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn history_stays_bounded_over_many_cycles() {
    let ds = fixture();
    let reg = SportRegistry::builtin();
    let h = InMemoryHistory::default();
    for _ in 0..75 {
        run_cycle(&ds, &reg, &h, t0());
    }
    for t in &ds.teams {
        assert_eq!(h.get(&t.id).len(), DEFAULT_CAPACITY, "{}", t.id);
    }
}

#[test]
fn steady_input_stays_stable() {
    let ds = fixture();
    let reg = SportRegistry::builtin();
    let h = InMemoryHistory::default();
    let mut last = None;
    for _ in 0..7 {
        last = Some(run_cycle(&ds, &reg, &h, t0()));
    }
    let b = last.unwrap();
    assert!(b.all_teams().all(|t| t.trend == Trend::Stable));
}

#[test]
fn dashboards_cover_every_team() {
    let ds = fixture();
    let h = InMemoryHistory::default();
    let b = evaluate(&ds, &SportRegistry::builtin(), &h, t0());
    let dash = dashboard::build(&b.sports);
    assert_eq!(dash.len(), ds.teams.len());

    let jets = dash.iter().find(|d| d.readiness.team_id == "nyj").unwrap();
    assert_eq!(jets.sport_team_count, 2);
    assert_eq!(jets.percentile, 0);
    let weak: Vec<&str> = jets.actions.iter().map(|a| a.component.as_str()).collect();
    assert!(weak.contains(&"recent_performance"));
    assert!(weak.contains(&"matchup_edge"));
    assert!(jets
        .actions
        .iter()
        .all(|a| a.severity == AlertKind::Critical || a.score >= 25.0));

    let chiefs = dash.iter().find(|d| d.readiness.team_id == "kc").unwrap();
    assert_eq!(chiefs.percentile, 50);
    assert!(chiefs.actions.is_empty());
}
