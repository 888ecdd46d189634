//! Integration tests for the round state machine: transitions, the admin
//! advance, window validation, and deletion guards.

use chrono::{DateTime, Duration, TimeZone, Utc};
use futebol_digital_web::{
    advance_round, create_championship, create_round, delete_championship, delete_round,
    refresh_round, shoot, sweep, update_championship_teams, update_round, ChampionshipId,
    ChampionshipKind, CompetitionStatus, GameError, GameStore, RoundId, Team, TeamId,
    TieBreakFallback,
};

fn opening_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()
}

fn store_with_league() -> (GameStore, Vec<TeamId>, ChampionshipId) {
    let mut store = GameStore::new();
    let mut teams = Vec::new();
    for i in 0..10 {
        let team = Team::new(format!("Clube {i}"), "#112233", "#FFFFFF");
        teams.push(team.id);
        store.teams.insert(team.id, team);
    }
    let id = create_championship(
        &mut store,
        "Liga Digital",
        ChampionshipKind::League,
        teams.clone(),
        opening_day(),
        TieBreakFallback::FirstLegHome,
    )
    .unwrap();
    (store, teams, id)
}

fn first_round(store: &GameStore, championship_id: ChampionshipId) -> RoundId {
    store.rounds_of(championship_id)[0].id
}

#[test]
fn transitions_follow_the_clock_and_are_idempotent() {
    let (mut store, _, id) = store_with_league();
    let round_id = first_round(&store, id);

    // Before the window: nothing happens.
    assert!(!refresh_round(&mut store, round_id, opening_day() - Duration::hours(1)).unwrap());
    assert_eq!(store.round(round_id).unwrap().status, CompetitionStatus::Scheduled);

    // Inside the window: scheduled -> active, matches mirror, championship opens.
    let mid = opening_day() + Duration::hours(1);
    assert!(refresh_round(&mut store, round_id, mid).unwrap());
    assert_eq!(store.round(round_id).unwrap().status, CompetitionStatus::Active);
    assert_eq!(store.matches_of_round(round_id)[0].status, CompetitionStatus::Active);
    assert_eq!(store.championship(id).unwrap().status, CompetitionStatus::Active);

    // Re-applying is a no-op.
    assert!(!refresh_round(&mut store, round_id, mid).unwrap());

    // Past the window: active -> finished, and finished stays finished.
    let late = opening_day() + Duration::hours(25);
    assert!(refresh_round(&mut store, round_id, late).unwrap());
    assert_eq!(store.round(round_id).unwrap().status, CompetitionStatus::Finished);
    assert!(!refresh_round(&mut store, round_id, late).unwrap());
    assert_eq!(store.championship(id).unwrap().current_round, 2);
}

#[test]
fn skipping_straight_past_the_window_finishes_in_one_refresh() {
    let (mut store, _, id) = store_with_league();
    let round_id = first_round(&store, id);

    refresh_round(&mut store, round_id, opening_day() + Duration::hours(30)).unwrap();
    assert_eq!(store.round(round_id).unwrap().status, CompetitionStatus::Finished);
}

#[test]
fn advance_finishes_an_active_round_early() {
    let (mut store, _, id) = store_with_league();
    let round_id = first_round(&store, id);

    // A scheduled round cannot be advanced.
    let err = advance_round(&mut store, round_id, opening_day() - Duration::hours(1)).unwrap_err();
    assert!(matches!(err, GameError::RoundNotActive(_)));

    let mid = opening_day() + Duration::hours(1);
    refresh_round(&mut store, round_id, mid).unwrap();
    advance_round(&mut store, round_id, mid).unwrap();
    assert_eq!(store.round(round_id).unwrap().status, CompetitionStatus::Finished);

    // Advancing again is rejected rather than silently repeated.
    let err = advance_round(&mut store, round_id, mid).unwrap_err();
    assert!(matches!(err, GameError::RoundNotActive(_)));
}

#[test]
fn finishing_a_round_resets_its_players_round_counters() {
    let (mut store, _, id) = store_with_league();
    let round_id = first_round(&store, id);
    let game_match = store.matches_of_round(round_id)[0].clone();

    let mid = opening_day() + Duration::hours(1);
    let user_id = store
        .register_user("Maria Santos", "maria@demo.com", game_match.team_a_id, None, mid)
        .unwrap()
        .id;
    shoot(&mut store, user_id, game_match.id, mid).unwrap();
    assert_eq!(store.user(user_id).unwrap().goals_current_round, 1);

    advance_round(&mut store, round_id, mid + Duration::minutes(1)).unwrap();
    let user = store.user(user_id).unwrap();
    assert_eq!(user.goals_current_round, 0);
    assert_eq!(user.total_goals, 1);
}

#[test]
fn overlapping_windows_are_rejected() {
    let (mut store, teams, id) = store_with_league();

    // The generated schedule occupies [opening_day, +45 days); anything
    // inside collides, touching windows do not.
    let inside = opening_day() + Duration::hours(12);
    let err = create_round(
        &mut store,
        id,
        teams[0],
        teams[1],
        inside,
        inside + Duration::hours(24),
    )
    .unwrap_err();
    assert!(matches!(err, GameError::OverlappingRound { .. }));

    let after = opening_day() + Duration::hours(24 * 45);
    let round_id = create_round(
        &mut store,
        id,
        teams[0],
        teams[1],
        after,
        after + Duration::hours(24),
    )
    .unwrap();
    assert_eq!(store.round(round_id).unwrap().number, 46);

    // Rescheduling into an occupied window fails too; nothing moves.
    let err = update_round(&mut store, round_id, inside, inside + Duration::hours(24)).unwrap_err();
    assert!(matches!(err, GameError::OverlappingRound { .. }));
    assert_eq!(store.round(round_id).unwrap().start_time, after);

    // A window that ends before it starts never passes.
    let err = update_round(&mut store, round_id, after, after - Duration::hours(1)).unwrap_err();
    assert!(matches!(err, GameError::InvalidTimeWindow));

    // The same window in a different championship is fine.
    let mut other_teams = Vec::new();
    for i in 0..10 {
        let team = Team::new(format!("Rival {i}"), "#445566", "#FFFFFF");
        other_teams.push(team.id);
        store.teams.insert(team.id, team);
    }
    let other = create_championship(
        &mut store,
        "Liga Paralela",
        ChampionshipKind::League,
        other_teams.clone(),
        opening_day(),
        TieBreakFallback::FirstLegHome,
    )
    .unwrap();
    assert_ne!(other, id);
}

#[test]
fn deletion_guards_block_active_rounds() {
    let (mut store, _, id) = store_with_league();
    let round_id = first_round(&store, id);
    let mid = opening_day() + Duration::hours(1);
    refresh_round(&mut store, round_id, mid).unwrap();

    let err = delete_round(&mut store, round_id).unwrap_err();
    assert!(matches!(err, GameError::RoundHasActiveMatch(_)));
    let err = delete_championship(&mut store, id).unwrap_err();
    assert!(matches!(err, GameError::ChampionshipHasActiveRound(_)));

    // Once finished, deletion goes through and cascades matches and goals.
    advance_round(&mut store, round_id, mid).unwrap();
    delete_round(&mut store, round_id).unwrap();
    assert!(store.round(round_id).is_err());
    assert!(store.matches.values().all(|m| m.round_id != round_id));

    delete_championship(&mut store, id).unwrap();
    assert!(store.championship(id).is_err());
    assert!(store.rounds.is_empty());
    assert!(store.matches.is_empty());
}

#[test]
fn replacing_teams_regenerates_the_schedule() {
    let (mut store, teams, id) = store_with_league();
    let old_round_ids: Vec<RoundId> = store.rounds_of(id).iter().map(|r| r.id).collect();

    // An invalid replacement leaves the old schedule untouched.
    let err = update_championship_teams(&mut store, id, teams[..4].to_vec()).unwrap_err();
    assert!(matches!(err, GameError::InvalidTeamCount { got: 4, .. }));
    assert_eq!(store.rounds_of(id).len(), 45);

    let mut replacements = Vec::new();
    for i in 0..10 {
        let team = Team::new(format!("Novo Clube {i}"), "#667788", "#FFFFFF");
        replacements.push(team.id);
        store.teams.insert(team.id, team);
    }
    update_championship_teams(&mut store, id, replacements.clone()).unwrap();

    let championship = store.championship(id).unwrap();
    assert_eq!(championship.team_ids, replacements);
    assert_eq!(championship.status, CompetitionStatus::Scheduled);
    let rounds = store.rounds_of(id);
    assert_eq!(rounds.len(), 45);
    assert!(rounds.iter().all(|r| !old_round_ids.contains(&r.id)));

    // Regeneration is blocked while a round is active.
    sweep(&mut store, opening_day() + Duration::hours(1));
    let err = update_championship_teams(&mut store, id, replacements).unwrap_err();
    assert!(matches!(err, GameError::ChampionshipHasActiveRound(_)));
}
