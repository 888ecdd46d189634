//! Integration tests for shooting: cooldowns, eligibility, and the atomic
//! counter update.

use chrono::{DateTime, Duration, TimeZone, Utc};
use futebol_digital_web::{
    can_shoot, resolve_cooldown, shoot, Championship, ChampionshipKind, CompetitionStatus,
    GameError, GameMatch, GameStore, MatchId, Plan, Round, Team, TeamId, TieBreakFallback,
    UserId, UserStatus,
};
use std::sync::{Arc, RwLock};

fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Store with two clubs in an active match (3-2) and one registered user
/// defending the home side, clear to shoot at `kickoff()`.
fn store_with_active_match() -> (GameStore, UserId, TeamId, TeamId, MatchId) {
    let mut store = GameStore::new();
    let team_a = Team::new("Flamengo Digital", "#E53935", "#000000");
    let team_b = Team::new("Corinthians Virtual", "#212121", "#FFFFFF");
    let (a, b) = (team_a.id, team_b.id);
    store.teams.insert(a, team_a);
    store.teams.insert(b, team_b);

    let championship = Championship::new(
        "Campeonato Digital",
        ChampionshipKind::League,
        vec![a, b],
        kickoff() - Duration::hours(2),
        TieBreakFallback::FirstLegHome,
    );
    let championship_id = championship.id;
    store.championships.insert(championship_id, championship);

    let round = Round::new(
        championship_id,
        1,
        kickoff() - Duration::hours(2),
        kickoff() + Duration::hours(22),
    );
    let round_id = round.id;
    store.rounds.insert(round_id, round);
    let mut game_match = GameMatch::new(round_id, championship_id, a, b, None);
    game_match.score_team_a = 3;
    game_match.score_team_b = 2;
    let match_id = game_match.id;
    store.matches.insert(match_id, game_match);

    let user_id = store
        .register_user(
            "João Silva",
            "joao@demo.com",
            a,
            None,
            kickoff() - Duration::seconds(1),
        )
        .unwrap()
        .id;
    (store, user_id, a, b, match_id)
}

#[test]
fn resolve_cooldown_by_plan_and_boost() {
    let now = kickoff();
    assert_eq!(resolve_cooldown(Plan::Free, None, now), Duration::minutes(20));
    assert_eq!(resolve_cooldown(Plan::Monthly, None, now), Duration::minutes(10));
    assert_eq!(resolve_cooldown(Plan::Annual, None, now), Duration::minutes(10));

    let boost = Some(now + Duration::hours(1));
    assert_eq!(resolve_cooldown(Plan::Free, boost, now), Duration::minutes(5));
    assert_eq!(resolve_cooldown(Plan::Annual, boost, now), Duration::minutes(5));

    // An expired boost falls back to the plan interval.
    let expired = Some(now - Duration::seconds(1));
    assert_eq!(resolve_cooldown(Plan::Free, expired, now), Duration::minutes(20));
}

#[test]
fn free_plan_shot_scores_and_arms_twenty_minute_cooldown() {
    let (mut store, user_id, team_a, _, match_id) = store_with_active_match();
    let now = kickoff();

    let outcome = shoot(&mut store, user_id, match_id, now).unwrap();
    assert_eq!(outcome.total_goals, 1);
    assert_eq!(outcome.goals_current_round, 1);
    assert_eq!(outcome.cooldown_seconds, 1200);
    assert_eq!(outcome.next_allowed_shot_time, now + Duration::seconds(1200));
    assert_eq!(outcome.goal.team_id, team_a);

    let game_match = store.game_match(match_id).unwrap();
    assert_eq!(game_match.score_team_a, 4);
    assert_eq!(game_match.score_team_b, 2);

    let clearance = can_shoot(&store, user_id, now).unwrap();
    assert!(!clearance.can_shoot);
    assert_eq!(clearance.seconds_remaining, 1200);
}

#[test]
fn boost_overrides_plan_cooldown() {
    let (mut store, user_id, _, _, match_id) = store_with_active_match();
    let now = kickoff();
    {
        let user = store.user_mut(user_id).unwrap();
        user.plan = Plan::Monthly;
        user.boost_expires_at = Some(now + Duration::hours(24));
    }

    let outcome = shoot(&mut store, user_id, match_id, now).unwrap();
    assert_eq!(outcome.cooldown_seconds, 300);
}

#[test]
fn second_shot_during_cooldown_is_rejected() {
    let (mut store, user_id, _, _, match_id) = store_with_active_match();
    let now = kickoff();

    shoot(&mut store, user_id, match_id, now).unwrap();
    let err = shoot(&mut store, user_id, match_id, now + Duration::seconds(30)).unwrap_err();
    assert!(matches!(err, GameError::CooldownActive { seconds_remaining: 1170 }));

    // Counters unchanged by the rejected attempt.
    let user = store.user(user_id).unwrap();
    assert_eq!(user.total_goals, 1);
    assert_eq!(store.game_match(match_id).unwrap().score_team_a, 4);

    // After the cooldown elapses the next shot goes through.
    let outcome = shoot(&mut store, user_id, match_id, now + Duration::seconds(1200)).unwrap();
    assert_eq!(outcome.total_goals, 2);
}

#[test]
fn wrong_team_is_rejected() {
    let (mut store, user_id, _, _, match_id) = store_with_active_match();
    let team_c = Team::new("Palmeiras Cyber", "#2E7D32", "#FFFFFF");
    let c = team_c.id;
    store.teams.insert(c, team_c);
    store.user_mut(user_id).unwrap().team_defending_id = c;

    let err = shoot(&mut store, user_id, match_id, kickoff()).unwrap_err();
    assert!(matches!(err, GameError::TeamNotInMatch));
}

#[test]
fn match_outside_its_window_is_rejected() {
    let (mut store, user_id, _, _, match_id) = store_with_active_match();

    // Before the window opens the lazy refresh leaves the match scheduled.
    let before = kickoff() - Duration::hours(3);
    store.user_mut(user_id).unwrap().next_allowed_shot_time = before;
    let err = shoot(&mut store, user_id, match_id, before).unwrap_err();
    assert!(matches!(err, GameError::MatchNotActive(_)));

    // After the window closes the refresh finishes the round mid-call.
    let after = kickoff() + Duration::hours(23);
    let err = shoot(&mut store, user_id, match_id, after).unwrap_err();
    assert!(matches!(err, GameError::MatchNotActive(_)));
    let round_id = store.game_match(match_id).unwrap().round_id;
    assert_eq!(store.round(round_id).unwrap().status, CompetitionStatus::Finished);
}

#[test]
fn suspended_user_cannot_shoot() {
    let (mut store, user_id, _, _, match_id) = store_with_active_match();
    store.user_mut(user_id).unwrap().status = UserStatus::Suspended;

    let err = shoot(&mut store, user_id, match_id, kickoff()).unwrap_err();
    assert!(matches!(err, GameError::UserNotActive(_)));
}

#[test]
fn goal_events_feed_is_newest_first() {
    let (mut store, user_id, _, _, match_id) = store_with_active_match();
    let now = kickoff();

    shoot(&mut store, user_id, match_id, now).unwrap();
    store.user_mut(user_id).unwrap().next_allowed_shot_time = now + Duration::seconds(60);
    shoot(&mut store, user_id, match_id, now + Duration::seconds(60)).unwrap();

    let feed = store.goals_of_match(match_id, 5);
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].scored_at, now + Duration::seconds(60));
    assert_eq!(feed[1].scored_at, now);
}

#[test]
fn round_counter_never_exceeds_lifetime_total() {
    let (mut store, user_id, _, _, match_id) = store_with_active_match();
    let mut now = kickoff();

    for _ in 0..3 {
        shoot(&mut store, user_id, match_id, now).unwrap();
        let user = store.user(user_id).unwrap();
        assert!(user.goals_current_round <= user.total_goals);
        now = user.next_allowed_shot_time;
    }
}

#[test]
fn concurrent_shots_yield_exactly_one_success() {
    let (store, user_id, _, _, match_id) = store_with_active_match();
    let shared = Arc::new(RwLock::new(store));
    let now = kickoff();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                let mut g = shared.write().unwrap();
                shoot(&mut g, user_id, match_id, now).is_ok()
            })
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    let g = shared.read().unwrap();
    let user = g.user(user_id).unwrap();
    assert_eq!(user.total_goals, 1);
    assert_eq!(g.game_match(match_id).unwrap().score_team_a, 4);
}
