//! The shot transaction: eligibility checks plus the atomic counter update.
//!
//! `shoot` is the only mutation path for goal counters. Callers hold the
//! store's write lock for the whole call, so the cooldown check and the
//! update cannot interleave with a concurrent shot for the same user.

use crate::error::GameError;
use crate::logic::cooldown::resolve_cooldown;
use crate::logic::lifecycle;
use crate::models::{CompetitionStatus, Goal, MatchId, TeamId, UserId, UserStatus};
use crate::store::GameStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a successful shot.
#[derive(Clone, Debug, Serialize)]
pub struct ShotOutcome {
    pub goal: Goal,
    pub total_goals: u32,
    pub goals_current_round: u32,
    /// The interval that was applied, in whole seconds.
    pub cooldown_seconds: i64,
    pub next_allowed_shot_time: DateTime<Utc>,
}

/// Take a shot at the given match.
///
/// Checks, in order: the user account is active, the match is active (after
/// a lazy status refresh against `now`), the user's defended team plays in
/// it, and the cooldown has elapsed. On success the round and lifetime
/// counters, the match score, the cooldown clock, and the goal log are all
/// updated in this one call.
pub fn shoot(
    store: &mut GameStore,
    user_id: UserId,
    match_id: MatchId,
    now: DateTime<Utc>,
) -> Result<ShotOutcome, GameError> {
    let user = store.user(user_id)?;
    if user.status != UserStatus::Active {
        return Err(GameError::UserNotActive(user_id));
    }
    let team_id = user.team_defending_id;
    let plan = user.plan;
    let boost_expires_at = user.boost_expires_at;
    let next_allowed = user.next_allowed_shot_time;

    // The round may have entered or left its window since the last write.
    let round_id = store.game_match(match_id)?.round_id;
    lifecycle::refresh_round(store, round_id, now)?;

    let game_match = store.game_match(match_id)?;
    if game_match.status != CompetitionStatus::Active {
        return Err(GameError::MatchNotActive(match_id));
    }
    if !game_match.involves(team_id) {
        return Err(GameError::TeamNotInMatch);
    }
    if now < next_allowed {
        let seconds_remaining = (next_allowed - now).num_seconds().max(1);
        return Err(GameError::CooldownActive { seconds_remaining });
    }

    let cooldown = resolve_cooldown(plan, boost_expires_at, now);
    let next_allowed_shot_time = now + cooldown;

    store.game_match_mut(match_id)?.add_goal_for(team_id);
    let user = store.user_mut(user_id)?;
    user.record_goal(next_allowed_shot_time);
    let (total_goals, goals_current_round) = (user.total_goals, user.goals_current_round);

    let goal = Goal::new(match_id, user_id, team_id, now);
    store.goals.push(goal.clone());

    Ok(ShotOutcome {
        goal,
        total_goals,
        goals_current_round,
        cooldown_seconds: cooldown.num_seconds(),
        next_allowed_shot_time,
    })
}

/// The active match the given team is currently playing, refreshing round
/// statuses first. `NoActiveMatch` when the team is idle.
pub fn active_match_for_team(
    store: &mut GameStore,
    team_id: TeamId,
    now: DateTime<Utc>,
) -> Result<MatchId, GameError> {
    lifecycle::sweep(store, now);
    store
        .matches
        .values()
        .find(|m| m.status == CompetitionStatus::Active && m.involves(team_id))
        .map(|m| m.id)
        .ok_or(GameError::NoActiveMatch)
}
