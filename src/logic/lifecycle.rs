//! Round and championship lifecycle: clock-driven status transitions, the
//! admin advance, manual fixture management, and deletion guards.
//!
//! All transitions are idempotent; re-applying one that already happened is
//! a no-op, so the lazy refresh in the shot path and the periodic sweep can
//! run concurrently with each other.

use crate::error::GameError;
use crate::logic::{cup, league};
use crate::models::{
    Championship, ChampionshipId, ChampionshipKind, CompetitionStatus, GameMatch, Round, RoundId,
    MatchId, TeamId, TieBreakFallback,
};
use crate::store::GameStore;
use chrono::{DateTime, Utc};

/// Create a championship and generate its schedule in one transaction.
/// Team counts are validated before anything is written.
pub fn create_championship(
    store: &mut GameStore,
    name: &str,
    kind: ChampionshipKind,
    team_ids: Vec<TeamId>,
    start_date: DateTime<Utc>,
    tie_break_fallback: TieBreakFallback,
) -> Result<ChampionshipId, GameError> {
    for &team_id in &team_ids {
        store.team(team_id)?;
    }
    let mut seen = std::collections::HashSet::new();
    if !team_ids.iter().all(|id| seen.insert(*id)) {
        return Err(GameError::SameTeamTwice);
    }

    let mut championship = Championship::new(name, kind, team_ids, start_date, tie_break_fallback);
    let (rounds, matches) = match kind {
        ChampionshipKind::League => league::generate_schedule(&championship)?,
        ChampionshipKind::Cup => cup::generate_first_phase(&championship)?,
    };
    championship.total_rounds = match kind {
        ChampionshipKind::League => rounds.len() as u32,
        ChampionshipKind::Cup => cup::total_rounds(championship.team_ids.len()),
    };

    let id = championship.id;
    store.championships.insert(id, championship);
    for round in rounds {
        store.rounds.insert(round.id, round);
    }
    for game_match in matches {
        store.matches.insert(game_match.id, game_match);
    }
    Ok(id)
}

/// Replace a championship's team set and regenerate its whole schedule.
/// Rejected while a round is active; existing rounds, matches and goals are
/// dropped and rebuilt from the championship's start date.
pub fn update_championship_teams(
    store: &mut GameStore,
    championship_id: ChampionshipId,
    team_ids: Vec<TeamId>,
) -> Result<(), GameError> {
    store.championship(championship_id)?;
    if store
        .rounds
        .values()
        .any(|r| r.championship_id == championship_id && r.status == CompetitionStatus::Active)
    {
        return Err(GameError::ChampionshipHasActiveRound(championship_id));
    }
    for &team_id in &team_ids {
        store.team(team_id)?;
    }
    let mut seen = std::collections::HashSet::new();
    if !team_ids.iter().all(|id| seen.insert(*id)) {
        return Err(GameError::SameTeamTwice);
    }

    // Generate against a working copy first; the old schedule is only
    // dropped once the replacement is known to be valid.
    let mut updated = store.championship(championship_id)?.clone();
    updated.team_ids = team_ids;
    updated.status = CompetitionStatus::Scheduled;
    updated.current_round = 1;
    updated.champion_id = None;
    let (rounds, matches) = match updated.kind {
        ChampionshipKind::League => league::generate_schedule(&updated)?,
        ChampionshipKind::Cup => cup::generate_first_phase(&updated)?,
    };
    updated.total_rounds = match updated.kind {
        ChampionshipKind::League => rounds.len() as u32,
        ChampionshipKind::Cup => cup::total_rounds(updated.team_ids.len()),
    };

    store.remove_schedule(championship_id);
    store.championships.insert(championship_id, updated);
    for round in rounds {
        store.rounds.insert(round.id, round);
    }
    for game_match in matches {
        store.matches.insert(game_match.id, game_match);
    }
    Ok(())
}

/// Delete a championship and everything under it. Guarded: no active round.
pub fn delete_championship(
    store: &mut GameStore,
    championship_id: ChampionshipId,
) -> Result<(), GameError> {
    store.championship(championship_id)?;
    if store
        .rounds
        .values()
        .any(|r| r.championship_id == championship_id && r.status == CompetitionStatus::Active)
    {
        return Err(GameError::ChampionshipHasActiveRound(championship_id));
    }
    store.remove_schedule(championship_id);
    store.championships.remove(&championship_id);
    Ok(())
}

/// Apply any transitions the clock makes due for one round. Idempotent;
/// returns whether a transition happened.
pub fn refresh_round(
    store: &mut GameStore,
    round_id: RoundId,
    now: DateTime<Utc>,
) -> Result<bool, GameError> {
    let round = store.round(round_id)?;
    let (start, end, status, championship_id) =
        (round.start_time, round.end_time, round.status, round.championship_id);

    let mut changed = false;
    if status == CompetitionStatus::Scheduled && now >= start {
        set_round_status(store, round_id, CompetitionStatus::Active);
        recompute_progress(store, championship_id)?;
        changed = true;
    }
    let status = store.round(round_id)?.status;
    if status == CompetitionStatus::Active && now >= end {
        finish_round(store, round_id, now)?;
        changed = true;
    }
    Ok(changed)
}

/// Refresh every round; returns how many transitions were applied. Safe to
/// run from the periodic background task and from request paths alike.
pub fn sweep(store: &mut GameStore, now: DateTime<Utc>) -> usize {
    let mut round_ids: Vec<(u32, RoundId)> =
        store.rounds.values().map(|r| (r.number, r.id)).collect();
    round_ids.sort();
    let mut transitions = 0;
    for (_, round_id) in round_ids {
        // Rounds cannot disappear mid-sweep; the lock is held throughout.
        if let Ok(true) = refresh_round(store, round_id, now) {
            transitions += 1;
        }
    }
    transitions
}

/// Explicit administrative advance: finish an active round before its
/// window closes. Scheduled rounds cannot be advanced.
pub fn advance_round(store: &mut GameStore, round_id: RoundId, now: DateTime<Utc>) -> Result<(), GameError> {
    let round = store.round(round_id)?;
    if round.status != CompetitionStatus::Active {
        return Err(GameError::RoundNotActive(round_id));
    }
    finish_round(store, round_id, now)
}

/// Manually add a round with a single fixture (admin tooling). The window
/// must not overlap any other round of the same championship.
pub fn create_round(
    store: &mut GameStore,
    championship_id: ChampionshipId,
    team_a_id: TeamId,
    team_b_id: TeamId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<RoundId, GameError> {
    store.championship(championship_id)?;
    store.team(team_a_id)?;
    store.team(team_b_id)?;
    if team_a_id == team_b_id {
        return Err(GameError::SameTeamTwice);
    }
    check_window(store, championship_id, start_time, end_time, None)?;

    let number = store
        .rounds
        .values()
        .filter(|r| r.championship_id == championship_id)
        .map(|r| r.number)
        .max()
        .unwrap_or(0)
        + 1;
    let round = Round::new(championship_id, number, start_time, end_time);
    let round_id = round.id;
    let game_match = GameMatch::new(round_id, championship_id, team_a_id, team_b_id, None);
    store.rounds.insert(round_id, round);
    store.matches.insert(game_match.id, game_match);
    Ok(round_id)
}

/// Reschedule a round. Finished rounds are immutable; the new window is
/// validated against every other round of the championship.
pub fn update_round(
    store: &mut GameStore,
    round_id: RoundId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<(), GameError> {
    let round = store.round(round_id)?;
    if round.status == CompetitionStatus::Finished {
        return Err(GameError::RoundAlreadyFinished(round_id));
    }
    let championship_id = round.championship_id;
    check_window(store, championship_id, start_time, end_time, Some(round_id))?;
    let round = store.round_mut(round_id)?;
    round.start_time = start_time;
    round.end_time = end_time;
    Ok(())
}

/// Delete a round and its matches/goals. Guarded: no active match.
pub fn delete_round(store: &mut GameStore, round_id: RoundId) -> Result<(), GameError> {
    let championship_id = store.round(round_id)?.championship_id;
    if store.round_has_active_match(round_id) {
        return Err(GameError::RoundHasActiveMatch(round_id));
    }
    let match_ids: Vec<MatchId> = store
        .matches
        .values()
        .filter(|m| m.round_id == round_id)
        .map(|m| m.id)
        .collect();
    store.goals.retain(|g| !match_ids.contains(&g.match_id));
    store.matches.retain(|_, m| m.round_id != round_id);
    store.rounds.remove(&round_id);
    recompute_progress(store, championship_id)
}

/// Retroactive score correction (admin). Standings are recomputed from
/// match history on every read, so this is safe at any point.
pub fn set_match_score(
    store: &mut GameStore,
    match_id: MatchId,
    score_team_a: u32,
    score_team_b: u32,
) -> Result<(), GameError> {
    let game_match = store.game_match_mut(match_id)?;
    game_match.score_team_a = score_team_a;
    game_match.score_team_b = score_team_b;
    Ok(())
}

// --- internals -------------------------------------------------------------

/// `end > start` and no overlap with other rounds of the same championship.
fn check_window(
    store: &GameStore,
    championship_id: ChampionshipId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude: Option<RoundId>,
) -> Result<(), GameError> {
    if end_time <= start_time {
        return Err(GameError::InvalidTimeWindow);
    }
    let clash = store
        .rounds
        .values()
        .filter(|r| r.championship_id == championship_id && Some(r.id) != exclude)
        .find(|r| r.overlaps(start_time, end_time));
    match clash {
        Some(round) => Err(GameError::OverlappingRound { round_id: round.id }),
        None => Ok(()),
    }
}

fn set_round_status(store: &mut GameStore, round_id: RoundId, status: CompetitionStatus) {
    if let Some(round) = store.rounds.get_mut(&round_id) {
        round.status = status;
    }
    for game_match in store.matches.values_mut() {
        if game_match.round_id == round_id {
            game_match.status = status;
        }
    }
}

/// Finish a round: freeze its matches, reset the per-round counters of the
/// users who played it, let cups resolve/advance their phase, and update
/// the championship's pointer and status.
fn finish_round(store: &mut GameStore, round_id: RoundId, now: DateTime<Utc>) -> Result<(), GameError> {
    set_round_status(store, round_id, CompetitionStatus::Finished);

    let teams_played: Vec<TeamId> = store
        .matches
        .values()
        .filter(|m| m.round_id == round_id)
        .flat_map(|m| [m.team_a_id, m.team_b_id])
        .collect();
    for user in store.users.values_mut() {
        if teams_played.contains(&user.team_defending_id) {
            user.reset_round_goals();
        }
    }

    let championship_id = store.round(round_id)?.championship_id;
    if store.championship(championship_id)?.kind == ChampionshipKind::Cup {
        cup::maybe_advance_phase(store, championship_id, now)?;
    }
    recompute_progress(store, championship_id)
}

/// Recompute `current_round` and the championship status from its rounds.
/// Idempotent; cheap enough to run after every transition.
fn recompute_progress(store: &mut GameStore, championship_id: ChampionshipId) -> Result<(), GameError> {
    let rounds: Vec<(u32, CompetitionStatus)> = store
        .rounds
        .values()
        .filter(|r| r.championship_id == championship_id)
        .map(|r| (r.number, r.status))
        .collect();
    let lowest_unfinished = rounds
        .iter()
        .filter(|(_, s)| *s != CompetitionStatus::Finished)
        .map(|(n, _)| *n)
        .min();
    let last = rounds.iter().map(|(n, _)| *n).max().unwrap_or(0);
    let underway = rounds
        .iter()
        .any(|(_, s)| *s != CompetitionStatus::Scheduled);

    let championship = store.championship_mut(championship_id)?;
    match lowest_unfinished {
        Some(number) => {
            championship.current_round = number;
            if underway {
                championship.status = CompetitionStatus::Active;
            }
        }
        None => {
            championship.current_round = last.max(1);
            championship.status = CompetitionStatus::Finished;
        }
    }
    Ok(())
}
