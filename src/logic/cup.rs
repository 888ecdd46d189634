//! Cup brackets: two-legged ties, phase-by-phase materialization, and
//! aggregate / away-goals / fallback resolution.
//!
//! Only the first phase is generated with the championship; each later
//! phase exists once the previous phase's winners are known.

use crate::error::GameError;
use crate::logic::league::ROUND_DURATION_HOURS;
use crate::models::{
    Championship, ChampionshipId, ChampionshipKind, CompetitionStatus, GameMatch, Round, TeamId,
    TieBreakFallback,
};
use crate::store::GameStore;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Rule that decided a tie, reported in the bracket view.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakRule {
    Aggregate,
    AwayGoals,
    Fallback,
}

/// Cup rounds come in leg pairs: 2·log2(N) in total.
pub fn total_rounds(team_count: usize) -> u32 {
    2 * (team_count as u32).ilog2()
}

/// Generate phase one: teams paired in bracket order ((1,2), (3,4), …),
/// one leg-1 round and one mirrored leg-2 round, 24 hours each.
pub fn generate_first_phase(
    championship: &Championship,
) -> Result<(Vec<Round>, Vec<GameMatch>), GameError> {
    let teams = &championship.team_ids;
    if teams.len() != 8 && teams.len() != 16 {
        return Err(GameError::InvalidTeamCount {
            kind: ChampionshipKind::Cup,
            got: teams.len(),
        });
    }
    let pairs: Vec<(TeamId, TeamId)> = teams.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    Ok(build_phase(championship.id, &pairs, 1, championship.start_date, 1))
}

/// Build the two leg rounds for one phase. Both legs of tie `k` share the
/// match number `first_match_number + k`; the second leg mirrors home/away.
fn build_phase(
    championship_id: ChampionshipId,
    pairs: &[(TeamId, TeamId)],
    first_round_number: u32,
    start: DateTime<Utc>,
    first_match_number: u32,
) -> (Vec<Round>, Vec<GameMatch>) {
    let leg_duration = Duration::hours(ROUND_DURATION_HOURS);
    let first_leg = Round::new(championship_id, first_round_number, start, start + leg_duration);
    let second_leg = Round::new(
        championship_id,
        first_round_number + 1,
        start + leg_duration,
        start + leg_duration * 2,
    );

    let mut matches = Vec::with_capacity(pairs.len() * 2);
    for (k, &(team_a, team_b)) in pairs.iter().enumerate() {
        let number = Some(first_match_number + k as u32);
        matches.push(GameMatch::new(first_leg.id, championship_id, team_a, team_b, number));
        matches.push(GameMatch::new(second_leg.id, championship_id, team_b, team_a, number));
    }
    (vec![first_leg, second_leg], matches)
}

/// Resolve a finished two-legged tie. `leg1.team_a` is the nominal home
/// side of the tie. Higher aggregate wins; then away goals; then the
/// championship's configured fallback.
pub fn resolve_tie(
    leg1: &GameMatch,
    leg2: &GameMatch,
    fallback: TieBreakFallback,
) -> (TeamId, TieBreakRule) {
    let team_a = leg1.team_a_id;
    let team_b = leg1.team_b_id;
    let aggregate_a = leg1.score_team_a + leg2.score_team_b;
    let aggregate_b = leg1.score_team_b + leg2.score_team_a;
    if aggregate_a != aggregate_b {
        let winner = if aggregate_a > aggregate_b { team_a } else { team_b };
        return (winner, TieBreakRule::Aggregate);
    }

    // Away goals: team A visits in leg 2, team B in leg 1.
    let away_a = leg2.score_team_b;
    let away_b = leg1.score_team_b;
    if away_a != away_b {
        let winner = if away_a > away_b { team_a } else { team_b };
        return (winner, TieBreakRule::AwayGoals);
    }

    let winner = match fallback {
        TieBreakFallback::FirstLegHome => team_a,
        TieBreakFallback::SecondLegHome => team_b,
    };
    (winner, TieBreakRule::Fallback)
}

/// Called when a cup round finishes: once both legs of the newest phase are
/// finished, resolve its ties and either crown the champion (single tie) or
/// materialize the next phase, paired in bracket order of the winners.
pub fn maybe_advance_phase(
    store: &mut GameStore,
    championship_id: ChampionshipId,
    now: DateTime<Utc>,
) -> Result<(), GameError> {
    let championship = store.championship(championship_id)?;
    if championship.kind != ChampionshipKind::Cup {
        return Err(GameError::NotACup(championship_id));
    }
    let fallback = championship.tie_break_fallback;

    // Legs pair up as (1,2), (3,4), …; generation always adds them together.
    let rounds = store.rounds_of(championship_id);
    if rounds.len() < 2 {
        return Ok(());
    }
    let leg2_round = rounds[rounds.len() - 1];
    let leg1_round = rounds[rounds.len() - 2];
    if leg1_round.status != CompetitionStatus::Finished
        || leg2_round.status != CompetitionStatus::Finished
    {
        return Ok(());
    }
    let (leg1_id, leg2_id) = (leg1_round.id, leg2_round.id);
    let next_round_number = leg2_round.number + 1;
    let next_start = if now > leg2_round.end_time {
        now
    } else {
        leg2_round.end_time
    };

    let leg1_matches = store.matches_of_round(leg1_id);
    let leg2_matches = store.matches_of_round(leg2_id);
    let mut winners: Vec<TeamId> = Vec::with_capacity(leg1_matches.len());
    for leg1 in &leg1_matches {
        let leg2 = leg2_matches
            .iter()
            .find(|m| m.match_number == leg1.match_number)
            .ok_or(GameError::PhaseNotComplete {
                phase: (next_round_number - 1) / 2,
            })?;
        let (winner, _) = resolve_tie(leg1, leg2, fallback);
        winners.push(winner);
    }

    if winners.len() == 1 {
        let championship = store.championship_mut(championship_id)?;
        championship.champion_id = Some(winners[0]);
        return Ok(());
    }

    let next_match_number = store
        .matches
        .values()
        .filter(|m| m.championship_id == championship_id)
        .filter_map(|m| m.match_number)
        .max()
        .unwrap_or(0)
        + 1;
    let pairs: Vec<(TeamId, TeamId)> = winners.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    let (rounds, matches) = build_phase(
        championship_id,
        &pairs,
        next_round_number,
        next_start,
        next_match_number,
    );
    for round in rounds {
        store.rounds.insert(round.id, round);
    }
    for game_match in matches {
        store.matches.insert(game_match.id, game_match);
    }
    Ok(())
}
