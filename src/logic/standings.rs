//! Standings: league tables, cup bracket state, rankings and top scorers.
//!
//! Everything here is read-only and recomputed from match/goal history on
//! every call, so retroactive score corrections are always reflected.

use crate::error::GameError;
use crate::logic::cup::{resolve_tie, TieBreakRule};
use crate::models::{
    ChampionshipId, ChampionshipKind, CompetitionStatus, MatchId, TeamId, UserId,
};
use crate::store::GameStore;
use serde::Serialize;
use std::collections::HashMap;

/// One row of a league table.
#[derive(Clone, Debug, Serialize)]
pub struct LeagueStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

/// One two-legged tie in a cup bracket.
#[derive(Clone, Debug, Serialize)]
pub struct CupTie {
    pub match_number: u32,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub first_leg: (u32, u32),
    pub second_leg: (u32, u32),
    pub aggregate_team_a: u32,
    pub aggregate_team_b: u32,
    /// Present once both legs are finished.
    pub winner_id: Option<TeamId>,
    pub decided_by: Option<TieBreakRule>,
}

/// One phase of a cup bracket (quarter-finals, semi-finals, ...).
#[derive(Clone, Debug, Serialize)]
pub struct CupPhase {
    pub phase: u32,
    pub ties: Vec<CupTie>,
}

/// Standings for either championship kind.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Standings {
    League { table: Vec<LeagueStanding> },
    Cup { phases: Vec<CupPhase> },
}

/// Compute a championship's standings from its full finished-match history.
/// Pure with respect to the store; repeated calls yield identical output.
pub fn compute_standings(
    store: &GameStore,
    championship_id: ChampionshipId,
) -> Result<Standings, GameError> {
    let championship = store.championship(championship_id)?;
    match championship.kind {
        ChampionshipKind::League => Ok(Standings::League {
            table: league_table(store, championship_id)?,
        }),
        ChampionshipKind::Cup => Ok(Standings::Cup {
            phases: cup_bracket(store, championship_id)?,
        }),
    }
}

/// Aggregate all finished matches into the points table: win 3, draw 1.
/// Ordered by points, then goal difference, then goals for; further ties
/// keep the championship's team order (stable sort).
fn league_table(
    store: &GameStore,
    championship_id: ChampionshipId,
) -> Result<Vec<LeagueStanding>, GameError> {
    let championship = store.championship(championship_id)?;
    let finished: Vec<_> = store
        .matches
        .values()
        .filter(|m| {
            m.championship_id == championship_id && m.status == CompetitionStatus::Finished
        })
        .collect();

    let mut table = Vec::with_capacity(championship.team_ids.len());
    for &team_id in &championship.team_ids {
        let mut row = LeagueStanding {
            team_id,
            team_name: store.team(team_id)?.name.clone(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        };
        for m in &finished {
            let (scored, conceded) = if m.team_a_id == team_id {
                (m.score_team_a, m.score_team_b)
            } else if m.team_b_id == team_id {
                (m.score_team_b, m.score_team_a)
            } else {
                continue;
            };
            row.played += 1;
            row.goals_for += scored;
            row.goals_against += conceded;
            if scored > conceded {
                row.wins += 1;
                row.points += 3;
            } else if scored == conceded {
                row.draws += 1;
                row.points += 1;
            } else {
                row.losses += 1;
            }
        }
        row.goal_difference = i64::from(row.goals_for) - i64::from(row.goals_against);
        table.push(row);
    }

    table.sort_by(|a, b| {
        (b.points, b.goal_difference, b.goals_for).cmp(&(a.points, a.goal_difference, a.goals_for))
    });
    Ok(table)
}

/// The bracket as materialized so far: ties per phase with leg scores,
/// aggregates, and the winner once both legs are finished.
fn cup_bracket(
    store: &GameStore,
    championship_id: ChampionshipId,
) -> Result<Vec<CupPhase>, GameError> {
    let fallback = store.championship(championship_id)?.tie_break_fallback;
    let rounds = store.rounds_of(championship_id);

    let mut phases = Vec::with_capacity(rounds.len() / 2);
    for legs in rounds.chunks_exact(2) {
        let phase = (legs[1].number + 1) / 2;
        let leg1_matches = store.matches_of_round(legs[0].id);
        let leg2_matches = store.matches_of_round(legs[1].id);

        let mut ties = Vec::with_capacity(leg1_matches.len());
        for leg1 in &leg1_matches {
            let Some(leg2) = leg2_matches
                .iter()
                .find(|m| m.match_number == leg1.match_number)
            else {
                continue;
            };
            let aggregate_team_a = leg1.score_team_a + leg2.score_team_b;
            let aggregate_team_b = leg1.score_team_b + leg2.score_team_a;
            let decided = leg1.status == CompetitionStatus::Finished
                && leg2.status == CompetitionStatus::Finished;
            let (winner_id, decided_by) = if decided {
                let (winner, rule) = resolve_tie(leg1, leg2, fallback);
                (Some(winner), Some(rule))
            } else {
                (None, None)
            };
            ties.push(CupTie {
                match_number: leg1.match_number.unwrap_or(0),
                team_a_id: leg1.team_a_id,
                team_b_id: leg1.team_b_id,
                first_leg: (leg1.score_team_a, leg1.score_team_b),
                second_leg: (leg2.score_team_a, leg2.score_team_b),
                aggregate_team_a,
                aggregate_team_b,
                winner_id,
                decided_by,
            });
        }
        phases.push(CupPhase { phase, ties });
    }
    Ok(phases)
}

/// A row of the global player ranking.
#[derive(Clone, Debug, Serialize)]
pub struct RankingEntry {
    pub user_id: UserId,
    pub name: String,
    pub team_name: String,
    pub goals_current_round: u32,
    pub total_goals: u32,
}

/// Top players by current-round goals, lifetime goals breaking ties.
pub fn rankings(store: &GameStore, limit: usize) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = store
        .users
        .values()
        .map(|u| RankingEntry {
            user_id: u.id,
            name: u.name.clone(),
            team_name: store
                .teams
                .get(&u.team_defending_id)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            goals_current_round: u.goals_current_round,
            total_goals: u.total_goals,
        })
        .collect();
    entries.sort_by(|a, b| {
        (b.goals_current_round, b.total_goals, &a.name)
            .cmp(&(a.goals_current_round, a.total_goals, &b.name))
    });
    entries.truncate(limit);
    entries
}

/// A row of a per-match scorer ranking.
#[derive(Clone, Debug, Serialize)]
pub struct ScorerEntry {
    pub user_id: UserId,
    pub name: String,
    pub team_id: TeamId,
    pub goals: u32,
}

/// Scorer ranking for one match, derived from its goal events.
pub fn match_top_scorers(
    store: &GameStore,
    match_id: MatchId,
    limit: usize,
) -> Result<Vec<ScorerEntry>, GameError> {
    store.game_match(match_id)?;
    let mut per_user: HashMap<UserId, (TeamId, u32)> = HashMap::new();
    for goal in store.goals.iter().filter(|g| g.match_id == match_id) {
        let entry = per_user.entry(goal.user_id).or_insert((goal.team_id, 0));
        entry.1 += 1;
    }

    let mut scorers: Vec<ScorerEntry> = per_user
        .into_iter()
        .map(|(user_id, (team_id, goals))| ScorerEntry {
            user_id,
            name: store
                .users
                .get(&user_id)
                .map(|u| u.name.clone())
                .unwrap_or_default(),
            team_id,
            goals,
        })
        .collect();
    scorers.sort_by(|a, b| (b.goals, &a.name).cmp(&(a.goals, &b.name)));
    scorers.truncate(limit);
    Ok(scorers)
}
