//! League schedule generation: a full round-robin, one fixture per round.

use crate::error::GameError;
use crate::models::{Championship, ChampionshipKind, GameMatch, Round, TeamId};
use chrono::Duration;
use rand::seq::SliceRandom;

/// Every round occupies a fixed 24-hour window.
pub const ROUND_DURATION_HOURS: i64 = 24;

/// Generate the complete round-robin for a league: one round per unordered
/// pair of teams (N·(N−1)/2 rounds), each containing exactly one match,
/// scheduled back-to-back from the start date. Fixture order is shuffled so
/// the calendar does not follow draw order.
pub fn generate_schedule(
    championship: &Championship,
) -> Result<(Vec<Round>, Vec<GameMatch>), GameError> {
    let teams = &championship.team_ids;
    if teams.len() != 10 && teams.len() != 20 {
        return Err(GameError::InvalidTeamCount {
            kind: ChampionshipKind::League,
            got: teams.len(),
        });
    }

    let mut pairs: Vec<(TeamId, TeamId)> = Vec::with_capacity(teams.len() * (teams.len() - 1) / 2);
    for (i, &team_a) in teams.iter().enumerate() {
        for &team_b in &teams[i + 1..] {
            pairs.push((team_a, team_b));
        }
    }
    pairs.shuffle(&mut rand::thread_rng());

    let mut rounds = Vec::with_capacity(pairs.len());
    let mut matches = Vec::with_capacity(pairs.len());
    for (i, (team_a, team_b)) in pairs.into_iter().enumerate() {
        let number = i as u32 + 1;
        let start = championship.start_date + Duration::hours(ROUND_DURATION_HOURS * i as i64);
        let end = start + Duration::hours(ROUND_DURATION_HOURS);
        let round = Round::new(championship.id, number, start, end);
        matches.push(GameMatch::new(round.id, championship.id, team_a, team_b, None));
        rounds.push(round);
    }
    Ok((rounds, matches))
}
