//! Round (a scheduled time window) and GameMatch (a fixture within it).

use crate::models::championship::{ChampionshipId, CompetitionStatus};
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A time-boxed fixture window inside a championship.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub championship_id: ChampionshipId,
    /// Sequential, starting at 1 within the championship.
    pub number: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: CompetitionStatus,
}

impl Round {
    pub fn new(
        championship_id: ChampionshipId,
        number: u32,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            championship_id,
            number,
            start_time,
            end_time,
            status: CompetitionStatus::Scheduled,
        }
    }

    /// Half-open window check: `[start, end)` against another interval.
    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// A single fixture between two teams. Status mirrors the owning round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub round_id: RoundId,
    pub championship_id: ChampionshipId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub score_team_a: u32,
    pub score_team_b: u32,
    pub status: CompetitionStatus,
    /// Cup ties: the two legs of one confronto share this number.
    pub match_number: Option<u32>,
}

impl GameMatch {
    pub fn new(
        round_id: RoundId,
        championship_id: ChampionshipId,
        team_a_id: TeamId,
        team_b_id: TeamId,
        match_number: Option<u32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_id,
            championship_id,
            team_a_id,
            team_b_id,
            score_team_a: 0,
            score_team_b: 0,
            status: CompetitionStatus::Scheduled,
            match_number,
        }
    }

    /// Whether `team_id` plays in this match.
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_a_id == team_id || self.team_b_id == team_id
    }

    /// Credit one goal to the given side.
    pub fn add_goal_for(&mut self, team_id: TeamId) {
        if self.team_a_id == team_id {
            self.score_team_a += 1;
        } else if self.team_b_id == team_id {
            self.score_team_b += 1;
        }
    }
}
