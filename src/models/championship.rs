//! Championship: a competition container (league or cup).

use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a championship.
pub type ChampionshipId = Uuid;

/// Competition format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChampionshipKind {
    /// Round-robin; standings by points / goal difference / goals for.
    League,
    /// Single-elimination bracket with two-legged ties.
    Cup,
}

/// Lifecycle status shared by championships, rounds and matches.
/// Transitions are linear: scheduled -> active -> finished.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
    #[default]
    Scheduled,
    Active,
    Finished,
}

/// Rule that decides a cup tie still level after aggregate and away goals.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakFallback {
    /// The side at home in the first leg advances.
    #[default]
    FirstLegHome,
    /// The side at home in the second leg advances.
    SecondLegHome,
}

/// A competition with its participating teams and generated schedule.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Championship {
    pub id: ChampionshipId,
    pub name: String,
    pub kind: ChampionshipKind,
    pub status: CompetitionStatus,
    pub start_date: DateTime<Utc>,
    /// Number of the lowest round not yet finished (1-based).
    pub current_round: u32,
    /// Fixed at generation time; cup rounds beyond phase one materialize later.
    pub total_rounds: u32,
    /// Participants in bracket/draw order.
    pub team_ids: Vec<TeamId>,
    /// Cup only; ignored for leagues.
    pub tie_break_fallback: TieBreakFallback,
    /// Winner of a finished cup. Leagues derive their champion from standings.
    pub champion_id: Option<TeamId>,
}

impl Championship {
    pub fn new(
        name: impl Into<String>,
        kind: ChampionshipKind,
        team_ids: Vec<TeamId>,
        start_date: DateTime<Utc>,
        tie_break_fallback: TieBreakFallback,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            status: CompetitionStatus::Scheduled,
            start_date,
            current_round: 1,
            total_rounds: 0,
            team_ids,
            tie_break_fallback,
            champion_id: None,
        }
    }
}
