//! Goal: an immutable scoring event. Append-only; feeds the live feed and
//! per-match scorer rankings.

use crate::models::round::MatchId;
use crate::models::team::TeamId;
use crate::models::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a goal event.
pub type GoalId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub match_id: MatchId,
    pub user_id: UserId,
    /// Team the goal was credited to (the scorer's defended team).
    pub team_id: TeamId,
    pub scored_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(match_id: MatchId, user_id: UserId, team_id: TeamId, scored_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            user_id,
            team_id,
            scored_at,
        }
    }
}
