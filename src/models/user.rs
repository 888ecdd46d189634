//! User: identity plus game state (counters, cooldown clock, plan).

use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user (supplied by the external identity provider).
pub type UserId = Uuid;

/// Subscription plan tier; determines the base shot cooldown.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Monthly,
    Annual,
}

/// Account status. Only `Active` users may shoot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Pending,
}

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub plan: Plan,
    pub is_admin: bool,
    /// Team the user supports emotionally. Cosmetic only.
    pub team_heart_id: TeamId,
    /// Team the user scores for; decides which matches they may shoot in.
    pub team_defending_id: TeamId,
    /// Lifetime goal count; never decreases.
    pub total_goals: u32,
    /// Goals in the round currently in play; reset when that round finishes.
    pub goals_current_round: u32,
    /// Earliest instant the next shot is allowed.
    pub next_allowed_shot_time: DateTime<Utc>,
    /// While `now < boost_expires_at`, the boost cooldown applies.
    pub boost_expires_at: Option<DateTime<Utc>>,
    pub status: UserStatus,
}

impl User {
    /// New user, free plan, clear to shoot immediately. The heart team
    /// defaults to the defended team when not given.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        team_defending_id: TeamId,
        team_heart_id: Option<TeamId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            plan: Plan::Free,
            is_admin: false,
            team_heart_id: team_heart_id.unwrap_or(team_defending_id),
            team_defending_id,
            total_goals: 0,
            goals_current_round: 0,
            next_allowed_shot_time: now,
            boost_expires_at: None,
            status: UserStatus::Active,
        }
    }

    /// Record a successful shot: bump both counters and arm the cooldown.
    pub fn record_goal(&mut self, next_allowed: DateTime<Utc>) {
        self.goals_current_round += 1;
        self.total_goals += 1;
        self.next_allowed_shot_time = next_allowed;
    }

    /// Reset the per-round counter (the round the user played in finished).
    pub fn reset_round_goals(&mut self) {
        self.goals_current_round = 0;
    }
}
