//! Shot cooldown: plan- and boost-dependent intervals.

use crate::error::GameError;
use crate::models::{Plan, UserId};
use crate::store::GameStore;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Base cooldown for the free plan, in minutes.
const FREE_COOLDOWN_MIN: i64 = 20;
/// Base cooldown for paying plans (monthly/annual), in minutes.
const MEMBER_COOLDOWN_MIN: i64 = 10;
/// Cooldown while a boost is active, in minutes. Overrides the plan.
const BOOST_COOLDOWN_MIN: i64 = 5;

/// The interval between a user's shots. A boost wins over the plan for as
/// long as `now < boost_expires_at`.
pub fn resolve_cooldown(plan: Plan, boost_expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Duration {
    if boost_expires_at.is_some_and(|expiry| now < expiry) {
        return Duration::minutes(BOOST_COOLDOWN_MIN);
    }
    match plan {
        Plan::Free => Duration::minutes(FREE_COOLDOWN_MIN),
        Plan::Monthly | Plan::Annual => Duration::minutes(MEMBER_COOLDOWN_MIN),
    }
}

/// Answer to "may this user shoot right now?". Covers only the cooldown
/// clock; match eligibility is checked by `shoot`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ShotClearance {
    pub can_shoot: bool,
    /// Whole seconds until the next shot; 0 when clear.
    pub seconds_remaining: i64,
}

/// Check the user's cooldown clock against `now`.
pub fn can_shoot(store: &GameStore, user_id: UserId, now: DateTime<Utc>) -> Result<ShotClearance, GameError> {
    let user = store.user(user_id)?;
    if now >= user.next_allowed_shot_time {
        Ok(ShotClearance {
            can_shoot: true,
            seconds_remaining: 0,
        })
    } else {
        // Round sub-second remainders up so we never report 0 while blocked.
        let remaining = (user.next_allowed_shot_time - now).num_seconds().max(1);
        Ok(ShotClearance {
            can_shoot: false,
            seconds_remaining: remaining,
        })
    }
}
