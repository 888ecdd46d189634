//! Team: static reference entity managed by admins.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// A club users can support and defend.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    /// Optional crest image URL.
    pub shield_url: Option<String>,
}

impl Team {
    pub fn new(
        name: impl Into<String>,
        primary_color: impl Into<String>,
        secondary_color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            primary_color: primary_color.into(),
            secondary_color: secondary_color.into(),
            shield_url: None,
        }
    }
}
