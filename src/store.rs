//! In-memory game store: users, teams, championships, rounds, matches, the
//! append-only goal log, and the level ladder.
//!
//! The whole server shares one `RwLock<GameStore>`; every operation takes the
//! lock exactly once, so each operation is a single logical transaction. A
//! different backend (e.g. a relational store) would implement the same
//! surface behind the same seam.

use crate::error::GameError;
use crate::models::{
    default_ladder, validate_ladder, Championship, ChampionshipId, CompetitionStatus, GameMatch,
    Goal, Level, MatchId, Plan, Round, RoundId, Team, TeamId, User, UserId, UserStatus,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Admin edit of a user; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub plan: Option<Plan>,
    pub status: Option<UserStatus>,
    pub team_defending_id: Option<TeamId>,
    pub team_heart_id: Option<TeamId>,
}

#[derive(Clone, Debug, Default)]
pub struct GameStore {
    pub users: HashMap<UserId, User>,
    pub teams: HashMap<TeamId, Team>,
    pub championships: HashMap<ChampionshipId, Championship>,
    pub rounds: HashMap<RoundId, Round>,
    pub matches: HashMap<MatchId, GameMatch>,
    /// Append-only; ordered by insertion (and so by `scored_at`).
    pub goals: Vec<Goal>,
    pub levels: Vec<Level>,
}

impl GameStore {
    /// Empty store with the production level ladder installed.
    pub fn new() -> Self {
        Self {
            levels: default_ladder(),
            ..Self::default()
        }
    }

    // --- entity accessors -------------------------------------------------

    pub fn user(&self, id: UserId) -> Result<&User, GameError> {
        self.users.get(&id).ok_or(GameError::UserNotFound(id))
    }

    pub fn user_mut(&mut self, id: UserId) -> Result<&mut User, GameError> {
        self.users.get_mut(&id).ok_or(GameError::UserNotFound(id))
    }

    pub fn team(&self, id: TeamId) -> Result<&Team, GameError> {
        self.teams.get(&id).ok_or(GameError::TeamNotFound(id))
    }

    pub fn championship(&self, id: ChampionshipId) -> Result<&Championship, GameError> {
        self.championships
            .get(&id)
            .ok_or(GameError::ChampionshipNotFound(id))
    }

    pub fn championship_mut(&mut self, id: ChampionshipId) -> Result<&mut Championship, GameError> {
        self.championships
            .get_mut(&id)
            .ok_or(GameError::ChampionshipNotFound(id))
    }

    pub fn round(&self, id: RoundId) -> Result<&Round, GameError> {
        self.rounds.get(&id).ok_or(GameError::RoundNotFound(id))
    }

    pub fn round_mut(&mut self, id: RoundId) -> Result<&mut Round, GameError> {
        self.rounds.get_mut(&id).ok_or(GameError::RoundNotFound(id))
    }

    pub fn game_match(&self, id: MatchId) -> Result<&GameMatch, GameError> {
        self.matches.get(&id).ok_or(GameError::MatchNotFound(id))
    }

    pub fn game_match_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, GameError> {
        self.matches.get_mut(&id).ok_or(GameError::MatchNotFound(id))
    }

    // --- users ------------------------------------------------------------

    /// Register a user. The defending team is mandatory; the heart team
    /// defaults to it. Emails are unique, case-insensitive.
    pub fn register_user(
        &mut self,
        name: &str,
        email: &str,
        team_defending_id: TeamId,
        team_heart_id: Option<TeamId>,
        now: DateTime<Utc>,
    ) -> Result<&User, GameError> {
        self.team(team_defending_id)?;
        if let Some(heart) = team_heart_id {
            self.team(heart)?;
        }
        if self
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(GameError::DuplicateEmail);
        }
        let user = User::new(name, email, team_defending_id, team_heart_id, now);
        let id = user.id;
        self.users.insert(id, user);
        Ok(&self.users[&id])
    }

    /// Apply an admin edit. Team changes are validated against the store.
    pub fn update_user(&mut self, id: UserId, update: UserUpdate) -> Result<&User, GameError> {
        if let Some(team) = update.team_defending_id {
            self.team(team)?;
        }
        if let Some(team) = update.team_heart_id {
            self.team(team)?;
        }
        let user = self.user_mut(id)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(plan) = update.plan {
            user.plan = plan;
        }
        if let Some(status) = update.status {
            user.status = status;
        }
        if let Some(team) = update.team_defending_id {
            user.team_defending_id = team;
        }
        if let Some(team) = update.team_heart_id {
            user.team_heart_id = team;
        }
        self.user(id)
    }

    // --- teams ------------------------------------------------------------

    /// Create a team; names are unique, case-insensitive.
    pub fn create_team(&mut self, team: Team) -> Result<&Team, GameError> {
        if self
            .teams
            .values()
            .any(|t| t.name.eq_ignore_ascii_case(&team.name))
        {
            return Err(GameError::DuplicateTeamName);
        }
        let id = team.id;
        self.teams.insert(id, team);
        Ok(&self.teams[&id])
    }

    /// Delete a team unless a user, championship, or match references it.
    pub fn delete_team(&mut self, id: TeamId) -> Result<(), GameError> {
        self.team(id)?;
        let referenced = self
            .users
            .values()
            .any(|u| u.team_defending_id == id || u.team_heart_id == id)
            || self.championships.values().any(|c| c.team_ids.contains(&id))
            || self.matches.values().any(|m| m.involves(id));
        if referenced {
            return Err(GameError::TeamInUse(id));
        }
        self.teams.remove(&id);
        Ok(())
    }

    // --- levels -----------------------------------------------------------

    /// Replace the level ladder after validating it partitions `0..`.
    pub fn set_ladder(&mut self, ladder: Vec<Level>) -> Result<(), GameError> {
        validate_ladder(&ladder)?;
        self.levels = ladder;
        Ok(())
    }

    // --- schedule queries -------------------------------------------------

    /// Rounds of a championship ordered by round number.
    pub fn rounds_of(&self, championship_id: ChampionshipId) -> Vec<&Round> {
        let mut rounds: Vec<&Round> = self
            .rounds
            .values()
            .filter(|r| r.championship_id == championship_id)
            .collect();
        rounds.sort_by_key(|r| r.number);
        rounds
    }

    /// Matches of a round ordered by match number.
    pub fn matches_of_round(&self, round_id: RoundId) -> Vec<&GameMatch> {
        let mut matches: Vec<&GameMatch> = self
            .matches
            .values()
            .filter(|m| m.round_id == round_id)
            .collect();
        matches.sort_by_key(|m| m.match_number);
        matches
    }

    /// Goal events of a match, newest first.
    pub fn goals_of_match(&self, match_id: MatchId, limit: usize) -> Vec<&Goal> {
        self.goals
            .iter()
            .rev()
            .filter(|g| g.match_id == match_id)
            .take(limit)
            .collect()
    }

    /// Remove a championship's rounds, matches, and goals (not the
    /// championship row itself). Used by regeneration and cascade delete.
    pub fn remove_schedule(&mut self, championship_id: ChampionshipId) {
        let match_ids: Vec<MatchId> = self
            .matches
            .values()
            .filter(|m| m.championship_id == championship_id)
            .map(|m| m.id)
            .collect();
        self.goals.retain(|g| !match_ids.contains(&g.match_id));
        self.matches.retain(|_, m| m.championship_id != championship_id);
        self.rounds.retain(|_, r| r.championship_id != championship_id);
    }

    /// True when any match of the round is still active.
    pub fn round_has_active_match(&self, round_id: RoundId) -> bool {
        self.matches
            .values()
            .any(|m| m.round_id == round_id && m.status == CompetitionStatus::Active)
    }

    // --- demo data --------------------------------------------------------

    /// Store pre-populated with the eight demo clubs, for local runs.
    pub fn seed_demo() -> Self {
        let mut store = Self::new();
        let clubs = [
            ("Flamengo Digital", "#E53935", "#000000"),
            ("Corinthians Virtual", "#212121", "#FFFFFF"),
            ("Palmeiras Cyber", "#2E7D32", "#FFFFFF"),
            ("São Paulo FC Online", "#E53935", "#000000"),
            ("Vasco da Gama Net", "#212121", "#FFFFFF"),
            ("Santos FC Digital", "#FFFFFF", "#212121"),
            ("Botafogo Digital", "#212121", "#FFFFFF"),
            ("Grêmio Digital", "#1565C0", "#212121"),
        ];
        for (name, primary, secondary) in clubs {
            let team = Team::new(name, primary, secondary);
            store.teams.insert(team.id, team);
        }
        store
    }
}
