//! Digital soccer game backend: library with models, store, and game logic.

pub mod error;
pub mod logic;
pub mod models;
pub mod store;

pub use error::{ErrorKind, GameError};
pub use logic::{
    active_match_for_team, advance_round, can_shoot, compute_standings, create_championship,
    create_round, delete_championship, delete_round, match_top_scorers, rankings, refresh_round,
    resolve_cooldown, resolve_tie, set_match_score, shoot, sweep, update_championship_teams,
    update_round, CupPhase, CupTie, LeagueStanding, RankingEntry, ScorerEntry, ShotClearance,
    ShotOutcome, Standings, TieBreakRule, ROUND_DURATION_HOURS,
};
pub use models::{
    default_ladder, level_for_goals, validate_ladder, Championship, ChampionshipId,
    ChampionshipKind, CompetitionStatus, GameMatch, Goal, GoalId, Level, MatchId, Plan, Round,
    RoundId, Team, TeamId, TieBreakFallback, User, UserId, UserStatus,
};
pub use store::{GameStore, UserUpdate};
