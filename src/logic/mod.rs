//! Game logic: shooting and cooldowns, round lifecycle, schedule
//! generation, standings.

mod cooldown;
mod cup;
mod league;
mod lifecycle;
mod shooting;
mod standings;

pub use cooldown::{can_shoot, resolve_cooldown, ShotClearance};
pub use cup::{resolve_tie, TieBreakRule};
pub use league::ROUND_DURATION_HOURS;
pub use lifecycle::{
    advance_round, create_championship, create_round, delete_championship, delete_round,
    refresh_round, set_match_score, sweep, update_championship_teams, update_round,
};
pub use shooting::{active_match_for_team, shoot, ShotOutcome};
pub use standings::{
    compute_standings, match_top_scorers, rankings, CupPhase, CupTie, LeagueStanding,
    RankingEntry, ScorerEntry, Standings,
};
