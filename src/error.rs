//! Errors for game operations, grouped into categories the API layer maps
//! to HTTP status codes.

use crate::models::{ChampionshipId, ChampionshipKind, MatchId, RoundId, TeamId, UserId};

/// Broad category of a [`GameError`]; decides the response status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed or rule-violating input; safe to fix and resubmit.
    Validation,
    /// The action is not allowed right now (cooldown, inactive match, ...).
    NotEligible,
    /// A concurrent change got there first.
    Conflict,
    /// A referenced entity does not exist.
    NotFound,
}

/// Errors that can occur during game operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameError {
    /// Wrong participant count for the championship kind.
    InvalidTeamCount { kind: ChampionshipKind, got: usize },
    /// The round's window would overlap an existing round of the championship.
    OverlappingRound { round_id: RoundId },
    /// End time not after start time.
    InvalidTimeWindow,
    /// A team appears twice in a fixture or participant list.
    SameTeamTwice,
    /// A user with this email already exists (case-insensitive).
    DuplicateEmail,
    /// A team with this name already exists (case-insensitive).
    DuplicateTeamName,
    /// Level ladder has a gap, overlap, or does not start at zero.
    LadderNotContiguous { level: u32 },
    /// Level ladder must have at least one tier.
    EmptyLadder,
    /// Team is referenced by a user, championship, or match.
    TeamInUse(TeamId),
    /// Round still has active matches; finish or remove them first.
    RoundHasActiveMatch(RoundId),
    /// Championship still has an active round.
    ChampionshipHasActiveRound(ChampionshipId),
    /// Only an active round can be advanced.
    RoundNotActive(RoundId),
    /// Finished rounds are immutable.
    RoundAlreadyFinished(RoundId),
    /// Operation only applies to cup championships.
    NotACup(ChampionshipId),

    /// Cooldown has not elapsed; retry after the given number of seconds.
    CooldownActive { seconds_remaining: i64 },
    /// The target match is not currently active.
    MatchNotActive(MatchId),
    /// The user's defended team does not play in the target match.
    TeamNotInMatch,
    /// The user's defended team has no active match right now.
    NoActiveMatch,
    /// Suspended or pending users cannot shoot.
    UserNotActive(UserId),

    /// A cup phase cannot advance until both legs are finished.
    PhaseNotComplete { phase: u32 },

    UserNotFound(UserId),
    TeamNotFound(TeamId),
    ChampionshipNotFound(ChampionshipId),
    RoundNotFound(RoundId),
    MatchNotFound(MatchId),
}

impl GameError {
    /// Category for status-code mapping.
    pub fn kind(&self) -> ErrorKind {
        use GameError::*;
        match self {
            InvalidTeamCount { .. }
            | OverlappingRound { .. }
            | InvalidTimeWindow
            | SameTeamTwice
            | DuplicateEmail
            | DuplicateTeamName
            | LadderNotContiguous { .. }
            | EmptyLadder
            | TeamInUse(_)
            | RoundHasActiveMatch(_)
            | ChampionshipHasActiveRound(_)
            | RoundNotActive(_)
            | RoundAlreadyFinished(_)
            | NotACup(_) => ErrorKind::Validation,
            CooldownActive { .. }
            | MatchNotActive(_)
            | TeamNotInMatch
            | NoActiveMatch
            | UserNotActive(_) => ErrorKind::NotEligible,
            PhaseNotComplete { .. } => ErrorKind::Conflict,
            UserNotFound(_)
            | TeamNotFound(_)
            | ChampionshipNotFound(_)
            | RoundNotFound(_)
            | MatchNotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use GameError::*;
        match self {
            InvalidTeamCount { kind, got } => {
                let allowed = match kind {
                    ChampionshipKind::League => "10 or 20",
                    ChampionshipKind::Cup => "8 or 16",
                };
                write!(f, "A {:?} needs exactly {} teams (got {})", kind, allowed, got)
            }
            OverlappingRound { .. } => {
                write!(f, "There is already a round in this time window")
            }
            InvalidTimeWindow => write!(f, "End time must be after start time"),
            SameTeamTwice => write!(f, "A team cannot play against itself"),
            DuplicateEmail => write!(f, "A user with this email already exists"),
            DuplicateTeamName => write!(f, "A team with this name already exists"),
            LadderNotContiguous { level } => {
                write!(f, "Level {} breaks the ladder: ranges must be contiguous from 0", level)
            }
            EmptyLadder => write!(f, "Level ladder must have at least one tier"),
            TeamInUse(_) => write!(f, "Team is still referenced by users or championships"),
            RoundHasActiveMatch(_) => write!(f, "Round has active matches and cannot be deleted"),
            ChampionshipHasActiveRound(_) => {
                write!(f, "Championship has an active round and cannot be modified")
            }
            RoundNotActive(_) => write!(f, "Only an active round can be advanced"),
            RoundAlreadyFinished(_) => write!(f, "Finished rounds cannot be edited"),
            NotACup(_) => write!(f, "Operation only applies to cup championships"),
            CooldownActive { seconds_remaining } => {
                write!(f, "Next shot allowed in {} seconds", seconds_remaining)
            }
            MatchNotActive(_) => write!(f, "Match is not active"),
            TeamNotInMatch => write!(f, "Your defended team does not play in this match"),
            NoActiveMatch => write!(f, "Your defended team has no active match"),
            UserNotActive(_) => write!(f, "Account is not active"),
            PhaseNotComplete { phase } => {
                write!(f, "Cup phase {} still has unfinished legs", phase)
            }
            UserNotFound(_) => write!(f, "User not found"),
            TeamNotFound(_) => write!(f, "Team not found"),
            ChampionshipNotFound(_) => write!(f, "Championship not found"),
            RoundNotFound(_) => write!(f, "Round not found"),
            MatchNotFound(_) => write!(f, "Match not found"),
        }
    }
}
