//! Domain error taxonomy for hall operations.

use thiserror::Error;

/// Errors surfaced by hall operations.
///
/// Validation and state errors are raised before any registry is
/// touched; a failed operation leaves the hall unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HallError {
    /// A required input field was blank or whitespace.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// No member is registered under the given ID.
    #[error("member {0} is not registered")]
    MemberNotFound(u32),

    /// No lane exists with the given number.
    #[error("lane {0} does not exist")]
    LaneNotFound(u32),

    /// Lane numbers start at 1.
    #[error("lane numbers must be positive")]
    InvalidLaneNumber,

    /// A lane with this number already exists.
    #[error("lane {0} already exists")]
    DuplicateLane(u32),

    /// The lane is reserved and its reservation has not expired.
    #[error("lane {0} is not available")]
    LaneUnavailable(u32),

    /// Both players must be distinct registered members.
    #[error("a member cannot play against themselves")]
    InvalidPlayers,

    /// No match exists with the given ID.
    #[error("match {0} does not exist")]
    MatchNotFound(u32),

    /// Results were already recorded for this match.
    #[error("match {0} is already complete")]
    MatchAlreadyComplete(u32),
}
