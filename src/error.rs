//! Error taxonomy for game operations.

use thiserror::Error;

use crate::host::{GroupId, HostError};

/// Result alias for game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors that can occur while driving a game.
///
/// Every variant is recoverable: the command boundary renders each one as a
/// user-facing reply and the hosting process keeps running. One group's
/// failure never affects another group's game.
#[derive(Debug, Error)]
pub enum GameError {
    /// Requested bullet count is outside the six-chamber range.
    #[error("bullet count {count} is out of range (expected 1-6)")]
    InvalidCount {
        /// The rejected count.
        count: u8,
    },
    /// A game is already running in this group.
    #[error("a game is already in progress in group {group}")]
    AlreadyInProgress {
        /// Group whose game blocked the request.
        group: GroupId,
    },
    /// The operation requires group admin rights the requester lacks.
    #[error("permission denied: group admin required")]
    PermissionDenied,
    /// No game is currently running in this group.
    #[error("no active game in group {group}")]
    NoActiveGame {
        /// Group that has no game.
        group: GroupId,
    },
    /// The external mute call failed; the fire outcome still stands.
    #[error("penalty dispatch failed")]
    DispatchFailed(#[source] HostError),
    /// The external role lookup failed; the target is treated as bannable.
    #[error("member role lookup failed")]
    LookupFailed(#[source] HostError),
}
