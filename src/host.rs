//! Capability interface the hosting chat framework must implement.
//!
//! The game engine never talks to a chat platform directly. Everything it
//! needs from the outside world is collected here as a narrow trait the host
//! implements once at startup; a missing or failing capability surfaces as a
//! typed [`HostError`] instead of a runtime probe.

use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;

/// Identifier of a chat group as assigned by the hosting platform.
pub type GroupId = i64;

/// Identifier of a chat user as assigned by the hosting platform.
pub type UserId = i64;

/// Result alias for host capability calls.
pub type HostResult<T> = Result<T, HostError>;

/// Role of a user inside a group, as reported by the hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    /// Creator of the group.
    Owner,
    /// Appointed group administrator.
    Admin,
    /// Ordinary member.
    Member,
}

impl MemberRole {
    /// Whether this role exempts its holder from mute penalties.
    pub fn is_privileged(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }
}

/// Failures surfaced by the hosting chat framework.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host does not provide the requested capability at all.
    #[error("host capability `{capability}` is unavailable")]
    Unavailable {
        /// Name of the missing capability.
        capability: &'static str,
    },
    /// The host provides the capability but the call failed.
    #[error("host call `{capability}` failed: {message}")]
    CallFailed {
        /// Name of the failing capability.
        capability: &'static str,
        /// Platform-supplied failure description.
        message: String,
    },
}

/// Narrow interface over the hosting chat framework.
///
/// Implementations are expected to be cheap handles; every method returns an
/// owned future so calls can be driven from spawned tasks.
pub trait ChatHost: Send + Sync {
    /// Deliver `text` to the given group.
    fn send_message(&self, group: GroupId, text: String) -> BoxFuture<'static, HostResult<()>>;

    /// Mute `user` in `group` for the given duration.
    fn mute(
        &self,
        group: GroupId,
        user: UserId,
        duration: Duration,
    ) -> BoxFuture<'static, HostResult<()>>;

    /// Look up the current role of `user` inside `group`.
    fn member_role(
        &self,
        group: GroupId,
        user: UserId,
    ) -> BoxFuture<'static, HostResult<MemberRole>>;
}
