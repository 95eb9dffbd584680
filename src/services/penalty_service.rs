//! Mute penalty resolution: immunity check, duration draw, dispatch.

use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use crate::{
    error::{GameError, GameResult},
    host::{GroupId, MemberRole, UserId},
    state::SharedState,
};

/// How a penalty resolved against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Penalty {
    /// Target was muted for the contained duration.
    Muted(Duration),
    /// Target holds a privileged role and is exempt from the mute.
    Immune,
}

/// Mute `user` in `group` for a random duration within the configured bounds.
///
/// The role lookup runs fresh on every call; roles can change between game
/// start and fire, so a cached answer would be wrong exactly when it
/// matters. A failed lookup falls open (the target is treated as bannable)
/// while a failed mute surfaces as [`GameError::DispatchFailed`], which the
/// caller reports without revisiting the fire outcome.
pub async fn apply_penalty(
    state: &SharedState,
    group: GroupId,
    user: UserId,
) -> GameResult<Penalty> {
    match lookup_role(state, group, user).await {
        Ok(role) if role.is_privileged() => {
            info!(group = %group, user = %user, ?role, "target is immune to the mute penalty");
            return Ok(Penalty::Immune);
        }
        Ok(_) => {}
        Err(err) => {
            warn!(
                group = %group,
                user = %user,
                error = %err,
                "role lookup failed; treating target as bannable"
            );
        }
    }

    let seconds =
        rand::rng().random_range(state.config().min_ban_seconds..=state.config().max_ban_seconds);
    let duration = Duration::from_secs(seconds);

    state
        .host()
        .mute(group, user, duration)
        .await
        .map_err(GameError::DispatchFailed)?;

    info!(group = %group, user = %user, seconds, "mute penalty applied");
    Ok(Penalty::Muted(duration))
}

/// Fetch the target's current role, mapping host failures to
/// [`GameError::LookupFailed`] so the caller can apply the fail-open policy
/// deliberately.
async fn lookup_role(
    state: &SharedState,
    group: GroupId,
    user: UserId,
) -> GameResult<MemberRole> {
    state
        .host()
        .member_role(group, user)
        .await
        .map_err(GameError::LookupFailed)
}
