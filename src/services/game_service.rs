//! Game lifecycle: loading the cylinder, firing, status, inactivity timeout.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    error::{GameError, GameResult},
    host::{GroupId, UserId},
    services::penalty_service::{self, Penalty},
    state::{
        SharedState,
        cylinder::{CHAMBER_COUNT, Cylinder, FireOutcome},
        registry::{ActiveGame, GroupSlot},
    },
    text,
};

/// Everything one trigger pull produced.
#[derive(Debug)]
pub struct FireReport {
    /// Hit or miss, and whether this shot emptied the cylinder.
    pub outcome: FireOutcome,
    /// Live rounds left after the shot.
    pub remaining: usize,
    /// Penalty resolution for a hit. `None` on a miss. An `Err` means the
    /// shooter was hit but the mute could not be delivered; the game state
    /// has already advanced either way.
    pub penalty: Option<GameResult<Penalty>>,
}

/// Read-only view of a running game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Live rounds still in the cylinder.
    pub remaining: usize,
    /// Zero-based index of the chamber under the cursor.
    pub chamber_index: usize,
    /// Whether the chamber under the cursor holds a live round.
    pub current_is_live: bool,
}

/// Start a game in `group`, returning the number of rounds loaded.
///
/// An explicit `bullet_count` is an admin privilege; everyone else gets a
/// count drawn uniformly from the full range. The conflict check runs before
/// the permission check so a non-admin poking a running game hears about the
/// game, not about their rank.
pub async fn start_game(
    state: &SharedState,
    group: GroupId,
    bullet_count: Option<u8>,
    requester_is_admin: bool,
) -> GameResult<u8> {
    let slot = state.registry().slot(group);
    let mut slot = slot.lock().await;

    if slot.game.is_some() {
        return Err(GameError::AlreadyInProgress { group });
    }

    let count = match bullet_count {
        Some(_) if !requester_is_admin => return Err(GameError::PermissionDenied),
        Some(count) => count,
        None => rand::rng().random_range(1..=CHAMBER_COUNT as u8),
    };

    let cylinder = Cylinder::load(&mut rand::rng(), count)?;
    let game = ActiveGame::new(cylinder);
    info!(
        group = %group,
        game = %game.id,
        rounds = count,
        created_at = %game.created_at_rfc3339(),
        "game started"
    );
    slot.game = Some(game);
    arm_timeout(state, group, &mut slot);

    Ok(count)
}

/// Fire the chamber under the cursor for `user` in `group`.
///
/// The shot itself resolves under the slot lock; a hit then dispatches the
/// mute penalty after the lock is released so a slow host call never stalls
/// the rest of the group. Every non-final shot re-arms the inactivity timer.
pub async fn fire(state: &SharedState, group: GroupId, user: UserId) -> GameResult<FireReport> {
    let slot = state.registry().slot(group);
    let (outcome, remaining) = {
        let mut slot = slot.lock().await;
        let Some(game) = slot.game.as_mut() else {
            return Err(GameError::NoActiveGame { group });
        };

        let outcome = game.cylinder.fire();
        let remaining = game.cylinder.remaining();

        if outcome.exhausted {
            slot.cancel_timer();
            if let Some(finished) = slot.game.take() {
                info!(group = %group, game = %finished.id, "last round fired; game over");
            }
        } else {
            arm_timeout(state, group, &mut slot);
        }

        (outcome, remaining)
    };

    let penalty = if outcome.hit {
        let resolution = penalty_service::apply_penalty(state, group, user).await;
        if let Err(err) = &resolution {
            warn!(group = %group, user = %user, error = %err, "penalty could not be applied");
        }
        Some(resolution)
    } else {
        None
    };

    Ok(FireReport {
        outcome,
        remaining,
        penalty,
    })
}

/// Snapshot the running game in `group` without advancing it.
pub async fn status(state: &SharedState, group: GroupId) -> GameResult<StatusSnapshot> {
    let slot = state.registry().slot(group);
    let slot = slot.lock().await;
    let Some(game) = slot.game.as_ref() else {
        return Err(GameError::NoActiveGame { group });
    };

    Ok(StatusSnapshot {
        remaining: game.cylinder.remaining(),
        chamber_index: game.cylinder.cursor(),
        current_is_live: game.cylinder.current_is_live(),
    })
}

/// Replace the slot's inactivity timer with a fresh one.
///
/// Caller holds the slot lock. The spawned task captures the new epoch and
/// re-checks it under the lock before acting, so a superseded timer that
/// already woke up becomes a no-op instead of killing the wrong game.
fn arm_timeout(state: &SharedState, group: GroupId, slot: &mut GroupSlot) {
    slot.cancel_timer();
    let epoch = slot.timer_epoch;
    let timeout = state.config().timeout;
    let state = Arc::clone(state);

    slot.timer = Some(tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        expire_game(state, group, epoch).await;
    }));
}

/// Timer body: drop the game if this timer is still the current one.
async fn expire_game(state: SharedState, group: GroupId, epoch: u64) {
    let slot = state.registry().slot(group);
    let expired = {
        let mut slot = slot.lock().await;
        if slot.timer_epoch != epoch {
            debug!(group = %group, "inactivity timer superseded; ignoring");
            return;
        }
        // This task IS the handle in the slot; drop it without aborting.
        slot.timer = None;
        slot.game.take()
    };

    let Some(game) = expired else {
        debug!(group = %group, "inactivity timer found no game; ignoring");
        return;
    };

    info!(
        group = %group,
        game = %game.id,
        remaining = game.cylinder.remaining(),
        "game expired after inactivity"
    );
    if let Err(err) = state
        .host()
        .send_message(group, text::timeout_notice())
        .await
    {
        warn!(group = %group, error = %err, "failed to announce the expiry");
    }
}
