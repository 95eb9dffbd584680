//! Per-group game slots and the exclusion scope that serializes them.

use std::sync::Arc;

use dashmap::DashMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::host::GroupId;
use crate::state::cylinder::Cylinder;

/// A revolver game in progress for one group.
///
/// A game exists exactly as long as at least one live round remains; the
/// moment the count reaches zero the owning slot drops it together with its
/// inactivity timer.
#[derive(Debug)]
pub struct ActiveGame {
    /// Diagnostic identifier used to correlate log lines.
    pub id: Uuid,
    /// Cylinder holding the remaining rounds and the cursor.
    pub cylinder: Cylinder,
    /// Creation timestamp, diagnostics only.
    pub created_at: OffsetDateTime,
}

impl ActiveGame {
    /// Wrap a freshly loaded cylinder in a new game.
    pub fn new(cylinder: Cylinder) -> Self {
        Self {
            id: Uuid::new_v4(),
            cylinder,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// RFC 3339 rendering of the creation timestamp for log fields.
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| "invalid-timestamp".into())
    }
}

/// Per-group slot holding the game and its inactivity timer.
///
/// The surrounding `Mutex` is the exclusion scope for that group: start,
/// fire, status, and timeout expiry all lock the slot before touching the
/// game, so same-group races resolve to exactly one winner while different
/// groups never contend.
#[derive(Debug, Default)]
pub struct GroupSlot {
    /// The running game, if any.
    pub game: Option<ActiveGame>,
    /// Generation counter for the inactivity timer. A timer callback only
    /// acts when the epoch it captured at arming time is still current, so
    /// an aborted-but-already-running callback cannot mutate state.
    pub timer_epoch: u64,
    /// Handle of the outstanding inactivity timer. `Some` iff `game` is.
    pub timer: Option<JoinHandle<()>>,
}

impl GroupSlot {
    /// Invalidate and abort the outstanding timer, if any.
    ///
    /// Idempotent; the epoch bump alone makes any in-flight callback stale.
    pub fn cancel_timer(&mut self) {
        self.timer_epoch += 1;
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

/// Concurrent map of group slots.
///
/// Slots are created lazily on first touch and persist across games, which
/// keeps the timer epoch monotonic per group: a stale callback from a
/// finished game can never confuse its successor.
#[derive(Default)]
pub struct GameRegistry {
    slots: DashMap<GroupId, Arc<Mutex<GroupSlot>>>,
}

impl GameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the slot for `group`, creating an empty one on first touch.
    pub fn slot(&self, group: GroupId) -> Arc<Mutex<GroupSlot>> {
        self.slots.entry(group).or_default().clone()
    }

    /// Abort every outstanding timer and drop all games. Used at teardown.
    pub async fn clear(&self) {
        let slots: Vec<_> = self
            .slots
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        self.slots.clear();

        for slot in slots {
            let mut slot = slot.lock().await;
            slot.cancel_timer();
            slot.game = None;
        }
    }
}
