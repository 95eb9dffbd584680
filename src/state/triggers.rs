//! Deferred trigger queue for classifier-initiated game actions.
//!
//! The natural-language classifier emits its own reply before the game is
//! allowed to act, so the action it requested is parked here and executed
//! later. Entries are keyed by sender and message identity; a key holds at
//! most one pending trigger, and a presence-checked removal guarantees each
//! trigger runs at most once no matter how many drain sites race for it.

use dashmap::DashMap;
use time::OffsetDateTime;
use tokio::task::JoinHandle;

use crate::commands::CommandContext;
use crate::host::UserId;

/// Game actions the intent classifier may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    /// Begin a new game with a random bullet count.
    Start,
    /// Take a shot in the running game.
    Join,
    /// Report the running game's status.
    Status,
}

/// Identity of a pending trigger: one classifier decision for one message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerKey {
    /// Sender the classifier acted for.
    pub user: UserId,
    /// Platform identifier of the message the intent was detected in.
    pub message_id: String,
}

/// A queued game action awaiting execution.
#[derive(Debug)]
pub struct DeferredTrigger {
    /// Action to perform on drain.
    pub action: TriggerAction,
    /// Identity bundle captured when the classifier fired.
    pub ctx: CommandContext,
    /// Enqueue timestamp, diagnostics only.
    pub enqueued_at: OffsetDateTime,
    /// Handle of the scheduled drain task, once one is armed.
    pub task: Option<JoinHandle<()>>,
}

impl DeferredTrigger {
    /// Record an action together with the context it will execute under.
    pub fn new(action: TriggerAction, ctx: CommandContext) -> Self {
        Self {
            action,
            ctx,
            enqueued_at: OffsetDateTime::now_utc(),
            task: None,
        }
    }
}

/// Pending deferred triggers keyed by sender and message identity.
#[derive(Default)]
pub struct TriggerQueue {
    pending: DashMap<TriggerKey, DeferredTrigger>,
}

impl TriggerQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `trigger` under `key`, displacing any previous entry for the
    /// same key and aborting its scheduled drain.
    pub fn enqueue(&self, key: TriggerKey, trigger: DeferredTrigger) {
        if let Some(previous) = self.pending.insert(key, trigger) {
            if let Some(task) = previous.task {
                task.abort();
            }
        }
    }

    /// Remove and return the trigger for `key`, if still pending.
    ///
    /// The removal is the exactly-once guard: the first drain site to call
    /// this takes the entry, every later call finds nothing.
    pub fn drain(&self, key: &TriggerKey) -> Option<DeferredTrigger> {
        self.pending.remove(key).map(|(_, trigger)| trigger)
    }

    /// Attach the scheduled drain task for `key`, aborting any task attached
    /// earlier. A task attached after the trigger was already drained is
    /// aborted immediately since it has nothing left to do.
    pub fn attach_task(&self, key: &TriggerKey, task: JoinHandle<()>) {
        match self.pending.get_mut(key) {
            Some(mut entry) => {
                if let Some(previous) = entry.task.replace(task) {
                    previous.abort();
                }
            }
            None => task.abort(),
        }
    }

    /// Number of triggers currently pending.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no triggers are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Abort every scheduled drain and drop all pending triggers.
    pub fn clear(&self) {
        self.pending.retain(|_, trigger| {
            if let Some(task) = trigger.task.take() {
                task.abort();
            }
            false
        });
    }
}
