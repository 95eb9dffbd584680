//! Deferred execution of classifier-detected game intents.
//!
//! The hosting framework's intent classifier announces its decision to the
//! group before the game may act on it, so detected intents are parked in
//! the trigger queue and executed later. Two drain sites exist: a task armed
//! here fires after the configured delay, and hosts may additionally drain
//! on their next inbound event as a backup. The queue's presence-checked
//! removal makes the race safe; whoever drains first runs the action alone.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    commands::{self, Command, CommandContext},
    state::{
        SharedState,
        triggers::{DeferredTrigger, TriggerAction, TriggerKey},
    },
};

/// Park `action` under `key`, displacing any earlier intent detected for the
/// same message.
pub fn enqueue_trigger(
    state: &SharedState,
    key: TriggerKey,
    action: TriggerAction,
    ctx: CommandContext,
) {
    debug!(user = %key.user, message = %key.message_id, ?action, "trigger enqueued");
    state
        .triggers()
        .enqueue(key, DeferredTrigger::new(action, ctx));
}

/// Arm the delayed drain for `key`.
///
/// Call right after [`enqueue_trigger`]. A backup drain may still win the
/// race, in which case the armed task wakes to an empty queue and stops.
pub fn schedule_drain(state: &SharedState, key: TriggerKey) {
    let delay = state.config().trigger_delay;
    let task_state = Arc::clone(state);
    let task_key = key.clone();
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        drain_now(&task_state, &task_key).await;
    });

    state.triggers().attach_task(&key, task);
}

/// Execute and discard the trigger under `key`, if one is still pending.
pub async fn drain_now(state: &SharedState, key: &TriggerKey) {
    let Some(trigger) = state.triggers().drain(key) else {
        return;
    };

    info!(
        user = %key.user,
        message = %key.message_id,
        action = ?trigger.action,
        "trigger drained"
    );
    execute(state, trigger).await;
}

/// Run the parked action through the regular command path and deliver the
/// reply to the group it came from.
async fn execute(state: &SharedState, trigger: DeferredTrigger) {
    let Some(group) = trigger.ctx.group_id else {
        debug!(user = %trigger.ctx.user_id, "trigger without a group dropped");
        return;
    };

    let command = match trigger.action {
        TriggerAction::Start => Command::Load { bullet_count: None },
        TriggerAction::Join => Command::Fire,
        TriggerAction::Status => Command::Status,
    };

    let reply = commands::handle_command(state, &trigger.ctx, command).await;
    if let Err(err) = state.host().send_message(group, reply).await {
        warn!(group = %group, error = %err, "failed to deliver the trigger reply");
    }
}
