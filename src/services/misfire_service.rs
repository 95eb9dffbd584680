//! Accidental discharge sampling over ordinary group chatter.

use rand::Rng;
use tracing::{info, warn};

use crate::{
    commands::CommandContext,
    services::penalty_service::{self, Penalty},
    state::SharedState,
    text,
};

/// Roll the misfire die for an ordinary message, returning the reply to post
/// when the gun goes off.
///
/// Returns `None` for private chats, command lines, groups with the feature
/// switched off, and the overwhelming majority of rolls that simply pass.
/// Misfires are independent of any running game; the revolver on the table
/// is dangerous even between rounds.
pub async fn sample_message(
    state: &SharedState,
    ctx: &CommandContext,
    message: &str,
) -> Option<String> {
    let group = ctx.group_id?;

    if message.trim_start().starts_with('/') {
        return None;
    }
    if !state.group_config(group).misfire_enabled {
        return None;
    }
    if !rand::rng().random_bool(state.config().misfire_probability) {
        return None;
    }

    info!(group = %group, user = %ctx.user_id, "misfire went off");
    let reply = match penalty_service::apply_penalty(state, group, ctx.user_id).await {
        Ok(Penalty::Muted(duration)) => text::misfire(&ctx.display_name, duration),
        Ok(Penalty::Immune) => text::misfire_immune(&ctx.display_name),
        Err(err) => {
            warn!(
                group = %group,
                user = %ctx.user_id,
                error = %err,
                "misfire penalty could not be applied"
            );
            text::misfire_unpunished(&ctx.display_name)
        }
    };
    Some(reply)
}
