//! Command surface: dispatch from parsed chat commands to the game services,
//! rendering every outcome as reply text.

use tracing::{error, info};

use crate::{
    error::GameError,
    host::{GroupId, UserId},
    services::{
        game_service::{self, FireReport},
        penalty_service::Penalty,
    },
    state::SharedState,
    text,
};

/// A game command, already parsed by the hosting framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Load the cylinder. An explicit count is admin-only.
    Load {
        /// Requested number of rounds; `None` draws a random count.
        bullet_count: Option<u8>,
    },
    /// Pull the trigger.
    Fire,
    /// Report the running game without advancing it.
    Status,
    /// Show the command reference.
    Help,
    /// Switch random misfires on for this group. Admin-only.
    EnableMisfire,
    /// Switch random misfires off for this group. Admin-only.
    DisableMisfire,
}

/// Sender and channel identity accompanying a command or plain message.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Group the message arrived in; `None` for private chats.
    pub group_id: Option<GroupId>,
    /// Platform identifier of the sender.
    pub user_id: UserId,
    /// Name to address the sender by in replies.
    pub display_name: String,
    /// Platform identifier of the message itself.
    pub message_id: String,
    /// Whether the host considers the sender privileged for gated commands.
    pub sender_is_admin: bool,
}

/// Execute `command` for `ctx` and render the reply.
///
/// Every outcome comes back as reply text, refusals and internal failures
/// included; the caller only has to deliver it.
pub async fn handle_command(state: &SharedState, ctx: &CommandContext, command: Command) -> String {
    if matches!(command, Command::Help) {
        return text::help();
    }

    let Some(group) = ctx.group_id else {
        return text::group_only();
    };

    match command {
        Command::Load { bullet_count } => {
            match game_service::start_game(state, group, bullet_count, ctx.sender_is_admin).await {
                Ok(count) => {
                    text::loaded(&ctx.display_name, count, state.config().timeout.as_secs())
                }
                Err(err) => render_error(ctx, err),
            }
        }
        Command::Fire => match game_service::fire(state, group, ctx.user_id).await {
            Ok(report) => render_fire(ctx, &report),
            Err(err) => render_error(ctx, err),
        },
        Command::Status => match game_service::status(state, group).await {
            Ok(snapshot) => text::status(
                snapshot.remaining,
                snapshot.chamber_index,
                snapshot.current_is_live,
            ),
            Err(GameError::NoActiveGame { .. }) => text::no_game_status(),
            Err(err) => render_error(ctx, err),
        },
        Command::EnableMisfire => set_misfire(state, ctx, group, true).await,
        Command::DisableMisfire => set_misfire(state, ctx, group, false).await,
        Command::Help => text::help(),
    }
}

/// Map a shot's outcome onto the reply, appending the game-over tail when
/// the final round went off.
fn render_fire(ctx: &CommandContext, report: &FireReport) -> String {
    let mut reply = if report.outcome.hit {
        match &report.penalty {
            Some(Ok(Penalty::Muted(duration))) => text::hit(&ctx.display_name, *duration),
            Some(Ok(Penalty::Immune)) => text::hit_immune(&ctx.display_name),
            Some(Err(_)) | None => text::hit_unpunished(&ctx.display_name),
        }
    } else {
        text::miss(&ctx.display_name)
    };

    if report.outcome.exhausted {
        reply.push('\n');
        reply.push_str(&text::exhausted());
    }
    reply
}

fn render_error(ctx: &CommandContext, err: GameError) -> String {
    match err {
        GameError::AlreadyInProgress { .. } => text::already_in_progress(&ctx.display_name),
        GameError::PermissionDenied => text::need_admin_for_count(&ctx.display_name),
        GameError::InvalidCount { .. } => text::invalid_count(&ctx.display_name),
        GameError::NoActiveGame { .. } => text::no_game(&ctx.display_name),
        other => {
            error!(user = %ctx.user_id, error = %other, "command failed unexpectedly");
            text::failure()
        }
    }
}

async fn set_misfire(
    state: &SharedState,
    ctx: &CommandContext,
    group: GroupId,
    enabled: bool,
) -> String {
    if !ctx.sender_is_admin {
        return text::need_admin(&ctx.display_name);
    }

    let mut config = state.group_config(group);
    config.misfire_enabled = enabled;
    state.update_group_config(group, config).await;

    info!(group = %group, enabled, "misfire toggled");
    text::misfire_toggled(enabled)
}
