//! Revolver Duel binary entrypoint: a terminal table for playing against the
//! engine without a chat platform attached.

use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::Context;
use futures::future::BoxFuture;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revolver_duel::{
    commands::{self, Command, CommandContext},
    config::AppConfig,
    host::{ChatHost, GroupId, HostResult, MemberRole, UserId},
    services::misfire_service,
    state::{AppState, SharedState},
    store::JsonFileStore,
};

/// The single simulated group every console line lands in.
const TABLE: GroupId = 1;
/// The single simulated player behind the keyboard.
const PLAYER: UserId = 100;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let admin = Arc::new(AtomicBool::new(false));
    let host = Arc::new(ConsoleHost {
        admin: Arc::clone(&admin),
    });
    let store = Arc::new(JsonFileStore::new("config/groups.json"));
    let state = AppState::init(config, host, store).await;

    println!("Revolver Duel. You are seated at table {TABLE}.");
    println!("Commands: /load [count], /fire, /status, /misfire on|off, /help.");
    println!("/admin toggles your badge, /quit leaves. Anything else is table talk.");

    run_console(&state, &admin).await?;

    state.shutdown().await;
    Ok(())
}

/// Read stdin lines as one group's traffic until EOF, Ctrl+C, or `/quit`.
async fn run_console(state: &SharedState, admin: &Arc<AtomicBool>) -> anyhow::Result<()> {
    let name = env::var("USER").unwrap_or_else(|_| "drifter".into());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut sequence = 0u64;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "/quit" {
                    break;
                }
                if line == "/admin" {
                    let promoted = !admin.load(Ordering::SeqCst);
                    admin.store(promoted, Ordering::SeqCst);
                    println!("* admin badge {} *", if promoted { "on" } else { "off" });
                    continue;
                }

                sequence += 1;
                let ctx = CommandContext {
                    group_id: Some(TABLE),
                    user_id: PLAYER,
                    display_name: name.clone(),
                    message_id: format!("console-{sequence}"),
                    sender_is_admin: admin.load(Ordering::SeqCst),
                };
                handle_line(state, &ctx, line).await;
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    Ok(())
}

/// Route one console line: slash commands go to the command surface, table
/// talk goes through the misfire sampler.
async fn handle_line(state: &SharedState, ctx: &CommandContext, line: &str) {
    let reply = match parse_command(line) {
        Some(command) => Some(commands::handle_command(state, ctx, command).await),
        None => misfire_service::sample_message(state, ctx, line).await,
    };

    if let Some(reply) = reply {
        if let Err(err) = state.host().send_message(TABLE, reply).await {
            warn!(error = %err, "failed to deliver the reply");
        }
    }
}

/// Parse a slash command line; `None` means ordinary chatter.
fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    if !head.starts_with('/') {
        return None;
    }

    match head {
        "/load" => Some(Command::Load {
            bullet_count: parts.next().and_then(|raw| raw.parse().ok()),
        }),
        "/fire" => Some(Command::Fire),
        "/status" => Some(Command::Status),
        "/misfire" => match parts.next() {
            Some("on") => Some(Command::EnableMisfire),
            Some("off") => Some(Command::DisableMisfire),
            _ => Some(Command::Help),
        },
        _ => Some(Command::Help),
    }
}

/// Chat host that prints everything to the terminal and serves the player's
/// current badge as their role.
struct ConsoleHost {
    admin: Arc<AtomicBool>,
}

impl ChatHost for ConsoleHost {
    fn send_message(&self, group: GroupId, text: String) -> BoxFuture<'static, HostResult<()>> {
        Box::pin(async move {
            println!("[table {group}] {text}");
            Ok(())
        })
    }

    fn mute(
        &self,
        group: GroupId,
        user: UserId,
        duration: Duration,
    ) -> BoxFuture<'static, HostResult<()>> {
        Box::pin(async move {
            println!(
                "[table {group}] * player {user} is muted for {} seconds *",
                duration.as_secs()
            );
            Ok(())
        })
    }

    fn member_role(
        &self,
        _group: GroupId,
        _user: UserId,
    ) -> BoxFuture<'static, HostResult<MemberRole>> {
        let role = if self.admin.load(Ordering::SeqCst) {
            MemberRole::Admin
        } else {
            MemberRole::Member
        };
        Box::pin(async move { Ok(role) })
    }
}

/// Configure tracing subscribers so engine logs land next to the table talk.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
