//! Shared test fixtures: a recording chat host, an in-memory settings store,
//! and a fully wired state bundle.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures::future::BoxFuture;

use crate::{
    commands::CommandContext,
    config::AppConfig,
    host::{ChatHost, GroupId, HostError, HostResult, MemberRole, UserId},
    state::{AppState, GroupConfig, SharedState},
    state::triggers::TriggerKey,
    store::{ConfigStore, StoreResult},
};

#[derive(Debug, Default)]
struct HostLog {
    sent: Vec<(GroupId, String)>,
    mutes: Vec<(GroupId, UserId, Duration)>,
}

#[derive(Debug, Default)]
struct HostInner {
    log: Mutex<HostLog>,
    roles: Mutex<HashMap<(GroupId, UserId), MemberRole>>,
    fail_mutes: AtomicBool,
    fail_lookups: AtomicBool,
}

/// Chat host double that records every outgoing call.
///
/// Unknown users report as ordinary members; failures are opt-in per
/// capability so a test can jam exactly one edge.
#[derive(Clone, Default)]
pub struct RecordingHost {
    inner: Arc<HostInner>,
}

impl RecordingHost {
    /// Report `user` as holding `role` in `group`.
    pub fn set_role(&self, group: GroupId, user: UserId, role: MemberRole) {
        self.inner.roles.lock().unwrap().insert((group, user), role);
    }

    /// Make every subsequent mute call fail.
    pub fn fail_mutes(&self) {
        self.inner.fail_mutes.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent role lookup fail.
    pub fn fail_role_lookups(&self) {
        self.inner.fail_lookups.store(true, Ordering::SeqCst);
    }

    /// Messages delivered so far, in order.
    pub fn sent(&self) -> Vec<(GroupId, String)> {
        self.inner.log.lock().unwrap().sent.clone()
    }

    /// Mutes issued so far, in order.
    pub fn mutes(&self) -> Vec<(GroupId, UserId, Duration)> {
        self.inner.log.lock().unwrap().mutes.clone()
    }
}

impl ChatHost for RecordingHost {
    fn send_message(&self, group: GroupId, text: String) -> BoxFuture<'static, HostResult<()>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            inner.log.lock().unwrap().sent.push((group, text));
            Ok(())
        })
    }

    fn mute(
        &self,
        group: GroupId,
        user: UserId,
        duration: Duration,
    ) -> BoxFuture<'static, HostResult<()>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            if inner.fail_mutes.load(Ordering::SeqCst) {
                return Err(HostError::CallFailed {
                    capability: "mute",
                    message: "refused by test".into(),
                });
            }
            inner
                .log
                .lock()
                .unwrap()
                .mutes
                .push((group, user, duration));
            Ok(())
        })
    }

    fn member_role(
        &self,
        group: GroupId,
        user: UserId,
    ) -> BoxFuture<'static, HostResult<MemberRole>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            if inner.fail_lookups.load(Ordering::SeqCst) {
                return Err(HostError::CallFailed {
                    capability: "member_role",
                    message: "refused by test".into(),
                });
            }
            let role = inner
                .roles
                .lock()
                .unwrap()
                .get(&(group, user))
                .copied()
                .unwrap_or(MemberRole::Member);
            Ok(role)
        })
    }
}

/// Settings store double backed by a shared in-memory map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    saved: Arc<Mutex<HashMap<GroupId, GroupConfig>>>,
}

impl MemoryStore {
    /// Snapshot of the last saved settings map.
    pub fn saved(&self) -> HashMap<GroupId, GroupConfig> {
        self.saved.lock().unwrap().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> BoxFuture<'static, StoreResult<HashMap<GroupId, GroupConfig>>> {
        let saved = Arc::clone(&self.saved);
        Box::pin(async move { Ok(saved.lock().unwrap().clone()) })
    }

    fn save(&self, configs: HashMap<GroupId, GroupConfig>) -> BoxFuture<'static, StoreResult<()>> {
        let saved = Arc::clone(&self.saved);
        Box::pin(async move {
            *saved.lock().unwrap() = configs;
            Ok(())
        })
    }
}

/// Fully wired state bundle with recording doubles on every edge.
pub struct TestEnv {
    /// The state under test.
    pub state: SharedState,
    /// Host double behind [`TestEnv::state`].
    pub host: RecordingHost,
    /// Store double behind [`TestEnv::state`].
    pub store: MemoryStore,
}

impl TestEnv {
    /// Bundle with the built-in default configuration.
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Bundle with a caller-tuned configuration.
    pub async fn with_config(config: AppConfig) -> Self {
        let host = RecordingHost::default();
        let store = MemoryStore::default();
        let state = AppState::init(config, Arc::new(host.clone()), Arc::new(store.clone())).await;
        Self { state, host, store }
    }
}

/// Group-chat context for `user`, not privileged.
pub fn command_context(group: GroupId, user: UserId) -> CommandContext {
    CommandContext {
        group_id: Some(group),
        user_id: user,
        display_name: format!("player-{user}"),
        message_id: format!("msg-{group}-{user}"),
        sender_is_admin: false,
    }
}

/// Private-chat context for `user`.
pub fn direct_context(user: UserId) -> CommandContext {
    CommandContext {
        group_id: None,
        ..command_context(0, user)
    }
}

/// Queue key for one classifier decision.
pub fn trigger_key(user: UserId, message_id: &str) -> TriggerKey {
    TriggerKey {
        user,
        message_id: message_id.to_owned(),
    }
}
