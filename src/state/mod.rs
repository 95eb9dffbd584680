//! Shared application state: the service object owning every per-group map.

pub mod cylinder;
pub mod registry;
pub mod triggers;

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    host::{ChatHost, GroupId},
    store::ConfigStore,
};

use self::registry::GameRegistry;
use self::triggers::TriggerQueue;

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Per-group settings that persist across games.
///
/// Created lazily on first interaction with a group, written through to the
/// configured store on every change, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Whether ordinary messages in this group may trigger a misfire.
    pub misfire_enabled: bool,
}

/// Central application state owning the game registry, the per-group
/// settings, the deferred trigger queue, and the collaborator handles.
///
/// Built once at startup via [`AppState::init`] and torn down explicitly via
/// [`AppState::shutdown`]; nothing here lives in ambient globals.
pub struct AppState {
    config: AppConfig,
    host: Arc<dyn ChatHost>,
    store: Arc<dyn ConfigStore>,
    registry: GameRegistry,
    configs: DashMap<GroupId, GroupConfig>,
    triggers: TriggerQueue,
}

impl AppState {
    /// Build the shared state, priming the per-group settings from the store.
    ///
    /// A store that cannot be read is logged and treated as empty; refusing
    /// to start over a persistence hiccup would serve nobody.
    pub async fn init(
        config: AppConfig,
        host: Arc<dyn ChatHost>,
        store: Arc<dyn ConfigStore>,
    ) -> SharedState {
        let configs = match store.load().await {
            Ok(map) => {
                info!(groups = map.len(), "loaded persisted group settings");
                map.into_iter().collect()
            }
            Err(err) => {
                warn!(error = %err, "failed to load group settings; starting empty");
                DashMap::new()
            }
        };

        Arc::new(Self {
            config,
            host,
            store,
            registry: GameRegistry::new(),
            configs,
            triggers: TriggerQueue::new(),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Capability handle into the hosting chat framework.
    pub fn host(&self) -> &dyn ChatHost {
        self.host.as_ref()
    }

    /// Per-group game slots.
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Pending deferred triggers.
    pub fn triggers(&self) -> &TriggerQueue {
        &self.triggers
    }

    /// Settings for `group`, creating the entry with defaults on first touch.
    pub fn group_config(&self, group: GroupId) -> GroupConfig {
        *self
            .configs
            .entry(group)
            .or_insert_with(|| GroupConfig {
                misfire_enabled: self.config.misfire_enabled_by_default,
            })
            .value()
    }

    /// Update one group's settings and persist the whole map.
    ///
    /// The in-memory value is applied first; a store failure is logged and
    /// not rolled back, so a toggle survives the session even when the disk
    /// write does not.
    pub async fn update_group_config(&self, group: GroupId, config: GroupConfig) {
        self.configs.insert(group, config);

        let snapshot: HashMap<GroupId, GroupConfig> = self
            .configs
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        if let Err(err) = self.store.save(snapshot).await {
            warn!(group = %group, error = %err, "failed to persist group settings");
        }
    }

    /// Cancel every outstanding timer and scheduled trigger, then drop all
    /// per-group game state. Call once at teardown.
    pub async fn shutdown(&self) {
        self.registry.clear().await;
        self.triggers.clear();
        info!("game state cleared");
    }
}
