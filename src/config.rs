//! Runtime configuration loading for the game engine.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the engine looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "REVOLVER_DUEL_CONFIG_PATH";

const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
const DEFAULT_MISFIRE_PROBABILITY: f64 = 0.003;
const DEFAULT_MIN_BAN_SECONDS: u64 = 60;
const DEFAULT_MAX_BAN_SECONDS: u64 = 300;
const DEFAULT_TRIGGER_DELAY_SECONDS: u64 = 5;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Inactivity window after which a running game is ended automatically.
    pub timeout: Duration,
    /// Probability that an ordinary group message triggers a misfire.
    /// Always within `[0, 1]`.
    pub misfire_probability: f64,
    /// Shortest mute duration, in seconds, drawn for a penalty.
    pub min_ban_seconds: u64,
    /// Longest mute duration, in seconds, drawn for a penalty.
    /// Never below `min_ban_seconds`.
    pub max_ban_seconds: u64,
    /// Whether misfire sampling starts enabled for groups never seen before.
    pub misfire_enabled_by_default: bool,
    /// Delay between a classifier reply and the deferred trigger execution.
    pub trigger_delay: Duration,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults
    /// when the file is absent or unreadable.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration from file");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            misfire_probability: DEFAULT_MISFIRE_PROBABILITY,
            min_ban_seconds: DEFAULT_MIN_BAN_SECONDS,
            max_ban_seconds: DEFAULT_MAX_BAN_SECONDS,
            misfire_enabled_by_default: false,
            trigger_delay: Duration::from_secs(DEFAULT_TRIGGER_DELAY_SECONDS),
        }
    }
}

/// JSON representation of the configuration file. Every field is optional so
/// partial files only override what they mention.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    timeout_seconds: Option<u64>,
    #[serde(default)]
    misfire_probability: Option<f64>,
    #[serde(default)]
    min_ban_seconds: Option<u64>,
    #[serde(default)]
    max_ban_seconds: Option<u64>,
    #[serde(default)]
    misfire_enabled_by_default: Option<bool>,
    #[serde(default)]
    trigger_delay_seconds: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();

        let mut misfire_probability = raw
            .misfire_probability
            .unwrap_or(defaults.misfire_probability);
        if !(0.0..=1.0).contains(&misfire_probability) {
            warn!(
                value = misfire_probability,
                "misfire probability outside [0, 1]; clamping"
            );
            misfire_probability = misfire_probability.clamp(0.0, 1.0);
        }

        let mut min_ban_seconds = raw.min_ban_seconds.unwrap_or(defaults.min_ban_seconds);
        let mut max_ban_seconds = raw.max_ban_seconds.unwrap_or(defaults.max_ban_seconds);
        if min_ban_seconds > max_ban_seconds {
            warn!(
                min = min_ban_seconds,
                max = max_ban_seconds,
                "ban bounds are reversed; swapping"
            );
            std::mem::swap(&mut min_ban_seconds, &mut max_ban_seconds);
        }

        Self {
            timeout: raw
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            misfire_probability,
            min_ban_seconds,
            max_ban_seconds,
            misfire_enabled_by_default: raw
                .misfire_enabled_by_default
                .unwrap_or(defaults.misfire_enabled_by_default),
            trigger_delay: raw
                .trigger_delay_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.trigger_delay),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
