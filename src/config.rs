/// External tuning loader.
///
/// Reads `stealthdeck.toml` from the executable's directory (or CWD).
/// Falls back to the built-in tuning if the file is missing or incomplete.
///
/// ```toml
/// [alert]
/// suspicion_secs = 1.5
/// alert_secs = 3.0
/// suspicious_calm_secs = 3.0
/// alert_calm_secs = 8.0
/// suspicion_decay = 0.5
/// cascade_range = 10
///
/// [perception]
/// cone_threshold = 0.4
/// ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub const CONFIG_FILE: &str = "stealthdeck.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq, Default)]
pub struct TuningConfig {
    pub alert: AlertTuning,
    pub perception: PerceptionTuning,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlertTuning {
    /// Continuous sighting needed for Patrol → Suspicious.
    pub suspicion_threshold: Duration,
    /// Sighting time while Suspicious needed for Suspicious → Alert.
    pub alert_threshold: Duration,
    /// Unseen time after which Suspicious reverts to Patrol.
    pub suspicious_calm: Duration,
    /// Unseen time after which Alert reverts to Patrol.
    pub alert_calm: Duration,
    /// Patrol suspicion drains at `dt * suspicion_decay` while unseen.
    pub suspicion_decay: f64,
    /// Manhattan radius of the Alert cascade.
    pub cascade_range: i32,
    /// Chebyshev distance at which an Alert guard engages.
    pub combat_range: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerceptionTuning {
    /// Minimum dot product between facing and the direction to the player.
    pub cone_threshold: f32,
    /// Chebyshev distance within which a guard always senses the player.
    pub adjacency_range: i32,
}

impl Default for AlertTuning {
    fn default() -> Self {
        AlertTuning {
            suspicion_threshold: Duration::from_millis(1500),
            alert_threshold: Duration::from_millis(3000),
            suspicious_calm: Duration::from_millis(3000),
            alert_calm: Duration::from_millis(8000),
            suspicion_decay: 0.5,
            cascade_range: 10,
            combat_range: 1,
        }
    }
}

impl Default for PerceptionTuning {
    fn default() -> Self {
        PerceptionTuning { cone_threshold: 0.4, adjacency_range: 1 }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    alert: TomlAlert,
    #[serde(default)]
    perception: TomlPerception,
}

#[derive(Deserialize, Debug)]
struct TomlAlert {
    #[serde(default = "default_suspicion_secs")]
    suspicion_secs: f64,
    #[serde(default = "default_alert_secs")]
    alert_secs: f64,
    #[serde(default = "default_suspicious_calm_secs")]
    suspicious_calm_secs: f64,
    #[serde(default = "default_alert_calm_secs")]
    alert_calm_secs: f64,
    #[serde(default = "default_suspicion_decay")]
    suspicion_decay: f64,
    #[serde(default = "default_cascade_range")]
    cascade_range: i32,
    #[serde(default = "default_combat_range")]
    combat_range: i32,
}

#[derive(Deserialize, Debug)]
struct TomlPerception {
    #[serde(default = "default_cone_threshold")]
    cone_threshold: f32,
    #[serde(default = "default_adjacency_range")]
    adjacency_range: i32,
}

// ── Defaults ──

fn default_suspicion_secs() -> f64 { 1.5 }
fn default_alert_secs() -> f64 { 3.0 }
fn default_suspicious_calm_secs() -> f64 { 3.0 }
fn default_alert_calm_secs() -> f64 { 8.0 }
fn default_suspicion_decay() -> f64 { 0.5 }
fn default_cascade_range() -> i32 { 10 }
fn default_combat_range() -> i32 { 1 }
fn default_cone_threshold() -> f32 { 0.4 }
fn default_adjacency_range() -> i32 { 1 }

impl Default for TomlAlert {
    fn default() -> Self {
        TomlAlert {
            suspicion_secs: default_suspicion_secs(),
            alert_secs: default_alert_secs(),
            suspicious_calm_secs: default_suspicious_calm_secs(),
            alert_calm_secs: default_alert_calm_secs(),
            suspicion_decay: default_suspicion_decay(),
            cascade_range: default_cascade_range(),
            combat_range: default_combat_range(),
        }
    }
}

impl Default for TomlPerception {
    fn default() -> Self {
        TomlPerception {
            cone_threshold: default_cone_threshold(),
            adjacency_range: default_adjacency_range(),
        }
    }
}

// ── Loading ──

impl TuningConfig {
    /// Load tuning from `stealthdeck.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// A missing file means defaults; a broken one is logged and ignored.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join(CONFIG_FILE);
            if !path.exists() { continue; }
            match Self::from_path(&path) {
                Ok(cfg) => {
                    tracing::debug!(path = %path.display(), "loaded tuning");
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!("{e}; using default tuning");
                    return TuningConfig::default();
                }
            }
        }
        TuningConfig::default()
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: TomlConfig = toml::from_str(text)?;
        let alert = &raw.alert;

        if !alert.suspicion_decay.is_finite() || alert.suspicion_decay < 0.0 {
            return Err(ConfigError::Invalid {
                key: "alert.suspicion_decay",
                reason: format!("{} is not a finite non-negative rate", alert.suspicion_decay),
            });
        }
        if !raw.perception.cone_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                key: "perception.cone_threshold",
                reason: format!("{} is not a finite dot product", raw.perception.cone_threshold),
            });
        }
        if alert.cascade_range < 0 || alert.combat_range < 0 {
            return Err(ConfigError::Invalid {
                key: "alert.cascade_range / alert.combat_range",
                reason: "ranges must be non-negative".into(),
            });
        }
        if raw.perception.adjacency_range < 0 {
            return Err(ConfigError::Invalid {
                key: "perception.adjacency_range",
                reason: "range must be non-negative".into(),
            });
        }

        Ok(TuningConfig {
            alert: AlertTuning {
                suspicion_threshold: secs("alert.suspicion_secs", alert.suspicion_secs)?,
                alert_threshold: secs("alert.alert_secs", alert.alert_secs)?,
                suspicious_calm: secs("alert.suspicious_calm_secs", alert.suspicious_calm_secs)?,
                alert_calm: secs("alert.alert_calm_secs", alert.alert_calm_secs)?,
                suspicion_decay: alert.suspicion_decay,
                cascade_range: alert.cascade_range,
                combat_range: alert.combat_range,
            },
            perception: PerceptionTuning {
                cone_threshold: raw.perception.cone_threshold,
                adjacency_range: raw.perception.adjacency_range,
            },
        })
    }
}

fn secs(key: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("{value}: {e}"),
    })
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    dirs
}
