//! Runtime settings
//!
//! Read from a JSON file named on the command line or by `BOMBFALL_CONFIG`.
//! Every field has a default, so a partial file is fine.

use std::fmt;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Environment variable naming a settings file
pub const ENV_VAR: &str = "BOMBFALL_CONFIG";

/// Why a settings file could not be used
#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Parse(serde_json::Error),
    /// Parsed, but the values make no sense
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "cannot read settings: {err}"),
            SettingsError::Parse(err) => write!(f, "malformed settings: {err}"),
            SettingsError::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// How long the final frame stays up after a game over
    pub game_over_pause_ms: u64,
    /// Ticks a direction key counts as held after its last press or repeat
    ///
    /// Only matters on terminals that never report key releases.
    pub hold_window_ticks: u64,
    /// Gameplay constants
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            tick_rate_hz: crate::consts::TICK_RATE_HZ,
            game_over_pause_ms: 2000,
            hold_window_ticks: 4,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path`, else from `BOMBFALL_CONFIG`, else defaults
    ///
    /// A file that cannot be used is logged and replaced by defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let from_env = std::env::var_os(ENV_VAR);
        let Some(path) = path.or(from_env.as_deref().map(Path::new)) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{} ({}), using defaults", err, path.display());
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::Invalid("tick_rate_hz must be positive".into()));
        }
        self.tuning.validate().map_err(SettingsError::Invalid)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }

    pub fn game_over_pause(&self) -> Duration {
        Duration::from_millis(self.game_over_pause_ms)
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
