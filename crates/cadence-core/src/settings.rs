//! Timer settings: the configuration provider contract and its
//! TOML-backed implementation.
//!
//! The core consumes settings through the read-only [`TimerSettings`]
//! trait; the concrete [`Config`] is serialized to/from TOML at
//! `~/.config/cadence/config.toml` and overridden field-by-field by CLI
//! flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Read-only configuration surface consumed by the sequencer and the
/// session controller.
pub trait TimerSettings {
    fn work_duration(&self) -> Duration;
    fn short_break_duration(&self) -> Duration;
    fn long_break_duration(&self) -> Duration;
    fn phases_per_cycle(&self) -> usize;
    fn total_cycles(&self) -> usize;
    /// The grace period after a phase change during which the session
    /// waits for the user to acknowledge. `None` disables the window.
    fn acknowledgment_window(&self) -> Option<Duration>;
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cadence/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u64,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u64,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u64,
    /// Work and break phases count separately.
    #[serde(default = "default_phases_per_cycle")]
    pub phases_per_cycle: usize,
    #[serde(default = "default_total_cycles")]
    pub total_cycles: usize,
    /// Acknowledgment window in seconds; 0 disables it.
    #[serde(default = "default_acknowledgment_secs")]
    pub acknowledgment_secs: u64,
}

// Default functions
fn default_work_minutes() -> u64 {
    25
}
fn default_short_break_minutes() -> u64 {
    5
}
fn default_long_break_minutes() -> u64 {
    20
}
fn default_phases_per_cycle() -> usize {
    8
}
fn default_total_cycles() -> usize {
    1
}
fn default_acknowledgment_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            phases_per_cycle: default_phases_per_cycle(),
            total_cycles: default_total_cycles(),
            acknowledgment_secs: default_acknowledgment_secs(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default file on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_path(&Self::path()?)
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_path(&Self::path()?)
    }

    fn load_path(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_path(path)?;
                Ok(cfg)
            }
        }
    }

    fn save_path(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl TimerSettings for Config {
    fn work_duration(&self) -> Duration {
        Duration::from_secs(self.work_minutes.saturating_mul(60))
    }

    fn short_break_duration(&self) -> Duration {
        Duration::from_secs(self.short_break_minutes.saturating_mul(60))
    }

    fn long_break_duration(&self) -> Duration {
        Duration::from_secs(self.long_break_minutes.saturating_mul(60))
    }

    fn phases_per_cycle(&self) -> usize {
        self.phases_per_cycle
    }

    fn total_cycles(&self) -> usize {
        self.total_cycles
    }

    fn acknowledgment_window(&self) -> Option<Duration> {
        if self.acknowledgment_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.acknowledgment_secs))
        }
    }
}

/// Fixed in-memory settings, for tests and programmatic use.
#[derive(Debug, Clone)]
pub struct StubSettings {
    pub work: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    pub phases_per_cycle: usize,
    pub total_cycles: usize,
    pub acknowledgment: Option<Duration>,
}

impl Default for StubSettings {
    fn default() -> Self {
        Self {
            work: Duration::from_secs(25 * 60),
            short_break: Duration::from_secs(5 * 60),
            long_break: Duration::from_secs(20 * 60),
            phases_per_cycle: 8,
            total_cycles: 1,
            acknowledgment: None,
        }
    }
}

impl TimerSettings for StubSettings {
    fn work_duration(&self) -> Duration {
        self.work
    }

    fn short_break_duration(&self) -> Duration {
        self.short_break
    }

    fn long_break_duration(&self) -> Duration {
        self.long_break
    }

    fn phases_per_cycle(&self) -> usize {
        self.phases_per_cycle
    }

    fn total_cycles(&self) -> usize {
        self.total_cycles
    }

    fn acknowledgment_window(&self) -> Option<Duration> {
        self.acknowledgment
    }
}

/// Returns `~/.config/cadence[-dev]/` based on CADENCE_ENV.
///
/// Set CADENCE_ENV=dev to use a separate development data directory.
///
/// # Errors
///
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CADENCE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cadence-dev")
    } else {
        base_dir.join("cadence")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
