use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kitchen_core::{AmbientSettings, DurationBounds, Recipe, SessionSettings, sample_recipes};
use kitchen_engine::EngineConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub default_minutes: u32,
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub step_minutes: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: 20,
            min_minutes: 1,
            max_minutes: 50,
            step_minutes: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 3000,
            max_interval_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub volume: f32,
    pub max_voices: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            volume: engine.volume,
            max_voices: engine.max_voices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timer: TimerConfig,
    pub ambient: AmbientConfig,
    pub audio: AudioConfig,
    pub recipes: Vec<Recipe>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            ambient: AmbientConfig::default(),
            audio: AudioConfig::default(),
            recipes: sample_recipes(),
        }
    }
}

impl Config {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kitchen").join("config.toml"))
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring invalid config {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn default_duration_secs(&self) -> u32 {
        self.timer.default_minutes.saturating_mul(60)
    }

    pub fn session_settings(&self, seed: Option<u64>) -> SessionSettings {
        SessionSettings {
            bounds: DurationBounds {
                min_secs: self.timer.min_minutes.saturating_mul(60),
                max_secs: self.timer.max_minutes.saturating_mul(60),
                step_secs: self.timer.step_minutes.saturating_mul(60),
            },
            ambient: AmbientSettings {
                min_interval: Duration::from_millis(self.ambient.min_interval_ms),
                max_interval: Duration::from_millis(self.ambient.max_interval_ms),
            },
            seed,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            volume: self.audio.volume.clamp(0.0, 1.0),
            max_voices: self.audio.max_voices.max(1),
        }
    }
}
