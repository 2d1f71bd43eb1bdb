//! Runner configuration, loaded from a JSON file over built-in defaults.

use anyhow::{bail, Context, Result};
use lenia_core::SimConfig;
use lenia_world::PaletteKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the config file when no CLI argument is given
pub const CONFIG_ENV: &str = "LENIA_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Simulator configuration
    pub sim: SimConfig,
    /// Steps to run; 0 runs until a shutdown signal arrives
    pub num_steps: u64,
    /// Progress log interval (steps)
    pub log_interval: u64,
    /// Randomize parameters and reseed every N steps
    pub randomize_interval: Option<u64>,
    /// Write a snapshot every N steps
    pub snapshot_interval: Option<u64>,
    pub snapshot_dir: PathBuf,
    /// Write a PNG frame every N steps
    pub frame_interval: Option<u64>,
    pub frame_dir: PathBuf,
    pub palette: PaletteKind,
    /// Weight of the previous frame in trail blending; 0 disables trails
    pub trail_keep: f32,
    /// Resume from this snapshot instead of seeding fresh
    pub restore_from: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            num_steps: 1_000,
            log_interval: 100,
            randomize_interval: None,
            snapshot_interval: None,
            snapshot_dir: PathBuf::from("./data/snapshots"),
            frame_interval: None,
            frame_dir: PathBuf::from("./data/frames"),
            palette: PaletteKind::default(),
            trail_keep: 0.9,
            restore_from: None,
        }
    }
}

impl RunnerConfig {
    /// Read and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: RunnerConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// First CLI argument, then `LENIA_CONFIG`, then defaults
    pub fn load() -> Result<Self> {
        let path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match path {
            Some(path) => Self::from_file(&path),
            None => {
                info!("No configuration file given, using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.sim.validate()?;

        let intervals = [
            ("log_interval", Some(self.log_interval)),
            ("randomize_interval", self.randomize_interval),
            ("snapshot_interval", self.snapshot_interval),
            ("frame_interval", self.frame_interval),
        ];
        for (name, interval) in intervals {
            if interval == Some(0) {
                bail!("{} must be positive", name);
            }
        }

        if !(0.0..=1.0).contains(&self.trail_keep) {
            bail!("trail_keep must be within [0, 1], got {}", self.trail_keep);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lenia-runner-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.num_steps, 1_000);
        assert_eq!(config.palette, PaletteKind::Spectrum);
        assert!(config.snapshot_interval.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_merges_defaults() {
        let path = temp_file(
            "partial.json",
            r#"{
                "num_steps": 50,
                "palette": "fish",
                "frame_interval": 10,
                "sim": { "world": { "width": 32, "height": 32 }, "params": { "kernel_radius": 5.0 } }
            }"#,
        );
        let config = RunnerConfig::from_file(&path).unwrap();

        assert_eq!(config.num_steps, 50);
        assert_eq!(config.palette, PaletteKind::Fish);
        assert_eq!(config.frame_interval, Some(10));
        assert_eq!(config.sim.world.width, 32);
        assert_eq!(config.sim.params.kernel_radius, 5.0);
        assert_eq!(config.sim.params.growth.m, 0.3);
        assert_eq!(config.log_interval, 100);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = RunnerConfig {
            snapshot_interval: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_invalid_sim() {
        let path = temp_file("bad.json", r#"{ "sim": { "world": { "width": 0 } } }"#);
        assert!(RunnerConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let path = std::env::temp_dir().join("lenia-runner-does-not-exist.json");
        assert!(RunnerConfig::from_file(&path).is_err());
    }
}
