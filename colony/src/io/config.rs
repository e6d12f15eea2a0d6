//! Colony configuration stored under `.colony/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::roles::{GuardSettings, MinerSettings, RoleSettings};
use crate::core::types::MAX_CREEP_SIZE;

/// Colony configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the values the
/// roles were tuned with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColonyConfig {
    /// Maximum parts per creep body (at most 50).
    pub size_cap: usize,

    /// Write `.colony/ticks/<tick>.json` after every tick.
    pub write_tick_logs: bool,

    pub guard: GuardSettings,

    pub miner: MinerSettings,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            size_cap: MAX_CREEP_SIZE,
            write_tick_logs: true,
            guard: GuardSettings::default(),
            miner: MinerSettings::default(),
        }
    }
}

impl ColonyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size_cap == 0 || self.size_cap > MAX_CREEP_SIZE {
            return Err(anyhow!("size_cap must be within 1..={MAX_CREEP_SIZE}"));
        }
        if self.guard.repetition_limit == 0 {
            return Err(anyhow!("guard.repetition_limit must be > 0"));
        }
        if self.miner.repetition_limit == 0 {
            return Err(anyhow!("miner.repetition_limit must be > 0"));
        }
        if self.miner.container_range == 0 || self.miner.link_range == 0 {
            return Err(anyhow!("miner deposit ranges must be > 0"));
        }
        Ok(())
    }

    pub fn role_settings(&self) -> RoleSettings {
        RoleSettings {
            guard: self.guard.clone(),
            miner: self.miner.clone(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ColonyConfig::default()`.
pub fn load_config(path: &Path) -> Result<ColonyConfig> {
    if !path.exists() {
        let cfg = ColonyConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ColonyConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ColonyConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
