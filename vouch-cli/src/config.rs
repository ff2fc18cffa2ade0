use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_vouch_home, vouch_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplaySection,
    pub sampling: SamplingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSection {
    /// Used when --size is not given (capped at the population)
    pub default_size: usize,
    /// Used when --boundaries is not given
    pub default_boundaries: String,
    /// Fixed seed for every run; a fresh one is drawn and recorded when absent
    pub seed: Option<u64>,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            default_size: 10,
            default_boundaries: "1000,5000".to_string(),
            seed: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(vouch_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_vouch_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
