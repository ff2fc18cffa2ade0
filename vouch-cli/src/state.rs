use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$VOUCH_HOME`, else `~/.vouch`
pub fn vouch_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("VOUCH_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".vouch"))
}

pub fn ensure_vouch_home() -> Result<PathBuf> {
    let dir = vouch_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
