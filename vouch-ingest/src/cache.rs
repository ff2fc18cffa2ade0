//! Content-keyed cache of parsed registers.
//!
//! Re-submitting the same bytes returns the already-parsed dataset. Entries
//! are written once per distinct content and never invalidated.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::register::parse_register_bytes;
use crate::types::LoadedRegister;

pub type ContentKey = [u8; 32];

#[derive(Debug, Default)]
pub struct RegisterCache {
    entries: HashMap<ContentKey, Arc<LoadedRegister>>,
}

impl RegisterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// SHA-256 of the raw content
    pub fn content_key(bytes: &[u8]) -> ContentKey {
        let digest = Sha256::digest(bytes);
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        key
    }

    /// Parse `bytes`, or return the cached result for identical content.
    /// Parse failures are not cached.
    pub fn get_or_parse(&mut self, bytes: &[u8]) -> Result<Arc<LoadedRegister>> {
        let key = Self::content_key(bytes);
        if let Some(hit) = self.entries.get(&key) {
            log::debug!("register cache hit ({} rows)", hit.dataset.len());
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(parse_register_bytes(bytes)?);
        self.entries.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Read a file and go through [`Self::get_or_parse`].
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<Arc<LoadedRegister>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        self.get_or_parse(&bytes)
            .with_context(|| format!("parsing {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
