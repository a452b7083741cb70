//! Persistent memory store
//!
//! [`MemoryEngine`] keeps an ordered list of memory entries (arbitrary
//! JSON values) and persists them to a JSON file. A corrupt store is not
//! fatal: it is logged and the engine starts empty, so one bad write
//! never bricks the loop.

use crate::error::{AscensionError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default file name for the memory store under `output_dir`.
pub const MEMORY_FILE_NAME: &str = "memory.json";

/// Stores and retrieves memory entries.
#[derive(Debug)]
pub struct MemoryEngine {
    path: PathBuf,
    memories: Vec<Value>,
}

impl MemoryEngine {
    /// Open the store at `path`, loading existing entries if the file is
    /// present. A file that fails to parse is treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let memories = load_entries(&path)?;
        Ok(Self { path, memories })
    }

    /// Append a new memory entry.
    pub fn add_memory(&mut self, entry: Value) {
        tracing::debug!("added memory entry: {}", entry);
        self.memories.push(entry);
    }

    /// All entries whose JSON text contains `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<&Value> {
        let needle = query.to_lowercase();
        let results: Vec<&Value> = self
            .memories
            .iter()
            .filter(|m| m.to_string().to_lowercase().contains(&needle))
            .collect();
        tracing::debug!("found {} memories matching '{}'", results.len(), query);
        results
    }

    /// One-line summary of the store.
    pub fn summarise(&self) -> String {
        format!("{} memories stored.", self.memories.len())
    }

    /// Write all entries to disk as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        tracing::info!("saving {} memories to {}", self.memories.len(), self.path.display());
        save_entries(&self.path, &self.memories)
    }

    /// Where the store persists.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Value] {
        &self.memories
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// Encrypt the store before persisting. The real transform is
    /// deliberately absent from this repository; see
    /// [`crate::crypto::encrypt_proprietary_data`].
    pub fn encrypt_memory(&self) -> Result<()> {
        Err(AscensionError::NotImplemented(
            "memory encryption must be implemented locally",
        ))
    }
}

pub(crate) fn load_entries(path: &Path) -> Result<Vec<Value>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(AscensionError::Persistence(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };
    match serde_json::from_str(&text) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            tracing::warn!("failed to decode {}, starting empty: {}", path.display(), e);
            Ok(Vec::new())
        }
    }
}

pub(crate) fn save_entries(path: &Path, entries: &[Value]) -> Result<()> {
    let text = serde_json::to_string_pretty(entries)
        .map_err(|e| AscensionError::Serialization(e.to_string()))?;
    std::fs::write(path, text)
        .map_err(|e| AscensionError::Persistence(format!("cannot write {}: {}", path.display(), e)))
}
