//! Reflection generation
//!
//! [`ReflectionEngine`] turns memory entries into reflections through a
//! pluggable [`InsightHook`] and persists the collection as JSON. The
//! default hook echoes the memory unchanged; the real insight algorithm
//! is meant to be supplied locally.

use crate::error::Result;
use crate::soul::memory;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default file name for stored reflections under `output_dir`.
pub const REFLECTIONS_FILE_NAME: &str = "reflections.json";

/// Strategy for deriving a reflection from a memory entry.
pub trait InsightHook: Send {
    fn generate(&self, memory: &Value) -> Result<Value>;
}

/// Default hook: the reflection is the memory itself.
pub struct EchoInsight;

impl InsightHook for EchoInsight {
    fn generate(&self, memory: &Value) -> Result<Value> {
        tracing::debug!("echo insight for memory: {}", memory);
        Ok(memory.clone())
    }
}

/// Generates and stores reflections.
pub struct ReflectionEngine {
    path: PathBuf,
    reflections: Vec<Value>,
    insight: Box<dyn InsightHook>,
}

impl ReflectionEngine {
    /// Open the store at `path`, loading existing reflections if the file
    /// is present. A file that fails to parse is treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let reflections = memory::load_entries(&path)?;
        Ok(Self {
            path,
            reflections,
            insight: Box::new(EchoInsight),
        })
    }

    /// Replace the insight hook.
    pub fn with_insight(mut self, hook: impl InsightHook + 'static) -> Self {
        self.insight = Box::new(hook);
        self
    }

    /// Generate a reflection from a memory entry via the insight hook.
    /// The result is returned, not stored; call [`add_reflection`]
    /// to keep it.
    ///
    /// [`add_reflection`]: ReflectionEngine::add_reflection
    pub fn reflect(&self, memory: &Value) -> Result<Value> {
        self.insight.generate(memory)
    }

    /// Append a reflection to the collection.
    pub fn add_reflection(&mut self, reflection: Value) {
        tracing::debug!("added reflection: {}", reflection);
        self.reflections.push(reflection);
    }

    /// One-line summary of the collection.
    pub fn summarise(&self) -> String {
        format!("{} reflections generated.", self.reflections.len())
    }

    /// Write all reflections to disk as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        tracing::info!(
            "saving {} reflections to {}",
            self.reflections.len(),
            self.path.display()
        );
        memory::save_entries(&self.path, &self.reflections)
    }

    /// Where the collection persists.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Value] {
        &self.reflections
    }

    pub fn len(&self) -> usize {
        self.reflections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reflections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_default_insight_echoes_memory() {
        let dir = TempDir::new().unwrap();
        let engine = ReflectionEngine::open(dir.path().join(REFLECTIONS_FILE_NAME)).unwrap();

        let memory = json!({"event": "first light"});
        let reflection = engine.reflect(&memory).unwrap();
        assert_eq!(reflection, memory);
        // reflect does not store
        assert!(engine.is_empty());
    }

    #[test]
    fn test_custom_insight_hook() {
        struct Tagging;
        impl InsightHook for Tagging {
            fn generate(&self, memory: &Value) -> Result<Value> {
                let mut out = memory.clone();
                out["insight"] = json!("noted");
                Ok(out)
            }
        }

        let dir = TempDir::new().unwrap();
        let engine = ReflectionEngine::open(dir.path().join(REFLECTIONS_FILE_NAME))
            .unwrap()
            .with_insight(Tagging);

        let reflection = engine.reflect(&json!({"event": "echo"})).unwrap();
        assert_eq!(reflection["insight"], "noted");
        assert_eq!(reflection["event"], "echo");
    }

    #[test]
    fn test_save_and_reopen_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(REFLECTIONS_FILE_NAME);

        let mut engine = ReflectionEngine::open(&path).unwrap();
        engine.add_reflection(json!({"theme": "growth"}));
        engine.save().unwrap();

        let reopened = ReflectionEngine::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.summarise(), "1 reflections generated.");
    }
}
