//! Emotional state tracking
//!
//! [`EmotionEngine`] maps emotion names to intensities, decays them over
//! time, and persists the map as JSON. Intensities that decay below a
//! small threshold are dropped from the map entirely.

use crate::error::{AscensionError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default file name for the emotion state under `output_dir`.
pub const EMOTIONS_FILE_NAME: &str = "emotions.json";

/// Intensities below this are removed during decay.
const MIN_INTENSITY: f64 = 1e-6;

/// Tracks named emotion intensities.
#[derive(Debug)]
pub struct EmotionEngine {
    path: PathBuf,
    emotions: BTreeMap<String, f64>,
}

impl EmotionEngine {
    /// Open the state at `path`, loading existing intensities if the file
    /// is present. A file that fails to parse is treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let emotions = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        "failed to decode {}, starting empty: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AscensionError::Persistence(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(Self { path, emotions })
    }

    /// Set the intensity of an emotion, inserting it if new.
    pub fn update_emotion(&mut self, name: impl Into<String>, intensity: f64) {
        let name = name.into();
        tracing::debug!("updated emotion '{}' to intensity {:.3}", name, intensity);
        self.emotions.insert(name, intensity);
    }

    /// Current intensity of an emotion, if present.
    pub fn intensity(&self, name: &str) -> Option<f64> {
        self.emotions.get(name).copied()
    }

    /// Multiply every intensity by `1 - rate`, dropping emotions that
    /// fall below the minimum. Rates above 1.0 clear the map.
    pub fn decay(&mut self, rate: f64) {
        let factor = (1.0 - rate).max(0.0);
        for intensity in self.emotions.values_mut() {
            *intensity *= factor;
        }
        self.emotions.retain(|_, intensity| *intensity >= MIN_INTENSITY);
        tracing::debug!("decayed emotions by rate {:.3}", rate);
    }

    /// The strongest emotion and its intensity, or `None` when no
    /// emotions are present.
    pub fn dominant(&self) -> Option<(&str, f64)> {
        self.emotions
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, intensity)| (name.as_str(), *intensity))
    }

    /// Number of tracked emotions.
    pub fn len(&self) -> usize {
        self.emotions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty()
    }

    /// Write the state to disk as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        tracing::info!("saving {} emotions to {}", self.emotions.len(), self.path.display());
        let text = serde_json::to_string_pretty(&self.emotions)
            .map_err(|e| AscensionError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| {
            AscensionError::Persistence(format!("cannot write {}: {}", self.path.display(), e))
        })
    }

    /// Where the state persists.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Derive a combined affective state from the raw intensities. The
    /// real model is deliberately absent from this repository.
    pub fn affective_state(&self) -> Result<f64> {
        Err(AscensionError::NotImplemented(
            "affective state modelling must be implemented locally",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn engine(dir: &TempDir) -> EmotionEngine {
        EmotionEngine::open(dir.path().join(EMOTIONS_FILE_NAME)).unwrap()
    }

    #[test]
    fn test_update_and_dominant() {
        let dir = TempDir::new().unwrap();
        let mut emotions = engine(&dir);
        emotions.update_emotion("curiosity", 0.8);
        emotions.update_emotion("doubt", 0.3);

        assert_eq!(emotions.dominant(), Some(("curiosity", 0.8)));
        assert_eq!(emotions.intensity("doubt"), Some(0.3));
    }

    #[test]
    fn test_dominant_on_empty_state_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(engine(&dir).dominant(), None);
    }

    #[test]
    fn test_decay_scales_and_prunes() {
        let dir = TempDir::new().unwrap();
        let mut emotions = engine(&dir);
        emotions.update_emotion("awe", 1.0);
        emotions.update_emotion("flicker", 1e-6);

        emotions.decay(0.5);
        assert_eq!(emotions.intensity("awe"), Some(0.5));
        // fell below the minimum and was pruned
        assert_eq!(emotions.intensity("flicker"), None);
        assert_eq!(emotions.len(), 1);
    }

    #[test]
    fn test_decay_rate_above_one_clears() {
        let dir = TempDir::new().unwrap();
        let mut emotions = engine(&dir);
        emotions.update_emotion("awe", 1.0);
        emotions.decay(1.5);
        assert!(emotions.is_empty());
    }

    #[test]
    fn test_save_and_reopen_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(EMOTIONS_FILE_NAME);

        let mut emotions = EmotionEngine::open(&path).unwrap();
        emotions.update_emotion("resolve", 0.7);
        emotions.save().unwrap();

        let reopened = EmotionEngine::open(&path).unwrap();
        assert_eq!(reopened.intensity("resolve"), Some(0.7));
    }

    #[test]
    fn test_affective_state_placeholder_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            engine(&dir).affective_state(),
            Err(AscensionError::NotImplemented(_))
        ));
    }
}
