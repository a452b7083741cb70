//! Integration test: soul loop engines and controller

use ascension::error::Result;
use ascension::soul::{
    EmotionEngine, MemoryEngine, ReflectionEngine, SoulCycle, SoulLoopController,
    EMOTIONS_FILE_NAME, MEMORY_FILE_NAME, REFLECTIONS_FILE_NAME,
};
use serde_json::json;
use tempfile::TempDir;

fn open_controller(dir: &TempDir) -> SoulLoopController {
    SoulLoopController::new(
        MemoryEngine::open(dir.path().join(MEMORY_FILE_NAME)).unwrap(),
        EmotionEngine::open(dir.path().join(EMOTIONS_FILE_NAME)).unwrap(),
        ReflectionEngine::open(dir.path().join(REFLECTIONS_FILE_NAME)).unwrap(),
    )
}

/// Each cycle records a memory, reflects on it, and cools the emotional
/// state a little.
struct JournalCycle;

impl SoulCycle for JournalCycle {
    fn cycle(
        &self,
        memory: &mut MemoryEngine,
        emotions: &mut EmotionEngine,
        reflections: &mut ReflectionEngine,
    ) -> Result<()> {
        let entry = json!({"event": "cycle", "index": memory.len()});
        let reflection = reflections.reflect(&entry)?;
        memory.add_memory(entry);
        reflections.add_reflection(reflection);
        emotions.update_emotion("momentum", 1.0);
        emotions.decay(0.1);
        Ok(())
    }
}

#[test]
fn test_loop_accumulates_memories_and_reflections() {
    let dir = TempDir::new().unwrap();
    let mut controller = open_controller(&dir).with_cycle(JournalCycle);
    controller.run_loop(4).unwrap();

    assert_eq!(controller.memory().len(), 4);
    assert_eq!(controller.reflections().len(), 4);
    let (name, intensity) = controller.emotions().dominant().unwrap();
    assert_eq!(name, "momentum");
    assert!(intensity > 0.0 && intensity < 1.0);
}

#[test]
fn test_state_survives_save_and_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut controller = open_controller(&dir).with_cycle(JournalCycle);
        controller.run_loop(2).unwrap();
        controller.save_all().unwrap();
    }

    let reopened = open_controller(&dir);
    assert_eq!(reopened.memory().len(), 2);
    assert_eq!(reopened.reflections().len(), 2);
    assert_eq!(reopened.emotions().len(), 1);
    assert_eq!(reopened.memory().search("cycle").len(), 2);
}

#[test]
fn test_zero_iterations_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let mut controller = open_controller(&dir).with_cycle(JournalCycle);
    controller.run_loop(0).unwrap();
    assert!(controller.memory().is_empty());
    assert!(controller.reflections().is_empty());
}

#[test]
fn test_engines_start_empty_without_files() {
    let dir = TempDir::new().unwrap();
    let controller = open_controller(&dir);
    assert!(controller.memory().is_empty());
    assert!(controller.emotions().is_empty());
    assert!(controller.reflections().is_empty());
    // nothing written until save_all
    assert!(!dir.path().join(MEMORY_FILE_NAME).exists());
}
