//! Soul loop
//!
//! The introspective half of the system: a persistent memory store, an
//! emotional state map, a reflection generator, and
//! [`SoulLoopController`], which drives them for a number of cycles.
//! What happens inside a cycle is a pluggable [`SoulCycle`] strategy;
//! the shipped default only records that the placeholder ran, the real
//! cycle logic is meant to be supplied locally.

pub mod emotion;
pub mod memory;
pub mod reflection;

pub use emotion::{EmotionEngine, EMOTIONS_FILE_NAME};
pub use memory::{MemoryEngine, MEMORY_FILE_NAME};
pub use reflection::{EchoInsight, InsightHook, ReflectionEngine, REFLECTIONS_FILE_NAME};

use crate::error::Result;

/// One iteration of the soul loop, applied to all three engines.
pub trait SoulCycle: Send {
    fn cycle(
        &self,
        memory: &mut MemoryEngine,
        emotions: &mut EmotionEngine,
        reflections: &mut ReflectionEngine,
    ) -> Result<()>;
}

/// Default cycle: records that the placeholder was called and does
/// nothing.
pub struct NoOpCycle;

impl SoulCycle for NoOpCycle {
    fn cycle(
        &self,
        _memory: &mut MemoryEngine,
        _emotions: &mut EmotionEngine,
        _reflections: &mut ReflectionEngine,
    ) -> Result<()> {
        tracing::debug!("executing proprietary soul cycle (placeholder)");
        Ok(())
    }
}

/// Coordinates the memory, emotion and reflection engines.
pub struct SoulLoopController {
    memory: MemoryEngine,
    emotions: EmotionEngine,
    reflections: ReflectionEngine,
    cycle: Box<dyn SoulCycle>,
}

impl SoulLoopController {
    pub fn new(
        memory: MemoryEngine,
        emotions: EmotionEngine,
        reflections: ReflectionEngine,
    ) -> Self {
        Self {
            memory,
            emotions,
            reflections,
            cycle: Box::new(NoOpCycle),
        }
    }

    /// Replace the cycle strategy.
    pub fn with_cycle(mut self, cycle: impl SoulCycle + 'static) -> Self {
        self.cycle = Box::new(cycle);
        self
    }

    /// Run `iterations` cycles. A cycle error aborts the remaining
    /// iterations; state mutated by completed cycles is kept.
    pub fn run_loop(&mut self, iterations: usize) -> Result<()> {
        tracing::info!("starting soul loop for {} iterations", iterations);
        for i in 0..iterations {
            tracing::debug!("soul loop iteration {}", i + 1);
            self.cycle
                .cycle(&mut self.memory, &mut self.emotions, &mut self.reflections)?;
        }
        Ok(())
    }

    /// Persist all three engines.
    pub fn save_all(&self) -> Result<()> {
        self.memory.save()?;
        self.emotions.save()?;
        self.reflections.save()
    }

    pub fn memory(&self) -> &MemoryEngine {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryEngine {
        &mut self.memory
    }

    pub fn emotions(&self) -> &EmotionEngine {
        &self.emotions
    }

    pub fn emotions_mut(&mut self) -> &mut EmotionEngine {
        &mut self.emotions
    }

    pub fn reflections(&self) -> &ReflectionEngine {
        &self.reflections
    }

    pub fn reflections_mut(&mut self) -> &mut ReflectionEngine {
        &mut self.reflections
    }
}
