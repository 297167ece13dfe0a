//! Test board construction and the top-level `Root`.
//!
//! This module composes catalog components into the simulated machine. It performs:
//! 1. **Composition:** One cache hierarchy, one memory, one generator in the processor slot, and a board clock.
//! 2. **Slot checking:** `SystemBuilder` rejects missing or doubly supplied components.
//! 3. **Wrapping:** `Root` pairs the system with the system-mode flag handed to the backend.

use serde::Serialize;
use tracing::debug;

use crate::common::{Frequency, ValidationError};
use crate::components::{GeneratorDescriptor, Hbm2Stack, MesiTwoLevelCacheHierarchy};

/// A test board: a traffic generator in place of a processor, driving a cache
/// hierarchy and a memory stack on a shared clock.
///
/// Immutable once built; it fully determines the simulated topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemDescriptor {
    clk_freq: Frequency,
    processor: GeneratorDescriptor,
    memory: Hbm2Stack,
    cache_hierarchy: MesiTwoLevelCacheHierarchy,
}

impl SystemDescriptor {
    /// Board clock.
    pub const fn clk_freq(&self) -> Frequency {
        self.clk_freq
    }

    /// The generator acting as the processor.
    pub const fn processor(&self) -> &GeneratorDescriptor {
        &self.processor
    }

    /// The memory stack.
    pub const fn memory(&self) -> &Hbm2Stack {
        &self.memory
    }

    /// The cache hierarchy.
    pub const fn cache_hierarchy(&self) -> &MesiTwoLevelCacheHierarchy {
        &self.cache_hierarchy
    }

    /// Serializes the system as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; descriptors contain no maps with non-string
    /// keys, so this does not fail in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Composes a system from exactly one of each component and a board clock.
///
/// # Examples
///
/// ```
/// use memtest_core::board::build_system;
/// use memtest_core::components::{build_generator, GeneratorKind, GeneratorParams};
/// use memtest_core::components::{Hbm2Stack, MesiTwoLevelCacheHierarchy};
/// use memtest_core::config::ExperimentConfig;
///
/// let config = ExperimentConfig::default();
/// let memory = Hbm2Stack::new(&config.memory).unwrap();
/// let params = GeneratorParams {
///     duration: Some(config.traffic.duration),
///     rate: Some(config.traffic.rate),
///     max_addr: Some(memory.get_size()),
///     rd_perc: Some(50),
///     ..Default::default()
/// };
/// let generator = build_generator(GeneratorKind::Linear, &params).unwrap();
/// let cache = MesiTwoLevelCacheHierarchy::new(&config.cache).unwrap();
///
/// let system = build_system(cache, memory, generator, config.board.clk_freq);
/// assert_eq!(system.clk_freq().to_string(), "5GHz");
/// ```
pub fn build_system(
    cache_hierarchy: MesiTwoLevelCacheHierarchy,
    memory: Hbm2Stack,
    generator: GeneratorDescriptor,
    clk_freq: Frequency,
) -> SystemDescriptor {
    debug!(
        target: "memtest::board",
        processor = %generator.kind(),
        memory = %memory.size(),
        %clk_freq,
        "composed test board"
    );
    SystemDescriptor {
        clk_freq,
        processor: generator,
        memory,
        cache_hierarchy,
    }
}

/// Named-slot form of [`build_system`]; slots may be filled in any order.
#[derive(Debug, Default)]
pub struct SystemBuilder {
    clk_freq: Option<Frequency>,
    generator: Option<GeneratorDescriptor>,
    memory: Option<Hbm2Stack>,
    cache_hierarchy: Option<MesiTwoLevelCacheHierarchy>,
    duplicate: Option<&'static str>,
}

impl SystemBuilder {
    /// Creates a builder with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    fn fill<T>(slot: &mut Option<T>, duplicate: &mut Option<&'static str>, name: &'static str, value: T) {
        if slot.replace(value).is_some() && duplicate.is_none() {
            *duplicate = Some(name);
        }
    }

    /// Sets the board clock.
    #[must_use]
    pub fn clk_freq(mut self, clk_freq: Frequency) -> Self {
        Self::fill(&mut self.clk_freq, &mut self.duplicate, "clock frequency", clk_freq);
        self
    }

    /// Sets the generator that acts as the processor.
    #[must_use]
    pub fn generator(mut self, generator: GeneratorDescriptor) -> Self {
        Self::fill(&mut self.generator, &mut self.duplicate, "processor", generator);
        self
    }

    /// Sets the memory stack.
    #[must_use]
    pub fn memory(mut self, memory: Hbm2Stack) -> Self {
        Self::fill(&mut self.memory, &mut self.duplicate, "memory", memory);
        self
    }

    /// Sets the cache hierarchy.
    #[must_use]
    pub fn cache_hierarchy(mut self, cache_hierarchy: MesiTwoLevelCacheHierarchy) -> Self {
        Self::fill(
            &mut self.cache_hierarchy,
            &mut self.duplicate,
            "cache hierarchy",
            cache_hierarchy,
        );
        self
    }

    /// Composes the system.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateComponent` if a slot was set twice, or
    /// `ValidationError::MissingComponent` if a slot was never set.
    pub fn build(self) -> Result<SystemDescriptor, ValidationError> {
        if let Some(name) = self.duplicate {
            return Err(ValidationError::DuplicateComponent(name));
        }
        let cache_hierarchy = self
            .cache_hierarchy
            .ok_or(ValidationError::MissingComponent("cache hierarchy"))?;
        let memory = self
            .memory
            .ok_or(ValidationError::MissingComponent("memory"))?;
        let generator = self
            .generator
            .ok_or(ValidationError::MissingComponent("processor"))?;
        let clk_freq = self
            .clk_freq
            .ok_or(ValidationError::MissingComponent("clock frequency"))?;
        Ok(build_system(cache_hierarchy, memory, generator, clk_freq))
    }
}

/// The root handed to the backend: one system and the system-mode flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Root {
    /// Full-system (OS-booting) mode. Test boards always run in syscall-emulation mode.
    pub full_system: bool,
    /// The simulated machine.
    pub system: SystemDescriptor,
}

impl Root {
    /// Wraps `system` in a non-full-system root.
    pub fn new(system: SystemDescriptor) -> Self {
        Self {
            full_system: false,
            system,
        }
    }
}
