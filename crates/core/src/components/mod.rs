//! Component catalog.
//!
//! The fixed set of hardware-model descriptors a test system is assembled from:
//! 1. **Cache hierarchy:** `MesiTwoLevelCacheHierarchy`.
//! 2. **Memory:** `Hbm2Stack`.
//! 3. **Generators:** Linear, random, and GUPS traffic sources, built through the generator factory.
//!
//! Descriptors are immutable once built. They carry configuration only; realizing
//! them is the backend's job.

/// Two-level MESI cache hierarchy.
pub mod cache;

/// Traffic generators and the generator factory.
pub mod generator;

/// HBM2 memory stack.
pub mod memory;

pub use cache::{CACHE_LINE_BYTES, CacheLevel, MesiTwoLevelCacheHierarchy};
pub use generator::{
    GeneratorDescriptor, GeneratorKind, GeneratorParams, GupsGenerator, TrafficGenerator,
    build_generator, build_generator_named,
};
pub use memory::Hbm2Stack;
