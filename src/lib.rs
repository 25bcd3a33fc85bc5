// ============================================================================
// MoonStone Library
// ============================================================================

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod engine;
pub mod evolution;
pub mod source;
pub mod storage;

// Re-export main types for convenience
pub use config::{DEFAULT_PREFIX, MoonStoneConfig};
pub use crate::core::{
    BoxError, EvolutionResult, MoonStoneError, Result, VersionError, VersionValue,
    combine_preferring_first_failure,
};
pub use diagnostics::{Diagnostics, LogDiagnostics, SilentDiagnostics};
pub use engine::MoonStone;
pub use evolution::{Evolution, EvolutionPredicate, EvolutionRegistry, PredicateEvolution};
pub use source::{PackageVersion, StaticVersion, VersionSource};
pub use storage::{FileStore, MemoryStore, ProgressStore};
