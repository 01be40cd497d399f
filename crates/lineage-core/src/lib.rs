//! # lineage-core
//!
//! The deterministic inheritance engine for slicer profiles.
//!
//! A corpus of filament, machine and process profiles forms a forest where
//! each profile may name one parent through `inherits`. Names are not unique
//! across vendors, so this crate:
//! - stores every profile under a stable arena identity (`store`)
//! - resolves an ambiguous name by directory proximity (`resolver`)
//! - walks ancestor chains with cycle and dangling-parent termination (`chain`)
//! - finds descendants by declared parent name (`descendants`)
//! - merges a chain into effective setting values (`merge`)
//!
//! ## Architectural Constraints
//!
//! - No I/O: callers hand in already-parsed `ProfileRecord`s
//! - No async, no logging dependency
//! - `BTreeMap`/`BTreeSet` only, no floats, no randomness
//! - The store is built once and never mutated afterwards

// =============================================================================
// MODULES
// =============================================================================

pub mod chain;
pub mod descendants;
pub mod explorer;
pub mod ingestor;
pub mod merge;
pub mod metrics;
pub mod primitives;
pub mod resolver;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{Category, LineageError, Profile, ProfileId, ProfileRecord};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use chain::{Chain, ChainWalker, Termination};
pub use descendants::DescendantIndex;
pub use explorer::Explorer;
pub use ingestor::{IngestReport, Ingestor};
pub use merge::{
    ColumnHeader, ComparisonRow, ComparisonTable, EffectiveMatrix, EffectiveRow,
    EffectiveSettings, EffectiveValue, Merger, Presence, SettingPolicy,
};
pub use metrics::CorpusMetrics;
pub use resolver::{MatchRule, ProximityScore, Resolution, Resolver, ResolverPolicy};
pub use store::{ProfileDraft, ProfileStore};
