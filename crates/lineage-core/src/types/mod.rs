//! # Core Type Definitions
//!
//! This module contains the core types for the Lineage profile engine:
//! - Profile identity (`ProfileId`) and classification (`Category`)
//! - The ingested profile itself (`Profile`) and its raw input (`ProfileRecord`)
//! - Error types (`LineageError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer identities assigned in insertion order
//! - Implement `Ord` where they are used as `BTreeMap`/`BTreeSet` keys
//! - Keep setting attributes in a `BTreeMap` so iteration order never depends
//!   on hashing

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// PROFILE IDENTITY
// =============================================================================

/// Stable arena identity of a profile inside a `ProfileStore`.
///
/// Assigned at insertion time, starting from 0, and never reused.
/// Two profiles sharing a display name always have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub u32);

impl ProfileId {
    /// Position of this profile in the store arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// CATEGORY
// =============================================================================

/// The three kinds of slicer profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Filament,
    Machine,
    Process,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 3] = [Category::Filament, Category::Machine, Category::Process];

    /// The lowercase name used in documents and directory names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Filament => "filament",
            Category::Machine => "machine",
            Category::Process => "process",
        }
    }

    /// Parse a category name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| name.trim().eq_ignore_ascii_case(c.as_str()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PROFILE RECORD (input)
// =============================================================================

/// An already-parsed profile document together with where it came from.
///
/// This is the only input the engine accepts; reading and parsing files is
/// the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// The raw key/value document.
    pub document: Map<String, Value>,
    /// Source identifier, normally a `/`-separated file path.
    pub origin: String,
    /// Category to fall back on when neither the document nor the origin
    /// names one.
    #[serde(default)]
    pub category_hint: Option<Category>,
}

impl ProfileRecord {
    /// Create a record without a category hint.
    #[must_use]
    pub fn new(document: Map<String, Value>, origin: impl Into<String>) -> Self {
        Self {
            document,
            origin: origin.into(),
            category_hint: None,
        }
    }

    /// Create a record from any JSON value.
    ///
    /// Returns `LineageError::NotADocument` if the value is not an object.
    pub fn from_value(value: Value, origin: impl Into<String>) -> Result<Self, LineageError> {
        let origin = origin.into();
        match value {
            Value::Object(document) => Ok(Self::new(document, origin)),
            _ => Err(LineageError::NotADocument { origin }),
        }
    }

    /// Attach a category hint.
    #[must_use]
    pub fn with_category_hint(mut self, category: Category) -> Self {
        self.category_hint = Some(category);
        self
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// One named configuration document, immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Arena identity.
    pub id: ProfileId,
    /// Unique lookup key. Equals `display_name` unless an earlier profile
    /// already claimed that name.
    pub store_key: String,
    /// The `name` declared inside the document.
    pub display_name: String,
    /// The declared `inherits` target, by display name.
    pub parent_name: Option<String>,
    /// Where the document was loaded from. Used for disambiguation only.
    pub origin_location: String,
    /// `true` when the document's `from` field is `"system"`.
    pub is_system_provided: bool,
    pub category: Category,
    /// Every setting except the structural keys.
    pub attributes: BTreeMap<String, Value>,
}

impl Profile {
    /// Look up a single setting declared by this profile.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Whether this profile declares the given setting at all.
    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Last path segment of the origin location.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.origin_location
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.origin_location)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Lineage system.
///
/// Absence of a profile, dangling parents and cycles are NOT errors: they
/// surface as `None`, shorter chains and `Termination` markers respectively.
#[derive(Debug, Error)]
pub enum LineageError {
    /// The document does not declare a usable `name`.
    #[error("Profile document has no name: {origin}")]
    MissingName { origin: String },

    /// The parsed document root is not a JSON object.
    #[error("Profile document is not a JSON object: {origin}")]
    NotADocument { origin: String },

    /// The document exceeds the accepted size.
    #[error("Profile document {origin} is {size} bytes, limit is {limit}")]
    DocumentTooLarge {
        origin: String,
        size: u64,
        limit: u64,
    },

    /// A query that requires the profile to exist could not resolve it.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// A multi-profile view was requested over different categories.
    #[error("All profiles must be of the same category, found: {}", join_categories(.0))]
    MixedCategories(Vec<Category>),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A parse error in an input file.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

fn join_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// TESTS
// =============================================================================
