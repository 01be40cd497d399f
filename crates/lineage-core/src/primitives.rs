//! # Innate Primitives
//!
//! Hardcoded defaults for the Lineage engine.
//!
//! Policies (`ResolverPolicy`, `SettingPolicy`) start from these values and
//! may be overridden by configuration; the structural keys may not.

/// Document keys that describe the profile itself rather than a setting.
///
/// They are never copied into `Profile::attributes`.
pub const STRUCTURAL_KEYS: [&str; 4] = ["name", "inherits", "from", "type"];

/// Value of the `from` field that marks a vendor-shipped profile.
pub const SYSTEM_ORIGIN: &str = "system";

/// Path segments of the bundled vendor-neutral filament library.
///
/// When a name is ambiguous and proximity gives no answer, a candidate living
/// under this directory sequence is preferred.
pub const TRUSTED_LIBRARY: &str = "system/OrcaFilamentLibrary";

/// Token that slicer documents use for "no value".
pub const PLACEHOLDER: &str = "-";

/// Substrings that mark a free-form script setting (matched case-insensitively).
pub const SCRIPT_KEY_MARKERS: [&str; 1] = ["gcode"];

/// Exact setting names that are free-form text (matched case-insensitively).
pub const SCRIPT_KEYS: [&str; 1] = ["filament_notes"];

/// Directory segments that name a category, in inference priority order.
pub const CATEGORY_SEGMENTS: [&str; 3] = ["process", "machine", "filament"];

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum size of a single profile document (16 MB).
///
/// Real profiles are a few kilobytes; anything this large is not a profile.
pub const MAX_DOCUMENT_SIZE: u64 = 16 * 1024 * 1024;
