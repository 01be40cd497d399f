//! # Name Resolver
//!
//! Turns a possibly ambiguous display name into exactly one profile.
//!
//! Vendor-specific overrides live next to the profile that declared the
//! override, so when several profiles share a name the one closest on disk to
//! the requesting profile is taken as the intended one.
//!
//! ## Order of rules
//!
//! 1. No candidates: not found.
//! 2. One candidate: that one.
//! 3. With a requesting location, the best `ProximityScore`:
//!    same directory first, then the longest shared path prefix (at least one
//!    segment; ties go to the earlier candidate).
//! 4. A candidate under the trusted library directory.
//! 5. The first candidate in store order.

use crate::primitives::TRUSTED_LIBRARY;
use crate::store::ProfileStore;
use crate::types::Profile;
use serde::{Deserialize, Serialize};

// =============================================================================
// POLICY
// =============================================================================

/// Tunable part of resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverPolicy {
    /// `/`-separated directory sequence of the preferred fallback library.
    /// Empty disables the preference.
    pub trusted_library: String,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            trusted_library: TRUSTED_LIBRARY.to_string(),
        }
    }
}

impl ResolverPolicy {
    /// Whether `location` lies under the trusted library directory sequence.
    #[must_use]
    pub fn is_trusted(&self, location: &str) -> bool {
        let marker = path_segments(&self.trusted_library);
        if marker.is_empty() {
            return false;
        }
        path_segments(location)
            .windows(marker.len())
            .any(|window| window == marker.as_slice())
    }
}

// =============================================================================
// PROXIMITY SCORE
// =============================================================================

/// How close a candidate's origin is to the requesting origin.
///
/// Ordered from worst to best so that `max` picks the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProximityScore {
    /// No leading path segment in common.
    Unrelated,
    /// Number of leading path segments in common (always >= 1).
    SharedPrefix(usize),
    /// Both origins have the same parent directory.
    SameDirectory,
}

impl ProximityScore {
    /// Score `candidate` against `requesting`.
    #[must_use]
    pub fn between(candidate: &str, requesting: &str) -> Self {
        let candidate_segments = path_segments(candidate);
        let requesting_segments = path_segments(requesting);

        if dir_of(&candidate_segments) == dir_of(&requesting_segments) {
            return Self::SameDirectory;
        }

        let shared = candidate_segments
            .iter()
            .zip(&requesting_segments)
            .take_while(|(a, b)| a == b)
            .count();

        if shared == 0 {
            Self::Unrelated
        } else {
            Self::SharedPrefix(shared)
        }
    }

    /// The rule this score stands for. `None` for `Unrelated`, which never
    /// decides a resolution.
    #[must_use]
    pub fn match_rule(self) -> Option<MatchRule> {
        match self {
            Self::Unrelated => None,
            Self::SharedPrefix(n) => Some(MatchRule::SharedPrefix(n)),
            Self::SameDirectory => Some(MatchRule::SameDirectory),
        }
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Which rule picked the resolved profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "segments")]
pub enum MatchRule {
    /// Only one profile carries the name.
    Unique,
    /// Candidate sits in the requesting profile's directory.
    SameDirectory,
    /// Candidate shares the longest path prefix with the requester.
    SharedPrefix(usize),
    /// Candidate lives under the trusted library.
    TrustedLibrary,
    /// Nothing else applied; first candidate in store order.
    FirstLoaded,
}

/// A resolved profile together with how it was chosen.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub profile: &'a Profile,
    pub rule: MatchRule,
    /// Number of profiles that carried the requested name.
    pub candidates: usize,
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Resolves display names against a store.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a ProfileStore,
    policy: &'a ResolverPolicy,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(store: &'a ProfileStore, policy: &'a ResolverPolicy) -> Self {
        Self { store, policy }
    }

    /// Resolve `display_name`, optionally from the point of view of the
    /// profile loaded from `requesting_location`.
    ///
    /// Returns `None` only when no profile carries the name.
    #[must_use]
    pub fn resolve(
        &self,
        display_name: &str,
        requesting_location: Option<&str>,
    ) -> Option<Resolution<'a>> {
        let candidates = self.store.lookup_candidates(display_name);
        let count = candidates.len();
        let pick = |profile: &'a Profile, rule| Resolution {
            profile,
            rule,
            candidates: count,
        };

        match candidates.as_slice() {
            [] => return None,
            [only] => return Some(pick(*only, MatchRule::Unique)),
            _ => {}
        }

        let nearest = requesting_location.and_then(|requesting| closest(&candidates, requesting));
        if let Some((best, rule)) = nearest {
            return Some(pick(best, rule));
        }

        if let Some(trusted) = candidates
            .iter()
            .find(|p| self.policy.is_trusted(&p.origin_location))
        {
            return Some(pick(*trusted, MatchRule::TrustedLibrary));
        }

        candidates
            .first()
            .map(|first| pick(*first, MatchRule::FirstLoaded))
    }
}

/// Best-scoring candidate that is related to `requesting` at all, with the
/// proximity rule that picked it. Ties keep the earliest candidate.
fn closest<'a>(candidates: &[&'a Profile], requesting: &str) -> Option<(&'a Profile, MatchRule)> {
    let mut best: Option<(&'a Profile, ProximityScore)> = None;
    for candidate in candidates {
        let score = ProximityScore::between(&candidate.origin_location, requesting);
        if best.is_none_or(|(_, current)| score > current) {
            best = Some((*candidate, score));
        }
    }
    best.and_then(|(profile, score)| score.match_rule().map(|rule| (profile, rule)))
}

// =============================================================================
// PATH HELPERS
// =============================================================================

/// Split a location into path segments.
///
/// Both `/` and `\` separate; empty and `.` segments are dropped. An absolute
/// location starts with a `/` root segment, so two absolute paths always share
/// at least one segment.
#[must_use]
pub fn path_segments(location: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    if location.starts_with(['/', '\\']) {
        segments.push("/");
    }
    segments.extend(
        location
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != "."),
    );
    segments
}

/// Segments of the directory containing `location` (all but the last).
#[must_use]
pub fn directory_segments(location: &str) -> Vec<&str> {
    let mut segments = path_segments(location);
    segments.pop();
    segments.retain(|s| *s != "/");
    segments
}

fn dir_of<'s>(segments: &'s [&'s str]) -> &'s [&'s str] {
    segments.split_last().map(|(_, dir)| dir).unwrap_or(&[])
}

// =============================================================================
// TESTS
// =============================================================================
