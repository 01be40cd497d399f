//! # Report Types
//!
//! JSON structures printed in `--json-mode`.

use lineage_core::{
    Category, Chain, CorpusMetrics, MatchRule, Profile, ProfileId, Resolution, Termination,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// PROFILE SUMMARY
// =============================================================================

/// The identifying fields of a profile, without its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: ProfileId,
    pub store_key: String,
    pub display_name: String,
    pub parent_name: Option<String>,
    pub origin_location: String,
    pub category: Category,
    pub is_system_provided: bool,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            store_key: profile.store_key.clone(),
            display_name: profile.display_name.clone(),
            parent_name: profile.parent_name.clone(),
            origin_location: profile.origin_location.clone(),
            category: profile.category,
            is_system_provided: profile.is_system_provided,
        }
    }
}

// =============================================================================
// STATUS REPORT
// =============================================================================

/// Corpus status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub input_dir: String,
    pub files_seen: usize,
    pub skipped: usize,
    pub filtered: usize,
    pub metrics: CorpusMetrics,
}

// =============================================================================
// RESOLUTION REPORT
// =============================================================================

/// Outcome of resolving one name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub name: String,
    pub requesting_location: Option<String>,
    pub found: bool,
    pub profile: Option<ProfileSummary>,
    pub rule: Option<MatchRule>,
    pub candidates: usize,
}

impl ResolutionReport {
    #[must_use]
    pub fn new(name: &str, requesting_location: Option<&str>, resolution: Option<&Resolution<'_>>) -> Self {
        Self {
            name: name.to_string(),
            requesting_location: requesting_location.map(str::to_string),
            found: resolution.is_some(),
            profile: resolution.map(|r| ProfileSummary::from(r.profile)),
            rule: resolution.map(|r| r.rule),
            candidates: resolution.map_or(0, |r| r.candidates),
        }
    }
}

// =============================================================================
// CHAIN REPORT
// =============================================================================

/// An ancestor chain, specific to root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainReport {
    pub name: String,
    pub links: Vec<ProfileSummary>,
    pub termination: Termination,
}

impl ChainReport {
    #[must_use]
    pub fn new(name: &str, chain: &Chain<'_>) -> Self {
        Self {
            name: name.to_string(),
            links: chain.links().iter().map(|p| ProfileSummary::from(*p)).collect(),
            termination: chain.termination().clone(),
        }
    }
}

// =============================================================================
// DESCENDANTS REPORT
// =============================================================================

/// Every profile inheriting from a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescendantsReport {
    pub name: String,
    pub descendants: Vec<ProfileSummary>,
}

// =============================================================================
// GRAPH REPORT
// =============================================================================

/// Inheritance edge between two reported nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeJson {
    pub parent: ProfileId,
    pub child: ProfileId,
}

/// Nodes and edges of an inheritance graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphReport {
    pub nodes: Vec<ProfileSummary>,
    pub edges: Vec<EdgeJson>,
}
