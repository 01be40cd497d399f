//! # Profile Store
//!
//! The in-memory arena of ingested profiles.
//!
//! Every profile gets a stable `ProfileId` on insertion. Lookups by display
//! name go through a `display_name -> [ProfileId]` multimap, so two profiles
//! sharing a name never overwrite each other regardless of load order.
//!
//! ## Store keys
//!
//! The first profile with a given display name is keyed by the bare name.
//! Each later profile with the same name is keyed by the name plus a suffix
//! built from its two innermost origin directories, e.g. `PLA [vendor/filament]`.
//! When the second profile arrives the first one also becomes reachable
//! under its own suffixed alias, but its `store_key` stays the bare name.
//! Keys and aliases share one namespace: a collision gets a ` #n` suffix and
//! a key or alias, once issued, always points at the same profile.
//!
//! Because of that, the bare key always belongs to whichever profile was
//! inserted first. Callers that care (the CLI loader) must feed records in a
//! stable order.

use crate::types::{Category, Profile, ProfileId};
use serde_json::Value;
use std::collections::BTreeMap;

// =============================================================================
// PROFILE DRAFT
// =============================================================================

/// A profile that has not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub display_name: String,
    pub parent_name: Option<String>,
    pub origin_location: String,
    pub is_system_provided: bool,
    pub category: Category,
    pub attributes: BTreeMap<String, Value>,
}

// =============================================================================
// PROFILE STORE
// =============================================================================

/// Arena of profiles with name, key and parent indexes.
///
/// Built once by a single ingestion pass and read-only afterwards.
/// Uses `BTreeMap` exclusively for deterministic ordering.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    /// Arena: `ProfileId(i)` lives at index `i`.
    profiles: Vec<Profile>,

    /// Display name -> ids in insertion order.
    by_name: BTreeMap<String, Vec<ProfileId>>,

    /// Primary store key -> id. Keys are unique.
    by_key: BTreeMap<String, ProfileId>,

    /// Suffixed aliases for first occurrences of duplicated names.
    aliases: BTreeMap<String, ProfileId>,

    /// Declared parent name -> ids of the profiles declaring it.
    by_parent: BTreeMap<String, Vec<ProfileId>>,
}

impl ProfileStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one profile and return its identity.
    pub fn put(&mut self, draft: ProfileDraft) -> ProfileId {
        let id = ProfileId(self.profiles.len() as u32);
        let earlier: Vec<ProfileId> = self
            .by_name
            .get(&draft.display_name)
            .cloned()
            .unwrap_or_default();

        // Second occurrence: the first one's alias is reserved before the
        // newcomer picks its own key.
        if let [first] = earlier.as_slice() {
            let first_origin = &self.profiles[first.index()].origin_location;
            let alias = self.unique_key(disambiguated_key(&draft.display_name, first_origin));
            self.aliases.insert(alias, *first);
        }

        let store_key = if earlier.is_empty() {
            self.unique_key(draft.display_name.clone())
        } else {
            self.unique_key(disambiguated_key(
                &draft.display_name,
                &draft.origin_location,
            ))
        };

        if let Some(parent) = &draft.parent_name {
            self.by_parent.entry(parent.clone()).or_default().push(id);
        }
        self.by_name
            .entry(draft.display_name.clone())
            .or_default()
            .push(id);
        self.by_key.insert(store_key.clone(), id);

        self.profiles.push(Profile {
            id,
            store_key,
            display_name: draft.display_name,
            parent_name: draft.parent_name,
            origin_location: draft.origin_location,
            is_system_provided: draft.is_system_provided,
            category: draft.category,
            attributes: draft.attributes,
        });

        id
    }

    /// Return `key`, or `key #2`, `key #3`, ... if it is already taken as a
    /// store key or an alias.
    fn unique_key(&self, key: String) -> String {
        if !self.is_taken(&key) {
            return key;
        }
        let mut n: u32 = 2;
        loop {
            let candidate = format!("{key} #{n}");
            if !self.is_taken(&candidate) {
                return candidate;
            }
            n = n.saturating_add(1);
        }
    }

    fn is_taken(&self, key: &str) -> bool {
        self.by_key.contains_key(key) || self.aliases.contains_key(key)
    }

    /// Get a profile by identity.
    #[must_use]
    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.get(id.index())
    }

    /// Get a profile by store key or suffixed alias.
    #[must_use]
    pub fn get_by_key(&self, key: &str) -> Option<&Profile> {
        self.by_key
            .get(key)
            .or_else(|| self.aliases.get(key))
            .and_then(|id| self.get(*id))
    }

    /// Every profile whose display name equals `display_name`, in insertion
    /// order. Empty if none.
    #[must_use]
    pub fn lookup_candidates(&self, display_name: &str) -> Vec<&Profile> {
        self.ids_for(&self.by_name, display_name)
    }

    /// Profiles whose declared parent name equals `display_name` (one level).
    ///
    /// Matching is by name only: when several stored profiles share that
    /// display name, their children are not told apart.
    #[must_use]
    pub fn children_of(&self, display_name: &str) -> Vec<&Profile> {
        self.ids_for(&self.by_parent, display_name)
    }

    /// All profiles of one category, in insertion order.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&Profile> {
        self.iter().filter(|p| p.category == category).collect()
    }

    /// Display names held by more than one profile.
    pub fn duplicate_names(&self) -> impl Iterator<Item = (&str, &[ProfileId])> + '_ {
        self.by_name
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    /// All profiles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> + '_ {
        self.profiles.iter()
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store holds no profiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn ids_for<'a>(&'a self, index: &BTreeMap<String, Vec<ProfileId>>, name: &str) -> Vec<&'a Profile> {
        index
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get(*id))
            .collect()
    }
}

/// Build `name [outer/inner]` from the two innermost directories of `origin`.
///
/// Falls back to the single directory, or to the whole origin when it has no
/// directory part.
#[must_use]
pub fn disambiguated_key(display_name: &str, origin: &str) -> String {
    let dirs = crate::resolver::directory_segments(origin);
    let suffix = match dirs.as_slice() {
        [] => origin.to_string(),
        [only] => (*only).to_string(),
        [.., outer, inner] => format!("{outer}/{inner}"),
    };
    format!("{display_name} [{suffix}]")
}

// =============================================================================
// TESTS
// =============================================================================
