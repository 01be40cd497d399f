//! # Descendant Index
//!
//! Inverse traversal: every profile that declares a given name as an ancestor,
//! directly or through intermediate profiles.
//!
//! Children are matched by declared parent name only. If several stored
//! profiles share the ancestor's display name, a child naming it is counted
//! under all of them.

use crate::store::ProfileStore;
use crate::types::{Profile, ProfileId};
use std::collections::{BTreeSet, VecDeque};

/// Breadth-first descendant lookup over `ProfileStore::children_of`.
#[derive(Debug, Clone, Copy)]
pub struct DescendantIndex<'a> {
    store: &'a ProfileStore,
}

impl<'a> DescendantIndex<'a> {
    #[must_use]
    pub fn new(store: &'a ProfileStore) -> Self {
        Self { store }
    }

    /// All direct and transitive descendants of `display_name`.
    ///
    /// Each profile appears once, in breadth-first discovery order. A visited
    /// name set keeps cyclic `inherits` graphs finite.
    #[must_use]
    pub fn descendants_of(&self, display_name: &str) -> Vec<&'a Profile> {
        let mut descendants = Vec::new();
        let mut seen: BTreeSet<ProfileId> = BTreeSet::new();
        let mut visited: BTreeSet<&'a str> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        // The starting name is never queued again.
        queue.push_back(display_name);

        while let Some(current) = queue.pop_front() {
            for child in self.store.children_of(current) {
                if !seen.insert(child.id) {
                    continue;
                }
                descendants.push(child);
                if child.display_name != display_name && visited.insert(&child.display_name) {
                    queue.push_back(&child.display_name);
                }
            }
        }

        descendants
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProfileDraft;
    use crate::types::Category;
    use std::collections::BTreeMap;

    fn put(store: &mut ProfileStore, name: &str, parent: Option<&str>) {
        store.put(ProfileDraft {
            display_name: name.to_string(),
            parent_name: parent.map(str::to_string),
            origin_location: format!("x/{name}.json"),
            is_system_provided: false,
            category: Category::Filament,
            attributes: BTreeMap::new(),
        });
    }

    fn names(profiles: &[&Profile]) -> Vec<String> {
        profiles.iter().map(|p| p.display_name.clone()).collect()
    }

    #[test]
    fn finds_direct_and_transitive() {
        let mut store = ProfileStore::new();
        put(&mut store, "Base", None);
        put(&mut store, "Mid", Some("Base"));
        put(&mut store, "Other", Some("Base"));
        put(&mut store, "Leaf", Some("Mid"));

        let found = DescendantIndex::new(&store).descendants_of("Base");
        assert_eq!(names(&found), vec!["Mid", "Other", "Leaf"]);
    }

    #[test]
    fn leaf_has_no_descendants() {
        let mut store = ProfileStore::new();
        put(&mut store, "Base", None);
        put(&mut store, "Leaf", Some("Base"));
        assert!(DescendantIndex::new(&store).descendants_of("Leaf").is_empty());
        assert!(DescendantIndex::new(&store).descendants_of("Missing").is_empty());
    }

    #[test]
    fn cycle_terminates() {
        let mut store = ProfileStore::new();
        put(&mut store, "A", Some("B"));
        put(&mut store, "B", Some("A"));

        let found = DescendantIndex::new(&store).descendants_of("A");
        assert_eq!(names(&found), vec!["B", "A"]);
    }

    #[test]
    fn shared_names_are_not_distinguished() {
        let mut store = ProfileStore::new();
        put(&mut store, "PLA", None);
        put(&mut store, "PLA", None);
        put(&mut store, "PLA Black", Some("PLA"));

        let found = DescendantIndex::new(&store).descendants_of("PLA");
        assert_eq!(names(&found), vec!["PLA Black"]);
    }
}
