//! # Chain Walker
//!
//! Builds the ancestor chain of a profile by following `inherits` through the
//! `Resolver`.
//!
//! Each hop resolves the parent name from the previous link's own origin, not
//! from the caller's, so disambiguation tracks the directory the chain is
//! currently in.
//!
//! Walking stops at a root, at a dangling parent name, or when the resolver
//! hands back a profile already in the chain. None of these is an error.

use crate::resolver::Resolver;
use crate::types::{Profile, ProfileId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// CHAIN
// =============================================================================

/// Why a chain ended where it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum Termination {
    /// The requested name did not resolve; the chain is empty.
    Unresolved,
    /// The last link declares no parent.
    Root,
    /// The last link's parent name matches no profile.
    DanglingParent(String),
    /// The last link's parent resolved to a profile already in the chain.
    Cycle(ProfileId),
}

/// An ordered ancestor sequence: index 0 is the profile itself, the last
/// element is the furthest ancestor reached.
///
/// No profile appears twice.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    links: Vec<&'a Profile>,
    termination: Termination,
}

impl<'a> Chain<'a> {
    /// Links in specific-to-root order.
    #[must_use]
    pub fn links(&self) -> &[&'a Profile] {
        &self.links
    }

    /// Links in root-to-specific order, the order merging expects.
    #[must_use]
    pub fn root_first(&self) -> Vec<&'a Profile> {
        self.links.iter().rev().copied().collect()
    }

    /// The profile the chain was built for.
    #[must_use]
    pub fn head(&self) -> Option<&'a Profile> {
        self.links.first().copied()
    }

    /// The furthest ancestor reached.
    #[must_use]
    pub fn root(&self) -> Option<&'a Profile> {
        self.links.last().copied()
    }

    #[must_use]
    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Whether the given profile is one of the links.
    #[must_use]
    pub fn contains(&self, id: ProfileId) -> bool {
        self.links.iter().any(|p| p.id == id)
    }
}

// =============================================================================
// CHAIN WALKER
// =============================================================================

/// Walks `inherits` edges through a resolver.
#[derive(Debug, Clone, Copy)]
pub struct ChainWalker<'a> {
    resolver: Resolver<'a>,
}

impl<'a> ChainWalker<'a> {
    #[must_use]
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    /// Chain for `display_name`. Empty (and `Unresolved`) if the name does
    /// not resolve.
    #[must_use]
    pub fn chain(&self, display_name: &str) -> Chain<'a> {
        match self.resolver.resolve(display_name, None) {
            Some(resolution) => self.chain_from(resolution.profile),
            None => Chain {
                links: Vec::new(),
                termination: Termination::Unresolved,
            },
        }
    }

    /// Chain starting at an already resolved profile.
    #[must_use]
    pub fn chain_from(&self, start: &'a Profile) -> Chain<'a> {
        let mut visited = BTreeSet::new();
        let mut links = Vec::new();
        let mut current = start;

        let termination = loop {
            visited.insert(current.id);
            links.push(current);

            let Some(parent_name) = current.parent_name.as_deref() else {
                break Termination::Root;
            };

            match self
                .resolver
                .resolve(parent_name, Some(&current.origin_location))
            {
                None => break Termination::DanglingParent(parent_name.to_string()),
                Some(next) if visited.contains(&next.profile.id) => {
                    break Termination::Cycle(next.profile.id);
                }
                Some(next) => current = next.profile,
            }
        };

        Chain { links, termination }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverPolicy;
    use crate::store::{ProfileDraft, ProfileStore};
    use crate::types::Category;
    use std::collections::BTreeMap;

    fn put(store: &mut ProfileStore, name: &str, parent: Option<&str>, origin: &str) -> ProfileId {
        store.put(ProfileDraft {
            display_name: name.to_string(),
            parent_name: parent.map(str::to_string),
            origin_location: origin.to_string(),
            is_system_provided: true,
            category: Category::Filament,
            attributes: BTreeMap::new(),
        })
    }

    fn names(chain: &Chain<'_>) -> Vec<String> {
        chain.links().iter().map(|p| p.store_key.clone()).collect()
    }

    #[test]
    fn linear_chain_reaches_root() {
        let mut store = ProfileStore::new();
        let base = put(&mut store, "Base", None, "a/Base.json");
        let mid = put(&mut store, "Mid", Some("Base"), "a/Mid.json");
        let leaf = put(&mut store, "Leaf", Some("Mid"), "a/Leaf.json");
        let policy = ResolverPolicy::default();
        let walker = ChainWalker::new(Resolver::new(&store, &policy));

        let chain = walker.chain("Leaf");
        assert_eq!(names(&chain), vec!["Leaf", "Mid", "Base"]);
        assert_eq!(chain.termination(), &Termination::Root);
        assert_eq!(chain.head().map(|p| p.id), Some(leaf));
        assert_eq!(chain.root().map(|p| p.id), Some(base));
        assert!(chain.contains(mid));
        assert!(!walker.chain("Mid").contains(leaf));
        assert_eq!(
            chain.root_first().iter().map(|p| p.display_name.as_str()).collect::<Vec<_>>(),
            vec!["Base", "Mid", "Leaf"]
        );
    }

    #[test]
    fn unknown_name_gives_empty_chain() {
        let store = ProfileStore::new();
        let policy = ResolverPolicy::default();
        let chain = ChainWalker::new(Resolver::new(&store, &policy)).chain("Nope");
        assert!(chain.is_empty());
        assert!(chain.root().is_none());
        assert_eq!(chain.termination(), &Termination::Unresolved);
    }

    #[test]
    fn dangling_parent_truncates() {
        let mut store = ProfileStore::new();
        put(&mut store, "Leaf", Some("Ghost"), "a/Leaf.json");
        let policy = ResolverPolicy::default();
        let chain = ChainWalker::new(Resolver::new(&store, &policy)).chain("Leaf");

        assert_eq!(chain.len(), 1);
        assert_eq!(
            chain.termination(),
            &Termination::DanglingParent("Ghost".to_string())
        );
    }

    #[test]
    fn cycle_stops_without_repeating() {
        let mut store = ProfileStore::new();
        let a = put(&mut store, "A", Some("B"), "x/A.json");
        put(&mut store, "B", Some("C"), "x/B.json");
        put(&mut store, "C", Some("A"), "x/C.json");
        let policy = ResolverPolicy::default();
        let chain = ChainWalker::new(Resolver::new(&store, &policy)).chain("A");

        assert_eq!(names(&chain), vec!["A", "B", "C"]);
        assert_eq!(chain.termination(), &Termination::Cycle(a));
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut store = ProfileStore::new();
        let a = put(&mut store, "A", Some("A"), "x/A.json");
        let policy = ResolverPolicy::default();
        let chain = ChainWalker::new(Resolver::new(&store, &policy)).chain("A");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.termination(), &Termination::Cycle(a));
    }

    #[test]
    fn each_hop_uses_previous_link_location() {
        let mut store = ProfileStore::new();
        // Two "Base" profiles, two "Mid" profiles; the leaf lives with vendor B.
        put(&mut store, "Base", None, "vendor_a/filament/Base.json");
        let base_b = put(&mut store, "Base", None, "vendor_b/filament/Base.json");
        put(&mut store, "Mid", Some("Base"), "vendor_a/filament/Mid.json");
        let mid_b = put(&mut store, "Mid", Some("Base"), "vendor_b/filament/Mid.json");
        let leaf = put(&mut store, "Leaf", Some("Mid"), "vendor_b/filament/Leaf.json");
        let policy = ResolverPolicy::default();
        let chain = ChainWalker::new(Resolver::new(&store, &policy)).chain("Leaf");

        let ids: Vec<_> = chain.links().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![leaf, mid_b, base_b]);
    }
}
