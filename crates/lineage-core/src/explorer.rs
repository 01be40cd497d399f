//! # Explorer
//!
//! Read-only facade over a built `ProfileStore` and its policies.
//!
//! Every query re-derives chains and merges from the store; nothing is cached,
//! so an explorer over a category-filtered store simply sees shorter chains.

use crate::chain::{Chain, ChainWalker};
use crate::descendants::DescendantIndex;
use crate::ingestor::{IngestReport, Ingestor};
use crate::merge::{ComparisonTable, EffectiveMatrix, EffectiveSettings, Merger, SettingPolicy};
use crate::metrics::CorpusMetrics;
use crate::resolver::{Resolution, Resolver, ResolverPolicy};
use crate::store::ProfileStore;
use crate::types::{Category, LineageError, Profile, ProfileId, ProfileRecord};
use std::collections::BTreeSet;

/// A loaded corpus plus the policies used to query it.
#[derive(Debug, Clone, Default)]
pub struct Explorer {
    store: ProfileStore,
    resolver_policy: ResolverPolicy,
    setting_policy: SettingPolicy,
}

impl Explorer {
    #[must_use]
    pub fn new(
        store: ProfileStore,
        resolver_policy: ResolverPolicy,
        setting_policy: SettingPolicy,
    ) -> Self {
        Self {
            store,
            resolver_policy,
            setting_policy,
        }
    }

    /// Build a store from records in one pass, then wrap it.
    pub fn from_records<I>(
        records: I,
        categories: Option<&BTreeSet<Category>>,
        resolver_policy: ResolverPolicy,
        setting_policy: SettingPolicy,
    ) -> (Self, IngestReport)
    where
        I: IntoIterator<Item = ProfileRecord>,
    {
        let mut store = ProfileStore::new();
        let report = Ingestor::ingest(&mut store, records, categories);
        (Self::new(store, resolver_policy, setting_policy), report)
    }

    // =========================================================================
    // COMPONENTS
    // =========================================================================

    #[must_use]
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    #[must_use]
    pub fn setting_policy(&self) -> &SettingPolicy {
        &self.setting_policy
    }

    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store, &self.resolver_policy)
    }

    #[must_use]
    pub fn walker(&self) -> ChainWalker<'_> {
        ChainWalker::new(self.resolver())
    }

    #[must_use]
    pub fn merger(&self) -> Merger<'_> {
        Merger::new(&self.setting_policy)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Resolve a name, optionally from a requesting location.
    #[must_use]
    pub fn resolve(&self, display_name: &str, requesting_location: Option<&str>) -> Option<Resolution<'_>> {
        self.resolver().resolve(display_name, requesting_location)
    }

    /// Ancestor chain, specific to root.
    #[must_use]
    pub fn chain(&self, display_name: &str) -> Chain<'_> {
        self.walker().chain(display_name)
    }

    /// Direct and transitive descendants, by declared parent name.
    #[must_use]
    pub fn descendants(&self, display_name: &str) -> Vec<&Profile> {
        DescendantIndex::new(&self.store).descendants_of(display_name)
    }

    /// The parent a profile actually inherits from, resolved from the
    /// profile's own location.
    #[must_use]
    pub fn parent_of(&self, profile: &Profile) -> Option<&Profile> {
        let parent_name = profile.parent_name.as_deref()?;
        self.resolver()
            .resolve(parent_name, Some(&profile.origin_location))
            .map(|resolution| resolution.profile)
    }

    /// Effective settings of one profile over every key its chain declares.
    pub fn effective(&self, display_name: &str) -> Result<EffectiveSettings, LineageError> {
        let chain = self.existing_chain(display_name)?;
        Ok(self.merger().effective(&chain.root_first(), None))
    }

    /// Raw declared values along one chain, root first.
    pub fn comparison(&self, display_name: &str) -> Result<ComparisonTable, LineageError> {
        let chain = self.existing_chain(display_name)?;
        Ok(self.merger().comparison(&chain.root_first()))
    }

    /// Effective settings of several profiles of one category side by side.
    ///
    /// Fails on the first name that does not resolve, or if the resolved
    /// profiles span more than one category.
    pub fn effective_matrix<S: AsRef<str>>(&self, names: &[S]) -> Result<EffectiveMatrix, LineageError> {
        let walker = self.walker();
        let mut columns = Vec::with_capacity(names.len());

        for name in names {
            let chain = walker.chain(name.as_ref());
            let Some(head) = chain.head() else {
                return Err(LineageError::ProfileNotFound(name.as_ref().to_string()));
            };
            columns.push((head, chain.root_first()));
        }

        let categories: BTreeSet<Category> = columns.iter().map(|(head, _)| head.category).collect();
        if categories.len() > 1 {
            return Err(LineageError::MixedCategories(categories.into_iter().collect()));
        }

        Ok(self.merger().matrix(&columns))
    }

    /// Every profile connected to a user profile of the given categories.
    ///
    /// For each non-system profile in `categories`, its chain and its
    /// descendants are collected, filtered to `categories`, and returned once
    /// each in store order.
    #[must_use]
    pub fn user_branches(&self, categories: &BTreeSet<Category>) -> Vec<&Profile> {
        let walker = self.walker();
        let index = DescendantIndex::new(&self.store);
        let mut members: BTreeSet<ProfileId> = BTreeSet::new();

        for user in self
            .store
            .iter()
            .filter(|p| !p.is_system_provided && categories.contains(&p.category))
        {
            let chain = walker.chain_from(user);
            let related = chain
                .links()
                .iter()
                .copied()
                .chain(index.descendants_of(&user.display_name));
            members.extend(
                related
                    .filter(|p| categories.contains(&p.category))
                    .map(|p| p.id),
            );
        }

        members
            .into_iter()
            .filter_map(|id| self.store.get(id))
            .collect()
    }

    /// A profile's chain plus its descendants, once each in store order.
    ///
    /// `None` if the name does not resolve.
    #[must_use]
    pub fn family(&self, display_name: &str) -> Option<Vec<&Profile>> {
        let chain = self.chain(display_name);
        let head = chain.head()?;
        let members: BTreeSet<ProfileId> = chain
            .links()
            .iter()
            .copied()
            .chain(self.descendants(&head.display_name))
            .map(|p| p.id)
            .collect();
        Some(
            members
                .into_iter()
                .filter_map(|id| self.store.get(id))
                .collect(),
        )
    }

    /// Summary counts for the loaded corpus.
    #[must_use]
    pub fn metrics(&self) -> CorpusMetrics {
        CorpusMetrics::from_store(&self.store, &self.resolver_policy)
    }

    fn existing_chain(&self, display_name: &str) -> Result<Chain<'_>, LineageError> {
        let chain = self.chain(display_name);
        if chain.is_empty() {
            return Err(LineageError::ProfileNotFound(display_name.to_string()));
        }
        Ok(chain)
    }
}

// =============================================================================
// TESTS
// =============================================================================
