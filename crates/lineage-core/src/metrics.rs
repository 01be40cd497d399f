//! # Corpus Metrics
//!
//! Informational counts over a loaded store. Nothing here gates behaviour;
//! the numbers help spot data-quality problems (duplicated names, dangling
//! parents, cyclic `inherits`) in a profile corpus.

use crate::chain::{ChainWalker, Termination};
use crate::resolver::{Resolver, ResolverPolicy};
use crate::store::ProfileStore;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a loaded corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusMetrics {
    pub profiles: usize,
    /// Only categories with at least one profile.
    pub per_category: BTreeMap<Category, usize>,
    pub system_profiles: usize,
    pub user_profiles: usize,
    /// Display names carried by more than one profile.
    pub duplicated_names: usize,
    /// Profiles whose declared parent matches no stored name.
    pub dangling_parents: usize,
    /// Profiles whose chain ends in a cycle.
    pub cyclic_chains: usize,
    /// Length of the longest chain, counting the profile itself.
    pub longest_chain: usize,
}

impl CorpusMetrics {
    /// Compute metrics, walking one chain per stored profile.
    #[must_use]
    pub fn from_store(store: &ProfileStore, policy: &ResolverPolicy) -> Self {
        let walker = ChainWalker::new(Resolver::new(store, policy));
        let mut metrics = Self {
            profiles: store.len(),
            duplicated_names: store.duplicate_names().count(),
            ..Self::default()
        };

        for profile in store.iter() {
            *metrics.per_category.entry(profile.category).or_insert(0) += 1;
            if profile.is_system_provided {
                metrics.system_profiles += 1;
            } else {
                metrics.user_profiles += 1;
            }

            let dangling = profile
                .parent_name
                .as_deref()
                .is_some_and(|parent| store.lookup_candidates(parent).is_empty());
            if dangling {
                metrics.dangling_parents += 1;
            }

            let chain = walker.chain_from(profile);
            if matches!(chain.termination(), Termination::Cycle(_)) {
                metrics.cyclic_chains += 1;
            }
            metrics.longest_chain = metrics.longest_chain.max(chain.len());
        }

        metrics
    }
}

// =============================================================================
// TESTS
// =============================================================================
