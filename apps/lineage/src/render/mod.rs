//! # Renderers
//!
//! Text output for query results:
//! - `markdown` - comparison and effective-settings tables
//! - `dot` - Graphviz inheritance graphs
//!
//! Both renderers work on plain data from `lineage-core`; neither resolves
//! names itself except through `GraphView::build`.

pub mod dot;
pub mod markdown;

use crate::report::{EdgeJson, GraphReport, ProfileSummary};
use lineage_core::{Explorer, Profile, ProfileId};
use std::collections::BTreeSet;

/// A set of profiles and the inheritance edges among them.
#[derive(Debug, Clone)]
pub struct GraphView<'a> {
    pub nodes: Vec<&'a Profile>,
    /// `(parent, child)` pairs, both ends in `nodes`.
    pub edges: Vec<(ProfileId, ProfileId)>,
}

impl<'a> GraphView<'a> {
    /// Connect `nodes` by resolving each node's parent from its own location.
    ///
    /// Edges to parents outside `nodes` are dropped.
    #[must_use]
    pub fn build(explorer: &'a Explorer, nodes: Vec<&'a Profile>) -> Self {
        let members: BTreeSet<ProfileId> = nodes.iter().map(|p| p.id).collect();
        let edges = nodes
            .iter()
            .filter_map(|child| {
                explorer
                    .parent_of(child)
                    .filter(|parent| members.contains(&parent.id) && parent.id != child.id)
                    .map(|parent| (parent.id, child.id))
            })
            .collect();
        Self { nodes, edges }
    }

    #[must_use]
    pub fn to_report(&self) -> GraphReport {
        GraphReport {
            nodes: self.nodes.iter().map(|p| ProfileSummary::from(*p)).collect(),
            edges: self
                .edges
                .iter()
                .map(|(parent, child)| EdgeJson {
                    parent: *parent,
                    child: *child,
                })
                .collect(),
        }
    }
}
