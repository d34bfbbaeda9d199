//! Project dependency graph over relative file paths.

pub mod centrality;

use crate::core::DependencyEdge;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

pub use centrality::betweenness_centrality;

/// Default number of central components reported per run
pub const DEFAULT_TOP_N: usize = 5;

/// Dependency graph for analyzing file relationships
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    // Every node has an entry, including pure targets with no outgoing edges.
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency edge between two nodes.
    ///
    /// Both endpoints materialize if they are not already present. Inserting
    /// an existing edge is a no-op.
    pub fn add_dependency(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let target = target.into();
        self.adjacency.entry(target.clone()).or_default();
        self.adjacency.entry(source.into()).or_default().insert(target);
    }

    /// All edges, ordered by `(source, target)`.
    pub fn get_dependencies(&self) -> Vec<DependencyEdge> {
        self.adjacency
            .iter()
            .flat_map(|(source, targets)| {
                targets
                    .iter()
                    .map(move |target| DependencyEdge::new(source.clone(), target.clone()))
            })
            .collect()
    }

    /// The `top_n` nodes with the highest betweenness centrality.
    ///
    /// Ties are broken by ascending node id so the ranking is stable for a
    /// given edge set.
    pub fn get_central_components(&self, top_n: usize) -> Vec<String> {
        let scores = betweenness_centrality(self);
        rank_by_score(&scores)
            .into_iter()
            .take(top_n)
            .map(|(node, _)| node.to_string())
            .collect()
    }

    /// Normalized betweenness score of every node
    pub fn betweenness_centrality(&self) -> BTreeMap<String, f64> {
        betweenness_centrality(self)
    }

    /// Targets of `node`, empty if the node is unknown
    pub fn dependencies_of(&self, node: &str) -> Vec<String> {
        self.adjacency
            .get(node)
            .map(|targets| targets.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    pub(crate) fn successors(&self, node: &str) -> impl Iterator<Item = &str> {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DependencyGraph::new(), |mut graph, (source, target)| {
                graph.add_dependency(source, target);
                graph
            })
    }
}

/// Descending score, ascending node id on ties.
fn rank_by_score(scores: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = scores
        .iter()
        .map(|(node, score)| (node.as_str(), *score))
        .collect();
    ranked.sort_by(|(a_node, a_score), (b_node, b_score)| {
        b_score
            .partial_cmp(a_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a_node.cmp(b_node))
    });
    ranked
}
