//! Centrality Metrics for Dependency Graphs
//!
//! Betweenness centrality identifies files that sit on many shortest
//! dependency paths between other files. Scores are recomputed from scratch
//! on every call; project graphs are small and rebuilt per run.

use super::DependencyGraph;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Compute normalized betweenness centrality for every node.
///
/// Uses Brandes' algorithm with breadth-first search, so shortest-path counts
/// are exact on the unweighted, directed graph. For a node `v`:
///
/// ```text
/// C(v) = sum over s != v != t of sigma_st(v) / sigma_st
/// ```
///
/// normalized by `(n - 1)(n - 2)`, which keeps every score in `[0, 1]`.
/// Graphs with two or fewer nodes have no intermediate nodes and score 0.
pub fn betweenness_centrality(graph: &DependencyGraph) -> BTreeMap<String, f64> {
    let petgraph = build_petgraph(graph);
    let n = petgraph.node_count();

    let mut betweenness = vec![0.0f64; n];
    for source in petgraph.node_indices() {
        accumulate_from_source(&petgraph, source, &mut betweenness);
    }

    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        0.0
    };

    petgraph
        .node_indices()
        .map(|idx| (petgraph[idx].to_string(), betweenness[idx.index()] * scale))
        .collect()
}

/// Single-source stage of Brandes: BFS for path counts, then dependency
/// accumulation in reverse BFS order.
fn accumulate_from_source(graph: &DiGraph<&str, ()>, source: NodeIndex, betweenness: &mut [f64]) {
    let n = graph.node_count();
    let mut order: Vec<NodeIndex> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut distance: Vec<Option<usize>> = vec![None; n];

    sigma[source.index()] = 1.0;
    distance[source.index()] = Some(0);

    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        order.push(v);
        let next = distance[v.index()].map_or(0, |d| d + 1);
        for w in graph.neighbors(v) {
            match distance[w.index()] {
                None => {
                    distance[w.index()] = Some(next);
                    queue.push_back(w);
                }
                Some(d) if d != next => continue,
                Some(_) => {}
            }
            sigma[w.index()] += sigma[v.index()];
            predecessors[w.index()].push(v);
        }
    }

    let mut delta = vec![0.0f64; n];
    while let Some(w) = order.pop() {
        for &v in &predecessors[w.index()] {
            delta[v.index()] += sigma[v.index()] / sigma[w.index()] * (1.0 + delta[w.index()]);
        }
        if w != source {
            betweenness[w.index()] += delta[w.index()];
        }
    }
}

/// Build a petgraph DiGraph from the dependency graph.
///
/// Nodes are inserted in sorted order, so node indices are stable for a
/// given edge set.
fn build_petgraph(graph: &DependencyGraph) -> DiGraph<&str, ()> {
    let mut petgraph = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
    let mut node_map = HashMap::with_capacity(graph.node_count());

    for node in graph.nodes() {
        node_map.insert(node, petgraph.add_node(node));
    }

    for node in graph.nodes() {
        let from = node_map[node];
        for target in graph.successors(node) {
            if let Some(&to) = node_map.get(target) {
                petgraph.add_edge(from, to, ());
            }
        }
    }

    petgraph
}
