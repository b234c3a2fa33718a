//! Shortest paths on weighted graphs given as adjacency maps.
//!
//! This is independent of the grid: nodes are plain numbers and every edge
//! carries its own weight.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Display,
    str::FromStr,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::Error, frontier::OpenSet};

pub type Node = u32;

pub const MAX_NODES: usize = 1000;
pub const MAX_EDGES_PER_NODE: usize = 100;
pub const MAX_WEIGHT: u32 = 1_000_000;

/// Directed graph, node -> (neighbor -> weight).
///
/// Ordered maps keep neighbor iteration, and so tie-breaking between equally
/// short paths, deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedGraph {
    edges: BTreeMap<Node, BTreeMap<Node, u32>>,
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the edge `from -> to`
    pub fn add_edge(&mut self, from: Node, to: Node, weight: u32) {
        self.edges.entry(from).or_default().insert(to, weight);
    }

    /// Add the edge in both directions
    pub fn connect(&mut self, a: Node, b: Node, weight: u32) {
        self.add_edge(a, b, weight);
        self.add_edge(b, a, weight);
    }

    /// Number of nodes that have an adjacency entry
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self, node: Node) -> impl Iterator<Item = (Node, u32)> + '_ {
        self.edges
            .get(&node)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(&n, &w)| (n, w)))
    }

    /// Check the size limits accepted from untrusted input
    pub fn validate(&self) -> Result<(), Error> {
        if self.edges.is_empty() {
            return Err(Error::MalformedGraph("graph is empty".to_string()));
        }
        if self.edges.len() > MAX_NODES {
            return Err(Error::MalformedGraph(format!(
                "more than {} nodes",
                MAX_NODES
            )));
        }
        for (node, edges) in &self.edges {
            if edges.len() > MAX_EDGES_PER_NODE {
                return Err(Error::MalformedGraph(format!(
                    "node {} has more than {} edges",
                    node, MAX_EDGES_PER_NODE
                )));
            }
            if let Some((to, weight)) = edges.iter().find(|&(_, &w)| w > MAX_WEIGHT) {
                return Err(Error::MalformedGraph(format!(
                    "edge {} -> {} weighs {}, the limit is {}",
                    node, to, weight, MAX_WEIGHT
                )));
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GraphAlgorithm {
    Dijkstra,
}

impl GraphAlgorithm {
    pub const ALL: [GraphAlgorithm; 1] = [GraphAlgorithm::Dijkstra];

    /// Lowercase, dash separated name used for lookups
    pub fn slug(&self) -> String {
        slugify(&self.to_string())
    }

    /// Slug and label of every algorithm
    pub fn available() -> Vec<(String, String)> {
        Self::ALL
            .iter()
            .map(|a| (a.slug(), a.to_string()))
            .collect()
    }

    /// Nodes from `start` to `end`, both included. Empty if `end` cannot be
    /// reached.
    pub fn shortest_path(&self, graph: &WeightedGraph, start: Node, end: Node) -> Vec<Node> {
        match self {
            GraphAlgorithm::Dijkstra => dijkstra(graph, start, end),
        }
    }
}

impl Display for GraphAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphAlgorithm::Dijkstra => write!(f, "Dijkstra"),
        }
    }
}

impl FromStr for GraphAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = slugify(s);
        Self::ALL
            .into_iter()
            .find(|a| a.slug() == slug)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn dijkstra(graph: &WeightedGraph, start: Node, end: Node) -> Vec<Node> {
    if start == end {
        return vec![start];
    }

    let mut dist: HashMap<Node, usize> = HashMap::from([(start, 0)]);
    let mut previous: HashMap<Node, Node> = HashMap::new();
    let mut closed = HashSet::new();
    let mut open = OpenSet::seeded(start, 0);

    while let Some(node) = open.pop() {
        if !closed.insert(node) {
            continue;
        }
        if node == end {
            break;
        }

        let current = dist.get(&node).copied().unwrap_or_default();
        for (next, weight) in graph.neighbors(node) {
            let tentative = current.saturating_add(weight as usize);
            if dist.get(&next).is_some_and(|&d| tentative >= d) {
                continue;
            }
            dist.insert(next, tentative);
            previous.insert(next, node);
            open.push(next, tentative);
        }
    }

    if !previous.contains_key(&end) {
        debug!("node {} unreachable from {}", end, start);
        return Vec::new();
    }

    let mut path = vec![end];
    let mut current = end;
    while let Some(&p) = previous.get(&current) {
        path.push(p);
        current = p;
    }
    path.reverse();

    debug!(
        "shortest path {} -> {}: {} nodes, cost {}",
        start,
        end,
        path.len(),
        dist.get(&end).copied().unwrap_or_default()
    );
    path
}

/// A shortest path query as it arrives over the wire
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphRequest {
    pub graph: WeightedGraph,
    pub start: Node,
    pub end: Node,
}

impl GraphRequest {
    /// Validate the graph and run `algorithm` on it
    pub fn solve(&self, algorithm: GraphAlgorithm) -> Result<Vec<Node>, Error> {
        self.graph.validate()?;
        Ok(algorithm.shortest_path(&self.graph, self.start, self.end))
    }
}

#[cfg(test)]
mod test {

    use super::*;

    /// 0 -> 1 directly is expensive, going through 2 and 3 is cheaper
    fn create_graph() -> WeightedGraph {
        let mut graph = WeightedGraph::new();
        graph.add_edge(0, 1, 10);
        graph.add_edge(0, 2, 1);
        graph.add_edge(2, 3, 2);
        graph.add_edge(3, 1, 3);
        graph.add_edge(1, 4, 1);
        graph
    }

    #[test]
    fn test_cheaper_detour() {
        let graph = create_graph();
        let path = GraphAlgorithm::Dijkstra.shortest_path(&graph, 0, 4);
        assert_eq!(path, vec![0, 2, 3, 1, 4]);
    }

    #[test]
    fn test_edges_are_directed() {
        let graph = create_graph();
        assert!(GraphAlgorithm::Dijkstra
            .shortest_path(&graph, 4, 0)
            .is_empty());
        // a node without any adjacency entry
        assert!(GraphAlgorithm::Dijkstra
            .shortest_path(&graph, 0, 42)
            .is_empty());
    }

    #[test]
    fn test_start_is_end() {
        let graph = create_graph();
        assert_eq!(GraphAlgorithm::Dijkstra.shortest_path(&graph, 3, 3), vec![3]);
    }

    #[test]
    fn test_undirected_ties() {
        // square with two equally long sides, the lower neighbor is tried first
        let mut graph = WeightedGraph::new();
        graph.connect(0, 1, 1);
        graph.connect(0, 2, 1);
        graph.connect(1, 3, 1);
        graph.connect(2, 3, 1);
        assert_eq!(graph.node_count(), 4);

        let path = GraphAlgorithm::Dijkstra.shortest_path(&graph, 0, 3);
        assert_eq!(path, vec![0, 1, 3]);
        assert_eq!(
            GraphAlgorithm::Dijkstra.shortest_path(&graph, 3, 0),
            vec![3, 1, 0]
        );
    }

    #[test]
    fn test_zero_weights() {
        let mut graph = WeightedGraph::new();
        graph.add_edge(0, 1, 0);
        graph.add_edge(1, 2, 0);
        graph.add_edge(0, 2, 1);
        assert_eq!(
            GraphAlgorithm::Dijkstra.shortest_path(&graph, 0, 2),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(
            "Dijkstra".parse::<GraphAlgorithm>().unwrap(),
            GraphAlgorithm::Dijkstra
        );
        assert_eq!(
            "  DIJKSTRA ".parse::<GraphAlgorithm>().unwrap(),
            GraphAlgorithm::Dijkstra
        );
        assert!(matches!(
            "bellman ford".parse::<GraphAlgorithm>(),
            Err(Error::UnknownAlgorithm(name)) if name == "bellman ford"
        ));

        assert_eq!(
            GraphAlgorithm::available(),
            vec![("dijkstra".to_string(), "Dijkstra".to_string())]
        );
    }

    #[test]
    fn test_request_json() {
        let request: GraphRequest = serde_json::from_str(
            r#"{
                "graph": {"0": {"1": 4, "2": 1}, "2": {"1": 1}},
                "start": 0,
                "end": 1
            }"#,
        )
        .unwrap();

        assert_eq!(
            request.solve(GraphAlgorithm::Dijkstra).unwrap(),
            vec![0, 2, 1]
        );
    }

    #[test]
    fn test_validation() {
        let empty = GraphRequest {
            graph: WeightedGraph::new(),
            start: 0,
            end: 1,
        };
        assert!(matches!(
            empty.solve(GraphAlgorithm::Dijkstra),
            Err(Error::MalformedGraph(_))
        ));

        let mut heavy = WeightedGraph::new();
        heavy.add_edge(0, 1, MAX_WEIGHT + 1);
        assert!(matches!(heavy.validate(), Err(Error::MalformedGraph(_))));

        let mut wide = WeightedGraph::new();
        for n in 0..=MAX_EDGES_PER_NODE as Node {
            wide.add_edge(0, n + 1, 1);
        }
        assert!(wide.validate().is_err());

        // negative weights cannot be expressed
        assert!(serde_json::from_str::<WeightedGraph>(r#"{"0": {"1": -3}}"#).is_err());
    }
}
