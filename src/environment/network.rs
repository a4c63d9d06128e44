//! Social network between households
//!
//! Undirected simple graphs built on petgraph from the shared generator. Node
//! `i` carries weight `i` and hosts the household with id `i`. Neighbour lists
//! are cached sorted once the graph is built, so iteration order depends only
//! on the seed.

use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

use crate::core::config::{NetworkConfig, NetworkKind};

#[derive(Debug, Clone)]
pub struct SocialNetwork {
    graph: UnGraph<usize, ()>,
    adjacency: Vec<Vec<usize>>,
}

impl SocialNetwork {
    /// Build the topology named in `config` over `nodes` households
    pub fn generate(config: &NetworkConfig, nodes: usize, rng: &mut ChaCha8Rng) -> Self {
        match config.kind {
            NetworkKind::ErdosRenyi => {
                let p = (config.nearest_neighbours as f64 / nodes.max(1) as f64).min(1.0);
                Self::erdos_renyi(nodes, p, rng)
            }
            NetworkKind::BarabasiAlbert => {
                Self::barabasi_albert(nodes, config.edges as usize, rng)
            }
            NetworkKind::WattsStrogatz => Self::watts_strogatz(
                nodes,
                config.nearest_neighbours as usize,
                config.connection_probability,
                rng,
            ),
            NetworkKind::NoNetwork => Self::isolated(nodes),
        }
    }

    /// Nodes with no edges
    pub fn isolated(nodes: usize) -> Self {
        Self::from_graph(empty_graph(nodes))
    }

    /// Every pair is connected independently with probability `p`
    pub fn erdos_renyi(nodes: usize, p: f64, rng: &mut ChaCha8Rng) -> Self {
        let mut graph = empty_graph(nodes);
        for u in 0..nodes {
            for v in (u + 1)..nodes {
                if rng.gen::<f64>() < p {
                    graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
                }
            }
        }
        Self::from_graph(graph)
    }

    /// Preferential attachment: each new node links to `m` existing nodes
    /// chosen proportionally to their degree
    pub fn barabasi_albert(nodes: usize, m: usize, rng: &mut ChaCha8Rng) -> Self {
        let mut graph = empty_graph(nodes);
        if m == 0 || m >= nodes {
            return Self::from_graph(graph);
        }

        let mut targets: Vec<usize> = (0..m).collect();
        let mut repeated: Vec<usize> = Vec::new();

        for source in m..nodes {
            for &t in &targets {
                graph.update_edge(NodeIndex::new(source), NodeIndex::new(t), ());
            }
            repeated.extend(targets.iter().copied());
            repeated.extend(std::iter::repeat(source).take(m));

            let mut chosen = BTreeSet::new();
            while chosen.len() < m {
                chosen.insert(repeated[rng.gen_range(0..repeated.len())]);
            }
            targets = chosen.into_iter().collect();
        }
        Self::from_graph(graph)
    }

    /// Ring lattice of `k` nearest neighbours with each edge rewired
    /// with probability `p`
    pub fn watts_strogatz(nodes: usize, k: usize, p: f64, rng: &mut ChaCha8Rng) -> Self {
        let mut graph = empty_graph(nodes);
        if nodes < 2 {
            return Self::from_graph(graph);
        }
        let half = k / 2;

        for j in 1..=half {
            for u in 0..nodes {
                let v = (u + j) % nodes;
                if u != v {
                    graph.update_edge(NodeIndex::new(u), NodeIndex::new(v), ());
                }
            }
        }

        for j in 1..=half {
            for u in 0..nodes {
                if rng.gen::<f64>() >= p {
                    continue;
                }
                let (a, b) = (NodeIndex::new(u), NodeIndex::new((u + j) % nodes));
                let Some(edge) = graph.find_edge(a, b) else {
                    continue;
                };
                if graph.neighbors(a).count() >= nodes - 1 {
                    continue;
                }
                let mut w = NodeIndex::new(rng.gen_range(0..nodes));
                while w == a || graph.contains_edge(a, w) {
                    w = NodeIndex::new(rng.gen_range(0..nodes));
                }
                graph.remove_edge(edge);
                graph.add_edge(a, w, ());
            }
        }
        Self::from_graph(graph)
    }

    fn from_graph(graph: UnGraph<usize, ()>) -> Self {
        let adjacency = graph
            .node_indices()
            .map(|node| {
                let mut neighbours: Vec<usize> = graph.neighbors(node).map(|n| graph[n]).collect();
                neighbours.sort_unstable();
                neighbours.dedup();
                neighbours
            })
            .collect();
        Self { graph, adjacency }
    }

    pub fn graph(&self) -> &UnGraph<usize, ()> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Sorted direct neighbours of a node
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn empty_graph(nodes: usize) -> UnGraph<usize, ()> {
    let mut graph = UnGraph::with_capacity(nodes, 0);
    for i in 0..nodes {
        graph.add_node(i);
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn assert_simple_undirected(net: &SocialNetwork) {
        for u in 0..net.node_count() {
            for &v in net.neighbors(u) {
                assert_ne!(u, v, "self loop at {}", u);
                assert!(net.neighbors(v).contains(&u), "edge {}-{} not symmetric", u, v);
            }
        }
    }

    #[test]
    fn test_no_network_is_isolated() {
        let config = NetworkConfig {
            kind: NetworkKind::NoNetwork,
            ..NetworkConfig::default()
        };
        let net = SocialNetwork::generate(&config, 10, &mut rng());
        assert_eq!(net.node_count(), 10);
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn test_watts_strogatz_without_rewiring_is_ring() {
        let net = SocialNetwork::watts_strogatz(10, 4, 0.0, &mut rng());
        assert_eq!(net.edge_count(), 20);
        assert_eq!(net.neighbors(0), &[1, 2, 8, 9]);
        assert_simple_undirected(&net);
    }

    #[test]
    fn test_watts_strogatz_rewiring_keeps_edge_count() {
        let net = SocialNetwork::watts_strogatz(50, 4, 0.5, &mut rng());
        assert_eq!(net.edge_count(), 100);
        assert_simple_undirected(&net);
    }

    #[test]
    fn test_barabasi_albert_edge_count() {
        let net = SocialNetwork::barabasi_albert(30, 3, &mut rng());
        assert_eq!(net.edge_count(), (30 - 3) * 3);
        assert_simple_undirected(&net);
    }

    #[test]
    fn test_erdos_renyi_extremes() {
        let empty = SocialNetwork::erdos_renyi(10, 0.0, &mut rng());
        assert_eq!(empty.edge_count(), 0);
        let full = SocialNetwork::erdos_renyi(10, 1.0, &mut rng());
        assert_eq!(full.edge_count(), 45);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = NetworkConfig::default();
        let a = SocialNetwork::generate(&config, 40, &mut rng());
        let b = SocialNetwork::generate(&config, 40, &mut rng());
        assert_eq!(a.edge_count(), b.edge_count());
        for node in 0..40 {
            assert_eq!(a.neighbors(node), b.neighbors(node));
        }
    }

    #[test]
    fn test_node_weights_match_indices() {
        let net = SocialNetwork::barabasi_albert(12, 2, &mut rng());
        for node in net.graph().node_indices() {
            assert_eq!(net.graph()[node], node.index());
        }
    }

    #[test]
    fn test_out_of_range_node_has_no_neighbors() {
        let net = SocialNetwork::isolated(3);
        assert!(net.neighbors(99).is_empty());
    }
}
