//! Attributed molecular graphs.
//!
//! Nodes carry atomic numbers and edges carry an optional bond order, so the same graph
//! type describes both fully specified molecules and external topologies whose bonds
//! may lack orders.

use super::bond::BondOrder;
use super::molecule::Molecule;
use indexmap::IndexMap;
use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

pub type MoleculeGraph = UnGraph<u8, Option<BondOrder>>;

/// Which edge attributes must agree for two graphs to be considered isomorphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMatch {
    /// Bond orders must be equal.
    BondOrder,
    /// Only connectivity matters.
    Connectivity,
}

pub fn from_molecule(molecule: &Molecule) -> MoleculeGraph {
    let mut graph = MoleculeGraph::with_capacity(molecule.n_atoms(), molecule.n_bonds());
    let nodes: Vec<NodeIndex> = molecule
        .atoms()
        .iter()
        .map(|atom| graph.add_node(atom.atomic_number))
        .collect();
    for bond in molecule.bonds() {
        graph.add_edge(nodes[bond.atom1], nodes[bond.atom2], Some(bond.order));
    }
    graph
}

/// Splits a graph into connected components.
///
/// Components are ordered by their lowest node index and each component lists its
/// nodes in ascending order.
pub fn connected_components(graph: &MoleculeGraph) -> Vec<Vec<NodeIndex>> {
    let mut sets = UnionFind::<usize>::new(graph.node_count());
    for edge in graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut components: IndexMap<usize, Vec<NodeIndex>> = IndexMap::new();
    for node in graph.node_indices() {
        components
            .entry(sets.find_mut(node.index()))
            .or_default()
            .push(node);
    }
    components.into_values().collect()
}

/// The induced subgraph on `nodes`, renumbered in the original node order.
pub fn subgraph(graph: &MoleculeGraph, nodes: &[NodeIndex]) -> MoleculeGraph {
    let mut keep = vec![false; graph.node_count()];
    for node in nodes {
        keep[node.index()] = true;
    }
    graph.filter_map(
        |index, atomic_number| keep[index.index()].then_some(*atomic_number),
        |_, order| Some(*order),
    )
}

/// Decides whether two graphs are isomorphic with equal atomic numbers on matched nodes.
pub fn is_isomorphic(a: &MoleculeGraph, b: &MoleculeGraph, edge_match: EdgeMatch) -> bool {
    if a.node_count() != b.node_count() || a.edge_count() != b.edge_count() {
        return false;
    }
    if sorted_atomic_numbers(a) != sorted_atomic_numbers(b) {
        return false;
    }

    let node_match = |x: &u8, y: &u8| x == y;
    match edge_match {
        EdgeMatch::BondOrder => is_isomorphic_matching(a, b, node_match, |x, y| x == y),
        EdgeMatch::Connectivity => is_isomorphic_matching(a, b, node_match, |_, _| true),
    }
}

fn sorted_atomic_numbers(graph: &MoleculeGraph) -> Vec<u8> {
    let mut numbers: Vec<u8> = graph.node_weights().copied().collect();
    numbers.sort_unstable();
    numbers
}
