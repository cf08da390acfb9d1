use crate::core::models::bond::BondOrder;
use crate::core::models::element;
use crate::core::models::graph::{self, EdgeMatch, MoleculeGraph};
use crate::core::models::molecule::Molecule;
use crate::core::toolkit::ToolkitRegistry;
use crate::core::topology::{Topology, TopologyError};
use crate::core::utils::units::{Dimension, Quantity, Unit};
use nalgebra::Vector3;
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, instrument, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalResidue {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalAtom {
    pub name: String,
    pub atomic_number: u8,
    pub residue: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalBond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: Option<BondOrder>, // `None` when the engine topology carries no order
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExternalTopologyError {
    #[error("Unknown element with atomic number {0}")]
    UnknownElement(u8),

    #[error("Unknown element symbol '{0}'")]
    UnknownSymbol(String),

    #[error("Atom index {index} is out of range ({n_atoms} atoms)")]
    AtomIndexOutOfRange { index: usize, n_atoms: usize },

    #[error("Residue index {index} is out of range ({n_residues} residues)")]
    ResidueIndexOutOfRange { index: usize, n_residues: usize },

    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),

    #[error("Atoms {atom1} and {atom2} are already bonded")]
    DuplicateBond { atom1: usize, atom2: usize },

    #[error("Periodic box vectors must be a length, got {0:?}")]
    BoxVectorsNotLength(Dimension),
}

/// A simulation-engine topology: residues, atoms with elements, and bonds whose order
/// may be unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalTopology {
    residues: Vec<ExternalResidue>,
    atoms: Vec<ExternalAtom>,
    bonds: Vec<ExternalBond>,
    periodic_box_vectors: Option<Quantity<Vector3<f64>>>,
}

impl ExternalTopology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_residue(&mut self, name: &str) -> usize {
        self.residues.push(ExternalResidue {
            name: name.to_string(),
        });
        self.residues.len() - 1
    }

    pub fn add_atom(
        &mut self,
        name: &str,
        atomic_number: u8,
        residue: usize,
    ) -> Result<usize, ExternalTopologyError> {
        if !element::is_known(atomic_number) {
            return Err(ExternalTopologyError::UnknownElement(atomic_number));
        }
        if residue >= self.residues.len() {
            return Err(ExternalTopologyError::ResidueIndexOutOfRange {
                index: residue,
                n_residues: self.residues.len(),
            });
        }
        self.atoms.push(ExternalAtom {
            name: name.to_string(),
            atomic_number,
            residue,
        });
        Ok(self.atoms.len() - 1)
    }

    /// Same as [`ExternalTopology::add_atom`] with the element given by its symbol, as
    /// engine topology files record it.
    pub fn add_atom_with_symbol(
        &mut self,
        name: &str,
        symbol: &str,
        residue: usize,
    ) -> Result<usize, ExternalTopologyError> {
        let atomic_number = element::atomic_number_from_symbol(symbol)
            .ok_or_else(|| ExternalTopologyError::UnknownSymbol(symbol.to_string()))?;
        self.add_atom(name, atomic_number, residue)
    }

    pub fn add_bond(
        &mut self,
        atom1: usize,
        atom2: usize,
        order: Option<BondOrder>,
    ) -> Result<usize, ExternalTopologyError> {
        for index in [atom1, atom2] {
            if index >= self.atoms.len() {
                return Err(ExternalTopologyError::AtomIndexOutOfRange {
                    index,
                    n_atoms: self.atoms.len(),
                });
            }
        }
        if atom1 == atom2 {
            return Err(ExternalTopologyError::SelfBond(atom1));
        }
        let pair = (atom1.min(atom2), atom1.max(atom2));
        if self
            .bonds
            .iter()
            .any(|bond| (bond.atom1.min(bond.atom2), bond.atom1.max(bond.atom2)) == pair)
        {
            return Err(ExternalTopologyError::DuplicateBond { atom1, atom2 });
        }
        self.bonds.push(ExternalBond {
            atom1,
            atom2,
            order,
        });
        Ok(self.bonds.len() - 1)
    }

    pub fn residues(&self) -> &[ExternalResidue] {
        &self.residues
    }

    pub fn atoms(&self) -> &[ExternalAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[ExternalBond] {
        &self.bonds
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn n_bonds(&self) -> usize {
        self.bonds.len()
    }

    /// True when every bond carries an order (vacuously true without bonds).
    pub fn has_bond_orders(&self) -> bool {
        self.bonds.iter().all(|bond| bond.order.is_some())
    }

    pub fn periodic_box_vectors(&self) -> Option<&Quantity<Vector3<f64>>> {
        self.periodic_box_vectors.as_ref()
    }

    pub fn set_periodic_box_vectors(
        &mut self,
        box_vectors: Option<Quantity<Vector3<f64>>>,
    ) -> Result<(), ExternalTopologyError> {
        if let Some(quantity) = &box_vectors {
            if quantity.dimension() != Dimension::Length {
                return Err(ExternalTopologyError::BoxVectorsNotLength(quantity.dimension()));
            }
        }
        self.periodic_box_vectors = box_vectors;
        Ok(())
    }

    /// Atomic numbers on nodes (in atom order) and bond orders, where known, on edges.
    pub fn to_graph(&self) -> MoleculeGraph {
        let mut graph = MoleculeGraph::with_capacity(self.atoms.len(), self.bonds.len());
        for atom in &self.atoms {
            graph.add_node(atom.atomic_number);
        }
        for bond in &self.bonds {
            graph.add_edge(NodeIndex::new(bond.atom1), NodeIndex::new(bond.atom2), bond.order);
        }
        graph
    }
}

impl Topology {
    /// Builds a topology from an engine topology by identifying each connected component
    /// with one of `unique_molecules`.
    ///
    /// Components are visited in order of their lowest atom index and compared against
    /// the candidates in the order given. Atomic numbers must match; bond orders must also
    /// match when every external bond carries one. The first isomorphic candidate is added
    /// with [`Topology::add_molecule`]. Periodic box vectors, when present, are copied
    /// and mark the topology periodic.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::IndistinguishableMolecules`] if two candidates have isomorphic graphs.
    /// - [`TopologyError::UnresolvedMolecule`] if a component matches no candidate.
    /// - Any error of [`Topology::add_molecule`].
    #[instrument(skip_all, name = "from_openmm", fields(n_atoms = external.n_atoms(), n_candidates = unique_molecules.len()))]
    pub fn from_openmm(
        toolkits: ToolkitRegistry,
        external: &ExternalTopology,
        unique_molecules: &[Molecule],
    ) -> Result<Self, TopologyError> {
        let edge_match = if external.has_bond_orders() {
            EdgeMatch::BondOrder
        } else {
            if external.bonds().iter().any(|bond| bond.order.is_some()) {
                warn!("Only some external bonds carry a bond order; matching on connectivity alone.");
            }
            EdgeMatch::Connectivity
        };

        let candidates: Vec<MoleculeGraph> =
            unique_molecules.iter().map(Molecule::to_graph).collect();
        for (i, first) in candidates.iter().enumerate() {
            for (j, second) in candidates.iter().enumerate().skip(i + 1) {
                if graph::is_isomorphic(first, second, EdgeMatch::BondOrder) {
                    return Err(TopologyError::IndistinguishableMolecules {
                        first: unique_molecules[i].name().to_string(),
                        second: unique_molecules[j].name().to_string(),
                    });
                }
            }
        }

        let graph = external.to_graph();
        let components = graph::connected_components(&graph);
        let mut topology = Topology::new(toolkits);
        for component in &components {
            let subgraph = graph::subgraph(&graph, component);
            let Some(index) = candidates
                .iter()
                .position(|candidate| graph::is_isomorphic(candidate, &subgraph, edge_match))
            else {
                return Err(TopologyError::UnresolvedMolecule {
                    atom_indices: component.iter().map(|node| node.index()).collect(),
                    description: hill_formula(component.iter().map(|&node| graph[node])),
                });
            };
            trace!(
                first_atom = component[0].index(),
                candidate = index,
                "Matched connected component."
            );
            topology.add_molecule(&unique_molecules[index])?;
        }

        if let Some(box_vectors) = external.periodic_box_vectors() {
            topology.set_box_vectors(Some(box_vectors.map(|v| v.as_slice().to_vec())))?;
            topology.set_periodic(true);
        }

        info!(
            n_components = components.len(),
            n_molecules = topology.n_molecules(),
            n_reference_molecules = topology.n_reference_molecules(),
            "Imported external topology."
        );
        Ok(topology)
    }

    /// Exports atoms and bonds as an engine topology with one residue per topology molecule.
    ///
    /// Residues are named after the reference molecule (`UNK` when unnamed). Box vectors
    /// are written in nanometers. Virtual sites are not part of an engine topology and are
    /// left out.
    pub fn to_openmm(&self) -> Result<ExternalTopology, TopologyError> {
        let mut external = ExternalTopology::new();
        for molecule in self.topology_molecules() {
            let reference = molecule.reference_molecule();
            let residue = external.add_residue(if reference.name().is_empty() {
                "UNK"
            } else {
                reference.name()
            });
            let offset = external.n_atoms();
            for atom in molecule.atoms() {
                external.add_atom(atom.name(), atom.atomic_number(), residue)?;
            }
            for bond in reference.bonds() {
                external.add_bond(offset + bond.atom1, offset + bond.atom2, Some(bond.order))?;
            }
        }
        if let Some(box_vectors) = self.box_vectors() {
            let factor = box_vectors.unit().conversion_factor(Unit::Nanometer)?;
            external.set_periodic_box_vectors(Some(Quantity::new(
                box_vectors.value() * factor,
                Unit::Nanometer,
            )))?;
        }
        Ok(external)
    }
}

/// Carbon, then hydrogen, then the remaining symbols alphabetically; without carbon,
/// everything alphabetically.
fn hill_formula(atomic_numbers: impl Iterator<Item = u8>) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for atomic_number in atomic_numbers {
        *counts
            .entry(element::symbol(atomic_number).unwrap_or("X"))
            .or_default() += 1;
    }

    let mut ordered: Vec<(&str, usize)> = Vec::with_capacity(counts.len());
    if let Some(carbon) = counts.remove("C") {
        ordered.push(("C", carbon));
        if let Some(hydrogen) = counts.remove("H") {
            ordered.push(("H", hydrogen));
        }
    }
    ordered.extend(counts);

    ordered
        .into_iter()
        .map(|(symbol, count)| {
            if count == 1 {
                symbol.to_string()
            } else {
                format!("{symbol}{count}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{benzene, ethanol, permuted_ethanol, registry, water};

    fn external_from(molecules: &[Molecule], with_orders: bool) -> ExternalTopology {
        let mut external = ExternalTopology::new();
        for molecule in molecules {
            let residue = external.add_residue(molecule.name());
            let offset = external.n_atoms();
            for atom in molecule.atoms() {
                external
                    .add_atom(&atom.name, atom.atomic_number, residue)
                    .unwrap();
            }
            for bond in molecule.bonds() {
                let order = with_orders.then_some(bond.order);
                external
                    .add_bond(offset + bond.atom1, offset + bond.atom2, order)
                    .unwrap();
            }
        }
        external
    }

    mod external_topology {
        use super::*;

        #[test]
        fn builders_validate_indices_and_elements() {
            let mut external = ExternalTopology::new();
            assert_eq!(
                external.add_atom("X", 1, 0),
                Err(ExternalTopologyError::ResidueIndexOutOfRange {
                    index: 0,
                    n_residues: 0
                })
            );
            let residue = external.add_residue("HOH");
            assert_eq!(
                external.add_atom("X", 0, residue),
                Err(ExternalTopologyError::UnknownElement(0))
            );
            let o = external.add_atom("O", 8, residue).unwrap();
            let h = external.add_atom("H1", 1, residue).unwrap();
            assert_eq!(
                external.add_bond(o, 7, None),
                Err(ExternalTopologyError::AtomIndexOutOfRange {
                    index: 7,
                    n_atoms: 2
                })
            );
            assert_eq!(
                external.add_bond(o, o, None),
                Err(ExternalTopologyError::SelfBond(o))
            );
            assert_eq!(external.add_bond(o, h, None), Ok(0));
            assert!(!external.has_bond_orders());
        }

        #[test]
        fn atoms_can_be_added_by_element_symbol() {
            let mut external = ExternalTopology::new();
            let residue = external.add_residue("HOH");
            let o = external.add_atom_with_symbol("O", "O", residue).unwrap();
            let h1 = external.add_atom_with_symbol("H1", "H", residue).unwrap();
            let h2 = external.add_atom_with_symbol("H2", " H ", residue).unwrap();
            assert_eq!(
                external.add_atom_with_symbol("X", "Xx", residue),
                Err(ExternalTopologyError::UnknownSymbol("Xx".to_string()))
            );
            external.add_bond(o, h1, Some(BondOrder::Single)).unwrap();
            external.add_bond(o, h2, Some(BondOrder::Single)).unwrap();
            assert_eq!(external.atoms()[o].atomic_number, 8);

            let topology = Topology::from_openmm(registry(), &external, &[water()]).unwrap();
            assert_eq!(topology.n_molecules(), 1);
            assert_eq!(topology.atom(0).unwrap().atomic_number(), 8);
        }

        #[test]
        fn repeated_bonds_are_rejected_in_either_direction() {
            let mut external = external_from(&[water()], true);
            assert_eq!(
                external.add_bond(1, 0, Some(BondOrder::Single)),
                Err(ExternalTopologyError::DuplicateBond { atom1: 1, atom2: 0 })
            );
            assert_eq!(
                external.add_bond(0, 2, None),
                Err(ExternalTopologyError::DuplicateBond { atom1: 0, atom2: 2 })
            );
            assert_eq!(external.n_bonds(), 2);
            let topology = Topology::from_openmm(registry(), &external, &[water()]).unwrap();
            assert_eq!(topology.n_molecules(), 1);
        }

        #[test]
        fn box_vectors_must_be_lengths() {
            let mut external = ExternalTopology::new();
            assert_eq!(
                external.set_periodic_box_vectors(Some(Quantity::new(
                    Vector3::new(1.0, 1.0, 1.0),
                    Unit::Dalton
                ))),
                Err(ExternalTopologyError::BoxVectorsNotLength(Dimension::Mass))
            );
            assert!(external.periodic_box_vectors().is_none());
        }

        #[test]
        fn hill_formula_orders_carbon_and_hydrogen_first() {
            assert_eq!(hill_formula([8, 1, 1].into_iter()), "H2O");
            assert_eq!(hill_formula([6, 6, 8, 1, 1, 1, 1, 1, 1].into_iter()), "C2H6O");
            assert_eq!(hill_formula([17, 11].into_iter()), "ClNa");
        }
    }

    mod import {
        use super::*;

        #[test]
        fn components_resolve_to_unique_molecules() {
            let external = external_from(&[benzene(), benzene(), ethanol()], true);
            let topology =
                Topology::from_openmm(registry(), &external, &[benzene(), ethanol()]).unwrap();
            assert_eq!(topology.n_molecules(), 3);
            assert_eq!(topology.n_reference_molecules(), 2);
            assert_eq!(topology.n_atoms(), external.n_atoms());
            assert_eq!(topology.n_bonds(), external.n_bonds());
            let names: Vec<&str> = topology
                .topology_molecules()
                .map(|m| m.reference_molecule().name())
                .collect();
            assert_eq!(names, vec!["benzene", "benzene", "ethanol"]);
        }

        #[test]
        fn atom_order_within_a_component_does_not_matter() {
            let external = external_from(&[permuted_ethanol(), water()], true);
            let topology =
                Topology::from_openmm(registry(), &external, &[water(), ethanol()]).unwrap();
            assert_eq!(topology.n_molecules(), 2);
            assert_eq!(
                topology.topology_molecule(0).unwrap().reference_molecule().name(),
                "ethanol"
            );
        }

        #[test]
        fn missing_bond_orders_fall_back_to_connectivity() {
            let external = external_from(&[benzene(), water()], false);
            let topology =
                Topology::from_openmm(registry(), &external, &[water(), benzene()]).unwrap();
            assert_eq!(topology.n_molecules(), 2);
        }

        #[test]
        fn bond_orders_must_match_when_present() {
            let aromatic = external_from(&[benzene()], true);
            let mut kekule = ExternalTopology::new();
            let residue = kekule.add_residue("BEN");
            for atom in aromatic.atoms() {
                kekule.add_atom(&atom.name, atom.atomic_number, residue).unwrap();
            }
            for bond in aromatic.bonds() {
                let order = match bond.order {
                    Some(BondOrder::Aromatic) => Some(BondOrder::Double),
                    other => other,
                };
                kekule.add_bond(bond.atom1, bond.atom2, order).unwrap();
            }
            assert!(matches!(
                Topology::from_openmm(registry(), &kekule, &[benzene()]),
                Err(TopologyError::UnresolvedMolecule { .. })
            ));
        }

        #[test]
        fn unmatched_component_is_reported() {
            let external = external_from(&[ethanol(), water()], true);
            assert_eq!(
                Topology::from_openmm(registry(), &external, &[ethanol()]).unwrap_err(),
                TopologyError::UnresolvedMolecule {
                    atom_indices: vec![9, 10, 11],
                    description: "H2O".to_string()
                }
            );
        }

        #[test]
        fn indistinguishable_candidates_are_rejected() {
            let external = external_from(&[ethanol()], true);
            assert!(matches!(
                Topology::from_openmm(registry(), &external, &[ethanol(), permuted_ethanol()]),
                Err(TopologyError::IndistinguishableMolecules { .. })
            ));
        }

        #[test]
        fn box_vectors_are_carried_over() {
            let mut external = external_from(&[water()], true);
            external
                .set_periodic_box_vectors(Some(Quantity::new(
                    Vector3::new(2.5, 2.5, 2.5),
                    Unit::Nanometer,
                )))
                .unwrap();
            let topology = Topology::from_openmm(registry(), &external, &[water()]).unwrap();
            assert!(topology.is_periodic());
            let box_vectors = topology.box_vectors().unwrap();
            assert_eq!(box_vectors.unit(), Unit::Nanometer);
            assert_eq!(*box_vectors.value(), Vector3::new(2.5, 2.5, 2.5));
        }

        #[test]
        fn empty_external_topology_gives_empty_topology() {
            let topology =
                Topology::from_openmm(registry(), &ExternalTopology::new(), &[water()]).unwrap();
            assert_eq!(topology.n_molecules(), 0);
            assert!(!topology.is_periodic());
        }
    }

    mod export {
        use super::*;

        #[test]
        fn to_openmm_writes_one_residue_per_molecule() {
            let mut topology =
                Topology::from_molecules(registry(), [&ethanol(), &water(), &water()]).unwrap();
            topology
                .set_box_vectors(Some(Quantity::new(vec![3.0, 3.0, 3.0], Unit::Nanometer)))
                .unwrap();

            let external = topology.to_openmm().unwrap();
            let residues: Vec<&str> = external.residues().iter().map(|r| r.name.as_str()).collect();
            assert_eq!(residues, vec!["ethanol", "water", "water"]);
            assert_eq!(external.n_atoms(), topology.n_atoms());
            assert_eq!(external.n_bonds(), topology.n_bonds());
            assert_eq!(external.atoms()[12].residue, 2);
            assert_eq!(
                external.bonds()[10],
                ExternalBond {
                    atom1: 12,
                    atom2: 13,
                    order: Some(BondOrder::Single)
                }
            );
            assert!(external.has_bond_orders());
            assert_eq!(
                external.periodic_box_vectors().map(|b| *b.value()),
                Some(Vector3::new(3.0, 3.0, 3.0))
            );
        }

        #[test]
        fn box_vectors_are_exported_in_nanometers() {
            let mut topology = Topology::from_molecules(registry(), [&water()]).unwrap();
            topology
                .set_box_vectors(Some(Quantity::new(vec![30.0, 25.0, 40.0], Unit::Angstrom)))
                .unwrap();
            let external = topology.to_openmm().unwrap();
            let box_vectors = external.periodic_box_vectors().unwrap();
            assert_eq!(box_vectors.unit(), Unit::Nanometer);
            let expected = Vector3::new(3.0, 2.5, 4.0);
            assert!((box_vectors.value() - expected).norm() < 1e-12);
        }

        #[test]
        fn unnamed_reference_molecules_become_unk_residues() {
            let mut unnamed = Molecule::new("");
            for atom in water().atoms() {
                unnamed.add_atom(atom.clone()).unwrap();
            }
            for bond in water().bonds() {
                unnamed.add_bond(bond.atom1, bond.atom2, bond.order).unwrap();
            }
            let topology = Topology::from_molecules(registry(), [&unnamed, &water()]).unwrap();
            let external = topology.to_openmm().unwrap();
            let residues: Vec<&str> = external.residues().iter().map(|r| r.name.as_str()).collect();
            assert_eq!(residues, vec!["UNK", "UNK"]);
            assert!(external.periodic_box_vectors().is_none());
        }

        #[test]
        fn export_then_import_preserves_composition() {
            let topology =
                Topology::from_molecules(registry(), [&benzene(), &water(), &benzene()]).unwrap();
            let external = topology.to_openmm().unwrap();
            let imported =
                Topology::from_openmm(registry(), &external, &[water(), benzene()]).unwrap();
            assert_eq!(imported.n_molecules(), 3);
            assert_eq!(imported.n_reference_molecules(), 2);
            assert_eq!(imported.n_atoms(), topology.n_atoms());
        }
    }
}
