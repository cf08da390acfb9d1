//! Per-instance views of reference-molecule entities.
//!
//! A view pairs a molecule-local atom, bond or virtual site with the
//! [`TopologyMolecule`] it belongs to and translates local indices into topology-wide
//! ones on request. Views are rebuilt on every access and never stored.

use super::error::{IndexKind, TopologyError};
use super::molecule::TopologyMolecule;
use crate::core::models::bond::{Bond, BondOrder};
use crate::core::models::molecule::{Atom, FrozenMolecule, VirtualSite, VirtualSiteKind};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TopologyAtom<'a> {
    molecule: TopologyMolecule<'a>,
    index: usize,
}

impl<'a> TopologyAtom<'a> {
    // `index` must be a valid atom index of the molecule's reference.
    pub(crate) fn new(molecule: TopologyMolecule<'a>, index: usize) -> Self {
        Self { molecule, index }
    }

    pub fn atom(&self) -> &'a Atom {
        &self.molecule.reference_molecule().atoms()[self.index]
    }

    pub fn name(&self) -> &'a str {
        &self.atom().name
    }

    pub fn atomic_number(&self) -> u8 {
        self.atom().atomic_number
    }

    pub fn topology_molecule(&self) -> TopologyMolecule<'a> {
        self.molecule
    }

    /// The reference molecule the underlying atom lives in.
    pub fn molecule(&self) -> &'a FrozenMolecule {
        self.molecule.reference_molecule()
    }

    pub fn molecule_atom_index(&self) -> usize {
        self.index
    }

    /// Atoms precede virtual sites, so an atom's particle index equals its atom index.
    pub fn molecule_particle_index(&self) -> usize {
        self.index
    }

    pub fn topology_atom_index(&self) -> usize {
        self.molecule.atom_start_topology_index() + self.index
    }

    pub fn topology_particle_index(&self) -> usize {
        self.molecule.particle_start_topology_index() + self.molecule_particle_index()
    }

    /// Bonds of this atom within its own instance, in reference bond order.
    pub fn topology_bonds(self) -> impl Iterator<Item = TopologyBond<'a>> + 'a {
        let molecule = self.molecule;
        molecule
            .reference_molecule()
            .bonds_of(self.index)
            .map(move |(bond_index, _)| TopologyBond::new(molecule, bond_index))
    }

    /// The bond joining this atom to `other`, if both belong to the same instance and are bonded.
    pub fn bond_with(&self, other: &TopologyAtom<'a>) -> Option<TopologyBond<'a>> {
        if self.molecule != other.molecule {
            return None;
        }
        self.molecule
            .reference_molecule()
            .bond_between(self.index, other.index)
            .map(|(bond_index, _)| TopologyBond::new(self.molecule, bond_index))
    }

    pub fn is_bonded_to(&self, other: &TopologyAtom<'a>) -> bool {
        self.bond_with(other).is_some()
    }
}

impl fmt::Debug for TopologyAtom<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopologyAtom")
            .field("name", &self.name())
            .field("atomic_number", &self.atomic_number())
            .field("topology_atom_index", &self.topology_atom_index())
            .finish()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TopologyBond<'a> {
    molecule: TopologyMolecule<'a>,
    index: usize,
}

impl<'a> TopologyBond<'a> {
    pub(crate) fn new(molecule: TopologyMolecule<'a>, index: usize) -> Self {
        Self { molecule, index }
    }

    pub fn bond(&self) -> &'a Bond {
        &self.molecule.reference_molecule().bonds()[self.index]
    }

    pub fn topology_molecule(&self) -> TopologyMolecule<'a> {
        self.molecule
    }

    pub fn molecule(&self) -> &'a FrozenMolecule {
        self.molecule.reference_molecule()
    }

    pub fn molecule_bond_index(&self) -> usize {
        self.index
    }

    pub fn topology_bond_index(&self) -> usize {
        self.molecule.bond_start_topology_index() + self.index
    }

    pub fn bond_order(&self) -> BondOrder {
        self.bond().order
    }

    pub fn fractional_bond_order(&self) -> Option<f64> {
        self.bond().fractional_bond_order
    }

    /// Both endpoints, resolved in the owning instance.
    pub fn atoms(&self) -> [TopologyAtom<'a>; 2] {
        self.bond()
            .atoms()
            .map(|index| TopologyAtom::new(self.molecule, index))
    }
}

impl fmt::Debug for TopologyBond<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.atoms();
        f.debug_struct("TopologyBond")
            .field("atoms", &(a.topology_atom_index(), b.topology_atom_index()))
            .field("order", &self.bond_order())
            .finish()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TopologyVirtualSite<'a> {
    molecule: TopologyMolecule<'a>,
    index: usize,
}

impl<'a> TopologyVirtualSite<'a> {
    pub(crate) fn new(molecule: TopologyMolecule<'a>, index: usize) -> Self {
        Self { molecule, index }
    }

    pub fn virtual_site(&self) -> &'a VirtualSite {
        &self.molecule.reference_molecule().virtual_sites()[self.index]
    }

    pub fn name(&self) -> &'a str {
        &self.virtual_site().name
    }

    pub fn kind(&self) -> VirtualSiteKind {
        self.virtual_site().kind
    }

    pub fn topology_molecule(&self) -> TopologyMolecule<'a> {
        self.molecule
    }

    pub fn molecule(&self) -> &'a FrozenMolecule {
        self.molecule.reference_molecule()
    }

    pub fn n_atoms(&self) -> usize {
        self.virtual_site().atoms().len()
    }

    /// The `i`-th defining atom of this site.
    pub fn atom(&self, i: usize) -> Result<TopologyAtom<'a>, TopologyError> {
        let atoms = self.virtual_site().atoms();
        atoms
            .get(i)
            .map(|&local| TopologyAtom::new(self.molecule, local))
            .ok_or(TopologyError::IndexOutOfRange {
                kind: IndexKind::Atom,
                index: i,
                len: atoms.len(),
            })
    }

    pub fn atoms(self) -> impl Iterator<Item = TopologyAtom<'a>> + 'a {
        let molecule = self.molecule;
        self.virtual_site()
            .atoms()
            .iter()
            .map(move |&local| TopologyAtom::new(molecule, local))
    }

    pub fn molecule_virtual_site_index(&self) -> usize {
        self.index
    }

    pub fn molecule_particle_index(&self) -> usize {
        self.molecule.n_atoms() + self.index
    }

    pub fn topology_virtual_site_index(&self) -> usize {
        self.molecule.virtual_site_start_topology_index() + self.index
    }

    pub fn topology_particle_index(&self) -> usize {
        self.molecule.particle_start_topology_index() + self.molecule_particle_index()
    }
}

impl fmt::Debug for TopologyVirtualSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopologyVirtualSite")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("topology_virtual_site_index", &self.topology_virtual_site_index())
            .finish()
    }
}

/// Anything occupying a position slot: an atom or a virtual site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyParticle<'a> {
    Atom(TopologyAtom<'a>),
    VirtualSite(TopologyVirtualSite<'a>),
}

impl<'a> TopologyParticle<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Atom(atom) => atom.name(),
            Self::VirtualSite(site) => site.name(),
        }
    }

    pub fn topology_molecule(&self) -> TopologyMolecule<'a> {
        match self {
            Self::Atom(atom) => atom.topology_molecule(),
            Self::VirtualSite(site) => site.topology_molecule(),
        }
    }

    pub fn molecule_particle_index(&self) -> usize {
        match self {
            Self::Atom(atom) => atom.molecule_particle_index(),
            Self::VirtualSite(site) => site.molecule_particle_index(),
        }
    }

    pub fn topology_particle_index(&self) -> usize {
        match self {
            Self::Atom(atom) => atom.topology_particle_index(),
            Self::VirtualSite(site) => site.topology_particle_index(),
        }
    }

    pub fn as_atom(&self) -> Option<TopologyAtom<'a>> {
        match self {
            Self::Atom(atom) => Some(*atom),
            Self::VirtualSite(_) => None,
        }
    }

    pub fn as_virtual_site(&self) -> Option<TopologyVirtualSite<'a>> {
        match self {
            Self::Atom(_) => None,
            Self::VirtualSite(site) => Some(*site),
        }
    }
}
