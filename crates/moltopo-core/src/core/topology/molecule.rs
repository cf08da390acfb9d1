use super::error::{IndexKind, TopologyError};
use super::system::Topology;
use super::views::{TopologyAtom, TopologyBond, TopologyParticle, TopologyVirtualSite};
use crate::core::models::molecule::{FrozenMolecule, Molecule};
use slotmap::new_key_type;
use std::fmt;
use std::ptr;

new_key_type! {
    pub struct TopologyMoleculeId;
}

/// Storage record of one placed instance; points at its reference molecule by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MoleculeInstance {
    pub(crate) reference: usize,
}

/// One instance of a reference molecule placed in a [`Topology`].
///
/// A cheap `Copy` handle: it borrows the topology and resolves everything on demand.
/// Two handles are equal only if they name the same instance of the same topology.
#[derive(Clone, Copy)]
pub struct TopologyMolecule<'a> {
    topology: &'a Topology,
    id: TopologyMoleculeId,
}

impl<'a> TopologyMolecule<'a> {
    pub(crate) fn new(topology: &'a Topology, id: TopologyMoleculeId) -> Self {
        Self { topology, id }
    }

    pub fn id(&self) -> TopologyMoleculeId {
        self.id
    }

    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    /// The shared reference molecule this instance was created from.
    pub fn reference_molecule(&self) -> &'a FrozenMolecule {
        self.topology.reference_of(self.id)
    }

    /// Position of the reference molecule in [`Topology::reference_molecules`].
    pub fn reference_molecule_index(&self) -> usize {
        self.topology.reference_index_of(self.id)
    }

    /// Position of this instance in insertion order.
    pub fn topology_molecule_index(&self) -> usize {
        self.topology
            .instance_order()
            .iter()
            .position(|&id| id == self.id)
            .unwrap_or(self.topology.instance_order().len())
    }

    pub fn n_atoms(&self) -> usize {
        self.reference_molecule().n_atoms()
    }

    pub fn n_bonds(&self) -> usize {
        self.reference_molecule().n_bonds()
    }

    pub fn n_virtual_sites(&self) -> usize {
        self.reference_molecule().n_virtual_sites()
    }

    pub fn n_particles(&self) -> usize {
        self.reference_molecule().n_particles()
    }

    pub fn atom(&self, index: usize) -> Result<TopologyAtom<'a>, TopologyError> {
        check_local(IndexKind::Atom, index, self.n_atoms())?;
        Ok(TopologyAtom::new(*self, index))
    }

    pub fn bond(&self, index: usize) -> Result<TopologyBond<'a>, TopologyError> {
        check_local(IndexKind::Bond, index, self.n_bonds())?;
        Ok(TopologyBond::new(*self, index))
    }

    pub fn virtual_site(&self, index: usize) -> Result<TopologyVirtualSite<'a>, TopologyError> {
        check_local(IndexKind::VirtualSite, index, self.n_virtual_sites())?;
        Ok(TopologyVirtualSite::new(*self, index))
    }

    /// The particle at molecule-local particle index `index` (atoms first, then virtual sites).
    pub fn particle(&self, index: usize) -> Result<TopologyParticle<'a>, TopologyError> {
        check_local(IndexKind::Particle, index, self.n_particles())?;
        let n_atoms = self.n_atoms();
        Ok(if index < n_atoms {
            TopologyParticle::Atom(TopologyAtom::new(*self, index))
        } else {
            TopologyParticle::VirtualSite(TopologyVirtualSite::new(*self, index - n_atoms))
        })
    }

    pub fn atoms(self) -> impl Iterator<Item = TopologyAtom<'a>> + 'a {
        (0..self.n_atoms()).map(move |index| TopologyAtom::new(self, index))
    }

    pub fn bonds(self) -> impl Iterator<Item = TopologyBond<'a>> + 'a {
        (0..self.n_bonds()).map(move |index| TopologyBond::new(self, index))
    }

    pub fn virtual_sites(self) -> impl Iterator<Item = TopologyVirtualSite<'a>> + 'a {
        (0..self.n_virtual_sites()).map(move |index| TopologyVirtualSite::new(self, index))
    }

    pub fn particles(self) -> impl Iterator<Item = TopologyParticle<'a>> + 'a {
        self.atoms()
            .map(TopologyParticle::Atom)
            .chain(self.virtual_sites().map(TopologyParticle::VirtualSite))
    }

    pub fn atom_start_topology_index(&self) -> usize {
        self.start_index(Molecule::n_atoms)
    }

    pub fn bond_start_topology_index(&self) -> usize {
        self.start_index(Molecule::n_bonds)
    }

    pub fn virtual_site_start_topology_index(&self) -> usize {
        self.start_index(Molecule::n_virtual_sites)
    }

    pub fn particle_start_topology_index(&self) -> usize {
        self.start_index(Molecule::n_particles)
    }

    // Sum of `count` over every instance inserted before this one.
    fn start_index(&self, count: fn(&Molecule) -> usize) -> usize {
        let mut offset = 0;
        for &id in self.topology.instance_order() {
            if id == self.id {
                break;
            }
            offset += count(self.topology.reference_of(id));
        }
        offset
    }
}

fn check_local(kind: IndexKind, index: usize, len: usize) -> Result<(), TopologyError> {
    if index < len {
        Ok(())
    } else {
        Err(TopologyError::IndexOutOfRange { kind, index, len })
    }
}

impl PartialEq for TopologyMolecule<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.topology, other.topology) && self.id == other.id
    }
}

impl Eq for TopologyMolecule<'_> {}

impl fmt::Debug for TopologyMolecule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopologyMolecule")
            .field("id", &self.id)
            .field("reference", &self.reference_molecule().name())
            .finish()
    }
}
