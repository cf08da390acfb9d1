use super::bond::{Bond, BondOrder};
use super::element;
use super::graph::{self, MoleculeGraph};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;

/// A chemical atom inside a single molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// An arbitrary label (e.g., "C1", "OW").
    pub name: String,
    /// The atomic number of the element.
    pub atomic_number: u8,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
    /// The partial charge in elementary charge units, once a charge model has assigned one.
    pub partial_charge: Option<f64>,
    /// Whether the atom is part of an aromatic system.
    pub is_aromatic: bool,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom without a partial charge.
    pub fn new(name: &str, atomic_number: u8) -> Self {
        Self {
            name: name.to_string(),
            atomic_number,
            formal_charge: 0,
            partial_charge: None,
            is_aromatic: false,
        }
    }

    pub fn with_formal_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn aromatic(mut self) -> Self {
        self.is_aromatic = true;
        self
    }

    pub fn element_symbol(&self) -> Option<&'static str> {
        element::symbol(self.atomic_number)
    }

    /// The standard atomic weight of this atom's element, in daltons.
    pub fn mass(&self) -> Option<f64> {
        element::mass(self.atomic_number)
    }
}

/// The geometric construction a virtual site uses to place itself relative to its atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualSiteKind {
    BondCharge,
    MonovalentLonePair,
    DivalentLonePair,
    TrivalentLonePair,
}

impl VirtualSiteKind {
    /// Number of atoms that define a site of this kind.
    pub fn n_atoms(&self) -> usize {
        match self {
            Self::BondCharge => 2,
            Self::MonovalentLonePair | Self::DivalentLonePair => 3,
            Self::TrivalentLonePair => 4,
        }
    }
}

impl fmt::Display for VirtualSiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::BondCharge => "BondChargeVirtualSite",
                Self::MonovalentLonePair => "MonovalentLonePairVirtualSite",
                Self::DivalentLonePair => "DivalentLonePairVirtualSite",
                Self::TrivalentLonePair => "TrivalentLonePairVirtualSite",
            }
        )
    }
}

/// A massless particle whose position is derived from a fixed set of atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualSite {
    pub name: String,
    pub kind: VirtualSiteKind,
    atoms: Vec<usize>, // Molecule-local indices of the defining atoms, in construction order
}

impl VirtualSite {
    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Unknown element with atomic number {0}")]
    UnknownElement(u8),

    #[error("Atom index {index} is out of range for a molecule with {n_atoms} atoms")]
    AtomIndexOutOfRange { index: usize, n_atoms: usize },

    #[error("Bond index {index} is out of range for a molecule with {n_bonds} bonds")]
    BondIndexOutOfRange { index: usize, n_bonds: usize },

    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),

    #[error("Atoms {0} and {1} are already bonded")]
    DuplicateBond(usize, usize),

    #[error("{kind} requires {expected} atoms, got {found}")]
    VirtualSiteArity {
        kind: VirtualSiteKind,
        expected: usize,
        found: usize,
    },
}

/// A single molecule: atoms, bonds and virtual sites addressed by molecule-local index.
///
/// Particles are ordered atoms first, then virtual sites, so the particle index of
/// virtual site `k` is `n_atoms + k`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    virtual_sites: Vec<VirtualSite>,
}

impl Molecule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn virtual_sites(&self) -> &[VirtualSite] {
        &self.virtual_sites
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn bond(&self, index: usize) -> Option<&Bond> {
        self.bonds.get(index)
    }

    pub fn virtual_site(&self, index: usize) -> Option<&VirtualSite> {
        self.virtual_sites.get(index)
    }

    #[inline]
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn n_bonds(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn n_virtual_sites(&self) -> usize {
        self.virtual_sites.len()
    }

    #[inline]
    pub fn n_particles(&self) -> usize {
        self.atoms.len() + self.virtual_sites.len()
    }

    /// Appends an atom and returns its molecule-local index.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::UnknownElement`] if the atomic number is not in the periodic table.
    pub fn add_atom(&mut self, atom: Atom) -> Result<usize, MoleculeError> {
        if !element::is_known(atom.atomic_number) {
            return Err(MoleculeError::UnknownElement(atom.atomic_number));
        }
        self.atoms.push(atom);
        Ok(self.atoms.len() - 1)
    }

    /// Appends a bond between two existing atoms and returns its molecule-local index.
    ///
    /// # Errors
    ///
    /// Fails if either atom does not exist, if both indices are the same atom,
    /// or if the two atoms are already bonded.
    pub fn add_bond(
        &mut self,
        atom1: usize,
        atom2: usize,
        order: BondOrder,
    ) -> Result<usize, MoleculeError> {
        self.check_atom_index(atom1)?;
        self.check_atom_index(atom2)?;
        if atom1 == atom2 {
            return Err(MoleculeError::SelfBond(atom1));
        }
        if self.bond_between(atom1, atom2).is_some() {
            return Err(MoleculeError::DuplicateBond(atom1, atom2));
        }
        self.bonds.push(Bond::new(atom1, atom2, order));
        Ok(self.bonds.len() - 1)
    }

    /// Appends a virtual site defined by `atoms` and returns its virtual-site index.
    pub fn add_virtual_site(
        &mut self,
        name: &str,
        kind: VirtualSiteKind,
        atoms: &[usize],
    ) -> Result<usize, MoleculeError> {
        if atoms.len() != kind.n_atoms() {
            return Err(MoleculeError::VirtualSiteArity {
                kind,
                expected: kind.n_atoms(),
                found: atoms.len(),
            });
        }
        for &atom in atoms {
            self.check_atom_index(atom)?;
        }
        self.virtual_sites.push(VirtualSite {
            name: name.to_string(),
            kind,
            atoms: atoms.to_vec(),
        });
        Ok(self.virtual_sites.len() - 1)
    }

    pub fn set_fractional_bond_order(
        &mut self,
        bond_index: usize,
        value: f64,
    ) -> Result<(), MoleculeError> {
        let n_bonds = self.bonds.len();
        let bond = self
            .bonds
            .get_mut(bond_index)
            .ok_or(MoleculeError::BondIndexOutOfRange {
                index: bond_index,
                n_bonds,
            })?;
        bond.fractional_bond_order = Some(value);
        Ok(())
    }

    /// Bonds involving `atom`, with their molecule-local bond indices, in bond order.
    pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = (usize, &Bond)> + '_ {
        self.bonds
            .iter()
            .enumerate()
            .filter(move |(_, bond)| bond.contains(atom))
    }

    pub fn bond_between(&self, atom1: usize, atom2: usize) -> Option<(usize, &Bond)> {
        self.bonds
            .iter()
            .enumerate()
            .find(|(_, bond)| bond.other(atom1) == Some(atom2))
    }

    /// Builds the attributed graph (atomic numbers on nodes, bond orders on edges).
    pub fn to_graph(&self) -> MoleculeGraph {
        graph::from_molecule(self)
    }

    /// Makes an immutable, cheaply shareable copy of this molecule.
    pub fn freeze(&self) -> FrozenMolecule {
        FrozenMolecule::from(self.clone())
    }

    fn check_atom_index(&self, index: usize) -> Result<(), MoleculeError> {
        if index < self.atoms.len() {
            Ok(())
        } else {
            Err(MoleculeError::AtomIndexOutOfRange {
                index,
                n_atoms: self.atoms.len(),
            })
        }
    }
}

/// An immutable molecule shared between every place that refers to it.
#[derive(Debug, Clone)]
pub struct FrozenMolecule(Arc<Molecule>);

impl FrozenMolecule {
    /// True if both handles point at the same frozen copy.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl From<Molecule> for FrozenMolecule {
    fn from(molecule: Molecule) -> Self {
        Self(Arc::new(molecule))
    }
}

impl Deref for FrozenMolecule {
    type Target = Molecule;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for FrozenMolecule {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || *self.0 == *other.0
    }
}
