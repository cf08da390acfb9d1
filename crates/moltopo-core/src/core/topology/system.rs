use super::error::{IndexKind, TopologyError};
use super::molecule::{MoleculeInstance, TopologyMolecule, TopologyMoleculeId};
use super::views::{TopologyAtom, TopologyBond, TopologyParticle, TopologyVirtualSite};
use crate::core::models::molecule::{FrozenMolecule, Molecule};
use crate::core::toolkit::{
    AromaticityModel, ChargeModel, FractionalBondOrderModel, ToolkitRegistry,
};
use crate::core::utils::units::{Dimension, Quantity, Unit, UnitError};
use crate::core::utils::valence::ValenceDict;
use indexmap::IndexMap;
use nalgebra::Vector3;
use slotmap::SlotMap;
use tracing::{debug, trace};

/// A distinct molecule stored once, together with every instance placed from it.
#[derive(Debug, Clone)]
pub(crate) struct ReferenceEntry {
    pub(crate) molecule: FrozenMolecule,
    pub(crate) instances: Vec<TopologyMoleculeId>,
}

/// An ordered collection of molecule instances with deduplicated reference molecules.
///
/// Each distinct molecule (by canonical fingerprint) is frozen and stored once; every
/// call to [`Topology::add_molecule`] appends a lightweight instance pointing at it.
/// Topology-wide indices of atoms, bonds, virtual sites and particles are derived from
/// insertion order and recomputed on every request.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Backends used for fingerprints and pattern matching.
    toolkits: ToolkitRegistry,
    /// Instance records keyed by stable ids.
    instances: SlotMap<TopologyMoleculeId, MoleculeInstance>,
    /// Instance ids in insertion order; the sole basis of global indices.
    order: Vec<TopologyMoleculeId>,
    /// Reference molecules keyed by fingerprint, in first-seen order.
    references: IndexMap<String, ReferenceEntry>,
    /// Constrained atom pairs; `None` marks a constraint whose distance is still pending.
    pub(super) constraints: ValenceDict<Option<Quantity<f64>>>,
    aromaticity_model: AromaticityModel,
    charge_model: Option<ChargeModel>,
    fractional_bond_order_model: Option<FractionalBondOrderModel>,
    box_vectors: Option<Quantity<Vector3<f64>>>,
    is_periodic: bool,
}

impl Topology {
    /// Creates an empty topology that delegates chemistry to `toolkits`.
    pub fn new(toolkits: ToolkitRegistry) -> Self {
        Self {
            toolkits,
            instances: SlotMap::with_key(),
            order: Vec::new(),
            references: IndexMap::new(),
            constraints: ValenceDict::new(),
            aromaticity_model: AromaticityModel::default(),
            charge_model: None,
            fractional_bond_order_model: None,
            box_vectors: None,
            is_periodic: false,
        }
    }

    /// Creates a topology holding one instance of each molecule, in order.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of [`Topology::add_molecule`].
    pub fn from_molecules<'m>(
        toolkits: ToolkitRegistry,
        molecules: impl IntoIterator<Item = &'m Molecule>,
    ) -> Result<Self, TopologyError> {
        let mut topology = Self::new(toolkits);
        for molecule in molecules {
            topology.add_molecule(molecule)?;
        }
        Ok(topology)
    }

    pub fn toolkits(&self) -> &ToolkitRegistry {
        &self.toolkits
    }

    /// Places a new instance of `molecule` at the end of the topology.
    ///
    /// The molecule's fingerprint is compared with every known reference molecule. On a
    /// match the existing frozen copy is reused, so the new instance adopts that copy's
    /// atom ordering. Otherwise a frozen copy of `molecule` becomes a new reference.
    ///
    /// # Return
    ///
    /// The number of instances after insertion, i.e. the 1-based position of the new one.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Toolkit`] if no registered toolkit can fingerprint the molecule.
    pub fn add_molecule(&mut self, molecule: &Molecule) -> Result<usize, TopologyError> {
        let fingerprint = self.toolkits.to_smiles(molecule)?;

        let reference = match self.references.get_index_of(&fingerprint) {
            Some(index) => index,
            None => {
                debug!(
                    name = molecule.name(),
                    n_atoms = molecule.n_atoms(),
                    fingerprint = %fingerprint,
                    "Registering new reference molecule."
                );
                let (index, _) = self.references.insert_full(
                    fingerprint,
                    ReferenceEntry {
                        molecule: molecule.freeze(),
                        instances: Vec::new(),
                    },
                );
                index
            }
        };

        let id = self.instances.insert(MoleculeInstance { reference });
        self.order.push(id);
        if let Some((_, entry)) = self.references.get_index_mut(reference) {
            entry.instances.push(id);
        }
        trace!(reference, n_molecules = self.order.len(), "Added topology molecule.");
        Ok(self.order.len())
    }

    pub(crate) fn instance_order(&self) -> &[TopologyMoleculeId] {
        &self.order
    }

    // Ids handed out by this topology always resolve; instances are never removed.
    pub(crate) fn reference_index_of(&self, id: TopologyMoleculeId) -> usize {
        self.instances[id].reference
    }

    pub(crate) fn reference_of(&self, id: TopologyMoleculeId) -> &FrozenMolecule {
        &self.references[self.reference_index_of(id)].molecule
    }

    /// Distinct molecules in the order they were first added.
    pub fn reference_molecules(&self) -> impl Iterator<Item = &FrozenMolecule> {
        self.references.values().map(|entry| &entry.molecule)
    }

    pub fn reference_molecule(&self, index: usize) -> Option<&FrozenMolecule> {
        self.references
            .get_index(index)
            .map(|(_, entry)| &entry.molecule)
    }

    pub fn n_reference_molecules(&self) -> usize {
        self.references.len()
    }

    /// Instances of the reference molecule at `reference_index`, in insertion order.
    pub fn instances_of(
        &self,
        reference_index: usize,
    ) -> Result<impl Iterator<Item = TopologyMolecule<'_>>, TopologyError> {
        let (_, entry) =
            self.references
                .get_index(reference_index)
                .ok_or(TopologyError::IndexOutOfRange {
                    kind: IndexKind::ReferenceMolecule,
                    index: reference_index,
                    len: self.references.len(),
                })?;
        Ok(entry
            .instances
            .iter()
            .map(move |&id| TopologyMolecule::new(self, id)))
    }

    pub fn topology_molecules(&self) -> impl Iterator<Item = TopologyMolecule<'_>> {
        self.order.iter().map(move |&id| TopologyMolecule::new(self, id))
    }

    pub fn topology_molecule(&self, index: usize) -> Result<TopologyMolecule<'_>, TopologyError> {
        self.order
            .get(index)
            .map(|&id| TopologyMolecule::new(self, id))
            .ok_or(TopologyError::IndexOutOfRange {
                kind: IndexKind::Molecule,
                index,
                len: self.order.len(),
            })
    }

    pub fn n_molecules(&self) -> usize {
        self.order.len()
    }

    pub fn n_atoms(&self) -> usize {
        self.count_per_reference(Molecule::n_atoms)
    }

    pub fn n_bonds(&self) -> usize {
        self.count_per_reference(Molecule::n_bonds)
    }

    pub fn n_virtual_sites(&self) -> usize {
        self.count_per_reference(Molecule::n_virtual_sites)
    }

    pub fn n_particles(&self) -> usize {
        self.count_per_reference(Molecule::n_particles)
    }

    // Per-reference count times the number of instances of that reference.
    fn count_per_reference(&self, count: fn(&Molecule) -> usize) -> usize {
        self.references
            .values()
            .map(|entry| count(&entry.molecule) * entry.instances.len())
            .sum()
    }

    pub fn atoms(&self) -> impl Iterator<Item = TopologyAtom<'_>> {
        self.topology_molecules().flat_map(TopologyMolecule::atoms)
    }

    pub fn bonds(&self) -> impl Iterator<Item = TopologyBond<'_>> {
        self.topology_molecules().flat_map(TopologyMolecule::bonds)
    }

    pub fn virtual_sites(&self) -> impl Iterator<Item = TopologyVirtualSite<'_>> {
        self.topology_molecules()
            .flat_map(TopologyMolecule::virtual_sites)
    }

    pub fn particles(&self) -> impl Iterator<Item = TopologyParticle<'_>> {
        self.topology_molecules().flat_map(TopologyMolecule::particles)
    }

    /// Finds the instance holding global entity `index` and its local index there.
    fn locate(
        &self,
        kind: IndexKind,
        index: usize,
        count: fn(&Molecule) -> usize,
    ) -> Result<(TopologyMolecule<'_>, usize), TopologyError> {
        let mut offset = 0;
        for &id in &self.order {
            let n = count(self.reference_of(id));
            if index < offset + n {
                return Ok((TopologyMolecule::new(self, id), index - offset));
            }
            offset += n;
        }
        Err(TopologyError::IndexOutOfRange {
            kind,
            index,
            len: offset,
        })
    }

    /// The atom with topology-wide index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] if `index >= n_atoms()`.
    pub fn atom(&self, index: usize) -> Result<TopologyAtom<'_>, TopologyError> {
        let (molecule, local) = self.locate(IndexKind::Atom, index, Molecule::n_atoms)?;
        molecule.atom(local)
    }

    pub fn bond(&self, index: usize) -> Result<TopologyBond<'_>, TopologyError> {
        let (molecule, local) = self.locate(IndexKind::Bond, index, Molecule::n_bonds)?;
        molecule.bond(local)
    }

    pub fn virtual_site(&self, index: usize) -> Result<TopologyVirtualSite<'_>, TopologyError> {
        let (molecule, local) =
            self.locate(IndexKind::VirtualSite, index, Molecule::n_virtual_sites)?;
        molecule.virtual_site(local)
    }

    pub fn particle(&self, index: usize) -> Result<TopologyParticle<'_>, TopologyError> {
        let (molecule, local) = self.locate(IndexKind::Particle, index, Molecule::n_particles)?;
        molecule.particle(local)
    }

    /// Whether topology atoms `atom1` and `atom2` share a bond.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] if either index is not a topology atom.
    pub fn is_bonded(&self, atom1: usize, atom2: usize) -> Result<bool, TopologyError> {
        Ok(self.atom(atom1)?.is_bonded_to(&self.atom(atom2)?))
    }

    /// Fails with [`TopologyError::NotBonded`] unless the two atoms share a bond.
    pub fn assert_bonded(&self, atom1: usize, atom2: usize) -> Result<(), TopologyError> {
        if self.is_bonded(atom1, atom2)? {
            Ok(())
        } else {
            Err(TopologyError::NotBonded { atom1, atom2 })
        }
    }

    /// The fractional bond order stored on the reference bond joining two topology atoms.
    ///
    /// # Return
    ///
    /// `None` if the bond exists but no fractional order has been assigned yet.
    pub fn get_fractional_bond_order(
        &self,
        atom1: usize,
        atom2: usize,
    ) -> Result<Option<f64>, TopologyError> {
        self.atom(atom1)?
            .bond_with(&self.atom(atom2)?)
            .map(|bond| bond.fractional_bond_order())
            .ok_or(TopologyError::NotBonded { atom1, atom2 })
    }

    pub fn aromaticity_model(&self) -> AromaticityModel {
        self.aromaticity_model
    }

    /// Sets the aromaticity model by name (`"OEAroModel_MDL"` or its alias `"MDL"`).
    pub fn set_aromaticity_model(&mut self, name: &str) -> Result<(), TopologyError> {
        self.aromaticity_model = name.parse::<AromaticityModel>()?;
        Ok(())
    }

    pub fn charge_model(&self) -> Option<ChargeModel> {
        self.charge_model
    }

    /// Sets the charge model by name, or clears it with `None`.
    pub fn set_charge_model(&mut self, name: Option<&str>) -> Result<(), TopologyError> {
        self.charge_model = name.map(str::parse::<ChargeModel>).transpose()?;
        Ok(())
    }

    pub fn fractional_bond_order_model(&self) -> Option<FractionalBondOrderModel> {
        self.fractional_bond_order_model
    }

    pub fn set_fractional_bond_order_model(
        &mut self,
        name: Option<&str>,
    ) -> Result<(), TopologyError> {
        self.fractional_bond_order_model = name
            .map(str::parse::<FractionalBondOrderModel>)
            .transpose()?;
        Ok(())
    }

    pub fn box_vectors(&self) -> Option<&Quantity<Vector3<f64>>> {
        self.box_vectors.as_ref()
    }

    /// Sets or clears the box vectors.
    ///
    /// # Errors
    ///
    /// Fails if the quantity is dimensionless, is not a length, or does not have exactly
    /// three components. The stored value is left unchanged on failure.
    pub fn set_box_vectors(
        &mut self,
        box_vectors: Option<Quantity<Vec<f64>>>,
    ) -> Result<(), TopologyError> {
        let Some(box_vectors) = box_vectors else {
            self.box_vectors = None;
            return Ok(());
        };
        match box_vectors.dimension() {
            Dimension::Length => {}
            Dimension::Dimensionless => {
                return Err(TopologyError::UnitlessQuantity {
                    what: "box vectors",
                });
            }
            _ => {
                return Err(TopologyError::Units(UnitError::Incompatible {
                    from: box_vectors.unit(),
                    to: Unit::Angstrom,
                }));
            }
        }
        let len = box_vectors.value().len();
        if len != 3 {
            return Err(TopologyError::InvalidBoxVectorShape { len });
        }
        self.box_vectors = Some(box_vectors.map(|values| Vector3::from_column_slice(&values)));
        Ok(())
    }

    pub fn is_periodic(&self) -> bool {
        self.is_periodic
    }

    pub fn set_periodic(&mut self, is_periodic: bool) {
        self.is_periodic = is_periodic;
    }
}
