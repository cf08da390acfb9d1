use super::error::{IndexKind, TopologyError};
use super::system::Topology;
use crate::core::utils::units::{Dimension, Quantity, Unit, UnitError};
use tracing::trace;

/// What [`Topology::add_constraint`] should record for a pair of atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintDistance {
    /// The pair is constrained but the distance is not known yet.
    Unspecified,
    /// The pair is constrained to this length.
    Distance(Quantity<f64>),
    /// Drop an existing constraint.
    Remove,
}

/// Constraint state of an atom pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintStatus {
    Unconstrained,
    Pending,
    Distance(Quantity<f64>),
}

impl From<Option<&Option<Quantity<f64>>>> for ConstraintStatus {
    fn from(stored: Option<&Option<Quantity<f64>>>) -> Self {
        match stored {
            None => Self::Unconstrained,
            Some(None) => Self::Pending,
            Some(Some(distance)) => Self::Distance(*distance),
        }
    }
}

impl Topology {
    /// Marks a pair of topology atoms as constrained, updates the distance, or removes it.
    ///
    /// The pair is unordered: `(i, j)` and `(j, i)` name the same constraint. Atoms need
    /// not be bonded.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::IndexOutOfRange`] or [`TopologyError::InvalidConstraint`] for a bad pair.
    /// - [`TopologyError::ConstraintConflict`] when an already constrained pair is
    ///   re-marked with [`ConstraintDistance::Unspecified`].
    /// - [`TopologyError::ConstraintNotFound`] when removing a pair that is not constrained.
    /// - [`TopologyError::UnitlessQuantity`] or [`TopologyError::Units`] for a distance
    ///   that is not a length.
    pub fn add_constraint(
        &mut self,
        atom1: usize,
        atom2: usize,
        distance: ConstraintDistance,
    ) -> Result<(), TopologyError> {
        self.check_constraint_pair(atom1, atom2)?;
        let key = [atom1, atom2];

        match distance {
            ConstraintDistance::Remove => {
                self.constraints
                    .remove(&key)
                    .ok_or(TopologyError::ConstraintNotFound { atom1, atom2 })?;
                trace!(atom1, atom2, "Removed constraint.");
            }
            ConstraintDistance::Unspecified => {
                if let Some(existing) = self.constraints.get(&key) {
                    return Err(TopologyError::ConstraintConflict {
                        atom1,
                        atom2,
                        existing: match existing {
                            Some(distance) => format!("distance {distance}"),
                            None => "unspecified distance".to_string(),
                        },
                    });
                }
                self.constraints.insert(&key, None);
                trace!(atom1, atom2, "Added pending constraint.");
            }
            ConstraintDistance::Distance(distance) => {
                match distance.dimension() {
                    Dimension::Length => {}
                    Dimension::Dimensionless => {
                        return Err(TopologyError::UnitlessQuantity {
                            what: "constraint distance",
                        });
                    }
                    _ => {
                        return Err(TopologyError::Units(UnitError::Incompatible {
                            from: distance.unit(),
                            to: Unit::Angstrom,
                        }));
                    }
                }
                self.constraints.insert(&key, Some(distance));
                trace!(atom1, atom2, %distance, "Set constraint distance.");
            }
        }
        Ok(())
    }

    /// Three-way constraint state of a pair; order of the two atoms does not matter.
    pub fn is_constrained(&self, atom1: usize, atom2: usize) -> ConstraintStatus {
        self.constraints.get(&[atom1, atom2]).into()
    }

    /// Every constrained pair (smaller index first) with its state, in the order added.
    pub fn constrained_atom_pairs(&self) -> impl Iterator<Item = ((usize, usize), ConstraintStatus)> {
        self.constraints
            .iter()
            .map(|(key, stored)| ((key[0], key[1]), ConstraintStatus::from(Some(stored))))
    }

    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn check_constraint_pair(&self, atom1: usize, atom2: usize) -> Result<(), TopologyError> {
        let n_atoms = self.n_atoms();
        for index in [atom1, atom2] {
            if index >= n_atoms {
                return Err(TopologyError::IndexOutOfRange {
                    kind: IndexKind::Atom,
                    index,
                    len: n_atoms,
                });
            }
        }
        if atom1 == atom2 {
            return Err(TopologyError::InvalidConstraint {
                atom1,
                atom2,
                reason: "an atom cannot be constrained to itself".to_string(),
            });
        }
        Ok(())
    }
}
