use crate::core::io::openmm::ExternalTopologyError;
use crate::core::models::molecule::MoleculeError;
use crate::core::toolkit::{ModelParseError, ToolkitError};
use crate::core::utils::units::UnitError;
use std::fmt;
use thiserror::Error;

/// The kind of entity an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Atom,
    Bond,
    Particle,
    VirtualSite,
    Molecule,
    ReferenceMolecule,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Atom => "atom",
            Self::Bond => "bond",
            Self::Particle => "particle",
            Self::VirtualSite => "virtual site",
            Self::Molecule => "topology molecule",
            Self::ReferenceMolecule => "reference molecule",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TopologyError {
    #[error("{setting} must be one of {allowed:?}; specified '{value}'")]
    InvalidModel {
        setting: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("Unit error: {0}")]
    Units(#[from] UnitError),

    #[error("Given unitless {what}")]
    UnitlessQuantity { what: &'static str },

    #[error("Box vectors must have exactly 3 components, got {len}")]
    InvalidBoxVectorShape { len: usize },

    #[error("Invalid constraint between atoms {atom1} and {atom2}: {reason}")]
    InvalidConstraint {
        atom1: usize,
        atom2: usize,
        reason: String,
    },

    #[error("Invalid chemical environment query: {0}")]
    InvalidQuery(String),

    #[error("Invalid external topology: {0}")]
    InvalidExternalTopology(#[from] ExternalTopologyError),

    #[error("{kind} index {index} is out of range ({len} available)")]
    IndexOutOfRange {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    #[error("Atoms ({atom1}, {atom2}) already constrained with {existing} but attempting to override with unspecified distance")]
    ConstraintConflict {
        atom1: usize,
        atom2: usize,
        existing: String,
    },

    #[error("No constraint exists between atoms {atom1} and {atom2}")]
    ConstraintNotFound { atom1: usize, atom2: usize },

    #[error("Two unique molecules have indistinguishable graphs: '{first}' and '{second}'")]
    IndistinguishableMolecules { first: String, second: String },

    #[error("Atoms {atom1} and {atom2} are not bonded")]
    NotBonded { atom1: usize, atom2: usize },

    #[error("No match found for molecule with atoms {atom_indices:?} ({description})")]
    UnresolvedMolecule {
        atom_indices: Vec<usize>,
        description: String,
    },

    #[error("Toolkit error: {0}")]
    Toolkit(#[from] ToolkitError),

    #[error("Molecule error: {0}")]
    Molecule(#[from] MoleculeError),
}

impl From<ModelParseError> for TopologyError {
    fn from(err: ModelParseError) -> Self {
        Self::InvalidModel {
            setting: err.setting,
            value: err.value,
            allowed: err.allowed,
        }
    }
}
