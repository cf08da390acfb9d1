use super::models::AromaticityModel;
use crate::core::models::molecule::Molecule;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolkitError {
    #[error("Toolkit '{toolkit}' does not support '{operation}'")]
    Unsupported {
        toolkit: String,
        operation: &'static str,
    },

    #[error("No registered toolkit is capable of '{operation}'")]
    NoCapableToolkit { operation: &'static str },

    #[error("Invalid SMARTS pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Toolkit '{toolkit}' failed: {message}")]
    Failed { toolkit: String, message: String },
}

/// A cheminformatics backend.
///
/// Implementors override only the operations they support. Every default
/// reports [`ToolkitError::Unsupported`], which lets a
/// [`ToolkitRegistry`](super::registry::ToolkitRegistry) fall through to the next toolkit.
pub trait ToolkitWrapper: Send + Sync {
    fn name(&self) -> &str;

    /// A canonical string for the molecule. Two molecules with equal strings are the same
    /// chemical species regardless of atom order.
    fn to_smiles(&self, _molecule: &Molecule) -> Result<String, ToolkitError> {
        Err(unsupported(self.name(), "to_smiles"))
    }

    /// Every tuple of molecule-local atom indices matching the tagged atoms of `smarts`,
    /// in the order the toolkit enumerates them.
    fn find_smarts_matches(
        &self,
        _molecule: &Molecule,
        _smarts: &str,
        _aromaticity_model: AromaticityModel,
    ) -> Result<Vec<Vec<usize>>, ToolkitError> {
        Err(unsupported(self.name(), "find_smarts_matches"))
    }
}

pub fn unsupported(toolkit: &str, operation: &'static str) -> ToolkitError {
    ToolkitError::Unsupported {
        toolkit: toolkit.to_string(),
        operation,
    }
}
