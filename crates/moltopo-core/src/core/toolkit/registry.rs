use super::models::AromaticityModel;
use super::wrapper::{ToolkitError, ToolkitWrapper};
use crate::core::models::molecule::Molecule;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// An ordered list of toolkits; each operation goes to the first one able to perform it.
#[derive(Clone, Default)]
pub struct ToolkitRegistry {
    toolkits: Vec<Arc<dyn ToolkitWrapper>>,
}

impl ToolkitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toolkit(mut self, toolkit: impl ToolkitWrapper + 'static) -> Self {
        self.register(Arc::new(toolkit));
        self
    }

    pub fn register(&mut self, toolkit: Arc<dyn ToolkitWrapper>) {
        self.toolkits.push(toolkit);
    }

    pub fn toolkits(&self) -> impl Iterator<Item = &dyn ToolkitWrapper> {
        self.toolkits.iter().map(|toolkit| toolkit.as_ref())
    }

    pub fn len(&self) -> usize {
        self.toolkits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toolkits.is_empty()
    }

    /// Runs `call` against each toolkit in registration order and returns the first
    /// answer that is not [`ToolkitError::Unsupported`].
    pub fn resolve<T>(
        &self,
        operation: &'static str,
        mut call: impl FnMut(&dyn ToolkitWrapper) -> Result<T, ToolkitError>,
    ) -> Result<T, ToolkitError> {
        for toolkit in &self.toolkits {
            match call(toolkit.as_ref()) {
                Err(ToolkitError::Unsupported { .. }) => {
                    trace!(toolkit = toolkit.name(), operation, "Toolkit cannot handle operation, trying next.");
                }
                result => return result,
            }
        }
        Err(ToolkitError::NoCapableToolkit { operation })
    }

    pub fn to_smiles(&self, molecule: &Molecule) -> Result<String, ToolkitError> {
        self.resolve("to_smiles", |toolkit| toolkit.to_smiles(molecule))
    }

    pub fn find_smarts_matches(
        &self,
        molecule: &Molecule,
        smarts: &str,
        aromaticity_model: AromaticityModel,
    ) -> Result<Vec<Vec<usize>>, ToolkitError> {
        self.resolve("find_smarts_matches", |toolkit| {
            toolkit.find_smarts_matches(molecule, smarts, aromaticity_model)
        })
    }
}

impl fmt::Debug for ToolkitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.toolkits.iter().map(|toolkit| toolkit.name()))
            .finish()
    }
}
