use super::error::TopologyError;
use super::molecule::TopologyMolecule;
use super::system::Topology;
use super::views::TopologyAtom;
use crate::core::toolkit::AromaticityModel;
use tracing::{debug, instrument};

/// Anything that can be rendered as a SMARTS pattern with tagged atoms.
pub trait ChemicalEnvironmentQuery {
    fn as_smarts(&self) -> String;
}

impl ChemicalEnvironmentQuery for str {
    fn as_smarts(&self) -> String {
        self.to_string()
    }
}

impl ChemicalEnvironmentQuery for String {
    fn as_smarts(&self) -> String {
        self.clone()
    }
}

impl<T: ChemicalEnvironmentQuery + ?Sized> ChemicalEnvironmentQuery for &T {
    fn as_smarts(&self) -> String {
        (**self).as_smarts()
    }
}

impl Topology {
    /// Finds every tuple of topology atoms matching the tagged atoms of `query`, using the
    /// topology's aromaticity model.
    ///
    /// See [`Topology::chemical_environment_matches_with_model`].
    pub fn chemical_environment_matches<Q: ChemicalEnvironmentQuery + ?Sized>(
        &self,
        query: &Q,
    ) -> Result<Vec<Vec<TopologyAtom<'_>>>, TopologyError> {
        self.chemical_environment_matches_with_model(query, self.aromaticity_model())
    }

    /// Finds every tuple of topology atoms matching the tagged atoms of `query`, perceiving
    /// aromaticity with `aromaticity_model` instead of the topology's own.
    ///
    /// Each distinct reference molecule is matched once through the toolkit registry
    /// and the local matches are then replicated onto all of its instances. Results are
    /// grouped by reference molecule, then by match in toolkit order, then by instance
    /// in insertion order.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::InvalidQuery`] if the rendered pattern is empty.
    /// - [`TopologyError::Toolkit`] if no toolkit can match or the pattern is rejected.
    /// - [`TopologyError::IndexOutOfRange`] if a toolkit reports an atom index outside
    ///   the reference molecule.
    #[instrument(skip_all, name = "chemical_environment_matches", fields(n_reference_molecules = self.n_reference_molecules(), %aromaticity_model))]
    pub fn chemical_environment_matches_with_model<Q: ChemicalEnvironmentQuery + ?Sized>(
        &self,
        query: &Q,
        aromaticity_model: AromaticityModel,
    ) -> Result<Vec<Vec<TopologyAtom<'_>>>, TopologyError> {
        let smarts = query.as_smarts();
        if smarts.trim().is_empty() {
            return Err(TopologyError::InvalidQuery("pattern is empty".to_string()));
        }

        let mut matches = Vec::new();
        for (reference_index, molecule) in self.reference_molecules().enumerate() {
            let local_matches =
                self.toolkits()
                    .find_smarts_matches(molecule, &smarts, aromaticity_model)?;
            let instances: Vec<TopologyMolecule<'_>> = self.instances_of(reference_index)?.collect();
            debug!(
                reference_index,
                n_matches = local_matches.len(),
                n_instances = instances.len(),
                "Matched reference molecule."
            );

            for local in &local_matches {
                for instance in &instances {
                    let atoms = local
                        .iter()
                        .map(|&index| instance.atom(index))
                        .collect::<Result<Vec<_>, _>>()?;
                    matches.push(atoms);
                }
            }
        }
        Ok(matches)
    }
}
