//! # moltopo
//!
//! A chemical topology engine for simulation setup: an ordered collection of molecule
//! instances with shared reference molecules, topology-wide indexing of atoms, bonds,
//! virtual sites and particles, and chemical-environment matching unrolled across
//! every instance.
//!
//! ## Architectural Philosophy
//!
//! - **[`core::models`]: The Foundation.** Single-molecule chemistry with molecule-local indices.
//! - **[`core::topology`]: The Logic Core.** The [`Topology`] container, which deduplicates
//!   molecules and translates local indices into global ones on request.
//! - **[`core::toolkit`]: The Seam.** Cheminformatics the topology delegates, behind the
//!   [`ToolkitWrapper`] trait.
//!
//! ```ignore
//! let mut topology = Topology::new(ToolkitRegistry::new().with_toolkit(my_toolkit));
//! topology.add_molecule(&water)?;
//! topology.add_molecule(&water)?;
//! assert_eq!(topology.n_reference_molecules(), 1);
//! let hydroxyls = topology.chemical_environment_matches("[#1:1]-[#8:2]")?;
//! ```

pub mod core;

pub use crate::core::io::openmm::ExternalTopology;
pub use crate::core::models::molecule::{Atom, Molecule, VirtualSiteKind};
pub use crate::core::toolkit::{ToolkitRegistry, ToolkitWrapper};
pub use crate::core::topology::{Topology, TopologyError};
