//! Provides exchange with simulation-engine topologies.
//!
//! An [`openmm::ExternalTopology`] is the flat residue/atom/bond view an engine works
//! with. [`crate::core::topology::Topology::from_openmm`] identifies its connected
//! components against known molecules, and
//! [`crate::core::topology::Topology::to_openmm`] writes a topology back out.

pub mod openmm;
