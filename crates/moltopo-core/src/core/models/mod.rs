//! # Molecule Models
//!
//! The single-molecule chemical graph the topology layer builds on.
//!
//! - [`element`] - Static periodic-table lookups
//! - [`bond`] - Bond orders and molecule-local bond records
//! - [`molecule`] - Atoms, virtual sites, [`molecule::Molecule`] and its shared immutable form
//! - [`graph`] - Attributed graphs, connected components and isomorphism tests
//!
//! Every index in this module is molecule-local. Translation into topology-wide indices
//! happens in [`crate::core::topology`].

pub mod bond;
pub mod element;
pub mod graph;
pub mod molecule;
