//! # Core Module
//!
//! The data structures and algorithms behind chemical topologies used to set up
//! molecular simulations.
//!
//! ## Overview
//!
//! A simulation system is usually many copies of a few distinct molecules. The core
//! module stores each distinct molecule once, tracks every placement of it, and answers
//! topology-wide questions (indices, bonds, constraints, chemical-environment matches)
//! without materializing per-instance copies.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, bonds, molecules and their graphs
//! - **Topology** ([`topology`]) - Deduplicated molecule instances, views and metadata
//! - **Toolkits** ([`toolkit`]) - Pluggable cheminformatics backends and model names
//! - **File I/O** ([`io`]) - Exchange with simulation-engine topologies
//! - **Utilities** ([`utils`]) - Unit-tagged quantities and canonical valence-term keys

pub mod io;
pub mod models;
pub mod toolkit;
pub mod topology;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
