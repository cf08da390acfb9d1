//! # Topology Module
//!
//! A [`Topology`] is an ordered collection of molecule instances built for
//! parameterizing simulation systems.
//!
//! ## Overview
//!
//! Each distinct molecule is stored once as a frozen reference molecule; every placement
//! of it is a [`TopologyMolecule`] that points at the shared copy. Atoms, bonds, virtual
//! sites and particles are exposed through borrowed views ([`TopologyAtom`],
//! [`TopologyBond`], [`TopologyVirtualSite`], [`TopologyParticle`]) that turn
//! molecule-local indices into topology-wide indices on request.
//!
//! ## Key Components
//!
//! - [`system`] - The [`Topology`] container, deduplication and global indexing
//! - [`molecule`] - Instance handles and their start offsets
//! - [`views`] - Per-instance atom, bond, virtual-site and particle views
//! - [`constraints`] - Pairwise distance constraints
//! - [`matching`] - Chemical-environment queries unrolled across instances
//! - [`settings`] - TOML configuration of topology metadata
//! - [`error`] - The error type shared by all of the above
//!
//! ## Indexing
//!
//! Global indices follow instance insertion order. Within one instance, particles list
//! atoms first and virtual sites after them. Offsets are recomputed by a linear scan
//! over preceding instances on every request, so they never go stale.

pub mod constraints;
pub mod error;
pub mod matching;
pub mod molecule;
pub mod settings;
pub mod system;
pub mod views;

pub use constraints::{ConstraintDistance, ConstraintStatus};
pub use error::{IndexKind, TopologyError};
pub use matching::ChemicalEnvironmentQuery;
pub use molecule::{TopologyMolecule, TopologyMoleculeId};
pub use settings::{BoxVectorSettings, SettingsError, TopologySettings};
pub use system::Topology;
pub use views::{TopologyAtom, TopologyBond, TopologyParticle, TopologyVirtualSite};
