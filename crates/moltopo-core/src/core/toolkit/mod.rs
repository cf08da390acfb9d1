//! # Toolkit Layer
//!
//! Chemistry the topology does not implement itself is delegated to a
//! [`ToolkitWrapper`]: canonical fingerprints for deduplication and SMARTS matching for
//! chemical-environment queries. A [`ToolkitRegistry`] holds several backends in
//! priority order.
//!
//! This module also defines the model names a topology can be configured with
//! ([`AromaticityModel`], [`ChargeModel`], [`FractionalBondOrderModel`]).

pub mod models;
pub mod registry;
pub mod wrapper;

pub use models::{AromaticityModel, ChargeModel, FractionalBondOrderModel, ModelParseError};
pub use registry::ToolkitRegistry;
pub use wrapper::{ToolkitError, ToolkitWrapper};
