use super::error::TopologyError;
use super::system::Topology;
use crate::core::toolkit::ToolkitRegistry;
use crate::core::utils::units::{Quantity, Unit};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Topology metadata read from a TOML document. Every key is optional.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TopologySettings {
    pub aromaticity_model: Option<String>,
    pub charge_model: Option<String>,
    pub fractional_bond_order_model: Option<String>,
    pub is_periodic: Option<bool>,
    pub box_vectors: Option<BoxVectorSettings>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BoxVectorSettings {
    pub values: Vec<f64>,
    pub unit: String,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl TopologySettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| SettingsError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl Topology {
    /// Creates an empty topology configured from `settings`.
    pub fn with_settings(
        toolkits: ToolkitRegistry,
        settings: &TopologySettings,
    ) -> Result<Self, TopologyError> {
        let mut topology = Self::new(toolkits);
        topology.apply_settings(settings)?;
        Ok(topology)
    }

    /// Applies every key present in `settings` through the regular setters.
    ///
    /// Either all keys are applied or, on the first invalid value, none are.
    pub fn apply_settings(&mut self, settings: &TopologySettings) -> Result<(), TopologyError> {
        let mut staged = self.clone();
        if let Some(name) = &settings.aromaticity_model {
            staged.set_aromaticity_model(name)?;
        }
        if let Some(name) = &settings.charge_model {
            staged.set_charge_model(Some(name.as_str()))?;
        }
        if let Some(name) = &settings.fractional_bond_order_model {
            staged.set_fractional_bond_order_model(Some(name.as_str()))?;
        }
        if let Some(box_vectors) = &settings.box_vectors {
            let unit: Unit = box_vectors.unit.parse()?;
            staged.set_box_vectors(Some(Quantity::new(box_vectors.values.clone(), unit)))?;
        }
        if let Some(is_periodic) = settings.is_periodic {
            staged.set_periodic(is_periodic);
        }
        *self = staged;
        debug!(
            aromaticity_model = %self.aromaticity_model(),
            is_periodic = self.is_periodic(),
            "Applied topology settings."
        );
        Ok(())
    }
}
