use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{setting} must be one of {allowed:?}; specified '{value}'")]
pub struct ModelParseError {
    pub setting: &'static str,
    pub value: String,
    pub allowed: Vec<&'static str>,
}

fn parse_model<T: Copy>(
    setting: &'static str,
    value: &str,
    names: &[(&'static str, T)],
) -> Result<T, ModelParseError> {
    names
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, model)| *model)
        .ok_or_else(|| ModelParseError {
            setting,
            value: value.to_string(),
            allowed: names.iter().map(|(name, _)| *name).collect(),
        })
}

/// How aromaticity is perceived before patterns are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AromaticityModel {
    #[default]
    Mdl,
}

impl AromaticityModel {
    const NAMES: &'static [(&'static str, Self)] = &[("OEAroModel_MDL", Self::Mdl), ("MDL", Self::Mdl)];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mdl => "OEAroModel_MDL",
        }
    }
}

impl FromStr for AromaticityModel {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_model("Aromaticity model", s, Self::NAMES)
    }
}

/// Scheme used to assign partial charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeModel {
    Am1Bcc,
}

impl ChargeModel {
    const NAMES: &'static [(&'static str, Self)] = &[("AM1-BCC", Self::Am1Bcc)];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Am1Bcc => "AM1-BCC",
        }
    }
}

impl FromStr for ChargeModel {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_model("Charge model", s, Self::NAMES)
    }
}

/// Scheme used to compute fractional (Wiberg-style) bond orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FractionalBondOrderModel {
    Wiberg,
}

impl FractionalBondOrderModel {
    const NAMES: &'static [(&'static str, Self)] = &[("Wiberg", Self::Wiberg)];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wiberg => "Wiberg",
        }
    }
}

impl FromStr for FractionalBondOrderModel {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_model("Fractional bond order model", s, Self::NAMES)
    }
}

impl fmt::Display for AromaticityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ChargeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FractionalBondOrderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aromaticity_model_accepts_canonical_name_and_alias() {
        assert_eq!("OEAroModel_MDL".parse::<AromaticityModel>(), Ok(AromaticityModel::Mdl));
        assert_eq!("MDL".parse::<AromaticityModel>(), Ok(AromaticityModel::Mdl));
        assert_eq!(AromaticityModel::default().to_string(), "OEAroModel_MDL");
    }

    #[test]
    fn unknown_model_reports_allowed_values() {
        let err = "mdl".parse::<AromaticityModel>().unwrap_err();
        assert_eq!(err.setting, "Aromaticity model");
        assert_eq!(err.value, "mdl");
        assert_eq!(err.allowed, vec!["OEAroModel_MDL", "MDL"]);
        assert!(err.to_string().contains("specified 'mdl'"));
    }

    #[test]
    fn charge_and_bond_order_models_parse_exact_names() {
        assert_eq!("AM1-BCC".parse::<ChargeModel>(), Ok(ChargeModel::Am1Bcc));
        assert!("am1bcc".parse::<ChargeModel>().is_err());
        assert_eq!("Wiberg".parse::<FractionalBondOrderModel>(), Ok(FractionalBondOrderModel::Wiberg));
        assert!("Mayer".parse::<FractionalBondOrderModel>().is_err());
    }
}
