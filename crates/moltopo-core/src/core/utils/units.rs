use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Physical dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Mass,
    Energy,
    Charge,
    Dimensionless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Angstrom,
    Nanometer,
    Picometer,
    Bohr,
    Dalton,
    KilocaloriePerMole,
    KilojoulePerMole,
    ElementaryCharge,
    Dimensionless,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("Cannot convert from {from} to {to}: incompatible dimensions")]
    Incompatible { from: Unit, to: Unit },
}

impl Unit {
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Angstrom | Self::Nanometer | Self::Picometer | Self::Bohr => Dimension::Length,
            Self::Dalton => Dimension::Mass,
            Self::KilocaloriePerMole | Self::KilojoulePerMole => Dimension::Energy,
            Self::ElementaryCharge => Dimension::Charge,
            Self::Dimensionless => Dimension::Dimensionless,
        }
    }

    /// Size of one of this unit expressed in the base unit of its dimension
    /// (angstrom, dalton, kJ/mol, elementary charge).
    fn scale(&self) -> f64 {
        match self {
            Self::Angstrom => 1.0,
            Self::Nanometer => 10.0,
            Self::Picometer => 0.01,
            Self::Bohr => 0.529_177_210_903,
            Self::Dalton => 1.0,
            Self::KilocaloriePerMole => 4.184,
            Self::KilojoulePerMole => 1.0,
            Self::ElementaryCharge => 1.0,
            Self::Dimensionless => 1.0,
        }
    }

    pub fn is_compatible(&self, other: Unit) -> bool {
        self.dimension() == other.dimension()
    }

    /// Factor that converts a value in `self` into a value in `to`.
    pub fn conversion_factor(&self, to: Unit) -> Result<f64, UnitError> {
        if !self.is_compatible(to) {
            return Err(UnitError::Incompatible { from: *self, to });
        }
        Ok(self.scale() / to.scale())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "angstrom" | "angstroms" | "a" => Ok(Self::Angstrom),
            "nanometer" | "nanometers" | "nm" => Ok(Self::Nanometer),
            "picometer" | "picometers" | "pm" => Ok(Self::Picometer),
            "bohr" => Ok(Self::Bohr),
            "dalton" | "daltons" | "da" | "amu" => Ok(Self::Dalton),
            "kilocalorie/mole" | "kcal/mol" => Ok(Self::KilocaloriePerMole),
            "kilojoule/mole" | "kj/mol" => Ok(Self::KilojoulePerMole),
            "elementary_charge" | "e" => Ok(Self::ElementaryCharge),
            "dimensionless" | "" => Ok(Self::Dimensionless),
            _ => Err(UnitError::UnknownUnit(s.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Angstrom => "angstrom",
                Self::Nanometer => "nanometer",
                Self::Picometer => "picometer",
                Self::Bohr => "bohr",
                Self::Dalton => "dalton",
                Self::KilocaloriePerMole => "kcal/mol",
                Self::KilojoulePerMole => "kJ/mol",
                Self::ElementaryCharge => "elementary_charge",
                Self::Dimensionless => "dimensionless",
            }
        )
    }
}

/// A value tagged with the unit it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity<T> {
    value: T,
    unit: Unit,
}

impl<T> Quantity<T> {
    pub fn new(value: T, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// Transforms the value while keeping the unit.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Quantity<U> {
        Quantity {
            value: f(self.value),
            unit: self.unit,
        }
    }
}

impl fmt::Display for Quantity<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
