use std::fmt;

/// Chemical bond order; aromatic bonds are kept distinct from their Kekulé forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

/// A bond between two atoms of the same molecule, addressed by molecule-local atom index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub atom1: usize,                       // Molecule-local index of the first atom
    pub atom2: usize,                       // Molecule-local index of the second atom
    pub order: BondOrder,                   // Bond order (e.g., single, double, etc.)
    pub fractional_bond_order: Option<f64>, // Assigned by a fractional bond order model, if any
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
            fractional_bond_order: None,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// Returns the partner of `atom` in this bond, or `None` if `atom` is not an endpoint.
    pub fn other(&self, atom: usize) -> Option<usize> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }

    pub fn atoms(&self) -> [usize; 2] {
        [self.atom1, self.atom2]
    }
}
