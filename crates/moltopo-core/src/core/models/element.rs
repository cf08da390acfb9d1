use phf::{Map, phf_map};

/// Symbol and standard atomic weight (Da), indexed by `atomic_number - 1`.
static ELEMENTS: [(&str, f64); 54] = [
    ("H", 1.008), ("He", 4.0026), ("Li", 6.94), ("Be", 9.0122), ("B", 10.81),
    ("C", 12.011), ("N", 14.007), ("O", 15.999), ("F", 18.998), ("Ne", 20.180),
    ("Na", 22.990), ("Mg", 24.305), ("Al", 26.982), ("Si", 28.085), ("P", 30.974),
    ("S", 32.06), ("Cl", 35.45), ("Ar", 39.948), ("K", 39.098), ("Ca", 40.078),
    ("Sc", 44.956), ("Ti", 47.867), ("V", 50.942), ("Cr", 51.996), ("Mn", 54.938),
    ("Fe", 55.845), ("Co", 58.933), ("Ni", 58.693), ("Cu", 63.546), ("Zn", 65.38),
    ("Ga", 69.723), ("Ge", 72.630), ("As", 74.922), ("Se", 78.971), ("Br", 79.904),
    ("Kr", 83.798), ("Rb", 85.468), ("Sr", 87.62), ("Y", 88.906), ("Zr", 91.224),
    ("Nb", 92.906), ("Mo", 95.95), ("Tc", 98.0), ("Ru", 101.07), ("Rh", 102.91),
    ("Pd", 106.42), ("Ag", 107.87), ("Cd", 112.41), ("In", 114.82), ("Sn", 118.71),
    ("Sb", 121.76), ("Te", 127.60), ("I", 126.90), ("Xe", 131.29),
];

static SYMBOL_TO_ATOMIC_NUMBER: Map<&'static str, u8> = phf_map! {
    "H" => 1, "He" => 2, "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8,
    "F" => 9, "Ne" => 10, "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15,
    "S" => 16, "Cl" => 17, "Ar" => 18, "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22,
    "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29,
    "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34, "Br" => 35, "Kr" => 36,
    "Rb" => 37, "Sr" => 38, "Y" => 39, "Zr" => 40, "Nb" => 41, "Mo" => 42, "Tc" => 43,
    "Ru" => 44, "Rh" => 45, "Pd" => 46, "Ag" => 47, "Cd" => 48, "In" => 49, "Sn" => 50,
    "Sb" => 51, "Te" => 52, "I" => 53, "Xe" => 54,
};

/// Looks up an atomic number from an element symbol (case-sensitive, surrounding whitespace ignored).
pub fn atomic_number_from_symbol(symbol: &str) -> Option<u8> {
    SYMBOL_TO_ATOMIC_NUMBER.get(symbol.trim()).copied()
}

pub fn symbol(atomic_number: u8) -> Option<&'static str> {
    entry(atomic_number).map(|(symbol, _)| *symbol)
}

/// Standard atomic weight in daltons.
pub fn mass(atomic_number: u8) -> Option<f64> {
    entry(atomic_number).map(|(_, mass)| *mass)
}

pub fn is_known(atomic_number: u8) -> bool {
    entry(atomic_number).is_some()
}

fn entry(atomic_number: u8) -> Option<&'static (&'static str, f64)> {
    (atomic_number as usize)
        .checked_sub(1)
        .and_then(|index| ELEMENTS.get(index))
}
