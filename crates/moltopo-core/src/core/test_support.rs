//! Molecule fixtures and a deterministic in-memory toolkit shared by unit tests.

use crate::core::models::bond::BondOrder;
use crate::core::models::molecule::{Atom, Molecule, VirtualSiteKind};
use crate::core::toolkit::{AromaticityModel, ToolkitError, ToolkitRegistry, ToolkitWrapper};

fn build(name: &str, atoms: &[(&str, u8)], bonds: &[(usize, usize, BondOrder)]) -> Molecule {
    let mut molecule = Molecule::new(name);
    for &(atom_name, atomic_number) in atoms {
        molecule.add_atom(Atom::new(atom_name, atomic_number)).unwrap();
    }
    for &(a, b, order) in bonds {
        molecule.add_bond(a, b, order).unwrap();
    }
    molecule
}

/// O0, H1, H2.
pub fn water() -> Molecule {
    build(
        "water",
        &[("O", 8), ("H1", 1), ("H2", 1)],
        &[(0, 1, BondOrder::Single), (0, 2, BondOrder::Single)],
    )
}

/// Water with one divalent lone pair defined by (O, H1, H2).
pub fn water_with_virtual_site() -> Molecule {
    let mut molecule = water();
    molecule
        .add_virtual_site("LP", VirtualSiteKind::DivalentLonePair, &[0, 1, 2])
        .unwrap();
    molecule
}

/// CH3(0)-CH2(1)-O(2)H with hydrogens 3..=8.
pub fn ethanol() -> Molecule {
    use BondOrder::Single;
    build(
        "ethanol",
        &[
            ("C1", 6),
            ("C2", 6),
            ("O1", 8),
            ("H1", 1),
            ("H2", 1),
            ("H3", 1),
            ("H4", 1),
            ("H5", 1),
            ("H6", 1),
        ],
        &[
            (0, 1, Single),
            (1, 2, Single),
            (0, 3, Single),
            (0, 4, Single),
            (0, 5, Single),
            (1, 6, Single),
            (1, 7, Single),
            (2, 8, Single),
        ],
    )
}

/// Ethanol with the hydroxyl first: O0, H1, CH2 at 2, CH3 at 5.
pub fn permuted_ethanol() -> Molecule {
    use BondOrder::Single;
    build(
        "ethanol",
        &[
            ("O1", 8),
            ("H6", 1),
            ("C2", 6),
            ("H4", 1),
            ("H5", 1),
            ("C1", 6),
            ("H1", 1),
            ("H2", 1),
            ("H3", 1),
        ],
        &[
            (0, 1, Single),
            (0, 2, Single),
            (2, 3, Single),
            (2, 4, Single),
            (2, 5, Single),
            (5, 6, Single),
            (5, 7, Single),
            (5, 8, Single),
        ],
    )
}

/// Six aromatic carbons (0..6) in a ring, hydrogen `i + 6` on carbon `i`.
pub fn benzene() -> Molecule {
    let mut molecule = Molecule::new("benzene");
    for i in 0..6 {
        molecule
            .add_atom(Atom::new(&format!("C{}", i + 1), 6).aromatic())
            .unwrap();
    }
    for i in 0..6 {
        molecule
            .add_atom(Atom::new(&format!("H{}", i + 1), 1))
            .unwrap();
    }
    for i in 0..6 {
        molecule.add_bond(i, (i + 1) % 6, BondOrder::Aromatic).unwrap();
    }
    for i in 0..6 {
        molecule.add_bond(i, i + 6, BondOrder::Single).unwrap();
    }
    molecule
}

pub fn registry() -> ToolkitRegistry {
    ToolkitRegistry::new().with_toolkit(MockToolkit)
}

/// Fingerprints by iterated neighbourhood refinement and matches `[#Z:1]` and
/// `[#A:1]-[#B:2]` style patterns.
pub struct MockToolkit;

impl ToolkitWrapper for MockToolkit {
    fn name(&self) -> &str {
        "mock"
    }

    fn to_smiles(&self, molecule: &Molecule) -> Result<String, ToolkitError> {
        let initial: Vec<String> = molecule
            .atoms()
            .iter()
            .map(|atom| {
                format!(
                    "{}{:+}{}",
                    atom.atomic_number,
                    atom.formal_charge,
                    if atom.is_aromatic { "a" } else { "" }
                )
            })
            .collect();
        let mut ranks = rank(&initial);
        let mut rounds = vec![sorted(initial)];

        // Each round only splits classes, so it ends once the class count stops growing.
        loop {
            let signatures: Vec<String> = (0..molecule.n_atoms())
                .map(|atom| {
                    let mut neighbours: Vec<String> = molecule
                        .bonds_of(atom)
                        .filter_map(|(_, bond)| {
                            bond.other(atom)
                                .map(|other| format!("{}{}", bond.order, ranks[other]))
                        })
                        .collect();
                    neighbours.sort();
                    format!("{}|{}", ranks[atom], neighbours.join(","))
                })
                .collect();
            let refined = rank(&signatures);
            let stable = n_classes(&refined) == n_classes(&ranks);
            rounds.push(sorted(signatures));
            ranks = refined;
            if stable {
                break;
            }
        }

        let mut sites: Vec<String> = molecule
            .virtual_sites()
            .iter()
            .map(|site| site.kind.to_string())
            .collect();
        sites.sort();
        let rounds: Vec<String> = rounds.iter().map(|round| round.join(".")).collect();
        Ok(format!("{}/{}", rounds.join(";"), sites.join(".")))
    }

    fn find_smarts_matches(
        &self,
        molecule: &Molecule,
        smarts: &str,
        _aromaticity_model: AromaticityModel,
    ) -> Result<Vec<Vec<usize>>, ToolkitError> {
        let invalid = |reason: &str| ToolkitError::InvalidPattern {
            pattern: smarts.to_string(),
            reason: reason.to_string(),
        };
        let elements = smarts
            .split('[')
            .skip(1)
            .map(|segment| {
                segment
                    .split(']')
                    .next()
                    .and_then(|inner| inner.strip_prefix('#'))
                    .and_then(|inner| inner.split(':').next())
                    .and_then(|number| number.parse::<u8>().ok())
                    .ok_or_else(|| invalid("expected a tagged [#Z:n] atom"))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let z = |index: usize| molecule.atoms()[index].atomic_number;
        match elements.as_slice() {
            [a] => Ok((0..molecule.n_atoms())
                .filter(|&i| z(i) == *a)
                .map(|i| vec![i])
                .collect()),
            [a, b] => {
                let mut matches = Vec::new();
                for bond in molecule.bonds() {
                    let (i, j) = (bond.atom1, bond.atom2);
                    if (z(i), z(j)) == (*a, *b) {
                        matches.push(vec![i, j]);
                    }
                    if (z(j), z(i)) == (*a, *b) {
                        matches.push(vec![j, i]);
                    }
                }
                Ok(matches)
            }
            _ => Err(invalid("only one or two tagged atoms are understood")),
        }
    }
}

/// Position of each label among the sorted distinct labels.
fn rank(labels: &[String]) -> Vec<usize> {
    let mut distinct: Vec<&String> = labels.iter().collect();
    distinct.sort();
    distinct.dedup();
    labels
        .iter()
        .map(|label| distinct.binary_search(&label).unwrap_or_default())
        .collect()
}

fn n_classes(ranks: &[usize]) -> usize {
    ranks.iter().max().map_or(0, |max| max + 1)
}

fn sorted(mut labels: Vec<String>) -> Vec<String> {
    labels.sort();
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carbon_chain(n: usize, reversed: bool) -> Molecule {
        let mut molecule = Molecule::new("chain");
        for i in 0..n {
            molecule.add_atom(Atom::new(&format!("C{i}"), 6)).unwrap();
        }
        molecule.add_atom(Atom::new("O", 8)).unwrap();
        for i in 0..n - 1 {
            molecule.add_bond(i, i + 1, BondOrder::Single).unwrap();
        }
        let end = if reversed { n - 1 } else { 0 };
        molecule.add_bond(end, n, BondOrder::Single).unwrap();
        molecule
    }

    #[test]
    fn fingerprint_stays_compact_for_large_molecules() {
        let toolkit = MockToolkit;
        let forward = toolkit.to_smiles(&carbon_chain(60, false)).unwrap();
        let backward = toolkit.to_smiles(&carbon_chain(60, true)).unwrap();
        assert_eq!(forward, backward);
        assert!(forward.len() < 200_000, "fingerprint has {} bytes", forward.len());
        assert!(toolkit.to_smiles(&benzene()).unwrap().len() < 10_000);
    }

    #[test]
    fn fingerprint_separates_positional_isomers() {
        let mut middle = Molecule::new("chain");
        for i in 0..5 {
            middle.add_atom(Atom::new(&format!("C{i}"), 6)).unwrap();
        }
        middle.add_atom(Atom::new("O", 8)).unwrap();
        for i in 0..4 {
            middle.add_bond(i, i + 1, BondOrder::Single).unwrap();
        }
        middle.add_bond(2, 5, BondOrder::Single).unwrap();
        assert_ne!(
            MockToolkit.to_smiles(&carbon_chain(5, false)).unwrap(),
            MockToolkit.to_smiles(&middle).unwrap()
        );
    }

    #[test]
    fn fingerprint_ignores_atom_order_and_name() {
        let toolkit = MockToolkit;
        assert_eq!(
            toolkit.to_smiles(&ethanol()).unwrap(),
            toolkit.to_smiles(&permuted_ethanol()).unwrap()
        );
        assert_ne!(
            toolkit.to_smiles(&ethanol()).unwrap(),
            toolkit.to_smiles(&benzene()).unwrap()
        );
        assert_ne!(
            toolkit.to_smiles(&water()).unwrap(),
            toolkit.to_smiles(&water_with_virtual_site()).unwrap()
        );
    }

    #[test]
    fn pattern_matching_enumerates_both_bond_directions() {
        let matches = MockToolkit
            .find_smarts_matches(&water(), "[#1:1]-[#8:2]", AromaticityModel::Mdl)
            .unwrap();
        assert_eq!(matches, vec![vec![1, 0], vec![2, 0]]);
        let carbons = MockToolkit
            .find_smarts_matches(&ethanol(), "[#6:1]-[#6:2]", AromaticityModel::Mdl)
            .unwrap();
        assert_eq!(carbons, vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert!(matches!(
            MockToolkit.find_smarts_matches(&water(), "[O]", AromaticityModel::Mdl),
            Err(ToolkitError::InvalidPattern { .. })
        ));
    }
}
