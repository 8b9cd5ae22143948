// src/model/elements.rs

use crate::model::structure::Atom;
use std::collections::BTreeMap;

/// Returns the Atomic Number (Z) for a given element symbol
pub fn get_atomic_number(element: &str) -> i32 {
    match element {
        // --- Period 1 ---
        "H"  => 1,
        "He" => 2,
        // --- Period 2 ---
        "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10,
        // --- Period 3 ---
        "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17, "Ar" => 18,
        // --- Period 4 ---
        "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22, "V" => 23, "Cr" => 24, "Mn" => 25,
        "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29, "Zn" => 30, "Ga" => 31, "Ge" => 32,
        "As" => 33, "Se" => 34, "Br" => 35, "Kr" => 36,
        // --- Period 5 ---
        "Rb" => 37, "Sr" => 38, "Y" => 39, "Zr" => 40, "Nb" => 41, "Mo" => 42, "Tc" => 43,
        "Ru" => 44, "Rh" => 45, "Pd" => 46, "Ag" => 47, "Cd" => 48, "In" => 49, "Sn" => 50,
        "Sb" => 51, "Te" => 52, "I" => 53, "Xe" => 54,
        // --- Period 6 (selected) ---
        "Cs" => 55, "Ba" => 56, "La" => 57, "Ce" => 58, "Hf" => 72, "Ta" => 73, "W" => 74,
        "Re" => 75, "Os" => 76, "Ir" => 77, "Pt" => 78, "Au" => 79, "Hg" => 80, "Tl" => 81,
        "Pb" => 82, "Bi" => 83,
        _ => 0, // Unknown/Dummy
    }
}

/// Reduced chemical formula, e.g. 8 Mo + 4 C -> "Mo2C".
/// Species are ordered by descending count, ties broken alphabetically.
pub fn reduced_formula(atoms: &[Atom]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in atoms {
        *counts.entry(atom.element.as_str()).or_insert(0) += 1;
    }
    if counts.is_empty() {
        return String::new();
    }

    let divisor = counts.values().copied().fold(0, gcd);
    let mut parts: Vec<(&str, usize)> = counts
        .into_iter()
        .map(|(el, n)| (el, n / divisor.max(1)))
        .collect();
    parts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let mut out = String::new();
    for (el, n) in parts {
        out.push_str(el);
        if n > 1 {
            out.push_str(&n.to_string());
        }
    }
    out
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms_of(species: &[(&str, usize)]) -> Vec<Atom> {
        let mut v = Vec::new();
        for (el, n) in species {
            for _ in 0..*n {
                v.push(Atom {
                    element: el.to_string(),
                    position: [0.0; 3],
                    original_index: v.len(),
                });
            }
        }
        v
    }

    #[test]
    fn test_atomic_numbers() {
        assert_eq!(get_atomic_number("Mo"), 42);
        assert_eq!(get_atomic_number("C"), 6);
        assert_eq!(get_atomic_number("Xx"), 0);
    }

    #[test]
    fn test_reduced_formula() {
        assert_eq!(reduced_formula(&atoms_of(&[("Mo", 8), ("C", 4)])), "Mo2C");
        assert_eq!(reduced_formula(&atoms_of(&[("Cu", 4)])), "Cu");
        assert_eq!(reduced_formula(&atoms_of(&[("O", 2), ("Si", 1)])), "O2Si");
        assert_eq!(reduced_formula(&[]), "");
    }
}
