// src/model/structure.rs
use crate::model::elements::reduced_formula;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    // Cartesian position in Angstroms
    pub position: [f64; 3],
    #[serde(skip)]
    pub original_index: usize,
}

/// Immutable snapshot of a periodic crystal: lattice vectors as rows
/// [a_vec, b_vec, c_vec] plus atoms in Cartesian coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Structure {
    pub lattice: [[f64; 3]; 3],
    pub atoms: Vec<Atom>,
    #[serde(skip)]
    pub formula: String,
}

impl Structure {
    pub fn new(lattice: [[f64; 3]; 3], atoms: Vec<Atom>) -> Self {
        let formula = reduced_formula(&atoms);
        Structure { lattice, atoms, formula }
    }

    /// Builds a structure from (element, fractional coordinate) sites.
    pub fn from_fractional(lattice: [[f64; 3]; 3], sites: &[(&str, [f64; 3])]) -> Self {
        let atoms = sites
            .iter()
            .enumerate()
            .map(|(i, (el, frac))| Atom {
                element: el.to_string(),
                position: crate::utils::linalg::frac_to_cart(*frac, lattice),
                original_index: i,
            })
            .collect();
        Self::new(lattice, atoms)
    }

    /// Lattice as a row-major Matrix3 (rows are a, b, c).
    pub fn lattice_matrix(&self) -> Matrix3<f64> {
        let l = self.lattice;
        Matrix3::new(
            l[0][0], l[0][1], l[0][2],
            l[1][0], l[1][1], l[1][2],
            l[2][0], l[2][1], l[2][2],
        )
    }

    pub fn volume(&self) -> f64 {
        self.lattice_matrix().determinant().abs()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_orthorhombic() {
        let s = Structure::new([[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]], vec![]);
        assert!((s.volume() - 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_fractional() {
        let lattice = [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]];
        let s = Structure::from_fractional(lattice, &[("Cu", [0.5, 0.5, 0.5])]);
        assert_eq!(s.atom_count(), 1);
        assert!((s.atoms[0].position[0] - 2.0).abs() < 1e-12);
        assert_eq!(s.formula, "Cu");
    }
}
