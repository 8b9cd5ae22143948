// src/physics/operations/supercell.rs

use crate::model::structure::{Atom, Structure};
use nalgebra::Vector3;

/// Replicates a cell along its lattice vectors. Atoms are Cartesian, so
/// replication is plain translation by integer multiples of the rows;
/// the lattice rows are scaled to match.
pub fn replicate(structure: &Structure, nx: u32, ny: u32, nz: u32) -> Structure {
    let (nx, ny, nz) = (nx.max(1), ny.max(1), nz.max(1));
    let a = Vector3::from(structure.lattice[0]);
    let b = Vector3::from(structure.lattice[1]);
    let c = Vector3::from(structure.lattice[2]);

    let mut atoms = Vec::with_capacity(structure.atom_count() * (nx * ny * nz) as usize);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let t = a * x as f64 + b * y as f64 + c * z as f64;
                for atom in &structure.atoms {
                    let pos = Vector3::from(atom.position) + t;
                    atoms.push(Atom {
                        element: atom.element.clone(),
                        position: [pos.x, pos.y, pos.z],
                        original_index: atoms.len(),
                    });
                }
            }
        }
    }

    let scaled = |v: Vector3<f64>, n: u32| [v.x * n as f64, v.y * n as f64, v.z * n as f64];
    Structure::new([scaled(a, nx), scaled(b, ny), scaled(c, nz)], atoms)
}

/// Replication along the out-of-plane axis only; the thickness step of
/// slab generation.
pub fn replicate_c(structure: &Structure, reps: u32) -> Structure {
    replicate(structure, 1, 1, reps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structure::Structure;

    #[test]
    fn test_replicate_c() {
        let lattice = [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]];
        let cell = Structure::from_fractional(
            lattice,
            &[("Mo", [0.0, 0.0, 0.1]), ("C", [0.5, 0.5, 0.6])],
        );
        let thick = replicate_c(&cell, 3);
        assert_eq!(thick.atom_count(), 6);
        assert!((thick.lattice[2][2] - 12.0).abs() < 1e-12);
        assert!((thick.lattice[0][0] - 3.0).abs() < 1e-12);
        // formula unchanged by replication
        assert_eq!(thick.formula, cell.formula);
        // third image of the first atom sits two c-repeats up
        assert!((thick.atoms[4].position[2] - (0.4 + 8.0)).abs() < 1e-12);
    }
}
