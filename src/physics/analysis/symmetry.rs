// src/physics/analysis/symmetry.rs

use crate::error::SlabError;
use crate::model::elements::get_atomic_number;
use crate::model::structure::Structure;
use crate::physics::operations::miller_algo::reduce_index;
use moyo::base::{AngleTolerance, Cell, Lattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::{Matrix3, RowVector3, Vector3};

pub struct SpaceGroupInfo {
    pub number: i32,
    pub hall_number: i32,
    pub system: &'static str,
}

/// Identifies the space group of a structure (provenance/reporting).
pub fn space_group(structure: &Structure, symprec: f64) -> Result<SpaceGroupInfo, SlabError> {
    let dataset = run_moyo(structure, symprec)?;
    let system = match dataset.number {
        1..=2 => "Triclinic",
        3..=15 => "Monoclinic",
        16..=74 => "Orthorhombic",
        75..=142 => "Tetragonal",
        143..=167 => "Trigonal",
        168..=194 => "Hexagonal",
        195..=230 => "Cubic",
        _ => "Unknown",
    };
    Ok(SpaceGroupInfo {
        number: dataset.number,
        hall_number: dataset.hall_number,
        system,
    })
}

/// Rotation parts of the structure's space-group operations, with
/// duplicates (from distinct translation parts) removed. These act on
/// fractional coordinates.
pub fn point_group_rotations(
    structure: &Structure,
    symprec: f64,
) -> Result<Vec<Matrix3<i32>>, SlabError> {
    let dataset = run_moyo(structure, symprec)?;
    let mut rotations: Vec<Matrix3<i32>> = Vec::new();
    for op in dataset.operations.iter() {
        if !rotations.contains(&op.rotation) {
            rotations.push(op.rotation);
        }
    }
    Ok(rotations)
}

/// Enumerates symmetrically distinct Miller indices with components in
/// [-max_index, max_index]. Two indices are equivalent when a proper or
/// improper point-group operation maps one plane family to the other;
/// only the first-seen representative of each orbit is returned, in a
/// fixed descending scan order.
pub fn distinct_miller_indices(
    structure: &Structure,
    max_index: i32,
    symprec: f64,
) -> Result<Vec<(i32, i32, i32)>, SlabError> {
    if max_index <= 0 {
        return Err(SlabError::InvalidParameter(
            "Miller index bound must be positive".into(),
        ));
    }
    let rotations = point_group_rotations(structure, symprec)?;

    let mut seen: Vec<(i32, i32, i32)> = Vec::new();
    let mut distinct: Vec<(i32, i32, i32)> = Vec::new();

    let range = (-max_index..=max_index).rev();
    for h in range.clone() {
        for k in range.clone() {
            for l in range.clone() {
                if h == 0 && k == 0 && l == 0 {
                    continue;
                }
                // Only gcd-reduced triples name distinct plane families.
                if reduce_index(h, k, l) != (h, k, l) {
                    continue;
                }
                if seen.contains(&(h, k, l)) {
                    continue;
                }
                distinct.push((h, k, l));
                for rot in &rotations {
                    // Miller indices live in the reciprocal lattice:
                    // they transform as row vectors, h' = h W.
                    let image = RowVector3::new(h, k, l) * rot;
                    let img = (image[0], image[1], image[2]);
                    if !seen.contains(&img) {
                        seen.push(img);
                    }
                }
            }
        }
    }
    Ok(distinct)
}

fn run_moyo(structure: &Structure, symprec: f64) -> Result<MoyoDataset, SlabError> {
    let lattice_mat = structure.lattice_matrix();
    let inv_mat = lattice_mat
        .try_inverse()
        .ok_or_else(|| SlabError::Geometry("lattice is singular".into()))?;

    let mut positions = Vec::new();
    let mut numbers = Vec::new();
    let mut unknown: Vec<String> = Vec::new();

    for atom in &structure.atoms {
        let v_cart = Vector3::from(atom.position);
        let v_frac = inv_mat.transpose() * v_cart;
        positions.push(v_frac);

        let z = get_atomic_number(&atom.element);
        let id = if z > 0 {
            z
        } else {
            // Unknown symbols still need distinct species ids.
            let idx = unknown
                .iter()
                .position(|e| *e == atom.element)
                .unwrap_or_else(|| {
                    unknown.push(atom.element.clone());
                    unknown.len() - 1
                });
            200 + idx as i32
        };
        numbers.push(id);
    }

    let cell = Cell::new(Lattice::new(lattice_mat), positions, numbers);
    MoyoDataset::new(&cell, symprec, AngleTolerance::Default, Setting::Spglib, false)
        .map_err(|e| SlabError::Symmetry(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic_monatomic() -> Structure {
        let lattice = [[3.6, 0.0, 0.0], [0.0, 3.6, 0.0], [0.0, 0.0, 3.6]];
        Structure::from_fractional(lattice, &[("Cu", [0.0, 0.0, 0.0])])
    }

    #[test]
    fn test_cubic_point_group_order() {
        let rots = point_group_rotations(&cubic_monatomic(), 1e-4).unwrap();
        assert_eq!(rots.len(), 48); // m-3m
    }

    #[test]
    fn test_cubic_distinct_indices_bound_1() {
        let distinct = distinct_miller_indices(&cubic_monatomic(), 1, 1e-4).unwrap();
        // (100), (110), (111) up to full cubic symmetry
        assert_eq!(distinct.len(), 3);
        for (h, k, l) in &distinct {
            assert!(h.abs() <= 1 && k.abs() <= 1 && l.abs() <= 1);
        }
    }

    #[test]
    fn test_distinct_excludes_unreduced() {
        let distinct = distinct_miller_indices(&cubic_monatomic(), 2, 1e-4).unwrap();
        assert!(!distinct.contains(&(2, 0, 0)));
        assert!(!distinct.contains(&(2, 2, 2)));
    }

    #[test]
    fn test_invalid_bound() {
        let err = distinct_miller_indices(&cubic_monatomic(), 0, 1e-4).unwrap_err();
        assert!(matches!(err, SlabError::InvalidParameter(_)));
    }

    #[test]
    fn test_space_group_cubic() {
        let info = space_group(&cubic_monatomic(), 1e-4).unwrap();
        assert_eq!(info.number, 221); // Pm-3m for one atom on a cubic cell
        assert_eq!(info.system, "Cubic");
    }
}
