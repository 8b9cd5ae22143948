// src/physics/operations/cut.rs
//
// Oriented-cut primitives. `orient_cell` re-expresses the bulk in a
// frame whose third axis is the minimal periodic repeat along the
// (h,k,l) normal; `terminate` cuts that (already trivial) axis at a
// chosen shift and inserts vacuum. Thickness is handled elsewhere by
// pure replication so the index-dependent transform runs exactly once.

use crate::error::SlabError;
use crate::model::structure::{Atom, Structure};
use crate::model::slab::VacuumPlacement;
use crate::physics::operations::miller_algo::find_plane_basis;
use crate::utils::linalg::wrap_frac;
use nalgebra::{Matrix3, Vector3};

const TOLERANCE: f64 = 1e-5;
const DUP_TOLERANCE: f64 = 1e-4;

/// Cuts the bulk along (h,k,l) with zero vacuum: the resulting cell has
/// in-plane lattice vectors a, b spanning the surface and c equal to
/// the minimal repeat along the normal. Volume and atom count match the
/// input cell (the transformation is unimodular).
pub fn orient_cell(structure: &Structure, h: i32, k: i32, l: i32) -> Result<Structure, SlabError> {
    if structure.is_empty() {
        return Err(SlabError::InvalidParameter("input structure has no atoms".into()));
    }

    let mat_orig = structure.lattice_matrix();
    if mat_orig.determinant().abs() < TOLERANCE {
        return Err(SlabError::Geometry("lattice is singular (zero volume)".into()));
    }

    let (u_vec, v_vec, w_vec) = find_plane_basis(h, k, l, structure.lattice)?;

    // Columns are the new basis expressed in the old one.
    let m_int = Matrix3::new(
        u_vec.x as f64, v_vec.x as f64, w_vec.x as f64,
        u_vec.y as f64, v_vec.y as f64, w_vec.y as f64,
        u_vec.z as f64, v_vec.z as f64, w_vec.z as f64,
    );
    let m_inv = m_int
        .try_inverse()
        .ok_or_else(|| SlabError::Geometry("singular plane-basis transformation".into()))?;

    // New lattice rows: a' = u.a + u.b + u.c etc.
    let lat_new = m_int.transpose() * mat_orig;

    let lat_inv = mat_orig
        .try_inverse()
        .ok_or_else(|| SlabError::Geometry("cannot invert lattice matrix".into()))?;

    // Image search range: the new cell's corners in old fractional
    // coordinates are bounded by the column sums of |M|.
    let range = |row: usize| -> i32 {
        (u_vec[row].abs() + v_vec[row].abs() + w_vec[row].abs()) + 1
    };
    let (ri, rj, rk) = (range(0), range(1), range(2));

    let mut mapped: Vec<(String, Vector3<f64>)> = Vec::new();

    for i in -ri..=ri {
        for j in -rj..=rj {
            for k_img in -rk..=rk {
                let image = Vector3::new(i as f64, j as f64, k_img as f64);

                for atom in &structure.atoms {
                    let cart = Vector3::from(atom.position);
                    let frac_orig = lat_inv.transpose() * cart;
                    let frac_new = m_inv * (frac_orig + image);

                    if in_unit_cell(frac_new) {
                        mapped.push((atom.element.clone(), frac_new));
                    }
                }
            }
        }
    }

    if mapped.is_empty() {
        return Err(SlabError::invalid_orientation(
            h,
            k,
            l,
            "no atoms mapped to oriented cell",
        ));
    }

    let mapped = dedup_fractional(mapped);

    let atoms = mapped
        .into_iter()
        .enumerate()
        .map(|(idx, (element, frac))| Atom {
            element,
            position: to_cart(lat_new, frac),
            original_index: idx,
        })
        .collect();

    Ok(Structure::new(to_rows(lat_new), atoms))
}

/// Candidate termination shifts for a trivially-oriented cell: cluster
/// the atoms' fractional c-projections (two layers merge when closer
/// than `layer_tol` Angstroms along the normal) and cut midway between
/// consecutive layers. Returned sorted ascending in [0, 1).
pub fn enumerate_shifts(cell: &Structure, layer_tol: f64) -> Vec<f64> {
    if cell.is_empty() {
        return Vec::new();
    }
    let lat = cell.lattice_matrix();
    let Some(lat_inv) = lat.try_inverse() else {
        return Vec::new();
    };

    let mut fz: Vec<f64> = cell
        .atoms
        .iter()
        .map(|a| {
            let frac = lat_inv.transpose() * Vector3::from(a.position);
            wrap_frac(frac.z, TOLERANCE)
        })
        .collect();
    fz.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Height of one period along the normal, to express layer_tol in
    // fractional units.
    let (a, b, c) = rows(lat);
    let normal = a.cross(&b);
    if normal.norm() < TOLERANCE {
        return Vec::new();
    }
    let height = c.dot(&normal.normalize()).abs();
    if height < TOLERANCE {
        return Vec::new();
    }
    let ftol = layer_tol / height;

    // Linear clustering over the sorted projections.
    let mut clusters: Vec<(f64, f64)> = Vec::new(); // (min, max)
    for &z in &fz {
        match clusters.last_mut() {
            Some(last) if z - last.1 < ftol => last.1 = z,
            _ => clusters.push((z, z)),
        }
    }

    // The gap between the last and first layer wraps around the cell.
    let wrap_open = if clusters.len() > 1 {
        let first = clusters[0];
        let last = clusters[clusters.len() - 1];
        (first.0 + 1.0) - last.1 >= ftol
    } else {
        true
    };

    let mut shifts = Vec::new();
    for pair in clusters.windows(2) {
        shifts.push((pair[0].1 + pair[1].0) / 2.0);
    }
    if wrap_open {
        let first = clusters[0];
        let last = clusters[clusters.len() - 1];
        shifts.push(wrap_frac((last.1 + first.0 + 1.0) / 2.0, TOLERANCE));
    }

    shifts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    shifts
}

/// Cuts a trivially-oriented cell at `shift` (fractional c) and inserts
/// the vacuum gap along the surface normal. Atom geometry is preserved;
/// only the periodic representation grows.
pub fn terminate(
    cell: &Structure,
    shift: f64,
    vacuum: f64,
    placement: VacuumPlacement,
) -> Result<Structure, SlabError> {
    let lat = cell.lattice_matrix();
    let lat_inv = lat
        .try_inverse()
        .ok_or_else(|| SlabError::Geometry("singular oriented lattice".into()))?;

    let (a_vec, b_vec, c_vec) = rows(lat);
    let normal = a_vec.cross(&b_vec);
    if normal.norm() < TOLERANCE {
        return Err(SlabError::Geometry("in-plane lattice vectors are parallel".into()));
    }
    let mut n_unit = normal.normalize();
    if n_unit.dot(&c_vec) < 0.0 {
        n_unit = -n_unit;
    }

    // New c: old c plus the vacuum gap along the normal.
    let c_new = c_vec + n_unit * vacuum;
    let c_proj_old = c_vec.dot(&n_unit);
    let c_proj_new = c_new.dot(&n_unit);
    if c_proj_new.abs() < TOLERANCE {
        return Err(SlabError::Geometry("cell has zero extent along the normal".into()));
    }
    let z_scale = c_proj_old / c_proj_new;

    let mut lat_slab = lat;
    lat_slab.set_row(2, &c_new.transpose());

    let mut atoms: Vec<Atom> = Vec::new();
    for atom in &cell.atoms {
        let frac = lat_inv.transpose() * Vector3::from(atom.position);
        let frac_cut = Vector3::new(
            wrap_frac(frac.x, TOLERANCE),
            wrap_frac(frac.y, TOLERANCE),
            wrap_frac(frac.z - shift, TOLERANCE) * z_scale,
        );
        atoms.push(Atom {
            element: atom.element.clone(),
            position: to_cart(lat_slab, frac_cut),
            original_index: atoms.len(),
        });
    }

    if placement == VacuumPlacement::Centered && !atoms.is_empty() {
        let mut lo = f64::MAX;
        let mut hi = f64::MIN;
        for atom in &atoms {
            let z = Vector3::from(atom.position).dot(&n_unit);
            lo = lo.min(z);
            hi = hi.max(z);
        }
        let delta = c_proj_new / 2.0 - (lo + hi) / 2.0;
        for atom in &mut atoms {
            let shifted = Vector3::from(atom.position) + n_unit * delta;
            atom.position = [shifted.x, shifted.y, shifted.z];
        }
    }

    Ok(Structure::new(to_rows(lat_slab), atoms))
}

/// Replaces c by its projection on the surface normal. Cartesian atom
/// positions are untouched, so relative interatomic geometry cannot
/// change; only the periodic representation does.
pub fn orthogonalize_c(cell: &Structure) -> Result<Structure, SlabError> {
    let lat = cell.lattice_matrix();
    let (a_vec, b_vec, c_vec) = rows(lat);
    let normal = a_vec.cross(&b_vec);
    if normal.norm() < TOLERANCE {
        return Err(SlabError::Geometry("in-plane lattice vectors are parallel".into()));
    }
    let mut n_unit = normal.normalize();
    if n_unit.dot(&c_vec) < 0.0 {
        n_unit = -n_unit;
    }

    let c_ortho = n_unit * c_vec.dot(&n_unit);
    let mut lat_new = lat;
    lat_new.set_row(2, &c_ortho.transpose());

    Ok(Structure::new(to_rows(lat_new), cell.atoms.clone()))
}

// --- helpers ---

fn in_unit_cell(frac: Vector3<f64>) -> bool {
    frac.x >= -TOLERANCE
        && frac.x < 1.0 - TOLERANCE
        && frac.y >= -TOLERANCE
        && frac.y < 1.0 - TOLERANCE
        && frac.z >= -TOLERANCE
        && frac.z < 1.0 - TOLERANCE
}

fn dedup_fractional(atoms: Vec<(String, Vector3<f64>)>) -> Vec<(String, Vector3<f64>)> {
    let mut unique: Vec<(String, Vector3<f64>)> = Vec::new();
    for (element, pos) in atoms {
        let wrapped = Vector3::new(
            wrap_frac(pos.x, TOLERANCE),
            wrap_frac(pos.y, TOLERANCE),
            wrap_frac(pos.z, TOLERANCE),
        );
        let dup = unique
            .iter()
            .any(|(_, seen)| (wrapped - seen).norm() < DUP_TOLERANCE);
        if !dup {
            unique.push((element, wrapped));
        }
    }
    unique
}

fn rows(lat: Matrix3<f64>) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    (
        Vector3::new(lat[(0, 0)], lat[(0, 1)], lat[(0, 2)]),
        Vector3::new(lat[(1, 0)], lat[(1, 1)], lat[(1, 2)]),
        Vector3::new(lat[(2, 0)], lat[(2, 1)], lat[(2, 2)]),
    )
}

fn to_cart(lat: Matrix3<f64>, frac: Vector3<f64>) -> [f64; 3] {
    let cart = lat.transpose() * frac;
    [cart.x, cart.y, cart.z]
}

fn to_rows(lat: Matrix3<f64>) -> [[f64; 3]; 3] {
    [
        [lat[(0, 0)], lat[(0, 1)], lat[(0, 2)]],
        [lat[(1, 0)], lat[(1, 1)], lat[(1, 2)]],
        [lat[(2, 0)], lat[(2, 1)], lat[(2, 2)]],
    ]
}
