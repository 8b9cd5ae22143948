// src/physics/operations/miller_algo.rs

use crate::error::SlabError;
use nalgebra::{Matrix3, Vector3};

const SEARCH_LIMIT: i32 = 6;

pub fn gcd(a: i32, b: i32) -> i32 {
    let (a, b) = (a.abs(), b.abs());
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Divide (h,k,l) by its greatest common divisor. (2,2,0) and (1,1,0)
/// name the same plane family.
pub fn reduce_index(h: i32, k: i32, l: i32) -> (i32, i32, i32) {
    let g = gcd(gcd(h, k), l);
    if g <= 1 {
        (h, k, l)
    } else {
        (h / g, k / g, l / g)
    }
}

/// Finds an integer basis (u, v, w) for the (h,k,l) cut:
/// - u, v span the plane lattice {x : h*x = 0} primitively, so the
///   transformation is unimodular and the oriented cell keeps the bulk
///   cell's volume and atom count;
/// - w is the shortest lattice vector with h*w = 1, the minimal
///   periodic repeat along the surface normal.
///
/// The basis is returned right-handed with cross(u, v) = +(h,k,l).
pub fn find_plane_basis(
    h: i32,
    k: i32,
    l: i32,
    lattice: [[f64; 3]; 3],
) -> Result<(Vector3<i32>, Vector3<i32>, Vector3<i32>), SlabError> {
    if h == 0 && k == 0 && l == 0 {
        return Err(SlabError::invalid_orientation(h, k, l, "undefined plane"));
    }
    let (h, k, l) = reduce_index(h, k, l);

    let mat_orig = Matrix3::new(
        lattice[0][0], lattice[0][1], lattice[0][2],
        lattice[1][0], lattice[1][1], lattice[1][2],
        lattice[2][0], lattice[2][1], lattice[2][2],
    );

    // In-plane candidates sorted by physical (Cartesian) length.
    let mut in_plane: Vec<(Vector3<i32>, f64)> = Vec::new();
    // Stacking candidates: one interplanar spacing per repeat.
    let mut stacking: Vec<(Vector3<i32>, f64)> = Vec::new();

    for x in -SEARCH_LIMIT..=SEARCH_LIMIT {
        for y in -SEARCH_LIMIT..=SEARCH_LIMIT {
            for z in -SEARCH_LIMIT..=SEARCH_LIMIT {
                if x == 0 && y == 0 && z == 0 {
                    continue;
                }
                let dot = h * x + k * y + l * z;
                let vec_int = Vector3::new(x, y, z);
                let cart = mat_orig.transpose() * Vector3::new(x as f64, y as f64, z as f64);
                let len_sq = cart.norm_squared();
                if dot == 0 {
                    in_plane.push((vec_int, len_sq));
                } else if dot == 1 {
                    stacking.push((vec_int, len_sq));
                }
            }
        }
    }

    in_plane.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    stacking.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let u_vec = in_plane
        .first()
        .map(|c| c.0)
        .ok_or_else(|| SlabError::invalid_orientation(h, k, l, "no in-plane lattice vector found"))?;

    // v must complete a *primitive* basis of the plane lattice, which
    // holds exactly when cross(u, v) = +-(h,k,l).
    let hkl = Vector3::new(h, k, l);
    let mut v_vec = None;
    for cand in in_plane.iter().skip(1) {
        let cp = cross_int(u_vec, cand.0);
        if cp == hkl || cp == -hkl {
            v_vec = Some(cand.0);
            break;
        }
    }
    let v_vec = v_vec.ok_or_else(|| {
        SlabError::invalid_orientation(h, k, l, "no primitive surface unit cell found")
    })?;

    let w_vec = stacking
        .first()
        .map(|c| c.0)
        .ok_or_else(|| SlabError::invalid_orientation(h, k, l, "no stacking vector found"))?;

    // Right-handed: make cross(u, v) point along +(h,k,l) so that
    // det[u v w] = (h,k,l) . w = +1.
    if cross_int(u_vec, v_vec) == -hkl {
        Ok((v_vec, u_vec, w_vec))
    } else {
        Ok((u_vec, v_vec, w_vec))
    }
}

fn cross_int(a: Vector3<i32>, b: Vector3<i32>) -> Vector3<i32> {
    Vector3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBIC: [[f64; 3]; 3] = [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]];

    #[test]
    fn test_reduce_index() {
        assert_eq!(reduce_index(2, 2, 0), (1, 1, 0));
        assert_eq!(reduce_index(-2, 0, 4), (-1, 0, 2));
        assert_eq!(reduce_index(1, 1, 1), (1, 1, 1));
        assert_eq!(reduce_index(0, 0, 3), (0, 0, 1));
    }

    #[test]
    fn test_basis_is_unimodular() {
        for (h, k, l) in [(0, 0, 1), (1, 1, 0), (1, 1, 1), (2, 1, 0), (3, 1, 1)] {
            let (u, v, w) = find_plane_basis(h, k, l, CUBIC).unwrap();
            let det = Vector3::new(h, k, l).dot(&w); // = cross(u,v) . w
            assert_eq!(det, 1, "det for ({},{},{})", h, k, l);
            assert_eq!(h * u.x + k * u.y + l * u.z, 0);
            assert_eq!(h * v.x + k * v.y + l * v.z, 0);
            assert_eq!(h * w.x + k * w.y + l * w.z, 1);
        }
    }

    #[test]
    fn test_zero_index_rejected() {
        let err = find_plane_basis(0, 0, 0, CUBIC).unwrap_err();
        assert!(matches!(err, SlabError::InvalidOrientation { .. }));
    }

    #[test]
    fn test_reduced_index_used() {
        // (2,2,2) must behave as (1,1,1)
        let (_, _, w) = find_plane_basis(2, 2, 2, CUBIC).unwrap();
        assert_eq!(w.x + w.y + w.z, 1);
    }

    #[test]
    fn test_orthorhombic_111_shortest_u() {
        let lattice = [[4.724, 0.0, 0.0], [0.0, 6.004, 0.0], [0.0, 0.0, 5.199]];
        let (u, v, _) = find_plane_basis(1, 1, 1, lattice).unwrap();
        // The shortest in-plane vector for this cell is (1,0,-1).
        assert!(u == Vector3::new(1, 0, -1) || u == Vector3::new(-1, 0, 1));
        assert_eq!(u.x + u.y + u.z, 0);
        assert_eq!(v.x + v.y + v.z, 0);
    }
}
