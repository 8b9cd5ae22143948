// src/physics/analysis/surfaces.rs
//
// Face extraction and the two-face symmetry check. A slab's top and
// bottom regions are matched under the lattice-preserving rigid
// motions that turn a slab upside down: inversion and the mirror
// through the surface plane always preserve the in-plane lattice, the
// two in-plane 2-fold axes only when a and b are orthogonal.

use crate::model::record::SymmetryVerdict;
use crate::model::slab::Slab;
use crate::physics::analysis::matcher::{match_regions, Region, Site};
use crate::utils::linalg::{cart_to_frac, wrap_frac};
use nalgebra::Vector3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Top,
    Bottom,
}

/// Collects the atoms within `depth` Angstroms of the chosen face,
/// measured along the surface normal. Site depths are face-relative,
/// increasing into the slab, so regions from opposite faces compare
/// directly. None when the slab has no atoms or the lattice is
/// degenerate.
pub fn extract_face(slab: &Slab, face: Face, depth: f64) -> Option<Region> {
    if slab.structure.is_empty() {
        return None;
    }
    let n = slab.normal();
    let lattice = slab.structure.lattice;

    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    let heights: Vec<f64> = slab
        .structure
        .atoms
        .iter()
        .map(|a| Vector3::from(a.position).dot(&n))
        .collect();
    for &z in &heights {
        lo = lo.min(z);
        hi = hi.max(z);
    }

    let mut sites = Vec::new();
    for (atom, &z) in slab.structure.atoms.iter().zip(&heights) {
        let from_face = match face {
            Face::Top => hi - z,
            Face::Bottom => z - lo,
        };
        if from_face > depth {
            continue;
        }
        let frac = cart_to_frac(atom.position, lattice)?;
        sites.push(Site {
            element: atom.element.clone(),
            fa: wrap_frac(frac[0], 1e-8),
            fb: wrap_frac(frac[1], 1e-8),
            z: from_face,
        });
    }
    if sites.is_empty() {
        return None;
    }

    Some(Region {
        sites,
        a: Vector3::from(lattice[0]),
        b: Vector3::from(lattice[1]),
    })
}

/// Classifies a slab's two faces as equivalent or not.
///
/// The bottom region is flipped through each candidate rigid motion
/// and matched against the top region; the verdict carries the RMS
/// residual of the best successful match. `Undetermined` is returned
/// for non-positive `depth` or `tol`, or when a region cannot be
/// extracted, and is distinct from a definite `Asymmetric`.
pub fn compare_faces(slab: &Slab, depth: f64, tol: f64) -> SymmetryVerdict {
    if depth <= 0.0 || tol <= 0.0 {
        return SymmetryVerdict::Undetermined;
    }
    let top = match extract_face(slab, Face::Top, depth) {
        Some(r) => r,
        None => return SymmetryVerdict::Undetermined,
    };
    let bottom = match extract_face(slab, Face::Bottom, depth) {
        Some(r) => r,
        None => return SymmetryVerdict::Undetermined,
    };

    let mut best: Option<f64> = None;
    for (sa, sb) in flip_family(&top) {
        let flipped = Region {
            sites: bottom
                .sites
                .iter()
                .map(|s| Site {
                    element: s.element.clone(),
                    fa: sa * s.fa,
                    fb: sb * s.fb,
                    z: s.z,
                })
                .collect(),
            a: bottom.a,
            b: bottom.b,
        };
        if let Some(rms) = match_regions(&top, &flipped, tol) {
            if best.map_or(true, |b| rms < b) {
                best = Some(rms);
            }
        }
    }

    match best {
        Some(rmsd) => SymmetryVerdict::Symmetric { rmsd },
        None => SymmetryVerdict::Asymmetric,
    }
}

/// Whole-slab congruence test: true when some rigid motion maps every
/// atom of `a` onto an atom of `b` of the same element within `tol`
/// Angstroms. Candidate motions combine an in-plane translation, the
/// in-plane flips of `flip_family`, and optionally turning the slab
/// upside down. Used to collapse terminations of one orientation that
/// are related by the bulk crystal's own symmetry.
pub fn slabs_equivalent(a: &Slab, b: &Slab, tol: f64) -> bool {
    if a.atom_count() != b.atom_count() {
        return false;
    }
    let (ra, rb) = match (
        extract_face(a, Face::Bottom, f64::INFINITY),
        extract_face(b, Face::Bottom, f64::INFINITY),
    ) {
        (Some(ra), Some(rb)) => (ra, rb),
        _ => return false,
    };
    let span = rb.sites.iter().fold(0.0_f64, |m, s| m.max(s.z));

    for (sa, sb) in flip_family(&ra) {
        for upside_down in [false, true] {
            let cand = Region {
                sites: rb
                    .sites
                    .iter()
                    .map(|s| Site {
                        element: s.element.clone(),
                        fa: sa * s.fa,
                        fb: sb * s.fb,
                        z: if upside_down { span - s.z } else { s.z },
                    })
                    .collect(),
                a: rb.a,
                b: rb.b,
            };
            if match_regions(&ra, &cand, tol).is_some() {
                return true;
            }
        }
    }
    false
}

/// In-plane sign pairs of the candidate flips. Inversion (-,-) and the
/// surface mirror (+,+) are isometries for every in-plane lattice; the
/// 2-fold axes along a and b additionally need a.b = 0.
fn flip_family(region: &Region) -> Vec<(f64, f64)> {
    let mut flips = vec![(-1.0, -1.0), (1.0, 1.0)];
    let skew = region.a.dot(&region.b).abs();
    if skew < 1e-6 * region.a.norm() * region.b.norm() {
        flips.push((1.0, -1.0));
        flips.push((-1.0, 1.0));
    }
    flips
}
