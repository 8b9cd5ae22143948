// src/physics/analysis/matcher.rs
//
// Species-aware, translation- and order-invariant matching of two
// atomic regions that share an in-plane periodic lattice. Sites carry
// fractional in-plane coordinates (periodic) and a Cartesian depth
// (not periodic), so in-plane deltas wrap and depth deltas do not.

use crate::utils::linalg::wrap_half;
use nalgebra::Vector3;

/// One atom of a face region. `fa`/`fb` are fractional along the
/// in-plane lattice vectors; `z` is Cartesian depth from the face,
/// increasing into the slab.
#[derive(Clone, Debug)]
pub struct Site {
    pub element: String,
    pub fa: f64,
    pub fb: f64,
    pub z: f64,
}

/// A face region together with the in-plane lattice vectors needed to
/// turn fractional deltas into Cartesian distances.
#[derive(Clone, Debug)]
pub struct Region {
    pub sites: Vec<Site>,
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
}

impl Region {
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    fn species_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for site in &self.sites {
            match counts.iter_mut().find(|(e, _)| *e == site.element) {
                Some((_, n)) => *n += 1,
                None => counts.push((&site.element, 1)),
            }
        }
        counts.sort();
        counts
    }
}

/// Tests whether some rigid translation maps `left` onto `right` with
/// every site landing within `tol` Angstroms of a partner of the same
/// element. Returns the RMS residual of the best such mapping, or None
/// when no translation works.
///
/// Candidate translations are anchored on the rarest species: any
/// valid translation must map the first `left` site of that species
/// onto *some* `right` site of it, so only those few offsets are
/// tried.
pub fn match_regions(left: &Region, right: &Region, tol: f64) -> Option<f64> {
    if left.sites.len() != right.sites.len() {
        return None;
    }
    if left.is_empty() {
        return None;
    }
    if left.species_counts() != right.species_counts() {
        return None;
    }

    let anchor_elem = rarest_species(left)?;
    let anchor = left.sites.iter().find(|s| s.element == anchor_elem)?;

    let mut best: Option<f64> = None;
    for target in right.sites.iter().filter(|s| s.element == anchor_elem) {
        let dz = target.z - anchor.z;
        if dz.abs() > tol {
            continue;
        }
        let ta = target.fa - anchor.fa;
        let tb = target.fb - anchor.fb;
        if let Some(rms) = try_translation(left, right, ta, tb, dz, tol) {
            if best.map_or(true, |b| rms < b) {
                best = Some(rms);
            }
        }
    }
    best
}

fn rarest_species(region: &Region) -> Option<String> {
    let counts = region.species_counts();
    counts
        .iter()
        .min_by_key(|(_, n)| *n)
        .map(|(e, _)| e.to_string())
}

/// One-to-one assignment under one fixed translation. Each left site's
/// partners within `tol` form a bipartite graph; an augmenting-path
/// search finds a perfect matching if one exists, so a site with many
/// options cannot steal the only partner a later site fits.
fn try_translation(
    left: &Region,
    right: &Region,
    ta: f64,
    tb: f64,
    dz: f64,
    tol: f64,
) -> Option<f64> {
    let mut candidates: Vec<Vec<(usize, f64)>> = Vec::with_capacity(left.sites.len());
    for site in &left.sites {
        let mut row: Vec<(usize, f64)> = Vec::new();
        for (j, cand) in right.sites.iter().enumerate() {
            if cand.element != site.element {
                continue;
            }
            let d = site_distance(left, site, cand, ta, tb, dz);
            if d < tol {
                row.push((j, d));
            }
        }
        if row.is_empty() {
            return None;
        }
        row.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates.push(row);
    }

    // owner[j] = left site currently matched to right site j
    let mut owner: Vec<Option<usize>> = vec![None; right.sites.len()];
    for i in 0..candidates.len() {
        let mut visited = vec![false; right.sites.len()];
        if !augment(i, &candidates, &mut owner, &mut visited) {
            return None;
        }
    }

    let mut sum_sq = 0.0;
    for (j, slot) in owner.iter().enumerate() {
        if let Some(i) = slot {
            let d = candidates[*i]
                .iter()
                .find(|(cand, _)| *cand == j)
                .map(|(_, d)| *d)?;
            sum_sq += d * d;
        }
    }
    Some((sum_sq / left.sites.len() as f64).sqrt())
}

fn augment(
    i: usize,
    candidates: &[Vec<(usize, f64)>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &(j, _) in &candidates[i] {
        if visited[j] {
            continue;
        }
        visited[j] = true;
        let freed = match owner[j] {
            None => true,
            Some(prev) => augment(prev, candidates, owner, visited),
        };
        if freed {
            owner[j] = Some(i);
            return true;
        }
    }
    false
}

fn site_distance(region: &Region, from: &Site, to: &Site, ta: f64, tb: f64, dz: f64) -> f64 {
    let da = wrap_half(from.fa + ta - to.fa);
    let db = wrap_half(from.fb + tb - to.fb);
    let in_plane = region.a * da + region.b * db;
    let out = from.z + dz - to.z;
    (in_plane.norm_squared() + out * out).sqrt()
}
