// src/physics/slab.rs
//
// Two-stage slab generation. The index-dependent cut runs once, at
// minimal thickness; thickness then grows by pure periodic replication
// along the already-trivial out-of-plane axis, and only that axis is
// cut again for vacuum and termination selection. Applying the raw
// (h,k,l) cut at full thickness would compound alignment error per
// repeat at high indices.

use crate::config::SlabParams;
use crate::error::SlabError;
use crate::model::slab::Slab;
use crate::model::structure::Structure;
use crate::physics::analysis::surfaces::slabs_equivalent;
use crate::physics::operations::cut::{enumerate_shifts, orient_cell, orthogonalize_c, terminate};
use crate::physics::operations::supercell::replicate_c;
use log::debug;

/// Generates the default (shift = 0) termination for one orientation.
pub fn generate_slab(
    structure: &Structure,
    h: i32,
    k: i32,
    l: i32,
    params: &SlabParams,
) -> Result<Slab, SlabError> {
    validate(structure, h, k, l, params)?;

    let oriented = orient_cell(structure, h, k, l)?;
    let thick = replicate_c(&oriented, params.thickness_reps);
    build_termination(&thick, h, k, l, 0.0, params)?.ok_or_else(|| {
        SlabError::invalid_orientation(h, k, l, "default termination produced no atoms")
    })
}

/// Generates one slab per physically distinct termination of the
/// (h,k,l) orientation, ordered by shift ascending. Shifts within
/// `params.shift_tol` of an already-emitted one, or producing an empty
/// slab, are skipped; so is any slab structurally congruent to an
/// already-emitted one (terminations related by the crystal's own
/// symmetry are the same surface and are kept once, under the
/// smallest shift).
pub fn generate_all_terminations(
    structure: &Structure,
    h: i32,
    k: i32,
    l: i32,
    params: &SlabParams,
) -> Result<Vec<Slab>, SlabError> {
    validate(structure, h, k, l, params)?;

    let oriented = orient_cell(structure, h, k, l)?;
    // Shifts are enumerated on the single-repeat cell: replicated
    // copies of a layer are the same termination.
    let shifts = enumerate_shifts(&oriented, params.layer_tol);
    let thick = replicate_c(&oriented, params.thickness_reps);

    let mut slabs: Vec<Slab> = Vec::new();
    for shift in shifts {
        if slabs
            .iter()
            .any(|s| (s.shift - shift).abs() < params.shift_tol)
        {
            continue;
        }
        if let Some(slab) = build_termination(&thick, h, k, l, shift, params)? {
            if slabs
                .iter()
                .any(|s| slabs_equivalent(s, &slab, params.layer_tol))
            {
                continue;
            }
            slabs.push(slab);
        }
    }

    debug!(
        "({},{},{}): {} termination(s), {} atoms each",
        h,
        k,
        l,
        slabs.len(),
        slabs.first().map_or(0, |s| s.atom_count())
    );
    Ok(slabs)
}

fn validate(
    structure: &Structure,
    h: i32,
    k: i32,
    l: i32,
    params: &SlabParams,
) -> Result<(), SlabError> {
    if h == 0 && k == 0 && l == 0 {
        return Err(SlabError::invalid_orientation(h, k, l, "undefined plane"));
    }
    if params.thickness_reps == 0 {
        return Err(SlabError::InvalidParameter(
            "thickness must be at least one repetition".into(),
        ));
    }
    if params.vacuum < 0.0 {
        return Err(SlabError::InvalidParameter("vacuum cannot be negative".into()));
    }
    if structure.is_empty() {
        return Err(SlabError::InvalidParameter("input structure has no atoms".into()));
    }
    Ok(())
}

/// Cuts the replicated cell at one shift. The shift is expressed in the
/// oriented *unit* cell; the replicated cell is cut at shift/reps,
/// which targets the same layer boundary.
fn build_termination(
    thick: &Structure,
    h: i32,
    k: i32,
    l: i32,
    shift: f64,
    params: &SlabParams,
) -> Result<Option<Slab>, SlabError> {
    let reps = params.thickness_reps as f64;
    let mut cell = terminate(thick, shift / reps, params.vacuum, params.placement)?;
    if params.orthogonalize {
        cell = orthogonalize_c(&cell)?;
    }
    if cell.is_empty() {
        return Ok(None);
    }
    Ok(Some(Slab {
        structure: cell,
        miller_index: [h, k, l],
        shift,
        thickness_reps: params.thickness_reps,
        vacuum_length: params.vacuum,
        placement: params.placement,
        orthogonalized: params.orthogonalize,
        material_id: None,
    }))
}
