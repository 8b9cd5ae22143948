// tests/screening.rs
//
// End-to-end screening scenarios on three bulk fixtures: an exact
// Pbcn alpha-Mo2C cell (positions generated from the space-group
// operations), the 12-atom synthetic Mo2C cell of lower actual
// symmetry, and a primitive fcc metal.

use slabgen::{
    distinct_miller_indices, generate_all_terminations, space_group, ScreeningConfig,
    ScreeningEvent, Screener, SlabParams, Structure, SymmetryVerdict,
};
use std::sync::atomic::{AtomicBool, Ordering};

const MO2C_LATTICE: [[f64; 3]; 3] = [
    [4.724, 0.0, 0.0],
    [0.0, 6.004, 0.0],
    [0.0, 0.0, 5.199],
];

/// alpha-Mo2C with Mo on 8d (0.25, 0.12, 0.08) and C on 4c (0, 0.35, 1/4),
/// expanded through the eight Pbcn general positions.
fn mo2c_pbcn() -> Structure {
    Structure::from_fractional(
        MO2C_LATTICE,
        &[
            ("Mo", [0.25, 0.12, 0.08]),
            ("Mo", [0.25, 0.38, 0.58]),
            ("Mo", [0.75, 0.12, 0.42]),
            ("Mo", [0.75, 0.38, 0.92]),
            ("Mo", [0.75, 0.88, 0.92]),
            ("Mo", [0.75, 0.62, 0.42]),
            ("Mo", [0.25, 0.88, 0.58]),
            ("Mo", [0.25, 0.62, 0.08]),
            ("C", [0.0, 0.35, 0.25]),
            ("C", [0.5, 0.15, 0.75]),
            ("C", [0.0, 0.65, 0.75]),
            ("C", [0.5, 0.85, 0.25]),
        ],
    )
}

/// The hand-written 12-atom Mo2C cell. Close to Pbcn but not exactly
/// on it; used as a fixed regression fixture for slab geometry.
fn mo2c_synthetic() -> Structure {
    Structure::from_fractional(
        MO2C_LATTICE,
        &[
            ("Mo", [0.25, 0.12, 0.08]),
            ("Mo", [0.75, 0.88, 0.92]),
            ("Mo", [0.25, 0.62, 0.42]),
            ("Mo", [0.75, 0.38, 0.58]),
            ("Mo", [0.25, 0.88, 0.58]),
            ("Mo", [0.75, 0.12, 0.42]),
            ("Mo", [0.25, 0.38, 0.92]),
            ("Mo", [0.75, 0.62, 0.08]),
            ("C", [0.0, 0.35, 0.25]),
            ("C", [0.5, 0.65, 0.75]),
            ("C", [0.0, 0.85, 0.75]),
            ("C", [0.5, 0.15, 0.25]),
        ],
    )
}

fn fcc_copper() -> Structure {
    let half = 3.61 / 2.0;
    Structure::from_fractional(
        [[0.0, half, half], [half, 0.0, half], [half, half, 0.0]],
        &[("Cu", [0.0, 0.0, 0.0])],
    )
}

#[test]
fn pbcn_cell_identifies_as_pbcn() {
    let info = space_group(&mo2c_pbcn(), 1e-4).unwrap();
    assert_eq!(info.number, 60);
    assert_eq!(info.system, "Orthorhombic");
}

#[test]
fn pbcn_cell_has_seven_distinct_orientations_at_bound_1() {
    let distinct = distinct_miller_indices(&mo2c_pbcn(), 1, 1e-4).unwrap();
    // mmm point group: {100},{010},{001},{110},{101},{011},{111}
    assert_eq!(distinct.len(), 7);
    for &(h, k, l) in &distinct {
        assert!(h.abs() <= 1 && k.abs() <= 1 && l.abs() <= 1);
        assert!((h, k, l) != (0, 0, 0));
    }
}

#[test]
fn synthetic_mo2c_111_terminations() {
    let params = SlabParams {
        thickness_reps: 3,
        vacuum: 15.0,
        ..SlabParams::default()
    };
    let slabs = generate_all_terminations(&mo2c_synthetic(), 1, 1, 1, &params).unwrap();

    // Six layer gaps survive the 0.1 A merge tolerance.
    assert_eq!(slabs.len(), 6);
    for slab in &slabs {
        assert_eq!(slab.atom_count(), 36);
        assert_eq!(slab.formula(), "Mo2C");
        // In-plane cell area V / d_111 for this lattice
        assert!((slab.surface_area() - 48.81).abs() < 0.05);
        assert!(slab.shift >= 0.0 && slab.shift < 1.0);
    }
    for w in slabs.windows(2) {
        assert!(w[0].shift < w[1].shift);
    }
}

#[test]
fn pbcn_screen_covers_every_orientation() {
    let config = ScreeningConfig {
        max_index: 1,
        slab: SlabParams {
            thickness_reps: 2,
            ..SlabParams::default()
        },
        ..ScreeningConfig::default()
    };
    let outcome = Screener::new(mo2c_pbcn(), config).screen(None, None).unwrap();

    assert_eq!(outcome.total_orientations, 7);
    assert_eq!(outcome.completed_orientations, 7);
    assert!(outcome.failures.is_empty());
    assert!(!outcome.cancelled);
    assert_eq!(outcome.orientation_count(), 7);

    // Symmetry-equivalent cuts are collapsed, so each record is a
    // structurally distinct termination. For this cell: 21 in total,
    // 10 with equivalent faces and 11 without.
    assert_eq!(outcome.records.len(), 21);
    let symmetric = outcome
        .records
        .iter()
        .filter(|r| r.symmetry.is_symmetric())
        .count();
    assert_eq!(symmetric, 10);
    assert_eq!(outcome.records.len() - symmetric, 11);

    // Terminations per orientation follow the layer structure modulo
    // the stabilizer of each plane family.
    for (miller, count) in [
        ([1, 1, 1], 6),
        ([1, 1, 0], 3),
        ([1, 0, 1], 2),
        ([1, 0, 0], 1),
        ([0, 1, 1], 4),
        ([0, 1, 0], 3),
        ([0, 0, 1], 2),
    ] {
        let n = outcome
            .records
            .iter()
            .filter(|r| r.miller_index == miller)
            .count();
        assert_eq!(n, count, "terminations for {:?}", miller);
    }

    // Records are unique per (orientation, shift) and every verdict is
    // determined: faces were extractable for all of them.
    for (i, a) in outcome.records.iter().enumerate() {
        assert_ne!(a.symmetry, SymmetryVerdict::Undetermined);
        for b in &outcome.records[i + 1..] {
            assert!(a.miller_index != b.miller_index || (a.shift - b.shift).abs() > 1e-8);
        }
    }
}

#[test]
fn cancellation_keeps_partial_records() {
    let config = ScreeningConfig {
        max_index: 1,
        slab: SlabParams {
            thickness_reps: 2,
            ..SlabParams::default()
        },
        ..ScreeningConfig::default()
    };
    let cancel = AtomicBool::new(false);
    let progress = |done: usize, _total: usize| {
        if done == 3 {
            cancel.store(true, Ordering::Relaxed);
        }
    };
    let outcome = Screener::new(mo2c_pbcn(), config)
        .screen(Some(&progress), Some(&cancel))
        .unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.total_orientations, 7);
    assert_eq!(outcome.completed_orientations, 3);
    assert_eq!(outcome.orientation_count(), 3);
}

#[test]
fn fcc_metal_is_symmetric_everywhere() {
    let config = ScreeningConfig {
        max_index: 2,
        ..ScreeningConfig::default()
    };
    let outcome = Screener::new(fcc_copper(), config).screen(None, None).unwrap();

    assert!(outcome.failures.is_empty());
    assert!(!outcome.records.is_empty());
    // A monatomic Bravais lattice has one termination per orientation
    // and inversion-equivalent faces on every slab.
    assert_eq!(outcome.records.len(), outcome.total_orientations);
    for record in &outcome.records {
        assert!(record.symmetry.is_symmetric());
        assert_eq!(record.atom_count, 3);
    }
}

#[test]
fn spawned_screen_reports_progress_and_finishes() {
    let config = ScreeningConfig {
        max_index: 1,
        slab: SlabParams {
            thickness_reps: 2,
            ..SlabParams::default()
        },
        ..ScreeningConfig::default()
    };
    let task = Screener::new(mo2c_pbcn(), config).spawn();
    let mut progress_events = 0;
    let outcome = loop {
        match task.events().recv().expect("worker sends a terminal event") {
            ScreeningEvent::Progress { .. } => progress_events += 1,
            ScreeningEvent::Finished(outcome) => break outcome,
            ScreeningEvent::Failed(e) => panic!("screening failed: {}", e),
        }
    };
    // (0, 7) plus one event per orientation
    assert_eq!(progress_events, 8);
    assert_eq!(outcome.total_orientations, 7);
    assert_eq!(outcome.completed_orientations, 7);
    assert!(!outcome.cancelled);
}
