// src/model/record.rs
use crate::model::slab::Slab;
use serde::Serialize;

/// Tri-state symmetry classification of a slab's two faces.
///
/// `Undetermined` means a face region could not be extracted (e.g. the
/// slab is too thin for the requested comparison depth); callers must
/// not conflate it with `Asymmetric`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum SymmetryVerdict {
    /// Faces are related by a rigid motion; carries the RMS residual (A).
    Symmetric { rmsd: f64 },
    Asymmetric,
    Undetermined,
}

impl SymmetryVerdict {
    pub fn is_symmetric(&self) -> bool {
        matches!(self, SymmetryVerdict::Symmetric { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            SymmetryVerdict::Symmetric { .. } => "yes",
            SymmetryVerdict::Asymmetric => "no",
            SymmetryVerdict::Undetermined => "undetermined",
        }
    }
}

/// One row per (miller_index, shift) pair discovered during screening.
#[derive(Clone, Debug, Serialize)]
pub struct ScreeningRecord {
    pub miller_index: [i32; 3],
    pub shift: f64,
    pub atom_count: usize,
    pub surface_area: f64,
    pub symmetry: SymmetryVerdict,
    pub formula: String,
    #[serde(skip)]
    pub slab: Slab,
}

impl ScreeningRecord {
    pub fn miller_str(&self) -> String {
        let [h, k, l] = self.miller_index;
        format!("({},{},{})", h, k, l)
    }

    /// Flat fields in tabular order: miller, shift, atoms, area,
    /// symmetric, formula.
    pub fn flat_row(&self) -> [String; 6] {
        [
            self.miller_str(),
            format!("{:.4}", self.shift),
            self.atom_count.to_string(),
            format!("{:.2}", self.surface_area),
            self.symmetry.label().to_string(),
            self.formula.clone(),
        ]
    }
}

/// An orientation the toolkit could not process; recorded instead of
/// aborting the run.
#[derive(Clone, Debug, Serialize)]
pub struct OrientationFailure {
    pub miller_index: [i32; 3],
    pub reason: String,
}

/// Ordered aggregate of a screening run. Records are unique by
/// (miller_index, shift) and kept in insertion order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScreeningOutcome {
    pub records: Vec<ScreeningRecord>,
    pub failures: Vec<OrientationFailure>,
    pub total_orientations: usize,
    pub completed_orientations: usize,
    pub cancelled: bool,
}

impl ScreeningOutcome {
    /// Number of distinct orientations among the records.
    pub fn orientation_count(&self) -> usize {
        let mut seen: Vec<[i32; 3]> = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.miller_index) {
                seen.push(r.miller_index);
            }
        }
        seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_labels() {
        assert_eq!(SymmetryVerdict::Symmetric { rmsd: 0.01 }.label(), "yes");
        assert_eq!(SymmetryVerdict::Asymmetric.label(), "no");
        assert_eq!(SymmetryVerdict::Undetermined.label(), "undetermined");
        assert!(SymmetryVerdict::Symmetric { rmsd: 0.0 }.is_symmetric());
        assert!(!SymmetryVerdict::Undetermined.is_symmetric());
    }
}
