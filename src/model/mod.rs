// src/model/mod.rs
pub mod structure;
pub mod elements;
pub mod slab;
pub mod record;

// Re-exports for cleaner imports
pub use record::{OrientationFailure, ScreeningOutcome, ScreeningRecord, SymmetryVerdict};
pub use slab::{Slab, VacuumPlacement};
pub use structure::{Atom, Structure};
