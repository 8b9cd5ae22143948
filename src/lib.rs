// src/lib.rs
//! Surface slab generation and termination screening for crystal
//! structures: oriented cuts along Miller planes, termination
//! enumeration, vacuum placement, two-face symmetry classification and
//! symmetry-aware orientation screening.

pub mod config;
pub mod error;
pub mod model;
pub mod physics;
pub mod utils;

pub use config::{ScreeningConfig, SlabParams};
pub use error::SlabError;
pub use model::record::{
    OrientationFailure, ScreeningOutcome, ScreeningRecord, SymmetryVerdict,
};
pub use model::slab::{Slab, VacuumPlacement};
pub use model::structure::{Atom, Structure};
pub use physics::analysis::screening::{Screener, ScreeningEvent, ScreeningTask};
pub use physics::analysis::surfaces::compare_faces;
pub use physics::analysis::symmetry::{distinct_miller_indices, space_group, SpaceGroupInfo};
pub use physics::slab::{generate_all_terminations, generate_slab};
