// src/physics/analysis/mod.rs

pub mod matcher;
pub mod screening;
pub mod surfaces;
pub mod symmetry;
