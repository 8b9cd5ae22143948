// src/physics/operations/mod.rs

pub mod cut;
pub mod miller_algo;
pub mod supercell;
