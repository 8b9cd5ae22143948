// src/utils/mod.rs

pub mod linalg;
