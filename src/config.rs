// src/config.rs

use crate::model::slab::VacuumPlacement;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// --- Slab generation parameters ---

/// Parameters for one oriented-slab generation. The two tolerances are
/// deliberately explicit configuration: both materially affect
/// termination counts (see `enumerate_shifts`), so hosts should be able
/// to tune them instead of relying on baked-in constants.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SlabParams {
  /// Unit-cell repetitions along the surface normal. Must be >= 1.
  pub thickness_reps: u32,

  /// Vacuum gap in Angstroms. Zero is legal but leaves periodic images
  /// in contact.
  pub vacuum: f64,

  pub placement: VacuumPlacement,

  /// Force the out-of-plane lattice vector perpendicular to the surface.
  pub orthogonalize: bool,

  /// Two terminations closer than this (fractional units) are duplicates.
  #[serde(default = "default_shift_tol")]
  pub shift_tol: f64,

  /// Atomic layers closer than this (Angstroms, along the normal) are
  /// merged into one termination candidate.
  #[serde(default = "default_layer_tol")]
  pub layer_tol: f64,
}

fn default_shift_tol() -> f64 {
  1e-4
}

fn default_layer_tol() -> f64 {
  0.1
}

impl Default for SlabParams {
  fn default() -> Self {
    Self {
      thickness_reps: 1,
      vacuum: 10.0,
      placement: VacuumPlacement::TopOnly,
      orthogonalize: false,
      shift_tol: default_shift_tol(),
      layer_tol: default_layer_tol(),
    }
  }
}

// --- Screening parameters ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScreeningConfig {
  /// Maximum absolute Miller index component. Must be >= 1.
  pub max_index: i32,

  pub slab: SlabParams,

  /// Depth (Angstroms) of the face regions used for the symmetry check.
  #[serde(default = "default_compare_depth")]
  pub compare_depth: f64,

  /// Site tolerance (Angstroms) for the rigid-motion match.
  #[serde(default = "default_match_tol")]
  pub match_tol: f64,

  /// Symmetry search precision handed to moyo.
  #[serde(default = "default_symprec")]
  pub symprec: f64,

  /// Provenance tag copied onto every generated slab.
  #[serde(default)]
  pub material_id: Option<String>,
}

fn default_compare_depth() -> f64 {
  5.0
}

fn default_match_tol() -> f64 {
  0.5
}

fn default_symprec() -> f64 {
  1e-4
}

impl Default for ScreeningConfig {
  fn default() -> Self {
    Self {
      max_index: 2,
      slab: SlabParams {
        thickness_reps: 3,
        ..SlabParams::default()
      },
      compare_depth: default_compare_depth(),
      match_tol: default_match_tol(),
      symprec: default_symprec(),
      material_id: None,
    }
  }
}

impl ScreeningConfig {
  /// Loads a config from a JSON file, falling back to defaults on any
  /// error; returns the config plus a status line for the host's log.
  pub fn load(path: &Path) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader(reader) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  pub fn save(&self, path: &Path) -> String {
    match File::create(path) {
      Ok(file) => {
        let writer = BufWriter::new(file);
        match serde_json::to_writer_pretty(writer, self) {
          Ok(_) => format!("Config saved to {:?}", path),
          Err(e) => format!("Failed to save config: {}", e),
        }
      }
      Err(e) => format!("Could not create config file: {}", e),
    }
  }
}
