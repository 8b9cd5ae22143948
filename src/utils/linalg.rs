// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// `lattice` holds the lattice vectors as rows
/// [[ax, ay, az], [bx, by, bz], [cx, cy, cz]], so
/// Cartesian = Lattice^T x Fractional.
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let frac_vec = Vector3::from(frac);
  let lat_mat = Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ]);

  let cart_vec = lat_mat.transpose() * frac_vec;

  [cart_vec.x, cart_vec.y, cart_vec.z]
}

/// Convert Cartesian coordinates to fractional, or None if the lattice
/// is singular. Fractional = (Lattice^T)^-1 x Cartesian.
pub fn cart_to_frac(cart: [f64; 3], lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  let cart_vec = Vector3::from(cart);
  let lat_mat = Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ]);

  let inv_lat = lat_mat.transpose().try_inverse()?;
  let frac_vec = inv_lat * cart_vec;

  Some([frac_vec.x, frac_vec.y, frac_vec.z])
}

/// Wrap a fractional coordinate into [0, 1), snapping values within
/// `tol` of an integer to 0.
pub fn wrap_frac(x: f64, tol: f64) -> f64 {
  let mut w = x - x.floor();
  if w >= 1.0 - tol {
    w -= 1.0;
  }
  if w.abs() < tol {
    w = 0.0;
  }
  w
}

/// Wrap a fractional delta into [-0.5, 0.5).
pub fn wrap_half(x: f64) -> f64 {
  let mut w = x - x.round();
  if w >= 0.5 {
    w -= 1.0;
  }
  w
}
