// src/model/slab.rs
use crate::model::structure::Structure;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Where the vacuum gap goes relative to the atomic slab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VacuumPlacement {
    /// Vacuum appended above the slab; atoms stay at the cell bottom.
    TopOnly,
    /// Vacuum split so the slab sits at the midpoint of the cell.
    Centered,
}

/// A finite, vacuum-terminated surface model derived from a bulk
/// structure for one (miller_index, shift, thickness, vacuum, placement)
/// tuple. Created once by the generator and never mutated.
#[derive(Clone, Debug, Serialize)]
pub struct Slab {
    pub structure: Structure,
    pub miller_index: [i32; 3],
    /// Fractional cut position in the oriented unit cell, in [0, 1).
    pub shift: f64,
    pub thickness_reps: u32,
    pub vacuum_length: f64,
    pub placement: VacuumPlacement,
    pub orthogonalized: bool,
    /// Provenance only; e.g. a materials-database identifier.
    pub material_id: Option<String>,
}

impl Slab {
    pub fn atom_count(&self) -> usize {
        self.structure.atom_count()
    }

    pub fn formula(&self) -> &str {
        &self.structure.formula
    }

    /// Magnitude of the cross product of the two in-plane lattice vectors.
    pub fn surface_area(&self) -> f64 {
        let l = self.structure.lattice;
        let a = Vector3::new(l[0][0], l[0][1], l[0][2]);
        let b = Vector3::new(l[1][0], l[1][1], l[1][2]);
        a.cross(&b).norm()
    }

    /// Unit surface normal, oriented towards the +c side of the cell.
    pub fn normal(&self) -> Vector3<f64> {
        let l = self.structure.lattice;
        let a = Vector3::new(l[0][0], l[0][1], l[0][2]);
        let b = Vector3::new(l[1][0], l[1][1], l[1][2]);
        let c = Vector3::new(l[2][0], l[2][1], l[2][2]);
        let mut n = a.cross(&b).normalize();
        if n.dot(&c) < 0.0 {
            n = -n;
        }
        n
    }

    /// Span of atomic positions projected on the surface normal.
    pub fn slab_thickness(&self) -> f64 {
        if self.structure.is_empty() {
            return 0.0;
        }
        let n = self.normal();
        let mut lo = f64::MAX;
        let mut hi = f64::MIN;
        for atom in &self.structure.atoms {
            let z = Vector3::from(atom.position).dot(&n);
            lo = lo.min(z);
            hi = hi.max(z);
        }
        hi - lo
    }
}
