//! Element trait and implementations.
//!
//! The Element trait defines the interface for finite elements, enabling
//! the assembly process to work with any element type uniformly. The closed
//! set of supported kinds is [`ElementKind`], dispatched statically.
//!
//! # Submodules
//!
//! - [`gauss`] - Gauss quadrature rules for numerical integration

use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{Point3, StressTensor};
use enum_dispatch::enum_dispatch;
use nalgebra::DMatrix;

pub mod bar;
pub mod beam;
pub mod gauss;
pub mod hex8;
pub mod plate;
pub mod quad4;
pub mod quad9;
pub mod tri3;

pub use bar::Bar;
pub use beam::Beam;
pub use gauss::{gauss_1d, gauss_hex, gauss_quad, GaussPoint};
pub use hex8::Hex8;
pub use plate::Plate;
pub use quad4::Quad4;
pub use quad9::Quad9;
pub use tri3::Tri3;

/// Translational DOF slots x, y, z.
pub const SLOTS_XYZ: [usize; 3] = [0, 1, 2];
/// In-plane DOF slots x, y.
pub const SLOTS_XY: [usize; 2] = [0, 1];
/// All six nodal DOF slots.
pub const SLOTS_ALL: [usize; 6] = [0, 1, 2, 3, 4, 5];

/// Finite element interface.
///
/// All element types implement this trait, providing:
/// - Element stiffness matrix computation in global axes
/// - Stress recovery from nodal displacements
///
/// Local DOFs are ordered node by node, and within a node by the slots
/// returned from [`Element::dof_slots`].
#[enum_dispatch]
pub trait Element {
    /// Number of nodes in this element.
    fn n_nodes(&self) -> usize;

    /// Nodal DOF slots (0..6) this element couples, in local order.
    fn dof_slots(&self) -> &'static [usize];

    /// Total degrees of freedom for this element.
    fn n_dofs(&self) -> usize {
        self.n_nodes() * self.dof_slots().len()
    }

    /// Compute the element stiffness matrix.
    ///
    /// # Arguments
    ///
    /// * `coords` - Nodal coordinates, shape (n_nodes,)
    /// * `material` - Material properties
    ///
    /// # Returns
    ///
    /// Dense stiffness matrix of shape (n_dofs, n_dofs)
    fn stiffness(&self, coords: &[Point3], material: &Material) -> Result<DMatrix<f64>>;

    /// Compute stress at element integration (or output) points.
    ///
    /// `displacements` has length n_dofs, in local DOF order.
    fn stress(
        &self,
        coords: &[Point3],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>>;
}

/// The supported element kinds.
#[enum_dispatch(Element)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    Bar(Bar),
    Quadrilateral(Quad4),
    Triangle(Tri3),
    Hexahedron(Hex8),
    Beam(Beam),
    Plate(Plate),
    Quadrilateral9(Quad9),
}

impl ElementKind {
    /// Kind from its input deck code (NPAR1).
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Bar.into()),
            2 => Ok(Quad4.into()),
            3 => Ok(Tri3.into()),
            4 => Ok(Hex8.into()),
            5 => Ok(Beam.into()),
            6 => Ok(Plate.into()),
            10 => Ok(Quad9.into()),
            _ => Err(Error::Element(format!(
                "unknown element type code {}",
                code
            ))),
        }
    }

    /// Input deck code.
    pub fn code(&self) -> u8 {
        match self {
            ElementKind::Bar(_) => 1,
            ElementKind::Quadrilateral(_) => 2,
            ElementKind::Triangle(_) => 3,
            ElementKind::Hexahedron(_) => 4,
            ElementKind::Beam(_) => 5,
            ElementKind::Plate(_) => 6,
            ElementKind::Quadrilateral9(_) => 10,
        }
    }

    /// Name printed in reports.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Bar(_) => "TRUSS",
            ElementKind::Quadrilateral(_) => "QUADRILATERAL",
            ElementKind::Triangle(_) => "TRIANGLE",
            ElementKind::Hexahedron(_) => "HEXAHEDRON",
            ElementKind::Beam(_) => "BEAM",
            ElementKind::Plate(_) => "PLATE",
            ElementKind::Quadrilateral9(_) => "9-NODE QUADRILATERAL",
        }
    }
}

/// Position of entry (i, j), 0-based with i ≤ j, in compact upper-triangular storage.
///
/// Columns are stored one after another, each from the diagonal upward.
#[inline]
pub fn compact_index(i: usize, j: usize) -> usize {
    debug_assert!(i <= j);
    j * (j + 1) / 2 + (j - i)
}

/// Upper triangle of a symmetric element stiffness, ND(ND+1)/2 entries.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactStiffness {
    n_dofs: usize,
    values: Vec<f64>,
}

impl CompactStiffness {
    /// Pack the upper triangle of a square matrix.
    pub fn from_dense(k: &DMatrix<f64>) -> Result<Self> {
        let n = k.nrows();
        if k.ncols() != n {
            return Err(Error::Element(format!(
                "element stiffness must be square, got {}x{}",
                n,
                k.ncols()
            )));
        }
        let mut values = vec![0.0; n * (n + 1) / 2];
        for j in 0..n {
            for i in 0..=j {
                values[compact_index(i, j)] = k[(i, j)];
            }
        }
        Ok(Self { n_dofs: n, values })
    }

    /// Number of element DOFs (ND).
    pub fn n_dofs(&self) -> usize {
        self.n_dofs
    }

    /// Entry (i, j) in either order.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        self.values[compact_index(i, j)]
    }

    /// Packed entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Check the coordinate count handed to an element.
pub(crate) fn check_nodes(name: &str, coords: &[Point3], expected: usize) -> Result<()> {
    if coords.len() != expected {
        return Err(Error::Element(format!(
            "{} requires exactly {} nodal coordinates, got {}",
            name,
            expected,
            coords.len()
        )));
    }
    Ok(())
}

/// Check the displacement count handed to an element.
pub(crate) fn check_dofs(name: &str, displacements: &[f64], expected: usize) -> Result<()> {
    if displacements.len() != expected {
        return Err(Error::Element(format!(
            "{} requires {} displacement DOFs, got {}",
            name,
            expected,
            displacements.len()
        )));
    }
    Ok(())
}
