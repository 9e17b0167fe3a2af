//! Core data types for FEA operations.
//!
//! - Geometric primitives (points, vectors)
//! - Stress tensors in Voigt notation
//! - Constitutive matrix alias

use nalgebra::{Matrix6, Vector3, Vector6};

/// A point in 3D space.
pub type Point3 = Vector3<f64>;

/// A 3D vector (displacement, force, direction).
pub type Vec3 = Vector3<f64>;

/// Number of DOF slots carried by every node (3 translations, 3 rotations).
pub const DOFS_PER_NODE: usize = 6;

/// Symmetric stress tensor in Voigt notation.
///
/// Components are ordered as: [σ_xx, σ_yy, σ_zz, τ_xy, τ_yz, τ_xz]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressTensor(pub Vector6<f64>);

impl StressTensor {
    /// Create a new stress tensor from Voigt components.
    pub fn new(components: [f64; 6]) -> Self {
        Self(Vector6::from_row_slice(&components))
    }

    /// Zero stress state.
    pub fn zero() -> Self {
        Self(Vector6::zeros())
    }

    /// Uniaxial stress state along the first axis.
    pub fn uniaxial(sigma: f64) -> Self {
        Self::new([sigma, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    /// Accessor for σ_xx.
    pub fn xx(&self) -> f64 {
        self.0[0]
    }

    /// Accessor for σ_yy.
    pub fn yy(&self) -> f64 {
        self.0[1]
    }

    /// Accessor for τ_xy.
    pub fn xy(&self) -> f64 {
        self.0[3]
    }

    /// Compute von Mises equivalent stress.
    pub fn von_mises(&self) -> f64 {
        let s = &self.0;
        let term1 = (s[0] - s[1]).powi(2) + (s[1] - s[2]).powi(2) + (s[2] - s[0]).powi(2);
        let term2 = 6.0 * (s[3].powi(2) + s[4].powi(2) + s[5].powi(2));
        ((term1 + term2) / 2.0).sqrt()
    }
}

/// Constitutive matrix (material stiffness) in Voigt notation.
///
/// Maps strain to stress: σ = D * ε
pub type ConstitutiveMatrix = Matrix6<f64>;
