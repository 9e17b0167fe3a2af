//! 4-node bilinear quadrilateral in plane stress.
//!
//! In natural coordinates (ξ, η) ∈ [-1, 1]²:
//! ```text
//! N_i = (1 + ξ_i ξ)(1 + η_i η) / 4
//! ```
//!
//! Node numbering runs counterclockwise:
//! ```text
//! 4 --- 3
//! |     |
//! 1 --- 2
//! ```
//!
//! Stiffness uses 2×2 Gauss integration and stresses are reported at the same
//! four points.

use crate::element::gauss::gauss_quad;
use crate::element::{check_dofs, check_nodes, Element, SLOTS_XY};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{Point3, StressTensor};
use nalgebra::{DMatrix, DVector, Matrix2, Vector2, Vector3, Vector6};

/// Natural coordinates of the corner nodes.
const NODE_COORDS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Bilinear plane stress quadrilateral.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quad4;

impl Quad4 {
    #[cfg(test)]
    fn shape_functions(xi: f64, eta: f64) -> [f64; 4] {
        NODE_COORDS.map(|(xi_i, eta_i)| 0.25 * (1.0 + xi_i * xi) * (1.0 + eta_i * eta))
    }

    /// (dN/dξ, dN/dη) for each node.
    fn shape_function_derivatives(xi: f64, eta: f64) -> [(f64, f64); 4] {
        NODE_COORDS.map(|(xi_i, eta_i)| {
            (
                0.25 * xi_i * (1.0 + eta_i * eta),
                0.25 * eta_i * (1.0 + xi_i * xi),
            )
        })
    }

    /// B-matrix (3x8) and Jacobian determinant at (ξ, η).
    fn compute_b_at_point(coords: &[Point3], xi: f64, eta: f64) -> Result<(DMatrix<f64>, f64)> {
        let dn_dnat = Self::shape_function_derivatives(xi, eta);

        // J = [[∂x/∂ξ, ∂y/∂ξ], [∂x/∂η, ∂y/∂η]]
        let mut j = Matrix2::zeros();
        for (dn, x) in dn_dnat.iter().zip(coords) {
            j[(0, 0)] += dn.0 * x[0];
            j[(0, 1)] += dn.0 * x[1];
            j[(1, 0)] += dn.1 * x[0];
            j[(1, 1)] += dn.1 * x[1];
        }

        let det_j = j.determinant();
        if det_j <= 0.0 {
            return Err(Error::Element(format!(
                "quadrilateral has non-positive Jacobian determinant ({:e})",
                det_j
            )));
        }
        let j_inv = j
            .try_inverse()
            .ok_or_else(|| Error::Element("quadrilateral Jacobian is singular".into()))?;

        let mut b = DMatrix::zeros(3, 8);
        for (i, dn) in dn_dnat.iter().enumerate() {
            let d = j_inv * Vector2::new(dn.0, dn.1);
            let col = 2 * i;
            b[(0, col)] = d[0];
            b[(1, col + 1)] = d[1];
            b[(2, col)] = d[1];
            b[(2, col + 1)] = d[0];
        }

        Ok((b, det_j))
    }
}

impl Element for Quad4 {
    fn n_nodes(&self) -> usize {
        4
    }

    fn dof_slots(&self) -> &'static [usize] {
        &SLOTS_XY
    }

    fn stiffness(&self, coords: &[Point3], material: &Material) -> Result<DMatrix<f64>> {
        check_nodes("Quad4", coords, 4)?;
        let thickness = material.thickness()?;
        let d = material.constitutive_plane_stress();

        let mut k = DMatrix::zeros(8, 8);
        for gp in gauss_quad(2) {
            let (b, det_j) = Self::compute_b_at_point(coords, gp.xi(), gp.eta())?;
            // K += w t |J| Bᵀ D B
            k += b.transpose() * (&d * &b) * (gp.weight * thickness * det_j);
        }
        Ok(k)
    }

    fn stress(
        &self,
        coords: &[Point3],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>> {
        check_nodes("Quad4", coords, 4)?;
        check_dofs("Quad4", displacements, 8)?;
        let d = material.constitutive_plane_stress();
        let u = DVector::from_row_slice(displacements);

        gauss_quad(2)
            .iter()
            .map(|gp| {
                let (b, _) = Self::compute_b_at_point(coords, gp.xi(), gp.eta())?;
                let strain = &b * &u;
                let sigma = d * Vector3::new(strain[0], strain[1], strain[2]);
                Ok(StressTensor(Vector6::new(
                    sigma[0], sigma[1], 0.0, sigma[2], 0.0, 0.0,
                )))
            })
            .collect()
    }
}
