//! 9-node biquadratic Lagrangian quadrilateral in plane stress.
//!
//! Shape functions are products of the 1D quadratic Lagrange polynomials on
//! ξ, η ∈ {-1, 0, 1}. Corners run counterclockwise, then the mid-side nodes
//! starting on edge 1-2, then the centre:
//! ```text
//! 4 --- 7 --- 3
//! |           |
//! 8     9     6
//! |           |
//! 1 --- 5 --- 2
//! ```
//!
//! Stiffness uses 3×3 Gauss integration; stresses are reported at the 2×2
//! Gauss points.

use crate::element::gauss::gauss_quad;
use crate::element::{check_dofs, check_nodes, Element, SLOTS_XY};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{Point3, StressTensor};
use nalgebra::{DMatrix, DVector, Matrix2, Vector2, Vector3};

/// Natural coordinates of the nodes.
const NODE_COORDS: [(i8, i8); 9] = [
    (-1, -1),
    (1, -1),
    (1, 1),
    (-1, 1),
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, 0),
];

/// Quadratic Lagrange polynomial of node position `node` and its derivative at `s`.
fn lagrange(node: i8, s: f64) -> (f64, f64) {
    match node {
        -1 => (0.5 * s * (s - 1.0), s - 0.5),
        0 => (1.0 - s * s, -2.0 * s),
        _ => (0.5 * s * (s + 1.0), s + 0.5),
    }
}

/// Biquadratic plane stress quadrilateral.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quad9;

impl Quad9 {
    #[cfg(test)]
    fn shape_functions(xi: f64, eta: f64) -> [f64; 9] {
        NODE_COORDS.map(|(a, b)| lagrange(a, xi).0 * lagrange(b, eta).0)
    }

    /// (dN/dξ, dN/dη) for each node.
    fn shape_function_derivatives(xi: f64, eta: f64) -> [(f64, f64); 9] {
        NODE_COORDS.map(|(a, b)| {
            let (lx, dlx) = lagrange(a, xi);
            let (ly, dly) = lagrange(b, eta);
            (dlx * ly, lx * dly)
        })
    }

    /// B-matrix (3x18) and Jacobian determinant at (ξ, η).
    fn compute_b_at_point(coords: &[Point3], xi: f64, eta: f64) -> Result<(DMatrix<f64>, f64)> {
        let dn_dnat = Self::shape_function_derivatives(xi, eta);

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
                "9-node quadrilateral has non-positive Jacobian determinant ({:e})",
                det_j
            )));
        }
        let j_inv = j
            .try_inverse()
            .ok_or_else(|| Error::Element("9-node quadrilateral Jacobian is singular".into()))?;

        let mut b = DMatrix::zeros(3, 18);
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

impl Element for Quad9 {
    fn n_nodes(&self) -> usize {
        9
    }

    fn dof_slots(&self) -> &'static [usize] {
        &SLOTS_XY
    }

    fn stiffness(&self, coords: &[Point3], material: &Material) -> Result<DMatrix<f64>> {
        check_nodes("Quad9", coords, 9)?;
        let thickness = material.thickness()?;
        let d = material.constitutive_plane_stress();

        let mut k = DMatrix::zeros(18, 18);
        for gp in gauss_quad(3) {
            let (b, det_j) = Self::compute_b_at_point(coords, gp.xi(), gp.eta())?;
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
        check_nodes("Quad9", coords, 9)?;
        check_dofs("Quad9", displacements, 18)?;
        let d = material.constitutive_plane_stress();
        let u = DVector::from_row_slice(displacements);

        gauss_quad(2)
            .iter()
            .map(|gp| {
                let (b, _) = Self::compute_b_at_point(coords, gp.xi(), gp.eta())?;
                let strain = &b * &u;
                let sigma = d * Vector3::new(strain[0], strain[1], strain[2]);
                Ok(StressTensor::new([sigma[0], sigma[1], 0.0, sigma[2], 0.0, 0.0]))
            })
            .collect()
    }
}
