//! 4-node rectangular Kirchhoff plate (Adini–Clough–Melosh).
//!
//! Each node carries the transverse deflection w and the two rotations
//! θx = ∂w/∂y, θy = -∂w/∂x. The 12-term polynomial
//! ```text
//! w = a1 + a2 x + a3 y + a4 x² + a5 xy + a6 y² + a7 x³ + a8 x²y + a9 xy² + a10 y³ + a11 x³y + a12 xy³
//! ```
//! is written in natural coordinates (ξ, η) ∈ [-1, 1]² over a rectangle of
//! half sides a, b. The element lies in a plane z = const with its edges
//! parallel to x and y, nodes counterclockwise from the corner of smallest
//! x and y, as for [`super::Quad4`].
//!
//! Stiffness uses 3×3 Gauss integration. Stresses are the bending stresses on
//! the top surface, σ = 6 M / t², at the 2×2 Gauss points.

use crate::element::gauss::gauss_quad;
use crate::element::{check_dofs, check_nodes, Element};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{Point3, StressTensor};
use nalgebra::{DMatrix, DVector, Vector3};

/// Natural coordinates of the corner nodes.
const NODE_COORDS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Nodal DOF slots: z translation, rotations about x and y.
const SLOTS_PLATE: [usize; 3] = [2, 3, 4];

/// Relative tolerance of the rectangle check.
const SHAPE_TOLERANCE: f64 = 1e-9;

/// Rectangular plate in bending.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Plate;

impl Plate {
    /// Half side lengths (a, b) of the rectangle.
    fn half_sides(coords: &[Point3]) -> Result<(f64, f64)> {
        check_nodes("Plate", coords, 4)?;
        let a = 0.5 * (coords[1].x - coords[0].x);
        let b = 0.5 * (coords[3].y - coords[0].y);
        if a <= 0.0 || b <= 0.0 {
            return Err(Error::Element(format!(
                "plate nodes must run counterclockwise from the lower left corner (a = {}, b = {})",
                a, b
            )));
        }
        let tol = SHAPE_TOLERANCE * a.max(b);
        let (x0, y0, z0) = (coords[0].x, coords[0].y, coords[0].z);
        let expected = [
            (x0, y0),
            (x0 + 2.0 * a, y0),
            (x0 + 2.0 * a, y0 + 2.0 * b),
            (x0, y0 + 2.0 * b),
        ];
        for (x, (ex, ey)) in coords.iter().zip(expected) {
            if (x.x - ex).abs() > tol || (x.y - ey).abs() > tol || (x.z - z0).abs() > tol {
                return Err(Error::Element(
                    "plate element must be a rectangle parallel to the x-y plane".into(),
                ));
            }
        }
        Ok((a, b))
    }

    /// Second derivatives (∂²/∂ξ², ∂²/∂η², ∂²/∂ξ∂η) of the w, θx and θy
    /// shape functions of the node at natural corner (s, t).
    fn natural_curvatures(s: f64, t: f64, xi: f64, eta: f64, a: f64, b: f64) -> [[f64; 3]; 3] {
        let p = 1.0 + s * xi;
        let q = 1.0 + t * eta;
        let r = 2.0 + s * xi + t * eta - xi * xi - eta * eta;

        let w = [
            -0.75 * s * xi * q,
            -0.75 * t * eta * p,
            0.125 * (t * (s * r + p * (s - 2.0 * xi)) + q * s * (t - 2.0 * eta)),
        ];
        let theta_x = [
            0.0,
            0.25 * b * p * (t + 3.0 * eta),
            -0.125 * b * s * (1.0 - 2.0 * t * eta - 3.0 * eta * eta),
        ];
        let theta_y = [
            -0.25 * a * q * (s + 3.0 * xi),
            0.0,
            0.125 * a * t * (1.0 - 2.0 * s * xi - 3.0 * xi * xi),
        ];
        [w, theta_x, theta_y]
    }

    /// Curvature matrix (3x12): κ = -[w,xx, w,yy, 2 w,xy]ᵀ = B u.
    fn compute_b_at_point(xi: f64, eta: f64, a: f64, b: f64) -> DMatrix<f64> {
        let mut bm = DMatrix::zeros(3, 12);
        for (i, &(s, t)) in NODE_COORDS.iter().enumerate() {
            let shapes = Self::natural_curvatures(s, t, xi, eta, a, b);
            for (k, d) in shapes.iter().enumerate() {
                let col = 3 * i + k;
                bm[(0, col)] = -d[0] / (a * a);
                bm[(1, col)] = -d[1] / (b * b);
                bm[(2, col)] = -2.0 * d[2] / (a * b);
            }
        }
        bm
    }
}

impl Element for Plate {
    fn n_nodes(&self) -> usize {
        4
    }

    fn dof_slots(&self) -> &'static [usize] {
        &SLOTS_PLATE
    }

    fn stiffness(&self, coords: &[Point3], material: &Material) -> Result<DMatrix<f64>> {
        let (a, b) = Self::half_sides(coords)?;
        let thickness = material.thickness()?;
        // Bending rigidity D t³ / 12
        let d = material.constitutive_plane_stress() * (thickness.powi(3) / 12.0);

        let mut k = DMatrix::zeros(12, 12);
        for gp in gauss_quad(3) {
            let bm = Self::compute_b_at_point(gp.xi(), gp.eta(), a, b);
            k += bm.transpose() * (&d * &bm) * (gp.weight * a * b);
        }
        Ok(k)
    }

    fn stress(
        &self,
        coords: &[Point3],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>> {
        let (a, b) = Self::half_sides(coords)?;
        check_dofs("Plate", displacements, 12)?;
        let thickness = material.thickness()?;
        let d = material.constitutive_plane_stress();
        let u = DVector::from_row_slice(displacements);

        Ok(gauss_quad(2)
            .iter()
            .map(|gp| {
                let kappa = Self::compute_b_at_point(gp.xi(), gp.eta(), a, b) * &u;
                // Top surface z = t / 2
                let sigma = d * Vector3::new(kappa[0], kappa[1], kappa[2]) * (0.5 * thickness);
                StressTensor::new([sigma[0], sigma[1], 0.0, sigma[2], 0.0, 0.0])
            })
            .collect())
    }
}
