//! 8-node trilinear hexahedron.
//!
//! ```text
//! N_i = (1 + ξ_i ξ)(1 + η_i η)(1 + ζ_i ζ) / 8
//! ```
//!
//! Local node order: the bottom face (ζ = -1) counterclockwise seen from
//! above, then the top face in the same order.
//! ```text
//!        8-------7
//!       /|      /|
//!      5-------6 |
//!      | 4-----|-3
//!      |/      |/
//!      1-------2
//! ```
//!
//! 2×2×2 Gauss integration, with stresses reported at the eight points.

use crate::element::gauss::gauss_hex;
use crate::element::{check_dofs, check_nodes, Element, SLOTS_XYZ};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{Point3, StressTensor};
use nalgebra::{DMatrix, DVector, Matrix3, Vector3, Vector6};

const XI: [f64; 8] = [-1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0];
const ETA: [f64; 8] = [-1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0];
const ZETA: [f64; 8] = [-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0];

/// Trilinear brick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hex8;

impl Hex8 {
    #[cfg(test)]
    fn shape_functions(xi: f64, eta: f64, zeta: f64) -> [f64; 8] {
        std::array::from_fn(|i| {
            0.125 * (1.0 + XI[i] * xi) * (1.0 + ETA[i] * eta) * (1.0 + ZETA[i] * zeta)
        })
    }

    /// Natural derivatives, one column per node: rows are ∂/∂ξ, ∂/∂η, ∂/∂ζ.
    fn shape_derivatives(xi: f64, eta: f64, zeta: f64) -> [Vector3<f64>; 8] {
        std::array::from_fn(|i| {
            let a = 1.0 + XI[i] * xi;
            let b = 1.0 + ETA[i] * eta;
            let c = 1.0 + ZETA[i] * zeta;
            Vector3::new(
                0.125 * XI[i] * b * c,
                0.125 * a * ETA[i] * c,
                0.125 * a * b * ZETA[i],
            )
        })
    }

    /// J[r][c] = Σ ∂N/∂(natural r) · x_c
    fn jacobian(coords: &[Point3], dn: &[Vector3<f64>; 8]) -> Matrix3<f64> {
        dn.iter()
            .zip(coords)
            .fold(Matrix3::zeros(), |j, (d, x)| j + d * x.transpose())
    }

    /// The 6×24 B-matrix and Jacobian determinant at a natural point.
    fn compute_b_matrix(
        coords: &[Point3],
        xi: f64,
        eta: f64,
        zeta: f64,
    ) -> Result<(DMatrix<f64>, f64)> {
        let dn = Self::shape_derivatives(xi, eta, zeta);
        let j = Self::jacobian(coords, &dn);

        let det_j = j.determinant();
        if det_j <= 0.0 {
            return Err(Error::Element(format!(
                "hexahedron has non-positive Jacobian determinant ({:e})",
                det_j
            )));
        }
        let j_inv = j
            .try_inverse()
            .ok_or_else(|| Error::Element("hexahedron Jacobian is singular".into()))?;

        // ε = [ε_xx, ε_yy, ε_zz, γ_xy, γ_yz, γ_xz]ᵀ = B u
        let mut b = DMatrix::zeros(6, 24);
        for (i, d_nat) in dn.iter().enumerate() {
            let d = j_inv * d_nat;
            let col = 3 * i;
            b[(0, col)] = d[0];
            b[(1, col + 1)] = d[1];
            b[(2, col + 2)] = d[2];
            b[(3, col)] = d[1];
            b[(3, col + 1)] = d[0];
            b[(4, col + 1)] = d[2];
            b[(4, col + 2)] = d[1];
            b[(5, col)] = d[2];
            b[(5, col + 2)] = d[0];
        }

        Ok((b, det_j))
    }
}

impl Element for Hex8 {
    fn n_nodes(&self) -> usize {
        8
    }

    fn dof_slots(&self) -> &'static [usize] {
        &SLOTS_XYZ
    }

    fn stiffness(&self, coords: &[Point3], material: &Material) -> Result<DMatrix<f64>> {
        check_nodes("Hex8", coords, 8)?;
        let d = material.constitutive_3d();

        let mut k = DMatrix::zeros(24, 24);
        for gp in gauss_hex(2) {
            let (b, det_j) = Self::compute_b_matrix(coords, gp.xi(), gp.eta(), gp.zeta())?;
            // K += Bᵀ D B |J| w
            k += b.transpose() * (&d * &b) * (det_j * gp.weight);
        }
        Ok(k)
    }

    fn stress(
        &self,
        coords: &[Point3],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>> {
        check_nodes("Hex8", coords, 8)?;
        check_dofs("Hex8", displacements, 24)?;

        let d = material.constitutive_3d();
        let u = DVector::from_row_slice(displacements);

        gauss_hex(2)
            .iter()
            .map(|gp| {
                let (b, _) = Self::compute_b_matrix(coords, gp.xi(), gp.eta(), gp.zeta())?;
                let strain = &b * &u;
                Ok(StressTensor(d * Vector6::from_iterator(strain.iter().copied())))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn brick(lx: f64, ly: f64, lz: f64) -> Vec<Point3> {
        (0..8)
            .map(|i| {
                Point3::new(
                    0.5 * (1.0 + XI[i]) * lx,
                    0.5 * (1.0 + ETA[i]) * ly,
                    0.5 * (1.0 + ZETA[i]) * lz,
                )
            })
            .collect()
    }

    #[test]
    fn test_hex8_shape_functions_at_nodes() {
        for i in 0..8 {
            let n = Hex8::shape_functions(XI[i], ETA[i], ZETA[i]);
            for (j, value) in n.iter().enumerate() {
                assert_relative_eq!(*value, if i == j { 1.0 } else { 0.0 }, epsilon = 1e-14);
            }
        }
        let sum: f64 = Hex8::shape_functions(0.2, -0.4, 0.9).iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_hex8_stiffness_symmetric_positive_diagonal() {
        let k = Hex8.stiffness(&brick(1.0, 1.0, 1.0), &Material::steel()).unwrap();
        assert_eq!(k.nrows(), 24);
        for i in 0..24 {
            assert!(k[(i, i)] > 0.0);
            for j in 0..24 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_hex8_rigid_body_translation() {
        let k = Hex8
            .stiffness(&brick(1.0, 2.0, 1.0), &Material::solid(1.0, 0.3).unwrap())
            .unwrap();
        for dir in 0..3 {
            let u = DVector::from_fn(24, |i, _| if i % 3 == dir { 1.0 } else { 0.0 });
            assert_relative_eq!((&k * u).norm(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_hex8_constant_strain_patch() {
        let coords = brick(1.0, 1.0, 1.0);
        let mat = Material::solid(1e6, 0.25).unwrap();
        let strain_xx = 0.001;
        let u: Vec<f64> = coords
            .iter()
            .flat_map(|x| [strain_xx * x[0], 0.0, 0.0])
            .collect();

        let stresses = Hex8.stress(&coords, &u, &mat).unwrap();
        assert_eq!(stresses.len(), 8);

        let d = mat.constitutive_3d();
        for s in &stresses {
            assert_relative_eq!(s.0[0], d[(0, 0)] * strain_xx, max_relative = 1e-10);
            assert_relative_eq!(s.0[1], d[(1, 0)] * strain_xx, max_relative = 1e-10);
            assert_relative_eq!(s.0[2], d[(2, 0)] * strain_xx, max_relative = 1e-10);
            for c in 3..6 {
                assert_relative_eq!(s.0[c], 0.0, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_hex8_inverted_element() {
        let mut coords = brick(1.0, 1.0, 1.0);
        coords.swap(0, 4);
        coords.swap(1, 5);
        coords.swap(2, 6);
        coords.swap(3, 7);
        assert!(matches!(
            Hex8.stiffness(&coords, &Material::steel()),
            Err(Error::Element(_))
        ));
    }

    #[test]
    fn test_hex8_wrong_node_count() {
        let coords = brick(1.0, 1.0, 1.0);
        assert!(Hex8.stiffness(&coords[..7], &Material::steel()).is_err());
    }
}
