//! 3-node constant strain triangle (CST) in plane stress.
//!
//! Nodes carry the in-plane displacements (u, v); z coordinates are ignored.
//! Strain and stress are constant over the element, so a single stress point
//! at the centroid is reported.

use crate::element::{check_dofs, check_nodes, Element, SLOTS_XY};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{Point3, StressTensor};
use nalgebra::{DMatrix, DVector, Vector3, Vector6};

/// Constant strain triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tri3;

impl Tri3 {
    /// Compute the 3x6 B-matrix and the element area.
    ///
    /// ε = [ε_xx, ε_yy, γ_xy]ᵀ = B [u1, v1, u2, v2, u3, v3]ᵀ
    fn compute_b_matrix(coords: &[Point3]) -> Result<(DMatrix<f64>, f64)> {
        check_nodes("Tri3", coords, 3)?;

        let (x1, y1) = (coords[0][0], coords[0][1]);
        let (x2, y2) = (coords[1][0], coords[1][1]);
        let (x3, y3) = (coords[2][0], coords[2][1]);

        let area_2_signed = (x2 - x1) * (y3 - y1) - (x3 - x1) * (y2 - y1);
        let scale = (0..3)
            .map(|i| (coords[(i + 1) % 3] - coords[i]).xy().norm_squared())
            .fold(0.0, f64::max);
        if area_2_signed.abs() <= 1e-12 * scale {
            return Err(Error::Element("triangle has zero area".into()));
        }
        let inv_2a = 1.0 / area_2_signed;

        // dN/dx and dN/dy, constant over the element
        let dn_dx = [(y2 - y3) * inv_2a, (y3 - y1) * inv_2a, (y1 - y2) * inv_2a];
        let dn_dy = [(x3 - x2) * inv_2a, (x1 - x3) * inv_2a, (x2 - x1) * inv_2a];

        let mut b = DMatrix::zeros(3, 6);
        for i in 0..3 {
            let col = 2 * i;
            b[(0, col)] = dn_dx[i];
            b[(1, col + 1)] = dn_dy[i];
            b[(2, col)] = dn_dy[i];
            b[(2, col + 1)] = dn_dx[i];
        }

        Ok((b, area_2_signed.abs() / 2.0))
    }
}

impl Element for Tri3 {
    fn n_nodes(&self) -> usize {
        3
    }

    fn dof_slots(&self) -> &'static [usize] {
        &SLOTS_XY
    }

    fn stiffness(&self, coords: &[Point3], material: &Material) -> Result<DMatrix<f64>> {
        let thickness = material.thickness()?;
        let (b, area) = Self::compute_b_matrix(coords)?;
        let d = material.constitutive_plane_stress();

        // K = t A Bᵀ D B
        Ok(b.transpose() * (&d * &b) * (thickness * area))
    }

    fn stress(
        &self,
        coords: &[Point3],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>> {
        check_dofs("Tri3", displacements, 6)?;
        let (b, _) = Self::compute_b_matrix(coords)?;
        let d = material.constitutive_plane_stress();

        let strain = &b * DVector::from_row_slice(displacements);
        let sigma = d * Vector3::new(strain[0], strain[1], strain[2]);

        Ok(vec![StressTensor(Vector6::new(
            sigma[0], sigma[1], 0.0, sigma[2], 0.0, 0.0,
        ))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_right_triangle() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn material() -> Material {
        Material::plane(1e6, 0.25, 0.1).unwrap()
    }

    #[test]
    fn test_tri3_stiffness_symmetric() {
        let k = Tri3.stiffness(&unit_right_triangle(), &material()).unwrap();
        assert_eq!(k.nrows(), 6);
        for i in 0..6 {
            assert!(k[(i, i)] > 0.0);
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_tri3_rigid_body_modes() {
        let k = Tri3.stiffness(&unit_right_triangle(), &material()).unwrap();
        let modes = [
            vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
            // rotation: u = -y, v = x
            vec![0.0, 0.0, 0.0, 1.0, -1.0, 0.0],
        ];
        for mode in modes {
            let f = &k * DVector::from_vec(mode);
            assert_relative_eq!(f.norm(), 0.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_tri3_constant_strain_patch() {
        // u = 0.001 x
        let mat = material();
        let u = [0.0, 0.0, 0.001, 0.0, 0.0, 0.0];
        let stress = Tri3.stress(&unit_right_triangle(), &u, &mat).unwrap();
        let d = mat.constitutive_plane_stress();
        assert_eq!(stress.len(), 1);
        assert_relative_eq!(stress[0].xx(), d[(0, 0)] * 0.001, max_relative = 1e-12);
        assert_relative_eq!(stress[0].yy(), d[(1, 0)] * 0.001, max_relative = 1e-12);
        assert_relative_eq!(stress[0].0[2], 0.0);
        assert_relative_eq!(stress[0].xy(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tri3_orientation_independent() {
        let mat = material();
        let ccw = unit_right_triangle();
        let cw = vec![ccw[0], ccw[2], ccw[1]];
        let k_ccw = Tri3.stiffness(&ccw, &mat).unwrap();
        let k_cw = Tri3.stiffness(&cw, &mat).unwrap();
        // Swap local nodes 2 and 3 back
        assert_relative_eq!(k_ccw[(0, 0)], k_cw[(0, 0)], max_relative = 1e-12);
        assert_relative_eq!(k_ccw[(2, 2)], k_cw[(4, 4)], max_relative = 1e-12);
    }

    #[test]
    fn test_tri3_degenerate() {
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(matches!(
            Tri3.stiffness(&coords, &material()),
            Err(Error::Element(_))
        ));
    }
}
