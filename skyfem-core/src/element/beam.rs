//! Two-node 3D Euler–Bernoulli frame element.
//!
//! Each node carries all six DOFs (u, v, w, θx, θy, θz). The local x axis runs
//! from node 1 to node 2; the local y axis is the section's `y_axis` made
//! orthogonal to x, and z = x × y. Bending about local z uses `izz`, bending
//! about local y uses `iyy`, and torsion uses G·J.

use crate::element::{check_dofs, check_nodes, Element, SLOTS_ALL};
use crate::error::{Error, Result};
use crate::material::{BeamSection, Material};
use crate::types::{Point3, StressTensor};
use nalgebra::{DMatrix, DVector, Matrix3};

/// 3D beam.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Beam;

impl Beam {
    /// Length and rotation matrix whose rows are the local axes in global coordinates.
    pub fn frame(coords: &[Point3], section: &BeamSection) -> Result<(f64, Matrix3<f64>)> {
        check_nodes("Beam", coords, 2)?;
        let axis = coords[1] - coords[0];
        let length = axis.norm();
        if length <= 0.0 {
            return Err(Error::Element("beam element has zero length".into()));
        }
        let ex = axis / length;
        let v = section.y_axis;
        let y = v - ex * ex.dot(&v);
        if y.norm() <= 1e-9 * v.norm() {
            return Err(Error::Element(
                "beam local y axis is parallel to the element axis".into(),
            ));
        }
        let ey = y.normalize();
        let ez = ex.cross(&ey);
        Ok((length, Matrix3::from_rows(&[ex.transpose(), ey.transpose(), ez.transpose()])))
    }

    /// 12×12 stiffness in local axes.
    fn local_stiffness(length: f64, material: &Material, s: &BeamSection) -> DMatrix<f64> {
        let e = material.youngs_modulus;
        let l = length;
        let l2 = l * l;
        let l3 = l2 * l;

        let ea = e * s.area / l;
        let gj = material.shear_modulus() * s.torsion / l;
        let (z12, z6, z4, z2) = (
            12.0 * e * s.izz / l3,
            6.0 * e * s.izz / l2,
            4.0 * e * s.izz / l,
            2.0 * e * s.izz / l,
        );
        let (y12, y6, y4, y2) = (
            12.0 * e * s.iyy / l3,
            6.0 * e * s.iyy / l2,
            4.0 * e * s.iyy / l,
            2.0 * e * s.iyy / l,
        );

        #[rustfmt::skip]
        let upper = [
            // axial
            (0, 0, ea), (0, 6, -ea), (6, 6, ea),
            // torsion
            (3, 3, gj), (3, 9, -gj), (9, 9, gj),
            // bending in the local x-y plane (v, θz)
            (1, 1, z12), (1, 5, z6), (1, 7, -z12), (1, 11, z6),
            (5, 5, z4), (5, 7, -z6), (5, 11, z2),
            (7, 7, z12), (7, 11, -z6),
            (11, 11, z4),
            // bending in the local x-z plane (w, θy)
            (2, 2, y12), (2, 4, -y6), (2, 8, -y12), (2, 10, -y6),
            (4, 4, y4), (4, 8, y6), (4, 10, y2),
            (8, 8, y12), (8, 10, y6),
            (10, 10, y4),
        ];

        let mut k = DMatrix::zeros(12, 12);
        for (i, j, v) in upper {
            k[(i, j)] = v;
            k[(j, i)] = v;
        }
        k
    }

    /// Block-diagonal transformation u_local = T u_global.
    fn transformation(rotation: &Matrix3<f64>) -> DMatrix<f64> {
        let mut t = DMatrix::zeros(12, 12);
        for block in 0..4 {
            t.fixed_view_mut::<3, 3>(3 * block, 3 * block)
                .copy_from(rotation);
        }
        t
    }
}

impl Element for Beam {
    fn n_nodes(&self) -> usize {
        2
    }

    fn dof_slots(&self) -> &'static [usize] {
        &SLOTS_ALL
    }

    fn stiffness(&self, coords: &[Point3], material: &Material) -> Result<DMatrix<f64>> {
        let section = material.beam_section()?;
        let (length, rotation) = Self::frame(coords, section)?;
        let t = Self::transformation(&rotation);
        let k_local = Self::local_stiffness(length, material, section);
        Ok(t.transpose() * k_local * t)
    }

    /// Axial stress N/A at node 1 and node 2.
    fn stress(
        &self,
        coords: &[Point3],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>> {
        check_dofs("Beam", displacements, 12)?;
        let section = material.beam_section()?;
        let (length, rotation) = Self::frame(coords, section)?;
        let t = Self::transformation(&rotation);
        let u_local = &t * DVector::from_row_slice(displacements);
        let forces = Self::local_stiffness(length, material, section) * u_local;

        // Member-end forces: tension positive
        Ok(vec![
            StressTensor::uniaxial(-forces[0] / section.area),
            StressTensor::uniaxial(forces[6] / section.area),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;
    use approx::assert_relative_eq;

    fn material(y_axis: Vec3) -> Material {
        Material::beam(
            1000.0,
            0.25,
            BeamSection {
                area: 2.0,
                iyy: 3.0,
                izz: 5.0,
                torsion: 1.5,
                y_axis,
            },
        )
        .unwrap()
    }

    fn inclined() -> Vec<Point3> {
        vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0)]
    }

    #[test]
    fn test_beam_axis_aligned_terms() {
        let coords = vec![Point3::zeros(), Point3::new(2.0, 0.0, 0.0)];
        let mat = material(Vec3::new(0.0, 1.0, 0.0));
        let k = Beam.stiffness(&coords, &mat).unwrap();
        // EA/L, 12EIz/L³, 12EIy/L³, GJ/L
        assert_relative_eq!(k[(0, 0)], 1000.0, epsilon = 1e-10);
        assert_relative_eq!(k[(1, 1)], 12.0 * 1000.0 * 5.0 / 8.0, epsilon = 1e-10);
        assert_relative_eq!(k[(2, 2)], 12.0 * 1000.0 * 3.0 / 8.0, epsilon = 1e-10);
        assert_relative_eq!(k[(3, 3)], 400.0 * 1.5 / 2.0, epsilon = 1e-10);
        assert_relative_eq!(k[(1, 5)], 6.0 * 1000.0 * 5.0 / 4.0, epsilon = 1e-10);
        assert_relative_eq!(k[(2, 4)], -6.0 * 1000.0 * 3.0 / 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_beam_symmetric() {
        let k = Beam
            .stiffness(&inclined(), &material(Vec3::new(0.0, 0.0, 1.0)))
            .unwrap();
        for i in 0..12 {
            assert!(k[(i, i)] > 0.0);
            for j in 0..12 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_beam_rigid_body_modes() {
        let coords = inclined();
        let k = Beam
            .stiffness(&coords, &material(Vec3::new(0.0, 0.0, 1.0)))
            .unwrap();
        for dir in 0..3 {
            let u = DVector::from_fn(12, |i, _| if i % 6 == dir { 1.0 } else { 0.0 });
            assert_relative_eq!((&k * u).norm(), 0.0, epsilon = 1e-9);
        }
        // Rotation about global z: u = θ × r, θz = 1 at both nodes
        let mut u = DVector::zeros(12);
        for (n, x) in coords.iter().enumerate() {
            u[6 * n] = -x[1];
            u[6 * n + 1] = x[0];
            u[6 * n + 5] = 1.0;
        }
        assert_relative_eq!((&k * u).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_beam_axial_stress() {
        let coords = vec![Point3::zeros(), Point3::new(2.0, 0.0, 0.0)];
        let mat = material(Vec3::new(0.0, 1.0, 0.0));
        let mut u = vec![0.0; 12];
        u[6] = 0.002;
        let stress = Beam.stress(&coords, &u, &mat).unwrap();
        // σ = E ε = 1000 * 0.001
        assert_eq!(stress.len(), 2);
        assert_relative_eq!(stress[0].xx(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(stress[1].xx(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beam_parallel_orientation_rejected() {
        let coords = vec![Point3::zeros(), Point3::new(0.0, 0.0, 3.0)];
        let mat = material(Vec3::new(0.0, 0.0, 1.0));
        assert!(matches!(
            Beam.stiffness(&coords, &mat),
            Err(Error::Element(_))
        ));
    }
}
