//! Two-node 3D truss (bar) element.
//!
//! Axial stiffness only: 3 translational DOFs per node, 6 in total. The
//! element stiffness in global axes is
//!
//! ```text
//! K = EA/L [ c cᵀ  -c cᵀ ]
//!          [-c cᵀ   c cᵀ ]
//! ```
//!
//! with `c` the unit vector from node 1 to node 2. Stress output is the single
//! axial stress `σ = E (u₂ - u₁)·c / L`, stored as σ_xx of a uniaxial tensor in
//! the bar's own axis.

use crate::element::{check_dofs, check_nodes, Element, SLOTS_XYZ};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{Point3, StressTensor, Vec3};
use nalgebra::DMatrix;

/// 2-node axial bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bar;

impl Bar {
    /// Length and unit direction cosines.
    pub fn axis(coords: &[Point3]) -> Result<(f64, Vec3)> {
        check_nodes("Bar", coords, 2)?;
        let d = coords[1] - coords[0];
        let length = d.norm();
        if length <= 0.0 {
            return Err(Error::Element("bar element has zero length".into()));
        }
        Ok((length, d / length))
    }
}

impl Element for Bar {
    fn n_nodes(&self) -> usize {
        2
    }

    fn dof_slots(&self) -> &'static [usize] {
        &SLOTS_XYZ
    }

    fn stiffness(&self, coords: &[Point3], material: &Material) -> Result<DMatrix<f64>> {
        let (length, c) = Self::axis(coords)?;
        let ea_l = material.youngs_modulus * material.bar_area()? / length;
        let cc = c * c.transpose() * ea_l;

        let mut k = DMatrix::zeros(6, 6);
        for i in 0..3 {
            for j in 0..3 {
                k[(i, j)] = cc[(i, j)];
                k[(i + 3, j + 3)] = cc[(i, j)];
                k[(i, j + 3)] = -cc[(i, j)];
                k[(i + 3, j)] = -cc[(i, j)];
            }
        }
        Ok(k)
    }

    fn stress(
        &self,
        coords: &[Point3],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>> {
        check_dofs("Bar", displacements, 6)?;
        let (length, c) = Self::axis(coords)?;
        let elongation: f64 = (0..3)
            .map(|k| (displacements[k + 3] - displacements[k]) * c[k])
            .sum();
        let sigma = material.youngs_modulus * elongation / length;
        Ok(vec![StressTensor::uniaxial(sigma)])
    }
}
