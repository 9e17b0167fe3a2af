//! Material and section property sets.
//!
//! Every element group owns a list of property sets. A set combines the
//! isotropic elastic constants with the cross-section data its element kind
//! needs (bar area, plane thickness, beam section).

use crate::error::{Error, Result};
use crate::types::{ConstitutiveMatrix, Vec3};
use nalgebra::{Matrix3, Matrix6};

/// Cross-section data attached to a material set.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Continuum (hexahedron): no section data.
    Solid,
    /// Axial member with cross-sectional area.
    Bar { area: f64 },
    /// Plane stress membrane with thickness.
    Plane { thickness: f64 },
    /// 3D frame member.
    Beam(BeamSection),
}

/// Section constants of a 3D beam.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSection {
    /// Cross-sectional area.
    pub area: f64,
    /// Second moment of area for bending about the local y axis.
    pub iyy: f64,
    /// Second moment of area for bending about the local z axis.
    pub izz: f64,
    /// Torsion constant.
    pub torsion: f64,
    /// Orientation of the local y axis in global coordinates.
    pub y_axis: Vec3,
}

/// Material property set for structural analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Young's modulus E.
    pub youngs_modulus: f64,
    /// Poisson's ratio ν (dimensionless).
    pub poissons_ratio: f64,
    /// Section data.
    pub section: Section,
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidMaterial(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

impl Material {
    /// Create a new isotropic linear elastic material with a section.
    ///
    /// # Errors
    ///
    /// Returns error if E is not positive, ν is outside (-1, 0.5) or a
    /// section constant is not positive.
    pub fn new(youngs_modulus: f64, poissons_ratio: f64, section: Section) -> Result<Self> {
        positive("Young's modulus", youngs_modulus)?;
        if poissons_ratio <= -1.0 || poissons_ratio >= 0.5 {
            return Err(Error::InvalidMaterial(format!(
                "Poisson's ratio must be in range (-1, 0.5), got {}",
                poissons_ratio
            )));
        }
        match &section {
            Section::Solid => {}
            Section::Bar { area } => positive("cross-sectional area", *area)?,
            Section::Plane { thickness } => positive("thickness", *thickness)?,
            Section::Beam(beam) => {
                positive("cross-sectional area", beam.area)?;
                positive("Iyy", beam.iyy)?;
                positive("Izz", beam.izz)?;
                positive("torsion constant", beam.torsion)?;
                if beam.y_axis.norm() == 0.0 {
                    return Err(Error::InvalidMaterial(
                        "beam local y axis must be non-zero".into(),
                    ));
                }
            }
        }
        Ok(Self {
            youngs_modulus,
            poissons_ratio,
            section,
        })
    }

    /// Bar set: only E and area matter.
    pub fn bar(youngs_modulus: f64, area: f64) -> Result<Self> {
        Self::new(youngs_modulus, 0.0, Section::Bar { area })
    }

    /// Plane stress set.
    pub fn plane(youngs_modulus: f64, poissons_ratio: f64, thickness: f64) -> Result<Self> {
        Self::new(youngs_modulus, poissons_ratio, Section::Plane { thickness })
    }

    /// Continuum set.
    pub fn solid(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        Self::new(youngs_modulus, poissons_ratio, Section::Solid)
    }

    /// Beam set.
    pub fn beam(youngs_modulus: f64, poissons_ratio: f64, section: BeamSection) -> Result<Self> {
        Self::new(youngs_modulus, poissons_ratio, Section::Beam(section))
    }

    /// Structural steel continuum (E = 200 GPa, ν = 0.3).
    pub fn steel() -> Self {
        Self {
            youngs_modulus: 200e9,
            poissons_ratio: 0.3,
            section: Section::Solid,
        }
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poissons_ratio))
    }

    /// Bar area, or an element error naming the expected section.
    pub fn bar_area(&self) -> Result<f64> {
        match self.section {
            Section::Bar { area } => Ok(area),
            _ => Err(Error::Element("bar elements need a bar section".into())),
        }
    }

    /// Plane thickness, or an element error.
    pub fn thickness(&self) -> Result<f64> {
        match self.section {
            Section::Plane { thickness } => Ok(thickness),
            _ => Err(Error::Element(
                "plane elements need a thickness section".into(),
            )),
        }
    }

    /// Beam section, or an element error.
    pub fn beam_section(&self) -> Result<&BeamSection> {
        match &self.section {
            Section::Beam(beam) => Ok(beam),
            _ => Err(Error::Element("beam elements need a beam section".into())),
        }
    }

    /// 3D constitutive matrix for isotropic linear elasticity.
    ///
    /// Returns the 6x6 matrix D such that σ = D * ε in Voigt notation.
    pub fn constitutive_3d(&self) -> ConstitutiveMatrix {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;

        let factor = e / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let c11 = factor * (1.0 - nu);
        let c12 = factor * nu;
        let c44 = factor * (1.0 - 2.0 * nu) / 2.0; // = G

        #[rustfmt::skip]
        let d = Matrix6::new(
            c11, c12, c12, 0.0, 0.0, 0.0,
            c12, c11, c12, 0.0, 0.0, 0.0,
            c12, c12, c11, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, c44, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, c44, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, c44,
        );
        d
    }

    /// Plane stress constitutive matrix.
    ///
    /// Returns a 3x3 matrix for [σ_xx, σ_yy, τ_xy] = D * [ε_xx, ε_yy, γ_xy].
    pub fn constitutive_plane_stress(&self) -> Matrix3<f64> {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;

        let factor = e / (1.0 - nu * nu);

        #[rustfmt::skip]
        let d = Matrix3::new(
            factor,      factor * nu, 0.0,
            factor * nu, factor,      0.0,
            0.0,         0.0,         factor * (1.0 - nu) / 2.0,
        );
        d
    }
}
