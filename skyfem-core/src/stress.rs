//! Element stress recovery from a displacement solution.
//!
//! For every element the local displacement vector is gathered through its
//! location map (constrained DOFs read as zero) and handed to the element's
//! stress routine. Elements are independent, so recovery runs on the Rayon
//! pool when asked to.

use crate::element::ElementKind;
use crate::error::Result;
use crate::mesh::{ElementGroup, ElementView, Model};
use crate::types::StressTensor;
use rayon::prelude::*;

/// Stress result for a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStress {
    /// 1-based element number within its group.
    pub element: usize,
    /// Stress tensors at each stress point.
    pub points: Vec<StressTensor>,
    /// Axial force σ·A, for bars.
    pub axial_force: Option<f64>,
}

impl ElementStress {
    /// Compute the average stress across all stress points.
    pub fn average_stress(&self) -> StressTensor {
        if self.points.is_empty() {
            return StressTensor::zero();
        }
        let sum = self
            .points
            .iter()
            .fold(StressTensor::zero().0, |acc, s| acc + s.0);
        StressTensor(sum / self.points.len() as f64)
    }

    /// Maximum von Mises stress among all stress points.
    pub fn max_von_mises(&self) -> f64 {
        self.points
            .iter()
            .map(|s| s.von_mises())
            .fold(0.0, f64::max)
    }
}

/// Stresses of one element group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStress {
    /// 1-based group number.
    pub group: usize,
    pub kind: ElementKind,
    pub elements: Vec<ElementStress>,
}

/// Stress recovery results for one load case.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StressField {
    pub groups: Vec<GroupStress>,
}

impl StressField {
    /// Stress of element `element` (1-based) in group `group` (1-based).
    pub fn element(&self, group: usize, element: usize) -> Option<&ElementStress> {
        self.groups
            .get(group.checked_sub(1)?)?
            .elements
            .get(element.checked_sub(1)?)
    }

    /// Number of elements with stress data.
    pub fn n_elements(&self) -> usize {
        self.groups.iter().map(|g| g.elements.len()).sum()
    }

    /// Maximum von Mises stress across all elements.
    pub fn max_von_mises(&self) -> f64 {
        self.groups
            .iter()
            .flat_map(|g| &g.elements)
            .map(ElementStress::max_von_mises)
            .fold(0.0, f64::max)
    }
}

fn element_stress(
    view: &ElementView<'_>,
    model: &Model,
    displacements: &[f64],
) -> Result<ElementStress> {
    let points = view.stress(model.nodes(), displacements)?;
    let axial_force = match view.kind {
        ElementKind::Bar(_) => {
            let area = view.material.bar_area()?;
            points.first().map(|s| s.xx() * area)
        }
        _ => None,
    };
    Ok(ElementStress {
        element: view.record.number,
        points,
        axial_force,
    })
}

fn group_stress(
    group: &ElementGroup,
    model: &Model,
    displacements: &[f64],
    parallel: bool,
) -> Result<GroupStress> {
    let views: Vec<_> = group.iter().collect();
    let elements = if parallel {
        views
            .par_iter()
            .map(|v| element_stress(v, model, displacements))
            .collect::<Result<Vec<_>>>()?
    } else {
        views
            .iter()
            .map(|v| element_stress(v, model, displacements))
            .collect::<Result<Vec<_>>>()?
    };
    Ok(GroupStress {
        group: group.number,
        kind: group.kind(),
        elements,
    })
}

/// Recover stresses of every element for one displacement vector.
///
/// `displacements` is indexed by equation - 1, as returned by the solver.
pub fn recover_stresses(
    model: &Model,
    displacements: &[f64],
    parallel: bool,
) -> Result<StressField> {
    let groups = model
        .groups()
        .iter()
        .map(|g| group_stress(g, model, displacements, parallel))
        .collect::<Result<Vec<_>>>()?;
    Ok(StressField { groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::node::{Node, Restraint};
    use crate::types::Point3;
    use approx::assert_relative_eq;

    fn hinged_bar() -> Model {
        let mut model = Model::new("bar");
        model
            .add_node(Node::new(1, Point3::zeros(), [Restraint::Fixed; 3]))
            .unwrap();
        model
            .add_node(Node::new(
                2,
                Point3::new(2.0, 0.0, 0.0),
                [Restraint::Free, Restraint::Fixed, Restraint::Fixed],
            ))
            .unwrap();
        let g = model.add_group(
            ElementKind::from_code(1).unwrap(),
            vec![Material::bar(1000.0, 0.5).unwrap()],
        );
        model.add_element(g, 1, &[1, 2], 1).unwrap();
        model.number_equations();
        model
    }

    #[test]
    fn test_bar_stress_and_force() {
        let model = hinged_bar();
        // u = 0.004 over L = 2: ε = 0.002, σ = 2, N = 1
        let field = recover_stresses(&model, &[0.004], false).unwrap();
        let bar = field.element(1, 1).unwrap();
        assert_relative_eq!(bar.points[0].xx(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(bar.axial_force.unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(field.n_elements(), 1);
    }

    #[test]
    fn test_zero_displacement_zero_stress() {
        let model = hinged_bar();
        let field = recover_stresses(&model, &[0.0], true).unwrap();
        assert_relative_eq!(field.max_von_mises(), 0.0);
    }

    #[test]
    fn test_average_stress() {
        let es = ElementStress {
            element: 1,
            points: vec![StressTensor::uniaxial(1.0), StressTensor::uniaxial(3.0)],
            axial_force: None,
        };
        assert_relative_eq!(es.average_stress().xx(), 2.0);
        assert_relative_eq!(es.max_von_mises(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_element_lookup() {
        let field = StressField::default();
        assert!(field.element(0, 1).is_none());
        assert!(field.element(1, 1).is_none());
    }
}
