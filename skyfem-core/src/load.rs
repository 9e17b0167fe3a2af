//! Concentrated nodal loads and right-hand-side assembly.

use crate::error::{Error, Result};
use crate::mesh::Model;
use crate::types::DOFS_PER_NODE;

/// A concentrated load on one nodal DOF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodalLoad {
    /// 1-based node number.
    pub node: usize,
    /// 1-based DOF direction: 1..3 forces along x, y, z, 4..6 moments about them.
    pub direction: usize,
    pub magnitude: f64,
}

impl NodalLoad {
    pub fn new(node: usize, direction: usize, magnitude: f64) -> Self {
        Self {
            node,
            direction,
            magnitude,
        }
    }
}

/// One load case: a numbered list of concentrated loads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadCase {
    /// 1-based load case number.
    pub number: usize,
    pub loads: Vec<NodalLoad>,
}

impl LoadCase {
    pub fn new(number: usize, loads: Vec<NodalLoad>) -> Self {
        Self { number, loads }
    }

    /// Check node references and directions against a model of `n_nodes` nodes.
    pub fn validate(&self, n_nodes: usize) -> Result<()> {
        for load in &self.loads {
            if load.node == 0 || load.node > n_nodes {
                return Err(Error::Load(format!(
                    "load case {} applies a load to node {}, but the model has {} nodes",
                    self.number, load.node, n_nodes
                )));
            }
            if load.direction == 0 || load.direction > DOFS_PER_NODE {
                return Err(Error::Load(format!(
                    "load case {} has direction {} at node {}; directions run 1 to {}",
                    self.number, load.direction, load.node, DOFS_PER_NODE
                )));
            }
        }
        Ok(())
    }
}

/// Add the loads of `case` into `rhs`, indexed by equation - 1.
///
/// Loads on constrained DOFs have no equation and are dropped.
pub fn assemble_force(model: &Model, case: &LoadCase, rhs: &mut [f64]) -> Result<()> {
    let neq = model
        .neq()
        .ok_or_else(|| Error::Mesh("equations have not been numbered".into()))?;
    if rhs.len() != neq {
        return Err(Error::Solver(format!(
            "load vector has {} entries, system has {} equations",
            rhs.len(),
            neq
        )));
    }
    case.validate(model.n_nodes())?;

    let nodes = model.nodes();
    for load in &case.loads {
        if let Some(eq) = nodes[load.node - 1].equation(load.direction - 1) {
            rhs[eq - 1] += load.magnitude;
        }
    }
    Ok(())
}

/// Force vector of `case`, length NEQ.
pub fn force_vector(model: &Model, case: &LoadCase) -> Result<Vec<f64>> {
    let mut rhs = vec![0.0; model.neq().unwrap_or(0)];
    assemble_force(model, case, &mut rhs)?;
    Ok(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, Restraint};
    use crate::types::Point3;

    fn model() -> Model {
        let mut model = Model::new("loads");
        model
            .add_node(Node::new(
                1,
                Point3::zeros(),
                [Restraint::Fixed, Restraint::Free, Restraint::Fixed],
            ))
            .unwrap();
        model.add_node(Node::free(2, Point3::new(1.0, 0.0, 0.0))).unwrap();
        model.number_equations();
        model
    }

    #[test]
    fn test_loads_accumulate_on_equations() {
        let model = model();
        let case = LoadCase::new(
            1,
            vec![
                NodalLoad::new(2, 1, 10.0),
                NodalLoad::new(2, 1, 5.0),
                NodalLoad::new(1, 2, -3.0),
            ],
        );
        let rhs = force_vector(&model, &case).unwrap();
        assert_eq!(rhs, vec![-3.0, 15.0, 0.0, 0.0]);
    }

    #[test]
    fn test_loads_on_constrained_dofs_dropped() {
        let model = model();
        // Node 1 x is fixed, node 2 rotations are fixed by default
        let case = LoadCase::new(
            1,
            vec![NodalLoad::new(1, 1, 7.0), NodalLoad::new(2, 6, 1.0)],
        );
        let rhs = force_vector(&model, &case).unwrap();
        assert!(rhs.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_invalid_direction() {
        let model = model();
        let case = LoadCase::new(1, vec![NodalLoad::new(2, 7, 1.0)]);
        assert!(matches!(force_vector(&model, &case), Err(Error::Load(_))));
    }

    #[test]
    fn test_requires_numbering() {
        let mut model = Model::new("");
        model.add_node(Node::free(1, Point3::zeros())).unwrap();
        let case = LoadCase::new(1, vec![]);
        let mut rhs = vec![0.0; 3];
        assert!(matches!(
            assemble_force(&model, &case, &mut rhs),
            Err(Error::Mesh(_))
        ));
    }

    #[test]
    fn test_rhs_length_mismatch() {
        let model = model();
        let case = LoadCase::new(1, vec![]);
        let mut rhs = vec![0.0; 2];
        assert!(matches!(
            assemble_force(&model, &case, &mut rhs),
            Err(Error::Solver(_))
        ));
    }
}
