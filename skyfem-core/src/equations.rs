//! Global equation numbering and element location maps.

use crate::node::{DofNumber, Node, Restraint};

/// Assign dense 1-based equation numbers to every free DOF slot.
///
/// Nodes are scanned in input order and, within a node, slot by slot. Fixed
/// slots become [`DofNumber::Constrained`]. Returns NEQ, the number of
/// equations.
pub fn number_equations(nodes: &mut [Node]) -> usize {
    let mut neq = 0;
    for node in nodes.iter_mut() {
        for (restraint, dof) in node.restraints.iter().zip(node.dofs.iter_mut()) {
            *dof = match restraint {
                Restraint::Fixed => DofNumber::Constrained,
                Restraint::Free => {
                    neq += 1;
                    DofNumber::Equation(neq)
                }
            };
        }
    }
    neq
}

/// Local-to-global equation map of one element.
///
/// Entry `k` is the 1-based global equation of local DOF `k`, or `None` when
/// that DOF is constrained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationMap(Vec<Option<usize>>);

impl LocationMap {
    /// Build the map for an element from its nodes and the DOF slots it uses.
    pub fn build(nodes: &[Node], connectivity: &[usize], slots: &[usize]) -> Self {
        let entries = connectivity
            .iter()
            .flat_map(|&n| slots.iter().map(move |&s| nodes[n].equation(s)))
            .collect();
        Self(entries)
    }

    /// Number of local DOFs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries as a slice.
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.0
    }

    /// Smallest equation number touched by the element.
    pub fn first_equation(&self) -> Option<usize> {
        self.0.iter().flatten().copied().min()
    }

    /// Gather element DOF values from a global equation vector (0 where constrained).
    pub fn gather(&self, global: &[f64]) -> Vec<f64> {
        self.0
            .iter()
            .map(|eq| eq.map_or(0.0, |e| global[e - 1]))
            .collect()
    }
}

impl From<Vec<Option<usize>>> for LocationMap {
    fn from(entries: Vec<Option<usize>>) -> Self {
        Self(entries)
    }
}
