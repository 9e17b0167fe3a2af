//! Nodal points and their degree-of-freedom codes.
//!
//! Every node carries six DOF slots: translations along x, y, z followed by
//! rotations about x, y, z. The input restraint of a slot is either free or
//! fixed; after equation numbering each slot holds a [`DofNumber`].

use crate::types::{Point3, DOFS_PER_NODE};

/// Input boundary condition of a single DOF slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Restraint {
    /// The DOF is unknown and receives an equation number.
    #[default]
    Free,
    /// The DOF is prescribed to zero and receives no equation.
    Fixed,
}

impl Restraint {
    /// Interpret an input boundary code: 0 is free, anything else fixed.
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            Restraint::Free
        } else {
            Restraint::Fixed
        }
    }

    /// Input code of this restraint (0 free, 1 fixed).
    pub fn code(self) -> u8 {
        match self {
            Restraint::Free => 0,
            Restraint::Fixed => 1,
        }
    }
}

/// Global equation assigned to a DOF slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DofNumber {
    /// No equation; the DOF is constrained (or not yet numbered).
    #[default]
    Constrained,
    /// 1-based global equation index.
    Equation(usize),
}

impl DofNumber {
    /// The 1-based equation index, if any.
    #[inline]
    pub fn equation(self) -> Option<usize> {
        match self {
            DofNumber::Constrained => None,
            DofNumber::Equation(n) => Some(n),
        }
    }

    /// Report form: the equation index, or 0 when constrained.
    pub fn code(self) -> usize {
        self.equation().unwrap_or(0)
    }
}

/// A nodal point of the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// 1-based node number.
    pub number: usize,
    /// Nodal coordinates.
    pub coords: Point3,
    /// Input restraint of each DOF slot.
    pub restraints: [Restraint; DOFS_PER_NODE],
    /// Equation numbers, filled in by [`crate::equations::number_equations`].
    pub dofs: [DofNumber; DOFS_PER_NODE],
}

impl Node {
    /// Create a node with translational restraints; rotations are fixed.
    pub fn new(number: usize, coords: Point3, translations: [Restraint; 3]) -> Self {
        let mut restraints = [Restraint::Fixed; DOFS_PER_NODE];
        restraints[..3].copy_from_slice(&translations);
        Self::with_restraints(number, coords, restraints)
    }

    /// Create a node with all six restraints given explicitly.
    pub fn with_restraints(
        number: usize,
        coords: Point3,
        restraints: [Restraint; DOFS_PER_NODE],
    ) -> Self {
        Self {
            number,
            coords,
            restraints,
            dofs: [DofNumber::Constrained; DOFS_PER_NODE],
        }
    }

    /// Create a node whose translations are all free (rotations fixed).
    pub fn free(number: usize, coords: Point3) -> Self {
        Self::new(number, coords, [Restraint::Free; 3])
    }

    /// Equation of DOF slot `slot` (0-based, 0..6).
    #[inline]
    pub fn equation(&self, slot: usize) -> Option<usize> {
        self.dofs[slot].equation()
    }

    /// Number of free DOF slots.
    pub fn n_free(&self) -> usize {
        self.restraints
            .iter()
            .filter(|r| **r == Restraint::Free)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rotations_fixed() {
        let node = Node::free(1, Point3::zeros());
        assert_eq!(node.restraints[..3], [Restraint::Free; 3]);
        assert_eq!(node.restraints[3..], [Restraint::Fixed; 3]);
        assert_eq!(node.n_free(), 3);
    }

    #[test]
    fn test_restraint_codes() {
        assert_eq!(Restraint::from_code(0), Restraint::Free);
        assert_eq!(Restraint::from_code(1), Restraint::Fixed);
        assert_eq!(Restraint::from_code(-1), Restraint::Fixed);
        assert_eq!(Restraint::Fixed.code(), 1);
    }

    #[test]
    fn test_dof_number_code() {
        assert_eq!(DofNumber::Constrained.code(), 0);
        assert_eq!(DofNumber::Equation(4).code(), 4);
        assert_eq!(DofNumber::Equation(4).equation(), Some(4));
    }
}
