//! Packed skyline matrix.

use super::profile::SkylineProfile;
use crate::error::{Error, Result};
use nalgebra::DMatrix;
use serde::Serialize;

/// Symmetric matrix stored under a skyline profile.
///
/// Equation indices are 1-based. Accessors accept either `(i, j)` or
/// `(j, i)`; both address the single stored upper-triangle entry.
#[derive(Debug, Clone)]
pub struct SkylineMatrix {
    profile: SkylineProfile,
    values: Vec<f64>,
}

/// Raw view of the profile and packed array, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSnapshot {
    pub neq: usize,
    pub nwk: usize,
    pub max_column_height: usize,
    pub column_heights: Vec<usize>,
    /// 1-based diagonal addresses (first entry 1).
    pub diagonal_addresses: Vec<usize>,
    pub values: Vec<f64>,
}

impl SkylineMatrix {
    /// Allocate a zeroed matrix for the given profile.
    pub fn new(profile: SkylineProfile) -> Self {
        let values = vec![0.0; profile.nwk()];
        Self { profile, values }
    }

    /// Number of equations.
    #[inline]
    pub fn neq(&self) -> usize {
        self.profile.neq()
    }

    /// Number of stored entries.
    #[inline]
    pub fn nwk(&self) -> usize {
        self.values.len()
    }

    /// Layout of this matrix.
    pub fn profile(&self) -> &SkylineProfile {
        &self.profile
    }

    /// Packed position of entry (i, j), ordering the pair so the larger index is the column.
    pub fn position(&self, i: usize, j: usize) -> Result<usize> {
        let (row, column) = if i <= j { (i, j) } else { (j, i) };
        if row == 0 || column > self.neq() {
            return Err(Error::Solver(format!(
                "entry ({}, {}) outside a system of {} equations",
                i,
                j,
                self.neq()
            )));
        }
        let height = self.profile.height(column);
        if column - row > height {
            return Err(Error::ProfileViolation {
                row,
                column,
                height,
            });
        }
        Ok(self.profile.diagonal(column) + (column - row))
    }

    /// Mutable reference to entry (i, j) for accumulation.
    pub fn at(&mut self, i: usize, j: usize) -> Result<&mut f64> {
        let pos = self.position(i, j)?;
        Ok(&mut self.values[pos])
    }

    /// Add `value` to entry (i, j).
    #[inline]
    pub fn add(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        *self.at(i, j)? += value;
        Ok(())
    }

    /// Value of entry (i, j); zero for entries above the skyline.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        match self.position(i, j) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Diagonal entry of 1-based equation `column`.
    #[inline]
    pub fn diagonal(&self, column: usize) -> f64 {
        self.values[self.profile.diagonal(column)]
    }

    /// Packed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Split borrow of layout and values for in-place kernels.
    pub(crate) fn parts_mut(&mut self) -> (&SkylineProfile, &mut [f64]) {
        (&self.profile, &mut self.values)
    }

    /// Expand into a dense symmetric matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.neq();
        let mut dense = DMatrix::zeros(n, n);
        for column in 1..=n {
            for row in self.profile.first_row(column)..=column {
                let value = self.values[self.profile.diagonal(column) + column - row];
                dense[(row - 1, column - 1)] = value;
                dense[(column - 1, row - 1)] = value;
            }
        }
        dense
    }

    /// Diagnostic snapshot of layout and values.
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            neq: self.neq(),
            nwk: self.nwk(),
            max_column_height: self.profile.max_height(),
            column_heights: self.profile.heights().to_vec(),
            diagonal_addresses: self.profile.addresses_one_based(),
            values: self.values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tridiagonal(n: usize) -> SkylineMatrix {
        let heights = (0..n).map(|c| usize::from(c > 0)).collect();
        SkylineMatrix::new(SkylineProfile::from_heights(heights).unwrap())
    }

    #[test]
    fn test_allocation_is_zeroed() {
        let k = tridiagonal(4);
        assert_eq!(k.nwk(), 7);
        assert!(k.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_symmetric_access() {
        let mut k = tridiagonal(3);
        k.add(1, 2, 5.0).unwrap();
        k.add(2, 1, 1.0).unwrap();
        assert_eq!(k.position(1, 2).unwrap(), k.position(2, 1).unwrap());
        assert_relative_eq!(k.get(1, 2), 6.0);
        assert_relative_eq!(k.get(2, 1), 6.0);
    }

    #[test]
    fn test_out_of_profile_write_fails() {
        let mut k = tridiagonal(3);
        let err = k.add(1, 3, 1.0).unwrap_err();
        assert!(matches!(
            err,
            Error::ProfileViolation {
                row: 1,
                column: 3,
                height: 1
            }
        ));
        assert!(k.values().iter().all(|&v| v == 0.0));
        assert_eq!(k.get(1, 3), 0.0);
    }

    #[test]
    fn test_out_of_range_equation_fails() {
        let mut k = tridiagonal(2);
        assert!(matches!(k.add(0, 1, 1.0), Err(Error::Solver(_))));
        assert!(matches!(k.add(2, 3, 1.0), Err(Error::Solver(_))));
    }

    #[test]
    fn test_packed_layout() {
        let mut k = tridiagonal(3);
        k.add(1, 1, 11.0).unwrap();
        k.add(2, 2, 22.0).unwrap();
        k.add(1, 2, 12.0).unwrap();
        k.add(3, 3, 33.0).unwrap();
        k.add(2, 3, 23.0).unwrap();
        assert_eq!(k.values(), &[11.0, 22.0, 12.0, 33.0, 23.0]);
    }

    #[test]
    fn test_to_dense_mirrors_upper_triangle() {
        let mut k = tridiagonal(2);
        k.add(1, 1, 2.0).unwrap();
        k.add(1, 2, -1.0).unwrap();
        k.add(2, 2, 3.0).unwrap();
        let dense = k.to_dense();
        assert_relative_eq!(dense[(0, 1)], -1.0);
        assert_relative_eq!(dense[(1, 0)], -1.0);
        assert_relative_eq!(dense[(1, 1)], 3.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let k = tridiagonal(2);
        let snapshot = k.snapshot();
        assert_eq!(snapshot.diagonal_addresses, vec![1, 2, 4]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"nwk\":3"));
    }
}
