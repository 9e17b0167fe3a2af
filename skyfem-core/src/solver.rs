//! Skyline LDLᵀ factorization and back-substitution.
//!
//! The assembled stiffness matrix is decomposed in place as `K = Uᵀ D U`,
//! with `U` unit upper triangular and `D` diagonal, column by column and
//! without pivoting or square roots. Column `j` of the packed array then holds
//! `d_jj` on its diagonal and the entries `u_ij` above it. Fill-in stays under
//! the skyline, so no extra storage is needed.
//!
//! Factorization consumes the [`SkylineMatrix`] and yields an
//! [`LdltFactorization`]; every load case is solved against that one factor.

use crate::error::{Error, Result};
use crate::skyline::SkylineMatrix;

/// Default relative pivot tolerance.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;

/// Factorized skyline matrix, ready for any number of right-hand sides.
#[derive(Debug, Clone)]
pub struct LdltFactorization {
    factors: SkylineMatrix,
}

impl SkylineMatrix {
    /// Factorize in place with the default pivot tolerance.
    pub fn factorize(self) -> Result<LdltFactorization> {
        self.factorize_with_tolerance(DEFAULT_PIVOT_TOLERANCE)
    }

    /// Factorize in place.
    ///
    /// A pivot that is not larger than `tolerance` times the assembled
    /// diagonal of its column (zero, negative, or NaN included) fails with
    /// [`Error::SingularMatrix`].
    pub fn factorize_with_tolerance(mut self, tolerance: f64) -> Result<LdltFactorization> {
        let (profile, a) = self.parts_mut();
        let n = profile.neq();

        for j in 1..=n {
            let dj = profile.diagonal(j);
            let mj = profile.first_row(j);
            let assembled = a[dj];

            // g_ij = k_ij - Σ u_ri g_rj over rows shared by columns i and j
            for i in (mj + 1)..j {
                let di = profile.diagonal(i);
                let start = profile.first_row(i).max(mj);
                let mut sum = 0.0;
                for r in start..i {
                    sum += a[di + i - r] * a[dj + j - r];
                }
                a[dj + j - i] -= sum;
            }

            // u_rj = g_rj / d_rr, d_jj = k_jj - Σ u_rj g_rj
            let mut reduction = 0.0;
            for r in mj..j {
                let g = a[dj + j - r];
                let u = g / a[profile.diagonal(r)];
                reduction += u * g;
                a[dj + j - r] = u;
            }
            let pivot = assembled - reduction;
            if !(pivot > tolerance * assembled.abs()) || pivot <= 0.0 {
                return Err(Error::SingularMatrix { equation: j, pivot });
            }
            a[dj] = pivot;
        }

        Ok(LdltFactorization { factors: self })
    }
}

impl LdltFactorization {
    /// Number of equations.
    pub fn neq(&self) -> usize {
        self.factors.neq()
    }

    /// Packed factors: `d_jj` on diagonals, `u_ij` above them.
    pub fn factors(&self) -> &SkylineMatrix {
        &self.factors
    }

    /// The diagonal `D`, indexed by `equation - 1`.
    pub fn pivots(&self) -> Vec<f64> {
        (1..=self.neq()).map(|j| self.factors.diagonal(j)).collect()
    }

    /// Solve `K x = b` in place: `rhs` holds `b` on entry and `x` on return.
    pub fn solve(&self, rhs: &mut [f64]) -> Result<()> {
        let n = self.neq();
        if rhs.len() != n {
            return Err(Error::Solver(format!(
                "right-hand side has {} entries, system has {} equations",
                rhs.len(),
                n
            )));
        }
        let profile = self.factors.profile();
        let a = self.factors.values();

        // Forward reduction: Uᵀ y = b
        for j in 1..=n {
            let dj = profile.diagonal(j);
            let mut sum = 0.0;
            for r in profile.first_row(j)..j {
                sum += a[dj + j - r] * rhs[r - 1];
            }
            rhs[j - 1] -= sum;
        }

        // Diagonal scaling: z = D⁻¹ y
        for j in 1..=n {
            rhs[j - 1] /= a[profile.diagonal(j)];
        }

        // Back substitution: U x = z
        for j in (2..=n).rev() {
            let dj = profile.diagonal(j);
            let xj = rhs[j - 1];
            for r in profile.first_row(j)..j {
                rhs[r - 1] -= a[dj + j - r] * xj;
            }
        }

        Ok(())
    }

    /// Solve for a right-hand side, returning the solution.
    pub fn solve_vec(&self, rhs: &[f64]) -> Result<Vec<f64>> {
        let mut x = rhs.to_vec();
        self.solve(&mut x)?;
        Ok(x)
    }

    /// Solve every right-hand side in place.
    pub fn solve_all(&self, cases: &mut [Vec<f64>]) -> Result<()> {
        cases.iter_mut().try_for_each(|rhs| self.solve(rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skyline::SkylineProfile;
    use approx::assert_relative_eq;

    /// Dense full-profile matrix from row-major values.
    fn full(n: usize, rows: &[f64]) -> SkylineMatrix {
        let profile = SkylineProfile::from_heights((0..n).collect()).unwrap();
        let mut k = SkylineMatrix::new(profile);
        for i in 0..n {
            for j in i..n {
                k.add(i + 1, j + 1, rows[i * n + j]).unwrap();
            }
        }
        k
    }

    #[test]
    fn test_simple_spd() {
        // [4 2; 2 3] x = [4; 5] → x = [0.25, 1.5]
        let x = full(2, &[4.0, 2.0, 2.0, 3.0])
            .factorize()
            .unwrap()
            .solve_vec(&[4.0, 5.0])
            .unwrap();
        assert_relative_eq!(x[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_3x3_spd() {
        // Exact: -3/16, 11/8, 3/4
        let k = full(3, &[4.0, 2.0, 0.0, 2.0, 5.0, 2.0, 0.0, 2.0, 3.0]);
        let x = k.factorize().unwrap().solve_vec(&[2.0, 8.0, 5.0]).unwrap();
        let expected = [-0.1875, 1.375, 0.75];
        for i in 0..3 {
            assert_relative_eq!(x[i], expected[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pivots_of_known_factorization() {
        // [4 2; 2 3] = Uᵀ D U with d = [4, 2], u12 = 0.5
        let factor = full(2, &[4.0, 2.0, 2.0, 3.0]).factorize().unwrap();
        assert_eq!(factor.pivots(), vec![4.0, 2.0]);
        assert_relative_eq!(factor.factors().get(1, 2), 0.5);
    }

    #[test]
    fn test_variable_profile_matches_dense() {
        // Column heights [0, 1, 1, 3]: column 4 couples back to row 1.
        let profile = SkylineProfile::from_heights(vec![0, 1, 1, 3]).unwrap();
        let mut k = SkylineMatrix::new(profile);
        for (i, j, v) in [
            (1, 1, 5.0),
            (2, 2, 6.0),
            (3, 3, 7.0),
            (4, 4, 8.0),
            (1, 2, -1.0),
            (2, 3, -2.0),
            (1, 4, 1.5),
            (3, 4, -0.5),
        ] {
            k.add(i, j, v).unwrap();
        }
        let dense = k.to_dense();
        let b = [1.0, -2.0, 3.0, 0.5];
        let x = k.factorize().unwrap().solve_vec(&b).unwrap();

        let r = &dense * nalgebra::DVector::from_column_slice(&x)
            - nalgebra::DVector::from_column_slice(&b);
        assert!(r.norm() < 1e-12, "residual {}", r.norm());
    }

    #[test]
    fn test_not_positive_definite() {
        // Eigenvalues 3 and -1
        let err = full(2, &[1.0, 2.0, 2.0, 1.0]).factorize().unwrap_err();
        assert!(matches!(err, Error::SingularMatrix { equation: 2, .. }));
    }

    #[test]
    fn test_zero_diagonal_is_singular() {
        let profile = SkylineProfile::from_heights(vec![0, 0]).unwrap();
        let mut k = SkylineMatrix::new(profile);
        k.add(1, 1, 1.0).unwrap();
        let err = k.factorize().unwrap_err();
        assert!(matches!(err, Error::SingularMatrix { equation: 2, .. }));
    }

    #[test]
    fn test_repeated_solves_identical() {
        let factor = full(3, &[4.0, 1.0, 0.5, 1.0, 3.0, 0.2, 0.5, 0.2, 2.0])
            .factorize()
            .unwrap();
        let b = [1.0, 2.0, 3.0];
        let first = factor.solve_vec(&b).unwrap();
        let second = factor.solve_vec(&b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_solve_all_load_cases() {
        let factor = full(2, &[4.0, 2.0, 2.0, 3.0]).factorize().unwrap();
        let mut cases = vec![vec![4.0, 5.0], vec![8.0, 10.0]];
        factor.solve_all(&mut cases).unwrap();
        assert_relative_eq!(cases[1][0], 2.0 * cases[0][0], epsilon = 1e-12);
        assert_relative_eq!(cases[1][1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rhs_mismatch() {
        let factor = full(2, &[4.0, 2.0, 2.0, 3.0]).factorize().unwrap();
        let mut rhs = vec![1.0, 2.0, 3.0];
        assert!(matches!(factor.solve(&mut rhs), Err(Error::Solver(_))));
    }

    #[test]
    fn test_empty_system() {
        let k = SkylineMatrix::new(SkylineProfile::from_heights(vec![]).unwrap());
        let factor = k.factorize().unwrap();
        assert!(factor.solve_vec(&[]).unwrap().is_empty());
    }
}
