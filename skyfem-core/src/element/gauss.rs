//! Gauss-Legendre quadrature on [-1, 1] and its tensor products.
//!
//! ```
//! use skyfem_core::element::gauss::{gauss_1d, gauss_hex};
//!
//! // ∫ x² dx over [-1, 1] with the 2-point rule
//! let integral: f64 = gauss_1d(2).iter().map(|&(x, w)| x * x * w).sum();
//! assert!((integral - 2.0 / 3.0).abs() < 1e-14);
//!
//! let volume: f64 = gauss_hex(2).iter().map(|gp| gp.weight).sum();
//! assert!((volume - 8.0).abs() < 1e-14);
//! ```

/// Integration point in natural coordinates (ξ, η, ζ) with its weight.
///
/// Unused coordinates are zero.
#[derive(Debug, Clone, Copy)]
pub struct GaussPoint {
    pub coords: [f64; 3],
    pub weight: f64,
}

impl GaussPoint {
    pub fn new(coords: [f64; 3], weight: f64) -> Self {
        Self { coords, weight }
    }

    #[inline]
    pub fn xi(&self) -> f64 {
        self.coords[0]
    }

    #[inline]
    pub fn eta(&self) -> f64 {
        self.coords[1]
    }

    #[inline]
    pub fn zeta(&self) -> f64 {
        self.coords[2]
    }
}

/// 1D rule as (point, weight) pairs, exact for degree 2n - 1.
///
/// # Panics
///
/// Panics if `n` is not in 1..=3. Element code only asks for fixed orders.
pub fn gauss_1d(n: usize) -> Vec<(f64, f64)> {
    match n {
        1 => vec![(0.0, 2.0)],
        2 => {
            let p = 3.0_f64.sqrt().recip();
            vec![(-p, 1.0), (p, 1.0)]
        }
        3 => {
            let p = 0.6_f64.sqrt();
            vec![(-p, 5.0 / 9.0), (0.0, 8.0 / 9.0), (p, 5.0 / 9.0)]
        }
        _ => panic!("gauss_1d: n must be 1, 2, or 3, got {}", n),
    }
}

/// n×n rule on the reference square, ξ varying slowest.
pub fn gauss_quad(n: usize) -> Vec<GaussPoint> {
    let rule = gauss_1d(n);
    rule.iter()
        .flat_map(|&(xi, wx)| {
            rule.iter()
                .map(move |&(eta, wy)| GaussPoint::new([xi, eta, 0.0], wx * wy))
        })
        .collect()
}

/// n×n×n rule on the reference cube, ξ varying slowest.
pub fn gauss_hex(n: usize) -> Vec<GaussPoint> {
    let rule = gauss_1d(n);
    let mut points = Vec::with_capacity(n * n * n);
    for &(xi, wx) in &rule {
        for &(eta, wy) in &rule {
            for &(zeta, wz) in &rule {
                points.push(GaussPoint::new([xi, eta, zeta], wx * wy * wz));
            }
        }
    }
    points
}
