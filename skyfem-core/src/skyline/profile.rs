//! Column heights and diagonal addresses of the skyline profile.

use crate::equations::LocationMap;
use crate::error::{Error, Result};

/// Accumulates column heights from element location maps.
///
/// For every element the first (smallest) equation it touches bounds how far
/// above the diagonal any of its columns can reach.
#[derive(Debug, Clone)]
pub struct ProfileSizer {
    heights: Vec<usize>,
}

impl ProfileSizer {
    /// Start sizing a system of `neq` equations, all heights zero.
    pub fn new(neq: usize) -> Self {
        Self {
            heights: vec![0; neq],
        }
    }

    /// Raise column heights to cover one element.
    ///
    /// Elements without free DOFs contribute nothing.
    pub fn add_element(&mut self, location: &LocationMap) {
        let Some(first_row) = location.first_equation() else {
            return;
        };
        for &column in location.as_slice().iter().flatten() {
            let height = column - first_row;
            let slot = &mut self.heights[column - 1];
            if *slot < height {
                *slot = height;
            }
        }
    }

    /// Compute diagonal addresses and freeze the profile.
    pub fn finish(self) -> SkylineProfile {
        SkylineProfile::from_valid_heights(self.heights)
    }
}

/// Frozen skyline layout: column heights plus diagonal address index.
///
/// Addresses are 0-based internally: `addresses[c]` is the position of the
/// diagonal of column `c + 1` in the packed array, and `addresses[neq]` is
/// the packed length NWK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkylineProfile {
    heights: Vec<usize>,
    addresses: Vec<usize>,
}

impl SkylineProfile {
    /// Size the profile from all element location maps.
    pub fn from_location_maps<'a, I>(neq: usize, maps: I) -> Self
    where
        I: IntoIterator<Item = &'a LocationMap>,
    {
        let mut sizer = ProfileSizer::new(neq);
        for lm in maps {
            sizer.add_element(lm);
        }
        sizer.finish()
    }

    /// Build a profile from explicit column heights.
    ///
    /// Column `c` (1-based) cannot reach above row 1, so its height must not
    /// exceed `c - 1`.
    pub fn from_heights(heights: Vec<usize>) -> Result<Self> {
        if let Some((c, &h)) = heights.iter().enumerate().find(|&(c, &h)| h > c) {
            return Err(Error::ProfileViolation {
                row: (c + 1).saturating_sub(h),
                column: c + 1,
                height: h,
            });
        }
        Ok(Self::from_valid_heights(heights))
    }

    fn from_valid_heights(heights: Vec<usize>) -> Self {
        let mut addresses = Vec::with_capacity(heights.len() + 1);
        let mut next = 0;
        addresses.push(next);
        for &h in &heights {
            next += h + 1;
            addresses.push(next);
        }
        Self { heights, addresses }
    }

    /// Number of equations (NEQ).
    #[inline]
    pub fn neq(&self) -> usize {
        self.heights.len()
    }

    /// Number of stored entries (NWK).
    #[inline]
    pub fn nwk(&self) -> usize {
        self.addresses[self.heights.len()]
    }

    /// Column heights, indexed by `column - 1`.
    pub fn heights(&self) -> &[usize] {
        &self.heights
    }

    /// Height of 1-based column `column`.
    #[inline]
    pub fn height(&self, column: usize) -> usize {
        self.heights[column - 1]
    }

    /// First (topmost) stored row of 1-based column `column`.
    #[inline]
    pub fn first_row(&self, column: usize) -> usize {
        column - self.heights[column - 1]
    }

    /// 0-based packed position of the diagonal of 1-based column `column`.
    #[inline]
    pub fn diagonal(&self, column: usize) -> usize {
        self.addresses[column - 1]
    }

    /// 0-based diagonal addresses, NEQ + 1 entries.
    pub fn addresses(&self) -> &[usize] {
        &self.addresses
    }

    /// 1-based diagonal address table (first entry 1), as printed in reports.
    pub fn addresses_one_based(&self) -> Vec<usize> {
        self.addresses.iter().map(|a| a + 1).collect()
    }

    /// Maximum column height (MK).
    pub fn max_height(&self) -> usize {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    /// Mean half bandwidth, NWK / NEQ.
    pub fn mean_half_bandwidth(&self) -> usize {
        if self.neq() == 0 {
            0
        } else {
            self.nwk() / self.neq()
        }
    }

    /// Whether entry (row, column), row ≤ column, lies under the skyline.
    #[inline]
    pub fn contains(&self, row: usize, column: usize) -> bool {
        row <= column && column - row <= self.heights[column - 1]
    }
}
