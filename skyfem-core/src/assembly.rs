//! Skyline assembly of the global stiffness matrix.
//!
//! Element stiffness matrices are independent of each other and may be
//! computed in parallel with Rayon. The scatter into the packed store is a
//! single sequential pass in element order, so the assembled values do not
//! depend on the thread count.

use crate::element::{compact_index, CompactStiffness};
use crate::equations::LocationMap;
use crate::error::Result;
use crate::mesh::Model;
use crate::skyline::{SkylineMatrix, SkylineProfile};
use rayon::prelude::*;

/// Assembly options.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyOptions {
    /// Compute element stiffness matrices on the Rayon pool.
    pub parallel: bool,
    /// Elements computed per parallel batch before their scatter.
    ///
    /// Only one batch of compact stiffness arrays is alive at a time.
    pub chunk_size: usize,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 1024,
        }
    }
}

/// Add one element's compact stiffness into the global store.
///
/// Pairs involving a constrained DOF are skipped. Two local DOFs mapped to
/// the same equation (an element repeating a node) both land on its diagonal,
/// so their off-diagonal term counts twice. A pair outside the profile means
/// the profile was sized from different location maps and fails with
/// [`crate::Error::ProfileViolation`].
pub fn scatter(
    matrix: &mut SkylineMatrix,
    location: &LocationMap,
    stiffness: &CompactStiffness,
) -> Result<()> {
    let lm = location.as_slice();
    let values = stiffness.as_slice();
    for (j, column) in lm.iter().enumerate() {
        let Some(column) = *column else { continue };
        for (i, row) in lm.iter().enumerate().take(j + 1) {
            let Some(row) = *row else { continue };
            let value = values[compact_index(i, j)];
            if i < j && row == column {
                matrix.add(row, column, 2.0 * value)?;
            } else {
                matrix.add(row, column, value)?;
            }
        }
    }
    Ok(())
}

/// Size the profile, allocate the store and assemble every element of `model`.
///
/// Equations must already be numbered. Each element stiffness is scattered
/// and dropped in element order; in parallel mode elements are computed in
/// batches of [`AssemblyOptions::chunk_size`].
pub fn assemble_stiffness(model: &Model, options: &AssemblyOptions) -> Result<SkylineMatrix> {
    let maps = model.location_maps()?;
    let neq = model.neq().unwrap_or(0);
    let profile = SkylineProfile::from_location_maps(neq, &maps);
    let mut matrix = SkylineMatrix::new(profile);

    let elements: Vec<_> = model.elements().collect();
    let nodes = model.nodes();
    if options.parallel {
        let chunk = options.chunk_size.max(1);
        for (views, lms) in elements.chunks(chunk).zip(maps.chunks(chunk)) {
            let stiffness = views
                .par_iter()
                .map(|e| e.compact_stiffness(nodes))
                .collect::<Result<Vec<_>>>()?;
            for (lm, ke) in lms.iter().zip(&stiffness) {
                scatter(&mut matrix, lm, ke)?;
            }
        }
    } else {
        for (element, lm) in elements.iter().zip(&maps) {
            let ke = element.compact_stiffness(nodes)?;
            scatter(&mut matrix, lm, &ke)?;
        }
    }

    Ok(matrix)
}
