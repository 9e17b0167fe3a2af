//! Skyline (variable-bandwidth profile) storage of the global stiffness matrix.
//!
//! Only the upper triangle is kept. Column `j` stores its entries from the
//! diagonal upward to the highest row any element couples into it; the
//! distance from the diagonal to that row is the column height. All columns
//! are packed one after another into a single array:
//!
//! ```text
//!   column:     1      2          3
//!   packed:  [ k11 | k22 k12 | k33 k23 k13 ]
//!   address:   0     1         3
//! ```
//!
//! # Submodules
//!
//! - [`profile`] - column heights and diagonal addresses
//! - [`matrix`] - the packed matrix and its element accessors

pub mod matrix;
pub mod profile;

pub use matrix::{ProfileSnapshot, SkylineMatrix};
pub use profile::{ProfileSizer, SkylineProfile};
