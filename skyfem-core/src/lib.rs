//! skyfem core - static linear-elastic finite element analysis
//!
//! Small-deformation structural analysis with skyline storage:
//! - Element library: 3D truss, plane stress quadrilateral and triangle,
//!   trilinear hexahedron and 3D frame beam
//! - Equation numbering from nodal boundary codes
//! - Profile (skyline) sizing and column-packed storage
//! - Parallel element stiffness computation using Rayon
//! - In-place LDLᵀ factorization and per-load-case substitution
//! - Stress recovery, `.dat` deck reader and fixed-width report writer
//!
//! # Architecture
//!
//! The solver is designed around these core abstractions:
//!
//! - [`Element`] trait: element stiffness and stress recovery, dispatched
//!   over the closed [`ElementKind`] set
//! - [`Model`]: nodes, element groups with their material sets, load cases
//! - [`SkylineProfile`] and [`SkylineMatrix`]: the packed global matrix
//! - [`LdltFactorization`]: the factorized matrix, reused for every load case
//! - [`Analysis`]: the staged driver configured by [`AnalysisSettings`]
//!
//! ```
//! use skyfem_core::{Analysis, ElementKind, LoadCase, Material, Model, NodalLoad, Node, Point3, Restraint};
//!
//! let mut model = Model::new("bar");
//! model.add_node(Node::new(1, Point3::zeros(), [Restraint::Fixed; 3])).unwrap();
//! model
//!     .add_node(Node::new(
//!         2,
//!         Point3::new(1.0, 0.0, 0.0),
//!         [Restraint::Free, Restraint::Fixed, Restraint::Fixed],
//!     ))
//!     .unwrap();
//! let group = model.add_group(
//!     ElementKind::from_code(1).unwrap(),
//!     vec![Material::bar(1000.0, 1.0).unwrap()],
//! );
//! model.add_element(group, 1, &[1, 2], 1).unwrap();
//! model
//!     .add_load_case(LoadCase::new(1, vec![NodalLoad::new(2, 1, 10.0)]))
//!     .unwrap();
//!
//! let solution = Analysis::default().run(&mut model).unwrap();
//! assert!((solution.cases[0].displacements[0] - 0.01).abs() < 1e-12);
//! ```

pub mod types;
pub mod node;
pub mod equations;
pub mod skyline;
pub mod solver;
pub mod element;
pub mod material;
pub mod mesh;
pub mod load;
pub mod assembly;
pub mod stress;
pub mod settings;
pub mod analysis;
pub mod input;
pub mod report;
pub mod error;

pub use types::{Point3, StressTensor, Vec3};
pub use node::{DofNumber, Node, Restraint};
pub use equations::LocationMap;
pub use skyline::{ProfileSnapshot, SkylineMatrix, SkylineProfile};
pub use solver::{LdltFactorization, DEFAULT_PIVOT_TOLERANCE};
pub use element::{Element, ElementKind};
pub use material::{BeamSection, Material, Section};
pub use mesh::Model;
pub use load::{LoadCase, NodalLoad};
pub use stress::StressField;
pub use settings::{AnalysisSettings, AnalysisSettingsBuilder};
pub use analysis::{Analysis, AssembledSystem, Solution, SystemSummary, TimeLog};
pub use input::{parse_deck, read_deck, Deck, SolutionMode};
pub use report::write_report;
pub use error::{Error, Result};
