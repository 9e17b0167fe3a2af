//! Static analysis driver.
//!
//! Runs the stages in order: equation numbering, profile sizing and
//! assembly, LDLᵀ factorization, one forward/back substitution per load
//! case, and stress recovery. The first failing stage aborts the analysis.

use crate::assembly::{assemble_stiffness, AssemblyOptions};
use crate::error::{Error, Result};
use crate::load::force_vector;
use crate::mesh::Model;
use crate::node::DofNumber;
use crate::settings::AnalysisSettings;
use crate::skyline::{ProfileSnapshot, SkylineMatrix, SkylineProfile};
use crate::stress::{recover_stresses, StressField};
use crate::types::DOFS_PER_NODE;
use std::time::{Duration, Instant};

/// Size of the assembled system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemSummary {
    /// Number of equations.
    pub neq: usize,
    /// Number of stored matrix entries.
    pub nwk: usize,
    /// Maximum column height.
    pub mk: usize,
    /// NWK / NEQ.
    pub mean_half_bandwidth: usize,
}

impl SystemSummary {
    fn from_profile(profile: &SkylineProfile) -> Self {
        Self {
            neq: profile.neq(),
            nwk: profile.nwk(),
            mk: profile.max_height(),
            mean_half_bandwidth: profile.mean_half_bandwidth(),
        }
    }
}

/// Wall-clock time spent in each phase.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeLog {
    /// Reading the deck. Filled in by the caller that did the reading.
    pub input: Duration,
    pub stiffness: Duration,
    /// Factorization plus every load case substitution.
    pub solution: Duration,
    pub stress: Duration,
}

impl TimeLog {
    pub fn total(&self) -> Duration {
        self.input + self.stiffness + self.solution + self.stress
    }
}

/// Result of one load case.
#[derive(Debug, Clone)]
pub struct LoadCaseResult {
    /// 1-based load case number.
    pub case: usize,
    /// Displacements indexed by equation - 1.
    pub displacements: Vec<f64>,
    pub stresses: Option<StressField>,
}

impl LoadCaseResult {
    /// Displacements per node, six slots each, zero where constrained.
    pub fn nodal_displacements(&self, model: &Model) -> Vec<[f64; DOFS_PER_NODE]> {
        nodal_displacements(model, &self.displacements)
    }
}

/// Complete result of a static analysis.
#[derive(Debug, Clone)]
pub struct Solution {
    pub summary: SystemSummary,
    pub cases: Vec<LoadCaseResult>,
    pub timings: TimeLog,
    /// Assembled matrix before factorization, when requested.
    pub profile: Option<ProfileSnapshot>,
}

impl Solution {
    /// Result of load case `case` (1-based).
    pub fn case(&self, case: usize) -> Option<&LoadCaseResult> {
        self.cases.get(case.checked_sub(1)?)
    }
}

/// Expand an equation-indexed vector into per-node slots.
pub fn nodal_displacements(model: &Model, displacements: &[f64]) -> Vec<[f64; DOFS_PER_NODE]> {
    model
        .nodes()
        .iter()
        .map(|node| {
            let mut values = [0.0; DOFS_PER_NODE];
            for (value, dof) in values.iter_mut().zip(&node.dofs) {
                if let DofNumber::Equation(eq) = *dof {
                    *value = displacements.get(eq - 1).copied().unwrap_or(0.0);
                }
            }
            values
        })
        .collect()
}

/// Global stiffness of a model, assembled but not yet factorized.
#[derive(Debug, Clone)]
pub struct AssembledSystem {
    pub stiffness: SkylineMatrix,
    pub summary: SystemSummary,
    /// Time spent numbering and assembling.
    pub elapsed: Duration,
}

/// Static linear analysis of a [`Model`].
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    settings: AnalysisSettings,
}

impl Analysis {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Number equations and size the profile without assembling anything.
    ///
    /// This is the data check mode of the deck (MODEX = 0).
    pub fn check(&self, model: &mut Model) -> Result<SystemSummary> {
        let neq = model.number_equations();
        let maps = model.location_maps()?;
        let profile = SkylineProfile::from_location_maps(neq, &maps);
        let summary = SystemSummary::from_profile(&profile);
        if self.settings.verbose {
            print_summary(model, &summary);
        }
        Ok(summary)
    }

    /// Number equations, size the profile and assemble the global stiffness.
    ///
    /// The returned system can be inspected (or dumped) before [`Analysis::solve`]
    /// factorizes it.
    pub fn assemble(&self, model: &mut Model) -> Result<AssembledSystem> {
        let timer = Instant::now();
        model.number_equations();
        let options = AssemblyOptions {
            parallel: self.settings.parallel,
            ..AssemblyOptions::default()
        };
        let stiffness = assemble_stiffness(model, &options)?;
        let summary = SystemSummary::from_profile(stiffness.profile());
        if self.settings.verbose {
            print_summary(model, &summary);
        }
        Ok(AssembledSystem {
            stiffness,
            summary,
            elapsed: timer.elapsed(),
        })
    }

    /// Factorize an assembled system and solve every load case of `model`.
    pub fn solve(&self, model: &Model, system: AssembledSystem) -> Result<Solution> {
        let settings = &self.settings;
        let AssembledSystem {
            stiffness,
            summary,
            elapsed,
        } = system;
        let mut timings = TimeLog {
            stiffness: elapsed,
            ..TimeLog::default()
        };
        let profile = settings.capture_profile.then(|| stiffness.snapshot());

        let timer = Instant::now();
        let factors = stiffness.factorize_with_tolerance(settings.pivot_tolerance)?;
        let mut cases = Vec::with_capacity(model.load_cases().len());
        for case in model.load_cases() {
            let mut displacements = force_vector(model, case)?;
            factors.solve(&mut displacements)?;
            if displacements.iter().any(|u| !u.is_finite()) {
                return Err(Error::Solver(format!(
                    "load case {} produced non-finite displacements",
                    case.number
                )));
            }
            cases.push(LoadCaseResult {
                case: case.number,
                displacements,
                stresses: None,
            });
        }
        timings.solution = timer.elapsed();

        if settings.recover_stresses {
            let timer = Instant::now();
            for result in &mut cases {
                result.stresses = Some(recover_stresses(
                    model,
                    &result.displacements,
                    settings.parallel,
                )?);
            }
            timings.stress = timer.elapsed();
        }

        if settings.verbose {
            print_timings(&timings);
        }

        Ok(Solution {
            summary,
            cases,
            timings,
            profile,
        })
    }

    /// Run the full analysis over every load case of `model`.
    pub fn run(&self, model: &mut Model) -> Result<Solution> {
        let system = self.assemble(model)?;
        self.solve(model, system)
    }
}

fn print_summary(model: &Model, summary: &SystemSummary) {
    println!("-------------------------------------------------------------");
    println!("problem: {}", model.title);
    println!(
        "  nodes = {}, element groups = {}, elements = {}, load cases = {}",
        model.n_nodes(),
        model.groups().len(),
        model.n_elements(),
        model.load_cases().len()
    );
    println!(
        "  NEQ = {}, NWK = {}, MK = {}, mean half bandwidth = {}",
        summary.neq, summary.nwk, summary.mk, summary.mean_half_bandwidth
    );
}

fn print_timings(timings: &TimeLog) {
    println!("  stiffness : {:?}", timings.stiffness);
    println!("  solution  : {:?}", timings.solution);
    println!("  stress    : {:?}", timings.stress);
    println!("-------------------------------------------------------------");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::load::{LoadCase, NodalLoad};
    use crate::material::Material;
    use crate::node::{Node, Restraint};
    use crate::settings::AnalysisSettingsBuilder;
    use crate::types::Point3;
    use approx::assert_relative_eq;

    /// Bar with EA/L = 1000, fixed at node 1, axial loads on node 2.
    fn patch_model(loads: &[f64]) -> Model {
        let mut model = Model::new("patch");
        model
            .add_node(Node::new(1, Point3::zeros(), [Restraint::Fixed; 3]))
            .unwrap();
        model
            .add_node(Node::new(
                2,
                Point3::new(1.0, 0.0, 0.0),
                [Restraint::Free, Restraint::Fixed, Restraint::Fixed],
            ))
            .unwrap();
        let g = model.add_group(
            ElementKind::from_code(1).unwrap(),
            vec![Material::bar(1000.0, 1.0).unwrap()],
        );
        model.add_element(g, 1, &[1, 2], 1).unwrap();
        for (i, &f) in loads.iter().enumerate() {
            model
                .add_load_case(LoadCase::new(i + 1, vec![NodalLoad::new(2, 1, f)]))
                .unwrap();
        }
        model
    }

    #[test]
    fn test_patch_displacement() {
        let mut model = patch_model(&[10.0]);
        let solution = Analysis::default().run(&mut model).unwrap();
        assert_eq!(solution.summary.neq, 1);
        assert_eq!(solution.summary.nwk, 1);
        let case = solution.case(1).unwrap();
        assert_relative_eq!(case.displacements[0], 0.01, epsilon = 1e-14);

        let nodal = case.nodal_displacements(&model);
        assert_eq!(nodal[0], [0.0; 6]);
        assert_relative_eq!(nodal[1][0], 0.01, epsilon = 1e-14);

        let bar = case.stresses.as_ref().unwrap().element(1, 1).unwrap();
        assert_relative_eq!(bar.axial_force.unwrap(), 10.0, epsilon = 1e-10);
    }

    #[test]
    fn test_multiple_load_cases_reuse_factors() {
        let mut model = patch_model(&[10.0, -5.0, 0.0]);
        let solution = Analysis::default().run(&mut model).unwrap();
        let u: Vec<f64> = solution.cases.iter().map(|c| c.displacements[0]).collect();
        assert_relative_eq!(u[0], 0.01, epsilon = 1e-14);
        assert_relative_eq!(u[1], -0.005, epsilon = 1e-14);
        assert_eq!(u[2], 0.0);
    }

    #[test]
    fn test_stress_recovery_disabled() {
        let mut model = patch_model(&[1.0]);
        let settings = AnalysisSettingsBuilder::default()
            .recover_stresses(false)
            .build()
            .unwrap();
        let solution = Analysis::new(settings).run(&mut model).unwrap();
        assert!(solution.cases[0].stresses.is_none());
        assert!(solution.profile.is_none());
    }

    #[test]
    fn test_profile_capture() {
        let mut model = patch_model(&[1.0]);
        let settings = AnalysisSettingsBuilder::default()
            .capture_profile(true)
            .build()
            .unwrap();
        let solution = Analysis::new(settings).run(&mut model).unwrap();
        let snapshot = solution.profile.unwrap();
        assert_eq!(snapshot.diagonal_addresses, vec![1, 2]);
        assert_relative_eq!(snapshot.values[0], 1000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unrestrained_node_is_singular() {
        let mut model = patch_model(&[1.0]);
        model.add_node(Node::free(3, Point3::new(5.0, 0.0, 0.0))).unwrap();
        let err = Analysis::default().run(&mut model).unwrap_err();
        assert!(matches!(err, Error::SingularMatrix { equation: 2, .. }));
    }

    #[test]
    fn test_assembled_system_survives_singular_solve() {
        let mut model = patch_model(&[1.0]);
        model.add_node(Node::free(3, Point3::new(5.0, 0.0, 0.0))).unwrap();
        let analysis = Analysis::default();
        let system = analysis.assemble(&mut model).unwrap();
        let snapshot = system.stiffness.snapshot();
        assert_eq!(snapshot.neq, 4);
        assert_relative_eq!(snapshot.values[0], 1000.0, epsilon = 1e-12);
        assert!(matches!(
            analysis.solve(&model, system),
            Err(Error::SingularMatrix { equation: 2, .. })
        ));
    }

    #[test]
    fn test_data_check_sizes_without_solving() {
        let mut model = patch_model(&[1.0]);
        let summary = Analysis::default().check(&mut model).unwrap();
        assert_eq!(
            summary,
            SystemSummary {
                neq: 1,
                nwk: 1,
                mk: 0,
                mean_half_bandwidth: 1,
            }
        );
    }
}
