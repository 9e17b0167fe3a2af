use crate::solver::DEFAULT_PIVOT_TOLERANCE;
use derive_builder::Builder;

/// Analysis settings.
///
/// ```
/// use skyfem_core::AnalysisSettingsBuilder;
///
/// let settings = AnalysisSettingsBuilder::default()
///     .parallel(false)
///     .pivot_tolerance(1e-10)
///     .build()
///     .unwrap();
/// assert!(settings.recover_stresses);
/// ```
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct AnalysisSettings {
    ///relative pivot tolerance for the LDLᵀ factorization
    #[builder(default = "DEFAULT_PIVOT_TOLERANCE")]
    pub pivot_tolerance: f64,

    ///compute element stiffness and stresses on the Rayon pool
    #[builder(default = "true")]
    pub parallel: bool,

    ///recover element stresses after each load case
    #[builder(default = "true")]
    pub recover_stresses: bool,

    ///keep a snapshot of the assembled matrix before factorization
    #[builder(default = "false")]
    pub capture_profile: bool,

    ///print stage summaries to stdout
    #[builder(default = "false")]
    pub verbose: bool,
}

impl Default for AnalysisSettings {
    fn default() -> AnalysisSettings {
        AnalysisSettingsBuilder::default().build().unwrap()
    }
}

impl AnalysisSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(tol) = self.pivot_tolerance {
            if !(0.0..1.0).contains(&tol) {
                return Err(format!(
                    "pivot tolerance must lie in [0, 1), got {}",
                    tol
                ));
            }
        }
        Ok(())
    }
}
