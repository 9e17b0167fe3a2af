use skyfem_core::{
    read_deck, write_report, Analysis, AnalysisSettingsBuilder, SolutionMode, TimeLog,
};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "skyfem",
    about = "Static linear-elastic analysis of a .dat input deck"
)]
struct Options {
    /// Input deck, with or without the .dat extension
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Report file (default: input stem with .out)
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Write the assembled skyline profile and values as JSON
    #[structopt(long, parse(from_os_str))]
    dump_profile: Option<PathBuf>,

    /// Compute element matrices on the calling thread only
    #[structopt(long)]
    serial: bool,

    /// Skip element stress recovery
    #[structopt(long)]
    no_stress: bool,

    /// Relative pivot tolerance of the factorization
    #[structopt(long)]
    pivot_tolerance: Option<f64>,

    /// Print stage summaries
    #[structopt(short, long)]
    verbose: bool,
}

/// Input deck and default report path for a command line argument.
fn deck_paths(input: &Path) -> (PathBuf, PathBuf) {
    let text = input.to_string_lossy();
    let stem = text.strip_suffix(".dat").unwrap_or(&*text);
    (
        PathBuf::from(format!("{}.dat", stem)),
        PathBuf::from(format!("{}.out", stem)),
    )
}

fn run(options: Options) -> Result<(), Box<dyn Error>> {
    let (deck_path, default_output) = deck_paths(&options.input);
    let output = options.output.unwrap_or(default_output);

    let mut builder = AnalysisSettingsBuilder::default();
    builder
        .parallel(!options.serial)
        .recover_stresses(!options.no_stress)
        .verbose(options.verbose);
    if let Some(tolerance) = options.pivot_tolerance {
        builder.pivot_tolerance(tolerance);
    }
    let settings = builder.build().map_err(|e| e.to_string())?;
    let analysis = Analysis::new(settings);

    let timer = Instant::now();
    let mut deck = read_deck(&deck_path)?;
    let input_time = timer.elapsed();

    // The report is only created once the analysis has succeeded
    match deck.mode {
        SolutionMode::DataCheck => {
            if options.dump_profile.is_some() {
                eprintln!(
                    "warning: --dump-profile ignored, data check mode (MODEX = 0) assembles nothing"
                );
            }
            let summary = analysis.check(&mut deck.model)?;
            let timings = TimeLog {
                input: input_time,
                ..TimeLog::default()
            };
            let report = BufWriter::new(File::create(&output)?);
            write_report(report, &deck.model, deck.mode, &summary, None, &timings)?;
        }
        SolutionMode::Execute => {
            let system = analysis.assemble(&mut deck.model)?;
            if let Some(path) = &options.dump_profile {
                let snapshot = system.stiffness.snapshot();
                serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &snapshot)?;
            }
            let mut solution = analysis.solve(&deck.model, system)?;
            solution.timings.input = input_time;
            let report = BufWriter::new(File::create(&output)?);
            write_report(
                report,
                &deck.model,
                deck.mode,
                &solution.summary,
                Some(&solution),
                &solution.timings,
            )?;
        }
    }

    if options.verbose {
        println!("report written to {}", output.display());
    }
    Ok(())
}

fn main() {
    let options = Options::from_args();
    if let Err(error) = run(options) {
        eprintln!("*** Error *** {}", error);
        std::process::exit(1);
    }
}
