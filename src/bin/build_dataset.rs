/// build_dataset: walk a CHB-MIT style cohort directory and write the
/// seizure / non-seizure feature vectors to a safetensors file.
///
/// Output keys:
///   seizure         [N, D]  f32
///   non_seizure     [M, D]  f32
///   n_seizure       [1]     i32
///   n_non_seizure   [1]     i32
/// with D = 15 (all bands) or 6 (--theta-alpha).
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use ictal::{io::write_dataset, logging, DatasetBuilder, DatasetConfig, DirectoryBackend, FeatureMode};

#[derive(Parser, Debug)]
#[command(name = "build_dataset", about = "Seizure / non-seizure feature dataset builder")]
struct Args {
    /// Cohort root containing p_NN/ subject directories.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Output safetensors path.
    #[arg(long)]
    output: PathBuf,

    /// Optional TOML configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// First subject id (inclusive).
    #[arg(long)]
    first: Option<u32>,

    /// Last subject id (inclusive).
    #[arg(long)]
    last: Option<u32>,

    /// Use only the Theta and Alpha bands (6 features instead of 15).
    #[arg(long)]
    theta_alpha: bool,

    /// Seed for the non-seizure window draws.
    #[arg(long)]
    seed: Option<u64>,

    /// Process subjects one after another.
    #[arg(long)]
    sequential: bool,

    /// Debug-level logging when RUST_LOG is unset.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut cfg = match &args.config {
        Some(path) => DatasetConfig::from_toml_file(path)?,
        None => DatasetConfig::default(),
    };
    if let Some(root) = args.root {
        cfg.layout.root = root;
    }
    if let Some(first) = args.first {
        cfg.first_subject = first;
    }
    if let Some(last) = args.last {
        cfg.last_subject = last;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if args.theta_alpha {
        cfg.mode = FeatureMode::ThetaAlpha;
    }
    if args.sequential {
        cfg.parallel = false;
    }
    cfg.validate()?;

    info!(root = %cfg.layout.root.display(), "cohort");
    let backend = DirectoryBackend::new(cfg.layout.clone(), cfg.filter.clone()).with_bands(cfg.mode.bands());
    let dataset = DatasetBuilder::new(cfg, backend).build();

    for failure in &dataset.report.failed {
        warn!(subject = failure.subject.0, "subject dropped: {}", failure.message);
    }
    let report = &dataset.report;
    info!(
        parse = report.count("parse"),
        window_infeasible = report.count("window_infeasible"),
        backend = report.count("backend"),
        missing_file = report.count("missing_file"),
        "skips by kind"
    );

    write_dataset(&dataset, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        seizure = dataset.seizure.len(),
        non_seizure = dataset.non_seizure.len(),
        output = %args.output.display(),
        "written"
    );
    Ok(())
}
