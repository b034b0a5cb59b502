use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use sparse_forest::data::{read_sparse_file, Dataset};
use sparse_forest::metrics::confusion::ClassificationMetrics;
use sparse_forest::trees::classifier::DecisionTreeClassifier;

#[derive(Parser)]
#[command(name = "gen-dtree")]
#[command(about = "Grow one decision tree from sparse labeled data and print it as a C predicate")]
#[command(version)]
struct Cli {
    /// Input file, one `label index:value ...` record per line
    file: PathBuf,

    /// Impurity at or below which a subset becomes a leaf, in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    epsilon: f64,

    /// RNG seed for leaf tie-breaks (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the generated source here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!(file = %cli.file.display(), "reading input");
    let dataset: Dataset<f64> = read_sparse_file(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    debug!("{:?}", dataset);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut tree = DecisionTreeClassifier::with_params(Some(cli.epsilon))?;
    tree.fit(&dataset, &mut rng)
        .context("tree construction failed")?;

    let predictions = tree.predict_dataset(&dataset)?;
    let accuracy = tree.accuracy(&dataset.labels(), &predictions)?;
    info!(accuracy, "training accuracy");

    let source = tree.generate_source()?;
    match &cli.output {
        Some(path) => std::fs::write(path, source)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(source.as_bytes())
            .context("failed to write to stdout")?,
    }

    Ok(())
}
