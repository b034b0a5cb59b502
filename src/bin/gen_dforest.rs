use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use sparse_forest::data::{read_sparse_file, Dataset};
use sparse_forest::forests::classifier::RandomForestClassifier;
use sparse_forest::metrics::confusion::ClassificationMetrics;

#[derive(Parser)]
#[command(name = "gen-dforest")]
#[command(about = "Grow a forest of decision trees from sparse labeled data and print it as C predicates")]
#[command(version)]
struct Cli {
    /// Input file, one `label index:value ...` record per line
    file: PathBuf,

    /// Number of trees in the forest
    #[arg(long, short = 'n', default_value_t = 10)]
    trees: usize,

    /// RNG seed for sub-sampling and tie-breaks (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the generated source here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Number of threads for growing trees (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,

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

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    info!(file = %cli.file.display(), "reading input");
    let dataset: Dataset<f64> = read_sparse_file(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    debug!("{:?}", dataset);

    let mut forest = RandomForestClassifier::with_params(Some(cli.trees))?;
    forest
        .fit(&dataset, cli.seed)
        .context("forest construction failed")?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let predictions = forest.predict_dataset(&dataset, &mut rng)?;
    let accuracy = forest.accuracy(&dataset.labels(), &predictions)?;
    info!(accuracy, "training accuracy");

    let source = forest.generate_source()?;
    match &cli.output {
        Some(path) => std::fs::write(path, source)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(source.as_bytes())
            .context("failed to write to stdout")?,
    }

    Ok(())
}
