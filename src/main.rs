use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use category_community_analyzer::{compare, storage, Algorithm, Config, Filters, Selections, Session};

#[derive(Parser, Debug)]
#[clap(
    name = "category-community-analyzer",
    about = "Community detection over category/page relation graphs"
)]
struct Cli {
    /// Path to input relation file (`name kind relation name kind` per line)
    #[clap(long)]
    input: PathBuf,

    /// Output directory for results
    #[clap(long, default_value = "community_results")]
    output_dir: PathBuf,

    /// JSON configuration file; flags below override it
    #[clap(long)]
    config: Option<PathBuf>,

    /// Community detection algorithm
    #[clap(long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Algorithm control parameter (0-100)
    #[clap(short, long)]
    p: Option<u8>,

    /// Similarity priorities, e.g. "subcategories=1,pages=2"
    #[clap(long)]
    filters: Option<String>,

    /// Comma-separated category names to restrict the projection to
    #[clap(long)]
    select: Option<String>,

    /// Minimum community size
    #[clap(long)]
    min_community_size: Option<usize>,

    /// Write the loaded graph back out in text form
    #[clap(long)]
    dump: Option<PathBuf>,

    /// Compare against a previously saved partition.json
    #[clap(long)]
    compare: Option<PathBuf>,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn load_config(args: &Cli) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(p) = args.p {
        config.p = p;
    }
    if let Some(filters) = &args.filters {
        config.filters = filters.parse::<Filters>()?;
    }
    if let Some(size) = args.min_community_size {
        config.min_community_size = size;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = load_config(&args)?;
    log::info!("Starting community analysis");
    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output_dir.display());

    // 1. Load data
    let mut session = Session::from_config(&config);
    session
        .load_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    log::info!(
        "Loaded {} categories, {} pages and {} arches",
        session.store().category_count(),
        session.store().page_count(),
        session.store().edge_count()
    );

    if let Some(path) = &args.dump {
        session.save_file(path)?;
        log::info!("Dumped graph to {}", path.display());
    }

    if let Some(names) = &args.select {
        let selections = Selections::from_names(
            session.store(),
            names.split(',').map(str::trim).filter(|n| !n.is_empty()),
        );
        session.set_selections(selections);
    }

    // 2. Build the projection
    session.generate();

    // 3. Detect communities
    session.run()?;
    log::info!("Session is {}", session.stage());

    // 4. Save results
    if let (Some(result), Some(projection)) = (session.result(), session.projection()) {
        storage::save_results(result, session.store(), projection, &args.output_dir)?;

        // 5. Compare with an earlier run if requested
        if let Some(path) = &args.compare {
            let previous = storage::load_partition(path)?;
            let report = compare(result, &previous);
            for line in report.to_lines() {
                log::info!("{}", line);
            }
            log::info!(
                "Mean Jaccard overlap {:.3}, identical: {}",
                report.mean_jaccard(),
                report.identical
            );
            let out = args.output_dir.join("comparison.json");
            std::fs::write(&out, serde_json::to_string_pretty(&report)?)
                .with_context(|| format!("writing {}", out.display()))?;
        }
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir.display());

    Ok(())
}
