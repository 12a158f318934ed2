use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ratingscope::{DataSources, ViewerConfig};

/// Animated rating distributions per region and federation.
#[derive(Debug, Parser)]
#[command(name = "ratingscope", version, about)]
struct Args {
    /// Ratings table with `month,fed,rating` columns.
    #[arg(long, default_value = "processed_ratings.csv")]
    ratings: PathBuf,

    /// Region tree, optionally with precomputed stats.
    #[arg(long, default_value = "structure.json")]
    structure: PathBuf,

    /// Kernel bandwidth in rating points.
    #[arg(long, default_value_t = 40.0)]
    bandwidth: f64,

    /// Number of evaluation points on the rating axis.
    #[arg(long, default_value_t = 60)]
    grid_size: usize,

    /// Regions need more than this many players in a month to be drawn.
    #[arg(long, default_value_t = 20)]
    min_samples: usize,

    /// Playback speed, milliseconds per month.
    #[arg(long, default_value_t = 150)]
    tick_ms: u64,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> eframe::Result {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = ViewerConfig::default()
        .bandwidth(args.bandwidth)
        .grid_size(args.grid_size)
        .min_samples(args.min_samples)
        .tick_interval(Duration::from_millis(args.tick_ms));
    let sources = DataSources {
        ratings: args.ratings,
        structure: args.structure,
    };

    ratingscope::run(sources, config)
}
