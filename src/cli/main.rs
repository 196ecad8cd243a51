//! Boundary level-of-detail tool.
//!
//! Loads administrative boundary layers, simplifies dense outer rings
//! according to the layer policy and writes the annotated result.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use faso_lod::loader::{layer_path, load_collection, write_annotated, write_canonical};
use faso_lod::lod::classify::small_features;
use faso_lod::lod::{process_collection_par, process_collection_with_policy, LayerSummary};
use faso_lod::{FeatureCollection, Layer, LayerPolicy};

use crate::config::Config;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "faso-lod")]
#[command(about = "Prepare administrative boundary layers for map rendering")]
struct Args {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a single layer
    Process {
        /// Layer to process (regions, provinces, communes)
        #[arg(short, long)]
        layer: Layer,

        /// Source file (defaults to <data_dir>/<layer>.geojson)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (defaults to <output_dir>/<layer>.geojson)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the layer's point-count threshold
        #[arg(long)]
        threshold: Option<usize>,

        /// Override the layer's simplification tolerance
        #[arg(long)]
        tolerance: Option<f64>,

        /// Write canonical source data without derived keys
        #[arg(long)]
        canonical: bool,

        /// Process features in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Report point counts and small features for a layer
    Stats {
        #[arg(short, long)]
        layer: Layer,

        #[arg(short, long)]
        input: Option<PathBuf>,

        /// List every small feature by name
        #[arg(long)]
        list_small: bool,
    },

    /// Process every layer listed in the config
    Batch,
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Process {
            layer,
            input,
            output,
            threshold,
            tolerance,
            canonical,
            parallel,
        } => {
            let defaults = layer.policy();
            let policy = LayerPolicy::new(
                threshold.unwrap_or(defaults.threshold),
                tolerance.unwrap_or(defaults.tolerance),
            )?;
            let input = input.unwrap_or_else(|| layer_path(&config.global.data_dir, layer));
            let output =
                output.unwrap_or_else(|| layer_path(&config.global.output_dir, layer));
            run_layer(
                layer,
                &policy,
                &input,
                &output,
                canonical || config.global.canonical,
                parallel || config.global.parallel,
            )?;
        }
        Command::Stats {
            layer,
            input,
            list_small,
        } => {
            let input = input.unwrap_or_else(|| layer_path(&config.global.data_dir, layer));
            let source = load_collection(&input)?;
            let processed = process_collection_with_policy(&source, &layer.policy());
            log_summary(layer, &LayerSummary::from_collection(&processed));

            if list_small {
                for feature in small_features(&processed) {
                    info!(
                        "  small: {} ({}) in {}",
                        feature.display_name(layer),
                        feature.code(layer),
                        feature.parent_name(layer)
                    );
                }
            }
        }
        Command::Batch => {
            if config.layers.is_empty() {
                warn!("No layers configured, nothing to do");
            }
            for &layer in &config.layers {
                let input = layer_path(&config.global.data_dir, layer);
                let output = layer_path(&config.global.output_dir, layer);
                run_layer(
                    layer,
                    &layer.policy(),
                    &input,
                    &output,
                    config.global.canonical,
                    config.global.parallel,
                )
                .with_context(|| format!("Failed to process layer {}", layer))?;
            }
        }
    }

    Ok(())
}

fn run_layer(
    layer: Layer,
    policy: &LayerPolicy,
    input: &Path,
    output: &Path,
    canonical: bool,
    parallel: bool,
) -> Result<()> {
    info!(
        "Layer {}: threshold {}, tolerance {}",
        layer, policy.threshold, policy.tolerance
    );

    let source = load_collection(input)?;
    let processed: FeatureCollection = if parallel {
        process_collection_par(&source, policy)
    } else {
        process_collection_with_policy(&source, policy)
    };
    log_summary(layer, &LayerSummary::from_collection(&processed));

    if canonical {
        write_canonical(output, &processed)?;
    } else {
        write_annotated(output, &processed)?;
    }
    Ok(())
}

fn log_summary(layer: Layer, summary: &LayerSummary) {
    info!(
        "{}: {} features, {} simplified, {} small",
        layer, summary.features, summary.simplified, summary.small
    );
    info!(
        "{}: {} -> {} outer ring points",
        layer, summary.original_points, summary.simplified_points
    );
    if let Some(extent) = &summary.extent {
        info!(
            "{}: extent [{}, {}, {}, {}]",
            layer, extent.min_x, extent.min_y, extent.max_x, extent.max_y
        );
    }
}
