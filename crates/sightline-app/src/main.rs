//! `sightline`: precompute visibility for grid maps and simulate the
//! per-frame LOD manager over a camera path.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p sightline-app -- precompute` to build the visibility
//! file, then `cargo run -p sightline-app -- simulate` to replay a camera path.

mod error;
mod precompute;
mod simulate;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sightline_config::{CliArgs, Config};
use tracing::{error, info};

/// Grid-map visibility precomputation and LOD simulation.
#[derive(Parser, Debug)]
#[command(name = "sightline", version)]
struct Cli {
    #[command(flatten)]
    global: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample a map and write its visibility file.
    Precompute {
        /// Map file (defaults to `scene.map_path`).
        #[arg(long)]
        map: Option<PathBuf>,
        /// Output file (defaults to `scene.pvs_path`).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Move a camera through a level and run the LOD manager every frame.
    Simulate {
        /// Map file (defaults to `scene.map_path`).
        #[arg(long)]
        map: Option<PathBuf>,
        /// Visibility file (defaults to `scene.pvs_path`).
        #[arg(long)]
        pvs: Option<PathBuf>,
        /// Frames to run (defaults to `scene.frames`).
        #[arg(long)]
        frames: Option<u32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Resolve config directory
    let Some(config_dir) = cli
        .global
        .config
        .clone()
        .or_else(|| dirs::config_dir().map(|dir| dir.join("sightline")))
    else {
        eprintln!("Failed to resolve config directory; pass --config");
        return ExitCode::FAILURE;
    };

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&cli.global);

    let log_dir = config_dir.join("logs");
    sightline_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let result = match cli.command {
        Command::Precompute { map, out } => {
            let map = map.unwrap_or_else(|| config.scene.map_path.clone());
            let out = out.unwrap_or_else(|| config.scene.pvs_path.clone());
            precompute::run(&map, &out, &config.visibility).map(|summary| {
                info!(cells = summary.cells, pairs = summary.pairs, "Precompute complete");
            })
        }
        Command::Simulate { map, pvs, frames } => {
            let map = map.unwrap_or_else(|| config.scene.map_path.clone());
            let pvs = pvs.unwrap_or_else(|| config.scene.pvs_path.clone());
            let frames = frames.unwrap_or(config.scene.frames);
            simulate::run(&map, &pvs, frames, &config).map(|summary| {
                println!(
                    "{} frames, {} tier changes, {} visible triangles",
                    summary.frames, summary.changes, summary.visible_triangles
                );
                for (tier, count) in summary.tier_histogram.iter().enumerate() {
                    println!("  LOD{tier}: {count}");
                }
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("sightline: {e}");
            ExitCode::FAILURE
        }
    }
}
