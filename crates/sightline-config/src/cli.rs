//! Command-line overrides shared by every sightline subcommand.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Global command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Visible triangle budget.
    #[arg(long, global = true)]
    pub max_triangles: Option<u64>,

    /// Frames to wait after a tier change.
    #[arg(long, global = true)]
    pub hysteresis: Option<u32>,

    /// Chords cast when precomputing visibility.
    #[arg(long, global = true)]
    pub samples: Option<u64>,

    /// Chord sampling seed.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Precompute worker threads (0 = one per CPU).
    #[arg(long, global = true)]
    pub workers: Option<usize>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(max) = args.max_triangles {
            self.lod.max_triangles = max;
        }
        if let Some(frames) = args.hysteresis {
            self.lod.hysteresis_frames = frames;
        }
        if let Some(samples) = args.samples {
            self.visibility.samples = samples;
        }
        if let Some(seed) = args.seed {
            self.visibility.seed = seed;
        }
        if let Some(workers) = args.workers {
            self.visibility.workers = workers;
        }
    }
}
