//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use delve_caves::LiquidScan;

use crate::Config;

/// Liquid guard search mode as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScanMode {
    /// Edge columns fully, interior columns at top and bottom only.
    Sampled,
    /// Every voxel of the search volume.
    Exhaustive,
}

impl From<ScanMode> for LiquidScan {
    fn from(mode: ScanMode) -> Self {
        match mode {
            ScanMode::Sampled => LiquidScan::Sampled,
            ScanMode::Exhaustive => LiquidScan::Exhaustive,
        }
    }
}

/// Delve command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "delve", about = "Carve cave systems into a block of chunks")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// X of the center chunk.
    #[arg(long, allow_hyphen_values = true)]
    pub chunk_x: Option<i32>,

    /// Z of the center chunk.
    #[arg(long, allow_hyphen_values = true)]
    pub chunk_z: Option<i32>,

    /// Chunks generated on each side of the center.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Worker threads (0 = auto).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Liquid guard search mode.
    #[arg(long, value_enum)]
    pub liquid_scan: Option<ScanMode>,

    /// Altitude of the printed ASCII cross-section.
    #[arg(long)]
    pub slice_y: Option<i32>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(x) = args.chunk_x {
            self.world.origin_x = x;
        }
        if let Some(z) = args.chunk_z {
            self.world.origin_z = z;
        }
        if let Some(radius) = args.radius {
            self.world.chunk_radius = radius;
        }
        if let Some(threads) = args.threads {
            self.generation.worker_threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(mode) = args.liquid_scan {
            self.caves.liquid_scan = mode.into();
        }
        if let Some(y) = args.slice_y {
            self.debug.ascii_slice_y = Some(y);
        }
    }
}
