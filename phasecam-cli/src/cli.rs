//! Command-line interface definitions for phasecam.
//!
//! Defines the command structure using clap's derive API. Argument values
//! map onto the core configuration types; no processing happens here.

use clap::{Parser, Subcommand, ValueEnum};
use phasecam_core::{DEFAULT_ANALYSIS_WIDTH, DEFAULT_MOTION_THRESHOLD, SubpixelMethod};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Detects translational camera movement by phase-correlating consecutive \
                  video frames, or a pair of snapshots taken from the same mount."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a video for camera movement between consecutive frames
    Analyze(AnalyzeArgs),

    /// Compare two snapshots and report the shift between them
    Compare(CompareArgs),
}

/// Arguments for the analyze command
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Video file to analyze (.mp4 or .avi), or '-' to read from stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Minimum per-axis shift in pixels classified as motion
    #[arg(
        short,
        long,
        value_name = "PIXELS",
        env = "PHASECAM_THRESHOLD",
        default_value_t = DEFAULT_MOTION_THRESHOLD
    )]
    pub threshold: f64,

    /// Width in pixels frames are scaled to before correlation
    #[arg(short, long, value_name = "PIXELS", default_value_t = DEFAULT_ANALYSIS_WIDTH)]
    pub width: u32,

    /// Apply a Hann window before correlation (helps noisy footage)
    #[arg(long)]
    pub window: bool,

    /// Sub-pixel refinement method
    #[arg(long, value_enum, default_value_t = SubpixelArg::Parabolic)]
    pub subpixel: SubpixelArg,

    /// Write annotated copies of compared frames into this directory
    #[arg(long, value_name = "DIR")]
    pub save_frames: Option<PathBuf>,

    /// Emit newline-delimited JSON events instead of styled output
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the compare command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Reference snapshot
    #[arg(value_name = "IMAGE_A")]
    pub image_a: PathBuf,

    /// Snapshot compared against the reference
    #[arg(value_name = "IMAGE_B")]
    pub image_b: PathBuf,

    /// Minimum per-axis shift in pixels classified as motion
    #[arg(
        short,
        long,
        value_name = "PIXELS",
        env = "PHASECAM_THRESHOLD",
        default_value_t = DEFAULT_MOTION_THRESHOLD
    )]
    pub threshold: f64,

    /// Apply a Hann window before correlation (helps noisy snapshots)
    #[arg(long)]
    pub window: bool,

    /// Sub-pixel refinement method
    #[arg(long, value_enum, default_value_t = SubpixelArg::Parabolic)]
    pub subpixel: SubpixelArg,

    /// Print the result as a single JSON object
    #[arg(long)]
    pub json: bool,
}

/// Sub-pixel refinement choice exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SubpixelArg {
    /// Three-point parabolic fit around the correlation peak
    Parabolic,
    /// Intensity-weighted centroid around the correlation peak
    Centroid,
}

impl From<SubpixelArg> for SubpixelMethod {
    fn from(arg: SubpixelArg) -> Self {
        match arg {
            SubpixelArg::Parabolic => SubpixelMethod::Parabolic,
            SubpixelArg::Centroid => SubpixelMethod::Centroid,
        }
    }
}
