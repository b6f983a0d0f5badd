//! The compare command: shift between two snapshots.

use crate::cli::CompareArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;
use log::debug;
use phasecam_core::utils::{format_shift, get_filename_safe};
use phasecam_core::{DetectorConfig, Frame, ShiftDetector, SnapshotComparison, compare_frames};
use serde_json::json;

/// Builds the detector configuration from the parsed arguments.
fn build_config(args: &CompareArgs) -> DetectorConfig {
    DetectorConfig {
        threshold: args.threshold,
        apply_window: args.window,
        subpixel: args.subpixel.into(),
    }
}

/// JSON payload for --json mode.
fn comparison_json(args: &CompareArgs, comparison: &SnapshotComparison) -> serde_json::Value {
    json!({
        "image_a": args.image_a.display().to_string(),
        "image_b": args.image_b.display().to_string(),
        "dx": comparison.estimate.dx,
        "dy": comparison.estimate.dy,
        "response": comparison.estimate.response,
        "threshold": args.threshold,
        "moved": comparison.is_moved(),
        "status": comparison.classification.label(),
    })
}

/// Compares two snapshots and reports the shift and verdict.
///
/// Motion is a result, not a failure: the exit status stays 0 either way.
pub fn run_compare(args: CompareArgs) -> CliResult<()> {
    let config = build_config(&args);
    let mut detector = ShiftDetector::new(config)?;

    let frame_a = Frame::load(&args.image_a)
        .cli_with_context(|| format!("Failed to load '{}'", args.image_a.display()))?;
    let frame_b = Frame::load(&args.image_b)
        .cli_with_context(|| format!("Failed to load '{}'", args.image_b.display()))?;
    debug!(
        "Comparing {}x{} snapshots at threshold {} px",
        frame_a.width(),
        frame_a.height(),
        args.threshold
    );

    let comparison = compare_frames(&frame_a, &frame_b, &mut detector)?;

    if args.json {
        println!("{}", comparison_json(&args, &comparison));
        return Ok(());
    }

    output::print_section("Snapshot Comparison");
    output::print_status("Image A", &get_filename_safe(&args.image_a)?, false);
    output::print_status("Image B", &get_filename_safe(&args.image_b)?, false);
    output::print_status(
        "Shift",
        &format_shift(comparison.estimate.dx, comparison.estimate.dy),
        true,
    );
    output::print_status("Threshold", &format!("{:.2} px", args.threshold), false);
    output::print_verdict(comparison.classification);
    Ok(())
}
