//! The analyze command: batch motion detection over a video.

use crate::cli::AnalyzeArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output::{self, TerminalEventHandler};
use log::debug;
use phasecam_core::utils::{effective_fps, format_duration, has_supported_extension};
use phasecam_core::{
    AnalysisConfig, CoreError, DetectorConfig, DiscardSink, EventDispatcher, JsonEventHandler,
    PngDirectorySink, ShiftDetector, SpooledInput, VideoAnalysis, VideoFrameSource,
    process_frames,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Input resolved to a real path ffmpeg can open.
struct ResolvedInput {
    /// Keeps spooled stdin bytes alive for the whole run.
    _spooled: Option<SpooledInput>,
    path: PathBuf,
    label: String,
}

/// Maps CLI arguments onto the core configuration.
fn build_config(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        detector: DetectorConfig {
            threshold: args.threshold,
            apply_window: args.window,
            subpixel: args.subpixel.into(),
        },
        analysis_width: args.width,
    }
}

/// Resolves the input argument: a supported container path, or '-' for
/// stdin spooled to a temporary file.
fn resolve_input(input: &Path) -> CliResult<ResolvedInput> {
    if input == Path::new("-") {
        debug!("Spooling stdin to a temporary file");
        let spooled =
            SpooledInput::from_reader(&mut io::stdin().lock(), "phasecam_stdin", "mp4")?;
        let path = spooled.path().to_path_buf();
        return Ok(ResolvedInput {
            _spooled: Some(spooled),
            path,
            label: "<stdin>".to_string(),
        });
    }

    if !has_supported_extension(input) {
        return Err(CoreError::UnsupportedContainer(input.to_path_buf()));
    }
    let metadata = fs::metadata(input)
        .cli_with_context(|| format!("Failed to access input '{}'", input.display()))?;
    if !metadata.is_file() {
        return Err(CoreError::PathError(format!(
            "Input '{}' is not a regular file",
            input.display()
        )));
    }

    Ok(ResolvedInput {
        _spooled: None,
        path: input.to_path_buf(),
        label: input.display().to_string(),
    })
}

/// Runs batch analysis per the parsed arguments.
///
/// The exit status only reflects failures: a run that detects motion still
/// returns Ok.
pub fn run_analyze(args: AnalyzeArgs, verbose: bool) -> CliResult<()> {
    let config = build_config(&args);
    config.validate()?;

    let resolved = resolve_input(&args.input)?;
    debug!(
        "Analyzing {} (threshold {} px, analysis width {} px)",
        resolved.label, config.detector.threshold, config.analysis_width
    );

    let mut detector = ShiftDetector::new(config.detector)?;
    let mut source = VideoFrameSource::open(&resolved.path, config.analysis_width)?;

    let mut dispatcher = EventDispatcher::new();
    if args.json {
        dispatcher.add_handler(Arc::new(JsonEventHandler::new()));
    } else {
        dispatcher.add_handler(Arc::new(TerminalEventHandler::new(verbose)));
    }

    let analysis = match &args.save_frames {
        Some(dir) => {
            let mut sink = PngDirectorySink::new(dir)?;
            process_frames(
                &resolved.label,
                &mut source,
                &mut detector,
                &mut sink,
                &dispatcher,
            )?
        }
        None => process_frames(
            &resolved.label,
            &mut source,
            &mut detector,
            &mut DiscardSink,
            &dispatcher,
        )?,
    };

    if !args.json {
        print_summary(&args, &analysis);
    }
    Ok(())
}

/// Styled end-of-run summary for terminal mode.
fn print_summary(args: &AnalyzeArgs, analysis: &VideoAnalysis) {
    output::print_section("Analysis Complete");
    output::print_status("Frames seen", &analysis.frames_seen.to_string(), false);
    output::print_status("Comparisons", &analysis.comparisons.to_string(), false);

    let moved = if analysis.moved_indices.is_empty() {
        "none".to_string()
    } else {
        format!("{:?}", analysis.moved_indices)
    };
    output::print_status("Moved frames", &moved, analysis.motion_detected());

    output::print_status(
        "Elapsed",
        &format_duration(analysis.elapsed.as_secs_f64()),
        false,
    );
    output::print_status(
        "Speed",
        &format!(
            "{:.1} fps",
            effective_fps(analysis.comparisons, analysis.elapsed)
        ),
        false,
    );
    if let Some(dir) = &args.save_frames {
        output::print_status("Saved frames", &dir.display().to_string(), false);
    }
    if analysis.truncated {
        output::print_warning("input ended early; the result covers the decoded part only");
    }

    if analysis.motion_detected() {
        output::print_alert(&format!(
            "Camera movement detected at {} frame(s)",
            analysis.moved_indices.len()
        ));
    } else {
        output::print_success("No camera movement detected");
    }
}
