//! Styled terminal output and progress reporting.
//!
//! Plain helper functions for the summaries the commands print, plus the
//! event handler that renders analysis progress as a live bar. Machine
//! output (--json) bypasses this module entirely.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use phasecam_core::utils::format_shift;
use phasecam_core::{Classification, Event, EventHandler};
use std::sync::Mutex;
use std::time::Duration;

/// Width of the label column in status lines.
const LABEL_WIDTH: usize = 14;

/// Prints a section heading with a dashed rule.
pub fn print_section(text: &str) {
    println!("\n{}", style("-".repeat(40)).blue());
    println!(" {}", style(text).bold());
    println!("{}", style("-".repeat(40)).blue());
}

/// Label/value line, values aligned on a common column.
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let line = status_line(label, value);
    if highlight {
        println!("{}", style(line).bold());
    } else {
        println!("{line}");
    }
}

fn status_line(label: &str, value: &str) -> String {
    format!("  {label:<width$} {value}", width = LABEL_WIDTH)
}

/// Success line with a green check.
pub fn print_success(message: &str) {
    println!("  {} {}", style("✓").green().bold(), message);
}

/// Warning line with a yellow label.
pub fn print_warning(message: &str) {
    println!("  {} {}", style("warning:").yellow().bold(), message);
}

/// Error line on stderr with a red label.
pub fn print_error(message: &str) {
    eprintln!("{} {message}", style("error:").for_stderr().red().bold());
}

/// Prominent red line for a motion result.
pub fn print_alert(message: &str) {
    println!("\n  {}", style(message).red().bold());
}

/// Prints the snapshot verdict in its status color.
pub fn print_verdict(classification: Classification) {
    let label = classification.label();
    let styled = if classification.is_moved() {
        style(label).red().bold()
    } else {
        style(label).green().bold()
    };
    println!("\n  {styled}");
}

/// Progress bar for a run; falls back to a spinner when the frame count is
/// unknown up front.
pub fn create_progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                    .unwrap()
                    .progress_chars("█▓▒░ "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} {pos} compared")
                    .unwrap(),
            );
            pb
        }
    }
}

/// Terminal presentation of analysis events: a progress bar across the
/// comparisons plus styled lines for notable moments.
pub struct TerminalEventHandler {
    progress: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl TerminalEventHandler {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            progress: Mutex::new(None),
            verbose,
        }
    }

    /// Prints above the live bar so the line survives redraws.
    fn println_above(&self, line: String) {
        match self.progress.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(pb) if !pb.is_finished() => pb.println(line),
                _ => println!("{line}"),
            },
            Err(_) => println!("{line}"),
        }
    }
}

impl EventHandler for TerminalEventHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::AnalysisStarted {
                input,
                total_frames,
                threshold,
            } => {
                print_section("Analyzing");
                print_status("Input", input, false);
                print_status("Threshold", &format!("{threshold:.2} px"), false);

                // N frames make N-1 comparisons, so the bar is one short
                // of the probed frame count.
                let pb = create_progress_bar(total_frames.map(|total| total.saturating_sub(1)));
                pb.set_message("Comparing frames");
                pb.enable_steady_tick(Duration::from_millis(100));
                if let Ok(mut guard) = self.progress.lock() {
                    *guard = Some(pb);
                }
            }

            Event::FrameCompared {
                index,
                dx,
                dy,
                moved,
                ..
            } => {
                if self.verbose {
                    let verdict = if *moved {
                        style("moved").red().to_string()
                    } else {
                        style("stable").green().to_string()
                    };
                    self.println_above(format!(
                        "  frame {index:>6}  {}  {verdict}",
                        format_shift(*dx, *dy)
                    ));
                }
                if let Ok(guard) = self.progress.lock() {
                    if let Some(pb) = guard.as_ref() {
                        pb.inc(1);
                    }
                }
            }

            Event::MotionDetected {
                index,
                dx,
                dy,
                detected_at,
            } => {
                self.println_above(format!(
                    "  {} frame {index} ({}) at {}",
                    style("Motion Detected:").red().bold(),
                    format_shift(*dx, *dy),
                    detected_at.format("%H:%M:%S"),
                ));
            }

            Event::Warning { message } => {
                self.println_above(format!(
                    "  {} {message}",
                    style("warning:").yellow().bold()
                ));
            }

            Event::AnalysisComplete { .. } => {
                if let Ok(mut guard) = self.progress.lock() {
                    if let Some(pb) = guard.take() {
                        pb.finish_and_clear();
                    }
                }
            }
        }
    }
}
