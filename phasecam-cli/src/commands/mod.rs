//! Subcommand implementations.
//!
//! Each submodule validates its arguments, builds the core configuration,
//! and delegates the actual work to phasecam-core.

/// Batch video analysis
pub mod analyze;

/// Paired-snapshot comparison
pub mod compare;
