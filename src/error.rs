//! Typed errors raised before or around a render.
//!
//! Bridge failures live next to the bridge in `bridge`; everything
//! here is detected locally from arguments or the file system.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("--input is required")]
    MissingInput,

    #[error("--input-dir is required")]
    MissingInputDir,

    #[error("--output-dir is required")]
    MissingOutputDir,

    #[error("--workers must be a positive integer, got {0}")]
    InvalidWorkers(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("no command given (expected render, list-themes or batch)")]
    MissingCommand,

    #[error("Input directory not found: {}", .0.display())]
    InputDirNotFound(PathBuf),

    #[error("No .mmd files found in {}", .0.display())]
    NoDiagrams(PathBuf),

    #[error("{failed} of {total} diagrams failed to render")]
    BatchFailed { failed: usize, total: usize },
}
