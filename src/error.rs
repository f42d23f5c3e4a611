//! Build pipeline error taxonomy.
//!
//! Every stage of the pipeline fails at most once per run and there is no
//! local recovery or retry anywhere; each variant here maps to exactly one
//! stage so the controller can report which stage stopped the run.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised by one stage of the build pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Bad toolkit layout or invalid configuration value. Raised pre-flight,
    /// before any external process is spawned.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The code generator exited non-zero for one header. No partial
    /// generated-file list is used downstream.
    #[error("code generation failed for `{}` (exit code {code})", .header.display())]
    CodeGeneration { header: PathBuf, code: i32 },

    /// One or more translation units failed to compile. Carries the failed
    /// sources only, never a partial object list.
    #[error("compilation failed for {} translation unit(s)", .failed.len())]
    Compilation { failed: Vec<PathBuf> },

    /// The linker exited non-zero. Carries the full command line for
    /// diagnosability.
    #[error("linking failed (exit code {code}): {command}")]
    Link { command: String, code: i32 },

    /// Deployment tool or archive write failure. Fatal to packaging only;
    /// the already-linked executable remains valid.
    #[error("packaging failed: {message}")]
    Packaging { message: String },

    /// Filesystem plumbing failure outside the packaging stage.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// Name of the pipeline stage this error belongs to, for the final
    /// failure report.
    pub fn stage(&self) -> &'static str {
        match self {
            BuildError::Configuration { .. } => "validation",
            BuildError::CodeGeneration { .. } => "code generation",
            BuildError::Compilation { .. } => "compilation",
            BuildError::Link { .. } => "linking",
            BuildError::Packaging { .. } => "packaging",
            BuildError::Io(_) => "i/o",
        }
    }
}
