//! Core build pipeline: code generation, concurrent compilation, linking.

mod clean;
mod codegen;
mod compile;
mod core;
mod link;
pub mod process;
pub mod scan;

pub use clean::clean;
pub use codegen::{MOC_GEN_DIR, MOC_MARKER, generate_glue};
pub use compile::{CancelToken, OBJ_DIR, compile_all, compile_flags};
pub use link::{link_command, link_executable};
pub use self::core::run_build;

use std::path::PathBuf;
use std::time::Duration;

/// Directory names that never contain project sources: generator output,
/// object output and build output. Skipped by every project scan.
pub const EXCLUDED_DIRS: &[&str] = &[codegen::MOC_GEN_DIR, compile::OBJ_DIR, "build"];

/// A discovered compilable file, consumed exactly once by the compilation
/// scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub kind: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Found in the project tree.
    Ordinary,
    /// Emitted by the code generator from the given header.
    Generated { header: PathBuf },
}

impl SourceUnit {
    pub fn ordinary(path: PathBuf) -> Self {
        SourceUnit {
            path,
            kind: SourceKind::Ordinary,
        }
    }

    pub fn generated(path: PathBuf, header: PathBuf) -> Self {
        SourceUnit {
            path,
            kind: SourceKind::Generated { header },
        }
    }
}

/// Result of one successful single-unit compilation.
#[derive(Debug, Clone)]
pub struct CompiledObject {
    pub object: PathBuf,
    pub source: SourceUnit,
}

/// Final result of a successful pipeline run.
#[derive(Debug)]
pub struct BuildOutcome {
    pub executable: PathBuf,
    /// Present only when packaging was requested and ran.
    pub archive: Option<PathBuf>,
    pub elapsed: Duration,
}
