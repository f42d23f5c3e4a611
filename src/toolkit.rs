//! Toolkit installation validation and tool resolution.
//!
//! The pipeline assumes a single fixed toolkit layout: `bin/` with the
//! generator and deployment tools, `include/` with module headers, `lib/`
//! with link libraries. Validation runs before any external process is
//! spawned so a bad configuration never leaves partial build artifacts.

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// Subdirectories every toolkit installation must expose.
const REQUIRED_DIRS: &[&str] = &["bin", "include", "lib"];

/// A validated toolkit installation.
#[derive(Debug, Clone)]
pub struct Toolkit {
    pub root: PathBuf,
    /// Meta-object code generator (`moc`).
    pub moc: PathBuf,
    /// Runtime dependency deployment tool (`windeployqt`).
    pub windeployqt: PathBuf,
}

impl Toolkit {
    /// Verify the toolkit layout and resolve tool paths.
    pub fn validate(root: &Path) -> Result<Self, BuildError> {
        for dir in REQUIRED_DIRS {
            let path = root.join(dir);
            if !path.is_dir() {
                return Err(BuildError::Configuration {
                    message: format!("invalid toolkit path: missing {}", path.display()),
                });
            }
        }
        Ok(Toolkit {
            moc: resolve_tool(root, "moc"),
            windeployqt: resolve_tool(root, "windeployqt"),
            root: root.to_path_buf(),
        })
    }

    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }
}

/// Tools live under `<root>/bin`, with or without the `.exe` suffix
/// depending on how the toolkit was installed.
fn resolve_tool(root: &Path, name: &str) -> PathBuf {
    let exe = root.join("bin").join(format!("{name}.exe"));
    if exe.exists() {
        exe
    } else {
        root.join("bin").join(name)
    }
}
