//! Code generator discovery.
//!
//! Finds every header in the project tree whose text carries the meta-object
//! marker and runs the generator tool against it. The generator output
//! directory is deleted and recreated first, so no stale generated file ever
//! leaks into a new build. A generator failure aborts the phase immediately;
//! no partial generated-file list reaches the compiler.

use super::process::run_streaming;
use super::{EXCLUDED_DIRS, SourceUnit, scan};
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::toolkit::Toolkit;
use colored::*;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Marker token whose presence in a header requires generated glue code.
pub const MOC_MARKER: &str = "Q_OBJECT";

/// Generator output directory, under the project root.
pub const MOC_GEN_DIR: &str = "moc_gen";

/// Run the generator over the project tree; returns the generated source
/// units, empty if no header carries the marker.
pub fn generate_glue(config: &BuildConfig, toolkit: &Toolkit) -> Result<Vec<SourceUnit>, BuildError> {
    let gen_dir = config.project_path.join(MOC_GEN_DIR);
    if gen_dir.exists() {
        fs::remove_dir_all(&gen_dir)?;
    }
    fs::create_dir_all(&gen_dir)?;

    let mut generated = Vec::new();
    for header in scan::scan_files(&config.project_path, EXCLUDED_DIRS, ".h") {
        if !header_needs_glue(&header)? {
            continue;
        }
        let stem = header.file_stem().unwrap_or_default().to_string_lossy();
        let output = gen_dir.join(format!("moc_{stem}.cpp"));

        let mut cmd = Command::new(&toolkit.moc);
        cmd.arg(&header).arg("-o").arg(&output);
        let status = run_streaming(cmd, |line| println!("   [moc] {line}"))?;
        if !status.success() {
            return Err(BuildError::CodeGeneration {
                header,
                code: status.code().unwrap_or(-1),
            });
        }

        println!("   {} Generated {}", "+".green(), output.display());
        generated.push(SourceUnit::generated(output, header));
    }
    Ok(generated)
}

/// Whether a header's text marks it as requiring generated glue code.
/// Headers are read as raw bytes; non-UTF-8 content cannot hide the marker.
pub fn header_needs_glue(header: &Path) -> Result<bool, BuildError> {
    let content = fs::read(header)?;
    Ok(String::from_utf8_lossy(&content).contains(MOC_MARKER))
}
