//! Deployment and archive packaging.
//!
//! Runs the external dependency-deployment tool against the linked
//! executable, then archives the deployment directory into a single zip.
//! The archive is assembled in a scoped temporary directory next to its
//! final destination and moved into place with a same-filesystem rename, so
//! a half-written archive is never visible at the stable path. A packaging
//! failure leaves the executable itself valid and usable.

use crate::build::process::run_streaming;
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::toolkit::Toolkit;
use colored::*;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;
use zip::write::FileOptions;

fn packaging_error(context: &str, e: impl std::fmt::Display) -> BuildError {
    BuildError::Packaging {
        message: format!("{context}: {e}"),
    }
}

/// Deploy runtime dependencies next to the executable, then archive the
/// whole output directory. Returns the final archive path.
pub fn package_build(
    config: &BuildConfig,
    toolkit: &Toolkit,
    exe_path: &Path,
) -> Result<PathBuf, BuildError> {
    let deploy_dir = exe_path.parent().unwrap_or(Path::new("."));

    // 1. Collect runtime dependencies.
    let mut cmd = Command::new(&toolkit.windeployqt);
    cmd.arg("--dir")
        .arg(deploy_dir)
        .arg("--no-translations")
        .arg(exe_path);
    let status = run_streaming(cmd, |line| println!("   [windeployqt] {line}"))
        .map_err(|e| packaging_error("deployment tool failed to start", e))?;
    if !status.success() {
        return Err(BuildError::Packaging {
            message: format!(
                "deployment tool exited with code {}",
                status.code().unwrap_or(-1)
            ),
        });
    }

    // 2. Archive in a scoped temp dir inside the destination's parent, so
    // the final move is an atomic rename on the same filesystem.
    let build_dir = config.project_path.join("build");
    fs::create_dir_all(&build_dir).map_err(|e| packaging_error("creating build directory", e))?;

    let exe_stem = exe_path.file_stem().unwrap_or_default().to_string_lossy();
    let final_zip = build_dir.join(format!("{exe_stem}_full.zip"));

    let tmp_dir = tempfile::Builder::new()
        .prefix(".pack")
        .tempdir_in(&build_dir)
        .map_err(|e| packaging_error("creating temp directory", e))?;
    let tmp_zip = tmp_dir.path().join("build.zip");

    println!("   {} Archiving {}", "💾".blue(), deploy_dir.display());
    write_archive(deploy_dir, &tmp_zip)?;

    // 3. Atomic replace: remove any previous archive, then move the temp
    // archive into place.
    if final_zip.exists() {
        fs::remove_file(&final_zip).map_err(|e| packaging_error("removing old archive", e))?;
    }
    fs::rename(&tmp_zip, &final_zip).map_err(|e| packaging_error("moving archive", e))?;

    let size = fs::metadata(&final_zip)
        .map_err(|e| packaging_error("reading archive size", e))?
        .len();
    println!(
        "   {} Package ready: {} ({:.2} MB)",
        "✓".green(),
        final_zip.display(),
        size as f64 / 1024.0 / 1024.0
    );
    Ok(final_zip)
}

/// Write every regular file under `root` into a deflated zip at `dest`.
/// Symbolic links and other non-regular entries are skipped.
fn write_archive(root: &Path, dest: &Path) -> Result<(), BuildError> {
    let file = File::create(dest).map_err(|e| packaging_error("creating archive", e))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::<()>::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o755);

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| packaging_error("walking output directory", e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        zip.start_file(name, options)
            .map_err(|e| packaging_error("writing archive entry", e))?;
        let mut src = File::open(path).map_err(|e| packaging_error("reading file", e))?;
        io::copy(&mut src, &mut zip).map_err(|e| packaging_error("writing archive entry", e))?;
    }
    zip.finish()
        .map_err(|e| packaging_error("finishing archive", e))?;
    Ok(())
}
