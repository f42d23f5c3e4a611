//! Concurrent compilation scheduler.
//!
//! Discovers every compilable source (ordinary plus generated), then
//! compiles each to an object file on a bounded worker pool with fail-fast
//! semantics: once one unit fails, no further compilations are started.
//! Cancellation is cooperative, not preemptive — compiler processes already
//! running are left to finish and their results are discarded, so external
//! process teardown stays clean.

use super::process::run_streaming;
use super::{CompiledObject, EXCLUDED_DIRS, SourceUnit, scan};
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::toolkit::Toolkit;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Object output directory, under the project root. Mirrors the source
/// tree's relative directory structure.
pub const OBJ_DIR: &str = "obj";

/// Cooperative cancellation token shared by all in-flight compile tasks.
///
/// The transition is monotonic: once tripped it stays tripped, and a trip by
/// any task is observed by every task polled afterwards. Exactly-once
/// semantics are not required of callers; [`CancelToken::trip`] reports
/// whether this call was the one that tripped it.
#[derive(Debug, Default)]
pub struct CancelToken {
    tripped: AtomicBool,
}

impl CancelToken {
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    /// Set-if-unset; returns true if this call performed the transition.
    pub fn trip(&self) -> bool {
        !self.tripped.swap(true, Ordering::AcqRel)
    }
}

/// Compiler flag set shared by every translation unit of one run.
pub fn compile_flags(config: &BuildConfig, toolkit: &Toolkit) -> Vec<String> {
    let mut flags = vec![
        "-c".to_string(),
        "-pipe".to_string(),
        format!("-std={}", config.language_standard),
        "-Wall".to_string(),
        "-Wextra".to_string(),
        format!("-I{}", toolkit.include_dir().display()),
        format!("-I{}", config.project_path.join("include").display()),
    ];
    for module in &config.modules {
        flags.push(format!(
            "-I{}",
            toolkit.include_dir().join(format!("Qt{module}")).display()
        ));
    }
    flags
}

/// Object destination for a source, mirroring its directory relative to the
/// project root under the object root.
fn object_path(project: &Path, obj_root: &Path, source: &Path) -> PathBuf {
    let rel_dir = source
        .parent()
        .and_then(|dir| dir.strip_prefix(project).ok())
        .unwrap_or_else(|| Path::new(""));
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    obj_root.join(rel_dir).join(format!("{stem}.o"))
}

/// Discover all sources and compile them in parallel. Returns the full
/// object set, or a single [`BuildError::Compilation`] if any unit failed.
pub fn compile_all(
    config: &BuildConfig,
    toolkit: &Toolkit,
    generated: Vec<SourceUnit>,
) -> Result<Vec<CompiledObject>, BuildError> {
    let project = &config.project_path;
    let obj_root = project.join(OBJ_DIR);

    let mut sources: Vec<SourceUnit> = scan::scan_files(project, EXCLUDED_DIRS, ".cpp")
        .into_iter()
        .map(SourceUnit::ordinary)
        .collect();
    sources.extend(generated);
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    sources.dedup_by(|a, b| a.path == b.path);

    if sources.is_empty() {
        println!("{} No source files found.", "!".yellow());
        return Ok(Vec::new());
    }

    let flags = compile_flags(config, toolkit);
    println!(
        "   {} Compiling {} translation unit(s)",
        "⚙".cyan(),
        sources.len()
    );

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let token = CancelToken::default();
    let objects: Mutex<Vec<CompiledObject>> = Mutex::new(Vec::with_capacity(sources.len()));
    let failed: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

    // Pool bounded to the lesser of hardware parallelism and unit count.
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(sources.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| BuildError::Io(io::Error::other(e)))?;

    pool.install(|| {
        sources.par_iter().for_each(|unit| {
            // Cooperative fail-fast: units polled after a failure do nothing.
            if token.is_tripped() {
                return;
            }

            let name = unit.path.file_name().unwrap_or_default().to_string_lossy();
            pb.set_message(format!("compiling {name}"));

            let obj = object_path(project, &obj_root, &unit.path);
            if let Some(parent) = obj.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    token.trip();
                    failed.lock().unwrap().push(unit.path.clone());
                    pb.println(format!("{} {}: {}", "x".red(), unit.path.display(), e));
                    return;
                }
            }

            let mut cmd = Command::new(&config.compiler);
            cmd.args(&flags).arg("-o").arg(&obj).arg(&unit.path);

            // Diagnostics accumulate in a private buffer and are flushed as
            // one contiguous unit, so concurrent tasks never interleave
            // mid-burst.
            let mut burst: Vec<String> = Vec::new();
            let result = run_streaming(cmd, |line| burst.push(format!("   [g++] {name}: {line}")));

            match result {
                Ok(status) if status.success() => {
                    if !burst.is_empty() {
                        pb.println(burst.join("\n"));
                    }
                    objects.lock().unwrap().push(CompiledObject {
                        object: obj,
                        source: unit.clone(),
                    });
                    pb.inc(1);
                }
                Ok(_) => {
                    token.trip();
                    burst.push(format!("{} Failed to compile {}", "x".red(), unit.path.display()));
                    pb.println(burst.join("\n"));
                    failed.lock().unwrap().push(unit.path.clone());
                }
                Err(e) => {
                    token.trip();
                    burst.push(format!("{} {}: {}", "x".red(), unit.path.display(), e));
                    pb.println(burst.join("\n"));
                    failed.lock().unwrap().push(unit.path.clone());
                }
            }
        });
    });
    pb.finish_and_clear();

    if token.is_tripped() {
        let mut failed = failed.into_inner().unwrap();
        failed.sort();
        return Err(BuildError::Compilation { failed });
    }

    let objects = objects.into_inner().unwrap();
    println!(
        "   {} Produced {} object file(s)",
        "✓".green(),
        objects.len()
    );
    Ok(objects)
}
