//! Pipeline controller.
//!
//! Sequences validation, code generation, compilation, linking and optional
//! packaging. Data flows forward only; every stage failure is fatal to the
//! run and there is no partial recovery at any level.

use super::{BuildOutcome, codegen, compile, link};
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::package;
use crate::toolkit::Toolkit;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

/// Run the whole build pipeline for one configuration.
pub fn run_build(config: &BuildConfig) -> Result<BuildOutcome, BuildError> {
    let start = Instant::now();
    println!("{} Building {}", "▶".green(), config.output_name.bold());
    println!("   Project: {}", config.project_path.display());
    println!("   Toolkit: {}", config.toolkit_path.display());
    println!(
        "   Linkage: {}",
        if config.static_build { "static" } else { "dynamic" }
    );

    match run_stages(config) {
        Ok((executable, archive)) => {
            let elapsed = start.elapsed();
            println!("{} Build finished in {:.2?}", "✓".green(), elapsed);
            Ok(BuildOutcome {
                executable,
                archive,
                elapsed,
            })
        }
        Err(e) => {
            println!(
                "{} Build failed after {:.2?} ({} stage)",
                "x".red(),
                start.elapsed(),
                e.stage()
            );
            Err(e)
        }
    }
}

fn run_stages(config: &BuildConfig) -> Result<(PathBuf, Option<PathBuf>), BuildError> {
    let toolkit = Toolkit::validate(&config.toolkit_path)?;
    let generated = codegen::generate_glue(config, &toolkit)?;
    let objects = compile::compile_all(config, &toolkit, generated)?;
    let executable = link::link_executable(config, &toolkit, &objects)?;

    let archive = if config.pack_after_build {
        Some(package::package_build(config, &toolkit, &executable)?)
    } else {
        None
    };
    Ok((executable, archive))
}
