//! Build artifact cleanup.
//!
//! Cleanup is an explicit operation, never part of the build pipeline: the
//! pipeline only ever clears its own generator-output directory. `qbx clean`
//! removes intermediates under the project root; `--dist` also removes the
//! output directory.

use super::{EXCLUDED_DIRS, codegen, compile, scan};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

pub fn clean(project: &Path, output_dir: Option<&Path>) -> Result<()> {
    let mut removed = 0usize;

    for dir in [codegen::MOC_GEN_DIR, compile::OBJ_DIR, "build"] {
        let path = project.join(dir);
        if path.exists() {
            fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            println!("   {} Removed {}", "🗑".red(), path.display());
            removed += 1;
        }
    }

    // Stray objects outside the artifact directories.
    for obj in scan::scan_files(project, EXCLUDED_DIRS, ".o") {
        fs::remove_file(&obj).with_context(|| format!("Failed to remove {}", obj.display()))?;
        println!("   {} Removed {}", "🗑".red(), obj.display());
        removed += 1;
    }

    if let Some(output_dir) = output_dir {
        if output_dir.exists() {
            fs::remove_dir_all(output_dir)
                .with_context(|| format!("Failed to remove {}", output_dir.display()))?;
            println!("   {} Removed {}", "🗑".red(), output_dir.display());
            removed += 1;
        }
    }

    if removed > 0 {
        println!("{} Clean complete ({removed} item(s)).", "✓".green());
    } else {
        println!("{} Nothing to clean", "!".yellow());
    }
    Ok(())
}
