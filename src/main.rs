//! # qbx CLI Entry Point
//!
//! Parses CLI arguments using clap and routes commands to the pipeline.
//!
//! ## Command Structure
//!
//! - **Build**: `build` - run the whole pipeline (generate, compile, link,
//!   optionally package)
//! - **Maintenance**: `clean`, `init`
//! - **Convenience**: `run` - launch the previously built executable

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use qbx::build;
use qbx::config;

#[derive(Parser)]
#[command(name = "qbx")]
#[command(about = "One-shot Qt build orchestrator", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full build pipeline
    Build {
        /// Package the build with its runtime dependencies after linking
        #[arg(long)]
        pack: bool,
        /// Statically link the runtime
        #[arg(long = "static")]
        static_build: bool,
        /// Configuration file
        #[arg(long, default_value = "qbx.toml")]
        config: PathBuf,
    },
    /// Remove build intermediates (generator output, objects, archives)
    Clean {
        /// Also remove the output directory
        #[arg(long)]
        dist: bool,
        /// Configuration file
        #[arg(long, default_value = "qbx.toml")]
        config: PathBuf,
    },
    /// Create a default qbx.toml in the current directory
    Init,
    /// Launch the previously built executable
    Run {
        /// Configuration file
        #[arg(long, default_value = "qbx.toml")]
        config: PathBuf,
        /// Arguments passed to the target program
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

const DEFAULT_CONFIG: &str = r#"# qbx build configuration

# Root of the Qt toolkit installation (must contain bin/, include/, lib/).
toolkit_path = "C:/Qt/6.5.0/mingw_64"

project_path = "."
output_dir = "./dist"
output_name = "myapp"

# One of: c++11, c++14, c++17, c++20
language_standard = "c++17"

static_build = false
pack_after_build = false

modules = ["Core", "Gui", "Widgets"]
module_version = 6
subsystem = "windows"
extra_lib_paths = []
"#;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            pack,
            static_build,
            config: config_path,
        } => {
            let mut config = config::load_config(&config_path)?;
            if pack {
                config.pack_after_build = true;
            }
            if static_build {
                config.static_build = true;
            }
            if let Err(e) = build::run_build(&config) {
                eprintln!("{} {}", "x".red(), e);
                std::process::exit(1);
            }
        }
        Commands::Clean {
            dist,
            config: config_path,
        } => {
            // Clean works without a configuration file, falling back to the
            // current directory.
            let (project, output_dir) = match config::load_config(&config_path) {
                Ok(config) => (config.project_path.clone(), Some(config.output_dir.clone())),
                Err(_) => (PathBuf::from("."), None),
            };
            build::clean(&project, if dist { output_dir.as_deref() } else { None })?;
        }
        Commands::Init => {
            init_config(Path::new("qbx.toml"))?;
        }
        Commands::Run {
            config: config_path,
            args,
        } => {
            let config = config::load_config(&config_path)?;
            let exe_path = config.executable_path();
            if !exe_path.exists() {
                return Err(anyhow::anyhow!(
                    "Executable not found: {}\n\n\
                    💡 Tip: Run 'qbx build' first.",
                    exe_path.display()
                ));
            }
            println!("{} Running {}\n", "▶".green(), exe_path.display());
            let status = Command::new(&exe_path)
                .args(&args)
                .status()
                .with_context(|| format!("Failed to launch {}", exe_path.display()))?;
            if !status.success() {
                std::process::exit(status.code().unwrap_or(1));
            }
        }
    }
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} {} already exists, not overwriting.", "!".yellow(), path.display());
        return Ok(());
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Created {}", "✓".green(), path.display());
    Ok(())
}
