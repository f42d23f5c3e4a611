//! Link-step assembly.
//!
//! One compiler-driver invocation turns the full object set into the final
//! executable. Object order in the command line is irrelevant; library
//! placement is fixed by the toolchain contract below.

use super::CompiledObject;
use super::process::{render_command, run_streaming};
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::toolkit::Toolkit;
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// System libraries linked before the toolkit modules.
const SYSTEM_LIBS: &[&str] = &["-lz", "-lopengl32", "-lGLU32", "-lgdi32", "-luser32"];

/// Runtime libraries linked after the toolkit modules.
const RUNTIME_LIBS: &[&str] = &["-lmingw32", "-ldwmapi"];

/// Full linker argument vector (excluding the driver itself) for the given
/// objects and output path.
pub fn link_command(
    config: &BuildConfig,
    toolkit: &Toolkit,
    objects: &[PathBuf],
    exe_path: &Path,
) -> Vec<String> {
    let mut args = vec![
        format!("-Wl,-subsystem,{}", config.subsystem),
        format!("-L{}", toolkit.lib_dir().display()),
    ];
    for path in &config.extra_lib_paths {
        args.push(format!("-L{}", path.display()));
    }
    if config.static_build {
        // Force static linking of the runtime, then restore dynamic linking
        // for system libraries.
        args.extend(
            [
                "-static",
                "-static-libgcc",
                "-static-libstdc++",
                "-Wl,-Bstatic",
                "-lwinpthread",
                "-Wl,-Bdynamic",
            ]
            .map(String::from),
        );
    }
    args.push("-o".to_string());
    args.push(exe_path.display().to_string());
    args.extend(objects.iter().map(|o| o.display().to_string()));
    args.extend(SYSTEM_LIBS.iter().map(|s| s.to_string()));
    for module in &config.modules {
        args.push(format!("-lQt{}{}", config.module_version, module));
    }
    args.extend(RUNTIME_LIBS.iter().map(|s| s.to_string()));
    args
}

/// Link all objects into the output executable; creates the output
/// directory if absent.
pub fn link_executable(
    config: &BuildConfig,
    toolkit: &Toolkit,
    objects: &[CompiledObject],
) -> Result<PathBuf, BuildError> {
    fs::create_dir_all(&config.output_dir)?;
    let exe_path = config.executable_path();

    let object_paths: Vec<PathBuf> = objects.iter().map(|o| o.object.clone()).collect();
    let args = link_command(config, toolkit, &object_paths, &exe_path);

    let mut cmd = Command::new(&config.compiler);
    cmd.args(&args);
    let command_line = render_command(&cmd);
    println!("   {} Linking {}", "🔗".cyan(), exe_path.display());

    let status = run_streaming(cmd, |line| println!("   [ld] {line}"))?;
    if !status.success() {
        return Err(BuildError::Link {
            command: command_line,
            code: status.code().unwrap_or(-1),
        });
    }

    println!("   {} Executable: {}", "✓".green(), exe_path.display());
    Ok(exe_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_toolkit() -> Toolkit {
        Toolkit {
            root: PathBuf::from("/opt/qt"),
            moc: PathBuf::from("/opt/qt/bin/moc"),
            windeployqt: PathBuf::from("/opt/qt/bin/windeployqt"),
        }
    }

    #[test]
    fn link_command_matches_tool_contract() {
        let config = BuildConfig::parse(
            r#"
            toolkit_path = "/opt/qt"
            output_name = "app"
            modules = ["Core", "Gui"]
            module_version = 6
            "#,
        )
        .unwrap();
        let objects = vec![PathBuf::from("obj/main.o"), PathBuf::from("obj/w.o")];
        let exe = PathBuf::from("dist/app.exe");
        let args = link_command(&config, &test_toolkit(), &objects, &exe);
        assert_eq!(
            args,
            vec![
                "-Wl,-subsystem,windows",
                "-L/opt/qt/lib",
                "-o",
                "dist/app.exe",
                "obj/main.o",
                "obj/w.o",
                "-lz",
                "-lopengl32",
                "-lGLU32",
                "-lgdi32",
                "-luser32",
                "-lQt6Core",
                "-lQt6Gui",
                "-lmingw32",
                "-ldwmapi",
            ]
        );
    }

    #[test]
    fn static_build_inserts_static_flag_block() {
        let config = BuildConfig::parse(
            r#"
            toolkit_path = "/opt/qt"
            static_build = true
            extra_lib_paths = ["/opt/extra"]
            "#,
        )
        .unwrap();
        let exe = PathBuf::from("dist/myapp.exe");
        let args = link_command(&config, &test_toolkit(), &[], &exe);

        let extra_pos = args.iter().position(|a| a == "-L/opt/extra").unwrap();
        let static_pos = args.iter().position(|a| a == "-static").unwrap();
        let out_pos = args.iter().position(|a| a == "-o").unwrap();
        assert!(extra_pos < static_pos && static_pos < out_pos);
        assert!(args.contains(&"-Wl,-Bstatic".to_string()));
        assert!(args.contains(&"-lwinpthread".to_string()));
        assert!(args.contains(&"-Wl,-Bdynamic".to_string()));
    }

    #[test]
    fn module_version_prefixes_module_libraries() {
        let config = BuildConfig::parse(
            r#"
            toolkit_path = "/opt/qt"
            modules = ["Widgets"]
            module_version = 5
            "#,
        )
        .unwrap();
        let exe = Path::new("dist/myapp.exe").to_path_buf();
        let args = link_command(&config, &test_toolkit(), &[], &exe);
        assert!(args.contains(&"-lQt5Widgets".to_string()));
    }
}
