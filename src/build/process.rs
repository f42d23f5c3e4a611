//! External process execution with incremental output capture.
//!
//! Every external tool (generator, compiler, linker, deployment tool) is run
//! through [`run_streaming`]: both output streams are drained line by line
//! while the process runs, so a long compile or deploy shows its diagnostics
//! as they are produced rather than in one burst at exit.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;

/// Run a command to completion, invoking `on_line` for every line of
/// combined stdout/stderr as it arrives. The callback runs on the calling
/// thread; callers that share an output sink buffer lines privately and
/// flush the buffer as one unit, so no lock is ever held across the
/// blocking reads here.
pub fn run_streaming(
    mut cmd: Command,
    mut on_line: impl FnMut(&str),
) -> io::Result<ExitStatus> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn()?;

    let (tx, rx) = mpsc::channel::<String>();
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(stderr, tx.clone()));
    }
    drop(tx);

    // Blocks until both pipe readers hang up.
    for line in rx {
        on_line(&line);
    }
    for reader in readers {
        let _ = reader.join();
    }
    child.wait()
}

fn spawn_reader(
    stream: impl Read + Send + 'static,
    tx: mpsc::Sender<String>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(stream).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    })
}

/// Render a command as the shell-style line it was invoked with, for logs
/// and link-failure diagnostics.
pub fn render_command(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}
