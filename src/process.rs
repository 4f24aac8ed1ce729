use crate::error::{ReleaseError, Result};
use std::process::{Command, Output};

/// Creates a `Command` that can resolve `.cmd` and `.bat` scripts on Windows.
///
/// npm and friends are installed as batch scripts on Windows, which
/// `std::process::Command` does not resolve on its own. The invocation is
/// routed through `cmd.exe /C` there.
pub fn command(program: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", program]);
        cmd
    } else {
        Command::new(program)
    }
}

/// Human-readable rendering of a command line, for messages
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|arg| arg.to_string_lossy().into_owned()));
    if cfg!(windows) && parts.len() > 2 && parts[0] == "cmd" && parts[1] == "/C" {
        parts.drain(..2);
    }
    parts.join(" ")
}

/// Run a command to completion and capture its output, whatever its status
pub fn output(cmd: &mut Command) -> Result<Output> {
    cmd.output().map_err(|source| ReleaseError::Spawn {
        command: describe(cmd),
        source,
    })
}

/// Run a command and return its trimmed stdout.
///
/// # Returns
/// * `Ok(String)` - Stdout of a command that exited with status 0
/// * `Err` - If the command could not be started or exited non-zero; the
///   error carries both captured streams
pub fn run(cmd: &mut Command) -> Result<String> {
    let out = output(cmd)?;
    if !out.status.success() {
        return Err(failure(cmd, &out));
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// Build the error for a command that exited unsuccessfully
pub fn failure(cmd: &Command, out: &Output) -> ReleaseError {
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let mut captured = String::new();
    if !stdout.trim().is_empty() {
        captured.push_str(&format!("Stdout: {}\n", stdout.trim()));
    }
    if !stderr.trim().is_empty() {
        captured.push_str(&format!("Stderr: {}", stderr.trim()));
    }

    ReleaseError::Process {
        command: describe(cmd),
        code: out.status.code().unwrap_or(-1),
        output: captured.trim_end().to_string(),
    }
}
