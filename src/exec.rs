use std::collections::HashMap;
use std::path::Path;
use std::process::Command as ProcessCommand;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::Error;

/// Result of running a shell hook with captured output.
#[derive(Debug)]
pub struct HookOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

/// Runs `cmd` through `sh -c` in `cwd`, capturing stdout and stderr.
///
/// # Errors
///
/// Returns `Error::Io` if the shell cannot be spawned. A command that runs
/// and exits non-zero is not an error here; check [`HookOutput::success`].
pub fn run_hook(
    cmd: &str,
    cwd: &Path,
    env: &HashMap<String, String>,
) -> Result<HookOutput, Error> {
    debug!("Running hook in {}: {cmd}", cwd.display());
    let start = Instant::now();
    let output = ProcessCommand::new("sh")
        .arg("-c")
        .arg(cmd)
        .current_dir(cwd)
        .envs(env)
        .output()
        .map_err(|e| Error::io(cwd, e))?;
    let duration = start.elapsed();

    Ok(HookOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration,
    })
}

/// Runs `cmd` and turns a non-zero exit into `Error::ProcessFailed` with
/// `message` as its headline. On success the hook's stdout is logged line
/// by line at info level and its stderr at debug level.
///
/// # Errors
///
/// Returns `Error::Io` if the shell cannot be spawned, or
/// `Error::ProcessFailed` if the hook fails.
pub fn run_checked(
    cmd: &str,
    cwd: &Path,
    env: &HashMap<String, String>,
    message: &str,
) -> Result<(), Error> {
    let output = run_hook(cmd, cwd, env)?;
    if !output.success {
        return Err(Error::ProcessFailed {
            message: message.to_string(),
            exit_code: output.exit_code,
            stderr: output.stderr,
        });
    }
    for line in output.stdout.lines() {
        info!("{line}");
    }
    for line in output.stderr.lines() {
        debug!("{line}");
    }
    debug!("Hook finished in {:.1}s", output.duration.as_secs_f64());
    Ok(())
}
