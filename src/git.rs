use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Fetches the recent commit log for the analyzed project, best-effort.
///
/// Runs `git log --oneline -10` in the project root and returns its lines.
/// History is optional metadata, so every failure mode (git missing from
/// the environment, a non-zero exit outside a repository, a timeout)
/// yields an empty list rather than an error.
pub fn recent_history(root: &Path, timeout: Duration) -> Vec<String> {
    let child = Command::new("git")
        .args(["log", "--oneline", "-10"])
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        // git is not installed or not spawnable.
        Err(_) => return Vec::new(),
    };

    // Poll instead of blocking so a hung git never hangs the analysis.
    // The -10 cap keeps the output well under the pipe buffer, so the
    // child can exit without us draining stdout first.
    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Vec::new();
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return Vec::new();
            }
        }
    };

    if !status.success() {
        return Vec::new();
    }

    let mut stdout = String::new();
    if let Some(mut out) = child.stdout.take() {
        if out.read_to_string(&mut stdout).is_err() {
            return Vec::new();
        }
    }

    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
