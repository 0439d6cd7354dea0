//! Optional journald forwarding via systemd-cat.
//!
//! Best-effort: a failed forward is logged at debug level and never fails
//! a run.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use tracing::debug;

const SYSTEMD_CAT: &str = "systemd-cat";

pub fn systemd_cat_available() -> bool {
    Command::new(SYSTEMD_CAT)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Forward a single log line to journald under `tag`.
///
/// Returns whether `systemd-cat` accepted the line.
pub fn forward_line(tag: &str, line: &str) -> bool {
    if !systemd_cat_available() {
        debug!("systemd-cat not available; skipping journald forward");
        return false;
    }
    match pipe_line(SYSTEMD_CAT, tag, line) {
        Ok(accepted) => accepted,
        Err(e) => {
            debug!(error = %e, "journald forward failed");
            false
        }
    }
}

/// Run `program -t <tag>` and feed it `line` on stdin.
fn pipe_line(program: &str, tag: &str, line: &str) -> io::Result<bool> {
    let mut child = Command::new(program)
        .arg("-t")
        .arg(tag)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // Dropping stdin closes the pipe so the child sees EOF.
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(line.as_bytes())?;
        stdin.write_all(b"\n")?;
    }

    Ok(child.wait()?.success())
}
