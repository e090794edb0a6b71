//! Shell command execution.

use crate::error::{MonitorError, Result};
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a command with a deadline is polled after its pipes close.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or timed out).
    pub exit_code: Option<i32>,

    /// Standard output and standard error, interleaved in arrival order.
    pub output: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed after exceeding its timeout.
    pub timed_out: bool,
}

impl CommandResult {
    /// Create a result from a finished process.
    fn finished(status: ExitStatus, output: String, duration: Duration) -> Self {
        Self {
            exit_code: status.code(),
            output,
            duration,
            success: status.success(),
            timed_out: false,
        }
    }

    /// Create a result for a process killed at its deadline.
    fn timed_out(output: String, duration: Duration) -> Self {
        Self {
            exit_code: None,
            output,
            duration,
            success: false,
            timed_out: true,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Kill the command and everything it started once it has run this
    /// long (None = no timeout).
    pub timeout: Option<Duration>,
}

/// Execute a shell command, capturing combined stdout and stderr.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let spawn_failed = || MonitorError::CommandFailed {
        command: command.to_string(),
        code: None,
    };

    let (shell, flag) = system_shell();
    let mut cmd = Command::new(shell);
    cmd.arg(flag);
    cmd.arg(command);

    // Own process group, so a timeout can take down the whole tree.
    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!("Failed to spawn '{}': {}", command, e);
        spawn_failed()
    })?;

    let stdout = child.stdout.take().ok_or_else(spawn_failed)?;
    let stderr = child.stderr.take().ok_or_else(spawn_failed)?;

    let (tx, rx) = mpsc::channel();
    forward_chunks(stdout, tx.clone());
    forward_chunks(stderr, tx);

    let deadline = options.timeout.map(|timeout| start + timeout);
    let mut output = Vec::new();
    let mut timed_out = false;

    loop {
        let chunk = match deadline {
            Some(deadline) => {
                match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(chunk) => Some(chunk),
                    Err(RecvTimeoutError::Timeout) => {
                        timed_out = true;
                        None
                    }
                    Err(RecvTimeoutError::Disconnected) => None,
                }
            }
            None => rx.recv().ok(),
        };

        match chunk {
            Some(chunk) => output.extend_from_slice(&chunk),
            None => break,
        }
    }

    let status = if timed_out {
        None
    } else {
        wait_until(&mut child, deadline).map_err(|_| spawn_failed())?
    };

    let Some(status) = status else {
        kill(&mut child);
        output.extend(rx.try_iter().flatten());
        let output = String::from_utf8_lossy(&output).to_string();
        tracing::debug!("Command '{}' timed out after {:?}", command, start.elapsed());
        return Ok(CommandResult::timed_out(output, start.elapsed()));
    };

    let output = String::from_utf8_lossy(&output).to_string();
    Ok(CommandResult::finished(status, output, start.elapsed()))
}

/// Read a pipe on a background thread, sending each line as raw bytes.
fn forward_chunks<R: Read + Send + 'static>(pipe: R, tx: mpsc::Sender<Vec<u8>>) {
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        loop {
            let mut line = Vec::new();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            }
        }
    });
}

/// Wait for the child to exit, giving up at `deadline`.
///
/// Returns `Ok(None)` when the deadline passes first.
fn wait_until(child: &mut Child, deadline: Option<Instant>) -> std::io::Result<Option<ExitStatus>> {
    let Some(deadline) = deadline else {
        return child.wait().map(Some);
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
}

/// Kill the command and every process it started.
fn kill(child: &mut Child) {
    if let Err(e) = kill_tree(child) {
        tracing::debug!("Failed to kill timed out command: {}", e);
    }
    let _ = child.wait();
}

#[cfg(unix)]
fn kill_tree(child: &mut Child) -> std::io::Result<()> {
    let pgid = libc::pid_t::try_from(child.id())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    // SAFETY: plain syscall on the group created at spawn.
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) -> std::io::Result<()> {
    child.kill()
}

/// The system shell and the flag that passes it a command line.
///
/// Always `sh -c` on Unix, never the user's `$SHELL`.
fn system_shell() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd.exe", "/C")
    } else {
        ("sh", "-c")
    }
}
