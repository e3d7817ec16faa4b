use crate::error::{AurError, Result};
use crate::helpers::builder::ResolvedCommand;
use crate::ui;
use std::io::Read;
use std::process::{Child, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured output of one finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes resolved commands. The seam the apply pipeline is tested through.
pub trait CommandRunner {
    fn run(&self, cmd: &ResolvedCommand, timeout: Option<Duration>) -> Result<ExecutionResult>;
}

/// Runs commands as real child processes under the invoking user. Never elevates.
///
/// Each child leads its own process group so a timeout or Ctrl-C takes down
/// everything the helper forked (makepkg, pacman, compilers), not only the helper.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    interrupted: fn() -> bool,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            interrupted: ui::is_interrupted,
        }
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `interrupted` instead of the process-wide Ctrl-C flag.
    pub fn with_interrupt_check(interrupted: fn() -> bool) -> Self {
        Self { interrupted }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, cmd: &ResolvedCommand, timeout: Option<Duration>) -> Result<ExecutionResult> {
        let label = cmd.display();
        ui::verbose(&format!(
            "running `{}` in {}",
            crate::utils::sanitize::sanitize_for_display(&label),
            cmd.working_dir.display()
        ));

        let mut command = cmd.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|e| AurError::SpawnFailure {
            command: label.clone(),
            reason: e.to_string(),
        })?;
        let mut child = ReapOnDrop::new(child);

        let stdout = child
            .child
            .stdout
            .take()
            .ok_or_else(|| AurError::SpawnFailure {
                command: label.clone(),
                reason: "Failed to capture stdout".to_string(),
            })?;
        let stderr = child
            .child
            .stderr
            .take()
            .ok_or_else(|| AurError::SpawnFailure {
                command: label.clone(),
                reason: "Failed to capture stderr".to_string(),
            })?;

        let stdout_thread = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = std::io::BufReader::new(stdout).read_to_end(&mut buf);
            buf
        });
        let stderr_thread = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = std::io::BufReader::new(stderr).read_to_end(&mut buf);
            buf
        });

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    // after a kill the reader threads are left detached: a descendant
                    // that escaped the group may still hold the pipes open
                    if (self.interrupted)() {
                        child.kill();
                        return Err(AurError::Interrupted);
                    }
                    if let Some(limit) = timeout
                        && start.elapsed() > limit
                    {
                        child.kill();
                        return Err(AurError::Timeout {
                            command: label,
                            secs: limit.as_secs(),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(AurError::SpawnFailure {
                        command: label,
                        reason: e.to_string(),
                    });
                }
            }
        };

        let stdout = stdout_thread.join().unwrap_or_default();
        let stderr = stderr_thread.join().unwrap_or_default();
        let exit_code = exit_code(status);
        ui::verbose(&format!("{} exited with {}", cmd.program, exit_code));

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code,
        })
    }
}

/// Owns a child and kills + waits for it on drop unless it was already reaped,
/// so no early return or panic leaves a zombie behind.
struct ReapOnDrop {
    child: Child,
    reaped: bool,
}

impl ReapOnDrop {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        let status = self.child.try_wait()?;
        if status.is_some() {
            self.reaped = true;
        }
        Ok(status)
    }

    /// SIGKILL the child's whole process group, then reap the child.
    fn kill(&mut self) {
        self.kill_group();
        let _ = self.child.kill();
        if self.child.wait().is_ok() {
            self.reaped = true;
        }
    }

    #[cfg(unix)]
    fn kill_group(&self) {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(self.child.id()) {
            let _ = killpg(Pid::from_raw(pid), Signal::SIGKILL);
        }
    }

    #[cfg(not(unix))]
    fn kill_group(&self) {}
}

impl Drop for ReapOnDrop {
    fn drop(&mut self) {
        if !self.reaped {
            self.kill();
        }
    }
}

/// Exit code, with signal deaths mapped to the shell convention `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::helpers::registry;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn shell(script: &str) -> ResolvedCommand {
        ResolvedCommand {
            helper: registry::fallback(),
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            working_dir: std::env::temp_dir(),
            env: vec![("LC_ALL".to_string(), "C".to_string())],
        }
    }

    #[test]
    fn captures_streams_and_exit_code() {
        let result = ProcessRunner::new()
            .run(&shell("echo out; echo err >&2; exit 3"), None)
            .unwrap();
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit_code, 3);
        assert!(!result.success());
    }

    #[test]
    fn passes_environment_overrides() {
        let result = ProcessRunner::new().run(&shell("printf %s \"$LC_ALL\""), None).unwrap();
        assert_eq!(result.stdout, "C");
    }

    #[test]
    fn stdin_is_not_interactive() {
        let result = ProcessRunner::new()
            .run(&shell("if read line; then echo got; else echo eof; fi"), None)
            .unwrap();
        assert_eq!(result.stdout.trim(), "eof");
    }

    #[test]
    fn missing_binary_is_spawn_failure() {
        let cmd = ResolvedCommand {
            program: "aurctl-definitely-not-installed".to_string(),
            args: vec![],
            ..shell("")
        };
        assert!(matches!(
            ProcessRunner::new().run(&cmd, None),
            Err(AurError::SpawnFailure { .. })
        ));
    }

    #[test]
    fn missing_working_dir_is_spawn_failure() {
        let cmd = ResolvedCommand {
            working_dir: PathBuf::from("/nonexistent/aurctl/dir"),
            ..shell("true")
        };
        assert!(matches!(
            ProcessRunner::new().run(&cmd, None),
            Err(AurError::SpawnFailure { .. })
        ));
    }

    #[test]
    fn timeout_kills_child() {
        let start = Instant::now();
        let err = ProcessRunner::new()
            .run(&shell("exec sleep 5"), Some(Duration::from_millis(200)))
            .unwrap_err();
        assert!(matches!(err, AurError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn timeout_kills_forked_descendants() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("built");
        let script = format!("(sleep 1; touch '{}') & sleep 6; echo done", marker.display());

        let start = Instant::now();
        let err = ProcessRunner::new()
            .run(&shell(&script), Some(Duration::from_millis(200)))
            .unwrap_err();
        assert!(matches!(err, AurError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(3));

        thread::sleep(Duration::from_millis(1500));
        assert!(!marker.exists());
    }

    static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

    #[test]
    fn interrupt_kills_and_reports_interrupted() {
        let stopper = thread::spawn(|| {
            thread::sleep(Duration::from_millis(200));
            STOP_REQUESTED.store(true, Ordering::SeqCst);
        });

        let start = Instant::now();
        let runner = ProcessRunner::with_interrupt_check(|| STOP_REQUESTED.load(Ordering::SeqCst));
        let err = runner.run(&shell("sleep 6 & wait"), None).unwrap_err();
        stopper.join().unwrap();

        assert!(matches!(err, AurError::Interrupted));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn signal_death_maps_to_128_plus_signal() {
        let result = ProcessRunner::new().run(&shell("kill -9 $$"), None).unwrap();
        assert_eq!(result.exit_code, 137);
    }
}
