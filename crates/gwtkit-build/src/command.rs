use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Captured output from a finished subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// `stdout` + `stderr`, newline-separated when both are present.
    pub fn combined(&self) -> String {
        let mut s = String::new();
        s.push_str(&self.stdout);
        if !self.stderr.is_empty() {
            if !s.is_empty() && !s.ends_with('\n') {
                s.push('\n');
            }
            s.push_str(&self.stderr);
        }
        s
    }
}

pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runs the process synchronously with piped output.
///
/// The timeout is best-effort: the child is polled and killed when it is
/// exceeded, but grandchild processes are not tracked.
#[derive(Debug, Clone, Default)]
pub struct DefaultCommandRunner {
    pub timeout: Option<Duration>,
}

impl CommandRunner for DefaultCommandRunner {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> io::Result<CommandOutput> {
        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                io::Error::new(
                    err.kind(),
                    format!("failed to spawn `{}`: {err}", program.display()),
                )
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("failed to capture stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("failed to capture stderr"))?;

        // Drain both pipes off-thread so a chatty child cannot deadlock
        // against a full pipe buffer.
        let stdout_handle = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        });
        let stderr_handle = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            buf
        });

        let status = match self.timeout {
            None => child.wait(),
            Some(timeout) => {
                let start = Instant::now();
                loop {
                    if let Some(status) = child.try_wait()? {
                        break Ok(status);
                    }
                    if start.elapsed() >= timeout {
                        break Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            format!(
                                "`{}` timed out after {timeout:?}",
                                program.display()
                            ),
                        ));
                    }
                    thread::sleep(Duration::from_millis(20));
                }
            }
        };

        if status.is_err() {
            let _ = child.kill();
            let _ = child.wait();
        }

        let stdout_bytes = stdout_handle.join().unwrap_or_default();
        let stderr_bytes = stderr_handle.join().unwrap_or_default();
        let status = status?;

        Ok(CommandOutput {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_output_joins_streams() {
        let output = CommandOutput {
            exit_code: Some(0),
            stdout: "compiling".to_string(),
            stderr: "warning".to_string(),
        };
        assert_eq!(output.combined(), "compiling\nwarning");
    }

    #[test]
    fn combined_output_skips_empty_stderr() {
        let output = CommandOutput {
            exit_code: Some(0),
            stdout: "done\n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(output.combined(), "done\n");
    }

    #[cfg(unix)]
    #[test]
    fn runs_a_real_process() {
        let runner = DefaultCommandRunner::default();
        let output = runner
            .run(
                Path::new("."),
                Path::new("/bin/sh"),
                &["-c".to_string(), "echo hi >&2; exit 3".to_string()],
            )
            .unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stderr.trim(), "hi");
    }
}
