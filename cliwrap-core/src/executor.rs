//! Process executor trait and implementations
//!
//! The narrow seam between the invoker and the operating system:
//! - `SystemExecutor` runs real child processes via `std::process`
//! - `MockExecutor` replays scripted results and records every request
//!
//! Execution is blocking with no timeout: a child that never exits blocks
//! the caller forever.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};

/// Where the child's standard error goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirection {
    /// stderr shares the stdout pipe, output arrives interleaved
    MergeStderr,
    /// Only stdout is captured, stderr goes to the parent's stderr
    InheritStderr,
}

/// One process execution as handed to a [`ProcessExecutor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub program: String,
    pub args: Vec<String>,
    /// Run the joined command line through the host shell
    pub shell: bool,
    pub redirection: Redirection,
    /// `None` inherits the current directory of the calling process
    pub working_dir: Option<PathBuf>,
}

impl ExecRequest {
    /// Program and arguments joined with single spaces
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self) -> Command {
        let mut command = if self.shell {
            shell_command(&self.command_line())
        } else {
            let mut command = Command::new(&self.program);
            command.args(&self.args);
            command
        };

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        command
    }
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(line);
    command
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(line);
    command
}

/// Exit code and raw captured bytes of a finished child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub output: Vec<u8>,
}

impl ExecOutput {
    pub fn new(exit_code: i32, output: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }
}

/// Trait for process execution (testable)
///
/// An `Err` means the process could not be started; a started process that
/// fails is an `Ok` with a non-zero exit code.
pub trait ProcessExecutor: Send + Sync {
    fn execute(&self, request: &ExecRequest) -> io::Result<ExecOutput>;
}

impl<T: ProcessExecutor + ?Sized> ProcessExecutor for &T {
    fn execute(&self, request: &ExecRequest) -> io::Result<ExecOutput> {
        (**self).execute(request)
    }
}

impl<T: ProcessExecutor + ?Sized> ProcessExecutor for Arc<T> {
    fn execute(&self, request: &ExecRequest) -> io::Result<ExecOutput> {
        (**self).execute(request)
    }
}

/// Real executor using `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn execute(&self, request: &ExecRequest) -> io::Result<ExecOutput> {
        let mut command = request.to_command();

        match request.redirection {
            Redirection::MergeStderr => {
                let (mut reader, writer) = io::pipe()?;
                command.stdout(writer.try_clone()?).stderr(writer);
                let mut child = command.spawn()?;

                // The command still owns the parent's copies of the write end;
                // the reader only sees EOF once they are closed.
                drop(command);

                let mut output = Vec::new();
                let drained = reader.read_to_end(&mut output);
                let status = child.wait()?;
                drained?;

                Ok(ExecOutput {
                    exit_code: exit_code(status),
                    output,
                })
            }
            Redirection::InheritStderr => {
                let output = command
                    .stdout(Stdio::piped())
                    .stderr(Stdio::inherit())
                    .output()?;

                Ok(ExecOutput {
                    exit_code: exit_code(output.status),
                    output: output.stdout,
                })
            }
        }
    }
}

/// Exit code of a finished child; negated signal number if it was killed
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

/// Scripted result for [`MockExecutor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    Exit(ExecOutput),
    LaunchFailure(io::ErrorKind),
}

/// Mock executor for testing
///
/// Answers requests from a queue of responses, falling back to a silent
/// exit 0 when the queue is empty, and keeps every request it receives.
#[derive(Debug, Default)]
pub struct MockExecutor {
    responses: Mutex<VecDeque<MockResponse>>,
    calls: Mutex<Vec<ExecRequest>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a finished process result for the next invocation
    pub fn add_response(&self, output: ExecOutput) {
        self.push(MockResponse::Exit(output));
    }

    /// Queue a launch failure for the next invocation
    pub fn add_launch_failure(&self, kind: io::ErrorKind) {
        self.push(MockResponse::LaunchFailure(kind));
    }

    /// Every request received so far, oldest first
    pub fn calls(&self) -> Vec<ExecRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }
}

impl ProcessExecutor for MockExecutor {
    fn execute(&self, request: &ExecRequest) -> io::Result<ExecOutput> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(MockResponse::Exit(output)) => Ok(output),
            Some(MockResponse::LaunchFailure(kind)) => Err(io::Error::from(kind)),
            None => Ok(ExecOutput::new(0, Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(program: &str, args: &[&str]) -> ExecRequest {
        ExecRequest {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            shell: false,
            redirection: Redirection::MergeStderr,
            working_dir: None,
        }
    }

    #[test]
    fn command_line_joins_with_spaces() {
        let req = request("dummy_cli", &["abc", "xyz"]);
        assert_eq!(req.command_line(), "dummy_cli abc xyz");
        assert_eq!(request("dummy_cli", &[]).command_line(), "dummy_cli");
    }

    #[test]
    fn mock_executor_returns_queued_responses_in_order() {
        let mock = MockExecutor::new();
        mock.add_response(ExecOutput::new(0, "first"));
        mock.add_response(ExecOutput::new(3, "second"));

        let req = request("dummy_cli", &[]);
        assert_eq!(mock.execute(&req).unwrap(), ExecOutput::new(0, "first"));
        assert_eq!(mock.execute(&req).unwrap(), ExecOutput::new(3, "second"));
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn mock_executor_empty_queue_succeeds_silently() {
        let mock = MockExecutor::new();
        let output = mock.execute(&request("dummy_cli", &[])).unwrap();
        assert_eq!(output.exit_code, 0);
        assert!(output.output.is_empty());
    }

    #[test]
    fn mock_executor_launch_failure() {
        let mock = MockExecutor::new();
        mock.add_launch_failure(io::ErrorKind::PermissionDenied);

        let err = mock.execute(&request("dummy_cli", &[])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(mock.calls(), vec![request("dummy_cli", &[])]);
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_merges_stderr() {
        let req = request("sh", &["-c", "echo out; echo err 1>&2"]);
        let output = SystemExecutor.execute(&req).unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(String::from_utf8_lossy(&output.output), "out\nerr\n");
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_inherit_captures_stdout_only() {
        let mut req = request("sh", &["-c", "echo out; echo err 1>&2"]);
        req.redirection = Redirection::InheritStderr;
        let output = SystemExecutor.execute(&req).unwrap();

        assert_eq!(String::from_utf8_lossy(&output.output), "out\n");
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_reports_signal_as_negative_code() {
        let req = request("sh", &["-c", "kill -9 $$"]);
        let output = SystemExecutor.execute(&req).unwrap();
        assert_eq!(output.exit_code, -9);
    }

    #[test]
    fn system_executor_missing_binary_is_launch_error() {
        let req = request("cliwrap-definitely-not-installed", &[]);
        let err = SystemExecutor.execute(&req).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
