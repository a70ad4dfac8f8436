//! Runs one configured CLI on request.
//!
//! Every call is a single blocking child-process execution: the command line
//! is logged, stderr is merged into stdout, the captured bytes are decoded as
//! UTF-8 and a non-zero exit code becomes [`CliError::CommandFailed`].
//! The invoker keeps no state between calls.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::error::{CliError, Result};
use crate::executor::{ExecRequest, ProcessExecutor, Redirection, SystemExecutor};
use crate::identity::CliIdentity;

const BINARY_NOT_SET: &str = "CLI binary is not set";

/// Arguments and options of a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    log_output: bool,
    working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Invocation with `args` (not including the binary), output logged,
    /// current directory inherited
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            log_output: true,
            working_dir: None,
        }
    }

    /// Whether a successful run logs the captured output or only a notice
    pub fn log_output(mut self, log_output: bool) -> Self {
        self.log_output = log_output;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn logs_output(&self) -> bool {
        self.log_output
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

/// Invoker bound to one [`CliIdentity`]
///
/// ```no_run
/// use cliwrap_core::{CliIdentity, ProcessInvoker};
///
/// let git = ProcessInvoker::new(CliIdentity::new("git"));
/// let version = git.version()?;
/// let status = git.run(["status", "--short"])?;
/// # Ok::<(), cliwrap_core::CliError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProcessInvoker<E = SystemExecutor> {
    identity: CliIdentity,
    executor: E,
}

impl ProcessInvoker<SystemExecutor> {
    /// Invoker that runs real child processes
    pub fn new(identity: CliIdentity) -> Self {
        Self::with_executor(identity, SystemExecutor)
    }
}

impl<E: ProcessExecutor> ProcessInvoker<E> {
    pub fn with_executor(identity: CliIdentity, executor: E) -> Self {
        Self { identity, executor }
    }

    pub fn identity(&self) -> &CliIdentity {
        &self.identity
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Version reported by the CLI, outer whitespace trimmed.
    ///
    /// May span several lines depending on the CLI. The output itself is not
    /// logged; the caller decides whether to.
    pub fn version(&self) -> Result<String> {
        let invocation = Invocation::new([self.identity.version_argument()]).log_output(false);
        self.execute(&invocation).map(|output| output.trim().to_string())
    }

    /// Run the CLI with `args`, logging its output on success
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute(&Invocation::new(args))
    }

    /// Run the CLI as described by `invocation` and return its combined
    /// stdout/stderr.
    ///
    /// # Errors
    ///
    /// - [`CliError::Configuration`] if the identity has no binary; nothing is
    ///   executed
    /// - [`CliError::CommandFailed`] if the process exits non-zero
    /// - [`CliError::Launch`] with the untouched OS error if the process
    ///   cannot be started
    pub fn execute(&self, invocation: &Invocation) -> Result<String> {
        let Some(binary) = self.identity.binary() else {
            error!("{}", BINARY_NOT_SET);
            return Err(CliError::configuration(BINARY_NOT_SET));
        };

        let request = ExecRequest {
            program: binary.to_string(),
            args: invocation.args.clone(),
            shell: self.identity.shell_required(),
            redirection: Redirection::MergeStderr,
            working_dir: invocation.working_dir.clone(),
        };
        let command_line = request.command_line();

        info!("Executing {} CLI: {}", binary, command_line);

        let result = self.executor.execute(&request).map_err(|err| {
            error!("Unable to launch {} CLI ({}): {}", binary, command_line, err);
            CliError::Launch(err)
        })?;

        let output = String::from_utf8_lossy(&result.output).into_owned();

        if result.exit_code != 0 {
            error!(
                "Unable to execute {} CLI ({}), error={}\n{}",
                binary, command_line, result.exit_code, output
            );
            return Err(CliError::command_failed(binary, result.exit_code));
        }

        if invocation.log_output {
            info!(
                "{} CLI ({}) executed successfully:\n{}",
                binary, command_line, output
            );
        } else {
            info!("{} CLI ({}) executed successfully", binary, command_line);
        }

        Ok(output)
    }
}
