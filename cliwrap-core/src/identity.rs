//! The fixed identity of one external CLI: which binary, how to ask it for
//! its version, and whether it has to go through the host shell.

use serde::Deserialize;

fn default_version_argument() -> String {
    "--version".to_string()
}

/// Configuration of a concrete CLI, established once and shared by every
/// invocation made through it.
///
/// An identity without a binary is valid but unconfigured: invoking it fails
/// with [`CliError::Configuration`](crate::CliError::Configuration) before
/// anything is executed.
///
/// ```toml
/// binary = "gcloud"
/// version_argument = "version"
/// shell_required = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliIdentity {
    #[serde(default)]
    binary: Option<String>,
    #[serde(default = "default_version_argument")]
    version_argument: String,
    /// Some CLIs (gcloud on Windows, wrappers defined as shell functions)
    /// only resolve through a shell.
    #[serde(default)]
    shell_required: bool,
}

impl CliIdentity {
    /// Identity for `binary` with `--version` and no shell
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: Some(binary.into()),
            version_argument: default_version_argument(),
            shell_required: false,
        }
    }

    /// Identity with no binary set
    pub fn unconfigured() -> Self {
        Self {
            binary: None,
            version_argument: default_version_argument(),
            shell_required: false,
        }
    }

    pub fn with_version_argument(mut self, argument: impl Into<String>) -> Self {
        self.version_argument = argument.into();
        self
    }

    pub fn with_shell(mut self, shell_required: bool) -> Self {
        self.shell_required = shell_required;
        self
    }

    pub fn binary(&self) -> Option<&str> {
        self.binary.as_deref()
    }

    pub fn version_argument(&self) -> &str {
        &self.version_argument
    }

    pub fn shell_required(&self) -> bool {
        self.shell_required
    }
}
