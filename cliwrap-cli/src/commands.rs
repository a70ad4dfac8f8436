//! Command implementations for the cliwrap CLI
//!
//! Commands: list, version, run

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use cliwrap_core::{CliIdentity, Invocation, ProcessInvoker};
use tracing::debug;

use crate::config::Registry;

#[derive(Parser, Debug)]
pub struct VersionArgs {
    /// Name of the CLI in the registry
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Name of the CLI in the registry
    pub name: String,

    /// Working directory for the child process
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Log only a success notice instead of the full output
    #[arg(long)]
    pub quiet_output: bool,

    /// Arguments passed through to the CLI
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Load the registry and pick the identity registered as `name`
fn select_identity(config_path: &Path, name: &str) -> Result<CliIdentity> {
    let registry = Registry::load(config_path)?;
    debug!("loaded {} CLI(s) from {}", registry.clis.len(), config_path.display());

    let identity = registry.identity(name)?.clone();
    debug!("selected CLI '{}': {:?}", name, identity);
    Ok(identity)
}

pub fn run_list(config_path: &Path) -> Result<()> {
    let registry = Registry::load(config_path)?;

    for (name, identity) in &registry.clis {
        let binary = identity.binary().unwrap_or("<unset>");
        let mode = if identity.shell_required() {
            "shell"
        } else {
            "direct"
        };
        println!("{name}\t{binary}\t{mode}");
    }

    Ok(())
}

pub fn run_version(args: VersionArgs, config_path: &Path) -> Result<()> {
    let invoker = ProcessInvoker::new(select_identity(config_path, &args.name)?);

    let version = invoker
        .version()
        .with_context(|| format!("Failed to get version of '{}'", args.name))?;

    println!("{version}");
    Ok(())
}

pub fn run_run(args: RunArgs, config_path: &Path) -> Result<()> {
    let invoker = ProcessInvoker::new(select_identity(config_path, &args.name)?);

    let mut invocation = Invocation::new(args.args).log_output(!args.quiet_output);
    if let Some(cwd) = args.cwd {
        invocation = invocation.working_dir(cwd);
    }

    let output = invoker
        .execute(&invocation)
        .with_context(|| format!("Failed to run '{}'", args.name))?;

    print!("{output}");
    Ok(())
}
