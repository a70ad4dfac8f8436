//! cliwrap CLI - run registered external CLIs uniformly
//!
//! CLI identities (binary, version flag, shell mode) are declared once in a
//! TOML registry and then invoked by name:
//! - `cliwrap list` shows the registry
//! - `cliwrap version <name>` prints the CLI's version
//! - `cliwrap run <name> -- <args>` runs it and prints the combined output

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use cliwrap_core::CliError;

mod commands;
mod config;
mod tracing_setup;

use config::Registry;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "cliwrap",
    author,
    version,
    about = "Run registered external CLIs with uniform logging and error reporting"
)]
struct Cli {
    /// Registry file (default: ~/.cliwrap/config.toml)
    #[arg(long, global = true, env = "CLIWRAP_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered CLIs
    List,
    /// Print the version of a registered CLI
    Version(commands::VersionArgs),
    /// Run a registered CLI and print its output
    Run(commands::RunArgs),
    /// Manage the registry file (init, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = Registry::resolve_path(cli.config.as_deref());

    match cli.command {
        Commands::List => commands::run_list(&config_path),
        Commands::Version(args) => commands::run_version(args, &config_path),
        Commands::Run(args) => commands::run_run(args, &config_path),
        Commands::Config(args) => config::run_config(args, &config_path),
        Commands::Completions(args) => run_completions(args),
    }
}

/// Mirror the child's exit code when a CLI failed, 1 for everything else
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    child_exit_code(err).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn child_exit_code(err: &anyhow::Error) -> Option<u8> {
    err.downcast_ref::<CliError>()
        .and_then(CliError::exit_code)
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
