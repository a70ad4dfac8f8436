//! Registry of named CLI identities, read from `~/.cliwrap/config.toml`
//!
//! ```toml
//! [clis.bash]
//! binary = "/bin/bash"
//!
//! [clis.gcloud]
//! binary = "gcloud"
//! version_argument = "version"
//! shell_required = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cliwrap_core::CliIdentity;
use serde::Deserialize;

const TEMPLATE: &str = r#"# cliwrap registry: one [clis.<name>] table per external CLI
#
#   binary            path or name looked up on PATH (leave out to mark unconfigured)
#   version_argument  argument that prints the version (default "--version")
#   shell_required    run through the host shell (default false)

[clis.bash]
binary = "bash"

[clis.git]
binary = "git"
version_argument = "--version"
shell_required = false
"#;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub clis: BTreeMap<String, CliIdentity>,
}

impl Registry {
    /// Load the registry from `path`
    ///
    /// Fails hard with actionable error if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config not found at {:?}\n\nRun: cliwrap config init", path);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).context("Failed to parse config file (invalid TOML)")
    }

    /// Default config path: ~/.cliwrap/config.toml
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cliwrap")
            .join("config.toml")
    }

    /// Config path from the `--config` flag or the default location
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(Self::default_path, Path::to_path_buf)
    }

    pub fn identity(&self, name: &str) -> Result<&CliIdentity> {
        self.clis.get(name).with_context(|| {
            let known: Vec<&str> = self.clis.keys().map(String::as_str).collect();
            format!("Unknown CLI '{}' (configured: {})", name, known.join(", "))
        })
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter config file
    Init(InitArgs),
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, config_path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, config_path),
        ConfigCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn run_init(args: InitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        );
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(config_path, TEMPLATE)
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    println!("Created config at: {}", config_path.display());
    Ok(())
}
