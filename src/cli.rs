use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "meshctl")]
#[command(version)]
#[command(about = "Command line client for Meshery")]
#[command(long_about = "meshctl talks to a Meshery server, the management plane for \
service meshes. The server is selected by the current context in ~/.meshery/config.toml.")]
pub struct Cli {
    /// Path to config file (default: ~/.meshery/config.toml)
    #[arg(short, long, global = true, env = "MESHCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info or debug
    #[arg(long, global = true, env = "MESHCTL_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn effective_log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }

    /// Pre-run step for commands that talk to the server
    pub fn load_config(&self) -> Result<Config> {
        Config::load(self.config.as_deref()).context("error processing config")
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show client and server version information
    Version,
}
