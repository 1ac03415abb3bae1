//! Command-line interface.

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// Terminal task manager for people who live in the shell.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "geeklife", version, about)]
pub struct Cli {
    /// Specify DB file path manually.
    #[arg(short = 'd', long = "db-file", value_name = "PATH")]
    pub db_file: Option<String>,

    /// Vertical task detail layout.
    #[arg(short = 'v', long)]
    pub vertical: bool,

    /// Enables the dynamic lists (Pending and Completed).
    #[arg(short = 'D', long)]
    pub dynamic: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Repair and reindex the database, then exit.
    Migrate,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            db_file: self.db_file.clone(),
            vertical: self.vertical,
            dynamic: self.dynamic,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/cli.rs"]
mod tests;
