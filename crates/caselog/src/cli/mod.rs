//! Command-line interface for caselog.
//!
//! This module provides the CLI structure for the `caselog` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DeleteCommand, EditCommand, ListCommand, NewCommand, PhotoPathCommand,
    ShowCommand, StatusCommand,
};

/// caselog - Keep track of case records
///
/// Lists, creates, edits and deletes case records stored in a local
/// database.
#[derive(Debug, Parser)]
#[command(name = "caselog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every record
    List(ListCommand),

    /// Show a single record
    Show(ShowCommand),

    /// Create a new record
    New(NewCommand),

    /// Edit fields of an existing record
    Edit(EditCommand),

    /// Delete a record
    Delete(DeleteCommand),

    /// Print where a record's photo is stored
    PhotoPath(PhotoPathCommand),

    /// Show record counts
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "caselog");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["caselog", "-q", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);

        let cli = Cli::try_parse_from(["caselog", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["caselog", "list", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::List(ListCommand { json: true })));
    }

    #[test]
    fn test_parse_photo_path() {
        let cli = Cli::try_parse_from([
            "caselog",
            "photo-path",
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::PhotoPath(_)));
    }

    #[test]
    fn test_parse_bad_id_rejected() {
        assert!(Cli::try_parse_from(["caselog", "show", "not-a-uuid"]).is_err());
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["caselog", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["caselog", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }
}
