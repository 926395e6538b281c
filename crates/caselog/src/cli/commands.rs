//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands and how their
//! arguments turn into record edits.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::record::{Draft, Record};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Record id
    pub id: Uuid,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// New command arguments.
#[derive(Debug, Args)]
pub struct NewCommand {
    /// Case title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Suspect name
    #[arg(short, long)]
    pub suspect: Option<String>,

    /// Mark the case resolved
    #[arg(short, long)]
    pub resolved: bool,

    /// When the case occurred (RFC 3339, defaults to now)
    #[arg(short, long)]
    pub date: Option<DateTime<Utc>>,
}

impl NewCommand {
    /// Build the record this command describes.
    #[must_use]
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        if let Some(title) = &self.title {
            record.set_title(title.as_str());
        }
        if let Some(suspect) = &self.suspect {
            record.set_suspect(suspect.as_str());
        }
        if let Some(date) = self.date {
            record.set_occurred_at(date);
        }
        record.set_resolved(self.resolved);
        record
    }
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Record id
    pub id: Uuid,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New suspect name (empty string clears it)
    #[arg(short, long)]
    pub suspect: Option<String>,

    /// Set the resolved flag
    #[arg(short, long)]
    pub resolved: Option<bool>,

    /// New occurrence time (RFC 3339)
    #[arg(short, long)]
    pub date: Option<DateTime<Utc>>,
}

impl EditCommand {
    /// Apply the requested changes to a draft.
    pub fn apply(&self, draft: &mut Draft) {
        if let Some(title) = &self.title {
            draft.set_title(title.as_str());
        }
        if let Some(suspect) = &self.suspect {
            draft.set_suspect(suspect.as_str());
        }
        if let Some(resolved) = self.resolved {
            draft.set_resolved(resolved);
        }
        if let Some(date) = self.date {
            draft.set_occurred_at(date);
        }
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Record id
    pub id: Uuid,
}

/// Photo path command arguments.
#[derive(Debug, Args)]
pub struct PhotoPathCommand {
    /// Record id
    pub id: Uuid,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_command_defaults() {
        let cmd = NewCommand {
            title: None,
            suspect: None,
            resolved: false,
            date: None,
        };
        let record = cmd.to_record();

        assert_eq!(record.title(), "");
        assert_eq!(record.suspect(), "");
        assert!(!record.is_resolved());
    }

    #[test]
    fn test_new_command_fields() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let cmd = NewCommand {
            title: Some("Forgery - Library".to_string()),
            suspect: Some("Emma Martinez".to_string()),
            resolved: true,
            date: Some(date),
        };
        let record = cmd.to_record();

        assert_eq!(record.title(), "Forgery - Library");
        assert_eq!(record.suspect(), "Emma Martinez");
        assert!(record.is_resolved());
        assert_eq!(record.occurred_at(), date);
    }

    #[test]
    fn test_edit_command_applies_only_given_fields() {
        let mut record = Record::new();
        record.set_title("Original");
        record.set_suspect("Parker Lee");

        let cmd = EditCommand {
            id: record.id(),
            title: None,
            suspect: Some(String::new()),
            resolved: Some(true),
            date: None,
        };
        let mut draft = Draft::from_record(&record);
        cmd.apply(&mut draft);

        assert!(draft.is_dirty());
        assert_eq!(draft.record().title(), "Original");
        assert!(!draft.record().has_suspect());
        assert!(draft.record().is_resolved());
    }

    #[test]
    fn test_edit_command_no_changes() {
        let record = Record::new();
        let cmd = EditCommand {
            id: record.id(),
            title: None,
            suspect: None,
            resolved: None,
            date: None,
        };
        let mut draft = Draft::from_record(&record);
        cmd.apply(&mut draft);

        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
