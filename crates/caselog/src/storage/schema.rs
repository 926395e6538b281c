//! `SQLite` schema for the record table.

/// Name of the record table.
pub const TABLE: &str = "crimes";

/// Column names, in the order every query selects them.
pub mod cols {
    /// Record id, hyphenated UUID text.
    pub const UUID: &str = "uuid";
    /// Case title.
    pub const TITLE: &str = "title";
    /// Occurrence time in milliseconds since the Unix epoch.
    pub const DATE: &str = "date";
    /// Resolved flag, 0 or 1.
    pub const SOLVED: &str = "solved";
    /// Suspect name.
    pub const SUSPECT: &str = "suspect";
}

/// SQL statement to create the record table.
pub const CREATE_CRIMES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS crimes (
    uuid TEXT NOT NULL PRIMARY KEY,
    title TEXT NOT NULL DEFAULT '',
    date INTEGER NOT NULL,
    solved INTEGER NOT NULL DEFAULT 0,
    suspect TEXT NOT NULL DEFAULT ''
)
";

/// Column list shared by every `SELECT`.
pub const SELECT_COLUMNS: &str = "uuid, title, date, solved, suspect";
