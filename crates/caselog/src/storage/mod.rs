//! Storage layer for caselog.
//!
//! [`RecordStore`] is the only gateway to the record database. Construct one
//! at process start and hand it by reference to whatever needs it.

pub mod migrations;
pub mod schema;
pub mod seed;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{Config, SeedConfig};
use crate::error::{Error, Result};
use crate::record::Record;

/// Storage engine for case records.
///
/// A thin single-row mapping over one `SQLite` table. Missing ids are never
/// errors: lookups return `None` and updates or deletes return `false`.
#[derive(Debug)]
pub struct RecordStore {
    /// Path to the database file.
    path: PathBuf,
    /// Directory photo paths are derived under.
    photo_dir: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl RecordStore {
    /// Open the store described by `config`, seeding it if it is empty and
    /// seeding is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, the schema cannot
    /// be initialized, or seeding fails.
    pub fn open(config: &Config) -> Result<Self> {
        let store = Self::open_at(config.database_path(), config.photo_dir())?;
        if config.seed.enabled {
            store.seed_if_empty(&config.seed)?;
        }
        Ok(store)
    }

    /// Open or create a record database at the given path without seeding.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open_at(path: impl AsRef<Path>, photo_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening record database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Record database opened at {}", path.display());
        Ok(Self {
            path,
            photo_dir: photo_dir.into(),
            conn,
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory(photo_dir: impl Into<PathBuf>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            photo_dir: photo_dir.into(),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the directory photo paths are derived under.
    #[must_use]
    pub fn photo_dir(&self) -> &Path {
        &self.photo_dir
    }

    /// Every stored record, in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a row is corrupt.
    pub fn list_all(&self) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {}",
            schema::SELECT_COLUMNS,
            schema::TABLE
        ))?;

        let records = stmt
            .query_map([], RecordRow::from_row)?
            .map(|row| row.map_err(Error::from).and_then(RecordRow::into_record))
            .collect::<Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Look up a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the row is corrupt.
    pub fn get_by_id(&self, id: &Uuid) -> Result<Option<Record>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE uuid = ?1",
                    schema::SELECT_COLUMNS,
                    schema::TABLE
                ),
                [id.to_string()],
                RecordRow::from_row,
            )
            .optional()?;
        row.map(RecordRow::into_record).transpose()
    }

    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRecord`] if a record with the same id is
    /// already stored, or another error if the database operation fails.
    pub fn create(&self, record: &Record) -> Result<()> {
        insert_row(&self.conn, record)?;
        debug!("Created record {}", record.id());
        Ok(())
    }

    /// Overwrite every field of the stored record with the same id.
    ///
    /// Returns `false` if no record has this id; nothing is written then.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update(&self, record: &Record) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE crimes SET title = ?2, date = ?3, solved = ?4, suspect = ?5
            WHERE uuid = ?1
            ",
            params![
                record.id().to_string(),
                record.title(),
                record.occurred_at().timestamp_millis(),
                i64::from(record.is_resolved()),
                record.suspect(),
            ],
        )?;
        debug!("Updated record {} ({} rows)", record.id(), affected);
        Ok(affected > 0)
    }

    /// Delete the stored record with the same id.
    ///
    /// Returns `false` if no record has this id. The record's photo file, if
    /// any, is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, record: &Record) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM crimes WHERE uuid = ?1", [record.id().to_string()])?;
        debug!("Deleted record {} ({} rows)", record.id(), affected);
        Ok(affected > 0)
    }

    /// Where the record's photo lives on disk.
    ///
    /// Pure path computation; the file may not exist.
    #[must_use]
    pub fn photo_path_for(&self, record: &Record) -> PathBuf {
        self.photo_dir.join(record.photo_filename())
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM crimes", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| Error::internal(format!("negative row count {count}")))
    }

    /// Fill an empty store with sample records.
    ///
    /// Returns the number of records inserted, 0 if the store already had
    /// any. All sample rows are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn seed_if_empty(&self, config: &SeedConfig) -> Result<usize> {
        if self.count()? > 0 {
            debug!("Store not empty, skipping seeding");
            return Ok(0);
        }

        let records = seed::sample_records(config, Utc::now());
        let tx = self.conn.unchecked_transaction()?;
        for record in &records {
            insert_row(&tx, record)?;
        }
        tx.commit()?;

        info!("Seeded {} sample records", records.len());
        Ok(records.len())
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let (total, resolved, oldest, newest): (i64, i64, Option<i64>, Option<i64>) =
            self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(solved), 0), MIN(date), MAX(date) FROM crimes",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let total = usize::try_from(total).unwrap_or(0);
        let resolved = usize::try_from(resolved).unwrap_or(0);

        Ok(StoreStats {
            total_records: total,
            resolved_records: resolved,
            unresolved_records: total.saturating_sub(resolved),
            oldest_record: oldest.and_then(DateTime::from_timestamp_millis),
            newest_record: newest.and_then(DateTime::from_timestamp_millis),
        })
    }
}

/// Statistics about the stored records.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    /// Total number of records.
    pub total_records: usize,
    /// Records marked resolved.
    pub resolved_records: usize,
    /// Records not yet resolved.
    pub unresolved_records: usize,
    /// Earliest occurrence time.
    pub oldest_record: Option<DateTime<Utc>>,
    /// Latest occurrence time.
    pub newest_record: Option<DateTime<Utc>>,
}

fn insert_row(conn: &Connection, record: &Record) -> Result<()> {
    let result = conn.execute(
        r"
        INSERT INTO crimes (uuid, title, date, solved, suspect)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ",
        params![
            record.id().to_string(),
            record.title(),
            record.occurred_at().timestamp_millis(),
            i64::from(record.is_resolved()),
            record.suspect(),
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
            Err(Error::DuplicateRecord { id: record.id() })
        }
        Err(err) => Err(err.into()),
    }
}

/// Raw column values of one row, before validation.
struct RecordRow {
    uuid: String,
    title: String,
    date: i64,
    solved: i64,
    suspect: String,
}

impl RecordRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            uuid: row.get(0)?,
            title: row.get(1)?,
            date: row.get(2)?,
            solved: row.get(3)?,
            suspect: row.get(4)?,
        })
    }

    fn into_record(self) -> Result<Record> {
        let id = Uuid::parse_str(&self.uuid)
            .map_err(|e| Error::corrupt(schema::cols::UUID, format!("{}: {e}", self.uuid)))?;
        let occurred_at = DateTime::from_timestamp_millis(self.date).ok_or_else(|| {
            Error::corrupt(schema::cols::DATE, format!("{} is out of range", self.date))
        })?;

        Ok(Record::from_parts(
            id,
            self.title,
            occurred_at,
            self.solved != 0,
            self.suspect,
        ))
    }
}
