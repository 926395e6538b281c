//! `caselog` - on-device case record keeping
//!
//! This library provides the record store for case entries (title, date,
//! resolution status, suspect, photo) backed by an embedded `SQLite`
//! database, plus a single-worker queue for driving the store off an
//! interactive thread.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod storage;
pub mod worker;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Draft, Record};
pub use storage::{RecordStore, StoreStats};
pub use worker::{CancelToken, ScopedHandle, StoreHandle, StoreWorker};
