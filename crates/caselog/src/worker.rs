//! Single-worker task queue in front of a [`RecordStore`].
//!
//! The store moves onto a dedicated thread that runs requests one at a time
//! in arrival order. Callers get async results and never block on disk I/O.
//! A [`ScopedHandle`] ties a batch of requests to the lifetime of whatever
//! issued them: dropping the scope cancels anything it queued that has not
//! started yet.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, WorkerConfig};
use crate::error::{Error, Result};
use crate::record::Record;
use crate::storage::RecordStore;

type Reply<T> = oneshot::Sender<Result<T>>;

#[derive(Debug)]
enum Request {
    ListAll(Reply<Vec<Record>>),
    GetById(Uuid, Reply<Option<Record>>),
    Create(Record, Reply<()>),
    Update(Record, Reply<bool>),
    Delete(Record, Reply<bool>),
    Count(Reply<usize>),
    Shutdown,
}

impl Request {
    fn run(self, store: &RecordStore) {
        // A send error only means the caller stopped waiting.
        match self {
            Self::ListAll(reply) => {
                let _ = reply.send(store.list_all());
            }
            Self::GetById(id, reply) => {
                let _ = reply.send(store.get_by_id(&id));
            }
            Self::Create(record, reply) => {
                let _ = reply.send(store.create(&record));
            }
            Self::Update(record, reply) => {
                let _ = reply.send(store.update(&record));
            }
            Self::Delete(record, reply) => {
                let _ = reply.send(store.delete(&record));
            }
            Self::Count(reply) => {
                let _ = reply.send(store.count());
            }
            Self::Shutdown => {}
        }
    }

    fn reject(self) {
        match self {
            Self::ListAll(reply) => {
                let _ = reply.send(Err(Error::Cancelled));
            }
            Self::GetById(_, reply) => {
                let _ = reply.send(Err(Error::Cancelled));
            }
            Self::Create(_, reply) => {
                let _ = reply.send(Err(Error::Cancelled));
            }
            Self::Update(_, reply) | Self::Delete(_, reply) => {
                let _ = reply.send(Err(Error::Cancelled));
            }
            Self::Count(reply) => {
                let _ = reply.send(Err(Error::Cancelled));
            }
            Self::Shutdown => {}
        }
    }
}

#[derive(Debug)]
struct Job {
    request: Request,
    cancel: Option<CancelToken>,
}

/// Shared cancellation flag for a group of requests.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every request carrying this token that has not started.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether the token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Owner of the worker thread.
#[derive(Debug)]
pub struct StoreWorker {
    handle: StoreHandle,
    thread: JoinHandle<()>,
}

impl StoreWorker {
    /// Open the configured store and move it onto a worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or seeded, or the
    /// worker cannot be started.
    pub fn open(config: &Config) -> Result<Self> {
        Self::spawn(RecordStore::open(config)?, &config.worker)
    }

    /// Move `store` onto a new worker thread.
    ///
    /// `config.queue_capacity` bounds the number of requests waiting to run.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned or the capacity is 0.
    pub fn spawn(store: RecordStore, config: &WorkerConfig) -> Result<Self> {
        let queue_capacity = config.queue_capacity;
        if queue_capacity == 0 {
            return Err(Error::ConfigValidation {
                message: "worker.queue_capacity must be greater than 0".to_string(),
            });
        }

        let photo_dir: Arc<Path> = Arc::from(store.photo_dir());
        let (tx, rx) = mpsc::channel(queue_capacity);

        let thread = std::thread::Builder::new()
            .name("caselog-store".to_string())
            .spawn(move || run_worker(&store, rx))?;

        info!("Store worker started (queue capacity {})", queue_capacity);
        Ok(Self {
            handle: StoreHandle {
                tx,
                photo_dir,
                cancel: None,
            },
            thread,
        })
    }

    /// Get a handle for sending requests.
    #[must_use]
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// Stop the worker after the requests already queued, and wait for it.
    ///
    /// Handles still alive afterwards get [`Error::WorkerStopped`].
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread panicked.
    pub async fn shutdown(self) -> Result<()> {
        // Ignore a closed queue: the worker is already gone.
        let _ = self
            .handle
            .tx
            .send(Job {
                request: Request::Shutdown,
                cancel: None,
            })
            .await;

        let thread = self.thread;
        tokio::task::spawn_blocking(move || thread.join())
            .await
            .map_err(|e| Error::internal(format!("failed to join store worker: {e}")))?
            .map_err(|_| Error::internal("store worker panicked"))
    }
}

fn run_worker(store: &RecordStore, mut rx: mpsc::Receiver<Job>) {
    let mut handled: u64 = 0;
    while let Some(job) = rx.blocking_recv() {
        if matches!(job.request, Request::Shutdown) {
            debug!("Store worker received shutdown");
            break;
        }
        if job.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            debug!("Skipping cancelled store request");
            job.request.reject();
            continue;
        }
        job.request.run(store);
        handled += 1;
    }

    rx.close();
    let dropped = std::iter::from_fn(|| rx.try_recv().ok()).count();
    if dropped > 0 {
        warn!("Store worker stopped with {} requests unprocessed", dropped);
    }
    info!("Store worker stopped after {} requests", handled);
}

/// Cloneable async front to the store worker.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<Job>,
    photo_dir: Arc<Path>,
    cancel: Option<CancelToken>,
}

impl StoreHandle {
    /// A handle whose requests are cancelled when it is dropped.
    #[must_use]
    pub fn scope(&self) -> ScopedHandle {
        let token = CancelToken::new();
        ScopedHandle {
            handle: Self {
                tx: self.tx.clone(),
                photo_dir: Arc::clone(&self.photo_dir),
                cancel: Some(token.clone()),
            },
            token,
        }
    }

    async fn call<T>(&self, make: impl FnOnce(Reply<T>) -> Request) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        let job = Job {
            request: make(reply),
            cancel: self.cancel.clone(),
        };
        self.tx.send(job).await.map_err(|_| Error::WorkerStopped)?;
        rx.await.map_err(|_| Error::WorkerStopped)?
    }

    /// Every stored record. See [`RecordStore::list_all`].
    ///
    /// # Errors
    ///
    /// Returns the store's error, [`Error::Cancelled`], or [`Error::WorkerStopped`].
    pub async fn list_all(&self) -> Result<Vec<Record>> {
        self.call(Request::ListAll).await
    }

    /// Look up a record by id. See [`RecordStore::get_by_id`].
    ///
    /// # Errors
    ///
    /// Returns the store's error, [`Error::Cancelled`], or [`Error::WorkerStopped`].
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>> {
        self.call(|reply| Request::GetById(id, reply)).await
    }

    /// Insert a new record. See [`RecordStore::create`].
    ///
    /// # Errors
    ///
    /// Returns the store's error, [`Error::Cancelled`], or [`Error::WorkerStopped`].
    pub async fn create(&self, record: Record) -> Result<()> {
        self.call(|reply| Request::Create(record, reply)).await
    }

    /// Overwrite a stored record. See [`RecordStore::update`].
    ///
    /// # Errors
    ///
    /// Returns the store's error, [`Error::Cancelled`], or [`Error::WorkerStopped`].
    pub async fn update(&self, record: Record) -> Result<bool> {
        self.call(|reply| Request::Update(record, reply)).await
    }

    /// Delete a stored record. See [`RecordStore::delete`].
    ///
    /// # Errors
    ///
    /// Returns the store's error, [`Error::Cancelled`], or [`Error::WorkerStopped`].
    pub async fn delete(&self, record: Record) -> Result<bool> {
        self.call(|reply| Request::Delete(record, reply)).await
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns the store's error, [`Error::Cancelled`], or [`Error::WorkerStopped`].
    pub async fn count(&self) -> Result<usize> {
        self.call(Request::Count).await
    }

    /// Where the record's photo lives. Computed here, no round trip.
    #[must_use]
    pub fn photo_path_for(&self, record: &Record) -> PathBuf {
        self.photo_dir.join(record.photo_filename())
    }
}

/// A [`StoreHandle`] bound to a cancellation scope.
///
/// Dropping it cancels every request it sent that the worker has not
/// started. A request already running still completes.
#[derive(Debug)]
pub struct ScopedHandle {
    handle: StoreHandle,
    token: CancelToken,
}

impl ScopedHandle {
    /// Cancel pending requests now without dropping the scope.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The token shared by this scope's requests.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }
}

impl Deref for ScopedHandle {
    type Target = StoreHandle;

    fn deref(&self) -> &StoreHandle {
        &self.handle
    }
}

impl Drop for ScopedHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
