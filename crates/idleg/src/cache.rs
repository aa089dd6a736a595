//! Single-slot cache for the aggregate scrape result.
//!
//! The slot holds `{ "timestamp": <RFC 3339>, "data": <AggregateResult> }`.
//! A record is fresh while it is younger than the store's TTL; every read
//! failure is logged and reported as a miss.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AggregateResult;

pub const DEFAULT_TTL: TimeDelta = TimeDelta::hours(1);

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Cache record is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cache record from {timestamp} is older than {ttl_secs}s")]
    Expired {
        timestamp: DateTime<Utc>,
        ttl_secs: i64,
    },
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Where the serialized cache record lives.
pub trait CacheBackend: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> io::Result<Option<String>>;
    /// Replaces the stored record as a whole.
    fn write(&self, contents: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A sibling path no other writer, in this process or another, will use.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(
            ".{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        self.path.with_file_name(name)
    }
}

impl CacheBackend for FileBackend {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        let written = fs::write(&temp, contents).and_then(|()| fs::rename(&temp, &self.path));
        if written.is_err() {
            let _ = fs::remove_file(&temp);
        }
        written
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for MemoryBackend {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CacheRecord {
    timestamp: DateTime<Utc>,
    data: AggregateResult,
}

#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            ttl: DEFAULT_TTL,
        }
    }

    /// File-backed store on the system clock.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(path)), Arc::new(SystemClock))
    }

    /// In-memory store on the system clock; nothing outlives the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), Arc::new(SystemClock))
    }

    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    /// The cached result if it is younger than the TTL.
    pub fn load(&self) -> Option<AggregateResult> {
        let result = self.read_record().and_then(|record| match record {
            Some(record) if self.clock.now() - record.timestamp >= self.ttl => {
                Err(CacheError::Expired {
                    timestamp: record.timestamp,
                    ttl_secs: self.ttl.num_seconds(),
                })
            }
            record => Ok(record),
        });

        match result {
            Ok(Some(record)) => {
                log::debug!("Cache hit from {}", record.timestamp);
                Some(record.data)
            }
            Ok(None) => {
                log::debug!("Cache miss: no record stored");
                None
            }
            Err(e @ CacheError::Expired { .. }) => {
                log::debug!("Cache miss: {}", e);
                None
            }
            Err(e) => {
                log::warn!("Cache miss: {}", e);
                None
            }
        }
    }

    /// The cached result regardless of its age.
    pub fn load_stale(&self) -> Option<AggregateResult> {
        match self.read_record() {
            Ok(record) => record.map(|record| {
                log::info!("Using cached data from {}", record.timestamp);
                record.data
            }),
            Err(e) => {
                log::warn!("Stale cache unavailable: {}", e);
                None
            }
        }
    }

    /// Stores `data` stamped with the current time. Failures are logged only.
    pub fn save(&self, data: &AggregateResult) {
        if let Err(e) = self.write_record(data) {
            log::error!("Error saving cache: {}", e);
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.backend.clear() {
            log::error!("Error clearing cache: {}", e);
        }
    }

    fn read_record(&self) -> Result<Option<CacheRecord>, CacheError> {
        let Some(contents) = self.backend.read()? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn write_record(&self, data: &AggregateResult) -> Result<(), CacheError> {
        #[derive(Serialize)]
        struct CacheRecordRef<'a> {
            timestamp: DateTime<Utc>,
            data: &'a AggregateResult,
        }

        let json = serde_json::to_string_pretty(&CacheRecordRef {
            timestamp: self.clock.now(),
            data,
        })?;
        self.backend.write(&json)?;
        Ok(())
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore").field("ttl", &self.ttl).finish()
    }
}
