//! Repository and collaborator traits for the Ratchet core.
//!
//! External crates can implement these to provide different persistence or
//! time sources; the in-memory implementations here are the defaults the
//! server wires in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::application::{AppId, Application};

/// Repository for application definitions.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Find an application by its derived id.
    async fn get(&self, id: AppId) -> Option<Application>;

    /// Insert the application unless the id is already taken.
    ///
    /// The check and the insert are a single atomic step; this is what closes
    /// the duplicate-name race between concurrent creates. Returns true if
    /// the application was inserted.
    async fn insert_if_absent(&self, id: AppId, app: Application) -> bool;

    /// Whether an application is registered under the id.
    async fn contains(&self, id: AppId) -> bool;
}

/// In-memory implementation of the application repository.
pub struct MemoryApplicationRepository {
    applications: DashMap<AppId, Application>,
}

impl MemoryApplicationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            applications: DashMap::new(),
        }
    }
}

impl Default for MemoryApplicationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApplicationRepository for MemoryApplicationRepository {
    async fn get(&self, id: AppId) -> Option<Application> {
        self.applications.get(&id).map(|app| app.clone())
    }

    async fn insert_if_absent(&self, id: AppId, app: Application) -> bool {
        match self.applications.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(app);
                true
            }
        }
    }

    async fn contains(&self, id: AppId) -> bool {
        self.applications.contains_key(&id)
    }
}

/// Monotonic id source for workflow ids.
pub trait IdGenerator: Send + Sync {
    /// Return the next id. Ids are never reused within a process lifetime.
    fn next(&self) -> i64;
}

/// Atomic counter implementation of [`IdGenerator`].
pub struct AtomicIdGenerator {
    next: AtomicI64,
}

impl AtomicIdGenerator {
    /// Create a generator starting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator starting at the given value.
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for AtomicIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for AtomicIdGenerator {
    fn next(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// Time source used for catalog stamping.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation of [`Clock`].
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
