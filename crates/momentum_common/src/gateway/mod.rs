//! Persistence gateway.
//!
//! The gateway owns durable user documents. Every mutation runs through
//! [`PersistenceGateway::transact`], which serialises access per user id and
//! commits only when the closure succeeds, so a read-compute-write never
//! races another one for the same user and never leaves a partial write.

pub mod file;
pub mod memory;

pub use file::FileGateway;
pub use memory::MemoryGateway;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{MomentumError, Result};
use crate::habit::{UserDocument, UserId};

pub trait PersistenceGateway {
    /// Read a user's document, `None` if the user has never been written
    fn load(&self, user: &UserId) -> Result<Option<UserDocument>>;

    /// Run `f` against the user's document and persist it if `f` succeeds.
    ///
    /// A missing document is materialised with the default progression
    /// record. On error nothing is written.
    fn transact<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut UserDocument) -> Result<T>;
}

/// One mutex per user id, created on first use and dropped once no caller
/// holds it
#[derive(Debug, Default)]
pub(crate) struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    fn table(&self) -> Result<MutexGuard<'_, HashMap<UserId, Arc<Mutex<()>>>>> {
        self.locks
            .lock()
            .map_err(|_| MomentumError::Store("user lock table poisoned".into()))
    }

    fn handle(&self, user: &UserId) -> Result<Arc<Mutex<()>>> {
        Ok(self.table()?.entry(user.clone()).or_default().clone())
    }

    /// Run `f` while holding the user's lock
    pub(crate) fn with_lock<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let handle = self.handle(user)?;
        let result = match handle.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(MomentumError::Store(format!("lock for user {} poisoned", user))),
        };
        drop(handle);
        self.release(user);
        result
    }

    /// Forget the user's mutex if the table holds the only reference
    fn release(&self, user: &UserId) {
        if let Ok(mut table) = self.table() {
            if table.get(user).is_some_and(|h| Arc::strong_count(h) == 1) {
                table.remove(user);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table().map(|t| t.len()).unwrap_or(0)
    }
}
