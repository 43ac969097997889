//! In-memory gateway for tests and embedding.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{PersistenceGateway, UserLocks};
use crate::error::{MomentumError, Result};
use crate::habit::{UserDocument, UserId};

#[derive(Debug, Default)]
pub struct MemoryGateway {
    docs: Mutex<HashMap<UserId, UserDocument>>,
    locks: UserLocks,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn docs(&self) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, UserDocument>>> {
        self.docs
            .lock()
            .map_err(|_| MomentumError::Store("memory store poisoned".into()))
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load(&self, user: &UserId) -> Result<Option<UserDocument>> {
        Ok(self.docs()?.get(user).cloned())
    }

    fn transact<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut UserDocument) -> Result<T>,
    {
        self.locks.with_lock(user, || {
            let mut doc = self
                .load(user)?
                .unwrap_or_else(|| UserDocument::new(user.clone()));
            let value = f(&mut doc)?;
            self.docs()?.insert(user.clone(), doc);
            Ok(value)
        })
    }
}
