//! JSON-file gateway: one document per user under `<root>/users/`.
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-write leaves the previous document intact.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{PersistenceGateway, UserLocks};
use crate::error::Result;
use crate::habit::{UserDocument, UserId};

#[derive(Debug)]
pub struct FileGateway {
    root: PathBuf,
    locks: UserLocks,
}

impl FileGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: UserLocks::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Document path for a user; ids are validated file stems
    pub fn document_path(&self, user: &UserId) -> PathBuf {
        self.users_dir().join(format!("{}.json", user.as_str()))
    }

    fn read(&self, user: &UserId) -> Result<Option<UserDocument>> {
        let path = self.document_path(user);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let doc: UserDocument = serde_json::from_str(&content)?;
        Ok(Some(doc))
    }

    fn write(&self, doc: &UserDocument) -> Result<()> {
        let path = self.document_path(&doc.user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(doc)?;
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        debug!(user = %doc.user_id, path = %path.display(), "document written");
        Ok(())
    }
}

impl PersistenceGateway for FileGateway {
    fn load(&self, user: &UserId) -> Result<Option<UserDocument>> {
        self.locks.with_lock(user, || self.read(user))
    }

    fn transact<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut UserDocument) -> Result<T>,
    {
        self.locks.with_lock(user, || {
            let mut doc = match self.read(user)? {
                Some(doc) => doc,
                None => {
                    info!(user = %user, "creating user document");
                    UserDocument::new(user.clone())
                }
            };
            let value = f(&mut doc)?;
            self.write(&doc)?;
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MomentumError;
    use crate::progression::award_xp;
    use tempfile::tempdir;

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    #[test]
    fn test_documents_survive_new_instance() {
        let dir = tempdir().unwrap();
        {
            let gw = FileGateway::new(dir.path());
            gw.transact(&alice(), |doc| {
                doc.progression = award_xp(&doc.progression, 120)?;
                Ok(())
            })
            .unwrap();
        }

        let gw = FileGateway::new(dir.path());
        let doc = gw.load(&alice()).unwrap().unwrap();
        assert_eq!(doc.progression.total_xp, 120);
        assert_eq!(doc.progression.level, 2);
        assert!(gw.document_path(&alice()).exists());
        assert!(!gw.document_path(&alice()).with_extension("json.tmp").exists());
    }

    #[test]
    fn test_failed_transaction_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let gw = FileGateway::new(dir.path());
        gw.transact(&alice(), |doc| {
            doc.progression = award_xp(&doc.progression, 10)?;
            Ok(())
        })
        .unwrap();

        let result: Result<()> = gw.transact(&alice(), |doc| {
            doc.progression = award_xp(&doc.progression, 500)?;
            Err(MomentumError::Store("simulated".into()))
        });
        assert!(result.is_err());

        let doc = gw.load(&alice()).unwrap().unwrap();
        assert_eq!(doc.progression.total_xp, 10);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = tempdir().unwrap();
        let gw = FileGateway::new(dir.path());
        let path = gw.document_path(&alice());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(gw.load(&alice()), Err(MomentumError::Json(_))));
    }
}
