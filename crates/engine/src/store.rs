//! JSON file storage for bill drafts.
//!
//! All bills live in a single JSON array. Saving a bill replaces the stored
//! bill with the same id or appends it.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::{Bill, ResultEngine};

#[derive(Debug)]
pub struct BillStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl BillStore {
    /// Opens the store at `path`, creating the directory and an empty file
    /// when missing.
    pub fn open(path: impl Into<PathBuf>) -> ResultEngine<Self> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        store.ensure_exists()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !self.path.exists() {
            fs::write(&self.path, "[]")?;
        }
        Ok(())
    }

    /// All stored bills. A file that cannot be parsed is reported and read as
    /// empty.
    pub fn load_all(&self) -> ResultEngine<Vec<Bill>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read()
    }

    fn read(&self) -> ResultEngine<Vec<Bill>> {
        self.ensure_exists()?;
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(bills) => Ok(bills),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed to parse bills: {err}");
                Ok(Vec::new())
            }
        }
    }

    /// Inserts `bill`, or replaces the stored bill with the same id.
    pub fn save(&self, bill: &Bill) -> ResultEngine<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut bills = self.read()?;
        match bills.iter_mut().find(|b| b.id == bill.id) {
            Some(existing) => *existing = bill.clone(),
            None => bills.push(bill.clone()),
        }
        let payload = serde_json::to_string_pretty(&bills)?;
        fs::write(&self.path, payload)?;
        tracing::debug!(id = %bill.id, "bill saved");
        Ok(())
    }

    pub fn get(&self, id: &str) -> ResultEngine<Option<Bill>> {
        Ok(self.load_all()?.into_iter().find(|b| b.id == id))
    }

    pub fn update(&self, bill: &Bill) -> ResultEngine<()> {
        self.save(bill)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::Money;

    fn store_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_stores")
            .join(format!("bills_{}.json", Uuid::new_v4()))
    }

    #[test]
    fn open_creates_empty_file() {
        let path = store_path();
        let store = BillStore::open(&path).unwrap();

        assert!(path.exists());
        assert!(store.load_all().unwrap().is_empty());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn save_appends_then_updates() {
        let path = store_path();
        let store = BillStore::open(&path).unwrap();

        let mut bill = Bill::new();
        bill.add_participant("Alice").unwrap();
        store.save(&bill).unwrap();
        store.save(&Bill::new()).unwrap();

        bill.name = "Lunch".to_string();
        bill.add_item(
            "Soup",
            Money::new(450),
            true,
            vec![bill.participants[0].id.clone()],
        )
        .unwrap();
        store.update(&bill).unwrap();

        let bills = store.load_all().unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(store.get(&bill.id).unwrap(), Some(bill));
        assert_eq!(store.get("missing").unwrap(), None);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let path = store_path();
        let store = BillStore::open(&path).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(store.load_all().unwrap().is_empty());

        store.save(&Bill::new()).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
        fs::remove_file(path).unwrap();
    }
}
