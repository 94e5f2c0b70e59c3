//! In-memory reference implementation of the document store.
//!
//! Backs the test suites and the demo binary. `BTreeMap` keys make the
//! open-set snapshots deterministic; a `RwLock` gives the same
//! read-snapshot/conditional-write semantics a real document store would.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::store::{DocumentStore, StoreError, Version, Versioned};
use crate::types::{Allocation, Donation, Request};

#[derive(Debug, Default)]
struct Inner {
    donations: BTreeMap<String, Versioned<Donation>>,
    requests: BTreeMap<String, Versioned<Request>>,
    allocations: Vec<Allocation>,
}

/// In-memory document store with per-document versioning.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a donation, advancing its version.
    pub fn put_donation(&self, doc: Donation) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let version = inner
            .donations
            .get(&doc.id)
            .map(|v| v.version + 1)
            .unwrap_or(1);
        inner
            .donations
            .insert(doc.id.clone(), Versioned { version, doc });
        Ok(())
    }

    /// Seed or replace a request, advancing its version.
    pub fn put_request(&self, doc: Request) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let version = inner
            .requests
            .get(&doc.id)
            .map(|v| v.version + 1)
            .unwrap_or(1);
        inner
            .requests
            .insert(doc.id.clone(), Versioned { version, doc });
        Ok(())
    }

    /// Remove a donation outright (simulates an external delete).
    pub fn remove_donation(&self, id: &str) -> Result<(), StoreError> {
        self.write()?.donations.remove(id);
        Ok(())
    }

    /// Remove a request outright (simulates an external delete).
    pub fn remove_request(&self, id: &str) -> Result<(), StoreError> {
        self.write()?.requests.remove(id);
        Ok(())
    }

    /// All persisted allocation records, in insertion order.
    pub fn allocations(&self) -> Result<Vec<Allocation>, StoreError> {
        Ok(self.read()?.allocations.clone())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

impl DocumentStore for MemoryStore {
    fn open_donations(&self) -> Result<Vec<Donation>, StoreError> {
        Ok(self
            .read()?
            .donations
            .values()
            .filter(|v| v.doc.status.is_open())
            .map(|v| v.doc.clone())
            .collect())
    }

    fn open_requests(&self) -> Result<Vec<Request>, StoreError> {
        Ok(self
            .read()?
            .requests
            .values()
            .filter(|v| v.doc.status.is_open())
            .map(|v| v.doc.clone())
            .collect())
    }

    fn insert_allocations(&self, records: &[Allocation]) -> Result<(), StoreError> {
        self.write()?.allocations.extend_from_slice(records);
        Ok(())
    }

    fn get_donation(&self, id: &str) -> Result<Versioned<Donation>, StoreError> {
        self.read()?
            .donations
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn get_request(&self, id: &str) -> Result<Versioned<Request>, StoreError> {
        self.read()?
            .requests
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn update_donation(&self, expected: Version, doc: &Donation) -> Result<Version, StoreError> {
        let mut inner = self.write()?;
        let entry = inner
            .donations
            .get_mut(&doc.id)
            .ok_or_else(|| StoreError::NotFound { id: doc.id.clone() })?;
        if entry.version != expected {
            return Err(StoreError::VersionConflict {
                id: doc.id.clone(),
                expected,
                found: entry.version,
            });
        }
        entry.version += 1;
        entry.doc = doc.clone();
        Ok(entry.version)
    }

    fn update_request(&self, expected: Version, doc: &Request) -> Result<Version, StoreError> {
        let mut inner = self.write()?;
        let entry = inner
            .requests
            .get_mut(&doc.id)
            .ok_or_else(|| StoreError::NotFound { id: doc.id.clone() })?;
        if entry.version != expected {
            return Err(StoreError::VersionConflict {
                id: doc.id.clone(),
                expected,
                found: entry.version,
            });
        }
        entry.version += 1;
        entry.doc = doc.clone();
        Ok(entry.version)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DonationStatus, Item};
    use rust_decimal::Decimal;

    fn donation(id: &str) -> Donation {
        Donation::new(id, vec![Item::new("bread", Decimal::from(5), "kg")])
    }

    #[test]
    fn test_open_donations_filters_status() {
        let store = MemoryStore::new();
        store.put_donation(donation("d1")).expect("put");
        let mut closed = donation("d2");
        closed.status = DonationStatus::Closed;
        store.put_donation(closed).expect("put");

        let open = store.open_donations().expect("read");
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "d1");
    }

    #[test]
    fn test_open_donations_sorted_by_id() {
        let store = MemoryStore::new();
        store.put_donation(donation("d2")).expect("put");
        store.put_donation(donation("d1")).expect("put");
        let ids: Vec<String> = store
            .open_donations()
            .expect("read")
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["d1", "d2"]);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = MemoryStore::new();
        match store.get_donation("ghost") {
            Err(StoreError::NotFound { id }) => assert_eq!(id, "ghost"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_update_advances_version() {
        let store = MemoryStore::new();
        store.put_donation(donation("d1")).expect("put");

        let read = store.get_donation("d1").expect("get");
        assert_eq!(read.version, 1);

        let mut doc = read.doc;
        doc.items[0].quantity = Decimal::from(3);
        let new_version = store.update_donation(read.version, &doc).expect("update");
        assert_eq!(new_version, 2);
        assert_eq!(
            store.get_donation("d1").expect("get").doc.items[0].quantity,
            Decimal::from(3)
        );
    }

    #[test]
    fn test_update_stale_version_conflicts() {
        let store = MemoryStore::new();
        store.put_donation(donation("d1")).expect("put");

        let read = store.get_donation("d1").expect("get");
        let mut doc = read.doc.clone();
        doc.items[0].quantity = Decimal::from(4);
        store.update_donation(read.version, &doc).expect("update");

        // second writer still holds version 1
        match store.update_donation(read.version, &read.doc) {
            Err(StoreError::VersionConflict {
                expected, found, ..
            }) => {
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("expected VersionConflict, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_allocations_appends() {
        use chrono::Utc;
        let store = MemoryStore::new();
        let a = Allocation::new("d1", "r1", "bread", Decimal::from(2), 0.0, 0.5, Utc::now());
        store.insert_allocations(&[a.clone()]).expect("insert");
        store.insert_allocations(&[a.clone()]).expect("insert");
        assert_eq!(store.allocations().expect("read").len(), 2);
    }
}
