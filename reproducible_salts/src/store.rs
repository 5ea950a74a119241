//! Interface to the hash-record persistence layer
//!
//! The core never reads from this layer. It only hands out keys: the
//! `<salt>:<digest>` form of a [`SaltedHash`] for used, retired and orphaned
//! hashes, and the unsalted SHA-256 hex of the cleartext for usage counters.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::crypto::unsalted_hash_hex;
use crate::salted_hash::SaltedHash;

/// A record addressable by a string key
pub trait Record: Clone {
    fn key(&self) -> &str;
}

/// Minimal repository contract the persistence layer must satisfy
pub trait HashRepository<T: Record> {
    fn count(&self) -> usize;

    fn exists(&self, key: &str) -> bool;

    fn find(&self, key: &str) -> Option<T>;

    /// Inserts or replaces; returns the previous record under the same key.
    fn save(&self, record: T) -> Option<T>;

    fn save_all<I>(&self, records: I) -> Vec<Option<T>>
    where
        I: IntoIterator<Item = T>,
    {
        records.into_iter().map(|r| self.save(r)).collect()
    }

    /// Inserts only when the key is free; returns whether it was inserted.
    fn save_if_absent(&self, record: T) -> bool;

    /// Applies `update` to the record under `key`, inserting `default()` first
    /// when missing. Lookup, update and store happen as one step.
    fn upsert<D, F>(&self, key: &str, default: D, update: F) -> T
    where
        D: FnOnce() -> T,
        F: FnOnce(&mut T);
}

/// Salted hash currently in use somewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedHash {
    pub used_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UsedHash {
    pub fn new(hash: &SaltedHash) -> Self {
        Self {
            used_hash: hash.record_key(),
            created_at: Utc::now(),
        }
    }
}

impl Record for UsedHash {
    fn key(&self) -> &str {
        &self.used_hash
    }
}

/// Salted hash that is no longer in use (the graveyard)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetiredHash {
    pub retired_hash: String,
    pub created_at: DateTime<Utc>,
}

impl RetiredHash {
    pub fn new(hash: &SaltedHash) -> Self {
        Self {
            retired_hash: hash.record_key(),
            created_at: Utc::now(),
        }
    }
}

impl Record for RetiredHash {
    fn key(&self) -> &str {
        &self.retired_hash
    }
}

/// Salted hash retired without ever being handed out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedHash {
    pub orphaned_hash: String,
    pub created_at: DateTime<Utc>,
}

impl OrphanedHash {
    pub fn new(hash: &SaltedHash) -> Self {
        Self {
            orphaned_hash: hash.record_key(),
            created_at: Utc::now(),
        }
    }
}

impl Record for OrphanedHash {
    fn key(&self) -> &str {
        &self.orphaned_hash
    }
}

/// How many salted hashes of one cleartext have been handed out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashUsageCount {
    /// Unsalted SHA-256 hex of the cleartext
    pub unsalted_hash: String,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl HashUsageCount {
    pub fn new(cleartext: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            unsalted_hash: unsalted_hash_hex(cleartext),
            usage_count: 0,
            created_at: now,
            last_updated_at: now,
        }
    }

    pub fn increment(&mut self) -> u64 {
        self.usage_count += 1;
        self.last_updated_at = Utc::now();
        self.usage_count
    }
}

impl Record for HashUsageCount {
    fn key(&self) -> &str {
        &self.unsalted_hash
    }
}

/// Thread-safe in-memory repository
#[derive(Debug)]
pub struct MemoryRepository<T> {
    records: RwLock<HashMap<String, T>>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Record> HashRepository<T> for MemoryRepository<T> {
    fn count(&self) -> usize {
        self.records.read().len()
    }

    fn exists(&self, key: &str) -> bool {
        self.records.read().contains_key(key)
    }

    fn find(&self, key: &str) -> Option<T> {
        self.records.read().get(key).cloned()
    }

    fn save(&self, record: T) -> Option<T> {
        self.records.write().insert(record.key().to_string(), record)
    }

    fn save_if_absent(&self, record: T) -> bool {
        let mut records = self.records.write();
        if records.contains_key(record.key()) {
            return false;
        }
        records.insert(record.key().to_string(), record);
        true
    }

    fn upsert<D, F>(&self, key: &str, default: D, update: F) -> T
    where
        D: FnOnce() -> T,
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write();
        let record = records.entry(key.to_string()).or_insert_with(default);
        update(record);
        record.clone()
    }
}

/// Records `hash` as used; `false` means it was already in use.
pub fn mark_used<R: HashRepository<UsedHash>>(repository: &R, hash: &SaltedHash) -> bool {
    let saved = repository.save_if_absent(UsedHash::new(hash));
    if !saved {
        warn!(used_hash = %hash, "duplicate used hash not saved");
    }
    saved
}

/// Moves `hash` to the graveyard; returns whether it was not already retired.
pub fn retire<R: HashRepository<RetiredHash>>(repository: &R, hash: &SaltedHash) -> bool {
    repository.save_if_absent(RetiredHash::new(hash))
}

/// Moves a never-used `hash` to the orphan graveyard.
pub fn orphan<R: HashRepository<OrphanedHash>>(repository: &R, hash: &SaltedHash) -> bool {
    repository.save_if_absent(OrphanedHash::new(hash))
}

/// Bumps the usage counter of `cleartext`, returning the new count.
pub fn record_usage<R: HashRepository<HashUsageCount>>(repository: &R, cleartext: Option<&str>) -> u64 {
    let key = unsalted_hash_hex(cleartext);
    repository
        .upsert(&key, || HashUsageCount::new(cleartext), |entry| {
            entry.increment();
        })
        .usage_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SaltedHashGenerator;
    use std::sync::Arc;

    fn sample_hash(index: u64) -> SaltedHash {
        SaltedHashGenerator::new(&[1u8; 32])
            .nth_hash(b"spamandeggs", index)
            .unwrap()
    }

    #[test]
    fn test_used_hash_key_is_record_key() {
        let hash = sample_hash(0);
        let used = UsedHash::new(&hash);
        assert_eq!(used.key(), hash.to_string());
        assert_eq!(used.key().len(), 97);
    }

    #[test]
    fn test_mark_used_rejects_duplicates() {
        let repo = MemoryRepository::<UsedHash>::new();
        let hash = sample_hash(0);

        assert!(mark_used(&repo, &hash));
        assert!(!mark_used(&repo, &hash));
        assert!(mark_used(&repo, &sample_hash(1)));
        assert_eq!(repo.count(), 2);
        assert!(repo.exists(&hash.record_key()));
    }

    #[test]
    fn test_retire() {
        let repo = MemoryRepository::<RetiredHash>::new();
        let hash = sample_hash(3);
        assert!(retire(&repo, &hash));
        assert!(!retire(&repo, &hash));
        assert_eq!(repo.find(&hash.record_key()).unwrap().retired_hash, hash.record_key());
    }

    #[test]
    fn test_orphan_kept_apart_from_retired() {
        let orphans = MemoryRepository::<OrphanedHash>::new();
        let retired = MemoryRepository::<RetiredHash>::new();
        let hash = sample_hash(4);

        assert!(orphan(&orphans, &hash));
        assert!(!orphan(&orphans, &hash));
        assert_eq!(orphans.find(&hash.record_key()).unwrap().key(), hash.to_string());
        assert!(!retired.exists(&hash.record_key()));
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let repo = MemoryRepository::<HashUsageCount>::new();
        let key = unsalted_hash_hex(Some("x"));

        let first = repo.upsert(&key, || HashUsageCount::new(Some("x")), |_| {});
        assert_eq!(first.usage_count, 0);

        let second = repo.upsert(&key, || HashUsageCount::new(Some("x")), |e| {
            e.increment();
        });
        assert_eq!(second.usage_count, 1);
        assert_eq!(repo.count(), 1);
    }

    #[test]
    fn test_concurrent_record_usage_loses_no_increments() {
        let repo = Arc::new(MemoryRepository::<HashUsageCount>::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        record_usage(repo.as_ref(), Some("spamandeggs"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entry = repo.find(&unsalted_hash_hex(Some("spamandeggs"))).unwrap();
        assert_eq!(entry.usage_count, 800);
    }

    #[test]
    fn test_record_usage_counts_per_cleartext() {
        let repo = MemoryRepository::<HashUsageCount>::new();
        assert_eq!(record_usage(&repo, Some("spamandeggs")), 1);
        assert_eq!(record_usage(&repo, Some("spamandeggs")), 2);
        assert_eq!(record_usage(&repo, Some("ham")), 1);
        assert_eq!(repo.count(), 2);

        let entry = repo.find(&unsalted_hash_hex(Some("spamandeggs"))).unwrap();
        assert_eq!(entry.usage_count, 2);
        assert!(entry.last_updated_at >= entry.created_at);
    }

    #[test]
    fn test_save_replaces_and_returns_previous() {
        let repo = MemoryRepository::<HashUsageCount>::new();
        let mut entry = HashUsageCount::new(Some("x"));
        assert!(repo.save(entry.clone()).is_none());
        entry.increment();
        let previous = repo.save(entry).unwrap();
        assert_eq!(previous.usage_count, 0);
    }

    #[test]
    fn test_save_all() {
        let repo = MemoryRepository::<UsedHash>::new();
        let records: Vec<UsedHash> = (0..4).map(|i| UsedHash::new(&sample_hash(i))).collect();
        let previous = repo.save_all(records);
        assert!(previous.iter().all(Option::is_none));
        assert_eq!(repo.count(), 4);
    }

    #[test]
    fn test_concurrent_save_if_absent_single_winner() {
        let repo = Arc::new(MemoryRepository::<UsedHash>::new());
        let hash = sample_hash(0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let hash = hash.clone();
                std::thread::spawn(move || mark_used(repo.as_ref(), &hash))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|saved| *saved)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(repo.count(), 1);
    }
}
