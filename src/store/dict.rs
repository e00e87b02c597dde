// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Byte-safe key-value dictionary.
//!
//! A fixed-width bucket array of chained entries, keyed by arbitrary byte
//! strings (may contain NUL, `\r`, `\n` — length comes from the RESP bulk,
//! never from a C-style NUL scan).

/// Number of buckets in the dictionary. Fixed for the life of the process;
/// chaining absorbs growth instead of resizing.
pub const BUCKET_COUNT: usize = 65536;

struct Entry {
    key: Vec<u8>,
    value: Vec<u8>,
}

/// Outcome of a `set()` call, distinguishing insert from update so the
/// executor can reply `+OK` vs `+EXIST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Inserted,
    AlreadyExists,
}

/// Byte-safe hash dictionary. Uniquely owns every key/value buffer it holds.
pub struct Dict {
    buckets: Vec<Vec<Entry>>,
    count: usize,
}

impl Dict {
    /// Creates an empty dictionary with `BUCKET_COUNT` buckets.
    pub fn new() -> Self {
        let mut buckets = Vec::with_capacity(BUCKET_COUNT);
        for _ in 0..BUCKET_COUNT {
            buckets.push(Vec::new());
        }
        Dict { buckets, count: 0 }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// djb2 hash over the raw key bytes, reduced mod `BUCKET_COUNT`.
    ///
    /// Fixed by spec: the snapshot file does not encode the hash, so
    /// determinism only matters within a single process.
    fn bucket_index(key: &[u8]) -> usize {
        let mut hash: u32 = 5381;
        for &b in key {
            hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(b as u32);
        }
        (hash as usize) % BUCKET_COUNT
    }

    /// Inserts `(key, value)` if the key is absent, else overwrites the
    /// existing value in place. Returns whether the key already existed.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> SetOutcome {
        let idx = Self::bucket_index(key);
        let bucket = &mut self.buckets[idx];
        if let Some(entry) = bucket.iter_mut().find(|e| e.key == key) {
            entry.value = value.to_vec();
            return SetOutcome::AlreadyExists;
        }
        bucket.push(Entry {
            key: key.to_vec(),
            value: value.to_vec(),
        });
        self.count += 1;
        SetOutcome::Inserted
    }

    /// Looks up a key. The returned slice is valid until the next mutation
    /// of this dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let idx = Self::bucket_index(key);
        self.buckets[idx]
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_slice())
    }

    /// Removes a key. Returns whether it was present.
    pub fn del(&mut self, key: &[u8]) -> bool {
        let idx = Self::bucket_index(key);
        let bucket = &mut self.buckets[idx];
        if let Some(pos) = bucket.iter().position(|e| e.key == key) {
            bucket.swap_remove(pos);
            self.count -= 1;
            true
        } else {
            false
        }
    }

    /// Update-only set: replaces the value of an existing key. Fails
    /// (returns `false`) if the key is absent, distinguishing "not found"
    /// from an internal error at the call site.
    pub fn mod_(&mut self, key: &[u8], value: &[u8]) -> bool {
        let idx = Self::bucket_index(key);
        match self.buckets[idx].iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.value = value.to_vec();
                true
            }
            None => false,
        }
    }

    pub fn exist(&self, key: &[u8]) -> bool {
        let idx = Self::bucket_index(key);
        self.buckets[idx].iter().any(|e| e.key == key)
    }

    /// Visits every entry exactly once, in implementation-defined order.
    /// Used by RDB save and full-sync dump. Callers must not mutate the
    /// dictionary while iterating.
    pub fn foreach<F: FnMut(&[u8], &[u8])>(&self, mut cb: F) {
        for bucket in &self.buckets {
            for entry in bucket {
                cb(&entry.key, &entry.value);
            }
        }
    }
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod dict_test;
