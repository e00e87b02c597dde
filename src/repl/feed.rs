// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The master-side registry of attached slave connections and the live
//! command feed. The registry holds only [`ConnId`]s — it never touches a
//! socket directly; the reactor owns the write path and reports send
//! failures back by `ConnId`.

use crate::error::{StoreError, StoreResult};
use crate::reactor::ConnId;

/// Matches the original design's fixed slave-slot limit.
pub const MAX_SLAVES: usize = 128;

#[derive(Default)]
pub struct SlaveRegistry {
    slaves: Vec<ConnId>,
}

impl SlaveRegistry {
    pub fn new() -> Self {
        SlaveRegistry { slaves: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.slaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slaves.is_empty()
    }

    pub fn add(&mut self, id: ConnId) -> StoreResult<()> {
        if self.slaves.len() >= MAX_SLAVES {
            return Err(StoreError::SlaveCapacityExceeded);
        }
        self.slaves.push(id);
        Ok(())
    }

    pub fn remove(&mut self, id: ConnId) {
        if let Some(pos) = self.slaves.iter().position(|&s| s == id) {
            self.slaves.swap_remove(pos);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnId> {
        self.slaves.iter()
    }
}

/// Feeds `frame` to every registered slave via `send`, dropping (swap-remove)
/// any slave whose send fails. `send` returns `true` on success.
pub fn feed_slaves<F: FnMut(ConnId, &[u8]) -> bool>(
    registry: &mut SlaveRegistry,
    frame: &[u8],
    mut send: F,
) {
    let mut failed = Vec::new();
    for &id in registry.iter() {
        if !send(id, frame) {
            failed.push(id);
        }
    }
    for id in failed {
        registry.remove(id);
    }
}

#[cfg(test)]
mod feed_test;
