// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The consolidated server state: the dictionary, persistence, and
//! replication bookkeeping, threaded explicitly through every handler
//! instead of living behind global statics.

use log::{info, warn};

use crate::config::Config;
use crate::error::StoreResult;
use crate::exec::{self, Effect};
use crate::persist::{Aof, RdbManager};
use crate::repl::{Role, SlaveRegistry};
use crate::resp::{reply, Args};
use crate::store::Dict;

/// Outcome of applying one client-issued frame: the reply to write back,
/// and whether the reactor should forward it to attached slaves.
pub struct ApplyResult {
    pub reply: Vec<u8>,
    pub should_feed: bool,
}

pub struct Engine {
    pub dict: Dict,
    pub aof: Aof,
    pub rdb: RdbManager,
    pub role: Role,
    pub slaves: SlaveRegistry,
}

impl Engine {
    pub fn new(config: &Config) -> Self {
        let role = match &config.slaveof {
            Some(addr) => Role::Slave {
                master_host: addr.host.clone(),
                master_port: addr.port,
            },
            None => Role::Master,
        };
        Engine {
            dict: Dict::new(),
            aof: Aof::new(config.aof_path.clone(), config.aof_rewrite_threshold_bytes),
            rdb: RdbManager::new(config.rdb_path.clone(), config.rdb_interval),
            role,
            slaves: SlaveRegistry::new(),
        }
    }

    /// Loads the RDB snapshot, then replays the AOF on top of it — the
    /// snapshot is the base state, the log is everything since.
    pub fn bootstrap(&mut self) -> StoreResult<()> {
        let rdb_entries = self.rdb.load(&mut self.dict)?;
        info!("loaded {} entries from RDB snapshot", rdb_entries);
        match self.aof.replay(&mut self.dict) {
            Ok(applied) => {
                info!("replayed {} commands from AOF", applied);
                Ok(())
            }
            Err(e) => {
                warn!("AOF replay stopped early: {}", e);
                Err(e)
            }
        }
    }

    /// Applies a frame received from a normal client connection. `raw_frame`
    /// is the exact bytes the client sent, appended to the AOF verbatim so
    /// replay reproduces the same input rather than a re-encoded one.
    pub fn apply_client_command(&mut self, raw_frame: &[u8], args: &Args) -> ApplyResult {
        let outcome = exec::execute(&mut self.dict, args);

        if outcome.mutated {
            self.aof.append(raw_frame);
            self.rdb.mark_dirty();
        }

        let reply = match outcome.effect {
            Effect::Save => match self.rdb.save(&self.dict) {
                Ok(()) => outcome.reply,
                Err(e) => reply::error(&format!("save failed: {}", e)),
            },
            Effect::None => outcome.reply,
        };

        ApplyResult {
            reply,
            should_feed: outcome.mutated && matches!(self.role, Role::Master),
        }
    }

    /// Applies a command received over the master link. Never appended to
    /// this process's own AOF and never fed onward — see [`crate::repl::slave`].
    pub fn apply_from_master(&mut self, args: &Args) {
        exec::execute(&mut self.dict, args);
        self.rdb.mark_dirty();
    }

    /// Runs the periodic (1 Hz) maintenance check: background RDB save if
    /// the interval elapsed, AOF rewrite if it's grown past the threshold.
    pub fn on_timer_tick(&mut self) -> StoreResult<()> {
        if self.rdb.check_and_save(&self.dict)? {
            info!("periodic RDB save completed");
        }
        if self.aof.needs_rewrite()? {
            self.aof.rewrite(&self.dict)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod engine_test;
