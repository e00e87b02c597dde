// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Asynchronous master-to-replica replication: PSYNC handshake detection,
//! the full-sync dump, the live command feed, and slave-side ingestion.

pub mod feed;
pub mod handshake;
pub mod role;
pub mod slave;

pub use feed::{feed_slaves, SlaveRegistry, MAX_SLAVES};
pub use handshake::{build_full_sync_dump, is_psync_handshake, PEEK_LEN};
pub use role::Role;
pub use slave::{apply_master_message, parse_master_message, MasterMessage};
