// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! A single-node, in-memory key/value store with durable append-only-file
//! and snapshot persistence, and asynchronous master-to-replica
//! replication over a RESP-like TCP protocol.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kvstore::config::Config;
//! use kvstore::reactor::Reactor;
//!
//! let config = Config::new(6380);
//! let mut reactor = Reactor::new(config)?;
//! reactor.run()?;
//! # Ok::<(), kvstore::error::StoreError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod persist;
pub mod reactor;
pub mod repl;
pub mod resp;
pub mod store;

pub use error::{StoreError, StoreResult};
