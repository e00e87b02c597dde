// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Durability: the append-only command log and the periodic binary
//! snapshot, each independently replayable at startup.

pub mod aof;
pub mod rdb;

pub use aof::Aof;
pub use rdb::RdbManager;
