// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The non-blocking, single-threaded reactor: connection bookkeeping, the
//! listening socket, and the `mio`-driven event loop.

pub mod conn;
pub mod listener;
pub mod loop_;

pub use conn::{ConnId, ConnKind, Connection, ConnectionTable};
pub use loop_::Reactor;
