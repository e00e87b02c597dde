// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Binding the listening socket.

use std::net::SocketAddr;

use mio::net::TcpListener;

use crate::error::StoreResult;

/// Binds a non-blocking listener on `addr`.
pub fn bind(addr: SocketAddr) -> StoreResult<TcpListener> {
    let listener = TcpListener::bind(addr)?;
    Ok(listener)
}
