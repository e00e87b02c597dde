// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Connection bookkeeping: the opaque [`ConnId`] token other modules use to
//! refer to a connection, the dynamically growable per-connection read
//! buffer, and the table the reactor uses to look connections up by id.
//!
//! Nothing outside this module (and [`super::loop_`], which owns the
//! sockets) ever holds a raw [`mio::net::TcpStream`] — [`crate::exec`] and
//! [`crate::repl`] only ever see a [`ConnId`].

use std::collections::HashMap;

use mio::net::TcpStream;
use mio::Token;

use crate::error::{StoreError, StoreResult};

/// Initial per-connection read buffer size.
pub const INITIAL_BUFFER_SIZE: usize = 64 * 1024;
/// Hard cap a read buffer is never grown past.
pub const MAX_BUFFER_SIZE: usize = 128 * 1024 * 1024;
/// Buffer doubles whenever free space drops below this many bytes.
const LOW_WATERMARK: usize = 4 * 1024;

/// Opaque handle to a connection, stable for its lifetime. Backed by the
/// `mio::Token` the reactor registered it under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(u64);

impl ConnId {
    pub fn from_raw(raw: u64) -> Self {
        ConnId(raw)
    }

    pub fn as_token(self) -> Token {
        Token(self.0 as usize)
    }

    pub fn from_token(token: Token) -> Self {
        ConnId(token.0 as u64)
    }
}

/// What kind of peer a connection is, replacing the C source's
/// function-pointer callback table with a tagged enum the reactor matches
/// on to decide how to interpret incoming bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnKind {
    Listener,
    Client,
    Slave,
    MasterLink,
}

/// A byte buffer that starts small and doubles on demand, up to
/// [`MAX_BUFFER_SIZE`]. Bytes are always consumed from the front, which
/// means `consume` pays a `copy_within` — acceptable here since frames are
/// consumed promptly and buffers don't sit full for long.
pub struct GrowBuffer {
    data: Vec<u8>,
    len: usize,
}

impl GrowBuffer {
    pub fn new() -> Self {
        GrowBuffer {
            data: vec![0u8; INITIAL_BUFFER_SIZE],
            len: 0,
        }
    }

    /// The bytes currently held, oldest first.
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn free_capacity(&self) -> usize {
        self.data.len() - self.len
    }

    /// Doubles the buffer until at least [`LOW_WATERMARK`] bytes of free
    /// space are available, or fails once doubling would exceed the cap.
    pub fn ensure_headroom(&mut self) -> StoreResult<()> {
        while self.free_capacity() < LOW_WATERMARK {
            let new_cap = self.data.len().saturating_mul(2);
            if new_cap > MAX_BUFFER_SIZE {
                return Err(StoreError::BufferCapacityExceeded {
                    cap: MAX_BUFFER_SIZE,
                });
            }
            self.data.resize(new_cap, 0);
        }
        Ok(())
    }

    /// The writable tail a `read()` call should fill.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.len..]
    }

    /// Marks `n` freshly-written bytes at the tail as valid data.
    pub fn commit(&mut self, n: usize) {
        self.len += n;
    }

    /// Drops the first `n` bytes, shifting the remainder to the front.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.data.copy_within(n..self.len, 0);
        self.len -= n;
    }
}

impl Default for GrowBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes queued to write once the socket is writable again. Unlike
/// [`GrowBuffer`], there's no fixed-size tail to read into — the only thing
/// mirrored from it is the hard cap: a reply (or replication feed) that
/// would push the queue past [`MAX_BUFFER_SIZE`] is refused rather than
/// left to grow `Vec` unbounded, so a stalled peer can't pin an unbounded
/// amount of memory on this side.
pub struct WriteBuffer {
    data: Vec<u8>,
}

impl WriteBuffer {
    pub fn new() -> Self {
        WriteBuffer { data: Vec::new() }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drops the first `n` bytes once they've been written to the socket.
    pub fn drain_front(&mut self, n: usize) {
        self.data.drain(..n);
    }

    /// Appends `bytes`, failing instead of growing past [`MAX_BUFFER_SIZE`].
    /// The caller should close the connection on error, the same response
    /// [`GrowBuffer::ensure_headroom`] provokes on the read side.
    pub fn queue(&mut self, bytes: &[u8]) -> StoreResult<()> {
        if self.data.len() + bytes.len() > MAX_BUFFER_SIZE {
            return Err(StoreError::BufferCapacityExceeded {
                cap: MAX_BUFFER_SIZE,
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// One live connection: its socket, its kind, its read buffer, and any
/// bytes queued to write once the socket is writable again.
pub struct Connection {
    pub id: ConnId,
    pub kind: ConnKind,
    pub socket: TcpStream,
    pub read_buf: GrowBuffer,
    pub write_buf: WriteBuffer,
}

impl Connection {
    pub fn new(id: ConnId, kind: ConnKind, socket: TcpStream) -> Self {
        Connection {
            id,
            kind,
            socket,
            read_buf: GrowBuffer::new(),
            write_buf: WriteBuffer::new(),
        }
    }

    /// Queues `bytes` for writing. Returns an error if doing so would push
    /// the write buffer past its cap; the caller should drop the
    /// connection in that case rather than retry.
    pub fn queue_write(&mut self, bytes: &[u8]) -> StoreResult<()> {
        self.write_buf.queue(bytes)
    }
}

/// Reactor-owned table of live connections, keyed by [`ConnId`].
#[derive(Default)]
pub struct ConnectionTable {
    conns: HashMap<ConnId, Connection>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        ConnectionTable {
            conns: HashMap::new(),
        }
    }

    pub fn insert(&mut self, conn: Connection) {
        self.conns.insert(conn.id, conn);
    }

    pub fn remove(&mut self, id: ConnId) -> Option<Connection> {
        self.conns.remove(&id)
    }

    pub fn get(&self, id: ConnId) -> Option<&Connection> {
        self.conns.get(&id)
    }

    pub fn get_mut(&mut self, id: ConnId) -> Option<&mut Connection> {
        self.conns.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ConnId> + '_ {
        self.conns.keys().copied()
    }
}

#[cfg(test)]
mod conn_test;
