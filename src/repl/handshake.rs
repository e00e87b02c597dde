// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Master-side handshake detection and the full-sync dump.
//!
//! A connecting slave is told apart from an ordinary client by peeking —
//! without consuming — the first bytes on the socket for the literal
//! prefix `PSYNC`. The actual `peek` call lives in the reactor (it needs
//! the raw socket); this module only knows the prefix and the length it
//! needs to see.

use crate::resp::{encode_frame, reply};
use crate::store::Dict;

/// Bytes of non-destructive peek the reactor takes before deciding whether
/// a new connection is a slave handshake or an ordinary client frame.
pub const PEEK_LEN: usize = 16;

/// `PSYNC` request prefix a slave sends in place of a normal command frame.
pub const PSYNC_PREFIX: &[u8] = b"PSYNC";

/// True if the peeked bytes open with the PSYNC prefix.
pub fn is_psync_handshake(peeked: &[u8]) -> bool {
    peeked.starts_with(PSYNC_PREFIX)
}

/// Builds the full-sync payload sent to a newly attached slave: a
/// `+FULLSYNC\r\n` marker, one synthetic `SET key value` frame per live
/// entry (in `dict`'s iteration order), and a closing `+OK\r\n`.
pub fn build_full_sync_dump(dict: &Dict) -> Vec<u8> {
    let mut out = reply::simple("FULLSYNC");
    dict.foreach(|key, value| {
        out.extend_from_slice(&encode_frame(&[b"SET", key, value]));
    });
    out.extend_from_slice(&reply::ok());
    out
}

#[cfg(test)]
mod handshake_test;
