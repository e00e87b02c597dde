// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Reply-shape encoders. Every command produces exactly one of these wire
//! shapes; none of them require knowledge of the request that produced them.

/// Simple string `+OK\r\n`.
pub fn ok() -> Vec<u8> {
    b"+OK\r\n".to_vec()
}

/// Simple string `+EXIST\r\n`, returned when `HSET` finds the key already
/// present and leaves the existing value untouched.
pub fn exist() -> Vec<u8> {
    b"+EXIST\r\n".to_vec()
}

/// Bulk string reply carrying `data` verbatim, binary-safe.
pub fn bulk(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 16);
    out.extend_from_slice(format!("${}\r\n", data.len()).as_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
    out
}

/// Null bulk reply `$-1\r\n`, returned when a key is absent.
pub fn null_bulk() -> Vec<u8> {
    b"$-1\r\n".to_vec()
}

/// Integer reply, used for `HEXIST`'s membership check.
pub fn integer(value: i64) -> Vec<u8> {
    format!(":{}\r\n", value).into_bytes()
}

/// Error reply `-ERR <message>\r\n`. `message` must not itself contain a
/// CRLF; callers pass short, single-line descriptions.
pub fn error(message: &str) -> Vec<u8> {
    format!("-ERR {}\r\n", message).into_bytes()
}

/// Simple string reply carrying an arbitrary tag, used for replication
/// markers (`+FULLSYNC\r\n`) that aren't otherwise one of the shapes above.
pub fn simple(tag: &str) -> Vec<u8> {
    format!("+{}\r\n", tag).into_bytes()
}

#[cfg(test)]
mod reply_test;
