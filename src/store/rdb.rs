// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Binary RDB codec: `(key_len, key_bytes, value_len, value_bytes)` records
//! until EOF, with `key_len`/`value_len` as host-endian `usize`.
//!
//! Deliberately simple: no magic number, no version byte, no hash (a
//! cross-process load re-hashes into whichever bucket the receiving
//! process's djb2 picks). This also means the format is not portable
//! across architectures that differ in `usize` width or endianness —
//! an accepted limitation, not an oversight.

use std::io::{self, Read, Write};

use super::Dict;
use crate::error::{StoreError, StoreResult};

/// Keys above this size abort the load as corruption.
pub const MAX_KEY_LEN: usize = 1024 * 1024;
/// Values above this size abort the load as corruption.
pub const MAX_VALUE_LEN: usize = 10 * 1024 * 1024;

const LEN_WIDTH: usize = std::mem::size_of::<usize>();

/// Writes every entry of `dict` to `w` as a sequence of length-prefixed
/// records, then flushes.
pub fn save<W: Write>(dict: &Dict, w: &mut W) -> io::Result<()> {
    let mut err = None;
    dict.foreach(|key, value| {
        if err.is_some() {
            return;
        }
        if let Err(e) = write_record(w, key, value) {
            err = Some(e);
        }
    });
    if let Some(e) = err {
        return Err(e);
    }
    w.flush()
}

fn write_record<W: Write>(w: &mut W, key: &[u8], value: &[u8]) -> io::Result<()> {
    w.write_all(&key.len().to_ne_bytes())?;
    w.write_all(key)?;
    w.write_all(&value.len().to_ne_bytes())?;
    w.write_all(value)?;
    Ok(())
}

/// Reads records from `r` into `dict` until a clean EOF at a record
/// boundary. Returns the number of entries loaded.
///
/// Rejects `key_len > MAX_KEY_LEN` or `value_len > MAX_VALUE_LEN` as
/// corruption, returning the count of entries successfully loaded before
/// the bad record.
pub fn load<R: Read>(dict: &mut Dict, r: &mut R) -> StoreResult<usize> {
    let mut loaded = 0usize;
    loop {
        let key_len = match read_len_or_eof(r)? {
            None => return Ok(loaded),
            Some(n) => n,
        };
        if key_len > MAX_KEY_LEN {
            return Err(StoreError::RdbCorrupted {
                reason: format!("key_len {} exceeds {} byte cap", key_len, MAX_KEY_LEN),
            });
        }
        let key = read_exact_vec(r, key_len)?;

        let value_len = read_len(r)?;
        if value_len > MAX_VALUE_LEN {
            return Err(StoreError::RdbCorrupted {
                reason: format!("value_len {} exceeds {} byte cap", value_len, MAX_VALUE_LEN),
            });
        }
        let value = read_exact_vec(r, value_len)?;

        dict.set(&key, &value);
        loaded += 1;
    }
}

fn read_len<R: Read>(r: &mut R) -> StoreResult<usize> {
    let mut buf = [0u8; LEN_WIDTH];
    r.read_exact(&mut buf).map_err(|e| StoreError::RdbCorrupted {
        reason: format!("truncated length field: {}", e),
    })?;
    Ok(usize::from_ne_bytes(buf))
}

/// Reads a length field, distinguishing "clean EOF, nothing more to read"
/// (returns `Ok(None)`) from a truncated field partway through.
fn read_len_or_eof<R: Read>(r: &mut R) -> StoreResult<Option<usize>> {
    let mut buf = [0u8; LEN_WIDTH];
    let mut filled = 0;
    while filled < LEN_WIDTH {
        match r.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(StoreError::RdbCorrupted {
                    reason: "truncated length field at EOF".to_string(),
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(StoreError::RdbCorrupted {
                    reason: format!("read error: {}", e),
                })
            }
        }
    }
    Ok(Some(usize::from_ne_bytes(buf)))
}

fn read_exact_vec<R: Read>(r: &mut R, len: usize) -> StoreResult<Vec<u8>> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).map_err(|e| StoreError::RdbCorrupted {
        reason: format!("truncated payload of {} bytes: {}", len, e),
    })?;
    Ok(buf)
}

#[cfg(test)]
mod rdb_test;
