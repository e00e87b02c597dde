// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Slave-side ingestion of the master link: full-sync markers and live
//! command frames arrive on the same stream, and both are recognized with
//! the shared RESP frame parser rather than a simpler token split — a
//! master's `SET`/`HSET`/`HDEL`/`HMOD` traffic is read exactly as a client
//! connection would read it.
//!
//! Commands applied from the master are never re-appended to this
//! process's own AOF and never re-fed onward: chained replication isn't
//! supported, so there is nothing downstream of a slave to feed.

use crate::error::{StoreError, StoreResult};
use crate::exec;
use crate::resp::{parser, Args};
use crate::store::Dict;

/// One unit parsed off the master link.
#[derive(Debug, PartialEq, Eq)]
pub enum MasterMessage {
    FullSyncStart,
    Ok,
    Command(Args),
}

/// Parses one message from the head of `buf`, mirroring
/// [`parser::parse_frame`]'s `Ok(None)` = need-more-data convention.
pub fn parse_master_message(buf: &[u8]) -> StoreResult<Option<(MasterMessage, usize)>> {
    if buf.is_empty() {
        return Ok(None);
    }
    match buf[0] {
        b'+' => {
            let Some(end) = find_crlf(buf) else {
                return Ok(None);
            };
            let tag = &buf[1..end];
            let consumed = end + 2;
            match tag {
                b"FULLSYNC" => Ok(Some((MasterMessage::FullSyncStart, consumed))),
                b"OK" => Ok(Some((MasterMessage::Ok, consumed))),
                other => Err(StoreError::ProtocolError {
                    reason: format!(
                        "unrecognized simple-string marker from master: {}",
                        String::from_utf8_lossy(other)
                    ),
                }),
            }
        }
        b'*' => match parser::parse_frame(buf)? {
            None => Ok(None),
            Some((args, consumed)) => Ok(Some((MasterMessage::Command(args), consumed))),
        },
        other => Err(StoreError::ProtocolError {
            reason: format!("unexpected leading byte {:#04x} from master", other),
        }),
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Applies a parsed master message to `dict`. Only [`MasterMessage::Command`]
/// has a dictionary effect; the sync markers are acknowledgements the caller
/// may use to track full-sync progress but don't themselves mutate state.
pub fn apply_master_message(dict: &mut Dict, msg: &MasterMessage) {
    if let MasterMessage::Command(args) = msg {
        exec::execute(dict, args);
    }
}

#[cfg(test)]
mod slave_test;
