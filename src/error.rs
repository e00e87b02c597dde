// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for kvstore operations.
//!
//! Provides structured error handling with detailed context for debugging.

use std::fmt;

/// Standard Result type for all kvstore operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for kvstore operations.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Key exceeds the RDB loader's size guard.
    KeyTooLarge { len: usize, max: usize },

    /// Value exceeds the RDB loader's size guard.
    ValueTooLarge { len: usize, max: usize },

    /// RESP frame is malformed (bad sigil, non-digit length, argc over cap).
    ProtocolError { reason: String },

    /// Unknown command name in the dispatch table.
    UnknownCommand { name: String },

    /// Command invoked with the wrong number of arguments.
    WrongArity { command: String },

    /// RDB file is truncated or has an out-of-range length field.
    RdbCorrupted { reason: String },

    /// AOF replay hit a protocol error mid-file.
    AofCorrupted { reason: String, replayed: usize },

    /// A per-connection buffer could not grow within the hard cap.
    BufferCapacityExceeded { cap: usize },

    /// The replica slot table (128 entries) is full.
    SlaveCapacityExceeded,

    /// I/O error during a file or socket operation.
    Io { operation: String, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyTooLarge { len, max } => {
                write!(f, "key length {} exceeds maximum {}", len, max)
            }
            Self::ValueTooLarge { len, max } => {
                write!(f, "value length {} exceeds maximum {}", len, max)
            }
            Self::ProtocolError { reason } => write!(f, "protocol error: {}", reason),
            Self::UnknownCommand { name } => write!(f, "unknown command '{}'", name),
            Self::WrongArity { command } => {
                write!(f, "wrong number of arguments for '{}'", command)
            }
            Self::RdbCorrupted { reason } => write!(f, "RDB file corrupted: {}", reason),
            Self::AofCorrupted { reason, replayed } => write!(
                f,
                "AOF corrupted after replaying {} commands: {}",
                replayed, reason
            ),
            Self::BufferCapacityExceeded { cap } => {
                write!(f, "buffer exceeded hard cap of {} bytes", cap)
            }
            Self::SlaveCapacityExceeded => write!(f, "replica slot table is full"),
            Self::Io { operation, reason } => {
                write!(f, "I/O error during '{}': {}", operation, reason)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            operation: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}
