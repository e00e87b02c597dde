// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The RESP-like multi-bulk wire protocol: frame parsing on the way in,
//! reply-shape encoding on the way out.

pub mod frame;
pub mod parser;
pub mod reply;

pub use frame::encode_frame;
pub use parser::{find_resync_point, parse_frame, Args, MAX_BULKS};
