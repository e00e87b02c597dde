// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! In-memory byte-safe dictionary and its binary snapshot codec.

pub mod dict;
pub mod rdb;

pub use dict::{Dict, SetOutcome, BUCKET_COUNT};
