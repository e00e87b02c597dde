// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Command dispatch table: turns a parsed frame into a dictionary mutation
//! and a reply.

pub mod executor;

pub use executor::{execute, Effect, ExecOutcome};
