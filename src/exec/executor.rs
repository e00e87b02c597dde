// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Command dispatch: turns one parsed frame into a dictionary mutation (if
//! any) and a reply. Side effects that live outside the dictionary — AOF
//! append, slave feed, RDB save — are reported back to the caller rather
//! than performed here, so this module stays testable against a bare
//! [`Dict`] and has no knowledge of files or sockets.

use crate::resp::{reply, Args};
use crate::store::{Dict, SetOutcome};

/// What happened outside the dictionary as a result of executing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// No effect beyond the dictionary (or no mutation at all).
    None,
    /// `SAVE` was requested; caller should perform a synchronous RDB save
    /// and may need to rewrite `reply` to an error shape if it fails.
    Save,
}

/// The result of running one frame against a dictionary.
pub struct ExecOutcome {
    /// Bytes to write back to the connection that sent the frame.
    pub reply: Vec<u8>,
    /// Whether the dictionary was mutated. Mutating commands get appended
    /// to the AOF and fed to attached slaves by the caller; non-mutating
    /// ones don't.
    pub mutated: bool,
    pub effect: Effect,
}

impl ExecOutcome {
    fn read(reply: Vec<u8>) -> Self {
        ExecOutcome {
            reply,
            mutated: false,
            effect: Effect::None,
        }
    }

    fn write(reply: Vec<u8>, mutated: bool) -> Self {
        ExecOutcome {
            reply,
            mutated,
            effect: Effect::None,
        }
    }
}

/// Executes one already-parsed frame against `dict`.
///
/// `SET` is accepted alongside the public `HSET`/`HGET`/`HDEL`/`HMOD`/
/// `HEXIST`/`SAVE` surface but is never sent by a well-behaved client: it's
/// the synthetic command replication uses for full-sync dumps and for
/// forwarding `HSET`/`HMOD` to slaves, and unlike `HSET` it always
/// overwrites rather than reporting `+EXIST`.
pub fn execute(dict: &mut Dict, args: &Args) -> ExecOutcome {
    let Some(cmd) = args.first() else {
        return ExecOutcome::read(reply::error("empty command"));
    };
    let cmd_upper = cmd.to_ascii_uppercase();

    match cmd_upper.as_slice() {
        b"HSET" => dispatch_hset(dict, args),
        b"SET" => dispatch_set(dict, args),
        b"HGET" => dispatch_hget(dict, args),
        b"HDEL" => dispatch_hdel(dict, args),
        b"HMOD" => dispatch_hmod(dict, args),
        b"HEXIST" => dispatch_hexist(dict, args),
        b"SAVE" => dispatch_save(args),
        other => ExecOutcome::read(reply::error(&format!(
            "unknown command '{}'",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn dispatch_hset(dict: &mut Dict, args: &Args) -> ExecOutcome {
    if args.len() != 3 {
        return ExecOutcome::read(reply::error("wrong number of arguments for 'HSET'"));
    }
    match dict.set(&args[1], &args[2]) {
        SetOutcome::Inserted => ExecOutcome::write(reply::ok(), true),
        SetOutcome::AlreadyExists => ExecOutcome::write(reply::exist(), false),
    }
}

fn dispatch_set(dict: &mut Dict, args: &Args) -> ExecOutcome {
    if args.len() != 3 {
        return ExecOutcome::read(reply::error("wrong number of arguments for 'SET'"));
    }
    dict.set(&args[1], &args[2]);
    ExecOutcome::write(reply::ok(), true)
}

fn dispatch_hget(dict: &mut Dict, args: &Args) -> ExecOutcome {
    if args.len() != 2 {
        return ExecOutcome::read(reply::error("wrong number of arguments for 'HGET'"));
    }
    match dict.get(&args[1]) {
        Some(value) => ExecOutcome::read(reply::bulk(value)),
        None => ExecOutcome::read(reply::null_bulk()),
    }
}

fn dispatch_hdel(dict: &mut Dict, args: &Args) -> ExecOutcome {
    if args.len() != 2 {
        return ExecOutcome::read(reply::error("wrong number of arguments for 'HDEL'"));
    }
    let removed = dict.del(&args[1]);
    if removed {
        ExecOutcome::write(reply::ok(), true)
    } else {
        ExecOutcome::read(reply::null_bulk())
    }
}

fn dispatch_hmod(dict: &mut Dict, args: &Args) -> ExecOutcome {
    if args.len() != 3 {
        return ExecOutcome::read(reply::error("wrong number of arguments for 'HMOD'"));
    }
    let updated = dict.mod_(&args[1], &args[2]);
    if updated {
        ExecOutcome::write(reply::ok(), true)
    } else {
        ExecOutcome::read(reply::null_bulk())
    }
}

fn dispatch_hexist(dict: &mut Dict, args: &Args) -> ExecOutcome {
    if args.len() != 2 {
        return ExecOutcome::read(reply::error("wrong number of arguments for 'HEXIST'"));
    }
    let present = dict.exist(&args[1]);
    ExecOutcome::read(reply::integer(present as i64))
}

fn dispatch_save(args: &Args) -> ExecOutcome {
    if args.len() != 1 {
        return ExecOutcome::read(reply::error("wrong number of arguments for 'SAVE'"));
    }
    ExecOutcome {
        reply: reply::ok(),
        mutated: false,
        effect: Effect::Save,
    }
}

#[cfg(test)]
mod executor_test;
