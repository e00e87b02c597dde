// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::Parser;
use kvstore::config::{Config, MasterAddr};
use kvstore::reactor::Reactor;

/// A single-node, in-memory key/value store.
#[derive(Parser, Debug)]
#[command(name = "kvstore", version, about)]
struct Cli {
    /// Port to listen on.
    port: u16,

    /// Replicate from an existing master: `--slaveof <ip> <port>`.
    #[arg(long, num_args = 2, value_names = ["IP", "PORT"])]
    slaveof: Option<Vec<String>>,

    /// Append-only file path.
    #[arg(long, default_value = "./data/kvstore.aof")]
    aof: PathBuf,

    /// RDB snapshot path.
    #[arg(long, default_value = "./data/kvstore.rdb")]
    rdb: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::new(cli.port);
    config.aof_path = cli.aof;
    config.rdb_path = cli.rdb;
    if let Some(parts) = cli.slaveof {
        let port: u16 = parts[1]
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid --slaveof port: {}", parts[1]))?;
        config.slaveof = Some(MasterAddr {
            host: parts[0].clone(),
            port,
        });
    }

    let mut reactor = Reactor::new(config)?;
    reactor.run()?;
    Ok(())
}
