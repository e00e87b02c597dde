// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! What this process is: a master accepting slave connections, or a slave
//! following one master. The role is fixed at startup from the CLI
//! `--slaveof` flag; there is no runtime command to change it.

/// This server's replication role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Master,
    Slave { master_host: String, master_port: u16 },
}

impl Role {
    pub fn is_slave(&self) -> bool {
        matches!(self, Role::Slave { .. })
    }
}
