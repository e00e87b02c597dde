// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The single-threaded event loop: one `mio::Poll`, one `ConnectionTable`,
//! dispatch by [`ConnKind`]. Blocking operations (RDB save, AOF rewrite,
//! full-sync dump) stay synchronous on this thread rather than being
//! pushed to a worker pool — the server is small enough that a stall
//! during a save is an acceptable, bounded cost, and keeping everything on
//! one thread means no locking anywhere in [`crate::engine::Engine`].

use std::io::{self, Read, Write};
use std::time::Duration;

use log::{debug, info, warn};
use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::StoreResult;
use crate::repl::{self, MasterMessage, Role};
use crate::resp::{self, reply};

use super::conn::{ConnId, ConnKind, Connection, ConnectionTable};
use super::listener::bind;

const LISTENER_TOKEN: Token = Token(0);
/// How often the maintenance tick (RDB interval check, AOF rewrite check)
/// runs, realized as a bounded `Poll::poll` timeout since mio carries no
/// timerfd-equivalent primitive.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct Reactor {
    poll: Poll,
    listener: TcpListener,
    conns: ConnectionTable,
    next_id: u64,
    engine: Engine,
}

impl Reactor {
    pub fn new(config: Config) -> StoreResult<Self> {
        let mut engine = Engine::new(&config);
        engine.bootstrap()?;

        let poll = Poll::new()?;
        let mut listener = bind(config.socket_addr())?;
        poll.registry()
            .register(&mut listener, LISTENER_TOKEN, Interest::READABLE)?;

        info!("listening on {}", config.socket_addr());

        let mut reactor = Reactor {
            poll,
            listener,
            conns: ConnectionTable::new(),
            next_id: 1,
            engine,
        };

        if let Role::Slave {
            master_host,
            master_port,
        } = reactor.engine.role.clone()
        {
            reactor.connect_to_master(&master_host, master_port)?;
        }

        Ok(reactor)
    }

    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs until the process is killed. Returns only on an unrecoverable
    /// I/O error from `Poll::poll` itself.
    pub fn run(&mut self) -> StoreResult<()> {
        let mut events = Events::with_capacity(1024);
        loop {
            match self.poll.poll(&mut events, Some(TICK_INTERVAL)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }

            if events.is_empty() {
                self.on_tick();
                continue;
            }

            for event in events.iter() {
                if event.token() == LISTENER_TOKEN {
                    self.accept_loop();
                    continue;
                }
                let id = ConnId::from_token(event.token());
                if event.is_readable() {
                    self.on_readable(id);
                }
                if event.is_writable() {
                    self.on_writable(id);
                }
            }

            self.on_tick();
        }
    }

    fn next_conn_id(&mut self) -> ConnId {
        let id = ConnId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    fn accept_loop(&mut self) {
        loop {
            let (mut socket, addr) = match self.listener.accept() {
                Ok(pair) => pair,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    return;
                }
            };

            let mut peek_buf = [0u8; repl::PEEK_LEN];
            let peeked = socket.peek(&mut peek_buf).unwrap_or(0);
            let is_slave = repl::is_psync_handshake(&peek_buf[..peeked]);

            let id = self.next_conn_id();
            if let Err(e) = self
                .poll
                .registry()
                .register(&mut socket, id.as_token(), Interest::READABLE)
            {
                warn!("failed to register new connection from {}: {}", addr, e);
                continue;
            }

            let kind = if is_slave { ConnKind::Slave } else { ConnKind::Client };
            let mut conn = Connection::new(id, kind, socket);
            if is_slave {
                match self.engine.slaves.add(id) {
                    Ok(()) => {
                        info!("slave attached from {}", addr);
                        if conn
                            .queue_write(&repl::build_full_sync_dump(&self.engine.dict))
                            .is_err()
                        {
                            warn!("full-sync dump for slave from {} exceeds write buffer cap", addr);
                            self.engine.slaves.remove(id);
                            let _ = self.poll.registry().deregister(&mut conn.socket);
                            continue;
                        }
                    }
                    Err(e) => {
                        warn!("rejecting slave from {}: {}", addr, e);
                        let _ = self.poll.registry().deregister(&mut conn.socket);
                        continue;
                    }
                }
            } else {
                debug!("client connected from {}", addr);
            }
            self.conns.insert(conn);
            self.flush_pending_writes(id);
        }
    }

    fn on_readable(&mut self, id: ConnId) {
        let kind = match self.conns.get(id) {
            Some(c) => c.kind,
            None => return,
        };

        loop {
            let Some(conn) = self.conns.get_mut(id) else { return };
            if let Err(e) = conn.read_buf.ensure_headroom() {
                warn!("connection {:?} exceeded buffer cap: {}", id, e);
                self.drop_connection(id);
                return;
            }
            let n = match conn.socket.read(conn.read_buf.spare_mut()) {
                Ok(0) => {
                    self.drop_connection(id);
                    return;
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    debug!("connection {:?} read error: {}", id, e);
                    self.drop_connection(id);
                    return;
                }
            };
            conn.read_buf.commit(n);
        }

        match kind {
            ConnKind::Client => self.drain_client_frames(id),
            ConnKind::Slave => { /* slaves never send frames back on this link */ }
            ConnKind::MasterLink => self.drain_master_messages(id),
            ConnKind::Listener => unreachable!("listener never registers for per-connection reads"),
        }

        self.flush_pending_writes(id);
    }

    fn drain_client_frames(&mut self, id: ConnId) {
        loop {
            let Some(conn) = self.conns.get_mut(id) else { return };
            if conn.read_buf.is_empty() {
                return;
            }
            match resp::parse_frame(conn.read_buf.filled()) {
                Ok(None) => return,
                Ok(Some((args, consumed))) => {
                    let raw = conn.read_buf.filled()[..consumed].to_vec();
                    conn.read_buf.consume(consumed);
                    let result = self.engine.apply_client_command(&raw, &args);
                    if let Some(conn) = self.conns.get_mut(id) {
                        if conn.queue_write(&result.reply).is_err() {
                            warn!("connection {:?} exceeded write buffer cap", id);
                            self.drop_connection(id);
                            return;
                        }
                    }
                    if result.should_feed {
                        self.feed_slaves(&raw);
                    }
                }
                Err(_) => {
                    let filled = conn.read_buf.filled().to_vec();
                    match resp::find_resync_point(&filled[1..]) {
                        Some(junk) => conn.read_buf.consume(junk + 1),
                        None => conn.read_buf.consume(filled.len()),
                    }
                    if let Some(conn) = self.conns.get_mut(id) {
                        if conn
                            .queue_write(&reply::error("protocol error, resynchronizing"))
                            .is_err()
                        {
                            warn!("connection {:?} exceeded write buffer cap", id);
                            self.drop_connection(id);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn drain_master_messages(&mut self, id: ConnId) {
        loop {
            let Some(conn) = self.conns.get_mut(id) else { return };
            if conn.read_buf.is_empty() {
                return;
            }
            match repl::parse_master_message(conn.read_buf.filled()) {
                Ok(None) => return,
                Ok(Some((msg, consumed))) => {
                    conn.read_buf.consume(consumed);
                    match &msg {
                        MasterMessage::Command(args) => self.engine.apply_from_master(args),
                        MasterMessage::FullSyncStart | MasterMessage::Ok => {
                            debug!("master link marker: {:?}", msg);
                        }
                    }
                }
                Err(e) => {
                    warn!("master link {:?} protocol error: {}, dropping link", id, e);
                    self.drop_connection(id);
                    return;
                }
            }
        }
    }

    fn feed_slaves(&mut self, raw_frame: &[u8]) {
        let conns = &mut self.conns;
        let mut overflowed = Vec::new();
        repl::feed_slaves(&mut self.engine.slaves, raw_frame, |slave_id, frame| {
            match conns.get_mut(slave_id) {
                Some(conn) => match conn.queue_write(frame) {
                    Ok(()) => true,
                    Err(_) => {
                        overflowed.push(slave_id);
                        false
                    }
                },
                None => false,
            }
        });
        for id in overflowed {
            warn!("slave {:?} exceeded write buffer cap, dropping", id);
            self.drop_connection(id);
        }
    }

    fn on_writable(&mut self, id: ConnId) {
        self.flush_pending_writes(id);
    }

    fn flush_pending_writes(&mut self, id: ConnId) {
        let Some(conn) = self.conns.get_mut(id) else { return };
        if conn.write_buf.is_empty() {
            return;
        }
        match conn.socket.write(conn.write_buf.as_slice()) {
            Ok(n) => {
                conn.write_buf.drain_front(n);
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => {
                debug!("connection {:?} write error: {}", id, e);
                self.drop_connection(id);
                return;
            }
        }
        let want_writable = !conn.write_buf.is_empty();
        let interest = if want_writable {
            Interest::READABLE | Interest::WRITABLE
        } else {
            Interest::READABLE
        };
        let _ = self
            .poll
            .registry()
            .reregister(&mut conn.socket, id.as_token(), interest);
    }

    fn drop_connection(&mut self, id: ConnId) {
        if let Some(mut conn) = self.conns.remove(id) {
            let _ = self.poll.registry().deregister(&mut conn.socket);
            if conn.kind == ConnKind::Slave {
                self.engine.slaves.remove(id);
            }
        }
    }

    fn on_tick(&mut self) {
        if let Err(e) = self.engine.on_timer_tick() {
            warn!("maintenance tick failed: {}", e);
        }
    }

    /// Best-effort synchronous connect to a master, with no backoff: a
    /// failed connect here is logged and the server starts anyway as an
    /// unattached slave, matching the accepted reconnect design.
    fn connect_to_master(&mut self, host: &str, port: u16) -> StoreResult<()> {
        let addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| crate::error::StoreError::ProtocolError {
                reason: format!("invalid master address {}:{}: {}", host, port, e),
            })?;
        let mut socket = match TcpStream::connect(addr) {
            Ok(s) => s,
            Err(e) => {
                warn!("could not connect to master {}:{}: {}", host, port, e);
                return Ok(());
            }
        };
        let id = self.next_conn_id();
        self.poll
            .registry()
            .register(&mut socket, id.as_token(), Interest::READABLE | Interest::WRITABLE)?;
        let mut conn = Connection::new(id, ConnKind::MasterLink, socket);
        let _ = conn.queue_write(b"PSYNC\r\n");
        self.conns.insert(conn);
        self.flush_pending_writes(id);
        info!("connecting to master at {}:{}", host, port);
        Ok(())
    }
}

#[cfg(test)]
mod loop_test;
