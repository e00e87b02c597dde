// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::resp::encode_frame;
use std::io::{Read as _, Write as _};
use std::net::TcpStream as StdTcpStream;
use std::time::Duration;
use tempfile::tempdir;

fn start_reactor(dir: &std::path::Path) -> std::net::SocketAddr {
    let mut config = Config::new(0);
    config.aof_path = dir.join("x.aof");
    config.rdb_path = dir.join("x.rdb");

    let mut reactor = Reactor::new(config).unwrap();
    let addr = reactor.local_addr().unwrap();
    std::thread::spawn(move || {
        let _ = reactor.run();
    });
    // Give the background thread a moment to enter its poll loop.
    std::thread::sleep(Duration::from_millis(50));
    addr
}

fn read_reply(stream: &mut StdTcpStream) -> Vec<u8> {
    let mut buf = [0u8; 4096];
    let n = stream.read(&mut buf).unwrap();
    buf[..n].to_vec()
}

#[test]
fn hset_then_hget_round_trips_over_a_real_socket() {
    let dir = tempdir().unwrap();
    let addr = start_reactor(dir.path());

    let mut client = StdTcpStream::connect(addr).unwrap();
    client.write_all(&encode_frame(&[b"HSET", b"k", b"v"])).unwrap();
    assert_eq!(read_reply(&mut client), b"+OK\r\n");

    client.write_all(&encode_frame(&[b"HGET", b"k"])).unwrap();
    assert_eq!(read_reply(&mut client), b"$1\r\nv\r\n");
}

#[test]
fn hset_on_existing_key_replies_exist_over_the_wire() {
    let dir = tempdir().unwrap();
    let addr = start_reactor(dir.path());

    let mut client = StdTcpStream::connect(addr).unwrap();
    client.write_all(&encode_frame(&[b"HSET", b"k", b"v1"])).unwrap();
    assert_eq!(read_reply(&mut client), b"+OK\r\n");
    client.write_all(&encode_frame(&[b"HSET", b"k", b"v2"])).unwrap();
    assert_eq!(read_reply(&mut client), b"+EXIST\r\n");
}

#[test]
fn pipelined_frames_are_each_answered_in_order() {
    let dir = tempdir().unwrap();
    let addr = start_reactor(dir.path());

    let mut client = StdTcpStream::connect(addr).unwrap();
    let mut batch = Vec::new();
    batch.extend_from_slice(&encode_frame(&[b"HSET", b"a", b"1"]));
    batch.extend_from_slice(&encode_frame(&[b"HSET", b"b", b"2"]));
    batch.extend_from_slice(&encode_frame(&[b"HGET", b"a"]));
    batch.extend_from_slice(&encode_frame(&[b"HGET", b"b"]));
    client.write_all(&batch).unwrap();

    std::thread::sleep(Duration::from_millis(50));
    let mut buf = [0u8; 4096];
    let n = client.read(&mut buf).unwrap();
    let combined = &buf[..n];
    assert_eq!(combined, b"+OK\r\n+OK\r\n$1\r\n1\r\n$1\r\n2\r\n");
}
