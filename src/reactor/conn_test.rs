// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use std::net::TcpListener as StdListener;

#[test]
fn grow_buffer_starts_at_initial_size_with_no_data() {
    let buf = GrowBuffer::new();
    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
}

#[test]
fn commit_then_filled_exposes_written_bytes() {
    let mut buf = GrowBuffer::new();
    buf.spare_mut()[..5].copy_from_slice(b"hello");
    buf.commit(5);
    assert_eq!(buf.filled(), b"hello");
}

#[test]
fn consume_shifts_remaining_bytes_to_the_front() {
    let mut buf = GrowBuffer::new();
    buf.spare_mut()[..6].copy_from_slice(b"abcdef");
    buf.commit(6);
    buf.consume(2);
    assert_eq!(buf.filled(), b"cdef");
}

#[test]
fn ensure_headroom_doubles_capacity_when_nearly_full() {
    let mut buf = GrowBuffer::new();
    buf.commit(INITIAL_BUFFER_SIZE - 1);
    buf.ensure_headroom().unwrap();
    assert!(buf.data.len() > INITIAL_BUFFER_SIZE);
}

#[test]
fn ensure_headroom_fails_once_doubling_would_exceed_the_cap() {
    let mut buf = GrowBuffer {
        data: vec![0u8; MAX_BUFFER_SIZE],
        len: MAX_BUFFER_SIZE - 1,
    };
    let err = buf.ensure_headroom().unwrap_err();
    assert!(matches!(err, StoreError::BufferCapacityExceeded { .. }));
}

fn connected_pair() -> (TcpStream, std::net::TcpStream) {
    let listener = StdListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = std::net::TcpStream::connect(addr).unwrap();
    let (server, _) = listener.accept().unwrap();
    server.set_nonblocking(true).unwrap();
    (TcpStream::from_std(server), client)
}

#[test]
fn connection_table_insert_get_remove_round_trips() {
    let (socket, _client) = connected_pair();
    let id = ConnId::from_raw(1);
    let mut table = ConnectionTable::new();
    table.insert(Connection::new(id, ConnKind::Client, socket));
    assert_eq!(table.len(), 1);
    assert!(table.get(id).is_some());
    let removed = table.remove(id);
    assert!(removed.is_some());
    assert!(table.is_empty());
}

#[test]
fn queue_write_appends_to_pending_output() {
    let (socket, _client) = connected_pair();
    let mut conn = Connection::new(ConnId::from_raw(1), ConnKind::Client, socket);
    conn.queue_write(b"foo").unwrap();
    conn.queue_write(b"bar").unwrap();
    assert_eq!(conn.write_buf.as_slice(), b"foobar");
}

#[test]
fn queue_write_fails_once_it_would_exceed_the_cap() {
    let (socket, _client) = connected_pair();
    let mut conn = Connection::new(ConnId::from_raw(1), ConnKind::Client, socket);
    conn.write_buf.data = vec![0u8; MAX_BUFFER_SIZE];
    let err = conn.queue_write(b"x").unwrap_err();
    assert!(matches!(err, StoreError::BufferCapacityExceeded { .. }));
}
