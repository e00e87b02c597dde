// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn frame(args: &[&[u8]]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
    for a in args {
        buf.extend_from_slice(format!("${}\r\n", a.len()).as_bytes());
        buf.extend_from_slice(a);
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

#[test]
fn parses_a_complete_two_bulk_frame() {
    let buf = frame(&[b"HGET", b"key"]);
    let (args, consumed) = parse_frame(&buf).unwrap().unwrap();
    assert_eq!(consumed, buf.len());
    assert_eq!(args, vec![b"HGET".to_vec(), b"key".to_vec()]);
}

#[test]
fn reports_incomplete_when_argc_line_not_yet_terminated() {
    let buf = b"*2\r";
    assert_eq!(parse_frame(buf).unwrap(), None);
}

#[test]
fn reports_incomplete_when_buffer_ends_right_after_the_sigil() {
    assert_eq!(parse_frame(b"*").unwrap(), None);
}

#[test]
fn reports_incomplete_when_bulk_payload_is_short() {
    let mut buf = frame(&[b"HSET", b"key", b"value"]);
    buf.truncate(buf.len() - 3);
    assert_eq!(parse_frame(&buf).unwrap(), None);
}

#[test]
fn consumes_only_the_first_frame_of_a_pipelined_buffer() {
    let mut buf = frame(&[b"HGET", b"a"]);
    let first_len = buf.len();
    buf.extend_from_slice(&frame(&[b"HGET", b"b"]));
    let (args, consumed) = parse_frame(&buf).unwrap().unwrap();
    assert_eq!(consumed, first_len);
    assert_eq!(args, vec![b"HGET".to_vec(), b"a".to_vec()]);
}

#[test]
fn binary_payload_with_embedded_crlf_and_nul_round_trips() {
    let payload: &[u8] = b"\x00\r\n\x00";
    let buf = frame(&[b"HSET", b"k", payload]);
    let (args, _) = parse_frame(&buf).unwrap().unwrap();
    assert_eq!(args[2], payload);
}

#[test]
fn rejects_frame_not_starting_with_asterisk() {
    assert!(parse_frame(b"HGET key\r\n").is_err());
}

#[test]
fn rejects_argc_above_the_bulk_cap() {
    let buf = format!("*{}\r\n", MAX_BULKS + 1);
    assert!(parse_frame(buf.as_bytes()).is_err());
}

#[test]
fn rejects_missing_dollar_bulk_header() {
    assert!(parse_frame(b"*1\r\nHGET\r\n").is_err());
}

#[test]
fn rejects_bulk_missing_trailing_crlf() {
    assert!(parse_frame(b"*1\r\n$4\r\nHGETxx").is_err());
}

#[test]
fn find_resync_point_locates_next_asterisk() {
    let buf = b"junk before*2\r\n";
    assert_eq!(find_resync_point(buf), Some(11));
}

#[test]
fn find_resync_point_returns_none_with_no_asterisk_present() {
    assert_eq!(find_resync_point(b"+OK\r\n"), None);
}
