// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::resp::encode_frame;

#[test]
fn parses_fullsync_marker() {
    let (msg, consumed) = parse_master_message(b"+FULLSYNC\r\nrest").unwrap().unwrap();
    assert_eq!(msg, MasterMessage::FullSyncStart);
    assert_eq!(consumed, b"+FULLSYNC\r\n".len());
}

#[test]
fn parses_ok_marker() {
    let (msg, consumed) = parse_master_message(b"+OK\r\n").unwrap().unwrap();
    assert_eq!(msg, MasterMessage::Ok);
    assert_eq!(consumed, 5);
}

#[test]
fn parses_a_command_frame() {
    let encoded = encode_frame(&[b"SET", b"k", b"v"]);
    let (msg, consumed) = parse_master_message(&encoded).unwrap().unwrap();
    assert_eq!(consumed, encoded.len());
    match msg {
        MasterMessage::Command(args) => assert_eq!(args[0], b"SET"),
        other => panic!("expected Command, got {:?}", other),
    }
}

#[test]
fn incomplete_simple_string_reports_need_more_data() {
    assert_eq!(parse_master_message(b"+FULLS").unwrap(), None);
}

#[test]
fn unrecognized_simple_string_tag_is_a_protocol_error() {
    assert!(parse_master_message(b"+WAT\r\n").is_err());
}

#[test]
fn unexpected_leading_byte_is_a_protocol_error() {
    assert!(parse_master_message(b"garbage").is_err());
}

#[test]
fn apply_master_message_mutates_dict_only_for_commands() {
    let mut dict = Dict::new();
    apply_master_message(&mut dict, &MasterMessage::FullSyncStart);
    apply_master_message(&mut dict, &MasterMessage::Ok);
    assert_eq!(dict.len(), 0);

    apply_master_message(
        &mut dict,
        &MasterMessage::Command(vec![b"SET".to_vec(), b"k".to_vec(), b"v".to_vec()]),
    );
    assert_eq!(dict.get(b"k"), Some(b"v".as_slice()));
}
