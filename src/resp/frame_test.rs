// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::resp::parser::parse_frame;

#[test]
fn encode_then_parse_recovers_the_same_arguments() {
    let encoded = encode_frame(&[b"SET", b"k", b"v"]);
    let (args, consumed) = parse_frame(&encoded).unwrap().unwrap();
    assert_eq!(consumed, encoded.len());
    assert_eq!(args, vec![b"SET".to_vec(), b"k".to_vec(), b"v".to_vec()]);
}

#[test]
fn encode_is_binary_safe() {
    let payload: &[u8] = b"\x00\r\n\x00";
    let encoded = encode_frame(&[b"SET", b"k", payload]);
    let (args, _) = parse_frame(&encoded).unwrap().unwrap();
    assert_eq!(args[2], payload);
}
