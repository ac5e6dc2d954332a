// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::ErrorCode;

/// Outcome of a literal scanner: the input does not start with this
/// literal form, it starts with an invalid instance of it, or it matches
/// over the given byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    None,
    Invalid,
    Len(usize),
}

// Byte class of every possible first byte of a character. The low nibble
// is the encoded length in bytes, the high nibble selects the range rule
// for the second byte in `UTF8_RANGE`. Control characters other than \t
// and bytes that can never start a UTF-8 sequence are invalid.
#[rustfmt::skip]
static UTF8_CLASS: [u8; 256] = {
    const __: u8 = 0x00; // invalid
    const A1: u8 = 0x01; // printable ascii or tab
    const B2: u8 = 0x12; // 2-byte sequence, rule 1
    const C3: u8 = 0x23; // 3-byte sequence, rule 2 (E0)
    const D3: u8 = 0x13; // 3-byte sequence, rule 1
    const E3: u8 = 0x33; // 3-byte sequence, rule 3 (ED)
    const F4: u8 = 0x44; // 4-byte sequence, rule 4 (F0)
    const G4: u8 = 0x14; // 4-byte sequence, rule 1
    const H4: u8 = 0x54; // 4-byte sequence, rule 5 (F4)
    [
        __, __, __, __, __, __, __, __, __, A1, __, __, __, __, __, __, // 00
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 10
        A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, // 20
        A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, // 30
        A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, // 40
        A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, // 50
        A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, // 60
        A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, A1, // 70
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 80
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 90
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B0
        __, __, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, // C0
        B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, B2, // D0
        C3, D3, D3, D3, D3, D3, D3, D3, D3, D3, D3, D3, D3, E3, D3, D3, // E0
        F4, G4, G4, G4, H4, __, __, __, __, __, __, __, __, __, __, __, // F0
    ]
};

const UTF8_LO: u8 = 0x80;
const UTF8_HI: u8 = 0xBF;

// (lo, hi) bounds of the second byte, indexed by range rule.
static UTF8_RANGE: [u8; 12] = [
    0, 0, // rule 0, unused
    UTF8_LO, UTF8_HI, // rule 1
    0xA0, UTF8_HI, // rule 2
    UTF8_LO, 0x9F, // rule 3
    0x90, UTF8_HI, // rule 4
    UTF8_LO, 0x8F, // rule 5
];

/// Returns the byte width of the character in front of `p`, validating
/// its UTF-8 encoding. Returns `Ok(0)` when `p` is empty. The char is not
/// consumed. Errors are `InvalidChar` or `TruncatedChar`.
pub(crate) fn char_width(p: &[u8]) -> Result<usize, ErrorCode> {
    let Some(&b) = p.first() else {
        return Ok(0);
    };
    let class = UTF8_CLASS[b as usize];
    if class == 0x01 {
        return Ok(1);
    }
    if class == 0x00 {
        return Err(ErrorCode::InvalidChar);
    }
    let n = (class & 0xF) as usize;
    if n > p.len() {
        return Err(ErrorCode::TruncatedChar);
    }
    let r = ((class >> 4) << 1) as usize;
    if p[1] < UTF8_RANGE[r] || p[1] > UTF8_RANGE[r + 1] {
        return Err(ErrorCode::InvalidChar);
    }
    for &cont in &p[2..n] {
        if !(UTF8_LO..=UTF8_HI).contains(&cont) {
            return Err(ErrorCode::InvalidChar);
        }
    }
    Ok(n)
}

/// Counts the UTF-8 characters in `p`. Requires that `p` is a prefix of
/// already validated input; counting stops at the first byte that does not
/// start a complete character.
pub(crate) fn column(p: &[u8]) -> usize {
    let mut rest = p;
    let mut cnt = 0;
    while !rest.is_empty() {
        let n = (UTF8_CLASS[rest[0] as usize] & 0xF) as usize;
        if n == 0 || n > rest.len() {
            break;
        }
        rest = &rest[n..];
        cnt += 1;
    }
    cnt
}

/// Returns the byte width of the whitespace in front of `p`: one byte for
/// space or tab, two for a non-breaking space, zero otherwise.
pub(crate) fn whitespace_width(p: &[u8]) -> usize {
    match p {
        [b' ', ..] | [b'\t', ..] => 1,
        [0xC2, 0xA0, ..] => 2,
        _ => 0,
    }
}

/// Returns the byte width of the newline in front of `p`: one byte for
/// `\n`, two for `\r\n`, zero otherwise. A lone `\r` is not a newline.
pub(crate) fn newline_width(p: &[u8]) -> usize {
    match p {
        [b'\n', ..] => 1,
        [b'\r', b'\n', ..] => 2,
        _ => 0,
    }
}
