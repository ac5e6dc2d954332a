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

//! The numeric sub-engine. It re-parses the body of a quoteless string
//! under a stricter grammar: integer literals in four bases with `_`
//! digit separators, decimal literals with exponent, ISO-8601 date
//! times, duration suffixes, and arithmetic operators.

use crate::datetime::decode_iso_date_time;
use crate::datetime::scan_iso_date_time;
use crate::error::ErrorCode;
use crate::util::whitespace_width;
use crate::util::Scan;

/// An integer or decimal operand. Add, subtract, multiply, and divide
/// promote to decimal when either side is decimal; bitwise operations
/// and modulo require integers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumValue {
    Int(i64),
    Float(f64),
}

impl NumValue {
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            NumValue::Int(v) => v as f64,
            NumValue::Float(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NumTokenKind {
    Integer(i64),
    Decimal(f64),
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    Xor,
    Inverse,
    OpenParen,
    CloseParen,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

/// One token of the expression tokenizer. `off` is the byte offset of
/// the token inside the quoteless slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NumToken {
    pub(crate) off: usize,
    pub(crate) kind: NumTokenKind,
}

/// An expression error with its byte offset inside the quoteless slice.
/// The structure builder rebases the offset onto the input position of
/// the quoteless token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExprFault {
    pub(crate) code: ErrorCode,
    pub(crate) off: usize,
}

impl ExprFault {
    pub(crate) fn new(code: ErrorCode, off: usize) -> Self {
        ExprFault { code, off }
    }

    /// An operand was expected, so running out of input is an invalid
    /// expression rather than the benign sentinel.
    pub(crate) fn operand_required(self) -> Self {
        if self.code == ErrorCode::EndOfInput {
            ExprFault::new(ErrorCode::InvalidNumericExpression, self.off)
        } else {
            self
        }
    }
}

pub(crate) type NumResult = Result<NumToken, ExprFault>;

/// Tokenizer over the bytes of a quoteless string. At each position it
/// tries, in order: an operator or duration suffix, an ISO date time, a
/// binary, hexadecimal, decimal, octal, and plain integer literal.
pub(crate) struct NumTokenizer<'a> {
    input: &'a [u8],
    off: usize,
}

impl<'a> NumTokenizer<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        NumTokenizer { input, off: 0 }
    }

    fn rest(&self) -> &'a [u8] {
        &self.input[self.off..]
    }

    pub(crate) fn next_token(&mut self) -> NumResult {
        loop {
            let n = whitespace_width(self.rest());
            if n == 0 {
                break;
            }
            self.off += n;
        }
        let rest = self.rest();
        let off = self.off;
        let Some(&first) = rest.first() else {
            return Err(ExprFault::new(ErrorCode::EndOfInput, off));
        };
        if let Some(kind) = operator_kind(first) {
            self.off += 1;
            return Ok(NumToken { off, kind });
        }
        match scan_iso_date_time(rest) {
            Scan::Len(n) => {
                let Some(val) = decode_iso_date_time(&rest[..n]) else {
                    return Err(ExprFault::new(ErrorCode::InvalidIsoDateTime, off));
                };
                self.off += n;
                return Ok(NumToken {
                    off,
                    kind: NumTokenKind::Decimal(val),
                });
            }
            Scan::Invalid => {
                return Err(ExprFault::new(ErrorCode::InvalidIsoDateTime, off));
            }
            Scan::None => {}
        }
        if let Some(res) = self.integer_literal(
            scan_bin_literal(rest),
            decode_bin,
            ErrorCode::InvalidBinaryNumber,
        ) {
            return res;
        }
        if let Some(res) = self.integer_literal(
            scan_hex_literal(rest),
            decode_hex,
            ErrorCode::InvalidHexadecimalNumber,
        ) {
            return res;
        }
        match scan_dec_literal(rest) {
            Scan::Len(n) => {
                let Some(val) = decode_dec(&rest[..n]) else {
                    return Err(ExprFault::new(ErrorCode::InvalidDecimalNumber, off));
                };
                self.off += n;
                return Ok(NumToken {
                    off,
                    kind: NumTokenKind::Decimal(val),
                });
            }
            Scan::Invalid => {
                return Err(ExprFault::new(ErrorCode::InvalidDecimalNumber, off));
            }
            Scan::None => {}
        }
        if let Some(res) = self.integer_literal(
            scan_oct_literal(rest),
            decode_oct,
            ErrorCode::InvalidOctalNumber,
        ) {
            return res;
        }
        if let Some(res) = self.integer_literal(
            scan_int_literal(rest),
            decode_int,
            ErrorCode::InvalidIntegerNumber,
        ) {
            return res;
        }
        Err(ExprFault::new(ErrorCode::InvalidNumericExpression, off))
    }

    fn integer_literal(
        &mut self,
        scan: Scan,
        decode: fn(&[u8]) -> Option<i64>,
        invalid: ErrorCode,
    ) -> Option<NumResult> {
        let off = self.off;
        match scan {
            Scan::None => None,
            Scan::Invalid => Some(Err(ExprFault::new(invalid, off))),
            Scan::Len(n) => {
                let Some(val) = decode(&self.rest()[..n]) else {
                    return Some(Err(ExprFault::new(ErrorCode::NumberOverflow, off)));
                };
                self.off += n;
                Some(Ok(NumToken {
                    off,
                    kind: NumTokenKind::Integer(val),
                }))
            }
        }
    }
}

fn operator_kind(b: u8) -> Option<NumTokenKind> {
    let kind = match b {
        b'+' => NumTokenKind::Plus,
        b'-' => NumTokenKind::Minus,
        b'*' => NumTokenKind::Multiply,
        b'/' => NumTokenKind::Divide,
        b'%' => NumTokenKind::Modulo,
        b'&' => NumTokenKind::And,
        b'|' => NumTokenKind::Or,
        b'^' => NumTokenKind::Xor,
        b'~' => NumTokenKind::Inverse,
        b'(' => NumTokenKind::OpenParen,
        b')' => NumTokenKind::CloseParen,
        b'w' => NumTokenKind::Weeks,
        b'd' => NumTokenKind::Days,
        b'h' => NumTokenKind::Hours,
        b'm' => NumTokenKind::Minutes,
        b's' => NumTokenKind::Seconds,
        _ => return None,
    };
    Some(kind)
}

/// Returns true if the quoteless slice is a numeric expression: ignoring
/// leading signs, whitespace, and parentheses, the first significant
/// byte is a digit or a `.` followed by a digit.
pub(crate) fn is_number_expr(p: &[u8]) -> bool {
    for (i, &b) in p.iter().enumerate() {
        if matches!(b, b'+' | b'-' | b' ' | b'\t' | b'(') {
            continue;
        }
        return b.is_ascii_digit()
            || (b == b'.' && p.get(i + 1).is_some_and(u8::is_ascii_digit));
    }
    false
}

fn is_bin_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

fn is_oct_digit(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}

/// Skips an `n`-byte prefix plus at most one `_` behind it. Returns the
/// skipped length and the remaining bytes, or None when nothing follows.
fn skip_prefix_and_underscore(n: usize, v: &[u8]) -> Option<(usize, &[u8])> {
    if n >= v.len() {
        return None;
    }
    let mut n = n;
    let mut v = &v[n..];
    if v[0] == b'_' {
        n += 1;
        v = &v[1..];
        if v.is_empty() {
            return None;
        }
    }
    Some((n, v))
}

/// Scans a run of digits with single `_` separators. A dangling
/// underscore at either end of the run is invalid.
fn scan_digits(v: &[u8], is_digit: fn(u8) -> bool) -> Scan {
    if v.is_empty() || !is_digit(v[0]) {
        return Scan::None;
    }
    let mut p = 1;
    while p < v.len() {
        if v[p] == b'_' {
            p += 1;
            if p == v.len() {
                return Scan::Invalid;
            }
        }
        if !is_digit(v[p]) {
            if v[p - 1] == b'_' {
                return Scan::Invalid;
            }
            return Scan::Len(p);
        }
        p += 1;
    }
    Scan::Len(v.len())
}

fn scan_radix_literal(v: &[u8], marker: u8, is_digit: fn(u8) -> bool) -> Scan {
    if v.len() < 2 || v[0] != b'0' || v[1] & 0xDF != marker {
        return Scan::None;
    }
    match skip_prefix_and_underscore(2, v) {
        Some((n, rest)) => match scan_digits(rest, is_digit) {
            Scan::Len(p) => Scan::Len(n + p),
            _ => Scan::Invalid,
        },
        None => Scan::Invalid,
    }
}

fn scan_bin_literal(v: &[u8]) -> Scan {
    scan_radix_literal(v, b'B', is_bin_digit)
}

fn scan_hex_literal(v: &[u8]) -> Scan {
    scan_radix_literal(v, b'X', |b| b.is_ascii_hexdigit())
}

fn scan_oct_literal(v: &[u8]) -> Scan {
    if v.is_empty() || v[0] != b'0' {
        return Scan::None;
    }
    if v.len() >= 2 && v[1] & 0xDF == b'O' {
        return scan_radix_literal(v, b'O', is_oct_digit);
    }
    // a 0 at end of input or followed by anything other than _ and an
    // octal digit is not an octal number, and thus not invalid
    if v.len() < 2 || (v[1] != b'_' && !is_oct_digit(v[1])) {
        return Scan::None;
    }
    match skip_prefix_and_underscore(1, v) {
        Some((n, rest)) => match scan_digits(rest, is_oct_digit) {
            Scan::Len(p) => Scan::Len(n + p),
            _ => Scan::Invalid,
        },
        None => Scan::Invalid,
    }
}

fn scan_int_literal(v: &[u8]) -> Scan {
    if (b'1'..=b'9').contains(&v[0]) {
        return scan_digits(v, |b| b.is_ascii_digit());
    }
    if v[0] != b'0' {
        return Scan::None;
    }
    if v.len() > 1 && (v[1] == b'_' || v[1].is_ascii_digit()) {
        return Scan::Invalid;
    }
    Scan::Len(1)
}

fn scan_exponent(v: &[u8]) -> Scan {
    if v.is_empty() || v[0] & 0xDF != b'E' {
        return Scan::None;
    }
    let mut n = 1;
    let mut w = &v[1..];
    if w.is_empty() {
        return Scan::Invalid;
    }
    if w[0] == b'+' || w[0] == b'-' {
        n += 1;
        w = &w[1..];
        if w.is_empty() {
            return Scan::Invalid;
        }
    }
    match scan_digits(w, |b| b.is_ascii_digit()) {
        Scan::Len(p) => Scan::Len(n + p),
        _ => Scan::Invalid,
    }
}

/// Scans a decimal literal: `digits[.digits][e[+-]digits]` or
/// `.digits[e[+-]digits]`. A plain digit run with neither fraction nor
/// exponent is not a decimal literal (the integer and octal scanners
/// claim it).
fn scan_dec_literal(v: &[u8]) -> Scan {
    let is_digit = |b: u8| b.is_ascii_digit();
    match scan_digits(v, is_digit) {
        Scan::Invalid => Scan::None,
        Scan::None => {
            // numbers of the form .123[e[+-]456]
            if v[0] != b'.' || v.len() < 2 {
                return Scan::None;
            }
            let w = &v[1..];
            match scan_digits(w, is_digit) {
                Scan::Invalid => Scan::Invalid,
                Scan::None => {
                    if w[0] == b'_' || w[0] & 0xDF == b'E' {
                        return Scan::Invalid;
                    }
                    Scan::None
                }
                Scan::Len(p) => match scan_exponent(&w[p..]) {
                    Scan::Invalid => Scan::Invalid,
                    Scan::None => Scan::Len(1 + p),
                    Scan::Len(q) => Scan::Len(1 + p + q),
                },
            }
        }
        Scan::Len(p) => {
            // numbers of the form 123e[+-]456 or 123.456[e[+-]789]
            let mut n = p;
            let mut w = &v[p..];
            match scan_exponent(w) {
                Scan::Invalid => return Scan::Invalid,
                Scan::Len(q) => return Scan::Len(p + q),
                Scan::None => {}
            }
            if w.is_empty() || w[0] != b'.' {
                return Scan::None;
            }
            n += 1;
            w = &w[1..];
            match scan_digits(w, is_digit) {
                Scan::Invalid => return Scan::Invalid,
                Scan::Len(q) => {
                    n += q;
                    w = &w[q..];
                }
                Scan::None => {}
            }
            match scan_exponent(w) {
                Scan::Invalid => Scan::Invalid,
                Scan::Len(q) => {
                    if w.len() > q && w[q] == b'_' {
                        return Scan::Invalid;
                    }
                    Scan::Len(n + q)
                }
                Scan::None => {
                    if !w.is_empty() && w[0] == b'_' {
                        return Scan::Invalid;
                    }
                    Scan::Len(n)
                }
            }
        }
    }
}

fn decode_bin(v: &[u8]) -> Option<i64> {
    let mut val: u64 = 0;
    for &b in &v[2..] {
        if b == b'_' {
            continue;
        }
        if val & 0x8000_0000_0000_0000 != 0 {
            return None;
        }
        val = (val << 1) | u64::from(b == b'1');
    }
    i64::try_from(val).ok()
}

fn decode_oct(v: &[u8]) -> Option<i64> {
    let digits = if v[1] & 0xDF == b'O' { &v[2..] } else { &v[1..] };
    let mut val: u64 = 0;
    for &b in digits {
        if b == b'_' {
            continue;
        }
        if val & 0xF000_0000_0000_0000 != 0 {
            return None;
        }
        val = (val << 3) | u64::from(b - b'0');
    }
    i64::try_from(val).ok()
}

fn decode_hex(v: &[u8]) -> Option<i64> {
    let mut val: u64 = 0;
    for &b in &v[2..] {
        if b == b'_' {
            continue;
        }
        if val & 0xF000_0000_0000_0000 != 0 {
            return None;
        }
        let digit = if b.is_ascii_digit() {
            b - b'0'
        } else {
            (b & 0xDF) - b'A' + 10
        };
        val = (val << 4) | u64::from(digit);
    }
    i64::try_from(val).ok()
}

fn decode_int(v: &[u8]) -> Option<i64> {
    let mut val: u64 = 0;
    for &b in v {
        if b == b'_' {
            continue;
        }
        val = val.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
    }
    i64::try_from(val).ok()
}

fn decode_dec(v: &[u8]) -> Option<f64> {
    let digits: Vec<u8> = v.iter().copied().filter(|&b| b != b'_').collect();
    match fast_float2::parse::<f64, _>(&digits) {
        Ok(val) if val.is_finite() => Some(val),
        _ => None,
    }
}
