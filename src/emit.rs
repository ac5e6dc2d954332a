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

//! JSON emission for the four string styles and for numeric results.
//! Each emitter writes one JSON-quoted, escaped string into the output
//! buffer from the raw token slice.

use crate::constants::INTEGER_PRINT_LIMIT;
use crate::error::ErrorCode;
use crate::error::Fault;
use crate::error::Result;
use crate::tokenizer::Position;
use crate::tokenizer::Token;
use crate::util::newline_width;
use crate::util::whitespace_width;

/// Emits the interior of a double quoted string. Valid escapes pass
/// through; `\t` is escaped; a `/` preceded by `<` is escaped for HTML
/// embedding.
pub(crate) fn double_quoted(tok: &Token, out: &mut Vec<u8>) -> Result<()> {
    let s = tok.text;
    out.push(b'"');
    let mut i = 1;
    while i < s.len() - 1 {
        match s[i] {
            b'/' => {
                if s[i - 1] == b'<' {
                    out.push(b'\\');
                }
            }
            b'\t' => {
                out.extend_from_slice(b"\\t");
                i += 1;
                continue;
            }
            b'\\' => check_escape(s, i, b'"', tok.pos)?,
            _ => {}
        }
        out.push(s[i]);
        i += 1;
    }
    out.push(b'"');
    Ok(())
}

/// Emits the interior of a single quoted string as a double quoted JSON
/// string: a `\'` escape collapses to a literal quote, a literal `"` is
/// escaped.
pub(crate) fn single_quoted(tok: &Token, out: &mut Vec<u8>) -> Result<()> {
    let s = tok.text;
    out.push(b'"');
    let mut i = 1;
    while i < s.len() - 1 {
        match s[i] {
            b'/' => {
                if s[i - 1] == b'<' {
                    out.push(b'\\');
                }
            }
            b'\t' => {
                out.extend_from_slice(b"\\t");
                i += 1;
                continue;
            }
            b'\\' => {
                check_escape(s, i, b'\'', tok.pos)?;
                if s[i + 1] == b'\'' {
                    i += 1;
                    continue;
                }
            }
            b'"' => out.push(b'\\'),
            _ => {}
        }
        out.push(s[i]);
        i += 1;
    }
    out.push(b'"');
    Ok(())
}

/// Validates the escape sequence starting at the backslash `s[i]`.
/// `quote` is the string's own quote, which replaces `"` in the set of
/// accepted escape characters.
fn check_escape(s: &[u8], i: usize, quote: u8, pos: Position) -> Result<()> {
    let c = s[i + 1];
    let valid = matches!(c, b't' | b'n' | b'r' | b'f' | b'b' | b'/' | b'\\')
        || c == quote
        || (c == b'u'
            && s.len() >= i + 6
            && s[i + 2..i + 6].iter().all(u8::is_ascii_hexdigit));
    if valid {
        Ok(())
    } else {
        let pos = Position {
            offset: pos.offset + i,
            line_start: pos.line_start,
            line: pos.line,
        };
        Err(Fault::new(ErrorCode::InvalidEscapeSequence, pos))
    }
}

/// Emits a quoteless string: `"` and `\` are escaped, a tab becomes
/// `\t`, and `<` followed by `/` gets the slash escaped.
pub(crate) fn quoteless(tok: &Token, out: &mut Vec<u8>) {
    let s = tok.text;
    out.push(b'"');
    for i in 0..s.len() {
        match s[i] {
            b'"' => out.push(b'\\'),
            b'\t' => {
                out.extend_from_slice(b"\\t");
                continue;
            }
            b'/' => {
                if i > 0 && s[i - 1] == b'<' {
                    out.push(b'\\');
                }
            }
            b'\\' => out.push(b'\\'),
            _ => {}
        }
        out.push(s[i]);
    }
    out.push(b'"');
}

/// Emits a multiline string. The token slice starts at the margin and
/// ends at the closing backtick; every interior newline is replaced by
/// the escape selected by the newline specifier, control bytes are
/// escaped, and a `` `\ `` pair collapses to a literal backtick. The
/// newline introducing the closing-backtick line contributes no content.
pub(crate) fn multiline(tok: &Token, out: &mut Vec<u8>) {
    let s = tok.text;
    let mut p = 0;
    while s[p] != b'`' {
        p += 1;
    }
    let margin = p;
    let mut body = &s[p + 1..];
    loop {
        let n = whitespace_width(body);
        if n == 0 {
            break;
        }
        body = &body[n..];
    }
    // the newline specifier selects the escape emitted per newline
    body = &body[1..];
    let nl: &[u8] = if body[0] == b'n' {
        body = &body[1..];
        b"\\n"
    } else {
        body = &body[3..];
        b"\\r\\n"
    };
    // anything left on the start line is whitespace or a line comment
    while body[0] != b'\n' {
        body = &body[1..];
    }
    // skip the newline and margin of the first line, drop the closing `
    body = &body[1 + margin..body.len() - 1];
    out.push(b'"');
    let mut rest = body;
    while !rest.is_empty() {
        let n = newline_width(rest);
        if n != 0 {
            rest = &rest[n + margin..];
            if rest.is_empty() {
                break;
            }
            out.extend_from_slice(nl);
            continue;
        }
        let b = rest[0];
        if b < 0x20 {
            match b {
                0x08 => out.extend_from_slice(b"\\b"),
                b'\t' => out.extend_from_slice(b"\\t"),
                b'\r' => out.extend_from_slice(b"\\r"),
                0x0C => out.extend_from_slice(b"\\f"),
                _ => {
                    out.extend_from_slice(b"\\u00");
                    out.push(hex_digit(b >> 4));
                    out.push(hex_digit(b & 0xF));
                }
            }
            rest = &rest[1..];
            continue;
        }
        match b {
            b'<' => {
                out.push(b'<');
                if rest.len() > 1 && rest[1] == b'/' {
                    out.push(b'\\');
                }
            }
            b'"' => out.extend_from_slice(b"\\\""),
            b'`' if rest.len() > 1 && rest[1] == b'\\' => {
                out.push(b'`');
                rest = &rest[2..];
                continue;
            }
            b'\\' => out.extend_from_slice(b"\\\\"),
            _ => out.push(b),
        }
        rest = &rest[1..];
    }
    out.push(b'"');
}

fn hex_digit(v: u8) -> u8 {
    if v < 10 {
        b'0' + v
    } else {
        b'A' + v - 10
    }
}

/// Formats a numeric expression result. Integral values below 1e16 print
/// as integers; everything else uses the shortest round-trip form.
pub(crate) fn number(v: f64, out: &mut Vec<u8>) {
    if v.fract() == 0.0 && v.abs() < INTEGER_PRINT_LIMIT {
        let mut buffer = itoa::Buffer::new();
        out.extend_from_slice(buffer.format(v as i64).as_bytes());
    } else {
        let mut buffer = ryu::Buffer::new();
        out.extend_from_slice(buffer.format(v).as_bytes());
    }
}
