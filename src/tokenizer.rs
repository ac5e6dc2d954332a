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

use crate::datetime::scan_iso_date_time;
use crate::error::ErrorCode;
use crate::error::Fault;
use crate::error::Result;
use crate::util::char_width;
use crate::util::newline_width;
use crate::util::whitespace_width;
use crate::util::Scan;

/// A position in the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Position {
    /// Byte offset of the position.
    pub(crate) offset: usize,
    /// Byte offset of the first byte of the line containing the position.
    pub(crate) line_start: usize,
    /// 0-based line index.
    pub(crate) line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenSquare,
    CloseSquare,
    Colon,
    Comma,
    DoubleQuotedString,
    SingleQuotedString,
    MultilineString,
    QuotelessString,
}

/// One tokenizer output. String tokens keep their delimiters in `text`;
/// a multiline token starts at its line start so the margin is part of
/// the slice.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind,
    pub(crate) pos: Position,
    pub(crate) text: &'a [u8],
}

/// The outer tokenizer. It validates UTF-8 on every byte it consumes and
/// reports the end of input as a `Fault` carrying the `EndOfInput`
/// sentinel code, which callers convert, promote, or treat as success.
pub(crate) struct Tokenizer<'a> {
    input: &'a [u8],
    pos: Position,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            input,
            pos: Position::default(),
        }
    }

    /// The current cursor position, used to anchor structural diagnostics.
    pub(crate) fn pos(&self) -> Position {
        self.pos
    }

    fn rest(&self) -> &'a [u8] {
        &self.input[self.pos.offset..]
    }

    fn fault(&self, code: ErrorCode) -> Fault {
        Fault::new(code, self.pos)
    }

    fn pop_bytes(&mut self, n: usize) {
        self.pos.offset += n;
    }

    /// Pops the newline in front of the cursor, keeping the line
    /// accounting in step. Returns false if there is none.
    fn pop_newline(&mut self) -> bool {
        let n = newline_width(self.rest());
        if n == 0 {
            return false;
        }
        self.pos.offset += n;
        self.pos.line_start = self.pos.offset;
        self.pos.line += 1;
        true
    }

    /// Validated byte width of the character in front of the cursor.
    fn char_here(&self) -> Result<usize> {
        char_width(self.rest()).map_err(|code| self.fault(code))
    }

    fn skip_whitespaces(&mut self) {
        loop {
            let n = whitespace_width(self.rest());
            if n == 0 {
                return;
            }
            self.pop_bytes(n);
        }
    }

    /// Pops everything up to and including the next newline, or to the
    /// end of input.
    fn skip_rest_of_line(&mut self) -> Result<()> {
        loop {
            if self.pop_newline() || self.rest().is_empty() {
                return Ok(());
            }
            let n = self.char_here()?;
            self.pop_bytes(n);
        }
    }

    /// Skips a `#...` or `//...` comment. Returns true if one was skipped.
    fn skip_line_comment(&mut self) -> Result<bool> {
        let rest = self.rest();
        if rest.starts_with(b"#") || rest.starts_with(b"//") {
            self.skip_rest_of_line()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Skips a `/*...*/` comment. Control bytes are permitted inside.
    /// Returns true if one was skipped.
    fn skip_block_comment(&mut self) -> Result<bool> {
        if !self.rest().starts_with(b"/*") {
            return Ok(false);
        }
        let start = self.pos;
        self.pop_bytes(2);
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(Fault::new(ErrorCode::UnclosedSlashStarComment, start));
            }
            if rest.starts_with(b"*/") {
                self.pop_bytes(2);
                return Ok(true);
            }
            if self.pop_newline() {
                continue;
            }
            if rest[0] < 0x20 {
                self.pop_bytes(1);
                continue;
            }
            let n = self.char_here()?;
            self.pop_bytes(n);
        }
    }

    /// Skips any mix of whitespace, comments, and newlines.
    fn skip_spaces(&mut self) -> Result<()> {
        while !self.rest().is_empty() {
            self.skip_whitespaces();
            if self.skip_line_comment()? {
                continue;
            }
            if self.skip_block_comment()? {
                continue;
            }
            if !self.pop_newline() {
                break;
            }
        }
        Ok(())
    }

    fn delimiter(&mut self) -> Option<TokenKind> {
        let kind = match self.rest().first()? {
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,
            b'[' => TokenKind::OpenSquare,
            b']' => TokenKind::CloseSquare,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            _ => return None,
        };
        self.pop_bytes(1);
        Some(kind)
    }

    /// Scans a quoted string. `\` followed by the quote is an escape; a
    /// newline inside and an unterminated string are diagnosed at the
    /// opening quote. The returned slice includes both quotes.
    fn quoted(
        &mut self,
        quote: u8,
        unclosed: ErrorCode,
        newline_err: ErrorCode,
    ) -> Result<Option<&'a [u8]>> {
        if self.rest().first() != Some(&quote) {
            return Ok(None);
        }
        let start = self.pos;
        self.pop_bytes(1);
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(Fault::new(unclosed, start));
            }
            if rest[0] == b'\\' && rest.len() > 1 && rest[1] == quote {
                self.pop_bytes(2);
                continue;
            }
            if rest[0] == quote {
                self.pop_bytes(1);
                return Ok(Some(&self.input[start.offset..self.pos.offset]));
            }
            if newline_width(rest) != 0 {
                return Err(Fault::new(newline_err, start));
            }
            let n = self.char_here()?;
            self.pop_bytes(n);
        }
    }

    /// Scans a multiline string. The returned slice starts at the line
    /// start (including the margin) and ends at the closing backtick.
    fn multiline(&mut self) -> Result<Option<&'a [u8]>> {
        if self.rest().first() != Some(&b'`') {
            return Ok(None);
        }
        let line = &self.input[self.pos.line_start..self.pos.offset];
        let ws = margin_width(line);
        if self.pos.line_start + ws != self.pos.offset {
            let pos = Position {
                offset: self.pos.line_start + ws,
                line_start: self.pos.line_start,
                line: self.pos.line,
            };
            return Err(Fault::new(ErrorCode::MarginMustBeWhitespaceOnly, pos));
        }
        let margin = line;
        let start = self.pos;
        self.pop_bytes(1);
        self.skip_whitespaces();
        if self.rest().is_empty() {
            return Err(Fault::new(ErrorCode::MissingNewlineSpecifier, start));
        }
        let n = newline_specifier_width(self.rest());
        if n == 0 {
            return Err(Fault::new(ErrorCode::InvalidNewlineSpecifier, start));
        }
        self.pop_bytes(n);
        self.skip_whitespaces();
        if !self.pop_newline() && !self.skip_line_comment()? {
            return Err(Fault::new(ErrorCode::InvalidMultilineStart, start));
        }
        if self.rest().is_empty() {
            return Err(Fault::new(ErrorCode::UnclosedMultiline, start));
        }
        let n = matching_margin_len(margin, self.rest());
        if n != margin.len() {
            return Err(self.margin_fault(n));
        }
        self.pop_bytes(n);
        while !self.rest().is_empty() {
            if self.pop_newline() {
                let n = matching_margin_len(margin, self.rest());
                if n != margin.len() {
                    return Err(self.margin_fault(n));
                }
                self.pop_bytes(n);
                continue;
            }
            let rest = self.rest();
            if rest[0] < 0x20 {
                self.pop_bytes(1);
                continue;
            }
            if rest[0] == b'`' {
                self.pop_bytes(1);
                // `\ is a literal backtick in the content
                if self.rest().first() != Some(&b'\\') {
                    return Ok(Some(&self.input[start.line_start..self.pos.offset]));
                }
                continue;
            }
            let n = self.char_here()?;
            self.pop_bytes(n);
        }
        Err(Fault::new(ErrorCode::UnclosedMultiline, start))
    }

    fn margin_fault(&self, matched: usize) -> Fault {
        let pos = Position {
            offset: self.pos.offset + matched,
            line_start: self.pos.line_start,
            line: self.pos.line,
        };
        Fault::new(ErrorCode::InvalidMarginChar, pos)
    }

    /// Byte length by which the quoteless string continues past a `:`
    /// that belongs to an ISO date time, 0 when it does not.
    fn iso_continuation(&self) -> usize {
        if self.rest().first() != Some(&b':') || self.pos.offset < 13 {
            return 0;
        }
        let start = self.pos.offset - 13;
        if let Scan::Len(n) = scan_iso_date_time(&self.input[start..]) {
            if n > 13 {
                return n - 13;
            }
        }
        0
    }

    /// Scans a quoteless string: any valid characters until one of
    /// `, : { } [ ] #`, a newline, `//`, `/*`, or the end of input. A `:`
    /// inside an ISO date time does not terminate it. The result is right
    /// trimmed of whitespace; an empty result returns None.
    fn quoteless(&mut self) -> Result<Option<&'a [u8]>> {
        let start = self.pos;
        let mut end = start.offset;
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            if whitespace_width(rest) != 0 {
                self.skip_whitespaces();
                continue;
            }
            let b = rest[0];
            if is_stop_byte(b) {
                let comment = b == b'/' && matches!(rest.get(1), Some(b'/' | b'*'));
                if comment || newline_width(rest) != 0 || (b != b'\r' && b != b'/') {
                    let n = self.iso_continuation();
                    if n == 0 {
                        break;
                    }
                    self.pop_bytes(n);
                    end = self.pos.offset;
                    continue;
                }
            }
            let n = self.char_here()?;
            self.pop_bytes(n);
            end = self.pos.offset;
        }
        if start.offset == end {
            return Ok(None);
        }
        Ok(Some(&self.input[start.offset..end]))
    }

    /// Reads the next token. The end of input yields a `Fault` with the
    /// `EndOfInput` sentinel at the current position.
    pub(crate) fn next_token(&mut self) -> Result<Token<'a>> {
        self.skip_spaces()?;
        let pos = self.pos;
        if self.rest().is_empty() {
            return Err(self.fault(ErrorCode::EndOfInput));
        }
        if let Some(kind) = self.delimiter() {
            return Ok(Token { kind, pos, text: &[] });
        }
        if let Some(text) = self.quoted(
            b'"',
            ErrorCode::UnclosedDoubleQuoteString,
            ErrorCode::NewlineInDoubleQuoteString,
        )? {
            return Ok(Token {
                kind: TokenKind::DoubleQuotedString,
                pos,
                text,
            });
        }
        if let Some(text) = self.quoted(
            b'\'',
            ErrorCode::UnclosedSingleQuoteString,
            ErrorCode::NewlineInSingleQuoteString,
        )? {
            return Ok(Token {
                kind: TokenKind::SingleQuotedString,
                pos,
                text,
            });
        }
        if let Some(text) = self.multiline()? {
            return Ok(Token {
                kind: TokenKind::MultilineString,
                pos,
                text,
            });
        }
        if let Some(text) = self.quoteless()? {
            return Ok(Token {
                kind: TokenKind::QuotelessString,
                pos,
                text,
            });
        }
        // an empty quoteless string means nothing was left to consume
        Err(Fault::new(ErrorCode::EndOfInput, pos))
    }
}

fn is_stop_byte(b: u8) -> bool {
    matches!(
        b,
        b',' | b':' | b'{' | b'}' | b'[' | b']' | b'#' | b'\n' | b'\r' | b'/'
    )
}

/// Byte length of the whitespace prefix of `line`.
fn margin_width(line: &[u8]) -> usize {
    let mut b = 0;
    loop {
        let n = whitespace_width(&line[b..]);
        if n == 0 {
            return b;
        }
        b += n;
    }
}

/// Byte length of the longest prefix of `line` matching `margin`.
fn matching_margin_len(margin: &[u8], line: &[u8]) -> usize {
    let n = margin.len().min(line.len());
    for i in 0..n {
        if line[i] != margin[i] {
            return i;
        }
    }
    n
}

/// Byte width of the literal `\n` (2) or `\r\n` (4) newline specifier.
fn newline_specifier_width(p: &[u8]) -> usize {
    if p[0] == b'\\' {
        if p.len() > 1 && p[1] == b'n' {
            return 2;
        }
        if p.len() > 3 && p[1] == b'r' && p[2] == b'\\' && p[3] == b'n' {
            return 4;
        }
    }
    0
}
