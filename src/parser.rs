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

use crate::constants::MAX_DEPTH;
use crate::constants::OUTPUT_INIT_CAPACITY;
use crate::emit;
use crate::error::Error;
use crate::error::ErrorCode;
use crate::error::Fault;
use crate::error::Result;
use crate::expr::eval_number_expr;
use crate::number::is_number_expr;
use crate::tokenizer::Position;
use crate::tokenizer::Token;
use crate::tokenizer::TokenKind;
use crate::tokenizer::Tokenizer;

/// Converts QJSON text to canonical JSON text.
///
/// The result is either a JSON document starting with `{` or a
/// diagnostic message ending with `" at line L col C"`; it is never
/// empty. Empty input yields `"{}"`.
pub fn decode(input: &[u8]) -> String {
    match try_decode(input) {
        Ok(json) => json,
        Err(err) => err.to_string(),
    }
}

/// Converts QJSON text to canonical JSON text, or returns the diagnostic
/// with its location.
pub fn try_decode(input: &[u8]) -> std::result::Result<String, Error> {
    if input.is_empty() {
        return Ok("{}".to_string());
    }
    let mut parser = Parser::new(input);
    match parser.parse() {
        // emitted bytes are delimiters, escapes, and validated input
        // characters, so the output is valid UTF-8
        Ok(()) => Ok(unsafe { String::from_utf8_unchecked(parser.out) }),
        Err(fault) => Err(fault.locate(input)),
    }
}

/// The conversion engine: drives the tokenizer, emits canonical JSON
/// into the output buffer, and bounds container nesting.
struct Parser<'a> {
    lexer: Tokenizer<'a>,
    out: Vec<u8>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Parser {
            lexer: Tokenizer::new(input),
            out: Vec::with_capacity(OUTPUT_INIT_CAPACITY),
            depth: 0,
        }
    }

    /// Parses a whole document. The outermost braces are optional: a
    /// bare member list is wrapped in `{}`. The end-of-input sentinel
    /// surfacing here means the document was complete.
    fn parse(&mut self) -> Result<()> {
        let first = match self.lexer.next_token() {
            Ok(tok) => tok,
            Err(fault) if fault.code == ErrorCode::EndOfInput => {
                self.out.extend_from_slice(b"{}");
                return Ok(());
            }
            Err(fault) => return Err(fault),
        };
        let trailing = if first.kind == TokenKind::OpenBrace {
            self.value(first)
        } else {
            self.members(first)
        };
        match trailing {
            Ok(tok) => Err(Fault::new(ErrorCode::SyntaxError, tok.pos)),
            Err(fault) if fault.code == ErrorCode::EndOfInput => Ok(()),
            Err(fault) => Err(fault),
        }
    }

    fn fault_here(&self, code: ErrorCode) -> Fault {
        Fault::new(code, self.lexer.pos())
    }

    /// Processes one value starting at `tok` and returns the token
    /// following it.
    fn value(&mut self, tok: Token<'a>) -> Result<Token<'a>> {
        match tok.kind {
            TokenKind::CloseSquare => {
                return Err(self.fault_here(ErrorCode::UnexpectedCloseSquare));
            }
            TokenKind::CloseBrace => {
                return Err(self.fault_here(ErrorCode::UnexpectedCloseBrace));
            }
            TokenKind::DoubleQuotedString => emit::double_quoted(&tok, &mut self.out)?,
            TokenKind::SingleQuotedString => emit::single_quoted(&tok, &mut self.out)?,
            TokenKind::MultilineString => emit::multiline(&tok, &mut self.out),
            TokenKind::QuotelessString => self.quoteless_value(&tok)?,
            TokenKind::OpenBrace => {
                let start = tok.pos;
                let inner = self
                    .lexer
                    .next_token()
                    .map_err(|f| f.promote(ErrorCode::UnclosedObject, start))?;
                if self.depth == MAX_DEPTH {
                    return Err(self.fault_here(ErrorCode::MaxObjectArrayDepth));
                }
                self.depth += 1;
                self.members(inner)
                    .map_err(|f| f.promote(ErrorCode::UnclosedObject, start))?;
                self.depth -= 1;
            }
            TokenKind::OpenSquare => {
                let start = tok.pos;
                let inner = self
                    .lexer
                    .next_token()
                    .map_err(|f| f.promote(ErrorCode::UnclosedArray, start))?;
                if self.depth == MAX_DEPTH {
                    return Err(self.fault_here(ErrorCode::MaxObjectArrayDepth));
                }
                self.depth += 1;
                self.values(inner)
                    .map_err(|f| f.promote(ErrorCode::UnclosedArray, start))?;
                self.depth -= 1;
            }
            TokenKind::Colon | TokenKind::Comma => {
                return Err(self.fault_here(ErrorCode::SyntaxError));
            }
        }
        self.lexer.next_token()
    }

    /// Emits a quoteless value: a literal name, the result of a numeric
    /// expression, or a plain string.
    fn quoteless_value(&mut self, tok: &Token<'a>) -> Result<()> {
        if let Some(lit) = literal_name(tok.text) {
            self.out.extend_from_slice(lit);
            return Ok(());
        }
        if !is_number_expr(tok.text) {
            emit::quoteless(tok, &mut self.out);
            return Ok(());
        }
        match eval_number_expr(tok.text) {
            Ok(val) => {
                emit::number(val, &mut self.out);
                Ok(())
            }
            Err(fault) => {
                let pos = Position {
                    offset: tok.pos.offset + fault.off,
                    line_start: tok.pos.line_start,
                    line: tok.pos.line,
                };
                Err(Fault::new(fault.code, pos))
            }
        }
    }

    /// Processes one `identifier ':' value` member and returns the token
    /// following the value.
    fn member(&mut self, tok: Token<'a>) -> Result<Token<'a>> {
        match tok.kind {
            TokenKind::CloseSquare => {
                return Err(self.fault_here(ErrorCode::UnexpectedCloseSquare));
            }
            TokenKind::DoubleQuotedString => emit::double_quoted(&tok, &mut self.out)?,
            TokenKind::SingleQuotedString => emit::single_quoted(&tok, &mut self.out)?,
            TokenKind::QuotelessString => emit::quoteless(&tok, &mut self.out),
            _ => return Err(self.fault_here(ErrorCode::ExpectStringIdentifier)),
        }
        let tok = self
            .lexer
            .next_token()
            .map_err(|f| f.remap_end(ErrorCode::UnexpectedEndOfInput))?;
        if tok.kind != TokenKind::Colon {
            return Err(self.fault_here(ErrorCode::ExpectColon));
        }
        self.out.push(b':');
        let tok = self
            .lexer
            .next_token()
            .map_err(|f| f.remap_end(ErrorCode::UnexpectedEndOfInput))?;
        self.value(tok)
    }

    /// Processes zero or more members up to the closing brace, which is
    /// returned unconsumed. The braces are emitted here either way so
    /// that a member list ending at the end of input is still closed.
    fn members(&mut self, tok: Token<'a>) -> Result<Token<'a>> {
        self.out.push(b'{');
        let res = self.members_body(tok);
        self.out.push(b'}');
        res
    }

    fn members_body(&mut self, mut tok: Token<'a>) -> Result<Token<'a>> {
        let mut not_first = false;
        loop {
            if tok.kind == TokenKind::CloseBrace {
                return Ok(tok);
            }
            if not_first {
                self.out.push(b',');
                if tok.kind == TokenKind::Comma {
                    tok = self
                        .lexer
                        .next_token()
                        .map_err(|f| f.remap_end(ErrorCode::ExpectIdentifierAfterComma))?;
                    if matches!(tok.kind, TokenKind::CloseBrace | TokenKind::CloseSquare) {
                        return Err(self.fault_here(ErrorCode::ExpectIdentifierAfterComma));
                    }
                }
            }
            not_first = true;
            tok = self.member(tok)?;
        }
    }

    /// Processes zero or more array values up to the closing square
    /// bracket, which is returned unconsumed.
    fn values(&mut self, tok: Token<'a>) -> Result<Token<'a>> {
        self.out.push(b'[');
        let res = self.values_body(tok);
        self.out.push(b']');
        res
    }

    fn values_body(&mut self, mut tok: Token<'a>) -> Result<Token<'a>> {
        let mut not_first = false;
        loop {
            if tok.kind == TokenKind::CloseSquare {
                return Ok(tok);
            }
            if not_first {
                self.out.push(b',');
                if tok.kind == TokenKind::Comma {
                    tok = self
                        .lexer
                        .next_token()
                        .map_err(|f| f.remap_end(ErrorCode::ExpectValueAfterComma))?;
                    if matches!(tok.kind, TokenKind::CloseBrace | TokenKind::CloseSquare) {
                        return Err(self.fault_here(ErrorCode::ExpectValueAfterComma));
                    }
                }
            }
            not_first = true;
            tok = self.value(tok)?;
        }
    }
}

/// Maps a quoteless slice to the JSON literal it names, accepting a
/// case-insensitive first letter followed by an all-lowercase or
/// all-uppercase tail (`true`, `True`, `TRUE`, `yes`, `on`, ...).
fn literal_name(p: &[u8]) -> Option<&'static [u8]> {
    let first = *p.first()?;
    let matches_name = |name: &[u8]| -> bool {
        p.len() == name.len()
            && first & 0xDF == name[0] & 0xDF
            && (p[1..] == name[1..]
                || p[1..].iter().zip(&name[1..]).all(|(b, n)| *b == n & 0xDF))
    };
    if matches_name(b"true") || matches_name(b"yes") || matches_name(b"on") {
        return Some(b"true");
    }
    if matches_name(b"false") || matches_name(b"no") || matches_name(b"off") {
        return Some(b"false");
    }
    if matches_name(b"null") {
        return Some(b"null");
    }
    None
}
