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

use crate::tokenizer::Position;
use crate::util::column;

/// Every diagnostic the converter can produce.
///
/// The `Display` text of each variant is the user-visible error message;
/// [`Error`] appends the `" at line L col C"` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Internal sentinel marking the end of input. Never user-visible:
    /// it is converted to success, promoted to an `Unclosed*` diagnostic,
    /// or remapped by the expression evaluator.
    #[error("end of input")]
    EndOfInput,
    #[error("invalid character")]
    InvalidChar,
    #[error("last utf8 char is truncated")]
    TruncatedChar,
    #[error("syntax error")]
    SyntaxError,
    #[error("unclosed double quote string")]
    UnclosedDoubleQuoteString,
    #[error("unclosed single quote string")]
    UnclosedSingleQuoteString,
    #[error("unclosed /*...*/ comment")]
    UnclosedSlashStarComment,
    #[error("newline in double quoted string")]
    NewlineInDoubleQuoteString,
    #[error("newline in single quoted string")]
    NewlineInSingleQuoteString,
    #[error("expect string identifier")]
    ExpectStringIdentifier,
    #[error("expect a colon")]
    ExpectColon,
    #[error("too many object or array encapsulations")]
    MaxObjectArrayDepth,
    #[error("unclosed object")]
    UnclosedObject,
    #[error("unclosed array")]
    UnclosedArray,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("expect identifier after comma")]
    ExpectIdentifierAfterComma,
    #[error("expect value after comma")]
    ExpectValueAfterComma,
    #[error("invalid escape sequence")]
    InvalidEscapeSequence,
    #[error("invalid numeric expression")]
    InvalidNumericExpression,
    #[error("invalid binary number")]
    InvalidBinaryNumber,
    #[error("invalid hexadecimal number")]
    InvalidHexadecimalNumber,
    #[error("invalid octal number")]
    InvalidOctalNumber,
    #[error("invalid integer number")]
    InvalidIntegerNumber,
    #[error("invalid decimal number")]
    InvalidDecimalNumber,
    #[error("number overflow")]
    NumberOverflow,
    #[error("missing open parenthesis")]
    UnopenedParenthesis,
    #[error("missing close parenthesis")]
    UnclosedParenthesis,
    #[error("division by zero")]
    DivisionByZero,
    #[error("operand must be integer")]
    OperandMustBeInteger,
    #[error("multiline margin must contain only whitespaces")]
    MarginMustBeWhitespaceOnly,
    #[error("unclosed multiline")]
    UnclosedMultiline,
    #[error("invalid margin character")]
    InvalidMarginChar,
    #[error("missing \\n or \\r\\n after multiline start")]
    MissingNewlineSpecifier,
    #[error("expect \\n or \\r\\n after `")]
    InvalidNewlineSpecifier,
    #[error("invalid multiline start line")]
    InvalidMultilineStart,
    #[error("unexpected }}")]
    UnexpectedCloseBrace,
    #[error("unexpected ]")]
    UnexpectedCloseSquare,
    #[error("invalid ISO date time")]
    InvalidIsoDateTime,
}

/// A decode failure with its source location.
///
/// `line` and `col` are 1-based; the column counts UTF-8 code points from
/// the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{code} at line {line} col {col}")]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub col: usize,
}

/// An error anchored to a byte position, before the line/column of the
/// diagnostic has been resolved against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fault {
    pub(crate) code: ErrorCode,
    pub(crate) pos: Position,
}

impl Fault {
    pub(crate) fn new(code: ErrorCode, pos: Position) -> Self {
        Fault { code, pos }
    }

    /// Promotes the end-of-input sentinel to `code` anchored at `pos`.
    /// Real diagnostics pass through unchanged.
    pub(crate) fn promote(self, code: ErrorCode, pos: Position) -> Self {
        if self.code == ErrorCode::EndOfInput {
            Fault { code, pos }
        } else {
            self
        }
    }

    /// Replaces the end-of-input sentinel code, keeping its position.
    pub(crate) fn remap_end(self, code: ErrorCode) -> Self {
        if self.code == ErrorCode::EndOfInput {
            Fault { code, pos: self.pos }
        } else {
            self
        }
    }

    /// Resolves the byte position to a 1-based line and column.
    pub(crate) fn locate(self, input: &[u8]) -> Error {
        Error {
            code: self.code,
            line: self.pos.line + 1,
            col: column(&input[self.pos.line_start..self.pos.offset]) + 1,
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Fault>;
