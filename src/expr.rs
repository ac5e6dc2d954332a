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

//! Pratt evaluation of numeric expressions. Each token kind has a
//! binding precedence; prefix handling covers values, unary `+ - ~`, and
//! grouping, infix handling covers the arithmetic, bitwise, and duration
//! operators.

use crate::constants::SECONDS_PER_DAY;
use crate::constants::SECONDS_PER_HOUR;
use crate::constants::SECONDS_PER_MINUTE;
use crate::constants::SECONDS_PER_WEEK;
use crate::error::ErrorCode;
use crate::number::ExprFault;
use crate::number::NumToken;
use crate::number::NumTokenKind;
use crate::number::NumTokenizer;
use crate::number::NumValue;

const HIGHEST_PRECEDENCE: u8 = 4;

fn precedence(kind: NumTokenKind) -> u8 {
    match kind {
        NumTokenKind::Plus
        | NumTokenKind::Minus
        | NumTokenKind::Or
        | NumTokenKind::Xor
        | NumTokenKind::Inverse => 1,
        NumTokenKind::Multiply
        | NumTokenKind::Divide
        | NumTokenKind::Modulo
        | NumTokenKind::And => 2,
        NumTokenKind::Weeks
        | NumTokenKind::Days
        | NumTokenKind::Hours
        | NumTokenKind::Minutes
        | NumTokenKind::Seconds => HIGHEST_PRECEDENCE,
        NumTokenKind::Integer(_)
        | NumTokenKind::Decimal(_)
        | NumTokenKind::OpenParen
        | NumTokenKind::CloseParen => 0,
    }
}

/// Evaluates the numeric expression in `input` and returns its value as
/// a decimal (integer results are widened). Errors carry the byte offset
/// of the diagnosis inside `input`.
pub(crate) fn eval_number_expr(input: &[u8]) -> Result<f64, ExprFault> {
    let mut e = Evaluator::new(input);
    let val = e.expression(0)?;
    Ok(val.as_f64())
}

struct Evaluator<'a> {
    lexer: NumTokenizer<'a>,
    cur: Result<NumToken, ExprFault>,
}

impl<'a> Evaluator<'a> {
    fn new(input: &'a [u8]) -> Self {
        let mut lexer = NumTokenizer::new(input);
        let cur = lexer.next_token();
        Evaluator { lexer, cur }
    }

    fn advance(&mut self) {
        self.cur = self.lexer.next_token();
    }

    /// Evaluates the expression at the current token. On return the
    /// current token is the first one after the evaluated expression.
    /// Trailing tokens that bind no tighter than `rbp` are left alone.
    fn expression(&mut self, rbp: u8) -> Result<NumValue, ExprFault> {
        let t = self.cur?;
        self.advance();
        let mut left = self.prefix(t)?;
        loop {
            let Ok(t) = self.cur else {
                break;
            };
            if precedence(t.kind) <= rbp {
                break;
            }
            self.advance();
            left = self.infix(t, left)?;
        }
        Ok(left)
    }

    fn prefix(&mut self, t: NumToken) -> Result<NumValue, ExprFault> {
        match t.kind {
            NumTokenKind::Integer(v) => Ok(NumValue::Int(v)),
            NumTokenKind::Decimal(v) => Ok(NumValue::Float(v)),
            NumTokenKind::Plus => self
                .expression(HIGHEST_PRECEDENCE + 1)
                .map_err(ExprFault::operand_required),
            NumTokenKind::Minus => {
                let right = self
                    .expression(HIGHEST_PRECEDENCE + 1)
                    .map_err(ExprFault::operand_required)?;
                Ok(match right {
                    NumValue::Int(v) => NumValue::Int(v.wrapping_neg()),
                    NumValue::Float(v) => NumValue::Float(-v),
                })
            }
            NumTokenKind::Inverse => {
                let right = self
                    .expression(HIGHEST_PRECEDENCE + 1)
                    .map_err(ExprFault::operand_required)?;
                match right {
                    NumValue::Int(v) => Ok(NumValue::Int(!v)),
                    NumValue::Float(_) => {
                        Err(ExprFault::new(ErrorCode::OperandMustBeInteger, t.off))
                    }
                }
            }
            NumTokenKind::OpenParen => {
                let right = self.expression(0).map_err(ExprFault::operand_required)?;
                match self.cur {
                    Ok(close) if close.kind == NumTokenKind::CloseParen => {
                        self.advance();
                        Ok(right)
                    }
                    _ => Err(ExprFault::new(ErrorCode::UnclosedParenthesis, t.off)),
                }
            }
            NumTokenKind::CloseParen => {
                Err(ExprFault::new(ErrorCode::UnopenedParenthesis, t.off))
            }
            _ => Err(ExprFault::new(ErrorCode::InvalidNumericExpression, t.off)),
        }
    }

    fn infix(&mut self, t: NumToken, left: NumValue) -> Result<NumValue, ExprFault> {
        match t.kind {
            NumTokenKind::Weeks => self.duration(t, left, SECONDS_PER_WEEK),
            NumTokenKind::Days => self.duration(t, left, SECONDS_PER_DAY),
            NumTokenKind::Hours => self.duration(t, left, SECONDS_PER_HOUR),
            NumTokenKind::Minutes => self.duration(t, left, SECONDS_PER_MINUTE),
            NumTokenKind::Seconds => self.duration(t, left, 1.0),
            NumTokenKind::Plus
            | NumTokenKind::Minus
            | NumTokenKind::Multiply
            | NumTokenKind::Divide
            | NumTokenKind::Modulo
            | NumTokenKind::And
            | NumTokenKind::Or
            | NumTokenKind::Xor => {
                let right = self
                    .expression(precedence(t.kind))
                    .map_err(ExprFault::operand_required)?;
                self.binary(t, left, right)
            }
            _ => Err(ExprFault::new(ErrorCode::InvalidNumericExpression, t.off)),
        }
    }

    fn binary(&self, t: NumToken, left: NumValue, right: NumValue) -> Result<NumValue, ExprFault> {
        // add, subtract, multiply, and divide promote to decimal when
        // either operand is decimal; the rest require two integers
        let ints = match (left, right) {
            (NumValue::Int(a), NumValue::Int(b)) => Some((a, b)),
            _ => None,
        };
        let val = match t.kind {
            NumTokenKind::Plus => match ints {
                Some((a, b)) => NumValue::Int(a.wrapping_add(b)),
                None => NumValue::Float(left.as_f64() + right.as_f64()),
            },
            NumTokenKind::Minus => match ints {
                Some((a, b)) => NumValue::Int(a.wrapping_sub(b)),
                None => NumValue::Float(left.as_f64() - right.as_f64()),
            },
            NumTokenKind::Multiply => match ints {
                Some((a, b)) => NumValue::Int(a.wrapping_mul(b)),
                None => NumValue::Float(left.as_f64() * right.as_f64()),
            },
            NumTokenKind::Divide => match ints {
                Some((_, 0)) => {
                    return Err(ExprFault::new(ErrorCode::DivisionByZero, t.off));
                }
                Some((a, b)) => NumValue::Int(a.wrapping_div(b)),
                None => {
                    if right.as_f64() == 0.0 {
                        return Err(ExprFault::new(ErrorCode::DivisionByZero, t.off));
                    }
                    NumValue::Float(left.as_f64() / right.as_f64())
                }
            },
            NumTokenKind::Modulo => match ints {
                Some((_, 0)) => {
                    return Err(ExprFault::new(ErrorCode::DivisionByZero, t.off));
                }
                Some((a, b)) => NumValue::Int(a.wrapping_rem(b)),
                None => {
                    return Err(ExprFault::new(ErrorCode::OperandMustBeInteger, t.off));
                }
            },
            NumTokenKind::And => match ints {
                Some((a, b)) => NumValue::Int(a & b),
                None => {
                    return Err(ExprFault::new(ErrorCode::OperandMustBeInteger, t.off));
                }
            },
            NumTokenKind::Or => match ints {
                Some((a, b)) => NumValue::Int(a | b),
                None => {
                    return Err(ExprFault::new(ErrorCode::OperandMustBeInteger, t.off));
                }
            },
            NumTokenKind::Xor => match ints {
                Some((a, b)) => NumValue::Int(a ^ b),
                None => {
                    return Err(ExprFault::new(ErrorCode::OperandMustBeInteger, t.off));
                }
            },
            _ => {
                return Err(ExprFault::new(ErrorCode::InvalidNumericExpression, t.off));
            }
        };
        Ok(val)
    }

    /// A duration suffix multiplies its left operand; a following
    /// expression, if any, is added (`2h30m` is 2 hours plus 30 minutes).
    fn duration(&mut self, t: NumToken, left: NumValue, seconds: f64) -> Result<NumValue, ExprFault> {
        let left = left.as_f64();
        if let Ok(next) = self.cur {
            if next.kind == NumTokenKind::CloseParen {
                return Ok(NumValue::Float(left * seconds));
            }
        }
        match self.expression(precedence(t.kind) - 1) {
            Ok(right) => Ok(NumValue::Float(left * seconds + right.as_f64())),
            // the right hand operand is optional
            Err(fault) if fault.code == ErrorCode::EndOfInput => {
                Ok(NumValue::Float(left * seconds))
            }
            Err(fault) => Err(fault),
        }
    }
}
