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

use qjson::decode;

fn test_decode_ok(tests: &[(&str, &str)]) {
    for &(s, expected) in tests {
        assert_eq!(decode(s.as_bytes()), expected, "input: {s:?}");
    }
}

fn test_decode_err(errors: &[(&str, &str)]) {
    for &(s, expected) in errors {
        assert_eq!(decode(s.as_bytes()), expected, "input: {s:?}");
    }
}

#[test]
fn test_number_literals() {
    test_decode_ok(&[
        ("n: 0", r#"{"n":0}"#),
        ("n: 42", r#"{"n":42}"#),
        ("n: -7", r#"{"n":-7}"#),
        ("n: +7", r#"{"n":7}"#),
        ("n: 10_000", r#"{"n":10000}"#),
        ("n: 0xff", r#"{"n":255}"#),
        ("n: 0X_F", r#"{"n":15}"#),
        ("n: 0b101", r#"{"n":5}"#),
        ("n: 0o17", r#"{"n":15}"#),
        // a leading zero makes a digit run octal
        ("n: 017", r#"{"n":15}"#),
        ("n: 01", r#"{"n":1}"#),
        ("n: 1.5", r#"{"n":1.5}"#),
        ("n: .5", r#"{"n":0.5}"#),
        ("n: 2.", r#"{"n":2}"#),
        ("n: 1e3", r#"{"n":1000}"#),
        ("n: 01e3", r#"{"n":1000}"#),
        ("n: 1_000.5", r#"{"n":1000.5}"#),
    ]);
}

#[test]
fn test_expressions() {
    test_decode_ok(&[
        ("x: 1+2*3", r#"{"x":7}"#),
        ("x: (1+2)*3", r#"{"x":9}"#),
        ("x: 7 % 3", r#"{"x":1}"#),
        ("x: 0xff | 0b1", r#"{"x":255}"#),
        ("x: 0xff & 0x0f", r#"{"x":15}"#),
        ("x: 1 ^ 3", r#"{"x":2}"#),
        ("x: ~0", r#"{"x":-1}"#),
        ("x: -(2+3)", r#"{"x":-5}"#),
        ("x: 10/4", r#"{"x":2}"#),
        ("x: 10.0/4", r#"{"x":2.5}"#),
    ]);
}

#[test]
fn test_durations() {
    test_decode_ok(&[
        ("t: 1w2d3h4m5s", r#"{"t":788645}"#),
        ("t: 1.5h", r#"{"t":5400}"#),
        ("t: 2h30m", r#"{"t":9000}"#),
        ("t: 90m", r#"{"t":5400}"#),
        ("t: 30s", r#"{"t":30}"#),
        ("t: (1h+30m)*2", r#"{"t":10800}"#),
    ]);
}

#[test]
fn test_iso_date_times() {
    test_decode_ok(&[
        ("when: 1997-07-16T19:20+01:00", r#"{"when":869080800}"#),
        ("when: 1997-07-16T19:20:00+01:00", r#"{"when":869077200}"#),
        ("when: 2020-01-01T00:00:00Z", r#"{"when":1577836800}"#),
        ("when: 1970-01-01T", r#"{"when":0}"#),
        ("when: 2020-01-01T00:00:00.500", r#"{"when":1577836800.5}"#),
        // a date time may take part in an expression
        ("when: 2020-01-01T00:00:00Z + 1h", r#"{"when":1577840400}"#),
    ]);
}

#[test]
fn test_numeric_errors() {
    test_decode_err(&[
        ("n: 0b", "invalid binary number at line 1 col 4"),
        ("n: 0b2", "invalid binary number at line 1 col 4"),
        ("n: 0x", "invalid hexadecimal number at line 1 col 4"),
        ("n: 0o8", "invalid octal number at line 1 col 4"),
        ("n: 09", "invalid integer number at line 1 col 4"),
        ("n: 1_", "invalid integer number at line 1 col 4"),
        ("n: 1.2_", "invalid decimal number at line 1 col 4"),
        ("n: 1e", "invalid decimal number at line 1 col 4"),
        ("n: 0xffffffffffffffff", "number overflow at line 1 col 4"),
        ("n: 9223372036854775808", "number overflow at line 1 col 4"),
        ("n: 18446744073709551616", "number overflow at line 1 col 4"),
        ("n: 1/0", "division by zero at line 1 col 5"),
        ("n: 1%0", "division by zero at line 1 col 5"),
        ("n: 1.5 % 2", "operand must be integer at line 1 col 8"),
        ("n: 1.5 | 2", "operand must be integer at line 1 col 8"),
        ("n: ~1.5", "operand must be integer at line 1 col 4"),
        ("n: (1+2", "missing close parenthesis at line 1 col 4"),
        ("n: 1+)", "missing open parenthesis at line 1 col 6"),
        ("n: 1+", "invalid numeric expression at line 1 col 6"),
        ("n: 2020-01-01T10:20:30.5", "invalid ISO date time at line 1 col 4"),
        ("n: 2021-13-01T00:00", "invalid ISO date time at line 1 col 4"),
    ]);
}

#[test]
fn test_number_expression_stops_at_leading_value() {
    // evaluation takes the leading expression; trailing tokens that do
    // not extend it are dropped
    test_decode_ok(&[("n: 1 2", r#"{"n":1}"#)]);
}
