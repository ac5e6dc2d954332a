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
        assert!(
            serde_json::from_str::<serde_json::Value>(expected).is_ok(),
            "expected output is not JSON: {expected:?}"
        );
    }
}

fn test_decode_err(errors: &[(&str, &str)]) {
    for &(s, expected) in errors {
        assert_eq!(decode(s.as_bytes()), expected, "input: {s:?}");
    }
}

#[test]
fn test_double_quoted_strings() {
    test_decode_ok(&[
        ("a: \"hello\"", r#"{"a":"hello"}"#),
        ("a: \"with \\\" quote\"", r#"{"a":"with \" quote"}"#),
        ("a: \"tab\\there\"", r#"{"a":"tab\there"}"#),
        ("a: \"a\tb\"", r#"{"a":"a\tb"}"#),
        ("a: \"\\u00e9\"", r#"{"a":"\u00e9"}"#),
        ("a: \"<div></div>\"", r#"{"a":"<div><\/div>"}"#),
        ("a: \"left, right\"", r#"{"a":"left, right"}"#),
        ("a: \"\"", r#"{"a":""}"#),
    ]);
}

#[test]
fn test_single_quoted_strings() {
    test_decode_ok(&[
        ("a: 'hello'", r#"{"a":"hello"}"#),
        ("a: 'don\\'t'", r#"{"a":"don't"}"#),
        ("a: 'say \"hi\"'", r#"{"a":"say \"hi\""}"#),
        ("a: 'a\\nb'", r#"{"a":"a\nb"}"#),
    ]);
}

#[test]
fn test_quoteless_strings() {
    test_decode_ok(&[
        ("a: hello world", r#"{"a":"hello world"}"#),
        // inner whitespace is kept, trailing whitespace is trimmed
        ("a: hello  world   ", r#"{"a":"hello  world"}"#),
        ("a: back\\slash", r#"{"a":"back\\slash"}"#),
        ("a: say \"hi\"", r#"{"a":"say \"hi\""}"#),
        ("a: <div></div>", r#"{"a":"<div><\/div>"}"#),
        ("a: semi/colon", r#"{"a":"semi/colon"}"#),
        ("a: caf\u{00e9} au lait", "{\"a\":\"caf\u{00e9} au lait\"}"),
        // stops at structural bytes and comments
        ("a: v # comment", r#"{"a":"v"}"#),
        ("a: v // comment", r#"{"a":"v"}"#),
        ("a: v/* comment */", r#"{"a":"v"}"#),
    ]);
}

#[test]
fn test_string_escape_errors() {
    test_decode_err(&[
        ("a: \"b\\qc\"", "invalid escape sequence at line 1 col 6"),
        ("a: \"b\\u12\"", "invalid escape sequence at line 1 col 6"),
        ("a: 'b\\\"c'", "invalid escape sequence at line 1 col 6"),
        ("a: \"unclosed", "unclosed double quote string at line 1 col 4"),
        ("a: 'unclosed", "unclosed single quote string at line 1 col 4"),
        ("a: \"new\nline\"", "newline in double quoted string at line 1 col 4"),
        ("a: 'new\nline'", "newline in single quoted string at line 1 col 4"),
    ]);
}

#[test]
fn test_multiline_strings() {
    test_decode_ok(&[
        (
            "text:\n    ` \\n\n    hello\n    `",
            r#"{"text":"hello"}"#,
        ),
        (
            "a:\n  ` \\n\n  line1\n  line2\n  `",
            "{\"a\":\"line1\\nline2\"}",
        ),
        // the newline specifier selects the emitted escape
        (
            "a:\n  ` \\r\\n\n  x\n  y\n  `",
            "{\"a\":\"x\\r\\ny\"}",
        ),
        // `\ is a literal backtick, content quotes are escaped
        (
            "a:\n` \\n\na`\\b \"q\"\n`",
            "{\"a\":\"a`b \\\"q\\\"\"}",
        ),
        // a line comment may follow the newline specifier
        (
            "a:\n  ` \\n # note\n  body\n  `",
            r#"{"a":"body"}"#,
        ),
        // closing backtick directly after content
        (
            "a:\n` \\n\ncontent`",
            r#"{"a":"content"}"#,
        ),
        // margin bytes are stripped from every line
        (
            "a:\n\t` \\n\n\tfirst\n\tsecond\n\t`",
            "{\"a\":\"first\\nsecond\"}",
        ),
    ]);
}

#[test]
fn test_multiline_errors() {
    test_decode_err(&[
        (
            "x: ` \\n\nhello\n`",
            "multiline margin must contain only whitespaces at line 1 col 1",
        ),
        ("a:\n`", "missing \\n or \\r\\n after multiline start at line 2 col 1"),
        ("a:\n`x", "expect \\n or \\r\\n after ` at line 2 col 1"),
        ("a:\n` \\n x\nx`", "invalid multiline start line at line 2 col 1"),
        ("a:\n` \\n\nxx", "unclosed multiline at line 2 col 1"),
        ("a:\n  ` \\n\n x`", "invalid margin character at line 3 col 2"),
    ]);
}
