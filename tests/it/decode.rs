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

use qjson::{decode, try_decode, version, ErrorCode};

fn test_decode_ok(tests: &[(&str, &str)]) {
    for &(s, expected) in tests {
        assert_eq!(decode(s.as_bytes()), expected, "input: {s:?}");
        // every successful output is valid JSON
        let parsed: Result<serde_json::Value, _> = serde_json::from_str(expected);
        assert!(parsed.is_ok(), "expected output is not JSON: {expected:?}");
    }
}

fn test_decode_err(errors: &[(&str, &str)]) {
    for &(s, expected) in errors {
        assert_eq!(decode(s.as_bytes()), expected, "input: {s:?}");
        assert!(try_decode(s.as_bytes()).is_err(), "input: {s:?}");
    }
}

#[test]
fn test_empty_input() {
    test_decode_ok(&[
        ("", "{}"),
        ("   \t ", "{}"),
        ("\n\r\n\n", "{}"),
        ("# just a comment", "{}"),
        ("// a comment\n/* and\nanother */", "{}"),
        ("{}", "{}"),
        ("{ }", "{}"),
    ]);
}

#[test]
fn test_members() {
    test_decode_ok(&[
        ("a:b", r#"{"a":"b"}"#),
        ("a : b", r#"{"a":"b"}"#),
        ("a:1\nb:2", r#"{"a":1,"b":2}"#),
        ("a:1, b:2", r#"{"a":1,"b":2}"#),
        ("\"a b\": 'c d'", r#"{"a b":"c d"}"#),
        // member keys are always strings
        ("true: 1\n2020: 2", r#"{"true":1,"2020":2}"#),
        // comments and blank lines between members
        ("a:1 # first\n\n// second\nb:2", r#"{"a":1,"b":2}"#),
    ]);
}

#[test]
fn test_optional_top_level_braces() {
    test_decode_ok(&[
        ("{ name: \"Alice\" , age: 30 // comment\n }", r#"{"name":"Alice","age":30}"#),
        ("name: \"Alice\"\nage: 30", r#"{"name":"Alice","age":30}"#),
        ("{a: {b: 1}}", r#"{"a":{"b":1}}"#),
    ]);
}

#[test]
fn test_literal_names() {
    test_decode_ok(&[
        ("a: true\nb: True\nc: TRUE", r#"{"a":true,"b":true,"c":true}"#),
        ("a: yes\nb: Yes\nc: YES", r#"{"a":true,"b":true,"c":true}"#),
        ("a: on\nb: On\nc: ON", r#"{"a":true,"b":true,"c":true}"#),
        ("a: false\nb: no\nc: off", r#"{"a":false,"b":false,"c":false}"#),
        ("a: null\nb: Null\nc: NULL", r#"{"a":null,"b":null,"c":null}"#),
        // near misses stay strings
        ("a: yess\nb: onn\nc: nul", r#"{"a":"yess","b":"onn","c":"nul"}"#),
    ]);
}

#[test]
fn test_nested_containers() {
    test_decode_ok(&[
        ("a: {b: 1, c: [1, 2, 3]}", r#"{"a":{"b":1,"c":[1,2,3]}}"#),
        ("a: []", r#"{"a":[]}"#),
        ("a: {}", r#"{"a":{}}"#),
        ("a: [[1], [2]]", r#"{"a":[[1],[2]]}"#),
        ("a: [on, off, null]", r#"{"a":[true,false,null]}"#),
        ("a: [\"x\" \"y\"]", r#"{"a":["x","y"]}"#),
        ("a: [1\n2]", r#"{"a":[1,2]}"#),
    ]);
}

#[test]
fn test_depth_limit() {
    let nested = |n: usize| {
        let mut src = String::from("a:");
        src.push_str(&"[".repeat(n));
        src.push('1');
        src.push_str(&"]".repeat(n));
        src
    };
    // depth 200 converts, depth 201 is refused
    let ok = decode(nested(200).as_bytes());
    assert!(ok.starts_with('{'), "{ok}");
    let err = decode(nested(201).as_bytes());
    assert!(
        err.starts_with("too many object or array encapsulations at line 1 col "),
        "{err}"
    );
}

#[test]
fn test_structure_errors() {
    test_decode_err(&[
        ("{ a: 1", "unclosed object at line 1 col 1"),
        ("a: { b: 1", "unclosed object at line 1 col 4"),
        ("a: [1", "unclosed array at line 1 col 4"),
        ("}", "syntax error at line 1 col 1"),
        ("a: 1 }", "syntax error at line 1 col 6"),
        ("{a:1} x", "syntax error at line 1 col 7"),
        ("[1]", "expect string identifier at line 1 col 2"),
        ("a 1", "expect a colon at line 1 col 4"),
        ("a", "unexpected end of input at line 1 col 2"),
        ("a:", "unexpected end of input at line 1 col 3"),
        ("a: ]", "unexpected ] at line 1 col 5"),
        ("a: [}]", "unexpected } at line 1 col 6"),
        ("a:1,", "expect identifier after comma at line 1 col 5"),
        ("a:1,}", "expect identifier after comma at line 1 col 6"),
        ("a:[1,]", "expect value after comma at line 1 col 7"),
        ("a:[1,", "expect value after comma at line 1 col 6"),
    ]);
}

#[test]
fn test_input_errors() {
    test_decode_err(&[
        ("a: \rx", "invalid character at line 1 col 4"),
        ("a: /* x", "unclosed /*...*/ comment at line 1 col 4"),
    ]);
    // byte-level invalid and truncated UTF-8
    assert_eq!(decode(b"a: \xff"), "invalid character at line 1 col 4");
    assert_eq!(
        decode(b"a: \xc3"),
        "last utf8 char is truncated at line 1 col 4"
    );
}

#[test]
fn test_error_columns_count_code_points() {
    test_decode_err(&[
        ("église: \"x", "unclosed double quote string at line 1 col 9"),
        ("k:\nv\u{00e9}: \"x", "expect string identifier at line 2 col 4"),
    ]);
}

#[test]
fn test_error_positions_are_stable_under_appended_input() {
    let base = "a: \"x\nb\"";
    let appended = format!("{base}\nmore: 1");
    assert_eq!(
        decode(base.as_bytes()),
        "newline in double quoted string at line 1 col 4"
    );
    assert_eq!(
        decode(appended.as_bytes()),
        "newline in double quoted string at line 1 col 4"
    );
}

#[test]
fn test_try_decode() {
    let err = try_decode(b"{ a: 1").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnclosedObject);
    assert_eq!(err.line, 1);
    assert_eq!(err.col, 1);
    assert_eq!(err.to_string(), "unclosed object at line 1 col 1");
    assert_eq!(try_decode(b"a:b").unwrap(), r#"{"a":"b"}"#);
}

#[test]
fn test_idempotence_on_canonical_output() {
    // feeding canonical output back in yields the same canonical form
    for src in ["a: 1\nb: [x y, 'z']\nc: {d: on}", "{v: 1h30m}"] {
        let once = decode(src.as_bytes());
        let twice = decode(once.as_bytes());
        assert_eq!(once, twice, "input: {src:?}");
    }
}

#[test]
fn test_version() {
    let v = version();
    assert!(v.starts_with("qjson-rust: v"), "{v}");
    assert!(v.ends_with(" syntax: v0.0.0"), "{v}");
}
