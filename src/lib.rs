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

//! `qjson` converts text in QJSON, a human friendly superset of `JSON`, into canonical `JSON` text. The conversion is deterministic: the same input always produces the same output or the same diagnostic.
//!
//! ## Features
//!
//! On top of standard `JSON`, QJSON accepts:
//!
//! - Line comments (`# ...`, `// ...`) and block comments (`/* ... */`).
//! - Optional commas between members and array values.
//! - Optional braces around the top level object.
//! - Single quoted, double quoted, and quoteless strings, plus multiline
//!   strings with an explicit margin and newline specifier.
//! - Unquoted member keys.
//! - Literal names in any common case (`true`, `Yes`, `OFF`, `NULL`, ...).
//! - Numbers in decimal, hexadecimal, octal, and binary notation with `_`
//!   digit separators, combined with the arithmetic and bitwise operators
//!   `+ - * / % & | ^ ~ ( )`.
//! - ISO-8601 date times, converted to seconds since the Unix epoch.
//! - Duration suffixes (`1w2d3h4m5s`), combined into a single number of
//!   seconds.
//!
//! ## Example
//!
//! ```
//! let json = qjson::decode(b"name: QJSON\nuptime: 2h30m // durations\n");
//! assert_eq!(json, r#"{"name":"QJSON","uptime":9000}"#);
//!
//! // diagnostics carry the line and column of the error
//! let err = qjson::try_decode(b"a: \"unclosed").unwrap_err();
//! assert_eq!(err.to_string(), "unclosed double quote string at line 1 col 4");
//! ```

mod constants;
mod datetime;
mod emit;
mod error;
mod expr;
mod number;
mod parser;
mod tokenizer;
mod util;

pub use error::Error;
pub use error::ErrorCode;
pub use parser::decode;
pub use parser::try_decode;

/// The version of the converter and of the QJSON syntax it supports.
pub fn version() -> &'static str {
    concat!("qjson-rust: v", env!("CARGO_PKG_VERSION"), " syntax: v0.0.0")
}
