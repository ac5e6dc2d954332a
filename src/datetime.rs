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

use chrono::NaiveDate;

use crate::util::Scan;

/// Scans an ISO-8601 date time in front of `v`:
/// `YYYY-MM-DDTHH:MM[:SS[.fraction][Z|±HH:MM]]`, with the fraction
/// exactly 3 or 6 digits. Returns the byte length of the match; the date
/// part alone (with its trailing `T`) is a valid match.
pub(crate) fn scan_iso_date_time(v: &[u8]) -> Scan {
    if v.len() < 11
        || v[10] != b'T'
        || v[4] != b'-'
        || v[7] != b'-'
        || !v[..4].iter().all(u8::is_ascii_digit)
        || !v[5..7].iter().all(u8::is_ascii_digit)
        || !v[8..10].iter().all(u8::is_ascii_digit)
    {
        return Scan::None;
    }
    let mut n = 11;
    let mut w = &v[11..];
    if w.is_empty() {
        return Scan::Len(n);
    }
    // hours and minutes; seconds and the rest are optional
    if w.len() < 5
        || w[2] != b':'
        || !w[0].is_ascii_digit()
        || !w[1].is_ascii_digit()
        || !w[3].is_ascii_digit()
        || !w[4].is_ascii_digit()
    {
        return Scan::Invalid;
    }
    n += 5;
    w = &w[5..];
    if w.is_empty() {
        return Scan::Len(n);
    }
    if w[0] == b'Z' {
        return Scan::Len(n + 1);
    }
    if w[0] != b':' {
        return Scan::Len(n);
    }
    if w.len() < 3 || !w[1].is_ascii_digit() || !w[2].is_ascii_digit() {
        return Scan::Invalid;
    }
    n += 3;
    w = &w[3..];
    if w.is_empty() {
        return Scan::Len(n);
    }
    if w[0] == b'Z' {
        return Scan::Len(n + 1);
    }
    if w[0] != b'.' && w[0] != b'+' && w[0] != b'-' {
        return Scan::Len(n);
    }
    // milli or micro seconds
    if w[0] == b'.' {
        n += 1;
        w = &w[1..];
        let p = w.iter().take_while(|b| b.is_ascii_digit()).count();
        if p != 6 && p != 3 {
            return Scan::Invalid;
        }
        n += p;
        w = &w[p..];
    }
    if w.is_empty() {
        return Scan::Len(n);
    }
    if w[0] == b'Z' {
        return Scan::Len(n + 1);
    }
    if w[0] != b'+' && w[0] != b'-' {
        return Scan::Len(n);
    }
    // time offset
    n += 1;
    w = &w[1..];
    if w.len() < 5
        || w[2] != b':'
        || !w[0].is_ascii_digit()
        || !w[1].is_ascii_digit()
        || !w[3].is_ascii_digit()
        || !w[4].is_ascii_digit()
    {
        return Scan::Invalid;
    }
    Scan::Len(n + 5)
}

/// Converts a literal matched by [`scan_iso_date_time`] to UTC seconds
/// since 1970-01-01T00:00:00Z. The zone offset and fractional seconds
/// apply only when the literal carries an explicit seconds field.
/// Returns None for out-of-range fields or a negative result.
pub(crate) fn decode_iso_date_time(v: &[u8]) -> Option<f64> {
    let year = digits(&v[..4]);
    let month = digits(&v[5..7]);
    let day = digits(&v[8..10]);
    if v.len() == 11 {
        return make_time(year, month, day, 0, 0, 0, 0.0, 0, 0);
    }
    let hour = digits(&v[11..13]);
    let minute = digits(&v[14..16]);
    if v.len() < 19 || v[16] != b':' {
        return make_time(year, month, day, hour, minute, 0, 0.0, 0, 0);
    }
    let second = digits(&v[17..19]);
    let mut w = &v[19..];
    let mut frac = 0.0;
    if let [b'.', ..] = w {
        let p = w[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        let divisor = if p == 6 { 1e6 } else { 1e3 };
        frac = digits(&w[1..1 + p]) as f64 / divisor;
        w = &w[1 + p..];
    }
    let (mut off_hour, mut off_minute) = (0, 0);
    if let [sign @ (b'+' | b'-'), ..] = w {
        off_hour = digits(&w[1..3]);
        off_minute = digits(&w[4..6]);
        if *sign == b'-' {
            off_hour = -off_hour;
        }
    }
    make_time(
        year, month, day, hour, minute, second, frac, off_hour, off_minute,
    )
}

fn digits(v: &[u8]) -> i64 {
    v.iter().fold(0, |acc, b| acc * 10 + i64::from(b - b'0'))
}

#[allow(clippy::too_many_arguments)]
fn make_time(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    frac: f64,
    off_hour: i64,
    off_minute: i64,
) -> Option<f64> {
    if year < 1970
        || !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || !(0..=24).contains(&hour)
        || !(0..=59).contains(&minute)
        || !(0..=60).contains(&second)
        || !(-15..=15).contains(&off_hour)
        || !(0..=59).contains(&off_minute)
    {
        return None;
    }
    // out-of-range days, hour 24, and leap seconds normalize forward
    let month_start = NaiveDate::from_ymd_opt(year as i32, month as u32, 1)?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let days = (month_start - epoch).num_days() + day - 1;
    let seconds = days * 86400 + hour * 3600 + minute * 60 + second;
    let mut v = seconds as f64 + frac;
    if off_hour < 0 {
        v = v - (off_hour * 3600) as f64 + (off_minute * 60) as f64;
    } else {
        v = v - (off_hour * 3600) as f64 - (off_minute * 60) as f64;
    }
    if v < 0.0 {
        return None;
    }
    Some(v)
}
