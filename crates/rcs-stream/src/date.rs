// Dweve RCS Stream - Streaming parser for RCS history files
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversion of RCS delta dates to Unix timestamps.
//!
//! RCS writes dates as `Y.mm.dd.hh.mm.ss` in UTC. Files written before 2000
//! use a two-digit year counted from 1900 (`99.12.31.23.59.59`). Dates
//! before 1970 convert to negative timestamps.

use thiserror::Error;

const SECONDS_PER_DAY: i64 = 86_400;

/// Most digits a year field may have; months, days and times take two.
const YEAR_DIGITS: usize = 4;
const FIELD_DIGITS: usize = 2;

/// Why a date token could not be converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DateError {
    message: String,
}

impl DateError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Convert an RCS date to seconds since the Unix epoch.
///
/// Between three and six dot-separated fields are accepted; missing time
/// fields count as zero. Years take at most four digits and the other
/// fields at most two. A value without any dot is taken as a timestamp
/// that is already in seconds.
///
/// # Examples
///
/// ```rust
/// use rcs_stream::parse_rcs_date;
///
/// assert_eq!(parse_rcs_date("2001.01.01.00.00.00"), Ok(978_307_200));
/// assert_eq!(parse_rcs_date("99.12.31.23.59.59"), Ok(946_684_799));
/// assert_eq!(parse_rcs_date("69.07.20.20.17.40"), Ok(-14_182_940));
/// assert_eq!(parse_rcs_date("1234567890"), Ok(1_234_567_890));
/// assert!(parse_rcs_date("2001.13.01").is_err());
/// ```
pub fn parse_rcs_date(value: &str) -> Result<i64, DateError> {
    if !value.contains('.') {
        return parse_field(value, "timestamp", usize::MAX);
    }

    let fields: Vec<&str> = value.split('.').collect();
    if !(3..=6).contains(&fields.len()) {
        return Err(DateError::new(format!(
            "date `{}` has {} fields, expected between 3 and 6",
            value,
            fields.len()
        )));
    }

    let mut parts = [0i64; 6];
    for (i, (slot, (field, name))) in parts
        .iter_mut()
        .zip(
            fields
                .iter()
                .zip(["year", "month", "day", "hour", "minute", "second"]),
        )
        .enumerate()
    {
        let digits = if i == 0 { YEAR_DIGITS } else { FIELD_DIGITS };
        *slot = parse_field(field, name, digits)?;
    }
    let [mut year, month, day, hour, minute, second] = parts;

    if year < 100 {
        year += 1900;
    }
    if !(1..=12).contains(&month) {
        return Err(DateError::new(format!("month {} out of range", month)));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(DateError::new(format!("day {} out of range", day)));
    }
    // 60 admits a leap second
    if hour > 23 || minute > 59 || second > 60 {
        return Err(DateError::new(format!(
            "time {:02}:{:02}:{:02} out of range",
            hour, minute, second
        )));
    }

    Ok(days_from_civil(year, month, day) * SECONDS_PER_DAY + hour * 3600 + minute * 60 + second)
}

fn parse_field(field: &str, name: &str, max_digits: usize) -> Result<i64, DateError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::new(format!("invalid {} `{}`", name, field)));
    }
    if field.len() > max_digits {
        return Err(DateError::new(format!(
            "{} `{}` has more than {} digits",
            name, field, max_digits
        )));
    }
    field
        .parse()
        .map_err(|_| DateError::new(format!("{} `{}` out of range", name, field)))
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
