// Copyright 2025 Fernando Borretti
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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Datelike;
use chrono::Local;
use chrono::NaiveDate;
use chrono::TimeDelta;
use chrono::Utc;
use serde::Serialize;
use serde::Serializer;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Days in a week that are working days, starting from Monday.
pub const WORKING_DAYS_PER_WEEK: u32 = 5;

/// A calendar date with no time-of-day component.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Date(NaiveDate);

impl Date {
    #[cfg(test)]
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self(NaiveDate::from_ymd_opt(year, month, day).unwrap())
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Days since the most recent Monday: Monday is 0, Sunday is 6.
    pub fn weekday(self) -> u32 {
        self.0.weekday().num_days_from_monday()
    }

    pub fn is_working_day(self) -> bool {
        self.weekday() < WORKING_DAYS_PER_WEEK
    }

    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + TimeDelta::days(days))
    }

    pub fn add_weeks(self, weeks: i64) -> Self {
        Self(self.0 + TimeDelta::weeks(weeks))
    }

    /// Renders the date as the timestamp stored in a card's `due` field.
    /// Noon UTC keeps the calendar date stable across most timezones.
    pub fn to_due_timestamp(self) -> String {
        format!("{}T12:00:00.000Z", self.0.format("%Y-%m-%d"))
    }

    /// Parses a card's `due` field. Accepts RFC 3339 timestamps (taking the
    /// UTC date) as well as bare `YYYY-MM-DD` dates.
    pub fn from_due_timestamp(s: &str) -> Fallible<Self> {
        match DateTime::parse_from_rfc3339(s) {
            Ok(ts) => Ok(Self(ts.with_timezone(&Utc).date_naive())),
            Err(_) => s.parse(),
        }
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?;
        Ok(Self(date))
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
