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

//! Deciding where a card goes after the user has assessed it.

use crate::types::card::TriageOutcome;
use crate::types::date::Date;
use crate::types::label::ListName;
use crate::types::label::SelfAssessmentLabel;

/// Weeks until a card marked "Somewhat know" comes back.
const SOMEWHAT_KNOW_WEEKS: i64 = 1;

/// Weeks until a card marked "Know" comes back.
const KNOW_WEEKS: i64 = 4;

/// The Monday and Friday of the calendar week containing `current_date`.
pub fn week_bounds(current_date: Date) -> (Date, Date) {
    let start_of_week = current_date.add_days(-(current_date.weekday() as i64));
    let end_of_week = start_of_week.add_days(4);
    (start_of_week, end_of_week)
}

/// Whether `due_date` falls between Monday and Friday, inclusive, of the week
/// containing `current_date`. A weekend `current_date` refers to the week
/// that has just ended.
pub fn is_due_this_week(due_date: Date, current_date: Date) -> bool {
    let (start_of_week, end_of_week) = week_bounds(current_date);
    start_of_week <= due_date && due_date <= end_of_week
}

/// The first working day strictly after `date`.
pub fn next_working_day(date: Date) -> Date {
    let mut next_day = date.add_days(1);
    while !next_day.is_working_day() {
        next_day = next_day.add_days(1);
    }
    next_day
}

/// Computes a card's new due date and list from its assessment. Cards with no
/// assessment are left alone.
pub fn retriage(label: Option<SelfAssessmentLabel>, current_date: Date) -> Option<TriageOutcome> {
    let outcome = match label? {
        SelfAssessmentLabel::DoNotKnow => TriageOutcome {
            new_due_date: next_working_day(current_date),
            destination_list: ListName::DoThisWeek,
        },
        SelfAssessmentLabel::SomewhatKnow => {
            let candidate = next_working_day(current_date.add_weeks(SOMEWHAT_KNOW_WEEKS));
            let destination_list = if is_due_this_week(candidate, current_date) {
                ListName::DoThisWeek
            } else {
                ListName::Backlog
            };
            TriageOutcome {
                new_due_date: candidate,
                destination_list,
            }
        }
        SelfAssessmentLabel::Know => TriageOutcome {
            new_due_date: next_working_day(current_date.add_weeks(KNOW_WEEKS)),
            destination_list: ListName::Completed,
        },
    };
    Some(outcome)
}

/// Selects the completed cards that are due again this week and should go
/// back to the weekly list. Their due dates stay as they are.
pub fn sweep_completed<T>(cards: Vec<(T, Date)>, current_date: Date) -> Vec<T> {
    cards
        .into_iter()
        .filter(|(_, due_date)| is_due_this_week(*due_date, current_date))
        .map(|(card, _)| card)
        .collect()
}
