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

//! Spreading problems over working days.

use crate::error::Fallible;
use crate::error::fail;
use crate::triage::is_due_this_week;
use crate::types::card::DueDateAssignment;
use crate::types::date::Date;
use crate::types::label::ListName;
use crate::types::problem::Problem;

/// Assigns a due date to every problem, in order, filling each working day
/// with at most `problems_per_day` problems.
///
/// Scanning starts at `start_date` itself: if it is a working day, the first
/// problems are due on it. Weekends are skipped.
pub fn allocate<'a>(
    problems: &[&'a Problem],
    start_date: Date,
    problems_per_day: usize,
) -> Fallible<Vec<DueDateAssignment<'a>>> {
    if problems_per_day == 0 {
        return fail("problems_per_day must be a positive integer.");
    }
    let mut assignments = Vec::with_capacity(problems.len());
    let mut remaining = problems.iter().copied();
    let mut day = start_date;
    while assignments.len() < problems.len() {
        if day.is_working_day() {
            for problem in remaining.by_ref().take(problems_per_day) {
                assignments.push(DueDateAssignment {
                    problem,
                    due_date: day,
                });
            }
        }
        day = day.add_days(1);
    }
    Ok(assignments)
}

/// The number of unassessed cards the weekly list should hold.
pub fn weekly_quota(problems_per_day: usize, workdays: usize) -> usize {
    problems_per_day * workdays
}

/// The list a newly created card starts in.
pub fn initial_list(due_date: Date, today: Date) -> ListName {
    if is_due_this_week(due_date, today) {
        ListName::DoThisWeek
    } else {
        ListName::Backlog
    }
}
