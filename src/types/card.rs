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

use crate::types::date::Date;
use crate::types::label::ListName;
use crate::types::label::SelfAssessmentLabel;
use crate::types::problem::Problem;

/// A card as read back from the board.
#[derive(Clone, Debug)]
pub struct BoardCard {
    pub id: String,
    pub name: String,
    /// The raw `due` field, if the card has one.
    pub due: Option<String>,
    /// The names of the card's labels.
    pub labels: Vec<String>,
}

impl BoardCard {
    /// The card's due date, or `None` if it has none or it can't be parsed.
    pub fn due_date(&self) -> Option<Date> {
        self.due
            .as_deref()
            .and_then(|due| Date::from_due_timestamp(due).ok())
    }

    pub fn assessment(&self) -> Option<SelfAssessmentLabel> {
        SelfAssessmentLabel::from_label_names(&self.labels)
    }
}

/// A card to be created on the board.
#[derive(Clone, Debug)]
pub struct NewCard {
    pub list_id: String,
    pub name: String,
    pub description: String,
    pub label_ids: Vec<String>,
    pub due_date: Date,
}

/// A problem paired with the date it is due.
#[derive(Clone, Debug, PartialEq)]
pub struct DueDateAssignment<'a> {
    pub problem: &'a Problem,
    pub due_date: Date,
}

/// Where a card goes, and when it is due, after its assessment is applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TriageOutcome {
    pub new_due_date: Date,
    pub destination_list: ListName,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(due: Option<&str>, labels: &[&str]) -> BoardCard {
        BoardCard {
            id: "c1".to_string(),
            name: "Graphs: Clone Graph".to_string(),
            due: due.map(|s| s.to_string()),
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_due_date() {
        assert_eq!(
            card(Some("2025-01-13T12:00:00.000Z"), &[]).due_date(),
            Some(Date::ymd(2025, 1, 13))
        );
        assert_eq!(card(None, &[]).due_date(), None);
        assert_eq!(card(Some("garbage"), &[]).due_date(), None);
    }

    #[test]
    fn test_assessment() {
        assert_eq!(
            card(None, &["Medium", "Somewhat know"]).assessment(),
            Some(SelfAssessmentLabel::SomewhatKnow)
        );
        assert_eq!(card(None, &["Medium"]).assessment(), None);
    }
}
