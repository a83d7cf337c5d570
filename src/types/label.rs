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

use crate::error::ErrorReport;
use crate::error::fail;

/// The label a user applies to a card after reviewing the problem.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SelfAssessmentLabel {
    DoNotKnow,
    SomewhatKnow,
    Know,
}

impl SelfAssessmentLabel {
    /// In order of precedence, for cards that carry more than one.
    pub const ALL: [SelfAssessmentLabel; 3] = [
        SelfAssessmentLabel::DoNotKnow,
        SelfAssessmentLabel::SomewhatKnow,
        SelfAssessmentLabel::Know,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelfAssessmentLabel::DoNotKnow => "Do not know",
            SelfAssessmentLabel::SomewhatKnow => "Somewhat know",
            SelfAssessmentLabel::Know => "Know",
        }
    }

    /// Picks the assessment out of a card's label names. Names that are not
    /// assessments are ignored.
    pub fn from_label_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|label| names.iter().any(|name| name.as_ref() == label.as_str()))
    }

    pub fn is_assessment(name: &str) -> bool {
        Self::ALL.iter().any(|label| label.as_str() == name)
    }
}

impl TryFrom<&str> for SelfAssessmentLabel {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Do not know" => Ok(SelfAssessmentLabel::DoNotKnow),
            "Somewhat know" => Ok(SelfAssessmentLabel::SomewhatKnow),
            "Know" => Ok(SelfAssessmentLabel::Know),
            _ => fail(format!("Invalid assessment label: {value}")),
        }
    }
}

/// The lists a card moves between.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListName {
    DoThisWeek,
    Backlog,
    Completed,
    Retrospective,
}

impl ListName {
    pub const ALL: [ListName; 4] = [
        ListName::DoThisWeek,
        ListName::Backlog,
        ListName::Completed,
        ListName::Retrospective,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListName::DoThisWeek => "Do this week",
            ListName::Backlog => "Backlog",
            ListName::Completed => "Completed",
            ListName::Retrospective => "Retrospective",
        }
    }
}

impl Display for ListName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_names() {
        assert_eq!(
            SelfAssessmentLabel::from_label_names(&["Easy", "Know"]),
            Some(SelfAssessmentLabel::Know)
        );
        assert_eq!(
            SelfAssessmentLabel::from_label_names(&["Somewhat know", "Graphs"]),
            Some(SelfAssessmentLabel::SomewhatKnow)
        );
        assert_eq!(SelfAssessmentLabel::from_label_names(&["Easy", "Graphs"]), None);
        let empty: [&str; 0] = [];
        assert_eq!(SelfAssessmentLabel::from_label_names(&empty), None);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            SelfAssessmentLabel::from_label_names(&["Know", "Do not know"]),
            Some(SelfAssessmentLabel::DoNotKnow)
        );
        assert_eq!(
            SelfAssessmentLabel::from_label_names(&["Know", "Somewhat know"]),
            Some(SelfAssessmentLabel::SomewhatKnow)
        );
    }

    #[test]
    fn test_matching_is_exact() {
        assert_eq!(SelfAssessmentLabel::from_label_names(&["know"]), None);
        assert_eq!(SelfAssessmentLabel::from_label_names(&["Know "]), None);
        assert!(SelfAssessmentLabel::try_from("Knows").is_err());
    }

    #[test]
    fn test_round_trip_names() {
        for label in SelfAssessmentLabel::ALL {
            assert_eq!(SelfAssessmentLabel::try_from(label.as_str()), Ok(label));
            assert!(SelfAssessmentLabel::is_assessment(label.as_str()));
        }
        assert!(!SelfAssessmentLabel::is_assessment("Medium"));
    }

    #[test]
    fn test_list_names() {
        assert_eq!(ListName::DoThisWeek.to_string(), "Do this week");
        assert_eq!(ListName::Retrospective.as_str(), "Retrospective");
    }
}
