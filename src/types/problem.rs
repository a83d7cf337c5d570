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

use std::fmt::Formatter;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::MapAccess;
use serde::de::Visitor;

use crate::error::ErrorReport;
use crate::error::Fallible;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The name of the board label that marks this difficulty.
    pub fn label_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Problem {
    pub title: String,
    pub difficulty: Difficulty,
    pub topic: String,
}

impl Problem {
    /// The name of the card that tracks this problem.
    pub fn card_name(&self) -> String {
        format!("{}: {}", self.topic, self.title)
    }

    /// The problem's page on LeetCode, derived from its title.
    pub fn leetcode_link(&self) -> String {
        let slug = self.title.to_lowercase().replace(' ', "-");
        format!("https://leetcode.com/problems/{slug}/")
    }
}

pub struct Topic {
    pub name: String,
    pub problems: Vec<Problem>,
}

/// The problems to practice, grouped by topic. Topics and problems keep the
/// order in which they appear in the source file.
pub struct Catalog {
    topics: Vec<Topic>,
}

impl Catalog {
    #[cfg(test)]
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    pub fn from_path(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            return Err(ErrorReport::new(format!(
                "topics file does not exist: {}",
                path.display()
            )));
        }
        let content = read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Fallible<Self> {
        let catalog: Catalog = serde_json::from_str(content)?;
        log::debug!(
            "Loaded {} problems in {} topics.",
            catalog.len(),
            catalog.topics.len()
        );
        Ok(catalog)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// All problems, topic by topic.
    pub fn problems(&self) -> Vec<&Problem> {
        self.topics.iter().flat_map(|t| t.problems.iter()).collect()
    }

    pub fn len(&self) -> usize {
        self.topics.iter().map(|t| t.problems.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize)]
struct ProblemEntry {
    title: String,
    difficulty: Difficulty,
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "a map of topic names to lists of problems")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Catalog, A::Error> {
        let mut topics = Vec::new();
        while let Some((name, entries)) = map.next_entry::<String, Vec<ProblemEntry>>()? {
            let problems = entries
                .into_iter()
                .map(|entry| Problem {
                    title: entry.title,
                    difficulty: entry.difficulty,
                    topic: name.clone(),
                })
                .collect();
            topics.push(Topic { name, problems });
        }
        Ok(Catalog { topics })
    }
}
