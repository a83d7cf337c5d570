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

use std::collections::BTreeMap;
use std::env;
use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::WORKING_DAYS_PER_WEEK;
use crate::types::label::ListName;

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.toml";

pub const DEFAULT_TOPICS_PATH: &str = "./config/leetcode75.json";

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub trello: TrelloSettings,
    pub lists: ListSettings,
    pub week: WeekSettings,
    pub problems: ProblemSettings,
    pub labels: LabelSettings,
    pub images: ImageSettings,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct TrelloSettings {
    pub base_url: String,
    pub board_name: String,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ListSettings {
    /// Lists created with every new board, which get archived.
    pub defaults: Vec<String>,
    /// Lists the board must have.
    pub required: Vec<String>,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct WeekSettings {
    pub workdays: usize,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ProblemSettings {
    pub problems_per_day: usize,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct LabelSettings {
    /// Label names mapped to their colours.
    pub colors: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ImageSettings {
    /// Path of the background image, relative to the raw URL base.
    pub background: String,
    /// Directory of the per-topic card images, relative to the raw URL base.
    pub cards: String,
}

impl Default for TrelloSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.trello.com/1".to_string(),
            board_name: "LeetCode 75".to_string(),
        }
    }
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            defaults: strings(&["To Do", "Doing", "Done"]),
            required: strings(&["Completed", "Retrospective", "Do this week", "Backlog"]),
        }
    }
}

impl Default for WeekSettings {
    fn default() -> Self {
        Self {
            workdays: WORKING_DAYS_PER_WEEK as usize,
        }
    }
}

impl Default for ProblemSettings {
    fn default() -> Self {
        Self {
            problems_per_day: 3,
        }
    }
}

impl Default for LabelSettings {
    fn default() -> Self {
        let colors = [
            ("Easy", "green"),
            ("Medium", "yellow"),
            ("Hard", "red"),
            ("Somewhat know", "blue"),
            ("Do not know", "red"),
            ("Know", "green"),
        ];
        Self {
            colors: colors
                .into_iter()
                .map(|(name, color)| (name.to_string(), color.to_string()))
                .collect(),
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            background: "imgs/background/groot.png".to_string(),
            cards: "imgs/cards".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Settings {
    /// Loads settings from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Fallible<Self> {
        let settings = if path.exists() {
            log::debug!("Loading settings from {}", path.display());
            let content = read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            log::debug!("No settings file at {}, using defaults.", path.display());
            Self::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Fallible<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    pub fn validate(&self) -> Fallible<()> {
        if self.problems.problems_per_day == 0 {
            return fail("problems_per_day must be a positive integer.");
        }
        let max_workdays = WORKING_DAYS_PER_WEEK as usize;
        if self.week.workdays == 0 || self.week.workdays > max_workdays {
            return fail(format!("workdays must be between 1 and {max_workdays}."));
        }
        if self.trello.board_name.trim().is_empty() {
            return fail("board_name must not be empty.");
        }
        for list in ListName::ALL {
            if !self.lists.required.iter().any(|name| name == list.as_str()) {
                return fail(format!("lists.required must include \"{list}\"."));
            }
        }
        Ok(())
    }
}

/// Secrets and paths read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub api_key: String,
    pub oauth_token: String,
    /// Base URL the board and card images are fetched from.
    pub raw_url_base: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Fallible<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Fallible<Self> {
        let require = |key: &str| -> Fallible<String> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ErrorReport::new(format!("environment variable {key} is not set.")))
        };
        Ok(Self {
            api_key: require("API_KEY")?,
            oauth_token: require("OAUTH_TOKEN")?,
            raw_url_base: lookup("RAW_URL_BASE").filter(|value| !value.is_empty()),
        })
    }
}

/// The topics file: the explicit path if given, then `TOPICS_JSON_PATH`, then
/// the default.
pub fn topics_path(explicit: Option<String>) -> PathBuf {
    explicit
        .or_else(|| env::var("TOPICS_JSON_PATH").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOPICS_PATH))
}
