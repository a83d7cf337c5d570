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

use std::collections::HashMap;
use std::collections::HashSet;

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

use crate::board::Board;
use crate::config::Settings;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::schedule::allocate;
use crate::schedule::initial_list;
use crate::schedule::weekly_quota;
use crate::triage::retriage;
use crate::triage::sweep_completed;
use crate::types::card::BoardCard;
use crate::types::card::NewCard;
use crate::types::date::Date;
use crate::types::label::ListName;
use crate::types::label::SelfAssessmentLabel;
use crate::types::problem::Catalog;

const TOPIC_LABEL_COLOR: &str = "black";

#[derive(Debug, Default, PartialEq)]
pub struct PopulateReport {
    /// Cards created in this run.
    pub created: usize,
    /// Problems that already had a card.
    pub existing: usize,
    /// Problems skipped because their difficulty label is missing.
    pub skipped: usize,
}

#[derive(Debug, Default, PartialEq)]
pub struct RetestReport {
    /// Retrospective cards moved according to their assessment.
    pub retriaged: usize,
    /// Retrospective cards left alone for lack of an assessment.
    pub unassessed: usize,
    /// Completed cards brought back to the weekly list.
    pub resurfaced: usize,
    /// Completed cards with no usable due date.
    pub undated: usize,
}

/// Brings a board in line with the settings and the problem catalog.
pub struct BoardSync<'a, B: Board> {
    board: &'a B,
    settings: &'a Settings,
    raw_url_base: Option<&'a str>,
}

/// Maps list names to list ids.
struct ListIds(HashMap<String, String>);

impl ListIds {
    fn get(&self, name: ListName) -> Fallible<&str> {
        self.0
            .get(name.as_str())
            .map(|id| id.as_str())
            .ok_or_else(|| ErrorReport::new(format!("list '{name}' not found on the board.")))
    }
}

/// Characters left as-is in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl<'a, B: Board> BoardSync<'a, B> {
    pub fn new(board: &'a B, settings: &'a Settings, raw_url_base: Option<&'a str>) -> Self {
        Self {
            board,
            settings,
            raw_url_base,
        }
    }

    async fn list_ids(&self, board_id: &str) -> Fallible<ListIds> {
        let lists = self.board.lists(board_id).await?;
        Ok(ListIds(
            lists.into_iter().map(|list| (list.name, list.id)).collect(),
        ))
    }

    async fn label_ids(&self, board_id: &str) -> Fallible<HashMap<String, String>> {
        let labels = self.board.labels(board_id).await?;
        Ok(labels
            .into_iter()
            .filter(|label| !label.name.is_empty())
            .map(|label| (label.name, label.id))
            .collect())
    }

    /// Finds or creates the board, then gives it its background, lists and
    /// labels. Returns the board's id.
    pub async fn setup_board(&self) -> Fallible<String> {
        let name = &self.settings.trello.board_name;
        let board_id = match self.board.find_board(name).await? {
            Some(id) => id,
            None => {
                log::info!("Board {name} not found, creating it.");
                self.board.create_board(name).await?
            }
        };
        self.set_background(&board_id).await;
        self.manage_lists(&board_id).await?;
        self.create_missing_labels(&board_id).await?;
        Ok(board_id)
    }

    async fn set_background(&self, board_id: &str) {
        let Some(base) = self.raw_url_base else {
            log::debug!("No raw URL base configured, leaving the background alone.");
            return;
        };
        let url = join_url(base, &self.settings.images.background);
        match self.board.set_background(board_id, &url).await {
            Ok(()) => log::info!("Set board background to {url}"),
            Err(e) => log::warn!("Failed to set board background: {e}"),
        }
    }

    async fn manage_lists(&self, board_id: &str) -> Fallible<()> {
        let lists = self.board.lists(board_id).await?;
        for default in &self.settings.lists.defaults {
            for list in lists.iter().filter(|list| &list.name == default) {
                self.board.archive_list(&list.id).await?;
                log::info!("Archived list {default}");
            }
        }
        let existing: HashSet<&str> = lists.iter().map(|list| list.name.as_str()).collect();
        for required in &self.settings.lists.required {
            if !existing.contains(required.as_str()) {
                self.board.create_list(board_id, required).await?;
                log::info!("Created list {required}");
            }
        }
        Ok(())
    }

    async fn create_missing_labels(&self, board_id: &str) -> Fallible<()> {
        let existing = self.board.labels(board_id).await?;
        for (label, color) in &self.settings.labels.colors {
            match existing.iter().find(|l| &l.name == label) {
                Some(found) => {
                    if found.color.as_deref() != Some(color.as_str()) {
                        log::debug!("Label {label} exists with a different color, keeping it.");
                    }
                }
                None => {
                    self.board.create_label(board_id, label, color).await?;
                    log::info!("Created label {label} with color {color} for board ID: {board_id}");
                }
            }
        }
        Ok(())
    }

    /// Creates a card for every problem that doesn't have one yet, with due
    /// dates allocated from `today`.
    pub async fn populate_cards(
        &self,
        board_id: &str,
        catalog: &Catalog,
        today: Date,
    ) -> Fallible<PopulateReport> {
        let list_ids = self.list_ids(board_id).await?;
        let mut label_ids = self.label_ids(board_id).await?;
        let problems = catalog.problems();
        let assignments = allocate(&problems, today, self.settings.problems.problems_per_day)?;

        for topic in catalog.topics() {
            if !label_ids.contains_key(&topic.name) {
                let label = self
                    .board
                    .create_label(board_id, &topic.name, TOPIC_LABEL_COLOR)
                    .await?;
                log::info!("Created topic label {}", topic.name);
                label_ids.insert(topic.name.clone(), label.id);
            }
        }

        let existing: HashSet<String> = self
            .board
            .board_cards(board_id)
            .await?
            .into_iter()
            .map(|card| card.name)
            .collect();

        let mut report = PopulateReport::default();
        for assignment in assignments {
            let problem = assignment.problem;
            let card_name = problem.card_name();
            if existing.contains(&card_name) {
                report.existing += 1;
                continue;
            }
            let Some(difficulty_label_id) = label_ids.get(problem.difficulty.label_name()) else {
                log::error!("Difficulty label not found for problem: {}", problem.title);
                report.skipped += 1;
                continue;
            };
            let topic_label_id = label_ids.get(&problem.topic).ok_or_else(|| {
                ErrorReport::new(format!("label for topic '{}' not found.", problem.topic))
            })?;
            let list = initial_list(assignment.due_date, today);
            let card = NewCard {
                list_id: list_ids.get(list)?.to_string(),
                name: card_name,
                description: problem.leetcode_link(),
                label_ids: vec![difficulty_label_id.clone(), topic_label_id.clone()],
                due_date: assignment.due_date,
            };
            let created = self.board.create_card(&card).await?;
            log::info!(
                "Created card {} in {list}, due {}",
                created.name,
                assignment.due_date
            );
            report.created += 1;
            if let Some(base) = self.raw_url_base {
                let topic = utf8_percent_encode(&problem.topic, PATH_SEGMENT);
                let path = format!("{}/{topic}.png", self.settings.images.cards);
                let url = join_url(base, &path);
                if let Err(e) = self.board.attach_url(&created.id, &url).await {
                    log::error!("Failed to attach image to card {}: {e}", created.id);
                }
            }
        }
        Ok(report)
    }

    /// Tops up the weekly list from the backlog, so it holds a week's worth of
    /// unassessed cards. Returns the number of cards moved.
    pub async fn fill_this_week(&self, board_id: &str) -> Fallible<usize> {
        let list_ids = self.list_ids(board_id).await?;
        let this_week_id = list_ids.get(ListName::DoThisWeek)?;
        let backlog_id = list_ids.get(ListName::Backlog)?;

        let pending = self
            .board
            .list_cards(this_week_id)
            .await?
            .into_iter()
            .filter(|card| !card.labels.iter().any(|l| SelfAssessmentLabel::is_assessment(l)))
            .count();
        let quota = weekly_quota(
            self.settings.problems.problems_per_day,
            self.settings.week.workdays,
        );
        let wanted = quota.saturating_sub(pending);
        log::info!("Need to pull {wanted} cards to meet the weekly quota.");

        let backlog = self.board.list_cards(backlog_id).await?;
        if backlog.len() < wanted {
            log::warn!("No more cards to pull from the 'Backlog'.");
        }
        let mut moved = 0;
        for card in backlog.iter().take(wanted) {
            self.board.move_card(&card.id, this_week_id, None).await?;
            log::info!("Moved card {} to {}", card.name, ListName::DoThisWeek);
            moved += 1;
        }
        Ok(moved)
    }

    /// Re-triages the assessed cards in the retrospective list, then brings
    /// back completed cards that are due this week.
    pub async fn retest_cards(&self, board_id: &str, today: Date) -> Fallible<RetestReport> {
        let list_ids = self.list_ids(board_id).await?;
        let mut report = RetestReport::default();

        let retrospective = self
            .board
            .list_cards(list_ids.get(ListName::Retrospective)?)
            .await?;
        for card in retrospective {
            let Some(outcome) = retriage(card.assessment(), today) else {
                report.unassessed += 1;
                continue;
            };
            let destination = list_ids.get(outcome.destination_list)?;
            self.board
                .move_card(&card.id, destination, Some(outcome.new_due_date))
                .await?;
            log::info!(
                "Moved card {} to {}, due {}",
                card.name,
                outcome.destination_list,
                outcome.new_due_date
            );
            report.retriaged += 1;
        }

        let completed = self
            .board
            .list_cards(list_ids.get(ListName::Completed)?)
            .await?;
        let mut dated: Vec<(BoardCard, Date)> = Vec::new();
        for card in completed {
            match card.due_date() {
                Some(due_date) => dated.push((card, due_date)),
                None => {
                    log::warn!("Card {} has no usable due date, skipping.", card.name);
                    report.undated += 1;
                }
            }
        }
        let this_week_id = list_ids.get(ListName::DoThisWeek)?;
        for card in sweep_completed(dated, today) {
            self.board.move_card(&card.id, this_week_id, None).await?;
            log::info!("Card {} is due this week again.", card.name);
            report.resurfaced += 1;
        }
        log::info!("Retest cards processed!");
        Ok(report)
    }
}
