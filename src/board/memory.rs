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

//! A board held in memory, for exercising the synchronisation logic.

use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::board::Board;
use crate::board::BoardLabel;
use crate::board::BoardList;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::card::BoardCard;
use crate::types::card::NewCard;
use crate::types::date::Date;

#[derive(Default)]
pub struct MemoryBoard {
    state: Mutex<State>,
}

#[derive(Default)]
pub struct State {
    next_id: usize,
    pub boards: Vec<(String, String)>,
    pub lists: Vec<MemoryList>,
    pub labels: Vec<(String, BoardLabel)>,
    pub cards: Vec<MemoryCard>,
    pub backgrounds: Vec<(String, String)>,
    /// When set, requests for these image URLs fail.
    pub broken_urls: Vec<String>,
}

pub struct MemoryList {
    pub board_id: String,
    pub list: BoardList,
    pub closed: bool,
}

pub struct MemoryCard {
    pub board_id: String,
    pub id: String,
    pub name: String,
    pub list_id: String,
    pub description: String,
    pub label_ids: Vec<String>,
    pub due: Option<String>,
    pub attachments: Vec<String>,
}

impl State {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn board_of_list(&self, list_id: &str) -> Fallible<String> {
        self.lists
            .iter()
            .find(|l| l.list.id == list_id && !l.closed)
            .map(|l| l.board_id.clone())
            .ok_or_else(|| ErrorReport::new(format!("no such list: {list_id}")))
    }

    fn to_board_card(&self, card: &MemoryCard) -> BoardCard {
        let labels = card
            .label_ids
            .iter()
            .filter_map(|id| self.labels.iter().find(|(_, l)| &l.id == id))
            .map(|(_, l)| l.name.clone())
            .collect();
        BoardCard {
            id: card.id.clone(),
            name: card.name.clone(),
            due: card.due.clone(),
            labels,
        }
    }

    /// Adds a list directly.
    pub fn add_list(&mut self, board_id: &str, name: &str) -> String {
        let id = self.fresh_id("list");
        self.lists.push(MemoryList {
            board_id: board_id.to_string(),
            list: BoardList {
                id: id.clone(),
                name: name.to_string(),
            },
            closed: false,
        });
        id
    }

    /// Adds a card directly, labelled by name.
    pub fn add_card(
        &mut self,
        list_id: &str,
        name: &str,
        due: Option<Date>,
        labels: &[&str],
    ) -> String {
        let id = self.fresh_id("card");
        let board_id = self.board_of_list(list_id).unwrap();
        let label_ids = labels
            .iter()
            .map(|name| {
                self.labels
                    .iter()
                    .find(|(b, l)| b == &board_id && l.name == *name)
                    .map(|(_, l)| l.id.clone())
                    .unwrap()
            })
            .collect();
        self.cards.push(MemoryCard {
            board_id,
            id: id.clone(),
            name: name.to_string(),
            list_id: list_id.to_string(),
            description: String::new(),
            label_ids,
            due: due.map(|d| d.to_due_timestamp()),
            attachments: Vec::new(),
        });
        id
    }

    pub fn list_id(&self, board_id: &str, name: &str) -> Option<String> {
        self.lists
            .iter()
            .find(|l| l.board_id == board_id && l.list.name == name && !l.closed)
            .map(|l| l.list.id.clone())
    }

    pub fn card(&self, name: &str) -> &MemoryCard {
        self.cards.iter().find(|c| c.name == name).unwrap()
    }

    /// The names of the cards in a list, in order.
    pub fn card_names_in(&self, board_id: &str, list_name: &str) -> Vec<String> {
        let Some(list_id) = self.list_id(board_id, list_name) else {
            return Vec::new();
        };
        self.cards
            .iter()
            .filter(|c| c.list_id == list_id)
            .map(|c| c.name.clone())
            .collect()
    }
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

impl Board for MemoryBoard {
    async fn find_board(&self, name: &str) -> Fallible<Option<String>> {
        let state = self.state();
        Ok(state
            .boards
            .iter()
            .find(|(_, n)| n == name)
            .map(|(id, _)| id.clone()))
    }

    async fn create_board(&self, name: &str) -> Fallible<String> {
        let mut state = self.state();
        let id = state.fresh_id("board");
        state.boards.push((id.clone(), name.to_string()));
        for default in ["To Do", "Doing", "Done"] {
            state.add_list(&id, default);
        }
        Ok(id)
    }

    async fn lists(&self, board_id: &str) -> Fallible<Vec<BoardList>> {
        let state = self.state();
        Ok(state
            .lists
            .iter()
            .filter(|l| l.board_id == board_id && !l.closed)
            .map(|l| l.list.clone())
            .collect())
    }

    async fn create_list(&self, board_id: &str, name: &str) -> Fallible<BoardList> {
        let mut state = self.state();
        let id = state.add_list(board_id, name);
        Ok(BoardList {
            id,
            name: name.to_string(),
        })
    }

    async fn archive_list(&self, list_id: &str) -> Fallible<()> {
        let mut state = self.state();
        match state.lists.iter_mut().find(|l| l.list.id == list_id) {
            Some(list) => {
                list.closed = true;
                Ok(())
            }
            None => Err(ErrorReport::new(format!("no such list: {list_id}"))),
        }
    }

    async fn labels(&self, board_id: &str) -> Fallible<Vec<BoardLabel>> {
        let state = self.state();
        Ok(state
            .labels
            .iter()
            .filter(|(b, _)| b == board_id)
            .map(|(_, l)| l.clone())
            .collect())
    }

    async fn create_label(
        &self,
        board_id: &str,
        name: &str,
        color: &str,
    ) -> Fallible<BoardLabel> {
        let mut state = self.state();
        let id = state.fresh_id("label");
        let label = BoardLabel {
            id,
            name: name.to_string(),
            color: Some(color.to_string()),
        };
        state.labels.push((board_id.to_string(), label.clone()));
        Ok(label)
    }

    async fn board_cards(&self, board_id: &str) -> Fallible<Vec<BoardCard>> {
        let state = self.state();
        Ok(state
            .cards
            .iter()
            .filter(|c| c.board_id == board_id)
            .map(|c| state.to_board_card(c))
            .collect())
    }

    async fn list_cards(&self, list_id: &str) -> Fallible<Vec<BoardCard>> {
        let state = self.state();
        state.board_of_list(list_id)?;
        Ok(state
            .cards
            .iter()
            .filter(|c| c.list_id == list_id)
            .map(|c| state.to_board_card(c))
            .collect())
    }

    async fn create_card(&self, card: &NewCard) -> Fallible<BoardCard> {
        let mut state = self.state();
        let board_id = state.board_of_list(&card.list_id)?;
        let id = state.fresh_id("card");
        let created = MemoryCard {
            board_id,
            id,
            name: card.name.clone(),
            list_id: card.list_id.clone(),
            description: card.description.clone(),
            label_ids: card.label_ids.clone(),
            due: Some(card.due_date.to_due_timestamp()),
            attachments: Vec::new(),
        };
        let result = state.to_board_card(&created);
        state.cards.push(created);
        Ok(result)
    }

    async fn move_card(
        &self,
        card_id: &str,
        list_id: &str,
        due_date: Option<Date>,
    ) -> Fallible<()> {
        let mut state = self.state();
        state.board_of_list(list_id)?;
        let card = state
            .cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(|| ErrorReport::new(format!("no such card: {card_id}")))?;
        card.list_id = list_id.to_string();
        if let Some(due_date) = due_date {
            card.due = Some(due_date.to_due_timestamp());
        }
        Ok(())
    }

    async fn attach_url(&self, card_id: &str, url: &str) -> Fallible<()> {
        let mut state = self.state();
        if state.broken_urls.iter().any(|u| u == url) {
            return Err(ErrorReport::new(format!("cannot fetch {url}")));
        }
        let card = state
            .cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(|| ErrorReport::new(format!("no such card: {card_id}")))?;
        card.attachments.push(url.to_string());
        Ok(())
    }

    async fn set_background(&self, board_id: &str, image_url: &str) -> Fallible<()> {
        let mut state = self.state();
        if state.broken_urls.iter().any(|u| u == image_url) {
            return Err(ErrorReport::new(format!("cannot fetch {image_url}")));
        }
        state
            .backgrounds
            .push((board_id.to_string(), image_url.to_string()));
        Ok(())
    }
}
