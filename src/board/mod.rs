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

//! The task-board service the cards live on.

#[cfg(test)]
pub mod memory;
pub mod trello;

use serde::Deserialize;

use crate::error::Fallible;
use crate::types::card::BoardCard;
use crate::types::card::NewCard;
use crate::types::date::Date;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BoardLabel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Operations on a kanban board. Ids are opaque strings issued by the service.
pub trait Board {
    /// Finds one of the member's open boards by name.
    async fn find_board(&self, name: &str) -> Fallible<Option<String>>;

    async fn create_board(&self, name: &str) -> Fallible<String>;

    /// The board's open lists, in display order.
    async fn lists(&self, board_id: &str) -> Fallible<Vec<BoardList>>;

    async fn create_list(&self, board_id: &str, name: &str) -> Fallible<BoardList>;

    async fn archive_list(&self, list_id: &str) -> Fallible<()>;

    async fn labels(&self, board_id: &str) -> Fallible<Vec<BoardLabel>>;

    async fn create_label(&self, board_id: &str, name: &str, color: &str)
    -> Fallible<BoardLabel>;

    async fn board_cards(&self, board_id: &str) -> Fallible<Vec<BoardCard>>;

    /// The cards in a list, top first.
    async fn list_cards(&self, list_id: &str) -> Fallible<Vec<BoardCard>>;

    async fn create_card(&self, card: &NewCard) -> Fallible<BoardCard>;

    /// Moves a card to another list, updating its due date if one is given.
    async fn move_card(&self, card_id: &str, list_id: &str, due_date: Option<Date>)
    -> Fallible<()>;

    async fn attach_url(&self, card_id: &str, url: &str) -> Fallible<()>;

    /// Fetches the image at `image_url` and makes it the board's background.
    async fn set_background(&self, board_id: &str, image_url: &str) -> Fallible<()>;
}
