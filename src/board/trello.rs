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

use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::board::Board;
use crate::board::BoardLabel;
use crate::board::BoardList;
use crate::config::Credentials;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::BoardCard;
use crate::types::card::NewCard;
use crate::types::date::Date;

/// A client for the Trello REST API.
pub struct TrelloClient {
    client: Client,
    base_url: String,
    api_key: String,
    oauth_token: String,
}

#[derive(Deserialize)]
struct Entity {
    id: String,
}

#[derive(Deserialize)]
struct NamedEntity {
    id: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardResponse {
    id: String,
    name: String,
    #[serde(default)]
    due: Option<String>,
    #[serde(default)]
    labels: Vec<LabelRef>,
}

#[derive(Deserialize)]
struct LabelRef {
    #[serde(default)]
    name: String,
}

impl From<CardResponse> for BoardCard {
    fn from(card: CardResponse) -> Self {
        BoardCard {
            id: card.id,
            name: card.name,
            due: card.due,
            labels: card.labels.into_iter().map(|label| label.name).collect(),
        }
    }
}

impl TrelloClient {
    pub fn new(base_url: &str, credentials: &Credentials) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
            oauth_token: credentials.oauth_token.clone(),
        }
    }

    /// Starts an authenticated request to a path under the API base URL.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        log::info!("Making a {method} request to {url}");
        self.client
            .request(method, url)
            .query(&[("key", &self.api_key), ("token", &self.oauth_token)])
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Fallible<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let url = response.url().path().to_string();
            let body = response.text().await.unwrap_or_default();
            return fail(format!("request to {url} failed with status {status}: {body}"));
        }
        Ok(response.json().await?)
    }

    async fn member_id(&self) -> Fallible<String> {
        let member: Entity = self.send(self.request(Method::GET, "members/me")).await?;
        Ok(member.id)
    }

    async fn download(&self, url: &str) -> Fallible<Vec<u8>> {
        log::debug!("Downloading {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl Board for TrelloClient {
    async fn find_board(&self, name: &str) -> Fallible<Option<String>> {
        let request = self
            .request(Method::GET, "members/me/boards")
            .query(&[("filter", "open")]);
        let boards: Vec<NamedEntity> = self.send(request).await?;
        Ok(boards
            .into_iter()
            .find(|board| board.name == name)
            .map(|board| board.id))
    }

    async fn create_board(&self, name: &str) -> Fallible<String> {
        let request = self.request(Method::POST, "boards").query(&[("name", name)]);
        let board: Entity = self.send(request).await?;
        log::info!("Created board {name} with ID {}", board.id);
        Ok(board.id)
    }

    async fn lists(&self, board_id: &str) -> Fallible<Vec<BoardList>> {
        let path = format!("boards/{board_id}/lists");
        self.send(self.request(Method::GET, &path)).await
    }

    async fn create_list(&self, board_id: &str, name: &str) -> Fallible<BoardList> {
        let request = self
            .request(Method::POST, "lists")
            .query(&[("idBoard", board_id), ("name", name)]);
        self.send(request).await
    }

    async fn archive_list(&self, list_id: &str) -> Fallible<()> {
        let path = format!("lists/{list_id}/closed");
        let request = self.request(Method::PUT, &path).query(&[("value", "true")]);
        let _: Value = self.send(request).await?;
        Ok(())
    }

    async fn labels(&self, board_id: &str) -> Fallible<Vec<BoardLabel>> {
        let path = format!("boards/{board_id}/labels");
        self.send(self.request(Method::GET, &path)).await
    }

    async fn create_label(
        &self,
        board_id: &str,
        name: &str,
        color: &str,
    ) -> Fallible<BoardLabel> {
        let path = format!("boards/{board_id}/labels");
        let request = self
            .request(Method::POST, &path)
            .query(&[("name", name), ("color", color)]);
        self.send(request).await
    }

    async fn board_cards(&self, board_id: &str) -> Fallible<Vec<BoardCard>> {
        let path = format!("boards/{board_id}/cards");
        let cards: Vec<CardResponse> = self.send(self.request(Method::GET, &path)).await?;
        Ok(cards.into_iter().map(BoardCard::from).collect())
    }

    async fn list_cards(&self, list_id: &str) -> Fallible<Vec<BoardCard>> {
        let path = format!("lists/{list_id}/cards");
        let cards: Vec<CardResponse> = self.send(self.request(Method::GET, &path)).await?;
        Ok(cards.into_iter().map(BoardCard::from).collect())
    }

    async fn create_card(&self, card: &NewCard) -> Fallible<BoardCard> {
        let request = self.request(Method::POST, "cards").query(&[
            ("idList", card.list_id.clone()),
            ("name", card.name.clone()),
            ("desc", card.description.clone()),
            ("idLabels", card.label_ids.join(",")),
            ("due", card.due_date.to_due_timestamp()),
        ]);
        let created: CardResponse = self.send(request).await?;
        Ok(created.into())
    }

    async fn move_card(
        &self,
        card_id: &str,
        list_id: &str,
        due_date: Option<Date>,
    ) -> Fallible<()> {
        let path = format!("cards/{card_id}");
        let mut request = self.request(Method::PUT, &path).query(&[("idList", list_id)]);
        if let Some(due_date) = due_date {
            request = request.query(&[("due", due_date.to_due_timestamp())]);
        }
        let _: Value = self.send(request).await?;
        Ok(())
    }

    async fn attach_url(&self, card_id: &str, url: &str) -> Fallible<()> {
        let path = format!("cards/{card_id}/attachments");
        let request = self.request(Method::POST, &path).query(&[("url", url)]);
        let _: Value = self.send(request).await?;
        Ok(())
    }

    async fn set_background(&self, board_id: &str, image_url: &str) -> Fallible<()> {
        let member_id = self.member_id().await?;
        let image = self.download(image_url).await?;
        let part = Part::bytes(image)
            .file_name("background.png")
            .mime_str("image/png")?;
        let path = format!("members/{member_id}/customBoardBackgrounds");
        let request = self
            .request(Method::POST, &path)
            .multipart(Form::new().part("file", part));
        let background: Entity = self.send(request).await?;
        let path = format!("boards/{board_id}/prefs/background");
        let request = self
            .request(Method::PUT, &path)
            .query(&[("value", background.id.as_str())]);
        let _: Value = self.send(request).await?;
        Ok(())
    }
}
