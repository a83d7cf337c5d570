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

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use serde::Serialize;

use crate::board::trello::TrelloClient;
use crate::config::Credentials;
use crate::config::DEFAULT_SETTINGS_PATH;
use crate::config::Settings;
use crate::config::topics_path;
use crate::error::Fallible;
use crate::schedule::allocate;
use crate::schedule::initial_list;
use crate::sync::BoardSync;
use crate::types::date::Date;
use crate::types::problem::Catalog;
use crate::types::problem::Difficulty;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the settings file.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,
    /// Path to the topics file. Defaults to $TOPICS_JSON_PATH.
    #[arg(long, global = true)]
    topics: Option<String>,
    /// The date to schedule from, as YYYY-MM-DD. Defaults to today.
    #[arg(long, global = true)]
    today: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Set up the board, create missing cards, fill this week's list, and re-triage cards.
    Run,
    /// Set up the board and create missing cards.
    Setup,
    /// Re-triage assessed cards and bring back completed cards due this week.
    Retest,
    /// Print the due dates the cards would get, without touching the board.
    Plan,
}

pub async fn entrypoint() -> Fallible<()> {
    let cli = Cli::parse();
    let today = match &cli.today {
        Some(date) => date.parse::<Date>()?,
        None => Date::today(),
    };
    let settings = Settings::load(&cli.settings)?;
    let command = cli.command.unwrap_or(Command::Run);
    log::debug!("Today is {today}.");
    match command {
        Command::Plan => {
            let catalog = Catalog::from_path(&topics_path(cli.topics))?;
            println!("{}", plan(&settings, &catalog, today)?);
            Ok(())
        }
        Command::Run | Command::Setup | Command::Retest => {
            let catalog = match command {
                Command::Retest => None,
                _ => Some(Catalog::from_path(&topics_path(cli.topics))?),
            };
            let credentials = Credentials::from_env()?;
            let client = TrelloClient::new(&settings.trello.base_url, &credentials);
            let sync = BoardSync::new(&client, &settings, credentials.raw_url_base.as_deref());
            let board_id = sync.setup_board().await?;
            if let Some(catalog) = &catalog {
                if catalog.is_empty() {
                    log::warn!("The topics file has no problems.");
                }
                let report = sync.populate_cards(&board_id, catalog, today).await?;
                log::info!(
                    "Cards: {} created, {} already present, {} skipped.",
                    report.created,
                    report.existing,
                    report.skipped
                );
            }
            if matches!(command, Command::Run) {
                let moved = sync.fill_this_week(&board_id).await?;
                log::info!("Pulled {moved} cards from the backlog.");
            }
            if matches!(command, Command::Run | Command::Retest) {
                let report = sync.retest_cards(&board_id, today).await?;
                log::info!(
                    "Retest: {} re-triaged, {} unassessed, {} back this week, {} without a due date.",
                    report.retriaged,
                    report.unassessed,
                    report.resurfaced,
                    report.undated
                );
            }
            log::info!("Main script execution completed!");
            Ok(())
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanEntry<'a> {
    card: String,
    difficulty: Difficulty,
    due_date: Date,
    list: &'a str,
}

/// Renders the allocation of the whole catalog as JSON.
fn plan(settings: &Settings, catalog: &Catalog, today: Date) -> Fallible<String> {
    let problems = catalog.problems();
    let assignments = allocate(&problems, today, settings.problems.problems_per_day)?;
    let entries: Vec<PlanEntry> = assignments
        .iter()
        .map(|assignment| PlanEntry {
            card: assignment.problem.card_name(),
            difficulty: assignment.problem.difficulty,
            due_date: assignment.due_date,
            list: initial_list(assignment.due_date, today).as_str(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use serde_json::Value;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["leetboard", "--today", "2025-01-15"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.today.as_deref(), Some("2025-01-15"));
        assert_eq!(cli.settings, PathBuf::from(DEFAULT_SETTINGS_PATH));
    }

    #[test]
    fn test_plan() -> Fallible<()> {
        let catalog = Catalog::from_json(
            r#"{"Stack": [
                {"title": "Valid Parentheses", "difficulty": "Easy"},
                {"title": "Min Stack", "difficulty": "Medium"},
                {"title": "Daily Temperatures", "difficulty": "Medium"}
            ]}"#,
        )?;
        let mut settings = Settings::default();
        settings.problems.problems_per_day = 2;
        let json = plan(&settings, &catalog, Date::ymd(2025, 1, 17))?;
        let value: Value = serde_json::from_str(&json)?;
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["card"], "Stack: Valid Parentheses");
        assert_eq!(entries[0]["difficulty"], "Easy");
        assert_eq!(entries[1]["dueDate"], "2025-01-17");
        assert_eq!(entries[1]["list"], "Do this week");
        assert_eq!(entries[2]["dueDate"], "2025-01-20");
        assert_eq!(entries[2]["list"], "Backlog");
        Ok(())
    }
}
