// src/main.rs
use std::env;
use std::error::Error;
use std::io::{self, BufRead};
use std::time::Instant;

use config::Config;
use index::IndexSource;
use navigate::Key;
use recent::RecentStore;
use search::FilterField;
use session::SearchSession;

mod config;
mod error;
mod index;
mod navigate;
mod recent;
mod render;
mod search;
mod session;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let start = Instant::now();

    let mut config = Config::from_env();
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--no-title" => config.filters.match_title = false,
            "--no-content" => config.filters.match_content = false,
            "--no-tags" => config.filters.match_tags = false,
            _ => positional.push(arg),
        }
    }

    let command = positional.first().map(|s| s.as_str()).unwrap_or("");
    log::debug!("command {}", command);
    let query = positional.get(1).map(|s| s.as_str()).unwrap_or("");
    log::debug!("query {}", query);

    let store = match RecentStore::default_location() {
        Ok(store) => Some(store),
        Err(e) => {
            log::error!("Recent searches disabled: {}", e);
            None
        }
    };

    match command {
        "recent" => {
            let recent = store.map(|s| s.load()).unwrap_or_default();
            println!("{}", serde_json::to_string(recent.entries())?);
        }
        "interactive" => {
            let mut session = open_session(&config, store);
            render::output_view(&session.view())?;
            run_interactive(&mut session)?;
        }
        _ => {
            // a bare query searches too
            let query = if command == "search" { query } else { command };
            let mut session = open_session(&config, store);
            session.input(query);
            render::output_view(&session.view())?;
        }
    }

    log::debug!("Completed in {:?}", start.elapsed());
    Ok(())
}

/// Build a session and load the index into it. A failed load leaves the
/// session showing the error panel; it is not fatal to the process.
fn open_session(config: &Config, store: Option<RecentStore>) -> SearchSession {
    let mut session = SearchSession::new(config, store);
    let source = IndexSource::parse(&config.base);

    match index::load(&source, &config.root) {
        Ok(documents) => session.loaded(documents),
        Err(e) => session.load_failed(&index::index_path(&config.root), &e),
    }
    session
}

/// One event read from stdin in interactive mode
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Input(String),
    Key(Key),
    Clear,
    Recent(usize),
    Filter(FilterField, bool),
    Quit,
    Unknown(String),
}

/// Plain lines replace the input value; `:` lines are keys and commands.
/// A leading `::` escapes a query that itself starts with `:`.
fn parse_command(line: &str) -> Command {
    let Some(command) = line.strip_prefix(':') else {
        return Command::Input(line.to_string());
    };
    if command.starts_with(':') {
        return Command::Input(command.to_string());
    }

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit"), None, _) | (Some("q"), None, _) => Command::Quit,
        (Some("clear"), None, _) => Command::Clear,
        (Some("recent"), Some(n), None) => match n.parse::<usize>() {
            Ok(index) => Command::Recent(index),
            Err(_) => Command::Unknown(line.to_string()),
        },
        (Some(name), Some(state), None) => match (FilterField::parse(name), state) {
            (Some(field), "on" | "true" | "1") => Command::Filter(field, true),
            (Some(field), "off" | "false" | "0") => Command::Filter(field, false),
            _ => Command::Unknown(line.to_string()),
        },
        (Some(name), None, _) => match Key::parse(name) {
            Key::Other => Command::Unknown(line.to_string()),
            key => Command::Key(key),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

fn run_interactive(session: &mut SearchSession) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;

        match parse_command(&line) {
            Command::Quit => break,
            Command::Input(value) => session.input(&value),
            Command::Clear => session.clear(),
            Command::Recent(index) => {
                if !session.select_recent(index) {
                    log::warn!("No recent search at {}", index);
                }
            }
            Command::Filter(field, on) => session.set_filter(field, on),
            Command::Key(key) => {
                let outcome = session.key(key);
                log::trace!("{:?} -> {:?} (handled: {})", key, outcome, outcome.prevent_default());
                if let Some(url) = session.target(outcome) {
                    log::info!("Opening {}", url);
                    if let Err(e) = open::that(url) {
                        log::error!("Could not open {}: {}", url, e);
                    }
                }
            }
            Command::Unknown(text) => log::warn!("Unknown command: {}", text),
        }

        render::output_view(&session.view())?;
    }
    Ok(())
}
