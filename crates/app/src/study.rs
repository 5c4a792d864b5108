//! Interactive study loop on top of [`StudySession::dispatch`].

use anyhow::Result;
use daily_core::library::LibraryFilter;
use daily_core::model::{CommandId, SearchEngine};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use services::{IntentOutcome, ServiceError, StudySession, UserIntent};

use crate::render;

const HELP: &str = "\
  n, next             another command
  m, master           I learned this; move on
  f, fav              toggle favorite on the current command
  s, search <text>    quick search by command or description
  g, go <id>          show a command by id
  lib [filter] [text] library view (filter: all, fav, learned)
  l <id>              toggle learned for an id
  fl <id>             toggle favorite for an id
  reset               forget every learned command
  engine <name>       bing, google or baidu
  web <text>          build a web search link
  p, progress         learned so far
  h, help             this text
  q, quit             leave";

#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Intent(UserIntent),
    Help,
    Quit,
    Empty,
}

/// Map one input line to what the loop should do.
pub fn parse_line(input: &str) -> Result<Line, String> {
    let input = input.trim();
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    };

    let line = match head.to_ascii_lowercase().as_str() {
        "" => Line::Empty,
        "n" | "next" => Line::Intent(UserIntent::Next),
        "m" | "master" => Line::Intent(UserIntent::Master),
        "f" | "fav" => Line::Intent(UserIntent::ToggleFavorite),
        "s" | "search" => Line::Intent(UserIntent::Search(rest.to_string())),
        "g" | "go" => Line::Intent(UserIntent::Jump(parse_id(rest)?)),
        "lib" | "library" => {
            let (filter, query) = match rest.split_once(char::is_whitespace) {
                Some((first, tail)) => match first.parse::<LibraryFilter>() {
                    Ok(filter) => (filter, tail.trim()),
                    Err(_) => (LibraryFilter::All, rest),
                },
                None => match rest.parse::<LibraryFilter>() {
                    Ok(filter) => (filter, ""),
                    Err(_) => (LibraryFilter::All, rest),
                },
            };
            Line::Intent(UserIntent::Library {
                filter,
                query: query.to_string(),
            })
        }
        "l" | "learned" => Line::Intent(UserIntent::ToggleLearned(parse_id(rest)?)),
        "fl" => Line::Intent(UserIntent::ToggleFavoriteId(parse_id(rest)?)),
        "reset" => Line::Intent(UserIntent::ResetLearned { confirmed: false }),
        "engine" => {
            let engine = rest.parse::<SearchEngine>().map_err(|e| e.to_string())?;
            Line::Intent(UserIntent::SetEngine(engine))
        }
        "web" if rest.is_empty() => return Err("usage: web <text>".to_string()),
        "web" => Line::Intent(UserIntent::WebSearch(rest.to_string())),
        "p" | "progress" => Line::Intent(UserIntent::Progress),
        "h" | "help" | "?" => Line::Help,
        "q" | "quit" | "exit" => Line::Quit,
        other => return Err(format!("unknown command {other:?}; h for help")),
    };
    Ok(line)
}

fn parse_id(raw: &str) -> Result<CommandId, String> {
    if raw.is_empty() {
        return Err("an id is required".to_string());
    }
    raw.parse::<CommandId>().map_err(|e| e.to_string())
}

/// Print a failed intent. Storage trouble is reported and the loop goes on.
fn report(err: &ServiceError) {
    match err {
        ServiceError::StorageUnavailable(source) => {
            tracing::warn!(error = %source, "storage error during study loop");
            eprintln!("could not save or read progress ({source}); still on the same command");
        }
        other => eprintln!("{other}"),
    }
}

pub async fn run(session: &mut StudySession) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    match session.load_next(false).await {
        Ok(loaded) => println!("{}", render::outcome(&IntentOutcome::Loaded(loaded))),
        Err(err) => report(&err),
    }
    println!();
    println!("h for help, q to quit");

    loop {
        let line = match editor.readline("daily> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        let intent = match parse_line(&line) {
            Ok(Line::Intent(intent)) => intent,
            Ok(Line::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Line::Quit) => break,
            Ok(Line::Empty) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match session.dispatch(intent).await {
            Ok(IntentOutcome::ConfirmationRequired) => {
                println!("{}", render::outcome(&IntentOutcome::ConfirmationRequired));
                let answer = editor.readline("type yes to confirm: ").unwrap_or_default();
                if !answer.trim().eq_ignore_ascii_case("yes") {
                    println!("kept learned progress");
                    continue;
                }
                match session
                    .dispatch(UserIntent::ResetLearned { confirmed: true })
                    .await
                {
                    Ok(outcome) => println!("{}", render::outcome(&outcome)),
                    Err(err) => report(&err),
                }
            }
            Ok(outcome) => println!("{}", render::outcome(&outcome)),
            Err(err) => report(&err),
        }
    }

    Ok(())
}
