//! Plain-text rendering of what the services return.

use std::fmt::Write as _;

use daily_core::model::{CommandRecord, ProgressSummary, Settings};
use services::{DisplayCard, IntentOutcome, LibraryListing, LoadOutcome};

const BAR_WIDTH: usize = 20;

pub const NO_DATA: &str = "The command catalog is empty. Nothing to learn yet.";

pub fn progress_bar(summary: &ProgressSummary) -> String {
    let filled = usize::from(summary.percentage) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {}/{} ({}%)",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        summary.learned_count,
        summary.total_count,
        summary.percentage
    )
}

pub fn card(card: &DisplayCard) -> String {
    let record = &card.record;
    let mut out = String::new();

    let fav = if card.is_favorite { " ★" } else { "" };
    let _ = writeln!(out, "#{} [{} · {}]{fav}", record.id(), record.category(), record.difficulty());
    let _ = writeln!(out, "  {}", record.command());
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", record.description());
    if card.review_mode {
        let _ = writeln!(out, "  (mastered: every command is learned, reviewing)");
    }
    for item in card.explanation_items() {
        match item.key {
            Some(key) => {
                let _ = writeln!(out, "    {key}: {}", item.text);
            }
            None => {
                let _ = writeln!(out, "    {}", item.text);
            }
        }
    }
    if !record.example().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  $ {}", record.example());
    }
    let _ = writeln!(out);
    let _ = write!(out, "  {}", progress_bar(&card.progress));
    out
}

pub fn listing(listing: &LibraryListing) -> String {
    let mut out = String::new();
    for row in &listing.rows {
        let fav = if row.is_favorite { "★" } else { " " };
        let learned = if row.is_learned { "✓" } else { " " };
        let _ = writeln!(
            out,
            "{fav}{learned} {:>4}  {:<28} {}",
            row.record.id(),
            row.record.command(),
            row.record.description()
        );
    }
    let _ = write!(out, "showing {} ({})", listing.shown(), listing.filter);
    out
}

pub fn hits(records: &[CommandRecord]) -> String {
    if records.is_empty() {
        return "no matching commands".to_string();
    }
    records
        .iter()
        .map(|r| format!("{:>4}  {}", r.id(), r.command()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn settings(settings: &Settings) -> String {
    format!(
        "engine: {}\ndaily goal: {}\nshow on startup: {}",
        settings.engine(),
        settings.daily_limit(),
        settings.show_on_startup()
    )
}

pub fn outcome(outcome: &IntentOutcome) -> String {
    match outcome {
        IntentOutcome::Loaded(LoadOutcome::Card(shown) | LoadOutcome::Exhausted(shown))
        | IntentOutcome::Shown(shown) => card(shown),
        IntentOutcome::Loaded(LoadOutcome::NoData) => NO_DATA.to_string(),
        IntentOutcome::NothingShown => "no command on screen; press n for one".to_string(),
        IntentOutcome::Favorite { id, is_favorite } => {
            let verb = if *is_favorite { "added to" } else { "removed from" };
            format!("#{id} {verb} favorites")
        }
        IntentOutcome::Learned { id, is_learned } => {
            let state = if *is_learned { "learned" } else { "not learned" };
            format!("#{id} marked {state}")
        }
        IntentOutcome::SearchHits(records) => hits(records),
        IntentOutcome::Library(rows) => listing(rows),
        IntentOutcome::ConfirmationRequired => {
            "this clears every learned command; confirm to continue".to_string()
        }
        IntentOutcome::Reset => "learned progress cleared".to_string(),
        IntentOutcome::EngineChanged(engine) => format!("search engine: {engine}"),
        IntentOutcome::Redirect(url) => format!("open {url}"),
        IntentOutcome::Progress(summary) => progress_bar(summary),
    }
}

pub fn progress(summary: &ProgressSummary, settings: &Settings) -> String {
    format!(
        "{}\ndaily goal: {} commands",
        progress_bar(summary),
        settings.daily_limit()
    )
}
