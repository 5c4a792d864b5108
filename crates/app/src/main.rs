mod config;
mod render;
mod study;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use daily_core::library::LibraryFilter;
use daily_core::model::{Catalog, CommandId, SearchEngine};
use services::{AppServices, IntentOutcome, UserIntent};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;

const BUNDLED_CATALOG: &str = include_str!("../assets/commands.json");
const DEFAULT_LOG_FILTER: &str = "linux_daily=info,services=info,storage=warn";

#[derive(Debug, Parser)]
#[command(name = "linux-daily", version, about = "Learn one Linux command a day")]
struct Args {
    /// SQLite URL or file path for progress
    #[arg(long, env = "DAILY_DB_URL", global = true)]
    db: Option<String>,

    /// Command catalog JSON (defaults to the bundled one)
    #[arg(long, env = "DAILY_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Keep progress in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the command of the day
    Today,
    /// Interactive study loop
    Study,
    /// Show one command by id
    Show { id: CommandId },
    /// Mark a command learned
    Learn { id: CommandId },
    /// Put a learned command back in rotation
    Unlearn { id: CommandId },
    /// Toggle a favorite
    Fav { id: CommandId },
    /// Browse the catalog
    Library {
        /// all, fav or learned
        #[arg(long, short, default_value_t = LibraryFilter::All)]
        filter: LibraryFilter,
        /// Case-insensitive match on command and description
        #[arg(long, short, default_value = "")]
        query: String,
    },
    /// Quick search by command or description
    Search { query: Vec<String> },
    /// Learned so far
    Progress,
    /// Forget every learned command
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Show or change the web search engine
    Engine { name: Option<SearchEngine> },
    /// Print a web search link for the configured engine
    Web {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show or change preferences
    Settings {
        #[arg(long)]
        daily_limit: Option<u32>,
        #[arg(long)]
        show_on_startup: Option<bool>,
    },
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("could not load command catalog {}", path.display()))?,
        None => Catalog::from_json(BUNDLED_CATALOG).context("bundled command catalog is invalid")?,
    };
    tracing::debug!(commands = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" || db_url.contains("mode=memory") {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("could not create {}", path.display()))?;
    }
    Ok(())
}

async fn build_services(args: &Args, config: Config, catalog: Catalog) -> Result<AppServices> {
    if args.ephemeral {
        tracing::info!("progress kept in memory for this run");
        return Ok(AppServices::in_memory(catalog));
    }

    let raw = args
        .db
        .clone()
        .or(config.database_url)
        .unwrap_or_else(|| config::default_database_path().display().to_string());
    let db_url = normalize_sqlite_url(&raw);
    prepare_sqlite_file(&db_url)?;
    Ok(AppServices::new_sqlite(&db_url, catalog).await?)
}

async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config = Config::load();
    let catalog_path = args.catalog.clone().or_else(|| config.catalog_path.clone());
    let catalog = load_catalog(catalog_path.as_deref())?;
    let services = build_services(&args, config, catalog).await?;
    let mut session = services.study_session();

    let command = match args.command {
        Some(command) => command,
        None => {
            if services.settings().load().await?.show_on_startup() {
                Command::Today
            } else {
                Command::Progress
            }
        }
    };

    let outcome = match command {
        Command::Today => IntentOutcome::Loaded(session.load_next(false).await?),
        Command::Study => return study::run(&mut session).await,
        Command::Show { id } => session.dispatch(UserIntent::Jump(id)).await?,
        Command::Learn { id } => IntentOutcome::Learned {
            id,
            is_learned: services.tracker().mark_learned(id).await?,
        },
        Command::Unlearn { id } => {
            services.tracker().unmark_learned(id).await?;
            IntentOutcome::Learned {
                id,
                is_learned: false,
            }
        }
        Command::Fav { id } => session.dispatch(UserIntent::ToggleFavoriteId(id)).await?,
        Command::Library { filter, query } => {
            session
                .dispatch(UserIntent::Library { filter, query })
                .await?
        }
        Command::Search { query } => session.dispatch(UserIntent::Search(query.join(" "))).await?,
        Command::Progress => {
            let summary = session.progress_summary().await?;
            let settings = services.settings().load().await?;
            println!("{}", render::progress(&summary, &settings));
            return Ok(());
        }
        Command::Reset { yes } => {
            let outcome = session
                .dispatch(UserIntent::ResetLearned { confirmed: yes })
                .await?;
            if outcome == IntentOutcome::ConfirmationRequired {
                println!("this clears every learned command; run again with --yes");
                return Ok(());
            }
            outcome
        }
        Command::Engine { name: Some(engine) } => {
            session.dispatch(UserIntent::SetEngine(engine)).await?
        }
        Command::Engine { name: None } => {
            IntentOutcome::EngineChanged(services.settings().load().await?.engine())
        }
        Command::Web { query } => session.dispatch(UserIntent::WebSearch(query.join(" "))).await?,
        Command::Settings {
            daily_limit,
            show_on_startup,
        } => {
            let settings_service = services.settings();
            let settings = if daily_limit.is_none() && show_on_startup.is_none() {
                settings_service.load().await?
            } else {
                settings_service
                    .update(|draft| {
                        draft.daily_limit = daily_limit.or(draft.daily_limit);
                        draft.show_on_startup = show_on_startup.or(draft.show_on_startup);
                    })
                    .await?
            };
            println!("{}", render::settings(&settings));
            return Ok(());
        }
    };

    println!("{}", render::outcome(&outcome));
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_parses() {
        let catalog = load_catalog(None).unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.contains(CommandId::new(1)));
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///var/lib/daily.db"),
            "sqlite:///var/lib/daily.db"
        );
        assert_eq!(normalize_sqlite_url("/tmp/daily.db"), "sqlite:///tmp/daily.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/daily.db"), "sqlite:///tmp/daily.db");
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let err = load_catalog(Some(Path::new("/no/such/commands.json"))).unwrap_err();
        assert!(err.to_string().contains("/no/such/commands.json"));
    }

    #[test]
    fn memory_urls_need_no_file() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_file("relative.db").is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let args = Args::try_parse_from(["linux-daily", "library", "--filter", "fav", "-q", "tar"])
            .unwrap();
        match args.command {
            Some(Command::Library { filter, query }) => {
                assert_eq!(filter, LibraryFilter::Favorites);
                assert_eq!(query, "tar");
            }
            other => panic!("unexpected {other:?}"),
        }

        let args = Args::try_parse_from(["linux-daily", "engine", "baidu"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Engine {
                name: Some(SearchEngine::Baidu)
            })
        ));
        assert!(Args::try_parse_from(["linux-daily", "show", "abc"]).is_err());
    }
}
