//! Interactive task list shell.
//!
//! # Responsibility
//! - Open the task database and hydrate one store per run.
//! - Turn stdin line commands into view intents and print each render.
//!
//! A failed storage write ends the process with an error.

mod command;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use command::{Command, HELP};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tasklist_core::{
    default_log_level, init_logging, Intent, KvRepository, MemoryKvRepository,
    SqliteKvRepository, TaskStore, TaskView,
};

const DB_DIR_NAME: &str = "tasklist";
const DB_FILE_NAME: &str = "tasks.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "Task list with write-through local storage")]
struct Cli {
    /// SQLite file holding the list.
    #[arg(long = "db", value_name = "PATH", env = "TASKLIST_DB_PATH")]
    db_path: Option<PathBuf>,
    /// Keep the list in memory only.
    #[arg(long, conflicts_with = "db_path")]
    ephemeral: bool,
    #[arg(long = "log-level", value_name = "LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long = "log-dir", value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).map_err(|err| anyhow!(err))?;
    }

    let repo: Box<dyn KvRepository> = if args.ephemeral {
        Box::new(MemoryKvRepository::new())
    } else {
        let path = resolve_db_path(args.db_path)?;
        info!("event=cli_start module=cli status=ok mode=file");
        Box::new(
            SqliteKvRepository::open(&path)
                .with_context(|| format!("open task database `{}`", path.display()))?,
        )
    };

    let mut store = TaskStore::open(repo);
    let mut view = TaskView::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", view.render(&store))?;

    for line in io::stdin().lock().lines() {
        let line = line.context("read command")?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        let intents = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::List => Vec::new(),
            Command::Add(text) => vec![Intent::SetInput(text), Intent::Add],
            Command::Input(text) => vec![Intent::SetInput(text)],
            Command::Submit => vec![Intent::Add],
            Command::Toggle(id) => vec![Intent::Toggle(id)],
            Command::Delete(id) => vec![Intent::Delete(id)],
            Command::Edit(id) => vec![Intent::Edit(id)],
            Command::Type(text) => match store.editing_id() {
                Some(id) => vec![Intent::EditText(id, text)],
                None => {
                    writeln!(out, "not editing; use `edit <id>` first")?;
                    continue;
                }
            },
            Command::Save => match store.editing_id() {
                Some(id) => vec![Intent::Save(id)],
                None => {
                    writeln!(out, "not editing; nothing to save")?;
                    continue;
                }
            },
        };

        for intent in intents {
            view.dispatch(&mut store, intent)
                .context("persist task list")?;
        }
        write!(out, "{}", view.render(&store))?;
    }

    Ok(())
}

fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path,
        None => dirs::data_dir()
            .map(|dir| dir.join(DB_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DB_FILE_NAME),
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create database directory `{}`", parent.display()))?;
    }
    Ok(path)
}
