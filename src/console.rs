use std::{
    io::{self, BufRead},
    path::PathBuf,
    thread,
};

use anyhow::Context;
use flume::{RecvError, Selector, unbounded};
use pagescan_search::{Direction, ResultStep, SearchConfig, SearchMode, SearchOutcome};

use crate::config::{AppConfig, parse_bool};
use crate::worker::{Request, SearchWorker, WorkerEvent};

const HELP: &str = "Commands:
  find <pattern>              search from the current selection
  next | prev                 repeat the search, or step through `all` results
  all <pattern>               list every occurrence
  first | last | match <n>    select a listed occurrence
  page <n>                    show a page with listed occurrences marked
  replace <pattern> => <text> replace every occurrence
  case on|off                 match letter case exactly
  hyphen on|off               ignore hyphens inside words
  wildcard on|off             enable . [a-z] \\x x*
                              (may skip a match overlapping a failed one)
  stop                        interrupt the running search
  history                     show the search history
  save <path>                 write the document (.json or text)
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Find(String),
    Next,
    Previous,
    All(String),
    First,
    Last,
    /// 1-based.
    Match(usize),
    /// 1-based.
    Page(usize),
    Replace { pattern: String, replacement: String },
    Case(bool),
    Hyphen(bool),
    Wildcard(bool),
    Stop,
    History,
    Save(PathBuf),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, rest)| (name, rest.trim()));

    let required = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("`{name}` needs {what}"))
        } else {
            Ok(rest.to_string())
        }
    };
    let switch = || parse_bool(rest).ok_or_else(|| format!("`{name}` expects on or off"));
    let number = || match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("`{name}` expects a number from 1")),
    };

    match name.to_ascii_lowercase().as_str() {
        "find" | "f" => required("a pattern").map(Command::Find),
        "next" | "n" => Ok(Command::Next),
        "prev" | "previous" | "p" => Ok(Command::Previous),
        "all" => required("a pattern").map(Command::All),
        "first" => Ok(Command::First),
        "last" => Ok(Command::Last),
        "match" | "m" => number().map(Command::Match),
        "page" => number().map(Command::Page),
        "replace" => {
            let (pattern, replacement) = rest
                .split_once("=>")
                .ok_or_else(|| "usage: replace <pattern> => <text>".to_string())?;
            let pattern = pattern.trim();
            if pattern.is_empty() {
                return Err("`replace` needs a pattern".to_string());
            }
            Ok(Command::Replace {
                pattern: pattern.to_string(),
                replacement: replacement.trim().to_string(),
            })
        }
        "case" => switch().map(Command::Case),
        "hyphen" => switch().map(Command::Hyphen),
        "wildcard" => switch().map(Command::Wildcard),
        "stop" => Ok(Command::Stop),
        "history" => Ok(Command::History),
        "save" => required("a path").map(|path| Command::Save(PathBuf::from(path))),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command `{other}`, try `help`")),
    }
}

enum Input {
    Line(Result<String, RecvError>),
    Event(Result<WorkerEvent, RecvError>),
}

struct Console {
    worker: SearchWorker,
    config: SearchConfig,
}

impl Console {
    /// Returns false when the console should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    println!("{message}");
                }
                return true;
            }
        };

        let request = match command {
            Command::Find(pattern) => Request::Find {
                query: Some(pattern),
                direction: None,
            },
            Command::Next => Request::Find {
                query: None,
                direction: Some(Direction::Forward),
            },
            Command::Previous => Request::Find {
                query: None,
                direction: Some(Direction::Backward),
            },
            Command::All(pattern) => Request::FindAll(pattern),
            Command::First => Request::Select(ResultStep::First),
            Command::Last => Request::Select(ResultStep::Last),
            Command::Match(n) => Request::Select(ResultStep::Index(n - 1)),
            Command::Page(n) => Request::ShowPage(n - 1),
            Command::Replace {
                pattern,
                replacement,
            } => Request::Replace {
                query: pattern,
                replacement,
            },
            Command::Case(enabled) => {
                self.config.case_sensitive = enabled;
                Request::SetConfig(self.config)
            }
            Command::Hyphen(enabled) => {
                self.config.hyphen_tolerant = enabled;
                Request::SetConfig(self.config)
            }
            Command::Wildcard(enabled) => {
                self.config.mode = if enabled {
                    SearchMode::Wildcard
                } else {
                    SearchMode::Literal
                };
                Request::SetConfig(self.config)
            }
            Command::Stop => {
                self.worker.stop();
                return true;
            }
            Command::History => Request::History,
            Command::Save(path) => Request::Save(path),
            Command::Help => {
                println!("{HELP}");
                return true;
            }
            Command::Quit => return false,
        };

        self.worker.send(request)
    }

    fn print_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Outcome { outcome, excerpt } => match outcome {
                SearchOutcome::Found(m) => {
                    println!(
                        "page {}: {}",
                        m.page + 1,
                        excerpt.unwrap_or_default()
                    );
                }
                SearchOutcome::NotFound => println!("Not found"),
                SearchOutcome::Stopped => println!("Stopped"),
            },
            WorkerEvent::Matches(matches) => {
                for (m, excerpt) in &matches {
                    println!("page {}: {excerpt}", m.page + 1);
                }
                println!("{} occurrence(s)", matches.len());
            }
            WorkerEvent::Selected {
                m,
                position: (index, total),
                excerpt,
            } => println!("{index}/{total} page {}: {excerpt}", m.page + 1),
            WorkerEvent::NoResults => println!("no listed occurrence there, run `all <pattern>` first"),
            WorkerEvent::Page { page, text } => {
                println!("--- page {} ---", page + 1);
                println!("{text}");
            }
            WorkerEvent::Replaced(count) => println!("replaced {count} occurrence(s)"),
            WorkerEvent::InvalidQuery(message) => {
                log::warn!("invalid pattern: {message}");
                println!("invalid pattern: {message}");
            }
            WorkerEvent::ConfigApplied(config) => {
                self.config = config;
                println!(
                    "case {}, hyphen {}, wildcard {}",
                    on_off(config.case_sensitive),
                    on_off(config.hyphen_tolerant),
                    on_off(config.mode == SearchMode::Wildcard)
                );
            }
            WorkerEvent::History(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
            WorkerEvent::Saved(path) => println!("saved {}", path.display()),
            WorkerEvent::Failed(message) => {
                log::error!("{message}");
                println!("{message}");
            }
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// Reads commands from stdin until `quit` or end of input while the
/// search thread works.
pub fn run(document: pagescan_search::TextDocument, config: AppConfig) -> anyhow::Result<()> {
    let pages = document.pages.len();
    let worker = SearchWorker::spawn(document, config.search, config.history_limit, config.excerpt_context);
    let mut console = Console {
        worker,
        config: config.search,
    };

    let (lines_tx, lines_rx) = unbounded();
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if lines_tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to start the input thread")?;

    println!("{pages} page(s) loaded, type `help` for commands");

    loop {
        let input = Selector::new()
            .recv(&lines_rx, Input::Line)
            .recv(console.worker.events(), Input::Event)
            .wait();

        match input {
            Input::Line(Ok(line)) => {
                if !console.handle_line(&line) {
                    break;
                }
            }
            Input::Line(Err(_)) => break,
            Input::Event(Ok(event)) => console.print_event(event),
            Input::Event(Err(_)) => {
                anyhow::bail!("search thread stopped unexpectedly");
            }
        }
    }

    console.worker.shutdown();
    Ok(())
}
