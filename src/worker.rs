use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use flume::{Receiver, Sender, unbounded};
use parking_lot::RwLock;
use pagescan_search::{
    Direction, Document, ResultStep, SearchConfig, SearchMatch, SearchOutcome, SearchResults,
    SearchSession, TextDocument, TextPoint,
};

/// Work handed to the search thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Search again, optionally with a new query and a forced direction.
    Find {
        query: Option<String>,
        direction: Option<Direction>,
    },
    FindAll(String),
    /// Move through the results of the last `FindAll`.
    Select(ResultStep),
    /// Render a page with the results marked.
    ShowPage(usize),
    Replace {
        query: String,
        replacement: String,
    },
    SetConfig(SearchConfig),
    History,
    Save(PathBuf),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Outcome {
        outcome: SearchOutcome,
        excerpt: Option<String>,
    },
    Matches(Vec<(SearchMatch, String)>),
    Selected {
        m: SearchMatch,
        position: (usize, usize),
        excerpt: String,
    },
    NoResults,
    Page {
        page: usize,
        text: String,
    },
    Replaced(usize),
    InvalidQuery(String),
    ConfigApplied(SearchConfig),
    History(Vec<String>),
    Saved(PathBuf),
    Failed(String),
}

/// Owns the search thread and the document it reads.
pub struct SearchWorker {
    requests: Sender<Request>,
    events_rx: Receiver<WorkerEvent>,
    stop: Arc<AtomicBool>,
    document: Arc<RwLock<TextDocument>>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    pub fn spawn(document: TextDocument, config: SearchConfig, history_limit: usize, excerpt_context: usize) -> Self {
        let (requests, requests_rx) = unbounded();
        let (events_tx, events_rx) = unbounded();
        let document = Arc::new(RwLock::new(document));

        let mut session = SearchSession::new(config);
        session.set_history_limit(history_limit);
        session.rewind(&*document.read());
        let stop = session.stop_handle();

        let shared = Arc::clone(&document);
        let handle = thread::spawn(move || {
            run(session, shared, requests_rx, events_tx, excerpt_context);
        });

        Self {
            requests,
            events_rx,
            stop,
            document,
            handle: Some(handle),
        }
    }

    /// Queues a request. Returns false once the thread has exited.
    pub fn send(&self, request: Request) -> bool {
        self.requests.send(request).is_ok()
    }

    /// Interrupts the search in progress, if any.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn events(&self) -> &Receiver<WorkerEvent> {
        &self.events_rx
    }

    pub fn with_document<R>(&self, f: impl FnOnce(&TextDocument) -> R) -> R {
        let document = self.document.read();
        f(&document)
    }

    pub fn shutdown(mut self) {
        self.stop();
        let _ = self.requests.send(Request::Shutdown);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::error!("search thread panicked");
        }
    }
}

fn run(
    mut session: SearchSession,
    document: Arc<RwLock<TextDocument>>,
    requests: Receiver<Request>,
    events: Sender<WorkerEvent>,
    excerpt_context: usize,
) {
    for request in requests.iter() {
        let event = match request {
            Request::Shutdown => break,
            Request::Find {
                query: None,
                direction: Some(direction),
            } if !session.results().is_empty() => {
                let step = match direction {
                    Direction::Forward => ResultStep::Next,
                    Direction::Backward => ResultStep::Previous,
                };
                select(&mut session, &*document.read(), step, excerpt_context)
            }
            Request::Find { query, direction } => {
                if let Some(query) = query
                    && let Err(e) = session.set_query(&query)
                {
                    let _ = events.send(WorkerEvent::InvalidQuery(e.to_string()));
                    continue;
                }
                let document = document.read();
                let outcome = match direction {
                    Some(Direction::Forward) => session.find_next(&*document),
                    Some(Direction::Backward) => session.find_previous(&*document),
                    None => session.find(&*document),
                };
                let excerpt = match outcome {
                    SearchOutcome::Found(m) => Some(excerpt(&*document, &m, excerpt_context)),
                    _ => None,
                };
                WorkerEvent::Outcome { outcome, excerpt }
            }
            Request::FindAll(query) => {
                if let Err(e) = session.set_query(&query) {
                    WorkerEvent::InvalidQuery(e.to_string())
                } else {
                    let document = document.read();
                    let matches = session
                        .find_all(&*document)
                        .matches()
                        .iter()
                        .map(|m| (*m, excerpt(&*document, m, excerpt_context)))
                        .collect();
                    WorkerEvent::Matches(matches)
                }
            }
            Request::Select(step) => select(&mut session, &*document.read(), step, excerpt_context),
            Request::ShowPage(page) => {
                let document = document.read();
                if page >= document.page_count() {
                    WorkerEvent::Failed(format!(
                        "page {} is out of range (1..={})",
                        page + 1,
                        document.page_count()
                    ))
                } else {
                    session.select_result(ResultStep::NearestPage(page));
                    WorkerEvent::Page {
                        page,
                        text: highlight_page(&*document, session.results(), page),
                    }
                }
            }
            Request::Replace { query, replacement } => {
                if let Err(e) = session.set_query(&query) {
                    WorkerEvent::InvalidQuery(e.to_string())
                } else {
                    let mut document = document.write();
                    WorkerEvent::Replaced(session.replace_all(&mut document, &replacement))
                }
            }
            Request::SetConfig(config) => match session.set_config(config) {
                Ok(()) => WorkerEvent::ConfigApplied(config),
                Err(e) => WorkerEvent::InvalidQuery(e.to_string()),
            },
            Request::History => WorkerEvent::History(session.history().map(str::to_string).collect()),
            Request::Save(path) => match document.read().save(&path) {
                Ok(()) => WorkerEvent::Saved(path),
                Err(e) => WorkerEvent::Failed(format!("failed to save {}: {e}", path.display())),
            },
        };

        if events.send(event).is_err() {
            break;
        }
    }

    log::debug!("search thread exiting");
}

fn select<D: Document + ?Sized>(
    session: &mut SearchSession,
    doc: &D,
    step: ResultStep,
    excerpt_context: usize,
) -> WorkerEvent {
    let Some(m) = session.select_result(step) else {
        return WorkerEvent::NoResults;
    };
    WorkerEvent::Selected {
        m,
        position: session.results().position().unwrap_or((0, 0)),
        excerpt: excerpt(doc, &m, excerpt_context),
    }
}

/// The text of `page` with the current result in braces and every other
/// result in brackets.
pub fn highlight_page<D: Document + ?Sized>(doc: &D, results: &SearchResults, page: usize) -> String {
    let starts: Vec<TextPoint> = results.matches_on_page(page).iter().map(|m| m.begin).collect();
    let mut text = String::new();
    let mut open: Option<char> = None;

    for (fragment, piece) in doc.fragments(page).iter().enumerate() {
        for (offset, ch) in piece.text.chars().enumerate() {
            let marks = if results.is_current_match(page, fragment, offset) {
                Some(('{', '}'))
            } else if results.is_any_match(page, fragment, offset) {
                Some(('[', ']'))
            } else {
                None
            };
            let starts_here = starts.contains(&TextPoint::new(fragment, offset));

            if let Some(close) = open
                && (starts_here || marks.map(|(_, c)| c) != Some(close))
            {
                text.push(close);
                open = None;
            }
            if open.is_none()
                && let Some((start, close)) = marks
            {
                text.push(start);
                open = Some(close);
            }
            text.push(ch);
        }
    }

    if let Some(close) = open {
        text.push(close);
    }
    text
}

/// The matched text in brackets with up to `context` characters either
/// side, on one line.
pub fn excerpt<D: Document + ?Sized>(doc: &D, m: &SearchMatch, context: usize) -> String {
    let fragments = doc.fragments(m.page);
    let start_of = |fragment: usize| -> usize {
        fragments
            .iter()
            .take(fragment)
            .map(|f| f.char_len())
            .sum()
    };
    let begin = start_of(m.begin.fragment) + m.begin.offset;
    let end = start_of(m.end.fragment) + m.end.offset + 1;

    let text: Vec<char> = fragments
        .iter()
        .flat_map(|f| f.text.chars())
        .map(|ch| if ch.is_whitespace() { ' ' } else { ch })
        .collect();
    let end = end.min(text.len());
    let begin = begin.min(end);
    let from = begin.saturating_sub(context);
    let to = (end + context).min(text.len());

    let mut excerpt = String::new();
    if from > 0 {
        excerpt.push_str("...");
    }
    excerpt.extend(&text[from..begin]);
    excerpt.push('[');
    excerpt.extend(&text[begin..end]);
    excerpt.push(']');
    excerpt.extend(&text[end..to]);
    if to < text.len() {
        excerpt.push_str("...");
    }
    excerpt
}
