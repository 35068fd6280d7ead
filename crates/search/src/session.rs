use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::document::{Document, Fragment, TextDocument, byte_offset};
use crate::engine::{Direction, Position, SearchConfig, SearchEngine, Step};
use crate::error::CompileError;
use crate::matcher::{ResultStep, SearchMatch, SearchResults, TextPoint};

pub const DEFAULT_HISTORY_LIMIT: usize = 200;
pub const MAX_HISTORY_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SearchMatch),
    NotFound,
    Stopped,
}

/// The part of one fragment handed to the engine.
struct Piece<'a> {
    fragment: usize,
    base: usize,
    len: usize,
    text: &'a str,
}

impl<'a> Piece<'a> {
    fn new(fragment: usize, base: usize, text: &'a str) -> Self {
        Self {
            fragment,
            base,
            len: text.chars().count(),
            text,
        }
    }
}

enum PageScan {
    Found(SearchMatch),
    Exhausted,
    Stopped,
}

/// Manages a search over a paged document: query, selection, history and
/// cancellation.
pub struct SearchSession {
    engine: SearchEngine,
    query: String,
    error: Option<CompileError>,
    results: SearchResults,
    selection: Option<SearchMatch>,
    current_page: usize,
    stop: Arc<AtomicBool>,
    history: VecDeque<String>,
    history_limit: usize,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SearchSession {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            engine: SearchEngine::new(config),
            query: String::new(),
            error: None,
            results: SearchResults::new(),
            selection: None,
            current_page: 0,
            stop: Arc::new(AtomicBool::new(false)),
            history: VecDeque::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.engine.config()
    }

    /// Applies new flags and recompiles the query under them.
    pub fn set_config(&mut self, config: SearchConfig) -> Result<(), CompileError> {
        let result = self.engine.set_config(config);
        self.error = result.clone().err();
        result
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Compiles a new query. The selection is kept so the next find
    /// continues after it. Results of the previous query are dropped.
    pub fn set_query(&mut self, query: &str) -> Result<(), CompileError> {
        self.query = query.to_string();
        self.results = SearchResults::new();
        let result = self.engine.compile(query);
        if let Err(e) = &result {
            log::warn!("invalid query {query:?}: {e}");
        }
        self.error = result.clone().err();
        result
    }

    pub fn error(&self) -> Option<&CompileError> {
        self.error.as_ref()
    }

    pub fn has_valid_pattern(&self) -> bool {
        self.engine.has_pattern()
    }

    /// Drops the query, results and selection.
    pub fn clear(&mut self) {
        self.query.clear();
        self.engine = SearchEngine::new(self.engine.config());
        self.results = SearchResults::new();
        self.selection = None;
        self.error = None;
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    /// Moves the results cursor and selects the match under it, so the
    /// next find continues from there.
    pub fn select_result(&mut self, step: ResultStep) -> Option<SearchMatch> {
        let m = *self.results.step(step)?;
        self.current_page = m.page;
        self.selection = Some(m);
        Some(m)
    }

    pub fn selection(&self) -> Option<&SearchMatch> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Moves the starting page and forgets the selection.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
        self.selection = None;
    }

    /// Starts the next find at the first page, or at the last one when
    /// searching backward.
    pub fn rewind<D: Document + ?Sized>(&mut self, doc: &D) {
        let page = match self.engine.config().direction {
            Direction::Forward => 0,
            Direction::Backward => doc.page_count().saturating_sub(1),
        };
        self.set_current_page(page);
    }

    /// Flag another thread can raise to interrupt a running find.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history_limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        self.trim_history();
    }

    /// Searches in the configured direction, starting just past the
    /// selection and wrapping around the document. The starting page is
    /// visited a second time before giving up.
    pub fn find<D: Document + ?Sized>(&mut self, doc: &D) -> SearchOutcome {
        self.stop.store(false, Ordering::Relaxed);

        let page_count = doc.page_count();
        if !self.engine.has_pattern() || page_count == 0 {
            self.record(format!("\"{}\" was not found", self.query));
            return SearchOutcome::NotFound;
        }

        let direction = self.engine.config().direction;
        let mut page = if self.current_page < page_count {
            self.current_page
        } else {
            0
        };
        let mut resume = self
            .selection
            .filter(|selection| selection.page == page)
            .map(|selection| match direction {
                Direction::Forward => selection.end,
                Direction::Backward => selection.begin,
            });
        if let Some(point) = resume {
            log::debug!("resuming on page {} after {:?}", page + 1, point);
        }

        for visit in 0..=page_count {
            if visit > 0 {
                page = doc.adjacent_page(page, direction);
                resume = None;
                self.record(format!("Trying page {}", page + 1));
            }

            match self.scan_page(doc.fragments(page), page, direction, resume) {
                PageScan::Found(m) => {
                    self.selection = Some(m);
                    self.current_page = page;
                    self.record(format!(
                        "Found occurrence of \"{}\" on page {}",
                        self.query,
                        page + 1
                    ));
                    return SearchOutcome::Found(m);
                }
                PageScan::Stopped => {
                    self.record("Search stopped".to_string());
                    return SearchOutcome::Stopped;
                }
                PageScan::Exhausted => {}
            }
        }

        self.record(format!("\"{}\" was not found", self.query));
        SearchOutcome::NotFound
    }

    pub fn find_next<D: Document + ?Sized>(&mut self, doc: &D) -> SearchOutcome {
        self.engine.set_direction(Direction::Forward);
        self.find(doc)
    }

    pub fn find_previous<D: Document + ?Sized>(&mut self, doc: &D) -> SearchOutcome {
        self.engine.set_direction(Direction::Backward);
        self.find(doc)
    }

    /// Collects every forward match in document order. A raised stop flag
    /// ends the walk early with what was found so far.
    pub fn find_all<D: Document + ?Sized>(&mut self, doc: &D) -> &SearchResults {
        self.stop.store(false, Ordering::Relaxed);
        let mut matches = Vec::new();

        if self.engine.has_pattern() {
            let direction = self.engine.config().direction;
            self.engine.set_direction(Direction::Forward);

            'pages: for page in 0..doc.page_count() {
                self.engine.reset();
                let pieces = pieces(doc.fragments(page), Direction::Forward, None);
                for piece in &pieces {
                    if self.stop.load(Ordering::Relaxed) {
                        log::info!("find all stopped on page {}", page + 1);
                        break 'pages;
                    }
                    self.engine.feed(piece.text);
                    while let Step::Found(found) = self.engine.advance() {
                        let begin = to_point(&pieces, found.begin, Direction::Forward);
                        let end = to_point(&pieces, found.end, Direction::Forward);
                        matches.push(SearchMatch::new(page, begin, end));
                    }
                }
            }

            self.engine.set_direction(direction);
        }

        log::info!("{} occurrences of {:?}", matches.len(), self.query);
        self.results = SearchResults::from_matches(matches);
        &self.results
    }

    /// Replaces every occurrence, last first so earlier positions stay
    /// valid. Returns how many were replaced.
    pub fn replace_all(&mut self, doc: &mut TextDocument, replacement: &str) -> usize {
        let matches = self.find_all(&*doc).matches().to_vec();
        let replaced = matches
            .iter()
            .rev()
            .filter(|m| doc.replace(m, replacement))
            .count();

        log::info!("replaced {replaced} occurrences of {:?}", self.query);
        self.results = SearchResults::new();
        self.selection = None;
        replaced
    }

    fn scan_page(
        &mut self,
        fragments: &[Fragment],
        page: usize,
        direction: Direction,
        resume: Option<TextPoint>,
    ) -> PageScan {
        self.engine.reset();
        let pieces = pieces(fragments, direction, resume);

        for piece in &pieces {
            if self.stop.load(Ordering::Relaxed) {
                log::info!("search stopped on page {}", page + 1);
                return PageScan::Stopped;
            }

            self.engine.feed(piece.text);
            if let Step::Found(found) = self.engine.advance() {
                let (begin, end) = match direction {
                    Direction::Forward => (found.begin, found.end),
                    Direction::Backward => (found.end, found.begin),
                };
                let m = SearchMatch::new(
                    page,
                    to_point(&pieces, begin, direction),
                    to_point(&pieces, end, direction),
                );
                log::info!("found {:?} on page {}", self.query, page + 1);
                return PageScan::Found(m);
            }
        }

        PageScan::Exhausted
    }

    fn record(&mut self, line: String) {
        log::info!("{line}");
        self.history.push_back(line);
        self.trim_history();
    }

    fn trim_history(&mut self) {
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }
}

/// Splits a page into what the engine is fed, in feeding order. A resume
/// point cuts away everything up to and including it (forward) or from it
/// onward (backward).
fn pieces(fragments: &[Fragment], direction: Direction, resume: Option<TextPoint>) -> Vec<Piece<'_>> {
    let mut pieces = Vec::with_capacity(fragments.len());

    match direction {
        Direction::Forward => {
            for (index, fragment) in fragments.iter().enumerate() {
                let text = fragment.text.as_str();
                match resume {
                    Some(point) if index < point.fragment => {}
                    Some(point) if index == point.fragment => {
                        let skip = point.offset + 1;
                        pieces.push(Piece::new(index, skip, &text[byte_offset(text, skip)..]));
                    }
                    _ => pieces.push(Piece::new(index, 0, text)),
                }
            }
        }
        Direction::Backward => {
            for (index, fragment) in fragments.iter().enumerate().rev() {
                let text = fragment.text.as_str();
                match resume {
                    Some(point) if index > point.fragment => {}
                    Some(point) if index == point.fragment => {
                        pieces.push(Piece::new(index, 0, &text[..byte_offset(text, point.offset)]));
                    }
                    _ => pieces.push(Piece::new(index, 0, text)),
                }
            }
        }
    }

    pieces
}

/// Maps a fed position back to the page, undoing the reversal of a
/// backward scan.
fn to_point(pieces: &[Piece<'_>], position: Position, direction: Direction) -> TextPoint {
    let piece = &pieces[position.fragment - 1];
    let offset = match direction {
        Direction::Forward => piece.base + position.offset,
        Direction::Backward => piece.base + piece.len - 1 - position.offset,
    };
    TextPoint::new(piece.fragment, offset)
}
