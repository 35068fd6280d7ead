use std::collections::BTreeMap;
use std::ops::Range;

/// A character inside a page: the fragment index and the char offset in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextPoint {
    pub fragment: usize,
    pub offset: usize,
}

impl TextPoint {
    pub fn new(fragment: usize, offset: usize) -> Self {
        Self { fragment, offset }
    }
}

/// An occurrence in document order. `end` is inclusive, so a one-character
/// match has `begin == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub page: usize,
    pub begin: TextPoint,
    pub end: TextPoint,
    pub fragments_spanned: usize,
}

impl SearchMatch {
    pub fn new(page: usize, begin: TextPoint, end: TextPoint) -> Self {
        Self {
            page,
            begin,
            end,
            fragments_spanned: end.fragment - begin.fragment + 1,
        }
    }

    pub fn contains(&self, page: usize, fragment: usize, offset: usize) -> bool {
        let point = TextPoint::new(fragment, offset);
        self.page == page && point >= self.begin && point <= self.end
    }
}

/// Where to move the results cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStep {
    /// Wraps to the first match after the last.
    Next,
    /// Wraps to the last match before the first.
    Previous,
    First,
    Last,
    /// 0-based; out of range leaves the cursor alone.
    Index(usize),
    /// First match on this page or later, wrapping to the first match.
    NearestPage(usize),
}

/// Every occurrence of a query with a cursor over them.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    matches: Vec<SearchMatch>,
    current: Option<usize>,
    /// Slice of `matches` on each page that has any.
    pages: BTreeMap<usize, Range<usize>>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts into document order and puts the cursor on the first match.
    pub fn from_matches(mut matches: Vec<SearchMatch>) -> Self {
        matches.sort_by_key(|m| (m.page, m.begin));

        let mut pages: BTreeMap<usize, Range<usize>> = BTreeMap::new();
        for (index, m) in matches.iter().enumerate() {
            pages
                .entry(m.page)
                .and_modify(|range| range.end = index + 1)
                .or_insert(index..index + 1);
        }

        Self {
            current: (!matches.is_empty()).then_some(0),
            matches,
            pages,
        }
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn current(&self) -> Option<&SearchMatch> {
        self.current.and_then(|index| self.matches.get(index))
    }

    /// 1-based index of the current match and the total.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current.map(|index| (index + 1, self.matches.len()))
    }

    /// Moves the cursor and returns the match it lands on.
    pub fn step(&mut self, step: ResultStep) -> Option<&SearchMatch> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }

        let index = match step {
            ResultStep::Next => self.current.map_or(0, |index| (index + 1) % len),
            ResultStep::Previous => self.current.map_or(len - 1, |index| (index + len - 1) % len),
            ResultStep::First => 0,
            ResultStep::Last => len - 1,
            ResultStep::Index(index) if index < len => index,
            ResultStep::Index(_) => return None,
            ResultStep::NearestPage(page) => self
                .pages
                .range(page..)
                .next()
                .map_or(0, |(_, range)| range.start),
        };

        self.current = Some(index);
        self.matches.get(index)
    }

    pub fn matches_on_page(&self, page: usize) -> &[SearchMatch] {
        self.pages
            .get(&page)
            .map(|range| &self.matches[range.clone()])
            .unwrap_or(&[])
    }

    pub fn is_current_match(&self, page: usize, fragment: usize, offset: usize) -> bool {
        self.current()
            .is_some_and(|m| m.contains(page, fragment, offset))
    }

    pub fn is_any_match(&self, page: usize, fragment: usize, offset: usize) -> bool {
        self.matches_on_page(page)
            .iter()
            .any(|m| m.contains(page, fragment, offset))
    }
}
