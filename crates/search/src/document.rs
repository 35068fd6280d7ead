//! Paged text made of fragments, the unit a search is fed with.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::Direction;
use crate::error::DocumentError;
use crate::matcher::SearchMatch;

const PAGE_BREAK: char = '\u{0C}';

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment {
    pub text: String,
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

impl Page {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Fragment::new).collect(),
        }
    }

    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// Anything a session can walk page by page.
pub trait Document {
    fn page_count(&self) -> usize;

    /// Fragments of `page`, empty when the page does not exist.
    fn fragments(&self, page: usize) -> &[Fragment];

    /// The page after `page` in `direction`, wrapping around the ends.
    fn adjacent_page(&self, page: usize, direction: Direction) -> usize {
        let count = self.page_count();
        if count == 0 {
            return 0;
        }
        match direction {
            Direction::Forward => (page + 1) % count,
            Direction::Backward if page == 0 || page >= count => count - 1,
            Direction::Backward => page - 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextDocument {
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl TextDocument {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Splits pages on form feeds and each page into words, keeping the
    /// whitespace that follows a word in its fragment.
    pub fn from_plain_text(text: &str) -> Self {
        let pages = text
            .split(PAGE_BREAK)
            .map(|page_text| {
                let mut fragments: Vec<Fragment> = Vec::new();
                let mut current = String::new();
                let mut in_gap = false;
                for ch in page_text.chars() {
                    if in_gap && !ch.is_whitespace() {
                        fragments.push(Fragment::new(std::mem::take(&mut current)));
                        in_gap = false;
                    }
                    in_gap |= ch.is_whitespace();
                    current.push(ch);
                }
                if !current.is_empty() {
                    fragments.push(Fragment::new(current));
                }
                Page { fragments }
            })
            .collect();
        Self { pages }
    }

    /// Reads `path` as JSON when it has a `.json` extension, plain text otherwise.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = fs::read_to_string(path)?;
        if is_json_path(path) {
            Self::from_json(&contents)
        } else {
            Ok(Self::from_plain_text(&contents))
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let contents = if is_json_path(path) {
            self.to_json()?
        } else {
            self.to_plain_text()
        };
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_plain_text(&self) -> String {
        self.pages
            .iter()
            .map(Page::text)
            .collect::<Vec<_>>()
            .join(&PAGE_BREAK.to_string())
    }

    /// Replaces the matched text. The replacement lands in the first
    /// matched fragment and fully covered middle fragments are emptied, so
    /// fragment indices stay stable. Returns false when the match does not
    /// fit the document.
    pub fn replace(&mut self, m: &SearchMatch, replacement: &str) -> bool {
        let Some(page) = self.pages.get_mut(m.page) else {
            return false;
        };
        let (first, last) = (m.begin.fragment, m.end.fragment);
        if first > last || last >= page.fragments.len() {
            return false;
        }

        if first == last {
            let text = &mut page.fragments[first].text;
            let start = byte_offset(text, m.begin.offset);
            let end = byte_offset(text, m.end.offset + 1);
            if start > end {
                return false;
            }
            text.replace_range(start..end, replacement);
            return true;
        }

        let head = &mut page.fragments[first].text;
        let start = byte_offset(head, m.begin.offset);
        head.truncate(start);
        head.push_str(replacement);

        for fragment in &mut page.fragments[first + 1..last] {
            fragment.text.clear();
        }

        let tail = &mut page.fragments[last].text;
        let end = byte_offset(tail, m.end.offset + 1);
        tail.replace_range(..end, "");
        true
    }
}

impl Document for TextDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&self, page: usize) -> &[Fragment] {
        self.pages
            .get(page)
            .map(|p| p.fragments.as_slice())
            .unwrap_or(&[])
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Byte index of char `offset`, clamped to the end of `text`.
pub(crate) fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(index, _)| index)
}
