use std::path::Path;

use anyhow::Context;
use pagescan_search::{SearchConfig, SearchMatch, SearchOutcome, SearchSession, TextDocument};

use crate::SearchFlags;
use crate::config::load_search_config;

/// Prints the first occurrence, or every one with `all`. Returns whether
/// anything was found.
pub fn run(document: &Path, pattern: &str, flags: SearchFlags, all: bool) -> anyhow::Result<bool> {
    let doc = TextDocument::load(document)
        .with_context(|| format!("Failed to load {}", document.display()))?;

    let config = flags.apply(load_search_config());
    log::debug!("searching {} for {pattern:?} with {config:?}", document.display());
    let matches = search(&doc, pattern, config, all)?;

    for m in &matches {
        println!("{}", describe(m));
    }
    if all {
        println!("{} occurrence(s)", matches.len());
    } else if matches.is_empty() {
        println!("Not found");
    }
    Ok(!matches.is_empty())
}

/// Backward searches start from the last page.
pub fn search(
    doc: &TextDocument,
    pattern: &str,
    config: SearchConfig,
    all: bool,
) -> anyhow::Result<Vec<SearchMatch>> {
    let mut session = SearchSession::new(config);
    session
        .set_query(pattern)
        .with_context(|| format!("Invalid pattern {pattern:?}"))?;

    if all {
        return Ok(session.find_all(doc).matches().to_vec());
    }

    session.rewind(doc);
    match session.find(doc) {
        SearchOutcome::Found(m) => Ok(vec![m]),
        SearchOutcome::NotFound | SearchOutcome::Stopped => Ok(Vec::new()),
    }
}

pub fn describe(m: &SearchMatch) -> String {
    format!(
        "page {}, fragment {} offset {} to fragment {} offset {} ({} fragment{})",
        m.page + 1,
        m.begin.fragment,
        m.begin.offset,
        m.end.fragment,
        m.end.offset,
        m.fragments_spanned,
        if m.fragments_spanned == 1 { "" } else { "s" }
    )
}

#[cfg(test)]
mod tests {
    use super::{describe, search};
    use pagescan_search::{Direction, Page, SearchConfig, SearchMatch, TextDocument, TextPoint};

    fn cats() -> TextDocument {
        TextDocument::new(vec![Page::new(["cat"]), Page::new(["the ", "cat"])])
    }

    #[test]
    fn describe_uses_one_based_pages() {
        let single = SearchMatch::new(0, TextPoint::new(1, 0), TextPoint::new(1, 2));
        assert_eq!(
            describe(&single),
            "page 1, fragment 1 offset 0 to fragment 1 offset 2 (1 fragment)"
        );

        let spanning = SearchMatch::new(4, TextPoint::new(0, 3), TextPoint::new(2, 0));
        assert_eq!(
            describe(&spanning),
            "page 5, fragment 0 offset 3 to fragment 2 offset 0 (3 fragments)"
        );
    }

    #[test]
    fn backward_search_reports_last_occurrence() {
        let backward = SearchConfig {
            direction: Direction::Backward,
            ..SearchConfig::default()
        };
        let found = search(&cats(), "cat", backward, false).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].page, found[0].begin), (1, TextPoint::new(1, 0)));

        let found = search(&cats(), "cat", SearchConfig::default(), false).unwrap();
        assert_eq!(found[0].page, 0);
    }

    #[test]
    fn missing_pattern_and_bad_query() {
        assert!(search(&cats(), "dog", SearchConfig::default(), false).unwrap().is_empty());
        assert_eq!(search(&cats(), "cat", SearchConfig::default(), true).unwrap().len(), 2);
        assert!(search(&cats(), "", SearchConfig::default(), false).is_err());
    }
}
