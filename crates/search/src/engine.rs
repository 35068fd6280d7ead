use std::borrow::Cow;
use std::collections::VecDeque;

use crate::error::CompileError;
use crate::pattern::{fold_case, is_insignificant, reverse_text};
use crate::state::{ROOT, StateId};
use crate::tree::Automaton;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Literal,
    Wildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    /// Skip hyphens on both sides so words split across lines still match.
    pub hyphen_tolerant: bool,
    pub mode: SearchMode,
    pub direction: Direction,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            hyphen_tolerant: false,
            mode: SearchMode::Literal,
            direction: Direction::Forward,
        }
    }
}

/// A character in the fed stream: the 1-based ordinal of its fragment since
/// the last compile or reset, and its char offset within that fragment as
/// fed. Backward scans feed reversed fragments, so offsets are reversed too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub fragment: usize,
    pub offset: usize,
}

/// A complete match in fed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found {
    pub begin: Position,
    pub end: Position,
}

impl Found {
    pub fn fragments_spanned(&self) -> usize {
        self.end.fragment - self.begin.fragment + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The fragment ran out before the pattern completed.
    Next,
    Found(Found),
}

#[derive(Debug, Clone, Default)]
struct ScanState {
    current: StateId,
    /// Position accepted by each state of the current partial match, root
    /// first. A fallback of border `k` keeps only the last `k` entries.
    last_seen: VecDeque<Position>,
    /// Characters taken so far when `current` is a repetition.
    repeated: usize,
    comparisons: usize,
}

impl ScanState {
    fn restart(&mut self) {
        self.current = ROOT;
        self.last_seen.clear();
        self.repeated = 0;
    }

    fn step(&mut self, automaton: &Automaton, ch: char, here: Position) -> Option<Found> {
        let mut state = self.current;
        let mut taken = self.repeated;
        // First repetition of the current run of empty hand-offs.
        let mut empty_from: Option<StateId> = None;

        loop {
            let candidate = automaton.state(state);
            self.comparisons += 1;
            if candidate.symbol.accepts(ch) {
                break;
            }

            // A repetition hands the character on without consuming it.
            if candidate.symbol.is_repeat()
                && let Some(next) = candidate.on_match
            {
                if taken == 0 && empty_from.is_none() {
                    empty_from = Some(state);
                }
                self.last_seen.push_back(here);
                state = next;
                taken = 0;
                continue;
            }

            // Empty repetitions took nothing, so the prefix before the first
            // of them is what was matched.
            if let Some(repeat) = empty_from.take() {
                let border = automaton.state(repeat).on_mismatch;
                self.last_seen.truncate(repeat);
                self.last_seen.drain(..(repeat - border).min(self.last_seen.len()));
                state = border;
                taken = 0;
                continue;
            }

            if candidate.is_root() {
                self.restart();
                return None;
            }

            let border = candidate.on_mismatch;
            let dropped = state - border;
            self.last_seen.drain(..dropped.min(self.last_seen.len()));
            state = border;
            taken = 0;
        }

        let accepting = automaton.state(state);
        if accepting.symbol.is_repeat() {
            self.current = state;
            self.repeated = taken + 1;
            return None;
        }

        self.last_seen.push_back(here);
        self.repeated = 0;
        match accepting.on_match {
            Some(next) => {
                self.current = next;
                None
            }
            None => {
                let begin = self.last_seen.front().copied().unwrap_or(here);
                self.restart();
                Some(Found { begin, end: here })
            }
        }
    }
}

/// Streaming matcher fed one text fragment at a time.
pub struct SearchEngine {
    config: SearchConfig,
    automaton: Option<Automaton>,
    pattern: String,
    scan: ScanState,
    buffer: Vec<char>,
    cursor: usize,
    fragment: usize,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            automaton: None,
            pattern: String::new(),
            scan: ScanState::default(),
            buffer: Vec::new(),
            cursor: 0,
            fragment: 0,
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Applies new flags, recompiling the current pattern if there is one.
    pub fn set_config(&mut self, config: SearchConfig) -> Result<(), CompileError> {
        if self.config == config {
            return Ok(());
        }

        self.config = config;
        if self.pattern.is_empty() {
            return Ok(());
        }
        let pattern = self.pattern.clone();
        self.compile(&pattern)
    }

    /// Switches scan direction without re-lexing the pattern.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.config.direction == direction {
            return;
        }

        self.config.direction = direction;
        if let Some(automaton) = &self.automaton {
            self.automaton = Some(automaton.reversed());
        }
        self.reset();
    }

    /// Rebuilds the automaton for `pattern`, dropping any scan in progress.
    pub fn compile(&mut self, pattern: &str) -> Result<(), CompileError> {
        self.pattern = pattern.to_string();
        self.reset();
        self.scan.comparisons = 0;

        match Automaton::compile(pattern, &self.config) {
            Ok(automaton) => {
                log::debug!(
                    "compiled {:?} into {} states ({:?}, {:?})",
                    pattern,
                    automaton.len(),
                    self.config.mode,
                    self.config.direction
                );
                self.automaton = Some(automaton);
                Ok(())
            }
            Err(e) => {
                self.automaton = None;
                Err(e)
            }
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn has_pattern(&self) -> bool {
        self.automaton.is_some()
    }

    pub fn automaton(&self) -> Option<&Automaton> {
        self.automaton.as_ref()
    }

    /// Forgets any partial match and restarts fragment numbering.
    pub fn reset(&mut self) {
        self.scan.restart();
        self.buffer.clear();
        self.cursor = 0;
        self.fragment = 0;
    }

    /// Supplies the next fragment. A partial match carries over.
    pub fn feed(&mut self, fragment: &str) {
        self.fragment += 1;
        self.cursor = 0;
        self.buffer.clear();

        let text = match self.config.direction {
            Direction::Forward => Cow::Borrowed(fragment),
            Direction::Backward => Cow::Owned(reverse_text(fragment)),
        };
        let case_sensitive = self.config.case_sensitive;
        self.buffer.extend(text.chars().map(|ch| {
            if case_sensitive {
                ch
            } else {
                fold_case(ch)
            }
        }));
    }

    /// Scans the rest of the current fragment.
    ///
    /// # Panics
    ///
    /// Panics if no pattern has been compiled successfully.
    pub fn advance(&mut self) -> Step {
        let Some(automaton) = self.automaton.as_ref() else {
            panic!("SearchEngine::advance called without a compiled pattern");
        };

        while self.cursor < self.buffer.len() {
            let ch = self.buffer[self.cursor];
            let here = Position {
                fragment: self.fragment,
                offset: self.cursor,
            };
            self.cursor += 1;

            if is_insignificant(ch, self.config.hyphen_tolerant) {
                continue;
            }

            if let Some(found) = self.scan.step(automaton, ch, here) {
                log::trace!("match {:?}..{:?}", found.begin, found.end);
                return Step::Found(found);
            }
        }

        Step::Next
    }

    pub fn fragments_fed(&self) -> usize {
        self.fragment
    }

    /// Where the match in progress started, if one is in progress.
    pub fn partial_match_begin(&self) -> Option<Position> {
        self.scan.last_seen.front().copied()
    }

    /// Symbol tests performed since the last compile.
    pub fn comparisons(&self) -> usize {
        self.scan.comparisons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn compiled(pattern: &str, config: SearchConfig) -> SearchEngine {
        let mut engine = SearchEngine::new(config);
        engine.compile(pattern).unwrap();
        engine
    }

    fn wildcard() -> SearchConfig {
        SearchConfig {
            mode: SearchMode::Wildcard,
            ..SearchConfig::default()
        }
    }

    /// Every match over `fragments`, in fed coordinates.
    fn scan_all(engine: &mut SearchEngine, fragments: &[&str]) -> Vec<Found> {
        let mut found = Vec::new();
        for fragment in fragments {
            engine.feed(fragment);
            while let Step::Found(m) = engine.advance() {
                found.push(m);
            }
        }
        found
    }

    /// First match as inclusive char offsets into the joined fragments.
    /// Backward scans feed the fragments last to first.
    fn first_match(pattern: &str, config: SearchConfig, chunks: &[&str]) -> Option<(usize, usize)> {
        let mut engine = compiled(pattern, config);
        let lens: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        let starts: Vec<usize> = lens
            .iter()
            .scan(0, |acc, len| {
                let start = *acc;
                *acc += len;
                Some(start)
            })
            .collect();

        let order: Vec<usize> = match config.direction {
            Direction::Forward => (0..chunks.len()).collect(),
            Direction::Backward => (0..chunks.len()).rev().collect(),
        };

        for &idx in &order {
            engine.feed(chunks[idx]);
            if let Step::Found(found) = engine.advance() {
                let global = |pos: Position| {
                    let idx = order[pos.fragment - 1];
                    match config.direction {
                        Direction::Forward => starts[idx] + pos.offset,
                        Direction::Backward => starts[idx] + lens[idx] - 1 - pos.offset,
                    }
                };
                return Some(match config.direction {
                    Direction::Forward => (global(found.begin), global(found.end)),
                    Direction::Backward => (global(found.end), global(found.begin)),
                });
            }
        }
        None
    }

    fn split_at_points<'a>(text: &'a str, points: &[usize]) -> Vec<&'a str> {
        let mut points: Vec<usize> = points.iter().map(|p| p % (text.len() + 1)).collect();
        points.sort_unstable();
        points.dedup();
        let mut chunks = Vec::new();
        let mut last = 0;
        for point in points {
            chunks.push(&text[last..point]);
            last = point;
        }
        chunks.push(&text[last..]);
        chunks
    }

    #[test]
    fn test_match_within_single_fragment() {
        let mut engine = compiled("cat", SearchConfig::default());
        let found = scan_all(&mut engine, &["the ", "cat ", "sat"]);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].begin,
            Position {
                fragment: 2,
                offset: 0
            }
        );
        assert_eq!(
            found[0].end,
            Position {
                fragment: 2,
                offset: 2
            }
        );
        assert_eq!(found[0].fragments_spanned(), 1);
    }

    #[test]
    fn test_match_straddles_fragments() {
        let mut engine = compiled("catdog", SearchConfig::default());

        engine.feed("ca");
        assert_eq!(engine.advance(), Step::Next);
        assert_eq!(
            engine.partial_match_begin(),
            Some(Position {
                fragment: 1,
                offset: 0
            })
        );
        engine.feed("tdo");
        assert_eq!(engine.advance(), Step::Next);
        engine.feed("g");

        let Step::Found(found) = engine.advance() else {
            panic!("expected a match");
        };
        assert_eq!(
            found.begin,
            Position {
                fragment: 1,
                offset: 0
            }
        );
        assert_eq!(
            found.end,
            Position {
                fragment: 3,
                offset: 0
            }
        );
        assert_eq!(found.fragments_spanned(), 3);
    }

    #[test]
    fn test_dot_requires_one_character() {
        let mut engine = compiled("a.b", wildcard());
        assert_eq!(scan_all(&mut engine, &["axb"]).len(), 1);

        let mut engine = compiled("a.b", wildcard());
        assert!(scan_all(&mut engine, &["ab"]).is_empty());
    }

    #[test]
    fn test_no_occurrence_reports_next_everywhere() {
        let mut engine = compiled("zebra", SearchConfig::default());
        for fragment in ["the ", "quick ", "brown ", "fox"] {
            engine.feed(fragment);
            assert_eq!(engine.advance(), Step::Next);
        }
        assert_eq!(engine.fragments_fed(), 4);
        assert_eq!(engine.partial_match_begin(), None);
    }

    #[test]
    fn test_repeated_prefix_reports_leftmost_start() {
        let mut engine = compiled("abab", SearchConfig::default());
        let found = scan_all(&mut engine, &["ababab"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].begin.offset, 0);
        assert_eq!(found[0].end.offset, 3);

        let mut engine = compiled("aaab", SearchConfig::default());
        let found = scan_all(&mut engine, &["aaaaab"]);
        assert_eq!(found[0].begin.offset, 2);
        assert_eq!(found[0].end.offset, 5);
    }

    #[test]
    fn test_fallback_start_survives_fragment_boundaries() {
        let mut engine = compiled("aab", SearchConfig::default());
        let found = scan_all(&mut engine, &["a", "a", "a", "b"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].begin.fragment, 2);
        assert_eq!(found[0].end.fragment, 4);
        assert_eq!(found[0].fragments_spanned(), 3);
    }

    #[test]
    fn test_comparisons_grow_linearly() {
        for (pattern, text) in [
            ("abab", "ab".repeat(500)),
            ("aaab", format!("{}b", "a".repeat(999))),
            ("aabaaab", "aabaabaaab".repeat(100)),
        ] {
            let mut engine = compiled(pattern, SearchConfig::default());
            scan_all(&mut engine, &[&text]);
            assert!(
                engine.comparisons() <= 2 * text.len(),
                "{pattern}: {} comparisons over {} chars",
                engine.comparisons(),
                text.len()
            );
        }
    }

    #[test]
    fn test_successive_matches_do_not_overlap() {
        let mut engine = compiled("aa", SearchConfig::default());
        let found = scan_all(&mut engine, &["aaaaa"]);
        let begins: Vec<usize> = found.iter().map(|m| m.begin.offset).collect();
        assert_eq!(begins, vec![0, 2]);
    }

    #[test]
    fn test_case_sensitivity() {
        let mut insensitive = compiled("HELLO", SearchConfig::default());
        assert_eq!(scan_all(&mut insensitive, &["Hello World"]).len(), 1);

        let config = SearchConfig {
            case_sensitive: true,
            ..SearchConfig::default()
        };
        let mut sensitive = compiled("HELLO", config);
        assert!(scan_all(&mut sensitive, &["Hello World"]).is_empty());
        let mut sensitive = compiled("HELLO", config);
        assert_eq!(scan_all(&mut sensitive, &["HELLO World"]).len(), 1);
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        let mut engine = compiled("the cat", SearchConfig::default());
        let found = scan_all(&mut engine, &["the", "cat"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fragments_spanned(), 2);

        let mut engine = compiled("thecat", SearchConfig::default());
        let found = scan_all(&mut engine, &["  the ", " cat"]);
        assert_eq!(found[0].begin.offset, 2);
        assert_eq!(found[0].end.offset, 3);
    }

    #[test]
    fn test_hyphen_tolerance() {
        let tolerant = SearchConfig {
            hyphen_tolerant: true,
            ..SearchConfig::default()
        };
        let mut engine_tolerant = compiled("example", tolerant);
        let found = scan_all(&mut engine_tolerant, &["an exam-", "ple here"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].begin.offset, 3);
        assert_eq!(found[0].end.offset, 2);

        let mut strict = compiled("example", SearchConfig::default());
        assert!(scan_all(&mut strict, &["an exam-", "ple here"]).is_empty());

        let mut soft = compiled("example", tolerant);
        assert_eq!(scan_all(&mut soft, &["exam\u{00AD}ple"]).len(), 1);
    }

    #[test]
    fn test_backward_scan_reports_reversed_offsets() {
        let config = SearchConfig {
            direction: Direction::Backward,
            ..SearchConfig::default()
        };
        let mut engine = compiled("abc", config);
        engine.feed("xxabcx");
        let Step::Found(found) = engine.advance() else {
            panic!("expected a match");
        };
        assert_eq!(found.begin.offset, 1);
        assert_eq!(found.end.offset, 3);
    }

    #[test]
    fn test_backward_finds_last_occurrence() {
        let config = SearchConfig {
            direction: Direction::Backward,
            ..SearchConfig::default()
        };
        assert_eq!(first_match("ab", config, &["ab ab", " ab"]), Some((6, 7)));
        assert_eq!(
            first_match("ab", SearchConfig::default(), &["ab ab", " ab"]),
            Some((0, 1))
        );
    }

    #[test]
    fn test_wildcard_sets() {
        let mut engine = compiled("v[0-9].[0-9]", wildcard());
        let found = scan_all(&mut engine, &["release v2.5 notes"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].begin.offset, 8);

        let mut engine = compiled("[A-C]x", wildcard());
        assert_eq!(scan_all(&mut engine, &["Bx"]).len(), 1);
    }

    #[test]
    fn test_wildcard_restart_skips_overlapping_occurrence() {
        // `a` does not cover `.`, so failing on the `b` drops the partial
        // match `aa` entirely and the occurrence starting at 1 is missed.
        let oracle = regex::Regex::new("a.a.").unwrap();
        assert_eq!(oracle.find("aabab").map(|m| m.range()), Some(1..5));

        let mut engine = compiled("a.a.", wildcard());
        assert!(scan_all(&mut engine, &["aabab"]).is_empty());

        let mut engine = compiled("a.a.", wildcard());
        let found = scan_all(&mut engine, &["xabab"]);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].begin.offset, found[0].end.offset), (1, 4));
    }

    #[test]
    fn test_repetition() {
        for (text, begin, end) in [("ac", 0, 1), ("abc", 0, 2), ("xabbbbc", 1, 6)] {
            let mut engine = compiled("ab*c", wildcard());
            let found = scan_all(&mut engine, &[text]);
            assert_eq!(found.len(), 1, "{text}");
            assert_eq!((found[0].begin.offset, found[0].end.offset), (begin, end));
        }

        let mut engine = compiled("ab*c", wildcard());
        assert!(scan_all(&mut engine, &["abd"]).is_empty());

        let mut engine = compiled("ab*c", wildcard());
        let found = scan_all(&mut engine, &["ab", "bb", "c"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fragments_spanned(), 3);
    }

    #[test]
    fn test_repetition_is_possessive() {
        let mut engine = compiled("ab*bc", wildcard());
        assert!(scan_all(&mut engine, &["abbc"]).is_empty());
    }

    #[test]
    fn test_repetition_followed_by_fallback() {
        let mut engine = compiled("ab*ab", wildcard());
        let found = scan_all(&mut engine, &["xabbaab"]);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].begin.offset, found[0].end.offset), (4, 6));
    }

    #[test]
    fn test_empty_repetition_keeps_prefix_border() {
        let spans = |pattern: &str, text: &str| -> Vec<(usize, usize)> {
            let mut engine = compiled(pattern, wildcard());
            scan_all(&mut engine, &[text])
                .iter()
                .map(|found| (found.begin.offset, found.end.offset))
                .collect()
        };

        assert_eq!(spans("aab*c", "aac"), vec![(0, 2)]);
        assert_eq!(spans("aab*c", "aaac"), vec![(1, 3)]);
        assert_eq!(spans("aab*c", "aaaabbc"), vec![(2, 6)]);
        assert_eq!(spans("aab*x*c", "aaac"), vec![(1, 3)]);

        // The partial match survives a fragment boundary after the fallback.
        let mut engine = compiled("aab*c", wildcard());
        let found = scan_all(&mut engine, &["aa", "a", "c"]);
        assert_eq!(found.len(), 1);
        assert_eq!(
            (found[0].begin, found[0].end),
            (
                Position {
                    fragment: 1,
                    offset: 1
                },
                Position {
                    fragment: 3,
                    offset: 0
                }
            )
        );
    }

    #[test]
    fn test_compile_resets_scan() {
        let mut engine = compiled("catdog", SearchConfig::default());
        engine.feed("cat");
        assert_eq!(engine.advance(), Step::Next);
        assert!(engine.partial_match_begin().is_some());

        engine.compile("dog").unwrap();
        assert_eq!(engine.partial_match_begin(), None);
        assert_eq!(engine.fragments_fed(), 0);
        assert_eq!(engine.comparisons(), 0);
    }

    #[test]
    fn test_failed_compile_drops_pattern() {
        let mut engine = compiled("abc", wildcard());
        assert_eq!(engine.compile("[abc"), Err(CompileError::UnterminatedSet(0)));
        assert!(!engine.has_pattern());
        assert_eq!(engine.pattern(), "[abc");
    }

    #[test]
    fn test_set_config_recompiles() {
        let mut engine = compiled("a.c", SearchConfig::default());
        assert!(scan_all(&mut engine, &["abc"]).is_empty());

        engine.set_config(wildcard()).unwrap();
        assert_eq!(scan_all(&mut engine, &["abc"]).len(), 1);
    }

    #[test]
    fn test_set_direction_reverses_automaton() {
        let mut engine = compiled("abc", SearchConfig::default());
        engine.set_direction(Direction::Backward);
        assert_eq!(engine.config().direction, Direction::Backward);
        let found = scan_all(&mut engine, &["zabcz"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].begin.offset, 1);
    }

    #[test]
    #[should_panic(expected = "without a compiled pattern")]
    fn test_advance_without_pattern_panics() {
        let mut engine = SearchEngine::new(SearchConfig::default());
        engine.feed("text");
        engine.advance();
    }

    proptest! {
        #[test]
        fn prop_chunking_does_not_change_literal_matches(
            haystack in "[abc ]{0,40}",
            pattern in "[abc]{1,4}",
            points in proptest::collection::vec(0usize..64, 0..6),
        ) {
            let config = SearchConfig { case_sensitive: true, ..SearchConfig::default() };
            let whole = first_match(&pattern, config, &[&haystack]);
            let chunks = split_at_points(&haystack, &points);
            prop_assert_eq!(first_match(&pattern, config, &chunks), whole);

            let compact: String = haystack.chars().filter(|c| *c != ' ').collect();
            let oracle = regex::Regex::new(&regex::escape(&pattern)).unwrap();
            prop_assert_eq!(whole.is_some(), oracle.is_match(&compact));
        }

        #[test]
        fn prop_literal_matches_agree_with_regex(
            haystack in "[ab]{0,40}",
            pattern in "[ab]{1,5}",
        ) {
            let config = SearchConfig { case_sensitive: true, ..SearchConfig::default() };
            let oracle = regex::Regex::new(&regex::escape(&pattern)).unwrap();
            let expected = oracle.find(&haystack).map(|m| (m.start(), m.end() - 1));
            prop_assert_eq!(first_match(&pattern, config, &[&haystack]), expected);
        }

        #[test]
        fn prop_case_swaps_do_not_change_matches(
            haystack in "[a-dA-D]{0,30}",
            pattern in "[a-dA-D]{1,4}",
            mask in proptest::collection::vec(any::<bool>(), 30),
        ) {
            let swapped: String = haystack
                .chars()
                .zip(mask.iter().cycle())
                .map(|(c, flip)| {
                    if *flip && c.is_ascii_lowercase() {
                        c.to_ascii_uppercase()
                    } else if *flip {
                        c.to_ascii_lowercase()
                    } else {
                        c
                    }
                })
                .collect();
            let config = SearchConfig::default();
            prop_assert_eq!(
                first_match(&pattern, config, &[&haystack]),
                first_match(&pattern, config, &[&swapped])
            );
        }

        #[test]
        fn prop_hyphen_at_boundary_keeps_match(
            haystack in "[ab]{1,30}",
            pattern in "[ab]{1,4}",
            points in proptest::collection::vec(0usize..32, 1..5),
        ) {
            let config = SearchConfig { hyphen_tolerant: true, ..SearchConfig::default() };
            let plain = first_match(&pattern, config, &[&haystack]);

            let hyphenated: Vec<String> = split_at_points(&haystack, &points)
                .into_iter()
                .map(|chunk| format!("{chunk}-"))
                .collect();
            let chunks: Vec<&str> = hyphenated.iter().map(String::as_str).collect();
            let joined = hyphenated.concat();
            let unhyphenate = |offset: usize| {
                offset - joined.chars().take(offset).filter(|c| *c == '-').count()
            };

            let split = first_match(&pattern, config, &chunks)
                .map(|(begin, end)| (unhyphenate(begin), unhyphenate(end)));
            prop_assert_eq!(split, plain);
        }

        #[test]
        fn prop_backward_scan_finds_last_occurrence(
            haystack in "[abc]{0,40}",
            pattern in "[abc]{1,4}",
            points in proptest::collection::vec(0usize..64, 0..6),
        ) {
            let config = SearchConfig {
                case_sensitive: true,
                direction: Direction::Backward,
                ..SearchConfig::default()
            };
            let chunks = split_at_points(&haystack, &points);
            let expected = haystack
                .rfind(pattern.as_str())
                .map(|start| (start, start + pattern.len() - 1));
            prop_assert_eq!(first_match(&pattern, config, &chunks), expected);
        }

        #[test]
        fn prop_compile_twice_accepts_same_language(
            haystack in "[abc]{0,30}",
            pattern in "[abc.]{1,5}",
        ) {
            let config = wildcard();
            let mut once = SearchEngine::new(config);
            let mut twice = SearchEngine::new(config);
            let compiled = once.compile(&pattern);
            let _ = twice.compile(&pattern);
            let recompiled = twice.compile(&pattern);
            prop_assert_eq!(compiled.is_ok(), recompiled.is_ok());
            if compiled.is_ok() {
                prop_assert_eq!(once.automaton(), twice.automaton());
                prop_assert_eq!(scan_all(&mut once, &[&haystack]), scan_all(&mut twice, &[&haystack]));
            }
        }
    }
}
