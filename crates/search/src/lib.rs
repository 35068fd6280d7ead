//! Incremental pattern search over text that arrives in fragments.

mod document;
mod engine;
mod error;
mod matcher;
mod pattern;
mod session;
mod state;
mod tree;

pub use document::{Document, Fragment, Page, TextDocument};
pub use engine::{Direction, Found, Position, SearchConfig, SearchEngine, SearchMode, Step};
pub use error::{CompileError, DocumentError};
pub use matcher::{ResultStep, SearchMatch, SearchResults, TextPoint};
pub use pattern::{fold_case, fold_text, is_hyphen, reverse_pattern, reverse_text};
pub use session::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT, SearchOutcome, SearchSession};
pub use state::{CharSet, ROOT, State, StateId, Symbol};
pub use tree::Automaton;
