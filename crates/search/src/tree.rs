//! Compilation of a pattern into a chain of states with KMP-style
//! fallback links.

use crate::engine::{Direction, SearchConfig};
use crate::error::CompileError;
use crate::pattern::{LexOptions, fold_text, lex, reverse_pattern};
use crate::state::{ROOT, State, StateId, Symbol};

fn lex_symbols(pattern: &str, options: LexOptions) -> Result<Vec<Symbol>, CompileError> {
    Ok(lex(pattern, options)?
        .into_iter()
        .filter_map(|token| token.symbol)
        .collect())
}

/// A compiled pattern: states in pattern order, state `0` is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Vec<State>,
}

impl Automaton {
    /// Compiles `pattern` for the given flags. Backward scans get the
    /// token-reversed chain.
    pub fn compile(pattern: &str, config: &SearchConfig) -> Result<Self, CompileError> {
        let pattern = if config.case_sensitive {
            pattern.to_string()
        } else {
            fold_text(pattern)
        };

        let options = LexOptions {
            mode: config.mode,
            skip_hyphens: config.hyphen_tolerant,
        };
        let symbols = lex_symbols(&pattern, options)?;
        let symbols = match config.direction {
            Direction::Forward => symbols,
            // The forward lex succeeded, so every token survives reversal whole.
            Direction::Backward => lex_symbols(&reverse_pattern(&pattern, config.mode), options)?,
        };

        Self::from_symbols(symbols)
    }

    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self, CompileError> {
        let (Some(first), Some(last)) = (symbols.first(), symbols.last()) else {
            return Err(CompileError::EmptyPattern);
        };
        if first.is_repeat() || last.is_repeat() {
            return Err(CompileError::EdgeRepetition);
        }

        Ok(Self::build(symbols))
    }

    fn build(symbols: Vec<Symbol>) -> Self {
        let mut states: Vec<State> = symbols
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| State::new(id, symbol))
            .collect();

        let len = states.len();
        for id in 1..len {
            states[id - 1].on_match = Some(id);
        }

        // `working` holds the fallback of the previously appended state.
        // State 1 always falls back to the root, so the walk starts at 2.
        let mut working = ROOT;
        for id in 2..len {
            let appended = &states[id - 1].symbol;
            working = loop {
                if states[working].symbol.covers(appended) {
                    break working + 1;
                }
                if working == ROOT {
                    break ROOT;
                }
                working = states[working].on_mismatch;
            };
            states[id].on_mismatch = working;
        }

        Self { states }
    }

    /// The same language read right to left.
    pub fn reversed(&self) -> Self {
        let symbols = self
            .states
            .iter()
            .rev()
            .map(|state| state.symbol.clone())
            .collect();
        Self::build(symbols)
    }

    pub fn root(&self) -> &State {
        &self.states[ROOT]
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// True when every state matches exactly one fixed character.
    pub fn is_literal(&self) -> bool {
        self.states
            .iter()
            .all(|state| matches!(state.symbol, Symbol::Char(_)))
    }
}
