//! Pattern lexing for the literal and wildcard dialects, plus the
//! reversal helpers used for backward scans.
//!
//! Wildcard dialect:
//! - `\x` escaped literal
//! - `[abc]`, `[a-z]` character sets (ranges are inclusive)
//! - `.` any single character
//! - `x*` zero or more `x` (possessive), where `x` is a character, escape or set

use crate::engine::SearchMode;
use crate::error::CompileError;
use crate::state::{CharSet, Symbol};

/// One lexed unit of pattern text. Whitespace and tolerated hyphens keep
/// their source text but produce no symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub symbol: Option<Symbol>,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LexOptions {
    pub mode: SearchMode,
    pub skip_hyphens: bool,
}

pub(crate) fn lex(pattern: &str, options: LexOptions) -> Result<Vec<Token>, CompileError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let start = pos;
        let ch = chars[pos];

        if is_insignificant(ch, options.skip_hyphens) {
            pos += 1;
            tokens.push(Token {
                symbol: None,
                source: ch.to_string(),
            });
            continue;
        }

        if options.mode == SearchMode::Literal {
            pos += 1;
            tokens.push(Token {
                symbol: Some(Symbol::Char(ch)),
                source: ch.to_string(),
            });
            continue;
        }

        let symbol = match ch {
            '\\' => {
                let escaped = *chars.get(pos + 1).ok_or(CompileError::TrailingEscape)?;
                pos += 2;
                if is_insignificant(escaped, options.skip_hyphens) {
                    tokens.push(Token {
                        symbol: None,
                        source: chars[start..pos].iter().collect(),
                    });
                    continue;
                }
                Symbol::Char(escaped)
            }
            '[' => {
                let (set, next) = lex_set(&chars, pos)?;
                pos = next;
                Symbol::Set(set)
            }
            '.' => {
                pos += 1;
                Symbol::Any
            }
            '*' => return Err(CompileError::NothingToRepeat(pos)),
            _ => {
                pos += 1;
                Symbol::Char(ch)
            }
        };

        let symbol = if chars.get(pos) == Some(&'*') {
            if symbol == Symbol::Any {
                return Err(CompileError::NothingToRepeat(pos));
            }
            pos += 1;
            Symbol::Repeat(Box::new(symbol))
        } else {
            symbol
        };

        tokens.push(Token {
            symbol: Some(symbol),
            source: chars[start..pos].iter().collect(),
        });
    }

    Ok(tokens)
}

/// Parses the set opened at `open`, returning it and the index just past `]`.
fn lex_set(chars: &[char], open: usize) -> Result<(CharSet, usize), CompileError> {
    let mut pos = open + 1;
    let mut members = Vec::new();

    loop {
        let Some(&ch) = chars.get(pos) else {
            return Err(CompileError::UnterminatedSet(open));
        };

        match ch {
            ']' => break,
            '\\' => {
                let Some(&escaped) = chars.get(pos + 1) else {
                    return Err(CompileError::UnterminatedSet(open));
                };
                members.push(escaped);
                pos += 2;
            }
            _ => {
                if chars.get(pos + 1) == Some(&'-')
                    && let Some(&end) = chars.get(pos + 2)
                    && end != ']'
                {
                    if ch > end {
                        return Err(CompileError::InvalidRange { start: ch, end });
                    }
                    members.extend(ch..=end);
                    pos += 3;
                } else {
                    members.push(ch);
                    pos += 1;
                }
            }
        }
    }

    if members.is_empty() {
        return Err(CompileError::EmptySet(open));
    }

    Ok((CharSet::new(members), pos + 1))
}

/// Whitespace never takes part in a match; hyphens only when tolerated.
pub(crate) fn is_insignificant(ch: char, skip_hyphens: bool) -> bool {
    ch.is_whitespace() || (skip_hyphens && is_hyphen(ch))
}

pub fn is_hyphen(ch: char) -> bool {
    matches!(ch, '-' | '\u{00AD}' | '\u{2010}' | '\u{2011}')
}

/// Lower-cases one character without changing text length.
pub fn fold_case(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}

pub fn fold_text(text: &str) -> String {
    text.chars().map(fold_case).collect()
}

pub fn reverse_text(text: &str) -> String {
    text.chars().rev().collect()
}

/// Reverses token order while keeping each escape, set and repetition
/// intact. A pattern that does not lex is reversed character by character;
/// compiling it reports the error anyway.
pub fn reverse_pattern(pattern: &str, mode: SearchMode) -> String {
    if mode == SearchMode::Literal {
        return reverse_text(pattern);
    }

    let options = LexOptions {
        mode,
        skip_hyphens: false,
    };
    match lex(pattern, options) {
        Ok(tokens) => tokens
            .iter()
            .rev()
            .map(|token| token.source.as_str())
            .collect(),
        Err(_) => reverse_text(pattern),
    }
}
