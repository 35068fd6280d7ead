/// Index of a state inside an [`Automaton`](crate::Automaton).
pub type StateId = usize;

/// The root is always the first compiled symbol.
pub const ROOT: StateId = 0;

/// Sorted, deduplicated members of a `[...]` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet {
    members: Vec<char>,
}

impl CharSet {
    pub fn new(mut members: Vec<char>) -> Self {
        members.sort_unstable();
        members.dedup();
        Self { members }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.members.binary_search(&ch).is_ok()
    }

    pub fn members(&self) -> &[char] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn is_superset_of(&self, other: &CharSet) -> bool {
        other.members.iter().all(|ch| self.contains(*ch))
    }
}

/// What a single compiled pattern position accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Char(char),
    Set(CharSet),
    Any,
    /// Zero or more of the inner symbol, consumed possessively.
    Repeat(Box<Symbol>),
}

impl Symbol {
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            Symbol::Char(expected) => *expected == ch,
            Symbol::Set(set) => set.contains(ch),
            Symbol::Any => true,
            Symbol::Repeat(inner) => inner.accepts(ch),
        }
    }

    /// True when every character `other` accepts is also accepted here.
    ///
    /// Fallback links may only reuse a partial match through states that
    /// cover what was actually consumed. Repetitions consume a variable
    /// amount of text, so they neither cover nor are covered.
    pub fn covers(&self, other: &Symbol) -> bool {
        match (self, other) {
            (Symbol::Repeat(_), _) | (_, Symbol::Repeat(_)) => false,
            (Symbol::Any, _) => true,
            (_, Symbol::Any) => false,
            (Symbol::Char(a), Symbol::Char(b)) => a == b,
            (Symbol::Char(a), Symbol::Set(set)) => set.members() == [*a],
            (Symbol::Set(set), Symbol::Char(b)) => set.contains(*b),
            (Symbol::Set(a), Symbol::Set(b)) => a.is_superset_of(b),
        }
    }

    pub fn is_repeat(&self) -> bool {
        matches!(self, Symbol::Repeat(_))
    }
}

/// One position of the compiled chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub id: StateId,
    pub symbol: Symbol,
    /// `None` on the final state.
    pub on_match: Option<StateId>,
    /// The root falls back to itself.
    pub on_mismatch: StateId,
}

impl State {
    pub fn new(id: StateId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            on_match: None,
            on_mismatch: ROOT,
        }
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT
    }

    pub fn is_final(&self) -> bool {
        self.on_match.is_none()
    }
}
