//! Grammars as a closed set, and the per-line driver.

use crate::{
    LexerOptions, LineCursor, Style, Token,
    elixir::{ElixirGrammar, ScannerState},
    multiplex::{MultiplexState, Multiplexer},
    r::{RGrammar, RState},
};

/// How many times a grammar may return without consuming anything before the
/// driver skips a character for it.
const MAX_STALLED_STEPS: usize = 10;

/// A tokenizer for one language, or a composition of several.
#[derive(Debug, Clone)]
pub enum Grammar {
    Elixir(ElixirGrammar),
    /// Consumes whole lines unstyled.
    PlainText,
    R(RGrammar),
    Multiplex(Box<Multiplexer>),
}

/// Line-to-line state of a [`Grammar`]. Cloning it is how hosts checkpoint a
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum GrammarState {
    Elixir(Box<ScannerState>),
    PlainText,
    R(RState),
    Multiplex(Box<MultiplexState>),
}

impl Grammar {
    #[must_use]
    pub fn elixir(options: LexerOptions) -> Self {
        Grammar::Elixir(ElixirGrammar::new(options))
    }

    /// Elixir with `:!` directives and `[r| .. |]` snippets, as used in
    /// notebook cells.
    #[must_use]
    pub fn ielixir(options: LexerOptions) -> Self {
        Grammar::Multiplex(Box::new(Multiplexer::ielixir(options)))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Grammar::Elixir(_) => "elixir",
            Grammar::PlainText => "text/plain",
            Grammar::R(_) => "r",
            Grammar::Multiplex(_) => "multiplex",
        }
    }

    #[must_use]
    pub fn start_state(&self) -> GrammarState {
        match self {
            Grammar::Elixir(grammar) => GrammarState::Elixir(Box::new(grammar.start_state())),
            Grammar::PlainText => GrammarState::PlainText,
            Grammar::R(grammar) => GrammarState::R(grammar.start_state()),
            Grammar::Multiplex(grammar) => GrammarState::Multiplex(Box::new(grammar.start_state())),
        }
    }

    /// Comment marker used for line comments, if the language has one.
    #[must_use]
    pub fn line_comment(&self) -> Option<&'static str> {
        match self {
            Grammar::Elixir(_) | Grammar::R(_) => Some("#"),
            Grammar::PlainText => None,
            Grammar::Multiplex(grammar) => grammar.outer().line_comment(),
        }
    }

    #[must_use]
    pub fn tab_size(&self) -> u32 {
        match self {
            Grammar::Elixir(grammar) => grammar.options().tab_size,
            Grammar::Multiplex(grammar) => grammar.outer().tab_size(),
            Grammar::PlainText | Grammar::R(_) => LexerOptions::default().tab_size,
        }
    }

    fn owns(&self, state: &GrammarState) -> bool {
        matches!(
            (self, state),
            (Grammar::Elixir(_), GrammarState::Elixir(_))
                | (Grammar::PlainText, GrammarState::PlainText)
                | (Grammar::R(_), GrammarState::R(_))
                | (Grammar::Multiplex(_), GrammarState::Multiplex(_))
        )
    }

    fn ensure_owned(&self, state: &mut GrammarState) {
        if !self.owns(state) {
            tracing::warn!(
                grammar = self.name(),
                "state belongs to another grammar; restarting from the start state"
            );
            *state = self.start_state();
        }
    }

    /// Scans one token at the cursor. May return without consuming anything
    /// when control passes between grammars.
    pub fn token(&self, cur: &mut LineCursor<'_>, state: &mut GrammarState) -> Style {
        self.ensure_owned(state);
        match (self, state) {
            (Grammar::Elixir(grammar), GrammarState::Elixir(state)) => grammar.token(cur, state),
            (Grammar::R(grammar), GrammarState::R(state)) => grammar.token(cur, state),
            (Grammar::Multiplex(grammar), GrammarState::Multiplex(state)) => {
                grammar.token(cur, state)
            }
            // Plain text, or a state mismatch `ensure_owned` already repaired.
            _ => {
                cur.skip_to_end();
                Style::None
            }
        }
    }

    /// Lets the grammar observe a line with no characters.
    pub fn blank_line(&self, state: &mut GrammarState) {
        self.ensure_owned(state);
        match (self, state) {
            (Grammar::Elixir(grammar), GrammarState::Elixir(state)) => grammar.blank_line(state),
            (Grammar::R(grammar), GrammarState::R(state)) => grammar.blank_line(state),
            (Grammar::Multiplex(grammar), GrammarState::Multiplex(state)) => {
                grammar.blank_line(state);
            }
            _ => {}
        }
    }
}

/// Tokenizes one line (without its terminator), updating `state` in place.
///
/// The returned tokens cover the line exactly: their lengths add up to
/// `line.len()`. An empty line yields no tokens.
///
/// ```
/// use ielixir_mode::{Grammar, LexerOptions, Style, spans, tokenize_line};
///
/// let grammar = Grammar::elixir(LexerOptions::default());
/// let mut state = grammar.start_state();
/// let line = "x = :ok";
/// let tokens = tokenize_line(&grammar, &mut state, line);
/// let atoms: Vec<_> = spans(line, &tokens)
///     .filter(|(_, style)| *style == Style::Atom)
///     .collect();
/// assert_eq!(atoms, vec![(":ok", Style::Atom)]);
/// ```
pub fn tokenize_line(grammar: &Grammar, state: &mut GrammarState, line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    if line.is_empty() {
        grammar.blank_line(state);
        return tokens;
    }

    let mut cur = LineCursor::new(line, grammar.tab_size());
    let mut stalled = 0;
    while !cur.eol() {
        cur.begin_token();
        let style = grammar.token(&mut cur, state);
        let len = cur.pos() - cur.start();
        if len > 0 {
            stalled = 0;
            tokens.push(Token::new(len, style));
            continue;
        }

        stalled += 1;
        if stalled >= MAX_STALLED_STEPS {
            tracing::warn!(
                grammar = grammar.name(),
                pos = cur.pos(),
                "grammar failed to advance; skipping one character"
            );
            cur.next_char();
            tokens.push(Token::new(cur.pos() - cur.start(), Style::None));
            stalled = 0;
        }
    }
    tokens
}
