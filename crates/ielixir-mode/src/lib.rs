//! Line-oriented syntax tokenizing for Elixir notebook cells.
//!
//! The crate turns one line at a time into a list of [`Token`]s, carrying a
//! [`GrammarState`] from each line to the next. The Elixir grammar handles
//! multi-line literals (strings, sigils, heredocs, `"""` blocks) and
//! `#{..}` interpolation by keeping a stack of sub-scanners in that state.
//! A [`Multiplexer`] composes grammars, which is how `:!` directives and
//! `[r| .. |]` snippets are highlighted inside notebook cells.
//!
//! ```
//! use ielixir_mode::{Grammar, LexerOptions, Style, spans, tokenize_line};
//!
//! let grammar = Grammar::ielixir(LexerOptions::default());
//! let mut state = grammar.start_state();
//!
//! let mut styled = Vec::new();
//! for line in ["x = [r| mean(c(1, 2)) |]", ":!pip install numpy"] {
//!     let tokens = tokenize_line(&grammar, &mut state, line);
//!     styled.extend(spans(line, &tokens).map(|(text, style)| (text.to_owned(), style)));
//! }
//! assert!(styled.contains(&("mean".to_owned(), Style::Identifier)));
//! assert!(styled.contains(&("!pip install numpy".to_owned(), Style::None)));
//! ```

#![allow(missing_docs)]

mod cursor;
mod elixir;
mod error;
mod grammar;
mod highlighter;
mod multiplex;
mod options;
mod pattern;
mod r;
mod registry;
mod style;


pub use cursor::LineCursor;
pub use elixir::{
    Bracket, ContextFrame, ContextKind, ElixirGrammar, Frame, LastToken, Marker, Quoted,
    ScannerState,
};
pub use error::ModeError;
pub use grammar::{Grammar, GrammarState, tokenize_line};
pub use highlighter::Highlighter;
pub use multiplex::{MultiplexState, Multiplexer, Region};
pub use options::LexerOptions;
pub use pattern::Pattern;
pub use r::{RGrammar, RState};
pub use registry::{ModeInfo, ModeRegistry};
pub use style::{DelimiterSide, Style, Token, spans};
