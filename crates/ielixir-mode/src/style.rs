//! Token classifications produced by the grammars.
//!
//! Every scan step yields one [`Token`]: the number of bytes it consumed from
//! the line and the [`Style`] the consumer should render it with. Tokens of a
//! line are contiguous, so concatenating their spans gives back the line.
//!
//! # Examples
//!
//! ```
//! use ielixir_mode::{Grammar, LexerOptions, Style, Token, tokenize_line};
//!
//! let grammar = Grammar::elixir(LexerOptions::default());
//! let mut state = grammar.start_state();
//! let tokens = tokenize_line(&grammar, &mut state, "def run");
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::new(3, Style::Keyword),
//!         Token::new(1, Style::None),
//!         Token::new(3, Style::Definition),
//!     ]
//! );
//! ```

use core::fmt;

/// Which side of an embedded region a delimiter token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum DelimiterSide {
    Open,
    Close,
}

/// Classification tag of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Style {
    /// Structural or blank text that is not rendered.
    #[default]
    None,
    Identifier,
    Keyword,
    /// Capitalized module or constant reference.
    ConstantTag,
    /// A name bound by a definition keyword or a `|..|` parameter list.
    Definition,
    /// A name accessed with `.`.
    Property,
    String,
    InterpolatedString,
    RegexLiteral,
    Atom,
    Number,
    Comment,
    Operator,
    Punctuation,
    ModuleAttribute,
    GlobalVariable,
    /// `->`
    Arrow,
    /// `|>`
    Pipe,
    /// Text that opens or closes an embedded region.
    Delimiter(DelimiterSide),
}

impl Style {
    /// Short, stable name for the style, suitable for CSS classes and test
    /// output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Style::None => "none",
            Style::Identifier => "identifier",
            Style::Keyword => "keyword",
            Style::ConstantTag => "tag",
            Style::Definition => "def",
            Style::Property => "property",
            Style::String => "string",
            Style::InterpolatedString => "string-interp",
            Style::RegexLiteral => "regex",
            Style::Atom => "atom",
            Style::Number => "number",
            Style::Comment => "comment",
            Style::Operator => "operator",
            Style::Punctuation => "punctuation",
            Style::ModuleAttribute => "attribute",
            Style::GlobalVariable => "global",
            Style::Arrow => "arrow",
            Style::Pipe => "pipe",
            Style::Delimiter(DelimiterSide::Open) => "delimit-open",
            Style::Delimiter(DelimiterSide::Close) => "delimit-close",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified span of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Token {
    /// Length of the span in bytes.
    pub len: usize,
    pub style: Style,
}

impl Token {
    #[must_use]
    pub const fn new(len: usize, style: Style) -> Self {
        Self { len, style }
    }
}

/// Pairs each token of `line` with the text it covers.
///
/// The tokens must have been produced for `line`; spans past the end are cut
/// short.
pub fn spans<'a>(line: &'a str, tokens: &'a [Token]) -> impl Iterator<Item = (&'a str, Style)> + 'a {
    let mut offset = 0;
    tokens.iter().map(move |token| {
        let start = offset.min(line.len());
        let end = (offset + token.len).min(line.len());
        offset += token.len;
        (&line[start..end], token.style)
    })
}
