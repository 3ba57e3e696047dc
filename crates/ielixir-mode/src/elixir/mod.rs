//! The Elixir grammar.
//!
//! Scanning is split in two layers. The frame on top of
//! [`ScannerState::frames`] scans one token and reports a [`Style`] plus an
//! optional structural [`Marker`]; [`ElixirGrammar::token`] then classifies
//! raw identifiers and updates the scope stack, the parameter-list flag and
//! the line-continuation flag from that pair.
//!
//! Literals that may not end on the current line (strings, regex and
//! sigil literals, heredocs, `"""` blocks) stay on the frame stack, so the
//! state left after a line is everything needed to resume on the next one.

mod base;
mod keywords;
mod literals;
mod state;

#[cfg(test)]
mod tests;

pub use state::{
    Bracket, ContextFrame, ContextKind, Frame, LastToken, Marker, Quoted, ScannerState,
};

use keywords::Directive;

use crate::{LexerOptions, LineCursor, Style};

/// Style of a scan step before identifiers are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Class {
    Styled(Style),
    Ident,
}

/// Result of one scan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scan {
    pub(crate) class: Class,
    pub(crate) marker: Option<Marker>,
}

impl Scan {
    fn styled(style: Style) -> Self {
        Self {
            class: Class::Styled(style),
            marker: None,
        }
    }

    fn marker(marker: Marker) -> Self {
        Self {
            class: Class::Styled(Style::None),
            marker: Some(marker),
        }
    }

    fn ident() -> Self {
        Self {
            class: Class::Ident,
            marker: None,
        }
    }
}

/// Lets the frame on top of the stack scan the next token.
pub(crate) fn scan(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    match state.top_frame() {
        Frame::Base => base::token_base(cur, state),
        Frame::Quoted(_) => literals::read_quoted(cur, state),
        Frame::Heredoc { .. } => literals::read_heredoc(cur, state),
        Frame::BlockComment => literals::read_block_comment(cur, state),
        Frame::UntilBrace { .. } => literals::until_brace(cur, state),
        Frame::Once { .. } => literals::once(cur, state),
    }
}

/// Tokenizer for Elixir source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElixirGrammar {
    options: LexerOptions,
}

impl ElixirGrammar {
    #[must_use]
    pub fn new(options: LexerOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    #[must_use]
    pub fn start_state(&self) -> ScannerState {
        ScannerState::new(&self.options)
    }

    /// Scans one token starting at the cursor and returns its style.
    pub fn token(&self, cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Style {
        state.repair(&self.options);
        if cur.sol() {
            state.indented = i64::try_from(cur.indentation()).unwrap_or(i64::MAX);
        }

        let Scan { class, marker } = scan(cur, state);

        let mut keyword = None;
        let mut directive = None;
        let style = match class {
            Class::Styled(style) => style,
            Class::Ident => {
                let word = cur.current();
                let style = classify(word, state);
                if style == Style::Keyword {
                    directive = keyword_directive(word, cur, state);
                    keyword = Some(word);
                }
                style
            }
        };

        if marker.is_some() || !matches!(style, Style::None | Style::Comment) {
            state.last_token = Some(match (marker, keyword) {
                (Some(marker), _) => LastToken::Marker(marker),
                (None, Some(word)) => LastToken::Keyword(word.to_owned()),
                (None, None) => LastToken::Other,
            });
        }

        if marker == Some(Marker::Pipe) {
            state.var_list = !state.var_list;
        }

        match (directive, marker) {
            (_, Some(Marker::Open(bracket))) => state.push_context(ContextKind::Bracket(bracket)),
            (Some(Directive::Indent), _) => state.push_context(ContextKind::Keyword),
            (Some(Directive::Dedent), _) | (_, Some(Marker::Close(_))) => state.pop_context(),
            _ => {}
        }

        if cur.eol() {
            state.continued_line = marker == Some(Marker::Backslash)
                || matches!(style, Style::Operator | Style::Punctuation);
        }

        style
    }

    /// Called for a line with no characters.
    pub fn blank_line(&self, state: &mut ScannerState) {
        state.continued_line = false;
    }
}

fn classify(word: &str, state: &ScannerState) -> Style {
    let last = state.last_token.as_ref();
    if last.is_some_and(|last| last.is_marker(Marker::Dot)) {
        Style::Property
    } else if keywords::is_keyword(word) {
        Style::Keyword
    } else if word.starts_with(|c: char| c.is_ascii_uppercase()) {
        Style::ConstantTag
    } else if state.var_list
        || matches!(last, Some(LastToken::Keyword(k)) if keywords::is_definition_word(k))
    {
        Style::Definition
    } else {
        Style::Identifier
    }
}

fn keyword_directive(word: &str, cur: &LineCursor<'_>, state: &ScannerState) -> Option<Directive> {
    if keywords::is_indent_word(word) {
        Some(Directive::Indent)
    } else if keywords::is_dedent_word(word) {
        Some(Directive::Dedent)
    } else if matches!(word, "if" | "unless") && cur.column() == cur.indentation() {
        Some(Directive::Indent)
    } else if word == "do" && state.current_context().indented < state.indented {
        Some(Directive::Indent)
    } else {
        None
    }
}
