//! Scanner state carried from one line to the next.

use crate::{LexerOptions, Style};

/// Bracket flavours that open and close scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Bracket {
    Paren,
    Square,
    Curly,
}

/// Structural marker reported by a scan step next to its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Marker {
    Open(Bracket),
    Close(Bracket),
    Backslash,
    Semicolon,
    /// A `|` delimiting a block parameter list.
    Pipe,
    /// A lone `.` before a property name.
    Dot,
}

impl Marker {
    pub(crate) fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            '(' => Marker::Open(Bracket::Paren),
            '[' => Marker::Open(Bracket::Square),
            '{' => Marker::Open(Bracket::Curly),
            ')' => Marker::Close(Bracket::Paren),
            ']' => Marker::Close(Bracket::Square),
            '}' => Marker::Close(Bracket::Curly),
            '\\' => Marker::Backslash,
            ';' => Marker::Semicolon,
            _ => return None,
        })
    }
}

/// The most recent significant token, as far as classification cares.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum LastToken {
    Marker(Marker),
    Keyword(String),
    /// Any other styled token.
    Other,
}

impl LastToken {
    pub(crate) fn is_marker(&self, marker: Marker) -> bool {
        matches!(self, LastToken::Marker(m) if *m == marker)
    }

    pub(crate) fn is_keyword(&self, word: &str) -> bool {
        matches!(self, LastToken::Keyword(k) if k == word)
    }
}

/// A sub-scanner on the tokenize stack. The top frame scans the next token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Frame {
    /// The core tokenizer. Always at the bottom of the stack.
    Base,
    /// A delimited literal.
    Quoted(Quoted),
    /// Heredoc body, closed by a line holding only `tag`.
    Heredoc { tag: String, indented: bool },
    /// `"""` block, closed by a line holding only `"""`.
    BlockComment,
    /// Core tokens inside `#{ ... }`, until the brace that balances the
    /// opening one.
    UntilBrace { depth: u32 },
    /// Exactly one core token (`#@attr` / `#$global` inside a literal).
    Once { called: bool },
}

/// Parameters of a quoted literal frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Quoted {
    pub delim: char,
    pub style: Style,
    /// Whether `#{..}`, `#@` and `#$` start embedded code.
    pub interpolates: bool,
    /// Whether the delimiter closes the literal even right after a `\`.
    pub raw: bool,
    /// Set while paused on an interpolation when `delim` is `}`: the `}`
    /// that ends the interpolation must be eaten before the body resumes.
    pub resume_after_brace: bool,
}

impl Quoted {
    pub(crate) fn new(delim: char, style: Style, interpolates: bool, raw: bool) -> Self {
        Self {
            delim,
            style,
            interpolates,
            raw,
            resume_after_brace: false,
        }
    }
}

/// What opened a context frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ContextKind {
    /// Synthetic root.
    Top,
    Bracket(Bracket),
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ContextFrame {
    pub kind: ContextKind,
    /// Line indentation recorded when the frame was opened.
    pub indented: i64,
}

/// Mutable state of the Elixir grammar, checkpointed between lines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ScannerState {
    pub(crate) tokenize: Vec<Frame>,
    pub(crate) context: Vec<ContextFrame>,
    pub(crate) indented: i64,
    pub(crate) last_token: Option<LastToken>,
    pub(crate) var_list: bool,
    pub(crate) continued_line: bool,
}

impl ScannerState {
    #[must_use]
    pub fn new(options: &LexerOptions) -> Self {
        Self {
            tokenize: vec![Frame::Base],
            context: vec![ContextFrame {
                kind: ContextKind::Top,
                indented: -i64::from(options.indent_unit),
            }],
            indented: 0,
            last_token: None,
            var_list: false,
            continued_line: false,
        }
    }

    /// The active sub-scanner stack, bottom first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.tokenize
    }

    /// Open scopes, root first.
    #[must_use]
    pub fn contexts(&self) -> &[ContextFrame] {
        &self.context
    }

    #[must_use]
    pub fn last_token(&self) -> Option<&LastToken> {
        self.last_token.as_ref()
    }

    /// Whether a `|..|` parameter list is open.
    #[must_use]
    pub fn in_var_list(&self) -> bool {
        self.var_list
    }

    /// Whether the last scanned line ended mid-expression (trailing `\` or
    /// operator).
    #[must_use]
    pub fn continued_line(&self) -> bool {
        self.continued_line
    }

    /// Whether the next line starts in plain code (no literal, heredoc or
    /// comment block left open).
    #[must_use]
    pub fn at_base(&self) -> bool {
        self.tokenize.len() == 1
    }

    /// Restores the base frame and the root scope when a state (typically a
    /// deserialized checkpoint) lacks them.
    pub(crate) fn repair(&mut self, options: &LexerOptions) {
        if self.tokenize.first() != Some(&Frame::Base) {
            tracing::warn!(
                frames = self.tokenize.len(),
                "scanner state has no base frame; restoring it"
            );
            self.tokenize.insert(0, Frame::Base);
        }
        if self
            .context
            .first()
            .is_none_or(|root| root.kind != ContextKind::Top)
        {
            tracing::warn!(
                scopes = self.context.len(),
                "scanner state has no root scope; restoring it"
            );
            self.context.insert(
                0,
                ContextFrame {
                    kind: ContextKind::Top,
                    indented: -i64::from(options.indent_unit),
                },
            );
        }
    }

    pub(crate) fn top_frame(&self) -> &Frame {
        // The base frame is never popped.
        &self.tokenize[self.tokenize.len() - 1]
    }

    pub(crate) fn top_frame_mut(&mut self) -> &mut Frame {
        let top = self.tokenize.len() - 1;
        &mut self.tokenize[top]
    }

    pub(crate) fn push_frame(&mut self, frame: Frame) {
        self.tokenize.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) {
        if self.tokenize.len() > 1 {
            self.tokenize.pop();
        } else {
            tracing::error!("attempted to pop the base scanner frame");
        }
    }

    pub(crate) fn current_context(&self) -> &ContextFrame {
        &self.context[self.context.len() - 1]
    }

    pub(crate) fn push_context(&mut self, kind: ContextKind) {
        self.context.push(ContextFrame {
            kind,
            indented: self.indented,
        });
    }

    pub(crate) fn pop_context(&mut self) {
        if self.context.len() > 1 {
            self.context.pop();
        } else {
            tracing::debug!(
                indented = self.indented,
                "scope close with no open scope; ignored"
            );
        }
    }
}
