//! Incremental highlighting of a whole buffer.
//!
//! What it does
//! - Keeps, per line, the tokens and the grammar state at the end of the
//!   line (a checkpoint).
//! - Edits invalidate checkpoints from the first touched line on; nothing is
//!   rescanned until tokens are asked for.
//! - Rescanning resumes from the nearest valid checkpoint above the
//!   requested line. When a rescanned line ends in the same state it ended in
//!   before, the checkpoints below it are still good and scanning stops
//!   early.
//!
//! Invariants
//! - Lines `0..valid` have checkpoints computed from the current text and
//!   from the end state of the line above.
//! - A line below `valid` that is not marked stale has a checkpoint computed
//!   from the end state its upper neighbour has now, or had when that
//!   neighbour was last scanned with an identical result.

use std::{ops::Range, sync::Arc};

use crate::{Grammar, GrammarState, ModeError, Token, tokenize_line};

#[derive(Debug, Clone)]
struct Checkpoint {
    tokens: Vec<Token>,
    end_state: GrammarState,
}

#[derive(Debug, Clone)]
struct Line {
    text: String,
    checkpoint: Option<Checkpoint>,
    /// The checkpoint no longer matches the text or the state above.
    stale: bool,
}

impl Line {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checkpoint: None,
            stale: true,
        }
    }

    fn reusable(&self) -> bool {
        !self.stale && self.checkpoint.is_some()
    }
}

/// A buffer of lines with lazily computed, checkpointed tokens.
///
/// ```
/// use ielixir_mode::{Grammar, Highlighter, LexerOptions, Style};
///
/// let mut highlighter = Highlighter::new(Grammar::elixir(LexerOptions::default()));
/// highlighter.set_text("x = 1\n\"\"\"\nnotes\n\"\"\"");
/// let tokens = highlighter.line_tokens(2).unwrap();
/// assert_eq!(tokens[0].style, Style::Comment);
/// ```
#[derive(Debug, Clone)]
pub struct Highlighter {
    grammar: Arc<Grammar>,
    lines: Vec<Line>,
    valid: usize,
}

impl Highlighter {
    pub fn new(grammar: impl Into<Arc<Grammar>>) -> Self {
        Self {
            grammar: grammar.into(),
            lines: Vec::new(),
            valid: 0,
        }
    }

    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Replaces the whole buffer. Lines are split on `\n`; a trailing `\r`
    /// is dropped from each line.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text
            .split('\n')
            .map(|line| Line::new(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        self.valid = 0;
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|line| line.text.as_str())
    }

    /// Number of leading lines whose checkpoints are known to be current.
    #[must_use]
    pub fn valid_lines(&self) -> usize {
        self.valid
    }

    /// # Errors
    ///
    /// [`ModeError::LineOutOfRange`] when `index` is not a line of the
    /// buffer.
    pub fn replace_line(&mut self, index: usize, text: impl Into<String>) -> Result<(), ModeError> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(ModeError::LineOutOfRange { index, len })?;
        line.text = text.into();
        line.stale = true;
        self.invalidate_from(index);
        Ok(())
    }

    /// Inserts `lines` before line `at` (`at == line_count()` appends).
    ///
    /// # Errors
    ///
    /// [`ModeError::LineOutOfRange`] when `at` is past the end.
    pub fn insert_lines<I, S>(&mut self, at: usize, lines: I) -> Result<(), ModeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let len = self.lines.len();
        if at > len {
            return Err(ModeError::LineOutOfRange { index: at, len });
        }
        self.lines.splice(at..at, lines.into_iter().map(Line::new));
        self.invalidate_from(at);
        Ok(())
    }

    /// # Errors
    ///
    /// [`ModeError::LineOutOfRange`] when the range reaches past the end.
    pub fn remove_lines(&mut self, range: Range<usize>) -> Result<(), ModeError> {
        let len = self.lines.len();
        if range.start > range.end || range.end > len {
            return Err(ModeError::LineOutOfRange {
                index: range.end,
                len,
            });
        }
        let at = range.start;
        self.lines.drain(range);
        // The line that moved up now follows a different line.
        if let Some(line) = self.lines.get_mut(at) {
            line.stale = true;
        }
        self.invalidate_from(at);
        Ok(())
    }

    /// Tokens of line `index`, scanning whatever is needed above it.
    pub fn line_tokens(&mut self, index: usize) -> Option<&[Token]> {
        if index >= self.lines.len() {
            return None;
        }
        self.scan_through(index);
        self.lines[index]
            .checkpoint
            .as_ref()
            .map(|checkpoint| checkpoint.tokens.as_slice())
    }

    /// Grammar state at the end of line `index`.
    pub fn state_after(&mut self, index: usize) -> Option<&GrammarState> {
        if index >= self.lines.len() {
            return None;
        }
        self.scan_through(index);
        self.lines[index]
            .checkpoint
            .as_ref()
            .map(|checkpoint| &checkpoint.end_state)
    }

    fn invalidate_from(&mut self, index: usize) {
        self.valid = self.valid.min(index);
    }

    fn scan_through(&mut self, index: usize) {
        while self.valid <= index {
            let current = self.valid;
            let mut state = match current.checked_sub(1) {
                Some(above) => self.lines[above]
                    .checkpoint
                    .as_ref()
                    .map_or_else(|| self.grammar.start_state(), |c| c.end_state.clone()),
                None => self.grammar.start_state(),
            };

            let line = &mut self.lines[current];
            let tokens = tokenize_line(&self.grammar, &mut state, &line.text);
            let unchanged = line
                .checkpoint
                .as_ref()
                .is_some_and(|old| old.end_state == state);
            line.checkpoint = Some(Checkpoint {
                tokens,
                end_state: state,
            });
            line.stale = false;
            self.valid = current + 1;

            if unchanged {
                let skipped_from = self.valid;
                while self.lines.get(self.valid).is_some_and(Line::reusable) {
                    self.valid += 1;
                }
                tracing::trace!(
                    line = current,
                    reused = self.valid - skipped_from,
                    "end state unchanged; reusing checkpoints below"
                );
            } else if let Some(next) = self.lines.get_mut(self.valid) {
                next.stale = true;
            }
        }
    }
}
