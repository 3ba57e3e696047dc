//! Cursor over a single line of input.
//!
//! What it does
//! - Tracks the byte position of the scan and the start of the token being
//!   scanned, so a grammar consumes characters and the driver reads off the
//!   token length afterwards.
//! - Offers the small set of look/eat primitives every grammar is written
//!   against (`peek`, `eat`, `eat_while`, `skip_to`, `match_str`, ...).
//! - Lets the multiplexer temporarily pull the end of the line in with
//!   [`LineCursor::limit_to`], so a grammar cannot scan into text that belongs
//!   to another region.
//!
//! Invariants
//! - `start <= pos <= end <= line.len()`, and all three are char boundaries.
//! - Moving backwards is only possible through [`LineCursor::back_up`], and
//!   never past `start`.

use bstr::ByteSlice;

/// A byte cursor over one line, without its line terminator.
#[derive(Debug, Clone)]
pub struct LineCursor<'src> {
    line: &'src str,
    end: usize,
    pos: usize,
    start: usize,
    tab_size: u32,
}

impl<'src> LineCursor<'src> {
    #[must_use]
    pub fn new(line: &'src str, tab_size: u32) -> Self {
        Self {
            line,
            end: line.len(),
            pos: 0,
            start: 0,
            tab_size: tab_size.max(1),
        }
    }

    /// The whole line, ignoring any active limit.
    #[inline]
    #[must_use]
    pub fn line(&self) -> &'src str {
        self.line
    }

    #[inline]
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Start of the token currently being scanned.
    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Marks the current position as the start of the next token.
    #[inline]
    pub(crate) fn begin_token(&mut self) {
        self.start = self.pos;
    }

    /// True at the very beginning of the line.
    #[inline]
    #[must_use]
    pub fn sol(&self) -> bool {
        self.pos == 0
    }

    /// True once the (possibly limited) end of the line is reached.
    #[inline]
    #[must_use]
    pub fn eol(&self) -> bool {
        self.pos >= self.end
    }

    /// Unread text up to the active limit.
    #[inline]
    #[must_use]
    pub fn rest(&self) -> &'src str {
        &self.line[self.pos..self.end]
    }

    /// The line up to the active limit.
    #[inline]
    #[must_use]
    pub fn visible(&self) -> &'src str {
        &self.line[..self.end]
    }

    /// Text consumed for the current token so far.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &'src str {
        &self.line[self.start..self.pos]
    }

    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Looks `n` characters past the next one without consuming anything.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consumes and returns the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consumes the next character if it equals `ch`.
    pub fn eat(&mut self, ch: char) -> bool {
        self.eat_if(|c| c == ch).is_some()
    }

    /// Consumes the next character if it satisfies `pred`.
    pub fn eat_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.pos += ch.len_utf8();
                Some(ch)
            }
            _ => None,
        }
    }

    /// Consumes characters while `pred` holds. Returns whether anything was
    /// consumed.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let begin = self.pos;
        while self.eat_if(&pred).is_some() {}
        self.pos > begin
    }

    pub fn eat_space(&mut self) -> bool {
        self.eat_while(char::is_whitespace)
    }

    pub fn skip_to_end(&mut self) {
        self.pos = self.end;
    }

    /// Moves to the next occurrence of `byte` (not consuming it). Leaves the
    /// cursor untouched and returns `false` if there is none.
    pub fn skip_to(&mut self, byte: u8) -> bool {
        match self.rest().as_bytes().find_byte(byte) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => false,
        }
    }

    /// Consumes `s` if the unread text starts with it.
    pub fn match_str(&mut self, s: &str) -> bool {
        if self.rest().as_bytes().starts_with_str(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Un-reads `n` bytes of the current token.
    pub fn back_up(&mut self, n: usize) {
        debug_assert!(self.pos.saturating_sub(n) >= self.start, "back_up past token start");
        self.pos = self.pos.saturating_sub(n).max(self.start);
    }

    /// Consumes `n` bytes. `n` must land on a char boundary.
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.end);
    }

    /// Pulls the end of the line in to `end` and returns the previous end so
    /// it can be restored with [`LineCursor::restore_limit`].
    pub(crate) fn limit_to(&mut self, end: usize) -> usize {
        let previous = self.end;
        self.end = end.clamp(self.pos, previous);
        previous
    }

    pub(crate) fn restore_limit(&mut self, end: usize) {
        self.end = end;
    }

    /// Visual column of the current token's start.
    #[must_use]
    pub fn column(&self) -> usize {
        self.count_column(self.start)
    }

    /// Visual width of the line's leading whitespace.
    #[must_use]
    pub fn indentation(&self) -> usize {
        let first = self
            .line
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map_or(self.line.len(), |(i, _)| i);
        self.count_column(first)
    }

    fn count_column(&self, end: usize) -> usize {
        let tab = self.tab_size as usize;
        self.line[..end].chars().fold(0, |col, ch| {
            if ch == '\t' {
                col + tab - col % tab
            } else {
                col + 1
            }
        })
    }
}
