//! Switching grammars mid-line.
//!
//! A [`Multiplexer`] runs an outer grammar and hands the line over to a
//! region's grammar between the region's open and close delimiters. While
//! no region is active, the outer grammar never sees text at or past the
//! next open delimiter on the line; while one is active, its grammar never
//! sees text at or past the close delimiter.

use crate::{
    DelimiterSide, Grammar, GrammarState, LexerOptions, LineCursor, Pattern, RGrammar, Style,
};

/// An embedded language and the delimiters that enter and leave it.
#[derive(Debug, Clone)]
pub struct Region {
    open: Pattern,
    /// `None`: the region ends at the start of the next line.
    close: Option<Pattern>,
    grammar: Grammar,
    delimit: bool,
    parse_delimiters: bool,
}

impl Region {
    #[must_use]
    pub fn new(open: Pattern, close: Option<Pattern>, grammar: Grammar) -> Self {
        Self {
            open,
            close,
            grammar,
            delimit: false,
            parse_delimiters: false,
        }
    }

    /// Style the delimiters as [`Style::Delimiter`] instead of
    /// [`Style::None`].
    #[must_use]
    pub fn delimited(mut self) -> Self {
        self.delimit = true;
        self
    }

    /// Let the region's grammar scan the delimiters itself.
    #[must_use]
    pub fn parse_delimiters(mut self) -> Self {
        self.parse_delimiters = true;
        self
    }

    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn delimiter_style(&self, side: DelimiterSide) -> Style {
        if self.delimit {
            Style::Delimiter(side)
        } else {
            Style::None
        }
    }
}

/// An outer grammar with embedded regions. Regions are tried in the order
/// they were given; the first whose open delimiter matches wins.
#[derive(Debug, Clone)]
pub struct Multiplexer {
    outer: Grammar,
    regions: Vec<Region>,
}

/// State of a [`Multiplexer`]: the outer grammar's state, plus the active
/// region and its grammar's state while inside one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct MultiplexState {
    outer: GrammarState,
    active: Option<usize>,
    inner: Option<GrammarState>,
    /// Set while a region that parses its own delimiters has not consumed
    /// anything yet, so its open text is not mistaken for the close.
    starting_inner: bool,
}

impl MultiplexState {
    #[must_use]
    pub fn outer(&self) -> &GrammarState {
        &self.outer
    }

    /// Index of the active region, if any.
    #[must_use]
    pub fn active_region(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn inner(&self) -> Option<&GrammarState> {
        self.inner.as_ref()
    }

    fn leave(&mut self) {
        self.active = None;
        self.inner = None;
        self.starting_inner = false;
    }
}

impl Multiplexer {
    #[must_use]
    pub fn new(outer: Grammar, regions: Vec<Region>) -> Self {
        Self { outer, regions }
    }

    /// Elixir with two kinds of region:
    ///
    /// - `:!directive ...`: the `:` opens plain text up to the end of the
    ///   line; the directive continues on following lines that start with
    ///   `!`.
    /// - `[r| .. |]`, `[rprint| .. |]`, `[rgraph| .. |]`: R code.
    #[must_use]
    pub fn ielixir(options: LexerOptions) -> Self {
        let directive = Region::new(
            Pattern::literal(":").followed_by('!'),
            Some(Pattern::line_start().not_followed_by('!')),
            Grammar::PlainText,
        )
        .delimited();
        let r_snippet = Region::new(
            Pattern::alternatives(&["[r|", "[rprint|", "[rgraph|"]),
            Some(Pattern::literal("|]")),
            Grammar::R(RGrammar),
        )
        .delimited();
        Self::new(Grammar::elixir(options), vec![directive, r_snippet])
    }

    #[must_use]
    pub fn outer(&self) -> &Grammar {
        &self.outer
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn start_state(&self) -> MultiplexState {
        MultiplexState {
            outer: self.outer.start_state(),
            active: None,
            inner: None,
            starting_inner: false,
        }
    }

    pub fn token(&self, cur: &mut LineCursor<'_>, state: &mut MultiplexState) -> Style {
        let Some(index) = state.active else {
            return self.outer_token(cur, state);
        };
        let Some(region) = self.regions.get(index) else {
            tracing::warn!(region = index, "active region does not exist; leaving it");
            state.leave();
            return self.outer_token(cur, state);
        };

        if region.close.is_none() && cur.sol() {
            state.leave();
            return self.outer_token(cur, state);
        }

        let found = match &region.close {
            Some(close) if !state.starting_inner => close.find(cur.visible(), cur.pos()),
            _ => None,
        };
        // Where the region's grammar has to stop.
        let limit = found.map(|(start, len)| {
            if region.parse_delimiters {
                start + len
            } else {
                start
            }
        });

        if let Some((start, len)) = found {
            if start == cur.pos() && !region.parse_delimiters {
                cur.advance(len);
                state.leave();
                tracing::trace!(region = index, "leaving region");
                return region.delimiter_style(DelimiterSide::Close);
            }
        }

        let saved = limit.map(|end| cur.limit_to(end));
        let inner = state
            .inner
            .get_or_insert_with(|| region.grammar.start_state());
        let style = region.grammar.token(cur, inner);
        match saved {
            Some(end) => cur.restore_limit(end),
            None if cur.pos() > cur.start() => state.starting_inner = false,
            None => {}
        }

        if region.parse_delimiters && limit == Some(cur.pos()) {
            state.leave();
        }
        style
    }

    fn outer_token(&self, cur: &mut LineCursor<'_>, state: &mut MultiplexState) -> Style {
        let visible = cur.visible();
        let pos = cur.pos();
        let mut cut_off: Option<usize> = None;

        for (index, region) in self.regions.iter().enumerate() {
            match region.open.find(visible, pos) {
                Some((start, len)) if start == pos => {
                    if !region.parse_delimiters {
                        cur.advance(len);
                    }
                    state.starting_inner = region.parse_delimiters;
                    state.active = Some(index);
                    state.inner = Some(region.grammar.start_state());
                    tracing::trace!(region = index, "entering region");
                    return region.delimiter_style(DelimiterSide::Open);
                }
                Some((start, _)) => {
                    cut_off = Some(cut_off.map_or(start, |current| current.min(start)));
                }
                None => {}
            }
        }

        let saved = cut_off.map(|end| cur.limit_to(end));
        let style = self.outer.token(cur, &mut state.outer);
        if let Some(end) = saved {
            cur.restore_limit(end);
        }
        style
    }

    pub fn blank_line(&self, state: &mut MultiplexState) {
        match state.active.and_then(|index| self.regions.get(index)) {
            Some(region) => {
                if let Some(inner) = state.inner.as_mut() {
                    region.grammar.blank_line(inner);
                }
                if region.close.is_none() {
                    state.leave();
                }
            }
            None => self.outer.blank_line(&mut state.outer),
        }
    }
}
