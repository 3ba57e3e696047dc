//! Delimiter patterns for embedded regions.
//!
//! A [`Pattern`] is searched for in a line starting at some byte offset.
//! Matches may carry a one-character lookahead assertion: the character
//! after the match is tested but never becomes part of the match, so the
//! grammar that takes over still sees it.

use regex::Regex;

use crate::ModeError;

#[derive(Debug, Clone)]
enum Kind {
    /// One or more literal alternatives, tried in order at each offset.
    Literal(Vec<String>),
    /// Searched in the text that remains after the starting offset, so a
    /// leading `^` anchors at that offset.
    Regex(Regex),
    /// Zero-width match at byte 0 of the line.
    LineStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lookahead {
    ch: char,
    negated: bool,
}

impl Lookahead {
    fn holds(self, next: Option<char>) -> bool {
        (next == Some(self.ch)) != self.negated
    }
}

/// A matcher for a region's open or close delimiter.
#[derive(Debug, Clone)]
pub struct Pattern {
    kind: Kind,
    lookahead: Option<Lookahead>,
}

impl Pattern {
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            kind: Kind::Literal(vec![text.into()]),
            lookahead: None,
        }
    }

    /// Matches any of `alternatives`; earlier entries win at the same offset.
    ///
    /// # Errors
    ///
    /// [`ModeError::EmptyAlternatives`] when the list is empty.
    pub fn any_of<I, S>(alternatives: I) -> Result<Self, ModeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alternatives: Vec<String> = alternatives.into_iter().map(Into::into).collect();
        if alternatives.is_empty() || alternatives.iter().any(String::is_empty) {
            return Err(ModeError::EmptyAlternatives);
        }
        Ok(Self {
            kind: Kind::Literal(alternatives),
            lookahead: None,
        })
    }

    pub(crate) fn alternatives(alternatives: &[&str]) -> Self {
        Self {
            kind: Kind::Literal(alternatives.iter().map(|alt| (*alt).to_owned()).collect()),
            lookahead: None,
        }
    }

    /// # Errors
    ///
    /// [`ModeError::InvalidPattern`] when `pattern` does not compile.
    pub fn regex(pattern: &str) -> Result<Self, ModeError> {
        let regex = Regex::new(pattern).map_err(|source| ModeError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self {
            kind: Kind::Regex(regex),
            lookahead: None,
        })
    }

    #[must_use]
    pub fn line_start() -> Self {
        Self {
            kind: Kind::LineStart,
            lookahead: None,
        }
    }

    /// Only match where the next character is `ch`.
    #[must_use]
    pub fn followed_by(mut self, ch: char) -> Self {
        self.lookahead = Some(Lookahead { ch, negated: false });
        self
    }

    /// Only match where the next character is not `ch` (or the line ends).
    #[must_use]
    pub fn not_followed_by(mut self, ch: char) -> Self {
        self.lookahead = Some(Lookahead { ch, negated: true });
        self
    }

    /// Length of a match starting exactly at `pos`.
    #[must_use]
    pub fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        self.find(text, pos)
            .and_then(|(start, len)| (start == pos).then_some(len))
    }

    /// First match at or after `from`, as `(start, len)`.
    #[must_use]
    pub fn find(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        if from > text.len() || !text.is_char_boundary(from) {
            return None;
        }

        match &self.kind {
            Kind::LineStart => (from == 0)
                .then_some((0, 0))
                .filter(|&(start, len)| self.accepts(text, start + len)),
            Kind::Literal(alternatives) => text[from..]
                .char_indices()
                .map(|(offset, _)| from + offset)
                .chain(core::iter::once(text.len()))
                .find_map(|start| {
                    alternatives
                        .iter()
                        .find(|alt| {
                            text[start..].starts_with(alt.as_str())
                                && self.accepts(text, start + alt.len())
                        })
                        .map(|alt| (start, alt.len()))
                }),
            Kind::Regex(regex) => {
                let haystack = &text[from..];
                let mut search = 0;
                while search <= haystack.len() {
                    let found = regex.find_at(haystack, search)?;
                    if self.accepts(text, from + found.end()) {
                        return Some((from + found.start(), found.len()));
                    }
                    search = found.start()
                        + haystack[found.start()..]
                            .chars()
                            .next()
                            .map_or(1, char::len_utf8);
                }
                None
            }
        }
    }

    fn accepts(&self, text: &str, end: usize) -> bool {
        self.lookahead
            .is_none_or(|lookahead| lookahead.holds(text[end..].chars().next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookahead_is_not_consumed() {
        let directive = Pattern::literal(":").followed_by('!');
        assert_eq!(directive.find("a: b :!cmd", 0), Some((5, 1)));
        assert_eq!(directive.match_at("a: b :!cmd", 5), Some(1));
        assert_eq!(directive.match_at("a: b :!cmd", 1), None);
    }

    #[test]
    fn line_start_only_matches_at_zero() {
        let close = Pattern::line_start().not_followed_by('!');
        assert_eq!(close.match_at("end", 0), Some(0));
        assert_eq!(close.match_at("!more", 0), None);
        assert_eq!(close.find("end", 1), None);
        assert_eq!(close.match_at("", 0), Some(0));
    }

    #[test]
    fn alternatives_prefer_earliest_offset() {
        let open = Pattern::any_of(["[r|", "[rprint|", "[rgraph|"]).unwrap();
        assert_eq!(open.find("x = [rprint| y |]", 0), Some((4, 8)));
        assert_eq!(open.find("[r|", 1), None);
        assert!(matches!(
            Pattern::any_of(Vec::<String>::new()),
            Err(ModeError::EmptyAlternatives)
        ));
    }

    #[test]
    fn regex_anchors_at_the_search_offset() {
        let pattern = Pattern::regex(r"^\|\]").unwrap();
        assert_eq!(pattern.find("ab|]", 2), Some((2, 2)));
        assert_eq!(pattern.find("ab|]", 0), None);

        let err = Pattern::regex("(").unwrap_err();
        assert!(matches!(err, ModeError::InvalidPattern { .. }));
    }

    #[test]
    fn regex_skips_matches_failing_the_lookahead() {
        let pattern = Pattern::regex(":").unwrap().followed_by('!');
        assert_eq!(pattern.find("a: :!", 0), Some((3, 1)));
    }
}
