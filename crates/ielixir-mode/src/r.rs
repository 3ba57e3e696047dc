//! A small R grammar for `[r| .. |]` snippets embedded in notebook cells.

use crate::{LineCursor, Style};

const KEYWORDS: &[&str] = &[
    "break", "else", "for", "function", "if", "in", "next", "repeat", "while",
];

const ATOMS: &[&str] = &[
    "FALSE",
    "Inf",
    "NA",
    "NA_character_",
    "NA_integer_",
    "NA_real_",
    "NULL",
    "NaN",
    "TRUE",
];

/// Tokenizer for R source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RGrammar;

/// Line-to-line state of the R grammar: the quote of a string literal left
/// open at the end of the previous line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct RState {
    open_quote: Option<char>,
}

impl RState {
    #[must_use]
    pub fn in_string(&self) -> bool {
        self.open_quote.is_some()
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}

fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '*' | '/' | '^' | '<' | '>' | '=' | '!' | '&' | '|' | '~' | '?' | ':'
    )
}

impl RGrammar {
    #[must_use]
    pub fn start_state(&self) -> RState {
        RState::default()
    }

    /// Scans one token starting at the cursor and returns its style.
    pub fn token(&self, cur: &mut LineCursor<'_>, state: &mut RState) -> Style {
        if let Some(quote) = state.open_quote {
            return string_body(cur, state, quote);
        }

        if cur.eat_space() {
            return Style::None;
        }
        let Some(ch) = cur.next_char() else {
            return Style::None;
        };

        match ch {
            '#' => {
                cur.skip_to_end();
                Style::Comment
            }
            '\'' | '"' => {
                state.open_quote = Some(ch);
                string_body(cur, state, ch)
            }
            '`' => {
                if cur.skip_to(b'`') {
                    cur.next_char();
                } else {
                    cur.skip_to_end();
                }
                Style::Identifier
            }
            '0' if cur.eat_if(|c| c == 'x' || c == 'X').is_some() => {
                cur.eat_while(|c| c.is_ascii_hexdigit());
                cur.eat_if(|c| c == 'L' || c == 'i');
                Style::Number
            }
            '0'..='9' => {
                number_tail(cur);
                Style::Number
            }
            '.' if cur.peek().is_some_and(|c| c.is_ascii_digit()) => {
                number_tail(cur);
                Style::Number
            }
            '%' => {
                if cur.skip_to(b'%') {
                    cur.next_char();
                }
                Style::Operator
            }
            '$' | '@' => {
                if cur.eat_while(is_name_char) {
                    Style::Property
                } else {
                    Style::Operator
                }
            }
            '<' if cur.match_str("<-") || cur.eat('-') => Style::Arrow,
            '-' if cur.eat('>') => {
                cur.eat('>');
                Style::Arrow
            }
            _ if ch.is_alphabetic() || ch == '.' => {
                cur.eat_while(is_name_char);
                let word = cur.current();
                if KEYWORDS.binary_search(&word).is_ok() {
                    Style::Keyword
                } else if ATOMS.binary_search(&word).is_ok() {
                    Style::Atom
                } else {
                    Style::Identifier
                }
            }
            _ if is_operator_char(ch) => {
                cur.eat_while(is_operator_char);
                Style::Operator
            }
            _ => Style::None,
        }
    }

    pub fn blank_line(&self, _state: &mut RState) {}
}

fn string_body(cur: &mut LineCursor<'_>, state: &mut RState, quote: char) -> Style {
    let mut escaped = false;
    while let Some(ch) = cur.next_char() {
        if ch == quote && !escaped {
            state.open_quote = None;
            break;
        }
        escaped = !escaped && ch == '\\';
    }
    Style::String
}

/// Digits, an optional fraction, an optional exponent and an `L`/`i`
/// suffix. The first character is already consumed.
fn number_tail(cur: &mut LineCursor<'_>) {
    cur.eat_while(|c| c.is_ascii_digit());
    if cur.eat('.') {
        cur.eat_while(|c| c.is_ascii_digit());
    }
    if matches!(cur.peek(), Some('e' | 'E')) {
        let sign = usize::from(matches!(cur.peek_nth(1), Some('+' | '-')));
        if cur.peek_nth(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
            cur.advance(1 + sign);
            cur.eat_while(|c| c.is_ascii_digit());
        }
    }
    cur.eat_if(|c| c == 'L' || c == 'i');
}
