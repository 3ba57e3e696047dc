//! The core tokenizer: dispatch on the first character of the next token.

use super::{
    Scan,
    state::{Frame, Marker, Quoted, ScannerState},
};
use crate::{LineCursor, Style};

/// `\w` as the grammar understands it.
#[inline]
pub(super) fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Word characters plus anything outside Latin-1 punctuation.
#[inline]
fn is_ident_char(ch: char) -> bool {
    is_word_char(ch) || ch >= '\u{a1}'
}

#[inline]
fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch >= '\u{a1}'
}

#[inline]
fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '=' | '+' | '-' | '/' | '*' | ':' | '.' | '^' | '%' | '<' | '>' | '~' | '|'
    )
}

/// Characters that extend an operator run. `:`, `/` and `%` always start a
/// token of their own.
#[inline]
fn is_operator_run_char(ch: char) -> bool {
    matches!(
        ch,
        '=' | '+' | '-' | '*' | '.' | '^' | '<' | '>' | '~' | '|'
    )
}

fn closing_delimiter(open: char) -> char {
    match open {
        '[' => ']',
        '{' => '}',
        '(' => ')',
        other => other,
    }
}

/// Pushes `frame` and lets it scan the current token right away.
fn chain(cur: &mut LineCursor<'_>, state: &mut ScannerState, frame: Frame) -> Scan {
    state.push_frame(frame);
    super::scan(cur, state)
}

pub(super) fn token_base(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    if cur.sol() && cur.rest() == "\"\"\"" {
        cur.skip_to_end();
        state.push_frame(Frame::BlockComment);
        return Scan::styled(Style::Comment);
    }

    if cur.eat_space() {
        return Scan::styled(Style::None);
    }

    let Some(ch) = cur.next_char() else {
        return Scan::styled(Style::None);
    };

    if ch == '\'' || ch == '"' {
        let style = if ch == '"' {
            Style::InterpolatedString
        } else {
            Style::String
        };
        return chain(cur, state, Frame::Quoted(Quoted::new(ch, style, ch == '"', false)));
    }

    match ch {
        '/' => return slash(cur, state),
        '%' => return percent_literal(cur, state),
        '~' => {
            if let Some(scan) = sigil(cur, state) {
                return scan;
            }
        }
        '#' => {
            cur.skip_to_end();
            return Scan::styled(Style::Comment);
        }
        '<' => {
            if let Some((consumed, tag, indented)) = heredoc_opener(cur.rest()) {
                cur.advance(consumed);
                return chain(cur, state, Frame::Heredoc { tag, indented });
            }
        }
        '0' => {
            if cur.eat('x') {
                cur.eat_while(|c| c.is_ascii_hexdigit());
            } else if cur.eat('b') {
                cur.eat_while(|c| c == '0' || c == '1');
            } else {
                cur.eat_while(|c| ('0'..='7').contains(&c));
            }
            return Scan::styled(Style::Number);
        }
        '1'..='9' => {
            decimal_tail(cur);
            return Scan::styled(Style::Number);
        }
        '?' => {
            while cur.match_str("\\C-") || cur.match_str("\\M-") {}
            if cur.eat('\\') {
                cur.eat_while(is_word_char);
            } else {
                cur.next_char();
            }
            return Scan::styled(Style::String);
        }
        ':' => return colon(cur, state),
        '@' => {
            if attribute_follows(cur.rest()) {
                cur.eat('@');
                cur.eat_while(is_ident_char);
                return Scan::styled(Style::ModuleAttribute);
            }
        }
        '$' => {
            if cur.eat_if(|c| c.is_ascii_alphabetic() || c == '_').is_some() {
                cur.eat_while(is_word_char);
            } else if cur.eat_if(|c| c.is_ascii_digit()).is_some() {
                cur.eat_if(|c| c.is_ascii_digit());
            } else {
                cur.next_char();
            }
            return Scan::styled(Style::GlobalVariable);
        }
        _ => {}
    }

    if is_ident_start(ch) {
        cur.eat_while(is_ident_char);
        cur.eat_if(|c| c == '?' || c == '!');
        if cur.eat(':') {
            return Scan::styled(Style::Atom);
        }
        return Scan::ident();
    }

    if ch == '|'
        && (state.var_list
            || state.last_token.as_ref().is_some_and(|last| {
                last.is_marker(Marker::Open(super::state::Bracket::Curly)) || last.is_keyword("do")
            }))
    {
        return Scan::marker(Marker::Pipe);
    }

    if let Some(marker) = Marker::from_char(ch) {
        return Scan::marker(marker);
    }

    if ch == '-' && cur.eat('>') {
        return Scan::styled(Style::Arrow);
    }
    if ch == '|' && cur.eat('>') {
        return Scan::styled(Style::Pipe);
    }

    if is_operator_char(ch) {
        let run = cur.eat_while(is_operator_run_char);
        if ch == '.' && !run {
            return Scan {
                class: super::Class::Styled(Style::Punctuation),
                marker: Some(Marker::Dot),
            };
        }
        return Scan::styled(Style::Operator);
    }

    Scan::styled(Style::None)
}

/// `/` is a regex literal when a closing `/` follows on the line and the
/// parentheses between the two balance out; otherwise it divides.
fn slash(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    let body_start = cur.pos();
    if cur.skip_to(b'/') {
        let body = &cur.line()[body_start..cur.pos()];
        cur.back_up(body.len());

        let mut balance = 0i32;
        for ch in body.chars() {
            match ch {
                '(' => balance += 1,
                ')' => balance -= 1,
                _ => {}
            }
            if balance < 0 {
                break;
            }
        }

        if balance == 0 {
            return chain(
                cur,
                state,
                Frame::Quoted(Quoted::new('/', Style::RegexLiteral, true, false)),
            );
        }
    }
    Scan::styled(Style::Operator)
}

/// `%s(..)`, `%w[..]`, `%r{..}` and friends. Without a marker letter the
/// literal is an interpolating string (`%(..)`, `%{..}`). A `%` that no
/// delimiter follows is an operator.
fn percent_literal(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    let marker = cur.eat_if(|c| matches!(c, 's' | 'W' | 'Q' | 'r' | 'w' | 'x' | 'q'));
    let (style, interpolates) = match marker {
        Some('s') => (Style::Atom, true),
        Some('r') => (Style::RegexLiteral, true),
        Some('w' | 'x' | 'q') => (Style::String, false),
        _ => (Style::InterpolatedString, true),
    };

    let Some(open) = cur.eat_if(|c| !(is_word_char(c) || c.is_whitespace() || c == '=')) else {
        return Scan::styled(Style::Operator);
    };

    let quoted = Quoted::new(closing_delimiter(open), style, interpolates, true);
    chain(cur, state, Frame::Quoted(quoted))
}

/// `~r/../`, `~s(..)`, `~W[..]`: a sigil letter followed by one of the
/// delimiters the language accepts. Lowercase sigils interpolate.
fn sigil(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Option<Scan> {
    let letter = cur.peek().filter(char::is_ascii_alphabetic)?;
    let open = cur
        .peek_nth(1)
        .filter(|c| matches!(c, '/' | '|' | '"' | '\'' | '(' | '[' | '{' | '<'))?;
    cur.next_char();
    cur.next_char();

    let interpolates = letter.is_ascii_lowercase();
    let style = match letter.to_ascii_lowercase() {
        'r' => Style::RegexLiteral,
        _ if interpolates => Style::InterpolatedString,
        _ => Style::String,
    };
    let close = if open == '<' { '>' } else { closing_delimiter(open) };
    Some(chain(
        cur,
        state,
        Frame::Quoted(Quoted::new(close, style, interpolates, false)),
    ))
}

/// Matches `<[-]['"`]?TAG['"`]?(;|$)` right after the first `<` of `<<`.
/// Returns the bytes to consume, the tag, and whether the opener used `-`.
fn heredoc_opener(rest: &str) -> Option<(usize, String, bool)> {
    let bytes = rest.as_bytes();
    let is_quote = |b: u8| matches!(b, b'`' | b'"' | b'\'');

    let mut i = 0;
    if bytes.first() != Some(&b'<') {
        return None;
    }
    i += 1;
    let indented = bytes.get(i) == Some(&b'-');
    if indented {
        i += 1;
    }
    if bytes.get(i).copied().is_some_and(is_quote) {
        i += 1;
    }

    let tag_start = i;
    match bytes.get(i) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' || *b == b'?' => i += 1,
        _ => return None,
    }
    while bytes.get(i).is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_') {
        i += 1;
    }
    let tag = &rest[tag_start..i];

    if bytes.get(i).copied().is_some_and(is_quote) {
        i += 1;
    }
    match bytes.get(i) {
        None => {}
        Some(b';') => i += 1,
        Some(_) => return None,
    }
    Some((i, tag.to_owned(), indented))
}

/// Digits with `_` separators, an optional fraction and an optional
/// exponent. The leading digit is already consumed.
fn decimal_tail(cur: &mut LineCursor<'_>) {
    let digit = |c: char| c.is_ascii_digit() || c == '_';
    cur.eat_while(digit);

    if cur.peek() == Some('.') && cur.peek_nth(1).is_some_and(digit) {
        cur.next_char();
        cur.eat_while(digit);
    }

    if matches!(cur.peek(), Some('e' | 'E')) {
        let sign = usize::from(matches!(cur.peek_nth(1), Some('+' | '-')));
        if cur.peek_nth(1 + sign).is_some_and(digit) {
            cur.next_char();
            if sign == 1 {
                cur.next_char();
            }
            cur.eat_while(digit);
        }
    }
}

fn colon(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    if cur.eat('\'') {
        return chain(
            cur,
            state,
            Frame::Quoted(Quoted::new('\'', Style::Atom, false, false)),
        );
    }
    if cur.eat('"') {
        return chain(
            cur,
            state,
            Frame::Quoted(Quoted::new('"', Style::Atom, true, false)),
        );
    }

    // :< :<< :> :>>
    if cur.eat_if(|c| c == '<' || c == '>').is_some() {
        cur.eat_if(|c| c == '<' || c == '>');
        return Scan::styled(Style::Atom);
    }

    // :+ :- :* :/ :& :| :: :!
    if cur
        .eat_if(|c| matches!(c, '+' | '-' | '*' | '/' | '&' | '|' | ':' | '!'))
        .is_some()
    {
        return Scan::styled(Style::Atom);
    }

    // Atoms never start with a digit.
    if cur
        .eat_if(|c| c.is_ascii_alphabetic() || matches!(c, '$' | '@' | '_') || c >= '\u{a1}')
        .is_some()
    {
        cur.eat_while(|c| is_ident_char(c) || c == '$');
        cur.eat_if(|c| matches!(c, '?' | '!' | '='));
        return Scan::styled(Style::Atom);
    }

    Scan::styled(Style::Operator)
}

/// `@name` or `@@name`; `rest` starts right after the first `@`.
fn attribute_follows(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some('@') => chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c >= '\u{a1}'),
        Some(c) => c.is_ascii_alphabetic() || c == '_' || c >= '\u{a1}',
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heredoc_opener_shapes() {
        assert_eq!(heredoc_opener("<EOS"), Some((4, "EOS".to_owned(), false)));
        assert_eq!(heredoc_opener("<-'EOS';"), Some((8, "EOS".to_owned(), true)));
        assert_eq!(heredoc_opener("<EOS x"), None);
        assert_eq!(heredoc_opener("< EOS"), None);
        assert_eq!(heredoc_opener("EOS"), None);
    }

    #[test]
    fn attribute_detection() {
        assert!(attribute_follows("doc"));
        assert!(attribute_follows("@count"));
        assert!(!attribute_follows("@"));
        assert!(!attribute_follows(" x"));
    }
}
