//! Sub-scanners for text that spans more than one core token: quoted
//! literals, heredocs, block comments and interpolated code.

use super::{
    Scan, base,
    state::{Frame, ScannerState},
};
use crate::{LineCursor, Style};

/// Scans the body of the quoted literal on top of the stack.
///
/// Stops at the closing delimiter (popping the frame) or right after an
/// interpolation opener, leaving the embedded scanner on top.
pub(super) fn read_quoted(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    let quoted = match state.top_frame() {
        Frame::Quoted(quoted) => *quoted,
        _ => return Scan::styled(Style::None),
    };

    if quoted.resume_after_brace {
        if let Frame::Quoted(top) = state.top_frame_mut() {
            top.resume_after_brace = false;
        }
        cur.eat('}');
    }

    let mut escaped = false;
    while let Some(ch) = cur.next_char() {
        if ch == quoted.delim && (quoted.raw || !escaped) {
            state.pop_frame();
            break;
        }
        if quoted.interpolates && ch == '#' && !escaped {
            if cur.eat('{') {
                if quoted.delim == '}' {
                    if let Frame::Quoted(top) = state.top_frame_mut() {
                        top.resume_after_brace = true;
                    }
                }
                state.push_frame(Frame::UntilBrace { depth: 1 });
                break;
            }
            if matches!(cur.peek(), Some('@' | '$')) {
                state.push_frame(Frame::Once { called: false });
                break;
            }
        }
        escaped = !escaped && ch == '\\';
    }

    Scan::styled(quoted.style)
}

/// One heredoc line. The line closes the heredoc when it holds nothing but
/// the tag (after leading whitespace, for `<<-` heredocs).
pub(super) fn read_heredoc(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    let closes = match state.top_frame() {
        Frame::Heredoc { tag, indented } => {
            let rest = cur.rest();
            let candidate = if *indented { rest.trim_start() } else { rest };
            candidate == tag
        }
        _ => false,
    };

    cur.skip_to_end();
    if closes {
        state.pop_frame();
    }
    Scan::styled(Style::String)
}

pub(super) fn read_block_comment(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    let closes = cur.sol() && cur.rest() == "\"\"\"";
    cur.skip_to_end();
    if closes {
        state.pop_frame();
    }
    Scan::styled(Style::Comment)
}

/// Core tokens inside `#{..}`. Nested braces are counted; the brace that
/// balances the opener hands control back to the literal underneath.
pub(super) fn until_brace(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    let depth = match state.top_frame() {
        Frame::UntilBrace { depth } => *depth,
        _ => return base::token_base(cur, state),
    };

    match cur.peek() {
        Some('}') if depth <= 1 => {
            state.pop_frame();
            return super::scan(cur, state);
        }
        Some('}') => *state.top_frame_mut() = Frame::UntilBrace { depth: depth - 1 },
        Some('{') => *state.top_frame_mut() = Frame::UntilBrace { depth: depth + 1 },
        _ => {}
    }
    base::token_base(cur, state)
}

/// Exactly one core token, then back to the literal underneath.
pub(super) fn once(cur: &mut LineCursor<'_>, state: &mut ScannerState) -> Scan {
    if matches!(state.top_frame(), Frame::Once { called: true }) {
        state.pop_frame();
        return super::scan(cur, state);
    }
    *state.top_frame_mut() = Frame::Once { called: true };
    base::token_base(cur, state)
}
