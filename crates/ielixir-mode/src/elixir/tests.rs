use rstest::*;

use super::*;
use crate::{Grammar, GrammarState, Token, spans, tokenize_line};

fn elixir() -> Grammar {
    Grammar::elixir(LexerOptions::default())
}

/// Tokenizes `lines` in order, returning the spans of each line and the
/// final scanner state.
fn run(lines: &[&str]) -> (Vec<Vec<(String, Style)>>, ScannerState) {
    let grammar = elixir();
    let mut state = grammar.start_state();
    let out = lines
        .iter()
        .map(|line| {
            let tokens = tokenize_line(&grammar, &mut state, line);
            spans(line, &tokens)
                .map(|(text, style)| (text.to_owned(), style))
                .collect()
        })
        .collect();
    let GrammarState::Elixir(state) = state else {
        panic!("elixir grammar produced a foreign state");
    };
    (out, *state)
}

fn line(text: &str) -> Vec<(String, Style)> {
    run(&[text]).0.remove(0)
}

fn significant(text: &str) -> Vec<(String, Style)> {
    line(text)
        .into_iter()
        .filter(|(_, style)| *style != Style::None)
        .collect()
}

fn owned(expected: &[(&str, Style)]) -> Vec<(String, Style)> {
    expected
        .iter()
        .map(|(text, style)| ((*text).to_owned(), *style))
        .collect()
}

#[rstest]
#[case::atom(":ok", Style::Atom)]
#[case::quoted_atom(":\"with space\"", Style::Atom)]
#[case::operator_atom(":<<", Style::Atom)]
#[case::keyword_key("foo:", Style::Atom)]
#[case::predicate_key("valid?:", Style::Atom)]
#[case::attribute("@doc", Style::ModuleAttribute)]
#[case::double_attribute("@@count", Style::ModuleAttribute)]
#[case::global("$stdout", Style::GlobalVariable)]
#[case::hex("0x1F", Style::Number)]
#[case::binary("0b101", Style::Number)]
#[case::octal("0755", Style::Number)]
#[case::float("1_000.5e-3", Style::Number)]
#[case::char_literal("?a", Style::String)]
#[case::control_char("?\\C-a", Style::String)]
#[case::module("Enum", Style::ConstantTag)]
#[case::charlist("'chars'", Style::String)]
#[case::string("\"str\"", Style::InterpolatedString)]
#[case::escaped_quote("\"a\\\"b\"", Style::InterpolatedString)]
#[case::comment("# note", Style::Comment)]
#[case::pipe("|>", Style::Pipe)]
#[case::arrow("->", Style::Arrow)]
#[case::word_list("%w(a b)", Style::String)]
#[case::interpolated_words("%W[a b]", Style::InterpolatedString)]
#[case::atom_list("%s{a}", Style::Atom)]
#[case::percent_regex("%r{a+}", Style::RegexLiteral)]
#[case::regex("/a(b)/", Style::RegexLiteral)]
#[case::regex_sigil("~r/ab+/", Style::RegexLiteral)]
#[case::raw_sigil("~S(raw)", Style::String)]
#[case::angle_sigil("~w<a b>", Style::InterpolatedString)]
#[case::special_form("__MODULE__", Style::Keyword)]
#[case::unicode_name("größe", Style::Identifier)]
#[case::operator_run("<>=", Style::Operator)]
fn single_token(#[case] text: &str, #[case] style: Style) {
    assert_eq!(line(text), owned(&[(text, style)]));
}

#[test]
fn definition_after_def() {
    assert_eq!(
        line("def run"),
        owned(&[
            ("def", Style::Keyword),
            (" ", Style::None),
            ("run", Style::Definition),
        ])
    );
    assert_eq!(
        significant("defmacro unless(c)"),
        owned(&[
            ("defmacro", Style::Keyword),
            ("unless", Style::Keyword),
            ("c", Style::Identifier),
        ])
    );
}

#[test]
fn balanced_slashes_are_a_regex() {
    assert_eq!(
        line("/a(b/"),
        owned(&[
            ("/", Style::Operator),
            ("a", Style::Identifier),
            ("(", Style::None),
            ("b", Style::Identifier),
            ("/", Style::Operator),
        ])
    );
    assert_eq!(
        significant("x / y"),
        owned(&[
            ("x", Style::Identifier),
            ("/", Style::Operator),
            ("y", Style::Identifier),
        ])
    );
}

#[test]
fn bare_colon_is_not_an_atom() {
    assert_eq!(
        line(": \"text\""),
        owned(&[
            (":", Style::Operator),
            (" ", Style::None),
            ("\"text\"", Style::InterpolatedString),
        ])
    );
    assert_eq!(
        line("foo: 1"),
        owned(&[
            ("foo:", Style::Atom),
            (" ", Style::None),
            ("1", Style::Number),
        ])
    );
}

#[test]
fn percent_without_marker_is_an_interpolating_literal() {
    assert_eq!(line("%(a b)"), owned(&[("%(a b)", Style::InterpolatedString)]));
    assert_eq!(
        line("%{a #{b}}"),
        owned(&[
            ("%{a #{", Style::InterpolatedString),
            ("b", Style::Identifier),
            ("}}", Style::InterpolatedString),
        ])
    );
    assert_eq!(
        line("x % y"),
        owned(&[
            ("x", Style::Identifier),
            (" ", Style::None),
            ("%", Style::Operator),
            (" ", Style::None),
            ("y", Style::Identifier),
        ])
    );
}

#[rstest]
#[case::equals_before_atom("a=:ok", &[("a", Style::Identifier), ("=", Style::Operator), (":ok", Style::Atom)])]
#[case::dot_before_slash("a./b", &[("a", Style::Identifier), (".", Style::Punctuation), ("/", Style::Operator), ("b", Style::Identifier)])]
#[case::plus_before_percent("a+%w(b)", &[("a", Style::Identifier), ("+", Style::Operator), ("%w(b)", Style::String)])]
#[case::run_of_run_chars("a<>=b", &[("a", Style::Identifier), ("<>=", Style::Operator), ("b", Style::Identifier)])]
fn operator_runs_stop_at_colon_slash_and_percent(
    #[case] text: &str,
    #[case] expected: &[(&str, Style)],
) {
    assert_eq!(significant(text), owned(expected));
}

#[test]
fn properties_follow_a_dot() {
    assert_eq!(
        line("map.key"),
        owned(&[
            ("map", Style::Identifier),
            (".", Style::Punctuation),
            ("key", Style::Property),
        ])
    );
    // A run of dots is an operator, and the name after it is not a property.
    assert_eq!(
        significant("1..n"),
        owned(&[
            ("1", Style::Number),
            ("..", Style::Operator),
            ("n", Style::Identifier),
        ])
    );
}

#[test]
fn interpolation_splits_the_literal() {
    assert_eq!(
        line("\"a #{b + \"c\"} d\""),
        owned(&[
            ("\"a #{", Style::InterpolatedString),
            ("b", Style::Identifier),
            (" ", Style::None),
            ("+", Style::Operator),
            (" ", Style::None),
            ("\"c\"", Style::InterpolatedString),
            ("} d\"", Style::InterpolatedString),
        ])
    );
}

#[test]
fn single_quotes_do_not_interpolate() {
    assert_eq!(line("'a #{b}'"), owned(&[("'a #{b}'", Style::String)]));
}

#[test]
fn interpolation_restores_the_frame_depth() {
    let (_, open) = run(&["\"total: #{"]);
    assert_eq!(open.frames().len(), 3);
    assert!(matches!(open.frames()[2], Frame::UntilBrace { depth: 1 }));

    let (_, nested) = run(&["\"total: #{", "{a, 1"]);
    assert!(matches!(nested.frames()[2], Frame::UntilBrace { depth: 2 }));

    let (lines, closed) = run(&["\"total: #{", "{a, 1}", "} done\""]);
    assert!(closed.at_base());
    assert_eq!(
        lines[2],
        owned(&[("} done\"", Style::InterpolatedString)])
    );
}

#[test]
fn brace_delimited_literal_resumes_after_interpolation() {
    let (lines, state) = run(&["%W{a #{x} b}"]);
    assert_eq!(
        lines[0],
        owned(&[
            ("%W{a #{", Style::InterpolatedString),
            ("x", Style::Identifier),
            ("} b}", Style::InterpolatedString),
        ])
    );
    assert!(state.at_base());
}

#[test]
fn other_delimiters_keep_the_closing_brace_as_text() {
    let (lines, state) = run(&["%W(a #{x} b)"]);
    assert_eq!(
        lines[0],
        owned(&[
            ("%W(a #{", Style::InterpolatedString),
            ("x", Style::Identifier),
            ("} b)", Style::InterpolatedString),
        ])
    );
    assert!(state.at_base());
}

#[test]
fn attribute_interpolation_takes_one_token() {
    assert_eq!(
        line("\"v#@vsn!\""),
        owned(&[
            ("\"v#", Style::InterpolatedString),
            ("@vsn", Style::ModuleAttribute),
            ("!\"", Style::InterpolatedString),
        ])
    );
}

#[test]
fn raw_literals_end_at_an_escaped_delimiter() {
    assert_eq!(
        line("%w(a\\) b"),
        owned(&[
            ("%w(a\\)", Style::String),
            (" ", Style::None),
            ("b", Style::Identifier),
        ])
    );
}

#[test]
fn strings_span_lines() {
    let (lines, state) = run(&["x = \"first", "second", "third\" <> y"]);
    assert_eq!(lines[1], owned(&[("second", Style::InterpolatedString)]));
    assert_eq!(lines[2][0], ("third\"".to_owned(), Style::InterpolatedString));
    assert!(state.at_base());
}

#[rstest]
#[case::plain(&["x = <<EOS", "  body", "EOS", "y"], &[true, true, false, false])]
#[case::quoted_tag(&["<<'END';", "END"], &[true, false])]
#[case::indented_close(&["<<-EOS", "text", "    EOS"], &[true, true, false])]
#[case::unindented_needs_exact_line(&["<<EOS", "  EOS", "EOS"], &[true, true, false])]
fn heredoc_closes_on_its_tag(#[case] lines: &[&str], #[case] open_after: &[bool]) {
    let grammar = elixir();
    let mut state = grammar.start_state();
    for (text, expected) in lines.iter().zip(open_after) {
        let tokens = tokenize_line(&grammar, &mut state, text);
        assert_eq!(tokens.iter().map(|t| t.len).sum::<usize>(), text.len());
        let GrammarState::Elixir(elixir) = &state else {
            panic!("foreign state");
        };
        let in_heredoc = matches!(elixir.frames().last(), Some(Frame::Heredoc { .. }));
        assert_eq!(in_heredoc, *expected, "after {text:?}");
    }
}

#[test]
fn heredoc_lines_are_strings() {
    let (lines, _) = run(&["x = <<EOS", "#{not interpolated}", "EOS"]);
    assert_eq!(lines[0].last(), Some(&("<<EOS".to_owned(), Style::String)));
    assert_eq!(lines[1], owned(&[("#{not interpolated}", Style::String)]));
    assert_eq!(lines[2], owned(&[("EOS", Style::String)]));
}

#[test]
fn binaries_are_not_heredocs() {
    assert_eq!(
        significant("<<1, 2>>"),
        owned(&[
            ("<<", Style::Operator),
            ("1", Style::Number),
            ("2", Style::Number),
            (">>", Style::Operator),
        ])
    );
}

#[test]
fn block_comments() {
    let (lines, state) = run(&["\"\"\"", "  anything \"goes", "\"\"\"", "x"]);
    assert_eq!(lines[0], owned(&[("\"\"\"", Style::Comment)]));
    assert_eq!(lines[1], owned(&[("  anything \"goes", Style::Comment)]));
    assert_eq!(lines[2], owned(&[("\"\"\"", Style::Comment)]));
    assert_eq!(lines[3], owned(&[("x", Style::Identifier)]));
    assert!(state.at_base());
}

#[test]
fn scopes_follow_blocks_and_brackets() {
    let grammar = elixir();
    let mut state = grammar.start_state();
    let mut depths = Vec::new();
    for text in [
        "defmodule Foo do",
        "  def run(x) do",
        "    [x,",
        "     x]",
        "  end",
        "end",
    ] {
        tokenize_line(&grammar, &mut state, text);
        let GrammarState::Elixir(elixir) = &state else {
            panic!("foreign state");
        };
        depths.push(elixir.contexts().len());
    }
    assert_eq!(depths, vec![2, 3, 4, 3, 2, 1]);
}

#[test]
fn scope_frames_record_line_indentation() {
    let (_, state) = run(&["defmodule Foo do", "  def run(x) do"]);
    let indents: Vec<_> = state.contexts().iter().map(|c| c.indented).collect();
    assert_eq!(indents, vec![-2, 0, 2]);
    assert_eq!(state.contexts()[1].kind, ContextKind::Keyword);
}

#[rstest]
#[case::statement_if(&["if ok do", "end"], 1)]
#[case::inline_if(&["y = if ok, do: 1, else: 2"], 1)]
#[case::bare_do(&["do"], 2)]
#[case::stray_end(&["end", "end"], 1)]
#[case::stray_close(&[")", "]"], 1)]
fn scope_depth(#[case] lines: &[&str], #[case] expected: usize) {
    let (_, state) = run(lines);
    assert_eq!(state.contexts().len(), expected);
}

#[test]
fn parameter_lists_define_names() {
    let (lines, state) = run(&["list do |a, b|"]);
    let defined: Vec<_> = lines[0]
        .iter()
        .filter(|(_, style)| *style == Style::Definition)
        .map(|(text, _)| text.as_str())
        .collect();
    assert_eq!(defined, vec!["a", "b"]);
    assert!(!state.in_var_list());

    let (_, open) = run(&["each {|item"]);
    assert!(open.in_var_list());
}

#[test]
fn pipe_outside_parameter_lists_is_an_operator() {
    assert_eq!(
        significant("a || b"),
        owned(&[
            ("a", Style::Identifier),
            ("||", Style::Operator),
            ("b", Style::Identifier),
        ])
    );
}

#[rstest]
#[case::trailing_operator("x = 1 +", true)]
#[case::trailing_backslash("foo \\", true)]
#[case::trailing_dot("map.", true)]
#[case::complete("x = 1", false)]
#[case::comment("x = 1 # +", false)]
fn continued_lines(#[case] text: &str, #[case] continued: bool) {
    let (_, state) = run(&[text]);
    assert_eq!(state.continued_line(), continued);
}

#[test]
fn empty_line_yields_no_tokens_and_clears_continuation() {
    let grammar = elixir();
    let mut state = grammar.start_state();
    tokenize_line(&grammar, &mut state, "x = 1 +");
    let tokens = tokenize_line(&grammar, &mut state, "");
    assert!(tokens.is_empty());
    let GrammarState::Elixir(elixir) = &state else {
        panic!("foreign state");
    };
    assert!(!elixir.continued_line());
}

#[test]
fn last_token_tracks_keywords_and_markers() {
    let (_, state) = run(&["case x do"]);
    assert_eq!(state.last_token(), Some(&LastToken::Keyword("do".to_owned())));

    let (_, state) = run(&["f(  # open"]);
    assert_eq!(
        state.last_token(),
        Some(&LastToken::Marker(Marker::Open(Bracket::Paren)))
    );

    let (_, state) = run(&["x = 1"]);
    assert_eq!(state.last_token(), Some(&LastToken::Other));
}

#[test]
fn tokens_are_never_empty() {
    let grammar = elixir();
    let mut state = grammar.start_state();
    let tokens = tokenize_line(&grammar, &mut state, "\"#{\"#{x}\"}\" <> ~s(#{y})");
    assert!(tokens.iter().all(|token| token.len > 0));
    assert_eq!(
        tokens.iter().map(|t| t.len).sum::<usize>(),
        "\"#{\"#{x}\"}\" <> ~s(#{y})".len()
    );
    assert_eq!(tokens.first(), Some(&Token::new(3, Style::InterpolatedString)));
}

#[test]
fn popping_the_base_frame_is_a_no_op() {
    let mut state = ScannerState::new(&LexerOptions::default());
    state.pop_frame();
    state.pop_context();
    assert_eq!(state.frames(), &[Frame::Base]);
    assert_eq!(state.contexts().len(), 1);
}

#[test]
fn states_missing_their_roots_are_repaired() {
    let options = LexerOptions::default();
    let mut state = ScannerState::new(&options);
    state.tokenize.clear();
    state.context = vec![ContextFrame {
        kind: ContextKind::Keyword,
        indented: 0,
    }];

    let grammar = ElixirGrammar::new(options);
    let mut cur = LineCursor::new("end", options.tab_size);
    assert_eq!(grammar.token(&mut cur, &mut state), Style::Keyword);
    assert_eq!(state.frames(), &[Frame::Base]);
    assert_eq!(
        state.contexts(),
        &[ContextFrame {
            kind: ContextKind::Top,
            indented: -2,
        }]
    );
}
