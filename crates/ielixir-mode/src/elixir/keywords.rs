//! Word tables. Each list is sorted so lookups can binary search.

const KEYWORDS: &[&str] = &[
    "__CALLER__",
    "__DIR__",
    "__ENV__",
    "__FILE__",
    "__MODULE__",
    "after",
    "alias",
    "case",
    "catch",
    "cond",
    "def",
    "defimpl",
    "defmacro",
    "defmodule",
    "defp",
    "defprotocol",
    "defstruct",
    "do",
    "else",
    "end",
    "false",
    "fn",
    "for",
    "if",
    "in",
    "next",
    "nil",
    "quote",
    "raise",
    "receive",
    "require",
    "rescue",
    "throw",
    "true",
    "try",
    "unless",
    "unquote",
    "use",
    "when",
    "with",
];

const INDENT_WORDS: &[&str] = &[
    "->",
    "case",
    "catch",
    "cond",
    "def",
    "defmodule",
    "defp",
    "rescue",
    "try",
];

const DEFINITION_WORDS: &[&str] = &["def", "defmacro", "defp"];

/// What a keyword does to the scope stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Directive {
    Indent,
    Dedent,
}

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.binary_search(&word).is_ok()
}

pub(crate) fn is_indent_word(word: &str) -> bool {
    INDENT_WORDS.binary_search(&word).is_ok()
}

pub(crate) fn is_dedent_word(word: &str) -> bool {
    word == "end"
}

pub(crate) fn is_definition_word(word: &str) -> bool {
    DEFINITION_WORDS.binary_search(&word).is_ok()
}
