#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use ielixir_mode::{Grammar, Highlighter, LexerOptions, Token, tokenize_line};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Snippets that open and close the scanner's multi-line states.
static FRAGMENT_TABLE: &[&str] = &[
    " ", "\t", "\n", "\r\n", "def ", "do", "end", "|", "\"", "'", "#{", "}", "#@x", "\\",
    "<<EOS", "<<-EOS", "EOS", "\"\"\"", "%w(", "%W{", ")", "~r/", "/", ":", ":!", "!", "[r|",
    "[rprint|", "|]", "?\\M-", "0x", "1.0e", "@", "$", "é", "\u{2028}",
];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);

        // split-seed
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;

        while prefix < size {
            let limit = max_size - prefix;

            prefix += append_fragments(&mut data[prefix..], limit);
            prefix += append_line(&mut data[prefix..], size, limit);
        }

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append 1‒N fragments (N chosen randomly) to `buf`, but never exceed
/// `limit`. Returns the number of bytes written.
fn append_fragments(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let n_fragments = rng.random_range(1..=limit.min(8));
        let mut written = 0;

        for _ in 0..n_fragments {
            let f = FRAGMENT_TABLE[rng.random_range(0..FRAGMENT_TABLE.len())].as_bytes();

            // Stop if this fragment would overflow the caller’s slice.
            if written + f.len() > limit {
                break;
            }

            buf[written..written + f.len()].copy_from_slice(f);
            written += f.len();
        }
        written
    })
}

fn append_line(data: &mut [u8], size: usize, limit: usize) -> usize {
    let line = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        match ArbitraryLine::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            Ok(line) => break line,
            Err(_) => continue,
        };
    };

    let len = line.0.len().min(limit);
    data[..len].copy_from_slice(&line.0.as_bytes()[..len]);

    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryLine(String);

impl<'a> Arbitrary<'a> for ArbitraryLine {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let pieces: Vec<u8> = u.arbitrary()?;
        let mut line = String::new();
        for piece in pieces {
            match piece % 4 {
                0 => line.push_str(u.arbitrary::<&str>()?),
                _ => line.push_str(FRAGMENT_TABLE[usize::from(piece) % FRAGMENT_TABLE.len()]),
            }
        }
        line.push('\n');
        Ok(ArbitraryLine(line))
    }
}

fn scan(grammar: &Grammar, lines: &[&str]) -> Vec<Vec<Token>> {
    let mut state = grammar.start_state();
    lines
        .iter()
        .map(|line| tokenize_line(grammar, &mut state, line))
        .collect()
}

fn lexer(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u32::from_le_bytes(data[1..5].try_into().unwrap()) as usize;
    let data = &data[HEADER..];

    let text = String::from_utf8_lossy(data).into_owned();
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let options = LexerOptions {
        indent_unit: u32::from(flags >> 4),
        tab_size: u32::from((flags >> 1) & 7),
    };
    let grammar = if flags & 1 != 0 {
        Grammar::ielixir(options)
    } else {
        Grammar::elixir(options)
    };

    // Tokens are non-empty and cover each line.
    let full = scan(&grammar, &lines);
    for (tokens, line) in full.iter().zip(&lines) {
        assert!(tokens.iter().all(|token| token.len > 0));
        assert_eq!(tokens.iter().map(|token| token.len).sum::<usize>(), line.len());
    }

    // Deterministic.
    assert_eq!(scan(&grammar, &lines), full);

    // The highlighter agrees with a full scan after an edit.
    let mut highlighter = Highlighter::new(grammar.clone());
    highlighter.set_text(&text);
    let edited = split_seed % lines.len();
    let source = (split_seed >> 8) % lines.len();
    highlighter.line_tokens(lines.len() - 1);
    highlighter
        .replace_line(edited, lines[source])
        .expect("edited line is in range");

    let mut expected_lines = lines.clone();
    expected_lines[edited] = lines[source];
    let expected = scan(&grammar, &expected_lines);
    for (index, tokens) in expected.iter().enumerate() {
        assert_eq!(highlighter.line_tokens(index), Some(tokens.as_slice()));
    }
}

fuzz_target!(|data: &[u8]| lexer(data));
