#![allow(missing_docs)]
#![cfg(feature = "serde")]

use ielixir_mode::{
    ContextKind, Frame, Grammar, GrammarState, LexerOptions, Style, Token, tokenize_line,
};

#[test]
fn checkpoints_survive_serialization() {
    let grammar = Grammar::ielixir(LexerOptions::default());
    let mut state = grammar.start_state();
    for line in ["x = \"open #{", "%{a: [r|"] {
        tokenize_line(&grammar, &mut state, line);
    }

    let json = serde_json::to_string(&state).unwrap();
    let mut restored: GrammarState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);

    let next = "1 |]}\" <> y";
    let expected = tokenize_line(&grammar, &mut state, next);
    let actual: Vec<Token> = tokenize_line(&grammar, &mut restored, next);
    assert_eq!(actual, expected);
    assert_eq!(restored, state);
}

#[test]
fn checkpoints_without_base_frames_are_restored() {
    let grammar = Grammar::elixir(LexerOptions::default());
    let json = r#"{"Elixir":{"tokenize":[],"context":[],"indented":0,"last_token":null,"var_list":false,"continued_line":false}}"#;
    let mut state: GrammarState = serde_json::from_str(json).unwrap();

    let tokens = tokenize_line(&grammar, &mut state, "def x");
    assert_eq!(
        tokens,
        vec![
            Token::new(3, Style::Keyword),
            Token::new(1, Style::None),
            Token::new(1, Style::Definition),
        ]
    );

    let GrammarState::Elixir(state) = state else {
        panic!("expected elixir state");
    };
    assert_eq!(state.frames(), &[Frame::Base]);
    assert_eq!(state.contexts()[0].kind, ContextKind::Top);
}
