//! Tests for report tokenization

use super::super::tokenizer::{Token, tokenize};

#[test]
fn test_tokenize_preserves_order() {
    let tokens = tokenize("VVCS 121230Z 03005KT");
    let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();

    assert_eq!(texts, vec!["VVCS", "121230Z", "03005KT"]);
    assert_eq!(tokens[2].position, 2);
}

#[test]
fn test_tokenize_collapses_whitespace() {
    let tokens = tokenize("  VVCS\t121230Z \n\n 03005KT  ");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].text, "VVCS");
    assert_eq!(tokens[2].text, "03005KT");
}

#[test]
fn test_tokenize_empty_input() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   \n\t ").is_empty());
}

#[test]
fn test_token_group_strips_end_marker() {
    let token = Token {
        position: 0,
        text: "18/15=",
    };
    assert_eq!(token.group(), "18/15");
    assert_eq!(token.text, "18/15=");
}
