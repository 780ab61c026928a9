//! Lexer — an external collaborator per spec.md §1, included here only
//! so the crate is runnable end to end. It produces a flat sequence of
//! tokens with kinds, spellings, and byte offsets; everything past that
//! (grammar, adjacency-sensitive multi-token operators, keyword
//! recognition by spelling) belongs to the parser.
//!
//! Punctuation is tokenized character-by-character rather than
//! pre-combined (`->` is two adjacent `Minus`/`Gt` tokens, not an
//! `Arrow` token) so the parser's adjacency test over consecutive token
//! `start` offsets — the mechanism spec.md §4.1 calls out explicitly —
//! has something to test. Keywords (`const`, `namespace`, `operator`,
//! ...) are not distinct token kinds; they are `Ident` tokens whose text
//! the parser compares against, mirroring `TestToken(cursor, L"const")`
//! in the original.

use logos::Logos;
use smol_str::SmolStr;

use crate::base::{Span, TextSize};

/// A single lexical token: kind, exact source spelling, and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub span: Span,
}

impl Token {
    /// Whether `self` immediately follows `other` in the source with no
    /// intervening bytes — the adjacency test multi-token operator and
    /// `::` recognition relies on.
    pub fn immediately_follows(&self, other: &Token) -> bool {
        other.span.end == self.span.start
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum TokenKind {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 1)]
    Ident,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nullptr")]
    Nullptr,

    #[regex(r"0[xX][0-9a-fA-F]+[uUlL]*")]
    Hex,
    #[regex(r"0[bB][01]+[uUlL]*")]
    Bin,
    #[regex(r"[0-9]+[uUlL]*")]
    Int,
    #[regex(r"[0-9]+\.[0-9]*[fF]?|\.[0-9]+[fF]?|[0-9]+[fF]")]
    Float,

    #[regex(r#"(u8|u|U|L)?"([^"\\]|\\.)*""#)]
    String,
    #[regex(r"(u8|u|U|L)?'([^'\\]|\\.)*'")]
    Char,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("%")]
    Percent,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Not,
    #[token("~")]
    Revert,
    #[token("^")]
    Xor,
    #[token("&")]
    And,
    #[token("|")]
    Or,
    #[token("?")]
    Question,
    #[token("@")]
    At,

    Error,
}

/// Tokenize an entire source string.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(TokenKind::Error);
        let span = lexer.span();
        tokens.push(Token {
            kind,
            text: SmolStr::new(lexer.slice()),
            span: Span::new(
                TextSize::try_from(span.start).unwrap(),
                TextSize::try_from(span.end).unwrap(),
            ),
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_skipping_trivia() {
        let tokens = tokenize("int  x ; // trailing\n");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Semicolon]
        );
    }

    #[test]
    fn multi_char_operator_is_adjacent_single_tokens() {
        let tokens = tokenize("a->b");
        assert_eq!(tokens[1].kind, TokenKind::Sub);
        assert_eq!(tokens[2].kind, TokenKind::Gt);
        assert!(tokens[2].immediately_follows(&tokens[1]));
    }

    #[test]
    fn spaced_operator_is_not_adjacent() {
        let tokens = tokenize("a - > b");
        assert_eq!(tokens[1].kind, TokenKind::Sub);
        assert_eq!(tokens[2].kind, TokenKind::Gt);
        assert!(!tokens[2].immediately_follows(&tokens[1]));
    }
}
