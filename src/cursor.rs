//! Token Cursor (spec.md §4.1).
//!
//! An immutable, cheap-to-clone handle to a position in the token
//! stream. Advancing never mutates in place; it returns a new cursor,
//! mirroring `Ptr<CppTokenCursor> cursor->Next()` from the original —
//! callers snapshot a cursor before a speculative parse and restore it
//! on failure just by keeping the old value around.

use std::rc::Rc;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Rc<[Token]>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: Rc::from(tokens),
            pos: 0,
        }
    }

    /// The token under the cursor, or `None` at end of stream.
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Error)
    }

    /// Look `n` tokens ahead without advancing.
    pub fn lookahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    /// A new cursor positioned one token further along. A cursor at end
    /// of stream advances to itself (no token to consume).
    pub fn advance(&self) -> Self {
        if self.pos < self.tokens.len() {
            Self {
                tokens: Rc::clone(&self.tokens),
                pos: self.pos + 1,
            }
        } else {
            self.clone()
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Opaque position marker, comparable for equality within the same
    /// token stream — used to detect "the cursor didn't move" in loops
    /// that must not spin forever on a malformed grammar alternative.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl PartialEq for TokenCursor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tokens, &other.tokens) && self.pos == other.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn advance_is_immutable_and_positional() {
        let cursor = TokenCursor::new(tokenize("a b c"));
        let next = cursor.advance();
        assert_eq!(cursor.position(), 0);
        assert_eq!(next.position(), 1);
        assert_eq!(cursor.current().unwrap().text, "a");
        assert_eq!(next.current().unwrap().text, "b");
    }

    #[test]
    fn advancing_past_end_is_idempotent() {
        let cursor = TokenCursor::new(tokenize("a"));
        let past = cursor.advance();
        assert!(past.at_end());
        let past_again = past.advance();
        assert_eq!(past, past_again);
    }
}
