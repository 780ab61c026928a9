//! Recursive-descent parser entry points (spec.md §4), grounded in
//! `Parser_Declarator.cpp`. Each sub-module owns one grammar layer;
//! all of them share the `TokenCursor`/`ParseContext` pair and return
//! `CoreResult<(T, TokenCursor)>` — the new cursor position on success,
//! the old cursor implicitly discarded (still owned by the caller) on
//! failure, matching the original's snapshot-and-restore discipline
//! without any in-place mutation to undo.

pub mod declaration;
pub mod declarator;
pub mod expr;
pub mod types;

use crate::cursor::TokenCursor;
use crate::errors::{CoreError, CoreResult};
use crate::lexer::TokenKind;

/// `true` if the token under the cursor is an `Ident` whose spelling is
/// exactly `text` — the Rust shape of the original's `TestToken(cursor,
/// L"...")` macro.
pub(crate) fn test_keyword(cursor: &TokenCursor, text: &str) -> bool {
    matches!(cursor.current(), Some(t) if t.kind == TokenKind::Ident && t.text == text)
}

pub(crate) fn test_punct(cursor: &TokenCursor, kind: TokenKind) -> bool {
    matches!(cursor.current(), Some(t) if t.kind == kind)
}

/// Two adjacent single-character punctuation tokens with no space
/// between them, e.g. `-` immediately followed by `>` for `->`. This is
/// the `TEST_AND_SKIP`-style adjacency check spec.md §4.1 calls out.
pub(crate) fn test_adjacent_punct(
    cursor: &TokenCursor,
    first: TokenKind,
    second: TokenKind,
) -> bool {
    let Some(a) = cursor.current() else { return false };
    let Some(b) = cursor.lookahead(1) else { return false };
    a.kind == first && b.kind == second && b.immediately_follows(a)
}

pub(crate) fn skip_keyword(cursor: &TokenCursor, text: &str) -> Option<TokenCursor> {
    if test_keyword(cursor, text) {
        Some(cursor.advance())
    } else {
        None
    }
}

pub(crate) fn skip_punct(cursor: &TokenCursor, kind: TokenKind) -> Option<TokenCursor> {
    if test_punct(cursor, kind) {
        Some(cursor.advance())
    } else {
        None
    }
}

pub(crate) fn require_punct(cursor: &TokenCursor, kind: TokenKind) -> CoreResult<TokenCursor> {
    skip_punct(cursor, kind).ok_or_else(|| CoreError::StopParsing {
        span: current_span(cursor),
        message: format!("expected {kind:?}"),
    })
}

pub(crate) fn require_keyword(cursor: &TokenCursor, text: &str) -> CoreResult<TokenCursor> {
    skip_keyword(cursor, text).ok_or_else(|| CoreError::StopParsing {
        span: current_span(cursor),
        message: format!("expected '{text}'"),
    })
}

pub(crate) fn current_span(cursor: &TokenCursor) -> crate::base::Span {
    cursor
        .current()
        .map(|t| t.span)
        .unwrap_or_else(|| crate::base::Span::point(crate::base::TextSize::from(0)))
}
