//! Expression grammar, restricted to the forms the Expression Typer
//! handles (spec.md §7): literals, `this`, `nullptr`, parenthesized
//! sub-expressions, names, and the postfix chain of field access,
//! array access, and call. Grounded in `Ast_Expr_ExprToTsys.cpp`'s
//! `Visit(...)` handler list — there is deliberately no binary-operator
//! grammar here, since nothing in that list types one.

use crate::ast::expr::{FieldAccessOp, Literal, LiteralKind};
use crate::ast::Expr;
use crate::cursor::TokenCursor;
use crate::errors::{CoreError, CoreResult};
use crate::lexer::TokenKind;
use crate::parser::types::{parse_cpp_name, parse_long_type, parse_qualified_name};
use crate::parser::{
    current_span, require_punct, skip_keyword, skip_punct, test_adjacent_punct, test_keyword,
    test_punct,
};

/// All-zero digit scan: true if every digit character in `text` is
/// `0` (ignoring a `0x`/`0b` radix prefix and trailing `u`/`l` suffix
/// letters), grounded in the original literal visitor's zero detection
/// used to give `0` its special `Zero`-pseudotype overload-resolution
/// status (spec.md §6.4, §B.5).
fn is_all_zero_digits(text: &str) -> bool {
    let body = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix("0b"))
        .or_else(|| text.strip_prefix("0B"))
        .unwrap_or(text);
    let digits: String = body.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    !digits.is_empty() && digits.chars().all(|c| c == '0')
}

fn parse_primary(cursor: &TokenCursor) -> CoreResult<(Expr, TokenCursor)> {
    let span = current_span(cursor);

    if let Some(after) = skip_keyword(cursor, "this") {
        return Ok((Expr::This { span }, after));
    }
    if let Some(after) = skip_keyword(cursor, "nullptr") {
        return Ok((Expr::Nullptr { span }, after));
    }
    if let Some(after) = skip_keyword(cursor, "true") {
        return Ok((
            Expr::Literal(Literal {
                kind: LiteralKind::Bool,
                text: crate::base::IStr::from("true"),
                is_zero: false,
                span,
            }),
            after,
        ));
    }
    if let Some(after) = skip_keyword(cursor, "false") {
        return Ok((
            Expr::Literal(Literal {
                kind: LiteralKind::Bool,
                text: crate::base::IStr::from("false"),
                is_zero: false,
                span,
            }),
            after,
        ));
    }
    if let Some(after) = skip_keyword(cursor, "typeid") {
        let after_paren = require_punct(&after, TokenKind::LParen)?;
        let (_inner, after_inner) = parse_expr(&after_paren)?;
        let after_rparen = require_punct(&after_inner, TokenKind::RParen)?;
        return Ok((
            Expr::Typeid {
                span: span.to(current_span(&after_rparen)),
            },
            after_rparen,
        ));
    }

    match cursor.current() {
        Some(tok) if tok.kind == TokenKind::Int => Ok((
            Expr::Literal(Literal {
                kind: LiteralKind::Int,
                text: crate::base::IStr::from(tok.text.as_str()),
                is_zero: is_all_zero_digits(&tok.text),
                span,
            }),
            cursor.advance(),
        )),
        Some(tok) if tok.kind == TokenKind::Hex || tok.kind == TokenKind::Bin => Ok((
            Expr::Literal(Literal {
                kind: LiteralKind::Int,
                text: crate::base::IStr::from(tok.text.as_str()),
                is_zero: is_all_zero_digits(&tok.text),
                span,
            }),
            cursor.advance(),
        )),
        Some(tok) if tok.kind == TokenKind::Float => Ok((
            Expr::Literal(Literal {
                kind: LiteralKind::Float,
                text: crate::base::IStr::from(tok.text.as_str()),
                is_zero: false,
                span,
            }),
            cursor.advance(),
        )),
        Some(tok) if tok.kind == TokenKind::String => Ok((
            Expr::Literal(Literal {
                kind: LiteralKind::String,
                text: crate::base::IStr::from(tok.text.as_str()),
                is_zero: false,
                span,
            }),
            cursor.advance(),
        )),
        Some(tok) if tok.kind == TokenKind::Char => Ok((
            Expr::Literal(Literal {
                kind: LiteralKind::Char,
                text: crate::base::IStr::from(tok.text.as_str()),
                is_zero: false,
                span,
            }),
            cursor.advance(),
        )),
        _ => {}
    }

    if let Some(after_lparen) = skip_punct(cursor, TokenKind::LParen) {
        // `(Type) expr` cast vs. `(expr)` parenthesis: try the cast
        // reading first, matching the original's "try type, fall back
        // to expression" ambiguity resolution for C-style casts.
        if let Ok((ty, after_ty)) = parse_long_type(&after_lparen) {
            if let Some(after_rparen) = skip_punct(&after_ty, TokenKind::RParen) {
                if let Ok((operand, after_operand)) = parse_unary_operand(&after_rparen) {
                    let full_span = span.to(current_span(&after_operand));
                    return Ok((
                        Expr::Cast {
                            ty,
                            operand: Box::new(operand),
                            span: full_span,
                        },
                        after_operand,
                    ));
                }
            }
        }
        let (inner, after_inner) = parse_expr(&after_lparen)?;
        let after_rparen = require_punct(&after_inner, TokenKind::RParen)?;
        let full_span = span.to(current_span(&after_rparen));
        return Ok((
            Expr::Parenthesis {
                inner: Box::new(inner),
                span: full_span,
            },
            after_rparen,
        ));
    }

    if test_keyword(cursor, "static_cast")
        || test_keyword(cursor, "const_cast")
        || test_keyword(cursor, "reinterpret_cast")
        || test_keyword(cursor, "dynamic_cast")
    {
        let after_kw = cursor.advance();
        let after_lt = require_punct(&after_kw, TokenKind::Lt)?;
        let (ty, after_ty) = parse_long_type(&after_lt)?;
        let after_gt = require_punct(&after_ty, TokenKind::Gt)?;
        let after_lparen = require_punct(&after_gt, TokenKind::LParen)?;
        let (operand, after_operand) = parse_expr(&after_lparen)?;
        let after_rparen = require_punct(&after_operand, TokenKind::RParen)?;
        let full_span = span.to(current_span(&after_rparen));
        return Ok((
            Expr::Cast {
                ty,
                operand: Box::new(operand),
                span: full_span,
            },
            after_rparen,
        ));
    }

    let (name, after_name) = parse_qualified_name(cursor)?;
    let full_span = name.span().unwrap_or(span);
    Ok((Expr::Id { name, span: full_span }, after_name))
}

/// A single operand for a C-style cast, parsed at unary-expression
/// grammar level (no postfix chain re-entry) to avoid ambiguity with
/// the outer postfix loop re-consuming the cast's own result.
fn parse_unary_operand(cursor: &TokenCursor) -> CoreResult<(Expr, TokenCursor)> {
    parse_primary(cursor)
}

fn parse_postfix(cursor: &TokenCursor) -> CoreResult<(Expr, TokenCursor)> {
    let span_start = current_span(cursor);
    let (mut expr, mut here) = parse_primary(cursor)?;

    loop {
        if test_adjacent_punct(&here, TokenKind::Colon, TokenKind::Colon) {
            let after_colons = here.advance().advance();
            let (child, after_child) = parse_cpp_name(&after_colons)?;
            let span = span_start.to(current_span(&after_child));
            expr = Expr::Child {
                parent: Box::new(expr),
                child,
                span,
            };
            here = after_child;
            continue;
        }

        if let Some(after_dot) = skip_punct(&here, TokenKind::Dot) {
            let (member, after_member) = parse_cpp_name(&after_dot)?;
            let span = span_start.to(current_span(&after_member));
            expr = Expr::FieldAccess {
                op: FieldAccessOp::Dot,
                object: Box::new(expr),
                member,
                span,
            };
            here = after_member;
            continue;
        }

        if test_adjacent_punct(&here, TokenKind::Sub, TokenKind::Gt) {
            let after_arrow = here.advance().advance();
            let (member, after_member) = parse_cpp_name(&after_arrow)?;
            let span = span_start.to(current_span(&after_member));
            expr = Expr::FieldAccess {
                op: FieldAccessOp::Arrow,
                object: Box::new(expr),
                member,
                span,
            };
            here = after_member;
            continue;
        }

        if test_punct(&here, TokenKind::LBracket) {
            let after_lbracket = here.advance();
            let (index, after_index) = parse_expr(&after_lbracket)?;
            let after_rbracket = require_punct(&after_index, TokenKind::RBracket)?;
            let span = span_start.to(current_span(&after_rbracket));
            expr = Expr::ArrayAccess {
                object: Box::new(expr),
                index: Box::new(index),
                span,
            };
            here = after_rbracket;
            continue;
        }

        if test_punct(&here, TokenKind::LParen) {
            let after_lparen = here.advance();
            let mut arguments = Vec::new();
            let mut cursor_iter = after_lparen;
            if !test_punct(&cursor_iter, TokenKind::RParen) {
                loop {
                    let (arg, after_arg) = parse_expr(&cursor_iter)?;
                    arguments.push(arg);
                    cursor_iter = after_arg;
                    if let Some(after_comma) = skip_punct(&cursor_iter, TokenKind::Comma) {
                        cursor_iter = after_comma;
                    } else {
                        break;
                    }
                }
            }
            let after_rparen = require_punct(&cursor_iter, TokenKind::RParen)?;
            let span = span_start.to(current_span(&after_rparen));
            expr = Expr::FuncAccess {
                callee: Box::new(expr),
                arguments,
                span,
            };
            here = after_rparen;
            continue;
        }

        break;
    }

    Ok((expr, here))
}

/// Top-level expression entry point. This subset has no binary-
/// operator grammar (spec.md §7 types only the listed expression
/// forms), so an expression is exactly a postfix chain over a primary.
pub fn parse_expr(cursor: &TokenCursor) -> CoreResult<(Expr, TokenCursor)> {
    if cursor.at_end() {
        return Err(CoreError::StopParsing {
            span: current_span(cursor),
            message: "expected an expression".to_string(),
        });
    }
    parse_postfix(cursor)
}
