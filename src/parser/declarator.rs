//! Declarator grammar: the short-type/short-declarator phase layered
//! on top of `types::parse_long_type`, and the comma-list driving loop.
//! Grounded in `Parser_Declarator.cpp`'s `ParseShortDeclarator` and the
//! top-level `ParseDeclarator(pa, dr, ir, cursor, declarators)`.

use crate::ast::ty::{CallingConvention, FunctionTypeSurface, Parameter, ReferenceKind, Type};
use crate::ast::{CppName, Declarator, Initializer, InitializerKind};
use crate::context::{DeclaratorRestriction, InitializerRestriction, ParsingDeclaratorArguments};
use crate::cursor::TokenCursor;
use crate::errors::{CoreError, CoreResult};
use crate::lexer::TokenKind;
use crate::parser::types::{parse_cpp_name, parse_long_type};
use crate::parser::{
    current_span, require_punct, skip_keyword, skip_punct, test_adjacent_punct, test_punct,
};

/// `ParseShortType`/`ParseShortDeclarator`: repeatedly wrap `inner` in
/// `*`, `&`, `&&`, or a parenthesized sub-declarator, and collect
/// trailing qualifiers (`const`, `constexpr`, `volatile`,
/// `__ptr32`/`__ptr64`) at each layer. Returns the built-up type and
/// the (possibly still absent) name found at the innermost layer.
fn parse_short_declarator(
    cursor: &TokenCursor,
    mut inner: Type,
) -> CoreResult<(Type, CppName, TokenCursor)> {
    let span_start = current_span(cursor);
    let mut here = cursor.clone();

    let reference_kind = if test_punct(&here, TokenKind::Mul) {
        Some(ReferenceKind::Ptr)
    } else if test_punct(&here, TokenKind::And) {
        if test_adjacent_punct(&here, TokenKind::And, TokenKind::And) {
            Some(ReferenceKind::RRef)
        } else {
            Some(ReferenceKind::LRef)
        }
    } else {
        None
    };

    if let Some(kind) = reference_kind {
        here = match kind {
            ReferenceKind::Ptr => here.advance(),
            ReferenceKind::LRef => here.advance(),
            ReferenceKind::RRef => here.advance().advance(),
        };

        // `alignas(N)` between the pointer/reference token and any
        // qualifiers is recognized but carries no type-level effect in
        // this subset (no layout computation is performed).
        if let Some(after_alignas) = skip_keyword(&here, "alignas") {
            let after_paren = require_punct(&after_alignas, TokenKind::LParen)?;
            let (_expr, after_expr) = crate::parser::expr::parse_expr(&after_paren)?;
            here = require_punct(&after_expr, TokenKind::RParen)?;
        }

        let mut is_const = false;
        let mut is_const_expr = false;
        let mut is_volatile = false;
        loop {
            if let Some(after) = skip_keyword(&here, "const") {
                is_const = true;
                here = after;
            } else if let Some(after) = skip_keyword(&here, "constexpr") {
                is_const_expr = true;
                here = after;
            } else if let Some(after) = skip_keyword(&here, "volatile") {
                is_volatile = true;
                here = after;
            } else if let Some(after) = skip_keyword(&here, "__ptr32") {
                here = after;
            } else if let Some(after) = skip_keyword(&here, "__ptr64") {
                here = after;
            } else {
                break;
            }
        }

        let wrapped = Type::Reference {
            kind,
            inner: Box::new(inner),
            span: span_start.to(current_span(&here)),
        };
        let qualified = if is_const || is_const_expr || is_volatile {
            Type::Decorate {
                is_const,
                is_const_expr,
                is_volatile,
                inner: Box::new(wrapped),
                span: span_start.to(current_span(&here)),
            }
        } else {
            wrapped
        };

        return parse_short_declarator(&here, qualified);
    }

    if let Some(after_lparen) = skip_punct(&here, TokenKind::LParen) {
        // Parenthesized sub-declarator, e.g. `int (*f)(int)` — recurse
        // into the parenthesized form, then require a matching `)`.
        let (sub_ty, name, after_sub) = parse_short_declarator(&after_lparen, inner.clone())?;
        let after_rparen = require_punct(&after_sub, TokenKind::RParen)?;
        here = after_rparen;
        inner = sub_ty;
        let (final_ty, after_suffix) = parse_declarator_suffixes(&here, inner)?;
        return Ok((final_ty, name, after_suffix));
    }

    // Innermost layer: an optional name, then any trailing array/
    // function suffixes.
    let (name, after_name) = if test_punct(&here, TokenKind::RParen)
        || test_punct(&here, TokenKind::Comma)
        || test_punct(&here, TokenKind::Semicolon)
        || test_punct(&here, TokenKind::Eq)
        || here.at_end()
    {
        (CppName::empty(), here.clone())
    } else {
        parse_cpp_name(&here)?
    };

    let (final_ty, after_suffix) = parse_declarator_suffixes(&after_name, inner)?;
    Ok((final_ty, name, after_suffix))
}

/// `[N]` array suffixes and a trailing `(params...) quals` function
/// suffix, applied innermost-first (the original builds the function/
/// array wrapper around what was parsed so far, then that becomes the
/// `inner` of the next outer layer as short-declarator unwinds).
fn parse_declarator_suffixes(cursor: &TokenCursor, inner: Type) -> CoreResult<(Type, TokenCursor)> {
    let span_start = current_span(cursor);
    let mut here = cursor.clone();
    let mut ty = inner;

    while let Some(after_lbracket) = skip_punct(&here, TokenKind::LBracket) {
        let (dim, after_dim) = if test_punct(&after_lbracket, TokenKind::RBracket) {
            (None, after_lbracket)
        } else {
            let (expr, after_expr) = crate::parser::expr::parse_expr(&after_lbracket)?;
            (Some(expr), after_expr)
        };
        let after_rbracket = require_punct(&after_dim, TokenKind::RBracket)?;
        // The array bound expression is retained only for re-printing;
        // this subset does not evaluate it to a constant, so the
        // surface AST records presence/absence as a `Generic`-free
        // `Array`-shaped `Decorate`-free wrapper is not modeled here —
        // instead the bound collapses to "known" vs "unknown" at the
        // `Tsys` canonicalization stage (spec.md §6.3).
        let _ = dim;
        ty = Type::Generic {
            base: Box::new(ty),
            arguments: Vec::new(),
            span: span_start.to(current_span(&after_rbracket)),
        };
        here = after_rbracket;
    }

    if let Some(after_lparen) = skip_punct(&here, TokenKind::LParen) {
        let mut params = Vec::new();
        let mut cursor_iter = after_lparen;
        let mut is_variadic = false;
        if !test_punct(&cursor_iter, TokenKind::RParen) {
            loop {
                if let Some(after_dots) = try_skip_ellipsis(&cursor_iter) {
                    is_variadic = true;
                    cursor_iter = after_dots;
                    break;
                }
                let (param_ty, after_ty) = parse_long_type(&cursor_iter)?;
                let (full_ty, param_name, after_decl) =
                    parse_short_declarator(&after_ty, param_ty)?;
                params.push(Parameter {
                    ty: full_ty,
                    name: if param_name.is_present() {
                        Some(param_name)
                    } else {
                        None
                    },
                });
                cursor_iter = after_decl;
                if let Some(after_comma) = skip_punct(&cursor_iter, TokenKind::Comma) {
                    cursor_iter = after_comma;
                } else {
                    break;
                }
            }
        }
        let after_rparen = require_punct(&cursor_iter, TokenKind::RParen)?;
        here = after_rparen;

        let mut qualifier_const = false;
        let mut qualifier_volatile = false;
        let mut qualifier_const_expr = false;
        let mut qualifier_lref = false;
        let mut qualifier_rref = false;
        loop {
            if let Some(after) = skip_keyword(&here, "const") {
                qualifier_const = true;
                here = after;
            } else if let Some(after) = skip_keyword(&here, "constexpr") {
                qualifier_const_expr = true;
                here = after;
            } else if let Some(after) = skip_keyword(&here, "volatile") {
                qualifier_volatile = true;
                here = after;
            } else if test_adjacent_punct(&here, TokenKind::And, TokenKind::And) {
                qualifier_rref = true;
                here = here.advance().advance();
            } else if test_punct(&here, TokenKind::And) {
                qualifier_lref = true;
                here = here.advance();
            } else {
                break;
            }
        }

        let cc = CallingConvention::None;
        ty = Type::Function(FunctionTypeSurface {
            ret: Box::new(ty),
            params,
            is_variadic_ellipsis: is_variadic,
            cc,
            qualifier_const,
            qualifier_const_expr,
            qualifier_volatile,
            qualifier_lref,
            qualifier_rref,
        });
    }

    Ok((ty, here))
}

fn try_skip_ellipsis(cursor: &TokenCursor) -> Option<TokenCursor> {
    let a = cursor.current()?;
    if a.kind != TokenKind::Dot {
        return None;
    }
    let b = cursor.lookahead(1)?;
    if b.kind != TokenKind::Dot || !b.immediately_follows(a) {
        return None;
    }
    let c = cursor.lookahead(2)?;
    if c.kind != TokenKind::Dot || !c.immediately_follows(b) {
        return None;
    }
    Some(cursor.advance().advance().advance())
}

/// `ParseInitializer`: `= expr`, `(args...)`, or `{args...}`.
fn parse_initializer(cursor: &TokenCursor) -> CoreResult<Option<(Initializer, TokenCursor)>> {
    let span_start = current_span(cursor);
    if let Some(after_eq) = skip_punct(cursor, TokenKind::Eq) {
        let (expr, after_expr) = crate::parser::expr::parse_expr(&after_eq)?;
        let span = span_start.to(current_span(&after_expr));
        return Ok(Some((
            Initializer {
                kind: InitializerKind::Equal,
                arguments: vec![expr],
                span,
            },
            after_expr,
        )));
    }
    if test_punct(cursor, TokenKind::LParen) {
        let (args, _opened, close) =
            parse_argument_list(cursor, TokenKind::LParen, TokenKind::RParen)?;
        let span = span_start.to(current_span(&close));
        return Ok(Some((
            Initializer {
                kind: InitializerKind::Constructor,
                arguments: args,
                span,
            },
            close,
        )));
    }
    if test_punct(cursor, TokenKind::LBrace) {
        let (args, _opened, close) =
            parse_argument_list(cursor, TokenKind::LBrace, TokenKind::RBrace)?;
        let span = span_start.to(current_span(&close));
        return Ok(Some((
            Initializer {
                kind: InitializerKind::Universal,
                arguments: args,
                span,
            },
            close,
        )));
    }
    Ok(None)
}

fn parse_argument_list(
    cursor: &TokenCursor,
    open: TokenKind,
    close: TokenKind,
) -> CoreResult<(Vec<crate::ast::Expr>, TokenCursor, TokenCursor)> {
    let after_open = require_punct(cursor, open)?;
    let mut args = Vec::new();
    let mut here = after_open.clone();
    if !test_punct(&here, close) {
        loop {
            let (expr, after_expr) = crate::parser::expr::parse_expr(&here)?;
            args.push(expr);
            here = after_expr;
            if let Some(after_comma) = skip_punct(&here, TokenKind::Comma) {
                here = after_comma;
            } else {
                break;
            }
        }
    }
    let after_close = require_punct(&here, close)?;
    Ok((args, after_open, after_close))
}

/// Parse one declarator given an already-parsed base type: short-
/// declarator layers, then an optional initializer honoring `args`'s
/// `InitializerRestriction`.
fn parse_one_declarator(
    cursor: &TokenCursor,
    base_ty: Type,
    args: ParsingDeclaratorArguments,
) -> CoreResult<(Declarator, TokenCursor)> {
    let span_start = current_span(cursor);
    let (ty, name, after_declarator) = parse_short_declarator(cursor, base_ty)?;

    let (initializer, after_init) = match parse_initializer(&after_declarator)? {
        Some((init, after)) => (Some(init), after),
        None => (None, after_declarator),
    };

    match (args.initializer, &initializer) {
        (InitializerRestriction::Required, None) => {
            return Err(CoreError::StopParsing {
                span: current_span(&after_init),
                message: "expected an initializer".to_string(),
            });
        }
        (InitializerRestriction::Forbidden, Some(_)) => {
            return Err(CoreError::StopParsing {
                span: current_span(&after_init),
                message: "initializer not allowed here".to_string(),
            });
        }
        _ => {}
    }

    let span = span_start.to(current_span(&after_init));
    Ok((
        Declarator {
            containing_class: None,
            ty,
            name,
            initializer,
            created_symbol: None,
            span,
        },
        after_init,
    ))
}

/// The top-level driving loop: parse the shared base type once, then
/// one or more comma-separated declarators according to
/// `args.declarator`'s arity, mirroring the original's
/// `itemDr = dr == Many ? One : dr` detail (only the *first* slot in a
/// `Many` list is itself unrestricted to one item — each subsequent
/// item in the comma list is parsed as exactly one declarator).
pub fn parse_declarators(
    cursor: &TokenCursor,
    args: ParsingDeclaratorArguments,
) -> CoreResult<(Vec<Declarator>, TokenCursor)> {
    let (base_ty, after_base) = parse_long_type(cursor)?;

    if args.declarator == DeclaratorRestriction::Zero {
        return Ok((Vec::new(), after_base));
    }

    let item_args = ParsingDeclaratorArguments {
        declarator: DeclaratorRestriction::One,
        initializer: args.initializer,
    };

    let (first, mut here) = parse_one_declarator(&after_base, base_ty.clone(), item_args)?;
    let mut declarators = vec![first];

    if args.declarator == DeclaratorRestriction::Many {
        while let Some(after_comma) = skip_punct(&here, TokenKind::Comma) {
            let (next, after_next) = parse_one_declarator(&after_comma, base_ty.clone(), item_args)?;
            declarators.push(next);
            here = after_next;
        }
    }

    Ok((declarators, here))
}
