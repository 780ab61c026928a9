//! Type grammar: primitive keywords, the long-type phase, and operator
//! names. Grounded in `Parser_Declarator.cpp`'s `ParsePrimitiveType`,
//! `ParseLongType`, and `ParseCppName`.

use crate::ast::ty::{
    CallingConvention, GenericArgument, PrimitiveKeyword, PrimitivePrefix, ReferenceKind, Type,
};
use crate::ast::{CppName, NameKind, QualifiedName};
use crate::base::IStr;
use crate::cursor::TokenCursor;
use crate::errors::{CoreError, CoreResult};
use crate::lexer::TokenKind;
use crate::parser::{
    current_span, require_punct, skip_keyword, skip_punct, test_adjacent_punct, test_keyword,
    test_punct,
};

/// Longest-match-first operator-name table: an entry earlier in this
/// list that is a token-prefix of a later one must be tried after it,
/// so multi-token operator names are checked longest-first exactly as
/// `ParseCppName` does (`operator ->*` before `operator ->` before
/// `operator -`, etc). Each entry is the sequence of token spellings
/// that must appear, adjacently, after the `operator` keyword.
const OPERATOR_NAMES: &[&[&str]] = &[
    &["->", "*"],
    &["->"],
    &["(", ")"],
    &["[", "]"],
    &["new", "[", "]"],
    &["delete", "[", "]"],
    &["new"],
    &["delete"],
    &["+", "+"],
    &["-", "-"],
    &["<", "="],
    &[">", "="],
    &["<", "<", "="],
    &[">", ">", "="],
    &["<", "<"],
    &[">", ">"],
    &["=", "="],
    &["!", "="],
    &["&", "&"],
    &["|", "|"],
    &["+", "="],
    &["-", "="],
    &["*", "="],
    &["/", "="],
    &["%", "="],
    &["&", "="],
    &["|", "="],
    &["^", "="],
    &["+"],
    &["-"],
    &["*"],
    &["/"],
    &["%"],
    &["&"],
    &["|"],
    &["^"],
    &["~"],
    &["!"],
    &["<"],
    &[">"],
    &["="],
    &[","],
];

/// Whether `spelling` is one of the fixed symbolic-operator spellings
/// `OPERATOR_NAMES` can produce (`"+"`, `"[]"`, `"->*"`, ...) rather than
/// a conversion-operator's printed target-type spelling. Used to tell
/// the two `NameKind::Operator` shapes apart after parsing, since spec.md
/// §3 gives operator names a single classification and the distinction
/// only shows up in what the verbatim spelling looks like.
pub(crate) fn is_symbolic_operator_spelling(spelling: &str) -> bool {
    OPERATOR_NAMES
        .iter()
        .any(|entry| entry.concat() == spelling)
}

/// Parse `operator <op>` or `operator <conversion-type>` starting
/// *after* the `operator` keyword has already been recognized. Tries
/// the table above in order (already longest-first), then falls back
/// to a conversion-operator name (`operator bool`, `operator T*`, ...)
/// whose spelling is just the printed target type.
fn parse_operator_name(cursor: &TokenCursor) -> CoreResult<(CppName, TokenCursor)> {
    'entries: for entry in OPERATOR_NAMES {
        let mut here = cursor.clone();
        let mut tokens = [None, None, None, None];
        let mut spelling = String::new();
        let mut previous_punct: Option<crate::lexer::Token> = None;
        for (i, piece) in entry.iter().enumerate() {
            let Some(tok) = here.current().cloned() else {
                continue 'entries;
            };
            if tok.text != *piece {
                continue 'entries;
            }
            // Multi-character punctuation operators (`->`, `<<=`, ...)
            // must be spelled with no whitespace between their
            // constituent single-char tokens; keyword pieces like
            // `new`/`delete` have no such constraint.
            if let Some(prev) = &previous_punct {
                if piece.chars().next().is_some_and(|c| !c.is_alphanumeric())
                    && !tok.immediately_follows(prev)
                {
                    continue 'entries;
                }
            }
            if i < 4 {
                tokens[i] = Some(tok.span);
            }
            spelling.push_str(piece);
            previous_punct = Some(tok.clone());
            here = here.advance();
        }
        return Ok((
            CppName {
                kind: NameKind::Operator,
                spelling: IStr::from(spelling.as_str()),
                tokens,
            },
            here,
        ));
    }

    // Conversion operator: `operator` followed by a type with no name.
    let (ty, after) = parse_long_type(cursor)?;
    let span = ty.span();
    Ok((
        CppName {
            kind: NameKind::Operator,
            spelling: IStr::from(conversion_operator_spelling(&ty).as_str()),
            tokens: [Some(span), None, None, None],
        },
        after,
    ))
}

/// The verbatim spelling a conversion operator's target type contributes
/// to its `CppName` (spec.md §4.2: "the spelling of the recognized
/// operator is stored verbatim"). Two conversion operators to different
/// target types (`operator bool()` vs. `operator int()`) must land under
/// distinct names so member lookup and overload grouping tell them
/// apart; covers the surface-type shapes a conversion-operator target
/// can actually take (primitives, pointers/references, cv-qualifiers,
/// named types) and falls back to "conversion" for shapes that cannot
/// occur there (a function or decltype type).
fn conversion_operator_spelling(ty: &Type) -> String {
    match ty {
        Type::Primitive { prefix, keyword, .. } => {
            let prefix_text = match prefix {
                PrimitivePrefix::None => "",
                PrimitivePrefix::Signed => "signed ",
                PrimitivePrefix::Unsigned => "unsigned ",
            };
            format!("{prefix_text}{}", primitive_keyword_spelling(*keyword))
        }
        Type::Reference { kind, inner, .. } => {
            let suffix = match kind {
                ReferenceKind::Ptr => "*",
                ReferenceKind::LRef => "&",
                ReferenceKind::RRef => "&&",
            };
            format!("{}{suffix}", conversion_operator_spelling(inner))
        }
        Type::Decorate {
            is_const,
            is_volatile,
            inner,
            ..
        } => {
            let mut spelling = conversion_operator_spelling(inner);
            if *is_const {
                spelling.push_str(" const");
            }
            if *is_volatile {
                spelling.push_str(" volatile");
            }
            spelling
        }
        Type::Named { name, .. } => name
            .segments
            .iter()
            .map(|s| s.spelling.as_ref())
            .collect::<Vec<_>>()
            .join("::"),
        Type::Generic { base, .. } => conversion_operator_spelling(base),
        _ => "conversion".to_string(),
    }
}

fn primitive_keyword_spelling(keyword: PrimitiveKeyword) -> &'static str {
    match keyword {
        PrimitiveKeyword::Auto => "auto",
        PrimitiveKeyword::Void => "void",
        PrimitiveKeyword::Bool => "bool",
        PrimitiveKeyword::Char => "char",
        PrimitiveKeyword::WChar => "wchar_t",
        PrimitiveKeyword::Char16 => "char16_t",
        PrimitiveKeyword::Char32 => "char32_t",
        PrimitiveKeyword::Short => "short",
        PrimitiveKeyword::Int => "int",
        PrimitiveKeyword::Int8 => "__int8",
        PrimitiveKeyword::Int16 => "__int16",
        PrimitiveKeyword::Int32 => "__int32",
        PrimitiveKeyword::Int64 => "__int64",
        PrimitiveKeyword::Float => "float",
        PrimitiveKeyword::Double => "double",
        PrimitiveKeyword::Long => "long",
        PrimitiveKeyword::LongLong => "long long",
        PrimitiveKeyword::LongDouble => "long double",
    }
}

/// Parse a `CppName`: a plain identifier, `operator ...`, `~Name`
/// (destructor), or a bare identifier matching the enclosing class
/// name (constructor) — the last case is disambiguated by the
/// declaration parser, not here, since this layer does not track
/// enclosing-class context.
pub fn parse_cpp_name(cursor: &TokenCursor) -> CoreResult<(CppName, TokenCursor)> {
    if test_keyword(cursor, "operator") {
        let after_kw = cursor.advance();
        return parse_operator_name(&after_kw);
    }
    if test_punct(cursor, TokenKind::Revert) {
        let after_tilde = cursor.advance();
        let tilde_span = current_span(cursor);
        let (name, after_name) = parse_cpp_name(&after_tilde)?;
        let name_span = name.span().unwrap_or(tilde_span);
        return Ok((
            CppName {
                kind: NameKind::Destructor,
                spelling: IStr::from(format!("~{}", name.spelling).as_str()),
                tokens: [Some(tilde_span), name.tokens[0], None, None],
            },
            {
                let _ = name_span;
                after_name
            },
        ));
    }
    match cursor.current() {
        Some(tok) if tok.kind == TokenKind::Ident => Ok((
            CppName {
                kind: NameKind::Normal,
                spelling: IStr::from(tok.text.as_str()),
                tokens: [Some(tok.span), None, None, None],
            },
            cursor.advance(),
        )),
        _ => Err(CoreError::StopParsing {
            span: current_span(cursor),
            message: "expected a name".to_string(),
        }),
    }
}

/// Parse `a::b::c`, where each segment is a `CppName` (so operator
/// names and destructors can appear as the final segment).
pub fn parse_qualified_name(cursor: &TokenCursor) -> CoreResult<(QualifiedName, TokenCursor)> {
    let (first, mut here) = parse_cpp_name(cursor)?;
    let mut segments = vec![first];
    loop {
        if test_adjacent_punct(&here, TokenKind::Colon, TokenKind::Colon) {
            let after_colons = here.advance().advance();
            let (segment, after_segment) = parse_cpp_name(&after_colons)?;
            segments.push(segment);
            here = after_segment;
        } else {
            break;
        }
    }
    Ok((QualifiedName { segments }, here))
}

/// The full primitive-keyword table, absorbing a following
/// `long`/`double` into `long long`/`long double` the way
/// `ParsePrimitiveType` does.
fn parse_primitive_keyword(cursor: &TokenCursor) -> Option<(PrimitiveKeyword, TokenCursor)> {
    const TABLE: &[(&str, PrimitiveKeyword)] = &[
        ("auto", PrimitiveKeyword::Auto),
        ("void", PrimitiveKeyword::Void),
        ("bool", PrimitiveKeyword::Bool),
        ("char", PrimitiveKeyword::Char),
        ("wchar_t", PrimitiveKeyword::WChar),
        ("char16_t", PrimitiveKeyword::Char16),
        ("char32_t", PrimitiveKeyword::Char32),
        ("short", PrimitiveKeyword::Short),
        ("int", PrimitiveKeyword::Int),
        ("__int8", PrimitiveKeyword::Int8),
        ("__int16", PrimitiveKeyword::Int16),
        ("__int32", PrimitiveKeyword::Int32),
        ("__int64", PrimitiveKeyword::Int64),
        ("float", PrimitiveKeyword::Float),
        ("double", PrimitiveKeyword::Double),
    ];
    for (text, keyword) in TABLE {
        if test_keyword(cursor, text) {
            return Some((*keyword, cursor.advance()));
        }
    }
    if test_keyword(cursor, "long") {
        let after_long = cursor.advance();
        if test_keyword(&after_long, "long") {
            return Some((PrimitiveKeyword::LongLong, after_long.advance()));
        }
        if test_keyword(&after_long, "double") {
            return Some((PrimitiveKeyword::LongDouble, after_long.advance()));
        }
        return Some((PrimitiveKeyword::Long, after_long));
    }
    None
}

/// `ParsePrimitiveType`: an optional `signed`/`unsigned` prefix
/// followed by a primitive keyword table lookup.
pub fn parse_primitive_type(cursor: &TokenCursor) -> Option<(Type, TokenCursor)> {
    let span_start = current_span(cursor);
    let (prefix, after_prefix) = if let Some(after) = skip_keyword(cursor, "signed") {
        (PrimitivePrefix::Signed, after)
    } else if let Some(after) = skip_keyword(cursor, "unsigned") {
        (PrimitivePrefix::Unsigned, after)
    } else {
        (PrimitivePrefix::None, cursor.clone())
    };

    if let Some((keyword, after_keyword)) = parse_primitive_keyword(&after_prefix) {
        let span = span_start.to(current_span(&after_prefix));
        return Some((
            Type::Primitive {
                prefix,
                keyword,
                span,
            },
            after_keyword,
        ));
    }

    if prefix != PrimitivePrefix::None {
        // `signed`/`unsigned` with no keyword defaults to `int`.
        return Some((
            Type::Primitive {
                prefix,
                keyword: PrimitiveKeyword::Int,
                span: span_start,
            },
            after_prefix,
        ));
    }
    None
}

fn parse_calling_convention(cursor: &TokenCursor) -> (CallingConvention, TokenCursor) {
    const TABLE: &[(&str, CallingConvention)] = &[
        ("__cdecl", CallingConvention::Cdecl),
        ("__stdcall", CallingConvention::Stdcall),
        ("__fastcall", CallingConvention::Fastcall),
        ("__thiscall", CallingConvention::Thiscall),
        ("__clrcall", CallingConvention::Clrcall),
        ("__vectorcall", CallingConvention::Vectorcall),
    ];
    for (text, cc) in TABLE {
        if let Some(after) = skip_keyword(cursor, text) {
            return (*cc, after);
        }
    }
    (CallingConvention::None, cursor.clone())
}

/// The long-type phase: a primitive type, a named type, or
/// `decltype(...)`, followed by any number of `<Args...>` generic
/// argument lists and a trailing `...` pack suffix. Short-type
/// (`*`/`&`/`&&`/qualifiers) is layered on top by
/// `crate::parser::declarator`.
pub fn parse_long_type(cursor: &TokenCursor) -> CoreResult<(Type, TokenCursor)> {
    let span_start = current_span(cursor);

    let (mut ty, mut here) = if let Some((prim, after)) = parse_primitive_type(cursor) {
        (prim, after)
    } else if test_keyword(cursor, "decltype") {
        let after_kw = cursor.advance();
        let after_paren = require_punct(&after_kw, TokenKind::LParen)?;
        let (expr, after_expr) = crate::parser::expr::parse_expr(&after_paren)?;
        let after_rparen = require_punct(&after_expr, TokenKind::RParen)?;
        let span = span_start.to(current_span(&after_rparen));
        (
            Type::DeclType {
                expr: Box::new(expr),
                span,
            },
            after_rparen,
        )
    } else {
        let (name, after_name) = parse_qualified_name(cursor)?;
        let span = name.span().unwrap_or(span_start);
        (Type::Named { name, span }, after_name)
    };

    let (_cc, after_cc) = parse_calling_convention(&here);
    here = after_cc;

    if test_punct(&here, TokenKind::Lt) {
        let after_lt = here.advance();
        let mut arguments = Vec::new();
        let mut cursor_iter = after_lt;
        if !test_punct(&cursor_iter, TokenKind::Gt) {
            loop {
                let (arg_ty, after_arg) = parse_long_type(&cursor_iter)?;
                arguments.push(GenericArgument { ty: arg_ty });
                cursor_iter = after_arg;
                if let Some(after_comma) = skip_punct(&cursor_iter, TokenKind::Comma) {
                    cursor_iter = after_comma;
                } else {
                    break;
                }
            }
        }
        let after_gt = require_punct(&cursor_iter, TokenKind::Gt)?;
        let span = span_start.to(current_span(&after_gt));
        ty = Type::Generic {
            base: Box::new(ty),
            arguments,
            span,
        };
        here = after_gt;
    }

    if test_adjacent_punct(&here, TokenKind::Dot, TokenKind::Dot) {
        // `...` pack suffix: three adjacent `.` tokens.
        let second = here.advance();
        if test_adjacent_punct(&second, TokenKind::Dot, TokenKind::Dot) {
            let after_pack = second.advance().advance();
            let span = span_start.to(current_span(&after_pack));
            ty = Type::VariadicPack {
                inner: Box::new(ty),
                span,
            };
            here = after_pack;
        }
    }

    Ok((ty, here))
}
