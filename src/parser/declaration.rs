//! Declaration dispatch: namespace/enum/class/using/variable/function,
//! plus forward-declaration grouping wiring. Grounded in `Parser.h`'s
//! symbol-creation helpers and the forward-declaration-grouping
//! scenario in `TestParseDecl.cpp`.

use crate::ast::decl::{
    AccessSpecifier, BaseSpecifier, ClassDecl, ClassKind, Declaration, EnumDecl, Enumerator,
    FunctionDecl, Member, NamespaceDecl, UsingAliasDecl, UsingNamespaceDecl, VariableDecl,
};
use crate::ast::ty::Type;
use crate::ast::{InitializerKind, Program};
use crate::base::IStr;
use crate::context::{ParseContext, ParsingDeclaratorArguments};
use crate::cursor::TokenCursor;
use crate::errors::{CoreError, CoreResult};
use crate::lexer::TokenKind;
use crate::parser::declarator::parse_declarators;
use crate::parser::types::{parse_cpp_name, parse_qualified_name};
use crate::parser::{current_span, require_punct, skip_keyword, skip_punct, test_keyword, test_punct};

/// Parse an entire translation unit: a sequence of top-level
/// declarations until end of input.
pub fn parse_program(ctx: &mut ParseContext, cursor: &TokenCursor) -> CoreResult<Program> {
    let mut here = cursor.clone();
    let mut decls = Vec::new();
    while !here.at_end() {
        let (decl, after) = parse_declaration(ctx, &here)?;
        decls.push(decl);
        here = after;
    }
    Ok(Program { decls })
}

fn parse_declaration(ctx: &mut ParseContext, cursor: &TokenCursor) -> CoreResult<(Declaration, TokenCursor)> {
    if test_keyword(cursor, "namespace") {
        return parse_namespace(ctx, cursor);
    }
    if test_keyword(cursor, "using") {
        return parse_using(ctx, cursor);
    }
    if test_keyword(cursor, "enum") {
        return parse_enum(ctx, cursor);
    }
    if test_keyword(cursor, "class") || test_keyword(cursor, "struct") || test_keyword(cursor, "union") {
        return parse_class(ctx, cursor);
    }
    parse_variable_or_function(ctx, cursor)
}

fn parse_namespace(ctx: &mut ParseContext, cursor: &TokenCursor) -> CoreResult<(Declaration, TokenCursor)> {
    let span_start = current_span(cursor);
    let after_kw = cursor.advance();
    let (qualified, after_name) = parse_qualified_name(&after_kw)?;

    // `namespace a::b::c { ... }` sugar: nest one namespace symbol per
    // segment rather than a single flattened scope (spec.md §5,
    // "nested namespace sugar").
    let after_lbrace = require_punct(&after_name, TokenKind::LBrace)?;

    let outer_scope = ctx.scope;
    let mut scopes = Vec::with_capacity(qualified.segments.len());
    let mut parent = outer_scope;
    for segment in &qualified.segments {
        // Namespace reopening: every segment of `a::b::c` shares its
        // symbol across every occurrence of that namespace, unlike any
        // other declaration kind (spec.md §3, "only namespace symbols
        // merge multiple declarations into a single symbol").
        let existing = ctx
            .symbols
            .children_named(parent, &segment.spelling)
            .first()
            .copied();
        let placeholder = Declaration::Namespace(NamespaceDecl {
            name: segment.clone(),
            symbol: None,
            span: span_start,
            body: Vec::new(),
        });
        let symbol = match existing {
            Some(symbol) => {
                tracing::trace!("[PARSE] reopening namespace '{}'", segment.spelling);
                ctx.symbols.push_decl(symbol, placeholder);
                symbol
            }
            None => {
                tracing::trace!("[PARSE] opening namespace '{}'", segment.spelling);
                ctx.symbols
                    .create_decl_symbol(parent, segment.spelling.clone(), placeholder)
            }
        };
        scopes.push(symbol);
        parent = symbol;
    }
    let innermost_scope = *scopes.last().unwrap();

    let mut body = Vec::new();
    let mut here = after_lbrace;
    ctx.with_scope(innermost_scope, |ctx| -> CoreResult<()> {
        while !test_punct(&here, TokenKind::RBrace) && !here.at_end() {
            let (decl, after) = parse_declaration(ctx, &here)?;
            body.push(decl);
            here = after;
        }
        Ok(())
    })?;
    let after_rbrace = require_punct(&here, TokenKind::RBrace)?;

    let span = span_start.to(current_span(&after_rbrace));
    let outermost_name = qualified.segments[0].clone();
    let decl = Declaration::Namespace(NamespaceDecl {
        name: outermost_name,
        symbol: Some(scopes[0]),
        span,
        body,
    });
    Ok((decl, after_rbrace))
}

fn parse_using(ctx: &mut ParseContext, cursor: &TokenCursor) -> CoreResult<(Declaration, TokenCursor)> {
    let span_start = current_span(cursor);
    let after_kw = cursor.advance();

    if let Some(after_namespace) = skip_keyword(&after_kw, "namespace") {
        let (target, after_target) = parse_qualified_name(&after_namespace)?;
        let after_semi = require_punct(&after_target, TokenKind::Semicolon)?;
        let span = span_start.to(current_span(&after_semi));

        if let Some(last) = target.segments.last() {
            let candidates = ctx
                .symbols
                .children_named(ctx.scope, &last.spelling)
                .to_vec();
            if let Some(&target_symbol) = candidates.first() {
                ctx.symbols.add_using_namespace(ctx.scope, target_symbol);
            }
        }

        return Ok((
            Declaration::UsingNamespace(UsingNamespaceDecl { target, span }),
            after_semi,
        ));
    }

    // `using Name = Type;` alias.
    let (name, after_name) = parse_cpp_name(&after_kw)?;
    let after_eq = require_punct(&after_name, TokenKind::Eq)?;
    let (target_ty, after_ty) = crate::parser::types::parse_long_type(&after_eq)?;
    let after_semi = require_punct(&after_ty, TokenKind::Semicolon)?;
    let span = span_start.to(current_span(&after_semi));

    let placeholder = Declaration::UsingAlias(UsingAliasDecl {
        name: name.clone(),
        symbol: None,
        span,
        target: target_ty,
    });
    let symbol = create_and_wire_by_name(ctx, name.spelling.clone(), placeholder, false);
    let mut decl = last_decl_of(ctx, symbol);
    decl.set_symbol(symbol);
    Ok((decl, after_semi))
}

fn parse_enum(ctx: &mut ParseContext, cursor: &TokenCursor) -> CoreResult<(Declaration, TokenCursor)> {
    let span_start = current_span(cursor);
    let after_kw = cursor.advance();
    let (is_scoped, after_scoped) = if let Some(after) = skip_keyword(&after_kw, "class") {
        (true, after)
    } else if let Some(after) = skip_keyword(&after_kw, "struct") {
        (true, after)
    } else {
        (false, after_kw)
    };

    let (name, after_name) = parse_cpp_name(&after_scoped)?;

    if let Some(after_colon) = skip_punct(&after_name, TokenKind::Colon) {
        let (ty, after_ty) = crate::parser::types::parse_long_type(&after_colon)?;
        return finish_enum(ctx, span_start, name, is_scoped, Some(ty), &after_ty);
    }

    finish_enum(ctx, span_start, name, is_scoped, None, &after_name)
}

fn finish_enum(
    ctx: &mut ParseContext,
    span_start: crate::base::Span,
    name: crate::ast::CppName,
    is_scoped: bool,
    underlying_type: Option<Type>,
    cursor: &TokenCursor,
) -> CoreResult<(Declaration, TokenCursor)> {
    if let Some(after_semi) = skip_punct(cursor, TokenKind::Semicolon) {
        let span = span_start.to(current_span(&after_semi));
        let placeholder = Declaration::Enum(EnumDecl {
            name: name.clone(),
            symbol: None,
            span,
            is_forward: true,
            is_scoped,
            underlying_type,
            enumerators: Vec::new(),
        });
        let symbol = create_and_wire_by_name(ctx, name.spelling.clone(), placeholder, true);
        let mut decl = last_decl_of(ctx, symbol);
        decl.set_symbol(symbol);
        return Ok((decl, after_semi));
    }

    let after_lbrace = require_punct(cursor, TokenKind::LBrace)?;
    let mut enumerators = Vec::new();
    let mut here = after_lbrace;
    if !test_punct(&here, TokenKind::RBrace) {
        loop {
            let (enumerator_name, after_name) = parse_cpp_name(&here)?;
            let (value, after_value) = if let Some(after_eq) = skip_punct(&after_name, TokenKind::Eq) {
                let (expr, after_expr) = crate::parser::expr::parse_expr(&after_eq)?;
                (Some(expr), after_expr)
            } else {
                (None, after_name)
            };
            enumerators.push(Enumerator {
                name: enumerator_name,
                value,
            });
            here = after_value;
            if let Some(after_comma) = skip_punct(&here, TokenKind::Comma) {
                here = after_comma;
                if test_punct(&here, TokenKind::RBrace) {
                    break;
                }
            } else {
                break;
            }
        }
    }
    let after_rbrace = require_punct(&here, TokenKind::RBrace)?;
    let after_semi = require_punct(&after_rbrace, TokenKind::Semicolon)?;
    let span = span_start.to(current_span(&after_semi));

    let placeholder = Declaration::Enum(EnumDecl {
        name: name.clone(),
        symbol: None,
        span,
        is_forward: false,
        is_scoped,
        underlying_type,
        enumerators,
    });
    let symbol = create_and_wire_by_name(ctx, name.spelling.clone(), placeholder, false);
    let mut decl = last_decl_of(ctx, symbol);
    decl.set_symbol(symbol);
    Ok((decl, after_semi))
}

fn parse_class(ctx: &mut ParseContext, cursor: &TokenCursor) -> CoreResult<(Declaration, TokenCursor)> {
    let span_start = current_span(cursor);
    let kind = if test_keyword(cursor, "class") {
        ClassKind::Class
    } else if test_keyword(cursor, "struct") {
        ClassKind::Struct
    } else {
        ClassKind::Union
    };
    let after_kw = cursor.advance();
    let (name, after_name) = parse_cpp_name(&after_kw)?;

    let (bases, after_bases) = if let Some(after_colon) = skip_punct(&after_name, TokenKind::Colon) {
        let mut bases = Vec::new();
        let mut here = after_colon;
        loop {
            let base_span = current_span(&here);
            let (base_name, after_base_name) = parse_qualified_name(&here)?;
            bases.push(BaseSpecifier {
                name: base_name,
                span: base_span,
            });
            here = after_base_name;
            if let Some(after_comma) = skip_punct(&here, TokenKind::Comma) {
                here = after_comma;
            } else {
                break;
            }
        }
        (bases, here)
    } else {
        (Vec::new(), after_name)
    };

    if let Some(after_semi) = skip_punct(&after_bases, TokenKind::Semicolon) {
        let span = span_start.to(current_span(&after_semi));
        let placeholder = Declaration::Class(ClassDecl {
            name: name.clone(),
            symbol: None,
            span,
            is_forward: true,
            kind,
            bases,
            members: Vec::new(),
        });
        let symbol = create_and_wire_by_name(ctx, name.spelling.clone(), placeholder, true);
        let mut decl = last_decl_of(ctx, symbol);
        decl.set_symbol(symbol);
        return Ok((decl, after_semi));
    }

    let placeholder = Declaration::Class(ClassDecl {
        name: name.clone(),
        symbol: None,
        span: span_start,
        is_forward: false,
        kind,
        bases: bases.clone(),
        members: Vec::new(),
    });
    let symbol = create_and_wire_by_name(ctx, name.spelling.clone(), placeholder, false);

    let after_lbrace = require_punct(&after_bases, TokenKind::LBrace)?;
    let mut members = Vec::new();
    let mut access = match kind {
        ClassKind::Class => AccessSpecifier::Private,
        ClassKind::Struct | ClassKind::Union => AccessSpecifier::Public,
    };
    let mut here = after_lbrace;
    ctx.with_scope(symbol, |ctx| -> CoreResult<()> {
        while !test_punct(&here, TokenKind::RBrace) && !here.at_end() {
            if let Some(new_access) = try_parse_access_specifier(&here) {
                let (specifier, after_colon) = new_access;
                access = specifier;
                here = after_colon;
                continue;
            }
            let (member_decl, after_member) = parse_declaration_with_containing_class(ctx, &here, symbol)?;
            members.push(Member {
                access,
                decl: member_decl,
            });
            here = after_member;
        }
        Ok(())
    })?;
    let after_rbrace = require_punct(&here, TokenKind::RBrace)?;
    let after_semi = require_punct(&after_rbrace, TokenKind::Semicolon)?;
    let span = span_start.to(current_span(&after_semi));

    let decl = Declaration::Class(ClassDecl {
        name,
        symbol: Some(symbol),
        span,
        is_forward: false,
        kind,
        bases,
        members,
    });
    // `symbol` carries only the placeholder pushed when it was created;
    // the forward-declaration group (if any) was already wired at that
    // point by `create_and_wire_by_name`, against this symbol's own
    // identity — replacing the placeholder here does not disturb it.
    *ctx.symbols.get_mut(symbol).decls.last_mut().unwrap() = decl.clone();
    Ok((decl, after_semi))
}

fn try_parse_access_specifier(cursor: &TokenCursor) -> Option<(AccessSpecifier, TokenCursor)> {
    for (text, spec) in [
        ("public", AccessSpecifier::Public),
        ("protected", AccessSpecifier::Protected),
        ("private", AccessSpecifier::Private),
    ] {
        if test_keyword(cursor, text) {
            let after_kw = cursor.advance();
            if let Some(after_colon) = skip_punct(&after_kw, TokenKind::Colon) {
                return Some((spec, after_colon));
            }
        }
    }
    None
}

fn parse_declaration_with_containing_class(
    ctx: &mut ParseContext,
    cursor: &TokenCursor,
    containing_class: crate::symbols::SymbolId,
) -> CoreResult<(Declaration, TokenCursor)> {
    let (mut decl, after) = parse_declaration(ctx, cursor)?;
    match &mut decl {
        Declaration::Variable(v) => v.containing_class = Some(containing_class),
        Declaration::Function(f) => f.containing_class = Some(containing_class),
        _ => {}
    }
    Ok((decl, after))
}

fn parse_variable_or_function(
    ctx: &mut ParseContext,
    cursor: &TokenCursor,
) -> CoreResult<(Declaration, TokenCursor)> {
    let span_start = current_span(cursor);
    let after_static = skip_keyword(cursor, "static");
    let (decorator_static, after_decorators) = match after_static {
        Some(after) => (true, after),
        None => (false, cursor.clone()),
    };

    let (declarators, after_decls) =
        parse_declarators(&after_decorators, ParsingDeclaratorArguments::DECLS)?;

    // A function *definition* (`{ ... }` body) is not followed by a
    // semicolon, unlike every other declarator form this grammar
    // accepts (a variable's own `{}`-initializer still is, since that's
    // a statement, not a definition body); a single function declarator
    // whose initializer is the brace form is the only shape that gets
    // to skip it.
    let is_function_body = declarators.len() == 1
        && matches!(declarators[0].ty, Type::Function(_))
        && matches!(
            declarators[0].initializer.as_ref().map(|i| i.kind),
            Some(InitializerKind::Universal)
        );
    let after_semi = if is_function_body {
        skip_punct(&after_decls, TokenKind::Semicolon).unwrap_or(after_decls)
    } else {
        require_punct(&after_decls, TokenKind::Semicolon)?
    };

    let declarator = declarators
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::StopParsing {
            span: span_start,
            message: "expected a declarator".to_string(),
        })?;

    let is_function = matches!(declarator.ty, Type::Function(_));
    let span = span_start.to(current_span(&after_semi));

    let decl = if is_function {
        Declaration::Function(FunctionDecl {
            name: declarator.name.clone(),
            symbol: None,
            span,
            is_forward: declarator.initializer.is_none(),
            decorator_static,
            is_constructor: false,
            is_destructor: declarator.name.kind == crate::ast::NameKind::Destructor,
            is_conversion_operator: declarator.name.kind == crate::ast::NameKind::Operator
                && !crate::parser::types::is_symbolic_operator_spelling(
                    declarator.name.spelling.as_ref(),
                ),
            containing_class: None,
            ty: declarator.ty,
        })
    } else {
        Declaration::Variable(VariableDecl {
            name: declarator.name.clone(),
            symbol: None,
            span,
            is_forward: declarator.initializer.is_none(),
            decorator_static,
            ty: declarator.ty,
            initializer: declarator.initializer,
            containing_class: None,
        })
    };

    let name_spelling: IStr = decl.name().spelling.clone();
    let is_forward = decl.is_forward();

    // Function overloads each get their own symbol; a redeclaration
    // with the exact same signature is instead grouped as a forward of
    // its matching sibling (spec.md §5.2) rather than mistaken for a
    // distinct overload. Non-function declarations (a class/enum/
    // variable can't overload) match any sibling sharing the name.
    let siblings = if is_function {
        matching_function_siblings(ctx, &name_spelling, &decl)
    } else {
        ctx.symbols.children_named(ctx.scope, &name_spelling).to_vec()
    };
    let symbol = ctx.symbols.create_decl_symbol(ctx.scope, name_spelling, decl);
    let _ = ctx.symbols.wire_forward_group(&siblings, symbol, is_forward);

    let mut final_decl = last_decl_of(ctx, symbol);
    final_decl.set_symbol(symbol);
    Ok((final_decl, after_semi))
}

/// Every sibling function symbol under the current scope whose
/// existing declaration has the exact same surface signature as `decl`
/// (spec.md §B.7's `IsSameResolvedType`) — the candidates a new
/// function declaration of the same name could be a forward/definition
/// of, as opposed to a distinct overload.
fn matching_function_siblings(
    ctx: &ParseContext,
    name: &str,
    decl: &Declaration,
) -> Vec<crate::symbols::SymbolId> {
    let Declaration::Function(new_fn) = decl else {
        return Vec::new();
    };
    ctx.symbols
        .children_named(ctx.scope, name)
        .iter()
        .copied()
        .filter(|&candidate| {
            matches!(
                ctx.symbols.get(candidate).decls.last(),
                Some(Declaration::Function(existing_fn))
                    if Type::is_same_resolved_type(&existing_fn.ty, &new_fn.ty)
            )
        })
        .collect()
}

/// Create a fresh symbol for `decl` under `name` in the current scope
/// and wire it into any existing forward-declaration group sharing
/// that name (spec.md §4.3's policy), used by every declaration kind
/// that can't overload (namespaces aside, which reuse a symbol
/// entirely rather than wiring a forward link — see `parse_namespace`).
fn create_and_wire_by_name(
    ctx: &mut ParseContext,
    name: IStr,
    decl: Declaration,
    is_forward: bool,
) -> crate::symbols::SymbolId {
    let siblings = ctx.symbols.children_named(ctx.scope, &name).to_vec();
    let symbol = ctx.symbols.create_decl_symbol(ctx.scope, name, decl);
    let _ = ctx.symbols.wire_forward_group(&siblings, symbol, is_forward);
    symbol
}

fn last_decl_of(ctx: &ParseContext, symbol: crate::symbols::SymbolId) -> Declaration {
    ctx.symbols.get(symbol).decls.last().unwrap().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseOptions;
    use crate::cursor::TokenCursor;
    use crate::lexer::tokenize;

    fn parse(source: &str) -> (Program, ParseContext<'static>) {
        let tokens = tokenize(source);
        let cursor = TokenCursor::new(tokens);
        let mut ctx = ParseContext::new(ParseOptions::default());
        let program = parse_program(&mut ctx, &cursor).unwrap();
        (program, ctx)
    }

    /// spec.md §8 scenario 1: nested namespace sugar creates one child
    /// per segment, each holding exactly one namespace declaration.
    #[test]
    fn nested_namespace_sugar_creates_one_symbol_per_segment() {
        let (_program, ctx) = parse("namespace a::b::c {}");
        let root = ctx.symbols.root();
        let a = ctx.symbols.children_named(root, "a");
        assert_eq!(a.len(), 1);
        let b = ctx.symbols.children_named(a[0], "b");
        assert_eq!(b.len(), 1);
        let c = ctx.symbols.children_named(b[0], "c");
        assert_eq!(c.len(), 1);
        assert_eq!(ctx.symbols.get(c[0]).decls.len(), 1);
    }

    /// spec.md §8 scenario 2: five enum declarations of `A`, the third
    /// being the definition — the definition's forward list is every
    /// other declaration in order, and every forward points back at it.
    #[test]
    fn enum_forward_declarations_group_around_the_definition() {
        let (_program, ctx) = parse(
            "namespace a { namespace b { \
             enum A; enum A; enum A {}; enum A; enum A; \
             } }",
        );
        let root = ctx.symbols.root();
        let a = ctx.symbols.children_named(root, "a")[0];
        let b = ctx.symbols.children_named(a, "b")[0];
        let children = ctx.symbols.children_named(b, "A");
        assert_eq!(children.len(), 5);

        let definition = children[2];
        assert!(!ctx.symbols.get(definition).is_forward_declaration());
        assert_eq!(
            ctx.symbols.get(definition).forward_declarations,
            vec![children[0], children[1], children[3], children[4]]
        );
        for &forward in &[children[0], children[1], children[3], children[4]] {
            assert_eq!(
                ctx.symbols.get(forward).forward_declaration_root,
                Some(definition)
            );
        }
    }

    #[test]
    fn namespace_reopening_shares_one_symbol() {
        let (_program, ctx) = parse("namespace n { int x; } namespace n { int y; }");
        let root = ctx.symbols.root();
        let n = ctx.symbols.children_named(root, "n");
        assert_eq!(n.len(), 1);
        assert_eq!(ctx.symbols.get(n[0]).decls.len(), 2);
    }

    #[test]
    fn class_forward_then_definition_wires_as_a_group() {
        let (_program, ctx) = parse("class C; class C { int x; };");
        let root = ctx.symbols.root();
        let children = ctx.symbols.children_named(root, "C");
        assert_eq!(children.len(), 2);
        assert!(ctx.symbols.get(children[0]).is_forward_declaration());
        assert!(!ctx.symbols.get(children[1]).is_forward_declaration());
        assert_eq!(
            ctx.symbols.get(children[1]).forward_declarations,
            vec![children[0]]
        );
    }

    #[test]
    fn function_overloads_get_distinct_unwired_symbols() {
        let (_program, ctx) = parse("void f(int) {} void f(double) {}");
        let root = ctx.symbols.root();
        let children = ctx.symbols.children_named(root, "f");
        assert_eq!(children.len(), 2);
        assert!(!ctx.symbols.get(children[0]).is_forward_declaration());
        assert!(!ctx.symbols.get(children[1]).is_forward_declaration());
    }
}
