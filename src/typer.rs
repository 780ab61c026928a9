//! Expression Typer (spec.md §4.6, §7), grounded in
//! `Ast_Expr_ExprToTsys.cpp`'s `Visit(...)` dispatch: canonicalizes
//! surface `ast::ty::Type` into interned `TsysId`s (`TypeToTsys`) and
//! types every `Expr` variant into a set-valued `ExprTsysList` — set-
//! valued because an overloaded or `using`-widened name is inherently
//! multi-binding.

use rustc_hash::FxHashSet;

use crate::ast::expr::{FieldAccessOp, Literal, LiteralKind};
use crate::ast::ty::{FunctionTypeSurface, ReferenceKind, Type};
use crate::ast::{CppName, Expr, QualifiedName};
use crate::context::ParseContext;
use crate::errors::{CoreError, CoreResult};
use crate::resolve::{resolve_symbol, ClassAwareScopes, ResolveSymbolResult, SearchPolicy};
use crate::symbols::SymbolId;
use crate::tsys::conv::test_parameter;
use crate::tsys::{
    PrimitiveWidth, Signedness, Tsys, TsysCV, TsysCallingConvention, TsysConv, TsysFunctionQuals,
    TsysId, TsysKind, TsysPrimitive, TsysRefType,
};

/// One binding an expression (or name) may resolve to: the symbol it
/// came from, if any (a literal or `nullptr` carries none), and the
/// canonical type it carries at this use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprTsysItem {
    pub symbol: Option<SymbolId>,
    pub tsys: TsysId,
}

/// The typer's universal result shape: an ordered, possibly-empty list
/// of candidate bindings. Empty means "untypeable in this subset" and
/// is not itself an error — only a grammatical or resolution failure
/// (`CoreError`) is.
pub type ExprTsysList = Vec<ExprTsysItem>;

// ---------------------------------------------------------------------
// Type canonicalization (`TypeToTsys`)
// ---------------------------------------------------------------------

/// Canonicalize a surface `Type` into an interned `TsysId`.
pub fn canonicalize_type(ctx: &mut ParseContext, ty: &Type) -> CoreResult<TsysId> {
    match ty {
        Type::Primitive { keyword, .. } => Ok(ctx.tsys.primitive(primitive_of(*keyword))),
        Type::DeclType { expr, .. } => {
            let candidates = type_expr(ctx, expr)?;
            candidates
                .first()
                .map(|item| item.tsys)
                .ok_or_else(|| CoreError::NotConvertable {
                    reason: "decltype operand did not resolve to any type".to_string(),
                })
        }
        Type::Decorate {
            is_const,
            is_const_expr,
            is_volatile,
            inner,
            ..
        } => {
            let inner_tsys = canonicalize_type(ctx, inner)?;
            let flags = TsysCV {
                is_const: *is_const,
                is_volatile: *is_volatile,
                is_const_expr: *is_const_expr,
            };
            Ok(ctx.tsys.cv(flags, inner_tsys))
        }
        Type::Reference { kind, inner, .. } => {
            let inner_tsys = canonicalize_type(ctx, inner)?;
            Ok(match kind {
                ReferenceKind::Ptr => ctx.tsys.ptr(inner_tsys),
                ReferenceKind::LRef => ctx.tsys.lref(inner_tsys),
                ReferenceKind::RRef => ctx.tsys.rref(inner_tsys),
            })
        }
        Type::Generic { base, arguments, .. } => {
            if arguments.is_empty() {
                // The declarator parser's array-suffix sugar (`T[N]`)
                // overloads an empty-argument `Generic` node to mean
                // "array of T, bound discarded" (see `parser::declarator`);
                // a genuine `Foo<>` empty-template-argument instantiation
                // is syntactically indistinguishable at this layer and
                // canonicalizes the same way.
                let elem = canonicalize_type(ctx, base)?;
                Ok(ctx.tsys.array(elem, None))
            } else {
                // `TsysKind` has no dedicated template-instantiation
                // variant (spec.md's Tsys kind list is exhaustive and
                // does not name one); a non-empty generic instantiation
                // canonicalizes to its base symbol's plain declared
                // type, dropping the argument list. Documented as a
                // deliberate simplification in DESIGN.md.
                canonicalize_type(ctx, base)
            }
        }
        Type::VariadicPack { inner, .. } => {
            // A `...`-pack parameter collapses to its element type; this
            // subset does not model pack expansion arity at the type
            // level (DESIGN.md).
            canonicalize_type(ctx, inner)
        }
        Type::Named { name, .. } => canonicalize_named(ctx, name),
        Type::Function(surface) => canonicalize_function(ctx, surface),
    }
}

fn canonicalize_named(ctx: &mut ParseContext, name: &QualifiedName) -> CoreResult<TsysId> {
    let result = resolve_qualified_name(ctx, name);
    if let Some(&symbol) = result.types.first() {
        return Ok(ctx.tsys.decl(symbol));
    }
    if ctx.options.tolerate_unknown_type_names {
        let spelling = name
            .segments
            .iter()
            .map(|s| s.spelling.as_ref())
            .collect::<Vec<_>>()
            .join("::");
        let symbol = ctx.unresolved_type_symbol(&spelling);
        return Ok(ctx.tsys.decl(symbol));
    }
    Err(CoreError::NotConvertable {
        reason: format!(
            "named type '{}' did not resolve to any type symbol",
            name.segments
                .iter()
                .map(|s| s.spelling.as_ref())
                .collect::<Vec<_>>()
                .join("::")
        ),
    })
}

fn canonicalize_function(ctx: &mut ParseContext, surface: &FunctionTypeSurface) -> CoreResult<TsysId> {
    let ret = canonicalize_type(ctx, &surface.ret)?;
    let mut params = Vec::with_capacity(surface.params.len());
    for param in &surface.params {
        params.push(canonicalize_type(ctx, &param.ty)?);
    }
    let cc = calling_convention_of(surface.cc);
    let ref_qualifier = if surface.qualifier_rref {
        Some(TsysRefType::RRef)
    } else if surface.qualifier_lref {
        Some(TsysRefType::LRef)
    } else {
        None
    };
    let quals = TsysFunctionQuals {
        is_const: surface.qualifier_const || surface.qualifier_const_expr,
        is_volatile: surface.qualifier_volatile,
        ref_qualifier,
    };
    Ok(ctx
        .tsys
        .function(ret, params, surface.is_variadic_ellipsis, cc, quals))
}

fn calling_convention_of(cc: crate::ast::ty::CallingConvention) -> TsysCallingConvention {
    use crate::ast::ty::CallingConvention as Surface;
    match cc {
        Surface::None => TsysCallingConvention::None,
        Surface::Cdecl => TsysCallingConvention::Cdecl,
        Surface::Stdcall => TsysCallingConvention::Stdcall,
        Surface::Fastcall => TsysCallingConvention::Fastcall,
        Surface::Thiscall => TsysCallingConvention::Thiscall,
        Surface::Clrcall => TsysCallingConvention::Clrcall,
        Surface::Vectorcall => TsysCallingConvention::Vectorcall,
    }
}

fn primitive_of(keyword: crate::ast::ty::PrimitiveKeyword) -> TsysPrimitive {
    use crate::ast::ty::PrimitiveKeyword as Kw;
    match keyword {
        Kw::Auto => TsysPrimitive::Void, // unresolved `auto` without a deduced initializer; treated as void, a documented simplification.
        Kw::Void => TsysPrimitive::Void,
        Kw::Bool => TsysPrimitive::Bool,
        Kw::Char => TsysPrimitive::Char,
        Kw::WChar => TsysPrimitive::WChar,
        Kw::Char16 => TsysPrimitive::Char16,
        Kw::Char32 => TsysPrimitive::Char32,
        Kw::Short => TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits16),
        Kw::Int => TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits32),
        Kw::Int8 => TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits8),
        Kw::Int16 => TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits16),
        Kw::Int32 => TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits32),
        Kw::Int64 => TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits64),
        Kw::Float => TsysPrimitive::Float(PrimitiveWidth::Bits32),
        Kw::Double => TsysPrimitive::Float(PrimitiveWidth::Bits64),
        Kw::Long => TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits64),
        Kw::LongLong => TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits64),
        Kw::LongDouble => TsysPrimitive::Float(PrimitiveWidth::Extended),
    }
}

// ---------------------------------------------------------------------
// Name resolution across a qualified path
// ---------------------------------------------------------------------

/// Resolve a (possibly multi-segment) qualified name from the current
/// scope: the first segment is an ordinary outward scope walk; every
/// later segment is a non-ascending child lookup (optionally widened by
/// inheritance) against whatever the previous segment resolved to.
fn resolve_qualified_name(ctx: &ParseContext, name: &QualifiedName) -> ResolveSymbolResult {
    let inherited = ClassAwareScopes { table: &ctx.symbols };
    let mut segments = name.segments.iter();
    let Some(first) = segments.next() else {
        return ResolveSymbolResult::default();
    };
    let mut current = resolve_symbol(
        &ctx.symbols,
        &inherited,
        ctx.scope,
        &first.spelling,
        SearchPolicy::SymbolAccessableInScope,
    );
    for seg in segments {
        if current.is_empty() {
            return current;
        }
        let mut raw = Vec::new();
        for scope_symbol in current.all() {
            raw.extend(ctx.symbols.children_named(scope_symbol, &seg.spelling).iter().copied());
            for base in inherited.inherited_scopes(scope_symbol) {
                raw.extend(ctx.symbols.children_named(base, &seg.spelling).iter().copied());
            }
        }
        current = crate::resolve::dedup_and_classify(&ctx.symbols, raw);
    }
    current
}

fn record_resolution(ctx: &mut ParseContext, name: &CppName, result: &ResolveSymbolResult) {
    if let Some(recorder) = ctx.recorder.as_mut() {
        for symbol in result.all() {
            recorder.index_symbol(name, symbol);
        }
        if result.values.is_empty() && !result.types.is_empty() {
            recorder.expect_value_but_type(name, &result.types);
        }
    }
}

// ---------------------------------------------------------------------
// VisitSymbol: materializing a resolved symbol into a typing
// ---------------------------------------------------------------------

/// Materialize `symbol` (already resolved from some lookup) into its
/// `ExprTsysItem`(s) (spec.md §4.6, `VisitSymbol`). `after_scope` is
/// `true` exactly when this sighting came from an explicit qualified
/// name (`A::x`), which changes how a non-static member is wrapped.
/// `added_cv` is the qualifier the accessing context itself contributes
/// (e.g. the cv of the object a member was reached through).
fn visit_symbol(
    ctx: &mut ParseContext,
    symbol: SymbolId,
    after_scope: bool,
    added_cv: TsysCV,
) -> CoreResult<ExprTsysList> {
    let decl = ctx.symbols.definition_of(symbol).clone();
    match decl {
        crate::ast::Declaration::Variable(v) => {
            let mut declared = canonicalize_type(ctx, &v.ty)?;
            if let Some(containing) = v.containing_class {
                declared = Tsys::unwrap_member(&ctx.tsys, declared, containing);
            }
            let is_static = ctx.symbols.is_static(symbol);
            let tsys = if after_scope && !is_static {
                let class = v.containing_class.unwrap_or(symbol);
                ctx.tsys.member(class, declared)
            } else {
                let qualified = ctx.tsys.cv(added_cv, declared);
                ctx.tsys.lref(qualified)
            };
            Ok(vec![ExprTsysItem { symbol: Some(symbol), tsys }])
        }
        crate::ast::Declaration::Function(f) => {
            let mut declared = canonicalize_type(ctx, &f.ty)?;
            if let Some(containing) = f.containing_class {
                declared = Tsys::unwrap_member(&ctx.tsys, declared, containing);
            }
            let is_static = ctx.symbols.is_static(symbol);
            let tsys = if after_scope && !is_static {
                let class = f.containing_class.unwrap_or(symbol);
                let member = ctx.tsys.member(class, declared);
                ctx.tsys.ptr(member)
            } else {
                ctx.tsys.ptr(declared)
            };
            Ok(vec![ExprTsysItem { symbol: Some(symbol), tsys }])
        }
        // Classes, enums, namespaces, and using-aliases are not values;
        // a caller typing a value-position name filters these out via
        // `ResolveSymbolResult::values` before ever reaching here.
        _ => Ok(Vec::new()),
    }
}

// ---------------------------------------------------------------------
// Overload qualifier filtering (`TestFunctionQualifier`/`FilterFunctionByQualifier`)
// ---------------------------------------------------------------------

/// Rank how well a `this` of qualifiers `this_cv`/value-category
/// `this_is_rvalue` satisfies a member function's own qualifiers
/// (spec.md §4.6, `TestFunctionQualifier`).
///
/// Preserves the original's `dV` bug byte-for-byte: the volatile half
/// of the check reads `this_cv.is_volatile` instead of the candidate's
/// own `quals.is_volatile` (SPEC_FULL.md §D). The practical effect is
/// that a volatile/non-volatile mismatch can never be `Illegal` here —
/// the comparison is tautological — which is the original's observable
/// behavior, not a bug this crate introduces.
pub fn test_function_qualifier(
    this_cv: TsysCV,
    this_is_rvalue: bool,
    quals: TsysFunctionQuals,
) -> TsysConv {
    let dc = quals.is_const;
    let dv = this_cv.is_volatile; // see doc comment: preserved upstream quirk, not `quals.is_volatile`.
    let ref_illegal = match quals.ref_qualifier {
        Some(TsysRefType::LRef) => this_is_rvalue,
        Some(TsysRefType::RRef) => !this_is_rvalue,
        None => false,
    };
    if (this_cv.is_const && !dc) || (this_cv.is_volatile && !dv) || ref_illegal {
        return TsysConv::Illegal;
    }
    // A candidate with no ref-qualifier accepts either value category
    // (spec.md §4.6: "Direct if all qualifiers match or the function is
    // unqualified for ref") — but cv still has to match for the bind to
    // be `Direct` rather than a qualification conversion: a non-const
    // receiver calling a `const`-qualified member is legal (the first
    // guard above already ruled out the reverse) but ranks below an
    // exact non-const match, which is what lets scenario 6's non-const
    // overload win outright over the `const` one (spec.md §8).
    let ref_matches = match quals.ref_qualifier {
        Some(TsysRefType::LRef) => !this_is_rvalue,
        Some(TsysRefType::RRef) => this_is_rvalue,
        None => true,
    };
    let cv_matches = dc == this_cv.is_const && dv == this_cv.is_volatile;
    if ref_matches && cv_matches {
        TsysConv::Direct
    } else {
        TsysConv::NeedConvertion
    }
}

/// Keep only the candidates tied at the best score, dropping every
/// `Illegal` one (spec.md §4.6, `FilterFunctionByQualifier` and the
/// identically-shaped overload-resolution tie-retention rule).
fn retain_best(scored: Vec<(ExprTsysItem, TsysConv)>) -> ExprTsysList {
    let viable: Vec<_> = scored.into_iter().filter(|(_, c)| c.is_viable()).collect();
    if viable.is_empty() {
        return Vec::new();
    }
    let best = viable
        .iter()
        .map(|(_, c)| *c)
        .fold(TsysConv::Illegal, |acc, c| if c.is_better_than(acc) { c } else { acc });
    viable
        .into_iter()
        .filter(|(_, c)| *c == best)
        .map(|(item, _)| item)
        .collect()
}

fn function_quals_of(interner: &crate::tsys::TsysInterner, id: TsysId) -> Option<TsysFunctionQuals> {
    Tsys::as_function(interner, id).map(|f| f.quals)
}

fn function_return_type(interner: &crate::tsys::TsysInterner, id: TsysId) -> Option<TsysId> {
    Tsys::as_function(interner, id).map(|f| f.ret)
}

// ---------------------------------------------------------------------
// Main expression-typing dispatch
// ---------------------------------------------------------------------

pub fn type_expr(ctx: &mut ParseContext, expr: &Expr) -> CoreResult<ExprTsysList> {
    let result = match expr {
        Expr::Literal(lit) => type_literal(ctx, lit),
        Expr::This { .. } => Err(CoreError::NotImplemented { what: "this" }),
        Expr::Typeid { .. } => Err(CoreError::NotImplemented { what: "typeid" }),
        Expr::Parenthesis { .. } => Err(CoreError::NotImplemented {
            what: "parenthesized expression",
        }),
        Expr::Nullptr { .. } => Ok(vec![ExprTsysItem {
            symbol: None,
            tsys: ctx.tsys.nullptr(),
        }]),
        Expr::Cast { ty, operand, .. } => type_cast(ctx, ty, operand),
        Expr::Id { name, .. } => Ok(type_id(ctx, name)),
        Expr::Child { parent, child, span } => type_child(ctx, parent, child, *span),
        Expr::FieldAccess { op, object, member, .. } => type_field_access(ctx, op.clone(), object, member),
        Expr::ArrayAccess { object, index, .. } => type_array_access(ctx, object, index),
        Expr::FuncAccess { callee, arguments, .. } => type_call(ctx, callee, arguments),
    }?;
    if let Some(recorder) = ctx.recorder.as_mut() {
        for item in &result {
            recorder.index_expr_type(expr.span(), item.tsys);
        }
    }
    Ok(result)
}

fn is_unicode_string_prefix(text: &str, prefix: &str) -> bool {
    text.starts_with(prefix)
}

fn char_subtype_from_text(text: &str) -> TsysPrimitive {
    if is_unicode_string_prefix(text, "u8") {
        TsysPrimitive::Char
    } else if is_unicode_string_prefix(text, "L") {
        TsysPrimitive::WChar
    } else if is_unicode_string_prefix(text, "U") {
        TsysPrimitive::Char32
    } else if is_unicode_string_prefix(text, "u") {
        TsysPrimitive::Char16
    } else {
        TsysPrimitive::Char
    }
}

fn type_literal(ctx: &mut ParseContext, lit: &Literal) -> CoreResult<ExprTsysList> {
    let tsys = match lit.kind {
        LiteralKind::Int => {
            let has_suffix = lit.text.chars().any(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            if lit.is_zero && !has_suffix {
                ctx.tsys.zero()
            } else {
                let is_unsigned = lit.text.chars().any(|c| matches!(c, 'u' | 'U'));
                let is_long = lit.text.chars().any(|c| matches!(c, 'l' | 'L'));
                let signedness = if is_unsigned { Signedness::Unsigned } else { Signedness::Signed };
                let width = if is_long { PrimitiveWidth::Bits64 } else { PrimitiveWidth::Bits32 };
                ctx.tsys.primitive(TsysPrimitive::Int(signedness, width))
            }
        }
        LiteralKind::Float => {
            let is_f = lit.text.chars().any(|c| matches!(c, 'f' | 'F'));
            let width = if is_f { PrimitiveWidth::Bits32 } else { PrimitiveWidth::Bits64 };
            ctx.tsys.primitive(TsysPrimitive::Float(width))
        }
        LiteralKind::Bool => ctx.tsys.primitive(TsysPrimitive::Bool),
        LiteralKind::Char => {
            let subtype = char_subtype_from_text(&lit.text);
            ctx.tsys.primitive(subtype)
        }
        LiteralKind::String => {
            let subtype = char_subtype_from_text(&lit.text);
            let char_ty = ctx.tsys.primitive(subtype);
            let const_char = ctx.tsys.cv(
                TsysCV { is_const: true, is_volatile: false, is_const_expr: false },
                char_ty,
            );
            ctx.tsys.array(const_char, None)
        }
        LiteralKind::Nullptr => ctx.tsys.nullptr(),
    };
    Ok(vec![ExprTsysItem { symbol: None, tsys }])
}

fn type_cast(ctx: &mut ParseContext, ty: &Type, operand: &Expr) -> CoreResult<ExprTsysList> {
    let target = canonicalize_type(ctx, ty)?;
    // The operand is typed only for its side effect on the index
    // recorder (spec.md §4.6, "Cast returns the target type") and its
    // result, including any error, is discarded.
    let _ = type_expr(ctx, operand);
    Ok(vec![ExprTsysItem { symbol: None, tsys: target }])
}

fn type_id(ctx: &mut ParseContext, name: &QualifiedName) -> ExprTsysList {
    let result = resolve_qualified_name(ctx, name);
    let last = name.segments.last().cloned().unwrap_or_else(CppName::empty);
    record_resolution(ctx, &last, &result);
    let after_scope = name.segments.len() > 1;
    let mut out = Vec::new();
    for sym in &result.values {
        if let Ok(items) = visit_symbol(ctx, *sym, after_scope, TsysCV::none()) {
            out.extend(items);
        }
    }
    out
}

fn type_child(
    ctx: &mut ParseContext,
    parent: &Expr,
    child: &CppName,
    _span: crate::base::Span,
) -> CoreResult<ExprTsysList> {
    // `Parent::Child` explicit qualification. In practice the qualified-
    // name grammar already swallows every `::`-separated segment inside
    // a single `Expr::Id` at primary-expression level (`parse_qualified_name`),
    // so this variant is only reachable when `parent` is itself an `Id` —
    // combine the segments and resolve as one qualified name. Any other
    // parent shape (a call result, say) cannot be qualified this way in
    // valid C++ and is left untypeable here.
    if let Expr::Id { name, .. } = parent {
        let mut combined = name.clone();
        combined.segments.push(child.clone());
        return Ok(type_id(ctx, &combined));
    }
    Ok(Vec::new())
}

fn type_field_access(
    ctx: &mut ParseContext,
    op: FieldAccessOp,
    object: &Expr,
    member: &CppName,
) -> CoreResult<ExprTsysList> {
    let receivers = type_expr(ctx, object)?;
    let mut out = Vec::new();
    let mut visited = FxHashSet::default();
    for item in receivers {
        collect_member_access(ctx, op.clone(), item.tsys, member, &mut out, &mut visited)?;
    }
    Ok(out)
}

fn collect_member_access(
    ctx: &mut ParseContext,
    op: FieldAccessOp,
    receiver_tsys: TsysId,
    member: &CppName,
    out: &mut ExprTsysList,
    visited: &mut FxHashSet<SymbolId>,
) -> CoreResult<()> {
    let (entity, cv, ref_kind) = Tsys::entity_of(&ctx.tsys, receiver_tsys);
    let this_is_rvalue = matches!(ref_kind, Some(TsysRefType::RRef));
    match op {
        FieldAccessOp::Dot => resolve_dot(ctx, entity, cv, this_is_rvalue, member, out),
        FieldAccessOp::Arrow => match ctx.tsys.get(entity).kind.clone() {
            TsysKind::Ptr(inner) => {
                collect_member_access(ctx, FieldAccessOp::Dot, inner, member, out, visited)
            }
            TsysKind::Decl(class_symbol) => {
                if !visited.insert(class_symbol) {
                    // Already chased `operator->` through this class;
                    // stop rather than loop forever on a cyclical chain.
                    return Ok(());
                }
                let inherited = ClassAwareScopes { table: &ctx.symbols };
                let candidates = resolve_symbol(
                    &ctx.symbols,
                    &inherited,
                    class_symbol,
                    "->",
                    SearchPolicy::ChildSymbol,
                )
                .values;
                let mut scored = Vec::new();
                for sym in candidates {
                    for it in visit_symbol(ctx, sym, false, cv)? {
                        let conv = function_quals_of(&ctx.tsys, it.tsys)
                            .map(|q| test_function_qualifier(cv, this_is_rvalue, q))
                            .unwrap_or(TsysConv::Illegal);
                        scored.push((it, conv));
                    }
                }
                for it in retain_best(scored) {
                    if let Some(ret) = function_return_type(&ctx.tsys, it.tsys) {
                        collect_member_access(ctx, FieldAccessOp::Arrow, ret, member, out, visited)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        },
    }
}

fn resolve_dot(
    ctx: &mut ParseContext,
    entity_tsys: TsysId,
    receiver_cv: TsysCV,
    this_is_rvalue: bool,
    member: &CppName,
    out: &mut ExprTsysList,
) -> CoreResult<()> {
    let TsysKind::Decl(class_symbol) = ctx.tsys.get(entity_tsys).kind.clone() else {
        return Ok(());
    };
    let inherited = ClassAwareScopes { table: &ctx.symbols };
    let result = resolve_symbol(
        &ctx.symbols,
        &inherited,
        class_symbol,
        &member.spelling,
        SearchPolicy::ChildSymbol,
    );
    record_resolution(ctx, member, &result);
    let mut scored_fns = Vec::new();
    for sym in result.values {
        for it in visit_symbol(ctx, sym, false, receiver_cv)? {
            if let Some(quals) = function_quals_of(&ctx.tsys, it.tsys) {
                let conv = test_function_qualifier(receiver_cv, this_is_rvalue, quals);
                scored_fns.push((it, conv));
            } else {
                out.push(it);
            }
        }
    }
    out.extend(retain_best(scored_fns));
    Ok(())
}

fn type_array_access(ctx: &mut ParseContext, object: &Expr, index: &Expr) -> CoreResult<ExprTsysList> {
    let receivers = type_expr(ctx, object)?;
    let mut out = Vec::new();
    for item in receivers {
        let (entity, cv, _ref) = Tsys::entity_of(&ctx.tsys, item.tsys);
        match ctx.tsys.get(entity).kind.clone() {
            TsysKind::Array(elem, _) | TsysKind::Ptr(elem) => {
                let qualified = ctx.tsys.cv(cv, elem);
                out.push(ExprTsysItem {
                    symbol: None,
                    tsys: ctx.tsys.lref(qualified),
                });
            }
            TsysKind::Decl(class_symbol) => {
                let inherited = ClassAwareScopes { table: &ctx.symbols };
                let candidates = resolve_symbol(
                    &ctx.symbols,
                    &inherited,
                    class_symbol,
                    "[]",
                    SearchPolicy::ChildSymbol,
                )
                .values;
                let mut funcs = Vec::new();
                for sym in candidates {
                    funcs.extend(visit_symbol(ctx, sym, false, cv)?);
                }
                let arg_types = type_expr(ctx, index)?;
                out.extend(visit_overloaded_function(ctx, funcs, &[arg_types])?);
            }
            _ => {}
        }
    }
    Ok(out)
}

fn type_call(ctx: &mut ParseContext, callee: &Expr, arguments: &[Expr]) -> CoreResult<ExprTsysList> {
    if let Expr::Id { name, .. } = callee {
        let result = resolve_qualified_name(ctx, name);
        if !result.types.is_empty() && result.values.is_empty() {
            // `T(args...)` functional-cast/construction syntax: types to
            // `T`, typing the arguments only for their index-recorder
            // side effect.
            let last = name.segments.last().cloned().unwrap_or_else(CppName::empty);
            record_resolution(ctx, &last, &result);
            for a in arguments {
                let _ = type_expr(ctx, a);
            }
            let ty_symbol = result.types[0];
            let tsys = ctx.tsys.decl(ty_symbol);
            return Ok(vec![ExprTsysItem { symbol: Some(ty_symbol), tsys }]);
        }
    }

    let func_candidates = type_expr(ctx, callee)?;
    if func_candidates.is_empty() {
        return Ok(Vec::new());
    }
    let mut arg_type_lists = Vec::with_capacity(arguments.len());
    for a in arguments {
        arg_type_lists.push(type_expr(ctx, a)?);
    }
    let expanded = find_qualified_functions(ctx, func_candidates)?;
    visit_overloaded_function(ctx, expanded, &arg_type_lists)
}

/// Expand a set of callee candidates into concrete callables: a bare
/// function type passes through unchanged, a class type is expanded via
/// its `operator ()` overload set (spec.md §4.6, `FindQualifiedFunctions`).
fn find_qualified_functions(ctx: &mut ParseContext, items: ExprTsysList) -> CoreResult<ExprTsysList> {
    let mut out = Vec::new();
    for item in items {
        let (entity, cv, _ref) = Tsys::entity_of(&ctx.tsys, item.tsys);
        if Tsys::as_function(&ctx.tsys, item.tsys).is_some() {
            out.push(item);
            continue;
        }
        if let TsysKind::Decl(class_symbol) = ctx.tsys.get(entity).kind {
            let inherited = ClassAwareScopes { table: &ctx.symbols };
            let candidates = resolve_symbol(
                &ctx.symbols,
                &inherited,
                class_symbol,
                "()",
                SearchPolicy::ChildSymbol,
            )
            .values;
            for sym in candidates {
                out.extend(visit_symbol(ctx, sym, false, cv)?);
            }
        }
    }
    Ok(out)
}

/// Score and filter a set of callable candidates against a concrete
/// argument list (spec.md §4.6, `VisitOverloadedFunction`): arity
/// mismatches (without a variadic tail to absorb the excess) score
/// `Illegal`; otherwise a candidate's score is the worst `TestParameter`
/// ranking across its declared parameters, with any variadic tail
/// contributing an `Ellipsis` rung. Ties at the best score are all
/// retained, and each survivor is reported as its *return* type (spec.md
/// §4.6: "Emit the return type of each survivor") rather than the
/// function type itself.
fn visit_overloaded_function(
    ctx: &mut ParseContext,
    candidates: ExprTsysList,
    args: &[ExprTsysList],
) -> CoreResult<ExprTsysList> {
    let mut scored = Vec::new();
    for cand in candidates {
        let Some(func) = Tsys::as_function(&ctx.tsys, cand.tsys).cloned() else {
            continue;
        };
        let param_count = func.params.len();
        let arg_count = args.len();
        let arity_ok = arg_count == param_count || (func.is_variadic && arg_count >= param_count);
        if !arity_ok {
            scored.push((cand, TsysConv::Illegal));
            continue;
        }
        let mut worst = TsysConv::Direct;
        for (i, &param_ty) in func.params.iter().enumerate() {
            let arg_list = &args[i];
            if arg_list.is_empty() {
                worst = TsysConv::Illegal;
                break;
            }
            let mut best_for_arg = TsysConv::Illegal;
            for a in arg_list {
                let rank = test_parameter(&ctx.tsys, param_ty, a.tsys);
                if rank.is_better_than(best_for_arg) {
                    best_for_arg = rank;
                }
            }
            worst = worst.worse(best_for_arg);
        }
        if func.is_variadic && arg_count > param_count {
            worst = worst.worse(TsysConv::Ellipsis);
        }
        tracing::trace!("[OVERLOAD] candidate {:?} scored {:?}", cand.symbol, worst);
        scored.push((cand, worst));
    }
    let survivors = retain_best(scored);
    tracing::debug!("[OVERLOAD] {} survivor(s) tied for best score", survivors.len());
    Ok(survivors
        .into_iter()
        .filter_map(|item| {
            function_return_type(&ctx.tsys, item.tsys).map(|tsys| ExprTsysItem {
                symbol: item.symbol,
                tsys,
            })
        })
        .collect())
}
