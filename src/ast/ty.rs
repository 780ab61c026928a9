//! Surface type syntax (pre-canonicalization). See `crate::tsys` for the
//! canonicalized, hash-consed counterpart these get resolved into.

use crate::ast::{Expr, QualifiedName};
use crate::base::Span;

/// `signed`/`unsigned` prefix recognized before a primitive keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitivePrefix {
    None,
    Signed,
    Unsigned,
}

/// The primitive keyword table from `ParsePrimitiveType`. `Long` absorbs
/// a following `long`/`double` into `LongLong`/`LongDouble`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKeyword {
    Auto,
    Void,
    Bool,
    Char,
    WChar,
    Char16,
    Char32,
    Short,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Long,
    LongLong,
    LongDouble,
}

/// Calling convention recognized on a function type surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallingConvention {
    #[default]
    None,
    Cdecl,
    Stdcall,
    Fastcall,
    Thiscall,
    Clrcall,
    Vectorcall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Ptr,
    LRef,
    RRef,
}

/// One `< ... >` generic argument (only type arguments are modeled; the
/// subset does not cover non-type template parameters).
#[derive(Debug, Clone, PartialEq)]
pub struct GenericArgument {
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub ty: Type,
    pub name: Option<crate::ast::CppName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeSurface {
    pub ret: Box<Type>,
    pub params: Vec<Parameter>,
    pub is_variadic_ellipsis: bool,
    pub cc: CallingConvention,
    pub qualifier_const: bool,
    pub qualifier_const_expr: bool,
    pub qualifier_volatile: bool,
    pub qualifier_lref: bool,
    pub qualifier_rref: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive {
        prefix: PrimitivePrefix,
        keyword: PrimitiveKeyword,
        span: Span,
    },
    /// `decltype(expr)`
    DeclType { expr: Box<Expr>, span: Span },
    /// A surface `const`/`volatile`/`constexpr` qualifier wrapping
    /// another type, built up incrementally by both the short-type and
    /// long-type grammar phases.
    Decorate {
        is_const: bool,
        is_const_expr: bool,
        is_volatile: bool,
        inner: Box<Type>,
        span: Span,
    },
    /// `*`, `&`, `&&` applied to an inner type.
    Reference {
        kind: ReferenceKind,
        inner: Box<Type>,
        span: Span,
    },
    /// `T<Args...>`
    Generic {
        base: Box<Type>,
        arguments: Vec<GenericArgument>,
        span: Span,
    },
    /// Trailing `...` pack suffix absorbed by the long-type phase.
    VariadicPack { inner: Box<Type>, span: Span },
    /// A user-named type resolved via qualified-name lookup.
    Named { name: QualifiedName, span: Span },
    Function(FunctionTypeSurface),
}

impl Type {
    pub fn span(&self) -> Span {
        match self {
            Type::Primitive { span, .. }
            | Type::DeclType { span, .. }
            | Type::Decorate { span, .. }
            | Type::Reference { span, .. }
            | Type::Generic { span, .. }
            | Type::VariadicPack { span, .. }
            | Type::Named { span, .. } => *span,
            Type::Function(f) => f.ret.span(),
        }
    }

    /// Structural equality over the surface AST, distinct from `Tsys`
    /// pointer equality: used by forward-declaration wiring to decide
    /// whether two declarations describe the same signature, before
    /// any canonicalization happens (see SPEC_FULL.md §B.7,
    /// `IsSameResolvedType` in the original).
    pub fn is_same_resolved_type(a: &Type, b: &Type) -> bool {
        match (a, b) {
            (
                Type::Primitive {
                    prefix: p1,
                    keyword: k1,
                    ..
                },
                Type::Primitive {
                    prefix: p2,
                    keyword: k2,
                    ..
                },
            ) => p1 == p2 && k1 == k2,
            (Type::Reference { kind: k1, inner: i1, .. }, Type::Reference { kind: k2, inner: i2, .. }) => {
                k1 == k2 && Type::is_same_resolved_type(i1, i2)
            }
            (
                Type::Decorate {
                    is_const: c1,
                    is_const_expr: ce1,
                    is_volatile: v1,
                    inner: i1,
                    ..
                },
                Type::Decorate {
                    is_const: c2,
                    is_const_expr: ce2,
                    is_volatile: v2,
                    inner: i2,
                    ..
                },
            ) => c1 == c2 && ce1 == ce2 && v1 == v2 && Type::is_same_resolved_type(i1, i2),
            (Type::Named { name: n1, .. }, Type::Named { name: n2, .. }) => {
                n1.segments.len() == n2.segments.len()
                    && n1
                        .segments
                        .iter()
                        .zip(&n2.segments)
                        .all(|(a, b)| a.spelling == b.spelling)
            }
            (Type::Generic { base: b1, arguments: a1, .. }, Type::Generic { base: b2, arguments: a2, .. }) => {
                Type::is_same_resolved_type(b1, b2)
                    && a1.len() == a2.len()
                    && a1
                        .iter()
                        .zip(a2)
                        .all(|(x, y)| Type::is_same_resolved_type(&x.ty, &y.ty))
            }
            (Type::VariadicPack { inner: i1, .. }, Type::VariadicPack { inner: i2, .. }) => {
                Type::is_same_resolved_type(i1, i2)
            }
            (Type::DeclType { .. }, Type::DeclType { .. }) => false,
            (Type::Function(f1), Type::Function(f2)) => {
                // cv/ref-qualifiers are part of a member function's
                // signature, not decoration: `f() const` and `f()` are
                // distinct overloads, not a redeclaration pair, so a
                // mismatch here must not be treated as "the same
                // resolved type" the way forward-declaration wiring
                // needs it to be (spec.md §8 scenario 6).
                f1.qualifier_const == f2.qualifier_const
                    && f1.qualifier_volatile == f2.qualifier_volatile
                    && f1.qualifier_lref == f2.qualifier_lref
                    && f1.qualifier_rref == f2.qualifier_rref
                    && f1.is_variadic_ellipsis == f2.is_variadic_ellipsis
                    && f1.cc == f2.cc
                    && Type::is_same_resolved_type(&f1.ret, &f2.ret)
                    && f1.params.len() == f2.params.len()
                    && f1
                        .params
                        .iter()
                        .zip(&f2.params)
                        .all(|(x, y)| Type::is_same_resolved_type(&x.ty, &y.ty))
            }
            _ => false,
        }
    }
}
