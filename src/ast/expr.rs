//! Expression AST, grounded in `Ast_Expr_ExprToTsys.cpp`'s `Visit(...)`
//! handler list: every variant here has a corresponding typing rule in
//! `crate::typer`.

use crate::ast::{QualifiedName, Type};
use crate::base::{IStr, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Bool,
    Char,
    String,
    Nullptr,
}

/// A scanned literal. `is_zero` records whether an integer literal's
/// digits are all zero (spec.md's "digit-scanning zero-literal
/// detection"), which feeds `Zero`-typed conversions distinct from a
/// plain `int` in overload resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: IStr,
    pub is_zero: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldAccessOp {
    /// `.`
    Dot,
    /// `->`, chained through `operator ->` overloads until a non-class
    /// result is reached.
    Arrow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// `this` — a reserved extension point for typing, like `typeid`
    /// and parenthesized expressions: always produces `NotImplemented`.
    This { span: Span },
    Nullptr { span: Span },
    /// `( expr )`; retained for printing, but — like `this` and
    /// `typeid` — a reserved extension point for typing: always
    /// produces `NotImplemented` rather than recursing into `inner`
    /// (spec.md §4.6 groups all three together).
    Parenthesis { inner: Box<Expr>, span: Span },
    /// `( Type ) expr` / `static_cast<Type>(expr)` family; types to the
    /// target `ty`, with `operand` typed only for its side effect on
    /// the index recorder and then discarded (spec.md §4.6, "Cast
    /// returns the target type").
    Cast {
        ty: Type,
        operand: Box<Expr>,
        span: Span,
    },
    /// `typeid(...)`; untypeable in this subset.
    Typeid { span: Span },
    /// A bare (possibly qualified) name resolved by outward scope walk.
    Id { name: QualifiedName, span: Span },
    /// `Parent::Child` explicit qualification, resolved as a single
    /// non-ascending child lookup rather than a further outward walk.
    Child {
        parent: Box<Expr>,
        child: crate::ast::CppName,
        span: Span,
    },
    FieldAccess {
        op: FieldAccessOp,
        object: Box<Expr>,
        member: crate::ast::CppName,
        span: Span,
    },
    /// `expr[index]`, resolved either as a built-in array subscript or
    /// via `operator []` overload expansion.
    ArrayAccess {
        object: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    /// `expr(args...)`, resolved via named-function overload resolution
    /// or `operator ()` overload expansion depending on what `expr`
    /// names.
    FuncAccess {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(l) => l.span,
            Expr::This { span }
            | Expr::Nullptr { span }
            | Expr::Parenthesis { span, .. }
            | Expr::Cast { span, .. }
            | Expr::Typeid { span }
            | Expr::Id { span, .. }
            | Expr::Child { span, .. }
            | Expr::FieldAccess { span, .. }
            | Expr::ArrayAccess { span, .. }
            | Expr::FuncAccess { span, .. } => *span,
        }
    }
}
