//! Polymorphic AST without inheritance (spec.md §9): every syntactic
//! category is a tagged variant enum rather than a class hierarchy with
//! a visitor interface. `Declaration`/`Type`/`Expr`/`Stat` each match on
//! their own tag; there are no vtables.

pub mod decl;
pub mod expr;
pub mod stat;
pub mod ty;

pub use decl::Declaration;
pub use expr::Expr;
pub use stat::Stat;
pub use ty::Type;

use crate::base::{IStr, Span};
use crate::symbols::SymbolId;

/// Classification of a `CppName`'s surface form (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Normal,
    Operator,
    Constructor,
    Destructor,
}

/// A source name: classification, surface spelling, and the spans of
/// the (up to four) tokens that spelled it out. Operators can be
/// multi-token (`operator []`, `operator ->*`); everything else is one
/// token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppName {
    pub kind: NameKind,
    pub spelling: IStr,
    pub tokens: [Option<Span>; 4],
}

impl CppName {
    pub fn empty() -> Self {
        Self {
            kind: NameKind::Normal,
            spelling: IStr::from(""),
            tokens: [None, None, None, None],
        }
    }

    /// Number of tokens that make up the name; zero means "no name was
    /// present" (a declarator parsed with no trailing identifier).
    pub fn token_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_present(&self) -> bool {
        self.token_count() != 0
    }

    pub fn span(&self) -> Option<Span> {
        let first = self.tokens[0]?;
        let last = self.tokens.iter().flatten().last().copied()?;
        Some(first.to(last))
    }
}

/// A qualified name path, `a::b::c`, used for namespace nesting sugar,
/// `using namespace` targets, base-class names, and named-type
/// references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub segments: Vec<CppName>,
}

impl QualifiedName {
    pub fn single(name: CppName) -> Self {
        Self {
            segments: vec![name],
        }
    }

    pub fn span(&self) -> Option<Span> {
        let first = self.segments.first()?.span()?;
        let last = self.segments.last()?.span()?;
        Some(first.to(last))
    }
}

/// One of the three initializer shapes a declarator may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    /// `= expr`
    Equal,
    /// `(expr, ...)`
    Constructor,
    /// `{expr, ...}`
    Universal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    pub kind: InitializerKind,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// Output of the Declarator Parser: a type, a (possibly absent) name,
/// an optional initializer, and the symbol bound to it during
/// declaration building.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub containing_class: Option<SymbolId>,
    pub ty: Type,
    pub name: CppName,
    pub initializer: Option<Initializer>,
    pub created_symbol: Option<SymbolId>,
    pub span: Span,
}

/// The parsed top-level output: an ordered list of owned declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub decls: Vec<Declaration>,
}
