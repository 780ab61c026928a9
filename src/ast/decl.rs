//! Declaration AST (spec.md §4.3).

use crate::ast::{CppName, Initializer, QualifiedName, Type};
use crate::base::Span;
use crate::symbols::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Struct,
    Union,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseSpecifier {
    pub name: QualifiedName,
    pub span: Span,
}

/// A class/struct/union member, carrying the access-specifier state
/// that was in effect when it was parsed (spec.md §4.3: "Access
/// specifier state is carried across member declarations").
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub access: AccessSpecifier,
    pub decl: Declaration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: CppName,
    pub symbol: Option<SymbolId>,
    pub span: Span,
    pub body: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enumerator {
    pub name: CppName,
    pub value: Option<crate::ast::Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: CppName,
    pub symbol: Option<SymbolId>,
    pub span: Span,
    pub is_forward: bool,
    pub is_scoped: bool,
    pub underlying_type: Option<Type>,
    pub enumerators: Vec<Enumerator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: CppName,
    pub symbol: Option<SymbolId>,
    pub span: Span,
    pub is_forward: bool,
    pub kind: ClassKind,
    pub bases: Vec<BaseSpecifier>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: CppName,
    pub symbol: Option<SymbolId>,
    pub span: Span,
    pub is_forward: bool,
    pub decorator_static: bool,
    pub ty: Type,
    pub initializer: Option<Initializer>,
    pub containing_class: Option<SymbolId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: CppName,
    pub symbol: Option<SymbolId>,
    pub span: Span,
    pub is_forward: bool,
    pub decorator_static: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_conversion_operator: bool,
    pub containing_class: Option<SymbolId>,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsingNamespaceDecl {
    pub target: QualifiedName,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsingAliasDecl {
    pub name: CppName,
    pub symbol: Option<SymbolId>,
    pub span: Span,
    pub target: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Namespace(NamespaceDecl),
    Enum(EnumDecl),
    Class(ClassDecl),
    Variable(VariableDecl),
    Function(FunctionDecl),
    UsingNamespace(UsingNamespaceDecl),
    UsingAlias(UsingAliasDecl),
}

impl Declaration {
    pub fn name(&self) -> &CppName {
        match self {
            Declaration::Namespace(d) => &d.name,
            Declaration::Enum(d) => &d.name,
            Declaration::Class(d) => &d.name,
            Declaration::Variable(d) => &d.name,
            Declaration::Function(d) => &d.name,
            Declaration::UsingAlias(d) => &d.name,
            Declaration::UsingNamespace(_) => {
                unreachable!("using-namespace declarations bind no name")
            }
        }
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Declaration::Namespace(d) => d.symbol,
            Declaration::Enum(d) => d.symbol,
            Declaration::Class(d) => d.symbol,
            Declaration::Variable(d) => d.symbol,
            Declaration::Function(d) => d.symbol,
            Declaration::UsingAlias(d) => d.symbol,
            Declaration::UsingNamespace(_) => None,
        }
    }

    pub fn set_symbol(&mut self, id: SymbolId) {
        match self {
            Declaration::Namespace(d) => d.symbol = Some(id),
            Declaration::Enum(d) => d.symbol = Some(id),
            Declaration::Class(d) => d.symbol = Some(id),
            Declaration::Variable(d) => d.symbol = Some(id),
            Declaration::Function(d) => d.symbol = Some(id),
            Declaration::UsingAlias(d) => d.symbol = Some(id),
            Declaration::UsingNamespace(_) => {}
        }
    }

    pub fn is_forward(&self) -> bool {
        match self {
            Declaration::Enum(d) => d.is_forward,
            Declaration::Class(d) => d.is_forward,
            Declaration::Variable(d) => d.is_forward,
            Declaration::Function(d) => d.is_forward,
            _ => false,
        }
    }

    pub fn decorator_static(&self) -> bool {
        match self {
            Declaration::Variable(d) => d.decorator_static,
            Declaration::Function(d) => d.decorator_static,
            _ => false,
        }
    }
}
