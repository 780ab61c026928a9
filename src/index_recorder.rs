//! Cross-reference recording hook, grounded in `Parser.h`'s
//! `IIndexRecorder`: the parser and typer report every name-use →
//! symbol resolution they make so a caller (an IDE's go-to-definition
//! feature, say) can build a cross-reference index, without the core
//! crate needing to know anything about how that index is stored.

use crate::ast::CppName;
use crate::symbols::SymbolId;
use crate::tsys::TsysId;

/// Implemented by callers that want to observe name resolutions as
/// they happen during parsing and typing. All methods default to
/// no-ops so a recorder only needs to implement what it cares about.
pub trait IndexRecorder {
    /// A name in the source was resolved to `symbol`.
    fn index_symbol(&mut self, _name: &CppName, _symbol: SymbolId) {}

    /// An expression was given type `tsys`.
    fn index_expr_type(&mut self, _span: crate::base::Span, _tsys: TsysId) {}

    /// `name` appeared in a value position (e.g. the callee of a call,
    /// or a bare name expression) but resolution only found type
    /// symbols for it — a class or namespace named where a value was
    /// expected (spec.md §4.7).
    fn expect_value_but_type(&mut self, _name: &CppName, _types: &[SymbolId]) {}
}

/// A recorder that discards everything; the default when no caller
/// supplies one.
#[derive(Debug, Default)]
pub struct NullIndexRecorder;

impl IndexRecorder for NullIndexRecorder {}
