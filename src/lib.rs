//! # cppdoc-core
//!
//! Core of a C++ source-analysis front-end: a recursive-descent parser
//! for declarations, types, declarators, and expressions; a nested-scope
//! symbol table with forward-declaration and specialization grouping; and
//! a canonicalizing, hash-consed type interner that drives expression
//! typing (member lookup, operator-overload lookup, overload resolution).
//!
//! ## Module structure (dependency order)
//!
//! ```text
//! parser    → declaration/declarator/type/expression grammar
//!   ↓
//! typer     → ExprTsysList, expression-to-type visitor
//! resolve   → name resolution (scope walk, using-namespace, inheritance)
//!   ↓
//! symbols   → scope tree, forward-declaration/specialization links
//! tsys      → canonical (interned) type values
//! ast       → tagged-variant AST nodes
//!   ↓
//! context   → ParseContext threading cursor/symbols/tsys together
//! cursor    → immutable lookahead-capable token cursor
//! lexer     → token stream (external collaborator, included for tests)
//! base      → spans, string interning
//! ```
//!
//! The lexer, printer, and any CLI driver are trivial consumers of the
//! `Program` + `SymbolTable` + `TsysInterner` this crate produces; see
//! `printer` for the test-support round-trip renderer.

pub mod ast;
pub mod base;
pub mod context;
pub mod cursor;
pub mod errors;
pub mod index_recorder;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod resolve;
pub mod symbols;
pub mod typer;
pub mod tsys;

pub use context::{ParseContext, ParseOptions};
pub use errors::{CoreError, CoreResult};
pub use symbols::{Symbol, SymbolId, SymbolTable};
pub use tsys::{Tsys, TsysId, TsysInterner};

/// Parse a full translation unit from source text and return the
/// resulting `Program` alongside the `ParseContext` that owns its
/// symbol table and type interner (spec.md §6, "Outputs").
pub fn parse_translation_unit(
    source: &str,
    options: ParseOptions,
) -> CoreResult<(ast::Program, ParseContext<'static>)> {
    let tokens = lexer::tokenize(source);
    let cursor = cursor::TokenCursor::new(tokens);
    let mut ctx = ParseContext::new(options);
    let program = parser::declaration::parse_program(&mut ctx, &cursor)?;
    Ok((program, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_empty_translation_unit() {
        let (program, _ctx) = parse_translation_unit("", ParseOptions::default()).unwrap();
        assert!(program.decls.is_empty());
    }

    #[test]
    fn parses_a_namespace_with_a_variable() {
        let (program, ctx) =
            parse_translation_unit("namespace a { int x; }", ParseOptions::default()).unwrap();
        assert_eq!(program.decls.len(), 1);
        let ast::Declaration::Namespace(ns) = &program.decls[0] else {
            panic!("expected a namespace declaration");
        };
        assert_eq!(ns.name.spelling.as_ref(), "a");
        assert_eq!(ns.body.len(), 1);
        assert!(ctx.symbols.len() > 1);
    }
}
