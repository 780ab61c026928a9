//! Error surface for the parser, resolver, and type interner.
//!
//! Mirrors `StopParsingException` / `IllegalExprException` /
//! `NotConvertableException` from the original implementation
//! (`Parser.h`, `Ast.h`), reshaped as an explicit `Result`-returning enum
//! in the style of `interchange/error.rs`.

use crate::base::Span;

/// A grammatical failure, an untypeable expression, or a type that
/// could not be canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Grammar mismatch at a precise token. Never recovered inside the
    /// core; callers may skip to a synchronization point and retry.
    #[error("parse error at {span:?}: {message}")]
    StopParsing { span: Span, message: String },

    /// The expression syntactically parsed but cannot be assigned a
    /// type (unknown literal shape, dereferencing a non-pointer
    /// non-class, a call target that is neither function nor
    /// `operator ()`-bearing class).
    #[error("cannot type expression: {reason}")]
    IllegalExpr { reason: String },

    /// Canonicalization failed, e.g. `decltype` of an ill-typed
    /// expression.
    #[error("cannot canonicalize type: {reason}")]
    NotConvertable { reason: String },

    /// `this`, `typeid`, and parenthesized expressions are reserved
    /// extension points in the original; preserved here as an explicit
    /// gap distinct from `IllegalExpr` (see SPEC_FULL.md open question
    /// D).
    #[error("not implemented: {what}")]
    NotImplemented { what: &'static str },
}

pub type CoreResult<T> = Result<T, CoreError>;
