//! Foundation types shared by every layer: source spans and string
//! interning. This module has no dependency on any other module in the
//! crate.

mod intern;
mod span;

pub use intern::{IStr, Interner};
pub use span::{Span, TextRange, TextSize};
