//! Parsing context threaded through every parser entry point, grounded
//! in `Parser.h`'s `ParsingArguments`: the root symbol table, the
//! current scope, and the shared type interner travel together rather
//! than as separate parameters.

use rustc_hash::FxHashMap;

use crate::ast::decl::{ClassDecl, ClassKind};
use crate::ast::{CppName, Declaration, NameKind};
use crate::base::{IStr, Interner as StringInterner};
use crate::index_recorder::IndexRecorder;
use crate::symbols::{SymbolId, SymbolTable};
use crate::tsys::TsysInterner;

/// Runtime-tunable parsing behavior, kept separate from `ParseContext`
/// so options can be constructed once and cloned cheaply per parse
/// (spec.md's ambient configuration surface).
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Consulted by the canonicalizer, not the parser: the declarator
    /// grammar always accepts any qualified name as a `Named` type
    /// syntactically (resolution happens later, at canonicalization
    /// time), so there is nothing for a parser-level flag to gate. When
    /// `canonicalize_type` cannot resolve a `Named` type's qualified
    /// name to any symbol and this is `true`, it synthesizes a single
    /// opaque placeholder class symbol per unresolved spelling (cached
    /// in `ParseContext::unresolved_types` so repeats of the same name
    /// canonicalize to the same `TsysId`) instead of failing with
    /// `CoreError::NotConvertable` — useful for parsing a single
    /// declaration fragment without the rest of a translation unit's
    /// type declarations in scope.
    pub tolerate_unknown_type_names: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tolerate_unknown_type_names: true,
        }
    }
}

/// Everything a parser function needs beyond the token cursor it is
/// currently holding.
pub struct ParseContext<'a> {
    pub symbols: SymbolTable,
    pub strings: StringInterner,
    pub tsys: TsysInterner,
    pub scope: SymbolId,
    pub options: ParseOptions,
    pub recorder: Option<&'a mut dyn IndexRecorder>,
    /// One opaque placeholder class symbol per spelling the canonicalizer
    /// could not resolve, populated only when
    /// `options.tolerate_unknown_type_names` is set. Keyed by the
    /// unresolved name's full qualified spelling so two uses of the same
    /// unknown name still canonicalize to one `TsysId`.
    pub(crate) unresolved_types: FxHashMap<IStr, SymbolId>,
}

impl<'a> ParseContext<'a> {
    pub fn new(options: ParseOptions) -> Self {
        let symbols = SymbolTable::new();
        let scope = symbols.root();
        Self {
            symbols,
            strings: StringInterner::new(),
            tsys: TsysInterner::new(),
            scope,
            options,
            recorder: None,
            unresolved_types: FxHashMap::default(),
        }
    }

    /// Look up or create the placeholder symbol standing in for an
    /// unresolved named type, keyed by its full dotted spelling.
    /// Created directly under the root scope as an opaque forward-only
    /// class declaration — it has no real members and is never wired
    /// into any forward-declaration group, since it does not correspond
    /// to any real declaration in the source.
    pub(crate) fn unresolved_type_symbol(&mut self, spelling: &str) -> SymbolId {
        if let Some(&existing) = self.unresolved_types.get(spelling) {
            return existing;
        }
        let root = self.symbols.root();
        let name = CppName {
            kind: NameKind::Normal,
            spelling: self.strings.intern(spelling),
            tokens: [None, None, None, None],
        };
        let decl = Declaration::Class(ClassDecl {
            name: name.clone(),
            symbol: None,
            span: crate::base::Span::point(crate::base::TextSize::from(0)),
            is_forward: true,
            kind: ClassKind::Class,
            bases: Vec::new(),
            members: Vec::new(),
        });
        let symbol = self.symbols.create_decl_symbol(root, name.spelling.clone(), decl);
        self.symbols.get_mut(symbol).decls.last_mut().unwrap().set_symbol(symbol);
        self.unresolved_types.insert(self.strings.intern(spelling), symbol);
        symbol
    }

    pub fn with_recorder(mut self, recorder: &'a mut dyn IndexRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Run `f` with the context's current scope temporarily switched
    /// to `scope`, restoring the previous scope afterward regardless of
    /// how `f` returns — the Rust analogue of saving and restoring
    /// `pa.context` around a nested parse in the original.
    pub fn with_scope<T>(&mut self, scope: SymbolId, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.scope;
        self.scope = scope;
        let result = f(self);
        self.scope = previous;
        result
    }
}

/// How many declarators a single base type may be followed by,
/// grounded in `Parser.h`'s `DeclaratorRestriction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaratorRestriction {
    /// No declarator at all — just a type.
    Zero,
    /// Exactly one declarator.
    One,
    /// A comma-separated list of one or more declarators.
    Many,
}

/// Presets for `ParsingDeclaratorArguments` (SPEC_FULL.md §B.1),
/// naming which grammar restrictions apply to a declarator in a given
/// syntactic position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsingDeclaratorArguments {
    pub declarator: DeclaratorRestriction,
    pub initializer: InitializerRestriction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerRestriction {
    Allowed,
    Forbidden,
    Required,
}

impl ParsingDeclaratorArguments {
    /// A bare type name with no declarator permitted at all, e.g. a
    /// `static_cast<T>` target.
    pub const TYPE: Self = Self {
        declarator: DeclaratorRestriction::Zero,
        initializer: InitializerRestriction::Forbidden,
    };
    /// A variable declaration whose initializer may or may not be
    /// present (the common top-level case).
    pub const VAR_TYPE: Self = Self {
        declarator: DeclaratorRestriction::One,
        initializer: InitializerRestriction::Allowed,
    };
    /// A variable declaration that must carry an initializer.
    pub const VAR_INIT: Self = Self {
        declarator: DeclaratorRestriction::One,
        initializer: InitializerRestriction::Required,
    };
    /// A variable declaration that must not carry an initializer
    /// (e.g. a `for`-loop induction variable handled elsewhere).
    pub const VAR_NO_INIT: Self = Self {
        declarator: DeclaratorRestriction::One,
        initializer: InitializerRestriction::Forbidden,
    };
    /// A function parameter: exactly one declarator, an initializer is
    /// a default argument and is allowed.
    pub const PARAM: Self = Self {
        declarator: DeclaratorRestriction::One,
        initializer: InitializerRestriction::Allowed,
    };
    /// A top-level `int a, *b, c[3];` comma list: many declarators
    /// share one base type.
    pub const DECLS: Self = Self {
        declarator: DeclaratorRestriction::Many,
        initializer: InitializerRestriction::Allowed,
    };
}
