//! The canonicalizing, hash-consed type interner ("Tsys", spec.md §6).
//!
//! Every distinct *structural* type gets exactly one `TsysId`: two
//! surface `Type` ASTs that describe the same shape (e.g. `int const *`
//! parsed twice) canonicalize to the same id, so downstream equality is
//! a pointer (index) compare rather than a structural walk. Grounded in
//! `Ast.h`'s `ITsys` hierarchy and `TypeToTsys`.

pub mod conv;
pub mod interner;

pub use conv::TsysConv;
pub use interner::TsysInterner;

use crate::symbols::SymbolId;

/// Index into a `TsysInterner`'s table. Stable for the interner's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TsysId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    Signed,
    Unsigned,
    /// `bool`, `void`, `wchar_t`-family: not meaningfully signed.
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveWidth {
    Bits8,
    Bits16,
    Bits32,
    Bits64,
    /// `long double`, left unsized per the surface grammar.
    Extended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TsysPrimitive {
    Void,
    Bool,
    Float(PrimitiveWidth),
    Int(Signedness, PrimitiveWidth),
    /// `char`, distinct from a sized signed/unsigned integer for
    /// overload-resolution purposes (spec.md §6.1).
    Char,
    WChar,
    Char16,
    Char32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TsysCV {
    pub is_const: bool,
    pub is_volatile: bool,
    /// `constexpr`, carried as a cv-like decoration rather than its own
    /// `TsysKind` (spec.md's `CVOf({isConst, isVolatile, isConstExpr})`).
    pub is_const_expr: bool,
}

impl TsysCV {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        !self.is_const && !self.is_volatile && !self.is_const_expr
    }

    pub fn merge(self, other: TsysCV) -> TsysCV {
        TsysCV {
            is_const: self.is_const || other.is_const,
            is_volatile: self.is_volatile || other.is_volatile,
            is_const_expr: self.is_const_expr || other.is_const_expr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TsysRefType {
    LRef,
    RRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TsysCallingConvention {
    None,
    Cdecl,
    Stdcall,
    Fastcall,
    Thiscall,
    Clrcall,
    Vectorcall,
}

/// The canonicalized function qualifier set (`const`/`volatile`/`&`/`&&`
/// on a member function), distinct from `TsysCV` because it qualifies
/// the implicit `this` rather than the function's own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TsysFunctionQuals {
    pub is_const: bool,
    pub is_volatile: bool,
    pub ref_qualifier: Option<TsysRefType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TsysFunction {
    pub ret: TsysId,
    pub params: Vec<TsysId>,
    pub is_variadic: bool,
    pub cc: TsysCallingConvention,
    pub quals: TsysFunctionQuals,
}

/// The structural key every `Tsys` node hashes on, used for hash-
/// consing: two nodes with equal keys are the same `TsysId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TsysKind {
    /// The type of a literal `nullptr`.
    Nullptr,
    /// The type of an integer literal whose digits are all zero — a
    /// distinct pseudo-type used only to give `0` its special
    /// "convertible to any pointer or any integer, preferred over
    /// `int`" status during overload resolution (spec.md §6.4).
    Zero,
    Primitive(TsysPrimitive),
    /// `T&`
    LRef(TsysId),
    /// `T&&`
    RRef(TsysId),
    /// `T*`
    Ptr(TsysId),
    /// `T[N]` / `T[]` (`None` when the bound is unknown, e.g. a
    /// parameter's decayed array type).
    Array(TsysId, Option<u64>),
    Function(TsysFunction),
    /// A pointer-to-member type, `element` qualified by membership in
    /// `class_symbol`.
    Member(SymbolId, TsysId),
    /// `const`/`volatile` wrapped around `element`. Never nested: a
    /// `CV` never wraps another `CV` (the canonicalizer always merges
    /// adjacent qualifier sets into one node, spec.md §6.2).
    CV(TsysCV, TsysId),
    /// The type named by a symbol (a class, enum, or type alias).
    Decl(SymbolId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tsys {
    pub id: TsysId,
    pub kind: TsysKind,
}

impl Tsys {
    /// Strip top-level cv-qualification and reference-ness in a single
    /// pass, returning the bare entity type underneath. Grounded in the
    /// original `GetEntity`, which always fully unwraps both layers
    /// together rather than one qualifier at a time (a `CV` node is
    /// never found directly atop a `LRef`/`RRef` node or vice versa
    /// more than once, since the canonicalizer normalizes `CV(LRef(T))`
    /// and `LRef(CV(T))` to the same node — see `TsysInterner::cv`).
    pub fn strip_cv_and_ref(interner: &TsysInterner, id: TsysId) -> TsysId {
        match &interner.get(id).kind {
            TsysKind::CV(_, inner) => Tsys::strip_cv_and_ref(interner, *inner),
            TsysKind::LRef(inner) | TsysKind::RRef(inner) => {
                Tsys::strip_cv_and_ref(interner, *inner)
            }
            _ => id,
        }
    }

    pub fn is_reference(interner: &TsysInterner, id: TsysId) -> bool {
        matches!(
            interner.get(id).kind,
            TsysKind::LRef(_) | TsysKind::RRef(_)
        )
    }

    pub fn cv_of(interner: &TsysInterner, id: TsysId) -> TsysCV {
        match &interner.get(id).kind {
            TsysKind::CV(cv, _) => *cv,
            _ => TsysCV::none(),
        }
    }

    /// Strip cv-qualification and reference-ness together, like
    /// `strip_cv_and_ref`, but also hand back the accumulated qualifier
    /// flags and the outermost reference kind encountered (`GetEntity`
    /// in the original expression typer, spec.md §6.5) — the shape the
    /// typer needs for member access and overload resolution, where the
    /// bare entity and its qualifiers are consulted separately.
    pub fn entity_of(
        interner: &TsysInterner,
        id: TsysId,
    ) -> (TsysId, TsysCV, Option<TsysRefType>) {
        match &interner.get(id).kind {
            TsysKind::LRef(inner) => {
                let (base, cv, _) = Tsys::entity_of(interner, *inner);
                (base, cv, Some(TsysRefType::LRef))
            }
            TsysKind::RRef(inner) => {
                let (base, cv, _) = Tsys::entity_of(interner, *inner);
                (base, cv, Some(TsysRefType::RRef))
            }
            TsysKind::CV(cv, inner) => {
                let (base, inner_cv, r) = Tsys::entity_of(interner, *inner);
                (base, cv.merge(inner_cv), r)
            }
            _ => (id, TsysCV::none(), None),
        }
    }

    /// If `id` (after stripping cv/ref) is a `Member(class, inner)`
    /// pointing at `class`, hand back `inner`; otherwise `id` unchanged.
    /// Grounded in `GetTypeWithoutMemberAndCC` (SPEC_FULL.md §B.6): used
    /// by `VisitSymbol` to undo a member-function's implicit class
    /// wrapping when the access happens from inside that same class.
    pub fn unwrap_member(interner: &TsysInterner, id: TsysId, class: SymbolId) -> TsysId {
        match &interner.get(id).kind {
            TsysKind::Member(owner, inner) if *owner == class => *inner,
            _ => id,
        }
    }

    /// Drill through `Ptr`/`Member`/cv/ref layers down to a `Function`
    /// node, the shape every callable `ExprTsysItem` the typer produces
    /// takes (`Ptr(Function(..))` or `Ptr(Member(class, Function(..)))`).
    pub fn as_function(interner: &TsysInterner, id: TsysId) -> Option<&TsysFunction> {
        match &interner.get(id).kind {
            TsysKind::Function(f) => Some(f),
            TsysKind::Ptr(inner) | TsysKind::Member(_, inner) => Tsys::as_function(interner, *inner),
            TsysKind::CV(_, inner) | TsysKind::LRef(inner) | TsysKind::RRef(inner) => {
                Tsys::as_function(interner, *inner)
            }
            _ => None,
        }
    }
}
