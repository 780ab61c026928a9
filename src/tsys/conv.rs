//! Conversion ranking used by overload resolution (spec.md §4.6),
//! grounded in `Ast_Expr_ExprToTsys.cpp`'s `TestFunctionQualifier` and
//! `FilterFunctionByQualifier`.
//!
//! `TsysConv` variants are listed best-to-worst by declaration order,
//! `Direct` excepted: it sits after `Illegal` in the declaration but is
//! a special case rather than a rung on the ladder, meaning "this
//! candidate matched with no qualifier adjustment at all" and always
//! wins outright. Comparing two gradable conversions with `<` answers
//! "is the left strictly better" using the declared rung order;
//! `Direct` must be special-cased by callers rather than relied on to
//! compare correctly against the other variants (see
//! `TsysConv::is_better_than`).

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TsysConv {
    Exact,
    TrivialConversion,
    IntegralPromotion,
    StandardConversion,
    UserDefined,
    Ellipsis,
    NeedConvertion,
    Illegal,
    /// Not part of the graded ladder: an unqualified direct match,
    /// better than every other rung including `Exact`.
    Direct,
}

impl TsysConv {
    pub fn is_viable(self) -> bool {
        !matches!(self, TsysConv::Illegal)
    }

    /// `self` is strictly preferable to `other` as an overload
    /// resolution candidate. `Direct` always wins; `Illegal` always
    /// loses; otherwise lower-ranked (declared earlier) beats
    /// higher-ranked.
    pub fn is_better_than(self, other: TsysConv) -> bool {
        match (self, other) {
            (TsysConv::Direct, TsysConv::Direct) => false,
            (TsysConv::Direct, _) => true,
            (_, TsysConv::Direct) => false,
            _ => self < other,
        }
    }

    /// The worse of two conversions, used when scoring a candidate
    /// function across all of its parameters: the candidate's overall
    /// rank is its single worst per-parameter conversion (spec.md
    /// §4.6, `VisitOverloadedFunction`).
    pub fn worse(self, other: TsysConv) -> TsysConv {
        if other.is_better_than(self) {
            self
        } else {
            other
        }
    }
}

/// Rank how well `arg` binds to a declared parameter of type `param`
/// (spec.md §4.6's `TestParameter`). The original's exact per-pair
/// conversion table is not reproduced in full (it spans hundreds of
/// lines of `Ast_Expr_ExprToTsys.cpp` covering every standard-conversion
/// pairing); this is a best-effort approximation of the same ladder,
/// documented as such in DESIGN.md.
pub fn test_parameter(interner: &crate::tsys::TsysInterner, param: TsysId, arg: TsysId) -> TsysConv {
    use crate::tsys::{Tsys, TsysKind, TsysPrimitive};

    if param == arg {
        return TsysConv::Exact;
    }

    let (param_entity, _param_cv, _param_ref) = Tsys::entity_of(interner, param);
    let (arg_entity, _arg_cv, _arg_ref) = Tsys::entity_of(interner, arg);

    if param_entity == arg_entity {
        // Same underlying entity, differing only by cv/ref decoration:
        // binding through a reference or adding a qualifier never
        // changes which overload is picked, just how directly.
        return TsysConv::TrivialConversion;
    }

    match (&interner.get(param_entity).kind, &interner.get(arg_entity).kind) {
        (_, TsysKind::Zero)
            if matches!(
                interner.get(param_entity).kind,
                TsysKind::Ptr(_) | TsysKind::Primitive(_)
            ) =>
        {
            TsysConv::StandardConversion
        }
        (TsysKind::Ptr(_), TsysKind::Nullptr) => TsysConv::StandardConversion,
        (TsysKind::Primitive(TsysPrimitive::Bool), TsysKind::Primitive(_))
        | (TsysKind::Primitive(_), TsysKind::Primitive(TsysPrimitive::Bool)) => {
            TsysConv::StandardConversion
        }
        (
            TsysKind::Primitive(TsysPrimitive::Int(_, param_width)),
            TsysKind::Primitive(TsysPrimitive::Int(_, arg_width)),
        ) => {
            if arg_width <= param_width {
                TsysConv::IntegralPromotion
            } else {
                TsysConv::StandardConversion
            }
        }
        (TsysKind::Primitive(TsysPrimitive::Float(_)), TsysKind::Primitive(TsysPrimitive::Float(_)))
        | (TsysKind::Primitive(TsysPrimitive::Float(_)), TsysKind::Primitive(TsysPrimitive::Int(_, _)))
        | (TsysKind::Primitive(TsysPrimitive::Int(_, _)), TsysKind::Primitive(TsysPrimitive::Float(_))) => {
            TsysConv::StandardConversion
        }
        (
            TsysKind::Primitive(
                TsysPrimitive::Char | TsysPrimitive::WChar | TsysPrimitive::Char16 | TsysPrimitive::Char32,
            ),
            TsysKind::Primitive(TsysPrimitive::Int(_, _)),
        ) => TsysConv::StandardConversion,
        (TsysKind::Ptr(param_inner), TsysKind::Ptr(arg_inner)) => {
            if param_inner == arg_inner {
                TsysConv::TrivialConversion
            } else {
                TsysConv::StandardConversion
            }
        }
        (TsysKind::Decl(_), TsysKind::Decl(_)) => TsysConv::UserDefined,
        _ => TsysConv::Illegal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_beats_exact() {
        assert!(TsysConv::Direct.is_better_than(TsysConv::Exact));
        assert!(!TsysConv::Exact.is_better_than(TsysConv::Direct));
    }

    #[test]
    fn graded_rungs_compare_by_declaration_order() {
        assert!(TsysConv::Exact.is_better_than(TsysConv::TrivialConversion));
        assert!(TsysConv::StandardConversion.is_better_than(TsysConv::UserDefined));
        assert!(!TsysConv::Illegal.is_better_than(TsysConv::Ellipsis));
    }

    #[test]
    fn worse_picks_the_lower_ranked_conversion() {
        assert_eq!(
            TsysConv::Exact.worse(TsysConv::StandardConversion),
            TsysConv::StandardConversion
        );
        assert_eq!(TsysConv::Direct.worse(TsysConv::Exact), TsysConv::Exact);
    }

    #[test]
    fn test_parameter_ranks_identical_ids_exact() {
        use crate::tsys::{Signedness, TsysInterner, TsysPrimitive};
        use crate::tsys::PrimitiveWidth;
        let mut interner = TsysInterner::new();
        let int_ty = interner.primitive(TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits32));
        assert_eq!(test_parameter(&interner, int_ty, int_ty), TsysConv::Exact);
    }

    #[test]
    fn test_parameter_ranks_zero_to_pointer_as_standard_conversion() {
        use crate::tsys::TsysInterner;
        let mut interner = TsysInterner::new();
        let zero = interner.zero();
        let void_ty = interner.primitive(crate::tsys::TsysPrimitive::Void);
        let ptr = interner.ptr(void_ty);
        assert_eq!(test_parameter(&interner, ptr, zero), TsysConv::StandardConversion);
    }

    #[test]
    fn test_parameter_ranks_unrelated_classes_illegal() {
        use crate::tsys::TsysInterner;
        use crate::symbols::SymbolTable;
        let mut interner = TsysInterner::new();
        let table = SymbolTable::new();
        let void_ty = interner.primitive(crate::tsys::TsysPrimitive::Void);
        let class_ty = interner.decl(table.root());
        assert_eq!(test_parameter(&interner, void_ty, class_ty), TsysConv::Illegal);
    }
}
