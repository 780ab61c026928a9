//! Hash-consing storage for `Tsys` nodes, grounded in
//! `base/interner.rs`'s `Interner<Rc<str>>` pattern from the teacher,
//! generalized from string interning to structural type interning.

use rustc_hash::FxHashMap;

use crate::symbols::SymbolId;
use crate::tsys::{
    Tsys, TsysCV, TsysCallingConvention, TsysFunction, TsysFunctionQuals, TsysId, TsysKind,
    TsysPrimitive,
};

#[derive(Debug, Default)]
pub struct TsysInterner {
    nodes: Vec<Tsys>,
    by_kind: FxHashMap<TsysKind, TsysId>,
}

impl TsysInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TsysId) -> &Tsys {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn intern(&mut self, kind: TsysKind) -> TsysId {
        if let Some(&id) = self.by_kind.get(&kind) {
            return id;
        }
        let id = TsysId(self.nodes.len() as u32);
        self.nodes.push(Tsys {
            id,
            kind: kind.clone(),
        });
        self.by_kind.insert(kind, id);
        id
    }

    pub fn nullptr(&mut self) -> TsysId {
        self.intern(TsysKind::Nullptr)
    }

    pub fn zero(&mut self) -> TsysId {
        self.intern(TsysKind::Zero)
    }

    pub fn primitive(&mut self, primitive: TsysPrimitive) -> TsysId {
        self.intern(TsysKind::Primitive(primitive))
    }

    pub fn decl(&mut self, symbol: SymbolId) -> TsysId {
        self.intern(TsysKind::Decl(symbol))
    }

    pub fn ptr(&mut self, inner: TsysId) -> TsysId {
        self.intern(TsysKind::Ptr(inner))
    }

    pub fn array(&mut self, element: TsysId, dim: Option<u64>) -> TsysId {
        self.intern(TsysKind::Array(element, dim))
    }

    pub fn member(&mut self, class_symbol: SymbolId, element: TsysId) -> TsysId {
        self.intern(TsysKind::Member(class_symbol, element))
    }

    pub fn function(
        &mut self,
        ret: TsysId,
        params: Vec<TsysId>,
        is_variadic: bool,
        cc: TsysCallingConvention,
        quals: TsysFunctionQuals,
    ) -> TsysId {
        self.intern(TsysKind::Function(TsysFunction {
            ret,
            params,
            is_variadic,
            cc,
            quals,
        }))
    }

    /// `T&`; collapses `lref(lref(T))` and `lref(rref(T))` to `lref(T)`
    /// per reference-collapsing rules.
    pub fn lref(&mut self, inner: TsysId) -> TsysId {
        match &self.get(inner).kind {
            TsysKind::LRef(t) | TsysKind::RRef(t) => {
                let t = *t;
                self.intern(TsysKind::LRef(t))
            }
            _ => self.intern(TsysKind::LRef(inner)),
        }
    }

    /// `T&&`; `rref(lref(T))` collapses to `lref(T)`, `rref(rref(T))`
    /// to `rref(T)`.
    pub fn rref(&mut self, inner: TsysId) -> TsysId {
        match &self.get(inner).kind {
            TsysKind::LRef(t) => {
                let t = *t;
                self.intern(TsysKind::LRef(t))
            }
            TsysKind::RRef(t) => {
                let t = *t;
                self.intern(TsysKind::RRef(t))
            }
            _ => self.intern(TsysKind::RRef(inner)),
        }
    }

    /// Apply a cv-qualifier set to `inner`, normalizing so a `CV` node
    /// never ends up directly nested inside or around a reference in
    /// more than one canonical arrangement: qualifying a reference
    /// qualifies its referent instead (`int& const` means `int&`, not
    /// a const reference — C++ has no such thing), and qualifying an
    /// already-qualified type merges the flag sets rather than
    /// nesting `CV` inside `CV`.
    pub fn cv(&mut self, flags: TsysCV, inner: TsysId) -> TsysId {
        if flags.is_none() {
            return inner;
        }
        match self.get(inner).kind.clone() {
            TsysKind::LRef(t) => {
                let qualified = self.cv(flags, t);
                self.intern(TsysKind::LRef(qualified))
            }
            TsysKind::RRef(t) => {
                let qualified = self.cv(flags, t);
                self.intern(TsysKind::RRef(qualified))
            }
            TsysKind::CV(existing, t) => {
                let merged = existing.merge(flags);
                self.intern(TsysKind::CV(merged, t))
            }
            _ => self.intern(TsysKind::CV(flags, inner)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsys::PrimitiveWidth;

    #[test]
    fn structurally_equal_types_hash_cons_to_one_id() {
        let mut interner = TsysInterner::new();
        let a = interner.primitive(TsysPrimitive::Int(
            crate::tsys::Signedness::Signed,
            PrimitiveWidth::Bits32,
        ));
        let b = interner.primitive(TsysPrimitive::Int(
            crate::tsys::Signedness::Signed,
            PrimitiveWidth::Bits32,
        ));
        assert_eq!(a, b);
    }

    #[test]
    fn cv_on_reference_qualifies_the_referent() {
        let mut interner = TsysInterner::new();
        let int_ty = interner.primitive(TsysPrimitive::Int(
            crate::tsys::Signedness::Signed,
            PrimitiveWidth::Bits32,
        ));
        let lref = interner.lref(int_ty);
        let qualified = interner.cv(TsysCV { is_const: true, is_volatile: false, is_const_expr: false }, lref);
        match &interner.get(qualified).kind {
            TsysKind::LRef(inner) => {
                assert!(matches!(interner.get(*inner).kind, TsysKind::CV(_, _)));
            }
            other => panic!("expected LRef wrapping a CV node, got {other:?}"),
        }
    }

    #[test]
    fn repeated_cv_merges_instead_of_nesting() {
        let mut interner = TsysInterner::new();
        let int_ty = interner.primitive(TsysPrimitive::Int(
            crate::tsys::Signedness::Signed,
            PrimitiveWidth::Bits32,
        ));
        let const_int = interner.cv(TsysCV { is_const: true, is_volatile: false, is_const_expr: false }, int_ty);
        let const_volatile_int = interner.cv(
            TsysCV { is_const: false, is_volatile: true, is_const_expr: false },
            const_int,
        );
        match &interner.get(const_volatile_int).kind {
            TsysKind::CV(flags, _) => {
                assert!(flags.is_const && flags.is_volatile);
            }
            other => panic!("expected a single merged CV node, got {other:?}"),
        }
    }
}
