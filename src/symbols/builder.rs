//! Mutating operations on a `SymbolTable`: creating scope-introducing
//! symbols and wiring the forward-declaration/specialization/
//! using-namespace cross-links. Grounded in `Parser.h`'s
//! `Symbol::CreateDeclSymbol`, `Symbol::CreateStatSymbol`, and
//! `Symbol::SetForwardDeclarationRoot`.

use crate::ast::Declaration;
use crate::base::IStr;
use crate::errors::{CoreError, CoreResult};
use crate::symbols::{SymbolId, SymbolKind, SymbolTable};

impl SymbolTable {
    /// Create a fresh child symbol named `name` under `parent` holding
    /// `decl` as its sole declaration. Every non-namespace declaration
    /// gets its own symbol with a unique identity — forward/definition
    /// groupings are modeled purely through the forward-declaration
    /// links wired separately by `wire_forward_group`, never by
    /// merging declarations onto one symbol (spec.md §3's invariant:
    /// "only namespace symbols merge multiple declarations into a
    /// single symbol"). Namespace reopening is handled by the caller,
    /// which looks up and reuses an existing symbol itself before ever
    /// reaching this function.
    pub fn create_decl_symbol(&mut self, parent: SymbolId, name: IStr, decl: Declaration) -> SymbolId {
        let id = self.alloc_child(parent, name, SymbolKind::Decl);
        self.get_mut(id).decls.push(decl);
        id
    }

    /// Push another declaration onto an existing symbol — the one
    /// legitimate use is a namespace reopening, where the caller has
    /// already found the symbol to reuse.
    pub fn push_decl(&mut self, symbol: SymbolId, decl: Declaration) {
        self.get_mut(symbol).decls.push(decl);
    }

    /// Create a fresh child scope for a statement block; never shares
    /// with a sibling the way declarations do, since each block is its
    /// own scope regardless of any other block at the same nesting
    /// level.
    pub fn create_stat_symbol(&mut self, parent: SymbolId) -> SymbolId {
        self.alloc_child(parent, IStr::from(""), SymbolKind::Stat)
    }

    fn alloc_child(&mut self, parent: SymbolId, name: IStr, kind: SymbolKind) -> SymbolId {
        let id = self.alloc(Some(parent), name.clone(), kind);
        self.get_mut(parent)
            .children
            .entry(name)
            .or_default()
            .push(id);
        id
    }

    /// Wire `member` into the forward-declaration group rooted at
    /// `root`. `root` itself is never touched — the root holds the
    /// group's inverse list but is not a forward of anything, per
    /// spec.md §3. A no-op if `member == root`. Idempotent if `member`
    /// is already wired to exactly this root; fails if `member` already
    /// roots or belongs to a *different* group, mirroring the
    /// original's `SetForwardDeclarationRoot`, which silently no-ops on
    /// a redundant call but is a parser-level logic error otherwise (so
    /// here it is surfaced as `CoreError::NotConvertable` rather than
    /// silently corrupting the group).
    pub fn set_forward_declaration_root(
        &mut self,
        root: SymbolId,
        member: SymbolId,
    ) -> CoreResult<()> {
        if member == root {
            return Ok(());
        }
        if let Some(existing_root) = self.get(member).forward_declaration_root {
            if existing_root == root {
                tracing::trace!(
                    "[FORWARD_GROUP] {:?} already wired to root {:?}, no-op",
                    member,
                    root
                );
                return Ok(());
            }
            return Err(CoreError::NotConvertable {
                reason: "symbol already belongs to a different forward-declaration group"
                    .to_string(),
            });
        }

        self.get_mut(member).forward_declaration_root = Some(root);
        self.get_mut(root).forward_declarations.push(member);
        tracing::debug!("[FORWARD_GROUP] wired {:?} -> root {:?}", member, root);
        Ok(())
    }

    /// Decide where a freshly created declaration symbol belongs among
    /// its `matching_siblings` (created earlier, under the same name,
    /// and — for functions — the same signature) per spec.md §4.3's
    /// policy: the first non-forward declaration under a name becomes
    /// the root; every forward, whether seen before or after, is wired
    /// to it exactly once. `matching_siblings` must not include
    /// `new_symbol` itself and should be in declaration order.
    pub fn wire_forward_group(
        &mut self,
        matching_siblings: &[SymbolId],
        new_symbol: SymbolId,
        new_is_forward: bool,
    ) -> CoreResult<()> {
        if let Some(&root) = matching_siblings
            .iter()
            .find(|&&s| !self.get(s).decl_is_forward())
        {
            return self.set_forward_declaration_root(root, new_symbol);
        }
        if !new_is_forward {
            // No non-forward sibling exists yet: `new_symbol` becomes
            // the root, and every earlier sibling — necessarily a
            // forward with nowhere to point until now — is wired to it
            // retroactively.
            for &sibling in matching_siblings {
                self.set_forward_declaration_root(new_symbol, sibling)?;
            }
        }
        Ok(())
    }

    /// Same star topology as forward declarations, for template
    /// specialization groups.
    pub fn add_specialization(&mut self, root: SymbolId, member: SymbolId) -> CoreResult<()> {
        if member == root {
            return Ok(());
        }
        if let Some(existing_root) = self.get(member).specialization_root {
            if existing_root == root {
                return Ok(());
            }
            return Err(CoreError::NotConvertable {
                reason: "symbol already belongs to a different specialization group".to_string(),
            });
        }

        self.get_mut(member).specialization_root = Some(root);
        self.get_mut(root).specializations.push(member);
        Ok(())
    }

    /// Record a `using namespace target;` edge against `scope`. Edges
    /// accumulate in declaration order and are never deduplicated: a
    /// namespace named twice is walked twice by
    /// `SymbolAccessableInScope`, matching the original's plain
    /// `List<Ptr<Symbol>>` append.
    pub fn add_using_namespace(&mut self, scope: SymbolId, target: SymbolId) {
        self.get_mut(scope).using_namespaces.push(target);
    }
}
