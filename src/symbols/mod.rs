//! Symbol Table (spec.md §5): an owned tree of `Symbol` nodes plus the
//! non-owning cross-links (forward-declaration groups, specialization
//! groups, `using namespace` edges) that do not fit a strict
//! parent/child shape.
//!
//! Grounded in `Parser.h`'s `Symbol` class: ownership flows strictly
//! parent → children (an `IndexMap<IStr, Vec<SymbolId>>` per node,
//! mirroring the original's ordered `Dictionary<name, List<Ptr<Symbol>>>`),
//! while forward-declaration/specialization/using-namespace links are
//! plain `SymbolId` cross-references stored alongside.

pub mod builder;

use indexmap::IndexMap;

use crate::ast::Declaration;
use crate::base::IStr;

/// Index into a `SymbolTable`'s arena. Stable for the table's lifetime;
/// never reused after a symbol is created (this table never deletes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

/// What a scope-introducing symbol was created for, mirroring the
/// original's split between `CreateDeclSymbol` and `CreateStatSymbol`.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// The implicit root of a translation unit.
    Root,
    /// A symbol bound to one or more declarations sharing a name.
    Decl,
    /// A symbol bound to a statement's block scope (no declaration).
    Stat,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub parent: Option<SymbolId>,
    pub name: IStr,
    pub kind: SymbolKind,

    /// Declarations bound to this symbol. A name can carry more than
    /// one when forward declarations and a defining declaration share
    /// a symbol (functions overloads are instead distinct sibling
    /// symbols under the same name — see `SymbolTable::add`).
    pub decls: Vec<Declaration>,

    /// Ordered, name-keyed multimap of child symbols: insertion order
    /// within each name bucket is preserved, matching the original's
    /// "declarations keep source order" guarantee (spec.md §5).
    pub children: IndexMap<IStr, Vec<SymbolId>>,

    /// Set once, on the symbol the parser first recognizes as a
    /// forward declaration's group leader (spec.md §5.2). `None` means
    /// this symbol is not part of any forward-declaration group.
    pub forward_declaration_root: Option<SymbolId>,
    /// Populated only on the root symbol: every other member of the
    /// group, in declaration order. The root itself is excluded.
    pub forward_declarations: Vec<SymbolId>,

    /// Same star topology as forward declarations, for template
    /// specialization groups (spec.md §5.2).
    pub specialization_root: Option<SymbolId>,
    pub specializations: Vec<SymbolId>,

    /// `using namespace` edges recorded against this (namespace-scope)
    /// symbol, in declaration order.
    pub using_namespaces: Vec<SymbolId>,
}

impl Symbol {
    /// `true` iff this symbol is a forward declaration pointing at some
    /// other (non-forward) root. The root of a group is itself never a
    /// forward, per spec.md §3's invariant.
    pub fn is_forward_declaration(&self) -> bool {
        self.forward_declaration_root.is_some()
    }

    /// The other non-root members of this symbol's forward-declaration
    /// group, in declaration order, excluding the root itself — this is
    /// `forward_declarations` on whichever symbol is the root (`self`,
    /// if `self` is a root with no forward pointer of its own).
    pub fn forward_declaration_group<'a>(&'a self, table: &'a SymbolTable) -> &'a [SymbolId] {
        match self.forward_declaration_root {
            Some(root) => &table.get(root).forward_declarations,
            None => &self.forward_declarations,
        }
    }

    /// Whether the single declaration this (non-namespace) symbol was
    /// created for is itself a forward declaration, independent of
    /// whether it has been wired into a group yet — used by
    /// `SymbolTable::wire_forward_group` to find a root candidate
    /// among siblings that predate any wiring decision.
    pub fn decl_is_forward(&self) -> bool {
        self.decls.last().is_some_and(Declaration::is_forward)
    }
}

/// Owns every `Symbol` in a translation unit, indexed by `SymbolId`.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    arena: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self { arena: Vec::new() };
        table.arena.push(Symbol {
            id: SymbolId(0),
            parent: None,
            name: IStr::from(""),
            kind: SymbolKind::Root,
            decls: Vec::new(),
            children: IndexMap::new(),
            forward_declaration_root: None,
            forward_declarations: Vec::new(),
            specialization_root: None,
            specializations: Vec::new(),
            using_namespaces: Vec::new(),
        });
        table
    }

    pub fn root(&self) -> SymbolId {
        SymbolId(0)
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.arena[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.arena[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        false // the root always exists
    }

    /// Children of `parent` named `name`, in declaration order. Empty
    /// if there are none.
    pub fn children_named(&self, parent: SymbolId, name: &str) -> &[SymbolId] {
        self.get(parent)
            .children
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The declaration that carries `symbol`'s real definition: if
    /// `symbol` belongs to a forward-declaration group, the root's
    /// first non-forward declaration; otherwise `symbol`'s own last
    /// declaration. Falls back to whatever declaration is present when
    /// no non-forward declaration exists yet (an as-yet-undefined
    /// forward-only name). Used by the expression typer to canonicalize
    /// a name's declared type regardless of which forward a lookup
    /// happened to land on.
    pub fn definition_of(&self, symbol: SymbolId) -> &Declaration {
        let root = self
            .get(symbol)
            .forward_declaration_root
            .unwrap_or(symbol);
        let root_symbol = self.get(root);
        root_symbol
            .decls
            .iter()
            .rev()
            .find(|d| !d.is_forward())
            .unwrap_or_else(|| {
                root_symbol
                    .decls
                    .last()
                    .expect("a symbol created by the declaration parser always carries a declaration")
            })
    }

    /// The root of `symbol`'s forward-declaration group, or `symbol`
    /// itself if it belongs to none — the identity `VisitSymbol` should
    /// key on so that N forward/definition sightings of the same name
    /// are not typed as N distinct candidates.
    pub fn canonical(&self, symbol: SymbolId) -> SymbolId {
        self.get(symbol).forward_declaration_root.unwrap_or(symbol)
    }

    /// Whether any sighting of `symbol` — its own declaration or any
    /// member of its forward-declaration group — carries the `static`
    /// decorator (spec.md §4.6: "static-ness is determined by scanning
    /// the declaration and all forwards").
    pub fn is_static(&self, symbol: SymbolId) -> bool {
        let root = self
            .get(symbol)
            .forward_declaration_root
            .unwrap_or(symbol);
        let root_symbol = self.get(root);
        let root_static = root_symbol.decls.iter().any(Declaration::decorator_static);
        root_static
            || root_symbol
                .forward_declarations
                .iter()
                .any(|&member| self.get(member).decls.iter().any(Declaration::decorator_static))
    }

    /// All children of `parent` across every name, in the order their
    /// name buckets were first created (not a single global insertion
    /// order across names — matching the original multimap's iteration
    /// shape).
    pub fn all_children(&self, parent: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        self.get(parent)
            .children
            .values()
            .flat_map(|ids| ids.iter().copied())
    }

    fn alloc(&mut self, parent: Option<SymbolId>, name: IStr, kind: SymbolKind) -> SymbolId {
        let id = SymbolId(self.arena.len() as u32);
        self.arena.push(Symbol {
            id,
            parent,
            name,
            kind,
            decls: Vec::new(),
            children: IndexMap::new(),
            forward_declaration_root: None,
            forward_declarations: Vec::new(),
            specialization_root: None,
            specializations: Vec::new(),
            using_namespaces: Vec::new(),
        });
        id
    }
}
