//! Symbol-table tests complementing the forward-declaration-group and
//! namespace-reopening coverage already exercised inline in
//! `parser::declaration`'s own `#[cfg(test)]` module: here we exercise
//! the table's query helpers (`canonical`, `definition_of`, `is_static`)
//! and the cross-links the parser doesn't itself drive
//! (`using_namespaces`, `add_specialization`).

use cppdoc::ast::decl::{ClassDecl, ClassKind};
use cppdoc::ast::{CppName, Declaration, NameKind};
use cppdoc::context::ParseOptions;
use cppdoc::parse_translation_unit;

#[test]
fn using_namespace_edges_accumulate_without_deduplication() {
    let (_program, ctx) = parse_translation_unit(
        "namespace a {} namespace n { using namespace a; using namespace a; }",
        ParseOptions::default(),
    )
    .unwrap();

    let root = ctx.symbols.root();
    let a = ctx.symbols.children_named(root, "a")[0];
    let n = ctx.symbols.children_named(root, "n")[0];

    let edges = &ctx.symbols.get(n).using_namespaces;
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0], a);
    assert_eq!(edges[1], a);
}

#[test]
fn canonical_and_definition_of_resolve_through_a_forward_group() {
    let (_program, ctx) =
        parse_translation_unit("static int x; int x = 1;", ParseOptions::default()).unwrap();

    let root = ctx.symbols.root();
    let children = ctx.symbols.children_named(root, "x");
    assert_eq!(children.len(), 2);

    let forward = children[0];
    let definition = children[1];

    assert_eq!(ctx.symbols.canonical(forward), definition);
    assert_eq!(ctx.symbols.canonical(definition), definition);

    let Declaration::Variable(v) = ctx.symbols.definition_of(forward) else {
        panic!("expected the forward's definition_of to resolve to a variable declaration");
    };
    assert!(v.initializer.is_some());

    // static-ness is scanned across the whole group: the forward alone
    // carries the `static` decorator, but `is_static` reports true for
    // either member once they're wired together.
    assert!(ctx.symbols.is_static(forward));
    assert!(ctx.symbols.is_static(definition));
}

#[test]
fn is_static_is_false_when_no_group_member_is_static() {
    let (_program, ctx) = parse_translation_unit("int x; int x = 1;", ParseOptions::default()).unwrap();
    let root = ctx.symbols.root();
    let children = ctx.symbols.children_named(root, "x");
    assert!(!ctx.symbols.is_static(children[0]));
    assert!(!ctx.symbols.is_static(children[1]));
}

#[test]
fn specialization_groups_share_the_forward_declaration_star_topology() {
    let (_program, mut ctx) = parse_translation_unit("", ParseOptions::default()).unwrap();
    let root = ctx.symbols.root();

    let make_class_symbol = |ctx: &mut cppdoc::ParseContext<'_>, spelling: &str| {
        let name = CppName {
            kind: NameKind::Normal,
            spelling: ctx.strings.intern(spelling),
            tokens: [None, None, None, None],
        };
        let decl = Declaration::Class(ClassDecl {
            name: name.clone(),
            symbol: None,
            span: cppdoc::base::Span::point(cppdoc::base::TextSize::from(0)),
            is_forward: false,
            kind: ClassKind::Class,
            bases: Vec::new(),
            members: Vec::new(),
        });
        ctx.symbols.create_decl_symbol(root, name.spelling, decl)
    };

    let primary = make_class_symbol(&mut ctx, "Vector");
    let spec_a = make_class_symbol(&mut ctx, "Vector<int>");
    let spec_b = make_class_symbol(&mut ctx, "Vector<double>");

    ctx.symbols.add_specialization(primary, spec_a).unwrap();
    ctx.symbols.add_specialization(primary, spec_b).unwrap();

    assert_eq!(
        ctx.symbols.get(primary).specializations,
        vec![spec_a, spec_b]
    );
    assert_eq!(ctx.symbols.get(spec_a).specialization_root, Some(primary));
    assert_eq!(ctx.symbols.get(spec_b).specialization_root, Some(primary));

    // rewiring the same pair again is a no-op, matching
    // `set_forward_declaration_root`'s idempotence.
    assert!(ctx.symbols.add_specialization(primary, spec_a).is_ok());
    assert_eq!(ctx.symbols.get(primary).specializations, vec![spec_a, spec_b]);
}

#[test]
fn add_specialization_rejects_a_conflicting_second_root() {
    let (_program, mut ctx) = parse_translation_unit("", ParseOptions::default()).unwrap();
    let root = ctx.symbols.root();

    let make = |ctx: &mut cppdoc::ParseContext<'_>, spelling: &str| {
        let name = CppName {
            kind: NameKind::Normal,
            spelling: ctx.strings.intern(spelling),
            tokens: [None, None, None, None],
        };
        let decl = Declaration::Class(ClassDecl {
            name: name.clone(),
            symbol: None,
            span: cppdoc::base::Span::point(cppdoc::base::TextSize::from(0)),
            is_forward: false,
            kind: ClassKind::Class,
            bases: Vec::new(),
            members: Vec::new(),
        });
        ctx.symbols.create_decl_symbol(root, name.spelling, decl)
    };

    let root_a = make(&mut ctx, "A");
    let root_b = make(&mut ctx, "B");
    let member = make(&mut ctx, "A<int>");

    ctx.symbols.add_specialization(root_a, member).unwrap();
    assert!(ctx.symbols.add_specialization(root_b, member).is_err());
}

#[test]
fn namespace_reopened_three_times_shares_one_symbol_across_all_bodies() {
    let (_program, ctx) = parse_translation_unit(
        "namespace n { int a; } namespace n { int b; } namespace n { int c; }",
        ParseOptions::default(),
    )
    .unwrap();

    let root = ctx.symbols.root();
    let n = ctx.symbols.children_named(root, "n");
    assert_eq!(n.len(), 1);
    assert_eq!(ctx.symbols.get(n[0]).decls.len(), 3);

    for name in ["a", "b", "c"] {
        assert_eq!(ctx.symbols.children_named(n[0], name).len(), 1);
    }
}
