//! Declaration-parser coverage beyond what `parser::declaration`'s own
//! inline tests already exercise: class member access grouping, base
//! specifiers, using-aliases, function forward/definition wiring, and
//! struct/union's differing default access.

use cppdoc::ast::decl::{AccessSpecifier, ClassKind, Declaration};
use cppdoc::ast::ty::Type;
use cppdoc::context::ParseOptions;
use cppdoc::parse_translation_unit;

#[test]
fn class_with_a_base_records_the_base_and_groups_members_by_access() {
    let (program, _ctx) = parse_translation_unit(
        "class Derived : Base { public: int x; private: int y; };",
        ParseOptions::default(),
    )
    .unwrap();

    let Declaration::Class(class) = &program.decls[0] else {
        panic!("expected a class declaration");
    };
    assert_eq!(class.kind, ClassKind::Class);
    assert_eq!(class.bases.len(), 1);
    assert_eq!(class.bases[0].name.segments.last().unwrap().spelling.as_ref(), "Base");

    assert_eq!(class.members.len(), 2);
    assert_eq!(class.members[0].access, AccessSpecifier::Public);
    assert_eq!(class.members[1].access, AccessSpecifier::Private);
}

#[test]
fn class_members_default_to_private_struct_and_union_to_public() {
    let (program, _ctx) = parse_translation_unit(
        "class C { int a; }; struct S { int b; }; union U { int c; };",
        ParseOptions::default(),
    )
    .unwrap();

    for (index, expected) in [
        (0, AccessSpecifier::Private),
        (1, AccessSpecifier::Public),
        (2, AccessSpecifier::Public),
    ] {
        let Declaration::Class(class) = &program.decls[index] else {
            panic!("expected a class declaration");
        };
        assert_eq!(class.members[0].access, expected);
    }
}

#[test]
fn member_declarations_record_their_containing_class() {
    let (program, ctx) = parse_translation_unit(
        "class C { int x; void f(); };",
        ParseOptions::default(),
    )
    .unwrap();

    let Declaration::Class(class) = &program.decls[0] else {
        panic!("expected a class declaration");
    };
    let class_symbol = class.symbol.unwrap();

    let Declaration::Variable(v) = &class.members[0].decl else {
        panic!("expected a variable member");
    };
    assert_eq!(v.containing_class, Some(class_symbol));

    let Declaration::Function(f) = &class.members[1].decl else {
        panic!("expected a function member");
    };
    assert_eq!(f.containing_class, Some(class_symbol));

    // the member's own symbol lives under the class scope, not the root.
    let root = ctx.symbols.root();
    assert!(ctx.symbols.children_named(root, "x").is_empty());
    assert_eq!(ctx.symbols.children_named(class_symbol, "x").len(), 1);
}

#[test]
fn using_alias_resolves_to_the_aliased_type() {
    let (program, _ctx) =
        parse_translation_unit("using Count = unsigned int;", ParseOptions::default()).unwrap();
    let Declaration::UsingAlias(alias) = &program.decls[0] else {
        panic!("expected a using-alias declaration");
    };
    assert_eq!(alias.name.spelling.as_ref(), "Count");
    assert!(matches!(alias.target, Type::Primitive { .. }));
}

#[test]
fn function_forward_declaration_then_definition_wires_as_one_group() {
    let (_program, ctx) =
        parse_translation_unit("void f(); void f() {}", ParseOptions::default()).unwrap();
    let root = ctx.symbols.root();
    let children = ctx.symbols.children_named(root, "f");
    assert_eq!(children.len(), 2);
    assert!(ctx.symbols.get(children[0]).is_forward_declaration());
    assert!(!ctx.symbols.get(children[1]).is_forward_declaration());
    assert_eq!(
        ctx.symbols.get(children[1]).forward_declarations,
        vec![children[0]]
    );
}

#[test]
fn function_with_a_body_initializer_is_not_treated_as_forward() {
    let (program, _ctx) = parse_translation_unit("void f() {}", ParseOptions::default()).unwrap();
    let Declaration::Function(f) = &program.decls[0] else {
        panic!("expected a function declaration");
    };
    assert!(!f.is_forward);
}
