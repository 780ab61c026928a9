//! Declarator/type-grammar tests grounded in spec.md §8's concrete
//! scenarios 4 and 5 (pointer/reference declarator forms, qualifier
//! stacking).

use cppdoc::ast::decl::Declaration;
use cppdoc::ast::ty::{PrimitiveKeyword, ReferenceKind, Type};
use cppdoc::context::ParseOptions;
use cppdoc::parse_translation_unit;
use cppdoc::tsys::{PrimitiveWidth, Signedness, Tsys, TsysKind, TsysPrimitive};

fn variable_type(program: &cppdoc::ast::Program, index: usize) -> &Type {
    match &program.decls[index] {
        Declaration::Variable(v) => &v.ty,
        other => panic!("expected a variable declaration, got {other:?}"),
    }
}

#[test]
fn ptr32_ptr64_and_plain_pointer_canonicalize_to_the_same_tsys() {
    let (program, mut ctx) = parse_translation_unit(
        "int* __ptr32 a; int* __ptr64 b; int* c;",
        ParseOptions::default(),
    )
    .unwrap();

    let a = cppdoc::typer::canonicalize_type(&mut ctx, variable_type(&program, 0)).unwrap();
    let b = cppdoc::typer::canonicalize_type(&mut ctx, variable_type(&program, 1)).unwrap();
    let c = cppdoc::typer::canonicalize_type(&mut ctx, variable_type(&program, 2)).unwrap();

    assert_eq!(a, b);
    assert_eq!(b, c);
    match &ctx.tsys.get(c).kind {
        TsysKind::Ptr(inner) => {
            assert_eq!(
                ctx.tsys.get(*inner).kind.clone(),
                TsysKind::Primitive(TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits32))
            );
        }
        other => panic!("expected a Ptr(int), got {other:?}"),
    }
}

#[test]
fn double_reference_declarator_nests_rref_over_lref() {
    let (program, _ctx) =
        parse_translation_unit("int & && x;", ParseOptions::default()).unwrap();
    let ty = variable_type(&program, 0);
    match ty {
        Type::Reference {
            kind: ReferenceKind::RRef,
            inner,
            ..
        } => match inner.as_ref() {
            Type::Reference {
                kind: ReferenceKind::LRef,
                inner,
                ..
            } => match inner.as_ref() {
                Type::Primitive { keyword, .. } => assert_eq!(*keyword, PrimitiveKeyword::Int),
                other => panic!("expected a primitive int, got {other:?}"),
            },
            other => panic!("expected an inner LRef, got {other:?}"),
        },
        other => panic!("expected an outer RRef, got {other:?}"),
    }
}

#[test]
fn constexpr_const_and_volatile_each_set_one_cv_flag() {
    let (program, mut ctx) = parse_translation_unit(
        "constexpr int a; const int b; volatile int c;",
        ParseOptions::default(),
    )
    .unwrap();

    let a = cppdoc::typer::canonicalize_type(&mut ctx, variable_type(&program, 0)).unwrap();
    let b = cppdoc::typer::canonicalize_type(&mut ctx, variable_type(&program, 1)).unwrap();
    let c = cppdoc::typer::canonicalize_type(&mut ctx, variable_type(&program, 2)).unwrap();

    let flags_a = Tsys::cv_of(&ctx.tsys, a);
    assert!(flags_a.is_const_expr && !flags_a.is_const && !flags_a.is_volatile);

    let flags_b = Tsys::cv_of(&ctx.tsys, b);
    assert!(flags_b.is_const && !flags_b.is_const_expr && !flags_b.is_volatile);

    let flags_c = Tsys::cv_of(&ctx.tsys, c);
    assert!(flags_c.is_volatile && !flags_c.is_const && !flags_c.is_const_expr);
}

#[test]
fn printer_renders_qualifiers_postfix() {
    let (program, _ctx) =
        parse_translation_unit("const int x; volatile int y;", ParseOptions::default()).unwrap();
    let text = cppdoc::printer::print_program(&program);
    assert_eq!(text, "int const x;\nint volatile y;\n");
}
