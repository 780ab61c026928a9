//! Expression-typer tests grounded in spec.md §8's scenario 3 (literal
//! typing) and scenario 6 (qualifier-filtered overload resolution over
//! a const/non-const pair of conversion operators), plus coverage of
//! call and array-access overload resolution not otherwise exercised by
//! `tests/parser_types.rs` or the inline declaration-parser tests.

use cppdoc::ast::{Declaration, Expr};
use cppdoc::context::ParseOptions;
use cppdoc::parse_translation_unit;
use cppdoc::tsys::{PrimitiveWidth, Signedness, TsysKind, TsysPrimitive};
use cppdoc::typer::type_expr;

fn variable_initializer(program: &cppdoc::ast::Program, index: usize) -> &Expr {
    match &program.decls[index] {
        Declaration::Variable(v) => v
            .initializer
            .as_ref()
            .unwrap_or_else(|| panic!("variable at index {index} has no initializer"))
            .arguments
            .first()
            .unwrap_or_else(|| panic!("variable at index {index}'s initializer has no expression")),
        other => panic!("expected a variable declaration at index {index}, got {other:?}"),
    }
}

fn entity_kind(ctx: &cppdoc::ParseContext, tsys: cppdoc::TsysId) -> TsysKind {
    let (entity, _cv, _ref) = cppdoc::tsys::Tsys::entity_of(&ctx.tsys, tsys);
    ctx.tsys.get(entity).kind.clone()
}

#[test]
fn zero_literal_gets_the_zero_pseudotype() {
    let (program, mut ctx) = parse_translation_unit("int x = 0;", ParseOptions::default()).unwrap();
    let expr = variable_initializer(&program, 0);
    let items = type_expr(&mut ctx, expr).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(ctx.tsys.get(items[0].tsys).kind, TsysKind::Zero);
}

#[test]
fn unsigned_int_literal_types_as_unsigned_4_byte_primitive() {
    let (program, mut ctx) = parse_translation_unit("int x = 0u;", ParseOptions::default()).unwrap();
    let expr = variable_initializer(&program, 0);
    let items = type_expr(&mut ctx, expr).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(
        ctx.tsys.get(items[0].tsys).kind,
        TsysKind::Primitive(TsysPrimitive::Int(Signedness::Unsigned, PrimitiveWidth::Bits32))
    );
}

#[test]
fn float_suffixed_literal_types_as_4_byte_float() {
    let (program, mut ctx) = parse_translation_unit("float x = 0.5f;", ParseOptions::default()).unwrap();
    let expr = variable_initializer(&program, 0);
    let items = type_expr(&mut ctx, expr).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(
        ctx.tsys.get(items[0].tsys).kind,
        TsysKind::Primitive(TsysPrimitive::Float(PrimitiveWidth::Bits32))
    );
}

#[test]
fn string_literal_types_as_array_of_const_char() {
    let (program, mut ctx) =
        parse_translation_unit(r#"const char* x = "abc";"#, ParseOptions::default()).unwrap();
    let expr = variable_initializer(&program, 0);
    let items = type_expr(&mut ctx, expr).unwrap();
    assert_eq!(items.len(), 1);
    match ctx.tsys.get(items[0].tsys).kind.clone() {
        TsysKind::Array(elem, None) => match ctx.tsys.get(elem).kind.clone() {
            TsysKind::CV(cv, inner) => {
                assert!(cv.is_const && !cv.is_volatile);
                assert_eq!(ctx.tsys.get(inner).kind, TsysKind::Primitive(TsysPrimitive::Char));
            }
            other => panic!("expected a CV(const, char) array element, got {other:?}"),
        },
        other => panic!("expected an Array(CV(const, char)), got {other:?}"),
    }
}

const CONVERSION_OPERATOR_PAIR: &str = r#"
class C {
public:
    operator bool() const {}
    operator bool() {}
};
C mutable_obj;
const C const_obj;
"#;

fn conversion_operator_symbols(program: &cppdoc::ast::Program) -> (cppdoc::SymbolId, cppdoc::SymbolId) {
    let Declaration::Class(class) = &program.decls[0] else {
        panic!("expected the class declaration to be the first top-level declaration");
    };
    let Declaration::Function(const_op) = &class.members[0].decl else {
        panic!("expected the const `operator bool()` to be the class's first member");
    };
    let Declaration::Function(non_const_op) = &class.members[1].decl else {
        panic!("expected the non-const `operator bool()` to be the class's second member");
    };
    (
        const_op.symbol.expect("const operator bool() should have a bound symbol"),
        non_const_op
            .symbol
            .expect("non-const operator bool() should have a bound symbol"),
    )
}

#[test]
fn non_const_receiver_picks_the_non_const_conversion_operator() {
    let (program, mut ctx) = parse_translation_unit(CONVERSION_OPERATOR_PAIR, ParseOptions::default()).unwrap();
    let (_const_op_symbol, non_const_op_symbol) = conversion_operator_symbols(&program);

    // `mutable_obj` is the second top-level declaration after the class.
    let Declaration::Variable(obj) = &program.decls[1] else {
        panic!("expected mutable_obj to be a variable declaration");
    };
    let obj_id = Expr::Id {
        name: cppdoc::ast::QualifiedName::single(obj.name.clone()),
        span: obj.span,
    };
    let call = Expr::FuncAccess {
        callee: Box::new(Expr::FieldAccess {
            op: cppdoc::ast::expr::FieldAccessOp::Dot,
            object: Box::new(obj_id),
            member: cppdoc::ast::CppName {
                kind: cppdoc::ast::NameKind::Operator,
                spelling: ctx.strings.intern("bool"),
                tokens: [None, None, None, None],
            },
            span: obj.span,
        }),
        arguments: Vec::new(),
        span: obj.span,
    };

    let items = type_expr(&mut ctx, &call).unwrap();
    assert_eq!(items.len(), 1, "expected exactly one surviving overload, got {items:?}");
    assert_eq!(
        ctx.tsys.get(items[0].tsys).kind,
        TsysKind::Primitive(TsysPrimitive::Bool)
    );
    assert_eq!(
        items[0].symbol,
        Some(non_const_op_symbol),
        "a non-const receiver must strictly prefer the non-const overload, not {:?}",
        items[0].symbol
    );
}

#[test]
fn const_receiver_picks_only_the_const_conversion_operator() {
    let (program, mut ctx) = parse_translation_unit(CONVERSION_OPERATOR_PAIR, ParseOptions::default()).unwrap();
    let (const_op_symbol, _non_const_op_symbol) = conversion_operator_symbols(&program);

    // `const_obj` is the third top-level declaration.
    let Declaration::Variable(obj) = &program.decls[2] else {
        panic!("expected const_obj to be a variable declaration");
    };
    let obj_id = Expr::Id {
        name: cppdoc::ast::QualifiedName::single(obj.name.clone()),
        span: obj.span,
    };
    let call = Expr::FuncAccess {
        callee: Box::new(Expr::FieldAccess {
            op: cppdoc::ast::expr::FieldAccessOp::Dot,
            object: Box::new(obj_id),
            member: cppdoc::ast::CppName {
                kind: cppdoc::ast::NameKind::Operator,
                spelling: ctx.strings.intern("bool"),
                tokens: [None, None, None, None],
            },
            span: obj.span,
        }),
        arguments: Vec::new(),
        span: obj.span,
    };

    let items = type_expr(&mut ctx, &call).unwrap();
    assert_eq!(items.len(), 1, "expected exactly the const overload to survive, got {items:?}");
    assert_eq!(
        ctx.tsys.get(items[0].tsys).kind,
        TsysKind::Primitive(TsysPrimitive::Bool)
    );
    assert_eq!(
        items[0].symbol,
        Some(const_op_symbol),
        "a const receiver must only accept the const overload, not {:?}",
        items[0].symbol
    );
}

#[test]
fn array_access_on_a_pointer_yields_the_pointee_type() {
    let (program, mut ctx) =
        parse_translation_unit("int* p; int x = p[0];", ParseOptions::default()).unwrap();
    let expr = variable_initializer(&program, 1);
    let items = type_expr(&mut ctx, expr).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(entity_kind(&ctx, items[0].tsys), TsysKind::Primitive(TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits32)));
}

#[test]
fn call_through_an_overload_set_emits_the_return_type_not_the_function_type() {
    let (program, mut ctx) = parse_translation_unit(
        "int f(int a) {} float f(float a) {} int x = f(1);",
        ParseOptions::default(),
    )
    .unwrap();
    let expr = variable_initializer(&program, 2);
    let items = type_expr(&mut ctx, expr).unwrap();
    assert_eq!(items.len(), 1, "expected the int overload to win on an exact int argument, got {items:?}");
    assert_eq!(
        ctx.tsys.get(items[0].tsys).kind,
        TsysKind::Primitive(TsysPrimitive::Int(Signedness::Signed, PrimitiveWidth::Bits32))
    );
}

#[test]
fn functional_cast_style_call_types_to_the_named_type() {
    let (program, mut ctx) =
        parse_translation_unit("class C {}; int x = C();", ParseOptions::default()).unwrap();
    let expr = variable_initializer(&program, 1);
    let items = type_expr(&mut ctx, expr).unwrap();
    assert_eq!(items.len(), 1);
    match ctx.tsys.get(items[0].tsys).kind.clone() {
        TsysKind::Decl(_) => {}
        other => panic!("expected a Decl(C), got {other:?}"),
    }
}
