//! Best-effort AST-to-text renderer (test support), grounded in
//! spec.md §6's printer contract: deterministic, and idempotent under
//! round-trip through the parser for the declaration forms the test
//! suite covers. Not part of the core's semantics — nothing here is
//! consulted by the parser, resolver, or typer.

use std::fmt::Write;

use crate::ast::decl::{AccessSpecifier, ClassKind, Declaration};
use crate::ast::expr::{FieldAccessOp, Literal, LiteralKind};
use crate::ast::stat::Stat;
use crate::ast::ty::{CallingConvention, PrimitiveKeyword, PrimitivePrefix, ReferenceKind, Type};
use crate::ast::{CppName, Expr, Program, QualifiedName};

pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    for decl in &program.decls {
        print_declaration(&mut out, decl, 0);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn print_qualified_name(out: &mut String, name: &QualifiedName) {
    for (i, seg) in name.segments.iter().enumerate() {
        if i > 0 {
            out.push_str("::");
        }
        out.push_str(&seg.spelling);
    }
}

fn print_name(out: &mut String, name: &CppName) {
    out.push_str(&name.spelling);
}

fn print_declaration(out: &mut String, decl: &Declaration, depth: usize) {
    indent(out, depth);
    match decl {
        Declaration::Namespace(d) => {
            write!(out, "namespace {} {{\n", d.name.spelling).unwrap();
            for child in &d.body {
                print_declaration(out, child, depth + 1);
            }
            indent(out, depth);
            out.push_str("}\n");
        }
        Declaration::Enum(d) => {
            out.push_str("enum ");
            if d.is_scoped {
                out.push_str("class ");
            }
            print_name(out, &d.name);
            if let Some(underlying) = &d.underlying_type {
                out.push_str(" : ");
                print_type(out, underlying);
            }
            if d.is_forward {
                out.push_str(";\n");
                return;
            }
            out.push_str(" {\n");
            for (i, enumerator) in d.enumerators.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(out, depth + 1);
                print_name(out, &enumerator.name);
                if let Some(value) = &enumerator.value {
                    out.push_str(" = ");
                    print_expr(out, value);
                }
            }
            out.push('\n');
            indent(out, depth);
            out.push_str("};\n");
        }
        Declaration::Class(d) => {
            out.push_str(class_kind_keyword(d.kind));
            out.push(' ');
            print_name(out, &d.name);
            for (i, base) in d.bases.iter().enumerate() {
                out.push_str(if i == 0 { " : " } else { ", " });
                print_qualified_name(out, &base.name);
            }
            if d.is_forward {
                out.push_str(";\n");
                return;
            }
            out.push_str(" {\n");
            let mut current_access: Option<AccessSpecifier> = None;
            for member in &d.members {
                if current_access != Some(member.access) {
                    indent(out, depth + 1);
                    out.push_str(access_keyword(member.access));
                    out.push_str(":\n");
                    current_access = Some(member.access);
                }
                print_declaration(out, &member.decl, depth + 1);
            }
            indent(out, depth);
            out.push_str("};\n");
        }
        Declaration::Variable(d) => {
            if d.decorator_static {
                out.push_str("static ");
            }
            print_type(out, &d.ty);
            out.push(' ');
            print_name(out, &d.name);
            if let Some(init) = &d.initializer {
                print_initializer(out, init);
            }
            out.push_str(";\n");
        }
        Declaration::Function(d) => {
            if d.decorator_static {
                out.push_str("static ");
            }
            print_function_signature(out, &d.ty, &d.name);
            if d.is_forward {
                out.push_str(";\n");
            } else {
                out.push_str(" {}\n");
            }
        }
        Declaration::UsingNamespace(d) => {
            out.push_str("using namespace ");
            print_qualified_name(out, &d.target);
            out.push_str(";\n");
        }
        Declaration::UsingAlias(d) => {
            out.push_str("using ");
            print_name(out, &d.name);
            out.push_str(" = ");
            print_type(out, &d.target);
            out.push_str(";\n");
        }
    }
}

fn print_initializer(out: &mut String, init: &crate::ast::Initializer) {
    use crate::ast::InitializerKind;
    let (open, close) = match init.kind {
        InitializerKind::Equal => {
            // `= expr` only ever carries a single argument.
            out.push_str(" = ");
            if let Some(expr) = init.arguments.first() {
                print_expr(out, expr);
            }
            return;
        }
        InitializerKind::Constructor => ("(", ")"),
        InitializerKind::Universal => ("{", "}"),
    };
    out.push(' ');
    out.push_str(open);
    for (i, arg) in init.arguments.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        print_expr(out, arg);
    }
    out.push_str(close);
}

fn class_kind_keyword(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Class => "class",
        ClassKind::Struct => "struct",
        ClassKind::Union => "union",
    }
}

fn access_keyword(access: AccessSpecifier) -> &'static str {
    match access {
        AccessSpecifier::Public => "public",
        AccessSpecifier::Protected => "protected",
        AccessSpecifier::Private => "private",
    }
}

fn primitive_keyword_text(keyword: PrimitiveKeyword) -> &'static str {
    match keyword {
        PrimitiveKeyword::Auto => "auto",
        PrimitiveKeyword::Void => "void",
        PrimitiveKeyword::Bool => "bool",
        PrimitiveKeyword::Char => "char",
        PrimitiveKeyword::WChar => "wchar_t",
        PrimitiveKeyword::Char16 => "char16_t",
        PrimitiveKeyword::Char32 => "char32_t",
        PrimitiveKeyword::Short => "short",
        PrimitiveKeyword::Int => "int",
        PrimitiveKeyword::Int8 => "__int8",
        PrimitiveKeyword::Int16 => "__int16",
        PrimitiveKeyword::Int32 => "__int32",
        PrimitiveKeyword::Int64 => "__int64",
        PrimitiveKeyword::Float => "float",
        PrimitiveKeyword::Double => "double",
        PrimitiveKeyword::Long => "long",
        PrimitiveKeyword::LongLong => "long long",
        PrimitiveKeyword::LongDouble => "long double",
    }
}

fn calling_convention_text(cc: CallingConvention) -> Option<&'static str> {
    match cc {
        CallingConvention::None => None,
        CallingConvention::Cdecl => Some("__cdecl"),
        CallingConvention::Stdcall => Some("__stdcall"),
        CallingConvention::Fastcall => Some("__fastcall"),
        CallingConvention::Thiscall => Some("__thiscall"),
        CallingConvention::Clrcall => Some("__clrcall"),
        CallingConvention::Vectorcall => Some("__vectorcall"),
    }
}

/// Render `ty`, postponing a trailing function-type's `(params)` until
/// `name` can be spliced in between the return type and the parameter
/// list — the one place C++ declarator syntax is not a simple prefix of
/// the type (`int f(int)`, not `int(int) f`).
fn print_function_signature(out: &mut String, ty: &Type, name: &CppName) {
    let Type::Function(surface) = ty else {
        print_type(out, ty);
        out.push(' ');
        print_name(out, name);
        return;
    };
    print_type(out, &surface.ret);
    out.push(' ');
    if let Some(cc) = calling_convention_text(surface.cc) {
        out.push_str(cc);
        out.push(' ');
    }
    print_name(out, name);
    out.push('(');
    for (i, param) in surface.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        print_type(out, &param.ty);
        if let Some(pname) = &param.name {
            out.push(' ');
            print_name(out, pname);
        }
    }
    if surface.is_variadic_ellipsis {
        if !surface.params.is_empty() {
            out.push_str(", ");
        }
        out.push_str("...");
    }
    out.push(')');
    if surface.qualifier_const {
        out.push_str(" const");
    }
    if surface.qualifier_const_expr {
        out.push_str(" constexpr");
    }
    if surface.qualifier_volatile {
        out.push_str(" volatile");
    }
    if surface.qualifier_lref {
        out.push_str(" &");
    }
    if surface.qualifier_rref {
        out.push_str(" &&");
    }
}

/// Render a surface `Type`. Qualifiers are rendered postfix
/// (`int const`, `int constexpr`, `int volatile`) per spec.md §8
/// scenario 5, matching the original's own qualifier-stacking grammar
/// rather than C's conventional prefix `const int` spelling.
pub fn print_type(out: &mut String, ty: &Type) {
    match ty {
        Type::Primitive { prefix, keyword, .. } => {
            match prefix {
                PrimitivePrefix::None => {}
                PrimitivePrefix::Signed => out.push_str("signed "),
                PrimitivePrefix::Unsigned => out.push_str("unsigned "),
            }
            out.push_str(primitive_keyword_text(*keyword));
        }
        Type::DeclType { expr, .. } => {
            out.push_str("decltype(");
            print_expr(out, expr);
            out.push(')');
        }
        Type::Decorate {
            is_const,
            is_const_expr,
            is_volatile,
            inner,
            ..
        } => {
            print_type(out, inner);
            if *is_const_expr {
                out.push_str(" constexpr");
            }
            if *is_const {
                out.push_str(" const");
            }
            if *is_volatile {
                out.push_str(" volatile");
            }
        }
        Type::Reference { kind, inner, .. } => {
            print_type(out, inner);
            out.push(' ');
            out.push_str(match kind {
                ReferenceKind::Ptr => "*",
                ReferenceKind::LRef => "&",
                ReferenceKind::RRef => "&&",
            });
        }
        Type::Generic { base, arguments, .. } => {
            print_type(out, base);
            out.push('<');
            for (i, arg) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_type(out, &arg.ty);
            }
            out.push('>');
        }
        Type::VariadicPack { inner, .. } => {
            print_type(out, inner);
            out.push_str("...");
        }
        Type::Named { name, .. } => print_qualified_name(out, name),
        Type::Function(surface) => {
            print_type(out, &surface.ret);
            out.push_str(" (");
            for (i, param) in surface.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_type(out, &param.ty);
            }
            out.push(')');
        }
    }
}

pub fn print_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal(lit) => print_literal(out, lit),
        Expr::This { .. } => out.push_str("this"),
        Expr::Nullptr { .. } => out.push_str("nullptr"),
        Expr::Parenthesis { inner, .. } => {
            out.push('(');
            print_expr(out, inner);
            out.push(')');
        }
        Expr::Cast { ty, operand, .. } => {
            out.push('(');
            print_type(out, ty);
            out.push(')');
            print_expr(out, operand);
        }
        Expr::Typeid { .. } => out.push_str("typeid(?)"),
        Expr::Id { name, .. } => print_qualified_name(out, name),
        Expr::Child { parent, child, .. } => {
            print_expr(out, parent);
            out.push_str("::");
            print_name(out, child);
        }
        Expr::FieldAccess { op, object, member, .. } => {
            print_expr(out, object);
            out.push_str(match op {
                FieldAccessOp::Dot => ".",
                FieldAccessOp::Arrow => "->",
            });
            print_name(out, member);
        }
        Expr::ArrayAccess { object, index, .. } => {
            print_expr(out, object);
            out.push('[');
            print_expr(out, index);
            out.push(']');
        }
        Expr::FuncAccess { callee, arguments, .. } => {
            print_expr(out, callee);
            out.push('(');
            for (i, arg) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_expr(out, arg);
            }
            out.push(')');
        }
    }
}

fn print_literal(out: &mut String, lit: &Literal) {
    match lit.kind {
        LiteralKind::String => {
            out.push('"');
            out.push_str(&lit.text);
            out.push('"');
        }
        LiteralKind::Char => {
            out.push('\'');
            out.push_str(&lit.text);
            out.push('\'');
        }
        _ => out.push_str(&lit.text),
    }
}

pub fn print_stat(out: &mut String, stat: &Stat, depth: usize) {
    match stat {
        Stat::Block { body, .. } => {
            indent(out, depth);
            out.push_str("{\n");
            for inner in body {
                print_stat(out, inner, depth + 1);
            }
            indent(out, depth);
            out.push_str("}\n");
        }
        Stat::Declare { decl, .. } => print_declaration(out, decl, depth),
        Stat::Expr { expr, .. } => {
            indent(out, depth);
            print_expr(out, expr);
            out.push_str(";\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseOptions;

    #[test]
    fn prints_a_namespace_with_a_variable() {
        let (program, _ctx) =
            crate::parse_translation_unit("namespace a { int x; }", ParseOptions::default()).unwrap();
        let text = print_program(&program);
        assert_eq!(text, "namespace a {\n    int x;\n}\n");
    }

    #[test]
    fn prints_qualifiers_postfix() {
        let (program, _ctx) =
            crate::parse_translation_unit("const int x;", ParseOptions::default()).unwrap();
        let text = print_program(&program);
        assert_eq!(text, "int const x;\n");
    }

    #[test]
    fn prints_a_class_with_a_base_and_members() {
        let (program, _ctx) = crate::parse_translation_unit(
            "class Base { int x; }; class Derived : Base { int y; };",
            ParseOptions::default(),
        )
        .unwrap();
        let text = print_program(&program);
        assert!(text.contains("class Derived : Base {"));
        assert!(text.contains("private:\n    int y;"));
    }
}
