//! Generic monomorphisation: one concrete function per distinct tuple of
//! generic type arguments.
//!
//! The function template is already fully analysed (its body was type
//! checked once, with each generic parameter standing in for its own
//! placeholder `Type`). Instantiating it is therefore a type-substitution
//! walk over the already-built IR rather than a second analysis pass: every
//! `Type` whose display name is a bound generic parameter is replaced by
//! the concrete argument type, and `Call` callees (which embed type names)
//! are rewritten segment-by-segment.

use std::collections::HashMap;

use gemc_ir::*;

use super::mangle;

/// Pair `template`'s parameters against `arg_types` positionally and record
/// a binding for every parameter whose type names one of the template's own
/// generic parameters.
pub fn bind_generics(template: &Function, arg_types: &[Type]) -> HashMap<String, Type> {
    let mut map = HashMap::new();
    for (param, arg_ty) in template.params.iter().zip(arg_types) {
        if template.generic_params.iter().any(|g| g == param.ty.display()) {
            map.entry(param.ty.display().to_string())
                .or_insert_with(|| arg_ty.clone());
        }
    }
    map
}

fn subst_ty(ty: &Type, map: &HashMap<String, Type>) -> Type {
    if ty.is_reference() {
        return subst_ty(ty.dereferenced(), map).as_reference();
    }
    map.get(ty.display()).cloned().unwrap_or_else(|| ty.clone())
}

/// Callees are dotted strings embedding type names (`"T.add.T"`,
/// `"T.to_string"`); substitute any segment that names a bound generic.
fn subst_callee(callee: &str, map: &HashMap<String, Type>) -> String {
    callee
        .split('.')
        .map(|segment| {
            map.get(segment)
                .map(|ty| ty.display().to_string())
                .unwrap_or_else(|| segment.to_string())
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn subst_node(node: Node, map: &HashMap<String, Type>) -> Node {
    macro_rules! r {
        ($n:expr) => {
            Box::new(subst_node(*$n, map))
        };
    }
    match node {
        Node::Program(n) => Node::Program(Program {
            ty: subst_ty(&n.ty, map),
            nodes: n.nodes.into_iter().map(|c| subst_node(c, map)).collect(),
            ..n
        }),
        Node::Body(n) => Node::Body(Body {
            ty: subst_ty(&n.ty, map),
            nodes: n.nodes.into_iter().map(|c| subst_node(c, map)).collect(),
            ..n
        }),
        Node::Function(n) => Node::Function(subst_function(n, map)),
        Node::Param(n) => Node::Param(Param {
            ty: subst_ty(&n.ty, map),
            ..n
        }),
        Node::Arg(n) => Node::Arg(Arg {
            ty: subst_ty(&n.ty, map),
            value: r!(n.value),
            ..n
        }),
        Node::Variable(n) => Node::Variable(Variable {
            ty: subst_ty(&n.ty, map),
            value: r!(n.value),
            ..n
        }),
        Node::Assignment(n) => Node::Assignment(Assignment {
            ty: subst_ty(&n.ty, map),
            value: r!(n.value),
            ..n
        }),
        Node::If(n) => Node::If(If {
            ty: subst_ty(&n.ty, map),
            cond: r!(n.cond),
            body: r!(n.body),
            else_body: n.else_body.map(|b| r!(b)),
            elseifs: n
                .elseifs
                .into_iter()
                .map(|e| match subst_node(Node::Elseif(e), map) {
                    Node::Elseif(e) => e,
                    _ => unreachable!(),
                })
                .collect(),
            ..n
        }),
        Node::Elseif(n) => Node::Elseif(Elseif {
            ty: subst_ty(&n.ty, map),
            cond: r!(n.cond),
            body: r!(n.body),
            ..n
        }),
        Node::While(n) => Node::While(While {
            ty: subst_ty(&n.ty, map),
            cond: r!(n.cond),
            body: r!(n.body),
            ..n
        }),
        Node::Break(n) => Node::Break(Break { ty: subst_ty(&n.ty, map), ..n }),
        Node::Continue(n) => Node::Continue(Continue { ty: subst_ty(&n.ty, map), ..n }),
        Node::Return(n) => Node::Return(Return {
            ty: subst_ty(&n.ty, map),
            value: r!(n.value),
            ..n
        }),
        Node::Use(n) => Node::Use(Use { ty: subst_ty(&n.ty, map), ..n }),
        Node::Int(n) => Node::Int(IntLit { ty: subst_ty(&n.ty, map), ..n }),
        Node::Float(n) => Node::Float(FloatLit { ty: subst_ty(&n.ty, map), ..n }),
        Node::Bool(n) => Node::Bool(BoolLit { ty: subst_ty(&n.ty, map), ..n }),
        Node::String(n) => Node::String(StringLit { ty: subst_ty(&n.ty, map), ..n }),
        Node::StringLiteral(n) => Node::StringLiteral(StringLiteral {
            ty: subst_ty(&n.ty, map),
            ..n
        }),
        Node::Id(n) => Node::Id(Id { ty: subst_ty(&n.ty, map), ..n }),
        Node::Bracketed(n) => Node::Bracketed(Bracketed {
            ty: subst_ty(&n.ty, map),
            value: r!(n.value),
            ..n
        }),
        Node::Call(n) => Node::Call(Call {
            ty: subst_ty(&n.ty, map),
            callee: subst_callee(&n.callee, map),
            args: n.args.into_iter().map(|c| subst_node(c, map)).collect(),
            ..n
        }),
        Node::Cast(n) => Node::Cast(Cast {
            ty: subst_ty(&n.ty, map),
            value: r!(n.value),
            ..n
        }),
        Node::New(n) => Node::New(New {
            ty: subst_ty(&n.ty, map),
            new_type: subst_ty(&n.new_type, map),
            args: n.args.into_iter().map(|c| subst_node(c, map)).collect(),
            ..n
        }),
        Node::Operation(n) => Node::Operation(Operation {
            ty: subst_ty(&n.ty, map),
            left: r!(n.left),
            right: r!(n.right),
            ..n
        }),
        Node::UnaryOperation(n) => Node::UnaryOperation(UnaryOperation {
            ty: subst_ty(&n.ty, map),
            value: r!(n.value),
            ..n
        }),
        Node::Attribute(n) => Node::Attribute(Attribute {
            ty: subst_ty(&n.ty, map),
            value: r!(n.value),
            args: n
                .args
                .map(|args| args.into_iter().map(|c| subst_node(c, map)).collect()),
            ..n
        }),
        Node::Ternary(n) => Node::Ternary(Ternary {
            ty: subst_ty(&n.ty, map),
            cond: r!(n.cond),
            true_value: r!(n.true_value),
            false_value: r!(n.false_value),
            ..n
        }),
        Node::Ref(n) => Node::Ref(Ref { ty: subst_ty(&n.ty, map), ..n }),
        Node::Type(n) => Node::Type(TypeNode {
            ty: subst_ty(&n.ty, map),
            referenced: subst_ty(&n.referenced, map),
            ..n
        }),
    }
}

fn subst_function(f: Function, map: &HashMap<String, Type>) -> Function {
    Function {
        ty: subst_ty(&f.ty, map),
        params: f
            .params
            .into_iter()
            .map(|p| match subst_node(Node::Param(p), map) {
                Node::Param(p) => p,
                _ => unreachable!(),
            })
            .collect(),
        body: f.body.map(|b| Box::new(subst_node(*b, map))),
        extend_type: f.extend_type.map(|t| subst_ty(&t, map)),
        ..f
    }
}

/// Produce the concrete instantiation of a generic `template` bound by
/// `generic_map`, named per the generic-instantiation mangling rule. The
/// result has no generic parameters and an empty overload list; the caller
/// appends it to the template's overloads.
pub fn instantiate(template: &Function, generic_map: &HashMap<String, Type>) -> Function {
    let generic_arg_types: Vec<String> = template
        .generic_params
        .iter()
        .map(|g| {
            generic_map
                .get(g)
                .map(|t| t.display().to_string())
                .unwrap_or_else(|| g.clone())
        })
        .collect();

    let mut concrete = subst_function(template.clone(), generic_map);
    concrete.generic_params.clear();
    concrete.overloads.clear();
    concrete.name = mangle::mangled_name(
        template.extend_type.as_ref().map(Type::display),
        &template.name,
        Some(&generic_arg_types),
        false,
        &[],
    );
    concrete
}
