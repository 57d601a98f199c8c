//! The fixed intrinsic registry: primitive operations the
//! backend must implement. Installed into the root symbol table before
//! analysis starts, as extern (bodyless) `Function` declarations - the
//! middle-end only ever emits calls to these names.

use gemc_ir::{Function, FunctionFlags, IrScope, Node, Param, Position};
use gemc_core::{Symbol, SymbolTable, Type, TypeMap};

fn declare(scope: &mut IrScope, name: &str, params: &[(&str, &str)], ret: &str) {
    let pos = Position::synthetic();
    let function = Function {
        pos,
        ty: Type::new(ret),
        name: name.to_string(),
        params: params
            .iter()
            .map(|(pname, pty)| Param {
                pos,
                ty: Type::new(*pty),
                name: pname.to_string(),
                is_mutable: false,
            })
            .collect(),
        body: None,
        overloads: Vec::new(),
        flags: FunctionFlags {
            is_extern: true,
            ..Default::default()
        },
        extend_type: None,
        generic_params: Vec::new(),
    };
    scope
        .symbols_mut()
        .add(Symbol::new(name, function.ty.clone(), Node::Function(function)));
}

const RELATIONAL: &[&str] = &["<", ">", "<=", ">=", "==", "!="];
const ARITHMETIC: &[&str] = &["+", "-", "*", "/", "%"];
const LOGICAL: &[&str] = &["&&", "||"];

/// Install the minimum intrinsic table §4.2 requires into `scope`.
pub fn install(scope: &mut IrScope) {
    declare(scope, "panic", &[("msg", "pointer")], "nil");
    declare(scope, "__buffer", &[("size", "int")], "pointer");
    declare(scope, "__alloc", &[("size", "int")], "pointer");
    declare(scope, "__free", &[("p", "pointer")], "nil");
    declare(
        scope,
        "__memcpy",
        &[("dst", "pointer"), ("src", "pointer"), ("n", "int"), ("is_volatile", "bool")],
        "pointer",
    );
    declare(scope, "__create_string", &[("ptr", "pointer"), ("length", "int")], "string");
    declare(scope, "__format_int", &[("buf", "pointer"), ("cap", "int"), ("i", "int")], "int");
    declare(
        scope,
        "__format_float",
        &[("buf", "pointer"), ("cap", "int"), ("f", "float")],
        "int",
    );
    declare(scope, "__null_terminate", &[("ptr", "pointer"), ("pos", "int")], "nil");
    declare(scope, "__is_null", &[("p", "pointer")], "bool");
    declare(scope, "__null", &[], "pointer");

    for op in ARITHMETIC {
        declare(scope, &format!("int.{op}.int"), &[("a", "int"), ("b", "int")], "int");
        declare(scope, &format!("float.{op}.float"), &[("a", "float"), ("b", "float")], "float");
    }
    for op in RELATIONAL {
        declare(scope, &format!("int.{op}.int"), &[("a", "int"), ("b", "int")], "bool");
        declare(scope, &format!("float.{op}.float"), &[("a", "float"), ("b", "float")], "bool");
        declare(scope, &format!("bool.{op}.bool"), &[("a", "bool"), ("b", "bool")], "bool");
    }
    for op in LOGICAL {
        declare(scope, &format!("bool.{op}.bool"), &[("a", "bool"), ("b", "bool")], "bool");
    }

    // Unary companions required by §4.3.3's `UnaryOperation` desugaring
    // (`Call("{op}.{V.type}", [V])`); not individually enumerated in §4.2's
    // table but structurally necessary for that rule to type-check.
    declare(scope, "-.int", &[("a", "int")], "int");
    declare(scope, "-.float", &[("a", "float")], "float");
    declare(scope, "!.bool", &[("a", "bool")], "bool");

    declare(scope, "string.ptr", &[("s", "string")], "pointer");
    declare(scope, "string.length", &[("s", "string")], "int");
}

/// A fresh root scope with builtin types and the intrinsic registry
/// installed - the starting point for compiling any one file, top-level or
/// an imported module. Each imported source file gets its own fresh
/// `File` and `Scope`.
pub fn root_scope() -> IrScope {
    let mut scope = IrScope::root(SymbolTable::new(), TypeMap::with_builtins());
    install(&mut scope);
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemc_core::{SymbolTable, TypeMap};

    #[test]
    fn installs_arithmetic_and_string_primitives() {
        let mut scope = IrScope::root(SymbolTable::new(), TypeMap::with_builtins());
        install(&mut scope);
        assert!(scope.get_symbol("int.+.int").is_some());
        assert!(scope.get_symbol("float.<.float").is_some());
        assert!(scope.get_symbol("bool.&&.bool").is_some());
        assert!(scope.get_symbol("string.ptr").is_some());
        assert!(scope.get_symbol("panic").is_some());
    }
}
