//! The analyser pass: name/type resolution, overload selection,
//! generic instantiation, operator/attribute/`new` desugaring, and module
//! loading.
//!
//! A single struct carries a mutable environment cursor through a
//! recursive `analyse_expr`-style dispatch; the generic-instantiation and
//! mangling pieces are factored into their own modules (`mangle`,
//! `overloads`, `generics`) to keep naming concerns separate from the
//! checker itself.

mod generics;
mod mangle;
mod overloads;

use std::rc::Rc;

use gemc_core::Symbol;
use gemc_ir::{
    Assignment, Attribute, BoolLit, Bracketed, Call, CompError, Elseif, FloatLit, Function,
    FunctionFlags, Id, If, IntLit, IrFile, IrScope, New, Node, Operation, Param, Pass, Position,
    Program, Ref, Return, StringLit, StringLiteral, Ternary, Type, UnaryOperation, Use, Variable,
    While, with_child_scope,
};

use crate::intrinsics;
use crate::modules::ModuleLoader;
pub use overloads::format_arg_types;

/// The semantic-analysis pass. Owns the `File` being compiled
/// so module loading can check for self-imports by path and
/// thread an import stack into recursively-constructed sub-files.
pub struct Analyser {
    file: IrFile,
    loader: Rc<ModuleLoader>,
}

impl Analyser {
    pub fn new(file: IrFile, loader: Rc<ModuleLoader>) -> Self {
        Self { file, loader }
    }

    /// Run the pass on `file`'s whole program and return the resolved tree.
    pub fn analyse(mut self, program: Node) -> Result<(Node, IrFile), CompError> {
        let result = self.run_on(program)?;
        Ok((result, self.file))
    }

    fn error<T>(&self, pos: Position, message: impl Into<String>) -> Result<T, CompError> {
        Err(pos.comptime_error(message))
    }

    fn bool_type(&self) -> Type {
        self.scope()
            .get_type("bool")
            .cloned()
            .expect("bool is a builtin type")
    }

    // ---- §4.3.4 modules -------------------------------------------------

    fn is_self_import(&self, path: &str) -> bool {
        self.file.path().file_stem().and_then(|s| s.to_str()) == Some(path)
    }

    fn handle_use(&mut self, pos: Position, path: &str) -> Result<(), CompError> {
        if self.is_self_import(path) {
            return Ok(());
        }
        if let Some(native) = self.loader.native(path).cloned() {
            native.add_to_scope(self.scope_mut());
        }

        let Some(parser) = self.loader.parser() else {
            return Ok(());
        };
        let source_path = self.loader.source_path(path);
        if !source_path.exists() {
            return Ok(());
        }
        if self.file.import_stack.contains(&source_path) {
            return self.error(pos, format!("cyclic import of module '{path}'"));
        }

        let source = std::fs::read_to_string(&source_path)
            .map_err(|e| pos.comptime_error(format!("failed to read module '{path}': {e}")))?;
        let program_node = parser.parse(&source_path, &source)?;

        let mut import_stack = self.file.import_stack.clone();
        import_stack.push(source_path.clone());
        let mut sub_file = IrFile::new(
            source_path.clone(),
            source,
            intrinsics::root_scope(),
            self.file.options,
        );
        sub_file.import_stack = import_stack;

        let sub_analyser = Analyser::new(sub_file, Rc::clone(&self.loader));
        let (_, sub_file) = sub_analyser.analyse(program_node)?;
        self.scope_mut().merge_from(&sub_file.scope);
        Ok(())
    }

    // ---- §4.3.2 calls, overloads, generics -------------------------------

    /// Resolve and rewrite a call to `name` with already-analysed `args`.
    /// `drop_self_if_static` implements the Attribute-desugaring rule that
    /// strips the receiver argument when the resolved function is static
    ///.
    fn invoke(
        &mut self,
        pos: Position,
        name: &str,
        mut args: Vec<Node>,
        drop_self_if_static: bool,
    ) -> Result<Node, CompError> {
        let symbol = self
            .scope()
            .get_symbol(name)
            .cloned()
            .ok_or_else(|| pos.comptime_error(format!("unknown function '{name}'")))?;
        let Node::Function(template) = &symbol.value else {
            return self.error(pos, format!("'{name}' is not callable"));
        };

        // A static method's declared params have no receiver, so an
        // attribute call's implicit receiver argument must be dropped
        // before overload matching, not after - matching it against
        // arg_types would make every arg/param count check fail.
        if drop_self_if_static && template.flags.is_static && !args.is_empty() {
            args.remove(0);
        }

        let arg_types: Vec<Type> = args.iter().map(|a| a.ty().clone()).collect();
        let resolved = overloads::resolve_overload(template, &arg_types)
            .cloned()
            .ok_or_else(|| {
                pos.comptime_error(format!(
                    "no matching overload for function '{name}' with given arguments ({})",
                    format_arg_types(&arg_types)
                ))
            })?;

        let resolved = if resolved.is_generic() {
            self.instantiate(name, &resolved, &arg_types)?
        } else {
            resolved
        };

        let args = self.coerce_args(pos, &resolved, args)?;
        Ok(Node::Call(Call {
            pos,
            ty: resolved.ty.clone(),
            callee: resolved.name.clone(),
            args,
        }))
    }

    /// Spec §4.3.3's argument fix-up: a by-reference parameter fed a
    /// non-reference `Id` argument is rewritten to `Ref(name)`.
    fn coerce_args(&self, pos: Position, func: &Function, args: Vec<Node>) -> Result<Vec<Node>, CompError> {
        func.params
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                if param.ty.is_reference() && !arg.ty().is_reference() {
                    match arg.as_id() {
                        Some(id) => Ok(Node::Ref(Ref {
                            pos: id.pos,
                            ty: id.ty.as_reference(),
                            name: id.name.clone(),
                        })),
                        None => Err(pos.comptime_error(
                            "can only take a reference to a named variable".to_string(),
                        )),
                    }
                } else {
                    Ok(arg)
                }
            })
            .collect()
    }

    /// Spec §4.3.2: build the generic map, monomorphise, append the
    /// concrete function to the template's overload list under `base_name`,
    /// and register it as a top-level symbol too.
    fn instantiate(
        &mut self,
        base_name: &str,
        template: &Function,
        arg_types: &[Type],
    ) -> Result<Function, CompError> {
        let generic_map = generics::bind_generics(template, arg_types);
        let concrete = generics::instantiate(template, &generic_map);

        if let Some(sym) = self.scope_mut().symbols_mut().get_mut(base_name) {
            if let Node::Function(base_fn) = &mut sym.value {
                base_fn.overloads.push(concrete.clone());
            }
        }
        self.scope_mut().symbols_mut().add(Symbol::new(
            concrete.name.clone(),
            concrete.ty.clone(),
            Node::Function(concrete.clone()),
        ));
        Ok(concrete)
    }
}

impl Pass for Analyser {
    fn scope(&self) -> &IrScope {
        &self.file.scope
    }

    fn scope_mut(&mut self) -> &mut IrScope {
        &mut self.file.scope
    }

    fn run_on_program(&mut self, node: Program) -> Result<Node, CompError> {
        if !self.file.options.no_stdlib {
            self.handle_use(node.pos, "core")?;
        }
        let nodes = node
            .nodes
            .into_iter()
            .map(|n| self.run_on(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Program(Program { nodes, ..node }))
    }

    fn run_on_use(&mut self, node: Use) -> Result<Node, CompError> {
        self.handle_use(node.pos, &node.path)?;
        Ok(Node::Use(node))
    }

    fn run_on_id(&mut self, node: Id) -> Result<Node, CompError> {
        let ty = if let Some(t) = self.scope().get_type(&node.name) {
            t.clone()
        } else if let Some(sym) = self.scope().get_symbol(&node.name) {
            sym.ty.clone()
        } else {
            return self.error(node.pos, format!("unknown identifier '{}'", node.name));
        };
        Ok(Node::Id(Id { ty, ..node }))
    }

    fn run_on_ref(&mut self, node: Ref) -> Result<Node, CompError> {
        let symbol = self
            .scope()
            .get_symbol(&node.name)
            .ok_or_else(|| node.pos.comptime_error(format!("unknown identifier '{}'", node.name)))?;
        let ty = symbol.ty.as_reference();
        Ok(Node::Ref(Ref { ty, ..node }))
    }

    fn run_on_int(&mut self, node: IntLit) -> Result<Node, CompError> {
        let ty = self.scope().get_type("int").cloned().expect("int builtin");
        Ok(Node::Int(IntLit { ty, ..node }))
    }

    fn run_on_float(&mut self, node: FloatLit) -> Result<Node, CompError> {
        let ty = self.scope().get_type("float").cloned().expect("float builtin");
        Ok(Node::Float(FloatLit { ty, ..node }))
    }

    fn run_on_bool(&mut self, node: BoolLit) -> Result<Node, CompError> {
        let ty = self.scope().get_type("bool").cloned().expect("bool builtin");
        Ok(Node::Bool(BoolLit { ty, ..node }))
    }

    /// Spec §4.3.1: `String(value)` lowers to
    /// `Call("string.new", [StringLiteral(value), Int(len)])`.
    fn run_on_string(&mut self, node: StringLit) -> Result<Node, CompError> {
        let pointer_ty = self.scope().get_type("pointer").cloned().expect("pointer builtin");
        let int_ty = self.scope().get_type("int").cloned().expect("int builtin");
        let len = node.value.len() as i64;
        let literal = Node::StringLiteral(StringLiteral {
            pos: node.pos,
            ty: pointer_ty,
            value: node.value,
        });
        let length = Node::Int(IntLit {
            pos: node.pos,
            ty: int_ty,
            value: len,
        });
        self.invoke(node.pos, "string.new", vec![literal, length], false)
    }

    fn run_on_bracketed(&mut self, node: Bracketed) -> Result<Node, CompError> {
        let value = self.run_on(*node.value)?;
        let ty = value.ty().clone();
        Ok(Node::Bracketed(Bracketed {
            ty,
            value: Box::new(value),
            ..node
        }))
    }

    fn run_on_ternary(&mut self, node: Ternary) -> Result<Node, CompError> {
        let cond = self.run_on(*node.cond)?;
        let bool_ty = self.bool_type();
        if cond.ty() != &bool_ty {
            return self.error(
                node.pos,
                format!("ternary condition must be bool, found {}", cond.ty().display()),
            );
        }
        let true_value = self.run_on(*node.true_value)?;
        let false_value = self.run_on(*node.false_value)?;
        if true_value.ty() != false_value.ty() {
            return self.error(
                node.pos,
                format!(
                    "ternary branches must have the same type, found {} and {}",
                    true_value.ty().display(),
                    false_value.ty().display()
                ),
            );
        }
        let ty = true_value.ty().clone();
        Ok(Node::Ternary(Ternary {
            pos: node.pos,
            ty,
            cond: Box::new(cond),
            true_value: Box::new(true_value),
            false_value: Box::new(false_value),
        }))
    }

    fn run_on_operation(&mut self, node: Operation) -> Result<Node, CompError> {
        let left = self.run_on(*node.left)?;
        let right = self.run_on(*node.right)?;
        let name = format!("{}.{}.{}", left.ty().display(), node.op, right.ty().display());
        self.invoke(node.pos, &name, vec![left, right], false)
    }

    fn run_on_unary_operation(&mut self, node: UnaryOperation) -> Result<Node, CompError> {
        let value = self.run_on(*node.value)?;
        let name = format!("{}.{}", node.op, value.ty().display());
        self.invoke(node.pos, &name, vec![value], false)
    }

    fn run_on_attribute(&mut self, node: Attribute) -> Result<Node, CompError> {
        let value = self.run_on(*node.value)?;
        let args = node
            .args
            .map(|args| args.into_iter().map(|n| self.run_on(n)).collect::<Result<Vec<_>, _>>())
            .transpose()?
            .unwrap_or_default();
        let deref_ty = value.ty().dereferenced().clone();
        let name = format!("{}.{}", deref_ty.display(), node.attr);
        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(value);
        full_args.extend(args);
        self.invoke(node.pos, &name, full_args, true)
    }

    /// Spec §4.3.3: `New(T, args) -> Attribute(Id(T), "new", args)`, further
    /// desugared by the attribute rule; constructors are auto-static (spec
    /// §4.3.2) so there is no receiver argument to drop.
    fn run_on_new(&mut self, node: New) -> Result<Node, CompError> {
        let args = node
            .args
            .into_iter()
            .map(|n| self.run_on(n))
            .collect::<Result<Vec<_>, _>>()?;
        let name = format!("{}.new", node.new_type.display());
        self.invoke(node.pos, &name, args, false)
    }

    fn run_on_call(&mut self, node: Call) -> Result<Node, CompError> {
        let args = node
            .args
            .into_iter()
            .map(|n| self.run_on(n))
            .collect::<Result<Vec<_>, _>>()?;
        self.invoke(node.pos, &node.callee, args, false)
    }

    fn run_on_variable(&mut self, node: Variable) -> Result<Node, CompError> {
        if self.scope().get_symbol(&node.name).is_some() {
            return self.run_on_assignment(Assignment {
                pos: node.pos,
                ty: node.ty,
                name: node.name,
                value: node.value,
                op: node.op,
            });
        }
        let value = self.run_on(*node.value)?;
        let ty = value.ty().clone();
        self.scope_mut().symbols_mut().add(
            Symbol::new(node.name.clone(), ty.clone(), value.clone()).mutable(node.is_mutable),
        );
        Ok(Node::Variable(Variable {
            pos: node.pos,
            ty,
            name: node.name,
            value: Box::new(value),
            is_mutable: node.is_mutable,
            op: None,
        }))
    }

    fn run_on_assignment(&mut self, node: Assignment) -> Result<Node, CompError> {
        let symbol = self
            .scope()
            .get_symbol(&node.name)
            .cloned()
            .ok_or_else(|| node.pos.comptime_error(format!("unknown identifier '{}'", node.name)))?;
        if !symbol.is_mutable {
            return self.error(node.pos, format!("cannot assign to immutable '{}'", node.name));
        }

        let raw_value = self.run_on(*node.value)?;
        // Lower `x op= y` to `x = x.op.y` by invoking the
        // operator intrinsic directly: `raw_value` is already analysed, so
        // this must not be re-run through `run_on_operation`, which would
        // re-resolve an already-mangled callee.
        let value = if let Some(op) = node.op.clone() {
            let left = self.run_on(Node::Id(Id {
                pos: node.pos,
                ty: symbol.ty.clone(),
                name: node.name.clone(),
            }))?;
            let callee = format!("{}.{}.{}", left.ty().display(), op, raw_value.ty().display());
            self.invoke(node.pos, &callee, vec![left, raw_value], false)?
        } else {
            raw_value
        };

        let ty = value.ty().clone();
        if let Some(sym) = self.scope_mut().symbols_mut().get_mut(&node.name) {
            sym.value = value.clone();
        }
        Ok(Node::Assignment(Assignment {
            pos: node.pos,
            ty,
            name: node.name,
            value: Box::new(value),
            op: None,
        }))
    }

    fn run_on_if(&mut self, node: If) -> Result<Node, CompError> {
        let bool_ty = self.bool_type();
        let cond = self.run_on(*node.cond)?;
        if cond.ty() != &bool_ty {
            return self.error(
                node.pos,
                format!("if condition must be bool, found {}", cond.ty().display()),
            );
        }
        let body = with_child_scope(self, |p| p.run_on(*node.body))?;

        let mut elseifs = Vec::with_capacity(node.elseifs.len());
        for elseif in node.elseifs {
            let econd = self.run_on(*elseif.cond)?;
            if econd.ty() != &bool_ty {
                return self.error(
                    elseif.pos,
                    format!("elseif condition must be bool, found {}", econd.ty().display()),
                );
            }
            let ebody = with_child_scope(self, |p| p.run_on(*elseif.body))?;
            elseifs.push(Elseif {
                pos: elseif.pos,
                ty: elseif.ty,
                cond: Box::new(econd),
                body: Box::new(ebody),
            });
        }

        let else_body = match node.else_body {
            Some(b) => Some(Box::new(with_child_scope(self, |p| p.run_on(*b))?)),
            None => None,
        };

        Ok(Node::If(If {
            pos: node.pos,
            ty: node.ty,
            cond: Box::new(cond),
            body: Box::new(body),
            else_body,
            elseifs,
        }))
    }

    fn run_on_while(&mut self, node: While) -> Result<Node, CompError> {
        let bool_ty = self.bool_type();
        let cond = self.run_on(*node.cond)?;
        if cond.ty() != &bool_ty {
            return self.error(
                node.pos,
                format!("while condition must be bool, found {}", cond.ty().display()),
            );
        }
        let body = with_child_scope(self, |p| p.run_on(*node.body))?;
        Ok(Node::While(While {
            pos: node.pos,
            ty: node.ty,
            cond: Box::new(cond),
            body: Box::new(body),
        }))
    }

    fn run_on_function(&mut self, node: Function) -> Result<Node, CompError> {
        let extend_display = node.extend_type.as_ref().map(|t| t.display().to_string());
        let base_key = mangle::base_name(extend_display.as_deref(), &node.name);
        let already_exists = self.scope().get_symbol(&base_key).is_some();
        let is_generic = node.is_generic();

        let (params, body) = with_child_scope(self, |p| -> Result<_, CompError> {
            if is_generic {
                for generic in &node.generic_params {
                    p.scope_mut().types_mut().add(Type::new(generic.clone()));
                }
            }
            for param in &node.params {
                p.scope_mut().symbols_mut().add(
                    Symbol::new(
                        param.name.clone(),
                        param.ty.clone(),
                        Node::Param(param.clone()),
                    )
                    .mutable(param.is_mutable),
                );
            }
            let params = node
                .params
                .iter()
                .map(|param| match p.run_on(Node::Param(param.clone()))? {
                    Node::Param(param) => Ok(param),
                    other => unreachable!("run_on(Param) must return Param, got {other:?}"),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let body = node.body.map(|b| p.run_on(*b)).transpose()?.map(Box::new);
            Ok((params, body))
        })?;

        let param_types: Vec<String> = params.iter().map(|p| p.ty.display().to_string()).collect();
        let final_name = if is_generic {
            base_key.clone()
        } else {
            mangle::mangled_name(
                extend_display.as_deref(),
                &node.name,
                None,
                already_exists,
                &param_types,
            )
        };

        let mut flags = node.flags;
        if node.name == "new" && node.extend_type.is_some() {
            flags.is_static = true;
        }

        let function = Function {
            pos: node.pos,
            ty: node.ty,
            name: final_name,
            params,
            body,
            overloads: Vec::new(),
            flags,
            extend_type: node.extend_type,
            generic_params: node.generic_params,
        };

        if already_exists && !is_generic {
            if let Some(sym) = self.scope_mut().symbols_mut().get_mut(&base_key) {
                if let Node::Function(base_fn) = &mut sym.value {
                    base_fn.overloads.push(function.clone());
                }
            }
        } else {
            self.scope_mut().symbols_mut().add(Symbol::new(
                base_key,
                function.ty.clone(),
                Node::Function(function.clone()),
            ));
        }

        Ok(Node::Function(function))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemc_core::CompileOptions;

    fn analyser() -> Analyser {
        let file = IrFile::new("main.gem", "", intrinsics::root_scope(), CompileOptions { no_stdlib: true, ..Default::default() });
        Analyser::new(file, Rc::new(ModuleLoader::minimal()))
    }

    fn pos() -> Position {
        Position::new(1, 0)
    }

    #[test]
    fn simple_arithmetic_lowers_to_intrinsic_call() {
        let mut a = analyser();
        let expr = Node::Operation(Operation {
            pos: pos(),
            ty: Type::new("int"),
            op: "+".to_string(),
            left: Box::new(Node::Int(IntLit { pos: pos(), ty: Type::new("int"), value: 1 })),
            right: Box::new(Node::Int(IntLit { pos: pos(), ty: Type::new("int"), value: 2 })),
        });
        let Node::Call(call) = a.run_on(expr).unwrap() else { panic!("expected Call") };
        assert_eq!(call.callee, "int.+.int");
        assert_eq!(call.ty, Type::new("int"));
    }

    #[test]
    fn overload_selection_picks_by_argument_type() {
        let mut a = analyser();
        let f_int = Function {
            pos: pos(),
            ty: Type::new("int"),
            name: "f".to_string(),
            params: vec![Param { pos: pos(), ty: Type::new("int"), name: "a".to_string(), is_mutable: false }],
            body: None,
            overloads: Vec::new(),
            flags: FunctionFlags::default(),
            extend_type: None,
            generic_params: Vec::new(),
        };
        let f_float = Function {
            pos: pos(),
            ty: Type::new("float"),
            name: "f".to_string(),
            params: vec![Param { pos: pos(), ty: Type::new("float"), name: "a".to_string(), is_mutable: false }],
            body: None,
            overloads: Vec::new(),
            flags: FunctionFlags::default(),
            extend_type: None,
            generic_params: Vec::new(),
        };
        a.run_on(Node::Function(f_int)).unwrap();
        a.run_on(Node::Function(f_float)).unwrap();

        let call_int = Node::Call(Call { pos: pos(), ty: Type::new("nil"), callee: "f".to_string(), args: vec![Node::Int(IntLit { pos: pos(), ty: Type::new("int"), value: 1 })] });
        let Node::Call(resolved) = a.run_on(call_int).unwrap() else { panic!("expected Call") };
        assert_eq!(resolved.ty, Type::new("int"));

        let call_bool = Node::Call(Call { pos: pos(), ty: Type::new("nil"), callee: "f".to_string(), args: vec![Node::Bool(BoolLit { pos: pos(), ty: Type::new("bool"), value: true })] });
        assert!(a.run_on(call_bool).is_err());
    }

    #[test]
    fn generic_call_instantiates_concrete_overload() {
        let mut a = analyser();
        let id_template = Function {
            pos: pos(),
            ty: Type::new("T"),
            name: "id".to_string(),
            params: vec![Param { pos: pos(), ty: Type::new("T"), name: "x".to_string(), is_mutable: false }],
            body: Some(Box::new(Node::Return(Return {
                pos: pos(),
                ty: Type::new("T"),
                value: Box::new(Node::Id(Id { pos: pos(), ty: Type::new("T"), name: "x".to_string() })),
            }))),
            overloads: Vec::new(),
            flags: FunctionFlags::default(),
            extend_type: None,
            generic_params: vec!["T".to_string()],
        };
        a.run_on(Node::Function(id_template)).unwrap();

        let call = Node::Call(Call {
            pos: pos(),
            ty: Type::new("nil"),
            callee: "id".to_string(),
            args: vec![Node::Int(IntLit { pos: pos(), ty: Type::new("int"), value: 1 })],
        });
        let Node::Call(resolved) = a.run_on(call).unwrap() else { panic!("expected Call") };
        assert_eq!(resolved.callee, "id<int>");
        assert_eq!(resolved.ty, Type::new("int"));

        let base = a.scope().get_symbol("id").unwrap();
        let Node::Function(base_fn) = &base.value else { panic!("expected Function") };
        assert_eq!(base_fn.overloads.len(), 1);
        assert_eq!(base_fn.overloads[0].name, "id<int>");
    }

    #[test]
    fn string_literal_lowers_to_string_new_call() {
        let mut a = analyser();
        a.handle_use(pos(), "core").unwrap();
        let expr = Node::String(StringLit { pos: pos(), ty: Type::new("string"), value: "hi".to_string() });
        let Node::Call(call) = a.run_on(expr).unwrap() else { panic!("expected Call") };
        assert_eq!(call.callee, "string.new");
        assert_eq!(call.args.len(), 2);
        let Node::Int(len) = &call.args[1] else { panic!("expected Int length") };
        assert_eq!(len.value, 2);
    }

    #[test]
    fn assigning_to_immutable_is_an_error() {
        let mut a = analyser();
        let decl = Node::Variable(Variable {
            pos: pos(),
            ty: Type::new("int"),
            name: "x".to_string(),
            value: Box::new(Node::Int(IntLit { pos: pos(), ty: Type::new("int"), value: 1 })),
            is_mutable: false,
            op: None,
        });
        a.run_on(decl).unwrap();

        let assign = Node::Assignment(Assignment {
            pos: pos(),
            ty: Type::new("int"),
            name: "x".to_string(),
            value: Box::new(Node::Int(IntLit { pos: pos(), ty: Type::new("int"), value: 2 })),
            op: None,
        });
        assert!(a.run_on(assign).is_err());
    }

    #[test]
    fn redeclaring_a_bound_name_is_an_assignment() {
        let mut a = analyser();
        let decl = Node::Variable(Variable {
            pos: pos(),
            ty: Type::new("int"),
            name: "x".to_string(),
            value: Box::new(Node::Int(IntLit { pos: pos(), ty: Type::new("int"), value: 1 })),
            is_mutable: true,
            op: None,
        });
        a.run_on(decl).unwrap();

        let redecl = Node::Variable(Variable {
            pos: pos(),
            ty: Type::new("int"),
            name: "x".to_string(),
            value: Box::new(Node::Int(IntLit { pos: pos(), ty: Type::new("int"), value: 2 })),
            is_mutable: true,
            op: None,
        });
        let result = a.run_on(redecl).unwrap();
        assert!(matches!(result, Node::Assignment(_)));
    }
}
