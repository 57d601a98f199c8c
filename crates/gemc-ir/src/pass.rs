//! The pass-dispatch framework.
//!
//! A [`Pass`] is a recursive visitor keyed by node variant. `run_on`
//! dispatches to one method per variant; every method has a default
//! implementation that rewrites the node's children and returns a
//! structurally-equivalent node, so a concrete pass only overrides the
//! handlers it cares about.

use gemc_core::CompError;

use crate::node::*;
use crate::scope::IrScope;

/// Result type every pass handler returns. No exceptions are used for
/// control flow: a handler either returns a rewritten node or a
/// fatal [`CompError`], and the latter aborts the whole compilation.
pub type PassResult = Result<Node, CompError>;

pub trait Pass {
    fn scope(&self) -> &IrScope;
    fn scope_mut(&mut self) -> &mut IrScope;

    /// Dispatch a node to its variant handler.
    fn run_on(&mut self, node: Node) -> PassResult {
        match node {
            Node::Program(n) => self.run_on_program(n),
            Node::Body(n) => self.run_on_body(n),
            Node::Function(n) => self.run_on_function(n),
            Node::Param(n) => self.run_on_param(n),
            Node::Arg(n) => self.run_on_arg(n),
            Node::Variable(n) => self.run_on_variable(n),
            Node::Assignment(n) => self.run_on_assignment(n),
            Node::If(n) => self.run_on_if(n),
            Node::Elseif(n) => self.run_on_elseif(n),
            Node::While(n) => self.run_on_while(n),
            Node::Break(n) => self.run_on_break(n),
            Node::Continue(n) => self.run_on_continue(n),
            Node::Return(n) => self.run_on_return(n),
            Node::Use(n) => self.run_on_use(n),
            Node::Int(n) => self.run_on_int(n),
            Node::Float(n) => self.run_on_float(n),
            Node::Bool(n) => self.run_on_bool(n),
            Node::String(n) => self.run_on_string(n),
            Node::StringLiteral(n) => self.run_on_string_literal(n),
            Node::Id(n) => self.run_on_id(n),
            Node::Bracketed(n) => self.run_on_bracketed(n),
            Node::Call(n) => self.run_on_call(n),
            Node::Cast(n) => self.run_on_cast(n),
            Node::New(n) => self.run_on_new(n),
            Node::Operation(n) => self.run_on_operation(n),
            Node::UnaryOperation(n) => self.run_on_unary_operation(n),
            Node::Attribute(n) => self.run_on_attribute(n),
            Node::Ternary(n) => self.run_on_ternary(n),
            Node::Ref(n) => self.run_on_ref(n),
            Node::Type(n) => self.run_on_type(n),
        }
    }

    fn run_on_program(&mut self, node: Program) -> PassResult {
        let nodes = node
            .nodes
            .into_iter()
            .map(|n| self.run_on(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Program(Program { nodes, ..node }))
    }

    fn run_on_body(&mut self, node: Body) -> PassResult {
        let nodes = node
            .nodes
            .into_iter()
            .map(|n| self.run_on(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Body(Body { nodes, ..node }))
    }

    fn run_on_function(&mut self, node: Function) -> PassResult {
        let overloads = node
            .overloads
            .into_iter()
            .map(|f| match self.run_on(Node::Function(f))? {
                Node::Function(f) => Ok(f),
                other => unreachable!("run_on(Function) must return Function, got {other:?}"),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let body = node
            .body
            .map(|b| self.run_on(*b))
            .transpose()?
            .map(Box::new);
        Ok(Node::Function(Function {
            overloads,
            body,
            ..node
        }))
    }

    fn run_on_param(&mut self, node: Param) -> PassResult {
        Ok(Node::Param(node))
    }

    fn run_on_arg(&mut self, node: Arg) -> PassResult {
        let value = Box::new(self.run_on(*node.value)?);
        Ok(Node::Arg(Arg { value, ..node }))
    }

    fn run_on_variable(&mut self, node: Variable) -> PassResult {
        let value = Box::new(self.run_on(*node.value)?);
        Ok(Node::Variable(Variable { value, ..node }))
    }

    fn run_on_assignment(&mut self, node: Assignment) -> PassResult {
        let value = Box::new(self.run_on(*node.value)?);
        Ok(Node::Assignment(Assignment { value, ..node }))
    }

    fn run_on_if(&mut self, node: If) -> PassResult {
        let cond = Box::new(self.run_on(*node.cond)?);
        let body = Box::new(self.run_on(*node.body)?);
        let else_body = node.else_body.map(|b| self.run_on(*b)).transpose()?.map(Box::new);
        let elseifs = node
            .elseifs
            .into_iter()
            .map(|e| match self.run_on(Node::Elseif(e))? {
                Node::Elseif(e) => Ok(e),
                other => unreachable!("run_on(Elseif) must return Elseif, got {other:?}"),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::If(If {
            cond,
            body,
            else_body,
            elseifs,
            ..node
        }))
    }

    fn run_on_elseif(&mut self, node: Elseif) -> PassResult {
        let cond = Box::new(self.run_on(*node.cond)?);
        let body = Box::new(self.run_on(*node.body)?);
        Ok(Node::Elseif(Elseif { cond, body, ..node }))
    }

    fn run_on_while(&mut self, node: While) -> PassResult {
        let cond = Box::new(self.run_on(*node.cond)?);
        let body = Box::new(self.run_on(*node.body)?);
        Ok(Node::While(While { cond, body, ..node }))
    }

    fn run_on_break(&mut self, node: Break) -> PassResult {
        Ok(Node::Break(node))
    }

    fn run_on_continue(&mut self, node: Continue) -> PassResult {
        Ok(Node::Continue(node))
    }

    fn run_on_return(&mut self, node: Return) -> PassResult {
        let value = Box::new(self.run_on(*node.value)?);
        Ok(Node::Return(Return { value, ..node }))
    }

    fn run_on_use(&mut self, node: Use) -> PassResult {
        Ok(Node::Use(node))
    }

    fn run_on_int(&mut self, node: IntLit) -> PassResult {
        Ok(Node::Int(node))
    }

    fn run_on_float(&mut self, node: FloatLit) -> PassResult {
        Ok(Node::Float(node))
    }

    fn run_on_bool(&mut self, node: BoolLit) -> PassResult {
        Ok(Node::Bool(node))
    }

    fn run_on_string(&mut self, node: StringLit) -> PassResult {
        Ok(Node::String(node))
    }

    fn run_on_string_literal(&mut self, node: StringLiteral) -> PassResult {
        Ok(Node::StringLiteral(node))
    }

    fn run_on_id(&mut self, node: Id) -> PassResult {
        Ok(Node::Id(node))
    }

    fn run_on_bracketed(&mut self, node: Bracketed) -> PassResult {
        let value = Box::new(self.run_on(*node.value)?);
        Ok(Node::Bracketed(Bracketed { value, ..node }))
    }

    fn run_on_call(&mut self, node: Call) -> PassResult {
        let args = node
            .args
            .into_iter()
            .map(|a| self.run_on(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Call(Call { args, ..node }))
    }

    fn run_on_cast(&mut self, node: Cast) -> PassResult {
        let value = Box::new(self.run_on(*node.value)?);
        Ok(Node::Cast(Cast { value, ..node }))
    }

    fn run_on_new(&mut self, node: New) -> PassResult {
        let args = node
            .args
            .into_iter()
            .map(|a| self.run_on(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::New(New { args, ..node }))
    }

    fn run_on_operation(&mut self, node: Operation) -> PassResult {
        let left = Box::new(self.run_on(*node.left)?);
        let right = Box::new(self.run_on(*node.right)?);
        Ok(Node::Operation(Operation { left, right, ..node }))
    }

    fn run_on_unary_operation(&mut self, node: UnaryOperation) -> PassResult {
        let value = Box::new(self.run_on(*node.value)?);
        Ok(Node::UnaryOperation(UnaryOperation { value, ..node }))
    }

    fn run_on_attribute(&mut self, node: Attribute) -> PassResult {
        let value = Box::new(self.run_on(*node.value)?);
        let args = node
            .args
            .map(|args| args.into_iter().map(|a| self.run_on(a)).collect::<Result<Vec<_>, _>>())
            .transpose()?;
        Ok(Node::Attribute(Attribute { value, args, ..node }))
    }

    fn run_on_ternary(&mut self, node: Ternary) -> PassResult {
        let cond = Box::new(self.run_on(*node.cond)?);
        let true_value = Box::new(self.run_on(*node.true_value)?);
        let false_value = Box::new(self.run_on(*node.false_value)?);
        Ok(Node::Ternary(Ternary {
            cond,
            true_value,
            false_value,
            ..node
        }))
    }

    fn run_on_ref(&mut self, node: Ref) -> PassResult {
        Ok(Node::Ref(node))
    }

    fn run_on_type(&mut self, node: TypeNode) -> PassResult {
        Ok(Node::Type(node))
    }
}

/// Run `f` in a freshly-cloned child scope, installed on `pass` for the
/// duration of `f` and discarded afterwards. A scoped primitive that saves
/// the current scope, installs a fresh copy-on-write child, runs a body,
/// then restores; restoring is implicit here since the child is a clone
/// and the parent is untouched.
pub fn with_child_scope<P, T>(pass: &mut P, f: impl FnOnce(&mut P) -> T) -> T
where
    P: Pass,
{
    let parent = pass.scope().clone();
    *pass.scope_mut() = parent.make_child();
    let result = f(pass);
    *pass.scope_mut() = parent;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemc_core::{SymbolTable, TypeMap};

    struct Identity {
        scope: IrScope,
    }

    impl Pass for Identity {
        fn scope(&self) -> &IrScope {
            &self.scope
        }
        fn scope_mut(&mut self) -> &mut IrScope {
            &mut self.scope
        }
    }

    fn sample_program() -> Node {
        use gemc_core::{Position, Type};
        let pos = Position::new(1, 0);
        Node::Program(Program {
            pos,
            ty: Type::new("nil"),
            nodes: vec![Node::Return(Return {
                pos,
                ty: Type::new("int"),
                value: Box::new(Node::Int(IntLit {
                    pos,
                    ty: Type::new("int"),
                    value: 1,
                })),
            })],
        })
    }

    #[test]
    fn default_dispatch_is_structure_preserving() {
        let mut pass = Identity {
            scope: IrScope::root(SymbolTable::new(), TypeMap::with_builtins()),
        };
        let program = sample_program();
        let result = pass.run_on(program.clone()).unwrap();
        assert_eq!(result, program);
    }

    #[test]
    fn child_scope_does_not_leak_bindings() {
        use gemc_core::{Symbol, Type};
        let mut pass = Identity {
            scope: IrScope::root(SymbolTable::new(), TypeMap::with_builtins()),
        };
        with_child_scope(&mut pass, |p| {
            p.scope_mut().symbols_mut().add(Symbol::new(
                "x",
                Type::new("int"),
                Node::Int(IntLit {
                    pos: gemc_core::Position::new(1, 0),
                    ty: Type::new("int"),
                    value: 1,
                }),
            ));
            assert!(p.scope().get_symbol("x").is_some());
        });
        assert!(pass.scope().get_symbol("x").is_none());
    }
}
