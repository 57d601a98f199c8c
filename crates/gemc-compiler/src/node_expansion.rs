//! The node-expansion pass: a thin re-expansion safety net.
//!
//! `Analyser` already desugars operators, attribute accesses, `new`, and
//! string literals into `Call`s while it resolves overloads and types, so by
//! the time a program reaches this pass those nodes are already gone. This
//! pass exists for the case where an IR builder (or a test) hands a tree
//! still in surface form straight to the memory manager or backend,
//! skipping the analyser. It performs the same mechanical rewrite the
//! analyser's desugaring rules describe, but must not introduce new
//! semantic decisions: no overload resolution, no generic instantiation,
//! no mangling. A node's declared `ty` is trusted as-is.

use gemc_ir::{
    Assignment, Attribute, Call, CompError, New, Node, Operation, Pass, StringLit, StringLiteral,
    UnaryOperation, Variable,
};

#[derive(Default)]
pub struct NodeExpansion;

impl NodeExpansion {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for NodeExpansion {
    fn scope(&self) -> &gemc_ir::IrScope {
        unreachable!("node expansion performs no symbol lookups and never needs its scope")
    }

    fn scope_mut(&mut self) -> &mut gemc_ir::IrScope {
        unreachable!("node expansion performs no symbol lookups and never needs its scope")
    }

    /// Already a `Call` in every program that went through the analyser;
    /// left as-is when encountered directly.
    fn run_on_call(&mut self, node: Call) -> Result<Node, CompError> {
        let args = node
            .args
            .into_iter()
            .map(|a| self.run_on(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Call(Call { args, ..node }))
    }

    /// `String(value) -> Call("string.new", [StringLiteral(value), Int(len)])`
    ///, mirrored here without the analyser's symbol lookup.
    fn run_on_string(&mut self, node: StringLit) -> Result<Node, CompError> {
        let len = node.value.len() as i64;
        let literal = Node::StringLiteral(StringLiteral {
            pos: node.pos,
            ty: node.ty.clone(),
            value: node.value,
        });
        let length = Node::Int(gemc_ir::IntLit {
            pos: node.pos,
            ty: node.ty.clone(),
            value: len,
        });
        Ok(Node::Call(Call {
            pos: node.pos,
            ty: node.ty,
            callee: "string.new".to_string(),
            args: vec![literal, length],
        }))
    }

    fn run_on_operation(&mut self, node: Operation) -> Result<Node, CompError> {
        let left = self.run_on(*node.left)?;
        let right = self.run_on(*node.right)?;
        let callee = format!("{}.{}.{}", left.ty().display(), node.op, right.ty().display());
        Ok(Node::Call(Call {
            pos: node.pos,
            ty: node.ty,
            callee,
            args: vec![left, right],
        }))
    }

    fn run_on_unary_operation(&mut self, node: UnaryOperation) -> Result<Node, CompError> {
        let value = self.run_on(*node.value)?;
        let callee = format!("{}.{}", node.op, value.ty().display());
        Ok(Node::Call(Call {
            pos: node.pos,
            ty: node.ty,
            callee,
            args: vec![value],
        }))
    }

    fn run_on_attribute(&mut self, node: Attribute) -> Result<Node, CompError> {
        let value = self.run_on(*node.value)?;
        let args = node
            .args
            .map(|args| args.into_iter().map(|a| self.run_on(a)).collect::<Result<Vec<_>, _>>())
            .transpose()?
            .unwrap_or_default();
        let callee = format!("{}.{}", value.ty().dereferenced().display(), node.attr);
        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(value);
        full_args.extend(args);
        Ok(Node::Call(Call {
            pos: node.pos,
            ty: node.ty,
            callee,
            args: full_args,
        }))
    }

    /// `New(T, args) -> Call("{T}.new", args)`, collapsed directly rather
    /// than routed through the attribute rule - there is no receiver to
    /// drop since `new` has none in surface form.
    fn run_on_new(&mut self, node: New) -> Result<Node, CompError> {
        let args = node
            .args
            .into_iter()
            .map(|a| self.run_on(a))
            .collect::<Result<Vec<_>, _>>()?;
        let callee = format!("{}.new", node.new_type.display());
        Ok(Node::Call(Call {
            pos: node.pos,
            ty: node.ty,
            callee,
            args,
        }))
    }

    /// `Variable(x, op: Some(op), value) -> Assignment(x, Operation(op,
    /// Id(x), value))` when `op` is present. A plain declaration is left
    /// untouched.
    fn run_on_variable(&mut self, node: Variable) -> Result<Node, CompError> {
        let Some(op) = node.op else {
            let value = Box::new(self.run_on(*node.value)?);
            return Ok(Node::Variable(Variable { value, op: None, ..node }));
        };
        self.run_on_assignment(Assignment {
            pos: node.pos,
            ty: node.ty,
            name: node.name,
            value: node.value,
            op: Some(op),
        })
    }

    fn run_on_assignment(&mut self, node: Assignment) -> Result<Node, CompError> {
        let value = self.run_on(*node.value)?;
        let value = match node.op {
            Some(op) => self.run_on(Node::Operation(Operation {
                pos: node.pos,
                ty: node.ty.clone(),
                op,
                left: Box::new(Node::Id(gemc_ir::Id {
                    pos: node.pos,
                    ty: node.ty.clone(),
                    name: node.name.clone(),
                })),
                right: Box::new(value),
            }))?,
            None => value,
        };
        Ok(Node::Assignment(Assignment {
            pos: node.pos,
            ty: node.ty,
            name: node.name,
            value: Box::new(value),
            op: None,
        }))
    }
}
