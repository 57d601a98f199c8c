//! The IR node catalogue. Every node carries a [`Position`] and a
//! [`Type`]; the tree is rebuilt (never mutated in place) as it moves
//! through passes, so nodes own their children via `Box`/`Vec`.

use gemc_core::{Position, Type};
use serde::{Deserialize, Serialize};

/// A named function parameter: type, name, mutability flag. Parameters are
/// rebuilt by the analyser when generics are instantiated, so they carry
/// their own `Type` rather than borrowing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub pos: Position,
    pub ty: Type,
    pub name: String,
    pub is_mutable: bool,
}

/// `{static, property, method, extern}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFlags {
    pub is_static: bool,
    pub is_property: bool,
    pub is_method: bool,
    pub is_extern: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub pos: Position,
    pub ty: Type,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Position,
    pub ty: Type,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub pos: Position,
    /// Return type.
    pub ty: Type,
    /// The mangled, globally-unique name after analysis; the
    /// surface name before analysis.
    pub name: String,
    pub params: Vec<Param>,
    /// `None` means extern/declaration.
    pub body: Option<Box<Node>>,
    pub overloads: Vec<Function>,
    pub flags: FunctionFlags,
    pub extend_type: Option<Type>,
    pub generic_params: Vec<String>,
}

impl Function {
    pub fn is_declaration(&self) -> bool {
        self.body.is_none()
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub pos: Position,
    pub ty: Type,
    pub value: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub pos: Position,
    pub ty: Type,
    pub name: String,
    pub value: Box<Node>,
    pub is_mutable: bool,
    pub op: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub pos: Position,
    pub ty: Type,
    pub name: String,
    pub value: Box<Node>,
    pub op: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elseif {
    pub pos: Position,
    pub ty: Type,
    pub cond: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub pos: Position,
    pub ty: Type,
    pub cond: Box<Node>,
    pub body: Box<Node>,
    pub else_body: Option<Box<Node>>,
    pub elseifs: Vec<Elseif>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct While {
    pub pos: Position,
    pub ty: Type,
    pub cond: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Break {
    pub pos: Position,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continue {
    pub pos: Position,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub pos: Position,
    pub ty: Type,
    pub value: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Use {
    pub pos: Position,
    pub ty: Type,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntLit {
    pub pos: Position,
    pub ty: Type,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatLit {
    pub pos: Position,
    pub ty: Type,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolLit {
    pub pos: Position,
    pub ty: Type,
    pub value: bool,
}

/// A source string literal, rewritten by the analyser into a
/// `string.new(StringLiteral, Int)` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLit {
    pub pos: Position,
    pub ty: Type,
    pub value: String,
}

/// The raw pointer literal a `String` node expands into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub pos: Position,
    pub ty: Type,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Id {
    pub pos: Position,
    pub ty: Type,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracketed {
    pub pos: Position,
    pub ty: Type,
    pub value: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub pos: Position,
    pub ty: Type,
    pub callee: String,
    pub args: Vec<Node>,
}

/// Explicit type cast; the target type is carried in `ty`, the cast
/// operand in `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    pub pos: Position,
    pub ty: Type,
    pub value: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct New {
    pub pos: Position,
    pub ty: Type,
    pub new_type: Type,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub pos: Position,
    pub ty: Type,
    pub op: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOperation {
    pub pos: Position,
    pub ty: Type,
    pub op: String,
    pub value: Box<Node>,
}

/// `None` args means a field read; `Some(args)` means a method call (spec
/// §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub pos: Position,
    pub ty: Type,
    pub value: Box<Node>,
    pub attr: String,
    pub args: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ternary {
    pub pos: Position,
    pub ty: Type,
    pub cond: Box<Node>,
    pub true_value: Box<Node>,
    pub false_value: Box<Node>,
}

/// An explicit reference, `&name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ref {
    pub pos: Position,
    pub ty: Type,
    pub name: String,
}

/// A type appearing in node position: generic arguments, `New`'s target
/// type before resolution, explicit cast targets. Types are themselves
/// nodes wherever they occur syntactically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    pub pos: Position,
    pub ty: Type,
    pub referenced: Type,
}

/// The tagged-union IR node. A tagged union is the natural representation
/// here: every pass matches exhaustively over node kind, and the compiler
/// never needs open extension of the node set at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Program(Program),
    Body(Body),
    Function(Function),
    Param(Param),
    Arg(Arg),
    Variable(Variable),
    Assignment(Assignment),
    If(If),
    Elseif(Elseif),
    While(While),
    Break(Break),
    Continue(Continue),
    Return(Return),
    Use(Use),
    Int(IntLit),
    Float(FloatLit),
    Bool(BoolLit),
    String(StringLit),
    StringLiteral(StringLiteral),
    Id(Id),
    Bracketed(Bracketed),
    Call(Call),
    Cast(Cast),
    New(New),
    Operation(Operation),
    UnaryOperation(UnaryOperation),
    Attribute(Attribute),
    Ternary(Ternary),
    Ref(Ref),
    Type(TypeNode),
}

impl Node {
    /// The `Position` every variant carries.
    pub fn pos(&self) -> Position {
        match self {
            Node::Program(n) => n.pos,
            Node::Body(n) => n.pos,
            Node::Function(n) => n.pos,
            Node::Param(n) => n.pos,
            Node::Arg(n) => n.pos,
            Node::Variable(n) => n.pos,
            Node::Assignment(n) => n.pos,
            Node::If(n) => n.pos,
            Node::Elseif(n) => n.pos,
            Node::While(n) => n.pos,
            Node::Break(n) => n.pos,
            Node::Continue(n) => n.pos,
            Node::Return(n) => n.pos,
            Node::Use(n) => n.pos,
            Node::Int(n) => n.pos,
            Node::Float(n) => n.pos,
            Node::Bool(n) => n.pos,
            Node::String(n) => n.pos,
            Node::StringLiteral(n) => n.pos,
            Node::Id(n) => n.pos,
            Node::Bracketed(n) => n.pos,
            Node::Call(n) => n.pos,
            Node::Cast(n) => n.pos,
            Node::New(n) => n.pos,
            Node::Operation(n) => n.pos,
            Node::UnaryOperation(n) => n.pos,
            Node::Attribute(n) => n.pos,
            Node::Ternary(n) => n.pos,
            Node::Ref(n) => n.pos,
            Node::Type(n) => n.pos,
        }
    }

    /// The `Type` every variant carries.
    pub fn ty(&self) -> &Type {
        match self {
            Node::Program(n) => &n.ty,
            Node::Body(n) => &n.ty,
            Node::Function(n) => &n.ty,
            Node::Param(n) => &n.ty,
            Node::Arg(n) => &n.ty,
            Node::Variable(n) => &n.ty,
            Node::Assignment(n) => &n.ty,
            Node::If(n) => &n.ty,
            Node::Elseif(n) => &n.ty,
            Node::While(n) => &n.ty,
            Node::Break(n) => &n.ty,
            Node::Continue(n) => &n.ty,
            Node::Return(n) => &n.ty,
            Node::Use(n) => &n.ty,
            Node::Int(n) => &n.ty,
            Node::Float(n) => &n.ty,
            Node::Bool(n) => &n.ty,
            Node::String(n) => &n.ty,
            Node::StringLiteral(n) => &n.ty,
            Node::Id(n) => &n.ty,
            Node::Bracketed(n) => &n.ty,
            Node::Call(n) => &n.ty,
            Node::Cast(n) => &n.ty,
            Node::New(n) => &n.ty,
            Node::Operation(n) => &n.ty,
            Node::UnaryOperation(n) => &n.ty,
            Node::Attribute(n) => &n.ty,
            Node::Ternary(n) => &n.ty,
            Node::Ref(n) => &n.ty,
            Node::Type(n) => &n.ty,
        }
    }

    /// `true` for the node kinds that denote a value with a destructible
    /// result; the memory manager only ever extracts/moves these.
    pub fn is_destructible_expression(&self) -> bool {
        matches!(
            self,
            Node::Call(_)
                | Node::Int(_)
                | Node::Float(_)
                | Node::Bool(_)
                | Node::Id(_)
                | Node::Bracketed(_)
                | Node::Attribute(_)
                | Node::Operation(_)
                | Node::Cast(_)
        )
    }

    pub fn as_id(&self) -> Option<&Id> {
        match self {
            Node::Id(id) => Some(id),
            _ => None,
        }
    }
}
