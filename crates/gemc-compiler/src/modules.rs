//! Module loader: resolves a `use` path to either a
//! native-defined library or another source file, and the `core` library
//! itself - the stdlib methods layered on top of the raw intrinsics.
//!
//! Split between a fixed internal registry and pluggable external
//! definitions, installed once into the compiler's environment.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use gemc_core::{Symbol, Type};
use gemc_ir::{CompError, Function, FunctionFlags, IrScope, Node, Param, Position};
use indexmap::IndexMap;

/// A native-side library object: something constructible and able
/// to install symbols into a scope directly, without going through the
/// source-language parser.
pub trait NativeLibrary {
    fn add_to_scope(&self, scope: &mut IrScope);
}

/// The pinned parse-to-IR front end. Lexing and parsing are out of scope
/// for this middle-end; the IR builder is an adapter from some parse tree
/// to this IR. The module loader needs *a* way to turn a `.gem` file's
/// text into a `Node::Program` when `use` resolves to a source file; this
/// trait is that seam.
pub trait SourceParser {
    fn parse(&self, path: &Path, source: &str) -> Result<Node, CompError>;
}

/// Registry of native libraries plus the stdlib search root and parser used
/// to resolve `use`.
pub struct ModuleLoader {
    stdlib_dir: PathBuf,
    natives: IndexMap<String, Rc<dyn NativeLibrary>>,
    parser: Option<Rc<dyn SourceParser>>,
}

impl ModuleLoader {
    pub fn new(stdlib_dir: impl Into<PathBuf>) -> Self {
        Self {
            stdlib_dir: stdlib_dir.into(),
            natives: IndexMap::new(),
            parser: None,
        }
    }

    pub fn with_native(mut self, name: impl Into<String>, library: Rc<dyn NativeLibrary>) -> Self {
        self.natives.insert(name.into(), library);
        self
    }

    pub fn with_parser(mut self, parser: Rc<dyn SourceParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// A loader with no stdlib directory and only the `core` native library
    /// registered - enough to analyse programs that only use intrinsics and
    /// `core`. The standard library's content is out of scope here; only
    /// its loading protocol is modeled.
    pub fn minimal() -> Self {
        Self::new(PathBuf::new()).with_native("core", Rc::new(CoreLibrary))
    }

    pub fn native(&self, name: &str) -> Option<&Rc<dyn NativeLibrary>> {
        self.natives.get(name)
    }

    pub fn parser(&self) -> Option<&Rc<dyn SourceParser>> {
        self.parser.as_ref()
    }

    pub fn source_path(&self, path: &str) -> PathBuf {
        self.stdlib_dir.join(path).join(format!("{path}.gem"))
    }
}

fn method(
    scope: &mut IrScope,
    name: &str,
    extend_type: Option<Type>,
    params: Vec<(&str, Type)>,
    ret: Type,
) {
    let pos = Position::synthetic();
    let is_constructor = extend_type.is_some() && name.ends_with(".new");
    let function = Function {
        pos,
        ty: ret.clone(),
        name: name.to_string(),
        params: params
            .into_iter()
            .map(|(pname, pty)| Param {
                pos,
                ty: pty,
                name: pname.to_string(),
                is_mutable: false,
            })
            .collect(),
        body: None,
        overloads: Vec::new(),
        flags: FunctionFlags {
            is_extern: true,
            is_static: is_constructor,
            is_method: extend_type.is_some() && !is_constructor,
            ..Default::default()
        },
        extend_type,
        generic_params: Vec::new(),
    };
    scope.symbols_mut().add(Symbol::new(name, ret, Node::Function(function)));
}

/// The `core` stdlib module. Content is left as extern declarations - the
/// library's content is out of scope, only its loading protocol is
/// modeled here - so these exist purely so that
/// `string.new`/`string.destroy`/the boundary-scenario calls resolve.
pub struct CoreLibrary;

impl NativeLibrary for CoreLibrary {
    fn add_to_scope(&self, scope: &mut IrScope) {
        let string_ty = Type::new("string");
        let int_ty = Type::new("int");
        let float_ty = Type::new("float");
        let nil_ty = Type::new("nil");
        let any_ty = Type::new("any");
        let pointer_ty = Type::new("pointer");

        method(
            scope,
            "string.new",
            Some(string_ty.clone()),
            vec![("literal", pointer_ty), ("length", int_ty.clone())],
            string_ty.clone(),
        );
        method(
            scope,
            "string.destroy",
            Some(string_ty.clone()),
            vec![("self", string_ty.as_reference())],
            nil_ty.clone(),
        );
        method(
            scope,
            "int.to_string",
            Some(int_ty.clone()),
            vec![("self", int_ty)],
            string_ty.clone(),
        );
        method(
            scope,
            "float.to_string",
            Some(float_ty.clone()),
            vec![("self", float_ty)],
            string_ty.clone(),
        );
        method(
            scope,
            "string.to_string",
            Some(string_ty.clone()),
            vec![("self", string_ty.clone())],
            string_ty.clone(),
        );
        method(scope, "print", None, vec![("value", any_ty.clone())], nil_ty);
        method(scope, "to_string", None, vec![("value", any_ty)], string_ty);
    }
}
