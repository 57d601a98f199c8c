//! Overload resolution.

use gemc_ir::{Function, Type};

/// Iterate `[base] + base.overloads` and return the first whose parameters
/// match `arg_types` - linear, stable, first-declared wins.
///
/// A parameter matches an argument type when the types are equal, the
/// parameter's type is `any`, or the parameter's type names one of the
/// function's own generic type parameters (that argument fixes the generic
/// binding rather than needing an exact match).
pub fn resolve_overload<'f>(base: &'f Function, arg_types: &[Type]) -> Option<&'f Function> {
    std::iter::once(base)
        .chain(base.overloads.iter())
        .find(|candidate| params_match(candidate, arg_types))
}

fn params_match(candidate: &Function, arg_types: &[Type]) -> bool {
    if candidate.params.len() != arg_types.len() {
        return false;
    }
    candidate
        .params
        .iter()
        .zip(arg_types)
        .all(|(param, arg_ty)| {
            &param.ty == arg_ty
                || param.ty.display() == "any"
                || candidate
                    .generic_params
                    .iter()
                    .any(|g| g == param.ty.display())
        })
}

pub fn format_arg_types(arg_types: &[Type]) -> String {
    arg_types
        .iter()
        .map(|t| t.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemc_ir::{Param, Position};

    fn func(name: &str, param_types: &[&str], ret: &str) -> Function {
        let pos = Position::new(1, 0);
        Function {
            pos,
            ty: Type::new(ret),
            name: name.to_string(),
            params: param_types
                .iter()
                .enumerate()
                .map(|(i, t)| Param {
                    pos,
                    ty: Type::new(*t),
                    name: format!("a{i}"),
                    is_mutable: false,
                })
                .collect(),
            body: None,
            overloads: Vec::new(),
            flags: Default::default(),
            extend_type: None,
            generic_params: Vec::new(),
        }
    }

    #[test]
    fn picks_int_overload_for_int_arg() {
        let mut f = func("f", &["int"], "int");
        f.overloads.push(func("f", &["float"], "float"));

        let resolved = resolve_overload(&f, &[Type::new("int")]).unwrap();
        assert_eq!(resolved.ty, Type::new("int"));
    }

    #[test]
    fn picks_float_overload_for_float_arg() {
        let mut f = func("f", &["int"], "int");
        f.overloads.push(func("f", &["float"], "float"));

        let resolved = resolve_overload(&f, &[Type::new("float")]).unwrap();
        assert_eq!(resolved.ty, Type::new("float"));
    }

    #[test]
    fn no_match_for_bool_arg() {
        let mut f = func("f", &["int"], "int");
        f.overloads.push(func("f", &["float"], "float"));

        assert!(resolve_overload(&f, &[Type::new("bool")]).is_none());
    }

    #[test]
    fn any_parameter_matches_everything() {
        let f = func("f", &["any"], "nil");
        assert!(resolve_overload(&f, &[Type::new("string")]).is_some());
    }

    #[test]
    fn generic_parameter_name_matches_any_concrete_type() {
        let mut f = func("id", &["T"], "T");
        f.generic_params = vec!["T".to_string()];
        assert!(resolve_overload(&f, &[Type::new("int")]).is_some());
    }

    #[test]
    fn first_declared_wins_on_ambiguous_match() {
        let mut f = func("f", &["any"], "int");
        f.overloads.push(func("f", &["any"], "float"));
        let resolved = resolve_overload(&f, &[Type::new("string")]).unwrap();
        assert_eq!(resolved.ty, Type::new("int"));
    }
}
