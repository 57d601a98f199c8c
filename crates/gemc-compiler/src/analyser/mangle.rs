//! Deterministic function-name mangling.
//!
//! Kept as pure functions, independent of `Scope` lookups, so the naming
//! scheme is unit-testable on its own, separate from the scope that owns
//! the definitions.

/// `extend_type ? "{extend_type}.{name}" : name`.
pub fn base_name(extend_type: Option<&str>, name: &str) -> String {
    match extend_type {
        Some(ext) => format!("{ext}.{name}"),
        None => name.to_string(),
    }
}

/// `base += "<" + join(generic_arg_types, ", ") + ">"`.
pub fn generic_name(base: &str, generic_arg_types: &[String]) -> String {
    format!("{base}<{}>", generic_arg_types.join(", "))
}

/// `base += ".overload" + join(".{param_type}" for each param, "")`.
pub fn overload_name(base: &str, param_types: &[String]) -> String {
    let mut name = format!("{base}.overload");
    for param_type in param_types {
        name.push('.');
        name.push_str(param_type);
    }
    name
}

/// Compute a function's effective symbol name.
///
/// `generic_arg_types`, when present, means this is a concrete
/// instantiation of a generic template; a generic instantiation never also
/// gets the `.overload...` suffix (the generic argument list is already
/// unambiguous).
pub fn mangled_name(
    extend_type: Option<&str>,
    name: &str,
    generic_arg_types: Option<&[String]>,
    base_already_exists: bool,
    param_types: &[String],
) -> String {
    let base = base_name(extend_type, name);
    match generic_arg_types {
        Some(generics) => generic_name(&base, generics),
        None if base_already_exists => overload_name(&base, param_types),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_function_keeps_its_name() {
        assert_eq!(mangled_name(None, "f", None, false, &[]), "f");
    }

    #[test]
    fn overload_appends_param_types() {
        let name = mangled_name(None, "f", None, true, &["int".to_string()]);
        assert_eq!(name, "f.overload.int");
    }

    #[test]
    fn method_includes_extend_type() {
        let name = mangled_name(Some("string"), "length", None, false, &[]);
        assert_eq!(name, "string.length");
    }

    #[test]
    fn generic_instantiation_uses_angle_brackets_not_overload_suffix() {
        let name = mangled_name(None, "id", Some(&["int".to_string()]), true, &["int".to_string()]);
        assert_eq!(name, "id<int>");
    }

    #[test]
    fn multi_generic_args_are_comma_joined() {
        let name = mangled_name(
            None,
            "pair",
            Some(&["int".to_string(), "float".to_string()]),
            false,
            &[],
        );
        assert_eq!(name, "pair<int, float>");
    }
}
