//! The fixed set of builtin callables.
//!
//! These names are installed in the symbol table as FUNCTION before any
//! user code is checked, so calls to them never land in the undefined
//! collector. The set mirrors the standard callables of the source
//! language that the target runtime implements.

/// Builtin function names, pre-installed as FUNCTION.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "abs",
    "all",
    "any",
    "bin",
    "bool",
    "chr",
    "dict",
    "divmod",
    "enumerate",
    "filter",
    "float",
    "frozenset",
    "hex",
    "id",
    "input",
    "int",
    "isinstance",
    "iter",
    "len",
    "list",
    "map",
    "max",
    "min",
    "next",
    "oct",
    "open",
    "ord",
    "pow",
    "print",
    "range",
    "repr",
    "reversed",
    "round",
    "set",
    "sorted",
    "str",
    "sum",
    "tuple",
    "type",
    "zip",
];

/// Whether `name` is one of the builtin callables.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_builtins_present() {
        assert!(is_builtin("print"));
        assert!(is_builtin("range"));
        assert!(is_builtin("len"));
        assert!(is_builtin("divmod"));
    }

    #[test]
    fn test_keywords_are_not_builtins() {
        assert!(!is_builtin("def"));
        assert!(!is_builtin("pass"));
    }

    #[test]
    fn test_set_is_sorted_and_unique() {
        let mut sorted = BUILTIN_FUNCTIONS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, BUILTIN_FUNCTIONS);
    }
}
