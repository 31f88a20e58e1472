//! Type hint validation.
//!
//! The hint grammar admits a fixed set of base names; container names
//! must carry a bracketed element series and scalar names must not. The
//! parser reads the syntax and asks this module whether the shape is
//! legal; hints are then discarded, they occupy no AST slot.

/// The closed set of valid hint base names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintBase {
    Int,
    Float,
    List,
    Set,
    Tuple,
    Dict,
    Str,
    Bool,
    None,
    Union,
}

impl HintBase {
    /// Looks up a hint base by its source spelling.
    pub fn from_name(name: &str) -> Option<HintBase> {
        let base = match name {
            "int" => HintBase::Int,
            "float" => HintBase::Float,
            "list" => HintBase::List,
            "set" => HintBase::Set,
            "tuple" => HintBase::Tuple,
            "dict" => HintBase::Dict,
            "str" => HintBase::Str,
            "bool" => HintBase::Bool,
            "none" => HintBase::None,
            "union" => HintBase::Union,
            _ => return Option::None,
        };
        Some(base)
    }

    /// Whether this base names a container and so requires a bracketed
    /// element series.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            HintBase::List | HintBase::Set | HintBase::Tuple | HintBase::Dict | HintBase::Union
        )
    }
}
