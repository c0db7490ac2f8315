use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Behavioral switches for a [`crate::TypeSystem`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct TypeSystemOptions {
    /// Stop traversals that follow type-variable bounds (method lookup, erasure, subtyping,
    /// supertype views) when a variable is reached again through its own bound chain.
    ///
    /// Declarations such as `<T extends U, U extends T>` are rejected by well-formed
    /// front-ends. Disable this only when every input is known to have passed such a check.
    pub guard_bound_cycles: bool,
}

impl Default for TypeSystemOptions {
    fn default() -> Self {
        Self {
            guard_bound_cycles: true,
        }
    }
}
