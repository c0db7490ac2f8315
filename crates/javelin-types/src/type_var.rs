//! Derivations of type variables.
//!
//! Variables are immutable: every operation here mints a new arena slot in the typing context
//! and leaves the original untouched. Derived declared variables keep their symbol, so they
//! still compare equal to the variable they were derived from; derived captured variables are
//! new identities that keep pointing at the same originating wildcard.

use crate::{ClassId, Result, Substitution, TyContext, TypeEnv, TypeError, TypeMirror, TypeVar, TypeVarDef};

impl TyContext<'_> {
    fn def_of(&self, var: TypeVar) -> Result<&TypeVarDef> {
        self.type_var(var.id())
            .ok_or_else(|| TypeError::illegal_state("type variable is not defined in this context"))
    }

    /// Rewrite only the bounds of `var`.
    ///
    /// Returns `var` itself when neither bound changes (or when `var` is unknown here);
    /// otherwise a new variable with the same symbol or capture origin.
    pub fn subst_in_bounds(&mut self, var: TypeVar, subst: &Substitution) -> TypeVar {
        let Some(def) = self.type_var(var.id()) else {
            return var;
        };
        let upper = def.upper_bound().subst(subst);
        let lower = def.lower_bound().subst(subst);
        if upper.same_instance(def.upper_bound()) && lower.same_instance(def.lower_bound()) {
            return var;
        }
        let derived = def.with_bounds(upper, lower);
        self.push_var(derived)
    }

    /// A copy of a captured variable with new bounds.
    ///
    /// Declared variables get their bounds from the declaration and refuse with
    /// [`TypeError::UnsupportedOperation`].
    pub fn clone_with_bounds(
        &mut self,
        var: TypeVar,
        lower: TypeMirror,
        upper: TypeMirror,
    ) -> Result<TypeVar> {
        let def = self.def_of(var)?;
        if !def.is_captured() {
            return Err(TypeError::UnsupportedOperation(
                "clone_with_bounds on a declared type variable",
            ));
        }
        let derived = def.with_bounds(upper, lower);
        Ok(self.push_var(derived))
    }

    pub fn with_upper_bound(&mut self, var: TypeVar, upper: TypeMirror) -> Result<TypeVar> {
        let def = self.def_of(var)?;
        let derived = def.with_bounds(upper, def.lower_bound().clone());
        Ok(self.push_var(derived))
    }

    /// Same variable, annotated. Annotations are invisible to equality.
    pub fn with_annotations(&mut self, var: TypeVar, annotations: Vec<ClassId>) -> Result<TypeVar> {
        let derived = self.def_of(var)?.with_annotations(annotations);
        Ok(self.push_var(derived))
    }
}
