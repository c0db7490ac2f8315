use std::collections::HashMap;

use crate::{ClassType, Result, TypeEnv, TypeError, TypeMirror, TypeVar, TypeVisitor, WildcardBound};

/// A partial mapping from type variables to replacement types.
///
/// Keys follow [`TypeVar`] equality: a declared variable matches every handle carrying the
/// same symbol (including ones derived through [`crate::TyContext::with_upper_bound`]), a
/// captured variable only matches itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: HashMap<TypeVar, TypeMirror>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs formals with actuals positionally; surplus entries on either side are ignored.
    pub fn from_pairs(vars: &[TypeVar], types: &[TypeMirror]) -> Self {
        vars.iter().copied().zip(types.iter().cloned()).collect()
    }

    /// Builds a substitution from mirror keys, validating each against `env`.
    ///
    /// Fails with [`TypeError::IllegalState`] when a key is not a type variable or is not
    /// defined in `env` (for instance a capture variable minted by another context).
    pub fn checked<I>(env: &dyn TypeEnv, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TypeMirror, TypeMirror)>,
    {
        let mut out = Self::new();
        for (key, value) in pairs {
            let Some(var) = key.as_type_var() else {
                return Err(TypeError::illegal_state(format!(
                    "substitution key must be a type variable, found {}",
                    key.display(env)
                )));
            };
            if env.type_var(var.id()).is_none() {
                return Err(TypeError::illegal_state(
                    "substitution key is not a type variable of this environment",
                ));
            }
            out.insert(var, value);
        }
        Ok(out)
    }

    pub fn insert(&mut self, var: TypeVar, ty: TypeMirror) -> Option<TypeMirror> {
        self.map.insert(var, ty)
    }

    pub fn get(&self, var: TypeVar) -> Option<&TypeMirror> {
        self.map.get(&var)
    }

    pub fn contains(&self, var: TypeVar) -> bool {
        self.map.contains_key(&var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVar, &TypeMirror)> + '_ {
        self.map.iter().map(|(var, ty)| (*var, ty))
    }

    /// Composition: applying the result equals applying `self`, then `next`.
    pub fn then(&self, next: &Substitution) -> Substitution {
        let mut out: Substitution = self
            .map
            .iter()
            .map(|(var, ty)| (*var, ty.subst(next)))
            .collect();
        for (var, ty) in &next.map {
            out.map.entry(*var).or_insert_with(|| ty.clone());
        }
        out
    }

    pub fn apply(&self, ty: &TypeMirror) -> TypeMirror {
        ty.subst(self)
    }
}

impl FromIterator<(TypeVar, TypeMirror)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (TypeVar, TypeMirror)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

struct Substituter<'a> {
    subst: &'a Substitution,
}

impl Substituter<'_> {
    /// `None` when no element changed.
    fn rewrite_all(&mut self, types: &[TypeMirror]) -> Option<Vec<TypeMirror>> {
        let rewritten: Vec<TypeMirror> = types.iter().map(|ty| ty.accept(self, ())).collect();
        let changed = rewritten
            .iter()
            .zip(types)
            .any(|(new, old)| !new.same_instance(old));
        changed.then_some(rewritten)
    }
}

impl TypeVisitor<()> for Substituter<'_> {
    type Output = TypeMirror;

    fn visit(&mut self, ty: &TypeMirror, _: ()) -> TypeMirror {
        ty.clone()
    }

    fn visit_class(&mut self, ty: &TypeMirror, class: &ClassType, _: ()) -> TypeMirror {
        let args = self.rewrite_all(&class.args);
        let enclosing = class.enclosing.as_ref().map(|outer| outer.accept(self, ()));
        let enclosing_changed = match (&enclosing, &class.enclosing) {
            (Some(new), Some(old)) => !new.same_instance(old),
            _ => false,
        };
        if args.is_none() && !enclosing_changed {
            return ty.clone();
        }
        TypeMirror::class(
            class.symbol,
            args.unwrap_or_else(|| class.args.clone()),
            enclosing,
        )
    }

    fn visit_array(&mut self, ty: &TypeMirror, component: &TypeMirror, _: ()) -> TypeMirror {
        let new = component.accept(self, ());
        if new.same_instance(component) {
            ty.clone()
        } else {
            TypeMirror::array(new)
        }
    }

    fn visit_wildcard(&mut self, ty: &TypeMirror, bound: &WildcardBound, _: ()) -> TypeMirror {
        match bound {
            WildcardBound::Unbounded => ty.clone(),
            WildcardBound::Extends(upper) => {
                let new = upper.accept(self, ());
                if new.same_instance(upper) {
                    ty.clone()
                } else {
                    TypeMirror::wildcard(WildcardBound::Extends(new))
                }
            }
            WildcardBound::Super(lower) => {
                let new = lower.accept(self, ());
                if new.same_instance(lower) {
                    ty.clone()
                } else {
                    TypeMirror::wildcard(WildcardBound::Super(new))
                }
            }
        }
    }

    fn visit_intersection(&mut self, ty: &TypeMirror, members: &[TypeMirror], _: ()) -> TypeMirror {
        match self.rewrite_all(members) {
            Some(members) => TypeMirror::intersection_of(members),
            None => ty.clone(),
        }
    }

    fn visit_type_var(&mut self, ty: &TypeMirror, var: TypeVar, _: ()) -> TypeMirror {
        // Never descends into bounds; `T extends Comparable<T>` would not terminate.
        match self.subst.get(var) {
            Some(replacement) => replacement.clone(),
            None => ty.clone(),
        }
    }
}

impl TypeMirror {
    /// Replace the variables keyed in `subst`.
    ///
    /// Composite types are rebuilt only along changed paths; an unaffected type comes back as
    /// the same instance. Intersections are re-flattened.
    pub fn subst(&self, subst: &Substitution) -> TypeMirror {
        if subst.is_empty() {
            return self.clone();
        }
        self.accept(&mut Substituter { subst }, ())
    }
}
