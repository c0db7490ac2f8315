use crate::subtyping::BoundGuard;
use crate::{TypeEnv, TypeKind, TypeMirror, WildcardBound};

/// Type erasure (JLS 4.6).
///
/// Parameterized types erase to their canonical raw type, type variables to the erasure of
/// their upper bound, intersections to the erasure of their first member. Types that are
/// already erased come back as the same instance.
pub fn erasure(env: &dyn TypeEnv, ty: &TypeMirror) -> TypeMirror {
    erase(env, ty, &mut BoundGuard::new(env))
}

fn erase(env: &dyn TypeEnv, ty: &TypeMirror, guard: &mut BoundGuard) -> TypeMirror {
    match ty.kind() {
        TypeKind::Primitive(_) | TypeKind::Null | TypeKind::Unknown => ty.clone(),
        TypeKind::Class(class) => {
            if class.args.is_empty() && class.enclosing.is_none() {
                ty.clone()
            } else {
                env.raw_type(class.symbol)
            }
        }
        TypeKind::Array(component) => {
            let erased = erase(env, component, guard);
            if erased.same_instance(component) {
                ty.clone()
            } else {
                TypeMirror::array(erased)
            }
        }
        TypeKind::Wildcard(WildcardBound::Extends(upper)) => erase(env, upper, guard),
        TypeKind::Wildcard(_) => env.common().object.clone(),
        TypeKind::Intersection(members) => match members.first() {
            Some(first) => erase(env, first, guard),
            None => env.common().object.clone(),
        },
        TypeKind::TypeVar(var) => {
            if !guard.enter(var.id()) {
                return env.common().object.clone();
            }
            let erased = erase(env, &env.upper_bound(*var), guard);
            guard.leave(var.id());
            erased
        }
    }
}

impl TypeMirror {
    pub fn erasure(&self, env: &dyn TypeEnv) -> TypeMirror {
        erasure(env, self)
    }
}
