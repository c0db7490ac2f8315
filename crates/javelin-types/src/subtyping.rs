use std::collections::{HashSet, VecDeque};

use crate::{
    ClassKind, ClassType, Substitution, TypeEnv, TypeKind, TypeMirror, TypeVarId, WildcardBound,
};

/// Formal-to-actual substitution for a class type, including the parameters of enclosing
/// classes.
///
/// Returns `None` for raw uses of generic classes, which have no meaningful substitution.
pub(crate) fn class_substitution(env: &dyn TypeEnv, class: &ClassType) -> Option<Substitution> {
    let def = env.class(class.symbol)?;
    if class.args.is_empty() && !def.type_params.is_empty() {
        return None;
    }
    let mut subst = Substitution::from_pairs(&def.type_params, &class.args);
    if let Some(outer) = class.enclosing.as_ref().and_then(TypeMirror::as_class) {
        if let Some(outer_subst) = class_substitution(env, outer) {
            for (var, ty) in outer_subst.iter() {
                if !subst.contains(var) {
                    subst.insert(var, ty.clone());
                }
            }
        }
    }
    Some(subst)
}

/// Tracks type variables whose bounds are being followed, so that cyclic bound chains stop.
pub(crate) struct BoundGuard {
    enabled: bool,
    active: HashSet<TypeVarId>,
}

impl BoundGuard {
    pub(crate) fn new(env: &dyn TypeEnv) -> Self {
        Self {
            enabled: env.options().guard_bound_cycles,
            active: HashSet::new(),
        }
    }

    /// `false` when `id` is already being followed.
    pub(crate) fn enter(&mut self, id: TypeVarId) -> bool {
        if !self.enabled {
            return true;
        }
        if self.active.insert(id) {
            return true;
        }
        tracing::trace!(target: "javelin.types.bounds", ?id, "bound cycle cut");
        false
    }

    pub(crate) fn leave(&mut self, id: TypeVarId) {
        if self.enabled {
            self.active.remove(&id);
        }
    }
}

pub fn is_same_type(_env: &dyn TypeEnv, a: &TypeMirror, b: &TypeMirror) -> bool {
    a == b
}

/// Subtyping per JLS 4.10, reflexive.
///
/// `Unknown` is compatible in both directions so that missing information never produces a
/// finding on its own.
pub fn is_subtype(env: &dyn TypeEnv, sub: &TypeMirror, sup: &TypeMirror) -> bool {
    Subtyping {
        env,
        guard: BoundGuard::new(env),
    }
    .is_subtype(sub, sup)
}

struct Subtyping<'a> {
    env: &'a dyn TypeEnv,
    guard: BoundGuard,
}

impl Subtyping<'_> {
    fn is_subtype(&mut self, sub: &TypeMirror, sup: &TypeMirror) -> bool {
        if sub == sup || sub.is_unknown() || sup.is_unknown() {
            return true;
        }

        match (sub.kind(), sup.kind()) {
            (TypeKind::Primitive(a), TypeKind::Primitive(b)) => a.widens_to(*b),
            (TypeKind::Primitive(_), _) | (_, TypeKind::Primitive(_)) => false,
            (TypeKind::Null, _) => true,
            (_, TypeKind::Null) => false,
            (_, TypeKind::Intersection(members)) => {
                members.iter().all(|member| self.is_subtype(sub, member))
            }
            (_, TypeKind::TypeVar(var)) => {
                let lower = self.env.lower_bound(*var);
                if !lower.is_null() && self.is_subtype(sub, &lower) {
                    return true;
                }
                match sub.kind() {
                    TypeKind::TypeVar(_) | TypeKind::Intersection(_) | TypeKind::Wildcard(_) => {
                        self.is_subtype_via_left(sub, sup)
                    }
                    _ => false,
                }
            }
            _ => self.is_subtype_via_left(sub, sup),
        }
    }

    fn is_subtype_via_left(&mut self, sub: &TypeMirror, sup: &TypeMirror) -> bool {
        match sub.kind() {
            TypeKind::TypeVar(var) => {
                if !self.guard.enter(var.id()) {
                    return false;
                }
                let upper = self.env.upper_bound(*var);
                let result = self.is_subtype(&upper, sup);
                self.guard.leave(var.id());
                result
            }
            TypeKind::Intersection(members) => {
                members.iter().any(|member| self.is_subtype(member, sup))
            }
            TypeKind::Wildcard(WildcardBound::Extends(upper)) => self.is_subtype(upper, sup),
            TypeKind::Wildcard(_) => {
                let object = self.env.common().object.clone();
                self.is_subtype(&object, sup)
            }
            TypeKind::Array(component) => match sup.kind() {
                TypeKind::Array(sup_component) => {
                    if component.is_primitive() || sup_component.is_primitive() {
                        component == sup_component
                    } else {
                        self.is_subtype(component, sup_component)
                    }
                }
                TypeKind::Class(class) => {
                    let wk = self.env.well_known();
                    class.symbol == wk.object
                        || class.symbol == wk.cloneable
                        || class.symbol == wk.serializable
                }
                _ => false,
            },
            TypeKind::Class(_) => {
                let Some(sup_class) = sup.as_class() else {
                    return false;
                };
                let Some(view) = as_super(self.env, sub, sup_class.symbol) else {
                    return false;
                };
                let Some(view_class) = view.as_class() else {
                    return false;
                };
                // `Outer<A>.Inner` vs `Outer<B>.Inner`: the outer parameterizations must agree too.
                if let (Some(outer), Some(sup_outer)) = (&view_class.enclosing, &sup_class.enclosing) {
                    if !self.is_subtype(outer, sup_outer) {
                        return false;
                    }
                }
                if sup_class.args.is_empty() {
                    return true;
                }
                // Raw to parameterized is an unchecked conversion, not subtyping.
                if view_class.args.len() != sup_class.args.len() {
                    return false;
                }
                view_class
                    .args
                    .iter()
                    .zip(&sup_class.args)
                    .all(|(arg, sup_arg)| self.contains(sup_arg, arg))
            }
            _ => false,
        }
    }

    /// Type-argument containment (JLS 4.5.1): does `outer` contain `inner`?
    fn contains(&mut self, outer: &TypeMirror, inner: &TypeMirror) -> bool {
        if outer == inner || outer.is_unknown() || inner.is_unknown() {
            return true;
        }
        let object = self.env.common().object.clone();
        match (outer.as_wildcard(), inner.as_wildcard()) {
            (Some(WildcardBound::Unbounded), _) => true,
            (Some(WildcardBound::Extends(bound)), Some(WildcardBound::Extends(inner))) => {
                self.is_subtype(inner, bound)
            }
            (Some(WildcardBound::Extends(bound)), Some(WildcardBound::Unbounded)) => {
                self.is_subtype(&object, bound)
            }
            (Some(WildcardBound::Extends(bound)), Some(WildcardBound::Super(_))) => {
                self.is_subtype(&object, bound)
            }
            (Some(WildcardBound::Extends(bound)), None) => self.is_subtype(inner, bound),
            (Some(WildcardBound::Super(bound)), Some(WildcardBound::Super(inner))) => {
                self.is_subtype(bound, inner)
            }
            (Some(WildcardBound::Super(bound)), None) => self.is_subtype(bound, inner),
            _ => false,
        }
    }
}

/// Assignment compatibility: subtyping, boxing, unboxing followed by widening, and unchecked
/// conversion from a raw type.
pub fn is_assignable(env: &dyn TypeEnv, from: &TypeMirror, to: &TypeMirror) -> bool {
    if is_subtype(env, from, to) {
        return true;
    }

    let wk = env.well_known();
    match (from.kind(), to.kind()) {
        (TypeKind::Primitive(kind), _) if !to.is_primitive() => wk
            .box_class(*kind)
            .is_some_and(|boxed| is_subtype(env, &env.raw_type(boxed), to)),
        (TypeKind::Class(class), TypeKind::Primitive(target)) => wk
            .unboxed(class.symbol)
            .is_some_and(|kind| kind.widens_to(*target)),
        (TypeKind::Class(_), TypeKind::Class(target)) if !target.args.is_empty() => {
            as_super(env, from, target.symbol)
                .and_then(|view| view.as_class().map(|class| class.args.is_empty()))
                .unwrap_or(false)
        }
        _ => false,
    }
}

/// View `ty` as a parameterization of `target`, walking the supertype graph and applying type
/// argument substitution along the way.
///
/// Raw types stay raw: `ArrayList` viewed as `List` is the raw `List`. Returns `None` when
/// `target` is not a supertype.
///
/// Example: `ArrayList<String>` viewed as `Iterable` is `Iterable<String>`.
pub fn as_super(env: &dyn TypeEnv, ty: &TypeMirror, target: crate::ClassId) -> Option<TypeMirror> {
    fn inner(
        env: &dyn TypeEnv,
        ty: &TypeMirror,
        target: crate::ClassId,
        guard: &mut BoundGuard,
    ) -> Option<TypeMirror> {
        match ty.kind() {
            TypeKind::Array(_) => {
                let wk = env.well_known();
                if target == wk.object || target == wk.cloneable || target == wk.serializable {
                    return Some(env.raw_type(target));
                }
                return None;
            }
            TypeKind::Intersection(members) => {
                return members
                    .iter()
                    .find_map(|member| inner(env, member, target, guard));
            }
            TypeKind::TypeVar(var) => {
                if !guard.enter(var.id()) {
                    return None;
                }
                let found = inner(env, &env.upper_bound(*var), target, guard);
                guard.leave(var.id());
                return found;
            }
            TypeKind::Wildcard(WildcardBound::Extends(upper)) => {
                return inner(env, upper, target, guard);
            }
            TypeKind::Wildcard(_) => {
                return inner(env, &env.common().object, target, guard);
            }
            TypeKind::Class(_) => {}
            _ => return None,
        }

        let mut queue: VecDeque<TypeMirror> = VecDeque::new();
        let mut seen: HashSet<TypeMirror> = HashSet::new();
        queue.push_back(ty.clone());

        while let Some(current) = queue.pop_front() {
            let Some(class) = current.as_class() else {
                continue;
            };
            if !seen.insert(current.clone()) {
                continue;
            }
            if class.symbol == target {
                return Some(current);
            }
            let Some(def) = env.class(class.symbol) else {
                continue;
            };

            match class_substitution(env, class) {
                Some(subst) => {
                    queue.extend(def.super_class.iter().map(|sc| sc.subst(&subst)));
                    queue.extend(def.interfaces.iter().map(|iface| iface.subst(&subst)));
                }
                None => {
                    let raw = |sup: &TypeMirror| sup.as_class().map(|c| env.raw_type(c.symbol));
                    queue.extend(def.super_class.iter().filter_map(raw));
                    queue.extend(def.interfaces.iter().filter_map(raw));
                }
            }

            // Every interface implicitly has `Object` as a supertype (JLS 4.10.2).
            if def.kind == ClassKind::Interface {
                queue.push_back(env.common().object.clone());
            }
        }

        None
    }

    let mut guard = BoundGuard::new(env);
    inner(env, ty, target, &mut guard)
}

/// Greatest lower bound of `types`.
///
/// Intersections are flattened, `Object` is dropped, and so is every member that is a
/// supertype of another member. The result is a single type or an intersection listing class
/// types before interfaces; an empty input yields `Object`.
pub fn glb(env: &dyn TypeEnv, types: &[TypeMirror]) -> TypeMirror {
    let object = env.common().object.clone();

    let mut flat: Vec<TypeMirror> = Vec::new();
    for ty in types {
        let members = match ty.intersection_members() {
            Some(members) => members.to_vec(),
            None => vec![ty.clone()],
        };
        for member in members {
            if member == object || member.is_unknown() || flat.contains(&member) {
                continue;
            }
            flat.push(member);
        }
    }

    let mut kept: Vec<TypeMirror> = Vec::with_capacity(flat.len());
    for (i, candidate) in flat.iter().enumerate() {
        let redundant = flat.iter().enumerate().any(|(j, other)| {
            if i == j || !is_subtype(env, other, candidate) {
                return false;
            }
            // Mutual subtypes: keep the first.
            j < i || !is_subtype(env, candidate, other)
        });
        if !redundant {
            kept.push(candidate.clone());
        }
    }

    if kept.is_empty() {
        return object;
    }

    let is_interface = |ty: &TypeMirror| {
        ty.as_class()
            .and_then(|class| env.class(class.symbol))
            .is_some_and(|def| def.kind == ClassKind::Interface)
    };
    kept.sort_by_key(|ty| is_interface(ty));
    TypeMirror::intersection_of(kept)
}
