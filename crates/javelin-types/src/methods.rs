use std::collections::{HashSet, VecDeque};

use crate::subtyping::{class_substitution, BoundGuard};
use crate::{
    erasure, ClassDef, ClassKind, MethodDef, MethodId, Substitution, TypeEnv, TypeKind, TypeMirror,
    TypeVar, WildcardBound,
};

/// A method declaration together with its declaring class; what stream filters look at.
#[derive(Clone, Copy, Debug)]
pub struct MethodSymbol<'a> {
    pub id: MethodId,
    pub owner: &'a ClassDef,
    pub def: &'a MethodDef,
}

impl MethodSymbol<'_> {
    pub fn name(&self) -> &str {
        &self.def.name
    }
}

/// A member method as seen through a particular parameterization of its declaring type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSig {
    pub symbol: MethodId,
    /// The supertype the method was found on, parameterized as seen from the queried type.
    pub declaring_type: TypeMirror,
    pub name: String,
    pub type_params: Vec<TypeVar>,
    pub params: Vec<TypeMirror>,
    pub return_type: TypeMirror,
    pub is_static: bool,
    pub is_varargs: bool,
    pub is_abstract: bool,
}

impl MethodSig {
    /// The signature with `subst` applied to the declaring type, parameters and return type.
    pub fn subst(&self, subst: &Substitution) -> MethodSig {
        MethodSig {
            declaring_type: self.declaring_type.subst(subst),
            params: self.params.iter().map(|param| param.subst(subst)).collect(),
            return_type: self.return_type.subst(subst),
            ..self.clone()
        }
    }

    fn erased_params(&self, env: &dyn TypeEnv) -> Vec<TypeMirror> {
        self.params.iter().map(|param| erasure(env, param)).collect()
    }
}

struct Pending<'a> {
    class: crate::ClassId,
    def: &'a ClassDef,
    view: TypeMirror,
    /// `None` for raw views, whose member signatures are erased.
    subst: Option<Substitution>,
    next: usize,
}

impl Clone for Pending<'_> {
    fn clone(&self) -> Self {
        Self {
            class: self.class,
            def: self.def,
            view: self.view.clone(),
            subst: self.subst.clone(),
            next: self.next,
        }
    }
}

/// Lazy breadth-first walk over the methods visible on a type.
///
/// Yields the methods of the type itself first, then of its supertypes, each substituted
/// through the inheritance chain. A method whose erased signature matches one already yielded
/// is treated as overridden and skipped. Each supertype view is visited once, so the walk is
/// finite; call [`stream_methods`] again to restart it.
pub struct MethodStream<'a, F> {
    env: &'a dyn TypeEnv,
    filter: F,
    queue: VecDeque<TypeMirror>,
    seen: HashSet<TypeMirror>,
    current: Option<Pending<'a>>,
    yielded: HashSet<(String, Vec<TypeMirror>)>,
}

impl<F: Clone> Clone for MethodStream<'_, F> {
    fn clone(&self) -> Self {
        Self {
            env: self.env,
            filter: self.filter.clone(),
            queue: self.queue.clone(),
            seen: self.seen.clone(),
            current: self.current.clone(),
            yielded: self.yielded.clone(),
        }
    }
}

/// Stream the member methods of `ty` accepted by `filter`.
///
/// Type variables and wildcards defer to their upper bound, intersections to their members and
/// arrays to `Object`.
pub fn stream_methods<'a, F>(env: &'a dyn TypeEnv, ty: &TypeMirror, filter: F) -> MethodStream<'a, F>
where
    F: FnMut(&MethodSymbol<'a>) -> bool,
{
    let mut queue = VecDeque::new();
    seed(env, ty, &mut queue, &mut BoundGuard::new(env));
    MethodStream {
        env,
        filter,
        queue,
        seen: HashSet::new(),
        current: None,
        yielded: HashSet::new(),
    }
}

fn seed(env: &dyn TypeEnv, ty: &TypeMirror, out: &mut VecDeque<TypeMirror>, guard: &mut BoundGuard) {
    match ty.kind() {
        TypeKind::Class(_) => out.push_back(ty.clone()),
        TypeKind::TypeVar(var) => {
            if guard.enter(var.id()) {
                seed(env, &env.upper_bound(*var), out, guard);
                guard.leave(var.id());
            }
        }
        TypeKind::Intersection(members) => {
            for member in members {
                seed(env, member, out, guard);
            }
        }
        TypeKind::Wildcard(WildcardBound::Extends(upper)) => seed(env, upper, out, guard),
        TypeKind::Wildcard(_) | TypeKind::Array(_) => out.push_back(env.common().object.clone()),
        TypeKind::Primitive(_) | TypeKind::Null | TypeKind::Unknown => {}
    }
}

impl<F> MethodStream<'_, F> {
    /// Pop the next class view off the queue and schedule its supertypes.
    fn advance(&mut self) -> bool {
        let env = self.env;
        while let Some(view) = self.queue.pop_front() {
            let Some(class) = view.as_class() else {
                continue;
            };
            if !self.seen.insert(view.clone()) {
                continue;
            }
            let Some(def) = env.class(class.symbol) else {
                continue;
            };

            let subst = class_substitution(env, class);
            match &subst {
                Some(subst) => {
                    self.queue
                        .extend(def.super_class.iter().map(|sc| sc.subst(subst)));
                    self.queue
                        .extend(def.interfaces.iter().map(|iface| iface.subst(subst)));
                }
                None => {
                    let raw = |sup: &TypeMirror| sup.as_class().map(|c| env.raw_type(c.symbol));
                    self.queue.extend(def.super_class.iter().filter_map(raw));
                    self.queue.extend(def.interfaces.iter().filter_map(raw));
                }
            }
            if def.kind == ClassKind::Interface {
                self.queue.push_back(env.common().object.clone());
            }

            self.current = Some(Pending {
                class: class.symbol,
                def,
                view: view.clone(),
                subst,
                next: 0,
            });
            return true;
        }
        false
    }
}

impl<'a, F> Iterator for MethodStream<'a, F>
where
    F: FnMut(&MethodSymbol<'a>) -> bool,
{
    type Item = MethodSig;

    fn next(&mut self) -> Option<MethodSig> {
        loop {
            if let Some(pending) = &mut self.current {
                let def: &'a ClassDef = pending.def;
                while let Some(method) = def.methods.get(pending.next) {
                    let id = MethodId::new(pending.class, pending.next);
                    pending.next += 1;

                    let symbol = MethodSymbol {
                        id,
                        owner: def,
                        def: method,
                    };
                    if !(self.filter)(&symbol) {
                        continue;
                    }

                    let sig = signature(self.env, id, pending, method);
                    let key = (sig.name.clone(), sig.erased_params(self.env));
                    if !self.yielded.insert(key) {
                        continue;
                    }
                    return Some(sig);
                }
                self.current = None;
            }
            if !self.advance() {
                return None;
            }
        }
    }
}

fn signature(env: &dyn TypeEnv, id: MethodId, pending: &Pending<'_>, method: &MethodDef) -> MethodSig {
    let view_type = |ty: &TypeMirror| match &pending.subst {
        Some(subst) => ty.subst(subst),
        None => erasure(env, ty),
    };
    MethodSig {
        symbol: id,
        declaring_type: pending.view.clone(),
        name: method.name.clone(),
        type_params: match pending.subst {
            Some(_) => method.type_params.clone(),
            None => Vec::new(),
        },
        params: method.params.iter().map(view_type).collect(),
        return_type: view_type(&method.return_type),
        is_static: method.is_static,
        is_varargs: method.is_varargs,
        is_abstract: method.is_abstract,
    }
}

impl TypeMirror {
    pub fn stream_methods<'a, F>(&self, env: &'a dyn TypeEnv, filter: F) -> MethodStream<'a, F>
    where
        F: FnMut(&MethodSymbol<'a>) -> bool,
    {
        stream_methods(env, self, filter)
    }
}
