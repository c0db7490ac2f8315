use std::fmt;

use crate::{
    fresh_scope, ClassDef, ClassId, CommonTypes, TypeMirror, TypeSystem, TypeSystemOptions,
    TypeVar, TypeVarDef, TypeVarId, VarOrigin, WellKnownTypes,
};

/// Read access to class symbols and type-variable definitions.
///
/// Implemented by the registry ([`TypeSystem`]) and by per-pass typing contexts
/// ([`TyContext`]) layered on top of it. Algorithms take `&dyn TypeEnv` so they work the same
/// on either.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;

    /// Binary name of an interned class, defined or not.
    fn class_name(&self, id: ClassId) -> Option<&str>;

    fn lookup_class(&self, name: &str) -> Option<ClassId>;

    /// Canonical raw (argument-less) type of `id`.
    fn raw_type(&self, id: ClassId) -> TypeMirror;

    fn type_var(&self, id: TypeVarId) -> Option<&TypeVarDef>;

    fn well_known(&self) -> &WellKnownTypes;

    fn common(&self) -> &CommonTypes;

    fn options(&self) -> &TypeSystemOptions;

    /// Upper bound of `var`; the top type when the variable is unknown to this environment.
    fn upper_bound(&self, var: TypeVar) -> TypeMirror {
        match self.type_var(var.id()) {
            Some(def) => def.upper_bound().clone(),
            None => self.common().object.clone(),
        }
    }

    /// Lower bound of `var`; the bottom (null) type unless `var` is a capture of a
    /// lower-bounded wildcard.
    fn lower_bound(&self, var: TypeVar) -> TypeMirror {
        match self.type_var(var.id()) {
            Some(def) => def.lower_bound().clone(),
            None => self.common().null.clone(),
        }
    }

    fn type_var_name(&self, var: TypeVar) -> Option<&str> {
        self.type_var(var.id()).map(TypeVarDef::name)
    }

    /// The wildcard a capture variable was manufactured from.
    fn captured_origin(&self, var: TypeVar) -> Option<TypeMirror> {
        match self.type_var(var.id())?.origin() {
            VarOrigin::Captured(wildcard) => Some(wildcard.clone()),
            VarOrigin::Declared(_) => None,
        }
    }

    /// `true` iff `var` was captured from exactly this wildcard instance.
    fn is_capture_of(&self, var: TypeVar, wildcard: &TypeMirror) -> bool {
        match self.type_var(var.id()).map(TypeVarDef::origin) {
            Some(VarOrigin::Captured(origin)) => origin.same_instance(wildcard),
            _ => false,
        }
    }
}

/// Per-pass typing context.
///
/// Capture conversion and bound derivations allocate type variables here instead of in the
/// shared registry, so a frozen [`TypeSystem`] can be read by several workers at once while each
/// worker owns its own context.
pub struct TyContext<'env> {
    base: &'env TypeSystem,
    scope: u32,
    locals: Vec<TypeVarDef>,
    captures: u32,
}

impl fmt::Debug for TyContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TyContext")
            .field("locals", &self.locals)
            .finish_non_exhaustive()
    }
}

impl<'env> TyContext<'env> {
    pub fn new(base: &'env TypeSystem) -> Self {
        Self {
            base,
            scope: fresh_scope(),
            locals: Vec::new(),
            captures: 0,
        }
    }

    pub fn base(&self) -> &'env TypeSystem {
        self.base
    }

    /// Drop all context-local variables.
    ///
    /// Handles minted before the reset keep their identity but resolve to nothing afterwards
    /// (the slots are reused by later allocations), so prefer a fresh context per compilation
    /// unit.
    pub fn reset(&mut self) {
        self.scope = fresh_scope();
        self.locals.clear();
        self.captures = 0;
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    pub(crate) fn push_var(&mut self, def: TypeVarDef) -> TypeVar {
        let id = TypeVarId::new(self.scope, self.locals.len());
        let var = def.handle(id);
        self.locals.push(def);
        var
    }

    pub(crate) fn next_capture_name(&mut self) -> String {
        self.captures += 1;
        format!("CAP#{}", self.captures)
    }

    pub(crate) fn local_mut(&mut self, id: TypeVarId) -> Option<&mut TypeVarDef> {
        if id.scope() != self.scope {
            return None;
        }
        self.locals.get_mut(id.index())
    }
}

impl TypeEnv for TyContext<'_> {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.base.class(id)
    }

    fn class_name(&self, id: ClassId) -> Option<&str> {
        self.base.class_name(id)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.base.lookup_class(name)
    }

    fn raw_type(&self, id: ClassId) -> TypeMirror {
        self.base.raw_type(id)
    }

    fn type_var(&self, id: TypeVarId) -> Option<&TypeVarDef> {
        if id.scope() == self.scope {
            return self.locals.get(id.index());
        }
        self.base.type_var(id)
    }

    fn well_known(&self) -> &WellKnownTypes {
        self.base.well_known()
    }

    fn common(&self) -> &CommonTypes {
        self.base.common()
    }

    fn options(&self) -> &TypeSystemOptions {
        self.base.options()
    }
}
