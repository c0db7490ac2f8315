use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    ClassDef, ClassId, ClassKind, MethodDef, MethodId, PrimitiveKind, Result, TypeEnv, TypeError,
    TypeMirror, TypeParamSymbol, TypeSystem, TypeVar,
};

/// An unresolved type as written in a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    Primitive {
        name: PrimitiveKind,
    },
    Class {
        /// Binary name, e.g. `java.util.Map$Entry`.
        name: String,
        #[serde(default)]
        args: Vec<TypeExpr>,
    },
    /// Reference to a type parameter in scope.
    Var {
        name: String,
    },
    Array {
        component: Box<TypeExpr>,
    },
    Wildcard {
        #[serde(default)]
        bound: WildcardExpr,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WildcardExpr {
    #[default]
    Unbounded,
    Extends(Box<TypeExpr>),
    Super(Box<TypeExpr>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TypeParamDecl {
    pub name: String,
    /// Empty means `Object`; several bounds form an intersection.
    #[serde(default)]
    pub bounds: Vec<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    #[serde(default)]
    pub params: Vec<TypeExpr>,
    pub return_type: TypeExpr,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_varargs: bool,
    #[serde(default)]
    pub is_abstract: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default = "default_class_kind")]
    pub kind: ClassKind,
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    /// Defaults to `java.lang.Object` for classes; ignored for interfaces.
    #[serde(default)]
    pub super_class: Option<TypeExpr>,
    #[serde(default)]
    pub interfaces: Vec<TypeExpr>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

fn default_class_kind() -> ClassKind {
    ClassKind::Class
}

/// Source of class declarations, keyed by binary name.
pub trait DeclProvider {
    fn lookup_decl(&self, binary_name: &str) -> Option<&ClassDecl>;
}

impl DeclProvider for HashMap<String, ClassDecl> {
    fn lookup_decl(&self, binary_name: &str) -> Option<&ClassDecl> {
        self.get(binary_name)
    }
}

type Scope = Vec<(String, TypeVar)>;

/// Resolves [`ClassDecl`]s into a [`TypeSystem`] on demand.
///
/// Referenced classes are loaded recursively. A class that is being loaded is already interned,
/// so cyclic references between declarations (and F-bounds) resolve to its id.
pub struct DeclLoader<'a> {
    store: &'a mut TypeSystem,
    provider: &'a dyn DeclProvider,
    in_progress: HashSet<String>,
    loaded: HashSet<String>,
}

impl<'a> DeclLoader<'a> {
    pub fn new(store: &'a mut TypeSystem, provider: &'a dyn DeclProvider) -> Self {
        Self {
            store,
            provider,
            in_progress: HashSet::new(),
            loaded: HashSet::new(),
        }
    }

    /// Ensure `binary_name` is present in the store; returns its id if it is known.
    pub fn ensure_class(&mut self, binary_name: &str) -> Result<Option<ClassId>> {
        if self.loaded.contains(binary_name) || self.in_progress.contains(binary_name) {
            return Ok(self.store.lookup_class(binary_name));
        }

        let existing = self.store.lookup_class(binary_name);
        let provider = self.provider;
        let Some(decl) = provider.lookup_decl(binary_name) else {
            return Ok(existing);
        };

        let id = self.store.intern_class_id(binary_name);
        self.in_progress.insert(binary_name.to_string());
        let def = self.build_class_def(id, decl).map_err(|err| match err {
            // Errors from nested loads already name their own declaration.
            TypeError::UndeclaredTypeVariable { class, name } if class.is_empty() => {
                TypeError::UndeclaredTypeVariable {
                    class: binary_name.to_string(),
                    name,
                }
            }
            err => err,
        });
        self.in_progress.remove(binary_name);

        self.store.define_class(id, def?);
        self.loaded.insert(binary_name.to_string());
        tracing::debug!(target: "javelin.types.loader", class = binary_name, "loaded declaration");
        Ok(Some(id))
    }

    fn build_class_def(&mut self, id: ClassId, decl: &ClassDecl) -> Result<ClassDef> {
        let class_vars = self.declare_type_params(&decl.type_params, |idx| {
            TypeParamSymbol::of_class(id, idx)
        })?;
        let type_params = class_vars.iter().map(|(_, var)| *var).collect();

        let super_class = match decl.kind {
            ClassKind::Interface => None,
            ClassKind::Class if decl.name == "java.lang.Object" => None,
            ClassKind::Class => Some(match &decl.super_class {
                Some(expr) => self.resolve(expr, &class_vars, &[])?,
                None => self.store.object(),
            }),
        };
        let interfaces = decl
            .interfaces
            .iter()
            .map(|iface| self.resolve(iface, &class_vars, &[]))
            .collect::<Result<Vec<_>>>()?;

        let mut methods = Vec::with_capacity(decl.methods.len());
        for (idx, method) in decl.methods.iter().enumerate() {
            methods.push(self.method_def(MethodId::new(id, idx), method, &class_vars)?);
        }

        Ok(ClassDef {
            name: decl.name.clone(),
            kind: decl.kind,
            type_params,
            super_class,
            interfaces,
            methods,
        })
    }

    fn method_def(&mut self, id: MethodId, decl: &MethodDecl, class_vars: &[(String, TypeVar)]) -> Result<MethodDef> {
        let method_vars = self.declare_type_params_in(&decl.type_params, class_vars, |idx| {
            TypeParamSymbol::of_method(id, idx)
        })?;
        let params = decl
            .params
            .iter()
            .map(|param| self.resolve(param, class_vars, &method_vars))
            .collect::<Result<Vec<_>>>()?;
        let return_type = self.resolve(&decl.return_type, class_vars, &method_vars)?;

        Ok(MethodDef {
            name: decl.name.clone(),
            type_params: method_vars.iter().map(|(_, var)| *var).collect(),
            params,
            return_type,
            is_static: decl.is_static,
            is_varargs: decl.is_varargs,
            is_abstract: decl.is_abstract,
        })
    }

    fn declare_type_params(
        &mut self,
        decls: &[TypeParamDecl],
        symbol: impl Fn(u32) -> TypeParamSymbol,
    ) -> Result<Scope> {
        self.declare_type_params_in(decls, &[], symbol)
    }

    /// Two-pass allocation so self-referential bounds (`T extends Comparable<T>`) can resolve.
    fn declare_type_params_in(
        &mut self,
        decls: &[TypeParamDecl],
        outer: &[(String, TypeVar)],
        symbol: impl Fn(u32) -> TypeParamSymbol,
    ) -> Result<Scope> {
        let mut scope = Scope::with_capacity(decls.len());
        for (idx, decl) in decls.iter().enumerate() {
            let idx = u32::try_from(idx)
                .map_err(|_| TypeError::illegal_state("too many type parameters"))?;
            let var = self.store.declare_type_param(symbol(idx), decl.name.clone());
            scope.push((decl.name.clone(), var));
        }
        for (decl, (_, var)) in decls.iter().zip(&scope) {
            let bound = self.bound(&decl.bounds, outer, &scope)?;
            self.store.set_type_param_bound(*var, bound)?;
        }
        Ok(scope)
    }

    fn bound(
        &mut self,
        exprs: &[TypeExpr],
        outer: &[(String, TypeVar)],
        inner: &[(String, TypeVar)],
    ) -> Result<TypeMirror> {
        let bounds = exprs
            .iter()
            .map(|expr| self.resolve(expr, outer, inner))
            .collect::<Result<Vec<_>>>()?;
        if bounds.is_empty() {
            return Ok(self.store.object());
        }
        self.store.intersection(bounds)
    }

    /// `inner` shadows `outer`.
    fn resolve(
        &mut self,
        expr: &TypeExpr,
        outer: &[(String, TypeVar)],
        inner: &[(String, TypeVar)],
    ) -> Result<TypeMirror> {
        Ok(match expr {
            TypeExpr::Primitive { name } => self.store.primitive(*name),
            TypeExpr::Class { name, args } => {
                let id = self.class_ref(name)?;
                let args = args
                    .iter()
                    .map(|arg| self.resolve(arg, outer, inner))
                    .collect::<Result<Vec<_>>>()?;
                self.store.class_type(id, args)?
            }
            TypeExpr::Var { name } => {
                let var = inner
                    .iter()
                    .chain(outer)
                    .find(|(candidate, _)| candidate == name)
                    .map(|(_, var)| *var)
                    .ok_or_else(|| TypeError::UndeclaredTypeVariable {
                        class: String::new(),
                        name: name.clone(),
                    })?;
                TypeMirror::from(var)
            }
            TypeExpr::Array { component } => {
                let component = self.resolve(component, outer, inner)?;
                self.store.array(component)
            }
            TypeExpr::Wildcard { bound } => match bound {
                WildcardExpr::Unbounded => self.store.unbounded_wildcard(),
                WildcardExpr::Extends(upper) => {
                    let upper = self.resolve(upper, outer, inner)?;
                    self.store.wildcard_extends(upper)
                }
                WildcardExpr::Super(lower) => {
                    let lower = self.resolve(lower, outer, inner)?;
                    self.store.wildcard_super(lower)
                }
            },
        })
    }

    fn class_ref(&mut self, binary_name: &str) -> Result<ClassId> {
        if let Some(id) = self.ensure_class(binary_name)? {
            return Ok(id);
        }
        tracing::warn!(
            target: "javelin.types.loader",
            class = binary_name,
            "no declaration for referenced class; using a placeholder symbol"
        );
        Ok(self.store.intern_class_id(binary_name))
    }
}
