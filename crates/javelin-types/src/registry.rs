use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    fresh_scope, ClassId, PrimitiveKind, Result, TypeEnv, TypeError, TypeMirror, TypeParamSymbol,
    TypeSystemOptions, TypeVar, TypeVarId, WildcardBound,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVar>,
    pub super_class: Option<TypeMirror>,
    pub interfaces: Vec<TypeMirror>,
    pub methods: Vec<MethodDef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeVar>,
    pub params: Vec<TypeMirror>,
    pub return_type: TypeMirror,
    pub is_static: bool,
    pub is_varargs: bool,
    pub is_abstract: bool,
}

/// Where a type variable comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum VarOrigin {
    Declared(TypeParamSymbol),
    /// Holds the exact wildcard instance the variable was captured from.
    Captured(TypeMirror),
}

/// Arena entry for a type variable: everything about it except its equality key.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeVarDef {
    name: String,
    origin: VarOrigin,
    upper: TypeMirror,
    lower: TypeMirror,
    annotations: Vec<ClassId>,
}

impl TypeVarDef {
    pub(crate) fn new(
        name: impl Into<String>,
        origin: VarOrigin,
        upper: TypeMirror,
        lower: TypeMirror,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            upper,
            lower,
            annotations: Vec::new(),
        }
    }

    /// Source name for declared variables, `CAP#<n>` for captures.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &VarOrigin {
        &self.origin
    }

    pub fn upper_bound(&self) -> &TypeMirror {
        &self.upper
    }

    pub fn lower_bound(&self) -> &TypeMirror {
        &self.lower
    }

    /// Type annotations carried by this variable. They never take part in equality.
    pub fn annotations(&self) -> &[ClassId] {
        &self.annotations
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.origin, VarOrigin::Captured(_))
    }

    pub(crate) fn handle(&self, id: TypeVarId) -> TypeVar {
        match self.origin {
            VarOrigin::Declared(symbol) => TypeVar::declared(id, symbol),
            VarOrigin::Captured(_) => TypeVar::captured(id),
        }
    }

    pub(crate) fn with_bounds(&self, upper: TypeMirror, lower: TypeMirror) -> Self {
        Self {
            name: self.name.clone(),
            origin: self.origin.clone(),
            upper,
            lower,
            annotations: self.annotations.clone(),
        }
    }

    pub(crate) fn with_annotations(&self, annotations: Vec<ClassId>) -> Self {
        Self {
            annotations,
            ..self.clone()
        }
    }

    pub(crate) fn set_bounds(&mut self, upper: TypeMirror, lower: TypeMirror) {
        self.upper = upper;
        self.lower = lower;
    }
}

/// Class ids every registry interns up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub boolean: ClassId,
    pub byte: ClassId,
    pub short: ClassId,
    pub character: ClassId,
    pub integer: ClassId,
    pub long: ClassId,
    pub float: ClassId,
    pub double: ClassId,
}

impl WellKnownTypes {
    /// Boxing conversion target of a primitive kind.
    pub fn box_class(&self, kind: PrimitiveKind) -> Option<ClassId> {
        Some(match kind {
            PrimitiveKind::Boolean => self.boolean,
            PrimitiveKind::Byte => self.byte,
            PrimitiveKind::Short => self.short,
            PrimitiveKind::Char => self.character,
            PrimitiveKind::Int => self.integer,
            PrimitiveKind::Long => self.long,
            PrimitiveKind::Float => self.float,
            PrimitiveKind::Double => self.double,
            PrimitiveKind::Void => return None,
        })
    }

    /// Unboxing conversion source: the primitive kind boxed by `class`.
    pub fn unboxed(&self, class: ClassId) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| self.box_class(*kind) == Some(class))
    }
}

/// Canonical instances shared by every type built from one registry.
#[derive(Clone, Debug)]
pub struct CommonTypes {
    /// `java.lang.Object`, the top type.
    pub object: TypeMirror,
    /// The bottom type.
    pub null: TypeMirror,
    pub unknown: TypeMirror,
    pub unbounded_wildcard: TypeMirror,
    primitives: Vec<TypeMirror>,
}

impl CommonTypes {
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeMirror {
        self.primitives[kind.ordinal()].clone()
    }
}

#[derive(Clone, Debug)]
struct ClassSlot {
    name: String,
    def: Option<ClassDef>,
    raw: TypeMirror,
}

fn intern_slot(
    classes: &mut Vec<ClassSlot>,
    names: &mut HashMap<String, ClassId>,
    name: &str,
) -> ClassId {
    if let Some(id) = names.get(name) {
        return *id;
    }
    let id = ClassId::from_index(classes.len());
    classes.push(ClassSlot {
        name: name.to_string(),
        def: None,
        raw: TypeMirror::class(id, Vec::new(), None),
    });
    names.insert(name.to_string(), id);
    id
}

/// The type-system registry of one analysis run.
///
/// Owns class symbols, declared type parameters and the canonical type instances. The
/// registry is populated through `&mut self` and only read afterwards; once built it can be
/// shared (`&TypeSystem` or `Arc<TypeSystem>`) between worker threads, each of which layers its
/// own [`crate::TyContext`] on top for per-pass allocations.
///
/// A clone allocates under a new scope. It still resolves the type parameters it inherited,
/// but parameters declared afterwards in the original or in a sibling clone stay foreign.
#[derive(Debug)]
pub struct TypeSystem {
    scope: u32,
    /// Ancestor scopes and the arena prefix each of them owned at the time of cloning.
    inherited: Vec<(u32, usize)>,
    options: TypeSystemOptions,
    classes: Vec<ClassSlot>,
    class_names: HashMap<String, ClassId>,
    type_vars: Vec<TypeVarDef>,
    well_known: WellKnownTypes,
    common: CommonTypes,
}

impl Clone for TypeSystem {
    fn clone(&self) -> Self {
        let mut inherited = self.inherited.clone();
        inherited.push((self.scope, self.type_vars.len()));
        Self {
            scope: fresh_scope(),
            inherited,
            options: self.options.clone(),
            classes: self.classes.clone(),
            class_names: self.class_names.clone(),
            type_vars: self.type_vars.clone(),
            well_known: self.well_known.clone(),
            common: self.common.clone(),
        }
    }
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSystem {
    /// A registry knowing only `Object`, `Cloneable` and `Serializable`. The other well-known
    /// classes are interned but left undefined.
    pub fn new() -> Self {
        let mut classes = Vec::new();
        let mut class_names = HashMap::new();
        let mut intern = |name: &str| intern_slot(&mut classes, &mut class_names, name);

        let well_known = WellKnownTypes {
            object: intern("java.lang.Object"),
            cloneable: intern("java.lang.Cloneable"),
            serializable: intern("java.io.Serializable"),
            string: intern("java.lang.String"),
            number: intern("java.lang.Number"),
            boolean: intern("java.lang.Boolean"),
            byte: intern("java.lang.Byte"),
            short: intern("java.lang.Short"),
            character: intern("java.lang.Character"),
            integer: intern("java.lang.Integer"),
            long: intern("java.lang.Long"),
            float: intern("java.lang.Float"),
            double: intern("java.lang.Double"),
        };

        let common = CommonTypes {
            object: classes[well_known.object.index()].raw.clone(),
            null: TypeMirror::new(crate::TypeKind::Null),
            unknown: TypeMirror::new(crate::TypeKind::Unknown),
            unbounded_wildcard: TypeMirror::wildcard(WildcardBound::Unbounded),
            primitives: PrimitiveKind::ALL
                .into_iter()
                .map(|kind| TypeMirror::new(crate::TypeKind::Primitive(kind)))
                .collect(),
        };

        let mut ts = Self {
            scope: fresh_scope(),
            inherited: Vec::new(),
            options: TypeSystemOptions::default(),
            classes,
            class_names,
            type_vars: Vec::new(),
            well_known,
            common,
        };

        let object = ts.well_known.object;
        ts.define_class(
            object,
            ClassDef {
                name: "java.lang.Object".to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: None,
                interfaces: vec![],
                methods: vec![],
            },
        );
        for (id, name) in [
            (ts.well_known.cloneable, "java.lang.Cloneable"),
            (ts.well_known.serializable, "java.io.Serializable"),
        ] {
            ts.define_class(
                id,
                ClassDef {
                    name: name.to_string(),
                    kind: ClassKind::Interface,
                    type_params: vec![],
                    super_class: None,
                    interfaces: vec![],
                    methods: vec![],
                },
            );
        }
        ts
    }

    pub fn with_options(mut self, options: TypeSystemOptions) -> Self {
        self.options = options;
        self
    }

    /// Reserve a class id for `name` without defining the class, so that declarations can
    /// refer to it (including from its own type-parameter bounds) before it is complete.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        intern_slot(&mut self.classes, &mut self.class_names, name)
    }

    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        if let Some(slot) = self.classes.get_mut(id.index()) {
            slot.def = Some(def);
        }
    }

    /// Intern and define in one step. Redefining an existing name keeps its id.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn owns(&self, id: TypeVarId) -> bool {
        if id.scope() == self.scope {
            return id.index() < self.type_vars.len();
        }
        self.inherited
            .iter()
            .any(|&(scope, len)| scope == id.scope() && id.index() < len)
    }

    pub fn type_param_count(&self) -> usize {
        self.type_vars.len()
    }

    /// Mint the handle for a formal type parameter before its bound is known.
    ///
    /// The bound starts out as `Object`; patch it with [`TypeSystem::set_type_param_bound`]
    /// once every parameter it may mention has a handle.
    pub fn declare_type_param(&mut self, symbol: TypeParamSymbol, name: impl Into<String>) -> TypeVar {
        let def = TypeVarDef::new(
            name,
            crate::VarOrigin::Declared(symbol),
            self.common.object.clone(),
            self.common.null.clone(),
        );
        let id = TypeVarId::new(self.scope, self.type_vars.len());
        self.type_vars.push(def);
        TypeVar::declared(id, symbol)
    }

    pub fn add_type_param(
        &mut self,
        symbol: TypeParamSymbol,
        name: impl Into<String>,
        upper: TypeMirror,
    ) -> TypeVar {
        let var = self.declare_type_param(symbol, name);
        self.install_upper_bound(var, upper);
        var
    }

    /// Patch a variable this registry just declared; no ownership checks.
    pub(crate) fn install_upper_bound(&mut self, var: TypeVar, upper: TypeMirror) {
        let null = self.common.null.clone();
        if let Some(def) = self.type_vars.get_mut(var.id().index()) {
            def.set_bounds(upper, null);
        }
    }

    /// Second pass of type-parameter construction: install the resolved upper bound.
    pub fn set_type_param_bound(&mut self, var: TypeVar, upper: TypeMirror) -> Result<()> {
        if !self.owns(var.id()) {
            return Err(TypeError::illegal_state(
                "type variable does not belong to this type system",
            ));
        }
        let null = self.common.null.clone();
        let def = self
            .type_vars
            .get_mut(var.id().index())
            .ok_or_else(|| TypeError::illegal_state("unknown type variable"))?;
        match def.origin() {
            crate::VarOrigin::Declared(symbol) if var.symbol() == Some(*symbol) => {
                def.set_bounds(upper, null);
                Ok(())
            }
            _ => Err(TypeError::illegal_state(
                "only declared type parameters have registry-assigned bounds",
            )),
        }
    }

    /// Parameterize `class` with `args`. No arguments yields the canonical raw type.
    ///
    /// Arity is only checked for defined classes: a class that is merely interned may still be
    /// in the middle of its own construction.
    pub fn class_type(&self, class: ClassId, args: Vec<TypeMirror>) -> Result<TypeMirror> {
        if args.is_empty() {
            return Ok(self.raw_type(class));
        }
        self.check_arity(class, args.len())?;
        Ok(TypeMirror::class(class, args, None))
    }

    /// Parameterization of an inner class seen through a parameterized enclosing type.
    pub fn member_type(
        &self,
        enclosing: TypeMirror,
        class: ClassId,
        args: Vec<TypeMirror>,
    ) -> Result<TypeMirror> {
        if !args.is_empty() {
            self.check_arity(class, args.len())?;
        }
        Ok(TypeMirror::class(class, args, Some(enclosing)))
    }

    fn check_arity(&self, class: ClassId, found: usize) -> Result<()> {
        if let Some(def) = self.class(class) {
            if def.type_params.len() != found {
                return Err(TypeError::ArityMismatch {
                    class: def.name.clone(),
                    expected: def.type_params.len(),
                    found,
                });
            }
        }
        Ok(())
    }

    /// The generic declaration viewed as a type, e.g. `List<E>` for `List`.
    pub fn declaration_type(&self, class: ClassId) -> TypeMirror {
        match self.class(class) {
            Some(def) if !def.type_params.is_empty() => TypeMirror::class(
                class,
                def.type_params.iter().copied().map(TypeMirror::from).collect(),
                None,
            ),
            _ => self.raw_type(class),
        }
    }

    pub fn array(&self, component: TypeMirror) -> TypeMirror {
        TypeMirror::array(component)
    }

    pub fn array_of(&self, component: TypeMirror, dimensions: usize) -> TypeMirror {
        (0..dimensions).fold(component, |ty, _| TypeMirror::array(ty))
    }

    pub fn wildcard_extends(&self, bound: TypeMirror) -> TypeMirror {
        TypeMirror::wildcard(WildcardBound::Extends(bound))
    }

    pub fn wildcard_super(&self, bound: TypeMirror) -> TypeMirror {
        TypeMirror::wildcard(WildcardBound::Super(bound))
    }

    pub fn unbounded_wildcard(&self) -> TypeMirror {
        self.common.unbounded_wildcard.clone()
    }

    /// Intersection of `members`, flattened. A single member is returned unwrapped.
    pub fn intersection(&self, members: Vec<TypeMirror>) -> Result<TypeMirror> {
        if members.is_empty() {
            return Err(TypeError::illegal_state(
                "an intersection type needs at least one member",
            ));
        }
        Ok(TypeMirror::intersection_of(members))
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> TypeMirror {
        self.common.primitive(kind)
    }

    pub fn null_type(&self) -> TypeMirror {
        self.common.null.clone()
    }

    pub fn unknown(&self) -> TypeMirror {
        self.common.unknown.clone()
    }

    pub fn object(&self) -> TypeMirror {
        self.common.object.clone()
    }
}

impl TypeEnv for TypeSystem {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())?.def.as_ref()
    }

    fn class_name(&self, id: ClassId) -> Option<&str> {
        self.classes.get(id.index()).map(|slot| slot.name.as_str())
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    fn raw_type(&self, id: ClassId) -> TypeMirror {
        match self.classes.get(id.index()) {
            Some(slot) => slot.raw.clone(),
            None => self.common.unknown.clone(),
        }
    }

    fn type_var(&self, id: TypeVarId) -> Option<&TypeVarDef> {
        if !self.owns(id) {
            return None;
        }
        self.type_vars.get(id.index())
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    fn common(&self) -> &CommonTypes {
        &self.common
    }

    fn options(&self) -> &TypeSystemOptions {
        &self.options
    }
}
