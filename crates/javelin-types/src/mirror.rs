use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifies a class or interface symbol registered in a [`crate::TypeSystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("too many classes in one type system"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A method symbol: the declaring class plus the method's position in that class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId {
    pub class: ClassId,
    pub index: u32,
}

impl MethodId {
    pub fn new(class: ClassId, index: usize) -> Self {
        Self {
            class,
            index: u32::try_from(index).expect("too many methods in one class"),
        }
    }
}

/// The generic construct that declares a type parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenericOwner {
    Class(ClassId),
    Method(MethodId),
}

/// Symbol of a declared type parameter: its owner and its position in the owner's formal list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamSymbol {
    pub owner: GenericOwner,
    pub index: u32,
}

impl TypeParamSymbol {
    pub fn of_class(class: ClassId, index: u32) -> Self {
        Self {
            owner: GenericOwner::Class(class),
            index,
        }
    }

    pub fn of_method(method: MethodId, index: u32) -> Self {
        Self {
            owner: GenericOwner::Method(method),
            index,
        }
    }
}

static NEXT_SCOPE: AtomicU32 = AtomicU32::new(1);

/// Allocation scopes keep type variable ids of different registries/contexts apart.
pub(crate) fn fresh_scope() -> u32 {
    NEXT_SCOPE.fetch_add(1, Ordering::Relaxed)
}

/// Arena slot of a type variable definition.
///
/// The scope names the registry or typing context that owns the slot; lookups through any
/// other environment miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId {
    scope: u32,
    index: u32,
}

impl TypeVarId {
    pub(crate) fn new(scope: u32, index: usize) -> Self {
        Self {
            scope,
            index: u32::try_from(index).expect("too many type variables in one scope"),
        }
    }

    pub(crate) fn scope(self) -> u32 {
        self.scope
    }

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Void,
    ];

    pub(crate) fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Boolean | PrimitiveKind::Void)
    }

    /// Primitive subtyping (JLS 4.10.1), reflexive.
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;

        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => target == Double,
            Boolean | Double | Void => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to a type variable.
///
/// The handle only carries what equality needs. Bounds, name and capture origin live in the
/// owning environment's arena (see [`crate::TypeEnv::type_var`]), which is what lets a bound
/// mention the variable itself without building a cyclic value.
#[derive(Clone, Copy, Debug)]
pub struct TypeVar {
    id: TypeVarId,
    symbol: Option<TypeParamSymbol>,
}

/// Equality key of a type variable: the declaring symbol for declared variables, the arena
/// slot for captured ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum VarIdentity {
    Symbol(TypeParamSymbol),
    Instance(TypeVarId),
}

impl TypeVar {
    pub(crate) fn declared(id: TypeVarId, symbol: TypeParamSymbol) -> Self {
        Self {
            id,
            symbol: Some(symbol),
        }
    }

    pub(crate) fn captured(id: TypeVarId) -> Self {
        Self { id, symbol: None }
    }

    pub fn id(self) -> TypeVarId {
        self.id
    }

    /// The declaring type parameter, or `None` for capture variables.
    pub fn symbol(self) -> Option<TypeParamSymbol> {
        self.symbol
    }

    pub fn is_captured(self) -> bool {
        self.symbol.is_none()
    }

    fn identity(self) -> VarIdentity {
        match self.symbol {
            Some(symbol) => VarIdentity::Symbol(symbol),
            None => VarIdentity::Instance(self.id),
        }
    }
}

impl PartialEq for TypeVar {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for TypeVar {}

impl Hash for TypeVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(TypeMirror),
    Super(TypeMirror),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub symbol: ClassId,
    /// Empty for raw or non-generic uses.
    pub args: Vec<TypeMirror>,
    /// Parameterization of the enclosing class for inner classes.
    pub enclosing: Option<TypeMirror>,
}

#[derive(Clone, Debug)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    Class(ClassType),
    Array(TypeMirror),
    Wildcard(WildcardBound),
    /// Never empty, never nested.
    Intersection(Vec<TypeMirror>),
    TypeVar(TypeVar),
    /// The type of `null`; the bottom of the reference types.
    Null,
    /// Stand-in for information the analysis could not recover.
    Unknown,
}

impl PartialEq for TypeKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeKind::Primitive(a), TypeKind::Primitive(b)) => a == b,
            (TypeKind::Class(a), TypeKind::Class(b)) => a == b,
            (TypeKind::Array(a), TypeKind::Array(b)) => a == b,
            (TypeKind::Wildcard(a), TypeKind::Wildcard(b)) => a == b,
            (TypeKind::Intersection(a), TypeKind::Intersection(b)) => {
                a.len() == b.len() && a.iter().all(|member| b.contains(member))
            }
            (TypeKind::TypeVar(a), TypeKind::TypeVar(b)) => a == b,
            (TypeKind::Null, TypeKind::Null) | (TypeKind::Unknown, TypeKind::Unknown) => true,
            _ => false,
        }
    }
}

impl Eq for TypeKind {}

impl Hash for TypeKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TypeKind::Primitive(kind) => kind.hash(state),
            TypeKind::Class(class) => class.hash(state),
            TypeKind::Array(component) => component.hash(state),
            TypeKind::Wildcard(bound) => bound.hash(state),
            TypeKind::Intersection(members) => {
                // Member order is not significant for equality.
                let combined = members.iter().fold(0u64, |acc, member| {
                    let mut hasher = DefaultHasher::new();
                    member.hash(&mut hasher);
                    acc.wrapping_add(hasher.finish())
                });
                members.len().hash(state);
                combined.hash(state);
            }
            TypeKind::TypeVar(var) => var.hash(state),
            TypeKind::Null | TypeKind::Unknown => {}
        }
    }
}

/// An immutable semantic type.
///
/// Cloning is cheap and preserves instance identity, observable through
/// [`TypeMirror::same_instance`]. Operations that leave a type unchanged hand back the very
/// same instance.
#[derive(Clone)]
pub struct TypeMirror(Arc<TypeKind>);

impl TypeMirror {
    pub(crate) fn new(kind: TypeKind) -> Self {
        Self(Arc::new(kind))
    }

    pub(crate) fn class(symbol: ClassId, args: Vec<TypeMirror>, enclosing: Option<TypeMirror>) -> Self {
        Self::new(TypeKind::Class(ClassType {
            symbol,
            args,
            enclosing,
        }))
    }

    pub(crate) fn array(component: TypeMirror) -> Self {
        Self::new(TypeKind::Array(component))
    }

    pub(crate) fn wildcard(bound: WildcardBound) -> Self {
        Self::new(TypeKind::Wildcard(bound))
    }

    /// Builds an intersection from non-empty `members`, flattening nested intersections and
    /// dropping duplicates. A single remaining member is returned as is.
    pub(crate) fn intersection_of(members: Vec<TypeMirror>) -> Self {
        let mut flat: Vec<TypeMirror> = Vec::with_capacity(members.len());
        for member in members {
            match member.kind() {
                TypeKind::Intersection(inner) => {
                    for part in inner {
                        if !flat.contains(part) {
                            flat.push(part.clone());
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }
        if flat.len() == 1 {
            if let Some(only) = flat.pop() {
                return only;
            }
        }
        Self::new(TypeKind::Intersection(flat))
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    /// Reference identity, as opposed to `==`.
    pub fn same_instance(&self, other: &TypeMirror) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind(), TypeKind::Primitive(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind(), TypeKind::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind(), TypeKind::Unknown)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind(), TypeKind::Wildcard(_))
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self.kind() {
            TypeKind::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self.kind() {
            TypeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_array_component(&self) -> Option<&TypeMirror> {
        match self.kind() {
            TypeKind::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&WildcardBound> {
        match self.kind() {
            TypeKind::Wildcard(bound) => Some(bound),
            _ => None,
        }
    }

    pub fn as_type_var(&self) -> Option<TypeVar> {
        match self.kind() {
            TypeKind::TypeVar(var) => Some(*var),
            _ => None,
        }
    }

    pub fn intersection_members(&self) -> Option<&[TypeMirror]> {
        match self.kind() {
            TypeKind::Intersection(members) => Some(members),
            _ => None,
        }
    }

    /// `true` for class types with at least one wildcard type argument.
    pub fn has_wildcard_args(&self) -> bool {
        self.as_class()
            .is_some_and(|class| class.args.iter().any(TypeMirror::is_wildcard))
    }
}

impl PartialEq for TypeMirror {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || *self.0 == *other.0
    }
}

impl Eq for TypeMirror {}

impl Hash for TypeMirror {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for TypeMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<TypeVar> for TypeMirror {
    fn from(var: TypeVar) -> Self {
        TypeMirror::new(TypeKind::TypeVar(var))
    }
}
