//! Semantic type model for Javelin's Java analyzers.
//!
//! Types are immutable [`TypeMirror`] values built by a [`TypeSystem`] registry. Type variables
//! are small handles into an arena: the registry owns declared type parameters, and a per-pass
//! [`TyContext`] owns the variables minted by capture conversion and bound derivations. Bounds
//! live in the arena rather than in the handle, which is what keeps F-bounded declarations such
//! as `Enum<E extends Enum<E>>` finite.
//!
//! Equality is structural, except for captured variables, which are only equal to themselves.

#![forbid(unsafe_code)]

mod capture;
mod env;
mod erasure;
mod error;
mod format;
mod jdk;
mod loader;
mod methods;
mod mirror;
mod options;
mod registry;
mod subst;
mod subtyping;
mod type_var;
mod visit;

pub use env::{TyContext, TypeEnv};
pub use erasure::erasure;
pub use error::{Result, TypeError};
pub use format::TypeDisplay;
pub use loader::{
    ClassDecl, DeclLoader, DeclProvider, MethodDecl, TypeExpr, TypeParamDecl, WildcardExpr,
};
pub use methods::{stream_methods, MethodSig, MethodStream, MethodSymbol};
pub(crate) use mirror::fresh_scope;
pub use mirror::{
    ClassId, ClassType, GenericOwner, MethodId, PrimitiveKind, TypeKind, TypeMirror,
    TypeParamSymbol, TypeVar, TypeVarId, WildcardBound,
};
pub use options::TypeSystemOptions;
pub use registry::{
    ClassDef, ClassKind, CommonTypes, MethodDef, TypeSystem, TypeVarDef, VarOrigin, WellKnownTypes,
};
pub use subst::Substitution;
pub use subtyping::{as_super, glb, is_assignable, is_same_type, is_subtype};
pub use visit::TypeVisitor;
