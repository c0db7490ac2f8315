use std::fmt;

use crate::{TypeEnv, TypeKind, TypeMirror, WildcardBound};

/// Java-like rendering of a type, resolving names through an environment.
pub struct TypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    ty: &'a TypeMirror,
}

impl TypeMirror {
    /// e.g. `java.util.List<? extends java.lang.Number>`, `CAP#1`, `int[]`.
    pub fn display<'a>(&'a self, env: &'a dyn TypeEnv) -> TypeDisplay<'a> {
        TypeDisplay { env, ty: self }
    }
}

impl TypeDisplay<'_> {
    fn write(&self, f: &mut fmt::Formatter<'_>, ty: &TypeMirror) -> fmt::Result {
        match ty.kind() {
            TypeKind::Primitive(kind) => write!(f, "{kind}"),
            TypeKind::Class(class) => {
                let name = self.env.class_name(class.symbol).unwrap_or("<unresolved>");
                match &class.enclosing {
                    Some(outer) => {
                        self.write(f, outer)?;
                        let simple = name.rsplit(|c: char| c == '.' || c == '$').next().unwrap_or(name);
                        write!(f, ".{simple}")?;
                    }
                    None => f.write_str(name)?,
                }
                if !class.args.is_empty() {
                    f.write_str("<")?;
                    self.write_list(f, &class.args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeKind::Array(component) => {
                self.write(f, component)?;
                f.write_str("[]")
            }
            TypeKind::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            TypeKind::Wildcard(WildcardBound::Extends(upper)) => {
                f.write_str("? extends ")?;
                self.write(f, upper)
            }
            TypeKind::Wildcard(WildcardBound::Super(lower)) => {
                f.write_str("? super ")?;
                self.write(f, lower)
            }
            TypeKind::Intersection(members) => self.write_list(f, members, " & "),
            TypeKind::TypeVar(var) => {
                f.write_str(self.env.type_var_name(*var).unwrap_or("<unresolved type variable>"))
            }
            TypeKind::Null => f.write_str("null"),
            TypeKind::Unknown => f.write_str("<unknown>"),
        }
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, types: &[TypeMirror], sep: &str) -> fmt::Result {
        for (idx, ty) in types.iter().enumerate() {
            if idx > 0 {
                f.write_str(sep)?;
            }
            self.write(f, ty)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.ty)
    }
}
