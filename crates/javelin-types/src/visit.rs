use crate::{ClassType, PrimitiveKind, TypeKind, TypeMirror, TypeVar, WildcardBound};

/// Double-dispatch visitor over every [`TypeMirror`] variant.
///
/// Only [`TypeVisitor::visit`] is required; each variant hook defaults to it, so visitors
/// override just the variants they care about.
pub trait TypeVisitor<P> {
    type Output;

    /// Fallback for variants without a dedicated override.
    fn visit(&mut self, ty: &TypeMirror, param: P) -> Self::Output;

    fn visit_primitive(&mut self, ty: &TypeMirror, _kind: PrimitiveKind, param: P) -> Self::Output {
        self.visit(ty, param)
    }

    fn visit_class(&mut self, ty: &TypeMirror, _class: &ClassType, param: P) -> Self::Output {
        self.visit(ty, param)
    }

    fn visit_array(&mut self, ty: &TypeMirror, _component: &TypeMirror, param: P) -> Self::Output {
        self.visit(ty, param)
    }

    fn visit_wildcard(&mut self, ty: &TypeMirror, _bound: &WildcardBound, param: P) -> Self::Output {
        self.visit(ty, param)
    }

    fn visit_intersection(
        &mut self,
        ty: &TypeMirror,
        _members: &[TypeMirror],
        param: P,
    ) -> Self::Output {
        self.visit(ty, param)
    }

    fn visit_type_var(&mut self, ty: &TypeMirror, _var: TypeVar, param: P) -> Self::Output {
        self.visit(ty, param)
    }

    fn visit_null(&mut self, ty: &TypeMirror, param: P) -> Self::Output {
        self.visit(ty, param)
    }

    fn visit_unknown(&mut self, ty: &TypeMirror, param: P) -> Self::Output {
        self.visit(ty, param)
    }
}

impl TypeMirror {
    pub fn accept<P, V>(&self, visitor: &mut V, param: P) -> V::Output
    where
        V: TypeVisitor<P> + ?Sized,
    {
        match self.kind() {
            TypeKind::Primitive(kind) => visitor.visit_primitive(self, *kind, param),
            TypeKind::Class(class) => visitor.visit_class(self, class, param),
            TypeKind::Array(component) => visitor.visit_array(self, component, param),
            TypeKind::Wildcard(bound) => visitor.visit_wildcard(self, bound, param),
            TypeKind::Intersection(members) => visitor.visit_intersection(self, members, param),
            TypeKind::TypeVar(var) => visitor.visit_type_var(self, *var, param),
            TypeKind::Null => visitor.visit_null(self, param),
            TypeKind::Unknown => visitor.visit_unknown(self, param),
        }
    }
}
