use javelin_types::{
    ClassDef, ClassId, ClassKind, TypeEnv, TypeMirror, TypeParamSymbol, TypeSystem, TypeVar,
};

/// Declares `class <name><T extends <bound>>` in `ts` and returns the class and its parameter.
pub fn declare_bounded_class(
    ts: &mut TypeSystem,
    name: &str,
    bound: impl FnOnce(&TypeSystem, ClassId, TypeVar) -> TypeMirror,
) -> (ClassId, TypeVar) {
    let id = ts.intern_class_id(name);
    let t = ts.declare_type_param(TypeParamSymbol::of_class(id, 0), "T");
    let upper = bound(&*ts, id, t);
    ts.set_type_param_bound(t, upper)
        .expect("fresh declared parameter accepts a bound");
    let object = ts.object();
    ts.define_class(
        id,
        ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            type_params: vec![t],
            super_class: Some(object),
            interfaces: vec![],
            methods: vec![],
        },
    );
    (id, t)
}

pub fn class(ts: &TypeSystem, name: &str) -> ClassId {
    ts.lookup_class(name)
        .unwrap_or_else(|| panic!("minimal JDK should define {name}"))
}

pub fn raw(ts: &TypeSystem, name: &str) -> TypeMirror {
    ts.raw_type(class(ts, name))
}

/// Declares `class Outer<T> { class Inner<U extends T> {} }` and returns both classes.
pub fn declare_outer_with_inner(ts: &mut TypeSystem) -> (ClassId, ClassId) {
    let object = ts.object();
    let outer = ts.intern_class_id("com.example.Outer");
    let t = ts.add_type_param(TypeParamSymbol::of_class(outer, 0), "T", object.clone());
    ts.define_class(
        outer,
        ClassDef {
            name: "com.example.Outer".to_string(),
            kind: ClassKind::Class,
            type_params: vec![t],
            super_class: Some(object.clone()),
            interfaces: vec![],
            methods: vec![],
        },
    );

    let inner = ts.intern_class_id("com.example.Outer$Inner");
    let u = ts.add_type_param(TypeParamSymbol::of_class(inner, 0), "U", TypeMirror::from(t));
    ts.define_class(
        inner,
        ClassDef {
            name: "com.example.Outer$Inner".to_string(),
            kind: ClassKind::Class,
            type_params: vec![u],
            super_class: Some(object),
            interfaces: vec![],
            methods: vec![],
        },
    );
    (outer, inner)
}
