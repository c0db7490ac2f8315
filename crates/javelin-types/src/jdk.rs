use crate::{
    ClassDef, ClassId, ClassKind, MethodDef, MethodId, PrimitiveKind, TypeEnv, TypeMirror,
    TypeParamSymbol, TypeSystem, TypeVar,
};

fn generic(class: ClassId, args: Vec<TypeMirror>) -> TypeMirror {
    TypeMirror::class(class, args, None)
}

fn var(var: TypeVar) -> TypeMirror {
    TypeMirror::from(var)
}

fn method(name: &str, params: Vec<TypeMirror>, return_type: TypeMirror) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        type_params: vec![],
        params,
        return_type,
        is_static: false,
        is_varargs: false,
        is_abstract: false,
    }
}

fn abstract_method(name: &str, params: Vec<TypeMirror>, return_type: TypeMirror) -> MethodDef {
    MethodDef {
        is_abstract: true,
        ..method(name, params, return_type)
    }
}

fn class_def(
    name: &str,
    kind: ClassKind,
    type_params: Vec<TypeVar>,
    super_class: Option<TypeMirror>,
    interfaces: Vec<TypeMirror>,
    methods: Vec<MethodDef>,
) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind,
        type_params,
        super_class,
        interfaces,
        methods,
    }
}

impl TypeSystem {
    /// A registry pre-populated with the handful of `java.lang` / `java.util` declarations the
    /// type rules themselves depend on (boxing, `Comparable`, collections, `Enum`).
    ///
    /// Intended for tests and for analyzers running without a real class path.
    pub fn with_minimal_jdk() -> Self {
        let mut ts = TypeSystem::new();
        let wk = ts.well_known().clone();

        let object = ts.object();
        let boolean = ts.primitive(PrimitiveKind::Boolean);
        let int = ts.primitive(PrimitiveKind::Int);
        let long = ts.primitive(PrimitiveKind::Long);
        let double = ts.primitive(PrimitiveKind::Double);
        let void = ts.primitive(PrimitiveKind::Void);
        let string = ts.raw_type(wk.string);
        let serializable = ts.raw_type(wk.serializable);
        let cloneable = ts.raw_type(wk.cloneable);

        ts.define_class(
            wk.object,
            class_def(
                "java.lang.Object",
                ClassKind::Class,
                vec![],
                None,
                vec![],
                vec![
                    method("equals", vec![object.clone()], boolean.clone()),
                    method("hashCode", vec![], int.clone()),
                    method("toString", vec![], string.clone()),
                ],
            ),
        );

        // interface Comparable<T>
        let comparable = ts.intern_class_id("java.lang.Comparable");
        let cmp_t = ts.add_type_param(TypeParamSymbol::of_class(comparable, 0), "T", object.clone());
        ts.define_class(
            comparable,
            class_def(
                "java.lang.Comparable",
                ClassKind::Interface,
                vec![cmp_t],
                None,
                vec![],
                vec![abstract_method("compareTo", vec![var(cmp_t)], int.clone())],
            ),
        );

        ts.define_class(
            wk.string,
            class_def(
                "java.lang.String",
                ClassKind::Class,
                vec![],
                Some(object.clone()),
                vec![serializable.clone(), generic(comparable, vec![string.clone()])],
                vec![
                    method("length", vec![], int.clone()),
                    method("isEmpty", vec![], boolean.clone()),
                    method("compareTo", vec![string.clone()], int.clone()),
                ],
            ),
        );

        let number = ts.raw_type(wk.number);
        ts.define_class(
            wk.number,
            class_def(
                "java.lang.Number",
                ClassKind::Class,
                vec![],
                Some(object.clone()),
                vec![serializable.clone()],
                vec![
                    abstract_method("intValue", vec![], int.clone()),
                    abstract_method("longValue", vec![], long.clone()),
                    abstract_method("doubleValue", vec![], double.clone()),
                ],
            ),
        );

        for kind in PrimitiveKind::ALL {
            let Some(id) = wk.box_class(kind) else {
                continue;
            };
            let Some(name) = ts.class_name(id).map(str::to_string) else {
                continue;
            };
            let boxed = ts.raw_type(id);
            let numeric = kind.is_numeric();
            let super_class = if numeric { number.clone() } else { object.clone() };
            let value_method = format!("{}Value", kind.name());
            let value_type = ts.primitive(kind);
            ts.define_class(
                id,
                class_def(
                    &name,
                    ClassKind::Class,
                    vec![],
                    Some(super_class),
                    vec![serializable.clone(), generic(comparable, vec![boxed.clone()])],
                    vec![
                        method(&value_method, vec![], value_type),
                        method("compareTo", vec![boxed], int.clone()),
                    ],
                ),
            );
        }

        // Iterable / Iterator refer to each other.
        let iterable = ts.intern_class_id("java.lang.Iterable");
        let iterator = ts.intern_class_id("java.util.Iterator");

        let iter_e = ts.add_type_param(TypeParamSymbol::of_class(iterator, 0), "E", object.clone());
        ts.define_class(
            iterator,
            class_def(
                "java.util.Iterator",
                ClassKind::Interface,
                vec![iter_e],
                None,
                vec![],
                vec![
                    abstract_method("hasNext", vec![], boolean.clone()),
                    abstract_method("next", vec![], var(iter_e)),
                ],
            ),
        );

        let iterable_t = ts.add_type_param(TypeParamSymbol::of_class(iterable, 0), "T", object.clone());
        ts.define_class(
            iterable,
            class_def(
                "java.lang.Iterable",
                ClassKind::Interface,
                vec![iterable_t],
                None,
                vec![],
                vec![abstract_method(
                    "iterator",
                    vec![],
                    generic(iterator, vec![var(iterable_t)]),
                )],
            ),
        );

        // interface Collection<E> extends Iterable<E>
        let collection = ts.intern_class_id("java.util.Collection");
        let coll_e = ts.add_type_param(TypeParamSymbol::of_class(collection, 0), "E", object.clone());
        ts.define_class(
            collection,
            class_def(
                "java.util.Collection",
                ClassKind::Interface,
                vec![coll_e],
                None,
                vec![generic(iterable, vec![var(coll_e)])],
                vec![
                    abstract_method("size", vec![], int.clone()),
                    abstract_method("isEmpty", vec![], boolean.clone()),
                    abstract_method("add", vec![var(coll_e)], boolean.clone()),
                ],
            ),
        );

        // interface List<E> extends Collection<E>
        let list = ts.intern_class_id("java.util.List");
        let list_e = ts.add_type_param(TypeParamSymbol::of_class(list, 0), "E", object.clone());
        ts.define_class(
            list,
            class_def(
                "java.util.List",
                ClassKind::Interface,
                vec![list_e],
                None,
                vec![generic(collection, vec![var(list_e)])],
                vec![
                    abstract_method("get", vec![int.clone()], var(list_e)),
                    abstract_method("add", vec![var(list_e)], boolean.clone()),
                    abstract_method("set", vec![int.clone(), var(list_e)], var(list_e)),
                ],
            ),
        );

        // class ArrayList<E> implements List<E>, Cloneable, Serializable
        let array_list = ts.intern_class_id("java.util.ArrayList");
        let al_e = ts.add_type_param(TypeParamSymbol::of_class(array_list, 0), "E", object.clone());
        ts.define_class(
            array_list,
            class_def(
                "java.util.ArrayList",
                ClassKind::Class,
                vec![al_e],
                Some(object.clone()),
                vec![
                    generic(list, vec![var(al_e)]),
                    cloneable.clone(),
                    serializable.clone(),
                ],
                vec![
                    method("get", vec![int.clone()], var(al_e)),
                    method("add", vec![var(al_e)], boolean.clone()),
                    method("size", vec![], int.clone()),
                ],
            ),
        );

        // abstract class Enum<E extends Enum<E>> implements Comparable<E>, Serializable
        let enum_ = ts.intern_class_id("java.lang.Enum");
        let enum_e = ts.declare_type_param(TypeParamSymbol::of_class(enum_, 0), "E");
        let enum_bound = generic(enum_, vec![var(enum_e)]);
        ts.install_upper_bound(enum_e, enum_bound);
        ts.define_class(
            enum_,
            class_def(
                "java.lang.Enum",
                ClassKind::Class,
                vec![enum_e],
                Some(object.clone()),
                vec![generic(comparable, vec![var(enum_e)]), serializable],
                vec![
                    method("name", vec![], string.clone()),
                    method("ordinal", vec![], int.clone()),
                    method("compareTo", vec![var(enum_e)], int),
                ],
            ),
        );

        // interface Function<T, R> { R apply(T); <V> Function<T, V> andThen(Function<? super R, ? extends V>); }
        let function = ts.intern_class_id("java.util.function.Function");
        let fn_t = ts.add_type_param(TypeParamSymbol::of_class(function, 0), "T", object.clone());
        let fn_r = ts.add_type_param(TypeParamSymbol::of_class(function, 1), "R", object.clone());
        let and_then_v = ts.add_type_param(
            TypeParamSymbol::of_method(MethodId::new(function, 1), 0),
            "V",
            object.clone(),
        );
        let after = generic(
            function,
            vec![
                ts.wildcard_super(var(fn_r)),
                ts.wildcard_extends(var(and_then_v)),
            ],
        );
        ts.define_class(
            function,
            class_def(
                "java.util.function.Function",
                ClassKind::Interface,
                vec![fn_t, fn_r],
                None,
                vec![],
                vec![
                    abstract_method("apply", vec![var(fn_t)], var(fn_r)),
                    MethodDef {
                        type_params: vec![and_then_v],
                        ..method(
                            "andThen",
                            vec![after],
                            generic(function, vec![var(fn_t), var(and_then_v)]),
                        )
                    },
                ],
            ),
        );

        let runnable = ts.intern_class_id("java.lang.Runnable");
        ts.define_class(
            runnable,
            class_def(
                "java.lang.Runnable",
                ClassKind::Interface,
                vec![],
                None,
                vec![],
                vec![abstract_method("run", vec![], void)],
            ),
        );

        ts
    }
}
