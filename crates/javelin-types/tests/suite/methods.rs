use javelin_types::{
    stream_methods, MethodSig, Substitution, TyContext, TypeEnv, TypeMirror, TypeParamSymbol,
    TypeSystem,
};
use pretty_assertions::assert_eq;

use super::fixtures::{class, declare_bounded_class, raw};

fn names(sigs: &[MethodSig]) -> Vec<&str> {
    sigs.iter().map(|sig| sig.name.as_str()).collect()
}

#[test]
fn subtype_methods_come_first_and_overrides_are_skipped() {
    let ts = TypeSystem::with_minimal_jdk();
    let array_list = class(&ts, "java.util.ArrayList");
    let ty = ts
        .class_type(array_list, vec![raw(&ts, "java.lang.String")])
        .unwrap();

    let sigs: Vec<MethodSig> = ty.stream_methods(&ts, |_| true).collect();
    assert_eq!(
        names(&sigs),
        vec![
            "get", "add", "size", "equals", "hashCode", "toString", "set", "isEmpty", "iterator"
        ]
    );
}

#[test]
fn streams_restart_from_the_beginning() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let ty = ts
        .class_type(list, vec![raw(&ts, "java.lang.Integer")])
        .unwrap();

    let first: Vec<MethodSig> = stream_methods(&ts, &ty, |_| true).collect();
    let second: Vec<MethodSig> = stream_methods(&ts, &ty, |_| true).collect();
    assert_eq!(first, second);

    let mut stream = stream_methods(&ts, &ty, |_| true);
    stream.next();
    let forked: Vec<MethodSig> = stream.clone().collect();
    assert_eq!(forked, stream.collect::<Vec<_>>());
}

#[test]
fn streams_are_lazy() {
    let ts = TypeSystem::with_minimal_jdk();
    let array_list = class(&ts, "java.util.ArrayList");
    let ty = ts
        .class_type(array_list, vec![raw(&ts, "java.lang.String")])
        .unwrap();

    let mut inspected = 0;
    let first = ty
        .stream_methods(&ts, |_| {
            inspected += 1;
            true
        })
        .next();
    assert_eq!(first.map(|sig| sig.name), Some("get".to_string()));
    assert_eq!(inspected, 1);
}

#[test]
fn inherited_signatures_are_substituted() {
    let ts = TypeSystem::with_minimal_jdk();
    let array_list = class(&ts, "java.util.ArrayList");
    let list = class(&ts, "java.util.List");
    let string = raw(&ts, "java.lang.String");
    let int = ts.primitive(javelin_types::PrimitiveKind::Int);
    let ty = ts.class_type(array_list, vec![string.clone()]).unwrap();

    let set = ty
        .stream_methods(&ts, |m| m.name() == "set")
        .next()
        .expect("List declares set");
    assert_eq!(set.declaring_type, ts.class_type(list, vec![string.clone()]).unwrap());
    assert_eq!(set.params, vec![int, string.clone()]);
    assert_eq!(set.return_type, string);
    assert!(set.is_abstract);
}

#[test]
fn type_variables_expose_methods_of_their_bound() {
    let mut ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let string = raw(&ts, "java.lang.String");
    let (_, t) = declare_bounded_class(&mut ts, "com.example.Holder", |ts, _, _| {
        ts.class_type(list, vec![raw(ts, "java.lang.String")]).unwrap()
    });

    let get = TypeMirror::from(t)
        .stream_methods(&ts, |m| m.name() == "get")
        .next()
        .expect("bound declares get");
    assert_eq!(get.return_type, string);
}

#[test]
fn f_bounded_variables_see_enum_methods() {
    let ts = TypeSystem::with_minimal_jdk();
    let enum_ = class(&ts, "java.lang.Enum");
    let e = ts.class(enum_).unwrap().type_params[0];

    let sigs: Vec<MethodSig> = TypeMirror::from(e)
        .stream_methods(&ts, |m| m.name() == "ordinal" || m.name() == "compareTo")
        .collect();
    assert_eq!(names(&sigs), vec!["ordinal", "compareTo"]);
    assert_eq!(sigs[1].params, vec![TypeMirror::from(e)]);
}

#[test]
fn intersections_stream_every_member() {
    let ts = TypeSystem::with_minimal_jdk();
    let comparable = class(&ts, "java.lang.Comparable");
    let integer = raw(&ts, "java.lang.Integer");
    let ty = ts
        .intersection(vec![
            raw(&ts, "java.lang.Number"),
            ts.class_type(comparable, vec![integer.clone()]).unwrap(),
        ])
        .unwrap();

    let sigs: Vec<MethodSig> = ty
        .stream_methods(&ts, |m| m.name() == "intValue" || m.name() == "compareTo")
        .collect();
    assert_eq!(names(&sigs), vec!["intValue", "compareTo"]);
    assert_eq!(sigs[1].params, vec![integer]);
}

#[test]
fn captured_receivers_return_capture_variables() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let ty = ts
        .class_type(list, vec![ts.wildcard_extends(raw(&ts, "java.lang.Number"))])
        .unwrap();

    let mut cx = TyContext::new(&ts);
    let receiver = cx.capture_conversion(&ty);
    let cap = receiver.as_class().unwrap().args[0].clone();
    let get = receiver
        .stream_methods(&cx, |m| m.name() == "get")
        .next()
        .expect("List declares get");
    assert_eq!(get.return_type, cap);
    assert_eq!(get.return_type.display(&cx).to_string(), "CAP#1");
}

#[test]
fn generic_methods_keep_their_own_parameters() {
    let ts = TypeSystem::with_minimal_jdk();
    let function = class(&ts, "java.util.function.Function");
    let string = raw(&ts, "java.lang.String");
    let integer = raw(&ts, "java.lang.Integer");
    let long = raw(&ts, "java.lang.Long");
    let ty = ts
        .class_type(function, vec![string.clone(), integer.clone()])
        .unwrap();

    let and_then = ty
        .stream_methods(&ts, |m| m.name() == "andThen")
        .next()
        .expect("Function declares andThen");
    assert_eq!(and_then.type_params.len(), 1);
    let v = and_then.type_params[0];
    assert_eq!(
        v.symbol(),
        Some(TypeParamSymbol::of_method(and_then.symbol, 0))
    );
    assert_eq!(
        and_then.params[0].display(&ts).to_string(),
        "java.util.function.Function<? super java.lang.Integer, ? extends V>"
    );

    let instantiated = and_then.subst(&Substitution::from_pairs(&[v], &[long.clone()]));
    assert_eq!(
        instantiated.return_type,
        ts.class_type(function, vec![string, long]).unwrap()
    );
}

#[test]
fn arrays_have_object_methods() {
    let ts = TypeSystem::with_minimal_jdk();
    let strings = ts.array(raw(&ts, "java.lang.String"));

    let sigs: Vec<MethodSig> = strings.stream_methods(&ts, |_| true).collect();
    assert_eq!(names(&sigs), vec!["equals", "hashCode", "toString"]);
}

#[test]
fn cyclic_bounds_yield_no_methods() {
    let mut ts = TypeSystem::with_minimal_jdk();
    let holder = ts.intern_class_id("com.example.Cycle");
    let t = ts.declare_type_param(TypeParamSymbol::of_class(holder, 0), "T");
    let u = ts.declare_type_param(TypeParamSymbol::of_class(holder, 1), "U");
    ts.set_type_param_bound(t, TypeMirror::from(u)).unwrap();
    ts.set_type_param_bound(u, TypeMirror::from(t)).unwrap();

    assert_eq!(TypeMirror::from(t).stream_methods(&ts, |_| true).count(), 0);
}
