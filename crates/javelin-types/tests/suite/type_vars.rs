use javelin_types::{
    Substitution, TyContext, TypeEnv, TypeError, TypeMirror, TypeSystem, VarOrigin,
};
use pretty_assertions::assert_eq;

use super::fixtures::{class, declare_bounded_class, raw};

#[test]
fn declared_variables_compare_by_symbol() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let e = ts.class(list).unwrap().type_params[0];
    let number = raw(&ts, "java.lang.Number");

    let mut cx = TyContext::new(&ts);
    let narrowed = cx.with_upper_bound(e, number.clone()).unwrap();

    assert_ne!(narrowed.id(), e.id());
    assert_eq!(narrowed, e);
    assert_eq!(TypeMirror::from(narrowed), TypeMirror::from(e));
    assert_eq!(cx.upper_bound(narrowed), number);
    assert_eq!(cx.upper_bound(e), ts.object());
}

#[test]
fn captured_variables_compare_by_identity() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let list_of_any = ts.class_type(list, vec![ts.unbounded_wildcard()]).unwrap();

    let mut cx = TyContext::new(&ts);
    let first = cx.capture(&list_of_any).unwrap();
    let second = cx.capture(&list_of_any).unwrap();

    let a = first.as_class().unwrap().args[0].as_type_var().unwrap();
    let b = second.as_class().unwrap().args[0].as_type_var().unwrap();
    assert_eq!(a, a);
    assert_ne!(a, b);
    assert_ne!(first, second);
    assert_eq!(first.clone(), first);

    // Same bounds, same origin: still a different variable.
    assert_eq!(cx.upper_bound(a), cx.upper_bound(b));
    assert!(cx.is_capture_of(a, &ts.unbounded_wildcard()));
    assert!(cx.is_capture_of(b, &ts.unbounded_wildcard()));
}

#[test]
fn clone_with_bounds_refuses_declared_variables() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let e = ts.class(list).unwrap().type_params[0];

    let mut cx = TyContext::new(&ts);
    let err = cx
        .clone_with_bounds(e, ts.null_type(), raw(&ts, "java.lang.Number"))
        .unwrap_err();
    assert!(matches!(err, TypeError::UnsupportedOperation(_)), "{err:?}");
    assert_eq!(cx.local_count(), 0);
}

#[test]
fn clone_with_bounds_mints_a_new_capture_of_the_same_wildcard() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let number = raw(&ts, "java.lang.Number");
    let integer = raw(&ts, "java.lang.Integer");
    let wildcard = ts.wildcard_extends(number.clone());
    let ty = ts.class_type(list, vec![wildcard.clone()]).unwrap();

    let mut cx = TyContext::new(&ts);
    let captured = cx.capture(&ty).unwrap();
    let cap = captured.as_class().unwrap().args[0].as_type_var().unwrap();
    let copy = cx
        .clone_with_bounds(cap, ts.null_type(), integer.clone())
        .unwrap();

    assert_ne!(copy, cap);
    assert_eq!(cx.upper_bound(copy), integer);
    assert_eq!(cx.upper_bound(cap), number);
    assert!(cx.is_capture_of(copy, &wildcard));
    assert!(cx
        .captured_origin(copy)
        .is_some_and(|origin| origin.same_instance(&wildcard)));
}

#[test]
fn is_capture_of_checks_wildcard_instance() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let number = raw(&ts, "java.lang.Number");
    let wildcard = ts.wildcard_extends(number.clone());
    let lookalike = ts.wildcard_extends(number);
    assert_eq!(wildcard, lookalike);

    let mut cx = TyContext::new(&ts);
    let captured = cx
        .capture(&ts.class_type(list, vec![wildcard.clone()]).unwrap())
        .unwrap();
    let cap = captured.as_class().unwrap().args[0].as_type_var().unwrap();

    assert!(cx.is_capture_of(cap, &wildcard));
    assert!(!cx.is_capture_of(cap, &lookalike));

    let e = ts.class(list).unwrap().type_params[0];
    assert!(!cx.is_capture_of(e, &wildcard));
    assert_eq!(cx.captured_origin(e), None);
}

#[test]
fn subst_in_bounds_leaves_the_original_untouched() {
    let mut ts = TypeSystem::with_minimal_jdk();
    let comparable = class(&ts, "java.lang.Comparable");
    let (_, t) = declare_bounded_class(&mut ts, "com.example.Sorted", |ts, _, t| {
        ts.class_type(comparable, vec![TypeMirror::from(t)]).unwrap()
    });
    let string = raw(&ts, "java.lang.String");
    let original_bound = ts.class_type(comparable, vec![TypeMirror::from(t)]).unwrap();

    let mut cx = TyContext::new(&ts);
    let subst = Substitution::from_pairs(&[t], &[string.clone()]);
    let derived = cx.subst_in_bounds(t, &subst);

    assert_eq!(derived, t);
    assert_ne!(derived.id(), t.id());
    assert_eq!(
        cx.upper_bound(derived),
        ts.class_type(comparable, vec![string]).unwrap()
    );
    assert_eq!(cx.upper_bound(t), original_bound);
    assert_eq!(ts.upper_bound(t), original_bound);
}

#[test]
fn subst_in_bounds_without_effect_returns_the_same_variable() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let e = ts.class(list).unwrap().type_params[0];
    let comparable = class(&ts, "java.lang.Comparable");
    let t = ts.class(comparable).unwrap().type_params[0];

    let mut cx = TyContext::new(&ts);
    let subst = Substitution::from_pairs(&[t], &[raw(&ts, "java.lang.String")]);
    let same = cx.subst_in_bounds(e, &subst);

    assert_eq!(same.id(), e.id());
    assert_eq!(cx.local_count(), 0);
}

#[test]
fn annotations_are_attached_to_a_derived_variable() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let e = ts.class(list).unwrap().type_params[0];
    let runnable = class(&ts, "java.lang.Runnable");

    let mut cx = TyContext::new(&ts);
    let annotated = cx.with_annotations(e, vec![runnable]).unwrap();

    assert_eq!(annotated, e);
    assert_eq!(cx.type_var(annotated.id()).unwrap().annotations(), &[runnable]);
    assert!(ts.type_var(e.id()).unwrap().annotations().is_empty());
    assert!(matches!(
        cx.type_var(annotated.id()).unwrap().origin(),
        VarOrigin::Declared(symbol) if Some(*symbol) == e.symbol()
    ));
}

#[test]
fn variables_of_another_context_are_unknown() {
    let ts = TypeSystem::with_minimal_jdk();
    let list = class(&ts, "java.util.List");
    let ty = ts.class_type(list, vec![ts.unbounded_wildcard()]).unwrap();

    let mut producer = TyContext::new(&ts);
    let captured = producer.capture(&ty).unwrap();
    let cap = captured.as_class().unwrap().args[0].as_type_var().unwrap();

    let mut other = TyContext::new(&ts);
    assert_eq!(other.type_var(cap.id()).map(|def| def.name().to_string()), None);
    assert!(matches!(
        other.with_upper_bound(cap, ts.object()),
        Err(TypeError::IllegalState(_))
    ));
}
