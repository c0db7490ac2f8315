use javelin_types::{TypeEnv, TypeError, TypeParamSymbol, TypeSystem};
use pretty_assertions::assert_eq;

use super::fixtures::{class, raw};

#[test]
fn clones_resolve_inherited_type_parameters() {
    let base = TypeSystem::with_minimal_jdk();
    let enum_ = class(&base, "java.lang.Enum");
    let e = base.class(enum_).unwrap().type_params[0];

    let copy = base.clone();
    assert_eq!(copy.type_var_name(e), Some("E"));
    assert_eq!(copy.upper_bound(e), base.upper_bound(e));

    let mut grandchild = copy.clone();
    grandchild.set_type_param_bound(e, base.object()).unwrap();
    assert_eq!(grandchild.upper_bound(e), base.object());
    assert_eq!(copy.upper_bound(e), base.upper_bound(e));
}

#[test]
fn sibling_clones_keep_new_type_parameters_apart() {
    let base = TypeSystem::with_minimal_jdk();
    let mut a = base.clone();
    let mut b = base.clone();

    let a_class = a.intern_class_id("com.example.A");
    let x = a.add_type_param(
        TypeParamSymbol::of_class(a_class, 0),
        "X",
        raw(&a, "java.lang.Number"),
    );
    let b_class = b.intern_class_id("com.example.B");
    let y = b.add_type_param(
        TypeParamSymbol::of_class(b_class, 0),
        "Y",
        raw(&b, "java.lang.String"),
    );

    assert_eq!(a.type_var_name(x), Some("X"));
    assert_eq!(b.type_var_name(y), Some("Y"));
    assert_eq!(b.type_var_name(x), None);
    assert_eq!(b.upper_bound(x), b.object());
    assert_eq!(a.type_var_name(y), None);
    assert_eq!(base.type_var_name(x), None);

    let err = b.set_type_param_bound(x, b.object()).unwrap_err();
    assert!(matches!(err, TypeError::IllegalState(_)), "{err:?}");
}

#[test]
fn parameters_declared_after_cloning_stay_with_the_original() {
    let mut base = TypeSystem::with_minimal_jdk();
    let copy = base.clone();

    let holder = base.intern_class_id("com.example.Late");
    let late = base.declare_type_param(TypeParamSymbol::of_class(holder, 0), "L");

    assert_eq!(base.type_var_name(late), Some("L"));
    assert_eq!(copy.type_var_name(late), None);
}
