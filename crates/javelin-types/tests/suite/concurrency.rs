use std::sync::Arc;
use std::thread;

use javelin_types::{is_subtype, TyContext, TypeEnv, TypeMirror, TypeSystem, TypeVar};
use pretty_assertions::assert_eq;

use super::fixtures::{class, raw};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn shared_state_is_thread_safe() {
    assert_send_sync::<TypeSystem>();
    assert_send_sync::<TypeMirror>();
    assert_send_sync::<TypeVar>();
}

#[test]
fn workers_capture_against_a_shared_registry() {
    let ts = Arc::new(TypeSystem::with_minimal_jdk());
    let list = class(&ts, "java.util.List");
    let number = raw(&ts, "java.lang.Number");
    let ty = ts
        .class_type(list, vec![ts.wildcard_extends(number.clone())])
        .unwrap();

    let vars: Vec<TypeVar> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ts = Arc::clone(&ts);
                let ty = ty.clone();
                let number = number.clone();
                scope.spawn(move || {
                    let mut cx = TyContext::new(&ts);
                    let captured = cx.capture(&ty).unwrap();
                    let var = captured.as_class().unwrap().args[0].as_type_var().unwrap();
                    assert_eq!(cx.type_var_name(var), Some("CAP#1"));
                    assert_eq!(cx.upper_bound(var), number);
                    assert!(is_subtype(&cx, &captured, &ty));
                    var
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    for (i, a) in vars.iter().enumerate() {
        for b in &vars[i + 1..] {
            assert_ne!(a, b);
        }
    }
    // The registry never saw any of the worker-local variables.
    for var in &vars {
        assert!(ts.type_var(var.id()).is_none());
    }
}
