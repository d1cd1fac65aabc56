//! Black-box coverage of the object facade: lookup, replacement, removal,
//! iteration, and deep copies of whole trees.

use alloc::{format, string::String, vec, vec::Vec};
use std::collections::HashSet;

use crate::{Array, JsonString, Object, Value};

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn text(s: &str) -> Value {
    Value::String(JsonString::from_bytes(s.as_bytes()).unwrap())
}

#[test]
fn insert_then_get_round_trips_across_growth() {
    let mut obj = Object::with_capacity(2).unwrap();
    let keys: Vec<String> = (0..40).map(|i| format!("field-{i}")).collect();

    for (i, key) in keys.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        obj.insert(key.as_bytes(), num(i as f64)).unwrap();
    }

    assert_eq!(obj.len(), keys.len());
    for (i, key) in keys.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let expected = num(i as f64);
        assert_eq!(obj.get(key.as_bytes()), Some(&expected));
    }
    assert_eq!(obj.get(b"field-40"), None);
}

#[test]
fn set_twice_keeps_one_entry() {
    let mut obj = Object::new().unwrap();
    obj.set(b"version", num(1.0)).unwrap();
    obj.set(b"version", num(2.0)).unwrap();

    assert_eq!(obj.len(), 1);
    assert_eq!(obj.get(b"version"), Some(&num(2.0)));
}

#[test]
fn remove_reports_presence_exactly_once() {
    let mut obj = Object::new().unwrap();
    obj.set(b"gone", Value::Null).unwrap();

    assert!(obj.remove(b"gone"));
    assert_eq!(obj.get(b"gone"), None);
    assert!(!obj.remove(b"gone"));
    assert!(obj.is_empty());
}

#[test]
fn colliding_keys_stay_independent() {
    // "a" and "q" share a home bucket in the default table.
    let mut obj = Object::new().unwrap();
    obj.set(b"a", num(1.0)).unwrap();
    obj.set(b"q", num(2.0)).unwrap();

    assert_eq!(obj.get(b"a"), Some(&num(1.0)));
    assert_eq!(obj.get(b"q"), Some(&num(2.0)));

    assert!(obj.remove(b"a"));
    assert_eq!(obj.get(b"a"), None);
    assert_eq!(obj.get(b"q"), Some(&num(2.0)));
}

#[test]
fn values_of_every_kind_can_be_stored() {
    let mut obj = Object::new().unwrap();
    obj.set(b"null", Value::Null).unwrap();
    obj.set(b"bool", Value::from(true)).unwrap();
    obj.set(b"number", num(6.5)).unwrap();
    obj.set(b"text", text("hi")).unwrap();
    obj.set(b"list", Value::Array(Array::from(vec![num(1.0)]))).unwrap();
    obj.set(b"nested", Value::from(Object::new().unwrap())).unwrap();

    assert_eq!(obj.len(), 6);
    assert!(obj.get(b"null").unwrap().is_null());
    assert_eq!(obj.get(b"bool").unwrap().as_bool(), Some(true));
    assert_eq!(obj.get(b"number").unwrap().as_number(), Some(6.5));
    assert_eq!(obj.get(b"text").unwrap().as_string().unwrap(), "hi");
    assert_eq!(obj.get(b"list").unwrap().as_array().unwrap().len(), 1);
    assert!(obj.get(b"nested").unwrap().as_object().unwrap().is_empty());
}

#[test]
fn a_tree_can_be_navigated_through_accessors() {
    let mut routes = Object::new().unwrap();
    routes
        .set(b"hops", Value::Array(Array::from(vec![text("alpha"), text("beta")])))
        .unwrap();

    let mut root = Object::new().unwrap();
    root.set(b"routes", Value::from(routes)).unwrap();
    let tree = Value::from(root);

    let hops = tree
        .as_object()
        .and_then(|o| o.get(b"routes"))
        .and_then(Value::as_object)
        .and_then(|o| o.get(b"hops"))
        .and_then(Value::as_array)
        .unwrap();
    assert_eq!(hops.len(), 2);
    assert_eq!(hops.get(1).unwrap().as_string().unwrap(), "beta");
}

#[test]
fn tree_copies_do_not_share_structure() {
    let mut inner = Object::new().unwrap();
    inner.set(b"kept", num(1.0)).unwrap();
    let mut root = Object::new().unwrap();
    root.set(b"inner", Value::from(inner)).unwrap();
    root.set(b"tag", text("original")).unwrap();

    let copy = root.try_clone().unwrap();

    root.set(b"tag", text("changed")).unwrap();
    assert!(root.remove(b"inner"));

    assert_eq!(copy.get(b"tag").unwrap().as_string().unwrap(), "original");
    let copied_inner = copy.get(b"inner").unwrap().as_object().unwrap();
    assert_eq!(copied_inner.get(b"kept"), Some(&num(1.0)));
}

#[test]
fn iteration_covers_exactly_the_live_entries() {
    let mut obj = Object::new().unwrap();
    for i in 0..8 {
        obj.set(format!("it-{i}").as_bytes(), num(f64::from(i))).unwrap();
    }
    assert!(obj.remove(b"it-3"));

    let mut seen = HashSet::new();
    for (key, value) in &obj {
        assert!(value.is_number());
        assert!(seen.insert(key.as_bytes().to_vec()), "{key:?} yielded twice");
    }
    assert_eq!(seen.len(), 7);
    assert!(!seen.contains(b"it-3".as_slice()));
}

#[test]
fn growth_does_not_disturb_stored_trees() {
    let mut obj = Object::with_capacity(1).unwrap();
    let mut payload = Object::new().unwrap();
    payload.set(b"deep", text("still here")).unwrap();
    obj.set(b"payload", Value::from(payload)).unwrap();

    // Push the map through several growth cycles around the stored tree.
    for i in 0..30 {
        obj.set(format!("filler-{i}").as_bytes(), num(f64::from(i))).unwrap();
    }

    let payload = obj.get(b"payload").unwrap().as_object().unwrap();
    assert_eq!(payload.get(b"deep").unwrap().as_string().unwrap(), "still here");
}
