use std::sync::Arc;

use propmodel::{PropertyDescriptor, PropertyMap, PropertyRegistry, Resource, TypeConstraint, Value};

fn map<const N: usize>(pairs: [(&str, Value); N]) -> PropertyMap {
    pairs.into_iter().collect()
}

fn bare(registry: &mut PropertyRegistry, names: &[&str]) {
    for name in names {
        registry.declare(PropertyDescriptor::new(*name));
    }
}

/// `x` and `y` with `identity_attr :x`, `y` marked as identity too.
fn x_and_y() -> Arc<PropertyRegistry> {
    let mut registry = PropertyRegistry::new("x_and_y");
    registry.declare(PropertyDescriptor::new("x"));
    registry.declare(PropertyDescriptor::new("y").identity(true));
    registry.set_identity_attr("x").unwrap();
    Arc::new(registry)
}

#[test]
fn test_name_is_the_default_identity() {
    let mut registry = PropertyRegistry::new("plain");
    bare(&mut registry, &["x"]);
    let registry = Arc::new(registry);
    let mut r = Resource::new(Arc::clone(&registry), "blah").unwrap();

    assert_eq!(registry.identity_attr(), "name");
    assert_eq!(r.identity().unwrap(), Value::from("blah"));
    r.set("x", 10).unwrap();
    assert_eq!(r.identity().unwrap(), Value::from("blah"));
    assert_eq!(r.state().unwrap(), map([("x", Value::from(10))]));
}

#[test]
fn test_identity_attr_names_the_identity() {
    let mut registry = PropertyRegistry::new("with_identity_attr");
    bare(&mut registry, &["x", "y"]);
    registry.set_identity_attr("x").unwrap();
    let registry = Arc::new(registry);
    let mut r = Resource::new(Arc::clone(&registry), "blah").unwrap();

    r.set("x", 10).unwrap();
    r.set("y", 20).unwrap();
    assert_eq!(registry.identity_attr(), "x");
    assert_eq!(r.identity().unwrap(), Value::from(10));
    assert_eq!(
        r.state().unwrap(),
        map([("x", Value::from(10)), ("y", Value::from(20))])
    );
}

#[test]
fn test_identity_flag_joins_identity_attr() {
    let registry = x_and_y();
    let mut r = Resource::new(Arc::clone(&registry), "blah").unwrap();

    r.set("x", 10).unwrap();
    r.set("y", 20).unwrap();
    assert_eq!(registry.identity_attr(), "x");
    assert_eq!(r.identity().unwrap(), Value::from(10));
    assert_eq!(registry.state_attrs(), vec!["x", "y"]);
}

#[test]
fn test_subclass_inherits_identity_and_state() {
    let parent = x_and_y();
    let mut child = PropertyRegistry::subclass(&parent, "child");
    bare(&mut child, &["z"]);
    let child = Arc::new(child);
    let mut r = Resource::new(Arc::clone(&child), "blah").unwrap();

    r.set("x", 1).unwrap();
    r.set("y", 2).unwrap();
    r.set("z", 3).unwrap();
    assert_eq!(child.identity_attr(), "x");
    assert_eq!(r.identity().unwrap(), Value::from(1));
    assert_eq!(
        r.state().unwrap(),
        map([
            ("x", Value::from(1)),
            ("y", Value::from(2)),
            ("z", Value::from(3)),
        ])
    );
}

#[test]
fn test_subclass_can_extend_identity() {
    let mut parent = PropertyRegistry::new("parent");
    bare(&mut parent, &["x", "y"]);
    parent.set_identity_attr("x").unwrap();
    let parent = Arc::new(parent);

    let mut child = PropertyRegistry::subclass(&parent, "child");
    child.declare(PropertyDescriptor::new("y").identity(true));
    let child = Arc::new(child);
    let mut r = Resource::new(Arc::clone(&child), "blah").unwrap();

    r.set("x", "foo").unwrap();
    r.set("y", "bar").unwrap();
    assert_eq!(
        r.identity().unwrap(),
        map([("x", Value::from("foo")), ("y", Value::from("bar"))])
    );
}

#[test]
fn test_subclass_override_validates_with_new_type() {
    let mut child = PropertyRegistry::subclass(&x_and_y(), "child");
    child.declare(
        PropertyDescriptor::new("y")
            .of_type(TypeConstraint::string())
            .identity(true),
    );
    let mut r = Resource::new(Arc::new(child), "blah").unwrap();

    let err = r.set("y", 20).unwrap_err();
    assert!(err.is_validation_failure());
    assert_eq!(r.set("y", "twenty").unwrap(), Value::from("twenty"));
}

#[test]
fn test_override_leaves_parent_untouched() {
    let parent = x_and_y();
    let mut child = PropertyRegistry::subclass(&parent, "child");
    child.declare(PropertyDescriptor::new("y").of_type(TypeConstraint::string()));

    let mut p = Resource::new(Arc::clone(&parent), "blah").unwrap();
    assert_eq!(p.set("y", 20).unwrap(), Value::from(20));
    assert!(parent.resolve("y").unwrap().constraint().is_none());
}

#[test]
fn test_identity_ignores_desired_state() {
    let mut registry = PropertyRegistry::new("hidden_identity");
    registry.declare(PropertyDescriptor::new("x").desired_state(false));
    bare(&mut registry, &["y"]);
    registry.set_identity_attr("x").unwrap();
    let registry = Arc::new(registry);
    let mut r = Resource::new(Arc::clone(&registry), "blah").unwrap();

    r.set("x", 10).unwrap();
    r.set("y", 20).unwrap();
    assert_eq!(r.identity().unwrap(), Value::from(10));
    assert_eq!(registry.state_attrs(), vec!["y"]);
    assert_eq!(r.state().unwrap(), map([("y", Value::from(20))]));
}

fn xyz() -> Arc<PropertyRegistry> {
    let mut registry = PropertyRegistry::new("xyz");
    registry.declare(PropertyDescriptor::new("x").identity(true).default_value("xxx"));
    registry.declare(PropertyDescriptor::new("y").identity(true).default_value("yyy"));
    registry.declare(PropertyDescriptor::new("z").identity(true).default_value("zzz"));
    Arc::new(registry)
}

#[test]
fn test_composite_identity_contains_only_set_members() {
    let mut r = Resource::new(xyz(), "blah").unwrap();
    assert_eq!(r.identity().unwrap(), PropertyMap::new());

    r.set("x", "foo").unwrap();
    assert_eq!(r.identity().unwrap(), map([("x", Value::from("foo"))]));

    r.set("z", "baz").unwrap();
    assert_eq!(
        r.identity().unwrap(),
        map([("x", Value::from("foo")), ("z", Value::from("baz"))])
    );
}

#[test]
fn test_identity_attr_collapses_composite_to_scalar() {
    let mut child = PropertyRegistry::subclass(&xyz(), "only_y");
    child.set_identity_attr("y").unwrap();
    let mut r = Resource::new(Arc::new(child), "blah").unwrap();

    assert_eq!(r.identity().unwrap(), Value::from("yyy"));
    r.set("x", "foo").unwrap();
    r.set("y", "bar").unwrap();
    r.set("z", "baz").unwrap();
    assert_eq!(r.identity().unwrap(), Value::from("bar"));
}

#[test]
fn test_name_property_feeds_identity_and_state() {
    let mut registry = PropertyRegistry::new("named");
    registry.declare(
        PropertyDescriptor::new("x")
            .identity(true)
            .name_property(true),
    );
    let mut r = Resource::new(Arc::new(registry), "blah").unwrap();

    assert_eq!(r.identity().unwrap(), Value::from("blah"));
    assert_eq!(r.state().unwrap(), map([("x", Value::from("blah"))]));
    assert!(!r.is_set("x").unwrap());

    r.set("x", "other").unwrap();
    assert_eq!(r.identity().unwrap(), Value::from("other"));
}

#[test]
fn test_state_attrs_override_narrows_state() {
    let mut parent = PropertyRegistry::new("parent");
    bare(&mut parent, &["x", "y"]);
    let parent = Arc::new(parent);

    let mut child = PropertyRegistry::subclass(&parent, "child");
    child.set_state_attrs(&["y"]).unwrap();
    let mut r = Resource::new(Arc::new(child), "blah").unwrap();
    r.set("x", 1).unwrap();
    r.set("y", 2).unwrap();
    assert_eq!(r.state().unwrap(), map([("y", Value::from(2))]));

    let mut p = Resource::new(Arc::clone(&parent), "blah").unwrap();
    p.set("x", 1).unwrap();
    assert_eq!(
        p.state().unwrap(),
        map([("x", Value::from(1)), ("y", Value::Nil)])
    );
}

#[test]
fn test_state_attrs_can_bring_back_hidden_property() {
    let mut registry = PropertyRegistry::new("hidden_state");
    registry.declare(PropertyDescriptor::new("x").desired_state(false));
    bare(&mut registry, &["y"]);
    registry.set_state_attrs(&["x", "y"]).unwrap();
    let mut r = Resource::new(Arc::new(registry), "blah").unwrap();

    r.set("x", 10).unwrap();
    assert_eq!(
        r.state().unwrap(),
        map([("x", Value::from(10)), ("y", Value::Nil)])
    );
}
