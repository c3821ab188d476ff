//! Integration tests for the lazy definition registry.

use schemable::{decoder, guard, Decoder, Guard, Registry};
use serde_json::{json, Value};

#[test]
fn test_define_and_get() {
    let registry: Registry<Guard<Value>> = Registry::new();
    guard::lazy(&registry, "Email", guard::string);

    let definition = registry.get("Email").unwrap();
    assert_eq!(definition.id(), "Email");
    assert!(!definition.is_resolved());
    assert!(definition.force().is(&json!("a@b")));
    assert!(definition.is_resolved());
}

fn id_decoder(registry: &Registry<Decoder<Value, Value>>, numeric: bool) -> Decoder<Value, Value> {
    decoder::lazy(registry, "Id", move || {
        if numeric {
            decoder::number().into_value()
        } else {
            decoder::string().into_value()
        }
    })
}

#[test]
fn test_redefinition_from_same_site_keeps_first_thunk() {
    let registry: Registry<Decoder<Value, Value>> = Registry::new();
    let first = id_decoder(&registry, false);
    let second = id_decoder(&registry, true);

    assert!(first.decode(&json!("x")).is_success());
    assert!(second.decode(&json!("x")).is_success());
    assert!(second.decode(&json!(1)).is_failure());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_same_id_from_different_sites_stays_separate() {
    let registry: Registry<Decoder<Value, Value>> = Registry::new();
    let text = decoder::lazy(&registry, "Node", || decoder::string().into_value());
    let count = decoder::lazy(&registry, "Node", || decoder::number().into_value());

    assert!(text.decode(&json!("x")).is_success());
    assert!(text.decode(&json!(1)).is_failure());
    assert!(count.decode(&json!(1)).is_success());
    assert!(count.decode(&json!("x")).is_failure());

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.ids(), vec!["Node".to_string()]);
    assert_eq!(registry.definitions("Node").len(), 2);
}

#[test]
fn test_missing_definition() {
    let registry: Registry<Guard<Value>> = Registry::default();
    assert!(registry.is_empty());
    assert!(registry.get("Nope").is_none());
    assert!(!registry.contains("Nope"));
}

#[test]
fn test_registry_clone_shares_definitions() {
    let registry: Registry<Guard<Value>> = Registry::new();
    let clone = registry.clone();
    guard::lazy(&clone, "Flag", guard::boolean);

    assert!(registry.contains("Flag"));
    assert_eq!(registry.ids(), vec!["Flag".to_string()]);
}

#[test]
fn test_separate_registries_are_independent() {
    let a: Registry<Guard<Value>> = Registry::new();
    let b: Registry<Guard<Value>> = Registry::new();
    let on_a = guard::lazy(&a, "T", guard::string);
    let on_b = guard::lazy(&b, "T", guard::number);

    assert!(on_a.is(&json!("s")));
    assert!(on_b.is(&json!(1)));
    assert!(!on_b.is(&json!("s")));
}

#[test]
fn test_debug_lists_ids() {
    let registry: Registry<Guard<Value>> = Registry::new();
    guard::lazy(&registry, "B", guard::string);
    guard::lazy(&registry, "A", guard::string);
    assert_eq!(format!("{:?}", registry), "Registry { ids: [\"A\", \"B\"] }");
}
