//! Tests for immutability and structural sharing.
//!
//! These tests verify that:
//! 1. update never mutates the original root
//! 2. old and new roots never alias each other
//! 3. only the spine from root to the updated leaf is copied

use deepstate::{merge_deep, path, update, update_at, Record, Value};
use serde_json::json;

fn sample() -> Value {
    Value::from(json!({
        "profile": {"name": "Alice", "prefs": {"theme": "dark", "lang": "en"}},
        "stats": {"score": 100, "history": [1, 2, 3]},
        "flags": {"beta": true}
    }))
}

// ============================================================================
// update is pure
// ============================================================================

#[test]
fn test_update_does_not_mutate_original() {
    let original = sample();
    let original_json = original.to_json();

    let _ = update(&original, json!({"theme": "light"}), "profile.prefs", true).unwrap();
    let _ = update(&original, 1, "stats.score", false).unwrap();
    let _ = update(&original, json!({"x": 1}), "", true).unwrap();

    assert_eq!(original, original_json, "update mutated the original root!");
}

#[test]
fn test_deterministic_same_inputs_same_output() {
    let root = sample();
    let results: Vec<_> = (0..5)
        .map(|_| update(&root, json!({"lang": "de"}), "profile.prefs", true).unwrap())
        .collect();

    for result in &results {
        assert_eq!(result, &results[0]);
    }
    assert_eq!(results[0]["profile"]["prefs"]["lang"], "de");
    assert_eq!(results[0]["profile"]["prefs"]["theme"], "dark");
}

// ============================================================================
// No aliasing
// ============================================================================

#[test]
fn test_writing_to_new_root_leaves_old_root_intact() {
    let root = sample();
    let mut next = update(&root, "Bob", "profile.name", true).unwrap();

    // Write directly into a nested record of the new root
    next.as_record_mut()
        .unwrap()
        .child_record_mut("profile")
        .child_record_mut("prefs")
        .insert("theme", "neon");

    assert_eq!(root["profile"]["prefs"]["theme"], "dark");
    assert_eq!(root["profile"]["name"], "Alice");
    assert_eq!(next["profile"]["prefs"]["theme"], "neon");
}

#[test]
fn test_writing_to_old_root_leaves_new_root_intact() {
    let mut root = sample();
    let next = update(&root, 200, "stats.score", true).unwrap();

    root.as_record_mut()
        .unwrap()
        .child_record_mut("flags")
        .insert("beta", false);

    assert_eq!(next["flags"]["beta"], true);
    assert_eq!(next["stats"]["score"], 200);
    assert_eq!(root["flags"]["beta"], false);
}

#[test]
fn test_merge_result_does_not_alias_source() {
    let target = Record::new();
    let source = Value::from(json!({"a": {"b": 1}}));
    let mut merged = merge_deep(&target, source.as_record().unwrap());

    merged.child_record_mut("a").insert("b", 2);

    assert_eq!(source["a"]["b"], 1);
    assert_eq!(Value::Record(merged)["a"]["b"], 2);
}

// ============================================================================
// Structural sharing
// ============================================================================

#[test]
fn test_only_spine_is_copied() {
    let root = sample();
    let next = update_at(&root, "light", &path!("profile", "prefs", "theme").unwrap(), true);

    let shared = |v: &Value, key: &str| v[key].as_record().unwrap().clone();

    // Siblings of the spine are shared
    assert!(shared(&root, "stats").ptr_eq(&shared(&next, "stats")));
    assert!(shared(&root, "flags").ptr_eq(&shared(&next, "flags")));

    // Spine nodes are fresh
    assert!(!shared(&root, "profile").ptr_eq(&shared(&next, "profile")));
    assert!(!root.as_record().unwrap().ptr_eq(next.as_record().unwrap()));
}

#[test]
fn test_noop_on_non_record_root_returns_equal_value() {
    let root = Value::from(json!([1, 2, 3]));
    let next = update(&root, json!({"a": 1}), "a", true).unwrap();
    assert_eq!(next, root);
}
