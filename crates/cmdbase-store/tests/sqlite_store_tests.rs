use serde_json::json;

use cmdbase_core::model::Document;
use cmdbase_core::store::{DocStore, FindOptions};
use cmdbase_store::SqliteStore;

fn doc(value: serde_json::Value) -> Document {
    value.as_object().unwrap().clone()
}

// ===== PERSISTENCE TESTS =====

#[test]
fn test_documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cmdbase.db");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        store
            .insert("hosts", doc(json!({"host_id": 1, "inner_ip": "10.0.0.1"})))
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let found = store
        .find("hosts", &doc(json!({"host_id": 1})), &FindOptions::all())
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("inner_ip"), Some(&json!("10.0.0.1")));
}

#[test]
fn test_sequences_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cmdbase.db");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.next_id("hosts").unwrap(), 1);
        assert_eq!(store.next_id("hosts").unwrap(), 2);
    }

    let mut store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.next_id("hosts").unwrap(), 3);
}

// ===== QUERY TESTS =====

#[test]
fn test_in_operator_and_dotted_paths() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .insert(
            "process_templates",
            doc(json!({
                "id": 100,
                "property": {"bind_ip": {"as_default_value": true, "value": "inner"}},
            })),
        )
        .unwrap();
    store
        .insert(
            "process_templates",
            doc(json!({
                "id": 101,
                "property": {"bind_ip": {"as_default_value": false, "value": "inner"}},
            })),
        )
        .unwrap();

    let found = store
        .find(
            "process_templates",
            &doc(json!({
                "id": {"$in": [100, 101]},
                "property.bind_ip.as_default_value": true,
            })),
            &FindOptions::all(),
        )
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("id"), Some(&json!(100)));
}

#[test]
fn test_pagination_sort_projection() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    for id in [3u64, 1, 2] {
        store
            .insert(
                "hosts",
                doc(json!({"host_id": id, "inner_ip": format!("10.0.0.{id}")})),
            )
            .unwrap();
    }

    let options = FindOptions::all()
        .with_sort("host_id")
        .with_page(1, 2)
        .with_fields(["host_id"]);
    let found = store.find("hosts", &Document::new(), &options).unwrap();
    let ids: Vec<u64> = found
        .iter()
        .map(|d| d.get("host_id").unwrap().as_u64().unwrap())
        .collect();
    assert_eq!(ids, [2, 3]);
    assert!(!found[0].contains_key("inner_ip"));
}

#[test]
fn test_count_ignores_pagination() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    for id in 1..=5u64 {
        store.insert("hosts", doc(json!({"host_id": id}))).unwrap();
    }
    assert_eq!(store.count("hosts", &Document::new()).unwrap(), 5);
}

// ===== WRITE TESTS =====

#[test]
fn test_update_many_merges_patch_into_matches() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .insert("hosts", doc(json!({"host_id": 1, "inner_ip": "10.0.0.1"})))
        .unwrap();
    store
        .insert("hosts", doc(json!({"host_id": 2, "inner_ip": "10.0.0.2"})))
        .unwrap();

    let count = store
        .update_many(
            "hosts",
            &doc(json!({"host_id": 1})),
            &doc(json!({"inner_ip": "10.0.0.9", "memo": "moved"})),
        )
        .unwrap();
    assert_eq!(count, 1);

    let updated = store
        .find("hosts", &doc(json!({"host_id": 1})), &FindOptions::all())
        .unwrap();
    assert_eq!(updated[0].get("inner_ip"), Some(&json!("10.0.0.9")));
    assert_eq!(updated[0].get("memo"), Some(&json!("moved")));

    let untouched = store
        .find("hosts", &doc(json!({"host_id": 2})), &FindOptions::all())
        .unwrap();
    assert_eq!(untouched[0].get("inner_ip"), Some(&json!("10.0.0.2")));
}

#[test]
fn test_delete_many_removes_only_matches() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.insert("hosts", doc(json!({"host_id": 1}))).unwrap();
    store.insert("hosts", doc(json!({"host_id": 2}))).unwrap();

    let removed = store
        .delete_many("hosts", &doc(json!({"host_id": 1})))
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.count("hosts", &Document::new()).unwrap(), 1);
}
