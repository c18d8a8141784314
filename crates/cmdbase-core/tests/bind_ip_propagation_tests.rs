mod common;

use common::{
    bind_ip_of, ctx, doc, instance, new_store, seed_host, seed_process, seed_relation,
    seed_template, RecordingStore,
};
use serde_json::json;

use cmdbase_core::gateway::AcceptAll;
use cmdbase_core::ops::instance_ops;
use cmdbase_core::router::{COLLECTION_HOSTS, COLLECTION_PROCESS_RELATIONS};
use cmdbase_core::store::{DocStore, FindOptions};

// ===== BIND IP PROPAGATION TESTS =====

#[test]
fn test_inner_ip_change_updates_derived_process() {
    let mut store = new_store();
    seed_host(&mut store, "tenant-a", 1, "10.0.0.1");
    // process 10 derives its bind address from the host's inner ip
    seed_relation(&mut store, 1, 10, 100);
    seed_template(&mut store, 100, true, "inner");
    seed_process(&mut store, 10, "10.0.0.1");
    // process 11 does not derive from the host
    seed_relation(&mut store, 1, 11, 101);
    seed_template(&mut store, 101, false, "inner");
    seed_process(&mut store, 11, "10.0.0.1");

    let updated = instance_ops::update_instances(
        &mut store,
        &AcceptAll,
        &ctx("tenant-a"),
        "host",
        doc(json!({"host_id": 1})),
        instance(json!({"inner_ip": "10.0.0.9"})),
        false,
    )
    .unwrap();

    assert_eq!(updated.count, 1);
    assert_eq!(bind_ip_of(&store, 10), "10.0.0.9");
    assert_eq!(bind_ip_of(&store, 11), "10.0.0.1");
}

#[test]
fn test_outer_ip_change_updates_outer_derived_process() {
    let mut store = new_store();
    store
        .insert(
            COLLECTION_HOSTS,
            doc(json!({"owner_id": "tenant-a", "host_id": 1, "outer_ip": "8.8.8.1"})),
        )
        .unwrap();
    seed_relation(&mut store, 1, 10, 100);
    seed_template(&mut store, 100, true, "outer");
    seed_process(&mut store, 10, "8.8.8.1");
    // inner-derived process must not react to an outer change
    seed_relation(&mut store, 1, 11, 101);
    seed_template(&mut store, 101, true, "inner");
    seed_process(&mut store, 11, "10.0.0.1");

    instance_ops::update_instances(
        &mut store,
        &AcceptAll,
        &ctx("tenant-a"),
        "host",
        doc(json!({"host_id": 1})),
        instance(json!({"outer_ip": "8.8.8.2"})),
        false,
    )
    .unwrap();

    assert_eq!(bind_ip_of(&store, 10), "8.8.8.2");
    assert_eq!(bind_ip_of(&store, 11), "10.0.0.1");
}

#[test]
fn test_unchanged_first_ip_issues_no_relation_queries() {
    let mut inner = new_store();
    seed_host(&mut inner, "tenant-a", 1, "10.0.0.1,10.0.0.2");
    seed_relation(&mut inner, 1, 10, 100);
    seed_template(&mut inner, 100, true, "inner");
    seed_process(&mut inner, 10, "10.0.0.1");

    let mut store = RecordingStore::wrap(inner);
    // second address changes, first address stays the same
    instance_ops::update_instances(
        &mut store,
        &AcceptAll,
        &ctx("tenant-a"),
        "host",
        doc(json!({"host_id": 1})),
        instance(json!({"inner_ip": "10.0.0.1,9.9.9.9"})),
        false,
    )
    .unwrap();

    assert!(!store.found_in(COLLECTION_PROCESS_RELATIONS));
    assert_eq!(bind_ip_of(&store.inner, 10), "10.0.0.1");
}

#[test]
fn test_patch_without_address_fields_skips_propagation() {
    let mut inner = new_store();
    seed_host(&mut inner, "tenant-a", 1, "10.0.0.1");
    seed_relation(&mut inner, 1, 10, 100);
    seed_template(&mut inner, 100, true, "inner");
    seed_process(&mut inner, 10, "10.0.0.1");

    let mut store = RecordingStore::wrap(inner);
    instance_ops::update_instances(
        &mut store,
        &AcceptAll,
        &ctx("tenant-a"),
        "host",
        doc(json!({"host_id": 1})),
        instance(json!({"memo": "no address change"})),
        false,
    )
    .unwrap();

    assert!(!store.found_in(COLLECTION_PROCESS_RELATIONS));
}

#[test]
fn test_sequence_valued_patch_propagates_first_element() {
    let mut store = new_store();
    seed_host(&mut store, "tenant-a", 1, "10.0.0.1");
    seed_relation(&mut store, 1, 10, 100);
    seed_template(&mut store, 100, true, "inner");
    seed_process(&mut store, 10, "10.0.0.1");

    instance_ops::update_instances(
        &mut store,
        &AcceptAll,
        &ctx("tenant-a"),
        "host",
        doc(json!({"host_id": 1})),
        instance(json!({"inner_ip": ["10.0.0.9", "10.0.0.10"]})),
        false,
    )
    .unwrap();

    assert_eq!(bind_ip_of(&store, 10), "10.0.0.9");
}

#[test]
fn test_multiple_affected_hosts_share_one_bulk_update() {
    let mut store = new_store();
    seed_host(&mut store, "tenant-a", 1, "10.0.0.1");
    seed_host(&mut store, "tenant-a", 2, "10.0.0.2");
    seed_relation(&mut store, 1, 10, 100);
    seed_relation(&mut store, 2, 20, 100);
    seed_template(&mut store, 100, true, "inner");
    seed_process(&mut store, 10, "10.0.0.1");
    seed_process(&mut store, 20, "10.0.0.2");

    let updated = instance_ops::update_instances(
        &mut store,
        &AcceptAll,
        &ctx("tenant-a"),
        "host",
        doc(json!({})),
        instance(json!({"inner_ip": "10.0.0.9"})),
        false,
    )
    .unwrap();

    assert_eq!(updated.count, 2);
    assert_eq!(bind_ip_of(&store, 10), "10.0.0.9");
    assert_eq!(bind_ip_of(&store, 20), "10.0.0.9");
}

#[test]
fn test_host_without_relations_propagates_nothing() {
    let mut store = new_store();
    seed_host(&mut store, "tenant-a", 1, "10.0.0.1");
    seed_process(&mut store, 10, "10.0.0.1");

    instance_ops::update_instances(
        &mut store,
        &AcceptAll,
        &ctx("tenant-a"),
        "host",
        doc(json!({"host_id": 1})),
        instance(json!({"inner_ip": "10.0.0.9"})),
        false,
    )
    .unwrap();

    assert_eq!(bind_ip_of(&store, 10), "10.0.0.1");
}

#[test]
fn test_host_write_survives_and_bind_ip_follows() {
    let mut store = new_store();
    seed_host(&mut store, "tenant-a", 1, "10.0.0.1");
    seed_relation(&mut store, 1, 10, 100);
    seed_template(&mut store, 100, true, "inner");
    seed_process(&mut store, 10, "10.0.0.1");

    instance_ops::update_instances(
        &mut store,
        &AcceptAll,
        &ctx("tenant-a"),
        "host",
        doc(json!({"host_id": 1})),
        instance(json!({"inner_ip": "10.0.0.9"})),
        false,
    )
    .unwrap();

    let hosts = store
        .find(COLLECTION_HOSTS, &doc(json!({"host_id": 1})), &FindOptions::all())
        .unwrap();
    assert_eq!(hosts[0].get("inner_ip"), Some(&json!("10.0.0.9")));
    assert_eq!(bind_ip_of(&store, 10), "10.0.0.9");
}
