//! GC retention rule at the store level.

use latticedb::{Value, VersionStore};

#[test]
fn prune_keeps_watermark_visible_and_newer() {
    let store = VersionStore::new();
    for i in 1..=6 {
        store.write("k", i as i64); // ids 1..=6
    }

    // A reader pinned at 4 must keep resolving version 4; 5 and 6 are
    // newer than the watermark and stay for current readers.
    let pruned = store.prune(4);
    assert_eq!(pruned, 3);
    assert_eq!(store.read("k", 4), Some(Value::I64(4)));
    assert_eq!(store.read("k", 6), Some(Value::I64(6)));
    // History below the watermark is gone: snapshot 2 now resolves to the
    // oldest retained version rather than the discarded version 2.
    assert_eq!(store.read("k", 3), None);
}

#[test]
fn prune_with_watermark_at_current_keeps_one_version_per_key() {
    let store = VersionStore::new();
    for i in 0..10 {
        store.write("a", i as i64);
        store.write("b", i as i64);
    }
    let pruned = store.prune(store.current_version());
    assert_eq!(pruned, 18);
    assert_eq!(store.version_count(), 2);
    assert_eq!(store.read("a", store.current_version()), Some(Value::I64(9)));
    assert_eq!(store.read("b", store.current_version()), Some(Value::I64(9)));
}

#[test]
fn prune_preserves_reads_at_and_above_watermark() {
    let store = VersionStore::new();
    for i in 0..8 {
        store.write(format!("key_{}", i % 3), i as i64);
    }
    let watermark = 5;
    let keys = ["key_0", "key_1", "key_2"];
    let before: Vec<_> = keys.iter().map(|k| store.read(k, watermark)).collect();

    store.prune(watermark);

    let after: Vec<_> = keys.iter().map(|k| store.read(k, watermark)).collect();
    assert_eq!(before, after);
}

#[test]
fn prune_drops_key_reduced_to_old_tombstone() {
    let store = VersionStore::new();
    store.write("gone", 1_i64);
    store.write_tombstone("gone");

    assert_eq!(store.key_count(), 1);
    let pruned = store.prune(store.current_version());
    assert_eq!(pruned, 2);
    assert_eq!(store.key_count(), 0);
    // Indistinguishable from a key never written.
    assert_eq!(store.read("gone", store.current_version()), None);
}

#[test]
fn prune_keeps_tombstone_pinned_by_watermark() {
    let store = VersionStore::new();
    store.write("doc", 1_i64); // v1
    let watermark = store.current_version();
    store.write_tombstone("doc"); // v2

    // A reader at v1 still resolves the value, so both versions survive.
    let pruned = store.prune(watermark);
    assert_eq!(pruned, 0);
    assert_eq!(store.read("doc", watermark), Some(Value::I64(1)));
    assert_eq!(store.read("doc", store.current_version()), None);
}

#[test]
fn prune_on_empty_store_is_a_noop() {
    let store = VersionStore::new();
    assert_eq!(store.prune(0), 0);
    assert_eq!(store.prune(100), 0);
}
