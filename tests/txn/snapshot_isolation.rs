//! Snapshot isolation: transactions read from the image fixed at begin.

use crate::common::setup;
use latticedb::Value;

/// A long-running reader keeps seeing the price it started with while the
/// store moves on underneath it.
#[test]
fn slow_reader_time_travels() {
    let (store, manager) = setup();
    store.write("price", 100_i64);

    let slow = manager.begin().unwrap();

    store.write("price", 200_i64);
    store.write("price", 300_i64);

    assert_eq!(manager.read(slow, "price").unwrap(), Some(Value::I64(100)));
    assert_eq!(
        store.read("price", store.current_version()),
        Some(Value::I64(300))
    );
    manager.abort(slow).unwrap();
}

#[test]
fn reads_are_repeatable_within_a_transaction() {
    let (store, manager) = setup();
    store.write("k", 1_i64);

    let txn = manager.begin().unwrap();
    let first = manager.read(txn, "k").unwrap();

    store.write("k", 2_i64);
    store.write("k", 3_i64);

    assert_eq!(manager.read(txn, "k").unwrap(), first);
    manager.abort(txn).unwrap();
}

#[test]
fn two_transactions_at_same_snapshot_agree() {
    let (store, manager) = setup();
    store.write("account", 1000_i64);

    let t1 = manager.begin().unwrap();
    let t2 = manager.begin().unwrap();

    assert_eq!(manager.read(t1, "account").unwrap(), Some(Value::I64(1000)));
    assert_eq!(manager.read(t2, "account").unwrap(), Some(Value::I64(1000)));

    manager.abort(t1).unwrap();
    manager.abort(t2).unwrap();
}

#[test]
fn uncommitted_writes_are_invisible_to_others() {
    let (_store, manager) = setup();

    let writer = manager.begin().unwrap();
    manager.write(writer, "draft", 1_i64).unwrap();

    let reader = manager.begin().unwrap();
    assert_eq!(manager.read(reader, "draft").unwrap(), None);

    manager.commit(writer).unwrap();
    // Still invisible: the reader's snapshot predates the commit.
    assert_eq!(manager.read(reader, "draft").unwrap(), None);
    manager.abort(reader).unwrap();
}

/// A multi-key commit is visible to later transactions as a whole.
#[test]
fn multi_key_commit_is_atomic_for_new_snapshots() {
    let (_store, manager) = setup();
    let seed = manager.begin().unwrap();
    manager.write(seed, "alice", 500_i64).unwrap();
    manager.write(seed, "bob", 500_i64).unwrap();
    manager.commit(seed).unwrap();

    let before = manager.begin().unwrap();

    let transfer = manager.begin().unwrap();
    manager.write(transfer, "alice", 400_i64).unwrap();
    manager.write(transfer, "bob", 600_i64).unwrap();
    manager.commit(transfer).unwrap();

    // Begun before the transfer: sees neither write.
    assert_eq!(manager.read(before, "alice").unwrap(), Some(Value::I64(500)));
    assert_eq!(manager.read(before, "bob").unwrap(), Some(Value::I64(500)));
    manager.abort(before).unwrap();

    // Begun after: sees both.
    let after = manager.begin().unwrap();
    assert_eq!(manager.read(after, "alice").unwrap(), Some(Value::I64(400)));
    assert_eq!(manager.read(after, "bob").unwrap(), Some(Value::I64(600)));
    manager.abort(after).unwrap();
}

/// The atomic bank transfer: commit applies both sides, abort applies
/// neither.
#[test]
fn transfer_commits_wholly_or_not_at_all() {
    let (store, manager) = setup();
    store.write("alice", 500_i64);
    store.write("bob", 500_i64);

    let ok = manager.begin().unwrap();
    manager.write(ok, "alice", 400_i64).unwrap();
    manager.write(ok, "bob", 600_i64).unwrap();
    manager.commit(ok).unwrap();

    let current = store.current_version();
    assert_eq!(store.read("alice", current), Some(Value::I64(400)));
    assert_eq!(store.read("bob", current), Some(Value::I64(600)));

    // Second transfer debits alice, then fails before crediting bob.
    let broken = manager.begin().unwrap();
    let alice = manager.read(broken, "alice").unwrap().unwrap().as_i64().unwrap();
    manager.write(broken, "alice", alice - 100).unwrap();
    manager.abort(broken).unwrap();

    let current = store.current_version();
    assert_eq!(store.read("alice", current), Some(Value::I64(400)));
    assert_eq!(store.read("bob", current), Some(Value::I64(600)));
}
