use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use ticktask_core::db::open_db_in_memory;
use ticktask_core::{
    MemorySlotStorage, SlotStorage, SqliteSlotStorage, StoreError, Task, TaskStore,
    TASKS_SLOT_KEY,
};

fn stored_tasks(storage: &MemorySlotStorage) -> Option<Vec<Task>> {
    storage
        .read(TASKS_SLOT_KEY)
        .unwrap()
        .map(|snapshot| serde_json::from_str(&snapshot).unwrap())
}

#[test]
fn add_task_assigns_distinct_ids() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);

    let mut ids = HashSet::new();
    for index in 0..20 {
        let id = store.add_task(format!("task {index}"), None).unwrap();
        assert!(ids.insert(id), "task ids must be pairwise distinct");
    }
    assert_eq!(store.tasks().len(), 20);
}

#[test]
fn every_mutation_writes_through_before_publishing() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);

    let id = store.add_task("write me down", None).unwrap();
    assert_eq!(stored_tasks(&storage).unwrap(), store.tasks());

    store.toggle_task(&id).unwrap();
    assert_eq!(stored_tasks(&storage).unwrap(), store.tasks());

    store
        .update_task(&id, "still written down", Some("note".to_string()))
        .unwrap();
    assert_eq!(stored_tasks(&storage).unwrap(), store.tasks());

    store.delete_task(&id).unwrap();
    assert_eq!(stored_tasks(&storage).unwrap(), store.tasks());
    assert!(store.tasks().is_empty());
}

#[test]
fn add_task_rejects_blank_title_without_persisting() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);

    let err = store.add_task("   ", None).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(store.tasks().is_empty());
    assert!(storage.read(TASKS_SLOT_KEY).unwrap().is_none());
}

#[test]
fn update_task_rejects_blank_title_and_keeps_old_state() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);
    let id = store.add_task("original", None).unwrap();

    let err = store.update_task(&id, "", None).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.tasks()[0].title, "original");
    assert_eq!(stored_tasks(&storage).unwrap(), store.tasks());
}

#[test]
fn update_task_keeps_id_and_completion() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);
    let id = store.add_task("Buy milk", None).unwrap();
    store.toggle_task(&id).unwrap();

    let changed = store
        .update_task(&id, "Buy oat milk", Some("the barista one".to_string()))
        .unwrap();
    assert!(changed);

    let task = &store.tasks()[0];
    assert_eq!(task.id, id);
    assert_eq!(task.title, "Buy oat milk");
    assert_eq!(task.about.as_deref(), Some("the barista one"));
    assert!(task.completed, "update must not touch the completion flag");
}

#[test]
fn toggle_twice_restores_original_state() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);
    let id = store.add_task("flip me", None).unwrap();

    assert!(!store.tasks()[0].completed);
    store.toggle_task(&id).unwrap();
    assert!(store.tasks()[0].completed);
    store.toggle_task(&id).unwrap();
    assert!(!store.tasks()[0].completed);
}

#[test]
fn mutations_on_missing_id_are_noops() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);
    store.add_task("only task", None).unwrap();
    let before = store.tasks().to_vec();
    let snapshot_before = storage.read(TASKS_SLOT_KEY).unwrap();

    assert!(!store.update_task("no-such-id", "renamed", None).unwrap());
    assert!(!store.toggle_task("no-such-id").unwrap());
    assert!(!store.delete_task("no-such-id").unwrap());

    assert_eq!(store.tasks(), before);
    // No-ops must not rewrite the slot either.
    assert_eq!(storage.read(TASKS_SLOT_KEY).unwrap(), snapshot_before);
}

#[test]
fn delete_preserves_order_of_remaining_tasks() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);
    store.add_task("first", None).unwrap();
    let middle = store.add_task("second", None).unwrap();
    store.add_task("third", None).unwrap();

    assert!(store.delete_task(&middle).unwrap());

    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["first", "third"]);
}

#[test]
fn failed_slot_write_leaves_memory_and_slot_untouched() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);
    let id = store.add_task("durable", None).unwrap();
    let before = store.tasks().to_vec();
    let snapshot_before = storage.read(TASKS_SLOT_KEY).unwrap().unwrap();

    storage.fail_next_write();
    let err = store.toggle_task(&id).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));

    // Fail-closed: candidate state was discarded on both sides.
    assert_eq!(store.tasks(), before);
    assert_eq!(
        storage.read(TASKS_SLOT_KEY).unwrap().as_deref(),
        Some(snapshot_before.as_str())
    );

    // The store stays usable after the fault clears.
    assert!(store.toggle_task(&id).unwrap());
}

#[test]
fn load_tasks_on_empty_slot_keeps_current_list() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);
    store.add_task("already here", None).unwrap();

    let other = MemorySlotStorage::new();
    other.seed(TASKS_SLOT_KEY, "   ");
    let mut blank_store = TaskStore::new(&other);
    assert_eq!(blank_store.load_tasks().unwrap(), 0);

    assert_eq!(store.load_tasks().unwrap(), 1);
    assert_eq!(store.tasks()[0].title, "already here");
}

#[test]
fn load_tasks_with_corrupt_snapshot_keeps_previous_list() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);
    store.add_task("survivor", None).unwrap();

    storage.seed(TASKS_SLOT_KEY, "{not json");
    let err = store.load_tasks().unwrap_err();
    assert!(matches!(err, StoreError::Snapshot(_)));
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].title, "survivor");
}

#[test]
fn load_tasks_accepts_legacy_timestamp_id_snapshots() {
    let storage = MemorySlotStorage::new();
    storage.seed(
        TASKS_SLOT_KEY,
        r#"[{"id":"1700000000000","title":"legacy","completed":false}]"#,
    );
    let mut store = TaskStore::new(&storage);

    assert_eq!(store.load_tasks().unwrap(), 1);
    assert!(store.toggle_task("1700000000000").unwrap());
    assert!(store.tasks()[0].completed);
}

#[test]
fn fresh_store_reproduces_last_persisted_list() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteSlotStorage::new(&conn);

    let first_id;
    {
        let mut store = TaskStore::new(&storage);
        first_id = store
            .add_task("Buy milk", Some("2 liters".to_string()))
            .unwrap();
        store.add_task("Water plants", None).unwrap();
        store.toggle_task(&first_id).unwrap();
    }

    // Simulated restart: new store over the same persistent slot.
    let mut reloaded = TaskStore::new(&storage);
    assert_eq!(reloaded.load_tasks().unwrap(), 2);

    let tasks = reloaded.tasks();
    assert_eq!(tasks[0].id, first_id);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].about.as_deref(), Some("2 liters"));
    assert!(tasks[0].completed);
    assert_eq!(tasks[1].title, "Water plants");
    assert!(!tasks[1].completed);
}

#[test]
fn subscribers_observe_every_published_state() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);

    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |tasks| sink.borrow_mut().push(tasks.len()));

    let id = store.add_task("notify me", None).unwrap();
    store.toggle_task(&id).unwrap();
    store.delete_task(&id).unwrap();

    assert_eq!(*seen.borrow(), vec![1, 1, 0]);
}

#[test]
fn subscribers_are_not_notified_on_failed_mutation() {
    let storage = MemorySlotStorage::new();
    let mut store = TaskStore::new(&storage);

    let seen: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    store.subscribe(move |_| *sink.borrow_mut() += 1);

    storage.fail_next_write();
    assert!(store.add_task("never published", None).is_err());
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn full_lifecycle_scenario() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteSlotStorage::new(&conn);
    let mut store = TaskStore::new(&storage);
    assert_eq!(store.load_tasks().unwrap(), 0);

    let id = store.add_task("Buy milk", None).unwrap();
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].title, "Buy milk");
    assert!(!store.tasks()[0].completed);

    store.toggle_task(&id).unwrap();
    assert!(store.tasks()[0].completed);

    store.update_task(&id, "Buy oat milk", None).unwrap();
    assert_eq!(store.tasks()[0].title, "Buy oat milk");
    assert!(store.tasks()[0].completed);

    store.delete_task(&id).unwrap();
    assert!(store.tasks().is_empty());

    // Restart: the last persisted state was the empty list.
    let mut restarted = TaskStore::new(&storage);
    assert_eq!(restarted.load_tasks().unwrap(), 0);
    assert!(restarted.tasks().is_empty());
}
