use std::sync::{Arc, Mutex};

use todo_calendar::store::Change;
use todo_calendar::{TaskId, TaskStore};

const DAY: &str = "2025-03-01";
const NEXT_DAY: &str = "2025-03-02";

/// Returns a store whose changes are recorded in the returned list
fn recorded_store() -> (TaskStore, Arc<Mutex<Vec<Change>>>) {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let mut store = TaskStore::new();

    let recorder = Arc::clone(&changes);
    store.subscribe(move |change, _state| {
        recorder.lock().unwrap().push(change.clone());
    });
    (store, changes)
}

#[test]
fn test_add_task() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut store = TaskStore::new();

    let id = store.add_task(DAY, "Buy milk");

    let tasks = store.tasks_for(DAY);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id(), id);
    assert_eq!(tasks[0].text(), "Buy milk");
    assert_eq!(tasks[0].completed(), false);
}

#[test]
fn test_tasks_keep_their_creation_order() {
    let mut store = TaskStore::new();
    let ids: Vec<TaskId> = ["one", "two", "three"].iter()
        .map(|text| store.add_task(DAY, *text))
        .collect();

    let stored: Vec<TaskId> = store.tasks_for(DAY).iter().map(|task| task.id()).collect();
    assert_eq!(stored, ids);

    let texts: Vec<&str> = store.tasks_for(DAY).iter().map(|task| task.text()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[test]
fn test_empty_text_is_accepted() {
    let mut store = TaskStore::new();
    store.add_task(DAY, "");
    store.add_task(DAY, "   ");
    assert_eq!(store.tasks_for(DAY).len(), 2);
}

#[test]
fn test_toggle_twice_restores_the_flag() {
    let mut store = TaskStore::new();
    let id = store.add_task(DAY, "Workout");

    assert!(store.toggle_task(DAY, id));
    assert_eq!(store.tasks_for(DAY)[0].completed(), true);
    assert!(store.toggle_task(DAY, id));
    assert_eq!(store.tasks_for(DAY)[0].completed(), false);
}

#[test]
fn test_toggle_only_affects_the_targeted_task() {
    let mut store = TaskStore::new();
    let first = store.add_task(DAY, "first");
    let second = store.add_task(DAY, "second");

    store.toggle_task(DAY, second);
    assert_eq!(store.state().task(DAY, first).map(|task| task.completed()), Some(false));
    assert_eq!(store.state().task(DAY, second).map(|task| task.completed()), Some(true));
}

#[test]
fn test_toggle_miss_is_a_no_op() {
    let (mut store, changes) = recorded_store();
    store.add_task(DAY, "Buy milk");
    let before = store.snapshot();

    assert!(store.toggle_task(DAY, TaskId::from(99999)) == false);
    assert!(store.toggle_task(NEXT_DAY, TaskId::from(99999)) == false);

    assert_eq!(*store.state(), before);
    assert!(store.has_date_key(NEXT_DAY) == false);
    assert_eq!(changes.lock().unwrap().len(), 1);
}

#[test]
fn test_remove_keeps_the_date() {
    let mut store = TaskStore::new();
    let id = store.add_task(DAY, "Buy milk");

    assert!(store.remove_task(DAY, id));
    assert!(store.tasks_for(DAY).is_empty());
    assert_eq!(store.date_keys().collect::<Vec<_>>(), vec![DAY]);
}

#[test]
fn test_remove_miss_leaves_the_tasks_unchanged() {
    let (mut store, changes) = recorded_store();
    store.add_task(DAY, "Buy milk");
    let before = store.snapshot();

    assert!(store.remove_task(DAY, TaskId::from(99999)) == false);
    assert_eq!(*store.state(), before);
    assert_eq!(changes.lock().unwrap().len(), 1);
}

#[test]
fn test_remove_from_unknown_date_creates_an_empty_date() {
    let (mut store, changes) = recorded_store();

    assert!(store.remove_task(NEXT_DAY, TaskId::from(1)) == false);
    assert!(store.has_date_key(NEXT_DAY));
    assert!(store.tasks_for(NEXT_DAY).is_empty());
    assert_eq!(*changes.lock().unwrap(), vec![Change::BucketCreated { date_key: NEXT_DAY.to_string() }]);
}

#[test]
fn test_dates_are_isolated() {
    let mut store = TaskStore::new();
    let id = store.add_task(DAY, "Buy milk");

    assert!(store.tasks_for(NEXT_DAY).is_empty());
    assert!(store.toggle_task(NEXT_DAY, id) == false);
    assert!(store.remove_task(NEXT_DAY, id) == false);
    assert_eq!(store.tasks_for(DAY).len(), 1);
    assert_eq!(store.tasks_for(DAY)[0].completed(), false);
}

#[test]
fn test_date_keys_keep_their_first_appearance_order() {
    let mut store = TaskStore::new();
    store.add_task("2025-03-05", "a");
    store.add_task("2025-03-01", "b");
    store.add_task("2025-03-05", "c");
    let id = store.add_task("2025-03-03", "d");
    store.remove_task("2025-03-03", id);

    let keys: Vec<&String> = store.date_keys().collect();
    assert_eq!(keys, vec!["2025-03-05", "2025-03-01", "2025-03-03"]);
}

#[test]
fn test_every_change_is_notified_before_returning() {
    let (mut store, changes) = recorded_store();

    let id = store.add_task(DAY, "Buy milk");
    assert_eq!(changes.lock().unwrap().len(), 1);
    store.toggle_task(DAY, id);
    assert_eq!(changes.lock().unwrap().len(), 2);
    store.remove_task(DAY, id);

    assert_eq!(*changes.lock().unwrap(), vec![
        Change::Added { date_key: DAY.to_string(), id },
        Change::Toggled { date_key: DAY.to_string(), id, completed: true },
        Change::Removed { date_key: DAY.to_string(), id },
    ]);
}

#[test]
fn test_observers_see_the_new_state() {
    let mut store = TaskStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let recorder = Arc::clone(&seen);
    store.subscribe(move |change, state| {
        recorder.lock().unwrap().push(state.tasks_for(change.date_key()).len());
    });
    let order = Arc::new(Mutex::new(Vec::new()));
    let order_first = Arc::clone(&order);
    let order_second = Arc::clone(&order);
    store.subscribe(move |_, _| order_first.lock().unwrap().push("first"));
    store.subscribe(move |_, _| order_second.lock().unwrap().push("second"));

    store.add_task(DAY, "a");
    store.add_task(DAY, "b");

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "first", "second"]);
}
