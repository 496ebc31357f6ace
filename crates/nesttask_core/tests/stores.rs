use nesttask_core::db::{open_db, open_db_in_memory};
use nesttask_core::{
    CompletedAt, CompletionLedger, Completion, KvRepoError, KvRepoResult, KvRepository,
    LedgerEffect, SqliteKvRepository, Task, TaskId, TaskTreeStore, COMPLETION_KEY, TASK_TREE_KEY,
};

/// Repository whose every call fails, to exercise fail-soft paths.
struct BrokenRepo;

impl KvRepository for BrokenRepo {
    fn get(&self, _key: &str) -> KvRepoResult<Option<String>> {
        Err(KvRepoError::MissingRequiredTable("kv_entries"))
    }

    fn put(&self, _key: &str, _value: &str) -> KvRepoResult<()> {
        Err(KvRepoError::MissingRequiredTable("kv_entries"))
    }

    fn delete(&self, _key: &str) -> KvRepoResult<()> {
        Err(KvRepoError::MissingRequiredTable("kv_entries"))
    }
}

fn stamp(value: &str) -> CompletedAt {
    CompletedAt::parse(value).unwrap()
}

#[test]
fn tree_store_round_trips_structure_without_completion() {
    let conn = open_db_in_memory().unwrap();
    let store = TaskTreeStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    let tree = vec![Task::with_id("1", "Parent")
        .with_completion(Completion::Completed(stamp("2025-10-26 11:05:21")))
        .with_children(vec![Task::with_id("1-1", "Child")])];
    store.save(&tree);

    let raw = SqliteKvRepository::try_new(&conn)
        .unwrap()
        .get(TASK_TREE_KEY)
        .unwrap()
        .unwrap();
    assert!(!raw.contains("completedAt"));

    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].children[0].id, TaskId::from("1-1"));
    assert_eq!(loaded[0].completion, Completion::Incomplete);
}

#[test]
fn tree_store_degrades_malformed_or_absent_data_to_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let store = TaskTreeStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    assert!(store.load().is_empty());

    repo.put(TASK_TREE_KEY, "{not json").unwrap();
    assert!(store.load().is_empty());

    repo.put(TASK_TREE_KEY, r#"{"id":"1","title":"not a list"}"#).unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn tree_store_keeps_nodes_whose_deadline_is_unreadable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let store = TaskTreeStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    repo.put(
        TASK_TREE_KEY,
        r#"[{"id":"1","title":"x","deadline":"soon","children":[
            {"id":"1-1","title":"y","deadline":42,"children":[]}
        ]}]"#,
    )
    .unwrap();

    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].deadline, None);
    assert_eq!(loaded[0].children[0].id, TaskId::from("1-1"));
    assert_eq!(loaded[0].children[0].deadline, None);
}

#[test]
fn tree_store_accepts_utc_rfc3339_deadlines_without_dropping_siblings() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let store = TaskTreeStore::new(SqliteKvRepository::try_new(&conn).unwrap());

    repo.put(
        TASK_TREE_KEY,
        r#"[
            {"id":"1","title":"Errands","children":[
                {"id":"1-1","title":"Groceries","children":[]}
            ]},
            {"id":"2","title":"Call bank","deadline":"2025-10-28T09:30:00.000Z","children":[]}
        ]"#,
    )
    .unwrap();

    let loaded = store.load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].children[0].title, "Groceries");
    assert_eq!(loaded[1].deadline.unwrap().to_string(), "2025-10-28T09:30");

    store.save(&loaded);
    assert_eq!(store.load(), loaded);
}

#[test]
fn tree_store_reads_original_web_storage_shape() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    repo.put(
        TASK_TREE_KEY,
        r#"[{"id":"1","title":"Plan weekend trip","deadline":"2025-10-28T09:30","children":[
            {"id":"1-1","title":"Book hotel","completedAt":"2025-10-26 11:05:21","children":[]}
        ]}]"#,
    )
    .unwrap();

    let loaded = TaskTreeStore::new(repo).load();
    assert_eq!(loaded[0].deadline.unwrap().to_string(), "2025-10-28T09:30");
    assert!(!loaded[0].children[0].is_done());
}

#[test]
fn ledger_set_get_remove_and_apply() {
    let conn = open_db_in_memory().unwrap();
    let ledger = CompletionLedger::new(SqliteKvRepository::try_new(&conn).unwrap());
    let id = TaskId::from("1-1");

    ledger.set(&id, stamp("2025-10-26 11:05:21"));
    assert_eq!(ledger.get(&id), Some(stamp("2025-10-26 11:05:21")));
    assert_eq!(ledger.get_all().len(), 1);

    ledger.apply(&LedgerEffect::Erase { id: id.clone() });
    assert_eq!(ledger.get(&id), None);

    ledger.apply(&LedgerEffect::Record {
        id: id.clone(),
        completed_at: stamp("2025-10-26 12:00:00"),
    });
    ledger.remove(&id);
    assert!(ledger.get_all().is_empty());
}

#[test]
fn ledger_skips_malformed_payloads_and_entries() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let ledger = CompletionLedger::new(SqliteKvRepository::try_new(&conn).unwrap());

    repo.put(COMPLETION_KEY, "[1, 2, 3]").unwrap();
    assert!(ledger.get_all().is_empty());

    repo.put(
        COMPLETION_KEY,
        r#"{"a":"2025-10-26 11:05:21","b":"not a time"}"#,
    )
    .unwrap();
    let entries = ledger.get_all();
    assert_eq!(entries.len(), 1);
    assert!(entries.contains_key(&TaskId::from("a")));
}

#[test]
fn stores_fail_soft_when_repository_is_broken() {
    let store = TaskTreeStore::new(BrokenRepo);
    store.save(&[Task::with_id("1", "lost")]);
    assert!(store.load().is_empty());

    let ledger = CompletionLedger::new(BrokenRepo);
    ledger.set(&TaskId::from("1"), stamp("2025-10-26 11:05:21"));
    ledger.clear();
    assert_eq!(ledger.get(&TaskId::from("1")), None);
}

#[test]
fn ledger_clear_ends_the_session_but_keeps_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");
    let conn = open_db(&path).unwrap();
    let store = TaskTreeStore::new(SqliteKvRepository::try_new(&conn).unwrap());
    let ledger = CompletionLedger::new(SqliteKvRepository::try_new(&conn).unwrap());

    store.save(&[Task::with_id("1", "Stays")]);
    ledger.set(&TaskId::from("1"), stamp("2025-10-26 11:05:21"));
    ledger.clear();

    assert!(ledger.get_all().is_empty());
    assert_eq!(store.load().len(), 1);
}
