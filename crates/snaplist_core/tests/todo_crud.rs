use rusqlite::Connection;
use snaplist_core::db::open_db_in_memory;
use snaplist_core::{
    LocalTodoRepository, RepoError, SqliteSlotStore, Todo, TodoPatch, TodoRepository, TodoService,
    TodoValidationError, TITLE_MAX_CHARS,
};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);

    let todo = Todo::with_id("1", "Buy milk");
    assert!(repo.create(todo.clone()).unwrap());

    let loaded = repo.get("1").unwrap();
    assert_eq!(loaded, todo);
}

#[test]
fn create_increases_count_by_exactly_one() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    repo.create(Todo::with_id("1", "existing")).unwrap();

    let before = repo.all().len();
    repo.create(Todo::with_id("2", "new entry")).unwrap();

    let after = repo.all();
    assert_eq!(after.len(), before + 1);
    assert!(after.iter().any(|todo| todo.id == "2"));
}

#[test]
fn get_is_idempotent_between_mutations() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    repo.create(Todo::with_id("1", "stable read")).unwrap();

    let first = repo.get("1");
    let second = repo.get("1");
    assert_eq!(first, second);
}

#[test]
fn get_with_empty_or_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    repo.create(Todo::with_id("1", "present")).unwrap();

    assert!(repo.get("").is_none());
    assert!(repo.get("missing").is_none());
}

#[test]
fn update_merges_patch_and_preserves_other_fields() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    repo.create(Todo::with_id("1", "Buy milk")).unwrap();

    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    assert!(repo.update("1", &patch).unwrap());

    let updated = repo.get("1").unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "Buy milk");
    assert_eq!(updated.id, "1");
}

#[test]
fn update_preserves_identity_under_full_patch() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    let original = Todo::with_id("1", "before");
    repo.create(original.clone()).unwrap();

    let patch = TodoPatch {
        title: Some("after".to_string()),
        completed: Some(true),
    };
    repo.update("1", &patch).unwrap();

    let updated = repo.get("1").unwrap();
    assert_eq!(updated.id, "1");
    assert_eq!(updated.created_at_ms, original.created_at_ms);
    assert_eq!(updated.title, "after");
    assert!(updated.completed);
}

#[test]
fn update_missing_id_fails_and_leaves_collection_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    repo.create(Todo::with_id("1", "untouched")).unwrap();
    let before = repo.all();

    let err = repo
        .update("nonexistent", &TodoPatch::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "nonexistent"));
    assert_eq!(repo.all(), before);
}

#[test]
fn update_targets_the_first_match_on_duplicate_ids() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    repo.create(Todo::with_id("dup", "first")).unwrap();
    repo.create(Todo::with_id("dup", "second")).unwrap();

    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    repo.update("dup", &patch).unwrap();

    let all = repo.all();
    assert!(all[0].completed);
    assert!(!all[1].completed);
}

#[test]
fn delete_removes_every_match() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    repo.create(Todo::with_id("dup", "first")).unwrap();
    repo.create(Todo::with_id("dup", "second")).unwrap();
    repo.create(Todo::with_id("keep", "other")).unwrap();

    assert!(repo.delete("dup").unwrap());

    let remaining = repo.all();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "keep");
}

#[test]
fn delete_on_miss_reports_success_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    repo.create(Todo::with_id("1", "survivor")).unwrap();
    let before = repo.all();

    assert!(repo.delete("nonexistent").unwrap());
    assert_eq!(repo.all(), before);
}

#[test]
fn full_crud_scenario_over_an_empty_store() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = repository(&conn);
    let updates = repo.watch_all();
    assert!(updates.next_emission().unwrap().is_empty());

    assert!(repo.create(Todo::with_id("1", "Buy milk")).unwrap());
    let emitted = updates.next_emission().unwrap();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].id, "1");

    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    assert!(repo.update("1", &patch).unwrap());
    assert!(repo.get("1").unwrap().completed);

    assert!(repo.delete("1").unwrap());
    assert!(updates.latest().unwrap().is_empty());

    let err = repo.update("1", &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "1"));
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TodoService::new(repository(&conn));

    let created = service.add_todo("from service").unwrap();
    assert_eq!(service.get(&created.id).unwrap().title, "from service");

    service.set_completed(&created.id, true).unwrap();
    assert!(service.get(&created.id).unwrap().completed);

    service.rename(&created.id, "renamed").unwrap();
    assert_eq!(service.get(&created.id).unwrap().title, "renamed");

    service.delete(&created.id).unwrap();
    assert!(service.get(&created.id).is_none());
    assert!(service.all().is_empty());
}

#[test]
fn add_todo_trims_the_title_before_storing() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TodoService::new(repository(&conn));

    let created = service.add_todo("  spaced out  ").unwrap();
    assert_eq!(created.title, "spaced out");
}

#[test]
fn add_todo_rejects_blank_and_overlong_titles() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TodoService::new(repository(&conn));

    let blank = service.add_todo("   ").unwrap_err();
    assert!(matches!(
        blank,
        RepoError::Validation(TodoValidationError::EmptyTitle)
    ));

    let overlong = service.add_todo("a".repeat(TITLE_MAX_CHARS + 1)).unwrap_err();
    assert!(matches!(
        overlong,
        RepoError::Validation(TodoValidationError::TitleTooLong { .. })
    ));

    assert!(service.all().is_empty());
}

#[test]
fn rename_rejects_invalid_titles_without_mutating() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TodoService::new(repository(&conn));
    let created = service.add_todo("keep me").unwrap();

    let err = service.rename(&created.id, "").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TodoValidationError::EmptyTitle)
    ));
    assert_eq!(service.get(&created.id).unwrap().title, "keep me");
}

fn repository(conn: &Connection) -> LocalTodoRepository<SqliteSlotStore<'_>> {
    let store = SqliteSlotStore::try_new(conn).unwrap();
    LocalTodoRepository::new(store)
}
