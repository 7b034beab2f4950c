use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use std::time::Instant;
use studydesk_core::{
    Clock, EntityKind, FixedClock, MemoryStore, Priority, Store, StoreError, Subject,
    SubjectDraft, SubjectPatch, Task, TaskDraft, TaskPatch, TaskStatus, ValidationError,
};

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_utc(
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(),
    ))
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft::new(
        title,
        Some(1),
        Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap(),
    )
}

#[tokio::test]
async fn create_then_get_by_id_roundtrip() {
    let clock = clock();
    let store: MemoryStore<Task> = MemoryStore::new(clock.clone());

    let data = draft("Essay outline")
        .with_description("Three sections")
        .with_priority(Priority::High);
    let created = store.create(data.clone()).await.unwrap();
    let loaded = store.get_by_id(created.id).await.unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.id, 1);
    assert_eq!(loaded.title, data.title);
    assert_eq!(loaded.description, data.description);
    assert_eq!(loaded.subject, data.subject);
    assert_eq!(loaded.due_date, data.due_date);
    assert_eq!(loaded.priority, data.priority);
    assert_eq!(loaded.status, data.status);
    assert_eq!(loaded.created_at, clock.now_utc());
    assert_eq!(loaded.completed_at, None);
}

#[tokio::test]
async fn ids_are_max_plus_one() {
    let store: MemoryStore<Task> = MemoryStore::new(clock());

    let first = store.create(draft("a")).await.unwrap();
    let second = store.create(draft("b")).await.unwrap();
    let third = store.create(draft("c")).await.unwrap();
    assert_eq!((first.id, second.id, third.id), (1, 2, 3));

    store.delete(second.id).await.unwrap();
    let fourth = store.create(draft("d")).await.unwrap();
    assert_eq!(fourth.id, 4);

    store.delete(fourth.id).await.unwrap();
    store.delete(third.id).await.unwrap();
    let reused = store.create(draft("e")).await.unwrap();
    assert_eq!(reused.id, 2);
}

#[tokio::test]
async fn seeded_store_continues_after_highest_id() {
    let seeded = Subject {
        id: 7,
        name: "Chemistry".to_string(),
        color: "bg-green-500".to_string(),
        icon: "flask".to_string(),
    };
    let store = MemoryStore::with_records(clock(), vec![seeded]).unwrap();

    let created = store.create(SubjectDraft::new("Biology")).await.unwrap();
    assert_eq!(created.id, 8);
    assert_eq!(created.name, "Biology");
}

#[tokio::test]
async fn get_all_returns_copies() {
    let store: MemoryStore<Task> = MemoryStore::new(clock());
    store.create(draft("original")).await.unwrap();

    let mut snapshot = store.get_all().await.unwrap();
    snapshot[0].title = "mutated by caller".to_string();
    snapshot.clear();

    let fresh = store.get_all().await.unwrap();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].title, "original");
}

#[tokio::test]
async fn update_merges_patch_and_keeps_id() {
    let store: MemoryStore<Task> = MemoryStore::new(clock());
    let created = store.create(draft("Lab report")).await.unwrap();

    let patch = TaskPatch {
        title: Some("Lab report v2".to_string()),
        priority: Some(Priority::Low),
        ..TaskPatch::default()
    };
    let updated = store.update(created.id, patch).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Lab report v2");
    assert_eq!(updated.priority, Priority::Low);
    assert_eq!(updated.due_date, created.due_date);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(store.get_by_id(created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn completion_timestamp_tracks_status_on_every_write() {
    let clock = clock();
    let store: MemoryStore<Task> = MemoryStore::new(clock.clone());

    let completed = store
        .create(draft("done on arrival").with_status(TaskStatus::Completed))
        .await
        .unwrap();
    assert_eq!(completed.completed_at, Some(clock.now_utc()));

    let task = store.create(draft("reading")).await.unwrap();
    clock.advance(Duration::hours(2));

    let done = store
        .update(task.id, TaskPatch::status(TaskStatus::Completed))
        .await
        .unwrap();
    assert_eq!(done.completed_at, Some(clock.now_utc()));

    let started = store
        .update(task.id, TaskPatch::status(TaskStatus::InProgress))
        .await
        .unwrap();
    assert_eq!(started.completed_at, None);

    let stray = TaskPatch {
        completed_at: Some(Some(clock.now_utc())),
        ..TaskPatch::default()
    };
    let still_open = store.update(task.id, stray).await.unwrap();
    assert_eq!(still_open.status, TaskStatus::InProgress);
    assert_eq!(still_open.completed_at, None);

    for stored in store.get_all().await.unwrap() {
        assert_eq!(stored.completed_at.is_some(), stored.is_completed());
    }
}

#[tokio::test]
async fn missing_ids_fail_with_not_found() {
    let store: MemoryStore<Task> = MemoryStore::new(clock());
    store.create(draft("only")).await.unwrap();

    let expected = StoreError::NotFound {
        kind: EntityKind::Task,
        id: 42,
    };
    assert_eq!(store.get_by_id(42).await.unwrap_err(), expected);
    assert_eq!(
        store.update(42, TaskPatch::default()).await.unwrap_err(),
        expected
    );
    assert_eq!(store.delete(42).await.unwrap_err(), expected);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn delete_removes_entity() {
    let store: MemoryStore<Task> = MemoryStore::new(clock());
    let task = store.create(draft("temporary")).await.unwrap();

    assert!(store.delete(task.id).await.unwrap());
    assert!(store.is_empty().await);
    assert!(store.get_by_id(task.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn invalid_writes_are_rejected_without_commit() {
    let store: MemoryStore<Task> = MemoryStore::new(clock());

    let err = store.create(draft("   ")).await.unwrap_err();
    assert_eq!(err, StoreError::Invalid(ValidationError::BlankTitle));
    assert!(store.is_empty().await);

    let task = store.create(draft("keep me")).await.unwrap();
    let blank = TaskPatch {
        title: Some(String::new()),
        ..TaskPatch::default()
    };
    assert!(matches!(
        store.update(task.id, blank).await,
        Err(StoreError::Invalid(ValidationError::BlankTitle))
    ));
    assert_eq!(store.get_by_id(task.id).await.unwrap().title, "keep me");
}

#[tokio::test]
async fn subject_store_rejects_blank_names() {
    let store: MemoryStore<Subject> = MemoryStore::new(clock());
    let subject = store.create(SubjectDraft::new("Physics")).await.unwrap();

    let err = store
        .update(subject.id, SubjectPatch::rename(" "))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::Invalid(ValidationError::BlankSubjectName));
}

#[tokio::test]
async fn with_records_rejects_duplicate_ids() {
    let clock = clock();
    let now = clock.now_utc();
    let task = Task {
        id: 3,
        title: "dup".to_string(),
        description: None,
        subject: None,
        due_date: now,
        priority: Priority::Medium,
        status: TaskStatus::NotStarted,
        created_at: now,
        completed_at: None,
    };

    let result = MemoryStore::with_records(clock, vec![task.clone(), task]);
    assert!(matches!(
        result,
        Err(StoreError::Invalid(ValidationError::DuplicateId {
            kind: EntityKind::Task,
            id: 3
        }))
    ));
}

#[tokio::test]
async fn operations_wait_for_configured_latency() {
    let latency = std::time::Duration::from_millis(20);
    let store: MemoryStore<Task> = MemoryStore::new(clock()).with_latency(latency);
    assert_eq!(store.latency(), latency);

    let started = Instant::now();
    store.create(draft("slow")).await.unwrap();
    store.get_all().await.unwrap();
    assert!(started.elapsed() >= latency * 2);
}
