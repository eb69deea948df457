use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use taskq::clock::FixedClock;
use taskq::error::StorageResult;
use taskq::{
    InMemoryRepository, JsonFileRepository, NewTask, Origin, Priority, Session, Status, StorageError, Task,
    TaskError, TaskRepository,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0).unwrap()
}

struct DiskSession {
    dir: TempDir,
    session: Session<JsonFileRepository, FixedClock>,
}

impl DiskSession {
    fn repo(&self) -> JsonFileRepository {
        JsonFileRepository::new(
            self.dir.path().join("tasks.json"),
            self.dir.path().join("archived_tasks.json"),
        )
    }

    /// Reopen the same directory as a fresh process would.
    fn reopen(&self, now: DateTime<Utc>) -> Session<JsonFileRepository, FixedClock> {
        Session::open(self.repo(), FixedClock::new(now))
    }
}

#[fixture]
fn disk() -> DiskSession {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("tasks.json"), dir.path().join("archived_tasks.json"));
    let session = Session::open(repo, FixedClock::new(t0()));
    DiskSession { dir, session }
}

#[fixture]
fn memory() -> Session<InMemoryRepository, FixedClock> {
    Session::open(InMemoryRepository::new(), FixedClock::new(t0()))
}

#[rstest]
fn urgent_task_is_selected_before_earlier_low_task(mut memory: Session<InMemoryRepository, FixedClock>) {
    let mut engine = memory.engine();
    engine.create(NewTask::new("T1", Priority::Low, Origin::Email)).unwrap();
    let t2 = engine.create(NewTask::new("T2", Priority::Urgent, Origin::Phone)).unwrap();

    let picked = engine.select_next().unwrap();
    assert_eq!(picked.id, t2.id);
    assert_eq!(picked.status, Status::InProgress);
}

#[rstest]
fn second_selection_conflicts_and_changes_nothing(mut memory: Session<InMemoryRepository, FixedClock>) {
    let mut engine = memory.engine();
    engine.create(NewTask::new("T1", Priority::Low, Origin::Email)).unwrap();
    engine.create(NewTask::new("T2", Priority::Urgent, Origin::Phone)).unwrap();
    engine.select_next().unwrap();
    let before = engine.store().all().to_vec();

    let err = engine.select_next().unwrap_err();
    assert!(matches!(err, TaskError::Conflict(_)));
    assert!(err.is_informational());
    assert_eq!(engine.store().all(), before.as_slice());
    assert_eq!(engine.store().find(2).unwrap().status, Status::InProgress);
}

#[rstest]
fn completed_task_is_archived_after_eight_days(mut disk: DiskSession) {
    {
        let mut engine = disk.session.engine();
        engine.create(NewTask::new("T2", Priority::Urgent, Origin::Phone)).unwrap();
        engine.select_next().unwrap();
        engine.complete().unwrap();
    }
    disk.session.save().unwrap();

    disk.session.clock().advance(Duration::days(8));
    assert_eq!(disk.session.archive_stale().unwrap(), 1);
    disk.session.save().unwrap();

    assert!(disk.session.active_rows().is_empty());
    let archived = disk.session.archived_rows().unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].title, "T2");
    assert_eq!(archived[0].status, Status::Archived);
    assert_eq!(archived[0].completed_at, Some(t0()));
}

#[rstest]
#[case::exactly_seven_days(Duration::days(7), 0)]
#[case::one_second_past(Duration::days(7) + Duration::seconds(1), 1)]
#[case::six_days(Duration::days(6), 0)]
fn archival_threshold_is_strict(
    mut memory: Session<InMemoryRepository, FixedClock>,
    #[case] elapsed: Duration,
    #[case] expected: usize,
) {
    {
        let mut engine = memory.engine();
        engine.create(NewTask::new("done", Priority::Medium, Origin::SystemTicket)).unwrap();
        engine.select_next().unwrap();
        engine.complete().unwrap();
    }
    memory.clock().advance(elapsed);
    assert_eq!(memory.archive_stale().unwrap(), expected);
    assert_eq!(memory.store().len(), 1 - expected);
}

#[rstest]
fn pending_and_in_progress_tasks_are_never_archived(mut memory: Session<InMemoryRepository, FixedClock>) {
    {
        let mut engine = memory.engine();
        engine.create(NewTask::new("working", Priority::Urgent, Origin::Email)).unwrap();
        engine.create(NewTask::new("waiting", Priority::Low, Origin::Email)).unwrap();
        engine.select_next().unwrap();
    }
    memory.clock().advance(Duration::days(30));
    assert_eq!(memory.archive_stale().unwrap(), 0);
    assert_eq!(memory.store().len(), 2);
}

#[rstest]
fn priority_update_on_unknown_id_is_not_found(mut memory: Session<InMemoryRepository, FixedClock>) {
    let mut engine = memory.engine();
    engine.create(NewTask::new("only", Priority::Low, Origin::Phone)).unwrap();
    let before = engine.store().all().to_vec();

    assert!(matches!(engine.update_priority(42, Priority::Urgent), Err(TaskError::NotFound(_))));
    assert_eq!(engine.store().all(), before.as_slice());
}

#[rstest]
fn priority_update_applies_to_completed_tasks(mut memory: Session<InMemoryRepository, FixedClock>) {
    let mut engine = memory.engine();
    engine.create(NewTask::new("done", Priority::Low, Origin::Phone)).unwrap();
    engine.select_next().unwrap();
    engine.complete().unwrap();

    let updated = engine.update_priority(1, Priority::High).unwrap();
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.status, Status::Completed);
}

#[rstest]
fn deleted_task_reaches_archive_but_not_archived_report(mut disk: DiskSession) {
    let deleted = {
        let mut engine = disk.session.engine();
        engine.create(NewTask::new("drop me", Priority::Medium, Origin::Email)).unwrap();
        engine.delete_task(1).unwrap()
    };
    assert_eq!(deleted.status, Status::Deleted);
    assert!(disk.session.store().is_empty());

    assert!(disk.session.archived_rows().unwrap().is_empty());
    let raw = disk.session.repo().load_archive().unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].id, 1);
    assert_eq!(raw[0].status, Status::Deleted);
}

#[rstest]
fn deleting_unknown_id_writes_nothing(mut memory: Session<InMemoryRepository, FixedClock>) {
    assert!(matches!(memory.engine().delete_task(9), Err(TaskError::NotFound(_))));
    assert!(memory.repo().load_archive().unwrap().is_empty());
}

#[rstest]
fn ids_keep_increasing_across_reloads(mut disk: DiskSession) {
    {
        let mut engine = disk.session.engine();
        for title in ["a", "b", "c"] {
            engine.create(NewTask::new(title, Priority::Medium, Origin::Email)).unwrap();
        }
        engine.delete_task(3).unwrap();
    }
    disk.session.save().unwrap();

    let mut reopened = disk.reopen(t0());
    let next = reopened.engine().create(NewTask::new("d", Priority::Low, Origin::Phone)).unwrap();
    assert_eq!(next.id, 4);

    let ids: Vec<u64> = reopened.store().all().iter().map(|t| t.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[rstest]
fn at_most_one_task_in_progress_through_a_full_day(mut memory: Session<InMemoryRepository, FixedClock>) {
    let priorities = [Priority::Low, Priority::High, Priority::Urgent, Priority::Medium, Priority::High];
    for (i, p) in priorities.into_iter().enumerate() {
        memory.engine().create(NewTask::new(format!("task {i}"), p, Origin::Email)).unwrap();
    }

    let mut order = Vec::new();
    loop {
        let in_progress = memory.store().all().iter().filter(|t| t.status == Status::InProgress).count();
        assert!(in_progress <= 1);
        match memory.engine().select_next() {
            Ok(task) => order.push(task.priority),
            Err(TaskError::NotFound(_)) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
        memory.clock().advance(Duration::minutes(30));
        memory.engine().complete().unwrap();
    }

    assert_eq!(
        order,
        vec![Priority::Urgent, Priority::High, Priority::High, Priority::Medium, Priority::Low]
    );
}

#[rstest]
fn state_survives_a_restart(mut disk: DiskSession) {
    {
        let mut engine = disk.session.engine();
        engine
            .create(NewTask::new("write report", Priority::High, Origin::SystemTicket).with_description("quarterly"))
            .unwrap();
        engine.create(NewTask::new("call back", Priority::Low, Origin::Phone)).unwrap();
        engine.select_next().unwrap();
    }
    disk.session.clock().advance(Duration::hours(2) + Duration::minutes(15));
    disk.session.engine().complete().unwrap();
    disk.session.save().unwrap();

    let reopened = disk.reopen(t0() + Duration::days(1));
    assert_eq!(reopened.store().all(), disk.session.store().all());

    let done = reopened.store().find(1).unwrap();
    assert_eq!(done.description.as_deref(), Some("quarterly"));
    assert_eq!(done.execution_time(), Some(Duration::minutes(135)));

    let line = reopened.active_rows()[0].to_string();
    assert!(line.contains("Execution time: 2h 15m"), "{line}");
}

/// Repository whose archive sink always fails.
#[derive(Default)]
struct BrokenArchive {
    inner: InMemoryRepository,
}

impl TaskRepository for BrokenArchive {
    fn load_active(&self) -> StorageResult<Vec<Task>> {
        self.inner.load_active()
    }

    fn save_active(&self, tasks: &[Task]) -> StorageResult<()> {
        self.inner.save_active(tasks)
    }

    fn append_archive(&self, _snapshot: &Task) -> StorageResult<()> {
        Err(StorageError::io(
            "archived_tasks.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        ))
    }

    fn load_archive(&self) -> StorageResult<Vec<Task>> {
        self.inner.load_archive()
    }
}

#[rstest]
fn failed_archive_write_keeps_task_active() {
    let mut session = Session::open(BrokenArchive::default(), FixedClock::new(t0()));
    {
        let mut engine = session.engine();
        engine.create(NewTask::new("done", Priority::Medium, Origin::Email)).unwrap();
        engine.create(NewTask::new("unwanted", Priority::Low, Origin::Email)).unwrap();
        engine.select_next().unwrap();
        engine.complete().unwrap();
    }
    session.clock().advance(Duration::days(10));

    assert!(matches!(session.archive_stale(), Err(TaskError::Storage(_))));
    assert!(matches!(session.engine().delete_task(2), Err(TaskError::Storage(_))));

    assert_eq!(session.store().len(), 2);
    assert_eq!(session.store().find(1).unwrap().status, Status::Completed);
    assert_eq!(session.store().find(2).unwrap().status, Status::Pending);
}
