use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use studydesk_core::query::{
    annotate, compare_tasks, empty_state, list_counts, list_tasks, sort_tasks,
    subject_task_counts, DueLabel, DueTone, EmptyState,
};
use studydesk_core::{
    Category, Priority, Subject, SubjectFilter, Task, TaskId, TaskQuery, TaskStatus,
};

fn now() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0)
        .unwrap()
        .fixed_offset()
}

fn subject(id: u64, name: &str) -> Subject {
    Subject {
        id,
        name: name.to_string(),
        color: "bg-blue-500".to_string(),
        icon: "book".to_string(),
    }
}

fn task(id: TaskId, title: &str, due: DateTime<Utc>) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: None,
        subject: Some(1),
        due_date: due,
        priority: Priority::Medium,
        status: TaskStatus::NotStarted,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        completed_at: None,
    }
}

fn completed(mut task: Task) -> Task {
    task.status = TaskStatus::Completed;
    task.completed_at = Some(task.created_at);
    task
}

fn with_priority(mut task: Task, priority: Priority) -> Task {
    task.priority = priority;
    task
}

fn ids(tasks: &[Task]) -> Vec<TaskId> {
    tasks.iter().map(|task| task.id).collect()
}

fn yesterday() -> DateTime<Utc> {
    now().with_timezone(&Utc) - Duration::days(1)
}

#[test]
fn overdue_excludes_completed_tasks() {
    let tasks = vec![
        task(1, "late essay", yesterday()),
        completed(task(2, "late but done", yesterday())),
    ];
    let subjects = vec![subject(1, "Literature")];

    let query = TaskQuery::new().category(Category::Overdue);
    let result = list_tasks(&tasks, &subjects, &query, &now());

    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn overdue_is_strictly_before_now() {
    let exactly_now = task(1, "due right now", now().with_timezone(&Utc));
    let tasks = vec![exactly_now];
    let query = TaskQuery::new().category(Category::Overdue);

    assert!(list_tasks(&tasks, &[subject(1, "Math")], &query, &now()).is_empty());
}

#[test]
fn search_matches_title_or_description_case_insensitively() {
    let mut described = task(2, "Chapter review", yesterday());
    described.description = Some("Covers THERMODYNAMICS basics".to_string());
    let tasks = vec![
        task(1, "Thermodynamics problem set", yesterday()),
        described,
        task(3, "Poetry reading", yesterday()),
    ];
    let subjects = vec![subject(1, "Physics")];

    let query = TaskQuery::new().search("thermo");
    assert_eq!(ids(&list_tasks(&tasks, &subjects, &query, &now())), vec![1, 2]);

    let everything = TaskQuery::new().search("");
    assert_eq!(list_tasks(&tasks, &subjects, &everything, &now()).len(), 3);
}

#[test]
fn dangling_subject_is_excluded_from_specific_filter_only() {
    let mut orphan = task(2, "orphan", yesterday());
    orphan.subject = Some(99);
    let mut unassigned = task(3, "unassigned", yesterday());
    unassigned.subject = None;
    let tasks = vec![task(1, "math", yesterday()), orphan, unassigned];
    let subjects = vec![subject(1, "Math")];

    let only_math = TaskQuery::new().subject(SubjectFilter::Only(1));
    assert_eq!(ids(&list_tasks(&tasks, &subjects, &only_math, &now())), vec![1]);

    let missing = TaskQuery::new().subject(SubjectFilter::Only(99));
    assert!(list_tasks(&tasks, &subjects, &missing, &now()).is_empty());

    let all = TaskQuery::new().subject(SubjectFilter::All);
    assert_eq!(list_tasks(&tasks, &subjects, &all, &now()).len(), 3);
}

#[test]
fn today_and_tomorrow_use_calendar_days_in_clock_offset() {
    // 23:30 UTC on the 10th is already the 11th at UTC+02:00.
    let late_evening = Utc.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();
    let next_morning = Utc.with_ymd_and_hms(2024, 3, 11, 8, 0, 0).unwrap();
    let tasks = vec![task(1, "late", late_evening), task(2, "morning", next_morning)];
    let subjects = vec![subject(1, "Math")];

    let today_query = TaskQuery::new().category(Category::Today);
    let tomorrow_query = TaskQuery::new().category(Category::Tomorrow);

    let utc_now = now();
    assert_eq!(ids(&list_tasks(&tasks, &subjects, &today_query, &utc_now)), vec![1]);
    assert_eq!(ids(&list_tasks(&tasks, &subjects, &tomorrow_query, &utc_now)), vec![2]);

    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    let local_now = now().with_timezone(&plus_two);
    assert!(list_tasks(&tasks, &subjects, &today_query, &local_now).is_empty());
    assert_eq!(
        ids(&list_tasks(&tasks, &subjects, &tomorrow_query, &local_now)),
        vec![1, 2]
    );
}

#[test]
fn priority_and_status_categories() {
    let tasks = vec![
        with_priority(task(1, "a", yesterday()), Priority::High),
        with_priority(task(2, "b", yesterday()), Priority::Low),
        completed(task(3, "c", yesterday())),
    ];
    let subjects = vec![subject(1, "Math")];
    let run = |category| ids(&list_tasks(&tasks, &subjects, &TaskQuery::new().category(category), &now()));

    assert_eq!(run(Category::HighPriority), vec![1]);
    assert_eq!(run(Category::LowPriority), vec![2]);
    assert_eq!(run(Category::MediumPriority), vec![3]);
    assert_eq!(run(Category::Completed), vec![3]);
    assert_eq!(run(Category::Pending), vec![1, 2]);
}

#[test]
fn counts_ignore_category_but_honour_search_and_subject() {
    let mut other_subject = task(4, "essay draft", yesterday());
    other_subject.subject = Some(2);
    let tasks = vec![
        task(1, "essay outline", yesterday()),
        completed(task(2, "essay final", yesterday())),
        with_priority(task(3, "lab", now().with_timezone(&Utc)), Priority::High),
        other_subject,
    ];
    let subjects = vec![subject(1, "Literature"), subject(2, "History")];

    let query = TaskQuery::new()
        .search("essay")
        .subject(SubjectFilter::Only(1))
        .category(Category::Completed);
    let counts = list_counts(&tasks, &subjects, &query, &now());

    assert_eq!(counts.get(Category::All), 2);
    assert_eq!(counts.get(Category::Completed), 1);
    assert_eq!(counts.get(Category::Pending), 1);
    assert_eq!(counts.get(Category::Overdue), 1);
    assert_eq!(counts.get(Category::HighPriority), 0);
    assert_eq!(counts.iter().count(), Category::ALL.len());

    let unfiltered = list_counts(&tasks, &subjects, &TaskQuery::new(), &now());
    assert_eq!(unfiltered.get(Category::All), 4);
    assert_eq!(unfiltered.get(Category::Today), 1);
    assert_eq!(unfiltered.get(Category::HighPriority), 1);
}

#[test]
fn sort_puts_incomplete_first_then_due_then_priority() {
    let early = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
    let mut tasks = vec![
        completed(task(1, "done early", early)),
        with_priority(task(2, "late low", late), Priority::Low),
        with_priority(task(3, "late high", late), Priority::High),
        task(4, "late medium", late),
        task(5, "early pending", early),
    ];

    sort_tasks(&mut tasks);
    assert_eq!(ids(&tasks), vec![5, 3, 4, 2, 1]);

    for pair in tasks.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(!(a.is_completed() && !b.is_completed()));
        if a.is_completed() == b.is_completed() {
            assert!(a.due_date <= b.due_date);
            if a.due_date == b.due_date {
                assert!(a.priority >= b.priority);
            }
        }
    }
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let due = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
    let mut tasks = vec![task(9, "first", due), task(3, "second", due), task(7, "third", due)];
    assert_eq!(compare_tasks(&tasks[0], &tasks[1]), std::cmp::Ordering::Equal);

    sort_tasks(&mut tasks);
    assert_eq!(ids(&tasks), vec![9, 3, 7]);
}

#[test]
fn annotate_resolves_subjects_and_due_labels() {
    let today = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
    let tomorrow = Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap();
    let mut orphan = task(4, "orphan", later);
    orphan.subject = Some(42);
    let tasks = vec![
        task(1, "today", today),
        task(2, "tomorrow", tomorrow),
        task(3, "late", yesterday()),
        orphan,
    ];
    let subjects = vec![subject(1, "Math")];

    let views = annotate(&tasks, &subjects, &now());

    assert_eq!(views[0].due_label, DueLabel::Today);
    assert_eq!(views[0].due_tone, DueTone::DueToday);
    assert_eq!(views[0].subject.as_ref().map(|s| s.name.as_str()), Some("Math"));
    assert_eq!(views[1].due_label, DueLabel::Tomorrow);
    assert_eq!(views[1].due_tone, DueTone::Upcoming);
    assert_eq!(views[2].due_tone, DueTone::Overdue);
    assert_eq!(views[3].subject, None);
    assert_eq!(views[3].due_label.to_string(), "Mar 25");
}

#[test]
fn subject_task_counts_ignore_dangling_references() {
    let mut orphan = task(3, "orphan", yesterday());
    orphan.subject = Some(77);
    let tasks = vec![task(1, "a", yesterday()), task(2, "b", yesterday()), orphan];
    let subjects = vec![subject(1, "Math"), subject(2, "Physics")];

    assert_eq!(subject_task_counts(&tasks, &subjects), vec![(1, 2), (2, 0)]);
}

#[test]
fn empty_state_depends_on_search_term() {
    assert_eq!(empty_state(&TaskQuery::new()), EmptyState::NoTasks);
    assert_eq!(
        empty_state(&TaskQuery::new().category(Category::Overdue)),
        EmptyState::NoTasks
    );
    assert_eq!(empty_state(&TaskQuery::new().search("essay")), EmptyState::NoMatches);
}

#[test]
fn category_labels_and_keys() {
    assert_eq!(Category::HighPriority.label(), "High Priority");
    assert_eq!(Category::Today.label(), "Today");
    for category in Category::ALL {
        assert_eq!(category.as_str().parse::<Category>().ok(), Some(category));
        assert!(!category.label().is_empty());
    }
}
