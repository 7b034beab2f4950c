use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use studydesk_core::stats::{
    compute_stats, compute_subject_progress, month_heatmap, subject_progress_report,
    HeatIntensity,
};
use studydesk_core::{CalendarMonth, Priority, Subject, SubjectId, Task, TaskStats, TaskStatus};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
}

fn task(id: u64, subject: Option<SubjectId>, due: DateTime<Utc>) -> Task {
    Task {
        id,
        title: format!("task {id}"),
        description: None,
        subject,
        due_date: due,
        priority: Priority::Medium,
        status: TaskStatus::NotStarted,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        completed_at: None,
    }
}

fn done(mut task: Task) -> Task {
    task.status = TaskStatus::Completed;
    task.completed_at = Some(task.created_at);
    task
}

fn subject(id: SubjectId) -> Subject {
    Subject {
        id,
        name: format!("subject {id}"),
        color: String::new(),
        icon: String::new(),
    }
}

#[test]
fn empty_collection_has_zero_rate() {
    let stats = compute_stats(&[], now());
    assert_eq!(stats, TaskStats::default());
    assert_eq!(stats.completion_rate, 0);
}

#[test]
fn stats_count_every_bucket() {
    let mut urgent = task(3, Some(1), now() + Duration::days(2));
    urgent.priority = Priority::High;
    let tasks = vec![
        task(1, Some(1), now() - Duration::days(1)),
        done(task(2, Some(1), now() - Duration::days(3))),
        urgent,
        task(4, Some(2), now() + Duration::days(30)),
    ];

    let stats = compute_stats(&tasks, now());

    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.completion_rate, 25);
    assert_eq!(stats.this_week, 1);
    assert_eq!(stats.high_priority, 1);
}

#[test]
fn completion_rate_rounds_to_nearest() {
    let due = now() + Duration::days(1);
    let tasks = vec![
        done(task(1, None, due)),
        done(task(2, None, due)),
        task(3, None, due),
    ];
    assert_eq!(compute_stats(&tasks, now()).completion_rate, 67);

    let one_of_three = vec![done(task(1, None, due)), task(2, None, due), task(3, None, due)];
    assert_eq!(compute_stats(&one_of_three, now()).completion_rate, 33);

    let one_of_eight: Vec<Task> = (1..=8)
        .map(|id| {
            let t = task(id, None, due);
            if id == 1 {
                done(t)
            } else {
                t
            }
        })
        .collect();
    // 12.5% rounds half up.
    assert_eq!(compute_stats(&one_of_eight, now()).completion_rate, 13);
}

#[test]
fn this_week_window_includes_both_bounds() {
    let tasks = vec![
        task(1, None, now()),
        task(2, None, now() + Duration::days(7)),
        task(3, None, now() + Duration::days(7) + Duration::seconds(1)),
        task(4, None, now() - Duration::seconds(1)),
        done(task(5, None, now() + Duration::days(1))),
    ];

    assert_eq!(compute_stats(&tasks, now()).this_week, 3);
}

#[test]
fn subject_progress_uses_only_matching_tasks() {
    let due = now();
    let tasks = vec![
        done(task(1, Some(1), due)),
        task(2, Some(1), due),
        task(3, Some(1), due),
        done(task(4, Some(2), due)),
        task(5, None, due),
    ];

    let progress = compute_subject_progress(&subject(1), &tasks);
    assert_eq!(progress.completed_count, 1);
    assert_eq!(progress.total_count, 3);
    assert_eq!(progress.percent, 33);

    let empty = compute_subject_progress(&subject(9), &tasks);
    assert_eq!((empty.completed_count, empty.total_count, empty.percent), (0, 0, 0));

    let subjects = vec![subject(2), subject(1)];
    let report = subject_progress_report(&subjects, &tasks);
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].0.id, 2);
    assert_eq!(report[0].1.percent, 100);
    assert_eq!(report[1].1.total_count, 3);
}

#[test]
fn heatmap_covers_month_and_buckets_counts() {
    let month = CalendarMonth::new(2024, 2).unwrap();
    let on = |day: u32, hour: u32| Utc.with_ymd_and_hms(2024, 2, day, hour, 0, 0).unwrap();
    let mut tasks: Vec<Task> = (1..=5).map(|id| task(id, None, on(14, 9))).collect();
    tasks.push(task(6, None, on(20, 9)));
    tasks.extend((7..=9).map(|id| task(id, None, on(29, 9))));
    tasks.push(task(10, None, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()));

    let today = on(20, 15).fixed_offset();
    let days = month_heatmap(&tasks, month, &today);

    assert_eq!(days.len(), 29);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(days[13].task_count, 5);
    assert_eq!(days[13].intensity, HeatIntensity::Heavy);
    assert_eq!(days[19].intensity, HeatIntensity::Light);
    assert!(days[19].is_today);
    assert_eq!(days[28].intensity, HeatIntensity::Moderate);
    assert_eq!(days.iter().map(|day| day.task_count).sum::<usize>(), 9);
    assert_eq!(days.iter().filter(|day| day.is_today).count(), 1);
}

#[test]
fn heatmap_buckets_by_local_day() {
    let month = CalendarMonth::new(2024, 3).unwrap();
    // 22:00 UTC on Mar 31 is Apr 1 at UTC+03:00.
    let tasks = vec![task(1, None, Utc.with_ymd_and_hms(2024, 3, 31, 22, 0, 0).unwrap())];
    let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();

    let utc_days = month_heatmap(&tasks, month, &now().fixed_offset());
    assert_eq!(utc_days[30].task_count, 1);

    let local_days = month_heatmap(&tasks, month, &now().with_timezone(&plus_three));
    assert_eq!(local_days.iter().map(|day| day.task_count).sum::<usize>(), 0);
}

#[test]
fn calendar_month_navigation() {
    let december = CalendarMonth::new(2024, 12).unwrap();
    assert_eq!(december.next(), CalendarMonth::new(2025, 1));
    assert_eq!(CalendarMonth::new(2025, 1).unwrap().previous(), Some(december));
    assert_eq!(december.title(), "December 2024");
    assert!(CalendarMonth::new(2024, 13).is_none());
    assert!(CalendarMonth::new(2024, 0).is_none());
}
