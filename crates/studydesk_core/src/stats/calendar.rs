//! Monthly due-date heat-map.

use crate::clock::local_day;
use crate::model::task::Task;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

/// Load bucket for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeatIntensity {
    None,
    /// One or two tasks due.
    Light,
    /// Three or four tasks due.
    Moderate,
    /// Five or more tasks due.
    Heavy,
}

impl HeatIntensity {
    pub fn for_count(count: usize) -> Self {
        match count {
            0 => Self::None,
            1..=2 => Self::Light,
            3..=4 => Self::Moderate,
            _ => Self::Heavy,
        }
    }
}

/// A year/month pair that is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// Returns `None` unless `month` is `1..=12` and the year is representable.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    /// Month containing `now` in its local offset.
    pub fn containing(now: &DateTime<FixedOffset>) -> Self {
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn next(self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year.checked_add(1)?, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    pub fn previous(self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year.checked_sub(1)?, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// Every day of the month in ascending order.
    pub fn days(self) -> Vec<NaiveDate> {
        let Some(first) = NaiveDate::from_ymd_opt(self.year, self.month, 1) else {
            return Vec::new();
        };
        first
            .iter_days()
            .take_while(|day| day.month() == self.month)
            .collect()
    }

    /// Title such as `October 2026`.
    pub fn title(self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

/// One heat-map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub task_count: usize,
    pub intensity: HeatIntensity,
    pub is_today: bool,
}

/// Builds the heat-map for `month`, bucketing due dates in `now`'s offset.
pub fn month_heatmap(
    tasks: &[Task],
    month: CalendarMonth,
    now: &DateTime<FixedOffset>,
) -> Vec<CalendarDay> {
    let offset = now.offset();
    let today = now.date_naive();
    let due_days: Vec<NaiveDate> = tasks
        .iter()
        .map(|task| local_day(task.due_date, offset))
        .collect();

    month
        .days()
        .into_iter()
        .map(|date| {
            let task_count = due_days.iter().filter(|day| **day == date).count();
            CalendarDay {
                date,
                task_count,
                intensity: HeatIntensity::for_count(task_count),
                is_today: date == today,
            }
        })
        .collect()
}
