//! Command-line front end for the StudyDesk core.
//!
//! # Responsibility
//! - Load config, start logging and build seeded in-memory stores.
//! - Map subcommands onto `TaskService` operations and print plain text.
//!
//! Mutations live for one process; `--save` writes the resulting state back
//! out as a seed document.

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use studydesk_core::query::{empty_state, DueTone, SubjectFilter};
use studydesk_core::{
    init_logging, AppConfig, CalendarMonth, Category, Clock, DeleteOutcome, MemoryStore,
    Notification, Notifier, Priority, SeedData, ServiceContext, ServiceError, Subject,
    SystemClock, Task, TaskForm, TaskQuery, TaskService, TaskStatus,
};

type CliService = TaskService<MemoryStore<Task>, MemoryStore<Subject>>;

#[derive(Parser)]
#[command(name = "studydesk")]
#[command(about = "Track study tasks by subject, due date and priority")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write the resulting tasks and subjects to this JSON file
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    /// Skip logging setup
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks, sorted pending-first by due date then priority
    List {
        /// all|today|tomorrow|overdue|completed|pending|high|medium|low
        #[arg(short, long, default_value = "all")]
        filter: Category,

        /// Subject id, or "all"
        #[arg(short, long, default_value = "all")]
        subject: SubjectFilter,

        /// Case-insensitive match on title or description
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show overall and per-subject progress
    Stats,
    /// List subjects with their task counts
    Subjects,
    /// Show the due-date heat-map for one month
    Calendar {
        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        month: Option<u32>,
    },
    /// Mark a task completed
    Complete { id: u64 },
    /// Mark a completed task as not started
    Reopen { id: u64 },
    /// Delete a task
    Delete {
        id: u64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Create a task
    Add {
        #[arg(long)]
        title: String,

        /// Subject id
        #[arg(long)]
        subject: String,

        /// yyyy-MM-dd or RFC 3339
        #[arg(long)]
        due: String,

        /// high|medium|low
        #[arg(long, default_value = "medium")]
        priority: Priority,

        #[arg(long, default_value = "")]
        description: String,
    },
}

/// Prints notifications as status lines.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            eprintln!("error: {}", notification.message);
        } else {
            println!("{}", notification.message);
        }
    }
}

fn ask_on_stdin(message: &str) -> bool {
    print!("{message} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    if !cli.quiet {
        init_logging(&config.logging).context("failed to start logging")?;
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::with_offset(config.clock.offset()?));
    let seed = match &config.store.seed_path {
        Some(path) => SeedData::load(path)
            .with_context(|| format!("failed to load seed `{}`", path.display()))?,
        None => SeedData::builtin().context("built-in seed is invalid")?,
    };
    let stores = seed.into_stores(
        clock.clone(),
        config.store.task_latency(),
        config.store.subject_latency(),
    )?;
    let stores_latency = (stores.tasks.latency(), stores.subjects.latency());

    let auto_yes = matches!(cli.command, Commands::Delete { yes: true, .. });
    let context = ServiceContext::new(
        clock,
        Arc::new(ConsoleNotifier),
        Arc::new(move |message: &str| auto_yes || ask_on_stdin(message)),
    );
    let mut service = TaskService::new(stores.tasks, stores.subjects, context);
    service.load().await?;
    info!(
        "event=cli_start module=cli status=ok tasks={} subjects={} task_latency_ms={} subject_latency_ms={}",
        service.tasks().len(),
        service.subjects().len(),
        stores_latency.0.as_millis(),
        stores_latency.1.as_millis()
    );

    run(&mut service, cli.command).await?;

    if let Some(path) = cli.save {
        let snapshot = SeedData {
            subjects: service.subjects().to_vec(),
            tasks: service.tasks().to_vec(),
        };
        snapshot
            .save(&path)
            .with_context(|| format!("failed to save state to `{}`", path.display()))?;
    }
    Ok(())
}

async fn run(service: &mut CliService, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            filter,
            subject,
            search,
        } => {
            let query = TaskQuery::new()
                .search(search)
                .subject(subject)
                .category(filter);
            print_list(service, &query);
        }
        Commands::Stats => print_stats(service),
        Commands::Subjects => print_subjects(service),
        Commands::Calendar { year, month } => {
            let today = CalendarMonth::containing(&service.now());
            let month = CalendarMonth::new(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
            )
            .context("month must be between 1 and 12")?;
            print_calendar(service, month);
        }
        Commands::Complete { id } => {
            let task = service.toggle_complete(id, true).await?;
            println!("{}", task_line(&task));
        }
        Commands::Reopen { id } => {
            let task = service.toggle_complete(id, false).await?;
            println!("{}", task_line(&task));
        }
        Commands::Delete { id, .. } => {
            if service.delete_task(id).await? == DeleteOutcome::Cancelled {
                println!("Delete cancelled");
            }
        }
        Commands::Add {
            title,
            subject,
            due,
            priority,
            description,
        } => {
            let form = TaskForm::new(title, subject, due)
                .with_priority(priority)
                .with_description(description);
            match service.create_or_update_task(&form, None).await {
                Ok(task) => println!("{}", task_line(&task)),
                Err(ServiceError::Validation(errors)) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{}: {message}", field.as_str());
                    }
                    bail!("task was not saved");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(())
}

fn print_list(service: &CliService, query: &TaskQuery) {
    let views = service.list_views(query);
    if views.is_empty() {
        let state = empty_state(query);
        println!("{}\n{}", state.title(), state.message());
        return;
    }
    for view in &views {
        let marker = match view.due_tone {
            DueTone::Completed => "x",
            DueTone::Overdue => "!",
            DueTone::DueToday => "*",
            DueTone::Upcoming => " ",
        };
        let subject = view
            .subject
            .as_ref()
            .map(|subject| subject.name.as_str())
            .unwrap_or("-");
        println!(
            "[{marker}] #{:<3} {:<9} {:<8} {:<18} {}",
            view.task.id,
            view.due_label.to_string(),
            view.task.priority.as_str(),
            subject,
            view.task.title
        );
    }

    let counts = service.list_counts(query);
    let summary: Vec<String> = counts
        .iter()
        .map(|(category, count)| format!("{}: {count}", category.label()))
        .collect();
    println!("\n{}", summary.join(", "));
}

fn print_stats(service: &CliService) {
    let stats = service.stats();
    println!("Total:          {}", stats.total);
    println!("Completed:      {}", stats.completed);
    println!("Pending:        {}", stats.pending);
    println!("Overdue:        {}", stats.overdue);
    println!("Due this week:  {}", stats.this_week);
    println!("High priority:  {}", stats.high_priority);
    println!("Progress:       {}%", stats.completion_rate);
    println!();
    for (subject, progress) in service.subject_progress() {
        println!(
            "{:<18} {}/{} ({}%)",
            subject.name, progress.completed_count, progress.total_count, progress.percent
        );
    }
}

fn print_subjects(service: &CliService) {
    let counts = studydesk_core::query::subject_task_counts(service.tasks(), service.subjects());
    for subject in service.subjects() {
        let count = counts
            .iter()
            .find(|(id, _)| *id == subject.id)
            .map(|(_, count)| *count)
            .unwrap_or(0);
        println!("#{:<3} {:<18} {count} tasks", subject.id, subject.name);
    }
}

fn print_calendar(service: &CliService, month: CalendarMonth) {
    println!("{}", month.title());
    println!("Mo Tu We Th Fr Sa Su");
    let days = service.calendar(month);
    let lead = days
        .first()
        .map(|day| day.date.weekday().num_days_from_monday() as usize)
        .unwrap_or(0);
    let mut line = "   ".repeat(lead);
    for day in &days {
        let cell = if day.task_count == 0 {
            format!("{:>2}", day.date.day())
        } else {
            format!("{:>2}", day.task_count.min(9).to_string() + "*")
        };
        line.push_str(&cell);
        line.push(if day.is_today { '<' } else { ' ' });
        if day.date.weekday().num_days_from_monday() == 6 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
}

fn task_line(task: &Task) -> String {
    let status = match task.status {
        TaskStatus::Completed => "completed",
        TaskStatus::InProgress => "in progress",
        TaskStatus::NotStarted => "not started",
    };
    format!(
        "#{} {} ({status}, due {})",
        task.id,
        task.title,
        task.due_date.format("%Y-%m-%d")
    )
}
