//! Task sweep and due-date reporting commands.

use std::path::PathBuf;

use chrono::{Local, Utc};
use clap::Subcommand;
use hearth_core::task::auto_complete::{
    AutoCompleteEngine, AutoCompleteSummary, DueBreakdown, DueTodayReport,
};
use hearth_core::task::due::{DueStatus, RawTimestamp};
use hearth_core::{ListStore, Priority, Task};

use super::{open_file_store, open_rest_store, save_file_store};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Show tasks due today
    DueToday {
        /// Operate on a local JSON snapshot instead of the hosted store
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the raw report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Auto-complete tasks due today
    Sweep {
        /// Operate on a local JSON snapshot instead of the hosted store
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the raw summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show incomplete-task counts per due status
    Status {
        /// Operate on a local JSON snapshot instead of the hosted store
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the raw breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify a due date against today's calendar date
    Classify {
        /// Due date (RFC 3339 or YYYY-MM-DD); omit for an unscheduled task
        #[arg(long)]
        due: Option<String>,
        /// Treat the task as completed
        #[arg(long)]
        completed: bool,
    },
    /// Add a task to a list in a local JSON snapshot
    Add {
        /// Task title
        title: String,
        /// Snapshot file to modify
        #[arg(long)]
        file: PathBuf,
        /// Target list id or title
        #[arg(long)]
        list: String,
        /// Due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Priority: low, medium, or high
        #[arg(long, default_value = "medium")]
        priority: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = AutoCompleteEngine::new();

    match action {
        TaskAction::DueToday { file, json } => {
            let report = match &file {
                Some(path) => engine.due_today_report(&open_file_store(path)?),
                None => engine.due_today_report(&open_rest_store()?),
            };
            print_report(&report, json)?;
        }
        TaskAction::Sweep { file, json } => {
            let summary = match &file {
                Some(path) => {
                    let store = open_file_store(path)?;
                    let summary = engine.run(&store);
                    save_file_store(path, &store)?;
                    summary
                }
                None => engine.run(&open_rest_store()?),
            };
            print_summary(&summary, json)?;
        }
        TaskAction::Status { file, json } => {
            let breakdown = match &file {
                Some(path) => engine.due_breakdown(&open_file_store(path)?),
                None => engine.due_breakdown(&open_rest_store()?),
            };
            print_breakdown(&breakdown, json)?;
        }
        TaskAction::Classify { due, completed } => {
            let due_date = match due {
                Some(s) => Some(parse_due(&s)?),
                None => None,
            };
            let today = Local::now().date_naive();
            match DueStatus::classify(due_date, completed, today) {
                Some(status) => println!("{}", status.label()),
                None => println!("not classified (completed)"),
            }
        }
        TaskAction::Add {
            title,
            file,
            list,
            due,
            priority,
        } => {
            let store = open_file_store(&file)?;
            let lists = store.lists();
            let target = lists
                .iter()
                .find(|l| l.id == list || l.title == list)
                .ok_or_else(|| format!("unknown task list: {list}"))?;

            let mut task = Task::new(title);
            if let Some(s) = due {
                task.due_date = Some(parse_due(&s)?);
            }
            task.priority = Priority::from_label(&priority);

            let mut tasks = target.tasks.clone();
            tasks.push(task.clone());
            store.update_task_list(&target.id, &tasks, Utc::now())?;
            save_file_store(&file, &store)?;

            println!("Task added: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
    }
    Ok(())
}

fn parse_due(s: &str) -> Result<chrono::DateTime<Utc>, Box<dyn std::error::Error>> {
    RawTimestamp::Rfc3339(s.to_string())
        .normalize()
        .ok_or_else(|| format!("cannot parse due date: {s}").into())
}

fn print_report(report: &DueTodayReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    if report.lists.is_empty() {
        println!("No tasks due today.");
        return Ok(());
    }
    for list in &report.lists {
        println!("{}:", list.list_title);
        for task in &list.tasks {
            let mark = if task.completed { "x" } else { " " };
            let day = task.due_date.with_timezone(&Local).format("%Y-%m-%d");
            println!("  [{mark}] {} (due {day})", task.title);
        }
    }
    Ok(())
}

fn print_summary(
    summary: &AutoCompleteSummary,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    println!("{}", summary.message());
    for title in &summary.updated_lists {
        println!("  updated: {title}");
    }
    for error in &summary.errors {
        println!("  error: {error}");
    }
    Ok(())
}

fn print_breakdown(
    breakdown: &DueBreakdown,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(breakdown)?);
        return Ok(());
    }
    if breakdown.rows.is_empty() {
        println!("No task lists found.");
        return Ok(());
    }
    for row in &breakdown.rows {
        let c = row.counts;
        println!(
            "{}: {} overdue, {} due today, {} due soon, {} upcoming, {} unscheduled",
            row.list_title, c.overdue, c.due_today, c.due_soon, c.upcoming, c.unscheduled
        );
    }
    let t = breakdown.totals();
    println!(
        "total: {} overdue, {} due today, {} due soon, {} upcoming, {} unscheduled",
        t.overdue, t.due_today, t.due_soon, t.upcoming, t.unscheduled
    );
    Ok(())
}
