//! Auto-completion of tasks whose due date has arrived.
//!
//! The sweep walks every task list owned by the current principal, marks
//! incomplete tasks due today as completed, and persists each changed list
//! back through the store with a single update call. Running it twice is
//! safe: the second pass finds nothing eligible because the first already
//! flipped `completed`.
//!
//! Past-due tasks are deliberately not swept. Only an exact "due today"
//! match qualifies; anything older stays overdue until the user acts.
//!
//! ## Usage
//! ```rust,ignore
//! use hearth_core::task::auto_complete::AutoCompleteEngine;
//!
//! let engine = AutoCompleteEngine::new();
//! let summary = engine.run(&store);
//! println!("{}", summary.message());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::due::{self, DueStatus};
use super::{Task, TaskList};
use crate::store::ListStore;

/// Outcome of one sweep run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoCompleteSummary {
    /// Number of tasks the sweep completed in memory. Counts intended
    /// completions: a list whose persist failed still contributes here.
    pub completed_count: usize,
    /// Titles of lists whose update was persisted successfully.
    pub updated_lists: Vec<String>,
    /// One entry per failed scope (fetch, or a single list's update).
    pub errors: Vec<String>,
    /// When the sweep ran.
    pub ran_at: DateTime<Utc>,
}

impl AutoCompleteSummary {
    fn empty(ran_at: DateTime<Utc>) -> Self {
        AutoCompleteSummary {
            completed_count: 0,
            updated_lists: Vec::new(),
            errors: Vec::new(),
            ran_at,
        }
    }

    /// Whether the sweep changed anything in memory.
    pub fn has_changes(&self) -> bool {
        self.completed_count > 0
    }

    /// Human-readable one-line summary.
    pub fn message(&self) -> String {
        if !self.errors.is_empty() {
            format!(
                "Auto-completed {} task(s); {} error(s).",
                self.completed_count,
                self.errors.len()
            )
        } else if self.completed_count == 0 {
            "No tasks due today.".to_string()
        } else {
            format!(
                "Auto-completed {} task(s) across {} list(s).",
                self.completed_count,
                self.updated_lists.len()
            )
        }
    }
}

/// Minimal projection of a task due today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueTodayTask {
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
}

/// Tasks due today within one list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueTodayList {
    pub list_title: String,
    pub tasks: Vec<DueTodayTask>,
}

/// Read-only due-today report. Lists without matches are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DueTodayReport {
    pub lists: Vec<DueTodayList>,
}

impl DueTodayReport {
    /// Total matching tasks across all lists.
    pub fn task_count(&self) -> usize {
        self.lists.iter().map(|l| l.tasks.len()).sum()
    }
}

/// Incomplete-task counts per temporal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub overdue: usize,
    pub due_today: usize,
    pub due_soon: usize,
    pub upcoming: usize,
    pub unscheduled: usize,
}

impl StatusCounts {
    fn add(&mut self, status: DueStatus) {
        match status {
            DueStatus::Overdue => self.overdue += 1,
            DueStatus::DueToday => self.due_today += 1,
            DueStatus::DueSoon => self.due_soon += 1,
            DueStatus::Upcoming => self.upcoming += 1,
            DueStatus::Unscheduled => self.unscheduled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.overdue + self.due_today + self.due_soon + self.upcoming + self.unscheduled
    }
}

/// Per-list status counts for the CLI status view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueBreakdownRow {
    pub list_title: String,
    pub counts: StatusCounts,
}

/// Status counts across all lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DueBreakdown {
    pub rows: Vec<DueBreakdownRow>,
}

impl DueBreakdown {
    /// Aggregate counts over every list.
    pub fn totals(&self) -> StatusCounts {
        self.rows.iter().fold(StatusCounts::default(), |mut acc, row| {
            acc.overdue += row.counts.overdue;
            acc.due_today += row.counts.due_today;
            acc.due_soon += row.counts.due_soon;
            acc.upcoming += row.counts.upcoming;
            acc.unscheduled += row.counts.unscheduled;
            acc
        })
    }
}

/// Engine for the due-today sweep and its read-only reports.
///
/// Holds no state; every run re-derives everything from the store and the
/// wall clock, which is read once per entry point and threaded through.
#[derive(Debug, Clone, Default)]
pub struct AutoCompleteEngine;

impl AutoCompleteEngine {
    pub fn new() -> Self {
        AutoCompleteEngine
    }

    /// Compute one list's replacement task array.
    ///
    /// Pure: returns the new tasks plus how many were completed. Tasks
    /// that are already completed or carry no due date pass through
    /// unchanged, as do tasks due on any day other than today.
    pub fn sweep_list(&self, list: &TaskList, now: DateTime<Utc>) -> (Vec<Task>, usize) {
        let today = due::local_day(now);
        let mut completed = 0;
        let tasks = list
            .tasks
            .iter()
            .map(|task| {
                if task.completed || task.due_date.is_none() {
                    return task.clone();
                }
                if due::is_due_today(task.due_date, today) {
                    let mut done = task.clone();
                    done.complete(now);
                    completed += 1;
                    done
                } else {
                    task.clone()
                }
            })
            .collect();
        (tasks, completed)
    }

    /// Sweep all lists against the current wall clock.
    pub fn run<S: ListStore>(&self, store: &S) -> AutoCompleteSummary {
        self.run_at(store, Utc::now())
    }

    /// Sweep all lists against an explicit reference time.
    ///
    /// A fetch failure aborts the whole run with a single error entry.
    /// A failed update is isolated to its list: the error is recorded and
    /// the remaining lists still process. Lists with no eligible tasks
    /// issue no store call at all.
    pub fn run_at<S: ListStore>(&self, store: &S, now: DateTime<Utc>) -> AutoCompleteSummary {
        let lists = match store.fetch_task_lists() {
            Ok(lists) => lists,
            Err(e) => {
                tracing::warn!(error = %e, "task list fetch failed, aborting sweep");
                let mut summary = AutoCompleteSummary::empty(now);
                summary.errors.push(format!("Failed to fetch task lists: {e}"));
                return summary;
            }
        };

        let summary = lists
            .iter()
            .fold(AutoCompleteSummary::empty(now), |mut acc, list| {
                let (tasks, completed) = self.sweep_list(list, now);
                if completed == 0 {
                    return acc;
                }
                acc.completed_count += completed;
                match store.update_task_list(&list.id, &tasks, now) {
                    Ok(()) => acc.updated_lists.push(list.title.clone()),
                    Err(e) => {
                        tracing::warn!(list = %list.title, error = %e, "list update failed");
                        acc.errors
                            .push(format!("Failed to update list '{}': {e}", list.title));
                    }
                }
                acc
            });

        tracing::info!(
            completed = summary.completed_count,
            updated = summary.updated_lists.len(),
            errors = summary.errors.len(),
            "auto-complete sweep finished"
        );
        summary
    }

    /// Read-only report of tasks due today, against the current wall clock.
    pub fn due_today_report<S: ListStore>(&self, store: &S) -> DueTodayReport {
        self.due_today_report_at(store, Utc::now())
    }

    /// Read-only report of tasks due today.
    ///
    /// Includes completed tasks (the due-today predicate does not consult
    /// completion). A fetch failure yields an empty report; this path is
    /// lossy on failure and carries no error channel.
    pub fn due_today_report_at<S: ListStore>(
        &self,
        store: &S,
        now: DateTime<Utc>,
    ) -> DueTodayReport {
        let today = due::local_day(now);
        let lists = match store.fetch_task_lists() {
            Ok(lists) => lists,
            Err(e) => {
                tracing::debug!(error = %e, "fetch failed, returning empty report");
                return DueTodayReport::default();
            }
        };

        let lists = lists
            .iter()
            .filter_map(|list| {
                let tasks: Vec<DueTodayTask> = list
                    .tasks
                    .iter()
                    .filter_map(|task| {
                        task.due_date
                            .filter(|d| due::is_due_today(Some(*d), today))
                            .map(|d| DueTodayTask {
                                title: task.title.clone(),
                                due_date: d,
                                completed: task.completed,
                            })
                    })
                    .collect();
                if tasks.is_empty() {
                    None
                } else {
                    Some(DueTodayList {
                        list_title: list.title.clone(),
                        tasks,
                    })
                }
            })
            .collect();

        DueTodayReport { lists }
    }

    /// Count incomplete tasks per temporal state, one row per list.
    ///
    /// A fetch failure yields an empty breakdown, mirroring the report
    /// path.
    pub fn due_breakdown_at<S: ListStore>(&self, store: &S, now: DateTime<Utc>) -> DueBreakdown {
        let today = due::local_day(now);
        let lists = match store.fetch_task_lists() {
            Ok(lists) => lists,
            Err(e) => {
                tracing::debug!(error = %e, "fetch failed, returning empty breakdown");
                return DueBreakdown::default();
            }
        };

        let rows = lists
            .iter()
            .map(|list| {
                let counts = list.tasks.iter().fold(StatusCounts::default(), |mut acc, t| {
                    if let Some(status) = t.due_status(today) {
                        acc.add(status);
                    }
                    acc
                });
                DueBreakdownRow {
                    list_title: list.title.clone(),
                    counts,
                }
            })
            .collect();

        DueBreakdown { rows }
    }

    /// Breakdown against the current wall clock.
    pub fn due_breakdown<S: ListStore>(&self, store: &S) -> DueBreakdown {
        self.due_breakdown_at(store, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryListStore;
    use crate::task::Priority;
    use chrono::{Duration, Local, TimeZone};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Store that records update calls and can fail for chosen list ids.
    struct RecordingStore {
        lists: Vec<TaskList>,
        updates: Mutex<Vec<String>>,
        fail_for: HashSet<String>,
    }

    impl RecordingStore {
        fn new(lists: Vec<TaskList>) -> Self {
            Self {
                lists,
                updates: Mutex::new(Vec::new()),
                fail_for: HashSet::new(),
            }
        }

        fn failing_for(mut self, id: &str) -> Self {
            self.fail_for.insert(id.to_string());
            self
        }

        fn update_calls(&self) -> Vec<String> {
            self.updates.lock().unwrap().clone()
        }
    }

    impl ListStore for RecordingStore {
        type Error = String;

        fn fetch_task_lists(&self) -> Result<Vec<TaskList>, String> {
            Ok(self.lists.clone())
        }

        fn update_task_list(
            &self,
            id: &str,
            _tasks: &[Task],
            _updated_at: DateTime<Utc>,
        ) -> Result<(), String> {
            self.updates.lock().unwrap().push(id.to_string());
            if self.fail_for.contains(id) {
                Err("simulated store failure".to_string())
            } else {
                Ok(())
            }
        }
    }

    /// Store whose fetch always fails.
    struct BrokenStore;

    impl ListStore for BrokenStore {
        type Error = String;

        fn fetch_task_lists(&self) -> Result<Vec<TaskList>, String> {
            Err("connection refused".to_string())
        }

        fn update_task_list(
            &self,
            _id: &str,
            _tasks: &[Task],
            _updated_at: DateTime<Utc>,
        ) -> Result<(), String> {
            panic!("update must not be reached when fetch fails");
        }
    }

    fn due_in_days(offset: i64) -> DateTime<Utc> {
        let day = Local::now().date_naive() + Duration::days(offset);
        let naive = day.and_hms_opt(12, 0, 0).unwrap();
        Local
            .from_local_datetime(&naive)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn make_task(title: &str, due_offset: Option<i64>, completed: bool) -> Task {
        let mut task = Task::new(title);
        if let Some(offset) = due_offset {
            task.due_date = Some(due_in_days(offset));
        }
        if completed {
            task.complete(Utc::now());
        }
        task
    }

    fn make_list(title: &str, tasks: Vec<Task>) -> TaskList {
        let mut list = TaskList::new(title);
        list.tasks = tasks;
        list
    }

    #[test]
    fn sweep_completes_only_tasks_due_today() {
        let engine = AutoCompleteEngine::new();
        let now = Utc::now();
        let list = make_list(
            "Household",
            vec![
                make_task("due yesterday", Some(-1), false),
                make_task("due today", Some(0), false),
                make_task("due tomorrow", Some(1), false),
                make_task("no date", None, false),
            ],
        );

        let (tasks, completed) = engine.sweep_list(&list, now);
        assert_eq!(completed, 1);

        assert!(!tasks[0].completed, "past-due tasks are never auto-completed");
        assert!(tasks[1].completed);
        assert_eq!(tasks[1].completed_at, Some(now));
        assert!(!tasks[2].completed);
        assert!(!tasks[3].completed);

        // The skipped past-due task still classifies as overdue.
        let today = due::local_day(now);
        assert!(due::is_overdue(tasks[0].due_date, tasks[0].completed, today));
        assert!(!due::is_due_today(tasks[0].due_date, today));
    }

    #[test]
    fn sweep_never_touches_tasks_without_due_date() {
        let engine = AutoCompleteEngine::new();
        let mut task = make_task("priority but no date", None, false);
        task.priority = Priority::High;
        let list = make_list("Misc", vec![task]);

        let (tasks, completed) = engine.sweep_list(&list, Utc::now());
        assert_eq!(completed, 0);
        assert!(!tasks[0].completed);
    }

    #[test]
    fn sweep_leaves_completed_tasks_untouched() {
        let engine = AutoCompleteEngine::new();
        let mut task = make_task("already done", Some(0), false);
        let original_stamp = Utc::now() - Duration::hours(5);
        task.complete(original_stamp);
        let list = make_list("Done stuff", vec![task]);

        let (tasks, completed) = engine.sweep_list(&list, Utc::now());
        assert_eq!(completed, 0);
        assert_eq!(tasks[0].completed_at, Some(original_stamp));
    }

    #[test]
    fn run_is_idempotent() {
        let engine = AutoCompleteEngine::new();
        let store = MemoryListStore::new(vec![make_list(
            "Errands",
            vec![
                make_task("due today a", Some(0), false),
                make_task("due today b", Some(0), false),
            ],
        )]);

        let first = engine.run(&store);
        assert_eq!(first.completed_count, 2);
        assert_eq!(first.updated_lists, vec!["Errands".to_string()]);
        assert!(first.errors.is_empty());

        let second = engine.run(&store);
        assert_eq!(second.completed_count, 0);
        assert!(second.updated_lists.is_empty());
        assert!(second.errors.is_empty());
    }

    #[test]
    fn run_isolates_per_list_failures() {
        let engine = AutoCompleteEngine::new();
        let list_a = make_list("A", vec![make_task("a1", Some(0), false)]);
        let list_b = make_list("B", vec![make_task("b1", Some(0), false)]);
        let fail_id = list_b.id.clone();
        let store = RecordingStore::new(vec![list_a, list_b]).failing_for(&fail_id);

        let summary = engine.run(&store);

        assert_eq!(summary.updated_lists, vec!["A".to_string()]);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("B"));
        // Intended completions include the list whose persist failed.
        assert_eq!(summary.completed_count, 2);
    }

    #[test]
    fn run_with_empty_store_issues_no_updates() {
        let engine = AutoCompleteEngine::new();
        let store = RecordingStore::new(vec![]);

        let summary = engine.run(&store);
        assert_eq!(summary.completed_count, 0);
        assert!(summary.updated_lists.is_empty());
        assert!(summary.errors.is_empty());
        assert!(store.update_calls().is_empty());
    }

    #[test]
    fn run_skips_store_call_for_unchanged_lists() {
        let engine = AutoCompleteEngine::new();
        let changed = make_list("Changed", vec![make_task("t", Some(0), false)]);
        let untouched = make_list("Untouched", vec![make_task("future", Some(3), false)]);
        let changed_id = changed.id.clone();
        let store = RecordingStore::new(vec![changed, untouched]);

        let summary = engine.run(&store);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(store.update_calls(), vec![changed_id]);
    }

    #[test]
    fn run_aborts_on_fetch_failure() {
        let engine = AutoCompleteEngine::new();
        let summary = engine.run(&BrokenStore);

        assert_eq!(summary.completed_count, 0);
        assert!(summary.updated_lists.is_empty());
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("connection refused"));
    }

    #[test]
    fn summary_messages() {
        let now = Utc::now();
        let mut summary = AutoCompleteSummary::empty(now);
        assert_eq!(summary.message(), "No tasks due today.");

        summary.completed_count = 3;
        summary.updated_lists = vec!["A".into(), "B".into()];
        assert_eq!(summary.message(), "Auto-completed 3 task(s) across 2 list(s).");

        summary.errors.push("boom".into());
        assert_eq!(summary.message(), "Auto-completed 3 task(s); 1 error(s).");
    }

    #[test]
    fn report_omits_lists_without_matches() {
        let engine = AutoCompleteEngine::new();
        let store = MemoryListStore::new(vec![
            make_list("Has match", vec![make_task("today", Some(0), false)]),
            make_list("No match", vec![make_task("tomorrow", Some(1), false)]),
        ]);

        let report = engine.due_today_report(&store);
        assert_eq!(report.lists.len(), 1);
        assert_eq!(report.lists[0].list_title, "Has match");
        assert_eq!(report.task_count(), 1);
    }

    #[test]
    fn report_includes_completed_tasks_due_today() {
        let engine = AutoCompleteEngine::new();
        let mut done = make_task("done today", Some(0), false);
        done.complete(Utc::now());
        let store = MemoryListStore::new(vec![make_list("L", vec![done])]);

        let report = engine.due_today_report(&store);
        assert_eq!(report.task_count(), 1);
        assert!(report.lists[0].tasks[0].completed);
    }

    #[test]
    fn report_swallows_fetch_failure() {
        let engine = AutoCompleteEngine::new();
        let report = engine.due_today_report(&BrokenStore);
        assert!(report.lists.is_empty());
    }

    #[test]
    fn report_is_read_only() {
        let engine = AutoCompleteEngine::new();
        let store = RecordingStore::new(vec![make_list(
            "L",
            vec![make_task("today", Some(0), false)],
        )]);

        let _ = engine.due_today_report(&store);
        assert!(store.update_calls().is_empty());
    }

    #[test]
    fn breakdown_counts_incomplete_tasks_per_status() {
        let engine = AutoCompleteEngine::new();
        let store = MemoryListStore::new(vec![make_list(
            "Mixed",
            vec![
                make_task("overdue", Some(-2), false),
                make_task("today", Some(0), false),
                make_task("tomorrow", Some(1), false),
                make_task("next week", Some(7), false),
                make_task("no date", None, false),
                make_task("done", Some(0), true),
            ],
        )]);

        let breakdown = engine.due_breakdown(&store);
        assert_eq!(breakdown.rows.len(), 1);
        let counts = breakdown.rows[0].counts;
        assert_eq!(counts.overdue, 1);
        assert_eq!(counts.due_today, 1);
        assert_eq!(counts.due_soon, 1);
        assert_eq!(counts.upcoming, 1);
        assert_eq!(counts.unscheduled, 1);
        // Completed tasks are outside the classification.
        assert_eq!(counts.total(), 5);
        assert_eq!(breakdown.totals().total(), 5);
    }

    #[test]
    fn breakdown_swallows_fetch_failure() {
        let engine = AutoCompleteEngine::new();
        let breakdown = engine.due_breakdown(&BrokenStore);
        assert!(breakdown.rows.is_empty());
    }
}
