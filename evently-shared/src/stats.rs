/// Task statistics aggregation
///
/// Pure, synchronous aggregation over a user's tasks: completion ratios,
/// elapsed/remaining time sums, and a per-priority breakdown. The full
/// computation re-runs on every call — nothing is maintained incrementally —
/// and the evaluation instant is passed in by the caller, so tests can pin
/// "now".
///
/// Fractional outputs serialize as strings with exactly two decimal places;
/// counts stay numeric.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use evently_shared::stats::compute;
///
/// assert!(compute(&[], Utc::now()).is_none());
/// ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::models::task::{Task, STATUS_FINISHED, STATUS_PENDING};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Aggregate statistics over a non-empty task set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    /// Number of tasks considered
    pub total_tasks: usize,

    /// Tasks whose status is "Finished"
    pub completed_tasks: usize,

    /// Everything that is not completed, whatever its status string
    pub pending_tasks: usize,

    /// completed / total × 100
    #[serde(serialize_with = "two_decimals")]
    pub task_completion_percentage: f64,

    /// pending / total × 100; complements the completion percentage to 100
    #[serde(serialize_with = "two_decimals")]
    pub task_pending_percentage: f64,

    /// Mean of (end − start) in hours over Finished tasks, counting positive
    /// durations only; 0 when none qualify
    #[serde(serialize_with = "two_decimals")]
    pub average_time_per_completed_task: f64,

    /// Σ over Pending tasks of (now − start) in hours, unclamped — negative
    /// when starts lie in the future
    #[serde(serialize_with = "two_decimals")]
    pub total_pending_time: f64,

    /// Σ over Pending tasks of max(end − now, 0) in hours
    #[serde(serialize_with = "two_decimals")]
    pub total_estimated_completion_time: f64,

    /// Per-priority breakdown, keyed by the priorities of pending tasks only
    pub priority_summary: BTreeMap<i32, PrioritySummary>,
}

/// Per-priority accumulation over pending tasks
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritySummary {
    /// Number of pending tasks at this priority
    pub pending: usize,

    /// Cumulative (now − start) hours, unclamped
    #[serde(serialize_with = "two_decimals")]
    pub time_lapsed: f64,

    /// Cumulative max(end − now, 0) hours
    #[serde(serialize_with = "two_decimals")]
    pub time_to_finish: f64,
}

/// Computes statistics over a user's tasks at the given instant
///
/// Returns `None` for an empty slice — no arithmetic is performed, so there
/// is no division by zero to guard against downstream.
pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Option<TaskStatistics> {
    if tasks.is_empty() {
        return None;
    }

    let total_tasks = tasks.len();
    let completed_tasks = tasks
        .iter()
        .filter(|t| t.status == STATUS_FINISHED)
        .count();
    let pending_tasks = total_tasks - completed_tasks;

    let task_completion_percentage = completed_tasks as f64 / total_tasks as f64 * 100.0;
    let task_pending_percentage = pending_tasks as f64 / total_tasks as f64 * 100.0;

    // Zero or negative durations are treated as data errors and excluded
    // from both the numerator and the denominator.
    let completed_durations: Vec<f64> = tasks
        .iter()
        .filter(|t| t.status == STATUS_FINISHED)
        .map(|t| hours_between(t.start_time, t.end_time))
        .filter(|hours| *hours > 0.0)
        .collect();

    let average_time_per_completed_task = if completed_durations.is_empty() {
        0.0
    } else {
        completed_durations.iter().sum::<f64>() / completed_durations.len() as f64
    };

    let mut total_pending_time = 0.0;
    let mut total_estimated_completion_time = 0.0;
    let mut priority_summary: BTreeMap<i32, PrioritySummary> = BTreeMap::new();

    for task in tasks.iter().filter(|t| t.status == STATUS_PENDING) {
        let time_lapsed = hours_between(task.start_time, now);
        let time_to_finish = hours_between(now, task.end_time).max(0.0);

        total_pending_time += time_lapsed;
        total_estimated_completion_time += time_to_finish;

        let entry = priority_summary.entry(task.priority).or_default();
        entry.pending += 1;
        entry.time_lapsed += time_lapsed;
        entry.time_to_finish += time_to_finish;
    }

    Some(TaskStatistics {
        total_tasks,
        completed_tasks,
        pending_tasks,
        task_completion_percentage,
        task_pending_percentage,
        average_time_per_completed_task,
        total_pending_time,
        total_estimated_completion_time,
        priority_summary,
    })
}

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

fn two_decimals<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{value:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn task(status: &str, priority: i32, start: DateTime<Utc>, end: DateTime<Utc>) -> Task {
        Task {
            id: Uuid::new_v4(),
            event_id: "event-1".to_string(),
            email: "owner@example.com".to_string(),
            title: "task".to_string(),
            priority,
            status: status.to_string(),
            start_time: start,
            end_time: end,
            created_at: start,
        }
    }

    #[test]
    fn test_empty_input_yields_no_statistics() {
        assert!(compute(&[], Utc::now()).is_none());
    }

    #[test]
    fn test_mixed_set_matches_expected_values() {
        // One finished task that took two hours, one pending task started an
        // hour ago with three hours left.
        let now = Utc::now();
        let t0 = now - Duration::days(2);
        let tasks = vec![
            task(STATUS_FINISHED, 2, t0, t0 + Duration::hours(2)),
            task(STATUS_PENDING, 4, now - Duration::hours(1), now + Duration::hours(3)),
        ];

        let stats = compute(&tasks, now).unwrap();

        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.pending_tasks, 1);
        assert!((stats.task_completion_percentage - 50.0).abs() < 1e-9);
        assert!((stats.task_pending_percentage - 50.0).abs() < 1e-9);
        assert!((stats.average_time_per_completed_task - 2.0).abs() < 1e-9);
        assert!((stats.total_pending_time - 1.0).abs() < 1e-6);
        assert!((stats.total_estimated_completion_time - 3.0).abs() < 1e-6);

        // Keyed by the pending task's priority only.
        assert_eq!(stats.priority_summary.len(), 1);
        let summary = &stats.priority_summary[&4];
        assert_eq!(summary.pending, 1);
        assert!((summary.time_lapsed - 1.0).abs() < 1e-6);
        assert!((summary.time_to_finish - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_percentages_sum_to_one_hundred() {
        let now = Utc::now();
        let tasks = vec![
            task(STATUS_FINISHED, 1, now - Duration::hours(2), now - Duration::hours(1)),
            task(STATUS_PENDING, 1, now, now + Duration::hours(1)),
            task(STATUS_PENDING, 2, now, now + Duration::hours(1)),
        ];

        let stats = compute(&tasks, now).unwrap();
        let completion = format!("{:.2}", stats.task_completion_percentage);
        let pending = format!("{:.2}", stats.task_pending_percentage);

        assert_eq!(completion, "33.33");
        assert_eq!(pending, "66.67");

        let sum = completion.parse::<f64>().unwrap() + pending.parse::<f64>().unwrap();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_excludes_non_positive_durations() {
        let now = Utc::now();
        let t0 = now - Duration::days(1);
        let tasks = vec![
            // Two hours, counted.
            task(STATUS_FINISHED, 1, t0, t0 + Duration::hours(2)),
            // End before start: excluded from numerator and denominator.
            task(STATUS_FINISHED, 1, t0, t0 - Duration::hours(1)),
            // Zero duration: also excluded.
            task(STATUS_FINISHED, 1, t0, t0),
        ];

        let stats = compute(&tasks, now).unwrap();
        assert!((stats.average_time_per_completed_task - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_is_zero_when_nothing_qualifies() {
        let now = Utc::now();
        let t0 = now - Duration::days(1);
        let tasks = vec![task(STATUS_FINISHED, 3, t0, t0 - Duration::hours(4))];

        let stats = compute(&tasks, now).unwrap();
        assert_eq!(stats.average_time_per_completed_task, 0.0);
    }

    #[test]
    fn test_future_start_yields_negative_pending_time() {
        let now = Utc::now();
        let tasks = vec![task(
            STATUS_PENDING,
            5,
            now + Duration::hours(2),
            now + Duration::hours(4),
        )];

        let stats = compute(&tasks, now).unwrap();
        assert!((stats.total_pending_time - (-2.0)).abs() < 1e-6);
        assert!((stats.total_estimated_completion_time - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_overdue_pending_task_has_zero_time_to_finish() {
        let now = Utc::now();
        let tasks = vec![task(
            STATUS_PENDING,
            2,
            now - Duration::hours(5),
            now - Duration::hours(1),
        )];

        let stats = compute(&tasks, now).unwrap();
        assert!((stats.total_pending_time - 5.0).abs() < 1e-6);
        assert_eq!(stats.total_estimated_completion_time, 0.0);

        let summary = &stats.priority_summary[&2];
        assert_eq!(summary.time_to_finish, 0.0);
    }

    #[test]
    fn test_priority_summary_accumulates_within_priority() {
        let now = Utc::now();
        let tasks = vec![
            task(STATUS_PENDING, 3, now - Duration::hours(1), now + Duration::hours(2)),
            task(STATUS_PENDING, 3, now - Duration::hours(2), now + Duration::hours(1)),
            task(STATUS_PENDING, 1, now, now + Duration::hours(1)),
        ];

        let stats = compute(&tasks, now).unwrap();
        assert_eq!(stats.priority_summary.len(), 2);

        let threes = &stats.priority_summary[&3];
        assert_eq!(threes.pending, 2);
        assert!((threes.time_lapsed - 3.0).abs() < 1e-6);
        assert!((threes.time_to_finish - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_statuses_count_as_pending_but_are_not_summed() {
        // An unrecognized status contributes to the pending count, but the
        // time sums and the priority breakdown only consider "Pending" rows.
        let now = Utc::now();
        let tasks = vec![task(
            "Blocked",
            4,
            now - Duration::hours(1),
            now + Duration::hours(1),
        )];

        let stats = compute(&tasks, now).unwrap();
        assert_eq!(stats.pending_tasks, 1);
        assert_eq!(stats.total_pending_time, 0.0);
        assert!(stats.priority_summary.is_empty());
    }

    #[test]
    fn test_serialization_formats_fractions_as_text() {
        let now = Utc::now();
        let tasks = vec![
            task(STATUS_FINISHED, 1, now - Duration::hours(3), now - Duration::hours(1)),
            task(STATUS_PENDING, 4, now - Duration::hours(1), now + Duration::hours(3)),
        ];

        let stats = compute(&tasks, now).unwrap();
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["totalTasks"], 2);
        assert_eq!(json["completedTasks"], 1);
        assert_eq!(json["pendingTasks"], 1);
        assert_eq!(json["taskCompletionPercentage"], "50.00");
        assert_eq!(json["taskPendingPercentage"], "50.00");
        assert_eq!(json["averageTimePerCompletedTask"], "2.00");
        assert_eq!(json["totalPendingTime"], "1.00");
        assert_eq!(json["totalEstimatedCompletionTime"], "3.00");
        assert_eq!(json["prioritySummary"]["4"]["pending"], 1);
        assert_eq!(json["prioritySummary"]["4"]["timeLapsed"], "1.00");
        assert_eq!(json["prioritySummary"]["4"]["timeToFinish"], "3.00");
    }
}
