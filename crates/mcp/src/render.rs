//! Text rendering for tool results.
//!
//! Every tool returns a human-readable text block built here. Templating is
//! deterministic: a missing or null field always renders the same literal
//! placeholder (`None`, `Not started`, `Running`, `N/A`), durations are whole
//! seconds, and aggregate log output truncates per task with an explicit
//! marker.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde_json::Value;

use airflow_api::{Dag, DagCollection, DagRun, DagRunCollection, TaskInstance};

/// Per-task budget in aggregate log output.
const MAX_TASK_LOG_CHARS: usize = 2000;
/// Marker appended when a task's log is cut at [`MAX_TASK_LOG_CHARS`].
const TRUNCATION_MARKER: &str = "\n... (truncated, use get_task_logs for full content)";
/// Task states considered recent activity when tailing a run.
const TAIL_STATES: [&str; 5] = ["running", "failed", "success", "upstream_failed", "skipped"];
/// Number of tasks shown in the tail view.
const TAIL_TASK_LIMIT: usize = 5;

fn text_or<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => placeholder,
    }
}

/// Render a schedule interval, which the engine reports either as a plain
/// cron string or as a typed JSON object.
fn schedule_or_none(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => "None".to_string(),
        Some(other) => other.to_string(),
    }
}

fn yes_no_or_none(value: Option<bool>) -> String {
    value.map(|flag| flag.to_string()).unwrap_or_else(|| "None".to_string())
}

fn number_or_none(value: Option<i64>) -> String {
    value.map(|number| number.to_string()).unwrap_or_else(|| "None".to_string())
}

/// Duration in whole seconds between two RFC 3339 timestamps, or `N/A` when
/// either side is missing or unparseable.
pub fn duration_between(start: Option<&str>, end: Option<&str>) -> String {
    let parsed = |value: Option<&str>| value.and_then(|text| DateTime::parse_from_rfc3339(text).ok());
    match (parsed(start), parsed(end)) {
        (Some(start), Some(end)) => {
            let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
            format!("{}s", seconds.round() as i64)
        }
        _ => "N/A".to_string(),
    }
}

/// Duration from the engine's reported seconds, rounded, or `N/A`.
fn reported_duration(duration: Option<f64>) -> String {
    duration
        .map(|seconds| format!("{}s", seconds.round() as i64))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Unescape literal `\n`/`\t`/`\r` sequences in raw log content.
///
/// The log endpoint returns content with escape sequences baked into the
/// text; they must become real newlines/tabs before display.
pub fn unescape_log_content(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t").replace("\\r", "\r")
}

/// Truncate to a budget of characters, never splitting a character.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Last `max_lines` lines of a log, with the shown-line count.
pub fn tail_lines(content: &str, max_lines: usize) -> (usize, String) {
    let lines: Vec<&str> = content.split('\n').collect();
    let start = lines.len().saturating_sub(max_lines);
    (max_lines.min(lines.len()), lines[start..].join("\n"))
}

/// `Found {n} DAGs:` with one bullet per DAG.
pub fn dag_list(data: &DagCollection) -> String {
    let entries: Vec<String> = data
        .dags
        .iter()
        .map(|dag| {
            format!(
                "• **{}** - {}\n  Status: {}\n  Schedule: {}\n",
                dag.dag_id,
                text_or(dag.description.as_deref(), "No description"),
                if dag.is_paused { "Paused" } else { "Active" },
                schedule_or_none(dag.schedule_interval.as_ref()),
            )
        })
        .collect();
    format!("Found {} DAGs:\n\n{}", data.total_entries, entries.join("\n"))
}

/// Detail card for one DAG.
pub fn dag_details(dag: &Dag) -> String {
    let tags = if dag.tags.is_empty() {
        "None".to_string()
    } else {
        dag.tags.iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>().join(", ")
    };
    format!(
        "**DAG: {}**\n\nDescription: {}\nStatus: {}\nSchedule: {}\nStart Date: {}\nCatchup: {}\nMax Active Runs: {}\nTags: {}",
        dag.dag_id,
        text_or(dag.description.as_deref(), "No description"),
        if dag.is_paused { "Paused" } else { "Active" },
        schedule_or_none(dag.schedule_interval.as_ref()),
        text_or(dag.start_date.as_deref(), "None"),
        yes_no_or_none(dag.catchup),
        number_or_none(dag.max_active_runs),
        tags,
    )
}

/// Confirmation for a freshly triggered run.
pub fn dag_run_triggered(run: &DagRun) -> String {
    format!(
        "DAG run triggered successfully!\n\nDAG ID: {}\nRun ID: {}\nState: {}\nExecution Date: {}\nStart Date: {}",
        text_or(run.dag_id.as_deref(), "None"),
        run.dag_run_id,
        text_or(run.state.as_deref(), "None"),
        text_or(run.execution_date.as_deref(), "None"),
        text_or(run.start_date.as_deref(), "Not started"),
    )
}

/// `DAG Runs for {dag} ({n} total):` with one bullet per run.
pub fn dag_run_list(dag_id: &str, data: &DagRunCollection) -> String {
    let entries: Vec<String> = data
        .dag_runs
        .iter()
        .map(|run| {
            format!(
                "• **{}**\n  State: {}\n  Start: {}\n  End: {}\n  Duration: {}\n",
                run.dag_run_id,
                text_or(run.state.as_deref(), "None"),
                text_or(run.start_date.as_deref(), "Not started"),
                text_or(run.end_date.as_deref(), "Running"),
                duration_between(run.start_date.as_deref(), run.end_date.as_deref()),
            )
        })
        .collect();
    format!(
        "DAG Runs for {} ({} total):\n\n{}",
        dag_id,
        data.total_entries,
        entries.join("\n")
    )
}

/// Detail card for one DAG run.
pub fn dag_run_details(run: &DagRun) -> String {
    let configuration = match run.conf.as_ref() {
        Some(conf) if !conf.is_null() => serde_json::to_string_pretty(conf).unwrap_or_else(|_| conf.to_string()),
        _ => "None".to_string(),
    };
    format!(
        "**DAG Run: {}**\n\nDAG ID: {}\nState: {}\nStart Date: {}\nEnd Date: {}\nDuration: {}\nExternal Trigger: {}\nConfiguration: {}",
        run.dag_run_id,
        text_or(run.dag_id.as_deref(), "None"),
        text_or(run.state.as_deref(), "None"),
        text_or(run.start_date.as_deref(), "Not started"),
        text_or(run.end_date.as_deref(), "Running"),
        duration_between(run.start_date.as_deref(), run.end_date.as_deref()),
        yes_no_or_none(run.external_trigger),
        configuration,
    )
}

/// `Task Instances for {dag}/{run}:` with one bullet per task.
pub fn task_instance_list(dag_id: &str, dag_run_id: &str, tasks: &[TaskInstance]) -> String {
    let entries: Vec<String> = tasks
        .iter()
        .map(|task| {
            format!(
                "• **{}**\n  State: {}\n  Start: {}\n  End: {}\n  Duration: {}\n  Try: {}\n",
                task.task_id,
                text_or(task.state.as_deref(), "None"),
                text_or(task.start_date.as_deref(), "Not started"),
                text_or(task.end_date.as_deref(), "Running"),
                reported_duration(task.duration),
                task.try_number,
            )
        })
        .collect();
    format!("Task Instances for {}/{}:\n\n{}", dag_id, dag_run_id, entries.join("\n"))
}

/// Detail card for one task instance.
pub fn task_instance_details(task: &TaskInstance) -> String {
    format!(
        "**Task Instance: {}**\n\nDAG ID: {}\nRun ID: {}\nState: {}\nStart Date: {}\nEnd Date: {}\nDuration: {}\nTry Number: {}\nMax Tries: {}\nQueue: {}\nPool: {}\nPriority Weight: {}",
        task.task_id,
        text_or(task.dag_id.as_deref(), "None"),
        text_or(task.dag_run_id.as_deref(), "None"),
        text_or(task.state.as_deref(), "None"),
        text_or(task.start_date.as_deref(), "Not started"),
        text_or(task.end_date.as_deref(), "Running"),
        reported_duration(task.duration),
        task.try_number,
        number_or_none(task.max_tries),
        text_or(task.queue.as_deref(), "None"),
        text_or(task.pool.as_deref(), "None"),
        number_or_none(task.priority_weight),
    )
}

/// Confirmation for a pause/unpause PATCH.
pub fn pause_confirmation(dag_id: &str, paused: bool) -> String {
    let action = if paused { "paused" } else { "unpaused" };
    format!("DAG \"{dag_id}\" has been {action} successfully.")
}

/// Log view for a single task attempt.
pub fn task_logs(dag_id: &str, dag_run_id: &str, task_id: &str, try_number: u32, content: &str) -> String {
    format!(
        "**Task Logs: {task_id}** (Try {try_number})\n\nDAG: {dag_id}\nRun: {dag_run_id}\nTask: {task_id}\nTry Number: {try_number}\n\n**Logs:**\n```\n{content}\n```",
    )
}

/// One task's slice of an aggregate run-log view.
///
/// `outcome` carries decoded log content, or the error message from a failed
/// per-task fetch. A failed fetch renders inline; it never aborts the
/// aggregate.
#[derive(Debug, Clone)]
pub struct TaskLogSection {
    pub task_id: String,
    pub state: Option<String>,
    pub try_number: u32,
    pub outcome: Result<String, String>,
}

/// Aggregate log view over the first `sections.len()` of `total` tasks.
pub fn dag_run_logs(dag_id: &str, dag_run_id: &str, sections: &[TaskLogSection], total: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("**DAG Run Logs: {dag_id}/{dag_run_id}**\n"));

    for section in sections {
        match &section.outcome {
            Ok(content) => {
                output.push_str(&format!(
                    "\n### Task: {} ({}) - Try {}\n",
                    section.task_id,
                    text_or(section.state.as_deref(), "None"),
                    section.try_number,
                ));
                if content.trim().is_empty() {
                    output.push_str("*No logs available*\n");
                } else if content.chars().count() > MAX_TASK_LOG_CHARS {
                    let truncated = truncate_chars(content, MAX_TASK_LOG_CHARS);
                    output.push_str(&format!("```\n{truncated}{TRUNCATION_MARKER}\n```\n"));
                } else {
                    output.push_str(&format!("```\n{content}\n```\n"));
                }
            }
            Err(message) => {
                output.push_str(&format!("\n### Task: {} - Error fetching logs\n", section.task_id));
                output.push_str(&format!("Error: {message}\n"));
            }
        }
    }

    if total > sections.len() {
        output.push_str(&format!(
            "\n*Showing {} of {} tasks. Use get_task_logs for specific task logs.*",
            sections.len(),
            total,
        ));
    }

    output
}

/// Rank the most recently started tasks among the tail-relevant states.
///
/// Tasks without a parseable start date sort last; at most
/// [`TAIL_TASK_LIMIT`] tasks are returned.
pub fn select_recent_tasks(tasks: &[TaskInstance]) -> Vec<&TaskInstance> {
    let mut recent: Vec<&TaskInstance> = tasks
        .iter()
        .filter(|task| {
            task.state
                .as_deref()
                .is_some_and(|state| TAIL_STATES.contains(&state))
        })
        .collect();
    let started = |task: &TaskInstance| {
        task.start_date
            .as_deref()
            .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
    };
    recent.sort_by(|a, b| match (started(a), started(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    recent.truncate(TAIL_TASK_LIMIT);
    recent
}

/// Count tasks per state for the tail summary. Null states count as `None`.
pub fn state_counts(tasks: &[TaskInstance]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        let state = task.state.clone().unwrap_or_else(|| "None".to_string());
        *counts.entry(state).or_insert(0) += 1;
    }
    counts
}

/// Log slice attached to a tail section for running/failed tasks.
#[derive(Debug, Clone)]
pub enum TailLogOutcome {
    /// Last `shown` lines of the decoded log.
    Tail { shown: usize, text: String },
    /// The attempt has produced no log output yet.
    Empty,
    /// The per-task log fetch failed; rendered inline.
    Error(String),
}

/// One task's slice of the tail view.
#[derive(Debug, Clone)]
pub struct TailSection {
    pub task_id: String,
    pub state: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Present only for running/failed tasks.
    pub logs: Option<TailLogOutcome>,
}

/// Tail view: run status, recent task activity with log tails, and a
/// per-state summary.
pub fn tail_dag_run(
    dag_id: &str,
    dag_run_id: &str,
    run: &DagRun,
    sections: &[TailSection],
    counts: &BTreeMap<String, usize>,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("**Tailing DAG Run: {dag_id}/{dag_run_id}**\n"));
    output.push_str(&format!("Status: {}\n", text_or(run.state.as_deref(), "None")));
    output.push_str(&format!("Start: {}\n", text_or(run.start_date.as_deref(), "Not started")));
    output.push_str(&format!("End: {}\n\n", text_or(run.end_date.as_deref(), "Running")));

    output.push_str("**Recent Task Activity:**\n");
    for section in sections {
        output.push_str(&format!(
            "\n### {} ({})",
            section.task_id,
            text_or(section.state.as_deref(), "None"),
        ));
        if let Some(start) = section.start_date.as_deref() {
            output.push_str(&format!(" - Started: {start}"));
        }
        if let Some(end) = section.end_date.as_deref() {
            output.push_str(&format!(" - Ended: {end}"));
        }
        output.push('\n');

        match &section.logs {
            Some(TailLogOutcome::Tail { shown, text }) => {
                output.push_str(&format!("**Recent logs (last {shown} lines):**\n"));
                output.push_str(&format!("```\n{text}\n```\n"));
            }
            Some(TailLogOutcome::Empty) => output.push_str("*No logs available yet*\n"),
            Some(TailLogOutcome::Error(message)) => {
                output.push_str(&format!("*Error fetching logs: {message}*\n"));
            }
            None => {}
        }
    }

    output.push_str("\n**Task Summary:**\n");
    for (state, count) in counts {
        output.push_str(&format!("- {state}: {count}\n"));
    }

    output.push_str("\n*Use get_task_logs for complete logs of specific tasks*");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(start: Option<&str>, end: Option<&str>) -> DagRun {
        serde_json::from_value(serde_json::json!({
            "dag_run_id": "manual__1",
            "dag_id": "etl_pipeline",
            "state": "running",
            "start_date": start,
            "end_date": end,
        }))
        .unwrap()
    }

    fn task(id: &str, state: Option<&str>, start: Option<&str>) -> TaskInstance {
        serde_json::from_value(serde_json::json!({
            "task_id": id,
            "state": state,
            "start_date": start,
            "try_number": 1,
        }))
        .unwrap()
    }

    #[test]
    fn duration_is_whole_seconds() {
        assert_eq!(
            duration_between(Some("2024-01-01T00:00:00+00:00"), Some("2024-01-01T00:00:05+00:00")),
            "5s"
        );
    }

    #[test]
    fn duration_without_end_is_not_available() {
        assert_eq!(duration_between(Some("2024-01-01T00:00:00+00:00"), None), "N/A");
        assert_eq!(duration_between(None, None), "N/A");
    }

    #[test]
    fn running_run_renders_placeholders() {
        let rendered = dag_run_list(
            "etl_pipeline",
            &DagRunCollection {
                dag_runs: vec![run(Some("2024-01-01T00:00:00+00:00"), None)],
                total_entries: 1,
            },
        );
        assert!(rendered.contains("End: Running"));
        assert!(rendered.contains("Duration: N/A"));
    }

    #[test]
    fn finished_run_renders_duration() {
        let details = dag_run_details(&run(Some("2024-01-01T00:00:00+00:00"), Some("2024-01-01T00:00:05+00:00")));
        assert!(details.contains("Duration: 5s"));
        assert!(details.contains("Configuration: None"));
    }

    #[test]
    fn unescapes_literal_control_sequences() {
        assert_eq!(
            unescape_log_content("line one\\nline two\\tindented\\rdone"),
            "line one\nline two\tindented\rdone"
        );
    }

    #[test]
    fn tail_lines_keeps_the_last_n() {
        let (shown, text) = tail_lines("a\nb\nc\nd", 2);
        assert_eq!(shown, 2);
        assert_eq!(text, "c\nd");

        let (shown, text) = tail_lines("a\nb", 10);
        assert_eq!(shown, 2);
        assert_eq!(text, "a\nb");
    }

    #[test]
    fn aggregate_truncates_long_logs_with_marker() {
        let sections = vec![TaskLogSection {
            task_id: "extract".into(),
            state: Some("success".into()),
            try_number: 1,
            outcome: Ok("x".repeat(2500)),
        }];
        let rendered = dag_run_logs("etl_pipeline", "manual__1", &sections, 1);
        assert!(rendered.contains("... (truncated, use get_task_logs for full content)"));
        let body_chars = rendered
            .split("```\n")
            .nth(1)
            .unwrap()
            .chars()
            .filter(|ch| *ch == 'x')
            .count();
        assert_eq!(body_chars, 2000);
    }

    #[test]
    fn aggregate_notes_hidden_tasks() {
        let sections: Vec<TaskLogSection> = (0..3)
            .map(|index| TaskLogSection {
                task_id: format!("task_{index}"),
                state: Some("success".into()),
                try_number: 1,
                outcome: Ok("log line".into()),
            })
            .collect();
        let rendered = dag_run_logs("etl_pipeline", "manual__1", &sections, 8);
        assert!(rendered.contains("*Showing 3 of 8 tasks. Use get_task_logs for specific task logs.*"));
    }

    #[test]
    fn aggregate_isolates_failed_sections() {
        let sections = vec![
            TaskLogSection {
                task_id: "extract".into(),
                state: Some("success".into()),
                try_number: 1,
                outcome: Ok("fine".into()),
            },
            TaskLogSection {
                task_id: "load".into(),
                state: Some("failed".into()),
                try_number: 2,
                outcome: Err("Airflow API error: 404 Not Found: log not found".into()),
            },
        ];
        let rendered = dag_run_logs("etl_pipeline", "manual__1", &sections, 2);
        assert!(rendered.contains("### Task: extract (success) - Try 1"));
        assert!(rendered.contains("### Task: load - Error fetching logs"));
        assert!(rendered.contains("Error: Airflow API error: 404 Not Found: log not found"));
        assert!(!rendered.contains("Showing"));
    }

    #[test]
    fn recent_tasks_are_filtered_ranked_and_capped() {
        let tasks = vec![
            task("queued_task", Some("queued"), None),
            task("old_success", Some("success"), Some("2024-01-01T00:00:00+00:00")),
            task("newest_failure", Some("failed"), Some("2024-01-01T00:05:00+00:00")),
            task("no_start", Some("skipped"), None),
            task("running_task", Some("running"), Some("2024-01-01T00:03:00+00:00")),
            task("upstream", Some("upstream_failed"), Some("2024-01-01T00:01:00+00:00")),
            task("also_success", Some("success"), Some("2024-01-01T00:02:00+00:00")),
            task("unset_state", None, Some("2024-01-01T00:04:00+00:00")),
        ];
        let recent: Vec<&str> = select_recent_tasks(&tasks)
            .iter()
            .map(|task| task.task_id.as_str())
            .collect();
        assert_eq!(
            recent,
            vec!["newest_failure", "running_task", "also_success", "upstream", "old_success"]
        );
    }

    #[test]
    fn tail_view_lists_summary_counts() {
        let tasks = vec![
            task("a", Some("success"), None),
            task("b", Some("success"), None),
            task("c", Some("failed"), None),
        ];
        let rendered = tail_dag_run(
            "etl_pipeline",
            "manual__1",
            &run(Some("2024-01-01T00:00:00+00:00"), None),
            &[],
            &state_counts(&tasks),
        );
        assert!(rendered.contains("- failed: 1\n"));
        assert!(rendered.contains("- success: 2\n"));
        assert!(rendered.ends_with("*Use get_task_logs for complete logs of specific tasks*"));
    }
}
