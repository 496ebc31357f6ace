//! Plain indented listing of the task tree.

use chrono::NaiveDateTime;
use nesttask_core::Task;

/// Renders one line per task: checkbox, title, optional deadline, id.
///
/// Open tasks whose deadline lies before `now` are flagged `(overdue)`.
pub fn render_tree(tasks: &[Task], now: NaiveDateTime) -> String {
    fn visit(tasks: &[Task], now: NaiveDateTime, depth: usize, out: &mut Vec<String>) {
        for task in tasks {
            let mark = if task.is_done() { "[x]" } else { "[ ]" };
            let mut line = format!("{}{mark} {}", "  ".repeat(depth), task.title);
            if let Some(deadline) = task.deadline {
                line.push_str(&format!("  (due {deadline})"));
            }
            if task.is_overdue(now) {
                line.push_str("  (overdue)");
            }
            if let Some(completed_at) = task.completion.completed_at() {
                line.push_str(&format!("  (done {completed_at})"));
            }
            line.push_str(&format!("  #{}", task.id));
            out.push(line);
            visit(&task.children, now, depth + 1, out);
        }
    }

    let mut lines = Vec::new();
    visit(tasks, now, 0, &mut lines);
    if lines.is_empty() {
        return "No tasks yet.".to_string();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::render_tree;
    use chrono::{NaiveDate, NaiveDateTime};
    use nesttask_core::{CompletedAt, Completion, Deadline, Task};

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 27)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn nested_tasks_are_indented_with_markers() {
        let tree = vec![Task::with_id("1", "Trip")
            .with_deadline(Deadline::parse("2025-10-28T09:00").unwrap())
            .with_children(vec![Task::with_id("1-1", "Hotel").with_completion(
                Completion::Completed(CompletedAt::parse("2025-10-26 11:05:21").unwrap()),
            )])];
        assert_eq!(
            render_tree(&tree, morning()),
            "[ ] Trip  (due 2025-10-28T09:00)  #1\n  [x] Hotel  (done 2025-10-26 11:05:21)  #1-1"
        );
    }

    #[test]
    fn empty_tree_has_placeholder() {
        assert_eq!(render_tree(&[], morning()), "No tasks yet.");
    }

    #[test]
    fn open_task_past_its_deadline_is_flagged_overdue() {
        let deadline = Deadline::parse("2025-10-26T18:00").unwrap();
        let tree = vec![
            Task::with_id("1", "Pay rent").with_deadline(deadline),
            Task::with_id("2", "Renew permit")
                .with_deadline(deadline)
                .with_completion(Completion::Completed(
                    CompletedAt::parse("2025-10-26 10:00:00").unwrap(),
                )),
        ];
        assert_eq!(
            render_tree(&tree, morning()),
            "[ ] Pay rent  (due 2025-10-26T18:00)  (overdue)  #1\n\
             [x] Renew permit  (due 2025-10-26T18:00)  (done 2025-10-26 10:00:00)  #2"
        );
    }
}
