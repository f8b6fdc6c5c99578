use taskman::output::{format_human, format_task_lines, HumanOutput};
use taskman::Task;

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("Current Tasks:");
    human.push_summary("Sorted by", "priority");
    human.push_detail("1. Pay rent | landlord (Priority: High, Due: 2025-01-05)");
    human.push_warning("skipped record #2: missing field `due_date`");
    human.push_next_step("taskman list");

    let rendered = format_human(&human);
    assert!(rendered.contains("Current Tasks:"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- Sorted by: priority"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- 1. Pay rent | landlord (Priority: High, Due: 2025-01-05)"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- skipped record #2"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- taskman list"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("No tasks available.");
    let rendered = format_human(&human);
    assert_eq!(rendered, "No tasks available.");
}

#[test]
fn task_lines_follow_store_order() {
    let tasks = vec![
        Task::new("B", "second", "Medium", "2025-02-01").expect("task"),
        Task::new("A", "first", "High", "2025-03-01").expect("task"),
    ];
    let lines = format_task_lines(&tasks);
    assert_eq!(lines[0], "1. B | second (Priority: Medium, Due: 2025-02-01)");
    assert_eq!(lines[1], "2. A | first (Priority: High, Due: 2025-03-01)");
}
