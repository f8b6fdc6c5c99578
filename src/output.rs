//! Shared output formatting for taskman CLI commands.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::Task;

pub const SCHEMA_VERSION: &str = "taskman.v1";

/// Global flags that consume the following argument
const VALUE_FLAGS: [&str; 2] = ["--file", "--config"];

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }

    pub fn extend_warnings(&mut self, values: impl IntoIterator<Item = String>) {
        self.warnings.extend(values);
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();
        let next_steps = human.map(|h| h.next_steps.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: err.kind(),
                details: err.details(),
            },
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_section(&mut lines, "Details", &output.details);
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

/// Numbered task lines, e.g. `1. Pay rent | landlord (Priority: High, Due: 2025-01-05)`
pub fn format_task_lines<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<String> {
    tasks
        .into_iter()
        .enumerate()
        .map(|(idx, task)| format!("{}. {}", idx + 1, task))
        .collect()
}

pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

fn infer_command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "taskman".to_string()
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::DuplicateName(name) => {
            vec![format!("taskman update \"{name}\" --description \"...\"")]
        }
        Error::NotFound(name) => vec![format!("taskman list --name \"{name}\"")],
        Error::Validation(_) => {
            vec!["priority is High|Medium|Low; due date is YYYY-MM-DD".to_string()]
        }
        Error::CorruptStore { path, .. } => {
            vec![format!("fix or move {} then retry", path.display())]
        }
        Error::InvalidConfig(_) => vec!["fix taskman.toml then retry".to_string()],
        Error::LockFailed(_) => vec!["another taskman is saving; retry shortly".to_string()],
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_name_skips_flag_values() {
        assert_eq!(
            infer_command_name(args(&["--file", "todo.json", "--json", "add", "x"])),
            "add"
        );
        assert_eq!(infer_command_name(args(&["-q", "list"])), "list");
        assert_eq!(infer_command_name(args(&["--json"])), "taskman");
    }

    #[test]
    fn task_lines_are_numbered() {
        let tasks = vec![
            Task::new("Pay rent", "", "High", "2025-01-05").unwrap(),
            Task::new("Laundry", "whites", "Low", "2025-01-07").unwrap(),
        ];
        let lines = format_task_lines(&tasks);
        assert_eq!(
            lines,
            vec![
                "1. Pay rent |  (Priority: High, Due: 2025-01-05)".to_string(),
                "2. Laundry | whites (Priority: Low, Due: 2025-01-07)".to_string(),
            ]
        );
    }
}
