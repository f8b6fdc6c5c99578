//! taskman task command implementations.

use serde::Serialize;

use crate::cli::{load_context, GlobalOptions, LoadMode};
use crate::error::{Error, Result};
use crate::output::{emit_success, format_task_lines, HumanOutput};
use crate::store::{SortKey, TaskFilter, TaskUpdate};
use crate::task::Task;

pub(crate) struct AddOptions {
    pub name: String,
    pub description: String,
    pub priority: String,
    pub due: String,
    pub global: GlobalOptions,
}

pub(crate) struct ListOptions {
    pub name: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub sort: Option<String>,
    pub global: GlobalOptions,
}

pub(crate) struct ShowOptions {
    pub name: String,
    pub global: GlobalOptions,
}

pub(crate) struct UpdateOptions {
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub global: GlobalOptions,
}

pub(crate) struct DeleteOptions {
    pub name: String,
    pub global: GlobalOptions,
}

pub(crate) struct SortOptions {
    pub key: String,
    pub global: GlobalOptions,
}

#[derive(Serialize)]
struct TaskOutput<'a> {
    task: &'a Task,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    shown: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'static str>,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct TaskUpdatedOutput<'a> {
    task: &'a Task,
    changed: bool,
}

#[derive(Serialize)]
struct TaskSortedOutput {
    sort: &'static str,
    total: usize,
}

pub(crate) fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(&options.global, LoadMode::Mutating)?;
    let task = ctx
        .store
        .create(
            &options.name,
            &options.description,
            &options.priority,
            &options.due,
        )?
        .clone();
    ctx.store.save()?;

    let mut human = HumanOutput::new(format!("Task '{}' added", task.name()));
    human.extend_warnings(ctx.warnings);
    push_task_summary(&mut human, &task);
    human.push_summary("File", ctx.store.path().display().to_string());

    emit_success(
        options.global.output(),
        "add",
        &TaskOutput { task: &task },
        Some(&human),
    )
}

pub(crate) fn run_list(options: ListOptions) -> Result<()> {
    let mut ctx = load_context(&options.global, LoadMode::ReadOnly)?;

    let mut filter = TaskFilter::new();
    if let Some(name) = options.name {
        filter = filter.with_name(name);
    }
    if let Some(priority) = options.priority {
        filter = filter.with_priority(priority);
    }
    if let Some(due) = options.due {
        filter = filter.with_due_date(due);
    }

    let sort = match options.sort.as_deref() {
        Some(key) => Some(key.parse::<SortKey>()?),
        None => ctx.config.default_sort()?,
    };
    // Sorting here only orders the view; list never saves.
    if let Some(key) = sort {
        ctx.store.sort(key);
    }

    let total = ctx.store.len();
    let tasks = ctx.store.filter(&filter);

    let header = if total == 0 {
        "No tasks available.".to_string()
    } else if tasks.is_empty() {
        "No tasks match the filter.".to_string()
    } else {
        "Current Tasks:".to_string()
    };
    let mut human = HumanOutput::new(header);
    human.extend_warnings(ctx.warnings.clone());
    for line in format_task_lines(tasks.iter().copied()) {
        human.push_detail(line);
    }
    if !filter.is_empty() {
        human.push_summary("Shown", format!("{} of {}", tasks.len(), total));
    }
    if let Some(key) = sort {
        human.push_summary("Sorted by", key.as_str());
    }
    if total == 0 {
        human.push_next_step("taskman add <name> --priority High --due YYYY-MM-DD");
    }

    let output = TaskListOutput {
        total,
        shown: tasks.len(),
        sort: sort.map(|key| key.as_str()),
        tasks,
    };

    emit_success(options.global.output(), "list", &output, Some(&human))
}

pub(crate) fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(&options.global, LoadMode::ReadOnly)?;
    let task = ctx
        .store
        .find_by_name(&options.name)
        .ok_or_else(|| Error::NotFound(options.name.clone()))?;

    let mut human = HumanOutput::new(task.name().to_string());
    human.extend_warnings(ctx.warnings.clone());
    push_task_summary(&mut human, task);

    emit_success(
        options.global.output(),
        "show",
        &TaskOutput { task },
        Some(&human),
    )
}

pub(crate) fn run_update(options: UpdateOptions) -> Result<()> {
    let mut ctx = load_context(&options.global, LoadMode::Mutating)?;
    let changes = TaskUpdate {
        description: options.description,
        priority: options.priority,
        due_date: options.due,
    };
    let changed = !changes.is_empty();

    let task = ctx.store.update(&options.name, changes)?.clone();
    if changed {
        ctx.store.save()?;
    }

    let mut human = HumanOutput::new(format!("Task '{}' updated", task.name()));
    human.extend_warnings(ctx.warnings);
    if !changed {
        human.push_warning("no fields supplied; task left as it was");
        human.push_next_step(format!(
            "taskman update \"{}\" --priority <High|Medium|Low>",
            task.name()
        ));
    }
    push_task_summary(&mut human, &task);

    emit_success(
        options.global.output(),
        "update",
        &TaskUpdatedOutput {
            task: &task,
            changed,
        },
        Some(&human),
    )
}

pub(crate) fn run_delete(options: DeleteOptions) -> Result<()> {
    let mut ctx = load_context(&options.global, LoadMode::Mutating)?;
    let task = ctx.store.delete(&options.name)?;
    ctx.store.save()?;

    let mut human = HumanOutput::new(format!("Task '{}' deleted", task.name()));
    human.extend_warnings(ctx.warnings);
    human.push_summary("Remaining", ctx.store.len().to_string());

    emit_success(
        options.global.output(),
        "delete",
        &TaskOutput { task: &task },
        Some(&human),
    )
}

pub(crate) fn run_sort(options: SortOptions) -> Result<()> {
    let key: SortKey = options.key.parse()?;
    let mut ctx = load_context(&options.global, LoadMode::Mutating)?;
    ctx.store.sort(key);
    ctx.store.save()?;

    let mut human = HumanOutput::new(format!("Tasks sorted by {key}"));
    human.extend_warnings(ctx.warnings);
    for line in format_task_lines(ctx.store.read_all()) {
        human.push_detail(line);
    }

    emit_success(
        options.global.output(),
        "sort",
        &TaskSortedOutput {
            sort: key.as_str(),
            total: ctx.store.len(),
        },
        Some(&human),
    )
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("Name", task.name());
    human.push_summary("Description", task.description());
    human.push_summary("Priority", task.priority().as_str());
    human.push_summary("Due", task.due_date().to_string());
}
