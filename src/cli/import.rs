//! taskman import command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{load_context, GlobalOptions, LoadMode};
use crate::error::Result;
use crate::legacy;
use crate::output::{emit_success, HumanOutput};
use crate::storage::SkippedRecord;

pub(crate) struct ImportOptions {
    pub path: PathBuf,
    pub global: GlobalOptions,
}

#[derive(Serialize)]
struct ImportOutput {
    source: PathBuf,
    imported: usize,
    skipped: Vec<SkippedLine>,
    total: usize,
}

/// A skipped legacy record, reported by one-based line number
#[derive(Serialize)]
struct SkippedLine {
    line: usize,
    reason: String,
}

impl From<SkippedRecord> for SkippedLine {
    fn from(record: SkippedRecord) -> Self {
        Self {
            line: record.index + 1,
            reason: record.reason,
        }
    }
}

pub(crate) fn run(options: ImportOptions) -> Result<()> {
    let set = legacy::read_file(&options.path)?;
    let mut ctx = load_context(&options.global, LoadMode::Mutating)?;

    let report = ctx.store.import(set.records);
    if report.imported > 0 {
        ctx.store.save()?;
    }

    let mut skipped: Vec<SkippedRecord> = set.skipped;
    skipped.extend(report.skipped);
    skipped.sort_by_key(|record| record.index);

    let mut human = HumanOutput::new(format!(
        "Imported {} task(s) from {}",
        report.imported,
        options.path.display()
    ));
    human.extend_warnings(ctx.warnings);
    for record in &skipped {
        human.push_warning(format!("line {}: {}", record.index + 1, record.reason));
    }
    human.push_summary("Imported", report.imported.to_string());
    human.push_summary("Skipped", skipped.len().to_string());
    human.push_summary("Total", ctx.store.len().to_string());
    if report.imported > 0 {
        human.push_next_step("taskman list");
    }

    let output = ImportOutput {
        source: options.path,
        imported: report.imported,
        skipped: skipped.into_iter().map(SkippedLine::from).collect(),
        total: ctx.store.len(),
    };

    emit_success(options.global.output(), "import", &output, Some(&human))
}
