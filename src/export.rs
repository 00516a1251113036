// CSV export

use crate::task::Task;
use eyre::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const HEADER: [&str; 4] = ["Task", "Completed", "Due", "Priority"];

/// Write tasks as CSV: header row, one row per task, CRLF line endings
pub fn write_csv<'a, W, I>(writer: W, tasks: I) -> csv::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Task>,
{
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    let mut count = 0;
    for task in tasks {
        let completed = if task.completed { "True" } else { "False" };
        wtr.write_record([task.text.as_str(), completed, task.due.as_str(), task.priority.as_str()])?;
        count += 1;
    }

    wtr.flush()?;
    Ok(count)
}

/// Export tasks to a CSV file at `path`, returning the number of rows written
pub fn export_csv<'a, I>(path: &Path, tasks: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Task>,
{
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_csv(BufWriter::new(file), tasks).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(file = ?path, count, "Exported tasks to CSV");
    Ok(count)
}
