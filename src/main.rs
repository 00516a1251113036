use chrono::Local;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::io;
use std::path::{Path, PathBuf};
use taskmaster::actions::{self, ClearOutcome, ClearScope, Resolved, Target};
use taskmaster::{Config, Due, FilterMode, Priority, Query, SortKey, Task, TaskStore, ViewState, config, export, persist};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskmaster")]
#[command(about = "TaskMaster - Task list manager with due dates, priorities and JSON persistence")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the task file (default: from config, else the data directory)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        text: String,

        /// Default due date to today and priority to Normal when not given
        #[arg(long)]
        detailed: bool,

        /// Due date: MM-DD-YYYY, YYYY-MM-DD, today or tomorrow
        #[arg(short, long)]
        due: Option<String>,

        /// Priority: low, normal or high
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// List tasks
    List {
        /// Completion filter (default: the one set with `filter`)
        #[arg(long)]
        filter: Option<FilterMode>,

        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Toggle a task's completion
    Toggle {
        /// `#N` for the N-th listed task (quote it in the shell), otherwise the exact task text
        target: Target,
    },

    /// Edit a task's text, due date or priority
    Edit {
        /// `#N` for the N-th listed task, otherwise the exact task text (first match)
        target: Target,

        /// New task text
        new_text: String,

        /// New due date; an empty string clears it
        #[arg(short, long)]
        due: Option<String>,

        /// New priority; an empty string clears it
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Delete a task (by text: every task with that text)
    Delete {
        /// `#N` for the N-th listed task, otherwise the exact task text
        target: Target,
    },

    /// Remove all completed tasks
    ClearCompleted {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove all tasks
    ClearAll {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Set the default list filter
    Filter { mode: FilterMode },

    /// Sort the task list; repeating the same key reverses the order
    Sort { key: SortKey },

    /// Export tasks to a CSV file
    Export { path: PathBuf },
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = Config::load(&config_path)?;
    if cli.no_color || !config.color {
        colored::control::set_override(false);
    }

    let tasks_file = cli.file.clone().unwrap_or_else(|| config.tasks_file());
    let state_file = ViewState::path_for(&tasks_file);
    debug!(tasks = ?tasks_file, state = ?state_file, "Resolved paths");

    // Open store
    let mut store = if config.recover_malformed {
        persist::load_or_recover(&tasks_file)?
    } else {
        persist::load(&tasks_file)?
    };
    let mut view = ViewState::load(&state_file);
    store.set_sort_state(view.sort);

    let changed = run(cli.command, &mut store, &mut view, &state_file)?;
    if changed {
        persist::save(&tasks_file, &store)?;
    }

    Ok(())
}

/// Execute one command; returns whether the store needs saving
fn run(command: Commands, store: &mut TaskStore, view: &mut ViewState, state_file: &Path) -> Result<bool> {
    match command {
        Commands::Add {
            text,
            detailed,
            due,
            priority,
        } => {
            let due = match due {
                Some(d) => Due::parse(&d)?,
                None if detailed => Due::today(),
                None => Due::none(),
            };
            let priority = match priority {
                Some(p) => Priority::parse(&p)?,
                None if detailed => Priority::Normal,
                None => Priority::None,
            };

            let entry = store.add(Task::new(text).with_due(due).with_priority(priority))?;
            let text = entry.task.text.clone();
            println!("Added #{}: {}", store.len(), text);
            Ok(true)
        }

        Commands::List { filter, search } => {
            let query = Query::new(filter.unwrap_or(view.filter), search.as_deref().unwrap_or(""));
            print_list(store, &query);
            Ok(false)
        }

        Commands::Toggle { target } => match target.resolve(store) {
            Resolved::Id(id) => {
                if let Some(completed) = store.toggle(id) {
                    println!("Marked {}", if completed { "completed" } else { "active" });
                }
                Ok(true)
            }
            Resolved::Text(text) => {
                if store.toggle_completed(&text) {
                    println!("Toggled: {}", text);
                    return Ok(true);
                }
                println!("No task matching: {}", text);
                Ok(false)
            }
            Resolved::Missing => missing(&target),
        },

        Commands::Edit {
            target,
            new_text,
            due,
            priority,
        } => {
            let due = due.as_deref().map(Due::parse).transpose()?;
            let priority = priority.as_deref().map(Priority::parse).transpose()?;

            match target.resolve(store) {
                Resolved::Id(id) => {
                    store.update(id, &new_text, due, priority)?;
                    println!("Updated: {}", new_text);
                    Ok(true)
                }
                Resolved::Text(old_text) => {
                    if store.edit(&old_text, &new_text, due, priority)? {
                        println!("Updated: {}", new_text);
                        return Ok(true);
                    }
                    println!("No task matching: {}", old_text);
                    Ok(false)
                }
                Resolved::Missing => missing(&target),
            }
        }

        Commands::Delete { target } => match target.resolve(store) {
            Resolved::Id(id) => {
                if let Some(task) = store.remove(id) {
                    println!("Deleted: {}", task.text);
                }
                Ok(true)
            }
            Resolved::Text(text) => {
                let count = store.delete(&text);
                if count == 0 {
                    println!("No task matching: {}", text);
                    return Ok(false);
                }
                println!("Deleted {} task(s): {}", count, text);
                Ok(true)
            }
            Resolved::Missing => missing(&target),
        },

        Commands::ClearCompleted { yes } => clear(store, ClearScope::Completed, yes),

        Commands::ClearAll { yes } => clear(store, ClearScope::All, yes),

        Commands::Filter { mode } => {
            view.filter = mode;
            view.save(state_file)?;
            println!("Showing {} tasks", mode);
            Ok(false)
        }

        Commands::Sort { key } => {
            let state = store.sort(key);
            view.sort = Some(state);
            view.save(state_file)?;
            println!(
                "Sorted by {} ({})",
                state.key,
                if state.descending { "descending" } else { "ascending" }
            );
            Ok(true)
        }

        Commands::Export { path } => {
            if store.is_empty() {
                println!("No tasks to export.");
                return Ok(false);
            }
            let count = export::export_csv(&path, store.tasks())?;
            println!("Exported {} task(s) to {}", count, path.display());
            Ok(false)
        }
    }
}

fn missing(target: &Target) -> Result<bool> {
    println!("No task {}", target);
    Ok(false)
}

fn clear(store: &mut TaskStore, scope: ClearScope, yes: bool) -> Result<bool> {
    match actions::clear(store, scope, yes, io::stdin().lock(), io::stdout())? {
        ClearOutcome::NothingToDo => {
            println!("{}", scope.empty_notice());
            Ok(false)
        }
        ClearOutcome::Declined => Ok(false),
        ClearOutcome::Cleared(count) => {
            println!("Cleared {} task(s)", count);
            Ok(true)
        }
    }
}

fn print_list(store: &TaskStore, query: &Query) {
    let today = Local::now().date_naive();
    let rows: Vec<_> = store
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| query.matches(&e.task))
        .collect();

    if rows.is_empty() {
        println!("No {} tasks.", query.mode);
        return;
    }

    println!("{:>3}  {}  {:<40}  {:<10}  {}", "#", "✓", "Task", "Due Date", "Priority");
    for (i, entry) in rows {
        let task = &entry.task;
        let mark = if task.completed { "✓" } else { " " };
        let text = if task.completed {
            task.text.dimmed().strikethrough()
        } else {
            task.text.normal()
        };
        let due = if !task.completed && task.due.is_overdue(today) {
            task.due.as_str().red()
        } else {
            task.due.as_str().normal()
        };
        println!(
            "{:>3}  {}  {:<40}  {:<10}  {}",
            i + 1,
            mark,
            text,
            due,
            priority_label(&task.priority)
        );
    }
}

fn priority_label(priority: &Priority) -> ColoredString {
    match priority {
        Priority::High => priority.as_str().red().bold(),
        Priority::Normal => priority.as_str().yellow(),
        Priority::Low => priority.as_str().green(),
        _ => priority.as_str().normal(),
    }
}
