// Command-level helpers: task targets and confirmation-gated clears

use crate::store::TaskStore;
use crate::task::TaskId;
use std::convert::Infallible;
use std::io::{self, BufRead, Write};

/// A task as named on the command line: `#N` (list number, 1-based) or its exact text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Number(usize),
    Text(String),
}

impl Target {
    /// Number targets become ids; text targets keep legacy text matching
    pub fn resolve(&self, store: &TaskStore) -> Resolved {
        match self {
            Target::Number(n) => n
                .checked_sub(1)
                .and_then(|i| store.id_at(i))
                .map_or(Resolved::Missing, Resolved::Id),
            Target::Text(text) => Resolved::Text(text.clone()),
        }
    }
}

impl std::str::FromStr for Target {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) => Ok(Target::Number(n)),
            None => Ok(Target::Text(s.to_string())),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Number(n) => write!(f, "#{}", n),
            Target::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Id(TaskId),
    Text(String),
    /// Number outside the list
    Missing,
}

/// Which tasks a clear removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    All,
    Completed,
}

impl ClearScope {
    pub fn empty_notice(self) -> &'static str {
        match self {
            ClearScope::All => "No tasks to clear.",
            ClearScope::Completed => "No completed tasks to clear.",
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            ClearScope::All => "Are you sure you want to clear ALL tasks? This cannot be undone.",
            ClearScope::Completed => "Are you sure you want to clear all completed tasks?",
        }
    }

    fn has_targets(self, store: &TaskStore) -> bool {
        match self {
            ClearScope::All => !store.is_empty(),
            ClearScope::Completed => store.has_completed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Nothing matched; no prompt was shown
    NothingToDo,
    Declined,
    Cleared(usize),
}

/// Clear `scope` after asking on `output` and reading the answer from `input`
///
/// `assume_yes` skips the question. The store is untouched unless the outcome is `Cleared`.
pub fn clear<R: BufRead, W: Write>(
    store: &mut TaskStore,
    scope: ClearScope,
    assume_yes: bool,
    input: R,
    output: W,
) -> io::Result<ClearOutcome> {
    if !scope.has_targets(store) {
        return Ok(ClearOutcome::NothingToDo);
    }
    if !assume_yes && !confirm(input, output, scope.prompt())? {
        return Ok(ClearOutcome::Declined);
    }

    let count = match scope {
        ClearScope::All => store.clear_all(),
        ClearScope::Completed => store.clear_completed(),
    };
    Ok(ClearOutcome::Cleared(count))
}

/// Ask a yes/no question; anything but `y`/`yes` is no
pub fn confirm<R: BufRead, W: Write>(mut input: R, mut output: W, prompt: &str) -> io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
