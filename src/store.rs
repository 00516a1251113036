// In-memory ordered task store

use crate::error::Result;
use crate::filter::{FilterMode, Query};
use crate::sort::{SortKey, SortState};
use crate::task::{Due, Priority, Task, TaskId};
use tracing::debug;

/// A task together with the id it was given when it entered the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: TaskId,
    pub task: Task,
}

impl Entry {
    fn new(task: Task) -> Self {
        Self { id: TaskId::new(), task }
    }
}

/// Ordered collection of tasks
///
/// Order is insertion order until a sort is applied, then the last sort's order.
/// Tasks are addressed by [`TaskId`]; the text-keyed methods keep the older
/// first-match (toggle, edit) and all-matches (delete) behaviour.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    entries: Vec<Entry>,
    sort: Option<SortState>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-validated tasks, assigning fresh ids
    pub fn from_tasks<I: IntoIterator<Item = Task>>(tasks: I) -> Self {
        Self {
            entries: tasks.into_iter().map(Entry::new).collect(),
            sort: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.entries.iter().map(|e| &e.task)
    }

    /// Last applied sort, if any
    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// Restore the last sort without reordering (e.g. from saved view state)
    pub fn set_sort_state(&mut self, sort: Option<SortState>) {
        self.sort = sort;
    }

    // ========================================================================
    // Id-addressed API
    // ========================================================================

    /// Append a task; blank text is rejected and the store is left unchanged
    pub fn add(&mut self, task: Task) -> Result<&Entry> {
        Task::validate_text(&task.text)?;

        let entry = Entry::new(task);
        debug!(id = %entry.id, text = %entry.task.text, "add: appending task");
        self.entries.push(entry);

        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.position(id).map(|i| &self.entries[i].task)
    }

    /// Id of the task at a zero-based position in current order
    pub fn id_at(&self, position: usize) -> Option<TaskId> {
        self.entries.get(position).map(|e| e.id)
    }

    /// Flip completion; returns the new value, or `None` if the id is unknown
    pub fn toggle(&mut self, id: TaskId) -> Option<bool> {
        let i = self.position(id)?;
        let task = &mut self.entries[i].task;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Replace text and optionally due/priority; `None` keeps the current value
    ///
    /// Returns `Ok(false)` when the id is unknown.
    pub fn update(
        &mut self,
        id: TaskId,
        new_text: &str,
        due: Option<Due>,
        priority: Option<Priority>,
    ) -> Result<bool> {
        Task::validate_text(new_text)?;

        match self.position(id) {
            Some(i) => {
                Self::apply_edit(&mut self.entries[i].task, new_text, due, priority);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove exactly one task by id
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let i = self.position(id)?;
        Some(self.entries.remove(i).task)
    }

    // ========================================================================
    // Text-addressed API
    // ========================================================================

    /// First task whose text equals `text` exactly
    pub fn find_by_text(&self, text: &str) -> Option<&Task> {
        self.entries.iter().map(|e| &e.task).find(|t| t.text == text)
    }

    /// Flip completion on the first task with this text; `false` if none matched
    pub fn toggle_completed(&mut self, text: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.task.text == text) {
            Some(entry) => {
                entry.task.completed = !entry.task.completed;
                true
            }
            None => false,
        }
    }

    /// Edit the first task whose text equals `old_text`
    pub fn edit(
        &mut self,
        old_text: &str,
        new_text: &str,
        due: Option<Due>,
        priority: Option<Priority>,
    ) -> Result<bool> {
        Task::validate_text(new_text)?;

        match self.entries.iter_mut().find(|e| e.task.text == old_text) {
            Some(entry) => {
                Self::apply_edit(&mut entry.task, new_text, due, priority);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every task whose text equals `text`; returns how many were removed
    pub fn delete(&mut self, text: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.task.text != text);
        before - self.entries.len()
    }

    // ========================================================================
    // Bulk operations and views
    // ========================================================================

    pub fn clear_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Drop completed tasks, keeping the relative order of the rest
    pub fn clear_completed(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.task.completed);
        before - self.entries.len()
    }

    pub fn has_completed(&self) -> bool {
        self.entries.iter().any(|e| e.task.completed)
    }

    /// Fresh view of the tasks matching `mode` and containing `search` (case-insensitive)
    pub fn filter(&self, mode: FilterMode, search: &str) -> Vec<&Entry> {
        self.query(&Query::new(mode, search))
    }

    pub fn query(&self, query: &Query) -> Vec<&Entry> {
        self.entries.iter().filter(|e| query.matches(&e.task)).collect()
    }

    /// Header-click sort: repeating the last key flips direction, a new key sorts ascending
    pub fn sort(&mut self, key: SortKey) -> SortState {
        let state = SortState::next(self.sort, key);
        self.apply_sort(state);
        state
    }

    /// Sort with an explicit direction and remember it as the last sort
    pub fn sort_with(&mut self, key: SortKey, descending: bool) {
        self.apply_sort(SortState { key, descending });
    }

    fn apply_sort(&mut self, state: SortState) {
        debug!(key = %state.key, descending = state.descending, "sort: reordering store");
        // Stable, so equal keys keep their relative order in both directions
        self.entries.sort_by(|a, b| state.compare(&a.task, &b.task));
        self.sort = Some(state);
    }

    // ========================================================================
    // Document conversion
    // ========================================================================

    /// Whole store as a JSON array of `{text, due, priority, completed}` objects
    pub fn to_json(&self) -> Result<String> {
        let tasks: Vec<&Task> = self.tasks().collect();
        Ok(serde_json::to_string_pretty(&tasks)?)
    }

    /// Parse a JSON array of task objects; anything else is a format error
    pub fn from_json(document: &str) -> Result<Self> {
        Self::from_slice(document.as_bytes())
    }

    /// Parse raw file bytes; invalid UTF-8 is a format error like any other bad document
    pub fn from_slice(document: &[u8]) -> Result<Self> {
        let tasks: Vec<Task> = serde_json::from_slice(document)?;
        Ok(Self::from_tasks(tasks))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn position(&self, id: TaskId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn apply_edit(task: &mut Task, new_text: &str, due: Option<Due>, priority: Option<Priority>) {
        task.text = new_text.to_string();
        if let Some(due) = due {
            task.due = due;
        }
        if let Some(priority) = priority {
            task.priority = priority;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use std::collections::HashSet;

    fn texts(store: &TaskStore) -> Vec<&str> {
        store.tasks().map(|t| t.text.as_str()).collect()
    }

    fn sample_store() -> TaskStore {
        TaskStore::from_tasks(vec![
            Task::new("Buy milk"),
            Task::new("Call mom").with_completed(true),
            Task::new("Write report")
                .with_due(Due::from("03-01-2024"))
                .with_priority(Priority::High),
            Task::new("milk the cow").with_priority(Priority::Low),
        ])
    }

    #[test]
    fn test_add_appends_active_task() {
        let mut store = sample_store();
        let before = store.len();

        let entry = store.add(Task::new("New task")).unwrap();
        assert!(!entry.task.completed);
        let id = entry.id;

        assert_eq!(store.len(), before + 1);
        assert_eq!(store.entries().last().unwrap().id, id);
        assert_eq!(store.get(id).unwrap().text, "New task");
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut store = sample_store();
        let before = store.len();

        assert!(matches!(store.add(Task::new("   ")), Err(TaskError::EmptyText)));
        assert!(matches!(store.add(Task::new("")), Err(TaskError::EmptyText)));
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_add_keeps_text_verbatim() {
        let mut store = TaskStore::new();
        store.add(Task::new("  padded ")).unwrap();
        assert_eq!(store.find_by_text("  padded ").unwrap().text, "  padded ");
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = TaskStore::from_tasks(vec![Task::new("Buy milk")]);

        assert!(store.toggle_completed("Buy milk"));
        assert!(store.find_by_text("Buy milk").unwrap().completed);

        assert!(store.toggle_completed("Buy milk"));
        assert!(!store.find_by_text("Buy milk").unwrap().completed);
    }

    #[test]
    fn test_toggle_by_id() {
        let mut store = sample_store();
        let id = store.id_at(1).unwrap();

        assert_eq!(store.toggle(id), Some(false));
        assert_eq!(store.toggle(id), Some(true));
        assert_eq!(store.toggle(TaskId::new()), None);
    }

    #[test]
    fn test_toggle_missing_text_is_noop() {
        let mut store = sample_store();
        let before: Vec<Task> = store.tasks().cloned().collect();

        assert!(!store.toggle_completed("nope"));
        assert_eq!(store.tasks().cloned().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_duplicate_text_semantics() {
        let mut store = TaskStore::from_tasks(vec![Task::new("Dup"), Task::new("Other"), Task::new("Dup")]);

        store.toggle_completed("Dup");
        let dups: Vec<bool> = store
            .tasks()
            .filter(|t| t.text == "Dup")
            .map(|t| t.completed)
            .collect();
        assert_eq!(dups, vec![true, false]);

        assert_eq!(store.delete("Dup"), 2);
        assert_eq!(texts(&store), vec!["Other"]);
    }

    #[test]
    fn test_remove_by_id_removes_only_one() {
        let mut store = TaskStore::from_tasks(vec![Task::new("Dup"), Task::new("Dup")]);
        let id = store.id_at(0).unwrap();

        let removed = store.remove(id).unwrap();
        assert_eq!(removed.text, "Dup");
        assert_eq!(store.len(), 1);
        assert!(store.remove(id).is_none());
    }

    #[test]
    fn test_edit_preserves_omitted_fields() {
        let mut store = sample_store();

        assert!(store.edit("Write report", "Write final report", None, None).unwrap());
        let task = store.find_by_text("Write final report").unwrap();
        assert_eq!(task.due.as_str(), "03-01-2024");
        assert_eq!(task.priority, Priority::High);

        assert!(store
            .edit("Write final report", "Write final report", Some(Due::none()), Some(Priority::Low))
            .unwrap());
        let task = store.find_by_text("Write final report").unwrap();
        assert!(task.due.is_empty());
        assert_eq!(task.priority, Priority::Low);
    }

    #[test]
    fn test_edit_first_match_only() {
        let mut store = TaskStore::from_tasks(vec![Task::new("Dup"), Task::new("Dup")]);
        assert!(store.edit("Dup", "Renamed", None, None).unwrap());
        assert_eq!(texts(&store), vec!["Renamed", "Dup"]);
    }

    #[test]
    fn test_edit_rejects_empty_text() {
        let mut store = sample_store();
        assert!(matches!(store.edit("Buy milk", "", None, None), Err(TaskError::EmptyText)));
        assert!(store.find_by_text("Buy milk").is_some());
    }

    #[test]
    fn test_edit_missing_is_noop() {
        let mut store = sample_store();
        assert!(!store.edit("missing", "x", None, None).unwrap());
        assert!(!store.update(TaskId::new(), "x", None, None).unwrap());
    }

    #[test]
    fn test_update_by_id() {
        let mut store = sample_store();
        let id = store.id_at(0).unwrap();

        assert!(store.update(id, "Buy oat milk", None, Some(Priority::Normal)).unwrap());
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy oat milk");
        assert_eq!(task.priority, Priority::Normal);
    }

    #[test]
    fn test_ids_survive_sort() {
        let mut store = sample_store();
        let id = store.id_at(0).unwrap();

        store.sort(SortKey::Text);
        assert_eq!(store.get(id).unwrap().text, "Buy milk");
    }

    #[test]
    fn test_clear_all() {
        let mut store = sample_store();
        assert_eq!(store.clear_all(), 4);
        assert!(store.is_empty());
        assert_eq!(store.clear_all(), 0);
    }

    #[test]
    fn test_clear_completed_keeps_order() {
        let mut store = sample_store();
        store.toggle_completed("Write report");

        assert_eq!(store.clear_completed(), 2);
        assert_eq!(texts(&store), vec!["Buy milk", "milk the cow"]);
        assert!(store.filter(FilterMode::Completed, "").is_empty());
        assert!(!store.has_completed());
    }

    #[test]
    fn test_filter_partitions_all() {
        let store = sample_store();

        let all: HashSet<TaskId> = store.filter(FilterMode::All, "").iter().map(|e| e.id).collect();
        let active: HashSet<TaskId> = store.filter(FilterMode::Active, "").iter().map(|e| e.id).collect();
        let done: HashSet<TaskId> = store.filter(FilterMode::Completed, "").iter().map(|e| e.id).collect();

        assert!(active.is_disjoint(&done));
        assert_eq!(active.union(&done).copied().collect::<HashSet<_>>(), all);
        assert_eq!(all.len(), store.len());
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let store = sample_store();

        let hits: Vec<&str> = store
            .filter(FilterMode::All, "MILK")
            .iter()
            .map(|e| e.task.text.as_str())
            .collect();
        assert_eq!(hits, vec!["Buy milk", "milk the cow"]);

        let hits = store.filter(FilterMode::Completed, "milk");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_filter_does_not_mutate() {
        let store = sample_store();
        let before: Vec<Task> = store.tasks().cloned().collect();
        let _ = store.filter(FilterMode::Active, "x");
        assert_eq!(store.tasks().cloned().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_sort_priority_toggles_and_resets() {
        let mut store = TaskStore::from_tasks(vec![
            Task::new("h").with_priority(Priority::High),
            Task::new("l").with_priority(Priority::Low),
            Task::new("n").with_priority(Priority::Normal),
        ]);

        let state = store.sort(SortKey::Priority);
        assert!(!state.descending);
        assert_eq!(texts(&store), vec!["l", "n", "h"]);

        let state = store.sort(SortKey::Priority);
        assert!(state.descending);
        assert_eq!(texts(&store), vec!["h", "n", "l"]);

        let state = store.sort(SortKey::Text);
        assert!(!state.descending);
        assert_eq!(texts(&store), vec!["h", "l", "n"]);
    }

    #[test]
    fn test_sort_priority_empty_ranks_lowest() {
        let mut store = TaskStore::from_tasks(vec![
            Task::new("normal").with_priority(Priority::Normal),
            Task::new("none"),
            Task::new("odd").with_priority(Priority::Other("Urgent".to_string())),
            Task::new("low").with_priority(Priority::Low),
        ]);

        store.sort_with(SortKey::Priority, false);
        assert_eq!(texts(&store), vec!["none", "odd", "low", "normal"]);
    }

    #[test]
    fn test_sort_due_is_lexicographic() {
        let mut store = TaskStore::from_tasks(vec![
            Task::new("older year").with_due(Due::from("02-01-2023")),
            Task::new("newer year").with_due(Due::from("01-05-2024")),
        ]);

        store.sort_with(SortKey::Due, false);
        assert_eq!(texts(&store), vec!["newer year", "older year"]);
        assert_eq!(
            store.sort_state(),
            Some(SortState {
                key: SortKey::Due,
                descending: false
            })
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let mut store = TaskStore::from_tasks(vec![
            Task::new("b").with_completed(true),
            Task::new("a"),
            Task::new("c").with_completed(true),
            Task::new("d"),
        ]);

        store.sort(SortKey::Completed);
        assert_eq!(texts(&store), vec!["a", "d", "b", "c"]);

        store.sort(SortKey::Completed);
        assert_eq!(texts(&store), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_restored_sort_state_toggles() {
        let mut store = TaskStore::from_tasks(vec![Task::new("a"), Task::new("b")]);
        store.set_sort_state(Some(SortState {
            key: SortKey::Text,
            descending: false,
        }));

        let state = store.sort(SortKey::Text);
        assert!(state.descending);
        assert_eq!(texts(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_json_round_trip() {
        let store = sample_store();
        let json = store.to_json().unwrap();
        let loaded = TaskStore::from_json(&json).unwrap();

        assert_eq!(
            loaded.tasks().cloned().collect::<Vec<_>>(),
            store.tasks().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_json_document_shape() {
        let store = TaskStore::from_tasks(vec![Task::new("Buy milk")]);
        let value: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{"text": "Buy milk", "due": "", "priority": "", "completed": false}])
        );
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(TaskStore::from_json("{oops"), Err(TaskError::Format(_))));
        assert!(matches!(
            TaskStore::from_json(r#"{"text":"not an array"}"#),
            Err(TaskError::Format(_))
        ));
        assert!(matches!(TaskStore::from_json(r#"[1, 2]"#), Err(TaskError::Format(_))));
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        assert!(matches!(
            TaskStore::from_slice(b"[{\"text\": \"caf\xe9\"}]"),
            Err(TaskError::Format(_))
        ));
        let store = TaskStore::from_slice("[{\"text\": \"café\"}]".as_bytes()).unwrap();
        assert_eq!(store.find_by_text("café").unwrap().text, "café");
    }

    #[test]
    fn test_from_json_empty_array() {
        let store = TaskStore::from_json("[]").unwrap();
        assert!(store.is_empty());
    }
}
