//! Local task list.
//!
//! Tasks live in a single JSON document (`{"tasks": [...]}`) that is
//! rewritten atomically on every save: write to a temp file, fsync,
//! then rename over the original.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// A single to-do item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub content: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl Task {
    /// A new pending task.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// An ordered task list bound to a file.
#[derive(Debug, Clone)]
pub struct TaskList {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskList {
    /// Load the list at `path`. A missing file is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read or `Error::Json` if it is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let tasks = if path.exists() {
            let content = fs::read_to_string(path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<TaskDocument>(&content)?.tasks
            }
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), count = tasks.len(), "Loaded task list");

        Ok(Self {
            path: path.to_path_buf(),
            tasks,
        })
    }

    /// Persist the list atomically, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn save(&self) -> Result<()> {
        let document = TaskDocument {
            tasks: self.tasks.clone(),
        };
        let content = serde_json::to_string_pretty(&document)?;
        atomic_write(&self.path, &content)?;
        debug!(path = %self.path.display(), count = self.tasks.len(), "Saved task list");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a task. Returns its index.
    pub fn add(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.tasks.len() - 1
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if self.tasks.is_empty() {
            return Err(Error::EmptyTaskList);
        }
        if index >= self.tasks.len() {
            return Err(Error::TaskNotFound {
                index,
                count: self.tasks.len(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `EmptyTaskList` or `TaskNotFound` for a bad index.
    pub fn get(&self, index: usize) -> Result<&Task> {
        self.check_index(index)?;
        Ok(&self.tasks[index])
    }

    /// Remove and return the task at `index`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTaskList` or `TaskNotFound` for a bad index.
    pub fn remove(&mut self, index: usize) -> Result<Task> {
        self.check_index(index)?;
        Ok(self.tasks.remove(index))
    }

    /// # Errors
    ///
    /// Returns `EmptyTaskList` or `TaskNotFound` for a bad index.
    pub fn replace(&mut self, index: usize, task: Task) -> Result<()> {
        self.check_index(index)?;
        self.tasks[index] = task;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `EmptyTaskList` or `TaskNotFound` for a bad index.
    pub fn set_done(&mut self, index: usize, done: bool) -> Result<()> {
        self.check_index(index)?;
        self.tasks[index].done = done;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` for blank content, or an index error.
    pub fn edit(&mut self, index: usize, content: &str) -> Result<()> {
        let content = require_content(content)?;
        self.check_index(index)?;
        self.tasks[index].content = content;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank comment, or an index error.
    pub fn add_comment(&mut self, index: usize, comment: &str) -> Result<()> {
        let comment = require_content(comment)?;
        self.check_index(index)?;
        self.tasks[index].comments.push(comment);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `EmptyTaskList` or `TaskNotFound` for a bad index.
    pub fn comments(&self, index: usize) -> Result<&[String]> {
        Ok(&self.get(index)?.comments)
    }
}

/// Trim `content`, rejecting blank input.
///
/// # Errors
///
/// Returns `InvalidArgument` when nothing but whitespace remains.
pub fn require_content(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("task content must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Render tasks with status icons, one line each, comments indented below.
#[must_use]
pub fn render_tasks(tasks: &[Task]) -> String {
    let mut out = String::new();
    for (index, task) in tasks.iter().enumerate() {
        let line = if task.done {
            format!("✔\t{index}. {}: Completed", task.content).green().bold()
        } else {
            format!("⏳\t{index}. {}: Pending", task.content).cyan()
        };
        out.push_str(&format!("{line}\n"));
        for comment in &task.comments {
            out.push_str(&format!("\t\t- {comment}\n"));
        }
    }
    out
}

/// Write `content` to `path` atomically.
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_list() -> (TempDir, TaskList) {
        let dir = TempDir::new().unwrap();
        let list = TaskList::load(&dir.path().join("tasks.json")).unwrap();
        (dir, list)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, list) = temp_list();
        assert!(list.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let (_dir, mut list) = temp_list();
        list.add(Task::new("write docs"));
        list.add(Task::new("ship"));
        list.set_done(1, true).unwrap();
        list.add_comment(0, "README first").unwrap();
        list.save().unwrap();

        let reloaded = TaskList::load(list.path()).unwrap();
        assert_eq!(reloaded.tasks(), list.tasks());
        assert!(!list.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_document_format() {
        let (_dir, mut list) = temp_list();
        list.add(Task::new("plain"));
        list.save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(list.path()).unwrap()).unwrap();
        assert_eq!(raw["tasks"][0]["content"], "plain");
        assert_eq!(raw["tasks"][0]["done"], false);
        // Empty comments are omitted
        assert!(raw["tasks"][0].get("comments").is_none());
    }

    #[test]
    fn test_reads_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"{"tasks":[{"content":"a","done":true,"comments":["x"]},{"content":"b","done":false}]}"#,
        )
        .unwrap();

        let list = TaskList::load(&path).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.get(0).unwrap().done);
        assert_eq!(list.comments(0).unwrap(), ["x".to_string()]);
        assert!(list.comments(1).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(TaskList::load(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_index_errors() {
        let (_dir, mut list) = temp_list();
        assert!(matches!(list.remove(0), Err(Error::EmptyTaskList)));

        list.add(Task::new("only"));
        assert!(matches!(
            list.set_done(3, true),
            Err(Error::TaskNotFound { index: 3, count: 1 })
        ));
    }

    #[test]
    fn test_remove_shifts_indices() {
        let (_dir, mut list) = temp_list();
        list.add(Task::new("a"));
        list.add(Task::new("b"));
        list.add(Task::new("c"));

        assert_eq!(list.remove(1).unwrap().content, "b");
        assert_eq!(list.get(1).unwrap().content, "c");
    }

    #[test]
    fn test_edit_and_replace() {
        let (_dir, mut list) = temp_list();
        list.add(Task::new("draft"));

        assert!(matches!(list.edit(0, "   "), Err(Error::InvalidArgument(_))));
        list.edit(0, "  final  ").unwrap();
        assert_eq!(list.get(0).unwrap().content, "final");

        list.replace(0, Task { content: "new".into(), done: true, comments: vec![] }).unwrap();
        assert!(list.get(0).unwrap().done);
    }

    #[test]
    fn test_render_tasks() {
        colored::control::set_override(false);
        let tasks = vec![
            Task { content: "ship".into(), done: true, comments: vec!["tagged".into()] },
            Task::new("review"),
        ];
        assert_eq!(
            render_tasks(&tasks),
            "✔\t0. ship: Completed\n\t\t- tagged\n⏳\t1. review: Pending\n"
        );
    }
}
