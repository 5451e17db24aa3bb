//! Task trees.
//!
//! A [`Task`] is a unit of deferred work with optional children. Leaves carry
//! an action, groups carry children. Tasks are built during the `build` and
//! `reverse.build` events and executed once by the [`TaskRunner`].

mod report;
mod runner;

use std::fmt;

pub use report::{TaskReport, TaskStatus};
pub use runner::{TaskFailure, TaskRunner};

use crate::Result;

/// Deferred operation of a task.
pub type Action = Box<dyn FnOnce() -> Result<()> + Send>;

/// A unit of orchestrated work.
pub struct Task {
    title: String,
    children: Vec<Task>,
    action: Option<Action>,
    enabled: bool,
}

impl Task {
    /// A leaf task running `action`.
    pub fn leaf(
        title: impl Into<String>,
        action: impl FnOnce() -> Result<()> + Send + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
            action: Some(Box::new(action)),
            enabled: true,
        }
    }

    /// A group task without an action of its own.
    pub fn group(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
            action: None,
            enabled: true,
        }
    }

    /// Append a child task.
    pub fn with_child(mut self, child: Task) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child task in place.
    pub fn add_child(&mut self, child: Task) {
        self.children.push(child);
    }

    /// Disable this task and its whole subtree.
    pub fn disable(&mut self) {
        self.enabled = false;
        for child in &mut self.children {
            child.disable();
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn children(&self) -> &[Task] {
        &self.children
    }

    /// Find a direct or nested child by title.
    pub fn find_mut(&mut self, title: &str) -> Option<&mut Task> {
        if self.title == title {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(title))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("title", &self.title)
            .field("enabled", &self.enabled)
            .field("has_action", &self.action.is_some())
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Task {
        Task::group("Building Alexa Skill")
            .with_child(Task::leaf("Creating project files", || Ok(())))
            .with_child(
                Task::group("Building interaction model")
                    .with_child(Task::leaf("en-US", || Ok(())))
                    .with_child(Task::leaf("en-GB", || Ok(()))),
            )
    }

    #[test]
    fn test_disable_subtree() {
        let mut task = tree();
        task.find_mut("Building interaction model").unwrap().disable();

        assert!(task.is_enabled());
        assert!(task.children()[0].is_enabled());
        let model = &task.children()[1];
        assert!(!model.is_enabled());
        assert!(model.children().iter().all(|child| !child.is_enabled()));
    }

    #[test]
    fn test_leaf_and_group() {
        let task = tree();
        assert!(!task.is_leaf());
        assert!(task.children()[0].is_leaf());
        assert!(task.children()[0].action.is_some());
        assert!(task.action.is_none());
    }
}
