use std::{fmt, time::Duration};

/// Outcome of a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Succeeded,
    /// The task's action failed, or at least one child failed.
    Failed {
        kind: &'static str,
        message: String,
    },
    /// The task was disabled; its children were not visited.
    Skipped,
}

impl TaskStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, TaskStatus::Failed { .. })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Succeeded => write!(f, "succeeded"),
            TaskStatus::Failed { .. } => write!(f, "failed"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// What happened when a task tree ran.
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub title: String,
    pub status: TaskStatus,
    pub children: Vec<TaskReport>,
    pub elapsed: Duration,
}

impl TaskReport {
    /// True unless this task or anything below it failed.
    pub fn succeeded(&self) -> bool {
        !self.status.is_failed()
    }

    /// Find a report by title, searching depth-first.
    pub fn find(&self, title: &str) -> Option<&TaskReport> {
        if self.title == title {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(title))
    }

    /// Count the reports in this tree with the given status kind.
    pub fn count(&self, matches: impl Fn(&TaskStatus) -> bool + Copy) -> usize {
        let own = usize::from(matches(&self.status));
        own + self
            .children
            .iter()
            .map(|child| child.count(matches))
            .sum::<usize>()
    }
}
