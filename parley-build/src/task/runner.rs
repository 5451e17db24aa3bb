use std::time::Instant;

use tracing::{info, warn};

use super::{Task, TaskReport, TaskStatus};
use crate::Error;

/// A task whose own action failed.
///
/// Carries the partial report of the tree up to the failure.
#[derive(Debug)]
pub struct TaskFailure {
    pub report: TaskReport,
    pub error: Box<Error>,
}

/// Executes task trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskRunner;

impl TaskRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run a task tree to completion.
    ///
    /// A disabled task is skipped without visiting its children. If the
    /// task's own action fails, the error is returned to the caller. Failing
    /// children are recorded in the report and their siblings keep running.
    pub fn run(&self, task: Task) -> Result<TaskReport, TaskFailure> {
        let Task {
            title,
            children,
            action,
            enabled,
        } = task;
        let started = Instant::now();

        if !enabled {
            warn!(task = %title, status = "skipped", "task disabled");
            return Ok(TaskReport {
                title,
                status: TaskStatus::Skipped,
                children: Vec::new(),
                elapsed: started.elapsed(),
            });
        }

        info!(task = %title, "running");

        if let Some(action) = action {
            if let Err(error) = action() {
                warn!(task = %title, status = "failed", error = %error, "task failed");
                return Err(TaskFailure {
                    report: TaskReport {
                        title,
                        status: TaskStatus::Failed {
                            kind: error.kind(),
                            message: error.to_string(),
                        },
                        children: Vec::new(),
                        elapsed: started.elapsed(),
                    },
                    error,
                });
            }
        }

        let mut reports = Vec::with_capacity(children.len());
        let mut failed = 0usize;
        for child in children {
            let report = match self.run(child) {
                Ok(report) => report,
                Err(failure) => failure.report,
            };
            if !report.succeeded() {
                failed += 1;
            }
            reports.push(report);
        }

        let status = if failed == 0 {
            TaskStatus::Succeeded
        } else {
            TaskStatus::Failed {
                kind: "subtask",
                message: format!("{} of {} subtasks failed", failed, reports.len()),
            }
        };
        info!(task = %title, status = %status, "finished");

        Ok(TaskReport {
            title,
            status,
            children: reports,
            elapsed: started.elapsed(),
        })
    }
}
