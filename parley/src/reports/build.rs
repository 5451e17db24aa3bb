//! Build command report data structures.

use std::path::PathBuf;

use parley_build::{BuildOutcome, TaskReport, TaskStatus};

use super::output::{Output, Report, Status};

/// Report data from a forward or reverse build.
#[derive(Debug)]
pub struct BuildReport {
    pub reverse: bool,
    pub build_directory: PathBuf,
    pub models_directory: PathBuf,
    pub outcome: BuildOutcome,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.outcome.succeeded()
    }

    /// Failed tasks that have no failed children of their own.
    fn failed_tasks(&self) -> usize {
        self.outcome.reports.iter().map(failed_leaves).sum()
    }
}

fn failed_leaves(task: &TaskReport) -> usize {
    let below: usize = task.children.iter().map(failed_leaves).sum();
    if below == 0 && task.status.is_failed() {
        1
    } else {
        below
    }
}

fn render_task(out: &mut dyn Output, task: &TaskReport, depth: usize) {
    let elapsed = task.elapsed.as_millis();
    match &task.status {
        TaskStatus::Succeeded => {
            out.status_item(depth, Status::Ok, &format!("{} ({}ms)", task.title, elapsed))
        }
        TaskStatus::Skipped => out.status_item(depth, Status::Skipped, &task.title),
        TaskStatus::Failed { kind, message } => out.status_item(
            depth,
            Status::Failed,
            &format!("{} [{}]: {}", task.title, kind, message),
        ),
    }
    for child in &task.children {
        render_task(out, child, depth + 1);
    }
}

impl Report for BuildReport {
    fn render(&self, out: &mut dyn Output) {
        for task in &self.outcome.reports {
            out.section(&task.title);
            for child in &task.children {
                render_task(out, child, 0);
            }
        }
        out.newline();

        if !self.succeeded() {
            out.error(&format!("{} task(s) failed", self.failed_tasks()));
        } else if self.reverse {
            out.success(&format!("Models written to {}", self.models_directory.display()));
        } else {
            out.success(&format!("Built into {}", self.build_directory.display()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::reports::output::RecordingOutput;

    fn task(title: &str, status: TaskStatus, children: Vec<TaskReport>) -> TaskReport {
        TaskReport {
            title: title.into(),
            status,
            children,
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_render_failed_build() {
        let report = BuildReport {
            reverse: false,
            build_directory: "build".into(),
            models_directory: "models".into(),
            outcome: BuildOutcome {
                reports: vec![task(
                    "Building Alexa Skill",
                    TaskStatus::Failed {
                        kind: "subtask",
                        message: "1 of 2 subtasks failed".into(),
                    },
                    vec![
                        task("Creating project files", TaskStatus::Succeeded, vec![]),
                        task(
                            "Building interaction model",
                            TaskStatus::Failed {
                                kind: "subtask",
                                message: "1 of 1 subtasks failed".into(),
                            },
                            vec![task(
                                "en-US",
                                TaskStatus::Failed {
                                    kind: "conversion",
                                    message: "boom".into(),
                                },
                                vec![],
                            )],
                        ),
                    ],
                )],
            },
        };
        let mut out = RecordingOutput::default();

        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "Building Alexa Skill:",
                "Ok Creating project files (3ms)",
                "Failed Building interaction model [subtask]: 1 of 1 subtasks failed",
                "  Failed en-US [conversion]: boom",
                "",
                "error: 1 task(s) failed",
            ]
        );
    }

    #[test]
    fn test_render_reverse_build() {
        let report = BuildReport {
            reverse: true,
            build_directory: "build".into(),
            models_directory: "models".into(),
            outcome: BuildOutcome {
                reports: vec![task(
                    "Reversing Alexa Skill",
                    TaskStatus::Succeeded,
                    vec![task("en-US", TaskStatus::Skipped, vec![])],
                )],
            },
        };
        let mut out = RecordingOutput::default();

        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "Reversing Alexa Skill:",
                "Skipped en-US",
                "",
                "success: Models written to models",
            ]
        );
    }
}
