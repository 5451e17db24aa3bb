//! Fires the lifecycle and runs the queued tasks.

use tracing::{error, info};

use crate::{BuildContext, Event, HookRegistry, Plugin, Result, TaskReport, TaskRunner};

/// Result of one build invocation.
#[derive(Debug, Default)]
pub struct BuildOutcome {
    /// One report per top-level task, in queue order.
    pub reports: Vec<TaskReport>,
}

impl BuildOutcome {
    /// True if every top-level task succeeded.
    pub fn succeeded(&self) -> bool {
        self.reports.iter().all(TaskReport::succeeded)
    }
}

/// Owns the hook registry of one invocation.
#[derive(Debug, Default)]
pub struct Driver {
    registry: HookRegistry,
    runner: TaskRunner,
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a plugin's hooks.
    pub fn plugin(mut self, plugin: impl Plugin) -> Self {
        plugin.install(&mut self.registry);
        self
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Fire `install`, `parse` and `before.build`, then `build` or
    /// `reverse.build`, and run every queued task.
    ///
    /// An event error aborts the build before any task runs. Task failures
    /// are recorded in the outcome.
    pub fn run(&mut self, ctx: &mut BuildContext) -> Result<BuildOutcome> {
        let last = if ctx.flags.reverse {
            Event::ReverseBuild
        } else {
            Event::Build
        };
        for event in [Event::Install, Event::Parse, Event::BeforeBuild, last] {
            self.registry.emit(event, ctx)?;
        }

        let mut outcome = BuildOutcome::default();
        for task in ctx.take_tasks() {
            let report = match self.runner.run(task) {
                Ok(report) => report,
                Err(failure) => {
                    error!(task = %failure.report.title, error = %failure.error, "task failed");
                    failure.report
                }
            };
            outcome.reports.push(report);
        }
        info!(tasks = outcome.reports.len(), succeeded = outcome.succeeded(), "build finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use parley_project::ProjectConfig;

    use super::*;
    use crate::{BuildFlags, Error, Task};

    struct Recorder {
        id: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Plugin for Recorder {
        fn id(&self) -> &'static str {
            self.id
        }

        fn install(&self, registry: &mut HookRegistry) {
            for event in Event::LIFECYCLE {
                let log = Arc::clone(&self.log);
                let entry = format!("{}:{}", self.id, event);
                registry.register(event, self.id, move |_: &mut BuildContext| -> Result<()> {
                    log.lock().unwrap().push(entry.clone());
                    Ok(())
                });
            }
        }
    }

    fn ctx(flags: BuildFlags) -> BuildContext {
        let config: ProjectConfig = "[project]\nname = \"demo\"\n".parse().unwrap();
        BuildContext::new(config, ".", flags)
    }

    #[test]
    fn test_forward_lifecycle_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut driver = Driver::new().plugin(Recorder {
            id: "a",
            log: Arc::clone(&log),
        });

        driver.run(&mut ctx(BuildFlags::default())).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:install", "a:parse", "a:before.build", "a:build"]
        );
    }

    #[test]
    fn test_reverse_lifecycle_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut driver = Driver::new().plugin(Recorder {
            id: "a",
            log: Arc::clone(&log),
        });
        let flags = BuildFlags {
            reverse: true,
            ..BuildFlags::default()
        };

        driver.run(&mut ctx(flags)).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:install", "a:parse", "a:before.build", "a:reverse.build"]
        );
    }

    #[test]
    fn test_outcome_is_and_of_top_level_tasks() {
        let mut ctx = ctx(BuildFlags::default());
        ctx.push_task(Task::leaf("ok", || Ok(())));
        ctx.push_task(Task::leaf("bad", || Err(Error::configuration("x", None))));
        ctx.push_task(Task::leaf("after", || Ok(())));

        let outcome = Driver::new().run(&mut ctx).unwrap();

        assert_eq!(outcome.reports.len(), 3);
        assert!(!outcome.succeeded());
        assert!(outcome.reports[2].succeeded());
    }
}
