//! Lifecycle wiring of a platform.
//!
//! [`PlatformPlugin`] adapts any [`Platform`] to the hook registry: it
//! validates locales and settings in `before.build`, then queues the task
//! tree for a forward or reverse build.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use indexmap::IndexMap;
use parley_core::toml_to_json;
use parley_project::{LocaleTable, ProjectConfig};
use tracing::{debug, info, warn};

use crate::{
    ActionRegistry, BuildContext, Error, Event, FileTree, HookRegistry, Platform, PlatformState,
    ProjectFilesInput, Result, Task,
    convert::{build_locale, reverse_locale},
    locale::{generic_locale_for, resolve_locales, select_default_locale, validate_locales},
    models::{ModelOverrides, ModelStore},
};

/// Something that registers lifecycle hooks.
pub trait Plugin {
    fn id(&self) -> &'static str;

    fn install(&self, registry: &mut HookRegistry);
}

/// Hooks a [`Platform`] into the build lifecycle.
pub struct PlatformPlugin<P> {
    platform: Arc<P>,
}

impl<P: Platform> PlatformPlugin<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform: Arc::new(platform),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}

impl<P: Platform> Plugin for PlatformPlugin<P> {
    fn id(&self) -> &'static str {
        self.platform.id()
    }

    fn install(&self, registry: &mut HookRegistry) {
        let id = self.platform.id();

        registry.register(Event::Install, id, move |_: &mut BuildContext| -> Result<()> {
            info!(plugin = id, "installed");
            Ok(())
        });

        registry.register(Event::Parse, id, move |ctx: &mut BuildContext| -> Result<()> {
            if !ctx.platform_selected(id) {
                debug!(plugin = id, "excluded by --platform");
                ctx.uninstall(id);
            }
            Ok(())
        });

        let platform = Arc::clone(&self.platform);
        registry.register(Event::BeforeBuild, id, move |ctx: &mut BuildContext| -> Result<()> {
            let state = prepare_state(platform.as_ref(), ctx)?;
            if ctx.flags.clean && !ctx.flags.reverse {
                clean(platform.as_ref(), ctx)?;
            }
            ctx.set_state(platform.id(), state);
            Ok(())
        });

        let platform = Arc::clone(&self.platform);
        registry.register(Event::Build, id, move |ctx: &mut BuildContext| -> Result<()> {
            let task = build_task(&platform, ctx)?;
            ctx.push_task(task);
            Ok(())
        });

        let platform = Arc::clone(&self.platform);
        registry.register(Event::ReverseBuild, id, move |ctx: &mut BuildContext| -> Result<()> {
            let task = reverse_task(&platform, ctx)?;
            ctx.push_task(task);
            Ok(())
        });
    }
}

/// Resolve and validate the locales of a platform and run its own checks.
///
/// Writes nothing. Forward builds take their locales from `--locale` or the
/// model files, reverse builds from `--locale` or the native files.
pub fn prepare_state(platform: &dyn Platform, ctx: &BuildContext) -> Result<PlatformState> {
    let id = platform.id();
    let root = ctx.platform_dir(&platform.directory());
    let table = ctx.config.locale_table(id);

    let requested = if !ctx.flags.locales.is_empty() {
        ctx.flags.locales.clone()
    } else if ctx.flags.reverse {
        platform.native_locales(&root)?
    } else {
        ModelStore::new(ctx.models_directory()).locales()?
    };

    if requested.is_empty() {
        return Err(if ctx.flags.reverse {
            Error::configuration(
                format!(
                    "no native {} files found in '{}'",
                    platform.display_name(),
                    root.display()
                ),
                Some("run a forward build first or pass --locale"),
            )
        } else {
            Error::configuration(
                format!(
                    "no model files found in '{}'",
                    ctx.models_directory().display()
                ),
                Some("add a model file such as models/en.json, or pass --locale"),
            )
        });
    }

    let resolved = resolve_locales(&requested, table);
    validate_locales(&resolved, &platform.supported_locales(), platform.display_name())?;

    let configured = ctx
        .config
        .platform(id)
        .and_then(|settings| settings.default_locale());
    // The native default decides which native files are the base ones, so a
    // reverse build keeps it even when only other locales are requested.
    let native = if configured.is_none() && ctx.flags.reverse {
        match platform.native_default_locale(&root) {
            Ok(locale) => locale,
            Err(err) => {
                warn!(plugin = id, error = %err, "could not read native default locale");
                None
            }
        }
    } else {
        None
    };
    let default_locale = match native {
        Some(locale) => locale,
        None => select_default_locale(&resolved, configured)?,
    };

    let mut state = PlatformState {
        resolved_locales: resolved,
        default_locale,
        project_id: None,
    };
    platform.validate(ctx, &mut state)?;

    info!(
        plugin = id,
        locales = ?state.resolved_locales,
        default_locale = %state.default_locale,
        "resolved locales"
    );
    Ok(state)
}

fn clean(platform: &dyn Platform, ctx: &BuildContext) -> Result<()> {
    let dir = ctx.platform_dir(&platform.directory());
    if dir.exists() {
        std::fs::remove_dir_all(&dir).map_err(|e| Error::filesystem(&dir, e))?;
        info!(path = %dir.display(), "cleaned platform directory");
    }
    Ok(())
}

/// Everything a queued task needs, detached from the context.
struct Job<P> {
    platform: Arc<P>,
    config: Arc<ProjectConfig>,
    state: PlatformState,
    root: PathBuf,
    store: ModelStore,
    table: LocaleTable,
    overrides: ModelOverrides,
}

impl<P: Platform> Job<P> {
    fn new(platform: &Arc<P>, ctx: &BuildContext) -> Result<Self> {
        let id = platform.id();
        let state = ctx.state(id).cloned().ok_or_else(|| {
            Error::configuration(
                format!("locales of {} were not resolved", platform.display_name()),
                None,
            )
        })?;
        let overrides = ModelOverrides::from_config(&ctx.config, id);

        Ok(Self {
            platform: Arc::clone(platform),
            config: Arc::clone(&ctx.config),
            state,
            root: ctx.platform_dir(&platform.directory()),
            store: ModelStore::new(ctx.models_directory()),
            table: ctx.config.locale_table(id).clone(),
            overrides,
        })
    }

    fn user_files(&self) -> IndexMap<String, toml::Value> {
        self.config
            .platform(self.platform.id())
            .map(|settings| settings.files().clone())
            .unwrap_or_default()
    }

    fn has_any_model(&self) -> bool {
        self.state
            .resolved_locales
            .iter()
            .any(|locale| self.store.find(locale, &self.table).is_some())
    }

    fn create_project_files(&self) -> Result<()> {
        let mut models = IndexMap::new();
        for locale in &self.state.resolved_locales {
            match self.store.load(locale, &self.table, &self.overrides) {
                Ok(Some(model)) => {
                    models.insert(locale.clone(), model);
                }
                Ok(None) => {}
                Err(err) => warn!(locale = %locale, error = %err, "model skipped for project files"),
            }
        }

        let mut tree = FileTree::from_overrides(&self.user_files());
        let input = ProjectFilesInput {
            config: &self.config,
            state: &self.state,
            models: &models,
        };
        self.platform.project_files(&mut tree, &input)?;
        tree.write(&self.root)?;
        Ok(())
    }

    fn build_model(&self, locale: &str, registry: &Mutex<Option<ActionRegistry>>) -> Result<()> {
        let model = self
            .store
            .load(locale, &self.table, &self.overrides)?
            .ok_or_else(|| {
                Error::configuration(
                    format!("no model file found for locale '{}'", locale),
                    Some("add a model file for this locale or a [locales] entry pointing to one"),
                )
            })?;

        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        build_locale(
            self.platform.converter(),
            &model,
            locale,
            &self.state.default_locale,
            &self.root,
            registry.as_mut(),
        )?;
        Ok(())
    }

    fn register_actions(&self, registry: &Mutex<Option<ActionRegistry>>) -> Result<()> {
        let registry = registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(registry) = registry else {
            return Ok(());
        };
        let user = self.user_files().get(registry.path()).map(toml_to_json);
        if let Some(path) = registry.write(&self.root, user.as_ref())? {
            debug!(path = %path.display(), "wrote action registry");
        }
        Ok(())
    }

    fn reverse_model(&self, locale: &str, force: bool) -> Result<()> {
        let platform = self.platform.as_ref();
        let files = platform
            .read_native(&self.root, locale, &self.state.default_locale)
            .map_err(|err| unusable(platform, locale, err))?;

        let target = generic_locale_for(locale, &self.table).unwrap_or(locale);
        let existing = self.store.load_existing(target)?;
        let value = reverse_locale(platform.converter(), &files, locale, existing)?;

        if let Some(backup) = self.store.save(target, &value, !force)? {
            info!(locale = target, backup = %backup.display(), "kept previous model");
        }
        Ok(())
    }
}

/// Native content that cannot be parsed is a conversion failure of that locale.
fn unusable(platform: &dyn Platform, locale: &str, err: Box<Error>) -> Box<Error> {
    match *err {
        Error::Parse { path, message } => Error::conversion(
            platform.converter().platform_key(),
            locale,
            format!("unusable native file '{}': {}", path.display(), message),
            Some("fix or delete the native file, or run a forward build"),
        ),
        other => Box::new(other),
    }
}

fn build_task<P: Platform>(platform: &Arc<P>, ctx: &BuildContext) -> Result<Task> {
    let job = Arc::new(Job::new(platform, ctx)?);
    let registry = Arc::new(Mutex::new(
        platform.converter().registry_path().map(ActionRegistry::new),
    ));

    let files_job = Arc::clone(&job);
    let mut model = Task::group("Building interaction model");
    for locale in &job.state.resolved_locales {
        let job = Arc::clone(&job);
        let registry = Arc::clone(&registry);
        let locale = locale.clone();
        model.add_child(Task::leaf(locale.clone(), move || {
            job.build_model(&locale, &registry)
        }));
    }
    let registry_job = Arc::clone(&job);
    model.add_child(Task::leaf("Registering actions", move || {
        registry_job.register_actions(&registry)
    }));

    if !job.has_any_model() {
        warn!(
            plugin = platform.id(),
            "no model file for any resolved locale, skipping interaction model"
        );
        model.disable();
    }

    Ok(Task::group(format!("Building {}", platform.display_name()))
        .with_child(Task::leaf("Creating project files", move || {
            files_job.create_project_files()
        }))
        .with_child(model))
}

fn reverse_task<P: Platform>(platform: &Arc<P>, ctx: &BuildContext) -> Result<Task> {
    let job = Arc::new(Job::new(platform, ctx)?);
    let force = ctx.flags.force;

    let mut task = Task::group(format!("Reversing {}", platform.display_name()));
    for locale in &job.state.resolved_locales {
        let job = Arc::clone(&job);
        let locale = locale.clone();
        task.add_child(Task::leaf(locale.clone(), move || {
            job.reverse_model(&locale, force)
        }));
    }
    Ok(task)
}
