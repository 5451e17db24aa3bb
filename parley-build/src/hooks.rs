//! Lifecycle events and the hook registry.
//!
//! Plugins register handlers per [`Event`]. The driver fires the events in
//! [`Event::LIFECYCLE`] order and every handler of an event runs to
//! completion, in registration order, before the next one starts.

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{BuildContext, Result};

/// A named lifecycle point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Install,
    Parse,
    BeforeBuild,
    Build,
    ReverseBuild,
}

impl Event {
    /// All events in firing order. `Build` and `ReverseBuild` are exclusive.
    pub const LIFECYCLE: [Event; 5] = [
        Event::Install,
        Event::Parse,
        Event::BeforeBuild,
        Event::Build,
        Event::ReverseBuild,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Install => "install",
            Event::Parse => "parse",
            Event::BeforeBuild => "before.build",
            Event::Build => "build",
            Event::ReverseBuild => "reverse.build",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handler for one event.
pub trait Hook: Send + Sync {
    fn call(&self, ctx: &mut BuildContext) -> Result<()>;
}

impl<F> Hook for F
where
    F: Fn(&mut BuildContext) -> Result<()> + Send + Sync,
{
    fn call(&self, ctx: &mut BuildContext) -> Result<()> {
        self(ctx)
    }
}

#[derive(Clone)]
struct Registration {
    owner: String,
    hook: Arc<dyn Hook>,
}

/// Ordered registry of event handlers, keyed by owning plugin.
#[derive(Default)]
pub struct HookRegistry {
    handlers: IndexMap<Event, Vec<Registration>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `event`. Registering the same handler twice runs it twice.
    pub fn register(&mut self, event: Event, owner: impl Into<String>, hook: impl Hook + 'static) {
        self.handlers
            .entry(event)
            .or_default()
            .push(Registration {
                owner: owner.into(),
                hook: Arc::new(hook),
            });
    }

    /// Remove every handler of `owner` from every event.
    ///
    /// Returns the number of handlers removed.
    pub fn unregister(&mut self, owner: &str) -> usize {
        let mut removed = 0;
        for registrations in self.handlers.values_mut() {
            let before = registrations.len();
            registrations.retain(|r| r.owner != owner);
            removed += before - registrations.len();
        }
        if removed > 0 {
            info!(plugin = owner, removed, "plugin uninstalled");
        }
        removed
    }

    /// Number of handlers registered for `event`.
    pub fn handler_count(&self, event: Event) -> usize {
        self.handlers.get(&event).map_or(0, Vec::len)
    }

    /// Whether `owner` still has any handler registered.
    pub fn is_registered(&self, owner: &str) -> bool {
        self.handlers
            .values()
            .flatten()
            .any(|registration| registration.owner == owner)
    }

    /// Run every handler of `event` in registration order.
    ///
    /// Uninstall requests made by a handler are applied as soon as it
    /// returns, so the owner's remaining handlers never run. The first
    /// handler error stops the event and is returned.
    pub fn emit(&mut self, event: Event, ctx: &mut BuildContext) -> Result<()> {
        let snapshot = self.handlers.get(&event).cloned().unwrap_or_default();
        info!(event = %event, handlers = snapshot.len(), "emitting");

        for registration in snapshot {
            if !self.is_registered_for(event, &registration) {
                debug!(event = %event, plugin = %registration.owner, "handler removed, skipping");
                continue;
            }

            debug!(event = %event, plugin = %registration.owner, "calling handler");
            let result = registration.hook.call(ctx);

            for owner in ctx.take_uninstalled() {
                self.unregister(&owner);
            }
            result?;
        }
        Ok(())
    }

    fn is_registered_for(&self, event: Event, registration: &Registration) -> bool {
        self.handlers.get(&event).is_some_and(|registrations| {
            registrations
                .iter()
                .any(|r| Arc::ptr_eq(&r.hook, &registration.hook))
        })
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event, registrations) in &self.handlers {
            let owners: Vec<&str> = registrations.iter().map(|r| r.owner.as_str()).collect();
            map.entry(&event.as_str(), &owners);
        }
        map.finish()
    }
}
