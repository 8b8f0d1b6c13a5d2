//! Trigger-name to handler bindings, and the dispatcher that fills them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::{debug, error, info, trace};

use crate::event::{BindingMode, EventArgs, EventDescriptor};
use crate::handler::{self, EventService};
use crate::plugin::{self, LoadReport, PluginSource};

// ─── EventBinding ─────────────────────────────────────────────────────────────

/// One handler bound to one trigger.
#[derive(Clone)]
pub struct EventBinding {
    /// Binding mode.
    pub mode: BindingMode,
    /// Handler.
    pub handler: EventService,
    /// Where the handler was loaded from.
    pub origin: String,
}

impl std::fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBinding")
            .field("mode", &self.mode)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Counts from one [`EventBus::dispatch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that completed.
    pub completed: usize,
    /// Handlers that returned an error.
    pub failed: usize,
}

impl DispatchReport {
    /// Total handlers invoked.
    pub fn invoked(&self) -> usize {
        self.completed + self.failed
    }
}

// ─── EventBus ─────────────────────────────────────────────────────────────────

/// Maps trigger names to their bindings.
///
/// Bindings for one trigger fire in the order they were added. A `Once`
/// binding is removed before it runs, so it fires at most once even when
/// events for its trigger are dispatched concurrently.
#[derive(Debug, Default)]
pub struct EventBus {
    bindings: RwLock<HashMap<String, Vec<EventBinding>>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding after any existing bindings for `trigger`.
    pub fn bind(&self, trigger: impl Into<String>, binding: EventBinding) {
        let trigger = trigger.into();
        trace!(%trigger, origin = %binding.origin, mode = ?binding.mode, "Binding event handler");
        self.bindings.write().entry(trigger).or_default().push(binding);
    }

    /// Number of live bindings for `trigger`.
    pub fn binding_count(&self, trigger: &str) -> usize {
        self.bindings.read().get(trigger).map_or(0, Vec::len)
    }

    /// Triggers that have at least one live binding, sorted.
    pub fn triggers(&self) -> Vec<String> {
        let mut triggers: Vec<String> = self.bindings.read().keys().cloned().collect();
        triggers.sort();
        triggers
    }

    /// Runs every binding for `trigger` with `args`, in binding order.
    ///
    /// An unbound trigger is a no-op. A failing handler is logged and does
    /// not stop the remaining handlers.
    pub async fn dispatch(&self, trigger: &str, args: EventArgs) -> DispatchReport {
        let fired = self.take_fired(trigger);
        if fired.is_empty() {
            trace!(%trigger, "No handlers bound");
            return DispatchReport::default();
        }

        let mut report = DispatchReport::default();
        for binding in fired {
            match handler::call(&binding.handler, args.clone()).await {
                Ok(()) => report.completed += 1,
                Err(e) => {
                    error!(%trigger, origin = %binding.origin, error = %e, "Event handler failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Snapshots the bindings to fire and unbinds the `Once` ones.
    fn take_fired(&self, trigger: &str) -> Vec<EventBinding> {
        let map = self.bindings.upgradable_read();
        let Some(list) = map.get(trigger) else {
            return Vec::new();
        };
        let snapshot = list.clone();
        if !list.iter().any(|b| b.mode == BindingMode::Once) {
            return snapshot;
        }

        let mut map = RwLockUpgradableReadGuard::upgrade(map);
        if let Some(list) = map.get_mut(trigger) {
            list.retain(|b| b.mode == BindingMode::Repeating);
            if list.is_empty() {
                map.remove(trigger);
            }
        }
        debug!(%trigger, "Unbound one-shot handlers");
        snapshot
    }
}

// ─── EventDispatcher ──────────────────────────────────────────────────────────

/// Loads event plugins onto a shared [`EventBus`].
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    bus: Arc<EventBus>,
    timeout: Option<Duration>,
}

impl EventDispatcher {
    /// Creates a dispatcher over `bus`.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus, timeout: None }
    }

    /// Bounds every handler this dispatcher binds by `timeout`.
    pub fn handler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The underlying bus.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Binds one validated handler.
    pub fn register(&self, descriptor: EventDescriptor) {
        let EventDescriptor {
            trigger,
            mode,
            handler,
            origin,
            ..
        } = descriptor;
        info!(%trigger, %origin, ?mode, "Registered event handler");
        self.bus.bind(
            trigger,
            EventBinding {
                mode,
                handler: handler::with_timeout(handler, self.timeout),
                origin,
            },
        );
    }

    /// Loads every valid event plugin from `source` and binds it.
    ///
    /// Invalid candidates are logged and skipped. An unreadable source binds
    /// nothing.
    pub async fn register_all<S>(&self, source: &S) -> LoadReport
    where
        S: PluginSource<Unit = crate::event::EventUnit> + ?Sized,
    {
        let (loaded, report) = plugin::collect(source).await;
        for (_, descriptor) in loaded {
            self.register(descriptor);
        }
        info!(
            location = %source.location(),
            loaded = report.loaded,
            skipped = report.skipped,
            "Event plugins registered"
        );
        report
    }

    /// Dispatches `args` to the handlers bound to `trigger`.
    pub async fn dispatch(&self, trigger: &str, args: EventArgs) -> DispatchReport {
        self.bus.dispatch(trigger, args).await
    }
}
