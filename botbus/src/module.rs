//! Script module lifecycle.
//!
//! A [`ScriptModule`] is one independently loadable unit of bot behavior. It
//! registers its handlers on the bus in [`attach`](ScriptModule::attach) and
//! removes them in [`detach`](ScriptModule::detach). The [`ModuleHost`]
//! tracks which modules are loaded, by name, and drives the bus-wide load
//! and unload events.
//!
//! Reading script files and persisting the load list are the host's job;
//! this module only sees modules that already exist as values.

use crate::bus::EventBus;
use botbus_core::ModuleError;
use botbus_std::dispatch::panic_message;
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// An independently loadable unit of bot behavior.
///
/// # Example
///
/// ```rust,ignore
/// struct Echo {
///     handler: Arc<EchoHandler>,
/// }
///
/// impl ScriptModule for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn attach(&self, bus: &EventBus) {
///         bus.register_message(self.handler.clone());
///     }
///
///     fn detach(&self, bus: &EventBus) {
///         bus.unregister_message(&self.handler);
///     }
/// }
/// ```
pub trait ScriptModule: Send + Sync + 'static {
    /// Unique name of the module, usually its script file name.
    fn name(&self) -> &str;

    /// Register this module's handlers.
    fn attach(&self, bus: &EventBus);

    /// Unregister this module's handlers.
    ///
    /// The default does nothing; modules that never unload can rely on it.
    fn detach(&self, bus: &EventBus) {
        let _ = bus;
    }
}

/// A module known to the host.
struct Slot {
    module: Arc<dyn ScriptModule>,
    /// `false` while `attach` is still running.
    attached: bool,
}

/// Loads and unloads script modules against one bus.
///
/// A module whose `attach` panics is detached again and not recorded, so
/// one broken script never takes the host down or blocks a later retry.
pub struct ModuleHost {
    bus: Arc<EventBus>,
    modules: Mutex<Vec<Slot>>,
}

impl ModuleHost {
    /// Create a host for `bus` with no modules loaded.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            modules: Mutex::new(Vec::new()),
        }
    }

    /// The bus modules are attached to.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Load a module: attach it to the bus and remember it by name.
    ///
    /// Fails if a module with the same name is loaded or still attaching;
    /// the new module is then not attached. Fails with
    /// [`ModuleError::AttachFailed`] if `attach` panics.
    pub fn load(&self, module: Arc<dyn ScriptModule>) -> Result<(), ModuleError> {
        let name = module.name().to_string();
        {
            let mut modules = self.lock();
            if modules.iter().any(|slot| slot.module.name() == name) {
                return Err(ModuleError::AlreadyLoaded(name));
            }
            modules.push(Slot {
                module: module.clone(),
                attached: false,
            });
        }

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| module.attach(&self.bus))) {
            let reason = panic_message(payload.as_ref());
            if panic::catch_unwind(AssertUnwindSafe(|| module.detach(&self.bus))).is_err() {
                tracing::error!(bus = self.bus.name(), module = %name, "module detach panicked");
            }
            self.lock().retain(|slot| !Arc::ptr_eq(&slot.module, &module));
            tracing::warn!(bus = self.bus.name(), module = %name, %reason, "module attach panicked");
            return Err(ModuleError::AttachFailed {
                module: name,
                reason,
            });
        }

        if let Some(slot) = self
            .lock()
            .iter_mut()
            .find(|slot| Arc::ptr_eq(&slot.module, &module))
        {
            slot.attached = true;
        }
        tracing::info!(
            bus = self.bus.name(),
            module = %name,
            handlers = self.bus.total_handler_count(),
            "module loaded"
        );
        Ok(())
    }

    /// Unload a module by name: detach it from the bus and forget it.
    ///
    /// A module that is still attaching counts as not loaded.
    pub fn unload(&self, name: &str) -> Result<(), ModuleError> {
        let module = {
            let mut modules = self.lock();
            let index = modules
                .iter()
                .position(|slot| slot.attached && slot.module.name() == name)
                .ok_or_else(|| ModuleError::NotLoaded(name.to_string()))?;
            modules.remove(index).module
        };

        module.detach(&self.bus);
        tracing::info!(bus = self.bus.name(), module = %name, "module unloaded");
        Ok(())
    }

    /// Whether a module with this name is loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.lock()
            .iter()
            .any(|slot| slot.attached && slot.module.name() == name)
    }

    /// Names of loaded modules, in load order.
    pub fn loaded(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|slot| slot.attached)
            .map(|slot| slot.module.name().to_string())
            .collect()
    }

    /// Announce that loading is finished by dispatching the load event.
    pub fn start(&self) {
        tracing::info!(
            bus = self.bus.name(),
            modules = self.loaded().len(),
            handlers = self.bus.total_handler_count(),
            "starting"
        );
        self.bus.dispatch_load();
    }

    /// Dispatch the unload event, then detach every loaded module, newest
    /// first.
    pub fn shutdown(&self) {
        self.bus.dispatch_unload();

        let modules: Vec<_> = {
            let mut slots = self.lock();
            let (loaded, attaching): (Vec<Slot>, Vec<Slot>) =
                slots.drain(..).partition(|slot| slot.attached);
            *slots = attaching;
            loaded
        };
        for slot in modules.iter().rev() {
            slot.module.detach(&self.bus);
        }
        tracing::info!(bus = self.bus.name(), unloaded = modules.len(), "shut down");
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Slot>> {
        self.modules.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ModuleHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHost")
            .field("bus", &self.bus.name())
            .field("modules", &self.loaded())
            .finish()
    }
}

/// A module submitted at link time, for hosts built with the `inventory`
/// feature.
///
/// ```rust,ignore
/// inventory::submit! {
///     ModuleRegistration::new("echo", || Arc::new(Echo::default()))
/// }
/// ```
#[cfg(feature = "inventory")]
pub struct ModuleRegistration {
    /// Name used in logs if the factory's module fails to load.
    pub name: &'static str,
    /// Builds a fresh module instance.
    pub factory: fn() -> Arc<dyn ScriptModule>,
}

#[cfg(feature = "inventory")]
impl ModuleRegistration {
    /// Create a registration.
    pub const fn new(name: &'static str, factory: fn() -> Arc<dyn ScriptModule>) -> Self {
        Self { name, factory }
    }
}

#[cfg(feature = "inventory")]
inventory::collect!(ModuleRegistration);

#[cfg(feature = "inventory")]
impl ModuleHost {
    /// Load every module submitted with `inventory::submit!`.
    ///
    /// Registrations whose module name is already loaded are skipped and
    /// logged. Returns how many modules were loaded.
    pub fn load_registered(&self) -> usize {
        let mut loaded = 0;
        for registration in inventory::iter::<ModuleRegistration> {
            match self.load((registration.factory)()) {
                Ok(()) => loaded += 1,
                Err(err) => tracing::warn!(
                    bus = self.bus.name(),
                    registration = registration.name,
                    error = %err,
                    "skipping registered module"
                ),
            }
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botbus_core::{Channel, MessageEvent};
    use botbus_std::testing::{CountingHandler, OrderProbe};
    use std::sync::{OnceLock, Weak};

    struct Echo {
        name: &'static str,
        handler: Arc<CountingHandler>,
    }

    impl Echo {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                handler: Arc::new(CountingHandler::new()),
            }
        }
    }

    impl ScriptModule for Echo {
        fn name(&self) -> &str {
            self.name
        }

        fn attach(&self, bus: &EventBus) {
            bus.register_message(self.handler.clone());
        }

        fn detach(&self, bus: &EventBus) {
            bus.unregister_message(&self.handler);
        }
    }

    #[test]
    fn load_attaches_and_unload_detaches() {
        let host = ModuleHost::new(Arc::new(EventBus::new()));
        let echo = Arc::new(Echo::new("echo.java"));

        host.load(echo.clone()).unwrap();
        assert!(host.is_loaded("echo.java"));
        assert_eq!(host.bus().message_handler_count(), 1);

        host.bus().dispatch_message(&MessageEvent::private("1", "text"));
        assert_eq!(echo.handler.count(), 1);

        host.unload("echo.java").unwrap();
        assert!(!host.is_loaded("echo.java"));
        assert_eq!(host.bus().message_handler_count(), 0);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let host = ModuleHost::new(Arc::new(EventBus::new()));
        host.load(Arc::new(Echo::new("echo"))).unwrap();

        let err = host.load(Arc::new(Echo::new("echo"))).unwrap_err();
        assert_eq!(err, ModuleError::AlreadyLoaded("echo".into()));
        assert_eq!(host.bus().message_handler_count(), 1);
        assert_eq!(host.loaded(), vec!["echo".to_string()]);
    }

    #[test]
    fn unloading_unknown_module_fails() {
        let host = ModuleHost::new(Arc::new(EventBus::new()));
        assert_eq!(
            host.unload("missing").unwrap_err(),
            ModuleError::NotLoaded("missing".into())
        );
    }

    struct Lifecycle {
        name: &'static str,
        probe: OrderProbe,
    }

    impl ScriptModule for Lifecycle {
        fn name(&self) -> &str {
            self.name
        }

        fn attach(&self, bus: &EventBus) {
            bus.register_load(Arc::new(self.probe.handler(self.name)));
            bus.register_unload(Arc::new(self.probe.handler(self.name)));
        }

        fn detach(&self, bus: &EventBus) {
            bus.clear(Channel::Load);
            bus.clear(Channel::Unload);
        }
    }

    #[test]
    fn start_and_shutdown_drive_lifecycle_events() {
        let probe = OrderProbe::new();
        let host = ModuleHost::new(Arc::new(EventBus::new()));
        host.load(Arc::new(Lifecycle {
            name: "a",
            probe: probe.clone(),
        }))
        .unwrap();
        host.load(Arc::new(Lifecycle {
            name: "b",
            probe: probe.clone(),
        }))
        .unwrap();

        host.start();
        assert_eq!(probe.order(), vec!["a", "b"]);

        host.shutdown();
        assert_eq!(probe.order(), vec!["a", "b", "a", "b"]);
        assert!(host.loaded().is_empty());
        assert_eq!(host.bus().total_handler_count(), 0);
    }

    struct HalfAttach {
        handler: Arc<CountingHandler>,
    }

    impl ScriptModule for HalfAttach {
        fn name(&self) -> &str {
            "half"
        }

        fn attach(&self, bus: &EventBus) {
            bus.register_load(self.handler.clone());
            panic!("config file missing");
        }

        fn detach(&self, bus: &EventBus) {
            bus.unregister_load(&self.handler);
        }
    }

    #[test]
    fn panicking_attach_is_rolled_back() {
        let host = ModuleHost::new(Arc::new(EventBus::new()));
        let broken = Arc::new(HalfAttach {
            handler: Arc::new(CountingHandler::new()),
        });

        let err = host.load(broken).unwrap_err();
        assert_eq!(
            err,
            ModuleError::AttachFailed {
                module: "half".into(),
                reason: "config file missing".into(),
            }
        );
        assert!(!host.is_loaded("half"));
        assert_eq!(host.bus().handler_count(Channel::Load), 0);

        host.start();
        assert!(host.loaded().is_empty());

        let fixed = Arc::new(Echo::new("half"));
        host.load(fixed.clone()).unwrap();
        assert_eq!(host.loaded(), vec!["half".to_string()]);
    }

    struct UnloadsItself {
        host: OnceLock<Weak<ModuleHost>>,
        unload_result: Mutex<Option<Result<(), ModuleError>>>,
        handler: Arc<CountingHandler>,
    }

    impl ScriptModule for UnloadsItself {
        fn name(&self) -> &str {
            "eager"
        }

        fn attach(&self, bus: &EventBus) {
            if let Some(host) = self.host.get().and_then(Weak::upgrade) {
                *self.unload_result.lock().unwrap() = Some(host.unload("eager"));
            }
            bus.register_message(self.handler.clone());
        }

        fn detach(&self, bus: &EventBus) {
            bus.unregister_message(&self.handler);
        }
    }

    #[test]
    fn attaching_module_cannot_be_unloaded() {
        let host = Arc::new(ModuleHost::new(Arc::new(EventBus::new())));
        let module = Arc::new(UnloadsItself {
            host: OnceLock::new(),
            unload_result: Mutex::new(None),
            handler: Arc::new(CountingHandler::new()),
        });
        let _ = module.host.set(Arc::downgrade(&host));

        host.load(module.clone()).unwrap();

        assert_eq!(
            *module.unload_result.lock().unwrap(),
            Some(Err(ModuleError::NotLoaded("eager".into())))
        );
        assert!(host.is_loaded("eager"));
        assert_eq!(host.bus().message_handler_count(), 1);

        host.unload("eager").unwrap();
        assert_eq!(host.bus().message_handler_count(), 0);
    }
}
