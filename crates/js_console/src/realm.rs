//! Execution contexts and the console realm switch.
//!
//! Console input runs against a dedicated global object so that variables it
//! declares accumulate there instead of on the page. Nothing else running on
//! the page may observe that global, so the switch is strictly bracketed:
//! [`RealmSwitch::with_console_realm`] installs the console context, hands it
//! to the action explicitly, and puts the previous context back on every exit
//! path, unwinding included.

/// The global object and `this` binding code is evaluated against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionContext<G> {
    /// Global object used for identifier resolution.
    pub global: G,
    /// Value of top-level `this`.
    pub this_value: G,
}

impl<G: Clone> ExecutionContext<G> {
    /// Context whose `this` is its own global object.
    pub fn for_global(global: G) -> Self {
        Self {
            this_value: global.clone(),
            global,
        }
    }
}

/// Tracks the active execution context and swaps in the console one on demand.
#[derive(Debug)]
pub struct RealmSwitch<G> {
    active: ExecutionContext<G>,
    console: ExecutionContext<G>,
}

impl<G: Clone> RealmSwitch<G> {
    /// Create a switch whose active context is `page`.
    pub fn new(page: ExecutionContext<G>, console_global: G) -> Self {
        Self {
            active: page,
            console: ExecutionContext::for_global(console_global),
        }
    }

    /// The context everything outside a console evaluation sees.
    pub fn active(&self) -> &ExecutionContext<G> {
        &self.active
    }

    /// The dedicated console context.
    pub fn console(&self) -> &ExecutionContext<G> {
        &self.console
    }

    /// Run `action` with the console context installed.
    pub fn with_console_realm<R>(&mut self, action: impl FnOnce(&ExecutionContext<G>) -> R) -> R {
        let console = self.console.clone();
        let guard = ActiveContextGuard::install(&mut self.active, console);
        let result = action(guard.context());
        drop(guard);
        result
    }
}

/// Restores the captured context when dropped.
struct ActiveContextGuard<'a, G> {
    slot: &'a mut ExecutionContext<G>,
    saved: Option<ExecutionContext<G>>,
}

impl<'a, G> ActiveContextGuard<'a, G> {
    fn install(slot: &'a mut ExecutionContext<G>, context: ExecutionContext<G>) -> Self {
        let saved = std::mem::replace(slot, context);
        tracing::trace!("Entered console realm");
        Self {
            slot,
            saved: Some(saved),
        }
    }

    fn context(&self) -> &ExecutionContext<G> {
        &*self.slot
    }
}

impl<G> Drop for ActiveContextGuard<'_, G> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.slot = saved;
            tracing::trace!("Restored page realm");
        }
    }
}
