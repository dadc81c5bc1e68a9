#![forbid(unsafe_code)]

//! Headless native-widget simulator for testing Tether bindings.
//!
//! [`SimWidget<D>`] implements the full capability contract from
//! `tether_core::toolkit` without a real toolkit behind it:
//!
//! - [`SimWidget::user_input`] plays the role of a user typing, dragging or
//!   clicking: the display changes and every unblocked change handler runs.
//! - [`SimWidget::destroy`] tears the widget down: signals disconnect and
//!   destroy handlers run once.
//! - [`SimWidget::fail_next_set`] / [`SimWidget::reject_sets`] inject setter
//!   failures.
//! - [`SimWidget::set_calls`] and [`SimWidget::emissions`] count native
//!   writes and forward handler invocations.
//!
//! `SimWidget<f64>` additionally implements [`RangedNative`] (display values
//! are clamped into the bounds) and `SimWidget<Option<usize>>` implements
//! [`ChoiceNative`] (an index past the option list is rejected).
//!
//! Like a real toolkit, a programmatic `set_display` only emits the change
//! signal when the displayed value actually changes, while `user_input`
//! always emits.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tether_core::{
    BindError, BindResult, ChangeHandler, ChoiceNative, DestroyHandler, NativeBounds,
    NativeWidget, RangedNative, SignalControl,
};
use tracing::trace;

#[derive(Debug)]
struct SignalState {
    connected: Cell<bool>,
    blocked: Cell<u32>,
}

/// Handle to a change-handler installed on a [`SimWidget`].
#[derive(Clone)]
pub struct SimSignal {
    state: Rc<SignalState>,
}

impl SimSignal {
    /// Current block nesting depth.
    #[must_use]
    pub fn block_depth(&self) -> u32 {
        self.state.blocked.get()
    }

    fn is_live(&self) -> bool {
        self.state.connected.get() && self.state.blocked.get() == 0
    }
}

impl SignalControl for SimSignal {
    fn is_connected(&self) -> bool {
        self.state.connected.get()
    }

    fn block(&self) {
        self.state.blocked.set(self.state.blocked.get() + 1);
    }

    fn unblock(&self) {
        self.state
            .blocked
            .set(self.state.blocked.get().saturating_sub(1));
    }
}

impl fmt::Debug for SimSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimSignal")
            .field("connected", &self.state.connected.get())
            .field("blocked", &self.state.blocked.get())
            .finish()
    }
}

type Admit<D> = fn(&SimWidget<D>, D) -> BindResult<D>;

/// A simulated native widget displaying a `D`.
pub struct SimWidget<D> {
    display: RefCell<D>,
    admit: Admit<D>,
    handlers: RefCell<Vec<(SimSignal, Rc<dyn Fn() -> BindResult>)>>,
    destroy_handlers: RefCell<Vec<DestroyHandler>>,
    destroyed: Cell<bool>,
    fail_next: RefCell<Option<String>>,
    reject_all: RefCell<Option<String>>,
    set_calls: Cell<usize>,
    emissions: Cell<usize>,
    last_error: RefCell<Option<BindError>>,
    bounds: Cell<NativeBounds>,
    options: RefCell<Vec<String>>,
}

impl<D: Clone + PartialEq + fmt::Debug + 'static> SimWidget<D> {
    /// A widget accepting any display value.
    #[must_use]
    pub fn new(initial: D) -> Rc<Self> {
        Rc::new(Self::build(initial, |_, value| Ok(value)))
    }

    fn build(initial: D, admit: Admit<D>) -> Self {
        Self {
            display: RefCell::new(initial),
            admit,
            handlers: RefCell::new(Vec::new()),
            destroy_handlers: RefCell::new(Vec::new()),
            destroyed: Cell::new(false),
            fail_next: RefCell::new(None),
            reject_all: RefCell::new(None),
            set_calls: Cell::new(0),
            emissions: Cell::new(0),
            last_error: RefCell::new(None),
            bounds: Cell::new(NativeBounds::new(f64::MIN, f64::MAX, 1.0)),
            options: RefCell::new(Vec::new()),
        }
    }

    /// Simulate user interaction: change the display and fire the change
    /// signal. Returns the first handler error. A destroyed widget ignores
    /// input.
    pub fn user_input(&self, value: D) -> BindResult {
        if self.destroyed.get() {
            return Ok(());
        }
        let value = (self.admit)(self, value)?;
        *self.display.borrow_mut() = value;
        self.emit()
    }

    /// Make the next `set_display` call fail with `message`.
    pub fn fail_next_set(&self, message: impl Into<String>) {
        *self.fail_next.borrow_mut() = Some(message.into());
    }

    /// Make every `set_display` call fail until called with `None`.
    pub fn reject_sets(&self, message: Option<&str>) {
        *self.reject_all.borrow_mut() = message.map(str::to_owned);
    }

    /// Tear the widget down: disconnect every signal, then run the destroy
    /// handlers once. Later calls do nothing.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        let handlers = std::mem::take(&mut *self.handlers.borrow_mut());
        for (signal, _) in &handlers {
            signal.state.connected.set(false);
        }
        drop(handlers);
        let destroy = std::mem::take(&mut *self.destroy_handlers.borrow_mut());
        trace!(event = "tether.sim", handlers = destroy.len(), "widget destroyed");
        for handler in destroy {
            handler();
        }
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Number of `set_display` calls (successful or not).
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.set_calls.get()
    }

    /// Number of change-handler invocations.
    #[must_use]
    pub fn emissions(&self) -> usize {
        self.emissions.get()
    }

    /// Number of installed change handlers still connected.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Error from the last emission that had no caller to return it to
    /// (bounds or option-list changes).
    pub fn take_error(&self) -> Option<BindError> {
        self.last_error.borrow_mut().take()
    }

    fn emit(&self) -> BindResult {
        // Snapshot so handlers may reconnect or destroy while running.
        let live: Vec<_> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(signal, _)| signal.is_live())
            .map(|(signal, handler)| (signal.clone(), Rc::clone(handler)))
            .collect();
        trace!(event = "tether.sim", handlers = live.len(), "change signal");
        for (signal, handler) in live {
            if !signal.is_live() {
                continue;
            }
            self.emissions.set(self.emissions.get() + 1);
            handler()?;
        }
        Ok(())
    }

    fn emit_detached(&self) {
        if let Err(err) = self.emit() {
            *self.last_error.borrow_mut() = Some(err);
        }
    }

    /// Replace the display without going through the setter, emitting if it
    /// changed.
    fn replace_display(&self, value: D) {
        let changed = *self.display.borrow() != value;
        if changed {
            *self.display.borrow_mut() = value;
            self.emit_detached();
        }
    }
}

impl<D: Clone + PartialEq + fmt::Debug + 'static> NativeWidget for SimWidget<D> {
    type Display = D;
    type Signal = SimSignal;

    fn display(&self) -> D {
        self.display.borrow().clone()
    }

    fn set_display(&self, value: D) -> BindResult {
        self.set_calls.set(self.set_calls.get() + 1);
        if let Some(message) = self.fail_next.borrow_mut().take() {
            return Err(BindError::setter(message));
        }
        if let Some(message) = self.reject_all.borrow().as_deref() {
            return Err(BindError::setter(message));
        }
        let value = (self.admit)(self, value)?;
        if *self.display.borrow() == value {
            return Ok(());
        }
        *self.display.borrow_mut() = value;
        self.emit()
    }

    fn connect_changed(&self, handler: ChangeHandler) -> SimSignal {
        let signal = SimSignal {
            state: Rc::new(SignalState {
                connected: Cell::new(!self.destroyed.get()),
                blocked: Cell::new(0),
            }),
        };
        if !self.destroyed.get() {
            self.handlers
                .borrow_mut()
                .push((signal.clone(), Rc::from(handler)));
        }
        signal
    }

    fn connect_destroy(&self, handler: DestroyHandler) {
        if self.destroyed.get() {
            handler();
            return;
        }
        self.destroy_handlers.borrow_mut().push(handler);
    }
}

impl SimWidget<f64> {
    /// A ranged control showing `initial` (clamped) within `bounds`.
    #[must_use]
    pub fn ranged(bounds: NativeBounds, initial: f64) -> Rc<Self> {
        let sim = Self::build(bounds.clamp(initial), Self::clamp_to_bounds);
        sim.bounds.set(bounds);
        Rc::new(sim)
    }

    /// Simulate the user pressing the increment arrow once.
    pub fn increment(&self) -> BindResult {
        self.user_input(self.display() + self.bounds.get().step)
    }

    /// Simulate the user pressing the decrement arrow once.
    pub fn decrement(&self) -> BindResult {
        self.user_input(self.display() - self.bounds.get().step)
    }

    fn clamp_to_bounds(&self, value: f64) -> BindResult<f64> {
        Ok(self.bounds.get().clamp(value))
    }
}

impl RangedNative for SimWidget<f64> {
    fn bounds(&self) -> NativeBounds {
        self.bounds.get()
    }

    fn set_bounds(&self, bounds: NativeBounds) {
        self.bounds.set(bounds);
        let clamped = bounds.clamp(self.display());
        self.replace_display(clamped);
    }
}

impl SimWidget<Option<usize>> {
    /// An empty option list with nothing selected.
    #[must_use]
    pub fn choice() -> Rc<Self> {
        Rc::new(Self::build(None, Self::check_index))
    }

    /// Labels currently in the option list.
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        self.options.borrow().clone()
    }

    /// Label of the active option, if any.
    #[must_use]
    pub fn active_label(&self) -> Option<String> {
        let index = self.display()?;
        self.options.borrow().get(index).cloned()
    }

    fn check_index(&self, value: Option<usize>) -> BindResult<Option<usize>> {
        match value {
            Some(index) if index >= self.options.borrow().len() => Err(BindError::setter(
                format!("option index {index} out of bounds"),
            )),
            other => Ok(other),
        }
    }
}

impl ChoiceNative for SimWidget<Option<usize>> {
    fn append_option(&self, label: &str) {
        self.options.borrow_mut().push(label.to_owned());
    }

    fn clear_options(&self) {
        self.options.borrow_mut().clear();
        self.replace_display(None);
    }

    fn option_count(&self) -> usize {
        self.options.borrow().len()
    }
}

impl<D: fmt::Debug> fmt::Debug for SimWidget<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimWidget")
            .field("display", &self.display.borrow())
            .field("destroyed", &self.destroyed.get())
            .field("set_calls", &self.set_calls.get())
            .field("emissions", &self.emissions.get())
            .finish_non_exhaustive()
    }
}
