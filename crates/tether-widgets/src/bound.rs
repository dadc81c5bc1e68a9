#![forbid(unsafe_code)]

//! The shared core of every widget wrapper: native handle, observable,
//! forward signal and preserved listener set.
//!
//! Wrappers install their paths in a fixed order: any observable-side
//! listeners that must run before the display update (cyclic wrap), then
//! [`Bound::connect_forward`], then [`Bound::connect_reverse`].
//!
//! Native callbacks capture the native widget and the observable weakly, so
//! the toolkit's own reference to the native widget never keeps the binding
//! alive on its own.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tether_core::{BindResult, NativeWidget, Ownership};
use tether_runtime::reactive::{
    Observable, Preserved, Seeded, Subscription, bind_widget_via, install_teardown, with_blocked,
};

pub struct Bound<N: NativeWidget, T> {
    native: Rc<N>,
    observable: Observable<T>,
    preserved: Rc<RefCell<Preserved>>,
    signal: Option<N::Signal>,
    owns: bool,
}

impl<N, T> Bound<N, T>
where
    N: NativeWidget,
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    /// Take ownership of the seeded observable and, when owning, hook
    /// teardown onto the native widget's destroy signal.
    pub fn new(native: Rc<N>, seeded: Seeded<T>, ownership: Ownership) -> Self {
        let preserved = Rc::new(RefCell::new(Preserved::new()));
        let owns = ownership.resolve(seeded.owns);
        install_teardown(&*native, &preserved, owns);
        Self {
            native,
            observable: seeded.observable,
            preserved,
            signal: None,
            owns,
        }
    }

    /// Install the native → observable path.
    ///
    /// `forward` runs on every unblocked native change with live handles to
    /// the native widget and the observable, until the wrapper is dropped.
    pub fn connect_forward(
        &mut self,
        forward: impl Fn(&N, &Observable<T>) -> BindResult + 'static,
    ) -> N::Signal {
        let native = Rc::downgrade(&self.native);
        let target = self.observable.downgrade();
        // The wrapper is the only strong owner of the preserved set.
        let alive = Rc::downgrade(&self.preserved);
        let signal = self.native.connect_changed(Box::new(move || {
            if alive.strong_count() == 0 {
                return Ok(());
            }
            match (native.upgrade(), target.upgrade()) {
                (Some(native), Some(target)) => forward(&native, &target),
                _ => Ok(()),
            }
        }));
        self.signal = Some(signal.clone());
        signal
    }

    /// Install the observable → native path and preserve its handle.
    ///
    /// Reverse-only widgets have no forward handler; a no-op one is
    /// installed so the binding can still tell whether the widget is alive.
    pub fn connect_reverse(
        &mut self,
        get: impl Fn(&N) -> Option<T> + 'static,
        set: impl Fn(&N, &T) -> BindResult + 'static,
    ) {
        self.connect_reverse_via(get, T::clone, T::clone, set);
    }

    /// [`Bound::connect_reverse`] for displays compared in their own domain.
    ///
    /// `get` reads the raw display, `project` maps a value into display
    /// terms for the unchanged check and `restore` maps a display back for
    /// rollback.
    pub fn connect_reverse_via<D>(
        &mut self,
        get: impl Fn(&N) -> Option<D> + 'static,
        project: impl Fn(&T) -> D + 'static,
        restore: impl Fn(&D) -> T + 'static,
        set: impl Fn(&N, &T) -> BindResult + 'static,
    ) where
        D: PartialEq + fmt::Debug + 'static,
    {
        let signal = match &self.signal {
            Some(signal) => signal.clone(),
            None => {
                let signal = self.native.connect_changed(Box::new(|| Ok(())));
                self.signal = Some(signal.clone());
                signal
            }
        };
        let reader = Rc::downgrade(&self.native);
        let writer = Rc::downgrade(&self.native);
        let sub = bind_widget_via(
            move || reader.upgrade().and_then(|native| get(&native)),
            project,
            restore,
            move |value| match writer.upgrade() {
                Some(native) => set(&native, value),
                None => Ok(()),
            },
            signal,
            &self.observable,
        );
        self.hold(sub);
    }

    /// Keep an auxiliary listener alive with the binding.
    pub fn hold(&self, sub: Subscription) {
        self.preserved.borrow_mut().hold(sub);
    }

    /// Run `f` against the native widget with the forward signal blocked.
    ///
    /// Returns `None` without running `f` once the widget is destroyed.
    pub fn with_native_blocked<R>(&self, f: impl FnOnce(&N) -> R) -> Option<R> {
        match &self.signal {
            Some(signal) => with_blocked(signal, || f(&self.native)),
            None => Some(f(&self.native)),
        }
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        &self.native
    }

    #[must_use]
    pub fn observable(&self) -> &Observable<T> {
        &self.observable
    }

    #[must_use]
    pub fn signal(&self) -> Option<&N::Signal> {
        self.signal.as_ref()
    }

    #[must_use]
    pub fn owns(&self) -> bool {
        self.owns
    }

    #[must_use]
    pub fn preserved_len(&self) -> usize {
        self.preserved.borrow().len()
    }
}

impl<N: NativeWidget, T: fmt::Debug> fmt::Debug for Bound<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("observable", &self.observable)
            .field("owns", &self.owns)
            .field("preserved", &self.preserved.borrow().len())
            .finish_non_exhaustive()
    }
}
