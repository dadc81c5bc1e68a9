#![forbid(unsafe_code)]

//! Lifetime management for a widget's auxiliary listeners.
//!
//! Reverse-sync listeners are weakly registered on their observable, so
//! something has to hold their [`Subscription`] handles for as long as the
//! widget should stay bound. [`Preserved`] is that holder. When the binding
//! owns its listeners, [`install_teardown`] hooks the native widget's
//! destroy notification so the preserved set is released with the widget.
//!
//! A borrowed binding (caller-supplied observable, [`Ownership::Borrow`])
//! leaves teardown to the caller; the observable itself is never
//! deallocated here, only the listener handles are dropped.
//!
//! [`Ownership::Borrow`]: tether_core::Ownership::Borrow

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tether_core::NativeWidget;
use tracing::debug;

use super::observable::Subscription;

/// Ordered set of listener handles kept alive for one widget.
///
/// # Invariants
///
/// 1. Handles are released in registration order by [`Preserved::clear`].
/// 2. After `clear()` none of the held listeners fire again.
/// 3. `len()` is always the number of handles currently held.
#[derive(Default)]
pub struct Preserved {
    subscriptions: Vec<Subscription>,
}

impl Preserved {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive until [`Self::clear`] or drop.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Dispose every held handle, oldest first. Returns how many were
    /// released.
    pub fn clear(&mut self) -> usize {
        let released = self.subscriptions.len();
        for sub in self.subscriptions.drain(..) {
            sub.dispose();
        }
        released
    }
}

impl std::fmt::Debug for Preserved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preserved")
            .field("held", &self.subscriptions.len())
            .finish()
    }
}

/// Register teardown of `preserved` on the native widget's destroy signal
/// when `own` is true. Returns whether a handler was installed.
///
/// The handler holds the preserved set weakly; if the widget wrapper is
/// gone before the native widget, there is nothing left to release.
pub fn install_teardown<N: NativeWidget + ?Sized>(
    native: &N,
    preserved: &Rc<RefCell<Preserved>>,
    own: bool,
) -> bool {
    if !own {
        return false;
    }
    let weak: Weak<RefCell<Preserved>> = Rc::downgrade(preserved);
    native.connect_destroy(Box::new(move || {
        let Some(preserved) = weak.upgrade() else {
            return;
        };
        // Take the handles out first: disposing may run arbitrary drops.
        let mut taken = std::mem::take(&mut *preserved.borrow_mut());
        let released = taken.clear();
        debug!(event = "tether.teardown", released, "released owned binding");
    }));
    true
}
