#![forbid(unsafe_code)]

//! Reverse synchronization from an [`Observable`] into a native widget.
//!
//! A widget binding has two directions:
//!
//! - **forward**: the native "value changed" signal writes the observable.
//!   The widget wrapper installs it and hands its signal handle here.
//! - **reverse**: [`bind_widget`] listens to the observable and writes the
//!   native display, with the forward signal blocked so the write never
//!   loops back.
//!
//! # Usage
//!
//! ```ignore
//! let signal = native.connect_changed(forward_handler);
//! let reverse = bind_widget(
//!     move || Some(read_display()),
//!     move |v| write_display(v),
//!     signal,
//!     &observable,
//! );
//! preserved.hold(reverse);
//! ```
//!
//! # Invariants
//!
//! 1. At most one native write per observable change.
//! 2. The forward signal is blocked for the whole reverse write, so the
//!    forward path never fires as a side effect.
//! 3. If the display already shows the new value, the setter is not called.
//! 4. A setter failure rolls the observable back to the value the display
//!    showed before the write, then returns the setter's error once the
//!    signal is unblocked again.
//! 5. A disconnected forward signal (destroyed widget) skips the write
//!    silently.
//!
//! # Failure Modes
//!
//! - Rollback itself fails (another listener rejects the old value): the
//!   rollback error is logged and the original setter error is returned.

use std::fmt::Debug;

use tether_core::{BindResult, SignalControl};
use tracing::{trace, warn};

use super::guard::SignalBlock;
use super::observable::{Observable, Subscription};

/// Install the reverse (observable → widget) listener.
///
/// - `get` reads the value the widget currently displays, already coerced
///   to `T`; `None` means the native widget no longer exists.
/// - `set` writes a value into the widget.
/// - `signal` is the handle of the already-installed forward subscription.
///
/// The listener is weakly registered: the returned [`Subscription`] must be
/// kept (normally in the widget's preserved set) for the binding to stay
/// active.
pub fn bind_widget<T, S>(
    get: impl Fn() -> Option<T> + 'static,
    set: impl Fn(&T) -> BindResult + 'static,
    signal: S,
    observable: &Observable<T>,
) -> Subscription
where
    T: Clone + PartialEq + Debug + 'static,
    S: SignalControl + 'static,
{
    bind_widget_via(get, T::clone, T::clone, set, signal, observable)
}

/// [`bind_widget`] for widgets whose display lives in a different domain
/// than the observable.
///
/// `get` reads the raw display `D`. The unchanged check compares it against
/// `project(value)`, so a display that merely coerces to the same `T` is
/// still rewritten. Rollback writes `restore(display)`.
pub fn bind_widget_via<T, D, S>(
    get: impl Fn() -> Option<D> + 'static,
    project: impl Fn(&T) -> D + 'static,
    restore: impl Fn(&D) -> T + 'static,
    set: impl Fn(&T) -> BindResult + 'static,
    signal: S,
    observable: &Observable<T>,
) -> Subscription
where
    T: Clone + PartialEq + Debug + 'static,
    D: PartialEq + Debug + 'static,
    S: SignalControl + 'static,
{
    let rollback = observable.downgrade();
    observable.subscribe(move |value| {
        let Some(_block) = SignalBlock::acquire(&signal) else {
            trace!(event = "tether.reverse", outcome = "stale_widget", "reverse sync skipped");
            return Ok(());
        };
        let Some(shown) = get() else {
            trace!(event = "tether.reverse", outcome = "native_dropped", "reverse sync skipped");
            return Ok(());
        };
        if shown == project(value) {
            trace!(event = "tether.reverse", outcome = "unchanged", "reverse sync short-circuit");
            return Ok(());
        }
        if let Err(err) = set(value) {
            let current = restore(&shown);
            warn!(
                event = "tether.rollback",
                error = %err,
                rejected = ?value,
                restored = ?current,
                "widget rejected value; rolling observable back"
            );
            if let Some(observable) = rollback.upgrade()
                && let Err(nested) = observable.set(current)
            {
                warn!(event = "tether.rollback", error = %nested, "rollback write failed");
            }
            return Err(err);
        }
        Ok(())
    })
}
