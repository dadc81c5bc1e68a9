#![forbid(unsafe_code)]

//! Recursion guard for native signal subscriptions.
//!
//! The forward path (native change → observable write) and the reverse
//! path (observable write → native display) would otherwise chase each
//! other: writing the display fires the native change signal, which writes
//! the observable, which writes the display again.
//!
//! [`SignalBlock`] suspends the forward subscription for the duration of a
//! reverse write. It is an RAII guard, so the subscription is resumed on
//! every exit path: normal return, `?` early return, or unwinding.
//!
//! # Invariants
//!
//! 1. A guard is only created for a connected subscription; a disconnected
//!    one (destroyed widget) yields `None` and nothing is blocked.
//! 2. Every successful `acquire` is matched by exactly one `unblock`.
//! 3. Guards nest: an inner guard on the same signal leaves it blocked until
//!    the outer guard drops.

use tether_core::SignalControl;

/// Scoped block of a native signal subscription.
#[must_use = "the signal is unblocked as soon as the guard drops"]
pub struct SignalBlock<'a, S: SignalControl + ?Sized> {
    signal: &'a S,
}

impl<'a, S: SignalControl + ?Sized> SignalBlock<'a, S> {
    /// Block `signal` if it is still connected.
    ///
    /// Returns `None` for a disconnected subscription; callers treat that as
    /// "widget gone, skip the write".
    pub fn acquire(signal: &'a S) -> Option<Self> {
        if !signal.is_connected() {
            return None;
        }
        signal.block();
        Some(Self { signal })
    }
}

impl<S: SignalControl + ?Sized> Drop for SignalBlock<'_, S> {
    fn drop(&mut self) {
        self.signal.unblock();
    }
}

impl<S: SignalControl + ?Sized> std::fmt::Debug for SignalBlock<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBlock").finish_non_exhaustive()
    }
}

/// Run `f` with `signal` blocked. Returns `None` without running `f` if the
/// signal is disconnected.
pub fn with_blocked<S, R>(signal: &S, f: impl FnOnce() -> R) -> Option<R>
where
    S: SignalControl + ?Sized,
{
    let _block = SignalBlock::acquire(signal)?;
    Some(f())
}
