#![forbid(unsafe_code)]

//! Observable value cell with synchronous change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Every write notifies all live listeners in
//! registration order before `set()` returns. With
//! [`NotifyPolicy::SkipEqual`] a write equal to the current value (by
//! `PartialEq`) is a no-op instead.
//!
//! Listeners come in two retention flavors:
//!
//! - **weak** ([`Observable::subscribe`]): the observable only keeps a
//!   `Weak`; the returned [`Subscription`] guard owns the callback. Dropping
//!   or disposing the guard silences the listener.
//! - **strong** ([`Observable::subscribe_strong`]): the observable owns the
//!   callback until [`Observable::unsubscribe`] is called.
//!
//! Listeners are fallible. The first listener error stops the pass and is
//! returned from `set()`.
//!
//! # Nested writes
//!
//! A listener may write to the observable it is listening to. The nested
//! write notifies every listener with the newer value before returning; the
//! outer pass then stops, so later listeners never see the stale value after
//! the fresh one.
//!
//! # Performance
//!
//! | Operation       | Complexity                  |
//! |-----------------|-----------------------------|
//! | `get()`         | O(1) + clone                |
//! | `set()`         | O(L) where L = listeners    |
//! | `subscribe()`   | O(1) amortized              |
//! | `unsubscribe()` | O(L)                        |
//!
//! # Failure Modes
//!
//! - **Listener error**: remaining listeners of that pass are skipped; the
//!   value stays written.
//! - **Subscriber leak**: guards stored indefinitely keep callbacks alive.
//!   Dead weak references are pruned lazily during notification.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tether_core::BindResult;
use tracing::{info, info_span};
use web_time::Instant;

type Listener<T> = dyn Fn(&T) -> BindResult;
type ListenerRc<T> = Rc<Listener<T>>;
type ListenerWeak<T> = Weak<Listener<T>>;

/// Whether writes equal to the current value notify listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Every write notifies (repeated button clicks, re-asserted values).
    #[default]
    Always,
    /// Writes equal to the current value are no-ops.
    SkipEqual,
}

/// Identifier of a registered listener, unique per observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

enum Slot<T> {
    Weak(ListenerWeak<T>),
    Strong(ListenerRc<T>),
}

struct Entry<T> {
    id: ListenerId,
    slot: Slot<T>,
}

impl<T> Entry<T> {
    fn is_live(&self) -> bool {
        match &self.slot {
            Slot::Weak(w) => w.strong_count() > 0,
            Slot::Strong(_) => true,
        }
    }

    fn downgrade(&self) -> ListenerWeak<T> {
        match &self.slot {
            Slot::Weak(w) => w.clone(),
            Slot::Strong(rc) => Rc::downgrade(rc),
        }
    }
}

/// Shared interior for [`Observable<T>`].
struct ObservableInner<T> {
    value: T,
    version: u64,
    policy: NotifyPolicy,
    next_id: u64,
    listeners: Vec<Entry<T>>,
    /// Subscriptions this observable holds on its sources (see [`Observable::map`]).
    upstream: Vec<Subscription>,
}

impl<T> ObservableInner<T> {
    fn register(&mut self, slot: Slot<T>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Entry { id, slot });
        id
    }

    fn remove(&mut self, id: ListenerId) -> Option<Entry<T>> {
        let pos = self.listeners.iter().position(|e| e.id == id)?;
        Some(self.listeners.remove(pos))
    }
}

/// A shared value cell with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** inner state;
/// both handles see the same value and share listeners.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each write that notifies.
/// 2. Listeners are notified in registration order.
/// 3. A disposed or dropped [`Subscription`] never fires again.
/// 4. Under [`NotifyPolicy::SkipEqual`], `set(v)` with `v == current` is a
///    no-op.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("policy", &inner.policy)
            .field("listener_count", &inner.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable that notifies on every write.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_policy(value, NotifyPolicy::Always)
    }

    /// Create an observable that ignores writes equal to the current value.
    #[must_use]
    pub fn new_distinct(value: T) -> Self {
        Self::with_policy(value, NotifyPolicy::SkipEqual)
    }

    #[must_use]
    pub fn with_policy(value: T, policy: NotifyPolicy) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                policy,
                next_id: 0,
                listeners: Vec::new(),
                upstream: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    #[must_use]
    pub fn policy(&self) -> NotifyPolicy {
        self.inner.borrow().policy
    }

    /// Write a new value and notify listeners.
    ///
    /// Returns the first listener error, if any. The value stays written
    /// even when a listener fails (listeners may roll it back themselves).
    /// Safe to call re-entrantly from within listener callbacks.
    pub fn set(&self, value: T) -> BindResult {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.policy == NotifyPolicy::SkipEqual && inner.value == value {
                return Ok(());
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify()
    }

    /// Modify the value in place via a closure, then notify as `set` would.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> BindResult {
        let next = {
            let inner = self.inner.borrow();
            let mut next = inner.value.clone();
            f(&mut next);
            next
        };
        self.set(next)
    }

    /// Subscribe with a weak registration.
    ///
    /// Returns a [`Subscription`] guard that owns the callback. Dropping the
    /// guard unsubscribes the callback (it will not be called after drop,
    /// though it may stay in the listener list until the next notification
    /// prunes it); [`Subscription::dispose`] removes it eagerly.
    pub fn subscribe(&self, callback: impl Fn(&T) -> BindResult + 'static) -> Subscription {
        let strong: ListenerRc<T> = Rc::new(callback);
        let id = self
            .inner
            .borrow_mut()
            .register(Slot::Weak(Rc::downgrade(&strong)));
        let owner = Rc::downgrade(&self.inner);
        Subscription {
            id,
            detach: Some(Box::new(move || {
                if let Some(inner) = owner.upgrade()
                    && let Ok(mut inner) = inner.try_borrow_mut()
                {
                    inner.remove(id);
                }
            })),
            // Wrap in a box that can be type-erased as `dyn Any`, since
            // `Rc<dyn Fn(&T)>` itself cannot coerce to `Rc<dyn Any>`.
            _guard: Box::new(strong),
        }
    }

    /// Weak subscription with an infallible callback.
    pub fn observe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.subscribe(move |value| {
            callback(value);
            Ok(())
        })
    }

    /// Subscribe with a strong registration: the observable keeps the
    /// callback alive until [`Self::unsubscribe`].
    pub fn subscribe_strong(&self, callback: impl Fn(&T) -> BindResult + 'static) -> ListenerId {
        let strong: ListenerRc<T> = Rc::new(callback);
        self.inner.borrow_mut().register(Slot::Strong(strong))
    }

    /// Remove a listener by id. Returns whether it was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = self.inner.borrow_mut().remove(id);
        // Drop the callback outside the borrow: its captures may touch us.
        removed.is_some()
    }

    /// Project this observable through `f` into a new observable that is
    /// updated on every write to `self`.
    ///
    /// The returned observable owns the forwarding subscription. Once every
    /// handle to it is dropped the listener on `self` is dead and the next
    /// write here prunes it.
    pub fn map<U: Clone + PartialEq + 'static>(
        &self,
        f: impl Fn(&T) -> U + 'static,
    ) -> Observable<U> {
        let target = Observable::new(self.with(&f));
        let weak_target = target.downgrade();
        let sub = self.subscribe(move |value| match weak_target.upgrade() {
            Some(target) => target.set(f(value)),
            None => Ok(()),
        });
        target.inner.borrow_mut().upstream.push(sub);
        target
    }

    /// A non-owning handle to this observable.
    #[must_use]
    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of writes that notified so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered listeners (including dead ones not yet pruned).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Notify live listeners and prune dead ones.
    fn notify(&self) -> BindResult {
        // Collect handles first so no borrow is held while listeners run.
        let (pending, version, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.retain(Entry::is_live);
            let pending: Vec<ListenerWeak<T>> =
                inner.listeners.iter().map(Entry::downgrade).collect();
            (pending, inner.version, inner.value.clone())
        };

        if pending.is_empty() {
            return Ok(());
        }

        let listeners = pending.len() as u64;
        let propagation_start = Instant::now();
        let _span = info_span!(
            "tether.notify",
            listeners,
            version,
            duration_us = tracing::field::Empty
        )
        .entered();

        let mut result = Ok(());
        for weak in &pending {
            // Upgrade at call time: an earlier listener may have disposed
            // this one during the pass.
            let Some(callback) = weak.upgrade() else {
                continue;
            };
            if let Err(err) = callback(&value) {
                result = Err(err);
                break;
            }
            if self.inner.borrow().version != version {
                // A nested write already delivered a newer value to everyone.
                break;
            }
        }

        let duration_us = propagation_start.elapsed().as_micros() as u64;
        tracing::Span::current().record("duration_us", duration_us);
        info!(
            tether_notify_duration_us = duration_us,
            listeners, version, "tether notify duration histogram"
        );
        result
    }
}

/// Non-owning handle to an [`Observable`].
pub struct WeakObservable<T> {
    inner: Weak<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakObservable<T> {
    /// Recover a strong handle if the cell is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Observable<T>> {
        self.inner.upgrade().map(|inner| Observable { inner })
    }
}

impl<T> fmt::Debug for WeakObservable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakObservable")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// RAII guard for a weakly registered listener.
///
/// Dropping the `Subscription` makes the associated callback unreachable
/// (the strong `Rc` is dropped, so the `Weak` in the observable's listener
/// list fails to upgrade). [`Subscription::dispose`] additionally removes
/// the entry right away.
pub struct Subscription {
    id: ListenerId,
    detach: Option<Box<dyn FnOnce()>>,
    /// Type-erased strong reference keeping the callback `Rc` alive.
    _guard: Box<dyn Any>,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unregister eagerly and release the callback.
    pub fn dispose(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tether_core::BindError;

    #[test]
    fn get_set_basic() {
        let obs = Observable::new(42);
        assert_eq!(obs.get(), 42);
        assert_eq!(obs.version(), 0);

        obs.set(99).unwrap();
        assert_eq!(obs.get(), 99);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn default_policy_notifies_equal_writes() {
        let obs = Observable::new(());
        let clicks = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&clicks);
        let _sub = obs.observe(move |_| c.set(c.get() + 1));

        obs.set(()).unwrap();
        obs.set(()).unwrap();
        assert_eq!(clicks.get(), 2);
        assert_eq!(obs.version(), 2);
    }

    #[test]
    fn distinct_policy_skips_equal_writes() {
        let obs = Observable::new_distinct(42);
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        let _sub = obs.observe(move |_| c.set(c.get() + 1));

        obs.set(42).unwrap();
        assert_eq!(obs.version(), 0);
        assert_eq!(count.get(), 0);

        obs.set(43).unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(obs.policy(), NotifyPolicy::SkipEqual);
    }

    #[test]
    fn with_access() {
        let obs = Observable::new(vec![1, 2, 3]);
        let sum = obs.with(|v| v.iter().sum::<i32>());
        assert_eq!(sum, 6);
    }

    #[test]
    fn update_mutates_and_notifies() {
        let obs = Observable::new(vec![1, 2, 3]);
        let last_len = Rc::new(Cell::new(0usize));
        let l = Rc::clone(&last_len);
        let _sub = obs.observe(move |v: &Vec<i32>| l.set(v.len()));

        obs.update(|v| v.push(4)).unwrap();
        assert_eq!(obs.get(), vec![1, 2, 3, 4]);
        assert_eq!(last_len.get(), 4);
    }

    #[test]
    fn subscriber_receives_new_value() {
        let obs = Observable::new(0);
        let last_seen = Rc::new(Cell::new(0));
        let last_clone = Rc::clone(&last_seen);
        let _sub = obs.observe(move |val| last_clone.set(*val));

        obs.set(42).unwrap();
        assert_eq!(last_seen.get(), 42);
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let sub = obs.observe(move |_| count_clone.set(count_clone.get() + 1));

        obs.set(1).unwrap();
        assert_eq!(count.get(), 1);

        drop(sub);
        obs.set(2).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dispose_removes_entry_eagerly() {
        let obs = Observable::new(0);
        let sub = obs.observe(|_| {});
        assert_eq!(obs.listener_count(), 1);
        sub.dispose();
        assert_eq!(obs.listener_count(), 0);
    }

    #[test]
    fn dropped_subscriptions_are_pruned_lazily() {
        let obs = Observable::new(0);
        let _s1 = obs.observe(|_| {});
        let s2 = obs.observe(|_| {});
        assert_eq!(obs.listener_count(), 2);

        drop(s2);
        assert_eq!(obs.listener_count(), 2);

        obs.set(1).unwrap();
        assert_eq!(obs.listener_count(), 1);
    }

    #[test]
    fn strong_listener_lives_until_unsubscribed() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        let id = obs.subscribe_strong(move |_| {
            c.set(c.get() + 1);
            Ok(())
        });

        obs.set(1).unwrap();
        assert_eq!(count.get(), 1);

        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        obs.set(2).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn notification_order_is_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let log1 = Rc::clone(&log);
        let _s1 = obs.observe(move |_| log1.borrow_mut().push('A'));
        let log2 = Rc::clone(&log);
        let _s2 = obs.subscribe_strong(move |_| {
            log2.borrow_mut().push('B');
            Ok(())
        });
        let log3 = Rc::clone(&log);
        let _s3 = obs.observe(move |_| log3.borrow_mut().push('C'));

        obs.set(1).unwrap();
        assert_eq!(*log.borrow(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn listener_error_stops_pass_and_is_returned() {
        let obs = Observable::new(0);
        let reached = Rc::new(Cell::new(false));
        let _s1 = obs.subscribe(|_| Err(BindError::setter("boom")));
        let r = Rc::clone(&reached);
        let _s2 = obs.observe(move |_| r.set(true));

        let err = obs.set(1).unwrap_err();
        assert_eq!(err, BindError::setter("boom"));
        assert!(!reached.get());
        assert_eq!(obs.get(), 1, "value stays written");
    }

    #[test]
    fn nested_write_supersedes_outer_pass() {
        let obs = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let weak = obs.downgrade();
        let _clamp = obs.subscribe(move |v| {
            if *v > 10 {
                weak.upgrade().map_or(Ok(()), |o| o.set(10))
            } else {
                Ok(())
            }
        });
        let s = Rc::clone(&seen);
        let _log = obs.observe(move |v| s.borrow_mut().push(*v));

        obs.set(50).unwrap();
        assert_eq!(obs.get(), 10);
        assert_eq!(*seen.borrow(), vec![10], "stale 50 never delivered");
    }

    #[test]
    fn listener_disposed_mid_pass_does_not_fire() {
        let obs = Observable::new(0);
        let fired = Rc::new(Cell::new(false));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let v = Rc::clone(&victim);
        let _killer = obs.observe(move |_| {
            if let Some(sub) = v.borrow_mut().take() {
                sub.dispose();
            }
        });
        let f = Rc::clone(&fired);
        *victim.borrow_mut() = Some(obs.observe(move |_| f.set(true)));

        obs.set(1).unwrap();
        assert!(!fired.get());
    }

    #[test]
    fn map_projects_every_write() {
        let celsius = Observable::new(100.0_f64);
        let fahrenheit = celsius.map(|c| c * 9.0 / 5.0 + 32.0);
        assert_eq!(fahrenheit.get(), 212.0);

        celsius.set(0.0).unwrap();
        assert_eq!(fahrenheit.get(), 32.0);
    }

    #[test]
    fn map_goes_inert_when_projection_dropped() {
        let source = Observable::new(1);
        let projected = source.map(|v| v * 2);
        drop(projected);
        assert!(source.set(5).is_ok());
    }

    #[test]
    fn dropped_projections_do_not_accumulate_listeners() {
        let source = Observable::new(0);
        for i in 0..50 {
            let projected = source.map(|v| v + 1);
            assert_eq!(projected.get(), i + 1);
            drop(projected);
            source.set(i + 1).unwrap();
        }
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn projection_keeps_one_listener_while_alive() {
        let source = Observable::new(1);
        let projected = source.map(|v| v * 10);
        source.set(2).unwrap();
        source.set(3).unwrap();
        assert_eq!(source.listener_count(), 1);
        assert_eq!(projected.get(), 30);

        drop(projected);
        source.set(4).unwrap();
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn weak_handle_upgrade() {
        let obs = Observable::new(1);
        let weak = obs.downgrade();
        assert!(weak.upgrade().is_some_and(|o| o.ptr_eq(&obs)));
        drop(obs);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn clone_shares_state_and_listeners() {
        let obs1 = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&count);
        let _sub = obs1.observe(move |_| c.set(c.get() + 1));

        let obs2 = obs1.clone();
        obs2.set(42).unwrap();
        assert_eq!(obs1.get(), 42);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn debug_format() {
        let obs = Observable::new(42);
        let dbg = format!("{obs:?}");
        assert!(dbg.contains("Observable"));
        assert!(dbg.contains("42"));
        assert!(dbg.contains("version"));
    }
}
