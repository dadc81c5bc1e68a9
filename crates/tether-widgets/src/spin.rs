#![forbid(unsafe_code)]

//! Cyclic spin button: a spin button that wraps around its range and
//! reports each wrap on a carry observable.
//!
//! The native control is configured one step wider than the range on each
//! side, so the increment arrow at `last` produces `last + step`. That
//! out-of-range value reaches the observable and is immediately rewritten:
//!
//! ```text
//! value > last  →  value = first, then carry = true
//! value < first →  value = last,  then carry = false
//! ```
//!
//! The wrap listener is registered ahead of the reverse-sync listener, and
//! its nested write supersedes the outer notification, so the native
//! control only ever displays the wrapped value.
//!
//! Chaining counters (seconds into minutes, say) is done by sharing one
//! widget's carry observable with a listener that steps the next one.

use std::cell::Cell;
use std::rc::Rc;

use tether_core::{BindNumber, BindResult, NativeWidget, RangedNative, StepRange};
use tether_runtime::reactive::{Observable, Seed};

use crate::bound::Bound;
use crate::ranged::range_violation;
use crate::{WidgetKind, WidgetOptions, delegate_input_widget};

pub struct CyclicSpinButton<T: BindNumber, N: RangedNative> {
    kind: WidgetKind,
    bound: Bound<N, T>,
    range: Rc<Cell<StepRange<T>>>,
    carry: Observable<bool>,
}

impl<T: BindNumber, N: RangedNative> CyclicSpinButton<T, N> {
    /// Bind a cyclic spin button. `carry` may be shared with other
    /// widgets; a fresh one is created when `None`.
    pub fn bind(
        native: Rc<N>,
        range: StepRange<T>,
        seed: Seed<T>,
        carry: Option<Observable<bool>>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        let carry = carry.unwrap_or_else(|| Observable::new(false));
        let seeded = seed.policy(opts.policy()).resolve(|| range.first())?;
        let initial = range.snap(seeded.value);
        if initial != seeded.value {
            seeded.observable.set(initial)?;
        }
        native.set_bounds(range.native_bounds().widened());
        native.set_display(initial.to_f64())?;

        let mut bound = Bound::new(native, seeded, opts.resolved_ownership());
        let range = Rc::new(Cell::new(range));

        let wrap_range = Rc::clone(&range);
        let wrap_target = bound.observable().downgrade();
        let wrap_carry = carry.clone();
        let wrap = bound.observable().subscribe(move |value| {
            let range = wrap_range.get();
            let (wrapped, carried) = if *value > range.last() {
                (range.first(), true)
            } else if *value < range.first() {
                (range.last(), false)
            } else {
                return Ok(());
            };
            if let Some(target) = wrap_target.upgrade() {
                target.set(wrapped)?;
            }
            wrap_carry.set(carried)
        });
        bound.hold(wrap);

        bound.connect_forward(|native, obs| obs.set(T::from_f64(native.display())));
        let check = Rc::clone(&range);
        bound.connect_reverse_via(
            |native| Some(native.display()),
            |value: &T| value.to_f64(),
            |shown: &f64| T::from_f64(*shown),
            move |native, value| {
                let range = check.get();
                if !range.spans(*value) {
                    return Err(range_violation(*value, &range));
                }
                native.set_display(value.to_f64())
            },
        );
        Ok(Self {
            kind: WidgetKind::CyclicSpinButton,
            bound,
            range,
            carry,
        })
    }

    /// Observable receiving `true` on overflow and `false` on underflow.
    #[must_use]
    pub fn carry(&self) -> &Observable<bool> {
        &self.carry
    }

    #[must_use]
    pub fn range(&self) -> StepRange<T> {
        self.range.get()
    }

    /// Replace the range, keeping the current value.
    pub fn set_range(&self, range: StepRange<T>) -> BindResult {
        let value = self.bound.observable().get();
        if !range.spans(value) {
            return Err(range_violation(value, &range));
        }
        self.range.set(range);
        self.bound
            .with_native_blocked(|native| native.set_bounds(range.native_bounds().widened()));
        Ok(())
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        self.bound.native()
    }
}

delegate_input_widget!(CyclicSpinButton<T, N> where [T: BindNumber, N: RangedNative], T, bound);
