#![forbid(unsafe_code)]

//! Sliders and spin buttons: a numeric observable on a stepped range.
//!
//! The native control works in `f64`; the observable holds any
//! [`BindNumber`]. User input is rounded to `T` on the way in. Values
//! written to the observable must lie within the range span; anything else
//! is rejected by the reverse setter and rolled back.
//!
//! The range can be replaced later with [`Ranged::set_range`] or
//! [`Ranged::set_range_and_value`]. Both are all-or-nothing: a current (or
//! requested) value outside the new span fails with
//! [`BindError::RangeViolation`] and nothing changes.

use std::cell::Cell;
use std::rc::Rc;

use tether_core::{BindError, BindNumber, BindResult, NativeWidget, RangedNative, StepRange};
use tether_runtime::reactive::Seed;

use crate::bound::Bound;
use crate::{WidgetKind, WidgetOptions, delegate_input_widget};

/// A numeric widget over a [`StepRange`].
pub struct Ranged<T: BindNumber, N: RangedNative> {
    kind: WidgetKind,
    bound: Bound<N, T>,
    range: Rc<Cell<StepRange<T>>>,
}

/// A draggable numeric control.
pub type Slider<T, N> = Ranged<T, N>;

/// A numeric entry with increment/decrement arrows.
pub type SpinButton<T, N> = Ranged<T, N>;

impl<T: BindNumber, N: RangedNative> Ranged<T, N> {
    /// Bind a slider.
    pub fn slider(
        native: Rc<N>,
        range: StepRange<T>,
        seed: Seed<T>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        Self::bind(WidgetKind::Slider, native, range, seed, opts)
    }

    /// Bind a spin button.
    pub fn spin_button(
        native: Rc<N>,
        range: StepRange<T>,
        seed: Seed<T>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        Self::bind(WidgetKind::SpinButton, native, range, seed, opts)
    }

    fn bind(
        kind: WidgetKind,
        native: Rc<N>,
        range: StepRange<T>,
        seed: Seed<T>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        let seeded = seed.policy(opts.policy()).resolve(|| range.first())?;
        let initial = range.snap(seeded.value);
        if initial != seeded.value {
            seeded.observable.set(initial)?;
        }
        native.set_bounds(range.native_bounds());
        native.set_display(initial.to_f64())?;

        let mut bound = Bound::new(native, seeded, opts.resolved_ownership());
        let range = Rc::new(Cell::new(range));
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
        Ok(Self { kind, bound, range })
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
        self.apply_range(range);
        Ok(())
    }

    /// Replace the range and the value together.
    pub fn set_range_and_value(&self, range: StepRange<T>, value: T) -> BindResult {
        if !range.spans(value) {
            return Err(range_violation(value, &range));
        }
        self.apply_range(range);
        self.bound.observable().set(value)
    }

    fn apply_range(&self, range: StepRange<T>) {
        self.range.set(range);
        self.bound
            .with_native_blocked(|native| native.set_bounds(range.native_bounds()));
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        self.bound.native()
    }
}

pub(crate) fn range_violation<T: BindNumber>(value: T, range: &StepRange<T>) -> BindError {
    BindError::RangeViolation {
        value: value.to_string(),
        range: range.to_string(),
    }
}

delegate_input_widget!(Ranged<T, N> where [T: BindNumber, N: RangedNative], T, bound);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputWidget;
    use tether_core::NativeBounds;
    use tether_harness::SimWidget;
    use tether_runtime::reactive::Observable;

    fn sim() -> Rc<SimWidget<f64>> {
        SimWidget::ranged(NativeBounds::new(0.0, 100.0, 1.0), 0.0)
    }

    fn range(start: i32, step: i32, stop: i32) -> StepRange<i32> {
        StepRange::new(start, step, stop).unwrap()
    }

    #[test]
    fn construction_syncs_display_and_bounds() {
        let native = sim();
        let slider = Slider::slider(
            Rc::clone(&native),
            range(0, 5, 50),
            Seed::new().value(20),
            &WidgetOptions::new(),
        )
        .unwrap();
        assert_eq!(slider.kind(), WidgetKind::Slider);
        assert_eq!(native.display(), 20.0);
        assert_eq!(native.bounds(), NativeBounds::new(0.0, 50.0, 5.0));
        assert_eq!(slider.value(), 20);
        assert!(slider.owns_observable());
        assert_eq!(slider.preserved_len(), 1);
    }

    #[test]
    fn off_grid_initial_value_is_snapped() {
        let native = sim();
        let obs = Observable::new(7);
        let spin = SpinButton::spin_button(
            Rc::clone(&native),
            range(0, 2, 10),
            Seed::new().observable(obs.clone()),
            &WidgetOptions::new(),
        )
        .unwrap();
        assert_eq!(obs.get(), 8);
        assert_eq!(native.display(), 8.0);
        assert!(!spin.owns_observable());
    }

    #[test]
    fn default_value_is_range_start() {
        let slider = Slider::<u8, _>::slider(
            sim(),
            StepRange::new(3, 1, 9).unwrap(),
            Seed::new(),
            &WidgetOptions::new(),
        )
        .unwrap();
        assert_eq!(slider.value(), 3);
    }

    #[test]
    fn native_input_is_rounded() {
        let native = sim();
        let slider = Slider::slider(
            Rc::clone(&native),
            range(0, 1, 10),
            Seed::new(),
            &WidgetOptions::new(),
        )
        .unwrap();
        native.user_input(2.5).unwrap();
        assert_eq!(slider.value(), 2);
        native.user_input(3.5).unwrap();
        assert_eq!(slider.value(), 4);
    }

    #[test]
    fn fractional_input_is_redrawn_on_the_stored_value() {
        let native = sim();
        let slider = Slider::slider(
            Rc::clone(&native),
            range(0, 1, 10),
            Seed::new(),
            &WidgetOptions::new(),
        )
        .unwrap();
        native.user_input(2.4).unwrap();
        assert_eq!(slider.value(), 2);
        assert_eq!(native.display(), f64::from(slider.value()));
    }

    #[test]
    fn nan_seed_lands_on_range_start() {
        let native = sim();
        let slider = Slider::slider(
            Rc::clone(&native),
            StepRange::new(-1.0, 0.5, 2.0).unwrap(),
            Seed::new().value(f64::NAN),
            &WidgetOptions::new(),
        )
        .unwrap();
        assert_eq!(slider.value(), -1.0);
        assert_eq!(native.display(), -1.0);
    }

    #[test]
    fn out_of_span_write_is_rolled_back() {
        let native = sim();
        let slider = Slider::slider(
            Rc::clone(&native),
            range(0, 1, 10),
            Seed::new().value(4),
            &WidgetOptions::new(),
        )
        .unwrap();
        let err = slider.set_value(11).unwrap_err();
        assert!(matches!(err, BindError::RangeViolation { .. }));
        assert_eq!(slider.value(), 4);
        assert_eq!(native.display(), 4.0);
    }

    #[test]
    fn set_range_rejects_value_outside_span() {
        let native = sim();
        let slider = Slider::slider(
            Rc::clone(&native),
            range(0, 1, 10),
            Seed::new().value(8),
            &WidgetOptions::new(),
        )
        .unwrap();
        let err = slider.set_range(range(0, 1, 5)).unwrap_err();
        assert_eq!(
            err,
            BindError::RangeViolation {
                value: "8".into(),
                range: "0:5".into()
            }
        );
        assert_eq!(err.to_string(), "value 8 not within the span of range 0:5");
        assert_eq!(slider.range(), range(0, 1, 10));
        assert_eq!(native.bounds(), NativeBounds::new(0.0, 10.0, 1.0));
    }

    #[test]
    fn set_range_reconfigures_without_forward_echo() {
        let native = sim();
        let slider = Slider::slider(
            Rc::clone(&native),
            range(0, 1, 10),
            Seed::new().value(8),
            &WidgetOptions::new(),
        )
        .unwrap();
        let version = slider.observable().version();
        slider.set_range(range(5, 1, 20)).unwrap();
        assert_eq!(native.bounds(), NativeBounds::new(5.0, 20.0, 1.0));
        assert_eq!(slider.observable().version(), version);
        assert_eq!(native.emissions(), 0);
    }

    #[test]
    fn set_range_and_value_is_all_or_nothing() {
        let native = sim();
        let spin = SpinButton::spin_button(
            Rc::clone(&native),
            range(0, 1, 10),
            Seed::new().value(2),
            &WidgetOptions::new(),
        )
        .unwrap();
        assert!(spin.set_range_and_value(range(20, 1, 30), 5).is_err());
        assert_eq!(spin.range(), range(0, 1, 10));
        assert_eq!(spin.value(), 2);

        spin.set_range_and_value(range(20, 1, 30), 25).unwrap();
        assert_eq!(spin.value(), 25);
        assert_eq!(native.display(), 25.0);
        assert_eq!(native.bounds().lower, 20.0);
    }

    #[test]
    fn float_values_pass_through() {
        let native = sim();
        let slider = Slider::slider(
            Rc::clone(&native),
            StepRange::new(0.0, 0.5, 2.0).unwrap(),
            Seed::new().value(1.5),
            &WidgetOptions::new(),
        )
        .unwrap();
        native.user_input(0.75).unwrap();
        assert_eq!(slider.value(), 0.75);
    }
}
