#![forbid(unsafe_code)]

//! Progress bars: a numeric observable shown as a fraction in `[0, 1]`.
//!
//! The value is mapped linearly from `[lower, upper]` onto the native
//! fraction and clamped, so values outside the span pin the bar at an end.

use std::rc::Rc;

use tether_core::{BindError, BindNumber, BindResult, NativeWidget};
use tether_runtime::reactive::Seed;

use crate::bound::Bound;
use crate::{WidgetKind, WidgetOptions, delegate_input_widget};

pub struct ProgressBar<T: BindNumber, N: NativeWidget<Display = f64>> {
    kind: WidgetKind,
    bound: Bound<N, T>,
    lower: T,
    upper: T,
}

fn fraction(value: f64, lower: f64, upper: f64) -> f64 {
    ((value - lower) / (upper - lower)).clamp(0.0, 1.0)
}

impl<T: BindNumber, N: NativeWidget<Display = f64>> ProgressBar<T, N> {
    /// Bind over `[lower, upper]`. Defaults to `lower`.
    pub fn bind(
        native: Rc<N>,
        lower: T,
        upper: T,
        seed: Seed<T>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        let (lo, hi) = (lower.to_f64(), upper.to_f64());
        if lo.is_nan() || hi.is_nan() || hi <= lo {
            return Err(BindError::InvalidRange(format!(
                "progress span {lower}..{upper} is empty"
            )));
        }
        let seeded = seed.policy(opts.policy()).resolve(|| lower)?;
        native.set_display(fraction(seeded.value.to_f64(), lo, hi))?;

        let mut bound = Bound::new(native, seeded, opts.resolved_ownership());
        bound.connect_reverse_via(
            |native| Some(native.display()),
            move |value: &T| fraction(value.to_f64(), lo, hi),
            move |shown: &f64| T::from_f64(lo + shown * (hi - lo)),
            move |native, value| native.set_display(fraction(value.to_f64(), lo, hi)),
        );
        Ok(Self {
            kind: WidgetKind::ProgressBar,
            bound,
            lower,
            upper,
        })
    }

    /// The displayed fraction for the current value.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let value = self.bound.observable().get();
        fraction(value.to_f64(), self.lower.to_f64(), self.upper.to_f64())
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        self.bound.native()
    }
}

delegate_input_widget!(
    ProgressBar<T, N> where [T: BindNumber, N: NativeWidget<Display = f64>],
    T,
    bound
);
