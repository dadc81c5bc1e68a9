#![forbid(unsafe_code)]

//! Stepped numeric ranges and grid snapping.
//!
//! A [`StepRange`] is the finite arithmetic sequence
//! `start, start + step, ..., stop` written `start:step:stop` (or
//! `start:stop` when the step is one). The stored `stop` is always the last
//! element actually reachable, so `0:3:10` normalizes to `0:3:9`.
//!
//! # Snapping
//!
//! [`StepRange::snap`] maps any value to the nearest grid point:
//!
//! ```text
//! k = round((value - start) / step) + 1      (1-based, ties to even)
//! k = clamp(k, 1, len)
//! snapped = start + (k - 1) * step
//! ```
//!
//! For `0:2:10`, `7` lands exactly between `6` and `8`; `3.5` rounds to the
//! even `4`, giving index 5 and the value `8`.

use std::fmt;
use std::str::FromStr;

use crate::error::BindError;
use crate::number::BindNumber;
use crate::toolkit::NativeBounds;

/// Guards the length computation against float noise such as
/// `(0.3 - 0.0) / 0.1 == 2.9999999999999996`.
const LEN_EPSILON: f64 = 1e-9;

/// A finite ascending arithmetic range of bindable numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRange<T> {
    start: T,
    step: T,
    stop: T,
    len: usize,
}

impl<T: BindNumber> StepRange<T> {
    /// Build `start:step:stop`.
    ///
    /// Fails with [`BindError::InvalidRange`] if the step is not strictly
    /// positive, `stop < start`, or the grid has more points than fit in a
    /// `usize`.
    pub fn new(start: T, step: T, stop: T) -> Result<Self, BindError> {
        let (s, d, e) = (start.to_f64(), step.to_f64(), stop.to_f64());
        if !(d > 0.0) || !d.is_finite() {
            return Err(BindError::InvalidRange(format!(
                "step must be positive, got {step}"
            )));
        }
        if !(e >= s) || !s.is_finite() || !e.is_finite() {
            return Err(BindError::InvalidRange(format!(
                "stop {stop} precedes start {start}"
            )));
        }
        let steps = ((e - s) / d + LEN_EPSILON).floor();
        if !(steps < usize::MAX as f64) {
            return Err(BindError::InvalidRange(format!(
                "{start}:{step}:{stop} has too many grid points"
            )));
        }
        let len = steps as usize + 1;
        let stop = T::from_f64(s + (len - 1) as f64 * d);
        Ok(Self {
            start,
            step,
            stop,
            len,
        })
    }

    /// First element.
    #[must_use]
    pub fn first(&self) -> T {
        self.start
    }

    /// Last element.
    #[must_use]
    pub fn last(&self) -> T {
        self.stop
    }

    #[must_use]
    pub fn step(&self) -> T {
        self.step
    }

    /// Number of grid points (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a valid range holds at least its start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The `index`-th element (0-based), if within the range.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<T> {
        (index < self.len)
            .then(|| T::from_f64(self.start.to_f64() + index as f64 * self.step.to_f64()))
    }

    /// Whether `value` lies within `[first, last]` (grid membership is not
    /// required).
    #[must_use]
    pub fn spans(&self, value: T) -> bool {
        self.start <= value && value <= self.stop
    }

    /// Snap `value` to the nearest grid point, clamping to the ends. NaN
    /// snaps to the start.
    #[must_use]
    pub fn snap(&self, value: T) -> T {
        let offset = (value.to_f64() - self.start.to_f64()) / self.step.to_f64();
        if offset.is_nan() {
            return self.start;
        }
        let k = (offset.round_ties_even() + 1.0).clamp(1.0, self.len as f64);
        // `k` is a whole number in 1..=len at this point.
        self.nth(k as usize - 1).unwrap_or(self.stop)
    }

    /// Bounds for a native ranged control showing this range.
    #[must_use]
    pub fn native_bounds(&self) -> NativeBounds {
        NativeBounds::new(
            self.start.to_f64(),
            self.stop.to_f64(),
            self.step.to_f64(),
        )
    }

    /// Iterate the grid points in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).filter_map(|i| self.nth(i))
    }
}

impl<T: BindNumber> fmt::Display for StepRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step.to_f64() == 1.0 {
            write!(f, "{}:{}", self.start, self.stop)
        } else {
            write!(f, "{}:{}:{}", self.start, self.step, self.stop)
        }
    }
}

impl<T: BindNumber> FromStr for StepRange<T> {
    type Err = BindError;

    /// Parse `start:stop` or `start:step:stop`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let parse = |p: &str| {
            p.parse::<T>()
                .map_err(|_| BindError::InvalidRange(format!("cannot parse {p:?} in {s:?}")))
        };
        match parts.as_slice() {
            [start, stop] => Self::new(parse(start)?, T::from_f64(1.0), parse(stop)?),
            [start, step, stop] => Self::new(parse(start)?, parse(step)?, parse(stop)?),
            _ => Err(BindError::InvalidRange(format!(
                "expected start:stop or start:step:stop, got {s:?}"
            ))),
        }
    }
}
