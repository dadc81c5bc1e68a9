#![forbid(unsafe_code)]

//! Capability contract toward the native widget toolkit.
//!
//! The binding engine never talks to a concrete toolkit. It needs exactly
//! five capabilities from a native widget:
//!
//! | Capability           | Method                          |
//! |----------------------|---------------------------------|
//! | read display value   | [`NativeWidget::display`]       |
//! | write display value  | [`NativeWidget::set_display`]   |
//! | native change signal | [`NativeWidget::connect_changed`] |
//! | signal liveness/block| [`SignalControl`]               |
//! | destroy notification | [`NativeWidget::connect_destroy`] |
//!
//! Ranged controls (sliders, spin buttons) additionally expose their bounds
//! through [`RangedNative`]; option lists (dropdowns) expose
//! [`ChoiceNative`].
//!
//! # Invariants expected from implementors
//!
//! 1. A blocked signal never invokes its handler; blocking nests (two
//!    `block()` calls need two `unblock()` calls).
//! 2. After the widget is destroyed every signal reports
//!    `is_connected() == false`.
//! 3. Destroy handlers run exactly once.
//! 4. `set_display` does not invoke change handlers whose signal is blocked.

use std::fmt;

use crate::error::BindResult;

/// Handler invoked when the native widget's value changes through user input.
pub type ChangeHandler = Box<dyn Fn() -> BindResult>;

/// Handler invoked once when the native widget is permanently torn down.
pub type DestroyHandler = Box<dyn FnOnce()>;

/// Handle to an installed native signal subscription.
pub trait SignalControl {
    /// Whether the subscription is still installed (widget alive).
    fn is_connected(&self) -> bool;

    /// Suspend delivery. Nested calls must be balanced by [`Self::unblock`].
    fn block(&self);

    /// Resume delivery after a matching [`Self::block`].
    fn unblock(&self);
}

/// A native widget that displays a single value.
pub trait NativeWidget: 'static {
    /// The widget's native display representation.
    type Display: Clone + PartialEq + fmt::Debug + 'static;

    /// Handle type returned by [`Self::connect_changed`].
    type Signal: SignalControl + Clone + 'static;

    /// Current displayed value.
    fn display(&self) -> Self::Display;

    /// Replace the displayed value.
    fn set_display(&self, value: Self::Display) -> BindResult;

    /// Subscribe to the native "value changed" notification.
    fn connect_changed(&self, handler: ChangeHandler) -> Self::Signal;

    /// Register a handler to run when the widget is destroyed.
    fn connect_destroy(&self, handler: DestroyHandler);
}

/// Bounds of a ranged native control in its continuous representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeBounds {
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
}

impl NativeBounds {
    #[must_use]
    pub const fn new(lower: f64, upper: f64, step: f64) -> Self {
        Self { lower, upper, step }
    }

    /// Clamp `value` into `[lower, upper]`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }

    /// Widen both edges by one step.
    #[must_use]
    pub fn widened(&self) -> Self {
        Self {
            lower: self.lower - self.step,
            upper: self.upper + self.step,
            step: self.step,
        }
    }
}

impl fmt::Display for NativeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] step {}", self.lower, self.upper, self.step)
    }
}

/// A native control with a continuous numeric value and adjustable bounds.
pub trait RangedNative: NativeWidget<Display = f64> {
    fn bounds(&self) -> NativeBounds;

    /// Reconfigure the bounds. Implementations clamp the current value.
    fn set_bounds(&self, bounds: NativeBounds);
}

/// A native control presenting a list of options with one active entry.
///
/// The display value is the active option index, `None` when nothing is
/// selected.
pub trait ChoiceNative: NativeWidget<Display = Option<usize>> {
    fn append_option(&self, label: &str);

    /// Remove every option and deselect.
    fn clear_options(&self);

    fn option_count(&self) -> usize;
}
