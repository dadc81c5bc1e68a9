#![forbid(unsafe_code)]

//! Observable-bound input widgets for Tether.
//!
//! Each widget wraps a native widget (anything implementing the
//! `tether_core::toolkit` traits) and keeps its display in sync with an
//! [`Observable`] in both directions:
//!
//! | Widget                | Value              | Native display        |
//! |-----------------------|--------------------|-----------------------|
//! | [`Slider`]            | `T: BindNumber`    | `f64`, ranged         |
//! | [`SpinButton`]        | `T: BindNumber`    | `f64`, ranged         |
//! | [`CyclicSpinButton`]  | `T: BindNumber`    | `f64`, ranged + carry |
//! | [`Checkbox`]          | `bool`             | `bool`                |
//! | [`ToggleButton`]      | `bool`             | `bool`                |
//! | [`Button`]            | `()`               | `()` (forward only)   |
//! | [`ColorButton`]       | [`Rgba`]           | [`Rgba`]              |
//! | [`Textbox`]           | `T: TextValue`     | `String`              |
//! | [`Textarea`]          | `String`           | `String`              |
//! | [`Dropdown`]          | `Option<String>`   | option index          |
//! | [`Label`]             | `String`           | `String` (reverse only) |
//! | [`ProgressBar`]       | `T: BindNumber`    | `f64` fraction (reverse only) |
//!
//! A wrapper must be kept alive for its binding to stay active; dropping it
//! unbinds the widget. Destroying the native widget releases the binding's
//! listeners when the binding owns them (see [`Ownership`]).

pub mod bound;
pub mod button;
pub mod color_button;
pub mod direct;
pub mod dropdown;
pub mod label;
pub mod progress;
pub mod ranged;
pub mod spin;
pub mod textbox;
pub mod toggle;

use std::fmt;

use tether_core::{BindConfig, BindResult, Ownership};
use tether_runtime::reactive::{NotifyPolicy, Observable};

pub use bound::Bound;
pub use button::Button;
pub use color_button::{ColorButton, Rgba};
pub use direct::Direct;
pub use dropdown::{ChoiceMap, ChoiceShape, Choices, Dropdown};
pub use label::Label;
pub use progress::ProgressBar;
pub use ranged::{Ranged, Slider, SpinButton};
pub use spin::CyclicSpinButton;
pub use textbox::{TextValue, Textarea, Textbox};
pub use toggle::{Checkbox, ToggleButton};

/// The closed set of widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Slider,
    SpinButton,
    CyclicSpinButton,
    Checkbox,
    ToggleButton,
    Button,
    ColorButton,
    Textbox,
    Textarea,
    Dropdown,
    Label,
    ProgressBar,
}

impl WidgetKind {
    /// Stable snake_case name, used in log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Slider => "slider",
            Self::SpinButton => "spin_button",
            Self::CyclicSpinButton => "cyclic_spin_button",
            Self::Checkbox => "checkbox",
            Self::ToggleButton => "toggle_button",
            Self::Button => "button",
            Self::ColorButton => "color_button",
            Self::Textbox => "textbox",
            Self::Textarea => "textarea",
            Self::Dropdown => "dropdown",
            Self::Label => "label",
            Self::ProgressBar => "progress_bar",
        }
    }

    /// Whether user input on this kind writes the observable.
    #[must_use]
    pub const fn is_input(self) -> bool {
        !matches!(self, Self::Label | Self::ProgressBar)
    }

    /// Whether observable writes update this kind's display.
    #[must_use]
    pub const fn has_reverse_sync(self) -> bool {
        !matches!(self, Self::Button)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability shared by every bound widget.
pub trait InputWidget {
    type Value: Clone + PartialEq + 'static;

    fn kind(&self) -> WidgetKind;

    /// The observable this widget is bound to.
    fn observable(&self) -> &Observable<Self::Value>;

    /// Current observable value.
    fn value(&self) -> Self::Value {
        self.observable().get()
    }

    /// Write the observable; the display follows.
    fn set_value(&self, value: Self::Value) -> BindResult {
        self.observable().set(value)
    }

    /// Whether the widget releases its listeners when destroyed.
    fn owns_observable(&self) -> bool;

    /// Number of auxiliary listener handles currently kept alive.
    fn preserved_len(&self) -> usize;
}

/// Construction options shared by all widgets.
#[derive(Debug, Clone, Default)]
pub struct WidgetOptions {
    pub config: BindConfig,
    /// Overrides `config.lifetime.default_ownership` when set.
    pub ownership: Option<Ownership>,
}

impl WidgetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: BindConfig) -> Self {
        Self {
            config,
            ownership: None,
        }
    }

    #[must_use]
    pub fn ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = Some(ownership);
        self
    }

    /// The ownership mode in effect.
    #[must_use]
    pub fn resolved_ownership(&self) -> Ownership {
        self.ownership.unwrap_or(self.config.lifetime.default_ownership)
    }

    /// Notification policy for observables the widget creates itself.
    #[must_use]
    pub fn policy(&self) -> NotifyPolicy {
        if self.config.notify.skip_equal_writes {
            NotifyPolicy::SkipEqual
        } else {
            NotifyPolicy::Always
        }
    }
}

/// Implements [`InputWidget`] for a wrapper holding a [`Bound`] in a field.
macro_rules! delegate_input_widget {
    ($ty:ident < $($gen:ident),* > where [$($bounds:tt)*], $value:ty, $field:ident) => {
        impl<$($gen),*> $crate::InputWidget for $ty<$($gen),*>
        where
            $($bounds)*
        {
            type Value = $value;

            fn kind(&self) -> $crate::WidgetKind {
                self.kind
            }

            fn observable(&self) -> &tether_runtime::reactive::Observable<$value> {
                self.$field.observable()
            }

            fn owns_observable(&self) -> bool {
                self.$field.owns()
            }

            fn preserved_len(&self) -> usize {
                self.$field.preserved_len()
            }
        }
    };
}
pub(crate) use delegate_input_widget;
