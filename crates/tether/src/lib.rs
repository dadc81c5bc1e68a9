#![forbid(unsafe_code)]

//! Tether public facade crate.
//!
//! Re-exports the binding engine and the widget kinds from the internal
//! crates, and offers a prelude for day-to-day usage. Toolkit integrations
//! implement the traits in [`toolkit`] and hand their widgets to the
//! constructors in [`widgets`].

// --- Core re-exports -------------------------------------------------------

pub use tether_core::toolkit;
pub use tether_core::{
    BindConfig, BindError, BindNumber, ConfigError, NativeBounds, Ownership, StepRange, TextConfig,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tether_runtime::reactive::{
    NotifyPolicy, Observable, Preserved, Seed, Subscription, WeakObservable, bind_widget,
};

// --- Widget re-exports -----------------------------------------------------

pub use tether_widgets::{
    Button, Checkbox, ChoiceShape, Choices, ColorButton, CyclicSpinButton, Dropdown, InputWidget,
    Label, ProgressBar, Rgba, Slider, SpinButton, TextValue, Textarea, Textbox, ToggleButton,
    WidgetKind, WidgetOptions,
};

/// Standard result type for Tether APIs.
pub type Result<T = ()> = std::result::Result<T, BindError>;

#[cfg(feature = "tracing-json")]
pub use tether_core::logging::init_json_logging;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BindConfig, BindError, InputWidget, Observable, Ownership, Result, Seed, StepRange,
        Subscription, WidgetKind, WidgetOptions,
    };

    pub use crate::toolkit::{ChoiceNative, NativeWidget, RangedNative, SignalControl};

    pub use crate::{core, runtime, widgets};
}

pub use tether_core as core;
pub use tether_runtime as runtime;
pub use tether_widgets as widgets;
