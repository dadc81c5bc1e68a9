#![forbid(unsafe_code)]

//! Core: error taxonomy, toolkit capability contract, and value coercion.
//!
//! # Role in Tether
//! `tether-core` is the foundation layer. It names the errors every binding
//! can surface, describes the small capability contract a native widget
//! toolkit must offer, and owns the numeric/range math applied at the widget
//! boundary.
//!
//! # Primary responsibilities
//! - **BindError**: programmer-misuse errors propagated to callers.
//! - **Toolkit contract**: [`toolkit::NativeWidget`] and friends.
//! - **Coercion**: [`number::BindNumber`] and [`range::StepRange`] snapping.
//! - **Configuration**: [`config::BindConfig`], optionally loaded from files.
//!
//! # How it fits in the system
//! The runtime (`tether-runtime`) builds observables and the binding engine
//! on top of these types; `tether-widgets` wires concrete widget kinds; the
//! toolkit itself stays outside and only implements the traits here.

pub mod config;
pub mod error;
pub mod logging;
pub mod number;
pub mod range;
pub mod toolkit;

pub use config::{BindConfig, ConfigError, LifetimeConfig, NotifyConfig, Ownership, TextConfig};
pub use error::{BindError, BindResult};
pub use number::BindNumber;
pub use range::StepRange;
pub use toolkit::{
    ChangeHandler, ChoiceNative, DestroyHandler, NativeBounds, NativeWidget, RangedNative,
    SignalControl,
};
