#![forbid(unsafe_code)]

//! Reactive binding primitives.
//!
//! - [`observable`]: shared value cells with weak/strong listeners.
//! - [`guard`]: RAII block of a native signal during reverse writes.
//! - [`binding`]: the observable → widget reverse-sync listener.
//! - [`seed`]: resolving a widget's starting observable and value.
//! - [`lifetime`]: holding listener handles and releasing them on destroy.

pub mod binding;
pub mod guard;
pub mod lifetime;
pub mod observable;
pub mod seed;

pub use binding::{bind_widget, bind_widget_via};
pub use guard::{SignalBlock, with_blocked};
pub use lifetime::{Preserved, install_teardown};
pub use observable::{ListenerId, NotifyPolicy, Observable, Subscription, WeakObservable};
pub use seed::{Seed, Seeded, init_observable};
