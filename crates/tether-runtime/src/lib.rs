#![forbid(unsafe_code)]

//! Tether Runtime
//!
//! The binding engine proper: observables, the reverse-sync listener, the
//! signal recursion guard, observable seeding and listener lifetime
//! management.
//!
//! # Role in Tether
//! `tether-runtime` sits between the capability contract in `tether-core`
//! and the concrete widget wrappers in `tether-widgets`. It never touches a
//! native toolkit directly; everything goes through the
//! [`tether_core::NativeWidget`] family of traits.
//!
//! # Threading
//! Everything here is single-threaded (`Rc`-based, `!Send`). Listener
//! invocations are synchronous and complete before the triggering write
//! returns.

pub mod reactive;

pub use reactive::{
    ListenerId, NotifyPolicy, Observable, Preserved, Seed, Seeded, SignalBlock, Subscription,
    WeakObservable, bind_widget, bind_widget_via, init_observable, install_teardown,
    with_blocked,
};
