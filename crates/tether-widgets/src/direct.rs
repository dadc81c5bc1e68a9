#![forbid(unsafe_code)]

//! Widgets whose observable holds exactly the native display value:
//! checkboxes, toggle buttons, color buttons and text areas.
//!
//! Typed constructors live with each kind (`toggle`, `color_button`,
//! `textbox`); this module holds the shared wiring.

use std::rc::Rc;

use tether_core::{BindResult, NativeWidget};
use tether_runtime::reactive::Seed;

use crate::bound::Bound;
use crate::{WidgetKind, WidgetOptions, delegate_input_widget};

/// A two-way binding between `N::Display` and an observable of the same
/// type.
pub struct Direct<N: NativeWidget> {
    kind: WidgetKind,
    bound: Bound<N, N::Display>,
}

impl<N: NativeWidget> Direct<N> {
    /// Without a value source the widget's current display seeds the
    /// observable.
    pub(crate) fn bind(
        kind: WidgetKind,
        native: Rc<N>,
        seed: Seed<N::Display>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        let seeded = seed.policy(opts.policy()).resolve(|| native.display())?;
        native.set_display(seeded.value.clone())?;

        let mut bound = Bound::new(native, seeded, opts.resolved_ownership());
        bound.connect_forward(|native, obs| obs.set(native.display()));
        bound.connect_reverse(
            |native| Some(native.display()),
            |native, value| native.set_display(value.clone()),
        );
        Ok(Self { kind, bound })
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        self.bound.native()
    }
}

delegate_input_widget!(Direct<N> where [N: NativeWidget], N::Display, bound);
