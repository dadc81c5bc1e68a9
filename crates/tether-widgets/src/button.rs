#![forbid(unsafe_code)]

//! Push buttons: every click writes `()` to the observable.
//!
//! The observable always notifies on every write regardless of the
//! configured policy, since two clicks carry the same value.

use std::rc::Rc;

use tether_core::{BindResult, NativeWidget};
use tether_runtime::reactive::{NotifyPolicy, Seed};

use crate::bound::Bound;
use crate::{WidgetKind, WidgetOptions, delegate_input_widget};

pub struct Button<N: NativeWidget<Display = ()>> {
    kind: WidgetKind,
    bound: Bound<N, ()>,
}

impl<N: NativeWidget<Display = ()>> Button<N> {
    pub fn bind(native: Rc<N>, seed: Seed<()>, opts: &WidgetOptions) -> BindResult<Self> {
        let seeded = seed.policy(NotifyPolicy::Always).resolve(|| ())?;
        let mut bound = Bound::new(native, seeded, opts.resolved_ownership());
        bound.connect_forward(|_, clicks| clicks.set(()));
        Ok(Self {
            kind: WidgetKind::Button,
            bound,
        })
    }

    /// Simulate a click from code.
    pub fn click(&self) -> BindResult {
        self.bound.observable().set(())
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        self.bound.native()
    }
}

delegate_input_widget!(Button<N> where [N: NativeWidget<Display = ()>], (), bound);
