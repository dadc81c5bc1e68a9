#![forbid(unsafe_code)]

//! Checkboxes and toggle buttons bound to `Observable<bool>`.

use std::rc::Rc;

use tether_core::{BindResult, NativeWidget};
use tether_runtime::reactive::Seed;

use crate::direct::Direct;
use crate::{InputWidget, WidgetKind, WidgetOptions};

pub type Checkbox<N> = Direct<N>;
pub type ToggleButton<N> = Direct<N>;

impl<N: NativeWidget<Display = bool>> Direct<N> {
    pub fn checkbox(native: Rc<N>, seed: Seed<bool>, opts: &WidgetOptions) -> BindResult<Self> {
        Self::bind(WidgetKind::Checkbox, native, seed, opts)
    }

    pub fn toggle_button(
        native: Rc<N>,
        seed: Seed<bool>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        Self::bind(WidgetKind::ToggleButton, native, seed, opts)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.value()
    }

    /// Flip the observable; the widget follows.
    pub fn toggle(&self) -> BindResult {
        self.observable().update(|active| *active = !*active)
    }
}
