#![forbid(unsafe_code)]

//! Read-only text display following an `Observable<String>`.

use std::rc::Rc;

use tether_core::{BindResult, NativeWidget};
use tether_runtime::reactive::Seed;

use crate::bound::Bound;
use crate::{WidgetKind, WidgetOptions, delegate_input_widget};

pub struct Label<N: NativeWidget<Display = String>> {
    kind: WidgetKind,
    bound: Bound<N, String>,
}

impl<N: NativeWidget<Display = String>> Label<N> {
    pub fn bind(native: Rc<N>, seed: Seed<String>, opts: &WidgetOptions) -> BindResult<Self> {
        let seeded = seed.policy(opts.policy()).resolve(String::new)?;
        native.set_display(seeded.value.clone())?;
        let mut bound = Bound::new(native, seeded, opts.resolved_ownership());
        bound.connect_reverse(
            |native| Some(native.display()),
            |native, text| native.set_display(text.clone()),
        );
        Ok(Self {
            kind: WidgetKind::Label,
            bound,
        })
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        self.bound.native()
    }
}

delegate_input_widget!(Label<N> where [N: NativeWidget<Display = String>], String, bound);
