#![forbid(unsafe_code)]

//! Text entries bound to typed observables, and multi-line text areas.
//!
//! A [`Textbox<T>`] shows `T` as text. Typed input is parsed on the way in:
//!
//! - unparsable text is reverted to the observable's current value; the
//!   observable is untouched and no error surfaces;
//! - with a range ([`Textbox::bind_ranged`]) the parsed value is snapped to
//!   the nearest grid point and, if snapping moved it, the display is
//!   rewritten.
//!
//! Display rewrites happen with the change signal blocked, so they never
//! re-enter the parser.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use tether_core::{BindNumber, BindResult, NativeWidget, StepRange, TextConfig};
use tether_runtime::reactive::{Observable, Seed, Seeded, with_blocked};

use crate::bound::Bound;
use crate::direct::Direct;
use crate::{WidgetKind, WidgetOptions, delegate_input_widget};

/// A value that can be edited as text.
pub trait TextValue: Clone + PartialEq + fmt::Debug + 'static {
    /// Parse user input. `None` rejects the text.
    fn parse_text(text: &str, config: &TextConfig) -> Option<Self>;

    /// Render for display.
    fn format_text(&self, config: &TextConfig) -> String;
}

impl TextValue for String {
    fn parse_text(text: &str, _config: &TextConfig) -> Option<Self> {
        Some(text.to_owned())
    }

    fn format_text(&self, _config: &TextConfig) -> String {
        self.clone()
    }
}

fn prepared<'a>(text: &'a str, config: &TextConfig) -> &'a str {
    if config.trim_input { text.trim() } else { text }
}

macro_rules! impl_text_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl TextValue for $t {
                fn parse_text(text: &str, config: &TextConfig) -> Option<Self> {
                    prepared(text, config).parse().ok()
                }

                fn format_text(&self, _config: &TextConfig) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

macro_rules! impl_text_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl TextValue for $t {
                fn parse_text(text: &str, config: &TextConfig) -> Option<Self> {
                    prepared(text, config).parse::<$t>().ok().filter(|v| v.is_finite())
                }

                fn format_text(&self, config: &TextConfig) -> String {
                    match config.float_precision {
                        Some(precision) => format!("{self:.precision$}"),
                        None => self.to_string(),
                    }
                }
            }
        )*
    };
}

impl_text_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_text_float!(f32, f64);

type Snap<T> = Rc<dyn Fn(&T) -> T>;

/// A single-line text entry bound to an observable of `T`.
pub struct Textbox<T: TextValue, N: NativeWidget<Display = String>> {
    kind: WidgetKind,
    bound: Bound<N, T>,
    config: TextConfig,
}

impl<T: TextValue, N: NativeWidget<Display = String>> Textbox<T, N> {
    /// Bind without a range. Defaults to `T::default()`.
    pub fn bind(native: Rc<N>, seed: Seed<T>, opts: &WidgetOptions) -> BindResult<Self>
    where
        T: Default,
    {
        let seeded = seed.policy(opts.policy()).resolve(T::default)?;
        Self::wire(native, seeded, None, opts)
    }

    /// Bind with parsed input snapped to `range`. Defaults to the range
    /// start.
    pub fn bind_ranged(
        native: Rc<N>,
        range: StepRange<T>,
        seed: Seed<T>,
        opts: &WidgetOptions,
    ) -> BindResult<Self>
    where
        T: BindNumber,
    {
        let seeded = seed.policy(opts.policy()).resolve(|| range.first())?;
        let initial = range.snap(seeded.value);
        if initial != seeded.value {
            seeded.observable.set(initial)?;
        }
        let snap: Snap<T> = Rc::new(move |v: &T| range.snap(*v));
        Self::wire(native, Seeded { value: initial, ..seeded }, Some(snap), opts)
    }

    fn wire(
        native: Rc<N>,
        seeded: Seeded<T>,
        snap: Option<Snap<T>>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        let config = opts.config.text.clone();
        native.set_display(seeded.value.format_text(&config))?;

        let mut bound = Bound::new(native, seeded, opts.resolved_ownership());
        let slot: Rc<OnceCell<N::Signal>> = Rc::new(OnceCell::new());
        let forward_slot = Rc::clone(&slot);
        let forward_config = config.clone();
        let signal = bound.connect_forward(move |native, obs| {
            forward_text(native, obs, &forward_slot, snap.as_deref(), &forward_config)
        });
        let _ = slot.set(signal);

        let read_config = config.clone();
        let write_config = config.clone();
        bound.connect_reverse(
            move |native| T::parse_text(&native.display(), &read_config),
            move |native, value| native.set_display(value.format_text(&write_config)),
        );
        Ok(Self {
            kind: WidgetKind::Textbox,
            bound,
            config,
        })
    }

    /// Current display text.
    #[must_use]
    pub fn text(&self) -> String {
        self.bound.native().display()
    }

    #[must_use]
    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        self.bound.native()
    }
}

fn forward_text<T: TextValue, N: NativeWidget<Display = String>>(
    native: &N,
    obs: &Observable<T>,
    signal: &OnceCell<N::Signal>,
    snap: Option<&dyn Fn(&T) -> T>,
    config: &TextConfig,
) -> BindResult {
    let rewrite = |text: String| match signal.get() {
        Some(signal) => with_blocked(signal, || native.set_display(text)).unwrap_or(Ok(())),
        None => native.set_display(text),
    };

    let text = native.display();
    let Some(parsed) = T::parse_text(&text, config) else {
        #[cfg(feature = "tracing")]
        tracing::debug!(event = "tether.parse", input = %text, "unparsable input reverted");
        return rewrite(obs.with(|current| current.format_text(config)));
    };
    let value = match snap {
        Some(snap) => snap(&parsed),
        None => parsed.clone(),
    };
    if value != parsed {
        rewrite(value.format_text(config))?;
    }
    obs.set(value)
}

delegate_input_widget!(
    Textbox<T, N> where [T: TextValue, N: NativeWidget<Display = String>],
    T,
    bound
);

/// A multi-line text area bound to `Observable<String>`.
pub type Textarea<N> = Direct<N>;

impl<N: NativeWidget<Display = String>> Direct<N> {
    pub fn textarea(native: Rc<N>, seed: Seed<String>, opts: &WidgetOptions) -> BindResult<Self> {
        Self::bind(WidgetKind::Textarea, native, seed, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputWidget;
    use tether_core::BindConfig;
    use tether_harness::SimWidget;

    fn text_sim() -> Rc<SimWidget<String>> {
        SimWidget::new(String::new())
    }

    #[test]
    fn typed_input_parses_into_observable() {
        let native = text_sim();
        let tb = Textbox::<i32, _>::bind(Rc::clone(&native), Seed::new(), &WidgetOptions::new())
            .unwrap();
        assert_eq!(tb.text(), "0");

        native.user_input(" 42 ".into()).unwrap();
        assert_eq!(tb.value(), 42);
        assert_eq!(native.display(), " 42 ", "parsed value equals display; no rewrite");
    }

    #[test]
    fn unparsable_input_reverts_display() {
        let native = text_sim();
        let tb = Textbox::<i32, _>::bind(
            Rc::clone(&native),
            Seed::new().value(5),
            &WidgetOptions::new(),
        )
        .unwrap();
        let version = tb.observable().version();

        assert!(native.user_input("five".into()).is_ok());
        assert_eq!(native.display(), "5");
        assert_eq!(tb.value(), 5);
        assert_eq!(tb.observable().version(), version);
        assert_eq!(native.emissions(), 1, "revert did not re-enter the parser");
    }

    #[test]
    fn ranged_input_snaps_to_grid() {
        let native = text_sim();
        let tb = Textbox::bind_ranged(
            Rc::clone(&native),
            StepRange::new(0, 2, 10).unwrap(),
            Seed::new(),
            &WidgetOptions::new(),
        )
        .unwrap();

        native.user_input("7".into()).unwrap();
        assert_eq!(tb.value(), 8);
        assert_eq!(native.display(), "8");

        native.user_input("99".into()).unwrap();
        assert_eq!(tb.value(), 10);
        assert_eq!(native.display(), "10");
    }

    #[test]
    fn ranged_initial_value_is_snapped() {
        let native = text_sim();
        let tb = Textbox::bind_ranged(
            Rc::clone(&native),
            StepRange::new(0, 5, 20).unwrap(),
            Seed::new().value(12),
            &WidgetOptions::new(),
        )
        .unwrap();
        assert_eq!(tb.value(), 10);
        assert_eq!(native.display(), "10");
    }

    #[test]
    fn observable_write_is_formatted() {
        let native = text_sim();
        let mut config = BindConfig::default();
        config.text.float_precision = Some(2);
        let tb = Textbox::<f64, _>::bind(
            Rc::clone(&native),
            Seed::new(),
            &WidgetOptions::with_config(config),
        )
        .unwrap();
        assert_eq!(native.display(), "0.00");
        tb.set_value(1.5).unwrap();
        assert_eq!(native.display(), "1.50");
    }

    #[test]
    fn trimming_can_be_disabled() {
        let native = text_sim();
        let mut config = BindConfig::default();
        config.text.trim_input = false;
        let tb = Textbox::<u8, _>::bind(
            Rc::clone(&native),
            Seed::new().value(3),
            &WidgetOptions::with_config(config),
        )
        .unwrap();
        native.user_input(" 4".into()).unwrap();
        assert_eq!(tb.value(), 3);
        assert_eq!(native.display(), "3");
    }

    #[test]
    fn string_textbox_keeps_whitespace() {
        let native = text_sim();
        let tb = Textbox::<String, _>::bind(Rc::clone(&native), Seed::new(), &WidgetOptions::new())
            .unwrap();
        native.user_input("  padded ".into()).unwrap();
        assert_eq!(tb.value(), "  padded ");
    }

    #[test]
    fn textarea_two_way() {
        let native = text_sim();
        let area = Textarea::textarea(
            Rc::clone(&native),
            Seed::new().value("line one\nline two".to_owned()),
            &WidgetOptions::new(),
        )
        .unwrap();
        assert_eq!(area.kind(), WidgetKind::Textarea);
        assert_eq!(native.display(), "line one\nline two");
        native.user_input("edited".into()).unwrap();
        assert_eq!(area.value(), "edited");
    }

    #[test]
    fn float_parse_rejects_non_finite() {
        let config = TextConfig::default();
        assert_eq!(f64::parse_text("inf", &config), None);
        assert_eq!(f64::parse_text("NaN", &config), None);
        assert_eq!(f64::parse_text(" 2.5 ", &config), Some(2.5));
    }
}
