#![forbid(unsafe_code)]

//! Color buttons bound to `Observable<Rgba>`.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use tether_core::{BindError, BindResult, NativeWidget};
use tether_runtime::reactive::Seed;

use crate::direct::Direct;
use crate::{WidgetKind, WidgetOptions};

/// A color with `f64` channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    /// Channels are clamped into `[0, 1]`.
    #[must_use]
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red: red.clamp(0.0, 1.0),
            green: green.clamp(0.0, 1.0),
            blue: blue.clamp(0.0, 1.0),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn opaque(red: f64, green: f64, blue: f64) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let c = |v: u8| f64::from(v) / 255.0;
        Self::new(c(r), c(g), c(b), c(a))
    }

    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        let c = |v: f64| (v * 255.0).round() as u8;
        [c(self.red), c(self.green), c(self.blue), c(self.alpha)]
    }
}

impl Default for Rgba {
    /// Opaque black.
    fn default() -> Self {
        Self::opaque(0.0, 0.0, 0.0)
    }
}

impl fmt::Display for Rgba {
    /// `#rrggbbaa`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl FromStr for Rgba {
    type Err = BindError;

    /// Accepts `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BindError::TypeMismatch {
            expected: "#rrggbb or #rrggbbaa",
            found: "malformed color string",
        };
        let hex = s.strip_prefix('#').ok_or_else(bad)?;
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, alpha))
    }
}

pub type ColorButton<N> = Direct<N>;

impl<N: NativeWidget<Display = Rgba>> Direct<N> {
    pub fn color_button(native: Rc<N>, seed: Seed<Rgba>, opts: &WidgetOptions) -> BindResult<Self> {
        Self::bind(WidgetKind::ColorButton, native, seed, opts)
    }
}
