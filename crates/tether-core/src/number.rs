#![forbid(unsafe_code)]

//! Numeric coercion between a widget's continuous native value and the
//! observable's element type.
//!
//! Native ranged controls store `f64`. An observable of `u8` bound to a
//! slider receives `round(native)`: ties go to the even integer and values
//! outside the type's span saturate. Float types pass through unchanged
//! (`f32` narrows).

use std::fmt;
use std::str::FromStr;

/// A number type an observable can hold when bound to a ranged control.
pub trait BindNumber:
    Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display + FromStr + 'static
{
    /// Whether the type only holds whole numbers.
    const IS_INTEGER: bool;

    /// Widen to the native representation.
    fn to_f64(self) -> f64;

    /// Narrow from the native representation, rounding to the nearest
    /// representable value.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_bind_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl BindNumber for $t {
                const IS_INTEGER: bool = true;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    // `as` saturates at the type bounds and maps NaN to 0.
                    value.round_ties_even() as $t
                }
            }
        )*
    };
}

macro_rules! impl_bind_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl BindNumber for $t {
                const IS_INTEGER: bool = false;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_bind_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_bind_float!(f32, f64);
