//! Measurement units used across the layout pipeline.
//!
//! The layout engine reports coordinates and lengths in [`Points`] (1/72 inch)
//! and node sizes in [`Inches`], while every rendering surface works in
//! device-independent [`Pixels`] (1/96 inch). Each unit is a distinct type so
//! that mixing them is a compile-time error; the only way across is an
//! explicit [`From`] conversion.
//!
//! # Examples
//!
//! ```
//! # use graphcanvas_core::units::{Inches, Pixels, Points};
//! let width = Inches::new(1.0);
//! let px = Pixels::from(width);
//! assert_eq!(px.value(), 96.0);
//!
//! let pt = Points::from(px);
//! assert_eq!(pt.value(), 72.0);
//! ```

use std::{
    fmt,
    num::ParseFloatError,
    ops::{Add, Div, Sub},
    str::FromStr,
};

/// Device-independent pixels per inch.
pub const PIXELS_PER_INCH: f32 = 96.0;

/// Layout engine points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

macro_rules! impl_unit {
    ($unit:ident, $suffix:literal) => {
        impl $unit {
            /// Wraps a raw scalar in this unit.
            pub const fn new(value: f32) -> Self {
                Self(value)
            }

            /// Returns the raw scalar value.
            pub const fn value(self) -> f32 {
                self.0
            }
        }

        impl Add for $unit {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $unit {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Div<i32> for $unit {
            type Output = Self;

            fn div(self, rhs: i32) -> Self {
                Self(self.0 / rhs as f32)
            }
        }

        impl FromStr for $unit {
            type Err = ParseFloatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<f32>().map(Self)
            }
        }

        impl fmt::Display for $unit {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", self.0, $suffix)
            }
        }
    };
}

/// A length in layout engine points (72 per inch).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Points(f32);

/// A length in device-independent pixels (96 per inch).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Pixels(f32);

/// A length in inches.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Inches(f32);

impl_unit!(Points, "pt");
impl_unit!(Pixels, "px");
impl_unit!(Inches, "in");

impl From<Pixels> for Points {
    fn from(px: Pixels) -> Self {
        Self(px.0 * (POINTS_PER_INCH / PIXELS_PER_INCH))
    }
}

impl From<Inches> for Points {
    fn from(inches: Inches) -> Self {
        Self(inches.0 * POINTS_PER_INCH)
    }
}

impl From<Points> for Pixels {
    fn from(pt: Points) -> Self {
        Self(pt.0 * (PIXELS_PER_INCH / POINTS_PER_INCH))
    }
}

impl From<Inches> for Pixels {
    fn from(inches: Inches) -> Self {
        Self(inches.0 * PIXELS_PER_INCH)
    }
}

impl From<Points> for Inches {
    fn from(pt: Points) -> Self {
        Self(pt.0 / POINTS_PER_INCH)
    }
}

impl From<Pixels> for Inches {
    fn from(px: Pixels) -> Self {
        Self(px.0 / PIXELS_PER_INCH)
    }
}
