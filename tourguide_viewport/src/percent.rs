// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution-independent positions.

use kurbo::Point;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A position expressed as percentages of the background content's width and height.
///
/// Both axes are clamped to `[0, 100]` on construction, so a `Percent` can never
/// describe a point outside the content. Non-finite inputs are treated as `0`, except
/// `+inf` which saturates to `100`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawPercent"))]
pub struct Percent {
    x: f64,
    y: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPercent {
    x: f64,
    y: f64,
}

#[cfg(feature = "serde")]
impl From<RawPercent> for Percent {
    fn from(raw: RawPercent) -> Self {
        Self::new(raw.x, raw.y)
    }
}

impl Percent {
    /// Top-left corner of the content.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
    /// Centre of the content.
    pub const CENTER: Self = Self { x: 50.0, y: 50.0 };

    /// Create a percent position, clamping each axis to `[0, 100]`.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_axis(x),
            y: clamp_axis(y),
        }
    }

    /// Horizontal percentage.
    #[must_use]
    pub const fn x(self) -> f64 {
        self.x
    }

    /// Vertical percentage.
    #[must_use]
    pub const fn y(self) -> f64 {
        self.y
    }

    /// The position as fractions of the content size (`[0, 1]` per axis).
    #[must_use]
    pub fn fraction(self) -> (f64, f64) {
        (self.x / 100.0, self.y / 100.0)
    }

    /// Returns `true` if both axes are within `tolerance` of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Default for Percent {
    fn default() -> Self {
        Self::CENTER
    }
}

impl From<Percent> for Point {
    fn from(p: Percent) -> Self {
        Self::new(p.x, p.y)
    }
}

fn clamp_axis(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Percent;

    #[test]
    fn construction_clamps_each_axis() {
        let p = Percent::new(-10.0, 140.0);
        assert_eq!(p.x(), 0.0);
        assert_eq!(p.y(), 100.0);

        let p = Percent::new(f64::NAN, f64::INFINITY);
        assert_eq!(p.x(), 0.0);
        assert_eq!(p.y(), 100.0);
    }

    #[test]
    fn fraction_scales_to_unit_range() {
        let (fx, fy) = Percent::new(25.0, 100.0).fraction();
        assert!((fx - 0.25).abs() < f64::EPSILON);
        assert!((fy - 1.0).abs() < f64::EPSILON);
    }
}
