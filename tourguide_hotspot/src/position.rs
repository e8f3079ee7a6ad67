// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hotspot data and percent/pixel conversion.

use alloc::string::String;

use kurbo::{Point, Rect};
use tourguide_viewport::Percent;

/// Convert a percent position into container pixels within `bounds`.
#[must_use]
pub fn to_pixel(percent: Percent, bounds: Rect) -> Point {
    let (fx, fy) = percent.fraction();
    Point::new(
        bounds.x0 + fx * bounds.width(),
        bounds.y0 + fy * bounds.height(),
    )
}

/// Convert container pixels into a percent position within `bounds`.
///
/// Each axis is clamped independently, so points outside `bounds` land on its edge.
/// A degenerate axis (zero extent) maps to `0`.
#[must_use]
pub fn to_percent(pixel: Point, bounds: Rect) -> Percent {
    let axis = |v: f64, start: f64, extent: f64| {
        if extent > 0.0 {
            (v - start) / extent * 100.0
        } else {
            0.0
        }
    };
    Percent::new(
        axis(pixel.x, bounds.x0, bounds.width()),
        axis(pixel.y, bounds.y0, bounds.height()),
    )
}

/// Size class of a hotspot marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HotspotSize {
    /// Compact marker.
    Small,
    /// Default marker.
    #[default]
    Medium,
    /// Large marker, for touch-first decks.
    Large,
}

impl HotspotSize {
    /// Marker diameter in pixels.
    #[must_use]
    pub const fn diameter(self) -> f64 {
        match self {
            Self::Small => 24.0,
            Self::Medium => 40.0,
            Self::Large => 56.0,
        }
    }
}

/// Visual style of a hotspot marker.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HotspotStyle {
    /// CSS-style color string.
    pub color: String,
    /// Whether the marker pulses to draw attention.
    pub pulse: bool,
}

impl Default for HotspotStyle {
    fn default() -> Self {
        Self {
            color: String::from("#2563eb"),
            pulse: true,
        }
    }
}

/// An author-placed interactive marker on background content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hotspot {
    /// Stable identifier.
    pub id: String,
    /// Position on the content; always within `[0, 100]` per axis.
    pub position: Percent,
    /// Size class.
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: HotspotSize,
    /// Marker style.
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: HotspotStyle,
}

impl Hotspot {
    /// Create a hotspot with default size and style.
    pub fn new(id: impl Into<String>, position: Percent) -> Self {
        Self {
            id: id.into(),
            position,
            size: HotspotSize::default(),
            style: HotspotStyle::default(),
        }
    }

    /// Centre of the marker in container pixels.
    #[must_use]
    pub fn pixel_center(&self, bounds: Rect) -> Point {
        to_pixel(self.position, bounds)
    }

    /// The marker's hit rectangle in container pixels.
    #[must_use]
    pub fn pixel_rect(&self, bounds: Rect) -> Rect {
        let r = self.size.diameter() / 2.0;
        let c = self.pixel_center(bounds);
        Rect::new(c.x - r, c.y - r, c.x + r, c.y + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(37.5, -12.0, 437.5, 213.0);

    #[test]
    fn percent_round_trips_through_pixels() {
        for x in (0..=100).step_by(5) {
            for y in (0..=100).step_by(5) {
                let p = Percent::new(f64::from(x), f64::from(y));
                let back = to_percent(to_pixel(p, BOUNDS), BOUNDS);
                assert!(back.approx_eq(p, 1e-9), "{p:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn outside_points_clamp_per_axis() {
        let p = to_percent(Point::new(-1000.0, 100.0), BOUNDS);
        assert_eq!(p.x(), 0.0);
        assert!(p.y() > 0.0 && p.y() < 100.0);

        let p = to_percent(Point::new(10_000.0, 10_000.0), BOUNDS);
        assert_eq!((p.x(), p.y()), (100.0, 100.0));
    }

    #[test]
    fn degenerate_bounds_do_not_produce_nan() {
        let p = to_percent(Point::new(5.0, 5.0), Rect::new(0.0, 0.0, 0.0, 10.0));
        assert_eq!(p.x(), 0.0);
        assert_eq!(p.y(), 50.0);
    }

    #[test]
    fn marker_rect_is_centred_on_position() {
        let h = Hotspot::new("a", Percent::CENTER);
        let r = h.pixel_rect(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(r.center(), Point::new(100.0, 50.0));
        assert_eq!(r.width(), HotspotSize::Medium.diameter());
    }
}
