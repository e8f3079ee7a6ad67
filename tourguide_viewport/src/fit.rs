// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fit-mode scaling and the pan/zoom transform composed on top of it.

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::Percent;

/// How background content is scaled into its container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FitMode {
    /// Scale uniformly so the whole content fits; the container may show empty bands.
    #[default]
    Contain,
    /// Scale uniformly so the content fills the container; overflow is cropped.
    Cover,
}

impl FitMode {
    /// Uniform scale factor mapping `natural` into `container` under this mode.
    ///
    /// Callers must ensure both sizes are non-empty.
    #[must_use]
    pub fn scale(self, container: Size, natural: Size) -> f64 {
        let sx = container.width / natural.width;
        let sy = container.height / natural.height;
        match self {
            Self::Contain => sx.min(sy),
            Self::Cover => sx.max(sy),
        }
    }
}

/// Pan/zoom transform applied to fitted content.
///
/// The content is scaled by `scale` about the container centre and then translated by
/// `(translate_x, translate_y)` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanZoom {
    /// Horizontal translation in pixels.
    pub translate_x: f64,
    /// Vertical translation in pixels.
    pub translate_y: f64,
    /// Uniform zoom factor.
    pub scale: f64,
}

impl PanZoom {
    /// No pan, no zoom.
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Smallest supported zoom factor.
    pub const MIN_SCALE: f64 = 0.1;
    /// Largest supported zoom factor.
    pub const MAX_SCALE: f64 = 10.0;

    /// Create a transform, clamping `scale` into [`MIN_SCALE`](Self::MIN_SCALE)..=[`MAX_SCALE`](Self::MAX_SCALE).
    #[must_use]
    pub fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            scale: clamp_scale(scale),
        }
    }

    /// Translation as a vector.
    #[must_use]
    pub const fn translation(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    /// Returns `true` if this transform leaves content where fitting put it.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// The transform as an affine map in container space.
    #[must_use]
    pub fn affine(&self, container: Size) -> Affine {
        let c = container.to_rect().center();
        let s = self.scale;
        Affine::new([
            s,
            0.0,
            0.0,
            s,
            c.x - s * c.x + self.translate_x,
            c.y - s * c.y + self.translate_y,
        ])
    }

    /// Pan by `delta` pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate_x += delta.x;
        self.translate_y += delta.y;
    }

    /// Multiply the zoom by `factor`, keeping the content point under `anchor` fixed.
    ///
    /// `anchor` is in container pixels. The resulting scale is clamped, and the
    /// anchor compensation uses the clamped value.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64, container: Size) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let c = container.to_rect().center();
        let old = self.scale;
        let new = clamp_scale(old * factor);
        // Content offset (from the centre) currently under the anchor.
        let under = (anchor - c - self.translation()) / old;
        let t = anchor - c - under * new;
        self.translate_x = t.x;
        self.translate_y = t.y;
        self.scale = new;
    }

    /// The transform that centres `target` of the untransformed `base` content in the
    /// container, zoomed by `zoom`.
    ///
    /// `base` is the fitted content rectangle (see [`fitted_rect`]).
    #[must_use]
    pub fn focus(target: Percent, zoom: f64, container: Size, base: Rect) -> Self {
        let zoom = clamp_scale(zoom);
        let (fx, fy) = target.fraction();
        let point = Point::new(
            base.x0 + fx * base.width(),
            base.y0 + fy * base.height(),
        );
        let c = container.to_rect().center();
        let t = (c - point) * zoom;
        Self {
            translate_x: t.x,
            translate_y: t.y,
            scale: zoom,
        }
    }
}

impl Default for PanZoom {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(PanZoom::MIN_SCALE, PanZoom::MAX_SCALE)
    } else {
        1.0
    }
}

fn is_measurable(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// The rectangle fitted content occupies in the container, before pan/zoom.
///
/// Returns `None` if either size is empty or not finite.
#[must_use]
pub fn fitted_rect(container: Size, natural: Size, fit: FitMode) -> Option<Rect> {
    if !is_measurable(container) || !is_measurable(natural) {
        return None;
    }
    let scale = fit.scale(container, natural);
    let size = Size::new(natural.width * scale, natural.height * scale);
    let origin = Point::new(
        (container.width - size.width) / 2.0,
        (container.height - size.height) / 2.0,
    );
    Some(Rect::from_origin_size(origin, size))
}

/// Visible rectangle of background content inside a container, in container pixels.
///
/// Content is fitted according to `fit`, centred, and then `transform` is applied.
/// Returns `None` while the container or content cannot be measured yet, or if the
/// transform collapses the content to nothing.
#[must_use]
pub fn visible_bounds(
    container: Size,
    natural: Size,
    fit: FitMode,
    transform: PanZoom,
) -> Option<Rect> {
    let fitted = fitted_rect(container, natural, fit)?;
    if !transform.scale.is_finite() || transform.scale <= 0.0 {
        return None;
    }
    let rect = if transform.is_identity() {
        fitted
    } else {
        transform_rect_bbox(transform.affine(container), fitted)
    };
    (rect.width() > 0.0 && rect.height() > 0.0).then_some(rect)
}

/// Transform an axis-aligned `Rect` by an `Affine` and return the axis-aligned
/// bounding box of the result.
pub(crate) fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rect_eq(a: Rect, b: Rect) {
        let eps = 1e-9;
        assert!(
            (a.x0 - b.x0).abs() < eps
                && (a.y0 - b.y0).abs() < eps
                && (a.x1 - b.x1).abs() < eps
                && (a.y1 - b.y1).abs() < eps,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn contain_letterboxes_wide_content() {
        let r = fitted_rect(
            Size::new(400.0, 400.0),
            Size::new(800.0, 400.0),
            FitMode::Contain,
        )
        .unwrap();
        assert_rect_eq(r, Rect::new(0.0, 100.0, 400.0, 300.0));
    }

    #[test]
    fn cover_crops_wide_content() {
        let r = fitted_rect(
            Size::new(400.0, 400.0),
            Size::new(800.0, 400.0),
            FitMode::Cover,
        )
        .unwrap();
        assert_rect_eq(r, Rect::new(-200.0, 0.0, 600.0, 400.0));
    }

    #[test]
    fn unmeasured_sizes_have_no_bounds() {
        let container = Size::new(400.0, 300.0);
        assert!(visible_bounds(container, Size::ZERO, FitMode::Contain, PanZoom::IDENTITY).is_none());
        assert!(
            visible_bounds(Size::ZERO, container, FitMode::Cover, PanZoom::IDENTITY).is_none()
        );
        assert!(
            visible_bounds(
                container,
                Size::new(f64::NAN, 10.0),
                FitMode::Contain,
                PanZoom::IDENTITY
            )
            .is_none()
        );
    }

    #[test]
    fn zoom_scales_about_container_centre() {
        let container = Size::new(400.0, 400.0);
        let natural = Size::new(400.0, 400.0);
        let r = visible_bounds(container, natural, FitMode::Contain, PanZoom::new(0.0, 0.0, 2.0))
            .unwrap();
        assert_rect_eq(r, Rect::new(-200.0, -200.0, 600.0, 600.0));
    }

    #[test]
    fn translate_is_applied_after_zoom() {
        let container = Size::new(400.0, 400.0);
        let natural = Size::new(400.0, 400.0);
        let r = visible_bounds(
            container,
            natural,
            FitMode::Contain,
            PanZoom::new(50.0, -25.0, 2.0),
        )
        .unwrap();
        assert_rect_eq(r, Rect::new(-150.0, -225.0, 650.0, 575.0));
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let container = Size::new(400.0, 300.0);
        let natural = Size::new(800.0, 600.0);
        let mut pz = PanZoom::new(10.0, 20.0, 1.5);
        let anchor = Point::new(120.0, 80.0);

        let before = visible_bounds(container, natural, FitMode::Contain, pz).unwrap();
        let fx = (anchor.x - before.x0) / before.width();
        let fy = (anchor.y - before.y0) / before.height();

        pz.zoom_about(anchor, 2.0, container);
        assert!((pz.scale - 3.0).abs() < 1e-12);

        let after = visible_bounds(container, natural, FitMode::Contain, pz).unwrap();
        let ax = after.x0 + fx * after.width();
        let ay = after.y0 + fy * after.height();
        assert!((ax - anchor.x).abs() < 1e-9);
        assert!((ay - anchor.y).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut pz = PanZoom::IDENTITY;
        pz.zoom_about(Point::ZERO, 1000.0, Size::new(100.0, 100.0));
        assert_eq!(pz.scale, PanZoom::MAX_SCALE);
        assert_eq!(PanZoom::new(0.0, 0.0, 0.0).scale, PanZoom::MIN_SCALE);
    }

    #[test]
    fn focus_centres_target() {
        let container = Size::new(400.0, 400.0);
        let natural = Size::new(400.0, 400.0);
        let base = fitted_rect(container, natural, FitMode::Contain).unwrap();
        let pz = PanZoom::focus(Percent::new(25.0, 75.0), 2.0, container, base);
        let r = visible_bounds(container, natural, FitMode::Contain, pz).unwrap();
        let x = r.x0 + 0.25 * r.width();
        let y = r.y0 + 0.75 * r.height();
        assert!((x - 200.0).abs() < 1e-9);
        assert!((y - 200.0).abs() < 1e-9);
    }
}
