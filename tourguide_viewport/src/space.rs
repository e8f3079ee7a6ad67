// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small controller that caches layout measurements and visible bounds.

use kurbo::{Point, Rect, Size};

use crate::{FitMode, PanZoom, visible_bounds};

/// Layout reads provided by the host.
///
/// These are assumed to be comparatively expensive (for example a DOM
/// `getBoundingClientRect` or a layout pass), which is why [`CoordinateSpace`]
/// caches their results.
pub trait Measure {
    /// The container's rectangle in pointer-event coordinates, or `None` if it has not
    /// been laid out yet.
    fn container_rect(&self) -> Option<Rect>;

    /// Intrinsic size of the background content, or `None` if it has not loaded yet.
    fn natural_size(&self) -> Option<Size>;
}

/// Why cached layout measurements are being discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Invalidation {
    /// The container or window was resized.
    Resize,
    /// The device orientation changed.
    Orientation,
    /// An ancestor scrolled, moving the container in pointer coordinates.
    Scroll,
    /// New background content finished loading.
    ContentLoaded,
}

/// Bounds usable for coordinate conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Rectangle in container pixels.
    pub rect: Rect,
    /// `true` if this is the raw container rectangle standing in for content bounds
    /// that could not be measured yet.
    pub approximate: bool,
}

#[derive(Clone, Copy, Debug)]
struct Measured {
    container: Rect,
    natural: Size,
}

/// Cached view of background content geometry inside a container.
///
/// This type:
/// - owns the [`FitMode`] and live [`PanZoom`] transform,
/// - reads layout through a [`Measure`] implementation at most once per invalidation,
/// - caches the last computed visible bounds until the transform or fit mode changes.
///
/// Measurements that are still incomplete (container not laid out, content not loaded)
/// are never cached, so content that is loading is picked up as soon as it reports a size.
#[derive(Clone, Debug)]
pub struct CoordinateSpace {
    fit: FitMode,
    transform: PanZoom,

    measured: Option<Measured>,
    bounds: Option<Option<Rect>>,
    reads: u64,
}

impl CoordinateSpace {
    /// Creates a space with the given fit mode and no pan/zoom.
    #[must_use]
    pub fn new(fit: FitMode) -> Self {
        Self {
            fit,
            transform: PanZoom::IDENTITY,
            measured: None,
            bounds: None,
            reads: 0,
        }
    }

    /// Returns the current fit mode.
    #[must_use]
    pub const fn fit_mode(&self) -> FitMode {
        self.fit
    }

    /// Sets the fit mode.
    pub fn set_fit_mode(&mut self, fit: FitMode) {
        if fit != self.fit {
            self.fit = fit;
            self.bounds = None;
        }
    }

    /// Returns the current pan/zoom transform.
    #[must_use]
    pub const fn transform(&self) -> PanZoom {
        self.transform
    }

    /// Sets the pan/zoom transform. Does not re-measure layout.
    pub fn set_transform(&mut self, transform: PanZoom) {
        if transform != self.transform {
            self.transform = transform;
            self.bounds = None;
        }
    }

    /// Discards cached measurements; the next query reads layout again.
    pub fn invalidate(&mut self, reason: Invalidation) {
        tracing::trace!(?reason, "coordinate space invalidated");
        self.measured = None;
        self.bounds = None;
    }

    /// Number of layout reads performed so far.
    #[must_use]
    pub const fn layout_reads(&self) -> u64 {
        self.reads
    }

    fn measure(&mut self, source: &impl Measure) -> (Option<Rect>, Option<Size>) {
        if let Some(m) = self.measured {
            return (Some(m.container), Some(m.natural));
        }
        self.reads += 1;
        let container = source.container_rect();
        let natural = source.natural_size();
        if let (Some(container), Some(natural)) = (container, natural) {
            tracing::trace!(?container, ?natural, "layout measured");
            self.measured = Some(Measured { container, natural });
        }
        (container, natural)
    }

    /// The container rectangle in pointer-event coordinates.
    pub fn container_rect(&mut self, source: &impl Measure) -> Option<Rect> {
        self.measure(source).0
    }

    /// Visible rectangle of the content in container pixels.
    ///
    /// Returns `None` while the container or content cannot be measured.
    pub fn visible_bounds(&mut self, source: &impl Measure) -> Option<Rect> {
        if let Some(cached) = self.bounds {
            return cached;
        }
        let (container, natural) = self.measure(source);
        let (Some(container), Some(natural)) = (container, natural) else {
            return None;
        };
        let bounds = visible_bounds(container.size(), natural, self.fit, self.transform);
        // Only complete measurements are worth remembering.
        if self.measured.is_some() {
            self.bounds = Some(bounds);
        }
        bounds
    }

    /// Bounds for coordinate conversion, degrading to the raw container rectangle when
    /// the content cannot be measured yet.
    ///
    /// Returns `None` only if the container itself has no usable size.
    pub fn effective_bounds(&mut self, source: &impl Measure) -> Option<Bounds> {
        if let Some(rect) = self.visible_bounds(source) {
            return Some(Bounds {
                rect,
                approximate: false,
            });
        }
        let container = self.container_rect(source)?;
        let size = container.size();
        if !(size.width > 0.0 && size.height > 0.0) {
            return None;
        }
        tracing::debug!(?size, "content bounds unavailable, using container rectangle");
        Some(Bounds {
            rect: size.to_rect(),
            approximate: true,
        })
    }

    /// Converts a point in pointer-event coordinates to container pixels.
    pub fn to_container(&mut self, source: &impl Measure, point: Point) -> Option<Point> {
        let container = self.container_rect(source)?;
        Some(point - container.origin().to_vec2())
    }
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::new(FitMode::default())
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use kurbo::{Point, Rect, Size};

    use super::{CoordinateSpace, Invalidation, Measure};
    use crate::{FitMode, PanZoom};

    struct Layout {
        container: Option<Rect>,
        natural: Option<Size>,
        reads: Cell<u32>,
    }

    impl Measure for Layout {
        fn container_rect(&self) -> Option<Rect> {
            self.reads.set(self.reads.get() + 1);
            self.container
        }

        fn natural_size(&self) -> Option<Size> {
            self.natural
        }
    }

    fn layout(natural: Option<Size>) -> Layout {
        Layout {
            container: Some(Rect::new(10.0, 20.0, 410.0, 320.0)),
            natural,
            reads: Cell::new(0),
        }
    }

    #[test]
    fn measurements_are_cached_until_invalidated() {
        let layout = layout(Some(Size::new(800.0, 600.0)));
        let mut space = CoordinateSpace::new(FitMode::Contain);

        let a = space.visible_bounds(&layout);
        let b = space.visible_bounds(&layout);
        assert_eq!(a, b);
        assert_eq!(layout.reads.get(), 1);

        // Transform changes recompute bounds without re-measuring.
        space.set_transform(PanZoom::new(5.0, 0.0, 1.0));
        let c = space.visible_bounds(&layout).unwrap();
        assert_eq!(c.x0, 5.0);
        assert_eq!(layout.reads.get(), 1);

        space.invalidate(Invalidation::Resize);
        let _ = space.visible_bounds(&layout);
        assert_eq!(layout.reads.get(), 2);
        assert_eq!(space.layout_reads(), 2);
    }

    #[test]
    fn loading_content_degrades_to_container() {
        let layout = layout(None);
        let mut space = CoordinateSpace::default();

        assert!(space.visible_bounds(&layout).is_none());
        let bounds = space.effective_bounds(&layout).unwrap();
        assert!(bounds.approximate);
        assert_eq!(bounds.rect, Rect::new(0.0, 0.0, 400.0, 300.0));

        // Incomplete measurements are re-read on the next query.
        let before = layout.reads.get();
        let _ = space.visible_bounds(&layout);
        assert!(layout.reads.get() > before);
    }

    #[test]
    fn unlaid_container_has_no_bounds() {
        let layout = Layout {
            container: None,
            natural: Some(Size::new(10.0, 10.0)),
            reads: Cell::new(0),
        };
        let mut space = CoordinateSpace::default();
        assert!(space.effective_bounds(&layout).is_none());
    }

    #[test]
    fn pointer_points_are_made_container_relative() {
        let layout = layout(Some(Size::new(800.0, 600.0)));
        let mut space = CoordinateSpace::default();
        let p = space.to_container(&layout, Point::new(110.0, 70.0)).unwrap();
        assert_eq!(p, Point::new(100.0, 50.0));
    }
}
