// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tourguide_hotspot --heading-base-level=0

//! Tourguide Hotspot: placing and manipulating hotspots on background content.
//!
//! Hotspots are stored as [`Percent`](tourguide_viewport::Percent) positions so they
//! survive any container size, fit mode, or pan/zoom. This crate provides:
//!
//! - [`to_pixel`] / [`to_percent`]: conversion against a bounds rectangle, typically the
//!   visible bounds from [`tourguide_viewport::CoordinateSpace`]. `to_percent` clamps
//!   each axis, so `to_percent(to_pixel(p, b), b) ≈ p` for every valid `p`.
//! - [`Hotspot`], [`HotspotSize`], [`HotspotStyle`]: the hotspot data model.
//! - [`HotspotPositioner`]: the pointer gesture state machine recognizing taps,
//!   double-taps, drags and hold-to-edit. See the [`gesture`] module docs.
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use tourguide_hotspot::{to_percent, to_pixel};
//! use tourguide_viewport::Percent;
//!
//! let bounds = Rect::new(100.0, 0.0, 500.0, 300.0);
//! let pixel = to_pixel(Percent::new(50.0, 50.0), bounds);
//! assert_eq!(pixel, Point::new(300.0, 150.0));
//!
//! // Points outside the content clamp to its edge.
//! assert_eq!(to_percent(Point::new(900.0, 150.0), bounds), Percent::new(100.0, 50.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `tourguide_viewport`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `serde`: derives `Serialize`/`Deserialize` for the hotspot data model and
//!   [`GestureConfig`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod gesture;
mod position;

pub use gesture::{
    DragSession, GestureConfig, GestureEvent, GesturePhase, HotspotPositioner, InteractionMode,
    PointerId,
};
pub use position::{Hotspot, HotspotSize, HotspotStyle, to_percent, to_pixel};
