// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tourguide_viewport --heading-base-level=0

//! Tourguide Viewport: where background content actually sits inside its container.
//!
//! A walkthrough places hotspots on a background image using resolution-independent
//! percentages. To turn those percentages into pixels, callers need the rectangle the
//! content occupies on screen, which depends on:
//!
//! - the container size and the content's intrinsic (natural) size,
//! - the [`FitMode`] (`contain` letterboxes, `cover` crops),
//! - and the live [`PanZoom`] transform applied on top of the fitted content.
//!
//! [`visible_bounds`] is the pure function for that computation. [`CoordinateSpace`]
//! wraps it with a measurement cache: layout reads go through the host's [`Measure`]
//! implementation and are only repeated after an explicit [`Invalidation`], so a drag
//! can query bounds on every pointer move without re-measuring the layout.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use tourguide_viewport::{FitMode, PanZoom, visible_bounds};
//!
//! // A 200x100 image letterboxed into a 400x400 container.
//! let bounds = visible_bounds(
//!     Size::new(400.0, 400.0),
//!     Size::new(200.0, 100.0),
//!     FitMode::Contain,
//!     PanZoom::IDENTITY,
//! )
//! .unwrap();
//! assert_eq!(bounds, Rect::new(0.0, 100.0, 400.0, 300.0));
//!
//! // Nothing is measurable until the image has loaded.
//! assert!(visible_bounds(Size::new(400.0, 400.0), Size::ZERO, FitMode::Contain, PanZoom::IDENTITY).is_none());
//! ```
//!
//! All pixel values are relative to the container's top-left corner unless a method
//! says otherwise. Percent positions use [`Percent`], whose axes are always within
//! `[0, 100]`.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point math.
//! - `serde`: derives `Serialize`/`Deserialize` for [`Percent`], [`FitMode`] and [`PanZoom`].
//!
//! This crate is `no_std`.

#![no_std]

mod fit;
mod percent;
mod space;

pub use fit::{FitMode, PanZoom, fitted_rect, visible_bounds};
pub use percent::Percent;
pub use space::{Bounds, CoordinateSpace, Invalidation, Measure};
