// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tourguide_timeline --heading-base-level=0

//! Tourguide Timeline: the ordered, numbered steps of a walkthrough.
//!
//! Authored content comes in two shapes:
//!
//! - a [`Deck`] of [`Slide`]s whose [`Element`]s carry their own [`InteractionEvent`]s,
//! - or a [`FlatWalkthrough`]: hotspots on one background plus a flat event list that
//!   refers to hotspots by id.
//!
//! Both implement [`StepSource`], so [`TimelineModel::build`] derives steps the same way
//! for either. Only events whose [`Trigger`] is in [`TimelineConfig::triggers`]
//! (click, auto and timeline by default) become steps. Steps are numbered from 1, and
//! each step's timestamp is the previous step's timestamp plus its duration plus a
//! fixed gap (one second by default), so timestamps never decrease.
//!
//! Identity problems (missing or duplicate ids, events pointing at hotspots that do not
//! exist) never fail a build; they are recorded as [`BuildWarning`]s and the model uses
//! generated ids instead.
//!
//! [`EventIndex`] is the precomputed hotspot → events map of a flat walkthrough, for
//! renderers that need a hotspot's events without scanning the whole list.

mod deck;
mod index;
mod model;
mod source;

pub use deck::{
    Deck, Element, FlatWalkthrough, InteractionEvent, Slide, Trigger, Triggers,
};
pub use index::EventIndex;
pub use model::{BuildWarning, IdComponent, TimelineConfig, TimelineModel, TimelineStep};
pub use source::{SourcedEvent, StepSource};
