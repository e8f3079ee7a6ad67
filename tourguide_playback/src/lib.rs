// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tourguide_playback --heading-base-level=0

//! Tourguide Playback: playing a walkthrough timeline step by step.
//!
//! [`PlaybackController`] owns the current position in a
//! [`TimelineModel`](tourguide_timeline::TimelineModel) and the play/pause/stop state.
//! Each time the current step changes, it sends the step's effect through an
//! [`EffectDispatcher`](tourguide_effects::EffectDispatcher) and then tells its
//! [`PlaybackObserver`]. While playing, a single [`AdvanceTimer`] moves to the next step.
//!
//! Like the rest of Tourguide, nothing here reads a clock. Every operation that can arm
//! a timer takes the host's current time in milliseconds, and the host calls
//! [`PlaybackController::tick`] when [`PlaybackController::next_deadline`] comes due.
//!
//! Screen-reader notices go through an injected [`Announcer`]; see the [`announce`]
//! module.
//!
//! ## Minimal example
//!
//! ```rust
//! use tourguide_effects::{Effect, EffectSink, TextBox, Ticket};
//! use tourguide_playback::PlaybackController;
//! use tourguide_timeline::{Deck, Element, InteractionEvent, Slide, TimelineModel};
//!
//! struct Renderer;
//! impl EffectSink for Renderer {
//!     fn start(&mut self, _: Ticket, effect: &Effect) {
//!         println!("showing {}", effect.describe());
//!     }
//! }
//!
//! let text = |s: &str| Effect::Text(TextBox { content: s.into(), ..Default::default() });
//! let deck = Deck {
//!     slides: vec![Slide {
//!         id: "intro".into(),
//!         elements: vec![Element {
//!             id: "logo".into(),
//!             events: vec![
//!                 InteractionEvent::new("hello", text("Hello")),
//!                 InteractionEvent::new("bye", text("Bye")),
//!             ],
//!             ..Default::default()
//!         }],
//!         ..Default::default()
//!     }],
//! };
//!
//! let mut playback = PlaybackController::new(TimelineModel::build(&deck), Renderer, ());
//! playback.play(0);
//! assert_eq!(playback.next_deadline(), Some(1000));
//! playback.tick(1000);
//! assert_eq!(playback.current_index(), Some(1));
//! ```

pub mod announce;
mod controller;
mod timer;

pub use announce::{
    Announce, Announcer, AnnouncerConfig, LiveRegion, Politeness, SharedAnnouncer,
};
pub use controller::{
    PlaybackConfig, PlaybackController, PlaybackError, PlaybackObserver, PlaybackSnapshot,
    PlaybackState,
};
pub use timer::{AdvanceTimer, TimerHandle};
