// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tourguide_effects --heading-base-level=0

//! Tourguide Effects: what a walkthrough step does when it becomes current.
//!
//! Every step carries exactly one [`Effect`], drawn from a closed set of canonical kinds:
//!
//! - [`Spotlight`]: dim the background except for a shaped cut-out,
//! - [`PanZoomTo`]: move the camera onto a point,
//! - [`TextBox`], [`AudioClip`], [`VideoClip`],
//! - and [`Quiz`], which holds playback until the viewer answers.
//!
//! Content written by older editors uses many other tags for the same things. Those are
//! migrated once, at load time, by [`Effect::from_json`] (or the [`deserialize_migrating`]
//! adapter); [`legacy_aliases`] is the full migration table.
//!
//! The crate does not render anything. [`EffectDispatcher`] validates parameters, assigns
//! a [`Ticket`] and hands the effect to the host's [`EffectSink`]; the host reports
//! completions (media ended, quiz answered) back through the dispatcher.
//!
//! ## Minimal example
//!
//! ```rust
//! use serde_json::json;
//! use tourguide_effects::{Effect, EffectKind, ParameterError};
//!
//! let effect = Effect::from_json(json!({ "type": "highlight", "dimPercent": 40 })).unwrap();
//! assert_eq!(effect.kind(), EffectKind::Spotlight);
//! assert!(effect.validate().is_ok());
//!
//! let zoom = Effect::from_json(json!({ "type": "zoom", "zoom": 40 })).unwrap();
//! assert_eq!(zoom.validate(), Err(ParameterError::ZoomOutOfRange(40.0)));
//! ```

mod effect;
mod legacy;
mod validate;

pub mod dispatcher;

pub use dispatcher::{
    Completion, DispatchError, EffectDispatcher, EffectSink, Outcome, Ticket,
};
pub use effect::{
    AudioClip, AudioDisplay, Effect, EffectKind, PanZoomTo, Quiz, Spotlight, SpotlightShape,
    TextBox, VideoClip, VideoDisplay, VideoPlatform, VideoSource,
};
pub use legacy::{EffectLoadError, deserialize_migrating, legacy_aliases, migrate_tag};
pub use validate::ParameterError;
