// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Authored content: decks, slides, elements and their interaction events.

use core::fmt;

use serde::{Deserialize, Serialize};
use tourguide_effects::Effect;
use tourguide_hotspot::Hotspot;
use tourguide_viewport::Percent;

bitflags::bitflags! {
    /// Set of triggers whose events take part in the timeline.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Triggers: u8 {
        /// Fired by clicking the element.
        const CLICK    = 0b0001;
        /// Fired automatically when the step is reached.
        const AUTO     = 0b0010;
        /// Placed on the timeline explicitly.
        const TIMELINE = 0b0100;
        /// Fired on hover.
        const HOVER    = 0b1000;
    }
}

impl Default for Triggers {
    fn default() -> Self {
        Self::CLICK | Self::AUTO | Self::TIMELINE
    }
}

/// What fires an interaction event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Trigger {
    /// `"click"`
    #[default]
    Click,
    /// `"auto"`
    Auto,
    /// `"timeline"`
    Timeline,
    /// `"hover"`
    Hover,
    /// Any other trigger name, kept verbatim.
    Other(String),
}

impl Trigger {
    /// The flag for this trigger, or `None` for unrecognized triggers.
    #[must_use]
    pub fn flag(&self) -> Option<Triggers> {
        match self {
            Self::Click => Some(Triggers::CLICK),
            Self::Auto => Some(Triggers::AUTO),
            Self::Timeline => Some(Triggers::TIMELINE),
            Self::Hover => Some(Triggers::HOVER),
            Self::Other(_) => None,
        }
    }

    /// The trigger's name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Auto => "auto",
            Self::Timeline => "timeline",
            Self::Hover => "hover",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Trigger {
    fn from(name: String) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "click" => Self::Click,
            "auto" => Self::Auto,
            "timeline" => Self::Timeline,
            "hover" => Self::Hover,
            _ => Self::Other(name),
        }
    }
}

impl From<Trigger> for String {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One authored interaction: an effect fired on a hotspot or element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    /// Event id, unique within its element.
    #[serde(default)]
    pub id: String,
    /// Id of the owning hotspot or element. Only consulted by [`FlatWalkthrough`];
    /// events nested in an [`Element`] belong to that element.
    #[serde(default)]
    pub target_id: String,
    /// The effect; legacy effect tags are migrated while decoding.
    #[serde(deserialize_with = "tourguide_effects::deserialize_migrating")]
    pub effect: Effect,
    /// What fires the event.
    #[serde(default)]
    pub trigger: Trigger,
    /// 1-based ordering hint.
    #[serde(default)]
    pub step: Option<u32>,
    /// How long the step lasts, in milliseconds.
    #[serde(default)]
    pub duration_ms: u64,
    /// Step title.
    #[serde(default)]
    pub title: Option<String>,
    /// Step description.
    #[serde(default)]
    pub description: Option<String>,
}

impl InteractionEvent {
    /// A click-triggered event with no duration and no text.
    pub fn new(id: impl Into<String>, effect: Effect) -> Self {
        Self {
            id: id.into(),
            target_id: String::new(),
            effect,
            trigger: Trigger::Click,
            step: None,
            duration_ms: 0,
            title: None,
            description: None,
        }
    }

    /// Builder-style trigger setter.
    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Builder-style duration setter.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Builder-style target setter.
    #[must_use]
    pub fn targeting(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = target_id.into();
        self
    }
}

/// An element placed on a slide.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Element {
    /// Element id, unique within its slide.
    pub id: String,
    /// Used for step titles when an event has none.
    pub title: Option<String>,
    /// Used for step descriptions when an event has none.
    pub description: Option<String>,
    /// Anchor position on the slide.
    pub position: Percent,
    /// Events in authored order.
    pub events: Vec<InteractionEvent>,
}

/// A slide of a deck.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Slide {
    /// Slide id, unique within the deck.
    pub id: String,
    /// Slide title.
    pub title: Option<String>,
    /// Elements in stable order.
    pub elements: Vec<Element>,
}

/// An ordered deck of slides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Deck {
    /// Slides in deck order.
    pub slides: Vec<Slide>,
}

/// The single-background representation: hotspots plus a flat event list whose
/// events refer to hotspots by [`InteractionEvent::target_id`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlatWalkthrough {
    /// Walkthrough id; used as the slide component of step ids.
    pub id: String,
    /// Hotspots.
    pub hotspots: Vec<Hotspot>,
    /// Events in authored order.
    pub events: Vec<InteractionEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourguide_effects::EffectKind;

    #[test]
    fn triggers_parse_case_insensitively() {
        assert_eq!(Trigger::from(String::from("Click")), Trigger::Click);
        assert_eq!(Trigger::from(String::from(" timeline ")), Trigger::Timeline);
        assert_eq!(
            Trigger::from(String::from("scroll")),
            Trigger::Other("scroll".into())
        );
        assert_eq!(Trigger::Other("scroll".into()).flag(), None);
        assert_eq!(Trigger::Hover.flag(), Some(Triggers::HOVER));
        assert!(!Triggers::default().contains(Triggers::HOVER));
    }

    #[test]
    fn event_decodes_with_defaults_and_legacy_effect() {
        let event: InteractionEvent = serde_json::from_str(
            r#"{
                "id": "e1",
                "targetId": "h1",
                "effect": { "type": "tooltip", "content": "Look here" },
                "durationMs": 1500
            }"#,
        )
        .unwrap();
        assert_eq!(event.trigger, Trigger::Click);
        assert_eq!(event.step, None);
        assert_eq!(event.duration_ms, 1500);
        assert_eq!(event.effect.kind(), EffectKind::Text);
    }

    #[test]
    fn unknown_trigger_round_trips_verbatim() {
        let json = serde_json::to_string(&Trigger::Other("longPress".into())).unwrap();
        assert_eq!(json, r#""longPress""#);
        let back: Trigger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Trigger::Other("longPress".into()));
    }
}
