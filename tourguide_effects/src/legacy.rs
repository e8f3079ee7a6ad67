// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load-time migration of legacy effect tags.
//!
//! Content authored by older editors names effects with a zoo of tags
//! (`"highlight"`, `"show_text"`, `"PAN_ZOOM"`, `"youtube"`, ...). Every such tag is
//! mapped onto exactly one canonical [`EffectKind`] here, before anything else sees the
//! descriptor, so the dispatcher only ever handles canonical variants.
//!
//! Tags are normalized first: surrounding whitespace is trimmed, ASCII letters are
//! lower-cased, and `-` / spaces become `_`. The alias lists below are therefore
//! written in normalized form.

use serde::de::{Deserialize, Deserializer, Error as _};
use serde_json::Value;

use crate::{Effect, EffectKind};

/// Errors raised while loading a raw effect descriptor.
#[derive(Debug, thiserror::Error)]
pub enum EffectLoadError {
    /// The descriptor is not an object or lacks a string `"type"` field.
    #[error("effect descriptor has no \"type\" tag")]
    MissingTag,
    /// No canonical kind is known for the tag.
    #[error("unknown effect type {0:?}")]
    UnknownTag(String),
    /// The parameters do not have the shape of the canonical kind.
    #[error("malformed {kind} parameters: {source}")]
    Malformed {
        /// Kind the tag resolved to.
        kind: EffectKind,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Legacy spellings accepted for `kind`, in normalized form.
///
/// The exhaustive match is the migration table: adding an [`EffectKind`] variant does
/// not compile until its aliases are listed here.
#[must_use]
pub const fn legacy_aliases(kind: EffectKind) -> &'static [&'static str] {
    match kind {
        EffectKind::Spotlight => &["highlight", "spot", "spotlight_circle", "focus"],
        EffectKind::PanZoom => &["panzoom", "pan_and_zoom", "zoom", "pan", "zoom_to"],
        EffectKind::Text => &["show_text", "text_box", "textbox", "tooltip", "callout"],
        EffectKind::Audio => &["play_audio", "sound", "audio_clip", "narration"],
        EffectKind::Video => &["play_video", "youtube", "vimeo", "video_embed"],
        EffectKind::Quiz => &["question", "multiple_choice", "show_quiz"],
    }
}

fn normalize(tag: &str) -> String {
    tag.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Resolve any known tag, canonical or legacy, to its canonical kind.
#[must_use]
pub fn migrate_tag(tag: &str) -> Option<EffectKind> {
    let tag = normalize(tag);
    EffectKind::ALL
        .into_iter()
        .find(|k| k.canonical_tag() == tag || legacy_aliases(*k).contains(&tag.as_str()))
}

impl Effect {
    /// Decode a descriptor of the form `{"type": "<tag>", ...parameters}`, migrating
    /// legacy tags to their canonical kind.
    ///
    /// Missing parameters take their defaults; whether the result is usable is decided
    /// later by [`Effect::validate`].
    pub fn from_json(mut value: Value) -> Result<Self, EffectLoadError> {
        let object = value.as_object_mut().ok_or(EffectLoadError::MissingTag)?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(EffectLoadError::MissingTag)?;
        let kind = migrate_tag(tag).ok_or_else(|| EffectLoadError::UnknownTag(tag.to_owned()))?;
        if kind.canonical_tag() != tag {
            tracing::debug!(legacy = tag, canonical = kind.canonical_tag(), "migrated effect tag");
        }
        object.insert("type".into(), Value::from(kind.canonical_tag()));
        serde_json::from_value(value).map_err(|source| EffectLoadError::Malformed { kind, source })
    }
}

/// `deserialize_with` adapter that accepts legacy descriptors.
///
/// ```
/// use serde::Deserialize;
/// use tourguide_effects::{Effect, EffectKind};
///
/// #[derive(Deserialize)]
/// struct Event {
///     #[serde(deserialize_with = "tourguide_effects::deserialize_migrating")]
///     effect: Effect,
/// }
///
/// let ev: Event = serde_json::from_str(r#"{"effect": {"type": "SHOW-TEXT", "content": "Hi"}}"#).unwrap();
/// assert_eq!(ev.effect.kind(), EffectKind::Text);
/// ```
pub fn deserialize_migrating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Effect, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Effect::from_json(value).map_err(D::Error::custom)
}
