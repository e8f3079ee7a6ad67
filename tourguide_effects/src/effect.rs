// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical effect kinds and their parameters.

use core::fmt;

use serde::{Deserialize, Serialize};
use tourguide_viewport::Percent;

/// Discriminant of [`Effect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Dim everything except a highlighted region.
    Spotlight,
    /// Pan and zoom the background onto a point.
    PanZoom,
    /// Show a text box.
    Text,
    /// Play an audio clip.
    Audio,
    /// Play a video.
    Video,
    /// Ask a multiple-choice question.
    Quiz,
}

impl EffectKind {
    /// Every canonical kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Spotlight,
        Self::PanZoom,
        Self::Text,
        Self::Audio,
        Self::Video,
        Self::Quiz,
    ];

    /// The tag written for this kind in canonical descriptors.
    #[must_use]
    pub const fn canonical_tag(self) -> &'static str {
        match self {
            Self::Spotlight => "spotlight",
            Self::PanZoom => "pan_zoom",
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Quiz => "quiz",
        }
    }

    /// Human-readable label used for generated step descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spotlight => "Spotlight",
            Self::PanZoom => "Pan & zoom",
            Self::Text => "Text",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::Quiz => "Quiz",
        }
    }

    /// Whether playback should wait for this kind to report completion before
    /// auto-advancing.
    #[must_use]
    pub const fn awaits_completion(self) -> bool {
        matches!(self, Self::Quiz)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of a spotlight cut-out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotlightShape {
    /// Circle; `width` is the diameter and `height` is ignored by most renderers.
    #[default]
    Circle,
    /// Axis-aligned rectangle.
    Rectangle,
    /// Ellipse.
    Oval,
}

/// Spotlight parameters.
///
/// `width` and `height` are percentages of the content size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Spotlight {
    /// Cut-out shape.
    pub shape: SpotlightShape,
    /// Centre of the cut-out.
    pub center: Percent,
    /// Cut-out width.
    pub width: f64,
    /// Cut-out height.
    pub height: f64,
    /// How strongly the rest of the content is dimmed, in `[0, 100]`.
    pub dim_percent: f64,
}

impl Default for Spotlight {
    fn default() -> Self {
        Self {
            shape: SpotlightShape::Circle,
            center: Percent::CENTER,
            width: 20.0,
            height: 20.0,
            dim_percent: 70.0,
        }
    }
}

/// Pan-zoom parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanZoomTo {
    /// Point to centre.
    pub target: Percent,
    /// Zoom factor in `[0.1, 10]`.
    pub zoom: f64,
    /// Animate the transition instead of jumping.
    pub smooth: bool,
}

impl Default for PanZoomTo {
    fn default() -> Self {
        Self {
            target: Percent::CENTER,
            zoom: 2.0,
            smooth: true,
        }
    }
}

/// Text box parameters.
///
/// `width` and `height` are percentages of the content size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextBox {
    /// Text to show.
    pub content: String,
    /// Top-left corner of the box.
    pub position: Percent,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl Default for TextBox {
    fn default() -> Self {
        Self {
            content: String::new(),
            position: Percent::CENTER,
            width: 30.0,
            height: 15.0,
        }
    }
}

/// How an audio clip is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioDisplay {
    /// No visible player.
    #[default]
    Background,
    /// Compact player.
    Mini,
    /// Full player with transport controls.
    Full,
}

/// Audio parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioClip {
    /// Source URL.
    pub source: Option<String>,
    /// Presentation.
    pub display: AudioDisplay,
    /// Volume in `[0, 100]`.
    pub volume: f64,
    /// Loop until the step changes.
    #[serde(rename = "loop")]
    pub looped: bool,
}

impl Default for AudioClip {
    fn default() -> Self {
        Self {
            source: None,
            display: AudioDisplay::Background,
            volume: 80.0,
            looped: false,
        }
    }
}

/// Video hosting platforms that can be embedded by reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoPlatform {
    /// `YouTube` video id.
    Youtube,
    /// Vimeo video id.
    Vimeo,
}

/// Where a video comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoSource {
    /// An uploaded or hosted file.
    File {
        /// File URL.
        url: String,
    },
    /// A reference to a video on an external platform.
    Platform {
        /// Hosting platform.
        platform: VideoPlatform,
        /// Platform-specific video id.
        id: String,
    },
}

/// How a video is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoDisplay {
    /// Embedded over the content.
    #[default]
    Inline,
    /// In a modal dialog.
    Modal,
    /// Fullscreen.
    Fullscreen,
}

/// Video parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoClip {
    /// Video source.
    pub source: Option<VideoSource>,
    /// Presentation.
    pub display: VideoDisplay,
    /// Start offset in seconds.
    pub start_secs: Option<f64>,
    /// End offset in seconds.
    pub end_secs: Option<f64>,
}

/// Quiz parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Quiz {
    /// Question text.
    pub question: String,
    /// Answer options; at least two.
    pub options: Vec<String>,
    /// Index of the correct option.
    pub correct_index: usize,
    /// Shown after answering.
    pub explanation: Option<String>,
}

/// A canonical effect descriptor.
///
/// Only canonical variants exist at runtime; legacy descriptors are mapped onto these
/// by [`Effect::from_json`] when content is loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// See [`Spotlight`].
    Spotlight(Spotlight),
    /// See [`PanZoomTo`].
    PanZoom(PanZoomTo),
    /// See [`TextBox`].
    Text(TextBox),
    /// See [`AudioClip`].
    Audio(AudioClip),
    /// See [`VideoClip`].
    Video(VideoClip),
    /// See [`Quiz`].
    Quiz(Quiz),
}

impl Effect {
    /// The effect's kind.
    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        match self {
            Self::Spotlight(_) => EffectKind::Spotlight,
            Self::PanZoom(_) => EffectKind::PanZoom,
            Self::Text(_) => EffectKind::Text,
            Self::Audio(_) => EffectKind::Audio,
            Self::Video(_) => EffectKind::Video,
            Self::Quiz(_) => EffectKind::Quiz,
        }
    }

    /// Whether the rendering layer will report completion on its own (media ending,
    /// quiz answered). Looping audio never ends.
    #[must_use]
    pub const fn has_natural_end(&self) -> bool {
        match self {
            Self::Audio(a) => !a.looped,
            Self::Video(_) | Self::Quiz(_) => true,
            Self::Spotlight(_) | Self::PanZoom(_) | Self::Text(_) => false,
        }
    }

    /// A short description used when the author did not provide one.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Spotlight(s) => format!(
                "Spotlight at ({:.0}%, {:.0}%)",
                s.center.x(),
                s.center.y()
            ),
            Self::PanZoom(p) => format!(
                "Zoom {:.1}x to ({:.0}%, {:.0}%)",
                p.zoom,
                p.target.x(),
                p.target.y()
            ),
            Self::Text(t) if !t.content.trim().is_empty() => {
                let first = t.content.lines().next().unwrap_or_default();
                format!("Text: {first}")
            }
            Self::Quiz(q) if !q.question.trim().is_empty() => format!("Quiz: {}", q.question),
            other => format!("{} effect", other.kind()),
        }
    }
}
