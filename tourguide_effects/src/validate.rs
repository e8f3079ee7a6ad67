// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parameter validation.

use crate::{AudioClip, Effect, EffectKind, PanZoomTo, Quiz, Spotlight, TextBox, VideoClip, VideoSource};

/// Why an effect's parameters cannot be dispatched.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParameterError {
    /// Spotlight dim percentage outside `[0, 100]`.
    #[error("dim percentage {0} is outside 0..=100")]
    DimOutOfRange(f64),
    /// A region with a non-positive width or height.
    #[error("{kind} region {width}x{height} must have a positive size")]
    EmptyRegion {
        /// Offending effect kind.
        kind: EffectKind,
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// Zoom factor outside `[0.1, 10]`.
    #[error("zoom factor {0} is outside 0.1..=10")]
    ZoomOutOfRange(f64),
    /// Text effect without content.
    #[error("text content is empty")]
    EmptyText,
    /// Media effect without a usable source.
    #[error("{0} effect has no source")]
    MissingSource(EffectKind),
    /// Audio volume outside `[0, 100]`.
    #[error("volume {0} is outside 0..=100")]
    VolumeOutOfRange(f64),
    /// A negative or non-finite video time bound.
    #[error("video time bound {0} must be a non-negative number of seconds")]
    InvalidTime(f64),
    /// Video start at or after its end.
    #[error("video start {start}s must precede its end {end}s")]
    InvertedTimeBounds {
        /// Start offset.
        start: f64,
        /// End offset.
        end: f64,
    },
    /// Quiz without a question.
    #[error("quiz question is empty")]
    EmptyQuestion,
    /// Quiz with fewer than two options.
    #[error("quiz needs at least 2 options, found {0}")]
    TooFewOptions(usize),
    /// Quiz whose correct answer does not name an option.
    #[error("correct answer index {index} is out of range for {len} options")]
    AnswerOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of options.
        len: usize,
    },
}

fn in_range(v: f64, lo: f64, hi: f64) -> bool {
    v.is_finite() && (lo..=hi).contains(&v)
}

fn region(kind: EffectKind, width: f64, height: f64) -> Result<(), ParameterError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::EmptyRegion {
            kind,
            width,
            height,
        })
    }
}

fn non_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

impl Effect {
    /// Check that the parameters describe something the rendering layer can show.
    pub fn validate(&self) -> Result<(), ParameterError> {
        match self {
            Self::Spotlight(s) => s.validate(),
            Self::PanZoom(p) => p.validate(),
            Self::Text(t) => t.validate(),
            Self::Audio(a) => a.validate(),
            Self::Video(v) => v.validate(),
            Self::Quiz(q) => q.validate(),
        }
    }
}

impl Spotlight {
    fn validate(&self) -> Result<(), ParameterError> {
        if !in_range(self.dim_percent, 0.0, 100.0) {
            return Err(ParameterError::DimOutOfRange(self.dim_percent));
        }
        region(EffectKind::Spotlight, self.width, self.height)
    }
}

impl PanZoomTo {
    fn validate(&self) -> Result<(), ParameterError> {
        if in_range(self.zoom, 0.1, 10.0) {
            Ok(())
        } else {
            Err(ParameterError::ZoomOutOfRange(self.zoom))
        }
    }
}

impl TextBox {
    fn validate(&self) -> Result<(), ParameterError> {
        if !non_blank(&self.content) {
            return Err(ParameterError::EmptyText);
        }
        region(EffectKind::Text, self.width, self.height)
    }
}

impl AudioClip {
    fn validate(&self) -> Result<(), ParameterError> {
        if !self.source.as_deref().is_some_and(non_blank) {
            return Err(ParameterError::MissingSource(EffectKind::Audio));
        }
        if !in_range(self.volume, 0.0, 100.0) {
            return Err(ParameterError::VolumeOutOfRange(self.volume));
        }
        Ok(())
    }
}

impl VideoClip {
    fn validate(&self) -> Result<(), ParameterError> {
        let has_source = match &self.source {
            Some(VideoSource::File { url }) => non_blank(url),
            Some(VideoSource::Platform { id, .. }) => non_blank(id),
            None => false,
        };
        if !has_source {
            return Err(ParameterError::MissingSource(EffectKind::Video));
        }
        for t in [self.start_secs, self.end_secs].into_iter().flatten() {
            if !t.is_finite() || t < 0.0 {
                return Err(ParameterError::InvalidTime(t));
            }
        }
        if let (Some(start), Some(end)) = (self.start_secs, self.end_secs)
            && start >= end
        {
            return Err(ParameterError::InvertedTimeBounds { start, end });
        }
        Ok(())
    }
}

impl Quiz {
    fn validate(&self) -> Result<(), ParameterError> {
        if !non_blank(&self.question) {
            return Err(ParameterError::EmptyQuestion);
        }
        let len = self.options.len();
        if len < 2 {
            return Err(ParameterError::TooFewOptions(len));
        }
        if self.correct_index >= len {
            return Err(ParameterError::AnswerOutOfRange {
                index: self.correct_index,
                len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SpotlightShape, VideoPlatform};
    use tourguide_viewport::Percent;

    fn quiz(options: &[&str], correct_index: usize) -> Effect {
        Effect::Quiz(Quiz {
            question: "Which one?".into(),
            options: options.iter().map(|s| (*s).to_owned()).collect(),
            correct_index,
            explanation: None,
        })
    }

    #[test]
    fn quiz_rules() {
        assert_eq!(quiz(&["a", "b"], 1).validate(), Ok(()));
        assert_eq!(
            quiz(&["only"], 0).validate(),
            Err(ParameterError::TooFewOptions(1))
        );
        assert_eq!(
            quiz(&["a", "b", "c"], 3).validate(),
            Err(ParameterError::AnswerOutOfRange { index: 3, len: 3 })
        );
        let blank = Quiz {
            options: vec!["a".into(), "b".into()],
            ..Quiz::default()
        };
        assert_eq!(
            Effect::Quiz(blank).validate(),
            Err(ParameterError::EmptyQuestion)
        );
    }

    #[test]
    fn zoom_bounds_are_inclusive() {
        for zoom in [0.1, 1.0, 10.0] {
            let e = Effect::PanZoom(PanZoomTo {
                zoom,
                ..PanZoomTo::default()
            });
            assert_eq!(e.validate(), Ok(()));
        }
        for zoom in [0.05, 10.5, f64::NAN] {
            let e = Effect::PanZoom(PanZoomTo {
                zoom,
                ..PanZoomTo::default()
            });
            assert!(matches!(e.validate(), Err(ParameterError::ZoomOutOfRange(_))));
        }
    }

    #[test]
    fn spotlight_rules() {
        let ok = Spotlight {
            shape: SpotlightShape::Rectangle,
            center: Percent::new(10.0, 90.0),
            width: 5.0,
            height: 8.0,
            dim_percent: 100.0,
        };
        assert_eq!(Effect::Spotlight(ok.clone()).validate(), Ok(()));
        let too_dark = Spotlight {
            dim_percent: 120.0,
            ..ok.clone()
        };
        assert_eq!(
            Effect::Spotlight(too_dark).validate(),
            Err(ParameterError::DimOutOfRange(120.0))
        );
        let flat = Spotlight { height: 0.0, ..ok };
        assert!(matches!(
            Effect::Spotlight(flat).validate(),
            Err(ParameterError::EmptyRegion { .. })
        ));
    }

    #[test]
    fn media_requires_a_source() {
        assert_eq!(
            Effect::Audio(AudioClip::default()).validate(),
            Err(ParameterError::MissingSource(EffectKind::Audio))
        );
        let loud = AudioClip {
            source: Some("narration.ogg".into()),
            volume: 101.0,
            ..AudioClip::default()
        };
        assert_eq!(
            Effect::Audio(loud).validate(),
            Err(ParameterError::VolumeOutOfRange(101.0))
        );
        assert_eq!(
            Effect::Video(VideoClip::default()).validate(),
            Err(ParameterError::MissingSource(EffectKind::Video))
        );
    }

    #[test]
    fn video_time_bounds() {
        let clip = |start_secs, end_secs| {
            Effect::Video(VideoClip {
                source: Some(VideoSource::Platform {
                    platform: VideoPlatform::Vimeo,
                    id: "76979871".into(),
                }),
                start_secs,
                end_secs,
                ..VideoClip::default()
            })
        };
        assert_eq!(clip(None, None).validate(), Ok(()));
        assert_eq!(clip(Some(1.0), Some(4.0)).validate(), Ok(()));
        assert_eq!(
            clip(Some(4.0), Some(4.0)).validate(),
            Err(ParameterError::InvertedTimeBounds {
                start: 4.0,
                end: 4.0
            })
        );
        assert_eq!(
            clip(Some(-1.0), None).validate(),
            Err(ParameterError::InvalidTime(-1.0))
        );
    }
}
