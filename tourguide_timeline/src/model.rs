// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The derived step list.

use core::fmt;
use std::borrow::Cow;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{InteractionEvent, SourcedEvent, StepSource, Triggers};

/// Timeline derivation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Seconds added between consecutive steps on top of the previous step's duration.
    pub step_gap_secs: f64,
    /// Triggers whose events become steps.
    pub triggers: Triggers,
}

impl TimelineConfig {
    /// The default one-second gap between steps.
    pub const DEFAULT_STEP_GAP_SECS: f64 = 1.0;
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            step_gap_secs: Self::DEFAULT_STEP_GAP_SECS,
            triggers: Triggers::default(),
        }
    }
}

/// Which component of a step id was missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdComponent {
    /// The slide (or flat walkthrough) id.
    Slide,
    /// The element (or hotspot) id.
    Element,
    /// The event id.
    Event,
}

impl fmt::Display for IdComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Slide => "slide",
            Self::Element => "element",
            Self::Event => "event",
        })
    }
}

/// Data-quality problems found while building. The model is still built, using
/// generated ids where needed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildWarning {
    /// A step's source had an empty id component; `generated` was used instead.
    #[error("step {step}: missing {component} id, using {generated:?}")]
    MissingId {
        /// 1-based step number.
        step: u32,
        /// Which component was missing.
        component: IdComponent,
        /// The generated replacement.
        generated: String,
    },
    /// Two steps derived the same id; the later one was renamed.
    #[error("step {step}: duplicate id {id:?}, renamed to {renamed:?}")]
    DuplicateId {
        /// 1-based step number of the later step.
        step: u32,
        /// The conflicting id.
        id: String,
        /// The id assigned instead.
        renamed: String,
    },
    /// A flat event targets a hotspot that does not exist; it was dropped.
    #[error("event {event:?} targets unknown hotspot {target:?}")]
    UnknownTarget {
        /// The dropped event's id.
        event: String,
        /// The missing hotspot id.
        target: String,
    },
}

/// One entry of the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineStep {
    /// Unique id, `"<slide>:<element>:<event>"`.
    pub id: String,
    /// 1-based, contiguous step number.
    pub number: u32,
    /// Title; `"Step N"` when the source provides none.
    pub title: String,
    /// Description; derived from the effect when the source provides none.
    pub description: String,
    /// Index of the slide the event came from.
    pub slide_index: usize,
    /// Id of the owning element or hotspot.
    pub element_id: String,
    /// Offset of this step from the start of the timeline, in seconds.
    pub timestamp: f64,
    /// The originating event.
    pub event: InteractionEvent,
}

impl TimelineStep {
    /// The step's own duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.event.duration_ms
    }
}

/// Ordered, numbered playback steps derived from authored content.
///
/// The model is immutable: content changes produce a new model via
/// [`TimelineModel::build`]. Building twice from unchanged content yields identical
/// steps.
///
/// ```
/// use tourguide_effects::{Effect, TextBox};
/// use tourguide_timeline::{Deck, Element, InteractionEvent, Slide, TimelineModel};
///
/// let slide = |id: &str| Slide {
///     id: id.into(),
///     elements: vec![Element {
///         id: "title".into(),
///         events: vec![InteractionEvent::new(
///             "show",
///             Effect::Text(TextBox { content: id.into(), ..Default::default() }),
///         )],
///         ..Default::default()
///     }],
///     ..Default::default()
/// };
/// let deck = Deck { slides: vec![slide("intro"), slide("body"), slide("outro")] };
///
/// let model = TimelineModel::build(&deck);
/// let numbers: Vec<u32> = model.steps().iter().map(|s| s.number).collect();
/// let times: Vec<f64> = model.steps().iter().map(|s| s.timestamp).collect();
/// assert_eq!(numbers, [1, 2, 3]);
/// assert_eq!(times, [0.0, 1.0, 2.0]);
/// assert_eq!(model.steps()[1].id, "body:title:show");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineModel {
    steps: Vec<TimelineStep>,
    warnings: Vec<BuildWarning>,
    config: TimelineConfig,
}

impl TimelineModel {
    /// Build with the default configuration.
    #[must_use]
    pub fn build<S: StepSource + ?Sized>(source: &S) -> Self {
        Self::build_with(source, TimelineConfig::default())
    }

    /// Build with an explicit configuration.
    #[must_use]
    pub fn build_with<S: StepSource + ?Sized>(source: &S, config: TimelineConfig) -> Self {
        let mut warnings = Vec::new();
        let events = source.ordered_events(&mut warnings);
        let mut steps: Vec<TimelineStep> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut timestamp = 0.0;
        let gap = if config.step_gap_secs.is_finite() {
            config.step_gap_secs.max(0.0)
        } else {
            TimelineConfig::DEFAULT_STEP_GAP_SECS
        };

        for sourced in events {
            let included = sourced
                .event
                .trigger
                .flag()
                .is_some_and(|f| config.triggers.intersects(f));
            if !included {
                continue;
            }
            let number = u32::try_from(steps.len() + 1).unwrap_or(u32::MAX);
            let id = step_id(&sourced, number, &mut seen, &mut warnings);

            if let Some(prev) = steps.last() {
                let prev_secs = prev.duration_ms() as f64 / 1000.0;
                timestamp = prev.timestamp + prev_secs + gap;
            }

            let event = sourced.event;
            let title = event
                .title
                .as_deref()
                .or(sourced.element_title)
                .filter(|t| !t.trim().is_empty())
                .map_or_else(|| format!("Step {number}"), str::to_owned);
            let description = event
                .description
                .as_deref()
                .or(sourced.element_description)
                .filter(|d| !d.trim().is_empty())
                .map_or_else(|| event.effect.describe(), str::to_owned);

            steps.push(TimelineStep {
                id,
                number,
                title,
                description,
                slide_index: sourced.slide_index,
                element_id: sourced.element_id.to_owned(),
                timestamp,
                event: event.clone(),
            });
        }

        for warning in &warnings {
            tracing::warn!(%warning, "timeline build");
        }
        tracing::debug!(steps = steps.len(), warnings = warnings.len(), "timeline built");

        Self {
            steps,
            warnings,
            config,
        }
    }

    /// All steps, in order.
    #[must_use]
    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    /// The step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TimelineStep> {
        self.steps.get(index)
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if there are no steps; playback is disabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Data-quality warnings collected while building.
    #[must_use]
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// The configuration the model was built with.
    #[must_use]
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// End of the last step, in seconds: its timestamp plus its own duration.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.steps
            .last()
            .map_or(0.0, |s| s.timestamp + s.duration_ms() as f64 / 1000.0)
    }

    /// Index of the step playing at `secs`: the last step whose timestamp is not after it.
    ///
    /// Times before the first step map to `0`. Returns `None` for an empty timeline.
    #[must_use]
    pub fn index_at_time(&self, secs: f64) -> Option<usize> {
        if self.steps.is_empty() {
            return None;
        }
        let target = if secs.is_nan() { 0.0 } else { secs.max(0.0) };
        let after = self.steps.partition_point(|s| s.timestamp <= target);
        Some(after.saturating_sub(1))
    }

    /// Index of the first step that came from slide `slide_index`.
    #[must_use]
    pub fn first_step_of_slide(&self, slide_index: usize) -> Option<usize> {
        self.steps.iter().position(|s| s.slide_index == slide_index)
    }

    /// Index of the step with id `id`.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }
}

fn id_component<'a>(
    value: &'a str,
    fallback: impl FnOnce() -> String,
    component: IdComponent,
    step: u32,
    warnings: &mut Vec<BuildWarning>,
) -> Cow<'a, str> {
    if value.trim().is_empty() {
        let generated = fallback();
        warnings.push(BuildWarning::MissingId {
            step,
            component,
            generated: generated.clone(),
        });
        generated.into()
    } else {
        value.into()
    }
}

fn step_id(
    sourced: &SourcedEvent<'_>,
    number: u32,
    seen: &mut HashSet<String>,
    warnings: &mut Vec<BuildWarning>,
) -> String {
    let slide = id_component(
        sourced.slide_id,
        || format!("slide-{}", sourced.slide_index + 1),
        IdComponent::Slide,
        number,
        warnings,
    );
    let element = id_component(
        sourced.element_id,
        || format!("element-{number}"),
        IdComponent::Element,
        number,
        warnings,
    );
    let event = id_component(
        &sourced.event.id,
        || format!("event-{number}"),
        IdComponent::Event,
        number,
        warnings,
    );

    let id = format!("{slide}:{element}:{event}");
    if seen.insert(id.clone()) {
        return id;
    }
    let mut suffix = number;
    let renamed = loop {
        let candidate = format!("{id}#{suffix}");
        if seen.insert(candidate.clone()) {
            break candidate;
        }
        suffix = suffix.saturating_add(1);
    };
    warnings.push(BuildWarning::DuplicateId {
        step: number,
        id,
        renamed: renamed.clone(),
    });
    renamed
}
