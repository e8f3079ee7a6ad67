// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bridging content representations into one event stream.

use crate::{BuildWarning, Deck, EventIndex, FlatWalkthrough, InteractionEvent};

/// An event together with where it came from.
#[derive(Clone, Copy, Debug)]
pub struct SourcedEvent<'a> {
    /// Index of the owning slide.
    pub slide_index: usize,
    /// Id of the owning slide.
    pub slide_id: &'a str,
    /// Id of the owning element or hotspot.
    pub element_id: &'a str,
    /// Owning element's title, if any.
    pub element_title: Option<&'a str>,
    /// Owning element's description, if any.
    pub element_description: Option<&'a str>,
    /// The event.
    pub event: &'a InteractionEvent,
}

/// Content that can be turned into a timeline.
///
/// Implementations yield every event in timeline order. Trigger filtering, numbering,
/// ids and timestamps are applied by [`TimelineModel`](crate::TimelineModel), so all
/// representations share one derivation.
pub trait StepSource {
    /// Events in timeline order.
    ///
    /// Events that cannot be attributed to an owner are left out and reported in
    /// `warnings`.
    fn ordered_events<'a>(&'a self, warnings: &mut Vec<BuildWarning>) -> Vec<SourcedEvent<'a>>;
}

impl StepSource for Deck {
    /// Slides in deck order, then elements in stable order, then each element's events.
    fn ordered_events<'a>(&'a self, _warnings: &mut Vec<BuildWarning>) -> Vec<SourcedEvent<'a>> {
        let mut out = Vec::new();
        for (slide_index, slide) in self.slides.iter().enumerate() {
            for element in &slide.elements {
                out.extend(element.events.iter().map(|event| SourcedEvent {
                    slide_index,
                    slide_id: &slide.id,
                    element_id: &element.id,
                    element_title: element.title.as_deref(),
                    element_description: element.description.as_deref(),
                    event,
                }));
            }
        }
        out
    }
}

impl StepSource for FlatWalkthrough {
    /// Events ordered by step hint, then source order, each attributed to its target
    /// hotspot. The whole walkthrough is slide `0`.
    fn ordered_events<'a>(&'a self, warnings: &mut Vec<BuildWarning>) -> Vec<SourcedEvent<'a>> {
        let index = EventIndex::new(self);
        for &i in index.orphans() {
            let event = &self.events[i];
            warnings.push(BuildWarning::UnknownTarget {
                event: event.id.clone(),
                target: event.target_id.clone(),
            });
        }
        index
            .ordered(&self.events)
            .into_iter()
            .map(|i| {
                let event = &self.events[i];
                SourcedEvent {
                    slide_index: 0,
                    slide_id: &self.id,
                    element_id: &event.target_id,
                    element_title: None,
                    element_description: None,
                    event,
                }
            })
            .collect()
    }
}
