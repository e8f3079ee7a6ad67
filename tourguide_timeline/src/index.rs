// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hotspot → events lookup for flat walkthroughs.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::{FlatWalkthrough, InteractionEvent};

/// Ordering key of an event in a flat list: step hint first, then source order.
/// Events without a hint sort after every hinted event.
pub(crate) fn order_key(event: &InteractionEvent, source_index: usize) -> (u32, usize) {
    (event.step.unwrap_or(u32::MAX), source_index)
}

/// Precomputed map from hotspot id to the indices of the events that target it.
///
/// Each list is in timeline order. Built once per content change; lookups never
/// scan the event list.
#[derive(Clone, Debug, Default)]
pub struct EventIndex {
    by_hotspot: HashMap<String, SmallVec<[usize; 4]>>,
    orphans: Vec<usize>,
}

impl EventIndex {
    /// Index `walkthrough.events` by target hotspot.
    ///
    /// Events whose target is not one of `walkthrough.hotspots` are collected in
    /// [`EventIndex::orphans`].
    #[must_use]
    pub fn new(walkthrough: &FlatWalkthrough) -> Self {
        let mut by_hotspot: HashMap<String, SmallVec<[usize; 4]>> = walkthrough
            .hotspots
            .iter()
            .map(|h| (h.id.clone(), SmallVec::new()))
            .collect();
        let mut orphans = Vec::new();
        for (i, event) in walkthrough.events.iter().enumerate() {
            match by_hotspot.get_mut(event.target_id.as_str()) {
                Some(list) => list.push(i),
                None => orphans.push(i),
            }
        }
        for list in by_hotspot.values_mut() {
            list.sort_by_key(|&i| order_key(&walkthrough.events[i], i));
        }
        Self {
            by_hotspot,
            orphans,
        }
    }

    /// Event indices targeting `hotspot`, in timeline order. Empty for unknown hotspots.
    #[must_use]
    pub fn events_for(&self, hotspot: &str) -> &[usize] {
        self.by_hotspot.get(hotspot).map_or(&[][..], |v| v.as_slice())
    }

    /// Returns `true` if `hotspot` was among the indexed hotspots.
    #[must_use]
    pub fn contains_hotspot(&self, hotspot: &str) -> bool {
        self.by_hotspot.contains_key(hotspot)
    }

    /// Indices of events whose target hotspot does not exist, in source order.
    #[must_use]
    pub fn orphans(&self) -> &[usize] {
        &self.orphans
    }

    /// Every attributed event index, in timeline order.
    #[must_use]
    pub fn ordered(&self, events: &[InteractionEvent]) -> Vec<usize> {
        let mut all: Vec<usize> = self.by_hotspot.values().flatten().copied().collect();
        all.sort_by_key(|&i| order_key(&events[i], i));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourguide_effects::{Effect, TextBox};
    use tourguide_hotspot::Hotspot;
    use tourguide_viewport::Percent;

    fn event(id: &str, target: &str, step: Option<u32>) -> InteractionEvent {
        let mut e = InteractionEvent::new(
            id,
            Effect::Text(TextBox {
                content: id.into(),
                ..TextBox::default()
            }),
        )
        .targeting(target);
        e.step = step;
        e
    }

    fn walkthrough() -> FlatWalkthrough {
        FlatWalkthrough {
            id: "tour".into(),
            hotspots: vec![
                Hotspot::new("a", Percent::new(10.0, 10.0)),
                Hotspot::new("b", Percent::new(90.0, 90.0)),
            ],
            events: vec![
                event("e0", "b", None),
                event("e1", "a", Some(2)),
                event("e2", "ghost", Some(1)),
                event("e3", "a", Some(1)),
                event("e4", "b", Some(3)),
            ],
        }
    }

    #[test]
    fn per_hotspot_lists_follow_step_hints() {
        let w = walkthrough();
        let index = EventIndex::new(&w);
        assert_eq!(index.events_for("a"), &[3, 1]);
        assert_eq!(index.events_for("b"), &[4, 0]);
        assert!(index.events_for("ghost").is_empty());
        assert!(!index.contains_hotspot("ghost"));
        assert_eq!(index.orphans(), &[2]);
    }

    #[test]
    fn ordered_skips_orphans() {
        let w = walkthrough();
        let index = EventIndex::new(&w);
        assert_eq!(index.ordered(&w.events), vec![3, 1, 4, 0]);
    }
}
