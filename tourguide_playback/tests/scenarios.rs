// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end walkthrough scenarios across all Tourguide crates.

use kurbo::{Point, Rect, Size};
use tourguide_effects::{DispatchError, Effect, EffectSink, Quiz, TextBox, Ticket};
use tourguide_hotspot::{GestureEvent, HotspotPositioner, InteractionMode};
use tourguide_playback::{PlaybackController, PlaybackObserver};
use tourguide_timeline::{Deck, Element, InteractionEvent, Slide, TimelineModel, TimelineStep};
use tourguide_viewport::{CoordinateSpace, FitMode, Measure, Percent};

#[derive(Debug, Default)]
struct Shown(Vec<String>);

impl EffectSink for Shown {
    fn start(&mut self, _ticket: Ticket, effect: &Effect) {
        self.0.push(effect.describe());
    }
}

#[derive(Debug, Default)]
struct Nav {
    changed: Vec<usize>,
    skipped: Vec<usize>,
}

impl PlaybackObserver for Nav {
    fn step_changed(&mut self, index: usize, _step: &TimelineStep) {
        self.changed.push(index);
    }

    fn step_skipped(&mut self, index: usize, _step: &TimelineStep, error: &DispatchError) {
        assert!(matches!(error, DispatchError::InvalidEffectParameters { .. }));
        self.skipped.push(index);
    }
}

fn text(content: &str) -> Effect {
    Effect::Text(TextBox {
        content: content.into(),
        ..TextBox::default()
    })
}

fn single_slide(events: Vec<InteractionEvent>) -> Deck {
    Deck {
        slides: vec![Slide {
            id: "only".into(),
            elements: vec![Element {
                id: "el".into(),
                events,
                ..Element::default()
            }],
            ..Slide::default()
        }],
    }
}

#[test]
fn scenario_a_three_slides() {
    let deck = Deck {
        slides: ["welcome", "features", "pricing"]
            .into_iter()
            .map(|id| Slide {
                id: id.into(),
                elements: vec![Element {
                    id: "headline".into(),
                    events: vec![InteractionEvent::new("reveal", text(id))],
                    ..Element::default()
                }],
                ..Slide::default()
            })
            .collect(),
    };
    let model = TimelineModel::build(&deck);
    let steps: Vec<(u32, f64)> = model.steps().iter().map(|s| (s.number, s.timestamp)).collect();
    assert_eq!(steps, [(1, 0.0), (2, 1.0), (3, 2.0)]);
    assert_eq!(model, TimelineModel::build(&deck));
}

struct Page {
    container: Rect,
    image: Size,
}

impl Measure for Page {
    fn container_rect(&self) -> Option<Rect> {
        Some(self.container)
    }

    fn natural_size(&self) -> Option<Size> {
        Some(self.image)
    }
}

#[test]
fn scenario_b_drag_to_right_edge() {
    // A 1600x900 image letterboxed into a 800x600 container at (20, 40) on the page.
    let page = Page {
        container: Rect::new(20.0, 40.0, 820.0, 640.0),
        image: Size::new(1600.0, 900.0),
    };
    let mut space = CoordinateSpace::new(FitMode::Contain);
    let mut positioner: HotspotPositioner<&str> = HotspotPositioner::new(InteractionMode::Edit);

    let bounds = space.effective_bounds(&page).unwrap();
    assert!(!bounds.approximate);
    let start = Percent::new(50.0, 50.0);
    let press = tourguide_hotspot::to_pixel(start, bounds.rect);
    assert!(positioner.on_down(None, "logo", start, press, bounds, 0));

    let target = Point::new(bounds.rect.x1, bounds.rect.y0 + bounds.rect.height() / 2.0);
    let mut last = None;
    for (i, t) in (1..=8_u32).zip((16..).step_by(16)) {
        let fraction = f64::from(i) / 8.0;
        let pointer = press.lerp(target, fraction);
        let bounds = space.effective_bounds(&page);
        if let Some(event) = positioner.on_move(None, pointer, bounds, t) {
            last = Some(event);
        }
    }
    let Some(GestureEvent::PositionChanged { position, .. }) = last else {
        panic!("drag produced no position");
    };
    assert!(position.approx_eq(Percent::new(100.0, 50.0), 1e-9));

    let ended = positioner.on_up(None, target, space.effective_bounds(&page), 200);
    let Some(GestureEvent::DragEnded { position, .. }) = ended else {
        panic!("drag did not end");
    };
    assert!(position.approx_eq(Percent::new(100.0, 50.0), 1e-9));
    // One layout read for the whole gesture.
    assert_eq!(space.layout_reads(), 1);
}

#[test]
fn scenario_c_floor_and_duration_bound_the_advance() {
    let deck = single_slide(vec![
        InteractionEvent::new("first", text("first")).with_duration_ms(2000),
        InteractionEvent::new("second", text("second")),
    ]);
    let mut playback =
        PlaybackController::new(TimelineModel::build(&deck), Shown::default(), Nav::default());

    let began = 10_000;
    playback.play(began);
    let deadline = playback.next_deadline().unwrap();
    assert!((began + 1000..=began + 2000).contains(&deadline));

    playback.tick(deadline - 1);
    assert_eq!(playback.current_index(), Some(0));
    playback.tick(deadline);
    assert_eq!(playback.current_index(), Some(1));
    assert_eq!(playback.observer().changed, [0, 1]);
}

#[test]
fn scenario_d_one_option_quiz_is_skipped() {
    let broken = Effect::Quiz(Quiz {
        question: "Is this a quiz?".into(),
        options: vec!["Yes".into()],
        correct_index: 0,
        explanation: None,
    });
    let deck = single_slide(vec![
        InteractionEvent::new("intro", text("intro")),
        InteractionEvent::new("quiz", broken.clone()),
        InteractionEvent::new("outro", text("outro")),
    ]);
    let model = TimelineModel::build(&deck);

    let mut dispatcher = tourguide_effects::EffectDispatcher::new(Shown::default());
    assert!(matches!(
        dispatcher.dispatch("only:el:quiz", &broken),
        Err(DispatchError::InvalidEffectParameters { .. })
    ));

    let mut playback = PlaybackController::new(model, Shown::default(), Nav::default());
    playback.play(0);
    playback.next(100);
    assert_eq!(playback.current_index(), Some(2));
    assert_eq!(playback.observer().changed, [0, 1, 2]);
    assert_eq!(playback.observer().skipped, [1]);
    assert_eq!(playback.dispatcher().sink().0, ["Text: intro", "Text: outro"]);
}

#[test]
fn scenario_e_seek_past_end() {
    let deck = single_slide(
        ["a", "b", "c"]
            .into_iter()
            .map(|id| InteractionEvent::new(id, text(id)))
            .collect(),
    );
    let mut playback =
        PlaybackController::new(TimelineModel::build(&deck), Shown::default(), Nav::default());
    playback.play(0);
    playback.seek(5, 50);
    let snapshot = playback.snapshot();
    assert_eq!(snapshot.current_step_index, Some(2));
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.progress_percent, 100.0);
}

#[test]
fn deck_from_json_plays_through() {
    let deck: Deck = serde_json::from_str(
        r#"{
            "slides": [
                { "id": "s1", "elements": [{ "id": "a", "events": [
                    { "id": "e1", "effect": { "type": "show_text", "content": "One" }, "trigger": "auto" }
                ]}]},
                { "id": "s2", "elements": [{ "id": "b", "events": [
                    { "id": "e2", "effect": { "type": "Tooltip", "content": "Two" }, "durationMs": 1500 },
                    { "id": "e3", "effect": { "type": "spotlight" }, "trigger": "hover" }
                ]}]}
            ]
        }"#,
    )
    .unwrap();
    let model = TimelineModel::build(&deck);
    assert_eq!(model.len(), 2);

    let mut playback = PlaybackController::new(model, Shown::default(), ());
    playback.play(0);
    playback.tick(1000);
    playback.tick(2500);
    assert_eq!(playback.dispatcher().sink().0, ["Text: One", "Text: Two"]);
    assert!(!playback.is_playing());
    assert_eq!(playback.current_index(), Some(1));
}
