// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playback controller: the current step, play/pause/stop, and auto-advance.
//!
//! ## States
//!
//! - `Stopped`: not playing. Reached from any state via [`PlaybackController::stop`],
//!   which returns to step 0, or by playing past the last step, which keeps the last step
//!   presented. `play` from that finished state starts over at step 0.
//! - `Playing`: an auto-advance is armed for the current step, unless the step's effect
//!   awaits completion (a quiz), in which case the advance is armed once
//!   [`PlaybackController::complete`] reports it.
//! - `Paused`: the index is fixed and no advance is armed.
//!
//! ## Ordering
//!
//! Every time the index changes, the new step's effect goes to the [`EffectDispatcher`]
//! and then the observer's [`PlaybackObserver::step_changed`] runs, in that order, before
//! anything else happens. A step whose effect is rejected is still visited this way, then
//! reported through [`PlaybackObserver::step_skipped`], and playback moves on to the
//! following step in the direction of travel.
//!
//! ## Timing
//!
//! At most one auto-advance is ever pending; see [`AdvanceTimer`]. Its delay is the
//! current step's own duration divided by the speed multiplier, but never shorter than
//! [`PlaybackConfig::min_advance_ms`]. Hosts drive time through
//! [`PlaybackController::tick`] and may use [`PlaybackController::next_deadline`] to
//! schedule their wake-ups.

use core::fmt;

use serde::{Deserialize, Serialize};
use tourguide_effects::{
    Completion, DispatchError, EffectDispatcher, EffectSink, Outcome, Ticket,
};
use tourguide_timeline::{TimelineModel, TimelineStep};

use crate::{AdvanceTimer, Politeness, SharedAnnouncer};

/// Coarse playback state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Not playing.
    #[default]
    Stopped,
    /// Auto-advancing.
    Playing,
    /// Halted at the current step.
    Paused,
}

/// Read-only view for playback UI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSnapshot {
    /// Current step index; `None` for an empty timeline.
    pub current_step_index: Option<usize>,
    /// Whether playback is auto-advancing.
    pub is_playing: bool,
    /// `(index + 1) / len * 100`, or `0` for an empty timeline.
    pub progress_percent: f64,
    /// Coarse state.
    pub state: PlaybackState,
    /// Speed multiplier.
    pub speed: f64,
}

/// Playback settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackConfig {
    /// Floor for the auto-advance delay.
    pub min_advance_ms: u64,
    /// Announce step changes through the injected announcer.
    pub announce: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            min_advance_ms: 1000,
            announce: true,
        }
    }
}

/// Playback failures.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    /// Speed multipliers must be positive and finite.
    #[error("playback speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),
}

/// Navigation-layer callbacks.
pub trait PlaybackObserver {
    /// The current step changed to `index`. Always follows the step's dispatch.
    fn step_changed(&mut self, index: usize, step: &TimelineStep);

    /// The step at `index` was rejected by the dispatcher and is being skipped.
    fn step_skipped(&mut self, index: usize, step: &TimelineStep, error: &DispatchError) {
        let _ = (index, step, error);
    }

    /// The coarse playback state changed.
    fn state_changed(&mut self, state: PlaybackState) {
        let _ = state;
    }
}

impl PlaybackObserver for () {
    fn step_changed(&mut self, _index: usize, _step: &TimelineStep) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
    Stay,
}

impl Direction {
    fn after(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Forward => (index + 1 < len).then_some(index + 1),
            Self::Backward => index.checked_sub(1),
            Self::Stay => None,
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Float-to-int casts saturate; negative and NaN inputs are clamped to zero first."
)]
fn whole_ms(ms: f64) -> u64 {
    ms.max(0.0).round() as u64
}

fn announce(target: Option<&SharedAnnouncer>, message: &str, politeness: Politeness, now: u64) {
    if let Some(announcer) = target {
        announcer.borrow_mut().announce(message, politeness, now);
    }
}

/// Owns the position in a [`TimelineModel`] and drives effect dispatch.
pub struct PlaybackController<S, O = ()> {
    model: TimelineModel,
    index: Option<usize>,
    presented: Option<usize>,
    state: PlaybackState,
    finished: bool,
    speed: f64,
    timer: AdvanceTimer,
    dispatcher: EffectDispatcher<S>,
    current_ticket: Option<Ticket>,
    awaiting: bool,
    observer: O,
    announcer: Option<SharedAnnouncer>,
    config: PlaybackConfig,
}

impl<S: fmt::Debug, O: fmt::Debug> fmt::Debug for PlaybackController<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("steps", &self.model.len())
            .field("index", &self.index)
            .field("presented", &self.presented)
            .field("state", &self.state)
            .field("finished", &self.finished)
            .field("speed", &self.speed)
            .field("timer", &self.timer)
            .field("dispatcher", &self.dispatcher)
            .field("current_ticket", &self.current_ticket)
            .field("awaiting", &self.awaiting)
            .field("observer", &self.observer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: EffectSink, O: PlaybackObserver> PlaybackController<S, O> {
    /// Create a stopped controller at step 0. Nothing is dispatched until playback or
    /// navigation presents a step.
    pub fn new(model: TimelineModel, sink: S, observer: O) -> Self {
        Self::with_config(model, sink, observer, PlaybackConfig::default())
    }

    /// Create a controller with explicit settings.
    pub fn with_config(model: TimelineModel, sink: S, observer: O, config: PlaybackConfig) -> Self {
        let index = (!model.is_empty()).then_some(0);
        Self {
            model,
            index,
            presented: None,
            state: PlaybackState::Stopped,
            finished: false,
            speed: 1.0,
            timer: AdvanceTimer::default(),
            dispatcher: EffectDispatcher::new(sink),
            current_ticket: None,
            awaiting: false,
            observer,
            announcer: None,
            config,
        }
    }

    /// Announce step changes through `announcer`.
    #[must_use]
    pub fn with_announcer(mut self, announcer: SharedAnnouncer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    /// The timeline being played.
    pub fn model(&self) -> &TimelineModel {
        &self.model
    }

    /// Current step index; `None` for an empty timeline.
    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// The current step.
    pub fn current_step(&self) -> Option<&TimelineStep> {
        self.index.and_then(|i| self.model.get(i))
    }

    /// Coarse state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns `true` while auto-advancing.
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Settings.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// The effect dispatcher.
    pub fn dispatcher(&self) -> &EffectDispatcher<S> {
        &self.dispatcher
    }

    /// Mutable access to the effect dispatcher's sink.
    pub fn sink_mut(&mut self) -> &mut S {
        self.dispatcher.sink_mut()
    }

    /// The observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Read-only view for playback UI.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let len = self.model.len();
        let progress_percent = match self.index {
            Some(i) if len > 0 => (i + 1) as f64 / len as f64 * 100.0,
            _ => 0.0,
        };
        PlaybackSnapshot {
            current_step_index: self.index,
            is_playing: self.is_playing(),
            progress_percent,
            state: self.state,
            speed: self.speed,
        }
    }

    /// When [`PlaybackController::tick`] next has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        let announcer = self
            .announcer
            .as_ref()
            .and_then(|a| a.borrow().next_deadline());
        match (self.timer.deadline(), announcer) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// The delay the auto-advance uses for the current step.
    pub fn advance_delay(&self) -> u64 {
        let duration = self.current_step().map_or(0, TimelineStep::duration_ms);
        whole_ms(duration as f64 / self.speed).max(self.config.min_advance_ms)
    }

    /// Start or resume auto-advancing.
    ///
    /// Presents the current step if it is not already showing. After playback ran off
    /// the end, starts over at step 0. Does nothing while already playing or when the
    /// timeline is empty.
    pub fn play(&mut self, now: u64) {
        let Some(index) = self.index else {
            tracing::debug!("play ignored: empty timeline");
            return;
        };
        if self.state == PlaybackState::Playing {
            return;
        }
        let restart = core::mem::take(&mut self.finished);
        let target = if restart { 0 } else { index };
        tracing::info!(index = target, speed = self.speed, restart, "play");
        self.set_state(PlaybackState::Playing);
        if restart || self.presented != Some(target) {
            self.present(target, Direction::Forward, now);
        }
        self.schedule_advance(now);
    }

    /// Halt at the current step.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.timer.cancel();
        tracing::info!(index = ?self.index, "pause");
        self.set_state(PlaybackState::Paused);
    }

    /// Stop and return to step 0.
    pub fn stop(&mut self, now: u64) {
        self.timer.cancel();
        self.finished = false;
        if self.state != PlaybackState::Stopped {
            tracing::info!("stop");
        }
        self.set_state(PlaybackState::Stopped);
        if self.index.is_some_and(|i| i != 0) {
            self.present(0, Direction::Stay, now);
        }
    }

    /// Go to the following step, if any.
    pub fn next(&mut self, now: u64) {
        if let Some(i) = self.index {
            self.navigate(i.saturating_add(1), Direction::Forward, now);
        }
    }

    /// Go to the preceding step, if any.
    pub fn previous(&mut self, now: u64) {
        if let Some(i) = self.index {
            self.navigate(i.saturating_sub(1), Direction::Backward, now);
        }
    }

    /// Jump to `index`, clamped to the timeline. Always leaves playback not playing.
    pub fn seek(&mut self, index: usize, now: u64) {
        if self.index.is_none() {
            return;
        }
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
        self.navigate(index, Direction::Forward, now);
    }

    /// Change the speed multiplier. A pending auto-advance keeps its progress: the time
    /// it still has left is rescaled to the new speed.
    pub fn set_speed(&mut self, speed: f64, now: u64) -> Result<(), PlaybackError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(PlaybackError::InvalidSpeed(speed));
        }
        let old = core::mem::replace(&mut self.speed, speed);
        if let Some(remaining) = self.timer.remaining(now) {
            let rescaled = whole_ms(remaining as f64 * old / speed);
            self.timer.schedule(now, rescaled);
            tracing::debug!(speed, remaining_ms = rescaled, "auto-advance rescaled");
        }
        Ok(())
    }

    /// Fire due work: the auto-advance and the announcer's debounce.
    pub fn tick(&mut self, now: u64) {
        if let Some(announcer) = &self.announcer {
            announcer.borrow_mut().tick(now);
        }
        if self.timer.fire_due(now).is_none() {
            return;
        }
        let Some(index) = self.index else {
            return;
        };
        if index + 1 < self.model.len() {
            self.present(index + 1, Direction::Forward, now);
            self.schedule_advance(now);
        } else {
            tracing::info!(index, "playback reached the end");
            self.finished = true;
            self.set_state(PlaybackState::Stopped);
        }
    }

    /// Report that the effect started with `ticket` ended.
    ///
    /// Completing the current step's quiz while playing arms the auto-advance it was
    /// holding back. Returns `None` for stale tickets.
    pub fn complete(&mut self, ticket: Ticket, completion: Completion, now: u64) -> Option<Outcome> {
        let outcome = self.dispatcher.complete(ticket, completion)?;
        if self.current_ticket == Some(ticket) {
            self.current_ticket = None;
            if core::mem::take(&mut self.awaiting) && self.state == PlaybackState::Playing {
                self.schedule_advance(now);
            }
        }
        Some(outcome)
    }

    /// Replace the timeline after a content change.
    ///
    /// The index is kept, clamped to the new last step. If a step was showing, the step at
    /// the clamped index is presented again; if playing, the advance is re-armed. Playback
    /// that had run off the end still restarts on the next `play` as long as the clamped
    /// index is the new last step.
    pub fn load(&mut self, model: TimelineModel, now: u64) {
        self.timer.cancel();
        self.dispatcher.cancel_all();
        self.current_ticket = None;
        self.awaiting = false;
        let finished = core::mem::take(&mut self.finished);
        let was_presenting = self.presented.take().is_some();
        self.model = model;
        tracing::debug!(steps = self.model.len(), "timeline loaded");

        let Some(last) = self.model.len().checked_sub(1) else {
            self.index = None;
            self.set_state(PlaybackState::Stopped);
            return;
        };
        let index = self.index.map_or(0, |i| i.min(last));
        self.index = Some(index);
        self.finished = finished && index == last;
        if was_presenting {
            self.present(index, Direction::Forward, now);
        }
        if self.state == PlaybackState::Playing {
            self.schedule_advance(now);
        }
    }

    /// Cancel the pending advance and every outstanding effect, and stop without
    /// notifying the observer.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.dispatcher.cancel_all();
        self.current_ticket = None;
        self.awaiting = false;
        self.state = PlaybackState::Stopped;
        tracing::debug!("playback torn down");
    }

    fn navigate(&mut self, target: usize, direction: Direction, now: u64) {
        let (Some(index), Some(last)) = (self.index, self.model.len().checked_sub(1)) else {
            return;
        };
        let target = target.min(last);
        self.timer.cancel();
        self.finished = false;
        if target != index || self.presented != Some(target) {
            self.present(target, direction, now);
        }
        if self.state == PlaybackState::Playing {
            self.schedule_advance(now);
        }
    }

    /// Dispatch and announce `target`, skipping rejected steps in `direction`.
    fn present(&mut self, target: usize, direction: Direction, now: u64) {
        let len = self.model.len();
        let mut i = target;
        while let Some(step) = self.model.get(i) {
            self.index = Some(i);
            self.presented = Some(i);
            let result = self.dispatcher.dispatch(&step.id, &step.event.effect);
            self.observer.step_changed(i, step);
            let announcer = self.announcer.as_ref().filter(|_| self.config.announce);
            match result {
                Ok(ticket) => {
                    self.current_ticket = Some(ticket);
                    self.awaiting = step.event.effect.kind().awaits_completion();
                    tracing::debug!(index = i, id = %step.id, "step presented");
                    let message = format!("Step {} of {len}: {}", step.number, step.title);
                    announce(announcer, &message, Politeness::Polite, now);
                    return;
                }
                Err(error) => {
                    self.current_ticket = None;
                    self.awaiting = false;
                    tracing::warn!(index = i, id = %step.id, %error, "step skipped");
                    self.observer.step_skipped(i, step, &error);
                    let message = format!("Step {} skipped: {error}", step.number);
                    announce(announcer, &message, Politeness::Assertive, now);
                    match direction.after(i, len) {
                        Some(n) => i = n,
                        None => return,
                    }
                }
            }
        }
    }

    fn schedule_advance(&mut self, now: u64) {
        if self.awaiting {
            self.timer.cancel();
            tracing::debug!(index = ?self.index, "auto-advance waits for completion");
            return;
        }
        let delay = self.advance_delay();
        self.timer.schedule(now, delay);
        tracing::debug!(index = ?self.index, delay_ms = delay, "auto-advance armed");
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.observer.state_changed(state);
        }
    }
}
