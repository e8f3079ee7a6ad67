// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: validate effects and hand them to the rendering layer.
//!
//! The dispatcher holds no rendering state. It:
//!
//! - validates a step's [`Effect`] before anything is shown,
//! - cancels whatever the previous dispatch started,
//! - forwards the effect to an [`EffectSink`] together with a fresh [`Ticket`],
//! - and matches completions reported by the rendering layer against live tickets,
//!   grading quiz answers on the way.
//!
//! ## Semantics
//!
//! - Invalid parameters are never forwarded. [`EffectDispatcher::dispatch`] returns
//!   [`DispatchError::InvalidEffectParameters`] and the caller decides how to skip the step.
//! - Completions for tickets that were cancelled or already completed are ignored, so a
//!   late "media ended" from a previous step cannot disturb the current one.
//!
//! ## Minimal example
//!
//! ```
//! use tourguide_effects::{
//!     Completion, Effect, EffectDispatcher, EffectSink, Outcome, Quiz, Ticket,
//! };
//!
//! #[derive(Default)]
//! struct Log(Vec<String>);
//!
//! impl EffectSink for Log {
//!     fn start(&mut self, _ticket: Ticket, effect: &Effect) {
//!         self.0.push(format!("start {}", effect.kind()));
//!     }
//!     fn completed(&mut self, _ticket: Ticket, outcome: &Outcome) {
//!         self.0.push(format!("done {outcome:?}"));
//!     }
//! }
//!
//! let mut dispatcher = EffectDispatcher::new(Log::default());
//! let quiz = Effect::Quiz(Quiz {
//!     question: "2 + 2?".into(),
//!     options: vec!["3".into(), "4".into()],
//!     correct_index: 1,
//!     explanation: None,
//! });
//!
//! let ticket = dispatcher.dispatch("intro:q1", &quiz).unwrap();
//! let outcome = dispatcher.complete(ticket, Completion::QuizAnswered { choice: 1 });
//! assert!(matches!(outcome, Some(Outcome::QuizGraded { correct: true, .. })));
//!
//! // One option is not a quiz.
//! let broken = Effect::Quiz(Quiz { options: vec!["4".into()], ..Default::default() });
//! assert!(dispatcher.dispatch("intro:q2", &broken).is_err());
//! assert_eq!(dispatcher.sink().0.len(), 2);
//! ```

use std::collections::BTreeMap;

use crate::{Effect, EffectKind, ParameterError};

/// Handle for one dispatched effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw ticket number; unique per dispatcher.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// The rendering layer's side of the dispatcher.
pub trait EffectSink {
    /// Show or play `effect`. Completion, if any, is reported later via
    /// [`EffectDispatcher::complete`] with the same `ticket`.
    fn start(&mut self, ticket: Ticket, effect: &Effect);

    /// Stop showing the effect started with `ticket`.
    fn cancel(&mut self, ticket: Ticket) {
        let _ = ticket;
    }

    /// A completion for `ticket` was accepted.
    fn completed(&mut self, ticket: Ticket, outcome: &Outcome) {
        let _ = (ticket, outcome);
    }
}

/// What the rendering layer reports when an effect ends on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Completion {
    /// Audio or video reached its end.
    MediaEnded,
    /// The viewer closed the effect.
    Dismissed,
    /// The viewer picked a quiz option.
    QuizAnswered {
        /// Chosen option index.
        choice: usize,
    },
}

/// Accepted completion, as forwarded to the sink and returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The effect finished.
    Finished,
    /// A quiz answer was graded.
    QuizGraded {
        /// Chosen option index.
        choice: usize,
        /// Whether it was the correct option.
        correct: bool,
        /// Author-provided explanation, if any.
        explanation: Option<String>,
    },
}

/// Dispatch failures.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// The effect failed validation and was not forwarded.
    #[error("step {step}: invalid {kind} parameters: {source}")]
    InvalidEffectParameters {
        /// Step whose effect was rejected.
        step: String,
        /// Kind of the rejected effect.
        kind: EffectKind,
        /// Validation failure.
        #[source]
        source: ParameterError,
    },
}

#[derive(Clone, Debug)]
struct Live {
    step: String,
    kind: EffectKind,
    grading: Option<(usize, Option<String>)>,
}

/// Routes validated effects to an [`EffectSink`].
#[derive(Debug)]
pub struct EffectDispatcher<S> {
    sink: S,
    next_ticket: u64,
    live: BTreeMap<Ticket, Live>,
}

impl<S: EffectSink> EffectDispatcher<S> {
    /// Create a dispatcher that forwards to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            next_ticket: 1,
            live: BTreeMap::new(),
        }
    }

    /// Shared access to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Validate `effect` and, if valid, cancel outstanding effects and start it.
    ///
    /// Outstanding effects are cancelled even when validation fails, since the step
    /// they belonged to is no longer current.
    pub fn dispatch(&mut self, step: &str, effect: &Effect) -> Result<Ticket, DispatchError> {
        self.cancel_all();
        let kind = effect.kind();
        if let Err(source) = effect.validate() {
            tracing::warn!(step, %kind, error = %source, "effect rejected");
            return Err(DispatchError::InvalidEffectParameters {
                step: step.to_owned(),
                kind,
                source,
            });
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        let grading = match effect {
            Effect::Quiz(q) => Some((q.correct_index, q.explanation.clone())),
            _ => None,
        };
        self.live.insert(
            ticket,
            Live {
                step: step.to_owned(),
                kind,
                grading,
            },
        );
        tracing::debug!(step, %kind, ticket = ticket.0, "effect dispatched");
        self.sink.start(ticket, effect);
        Ok(ticket)
    }

    /// Accept a completion reported by the rendering layer.
    ///
    /// Returns `None` if `ticket` is no longer live.
    pub fn complete(&mut self, ticket: Ticket, completion: Completion) -> Option<Outcome> {
        let live = self.live.get(&ticket)?;
        let outcome = match (completion, &live.grading) {
            (Completion::QuizAnswered { choice }, Some((correct, explanation))) => {
                Outcome::QuizGraded {
                    choice,
                    correct: choice == *correct,
                    explanation: explanation.clone(),
                }
            }
            (Completion::QuizAnswered { choice }, None) => {
                tracing::debug!(ticket = ticket.0, choice, "answer for a non-quiz effect ignored");
                return None;
            }
            (Completion::MediaEnded | Completion::Dismissed, _) => Outcome::Finished,
        };
        tracing::debug!(step = %live.step, kind = %live.kind, ?outcome, "effect completed");
        self.live.remove(&ticket);
        self.sink.completed(ticket, &outcome);
        Some(outcome)
    }

    /// Cancel every outstanding effect.
    pub fn cancel_all(&mut self) {
        for ticket in core::mem::take(&mut self.live).into_keys() {
            self.sink.cancel(ticket);
        }
    }

    /// Returns `true` if `ticket` has been started and neither completed nor cancelled.
    #[must_use]
    pub fn is_live(&self, ticket: Ticket) -> bool {
        self.live.contains_key(&ticket)
    }

    /// Step that `ticket` was dispatched for, while it is live.
    #[must_use]
    pub fn step_of(&self, ticket: Ticket) -> Option<&str> {
        self.live.get(&ticket).map(|l| l.step.as_str())
    }
}
