// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessibility announcements.
//!
//! Screen-reader notices go through one live region per process. Rather than a global,
//! the region is owned by an [`Announcer`] that the host creates once and injects into
//! every component that speaks, typically as a [`SharedAnnouncer`].
//!
//! - The live region itself is created on first use, not when the announcer is built, so
//!   hosts that never announce never create one.
//! - [`Politeness::Polite`] messages are debounced: a polite message is delivered once no
//!   newer polite message has arrived for [`AnnouncerConfig::polite_debounce_ms`]. The
//!   latest message wins.
//! - [`Politeness::Assertive`] messages are delivered immediately and drop any polite
//!   message still waiting.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use tourguide_playback::{Announce, Announcer, LiveRegion, Politeness};
//!
//! #[derive(Default)]
//! struct Spoken(Rc<RefCell<Vec<String>>>);
//!
//! impl LiveRegion for Spoken {
//!     fn deliver(&mut self, message: &str, _: Politeness) {
//!         self.0.borrow_mut().push(message.to_owned());
//!     }
//! }
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let sink = log.clone();
//! let mut announcer = Announcer::new(move || Spoken(sink));
//!
//! announcer.announce("Step 1 of 3", Politeness::Polite, 0);
//! announcer.announce("Step 2 of 3", Politeness::Polite, 50);
//! announcer.tick(500);
//! assert_eq!(*log.borrow(), ["Step 2 of 3"]);
//! ```

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Urgency of an announcement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    /// Wait until the reader is idle.
    Polite,
    /// Interrupt.
    Assertive,
}

/// The host's live region.
pub trait LiveRegion {
    /// Speak `message` now.
    fn deliver(&mut self, message: &str, politeness: Politeness);
}

/// Object-safe announcement service.
pub trait Announce {
    /// Queue or deliver `message`.
    fn announce(&mut self, message: &str, politeness: Politeness, now: u64);

    /// Deliver a debounced message whose time has come.
    fn tick(&mut self, now: u64);

    /// When [`Announce::tick`] next has work to do.
    fn next_deadline(&self) -> Option<u64>;
}

/// An announcer shared between components.
pub type SharedAnnouncer = Rc<RefCell<dyn Announce>>;

/// Announcer settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnouncerConfig {
    /// Quiet period before a polite message is delivered.
    pub polite_debounce_ms: u64,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            polite_debounce_ms: 150,
        }
    }
}

/// Debouncing front end for a lazily created [`LiveRegion`].
pub struct Announcer<R> {
    init: Option<Box<dyn FnOnce() -> R>>,
    region: Option<R>,
    pending: Option<(String, u64)>,
    config: AnnouncerConfig,
}

impl<R: fmt::Debug> fmt::Debug for Announcer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Announcer")
            .field("region", &self.region)
            .field("pending", &self.pending)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R: LiveRegion> Announcer<R> {
    /// Create an announcer whose region is built by `init` on first delivery.
    pub fn new(init: impl FnOnce() -> R + 'static) -> Self {
        Self::with_config(init, AnnouncerConfig::default())
    }

    /// Create an announcer with explicit settings.
    pub fn with_config(init: impl FnOnce() -> R + 'static, config: AnnouncerConfig) -> Self {
        Self {
            init: Some(Box::new(init)),
            region: None,
            pending: None,
            config,
        }
    }

    /// Wrap in a [`SharedAnnouncer`].
    pub fn shared(self) -> SharedAnnouncer
    where
        R: 'static,
    {
        Rc::new(RefCell::new(self))
    }

    /// The live region, once it has been created.
    pub fn region(&self) -> Option<&R> {
        self.region.as_ref()
    }

    /// The polite message waiting for its debounce period, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|(m, _)| m.as_str())
    }

    /// Deliver any waiting polite message immediately.
    pub fn flush(&mut self) {
        if let Some((message, _)) = self.pending.take() {
            self.deliver(&message, Politeness::Polite);
        }
    }

    fn deliver(&mut self, message: &str, politeness: Politeness) {
        if self.region.is_none()
            && let Some(init) = self.init.take()
        {
            tracing::debug!("live region created");
            self.region = Some(init());
        }
        if let Some(region) = self.region.as_mut() {
            tracing::trace!(message, ?politeness, "announce");
            region.deliver(message, politeness);
        }
    }
}

impl<R: LiveRegion> Announce for Announcer<R> {
    fn announce(&mut self, message: &str, politeness: Politeness, now: u64) {
        match politeness {
            Politeness::Polite => {
                let due = now.saturating_add(self.config.polite_debounce_ms);
                self.pending = Some((message.to_owned(), due));
            }
            Politeness::Assertive => {
                self.pending = None;
                self.deliver(message, politeness);
            }
        }
    }

    fn tick(&mut self, now: u64) {
        if self.pending.as_ref().is_some_and(|(_, due)| *due <= now) {
            self.flush();
        }
    }

    fn next_deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(_, due)| *due)
    }
}
