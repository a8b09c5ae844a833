//! Free-text typing practice over one long reference text.

use log::{debug, info};
use rand::Rng;
use std::time::Instant;

use crate::corpus::PracticeCorpus;
use crate::error::{ArcadeError, Result};
use crate::games::Playfield;
use crate::matcher::{submit_keystroke, Keystroke, MatchCursor, MatchResult, ReferenceText};
use crate::metrics::{MetricsSnapshot, MetricsTracker};
use crate::scene::{Scene, TargetView};

pub const PRACTICE_TITLE: &str = "Practice";

/// What one keystroke did to a practice session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeEvent {
    /// Modifier, backspace, chord, or anything after completion
    Ignored,
    Correct(MetricsSnapshot),
    /// Tallied; the same character stays pending
    Incorrect(MetricsSnapshot),
    /// The last character was typed; metrics are frozen
    Completed(MetricsSnapshot),
}

impl PracticeEvent {
    pub fn snapshot(&self) -> Option<MetricsSnapshot> {
        match self {
            PracticeEvent::Ignored => None,
            PracticeEvent::Correct(s) | PracticeEvent::Incorrect(s) | PracticeEvent::Completed(s) => {
                Some(*s)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PracticeSession {
    text: ReferenceText,
    cursor: MatchCursor,
    tracker: MetricsTracker,
}

impl PracticeSession {
    /// Fails with `EmptyText` for a blank text
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = ReferenceText::new(text);
        if text.is_empty() {
            return Err(ArcadeError::EmptyText);
        }
        debug!("practice: {} characters", text.len());
        Ok(Self {
            text,
            cursor: MatchCursor::new(),
            tracker: MetricsTracker::new(),
        })
    }

    /// Session over a text chosen uniformly from the corpus
    pub fn from_corpus<R: Rng + ?Sized>(corpus: &PracticeCorpus, rng: &mut R) -> Result<Self> {
        Self::new(corpus.choose(rng)?)
    }

    /// Starts over on a new text with fresh counters and timing
    pub fn restart(&mut self, text: impl Into<String>) -> Result<()> {
        *self = Self::new(text)?;
        Ok(())
    }

    pub fn text(&self) -> &ReferenceText {
        &self.text
    }

    pub fn cursor(&self) -> &MatchCursor {
        &self.cursor
    }

    pub fn tracker(&self) -> &MetricsTracker {
        &self.tracker
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_complete(&self.text)
    }

    pub fn on_keystroke(&mut self, keystroke: &Keystroke, now: Instant) -> PracticeEvent {
        if self.is_complete() {
            return PracticeEvent::Ignored;
        }

        let result = submit_keystroke(&mut self.cursor, &self.text, keystroke);
        if result.was_compared() && self.tracker.start(now) {
            debug!("practice: timer started");
        }

        match result {
            MatchResult::Correct if self.is_complete() => {
                self.tracker.stop(now);
                let snapshot = self.snapshot(now);
                info!("practice finished: {} wpm, {}%", snapshot.wpm, snapshot.accuracy);
                PracticeEvent::Completed(snapshot)
            }
            MatchResult::Correct => PracticeEvent::Correct(self.snapshot(now)),
            MatchResult::Incorrect => PracticeEvent::Incorrect(self.snapshot(now)),
            MatchResult::AlreadyComplete | MatchResult::Ignored => PracticeEvent::Ignored,
        }
    }

    pub fn snapshot(&self, now: Instant) -> MetricsSnapshot {
        self.tracker.snapshot(&self.cursor, &self.text, now)
    }

    /// Completion line, e.g. `Finished! WPM: 42, Accuracy: 97%`
    pub fn summary(&self, now: Instant) -> String {
        let snapshot = self.snapshot(now);
        format!(
            "Finished! WPM: {}, Accuracy: {}%",
            snapshot.wpm, snapshot.accuracy
        )
    }

    pub fn scene(&self, playfield: Playfield, now: Instant) -> Scene {
        let mut scene = Scene::new(PRACTICE_TITLE, playfield);
        scene.targets.push(TargetView {
            text: self.text.as_str().to_string(),
            typed: self.cursor.position,
            x: 0.0,
            y: 0.0,
            active: true,
        });
        scene.metrics = Some(self.snapshot(now));
        if self.is_complete() {
            scene.banner = Some(self.summary(now));
        }
        scene
    }
}
