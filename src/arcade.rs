//! The host-facing controller: owns at most one running session, the single
//! keystroke listener, and rejects ticks scheduled for a superseded session.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::corpus::{PracticeCorpus, WordCorpus};
use crate::error::Result;
use crate::games::{GameId, GameSession, KeyEffect, Playfield};
use crate::matcher::Keystroke;
use crate::practice::{PracticeEvent, PracticeSession};
use crate::runtime::TickScheduler;
use crate::scene::{Renderer, Scene};

/// What the host asks to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKind {
    /// A supplied text, or one drawn from the practice corpus
    Practice { text: Option<String> },
    Game(GameId),
}

#[derive(Debug)]
pub enum ActiveSession {
    Practice(PracticeSession),
    Game(GameSession),
}

/// Where a keystroke went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeOutcome {
    NoSession,
    Practice(PracticeEvent),
    Game(KeyEffect),
}

impl KeystrokeOutcome {
    pub fn changed_state(&self) -> bool {
        match self {
            KeystrokeOutcome::NoSession => false,
            KeystrokeOutcome::Practice(event) => *event != PracticeEvent::Ignored,
            KeystrokeOutcome::Game(effect) => *effect != KeyEffect::Ignored,
        }
    }
}

pub struct Arcade<R: Renderer, S: TickScheduler> {
    words: Arc<WordCorpus>,
    texts: PracticeCorpus,
    playfield: Playfield,
    rng: StdRng,
    renderer: R,
    scheduler: S,
    session: Option<ActiveSession>,
    last_kind: Option<SessionKind>,
    epoch: u64,
}

impl<R: Renderer, S: TickScheduler> Arcade<R, S> {
    pub fn new(
        words: WordCorpus,
        texts: PracticeCorpus,
        playfield: Playfield,
        rng: StdRng,
        renderer: R,
        scheduler: S,
    ) -> Self {
        Self {
            words: Arc::new(words),
            texts,
            playfield,
            rng,
            renderer,
            scheduler,
            session: None,
            last_kind: None,
            epoch: 0,
        }
    }

    /// Replaces any running session with a fresh one of `kind`.
    ///
    /// The previous session is exited first, so a failed start leaves no
    /// session running.
    pub fn start(&mut self, kind: SessionKind) -> Result<()> {
        self.exit();

        let session = match &kind {
            SessionKind::Practice { text: Some(text) } => {
                ActiveSession::Practice(PracticeSession::new(text.as_str())?)
            }
            SessionKind::Practice { text: None } => {
                ActiveSession::Practice(PracticeSession::from_corpus(&self.texts, &mut self.rng)?)
            }
            SessionKind::Game(id) => {
                let rng = StdRng::seed_from_u64(self.rng.gen());
                ActiveSession::Game(GameSession::start(
                    *id,
                    Arc::clone(&self.words),
                    self.playfield,
                    rng,
                )?)
            }
        };
        debug!("session {} started: {kind:?}", self.epoch);

        if matches!(session, ActiveSession::Game(_)) {
            self.scheduler.schedule_next_tick(self.epoch);
        }
        self.session = Some(session);
        self.last_kind = Some(kind);
        self.refresh(Instant::now());
        Ok(())
    }

    /// Starts the last started kind again. Practice drawn from the corpus
    /// gets a newly drawn text.
    pub fn restart(&mut self) -> Result<bool> {
        match self.last_kind.clone() {
            Some(kind) => self.start(kind).map(|_| true),
            None => Ok(false),
        }
    }

    /// Stops ticking and drops the running session and its listener
    pub fn exit(&mut self) {
        self.scheduler.cancel_ticking();
        self.epoch += 1;
        if self.session.take().is_some() {
            debug!("session exited; epoch now {}", self.epoch);
        }
    }

    /// Advances the running game one logical tick.
    ///
    /// Ticks for another epoch, or with no game running, change nothing and
    /// return false.
    pub fn on_tick(&mut self, epoch: u64) -> Result<bool> {
        if epoch != self.epoch {
            trace!("stale tick for epoch {epoch}, current {}", self.epoch);
            return Ok(false);
        }
        let Some(ActiveSession::Game(game)) = &mut self.session else {
            trace!("tick with no game running");
            return Ok(false);
        };

        game.on_tick()?;
        self.renderer.render(&game.scene());
        if !game.is_over() {
            self.scheduler.schedule_next_tick(self.epoch);
        }
        Ok(true)
    }

    pub fn on_keystroke(&mut self, keystroke: &Keystroke, now: Instant) -> Result<KeystrokeOutcome> {
        let outcome = match &mut self.session {
            None => KeystrokeOutcome::NoSession,
            Some(ActiveSession::Practice(practice)) => {
                KeystrokeOutcome::Practice(practice.on_keystroke(keystroke, now))
            }
            Some(ActiveSession::Game(game)) => KeystrokeOutcome::Game(game.on_keystroke(keystroke)?),
        };
        if outcome.changed_state() {
            self.refresh(now);
        }
        Ok(outcome)
    }

    /// Renders the current session, if any
    pub fn refresh(&mut self, now: Instant) {
        if let Some(scene) = self.scene(now) {
            self.renderer.render(&scene);
        }
    }

    pub fn scene(&self, now: Instant) -> Option<Scene> {
        self.session.as_ref().map(|session| match session {
            ActiveSession::Practice(practice) => practice.scene(self.playfield, now),
            ActiveSession::Game(game) => game.scene(),
        })
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    pub fn game(&self) -> Option<&GameSession> {
        match &self.session {
            Some(ActiveSession::Game(game)) => Some(game),
            _ => None,
        }
    }

    pub fn practice(&self) -> Option<&PracticeSession> {
        match &self.session {
            Some(ActiveSession::Practice(practice)) => Some(practice),
            _ => None,
        }
    }

    /// True once the running session has finished: game over or text completed
    pub fn is_finished(&self) -> bool {
        match &self.session {
            Some(ActiveSession::Practice(practice)) => practice.is_complete(),
            Some(ActiveSession::Game(game)) => game.is_over(),
            None => false,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArcadeError, CorpusKind};
    use crate::runtime::TickGate;
    use assert_matches::assert_matches;

    fn arcade(words: &[&str]) -> Arcade<Vec<Scene>, TickGate> {
        Arcade::new(
            WordCorpus::from_words("test", words.iter().copied()),
            PracticeCorpus::from_texts("test", ["abc"]),
            Playfield::default(),
            StdRng::seed_from_u64(11),
            Vec::new(),
            TickGate::new(),
        )
    }

    #[test]
    fn test_game_start_schedules_and_renders() {
        let mut arcade = arcade(&["apple"]);
        arcade.start(SessionKind::Game(GameId::SpaceWar)).unwrap();

        assert_eq!(arcade.scheduler().pending(), Some(arcade.epoch()));
        assert_eq!(arcade.renderer().len(), 1);
        assert_eq!(arcade.renderer()[0].title, "Space War");
    }

    #[test]
    fn test_practice_start_does_not_tick() {
        let mut arcade = arcade(&["apple"]);
        arcade.start(SessionKind::Practice { text: None }).unwrap();

        assert_eq!(arcade.scheduler().pending(), None);
        assert_eq!(arcade.practice().unwrap().text().as_str(), "abc");
        assert!(!arcade.on_tick(arcade.epoch()).unwrap());
    }

    #[test]
    fn test_tick_reschedules_until_game_over() {
        let mut arcade = arcade(&["apple"]);
        arcade.start(SessionKind::Game(GameId::MoleHunt)).unwrap();

        let epoch = arcade.scheduler_mut().take().unwrap();
        assert!(arcade.on_tick(epoch).unwrap());
        assert_eq!(arcade.scheduler().pending(), Some(epoch));
        assert_eq!(arcade.game().unwrap().ticks(), 1);
    }

    #[test]
    fn test_stale_tick_after_restart_is_ignored() {
        let mut arcade = arcade(&["apple"]);
        arcade.start(SessionKind::Game(GameId::PoliceThief)).unwrap();
        let old_epoch = arcade.epoch();

        arcade.start(SessionKind::Game(GameId::PoliceThief)).unwrap();
        assert!(!arcade.on_tick(old_epoch).unwrap());
        assert_eq!(arcade.game().unwrap().ticks(), 0);
        assert_eq!(arcade.game().unwrap().state().score, 0);
    }

    #[test]
    fn test_exit_cancels_and_drops_listener() {
        let mut arcade = arcade(&["apple"]);
        arcade.start(SessionKind::Game(GameId::AppleCatch)).unwrap();
        let epoch = arcade.epoch();
        arcade.exit();

        assert!(arcade.session().is_none());
        assert_eq!(arcade.scheduler().pending(), None);
        assert!(!arcade.on_tick(epoch).unwrap());
        assert_eq!(
            arcade.on_keystroke(&Keystroke::char('a'), Instant::now()).unwrap(),
            KeystrokeOutcome::NoSession
        );
    }

    #[test]
    fn test_empty_corpus_start_fails_cleanly() {
        let mut arcade = arcade(&[]);
        arcade.start(SessionKind::Practice { text: None }).unwrap();

        let result = arcade.start(SessionKind::Game(GameId::FrogCross));
        assert_matches!(result, Err(ArcadeError::EmptyCorpus(CorpusKind::Words)));
        assert!(arcade.session().is_none());
        assert_eq!(arcade.scheduler().pending(), None);
    }

    #[test]
    fn test_practice_keystrokes_render_on_change() {
        let mut arcade = arcade(&["apple"]);
        arcade
            .start(SessionKind::Practice {
                text: Some("hi".to_string()),
            })
            .unwrap();
        let now = Instant::now();

        let shift = Keystroke::modifier(crate::matcher::ModifierKey::Shift);
        assert_eq!(
            arcade.on_keystroke(&shift, now).unwrap(),
            KeystrokeOutcome::Practice(PracticeEvent::Ignored)
        );
        assert_eq!(arcade.renderer().len(), 1);

        arcade.on_keystroke(&Keystroke::char('h'), now).unwrap();
        let outcome = arcade.on_keystroke(&Keystroke::char('i'), now).unwrap();
        assert_matches!(outcome, KeystrokeOutcome::Practice(PracticeEvent::Completed(_)));
        assert!(arcade.is_finished());
        assert_eq!(arcade.renderer().len(), 3);
    }

    #[test]
    fn test_restart_repeats_last_kind() {
        let mut arcade = arcade(&["apple"]);
        assert!(!arcade.restart().unwrap());

        arcade.start(SessionKind::Game(GameId::FrogCross)).unwrap();
        let first_epoch = arcade.epoch();
        assert!(arcade.restart().unwrap());
        assert_eq!(arcade.game().unwrap().id(), GameId::FrogCross);
        assert!(arcade.epoch() > first_epoch);
    }
}
