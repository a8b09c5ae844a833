//! The five mini-games: one closed enum of modes over the shared target
//! lifecycle, driven by logical ticks and typed characters.

pub mod apple_catch;
pub mod frog_cross;
pub mod mole_hunt;
pub mod police_thief;
pub mod space_war;

use std::sync::Arc;

use clap::ValueEnum;
use log::debug;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::corpus::WordCorpus;
use crate::error::Result;
use crate::matcher::Keystroke;
use crate::scene::{Scene, TargetView};
use crate::session::SessionState;
use crate::target::TargetField;

pub use apple_catch::AppleCatch;
pub use frog_cross::FrogCross;
pub use mole_hunt::MoleHunt;
pub use police_thief::PoliceThief;
pub use space_war::SpaceWar;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameId {
    SpaceWar,
    MoleHunt,
    PoliceThief,
    AppleCatch,
    FrogCross,
}

impl GameId {
    pub const ALL: [GameId; 5] = [
        GameId::SpaceWar,
        GameId::MoleHunt,
        GameId::PoliceThief,
        GameId::AppleCatch,
        GameId::FrogCross,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            GameId::SpaceWar => "Space War",
            GameId::MoleHunt => "Mole Hunt",
            GameId::PoliceThief => "Police vs Thief",
            GameId::AppleCatch => "Apple Catching",
            GameId::FrogCross => "Frog Crossing",
        }
    }
}

/// Size of the logical play area targets move in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Everything a mode may touch besides its own state
pub struct Arena<'a> {
    pub state: &'a mut SessionState,
    pub rng: &'a mut StdRng,
    pub corpus: &'a WordCorpus,
    pub playfield: Playfield,
}

/// What one typed character did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEffect {
    /// Nothing matched, or a mismatch was discarded
    Ignored,
    /// A target took a correct character
    Progressed,
    /// A target was fully typed
    Resolved,
}

/// Capability every mode provides
pub trait GameRules {
    /// Advances one logical tick: movement, spawning, expiry
    fn on_tick(&mut self, arena: &mut Arena) -> Result<()>;

    fn on_keystroke(&mut self, c: char, arena: &mut Arena) -> Result<KeyEffect>;

    /// Adds this mode's targets and actors to a scene
    fn draw(&self, scene: &mut Scene);
}

#[derive(Debug, Clone)]
pub enum GameMode {
    SpaceWar(SpaceWar),
    MoleHunt(MoleHunt),
    PoliceThief(PoliceThief),
    AppleCatch(AppleCatch),
    FrogCross(FrogCross),
}

impl GameMode {
    pub fn new(id: GameId, arena: &mut Arena) -> Result<Self> {
        Ok(match id {
            GameId::SpaceWar => GameMode::SpaceWar(SpaceWar::new()),
            GameId::MoleHunt => GameMode::MoleHunt(MoleHunt::new()),
            GameId::PoliceThief => GameMode::PoliceThief(PoliceThief::new(arena)?),
            GameId::AppleCatch => GameMode::AppleCatch(AppleCatch::new(arena.playfield)),
            GameId::FrogCross => GameMode::FrogCross(FrogCross::new(arena)?),
        })
    }

    fn rules(&self) -> &dyn GameRules {
        match self {
            GameMode::SpaceWar(m) => m,
            GameMode::MoleHunt(m) => m,
            GameMode::PoliceThief(m) => m,
            GameMode::AppleCatch(m) => m,
            GameMode::FrogCross(m) => m,
        }
    }

    fn rules_mut(&mut self) -> &mut dyn GameRules {
        match self {
            GameMode::SpaceWar(m) => m,
            GameMode::MoleHunt(m) => m,
            GameMode::PoliceThief(m) => m,
            GameMode::AppleCatch(m) => m,
            GameMode::FrogCross(m) => m,
        }
    }
}

impl GameRules for GameMode {
    fn on_tick(&mut self, arena: &mut Arena) -> Result<()> {
        self.rules_mut().on_tick(arena)
    }

    fn on_keystroke(&mut self, c: char, arena: &mut Arena) -> Result<KeyEffect> {
        self.rules_mut().on_keystroke(c, arena)
    }

    fn draw(&self, scene: &mut Scene) {
        self.rules().draw(scene)
    }
}

/// One running mini-game: its mode, the session counters and its own RNG
#[derive(Debug)]
pub struct GameSession {
    id: GameId,
    mode: GameMode,
    state: SessionState,
    rng: StdRng,
    corpus: Arc<WordCorpus>,
    playfield: Playfield,
    ticks: u64,
}

impl GameSession {
    /// Fresh session with score 0, level 1 and 3 lives.
    ///
    /// Fails with `EmptyCorpus` before anything is spawned.
    pub fn start(
        id: GameId,
        corpus: Arc<WordCorpus>,
        playfield: Playfield,
        mut rng: StdRng,
    ) -> Result<Self> {
        corpus.ensure_non_empty()?;

        let mut state = SessionState::new();
        let mode = GameMode::new(
            id,
            &mut Arena {
                state: &mut state,
                rng: &mut rng,
                corpus: &corpus,
                playfield,
            },
        )?;
        debug!("started {id} on a {}x{} playfield", playfield.width, playfield.height);

        Ok(Self {
            id,
            mode,
            state,
            rng,
            corpus,
            playfield,
            ticks: 0,
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.id.title()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances one logical tick. A finished game no longer changes.
    pub fn on_tick(&mut self) -> Result<()> {
        if self.is_over() {
            return Ok(());
        }
        self.ticks += 1;
        let mut arena = Arena {
            state: &mut self.state,
            rng: &mut self.rng,
            corpus: &self.corpus,
            playfield: self.playfield,
        };
        self.mode.on_tick(&mut arena)
    }

    /// Routes a keystroke; only characters reach the mode.
    pub fn on_keystroke(&mut self, keystroke: &Keystroke) -> Result<KeyEffect> {
        if self.is_over() {
            return Ok(KeyEffect::Ignored);
        }
        let Some(c) = keystroke.typed_char() else {
            return Ok(KeyEffect::Ignored);
        };
        let mut arena = Arena {
            state: &mut self.state,
            rng: &mut self.rng,
            corpus: &self.corpus,
            playfield: self.playfield,
        };
        self.mode.on_keystroke(c, &mut arena)
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.title(), self.playfield);
        scene.session = Some(self.state.clone());
        scene.banner = self.state.message().map(str::to_string);
        self.mode.draw(&mut scene);
        scene
    }
}

/// Word targets drawn at their body position
pub(crate) fn word_views<B>(
    field: &TargetField<B>,
    position: impl Fn(&B) -> (f64, f64),
) -> Vec<TargetView> {
    field
        .iter()
        .map(|target| {
            let (x, y) = position(&target.body);
            TargetView {
                text: target.word().to_string(),
                typed: target.typed(),
                x,
                y,
                active: field.active() == Some(target.id()),
            }
        })
        .collect()
}
