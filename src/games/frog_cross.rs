//! Word-labelled logs sink with the frog on them; type the next log up to jump.

use log::debug;
use rand::Rng;

use super::{word_views, Arena, GameRules, KeyEffect};
use crate::error::Result;
use crate::matcher::MatchResult;
use crate::scene::{Actor, ActorKind, Scene};
use crate::target::{TargetField, TargetId};

const START_PLATFORMS: u32 = 5;
const PLATFORM_GAP: f64 = 80.0;
const FROG_MARGIN: f64 = 50.0;
const BASE_SINK: f64 = 0.2;
const SINK_STEP: f64 = 0.05;
const SPAWN_Y: f64 = -20.0;
/// A new log appears once the newest one has sunk below this line
const SPAWN_CLEARANCE: f64 = 80.0;
const DESPAWN_MARGIN: f64 = 50.0;
const JUMP_CLEARANCE: f64 = 10.0;
const SPAWN_MARGIN_LEFT: f64 = 50.0;
const SPAWN_MARGIN_RIGHT: f64 = 200.0;
const POINTS: u32 = 20;
const LEVEL_EVERY: u32 = 100;

pub const DROWNED_MESSAGE: &str = "The frog drowned!";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub x: f64,
    pub y: f64,
}

pub fn sink_speed(level: u32) -> f64 {
    BASE_SINK + level as f64 * SINK_STEP
}

#[derive(Debug, Clone)]
pub struct FrogCross {
    platforms: TargetField<Platform>,
    frog_y: f64,
}

impl FrogCross {
    pub fn new(arena: &mut Arena) -> Result<Self> {
        let frog_y = arena.playfield.height - FROG_MARGIN;
        let mut game = Self {
            platforms: TargetField::new(),
            frog_y,
        };
        for i in 1..=START_PLATFORMS {
            game.spawn_platform(frog_y - i as f64 * PLATFORM_GAP, arena)?;
        }
        Ok(game)
    }

    pub fn frog_y(&self) -> f64 {
        self.frog_y
    }

    pub fn platforms(&self) -> &TargetField<Platform> {
        &self.platforms
    }

    fn spawn_platform(&mut self, y: f64, arena: &mut Arena) -> Result<()> {
        let word = arena.corpus.choose(arena.rng)?.to_string();
        let span = (arena.playfield.width - SPAWN_MARGIN_RIGHT).max(0.0);
        let x = arena.rng.gen::<f64>() * span + SPAWN_MARGIN_LEFT;
        debug!("frog cross: log '{word}' at y={y:.0}");
        self.platforms.spawn(word, Platform { x, y });
        Ok(())
    }

    /// The lowest log strictly above the frog; ties go to the earliest spawned
    pub fn jump_target(&self) -> Option<TargetId> {
        let ceiling = self.frog_y - JUMP_CLEARANCE;
        let mut best: Option<(TargetId, f64)> = None;
        for platform in self.platforms.iter() {
            let y = platform.body.y;
            if y >= ceiling {
                continue;
            }
            if best.map_or(true, |(_, top)| y > top) {
                best = Some((platform.id(), y));
            }
        }
        best.map(|(id, _)| id)
    }
}

impl GameRules for FrogCross {
    fn on_tick(&mut self, arena: &mut Arena) -> Result<()> {
        let sink = sink_speed(arena.state.level);
        self.platforms.advance(|platform| platform.y += sink);
        self.frog_y += sink;

        if self.frog_y > arena.playfield.height {
            arena.state.end(DROWNED_MESSAGE);
        }

        if self
            .platforms
            .last()
            .map_or(true, |newest| newest.body.y > SPAWN_CLEARANCE)
        {
            self.spawn_platform(SPAWN_Y, arena)?;
        }

        let floor = arena.playfield.height + DESPAWN_MARGIN;
        self.platforms.expire_where(|t| t.body.y >= floor);
        Ok(())
    }

    fn on_keystroke(&mut self, c: char, arena: &mut Arena) -> Result<KeyEffect> {
        let Some(id) = self.jump_target() else {
            return Ok(KeyEffect::Ignored);
        };
        match self.platforms.submit_to(id, c) {
            Some(MatchResult::Correct) => {}
            _ => return Ok(KeyEffect::Ignored),
        }

        let Some(platform) = self.platforms.get(id) else {
            return Ok(KeyEffect::Ignored);
        };
        if !platform.is_complete() {
            return Ok(KeyEffect::Progressed);
        }
        self.frog_y = platform.body.y;
        arena.state.award(POINTS, LEVEL_EVERY);
        Ok(KeyEffect::Resolved)
    }

    fn draw(&self, scene: &mut Scene) {
        scene.targets = word_views(&self.platforms, |p| (p.x, p.y));
        if let Some(id) = self.jump_target() {
            if let Some(view) = self
                .platforms
                .iter()
                .position(|p| p.id() == id)
                .and_then(|idx| scene.targets.get_mut(idx))
            {
                view.active = true;
            }
        }
        scene.actors.push(Actor {
            kind: ActorKind::Frog,
            x: scene.playfield.width / 2.0,
            y: self.frog_y,
        });
    }
}
