//! Word-carrying enemies descend; typing a word destroys its enemy.

use log::debug;
use rand::Rng;

use super::{word_views, Arena, GameRules, KeyEffect};
use crate::error::Result;
use crate::scene::{Actor, ActorKind, Scene};
use crate::target::{Routed, TargetField};

const BASE_SPAWN_INTERVAL: u64 = 180;
const MIN_SPAWN_INTERVAL: u64 = 60;
const SPAWN_INTERVAL_STEP: u64 = 5;
const BASE_SPEED: f64 = 0.3;
const SPEED_STEP: f64 = 0.05;
const SPAWN_Y: f64 = -20.0;
const SPAWN_MARGIN_LEFT: f64 = 20.0;
const SPAWN_MARGIN_RIGHT: f64 = 100.0;
const POINTS: u32 = 10;
const LEVEL_EVERY: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
}

pub fn spawn_interval(level: u32) -> u64 {
    BASE_SPAWN_INTERVAL
        .saturating_sub(SPAWN_INTERVAL_STEP * level as u64)
        .max(MIN_SPAWN_INTERVAL)
}

pub fn descent_speed(level: u32) -> f64 {
    BASE_SPEED + level as f64 * SPEED_STEP
}

#[derive(Debug, Clone, Default)]
pub struct SpaceWar {
    enemies: TargetField<Enemy>,
    frame_count: u64,
}

impl SpaceWar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enemies(&self) -> &TargetField<Enemy> {
        &self.enemies
    }

    fn spawn_enemy(&mut self, arena: &mut Arena) -> Result<()> {
        let word = arena.corpus.choose(arena.rng)?.to_string();
        let span = (arena.playfield.width - SPAWN_MARGIN_RIGHT).max(0.0);
        let x = arena.rng.gen::<f64>() * span + SPAWN_MARGIN_LEFT;
        debug!("space war: enemy '{word}' at x={x:.0}");
        self.enemies.spawn(word, Enemy { x, y: SPAWN_Y });
        Ok(())
    }
}

impl GameRules for SpaceWar {
    fn on_tick(&mut self, arena: &mut Arena) -> Result<()> {
        self.frame_count += 1;
        if self.frame_count % spawn_interval(arena.state.level) == 0 {
            self.spawn_enemy(arena)?;
        }

        let speed = descent_speed(arena.state.level);
        self.enemies.advance(|enemy| enemy.y += speed);

        let bottom = arena.playfield.height;
        for _ in self.enemies.expire_where(|t| t.body.y > bottom) {
            arena.state.lose_life();
        }
        Ok(())
    }

    fn on_keystroke(&mut self, c: char, arena: &mut Arena) -> Result<KeyEffect> {
        Ok(match self.enemies.route_word(c) {
            Routed::Resolved(_) => {
                arena.state.award(POINTS, LEVEL_EVERY);
                KeyEffect::Resolved
            }
            Routed::Activated(_) | Routed::Advanced(_) => KeyEffect::Progressed,
            Routed::Mismatched(_) | Routed::Unmatched => KeyEffect::Ignored,
        })
    }

    fn draw(&self, scene: &mut Scene) {
        scene.targets = word_views(&self.enemies, |e| (e.x, e.y));
        scene.actors.push(Actor {
            kind: ActorKind::Cannon,
            x: scene.playfield.width / 2.0,
            y: scene.playfield.height,
        });
    }
}
