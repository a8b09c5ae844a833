//! Lettered apples fall; typing a letter moves the basket under the lowest match.

use log::debug;
use rand::Rng;

use super::{Arena, GameRules, KeyEffect, Playfield};
use crate::corpus::random_letter;
use crate::error::Result;
use crate::scene::{Actor, ActorKind, Scene, TargetView};
use crate::target::{Routed, TargetField};

const BASE_SPAWN_INTERVAL: u64 = 80;
const MIN_SPAWN_INTERVAL: u64 = 30;
const SPAWN_INTERVAL_STEP: u64 = 5;
const BASE_FALL: f64 = 1.0;
const FALL_STEP: f64 = 0.2;
const SPAWN_Y: f64 = 20.0;
const SPAWN_MARGIN: f64 = 20.0;
const GROUND_MARGIN: f64 = 50.0;
const POINTS: u32 = 5;
const LEVEL_EVERY: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Apple {
    pub x: f64,
    pub y: f64,
}

pub fn spawn_interval(level: u32) -> u64 {
    BASE_SPAWN_INTERVAL
        .saturating_sub(SPAWN_INTERVAL_STEP * level as u64)
        .max(MIN_SPAWN_INTERVAL)
}

pub fn fall_speed(level: u32) -> f64 {
    BASE_FALL + level as f64 * FALL_STEP
}

#[derive(Debug, Clone)]
pub struct AppleCatch {
    apples: TargetField<Apple>,
    frame_count: u64,
    basket_x: f64,
}

impl AppleCatch {
    pub fn new(playfield: Playfield) -> Self {
        Self {
            apples: TargetField::new(),
            frame_count: 0,
            basket_x: playfield.width / 2.0,
        }
    }

    pub fn apples(&self) -> &TargetField<Apple> {
        &self.apples
    }

    /// Follows the last caught apple
    pub fn basket_x(&self) -> f64 {
        self.basket_x
    }

    fn spawn_apple(&mut self, arena: &mut Arena) {
        let span = (arena.playfield.width - 2.0 * SPAWN_MARGIN).max(0.0);
        let x = arena.rng.gen::<f64>() * span + SPAWN_MARGIN;
        let letter = random_letter(arena.rng);
        debug!("apple catch: '{letter}' at x={x:.0}");
        self.apples
            .spawn(letter.to_string().as_str(), Apple { x, y: SPAWN_Y });
    }
}

impl GameRules for AppleCatch {
    fn on_tick(&mut self, arena: &mut Arena) -> Result<()> {
        self.frame_count += 1;
        if self.frame_count % spawn_interval(arena.state.level) == 0 {
            self.spawn_apple(arena);
        }

        let speed = fall_speed(arena.state.level);
        self.apples.advance(|apple| apple.y += speed);

        let ground = arena.playfield.height - GROUND_MARGIN;
        for _ in self.apples.expire_where(|t| t.body.y > ground) {
            arena.state.lose_life();
        }
        Ok(())
    }

    fn on_keystroke(&mut self, c: char, arena: &mut Arena) -> Result<KeyEffect> {
        Ok(match self.apples.resolve_letter_by(c, |apple| apple.y) {
            Routed::Resolved(caught) => {
                self.basket_x = caught.body.x;
                arena.state.award(POINTS, LEVEL_EVERY);
                KeyEffect::Resolved
            }
            _ => KeyEffect::Ignored,
        })
    }

    fn draw(&self, scene: &mut Scene) {
        scene.targets = self
            .apples
            .iter()
            .map(|apple| TargetView {
                text: apple.word().to_string(),
                typed: apple.typed(),
                x: apple.body.x,
                y: apple.body.y,
                active: false,
            })
            .collect();
        scene.actors.push(Actor {
            kind: ActorKind::Basket,
            x: self.basket_x,
            y: scene.playfield.height - GROUND_MARGIN,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Fixture;

    #[test]
    fn test_spawn_interval_and_speed() {
        assert_eq!(spawn_interval(1), 75);
        assert_eq!(spawn_interval(10), 30);
        assert!((fall_speed(1) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_basket_starts_centred() {
        let game = AppleCatch::new(Playfield::default());
        assert_eq!(game.basket_x(), 400.0);
    }

    #[test]
    fn test_first_apple_spawns_on_interval() {
        let mut fx = Fixture::new(&["unused"]);
        let mut game = AppleCatch::new(fx.playfield);
        for _ in 0..74 {
            game.on_tick(&mut fx.arena()).unwrap();
        }
        assert!(game.apples().is_empty());

        game.on_tick(&mut fx.arena()).unwrap();
        let apple = game.apples().iter().next().unwrap();
        assert!((apple.body.y - (SPAWN_Y + fall_speed(1))).abs() < 1e-9);
        assert!(apple.body.x >= SPAWN_MARGIN && apple.body.x <= 780.0);
    }

    #[test]
    fn test_catch_prefers_lowest_apple() {
        let mut fx = Fixture::new(&["unused"]);
        let mut game = AppleCatch::new(fx.playfield);
        game.apples.spawn("e", Apple { x: 100.0, y: 80.0 });
        game.apples.spawn("e", Apple { x: 200.0, y: 400.0 });
        game.apples.spawn("f", Apple { x: 300.0, y: 500.0 });

        assert_eq!(game.on_keystroke('e', &mut fx.arena()).unwrap(), KeyEffect::Resolved);
        assert_eq!(game.basket_x(), 200.0);
        assert_eq!(fx.state.score, 5);

        let left: Vec<&str> = game.apples().iter().map(|a| a.word()).collect();
        assert_eq!(left, vec!["e", "f"]);
        assert_eq!(game.apples().iter().next().unwrap().body.x, 100.0);
    }

    #[test]
    fn test_unmatched_key_leaves_basket() {
        let mut fx = Fixture::new(&["unused"]);
        let mut game = AppleCatch::new(fx.playfield);
        game.apples.spawn("e", Apple { x: 100.0, y: 80.0 });

        assert_eq!(game.on_keystroke('q', &mut fx.arena()).unwrap(), KeyEffect::Ignored);
        assert_eq!(game.basket_x(), 400.0);
        assert_eq!(game.apples().len(), 1);
    }

    #[test]
    fn test_missed_apple_costs_a_life() {
        let mut fx = Fixture::new(&["unused"]);
        let mut game = AppleCatch::new(fx.playfield);
        game.apples.spawn("m", Apple { x: 100.0, y: 549.5 });

        game.on_tick(&mut fx.arena()).unwrap();
        assert!(game.apples().is_empty());
        assert_eq!(fx.state.lives, 2);
    }

    #[test]
    fn test_draw_shows_basket() {
        let mut game = AppleCatch::new(Playfield::default());
        game.apples.spawn("a", Apple { x: 10.0, y: 20.0 });
        let mut scene = Scene::new("Apple Catching", Playfield::default());
        game.draw(&mut scene);

        assert_eq!(scene.targets.len(), 1);
        let basket = scene.actor(ActorKind::Basket).unwrap();
        assert_eq!((basket.x, basket.y), (400.0, 550.0));
    }
}
