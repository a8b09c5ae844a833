//! A chase along one lane: the thief runs every tick, typing pushes the police.

use log::{debug, info};

use super::{word_views, Arena, GameRules, KeyEffect};
use crate::error::Result;
use crate::scene::{Actor, ActorKind, Scene};
use crate::target::{Routed, TargetField};

pub const POLICE_START: f64 = 50.0;
pub const THIEF_START: f64 = 300.0;
const BASE_SPEED: f64 = 0.5;
const SPEED_STEP: f64 = 0.1;
const POLICE_PACE: f64 = 0.8;
const KEY_BOOST: f64 = 15.0;
const WORD_BOOST: f64 = 30.0;
const WORD_POINTS: u32 = 10;
const CATCH_POINTS: u32 = 100;
const CATCH_DISTANCE: f64 = 30.0;
const ESCAPE_DISTANCE: f64 = 600.0;
const THIEF_HEAD_START_STEP: f64 = 20.0;
const LANE_Y: f64 = 300.0;
const WORD_Y: f64 = 100.0;

pub const ESCAPED_MESSAGE: &str = "The thief got away!";

pub fn thief_speed(level: u32) -> f64 {
    BASE_SPEED + level as f64 * SPEED_STEP
}

#[derive(Debug, Clone)]
pub struct PoliceThief {
    police_x: f64,
    thief_x: f64,
    /// Holds the one word currently on screen
    word: TargetField<()>,
}

impl PoliceThief {
    pub fn new(arena: &mut Arena) -> Result<Self> {
        let mut game = Self {
            police_x: POLICE_START,
            thief_x: THIEF_START,
            word: TargetField::new(),
        };
        game.next_word(arena)?;
        Ok(game)
    }

    pub fn police_x(&self) -> f64 {
        self.police_x
    }

    pub fn thief_x(&self) -> f64 {
        self.thief_x
    }

    pub fn distance(&self) -> f64 {
        self.thief_x - self.police_x
    }

    pub fn current_word(&self) -> Option<&str> {
        self.word.iter().next().map(|t| t.word())
    }

    fn next_word(&mut self, arena: &mut Arena) -> Result<()> {
        let word = arena.corpus.choose(arena.rng)?.to_string();
        debug!("police vs thief: next word '{word}'");
        self.word.spawn(word, ());
        Ok(())
    }

    /// Checks both ends of the chase after positions changed
    fn settle(&mut self, arena: &mut Arena) {
        let distance = self.distance();
        if distance > ESCAPE_DISTANCE {
            info!("thief escaped at distance {distance:.1}");
            arena.state.end(ESCAPED_MESSAGE);
        } else if distance <= CATCH_DISTANCE {
            arena.state.add_score(CATCH_POINTS);
            arena.state.level_up();
            self.police_x = POLICE_START;
            self.thief_x = THIEF_START + arena.state.level as f64 * THIEF_HEAD_START_STEP;
        }
    }
}

impl GameRules for PoliceThief {
    fn on_tick(&mut self, arena: &mut Arena) -> Result<()> {
        let speed = thief_speed(arena.state.level);
        self.thief_x += speed;
        self.police_x += speed * POLICE_PACE;
        self.settle(arena);
        Ok(())
    }

    fn on_keystroke(&mut self, c: char, arena: &mut Arena) -> Result<KeyEffect> {
        let effect = match self.word.route_word(c) {
            Routed::Resolved(_) => {
                self.police_x += KEY_BOOST + WORD_BOOST;
                arena.state.add_score(WORD_POINTS);
                self.next_word(arena)?;
                KeyEffect::Resolved
            }
            Routed::Activated(_) | Routed::Advanced(_) => {
                self.police_x += KEY_BOOST;
                KeyEffect::Progressed
            }
            Routed::Mismatched(_) | Routed::Unmatched => return Ok(KeyEffect::Ignored),
        };
        self.settle(arena);
        Ok(effect)
    }

    fn draw(&self, scene: &mut Scene) {
        let centre = scene.playfield.width / 2.0;
        scene.targets = word_views(&self.word, |_| (centre, WORD_Y));
        scene.actors.push(Actor {
            kind: ActorKind::Police,
            x: self.police_x,
            y: LANE_Y,
        });
        scene.actors.push(Actor {
            kind: ActorKind::Thief,
            x: self.thief_x,
            y: LANE_Y,
        });
        scene.readout = Some(format!("Distance: {}m", self.distance().round()));
    }
}
