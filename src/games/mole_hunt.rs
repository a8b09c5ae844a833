//! Letters pop up in a 3x3 grid and vanish on a timer; type a letter to whack it.

use log::debug;
use rand::seq::SliceRandom;

use super::{Arena, GameRules, KeyEffect};
use crate::corpus::random_letter;
use crate::error::Result;
use crate::scene::{Scene, TargetView};
use crate::target::{Routed, TargetField};

pub const GRID_SIZE: usize = 3;
pub const CELL_SIZE: f64 = 100.0;
const MAX_MOLES: usize = 5;
const BASE_SPAWN_DELAY: u64 = 100;
const MIN_SPAWN_DELAY: u64 = 30;
const SPAWN_DELAY_STEP: u64 = 5;
const BASE_LIFETIME: u32 = 300;
const MIN_LIFETIME: u32 = 30;
const LIFETIME_STEP: u32 = 10;
const POINTS: u32 = 5;
const LEVEL_EVERY: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mole {
    pub row: usize,
    pub col: usize,
    /// Ticks left before the mole escapes
    pub timer: u32,
}

pub fn spawn_delay(level: u32) -> u64 {
    BASE_SPAWN_DELAY
        .saturating_sub(SPAWN_DELAY_STEP * level as u64)
        .max(MIN_SPAWN_DELAY)
}

pub fn lifetime(level: u32) -> u32 {
    BASE_LIFETIME
        .saturating_sub(LIFETIME_STEP * level)
        .max(MIN_LIFETIME)
}

#[derive(Debug, Clone, Default)]
pub struct MoleHunt {
    moles: TargetField<Mole>,
    spawn_timer: u64,
}

impl MoleHunt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moles(&self) -> &TargetField<Mole> {
        &self.moles
    }

    fn spawn_mole(&mut self, arena: &mut Arena) {
        if self.moles.len() >= MAX_MOLES {
            return;
        }
        let free: Vec<(usize, usize)> = (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| !self.moles.iter().any(|m| m.body.row == row && m.body.col == col))
            .collect();
        let Some(&(row, col)) = free.choose(arena.rng) else {
            return;
        };

        let letter = random_letter(arena.rng);
        debug!("mole hunt: '{letter}' at ({row}, {col})");
        self.moles.spawn(
            letter.to_string().as_str(),
            Mole {
                row,
                col,
                timer: lifetime(arena.state.level),
            },
        );
    }

    /// Centre of a grid cell on the playfield
    fn cell_centre(arena_width: f64, arena_height: f64, mole: &Mole) -> (f64, f64) {
        let grid = GRID_SIZE as f64 * CELL_SIZE;
        let offset_x = (arena_width - grid) / 2.0;
        let offset_y = (arena_height - grid) / 2.0;
        (
            offset_x + mole.col as f64 * CELL_SIZE + CELL_SIZE / 2.0,
            offset_y + mole.row as f64 * CELL_SIZE + CELL_SIZE / 2.0,
        )
    }
}

impl GameRules for MoleHunt {
    fn on_tick(&mut self, arena: &mut Arena) -> Result<()> {
        self.spawn_timer += 1;
        if self.spawn_timer > spawn_delay(arena.state.level) {
            self.spawn_mole(arena);
            self.spawn_timer = 0;
        }

        self.moles.advance(|mole| mole.timer = mole.timer.saturating_sub(1));
        for _ in self.moles.expire_where(|t| t.body.timer == 0) {
            arena.state.lose_life();
        }
        Ok(())
    }

    fn on_keystroke(&mut self, c: char, arena: &mut Arena) -> Result<KeyEffect> {
        Ok(match self.moles.resolve_letter(c) {
            Routed::Resolved(_) => {
                arena.state.award(POINTS, LEVEL_EVERY);
                KeyEffect::Resolved
            }
            _ => KeyEffect::Ignored,
        })
    }

    fn draw(&self, scene: &mut Scene) {
        let (width, height) = (scene.playfield.width, scene.playfield.height);
        scene.targets = self
            .moles
            .iter()
            .map(|mole| {
                let (x, y) = Self::cell_centre(width, height, &mole.body);
                TargetView {
                    text: mole.word().to_string(),
                    typed: mole.typed(),
                    x,
                    y,
                    active: false,
                }
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Fixture;
    use crate::games::Playfield;
    use std::collections::HashSet;

    #[test]
    fn test_spawn_delay_and_lifetime_scale_with_level() {
        assert_eq!(spawn_delay(1), 95);
        assert_eq!(spawn_delay(20), 30);
        assert_eq!(lifetime(1), 290);
        assert_eq!(lifetime(10), 200);
        assert_eq!(lifetime(40), MIN_LIFETIME);
    }

    #[test]
    fn test_first_mole_appears_after_delay() {
        let mut fx = Fixture::new(&["unused"]);
        let mut game = MoleHunt::new();

        for _ in 0..95 {
            game.on_tick(&mut fx.arena()).unwrap();
        }
        assert!(game.moles().is_empty());

        game.on_tick(&mut fx.arena()).unwrap();
        assert_eq!(game.moles().len(), 1);
        let mole = game.moles().iter().next().unwrap();
        assert_eq!(mole.word().len(), 1);
        assert!(mole.word().chars().all(|c| c.is_ascii_lowercase()));
        assert_eq!(mole.body.timer, lifetime(1) - 1);
    }

    #[test]
    fn test_moles_capped_and_cells_unique() {
        let mut fx = Fixture::new(&["unused"]);
        let mut game = MoleHunt::new();
        for _ in 0..10 {
            game.spawn_mole(&mut fx.arena());
        }
        assert_eq!(game.moles().len(), MAX_MOLES);

        let cells: HashSet<(usize, usize)> =
            game.moles().iter().map(|m| (m.body.row, m.body.col)).collect();
        assert_eq!(cells.len(), MAX_MOLES);
    }

    #[test]
    fn test_whacking_a_mole_scores() {
        let mut fx = Fixture::new(&["unused"]);
        let mut game = MoleHunt::new();
        game.moles.spawn("q", Mole { row: 0, col: 0, timer: 50 });
        game.moles.spawn("q", Mole { row: 1, col: 1, timer: 50 });

        assert_eq!(game.on_keystroke('w', &mut fx.arena()).unwrap(), KeyEffect::Ignored);
        assert_eq!(game.on_keystroke('q', &mut fx.arena()).unwrap(), KeyEffect::Resolved);

        assert_eq!(fx.state.score, 5);
        let left = game.moles().iter().next().unwrap();
        assert_eq!((left.body.row, left.body.col), (1, 1));
    }

    #[test]
    fn test_escaped_mole_costs_a_life() {
        let mut fx = Fixture::new(&["unused"]);
        let mut game = MoleHunt::new();
        game.moles.spawn("z", Mole { row: 2, col: 2, timer: 2 });

        game.on_tick(&mut fx.arena()).unwrap();
        assert_eq!(game.moles().len(), 1);
        game.on_tick(&mut fx.arena()).unwrap();
        assert!(game.moles().is_empty());
        assert_eq!(fx.state.lives, 2);
    }

    #[test]
    fn test_draw_places_moles_in_grid() {
        let mut game = MoleHunt::new();
        game.moles.spawn("m", Mole { row: 1, col: 2, timer: 9 });

        let mut scene = Scene::new("Mole Hunt", Playfield::default());
        game.draw(&mut scene);
        assert_eq!(scene.targets.len(), 1);
        assert_eq!(scene.targets[0].x, 250.0 + 200.0 + 50.0);
        assert_eq!(scene.targets[0].y, 150.0 + 100.0 + 50.0);
    }
}
