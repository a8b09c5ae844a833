//! What the core hands to a renderer: plain values, no drawing.

use crate::games::Playfield;
use crate::metrics::MetricsSnapshot;
use crate::session::SessionState;

/// A typed target as it should appear on screen
#[derive(Debug, Clone, PartialEq)]
pub struct TargetView {
    pub text: String,
    /// Characters already typed
    pub typed: usize,
    pub x: f64,
    pub y: f64,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Cannon,
    Police,
    Thief,
    Basket,
    Frog,
}

/// Non-target sprites a mode positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub kind: ActorKind,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub title: String,
    pub playfield: Playfield,
    /// Score, level and lives; absent in practice mode
    pub session: Option<SessionState>,
    pub targets: Vec<TargetView>,
    pub actors: Vec<Actor>,
    /// Typing metrics; present in practice mode only
    pub metrics: Option<MetricsSnapshot>,
    /// Mode-specific status text shown beside score, e.g. `Distance: 250m`
    pub readout: Option<String>,
    /// Game-over or completion message
    pub banner: Option<String>,
}

impl Scene {
    pub fn new(title: impl Into<String>, playfield: Playfield) -> Self {
        Self {
            title: title.into(),
            playfield,
            session: None,
            targets: Vec::new(),
            actors: Vec::new(),
            metrics: None,
            readout: None,
            banner: None,
        }
    }

    pub fn actor(&self, kind: ActorKind) -> Option<&Actor> {
        self.actors.iter().find(|a| a.kind == kind)
    }
}

/// Outbound draw call; the core never inspects what the renderer does
pub trait Renderer {
    fn render(&mut self, scene: &Scene);
}

/// Keeps every scene it is given; used headless and in tests
impl Renderer for Vec<Scene> {
    fn render(&mut self, scene: &Scene) {
        self.push(scene.clone());
    }
}

/// Keeps only the most recent scene
impl Renderer for Option<Scene> {
    fn render(&mut self, scene: &Scene) {
        *self = Some(scene.clone());
    }
}
