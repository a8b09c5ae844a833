//! Lifecycle of typed targets shared by every mini-game.
//!
//! A target is spawned with a fresh cursor over its word, becomes active when
//! the player starts typing it (word modes only), and is resolved either by a
//! full match or by a mode-specific expiry. Letter modes have no activation
//! step: the first matching keystroke resolves the target.
//!
//! The spatial state of a target is owned by the mode and carried here as an
//! opaque body `B`.

use crate::matcher::{submit_char, MatchCursor, MatchResult, ReferenceText};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Success,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetState {
    Spawned,
    Active,
    Resolved(Resolution),
}

#[derive(Clone, Debug)]
pub struct Target<B> {
    id: TargetId,
    text: ReferenceText,
    cursor: MatchCursor,
    state: TargetState,
    pub body: B,
}

impl<B> Target<B> {
    pub fn new(id: TargetId, text: ReferenceText, body: B) -> Self {
        Self {
            id,
            text,
            cursor: MatchCursor::new(),
            state: TargetState::Spawned,
            body,
        }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn text(&self) -> &ReferenceText {
        &self.text
    }

    pub fn word(&self) -> &str {
        self.text.as_str()
    }

    pub fn cursor(&self) -> &MatchCursor {
        &self.cursor
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    /// Characters confirmed so far
    pub fn typed(&self) -> usize {
        self.cursor.position
    }

    pub fn pending_char(&self) -> Option<char> {
        self.text.char_at(self.cursor.position)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_complete(&self.text)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, TargetState::Resolved(_))
    }

    /// Feeds one character to this target's cursor.
    ///
    /// A correct character moves a spawned target to `Active`; completing the
    /// word resolves it as a success.
    pub fn submit(&mut self, c: char) -> MatchResult {
        if self.is_resolved() {
            return MatchResult::AlreadyComplete;
        }
        let result = submit_char(&mut self.cursor, &self.text, c);
        if result == MatchResult::Correct {
            self.state = if self.is_complete() {
                TargetState::Resolved(Resolution::Success)
            } else {
                TargetState::Active
            };
        }
        result
    }

    pub fn expire(&mut self) {
        self.state = TargetState::Resolved(Resolution::Expired);
    }
}

/// What a keystroke did to the live set
#[derive(Debug)]
pub enum Routed<B> {
    /// No live target accepted the keystroke
    Unmatched,
    /// A spawned target became the active one
    Activated(TargetId),
    /// The active target took one more correct character
    Advanced(TargetId),
    /// The active target rejected the character; discarded
    Mismatched(TargetId),
    /// The target was fully typed and has left the live set
    Resolved(Target<B>),
}

impl<B> Routed<B> {
    pub fn resolved(&self) -> Option<&Target<B>> {
        match self {
            Routed::Resolved(target) => Some(target),
            _ => None,
        }
    }
}

/// The live targets of one session plus the single active target
#[derive(Clone, Debug)]
pub struct TargetField<B> {
    targets: Vec<Target<B>>,
    active: Option<TargetId>,
    next_id: u64,
}

impl<B> Default for TargetField<B> {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            active: None,
            next_id: 0,
        }
    }
}

impl<B> TargetField<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, text: impl Into<ReferenceText>, body: B) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.push(Target::new(id, text.into(), body));
        id
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Live targets in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &Target<B>> {
        self.targets.iter()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target<B>> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn last(&self) -> Option<&Target<B>> {
        self.targets.last()
    }

    pub fn active(&self) -> Option<TargetId> {
        self.active
    }

    pub fn active_target(&self) -> Option<&Target<B>> {
        self.active.and_then(|id| self.get(id))
    }

    /// Applies mode movement to every live body
    pub fn advance(&mut self, mut step: impl FnMut(&mut B)) {
        for target in &mut self.targets {
            step(&mut target.body);
        }
    }

    /// Removes every target matching `expired`, marking each as expired.
    ///
    /// Clears the active target when it is among them. Returned in spawn order.
    pub fn expire_where(&mut self, mut expired: impl FnMut(&Target<B>) -> bool) -> Vec<Target<B>> {
        let mut gone = Vec::new();
        let mut kept = Vec::with_capacity(self.targets.len());
        for mut target in self.targets.drain(..) {
            if expired(&target) {
                target.expire();
                gone.push(target);
            } else {
                kept.push(target);
            }
        }
        self.targets = kept;

        if let Some(active) = self.active {
            if gone.iter().any(|t| t.id == active) {
                self.active = None;
            }
        }
        gone
    }

    /// Word-mode routing: continue the active target, or activate a new one.
    ///
    /// If the active id no longer refers to a live target it is cleared and
    /// activation is attempted once with the same character.
    pub fn route_word(&mut self, c: char) -> Routed<B> {
        if let Some(id) = self.active {
            match self.index_of(id) {
                Some(idx) => return self.continue_active(idx, c),
                None => self.active = None,
            }
        }
        self.activate(c)
    }

    /// Letter-mode routing: the first live target (spawn order) whose pending
    /// character matches is resolved immediately.
    pub fn resolve_letter(&mut self, c: char) -> Routed<B> {
        match self
            .targets
            .iter()
            .position(|t| !t.is_resolved() && t.pending_char() == Some(c))
        {
            Some(idx) => self.submit_and_take(idx, c),
            None => Routed::Unmatched,
        }
    }

    /// Letter-mode routing where the matching target with the highest `rank`
    /// wins; ties go to the earliest spawned.
    pub fn resolve_letter_by(&mut self, c: char, rank: impl Fn(&B) -> f64) -> Routed<B> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, target) in self.targets.iter().enumerate() {
            if target.is_resolved() || target.pending_char() != Some(c) {
                continue;
            }
            let score = rank(&target.body);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }
        match best {
            Some((idx, _)) => self.submit_and_take(idx, c),
            None => Routed::Unmatched,
        }
    }

    /// Feeds a character to a specific target that stays in the live set even
    /// once resolved. Returns `None` when the id is not live.
    pub fn submit_to(&mut self, id: TargetId, c: char) -> Option<MatchResult> {
        let idx = self.index_of(id)?;
        Some(self.targets[idx].submit(c))
    }

    fn index_of(&self, id: TargetId) -> Option<usize> {
        self.targets.iter().position(|t| t.id == id)
    }

    fn activate(&mut self, c: char) -> Routed<B> {
        let Some(idx) = self
            .targets
            .iter()
            .position(|t| t.state == TargetState::Spawned && t.text.first() == Some(c))
        else {
            return Routed::Unmatched;
        };

        let result = self.targets[idx].submit(c);
        debug_assert_eq!(result, MatchResult::Correct);

        if self.targets[idx].is_complete() {
            self.active = None;
            return Routed::Resolved(self.targets.remove(idx));
        }
        let id = self.targets[idx].id;
        self.active = Some(id);
        Routed::Activated(id)
    }

    fn continue_active(&mut self, idx: usize, c: char) -> Routed<B> {
        let id = self.targets[idx].id;
        match self.targets[idx].submit(c) {
            MatchResult::Correct if self.targets[idx].is_complete() => {
                self.active = None;
                Routed::Resolved(self.targets.remove(idx))
            }
            MatchResult::Correct => Routed::Advanced(id),
            MatchResult::Incorrect => Routed::Mismatched(id),
            MatchResult::AlreadyComplete | MatchResult::Ignored => {
                debug_assert!(false, "active target {id:?} was already resolved");
                self.active = None;
                Routed::Unmatched
            }
        }
    }

    fn submit_and_take(&mut self, idx: usize, c: char) -> Routed<B> {
        let result = self.targets[idx].submit(c);
        debug_assert_eq!(result, MatchResult::Correct);
        let target = self.targets.remove(idx);
        if self.active == Some(target.id) {
            self.active = None;
        }
        Routed::Resolved(target)
    }
}
