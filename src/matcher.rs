//! Character-by-character comparison of keystrokes against a reference string.
//!
//! A [`MatchCursor`] only ever moves forward: a keystroke equal to the pending
//! character advances it by one, anything else is tallied as an error and
//! discarded. Named keys such as Enter count as mismatches. There is no
//! backspace or correction.

use std::fmt;

/// Keys that never produce a character on their own
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierKey {
    Shift,
    Control,
    Alt,
    Meta,
    CapsLock,
}

/// Non-printing keys the host may forward. All but `Backspace` are compared
/// and never match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedKey {
    Backspace,
    Enter,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Modifier(ModifierKey),
    Named(NamedKey),
}

/// Modifier flags held while a key was pressed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control or meta turn a character into a shortcut chord
    pub fn is_chord(&self) -> bool {
        self.control || self.meta
    }
}

/// One key event as delivered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keystroke {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Keystroke {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A plain character with no modifiers held
    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::NONE)
    }

    pub fn modifier(key: ModifierKey) -> Self {
        Self::new(Key::Modifier(key), Modifiers::NONE)
    }

    pub fn named(key: NamedKey) -> Self {
        Self::new(Key::Named(key), Modifiers::NONE)
    }

    /// The character this keystroke types, if it types one at all.
    ///
    /// Modifier-only keys, named keys and control/meta chords yield `None`.
    pub fn typed_char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.modifiers.is_chord() => Some(c),
            _ => None,
        }
    }
}

impl From<char> for Keystroke {
    fn from(c: char) -> Self {
        Keystroke::char(c)
    }
}

/// Immutable sequence of characters a cursor is matched against
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceText {
    source: String,
    chars: Vec<char>,
}

impl ReferenceText {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let chars = source.chars().collect();
        Self { source, chars }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Length in characters, not bytes
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn first(&self) -> Option<char> {
        self.char_at(0)
    }

    /// Splits the text into the part covered by `position` and the rest
    pub fn split_at_char(&self, position: usize) -> (&str, &str) {
        let byte_idx = self
            .source
            .char_indices()
            .nth(position)
            .map_or(self.source.len(), |(idx, _)| idx);
        self.source.split_at(byte_idx)
    }
}

impl fmt::Display for ReferenceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for ReferenceText {
    fn from(s: &str) -> Self {
        ReferenceText::new(s)
    }
}

impl From<String> for ReferenceText {
    fn from(s: String) -> Self {
        ReferenceText::new(s)
    }
}

/// Progress over a [`ReferenceText`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchCursor {
    /// Count of confirmed-correct characters
    pub position: usize,
    /// Cumulative incorrect keystrokes, never decremented
    pub error_count: usize,
}

impl MatchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self, text: &ReferenceText) -> bool {
        self.position >= text.len()
    }

    /// Total keystrokes that reached the comparison step
    pub fn attempts(&self) -> usize {
        self.position + self.error_count
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Correct,
    Incorrect,
    AlreadyComplete,
    /// Modifier, backspace or chord: nothing was compared
    Ignored,
}

impl MatchResult {
    /// Whether the keystroke reached the comparison step
    pub fn was_compared(&self) -> bool {
        matches!(self, MatchResult::Correct | MatchResult::Incorrect)
    }
}

/// Compares one keystroke against the pending character of `text`.
pub fn submit_keystroke(
    cursor: &mut MatchCursor,
    text: &ReferenceText,
    keystroke: &Keystroke,
) -> MatchResult {
    if keystroke.modifiers.is_chord() {
        return MatchResult::Ignored;
    }
    match keystroke.key {
        Key::Char(c) => submit_char(cursor, text, c),
        Key::Modifier(_) | Key::Named(NamedKey::Backspace) => MatchResult::Ignored,
        Key::Named(_) => submit_mismatch(cursor, text),
    }
}

/// Tallies a key that can never equal the pending character
fn submit_mismatch(cursor: &mut MatchCursor, text: &ReferenceText) -> MatchResult {
    if cursor.is_complete(text) {
        return MatchResult::AlreadyComplete;
    }
    cursor.error_count += 1;
    MatchResult::Incorrect
}

/// Compares a typed character against the pending character of `text`.
pub fn submit_char(cursor: &mut MatchCursor, text: &ReferenceText, c: char) -> MatchResult {
    debug_assert!(cursor.position <= text.len());

    let Some(expected) = text.char_at(cursor.position) else {
        return MatchResult::AlreadyComplete;
    };

    if c == expected {
        cursor.position += 1;
        MatchResult::Correct
    } else {
        cursor.error_count += 1;
        MatchResult::Incorrect
    }
}
