use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode,
};

use log::warn;

use crate::matcher::{Key, Keystroke, ModifierKey, Modifiers, NamedKey};

/// What the arcade loop acts on, already translated from terminal input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcadeEvent {
    /// A key to route to the running session
    Keystroke(Keystroke),
    /// Esc or Ctrl-C
    Quit,
    /// Tab: start the same kind of session afresh
    Restart,
    Resize,
    Tick,
}

/// Maps a terminal event onto an arcade event. Key releases and terminal
/// events the arcade has no use for yield `None`.
pub fn arcade_event(event: &CtEvent) -> Option<ArcadeEvent> {
    match event {
        CtEvent::Key(key) => key_event(key),
        CtEvent::Resize(_, _) => Some(ArcadeEvent::Resize),
        _ => None,
    }
}

fn key_event(key: &KeyEvent) -> Option<ArcadeEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(ArcadeEvent::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ArcadeEvent::Quit)
        }
        KeyCode::Tab => Some(ArcadeEvent::Restart),
        _ => keystroke_from(key).map(ArcadeEvent::Keystroke),
    }
}

/// Source of arcade events (keystrokes, resize, etc.)
pub trait ArcadeEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<ArcadeEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<ArcadeEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let sent = match event::read() {
                Ok(ev) => match arcade_event(&ev) {
                    Some(arcade_ev) => tx.send(arcade_ev),
                    None => Ok(()),
                },
                Err(e) => {
                    warn!("terminal input closed: {e}");
                    break;
                }
            };
            if sent.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ArcadeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker; one interval is one logical game frame
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms.max(1)))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for headless runs and tests
pub struct TestEventSource {
    rx: Receiver<ArcadeEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<ArcadeEvent>) -> Self {
        Self { rx }
    }
}

impl ArcadeEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ArcadeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the arcade one event/tick at a time
pub struct Runner<E: ArcadeEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: ArcadeEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> ArcadeEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                ArcadeEvent::Tick
            }
        }
    }
}

/// Host frame scheduling as seen by the core: a request/cancel pair keyed by
/// the session epoch the tick belongs to
pub trait TickScheduler {
    fn schedule_next_tick(&mut self, epoch: u64);
    fn cancel_ticking(&mut self);
}

/// At most one pending tick request; the event loop takes it on each timer tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickGate {
    pending: Option<u64>,
}

impl TickGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    /// Consumes the pending request, returning the epoch it was made for
    pub fn take(&mut self) -> Option<u64> {
        self.pending.take()
    }
}

impl TickScheduler for TickGate {
    fn schedule_next_tick(&mut self, epoch: u64) {
        self.pending = Some(epoch);
    }

    fn cancel_ticking(&mut self) {
        self.pending = None;
    }
}

/// Translates a terminal key event into a core keystroke.
///
/// Release events yield `None`; repeats count as presses.
pub fn keystroke_from(key: &KeyEvent) -> Option<Keystroke> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let k = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Named(NamedKey::Backspace),
        KeyCode::Enter => Key::Named(NamedKey::Enter),
        KeyCode::Esc => Key::Named(NamedKey::Escape),
        KeyCode::Tab | KeyCode::BackTab => Key::Named(NamedKey::Tab),
        KeyCode::Left => Key::Named(NamedKey::Left),
        KeyCode::Right => Key::Named(NamedKey::Right),
        KeyCode::Up => Key::Named(NamedKey::Up),
        KeyCode::Down => Key::Named(NamedKey::Down),
        KeyCode::CapsLock => Key::Modifier(ModifierKey::CapsLock),
        KeyCode::Modifier(code) => Key::Modifier(match code {
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => ModifierKey::Shift,
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => ModifierKey::Control,
            ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => ModifierKey::Alt,
            _ => ModifierKey::Meta,
        }),
        _ => Key::Named(NamedKey::Other),
    };

    let m = key.modifiers;
    Some(Keystroke::new(
        k,
        Modifiers {
            shift: m.contains(KeyModifiers::SHIFT),
            control: m.contains(KeyModifiers::CONTROL),
            alt: m.contains(KeyModifiers::ALT),
            meta: m.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        },
    ))
}
