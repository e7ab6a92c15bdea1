/// Input state tracker.
///
/// Keyboard: tracks which keys are currently held, so movement continues
/// while a key is down and start / pause fire once per press.
/// Uses crossterm's keyboard enhancement for Release events when available,
/// and falls back to timeout-based release detection otherwise.
///
/// Mouse: left-button presses on the on-screen ◀ ▶ JUMP bar act as held
/// controls until the button is released anywhere.
///
/// Focus: terminal focus changes are queued so the driver can pause.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::domain::entity::Controls;

/// After this long without a Press/Repeat event a key counts as released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const JUMP_KEYS: [KeyCode; 4] = [KeyCode::Up, KeyCode::Char(' '), KeyCode::Char('w'), KeyCode::Char('W')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    pub mouse_events: Vec<MouseEvent>,

    /// Focus transitions this frame, oldest first: true = gained.
    pub focus_changes: Vec<bool>,

    /// Only true when keyboard enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            mouse_events: Vec::with_capacity(8),
            focus_changes: Vec::with_capacity(2),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame, before the tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.mouse_events.clear();
        self.focus_changes.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key),
                Ok(Event::Mouse(m)) => self.mouse_events.push(m),
                Ok(Event::FocusGained) => self.focus_changes.push(true),
                Ok(Event::FocusLost) => self.focus_changes.push(false),
                _ => {}
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn on_key(&mut self, key: KeyEvent) {
        self.raw_events.push(key);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Not trustworthy without enhancement; the timeout handles it
            }
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active.get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Arrows / WASD / space.
    pub fn keyboard_controls(&self) -> Controls {
        Controls {
            left: self.any_held(&LEFT_KEYS),
            right: self.any_held(&RIGHT_KEYS),
            jump: self.any_held(&JUMP_KEYS),
        }
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

// ══════════════════════════════════════════════════════════════
// On-screen touch buttons
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
}

impl TouchButton {
    pub fn label(self) -> &'static str {
        match self {
            TouchButton::Left => "◀",
            TouchButton::Right => "▶",
            TouchButton::Jump => "JUMP",
        }
    }
}

/// Screen area of one button, in terminal cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ButtonRect {
    pub button: TouchButton,
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl ButtonRect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col && col < self.col + self.width
            && row >= self.row && row < self.row + self.height
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouchLayout {
    pub buttons: Vec<ButtonRect>,
}

impl TouchLayout {
    pub const BUTTON_W: u16 = 10;

    /// ◀ and ▶ at the left edge, JUMP at the right edge, all `height` rows
    /// tall starting at `row`. Empty if the terminal is too narrow.
    pub fn bar(term_w: u16, row: u16, height: u16) -> Self {
        let w = Self::BUTTON_W;
        if term_w < w * 3 + 2 || height == 0 {
            return TouchLayout::default();
        }
        let button = |button, col| ButtonRect { button, col, row, width: w, height };
        TouchLayout {
            buttons: vec![
                button(TouchButton::Left, 1),
                button(TouchButton::Right, w + 2),
                button(TouchButton::Jump, term_w - w - 1),
            ],
        }
    }

    pub fn hit(&self, col: u16, row: u16) -> Option<TouchButton> {
        self.buttons.iter().find(|b| b.contains(col, row)).map(|b| b.button)
    }
}

/// Which touch button (if any) the mouse is holding down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchState {
    pub held: Option<TouchButton>,
}

impl TouchState {
    /// Press selects the button under the pointer, dragging slides between
    /// buttons, and any button-up releases.
    pub fn apply(&mut self, ev: &MouseEvent, layout: &TouchLayout) {
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                self.held = layout.hit(ev.column, ev.row);
            }
            MouseEventKind::Up(_) => self.held = None,
            _ => {}
        }
    }

    pub fn is_held(&self, button: TouchButton) -> bool {
        self.held == Some(button)
    }

    pub fn controls(&self) -> Controls {
        Controls {
            left: self.is_held(TouchButton::Left),
            right: self.is_held(TouchButton::Right),
            jump: self.is_held(TouchButton::Jump),
        }
    }
}
