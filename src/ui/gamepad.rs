/// Gamepad input via gilrs.
///
/// Mapping comes from `[gamepad]` in config.toml. Defaults:
///   D-pad / Left Stick    →  Move left / right (up also jumps)
///   A / B                 →  Jump
///   Start                 →  Start / Restart
///   Y                     →  Pause
///   Select                →  Quit
///
/// Without the `gamepad` feature this compiles to a pad that is never
/// connected and never reports input.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::Controls;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

const BTN_COUNT: usize = 10;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

impl Btn {
    /// Config name → button. Accepts face letters, compass names and
    /// the usual shoulder aliases, case-insensitively.
    pub fn from_name(s: &str) -> Option<Btn> {
        match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB"    => Some(Btn::L1),
            "R1" | "RB"    => Some(Btn::R1),
            "L2" | "LT"    => Some(Btn::L2),
            "R2" | "RT"    => Some(Btn::R2),
            "START"        => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South         => Some(Btn::A),
            Button::East          => Some(Btn::B),
            Button::West          => Some(Btn::X),
            Button::North         => Some(Btn::Y),
            Button::LeftTrigger   => Some(Btn::L1),
            Button::RightTrigger  => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start         => Some(Btn::Start),
            Button::Select        => Some(Btn::Select),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

/// Action → buttons.
#[derive(Debug, PartialEq)]
struct ActionMap {
    jump: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    pause: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            jump:    vec![Btn::A, Btn::B],
            confirm: vec![Btn::Start],
            cancel:  vec![Btn::Select],
            pause:   vec![Btn::Y],
        }
    }
}

impl ActionMap {
    /// Apply the configured names. An action whose list has no valid
    /// names keeps its default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_into(names: &[String], slot: &mut Vec<Btn>) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if parsed.is_empty() {
                if !names.is_empty() {
                    log::warn!("gamepad: no valid buttons in {names:?}, keeping default");
                }
            } else {
                *slot = parsed;
            }
        }
        let mut map = ActionMap::default();
        parse_into(&cfg.jump, &mut map.jump);
        parse_into(&cfg.confirm, &mut map.confirm);
        parse_into(&cfg.cancel, &mut map.cancel);
        parse_into(&cfg.pause, &mut map.pause);
        map
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],

    dpad_up: bool,
    dpad_left: bool,
    dpad_right: bool,

    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                log::info!("gamepad support ready (pad connected: {has_pad})");
                (Some(g), has_pad)
            }
            Err(e) => {
                log::warn!("gamepad unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad_up: false,
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::from_config(cfg),
            connected,
        }
    }

    /// Poll pending pad events. Call once per frame before reading actions.
    pub fn update(&mut self) {
        for b in &mut self.buttons { b.just_pressed = false; }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(axis, value, _) => match axis {
                    Axis::LeftStickX => self.stick_x = value,
                    Axis::LeftStickY => self.stick_y = value,
                    _ => {}
                },
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        match gilrs_btn {
            Button::DPadUp    => self.dpad_up = held,
            Button::DPadLeft  => self.dpad_left = held,
            Button::DPadRight => self.dpad_right = held,
            other => {
                if let Some(btn) = Btn::from_gilrs(other) {
                    let state = &mut self.buttons[btn_index(btn)];
                    state.held = held;
                    if held { state.just_pressed = true; }
                }
            }
        }
    }

    // ── Action queries ──

    fn any_held(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].held)
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_pressed)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }
    pub fn pause_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.pause)
    }

    pub fn left_held(&self) -> bool {
        self.dpad_left || self.stick_x < -STICK_DEADZONE
    }
    pub fn right_held(&self) -> bool {
        self.dpad_right || self.stick_x > STICK_DEADZONE
    }
    /// Jump buttons, d-pad up, or stick pushed up.
    pub fn jump_held(&self) -> bool {
        self.any_held(&self.action_map.jump)
            || self.dpad_up
            || self.stick_y > STICK_DEADZONE
    }

    pub fn controls(&self) -> Controls {
        Controls {
            left: self.left_held(),
            right: self.right_held(),
            jump: self.jump_held(),
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.dpad_up = false;
        self.dpad_left = false;
        self.dpad_right = false;
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}
