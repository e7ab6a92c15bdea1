/// WorldState: the simulation context for one game.
///
/// Holds the game state (score, level, lives, timer, phase, pause) and
/// every entity list of the loaded level. A new context is built at start
/// and replaced wholesale at restart; only the transition functions in
/// `sim::step` mutate the game-state fields.
///
/// ## Coordinates
///
/// Everything is authored in a fixed logical space of
/// `WORLD_WIDTH × WORLD_HEIGHT` pixels, y growing downward. The renderer
/// scales this space into the terminal; the simulation never sees cells.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::SimConfig;
use crate::domain::entity::{Collectible, Enemy, Particle, Platform, Player};
use crate::domain::rules;
use super::level;

pub const WORLD_WIDTH: f32 = 1280.0;
pub const WORLD_HEIGHT: f32 = 720.0;

/// Simulated seconds per tick. The level timer assumes 60 ticks per second.
pub const TICK_SECONDS: f64 = 1.0 / 60.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Start screen; nothing simulates.
    Title,
    Playing,
    /// Timer ran out or lives exhausted.
    GameOver,
    /// Final level cleared.
    GameComplete,
}

/// Values last pushed to the HUD (the UI text sink).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Hud {
    pub score: u32,
    pub level: u32,
    pub timer: u32,
    pub lives: u32,
}

#[derive(Clone, Debug)]
pub struct WorldState {
    // ── Entities ──
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub spawn: (f32, f32),

    // ── Game state ──
    pub phase: Phase,
    pub paused: bool,
    /// The current pause came from losing terminal focus, not the pause key.
    pub focus_paused: bool,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub time_left: f64,
    pub tick: u64,

    // ── UI ──
    pub hud: Hud,
    /// Free-running frame counter for blinking text; advances while paused.
    pub anim_tick: u32,

    // ── Tuning / randomness ──
    pub sim: SimConfig,
    pub rng: Pcg32,
}

impl WorldState {
    /// Fresh context on the title screen with level 1 loaded behind it.
    pub fn new(sim: SimConfig, seed: u64) -> Self {
        let mut world = WorldState {
            player: Player::new(0.0, 0.0),
            platforms: vec![],
            collectibles: vec![],
            enemies: vec![],
            particles: vec![],
            spawn: (0.0, 0.0),
            phase: Phase::Title,
            paused: false,
            focus_paused: false,
            score: 0,
            level: 1,
            lives: sim.starting_lives,
            time_left: sim.level_time,
            tick: 0,
            hud: Hud::default(),
            anim_tick: 0,
            sim,
            rng: Pcg32::seed_from_u64(seed),
        };
        level::load_level(&mut world, 1);
        world.refresh_hud();
        world
    }

    /// Simulation advances only while playing and not paused.
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Playing && !self.paused
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver | Phase::GameComplete)
    }

    pub fn gems_remaining(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.collected).count()
    }

    /// Push current score/level/timer/lives to the HUD snapshot.
    pub fn refresh_hud(&mut self) {
        self.hud = Hud {
            score: self.score,
            level: self.level,
            timer: rules::display_seconds(self.time_left),
            lives: self.lives,
        };
    }
}
