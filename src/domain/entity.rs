/// Entities: Player, Platform, Collectible, Enemy, Particle.
/// Plain data plus the small per-entity counters (animation, lifetime).
/// Behaviour that touches more than one entity lives in `sim::step`.

use crate::domain::material::{Material, Rgb};
use crate::domain::physics::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn flip(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// -1.0 for left, +1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Aggregated control state: keyboard, mouse buttons and gamepad OR'd together.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl Controls {
    pub fn merge(self, other: Controls) -> Controls {
        Controls {
            left: self.left || other.left,
            right: self.right || other.right,
            jump: self.jump || other.jump,
        }
    }
}

/// Frame input: held controls plus the wall clock (ms), which only drives
/// the cosmetic gem bob.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub controls: Controls,
    pub clock_ms: f64,
}

/// Moving rectangle shared by Player and Enemy.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub on_ground: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Body { x, y, vx: 0.0, vy: 0.0, w, h, on_ground: false }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

pub const PLAYER_SIZE: f32 = 32.0;
const PLAYER_ANIM_INTERVAL: u32 = 10;
const PLAYER_ANIM_FRAMES: u8 = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub anim_frame: u8,
    pub anim_timer: u32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Player {
            body: Body::new(x, y, PLAYER_SIZE, PLAYER_SIZE),
            facing: Facing::Right,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    /// Back to the spawn point with zero velocity. Facing and animation carry over.
    pub fn respawn(&mut self, x: f32, y: f32) {
        self.body.x = x;
        self.body.y = y;
        self.body.vx = 0.0;
        self.body.vy = 0.0;
    }

    pub fn tick_animation(&mut self) {
        self.anim_timer += 1;
        if self.anim_timer > PLAYER_ANIM_INTERVAL {
            self.anim_frame = (self.anim_frame + 1) % PLAYER_ANIM_FRAMES;
            self.anim_timer = 0;
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Platform {
    pub rect: Rect,
    pub material: Material,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GemKind {
    Diamond,
    Emerald,
}

pub const GEM_SIZE: f32 = 20.0;
const GEM_ANIM_INTERVAL: u32 = 8;
const GEM_ANIM_FRAMES: u8 = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    pub x: f32,
    pub y: f32,
    pub kind: GemKind,
    pub collected: bool,
    pub anim_frame: u8,
    pub anim_timer: u32,
    /// Vertical draw offset (px). Never used for collision.
    pub bob: f32,
}

impl Collectible {
    pub fn new(x: f32, y: f32, kind: GemKind) -> Self {
        Collectible { x, y, kind, collected: false, anim_frame: 0, anim_timer: 0, bob: 0.0 }
    }

    /// Hitbox at the authored position.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, GEM_SIZE, GEM_SIZE)
    }

    /// Marks the gem collected. Returns true only on the first call.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    pub fn tick_animation(&mut self) {
        self.anim_timer += 1;
        if self.anim_timer > GEM_ANIM_INTERVAL {
            self.anim_frame = (self.anim_frame + 1) % GEM_ANIM_FRAMES;
            self.anim_timer = 0;
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnemyKind {
    Goomba,
}

pub const ENEMY_SIZE: f32 = 24.0;
const ENEMY_WALK_SPEED: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub body: Body,
    pub facing: Facing,
    pub defeated: bool,
}

impl Enemy {
    /// Enemies start walking left.
    pub fn new(x: f32, y: f32, kind: EnemyKind) -> Self {
        let mut body = Body::new(x, y, ENEMY_SIZE, ENEMY_SIZE);
        body.vx = -ENEMY_WALK_SPEED;
        Enemy { kind, body, facing: Facing::Left, defeated: false }
    }

    pub fn turn_around(&mut self) {
        self.body.vx = -self.body.vx;
        self.facing = self.facing.flip();
    }
}

pub const PARTICLE_LIFE: u32 = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, color: Rgb) -> Self {
        Particle { x, y, vx, vy, color, life: PARTICLE_LIFE, max_life: PARTICLE_LIFE }
    }

    /// Advance one tick: move, then accelerate downward, then age.
    pub fn tick(&mut self, gravity: f32) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += gravity;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_dead(&self) -> bool {
        self.life == 0
    }

    /// Remaining life as opacity, 1.0 → 0.0.
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 { return 0.0; }
        self.life as f32 / self.max_life as f32
    }
}
