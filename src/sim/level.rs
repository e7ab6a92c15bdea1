/// Level table: three hand-authored levels, compiled in.
///
/// Each level is a spawn point plus ordered lists of platform, gem and
/// enemy descriptors in logical pixels (1280×720, y down). Platform order
/// matters: collision resolves platforms in list order.
///
/// Unknown level numbers resolve to level 1.

use crate::domain::entity::{Collectible, EnemyKind, Enemy, GemKind, Platform, Player};
use crate::domain::material::Material;
use crate::domain::physics::Rect;
use crate::sim::world::WorldState;

pub const LEVEL_COUNT: u32 = 3;

#[derive(Clone, Copy, Debug)]
pub struct PlatformDef {
    pub rect: Rect,
    pub material: Material,
}

#[derive(Clone, Copy, Debug)]
pub struct GemDef {
    pub x: f32,
    pub y: f32,
    pub kind: GemKind,
}

#[derive(Clone, Copy, Debug)]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
}

#[derive(Debug)]
pub struct LevelDef {
    pub spawn: (f32, f32),
    pub platforms: &'static [PlatformDef],
    pub collectibles: &'static [GemDef],
    pub enemies: &'static [EnemyDef],
}

// ── Descriptor shorthands ──

const fn plat(x: f32, y: f32, w: f32, h: f32, material: Material) -> PlatformDef {
    PlatformDef { rect: Rect::new(x, y, w, h), material }
}

const fn diamond(x: f32, y: f32) -> GemDef {
    GemDef { x, y, kind: GemKind::Diamond }
}

const fn emerald(x: f32, y: f32) -> GemDef {
    GemDef { x, y, kind: GemKind::Emerald }
}

const fn goomba(x: f32, y: f32) -> EnemyDef {
    EnemyDef { x, y, kind: EnemyKind::Goomba }
}

use Material::{Brick, Grass, Stone};

static LEVEL_1: LevelDef = LevelDef {
    spawn: (50.0, 100.0),
    platforms: &[
        plat(0.0, 680.0, 200.0, 40.0, Grass),
        plat(300.0, 600.0, 150.0, 20.0, Stone),
        plat(500.0, 520.0, 100.0, 20.0, Brick),
        plat(700.0, 440.0, 120.0, 20.0, Stone),
        plat(900.0, 360.0, 100.0, 20.0, Brick),
        plat(1100.0, 280.0, 180.0, 40.0, Grass),
    ],
    collectibles: &[
        emerald(320.0, 560.0),
        diamond(520.0, 480.0),
        emerald(720.0, 400.0),
        diamond(920.0, 320.0),
        diamond(1150.0, 240.0),
    ],
    enemies: &[
        goomba(350.0, 580.0),
        goomba(750.0, 420.0),
    ],
};

static LEVEL_2: LevelDef = LevelDef {
    spawn: (50.0, 100.0),
    platforms: &[
        plat(0.0, 680.0, 150.0, 40.0, Grass),
        plat(200.0, 620.0, 100.0, 20.0, Stone),
        plat(350.0, 560.0, 80.0, 20.0, Brick),
        plat(480.0, 500.0, 100.0, 20.0, Stone),
        plat(630.0, 440.0, 80.0, 20.0, Brick),
        plat(760.0, 380.0, 100.0, 20.0, Stone),
        plat(910.0, 320.0, 80.0, 20.0, Brick),
        plat(1040.0, 260.0, 120.0, 20.0, Stone),
        plat(1180.0, 200.0, 100.0, 40.0, Grass),
    ],
    collectibles: &[
        emerald(220.0, 580.0),
        emerald(370.0, 520.0),
        diamond(500.0, 460.0),
        emerald(650.0, 400.0),
        diamond(780.0, 340.0),
        emerald(930.0, 280.0),
        diamond(1060.0, 220.0),
        diamond(1200.0, 160.0),
    ],
    enemies: &[
        goomba(250.0, 600.0),
        goomba(520.0, 480.0),
        goomba(800.0, 360.0),
        goomba(1100.0, 240.0),
    ],
};

static LEVEL_3: LevelDef = LevelDef {
    spawn: (50.0, 100.0),
    platforms: &[
        plat(0.0, 680.0, 120.0, 40.0, Grass),
        plat(150.0, 640.0, 80.0, 20.0, Brick),
        plat(260.0, 600.0, 60.0, 20.0, Stone),
        plat(350.0, 560.0, 80.0, 20.0, Brick),
        plat(460.0, 520.0, 60.0, 20.0, Stone),
        plat(550.0, 480.0, 80.0, 20.0, Brick),
        plat(660.0, 440.0, 60.0, 20.0, Stone),
        plat(750.0, 400.0, 80.0, 20.0, Brick),
        plat(860.0, 360.0, 60.0, 20.0, Stone),
        plat(950.0, 320.0, 80.0, 20.0, Brick),
        plat(1060.0, 280.0, 60.0, 20.0, Stone),
        plat(1150.0, 240.0, 80.0, 20.0, Brick),
        plat(1200.0, 180.0, 80.0, 40.0, Grass),
    ],
    collectibles: &[
        emerald(170.0, 600.0),
        emerald(280.0, 560.0),
        diamond(370.0, 520.0),
        emerald(480.0, 480.0),
        diamond(570.0, 440.0),
        emerald(680.0, 400.0),
        diamond(770.0, 360.0),
        emerald(880.0, 320.0),
        diamond(970.0, 280.0),
        emerald(1080.0, 240.0),
        diamond(1170.0, 200.0),
        diamond(1220.0, 140.0),
    ],
    enemies: &[
        goomba(200.0, 620.0),
        goomba(400.0, 540.0),
        goomba(600.0, 460.0),
        goomba(800.0, 380.0),
        goomba(1000.0, 300.0),
        goomba(1200.0, 220.0),
    ],
};

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Descriptor for a level number. Out-of-range numbers fall back to level 1.
pub fn level_def(level: u32) -> &'static LevelDef {
    match level {
        2 => &LEVEL_2,
        3 => &LEVEL_3,
        _ => &LEVEL_1,
    }
}

/// Rebuild every entity list from the level table and place a new player
/// at the spawn point. Score, lives, timer and phase are left alone.
pub fn load_level(world: &mut WorldState, level: u32) {
    let def = level_def(level);

    world.platforms = def.platforms.iter()
        .map(|p| Platform { rect: p.rect, material: p.material })
        .collect();
    world.collectibles = def.collectibles.iter()
        .map(|g| Collectible::new(g.x, g.y, g.kind))
        .collect();
    world.enemies = def.enemies.iter()
        .map(|e| Enemy::new(e.x, e.y, e.kind))
        .collect();
    world.particles.clear();

    world.spawn = def.spawn;
    world.player = Player::new(def.spawn.0, def.spawn.1);

    log::info!(
        "level {level} loaded: {} platforms, {} gems, {} enemies",
        world.platforms.len(), world.collectibles.len(), world.enemies.len(),
    );
}
