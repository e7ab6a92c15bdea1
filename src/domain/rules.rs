/// Scoring and progression rules: point values, stomp test, level clear,
/// HUD timer rounding. Pure functions over entity data.

use crate::config::SimConfig;
use crate::domain::entity::{Body, Collectible, GemKind};

/// Share of the jump impulse given back to the player after a stomp.
pub const STOMP_BOUNCE: f32 = 0.5;

pub fn gem_points(kind: GemKind, sim: &SimConfig) -> u32 {
    match kind {
        GemKind::Diamond => sim.diamond_points,
        GemKind::Emerald => sim.emerald_points,
    }
}

/// Player comes down on the enemy: moving downward with its top edge
/// still above the enemy's top edge. Anything else is a hit on the player.
pub fn is_stomp(player: &Body, enemy: &Body) -> bool {
    player.vy > 0.0 && player.y < enemy.y
}

/// A level is clear once every collectible has been picked up.
pub fn level_complete(collectibles: &[Collectible]) -> bool {
    collectibles.iter().all(|c| c.collected)
}

/// Whole seconds shown on the HUD (rounded up, never negative).
pub fn display_seconds(time_left: f64) -> u32 {
    time_left.max(0.0).ceil() as u32
}
