/// The step function: advances the world by one tick, plus the game-state
/// transitions (start, pause, level advance, game over).
///
/// Processing order per tick:
///   1. Running check (title / over / paused → no-op)
///   2. Level timer
///   3. Player: input, gravity, movement, platform collision, fall death
///   4. Collectibles: animation, bob, pickup
///   5. Enemies: gravity, movement, ground snap, edge turn, player contact
///   6. Particles
///   7. Level-clear check
///   8. HUD refresh
///
/// Once the game ends inside a tick, the rest of that tick is skipped.

use std::f32::consts::TAU;

use rand::Rng;

use crate::domain::entity::{Facing, FrameInput, Particle};
use crate::domain::material::Rgb;
use crate::domain::physics;
use crate::domain::rules;
use super::event::GameEvent;
use super::level::{self, LEVEL_COUNT};
use super::world::{Phase, WorldState, TICK_SECONDS, WORLD_HEIGHT, WORLD_WIDTH};

const PARTICLE_GRAVITY: f32 = 0.2;
const BURST_COUNT: usize = 8;
/// Gem bob: peak vertical draw offset in px.
const BOB_AMPLITUDE: f32 = 6.0;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput) -> Vec<GameEvent> {
    if !world.is_running() { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    world.time_left -= TICK_SECONDS;
    if world.time_left <= 0.0 {
        world.time_left = 0.0;
        game_over(world, &mut events);
        world.refresh_hud();
        return events;
    }

    update_player(world, &input, &mut events);
    if world.phase == Phase::Playing {
        update_collectibles(world, input.clock_ms, &mut events);
        update_enemies(world, &mut events);
    }
    if world.phase == Phase::Playing {
        update_particles(world);
        if rules::level_complete(&world.collectibles) {
            next_level(world, &mut events);
        }
    }

    world.refresh_hud();
    events
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn update_player(world: &mut WorldState, input: &FrameInput, events: &mut Vec<GameEvent>) {
    let sim = &world.sim;
    let player = &mut world.player;

    // Right is checked after left, so it wins when both are held.
    player.body.vx = 0.0;
    if input.controls.left {
        player.body.vx = -sim.player_speed;
        player.facing = Facing::Left;
    }
    if input.controls.right {
        player.body.vx = sim.player_speed;
        player.facing = Facing::Right;
    }
    if input.controls.jump && player.body.on_ground {
        player.body.vy = sim.jump_force;
        player.body.on_ground = false;
        events.push(GameEvent::Jumped);
    }

    physics::apply_gravity(&mut player.body, sim.gravity);
    physics::integrate(&mut player.body);
    physics::resolve_platforms(&mut player.body, &world.platforms);

    player.body.x = player.body.x.clamp(0.0, WORLD_WIDTH - player.body.w);

    let fell_out = player.body.y > WORLD_HEIGHT;
    if fell_out {
        player_die(world, events);
    }
    world.player.tick_animation();
}

/// Lose a life; respawn, or end the game on the last one.
fn player_die(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    world.lives = world.lives.saturating_sub(1);
    events.push(GameEvent::PlayerDied { lives_left: world.lives });
    log::info!("player died on level {} ({} lives left)", world.level, world.lives);

    if world.lives == 0 {
        game_over(world, events);
    } else {
        let (sx, sy) = world.spawn;
        world.player.respawn(sx, sy);
    }
}

// ══════════════════════════════════════════════════════════════
// Collectibles
// ══════════════════════════════════════════════════════════════

fn update_collectibles(world: &mut WorldState, clock_ms: f64, events: &mut Vec<GameEvent>) {
    let player_rect = world.player.body.rect();
    let mut collected_any = false;

    for gem in &mut world.collectibles {
        gem.tick_animation();
        gem.bob = bob_offset(clock_ms, gem.x);

        if gem.collected || !gem.rect().overlaps(&player_rect) {
            continue;
        }
        if gem.collect() {
            let points = rules::gem_points(gem.kind, &world.sim);
            world.score += points;
            events.push(GameEvent::GemCollected { kind: gem.kind, x: gem.x, y: gem.y, points });

            let (cx, cy) = gem.rect().center();
            spawn_burst(&mut world.particles, &mut world.rng, cx, cy);
            collected_any = true;
        }
    }

    if collected_any {
        world.refresh_hud();
    }
}

/// Cosmetic vertical float, phase-shifted by x so gems don't bob in unison.
fn bob_offset(clock_ms: f64, x: f32) -> f32 {
    ((clock_ms * 0.005) as f32 + x * 0.01).sin() * BOB_AMPLITUDE
}

/// Eight particles fanned evenly around the circle, kicked slightly upward.
fn spawn_burst(particles: &mut Vec<Particle>, rng: &mut impl Rng, x: f32, y: f32) {
    for i in 0..BURST_COUNT {
        let angle = (i as f32 / BURST_COUNT as f32) * TAU;
        let speed = 2.0 + rng.random::<f32>() * 3.0;
        particles.push(Particle::new(
            x, y,
            angle.cos() * speed,
            angle.sin() * speed - 2.0,
            Rgb::GOLD,
        ));
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

fn update_enemies(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for i in 0..world.enemies.len() {
        if world.phase != Phase::Playing { return; }

        let enemy = &mut world.enemies[i];
        if enemy.defeated { continue; }

        physics::apply_gravity(&mut enemy.body, world.sim.gravity);
        physics::integrate(&mut enemy.body);
        physics::resolve_ground(&mut enemy.body, &world.platforms);

        // Patrol turns only at the world edges, never at platform edges.
        if enemy.body.x <= 0.0 || enemy.body.x >= WORLD_WIDTH - enemy.body.w {
            enemy.turn_around();
        }

        if !enemy.body.rect().overlaps(&world.player.body.rect()) {
            continue;
        }

        if rules::is_stomp(&world.player.body, &enemy.body) {
            enemy.defeated = true;
            let points = world.sim.enemy_points;
            world.score += points;
            events.push(GameEvent::EnemyDefeated { x: enemy.body.x, y: enemy.body.y, points });
            world.player.body.vy = world.sim.jump_force * rules::STOMP_BOUNCE;
            world.refresh_hud();
        } else {
            player_die(world, events);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Particles
// ══════════════════════════════════════════════════════════════

fn update_particles(world: &mut WorldState) {
    for p in &mut world.particles {
        p.tick(PARTICLE_GRAVITY);
    }
    world.particles.retain(|p| !p.is_dead());
}

// ══════════════════════════════════════════════════════════════
// Transitions
// ══════════════════════════════════════════════════════════════

/// Start (or restart) a game: the whole context is replaced with a fresh
/// one on level 1. Ignored while a game is already in progress.
pub fn start_game(world: &mut WorldState) -> Vec<GameEvent> {
    if world.phase == Phase::Playing { return vec![]; }

    let seed: u64 = world.rng.random();
    *world = WorldState::new(world.sim.clone(), seed);
    world.phase = Phase::Playing;
    world.refresh_hud();

    log::info!("game started");
    vec![GameEvent::GameStarted]
}

/// Restart from an end screen. Same as start.
pub fn restart_game(world: &mut WorldState) -> Vec<GameEvent> {
    if !world.is_over() { return vec![]; }
    start_game(world)
}

/// Pause or resume from the pause key. Returns true if the flag actually changed.
pub fn set_paused(world: &mut WorldState, paused: bool) -> bool {
    world.focus_paused = false;
    if world.paused == paused { return false; }
    world.paused = paused;
    log::info!("{}", if paused { "paused" } else { "resumed" });
    true
}

/// Terminal focus moved. Losing focus pauses a running game; regaining it
/// resumes only a pause that losing focus caused.
pub fn focus_changed(world: &mut WorldState, gained: bool) -> bool {
    if world.phase != Phase::Playing { return false; }
    if gained {
        if !world.focus_paused { return false; }
        set_paused(world, false)
    } else {
        if world.paused { return false; }
        set_paused(world, true);
        world.focus_paused = true;
        true
    }
}

/// Advance past the level just cleared, or finish the game after the last one.
/// The level counter always moves on, so a win reports `LEVEL_COUNT + 1`.
pub fn next_level(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let cleared = world.level;
    world.level = cleared + 1;

    if world.level > LEVEL_COUNT {
        world.phase = Phase::GameComplete;
        events.push(GameEvent::GameWon { score: world.score });
        log::info!("all levels cleared, final score {}", world.score);
        return;
    }

    world.time_left = world.sim.level_time;
    level::load_level(world, world.level);
    events.push(GameEvent::LevelCleared { level: cleared });
    log::info!("level {cleared} cleared, score {}", world.score);
}

fn game_over(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Playing { return; }
    world.phase = Phase::GameOver;
    events.push(GameEvent::GameLost { score: world.score });
    log::info!(
        "game over on level {}, score {} after {} ticks",
        world.level, world.score, world.tick,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::domain::entity::{Controls, GemKind};
    use proptest::prelude::*;

    fn playing() -> WorldState {
        let mut w = WorldState::new(SimConfig::default(), 42);
        start_game(&mut w);
        w
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn holding(controls: Controls) -> FrameInput {
        FrameInput { controls, clock_ms: 0.0 }
    }

    /// Park the player on the ground platform, out of everyone's way.
    fn park_player(w: &mut WorldState) {
        w.player.body.x = 50.0;
        w.player.body.y = 648.0;
        w.player.body.vy = 0.0;
        w.player.body.on_ground = true;
    }

    /// Move the player onto a gem's hitbox.
    fn touch_gem(w: &mut WorldState, idx: usize) {
        let (x, y) = (w.collectibles[idx].x, w.collectibles[idx].y);
        w.player.body.x = x;
        w.player.body.y = y;
        w.player.body.vx = 0.0;
        w.player.body.vy = 0.0;
    }

    /// Comparable projection of everything a tick could touch.
    fn snapshot(w: &WorldState) -> String {
        format!(
            "{:?}|{:?}|{:?}|{:?}|{:?}|{}|{}|{}|{}|{:?}",
            w.player, w.collectibles, w.enemies, w.particles, w.phase,
            w.score, w.level, w.lives, w.time_left, w.hud,
        )
    }

    // ── Running check ──

    #[test]
    fn title_tick_is_noop() {
        let mut w = WorldState::new(SimConfig::default(), 42);
        let before = snapshot(&w);
        for _ in 0..30 {
            assert!(step(&mut w, holding(Controls { right: true, jump: true, left: false })).is_empty());
        }
        assert_eq!(snapshot(&w), before);
    }

    #[test]
    fn game_over_tick_is_noop() {
        let mut w = playing();
        w.time_left = 0.5 * TICK_SECONDS;
        let events = step(&mut w, idle());
        assert_eq!(events, vec![GameEvent::GameLost { score: 0 }]);
        let before = snapshot(&w);
        assert!(step(&mut w, idle()).is_empty());
        assert_eq!(snapshot(&w), before);
    }

    // ── Timer ──

    #[test]
    fn timer_counts_down_one_sixtieth_per_tick() {
        let mut w = playing();
        step(&mut w, idle());
        assert!((w.time_left - (300.0 - TICK_SECONDS)).abs() < 1e-9);
        for _ in 0..59 { step(&mut w, idle()); }
        assert!((w.time_left - 299.0).abs() < 1e-9);
        for _ in 0..30 { step(&mut w, idle()); }
        assert_eq!(w.hud.timer, 299);
    }

    #[test]
    fn timer_expiry_ends_game_exactly_once() {
        let mut w = playing();
        w.time_left = 2.5 * TICK_SECONDS;

        assert!(step(&mut w, idle()).iter().all(|e| !matches!(e, GameEvent::GameLost { .. })));
        assert!(step(&mut w, idle()).iter().all(|e| !matches!(e, GameEvent::GameLost { .. })));
        assert_eq!(w.phase, Phase::Playing);

        let events = step(&mut w, idle());
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::GameLost { .. })).count(), 1);
        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.time_left, 0.0);
        assert_eq!(w.hud.timer, 0);

        for _ in 0..10 { assert!(step(&mut w, idle()).is_empty()); }
    }

    // ── Player movement ──

    #[test]
    fn right_wins_when_both_held() {
        let mut w = playing();
        park_player(&mut w);
        step(&mut w, holding(Controls { left: true, right: true, jump: false }));
        assert_eq!(w.player.body.vx, 5.0);
        assert_eq!(w.player.facing, Facing::Right);
        assert_eq!(w.player.body.x, 55.0);
    }

    #[test]
    fn left_moves_and_faces_left() {
        let mut w = playing();
        park_player(&mut w);
        step(&mut w, holding(Controls { left: true, ..Controls::default() }));
        assert_eq!(w.player.body.x, 45.0);
        assert_eq!(w.player.facing, Facing::Left);
    }

    #[test]
    fn spawn_falls_onto_ground_platform() {
        let mut w = playing();
        for _ in 0..60 { step(&mut w, idle()); }
        assert!(w.player.body.on_ground);
        assert_eq!(w.player.body.y, 680.0 - 32.0);
        assert_eq!(w.player.body.vy, 0.0);
    }

    #[test]
    fn jump_only_from_ground() {
        let mut w = playing();
        // Mid-air at spawn: jump ignored
        let events = step(&mut w, holding(Controls { jump: true, ..Controls::default() }));
        assert!(!events.contains(&GameEvent::Jumped));

        park_player(&mut w);
        let events = step(&mut w, holding(Controls { jump: true, ..Controls::default() }));
        assert!(events.contains(&GameEvent::Jumped));
        // Impulse then one tick of gravity
        assert!((w.player.body.vy - (-15.0 + 0.8)).abs() < 1e-5);
        assert!(!w.player.body.on_ground);
    }

    #[test]
    fn clamped_to_world_edges() {
        let mut w = playing();
        park_player(&mut w);
        w.player.body.x = 2.0;
        step(&mut w, holding(Controls { left: true, ..Controls::default() }));
        assert_eq!(w.player.body.x, 0.0);

        w.player.body.x = WORLD_WIDTH - 34.0;
        w.player.body.y = 100.0;
        step(&mut w, holding(Controls { right: true, ..Controls::default() }));
        assert_eq!(w.player.body.x, WORLD_WIDTH - 32.0);
    }

    // ── Death ──

    #[test]
    fn falling_out_costs_a_life_and_respawns() {
        let mut w = playing();
        w.player.body.x = 600.0;
        w.player.body.y = WORLD_HEIGHT + 5.0;
        let events = step(&mut w, idle());
        assert!(events.contains(&GameEvent::PlayerDied { lives_left: 2 }));
        assert_eq!(w.lives, 2);
        assert_eq!((w.player.body.x, w.player.body.y), (50.0, 100.0));
        assert_eq!((w.player.body.vx, w.player.body.vy), (0.0, 0.0));
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn third_death_ends_game() {
        let mut w = playing();
        for expected_lives in [2, 1] {
            w.player.body.x = 600.0;
            w.player.body.y = WORLD_HEIGHT + 5.0;
            step(&mut w, idle());
            assert_eq!(w.lives, expected_lives);
            assert_eq!(w.phase, Phase::Playing);
        }
        w.player.body.x = 600.0;
        w.player.body.y = WORLD_HEIGHT + 5.0;
        let events = step(&mut w, idle());
        assert_eq!(w.lives, 0);
        assert_eq!(w.phase, Phase::GameOver);
        assert!(events.contains(&GameEvent::GameLost { score: 0 }));
        // No respawn on the final death
        assert!(w.player.body.y > WORLD_HEIGHT);
    }

    // ── Collectibles ──

    #[test]
    fn diamond_scores_fifty_and_bursts() {
        let mut w = playing();
        let idx = w.collectibles.iter()
            .position(|c| (c.x, c.y) == (520.0, 480.0))
            .unwrap();
        touch_gem(&mut w, idx);
        let events = step(&mut w, idle());

        assert_eq!(w.score, 50);
        assert_eq!(w.hud.score, 50);
        assert!(w.collectibles[idx].collected);
        assert!(events.iter().any(|e| matches!(
            e, GameEvent::GemCollected { kind: GemKind::Diamond, points: 50, .. }
        )));
        // Burst spawned then aged one tick in the same step
        assert_eq!(w.particles.len(), 8);
        assert!(w.particles.iter().all(|p| p.life == p.max_life - 1));
    }

    #[test]
    fn diamond_and_emerald_total_75() {
        let mut w = playing();
        w.enemies.clear();
        let diamond = w.collectibles.iter().position(|c| c.kind == GemKind::Diamond).unwrap();
        let emerald = w.collectibles.iter().position(|c| c.kind == GemKind::Emerald).unwrap();
        touch_gem(&mut w, diamond);
        step(&mut w, idle());
        touch_gem(&mut w, emerald);
        step(&mut w, idle());
        assert_eq!(w.score, 75);
    }

    #[test]
    fn gem_cannot_be_collected_twice() {
        let mut w = playing();
        w.enemies.clear();
        touch_gem(&mut w, 0);
        step(&mut w, idle());
        let after_first = w.score;
        touch_gem(&mut w, 0);
        let events = step(&mut w, idle());
        assert_eq!(w.score, after_first);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GemCollected { .. })));
    }

    #[test]
    fn bob_never_moves_hitbox() {
        let mut w = playing();
        park_player(&mut w);
        let before: Vec<(f32, f32)> = w.collectibles.iter().map(|c| (c.x, c.y)).collect();
        for t in 0..50 {
            step(&mut w, FrameInput { controls: Controls::default(), clock_ms: t as f64 * 16.7 });
        }
        let after: Vec<(f32, f32)> = w.collectibles.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(before, after);
        assert!(w.collectibles.iter().all(|c| c.bob.abs() <= BOB_AMPLITUDE));
    }

    #[test]
    fn particles_expire() {
        let mut w = playing();
        park_player(&mut w);
        spawn_burst(&mut w.particles, &mut w.rng, 100.0, 100.0);
        for _ in 0..29 { step(&mut w, idle()); }
        assert_eq!(w.particles.len(), 8);
        step(&mut w, idle());
        assert!(w.particles.is_empty());
    }

    #[test]
    fn burst_fans_out_with_upward_kick() {
        let mut w = playing();
        let mut particles = vec![];
        spawn_burst(&mut particles, &mut w.rng, 0.0, 0.0);
        assert_eq!(particles.len(), 8);
        // First particle heads right (angle 0), speed in [2, 5)
        assert!(particles[0].vx >= 2.0 && particles[0].vx < 5.0);
        assert!((particles[0].vy - -2.0).abs() < 1e-5);
        // Quarter turn heads down, minus the kick
        assert!(particles[2].vx.abs() < 1e-4);
    }

    // ── Level progression ──

    #[test]
    fn level_one_scenario() {
        let mut w = playing();
        assert_eq!(w.platforms.len(), 6);
        assert_eq!(w.collectibles.len(), 5);
        assert_eq!(w.enemies.len(), 2);
        assert_eq!((w.player.body.x, w.player.body.y), (50.0, 100.0));
        // Both emeralds sit right above a patrolling enemy
        w.enemies.clear();

        // Burn some time first so the reset is visible
        for _ in 0..120 { step(&mut w, idle()); }
        assert!(w.time_left < 300.0);

        let mut cleared = 0;
        for idx in [1, 4, 0, 3, 2] {
            touch_gem(&mut w, idx);
            let events = step(&mut w, idle());
            cleared += events.iter().filter(|e| matches!(e, GameEvent::LevelCleared { .. })).count();
            if idx == 1 { assert_eq!(w.score, 50); }
        }

        assert_eq!(cleared, 1);
        assert_eq!(w.level, 2);
        assert_eq!(w.time_left, 300.0);
        assert_eq!(w.hud.timer, 300);
        assert_eq!(w.collectibles.len(), 8);
        assert_eq!(w.gems_remaining(), 8);
        assert_eq!(w.score, 50 + 50 + 25 + 50 + 25);
    }

    #[test]
    fn clearing_level_three_wins() {
        let mut w = playing();
        w.level = 3;
        level::load_level(&mut w, 3);
        let n = w.collectibles.len();
        for gem in w.collectibles.iter_mut().take(n - 1) {
            gem.collect();
        }
        touch_gem(&mut w, n - 1);
        let events = step(&mut w, idle());

        assert_eq!(w.phase, Phase::GameComplete);
        assert_eq!(w.level, 4);
        assert_eq!(w.hud.level, 4);
        // Nothing past the last level gets loaded
        assert_eq!(w.collectibles.len(), n);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameWon { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelCleared { .. })));
        assert!(step(&mut w, idle()).is_empty());
    }

    // ── Enemies ──

    #[test]
    fn enemy_patrols_and_walks_off_platforms() {
        let mut w = playing();
        park_player(&mut w);
        // First level-1 enemy starts on the stone ledge at x=300..450 walking left
        for _ in 0..120 { step(&mut w, idle()); }
        let e = &w.enemies[0];
        assert!(!e.defeated);
        assert!(e.body.x < 300.0);
        assert!(e.body.y > 600.0); // dropped off the ledge
    }

    #[test]
    fn enemy_turns_at_world_edge() {
        let mut w = playing();
        park_player(&mut w);
        w.enemies[1].body.x = 0.5;
        w.enemies[1].body.y = 100.0;
        step(&mut w, idle());
        assert_eq!(w.enemies[1].body.vx, 1.0);
        assert_eq!(w.enemies[1].facing, Facing::Right);
    }

    #[test]
    fn stomp_defeats_enemy() {
        let mut w = playing();
        let enemy = w.enemies[0].body;
        // Fall onto its head
        w.player.body.x = enemy.x;
        w.player.body.y = enemy.y - 30.0;
        w.player.body.vy = 3.0;
        let events = step(&mut w, idle());

        assert!(w.enemies[0].defeated);
        assert_eq!(w.score, 100);
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyDefeated { points: 100, .. })));
        assert_eq!(w.player.body.vy, -7.5);
        assert_eq!(w.lives, 3);

        // Defeated enemies freeze but stay in the list
        let frozen = w.enemies[0].body;
        step(&mut w, idle());
        assert_eq!(w.enemies[0].body, frozen);
        assert_eq!(w.enemies.len(), 2);
    }

    #[test]
    fn side_contact_kills_player() {
        let mut w = playing();
        let enemy = w.enemies[0].body;
        w.player.body.x = enemy.x + 4.0;
        w.player.body.y = enemy.y - 8.0;
        w.player.body.vy = -0.8; // rising: gravity brings it to 0 this tick
        let events = step(&mut w, idle());
        assert!(events.contains(&GameEvent::PlayerDied { lives_left: 2 }));
        assert!(!w.enemies[0].defeated);
        assert_eq!((w.player.body.x, w.player.body.y), (50.0, 100.0));
    }

    // ── Transitions ──

    #[test]
    fn start_resets_everything() {
        let mut w = playing();
        w.score = 900;
        w.lives = 1;
        w.level = 3;
        w.phase = Phase::GameOver;
        let events = restart_game(&mut w);
        assert_eq!(events, vec![GameEvent::GameStarted]);
        assert_eq!((w.score, w.lives, w.level, w.time_left), (0, 3, 1, 300.0));
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.collectibles.len(), 5);
    }

    #[test]
    fn start_ignored_mid_game() {
        let mut w = playing();
        w.score = 40;
        assert!(start_game(&mut w).is_empty());
        assert_eq!(w.score, 40);
        assert!(restart_game(&mut w).is_empty());
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut w = playing();
        step(&mut w, idle());
        assert!(set_paused(&mut w, true));
        assert!(!set_paused(&mut w, true));
        let before = snapshot(&w);
        for _ in 0..100 {
            assert!(step(&mut w, holding(Controls { right: true, ..Controls::default() })).is_empty());
        }
        assert_eq!(snapshot(&w), before);

        assert!(set_paused(&mut w, false));
        let t = w.time_left;
        step(&mut w, idle());
        assert!(w.time_left < t);
    }

    #[test]
    fn focus_loss_pauses_and_regain_resumes() {
        let mut w = playing();
        assert!(focus_changed(&mut w, false));
        assert!(w.paused);
        assert!(focus_changed(&mut w, true));
        assert!(!w.paused);
        assert!(!w.focus_paused);
    }

    #[test]
    fn regaining_focus_keeps_a_manual_pause() {
        let mut w = playing();
        set_paused(&mut w, true);
        assert!(!focus_changed(&mut w, false));
        assert!(!focus_changed(&mut w, true));
        assert!(w.paused);

        // Pause key resumes as usual
        assert!(set_paused(&mut w, false));
        assert!(!w.paused);
    }

    #[test]
    fn pause_key_during_focus_pause_takes_over() {
        let mut w = playing();
        focus_changed(&mut w, false);
        // Resumed by hand, then paused by hand again while still unfocused
        set_paused(&mut w, false);
        set_paused(&mut w, true);
        assert!(!focus_changed(&mut w, true));
        assert!(w.paused);
    }

    #[test]
    fn focus_ignored_off_the_playfield() {
        let mut w = WorldState::new(SimConfig::default(), 42);
        assert!(!focus_changed(&mut w, false));
        assert!(!w.paused);
    }

    proptest! {
        #[test]
        fn clearing_in_any_order_advances_once(
            order in Just((0..5usize).collect::<Vec<_>>()).prop_shuffle(),
        ) {
            let mut w = playing();
            w.enemies.clear();
            let mut cleared = 0;
            for idx in order {
                prop_assert_eq!(w.level, 1);
                touch_gem(&mut w, idx);
                let events = step(&mut w, idle());
                cleared += events.iter()
                    .filter(|e| matches!(e, GameEvent::LevelCleared { .. }))
                    .count();
            }
            prop_assert_eq!(cleared, 1);
            prop_assert_eq!(w.level, 2);
            prop_assert_eq!(w.score, 3 * 50 + 2 * 25);
            prop_assert_eq!(w.gems_remaining(), 8);
        }

        #[test]
        fn paused_ticks_change_nothing(
            ticks in 1usize..200,
            left in any::<bool>(),
            right in any::<bool>(),
            jump in any::<bool>(),
            warmup in 0usize..120,
        ) {
            let mut w = playing();
            for _ in 0..warmup { step(&mut w, idle()); }
            set_paused(&mut w, true);
            let before = snapshot(&w);
            for _ in 0..ticks {
                step(&mut w, holding(Controls { left, right, jump }));
            }
            prop_assert_eq!(snapshot(&w), before);
        }

        #[test]
        fn timer_strictly_decreases_while_running(ticks in 1usize..400) {
            let mut w = playing();
            let mut prev = w.time_left;
            for _ in 0..ticks {
                step(&mut w, idle());
                if w.phase != Phase::Playing { break; }
                prop_assert!(w.time_left < prev);
                prev = w.time_left;
            }
        }
    }
}
