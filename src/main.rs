/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::FrameInput;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState, TICK_SECONDS};
use ui::gamepad::GamepadState;
use ui::input::{InputState, TouchState};
use ui::renderer::Renderer;
use ui::sound::{cue_for, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const DEFAULT_LOG_FILE: &str = "gemhop.log";

fn main() {
    init_logging();

    let config = GameConfig::load();
    let mut world = WorldState::new(config.sim.clone(), time_seed());

    let mut renderer = Renderer::new();
    let honor_release = match renderer.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            let _ = renderer.cleanup();
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let sound = if config.sound {
        SoundEngine::new()
    } else {
        log::info!("sound disabled by config");
        None
    };

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config, honor_release);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Gem Hop!");
    println!("Final Score: {}", world.score);
}

/// Log to a file: the terminal belongs to the game while it runs.
/// Path from `GEMHOP_LOG`, filter from `RUST_LOG` (default info).
fn init_logging() {
    let path = std::env::var("GEMHOP_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
            log::info!("gemhop {} starting", env!("CARGO_PKG_VERSION"));
        }
        Err(e) => eprintln!("warning: cannot open log file {path}: {e} (logging disabled)"),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    honor_release: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = honor_release;
    let mut gp = GamepadState::new(&config.gamepad);
    let mut touch = TouchState::default();

    let tick_rate = Duration::from_secs_f64(TICK_SECONDS);
    let clock = Instant::now();
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();
        for ev in &kb.mouse_events {
            touch.apply(ev, renderer.touch_layout());
        }

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, sound, &kb, &gp) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            // Blink timers keep running on every screen, paused or not
            world.anim_tick = world.anim_tick.wrapping_add(1);

            let input = FrameInput {
                controls: kb.keyboard_controls()
                    .merge(touch.controls())
                    .merge(gp.controls()),
                clock_ms: clock.elapsed().as_secs_f64() * 1000.0,
            };
            let events = step::step(world, input);
            dispatch_events(sound, &events);

            last_tick = Instant::now();
        }

        renderer.render(world, &touch, gp.connected)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Sound and log every event.
fn dispatch_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::GemCollected { kind, x, y, points } => {
                log::debug!("{kind:?} collected at ({x:.0}, {y:.0}), +{points}");
            }
            GameEvent::EnemyDefeated { x, y, points } => {
                log::debug!("enemy stomped at ({x:.0}, {y:.0}), +{points}");
            }
            GameEvent::PlayerDied { lives_left } => log::debug!("died, {lives_left} lives left"),
            GameEvent::LevelCleared { level } => log::debug!("cleared level {level}"),
            GameEvent::GameWon { score } | GameEvent::GameLost { score } => {
                log::debug!("final score {score}");
            }
            GameEvent::GameStarted | GameEvent::Jumped => {}
        }

        if let Some(sfx) = sound {
            sfx.play(cue_for(event));
        }
    }
}

// ── Key Constants ──

const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::F(1), KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];

/// Quit, pause, focus and start/restart. Returns true to quit.
fn handle_meta(
    world: &mut WorldState,
    sound: Option<&SoundEngine>,
    kb: &InputState,
    gp: &GamepadState,
) -> bool {
    if kb.any_pressed(KEYS_QUIT) || gp.cancel_pressed() {
        return true;
    }

    if world.phase == Phase::Playing {
        for &gained in &kb.focus_changes {
            step::focus_changed(world, gained);
        }
        if kb.any_pressed(KEYS_PAUSE) || gp.pause_pressed() {
            let paused = world.paused;
            step::set_paused(world, !paused);
        }
        return false;
    }

    if kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed() {
        let events = match world.phase {
            Phase::Title => step::start_game(world),
            _ => step::restart_game(world),
        };
        dispatch_events(sound, &events);
    }

    false
}
