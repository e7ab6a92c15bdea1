/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub sim: SimConfig,
    pub gamepad: GamepadConfig,
    pub sound: bool,
}

/// Tuning values the simulation reads every tick.
/// Velocities are px/tick, accelerations px/tick², times in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub gravity: f32,
    pub jump_force: f32,
    pub player_speed: f32,
    pub level_time: f64,
    pub diamond_points: u32,
    pub emerald_points: u32,
    pub enemy_points: u32,
    pub starting_lives: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub pause: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_jump_force")]
    jump_force: f32,
    #[serde(default = "default_player_speed")]
    player_speed: f32,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_level_time")]
    level_time: f64,
    #[serde(default = "default_diamond_points")]
    diamond_points: u32,
    #[serde(default = "default_emerald_points")]
    emerald_points: u32,
    #[serde(default = "default_enemy_points")]
    enemy_points: u32,
    #[serde(default = "default_starting_lives")]
    starting_lives: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump")]
    jump: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_sound")]
    sound: bool,
}

// ── Defaults ──

fn default_gravity() -> f32 { 0.8 }
fn default_jump_force() -> f32 { -15.0 }
fn default_player_speed() -> f32 { 5.0 }
fn default_level_time() -> f64 { 300.0 } // 5 minutes per level
fn default_diamond_points() -> u32 { 50 }
fn default_emerald_points() -> u32 { 25 }
fn default_enemy_points() -> u32 { 100 }
fn default_starting_lives() -> u32 { 3 }

fn default_jump() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_pause() -> Vec<String> { vec!["Y".into()] }
fn default_sound() -> bool { true }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            jump_force: default_jump_force(),
            player_speed: default_player_speed(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            level_time: default_level_time(),
            diamond_points: default_diamond_points(),
            emerald_points: default_emerald_points(),
            enemy_points: default_enemy_points(),
            starting_lives: default_starting_lives(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump(),
            confirm: default_confirm(),
            cancel: default_cancel(),
            pause: default_pause(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { sound: default_sound() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into_game_config()
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        GameConfig::default().sim
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        GameConfig::default().gamepad
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/gemhop, (4) /usr/share/gemhop.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        load_from(&candidate_dirs())
    }

    /// Parse a config document; keys not present take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(TomlConfig::into_game_config)
    }
}

impl TomlConfig {
    fn into_game_config(self) -> GameConfig {
        GameConfig {
            sim: SimConfig {
                gravity: self.physics.gravity,
                jump_force: self.physics.jump_force,
                player_speed: self.physics.player_speed,
                level_time: self.rules.level_time,
                diamond_points: self.rules.diamond_points,
                emerald_points: self.rules.emerald_points,
                enemy_points: self.rules.enemy_points,
                starting_lives: self.rules.starting_lives.max(1),
            },
            gamepad: GamepadConfig {
                jump: self.gamepad.jump,
                confirm: self.gamepad.confirm,
                cancel: self.gamepad.cancel,
                pause: self.gamepad.pause,
            },
            sound: self.general.sound,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a /usr/bin link still finds data next to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gemhop");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/gemhop");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_from(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match GameConfig::from_toml_str(&text) {
                Ok(cfg) => {
                    log::info!("loaded {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    log::warn!("{} parse error, using defaults: {e}", path.display());
                    return GameConfig::default();
                }
            },
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    log::info!("no config.toml found, using defaults");
    GameConfig::default()
}
