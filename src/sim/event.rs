/// Events emitted during a simulation step or a state transition.
/// The presentation layer consumes these for sound and logging.

use crate::domain::entity::GemKind;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    GameStarted,
    Jumped,
    PlayerDied { lives_left: u32 },
    GemCollected { kind: GemKind, x: f32, y: f32, points: u32 },
    EnemyDefeated { x: f32, y: f32, points: u32 },
    /// `level` is the level just finished; the next one is already loaded.
    LevelCleared { level: u32 },
    GameWon { score: u32 },
    GameLost { score: u32 },
}
