use thiserror::Error;

/// Invariant violations raised by the game core. These point at a bug in the
/// caller (a bad route parameter, an unknown id), never at player input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("unknown avatar character: {0}")]
    UnknownCharacter(String),

    #[error("unknown avatar color: {0}")]
    UnknownColor(String),

    #[error("unknown world: {0}")]
    UnknownWorld(u8),

    #[error("world {0} is still locked")]
    WorldLocked(u8),

    #[error("level {level} is out of range (1..={max})")]
    InvalidLevel { level: u32, max: u32 },
}

/// Misuse of a running session, e.g. submitting while feedback is showing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,

    #[error("answers are locked while feedback is showing")]
    InputLocked,

    #[error("difficulty is not being chosen right now")]
    NotChoosingDifficulty,

    #[error("no dialogue is showing")]
    NoDialogue,

    #[error("nothing to advance from")]
    NothingToAdvance,

    #[error("empty answer")]
    EmptyAnswer,

    #[error("session is already over")]
    Finished,
}
