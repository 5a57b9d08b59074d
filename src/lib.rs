//! Game core for a kids' arithmetic trainer: question generation, play
//! sessions for practice, timed, endless and adventure modes, progress
//! statistics and on-device persistence.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod session;
pub mod store;
pub mod timer;

pub use config::Config;
pub use error::{GameError, SessionError};
pub use generator::{Difficulty, Operation, QuestionGenerator};
pub use session::{Mode, Phase, Session};
pub use store::{DirBackend, GameStore, MemoryBackend};
