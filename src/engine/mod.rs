pub mod adventure;
pub mod progress;
pub mod rewards;
pub mod scoring;

pub use adventure::AdventureState;
pub use progress::{ProgressSummary, summarize};
