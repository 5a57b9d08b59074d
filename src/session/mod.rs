pub mod input;
pub mod mode;
pub mod result;
pub mod state;

pub use mode::{Mode, Rules};
pub use result::{ProgressRecord, RecordReceipt, SessionKind, SessionOutcome};
pub use state::{Feedback, Phase, Session, TimerEvent};
