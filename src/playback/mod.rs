pub mod clock;
pub mod producer;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod state;

pub use clock::{ClockAnchor, MAX_PACING_SLEEP};
pub use queue::{FrameQueue, QUEUE_CAPACITY};
pub use scheduler::{frame_duration_from_rate, PresentationState, FALLBACK_FRAME_DURATION};
pub use session::{Session, SessionError};
pub use state::SessionState;
