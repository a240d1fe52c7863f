pub mod dispatch;
pub mod error;
pub mod filter;
pub mod heartbeat;
pub mod journal;

pub use dispatch::AlertDispatcher;
pub use error::PipelineError;
pub use filter::{evaluate, Admission};
pub use heartbeat::HeartbeatStats;
pub use journal::Journal;
