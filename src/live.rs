//! Real-time orchestration.
//!
//! - [`spawn_match`]: one tokio task per match, driven by requests and timers
//! - [`Matchmaker`]: FIFO pairing actor per match kind
//! - [`RewardSink`]: the collaborator that receives each finished match once
//!
//! ```text
//! Draft --(20 slots)--> SwapWindow --(timer)--> Turn <--> Intermission
//!                                                  \--> Finished --> RewardSink
//! ```

mod matchmaking;
mod reward;
mod timer;
mod worker;

pub use matchmaking::{Assignment, Matchmaker, Ticket};
pub use reward::{MemoryRewardSink, RewardSink, TracingRewardSink};
pub use timer::{wait_until, PhaseTimer};
pub use worker::{spawn_match, MatchHandle, MatchUpdate, Stage};
