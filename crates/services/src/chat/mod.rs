//! Simulated coach chat.
//!
//! A student message schedules one deferred reply. Where the reply text
//! comes from is behind [`ReplyProvider`]; the timer mechanics live in
//! [`ChatService`].

mod delay;
mod provider;
mod service;

pub use delay::{TypingDots, reply_delay, sample_jitter_ms};
pub use provider::{CannedReplyProvider, ReplyProvider};
pub use service::ChatService;
