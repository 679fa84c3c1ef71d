use std::time::Duration;

use coach_core::model::ChatSettings;
use rand::Rng;

/// How long the coach "types" before replying to `message`.
///
/// `max(min_delay, chars * per_char + jitter)`.
#[must_use]
pub fn reply_delay(message: &str, settings: &ChatSettings, jitter_ms: u64) -> Duration {
    let chars = u64::try_from(message.chars().count()).unwrap_or(u64::MAX);
    let typed = chars
        .saturating_mul(settings.per_char_delay_ms())
        .saturating_add(jitter_ms);
    Duration::from_millis(typed.max(settings.min_reply_delay_ms()))
}

/// Uniform jitter in `[0, max_jitter_ms)`; zero when jitter is disabled.
#[must_use]
pub fn sample_jitter_ms(settings: &ChatSettings) -> u64 {
    match settings.max_jitter_ms() {
        0 => 0,
        max => rand::rng().random_range(0..max),
    }
}

const DOT_FRAMES: [&str; 4] = ["", ".", "..", "..."];

/// Frames of the "coach is typing" ellipsis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingDots {
    frame: usize,
}

impl TypingDots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> &'static str {
        DOT_FRAMES[self.frame]
    }

    /// Step to the next frame, wrapping from `...` back to empty.
    pub fn advance(&mut self) -> &'static str {
        self.frame = (self.frame + 1) % DOT_FRAMES.len();
        self.current()
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }
}
