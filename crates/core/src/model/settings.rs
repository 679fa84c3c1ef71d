use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MIN_REPLY_DELAY_MS: u64 = 2_000;
pub const DEFAULT_PER_CHAR_DELAY_MS: u64 = 50;
pub const DEFAULT_MAX_JITTER_MS: u64 = 2_000;
pub const DEFAULT_TYPING_FRAME_MS: u64 = 500;
pub const DEFAULT_TODAY_TASK_LIMIT: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("typing frame interval must be > 0")]
    InvalidTypingFrame,
    #[error("today task limit must be > 0")]
    InvalidTodayTaskLimit,
}

/// Timing of the simulated coach reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatSettings {
    min_reply_delay_ms: u64,
    per_char_delay_ms: u64,
    max_jitter_ms: u64,
    typing_frame_ms: u64,
}

impl ChatSettings {
    #[must_use]
    pub fn min_reply_delay_ms(&self) -> u64 {
        self.min_reply_delay_ms
    }

    #[must_use]
    pub fn per_char_delay_ms(&self) -> u64 {
        self.per_char_delay_ms
    }

    #[must_use]
    pub fn max_jitter_ms(&self) -> u64 {
        self.max_jitter_ms
    }

    #[must_use]
    pub fn typing_frame_ms(&self) -> u64 {
        self.typing_frame_ms
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            min_reply_delay_ms: DEFAULT_MIN_REPLY_DELAY_MS,
            per_char_delay_ms: DEFAULT_PER_CHAR_DELAY_MS,
            max_jitter_ms: DEFAULT_MAX_JITTER_MS,
            typing_frame_ms: DEFAULT_TYPING_FRAME_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSettings {
    chat: ChatSettings,
    today_task_limit: usize,
}

impl DashboardSettings {
    #[must_use]
    pub fn chat(&self) -> ChatSettings {
        self.chat
    }

    #[must_use]
    pub fn today_task_limit(&self) -> usize {
        self.today_task_limit
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            chat: ChatSettings::default(),
            today_task_limit: DEFAULT_TODAY_TASK_LIMIT,
        }
    }
}

/// Partial settings as read from a config file or the environment.
///
/// Unset fields fall back to the defaults above.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSettingsDraft {
    pub min_reply_delay_ms: Option<u64>,
    pub per_char_delay_ms: Option<u64>,
    pub max_jitter_ms: Option<u64>,
    pub typing_frame_ms: Option<u64>,
    pub today_task_limit: Option<usize>,
}

impl DashboardSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            min_reply_delay_ms: other.min_reply_delay_ms.or(self.min_reply_delay_ms),
            per_char_delay_ms: other.per_char_delay_ms.or(self.per_char_delay_ms),
            max_jitter_ms: other.max_jitter_ms.or(self.max_jitter_ms),
            typing_frame_ms: other.typing_frame_ms.or(self.typing_frame_ms),
            today_task_limit: other.today_task_limit.or(self.today_task_limit),
        }
    }

    /// # Errors
    ///
    /// Returns `SettingsError` if the typing frame or task limit is zero.
    pub fn validate(self) -> Result<DashboardSettings, SettingsError> {
        let typing_frame_ms = self.typing_frame_ms.unwrap_or(DEFAULT_TYPING_FRAME_MS);
        if typing_frame_ms == 0 {
            return Err(SettingsError::InvalidTypingFrame);
        }
        let today_task_limit = self.today_task_limit.unwrap_or(DEFAULT_TODAY_TASK_LIMIT);
        if today_task_limit == 0 {
            return Err(SettingsError::InvalidTodayTaskLimit);
        }

        Ok(DashboardSettings {
            chat: ChatSettings {
                min_reply_delay_ms: self.min_reply_delay_ms.unwrap_or(DEFAULT_MIN_REPLY_DELAY_MS),
                per_char_delay_ms: self.per_char_delay_ms.unwrap_or(DEFAULT_PER_CHAR_DELAY_MS),
                max_jitter_ms: self.max_jitter_ms.unwrap_or(DEFAULT_MAX_JITTER_MS),
                typing_frame_ms,
            },
            today_task_limit,
        })
    }
}
