use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use coach_core::Clock;
use coach_core::model::{ChatMessage, ChatSettings, CoachStatus, Sender};

use super::delay::{reply_delay, sample_jitter_ms};
use super::provider::ReplyProvider;
use crate::error::ChatError;

#[derive(Debug, Default)]
struct ChatState {
    messages: Vec<ChatMessage>,
    pending_replies: usize,
}

fn lock_state(state: &Mutex<ChatState>) -> Result<MutexGuard<'_, ChatState>, ChatError> {
    state.lock().map_err(|e| ChatError::State(e.to_string()))
}

/// Conversation with the coach.
///
/// Each [`send`](Self::send) schedules exactly one coach reply on the
/// current tokio runtime. While any reply is pending the coach counts as
/// typing. Dropping the service aborts replies that have not arrived.
pub struct ChatService {
    clock: Clock,
    settings: ChatSettings,
    status: CoachStatus,
    provider: Arc<dyn ReplyProvider>,
    state: Arc<Mutex<ChatState>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ChatService {
    #[must_use]
    pub fn new(provider: Arc<dyn ReplyProvider>, settings: ChatSettings) -> Self {
        Self {
            clock: Clock::default(),
            settings,
            status: CoachStatus::default(),
            provider,
            state: Arc::new(Mutex::new(ChatState::default())),
            handles: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: CoachStatus) -> Self {
        self.status = status;
        self
    }

    /// Seed the conversation with an opening coach message.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::State` if the conversation lock is poisoned.
    pub fn with_greeting(self, greeting: impl Into<String>) -> Result<Self, ChatError> {
        let message = ChatMessage::new(Sender::Coach, greeting, self.clock.now());
        lock_state(&self.state)?.messages.push(message);
        Ok(self)
    }

    #[must_use]
    pub fn status(&self) -> CoachStatus {
        self.status
    }

    #[must_use]
    pub fn settings(&self) -> ChatSettings {
        self.settings
    }

    /// Interval between typing indicator frames.
    #[must_use]
    pub fn typing_frame_interval(&self) -> Duration {
        Duration::from_millis(self.settings.typing_frame_ms())
    }

    /// Snapshot of the conversation in send order.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::State` if the conversation lock is poisoned.
    pub fn messages(&self) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(lock_state(&self.state)?.messages.clone())
    }

    /// # Errors
    ///
    /// Returns `ChatError::State` if the conversation lock is poisoned.
    pub fn is_coach_typing(&self) -> Result<bool, ChatError> {
        Ok(lock_state(&self.state)?.pending_replies > 0)
    }

    /// Post a student message and schedule the coach's answer.
    ///
    /// Returns the stored student message. Blankness is checked on the
    /// trimmed text; the message is stored and timed as typed.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyMessage` for blank input and
    /// `ChatError::NoRuntime` outside a tokio runtime.
    pub fn send(&self, content: &str) -> Result<ChatMessage, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let runtime = Handle::try_current().map_err(|_| ChatError::NoRuntime)?;

        let message = ChatMessage::new(Sender::Student, content, self.clock.now());
        {
            let mut state = lock_state(&self.state)?;
            state.messages.push(message.clone());
            state.pending_replies += 1;
        }

        let delay = reply_delay(content, &self.settings, sample_jitter_ms(&self.settings));
        debug!(?delay, "scheduling coach reply");

        let provider = Arc::clone(&self.provider);
        let shared = Arc::clone(&self.state);
        let clock = self.clock;
        let prompt = content.to_owned();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let reply = provider.reply(&prompt).await;
            let Ok(mut state) = lock_state(&shared) else {
                warn!("chat state poisoned, dropping coach reply");
                return;
            };
            state.pending_replies = state.pending_replies.saturating_sub(1);
            match reply {
                Ok(text) => state
                    .messages
                    .push(ChatMessage::new(Sender::Coach, text, clock.now())),
                Err(err) => warn!(error = %err, "coach reply failed"),
            }
        });

        let mut handles = self
            .handles
            .lock()
            .map_err(|e| ChatError::State(e.to_string()))?;
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
        Ok(message)
    }

    /// Abort every reply that has not arrived yet.
    ///
    /// Returns how many were cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::State` if a lock is poisoned.
    pub fn cancel_pending(&self) -> Result<usize, ChatError> {
        let mut handles = self
            .handles
            .lock()
            .map_err(|e| ChatError::State(e.to_string()))?;
        let mut cancelled = 0;
        for handle in handles.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        lock_state(&self.state)?.pending_replies = 0;
        if cancelled > 0 {
            debug!(cancelled, "cancelled pending coach replies");
        }
        Ok(cancelled)
    }
}

impl Drop for ChatService {
    fn drop(&mut self) {
        if let Ok(handles) = self.handles.get_mut() {
            for handle in handles.drain(..) {
                handle.abort();
            }
        }
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
