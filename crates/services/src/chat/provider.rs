use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::error::ChatError;

/// Source of coach replies.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `ChatError` if no reply can be produced.
    async fn reply(&self, student_message: &str) -> Result<String, ChatError>;
}

/// Picks a random reply from a fixed list, ignoring the message.
#[derive(Debug, Clone)]
pub struct CannedReplyProvider {
    replies: Vec<String>,
}

impl CannedReplyProvider {
    /// # Errors
    ///
    /// Returns `ChatError::NoReplies` if `replies` is empty.
    pub fn new<I, S>(replies: I) -> Result<Self, ChatError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        if replies.is_empty() {
            return Err(ChatError::NoReplies);
        }
        Ok(Self { replies })
    }

    #[must_use]
    pub fn replies(&self) -> &[String] {
        &self.replies
    }
}

impl Default for CannedReplyProvider {
    fn default() -> Self {
        Self {
            replies: vec![
                "Great question! Noticing that is a sign you're growing. Where exactly do you feel stuck? Tell me a bit more.".to_owned(),
                "I know that feeling well, I've been there too. One step at a time is fine. Shall we start with a small goal for this week?".to_owned(),
                "You're working really hard, keep it up! Compared with what we discussed last time you're clearly moving forward. Let's plan the next step together.".to_owned(),
            ],
        }
    }
}

#[async_trait]
impl ReplyProvider for CannedReplyProvider {
    async fn reply(&self, _student_message: &str) -> Result<String, ChatError> {
        self.replies
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(ChatError::NoReplies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reply_list_is_rejected() {
        let err = CannedReplyProvider::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ChatError::NoReplies));
    }

    #[tokio::test]
    async fn replies_come_from_the_list() {
        let provider = CannedReplyProvider::new(["a", "b"]).unwrap();
        for _ in 0..20 {
            let reply = provider.reply("hello").await.unwrap();
            assert!(provider.replies().contains(&reply));
        }
        assert_eq!(CannedReplyProvider::default().replies().len(), 3);
    }
}
