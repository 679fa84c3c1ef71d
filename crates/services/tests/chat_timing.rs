use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use coach_core::model::{ChatSettings, DashboardSettingsDraft, Sender};
use coach_core::time::fixed_now;
use services::{CannedReplyProvider, ChatError, ChatService, Clock, ReplyProvider};

fn settings() -> ChatSettings {
    DashboardSettingsDraft {
        max_jitter_ms: Some(0),
        ..DashboardSettingsDraft::default()
    }
    .validate()
    .unwrap()
    .chat()
}

fn chat() -> ChatService {
    let provider = CannedReplyProvider::new(["Keep going!"]).unwrap();
    ChatService::new(Arc::new(provider), settings()).with_clock(Clock::fixed(fixed_now()))
}

/// Counts how often a reply was requested.
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl ReplyProvider for CountingProvider {
    async fn reply(&self, _student_message: &str) -> Result<String, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("On my way".to_owned())
    }
}

struct FailingProvider;

#[async_trait]
impl ReplyProvider for FailingProvider {
    async fn reply(&self, _student_message: &str) -> Result<String, ChatError> {
        Err(ChatError::Provider("offline".to_owned()))
    }
}

#[tokio::test(start_paused = true)]
async fn reply_arrives_after_minimum_delay() {
    let chat = chat();
    let sent = chat.send("  hi  ").unwrap();
    assert_eq!(sent.content, "  hi  ");
    assert_eq!(sent.sender, Sender::Student);
    assert!(chat.is_coach_typing().unwrap());

    tokio::time::sleep(Duration::from_millis(1_999)).await;
    assert_eq!(chat.messages().unwrap().len(), 1);
    assert!(chat.is_coach_typing().unwrap());

    tokio::time::sleep(Duration::from_millis(2)).await;
    let messages = chat.messages().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].sender, Sender::Coach);
    assert_eq!(messages[1].content, "Keep going!");
    assert!(!chat.is_coach_typing().unwrap());
}

#[tokio::test(start_paused = true)]
async fn long_messages_wait_longer() {
    let chat = chat();
    // 60 chars * 50ms = 3000ms
    chat.send(&"a".repeat(60)).unwrap();

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(chat.is_coach_typing().unwrap());

    tokio::time::sleep(Duration::from_millis(501)).await;
    assert_eq!(chat.messages().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn delay_counts_surrounding_whitespace() {
    let chat = chat();
    // 40 visible + 20 padding chars = 60 * 50ms = 3000ms
    let padded = format!("{}{}", " ".repeat(20), "b".repeat(40));
    chat.send(&padded).unwrap();

    tokio::time::sleep(Duration::from_millis(2_999)).await;
    assert!(chat.is_coach_typing().unwrap());
    assert_eq!(chat.messages().unwrap()[0].content, padded);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(chat.messages().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn every_message_gets_one_reply() {
    let chat = chat().with_greeting("Hello! How did this week go?").unwrap();
    chat.send("first").unwrap();
    chat.send("second").unwrap();

    tokio::time::sleep(Duration::from_secs(3)).await;
    let senders: Vec<Sender> = chat.messages().unwrap().iter().map(|m| m.sender).collect();
    assert_eq!(
        senders,
        vec![
            Sender::Coach,
            Sender::Student,
            Sender::Student,
            Sender::Coach,
            Sender::Coach,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn cancelled_replies_never_arrive() {
    let chat = chat();
    chat.send("hello").unwrap();
    assert_eq!(chat.cancel_pending().unwrap(), 1);
    assert!(!chat.is_coach_typing().unwrap());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(chat.messages().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_chat_aborts_pending_replies() {
    let provider = Arc::new(CountingProvider::default());
    let chat = ChatService::new(Arc::clone(&provider) as Arc<dyn ReplyProvider>, settings());
    chat.send("hi").unwrap();
    chat.send("are you there?").unwrap();
    drop(chat);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn replies_reach_the_provider_while_the_chat_lives() {
    let provider = Arc::new(CountingProvider::default());
    let chat = ChatService::new(Arc::clone(&provider) as Arc<dyn ReplyProvider>, settings());
    chat.send("hi").unwrap();

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(chat.messages().unwrap()[1].content, "On my way");
}

#[tokio::test(start_paused = true)]
async fn provider_failure_clears_typing() {
    let chat = ChatService::new(Arc::new(FailingProvider), settings());
    chat.send("anyone there?").unwrap();

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!chat.is_coach_typing().unwrap());
    assert_eq!(chat.messages().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_messages_are_rejected() {
    let chat = chat();
    assert!(matches!(chat.send("   "), Err(ChatError::EmptyMessage)));
    assert!(chat.messages().unwrap().is_empty());
    assert!(!chat.is_coach_typing().unwrap());
}

#[test]
fn sending_outside_a_runtime_fails() {
    let chat = chat();
    assert!(matches!(chat.send("hi"), Err(ChatError::NoRuntime)));
    assert!(chat.messages().unwrap().is_empty());
}
