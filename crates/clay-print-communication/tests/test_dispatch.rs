use async_trait::async_trait;
use clay_print_communication::{
    CompletionHandle, CompletionSender, Feedback, FeedbackLevel, RobotClient, RobotCommand,
    ThrottledDispatcher, ThrottledDispatcherConfig,
};
use clay_print_core::Result;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Mock client: records commands and either resolves handles at once or holds them
struct MockClient {
    sent: Arc<Mutex<Vec<RobotCommand>>>,
    held: Vec<CompletionSender>,
    resolve: bool,
    next_id: u64,
}

impl MockClient {
    fn new(resolve: bool) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            held: Vec::new(),
            resolve,
            next_id: 1,
        }
    }
}

#[async_trait]
impl RobotClient for MockClient {
    async fn send(&mut self, command: RobotCommand) -> Result<Option<CompletionHandle>> {
        let id = self.next_id;
        self.next_id += 1;
        let wants_handle = command.feedback.expects_response();
        self.sent.lock().unwrap().push(command);
        if !wants_handle {
            return Ok(None);
        }

        let (tx, handle) = CompletionHandle::channel(id);
        if self.resolve {
            tx.send(Ok(Feedback {
                sequence_id: id,
                instruction: String::new(),
                feedback: "Done".to_string(),
                string_values: vec![],
                float_values: vec![],
            }))
            .unwrap();
        } else {
            self.held.push(tx);
        }
        Ok(Some(handle))
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

fn tracked(n: usize) -> Vec<RobotCommand> {
    (0..n)
        .map(|i| RobotCommand::print_text(format!("cmd {}", i)).with_feedback(FeedbackLevel::Done))
        .collect()
}

#[tokio::test]
async fn test_waits_once_per_batch() {
    let mut client = MockClient::new(true);
    let mut dispatcher = ThrottledDispatcher::new(ThrottledDispatcherConfig {
        batch_size: 3,
        wait_timeout: Some(Duration::from_millis(100)),
    });

    let stats = dispatcher.stream(&mut client, tracked(10)).await.unwrap();

    assert_eq!(stats.sent, 10);
    assert_eq!(stats.waits, 3);
    assert_eq!(client.sent.lock().unwrap().len(), 10);
    // command 10 was sent after the last wait
    assert!(dispatcher.has_outstanding());
}

#[tokio::test]
async fn test_commands_without_feedback_are_not_awaited() {
    let mut client = MockClient::new(true);
    let mut dispatcher = ThrottledDispatcher::new(ThrottledDispatcherConfig {
        batch_size: 2,
        wait_timeout: None,
    });

    let commands = vec![
        RobotCommand::print_text("a"),
        RobotCommand::print_text("b"),
        RobotCommand::print_text("c").with_feedback(FeedbackLevel::Done),
        RobotCommand::print_text("d"),
    ];
    let stats = dispatcher.stream(&mut client, commands).await.unwrap();

    // first batch has no handle, second batch awaits "c"
    assert_eq!(stats.sent, 4);
    assert_eq!(stats.waits, 1);
    assert!(!dispatcher.has_outstanding());
}

#[tokio::test]
async fn test_timeout_aborts_stream() {
    let mut client = MockClient::new(false);
    let mut dispatcher = ThrottledDispatcher::new(ThrottledDispatcherConfig {
        batch_size: 3,
        wait_timeout: Some(Duration::from_millis(20)),
    });

    let err = dispatcher
        .stream(&mut client, tracked(10))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(dispatcher.stats().sent, 3);
    assert_eq!(dispatcher.stats().waits, 0);
    assert_eq!(client.sent.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_default_batch_size() {
    let dispatcher = ThrottledDispatcher::default();
    assert_eq!(dispatcher.config().batch_size, 250);
    assert_eq!(dispatcher.config().wait_timeout, None);
}

proptest! {
    #[test]
    fn prop_one_wait_per_full_batch(n in 0usize..200, k in 1usize..20) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let stats = runtime.block_on(async {
            let mut client = MockClient::new(true);
            let mut dispatcher = ThrottledDispatcher::new(ThrottledDispatcherConfig {
                batch_size: k,
                wait_timeout: None,
            });
            dispatcher.stream(&mut client, tracked(n)).await.unwrap()
        });
        prop_assert_eq!(stats.sent, n);
        prop_assert_eq!(stats.waits, n / k);
    }
}
