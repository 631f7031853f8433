use async_trait::async_trait;
use clay_print::{
    Error, FeedbackLevel, Instruction, PrintConfig, PrintJob, PrintProgram, ProgramState,
    RobotClient, RobotCommand,
};
use clay_print_communication::{CompletionHandle, CompletionSender, Feedback};

// Mock client: resolves every handle at once unless told to hold from a given command on
struct MockClient {
    sent: Vec<RobotCommand>,
    held: Vec<CompletionSender>,
    hold_from: Option<usize>,
    fail_at: Option<usize>,
    closed: bool,
}

impl MockClient {
    fn new() -> Self {
        Self {
            sent: Vec::new(),
            held: Vec::new(),
            hold_from: None,
            fail_at: None,
            closed: false,
        }
    }

    fn texts(&self) -> Vec<String> {
        self.sent
            .iter()
            .filter_map(|c| match &c.instruction {
                Instruction::PrintText { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RobotClient for MockClient {
    async fn send(&mut self, command: RobotCommand) -> clay_print::Result<Option<CompletionHandle>> {
        let index = self.sent.len();
        if self.fail_at == Some(index) {
            return Err(Error::other("socket closed"));
        }
        let wants_handle = command.feedback.expects_response();
        self.sent.push(command);
        if !wants_handle {
            return Ok(None);
        }

        let id = index as u64 + 1;
        let (tx, handle) = CompletionHandle::channel(id);
        if self.hold_from.is_some_and(|from| index >= from) {
            self.held.push(tx);
        } else {
            let _ = tx.send(Ok(Feedback {
                sequence_id: id,
                instruction: String::new(),
                feedback: "Done".to_string(),
                string_values: vec![],
                float_values: vec![],
            }));
        }
        Ok(Some(handle))
    }

    async fn close(&mut self) -> clay_print::Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.closed
    }
}

fn job() -> PrintJob {
    let frame = |x: f64| format!(r#"{{"point": [{}, 0, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]}}"#, x);
    let json = format!(
        r#"{{"frames": [[{}, {}, {}], [{}, {}]], "extrusion_factors": [[0, 1, 1], [true, 0.5]]}}"#,
        frame(0.0),
        frame(1.0),
        frame(2.0),
        frame(3.0),
        frame(4.0)
    );
    PrintJob::from_json_str(&json).unwrap()
}

#[tokio::test]
async fn test_full_run_command_order() {
    let config = PrintConfig::default();
    let mut client = MockClient::new();
    let mut program = PrintProgram::new(&config);

    let stats = program.execute(&mut client, &job()).await.unwrap();

    assert_eq!(program.state(), ProgramState::Done);
    assert!(client.closed);
    assert_eq!(stats.sent, 13);
    assert_eq!(stats.waits, 0);

    let names: Vec<&str> = client.sent.iter().map(|c| c.instruction.name()).collect();
    assert_eq!(
        &names[..8],
        &[
            "r_RRC_SetAcceleration",
            "r_RRC_SetMaxSpeed",
            "r_RRC_SetTool",
            "r_RRC_SetWorkObject",
            "r_RRC_SetAnalog",
            "r_RRC_PrintText",
            "r_RRC_Stop",
            "r_RRC_MoveToJoints",
        ]
    );
    assert_eq!(client.sent[7].feedback, FeedbackLevel::Done);
    assert_eq!(client.sent.len(), 8 + 13 + 2);
    assert_eq!(names[names.len() - 2], "r_RRC_MoveToJoints");

    let texts = client.texts();
    assert_eq!(texts.first().map(String::as_str), Some("Press Play to move."));
    assert_eq!(texts.last().map(String::as_str), Some("Print finished."));
}

#[tokio::test]
async fn test_digital_signals_are_reset() {
    let mut config = PrintConfig::default();
    config.robot.reset_digital_signals = vec!["do_a".to_string(), "do_b".to_string()];
    let mut client = MockClient::new();

    PrintProgram::new(&config)
        .execute(&mut client, &job())
        .await
        .unwrap();

    let digital: Vec<_> = client
        .sent
        .iter()
        .filter(|c| matches!(c.instruction, Instruction::SetDigital { value: 0, .. }))
        .collect();
    assert_eq!(digital.len(), 2);
}

#[tokio::test]
async fn test_batches_are_throttled() {
    let mut config = PrintConfig::default();
    config.dispatch.batch_size = 4;
    let mut client = MockClient::new();

    let stats = PrintProgram::new(&config)
        .execute(&mut client, &job())
        .await
        .unwrap();
    // waits land after the moves at positions 7 and 11; the first batch has none
    assert_eq!(stats.sent, 13);
    assert_eq!(stats.waits, 2);
}

#[tokio::test]
async fn test_timeout_is_fatal_and_client_closed() {
    let mut config = PrintConfig::default();
    config.dispatch.batch_size = 2;
    config.dispatch.wait_timeout_ms = Some(20);
    let mut client = MockClient::new();
    // startup is 8 commands; hold every path move
    client.hold_from = Some(8);
    let mut program = PrintProgram::new(&config);

    let err = program.execute(&mut client, &job()).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(program.state(), ProgramState::Streaming);
    assert!(client.closed);
    assert!(!client.texts().contains(&"Print finished.".to_string()));
}

#[tokio::test]
async fn test_send_failure_aborts_during_homing() {
    let config = PrintConfig::default();
    let mut client = MockClient::new();
    client.fail_at = Some(2);
    let mut program = PrintProgram::new(&config);

    let err = program.execute(&mut client, &job()).await.unwrap_err();

    assert!(err.to_string().contains("socket closed"));
    assert_eq!(program.state(), ProgramState::Homing);
    assert_eq!(client.sent.len(), 2);
    assert!(client.closed);
}

#[tokio::test]
async fn test_empty_first_layer_is_rejected() {
    let json = r#"{"frames": [[]], "extrusion_factors": [[]]}"#;
    assert!(PrintJob::from_json_str(json).is_err());

    let config = PrintConfig::default();
    let mut client = MockClient::new();
    let err = PrintProgram::new(&config)
        .execute(&mut client, &PrintJob::default())
        .await
        .unwrap_err();
    assert!(err.is_input_error());
    assert!(client.sent.is_empty());
    assert!(client.closed);
}
