use clay_print::{CommandGenerator, FeedbackLevel, Instruction, Motion, PrintJob, Zone};
use clay_print_settings::PrintSettings;
use std::io::Write;
use std::sync::{Arc, Mutex};

// Collects formatted log output for inspection
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn layered_job(sizes: &[usize]) -> PrintJob {
    let layers: Vec<String> = sizes
        .iter()
        .enumerate()
        .map(|(layer, &size)| {
            let frames: Vec<String> = (0..size)
                .map(|i| {
                    format!(
                        r#"{{"point": [{}, 0.0, {}], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]}}"#,
                        i,
                        layer * 2
                    )
                })
                .collect();
            format!("[{}]", frames.join(","))
        })
        .collect();
    let factors: Vec<String> = sizes
        .iter()
        .map(|&size| format!("[{}]", vec!["1.0"; size].join(",")))
        .collect();
    let json = format!(
        r#"{{"frames": [{}], "extrusion_factors": [{}]}}"#,
        layers.join(","),
        factors.join(",")
    );
    PrintJob::from_json_str(&json).unwrap()
}

#[test]
fn test_two_layers_yield_thirteen_commands() {
    let job = layered_job(&[3, 2]);
    let settings = PrintSettings::default();

    let commands: Vec<_> = CommandGenerator::from_job(&job, &settings)
        .unwrap()
        .collect();
    assert_eq!(commands.len(), 13);

    // one joint move first, every linear move requests Done feedback
    let joint_moves = commands
        .iter()
        .filter(|c| matches!(c.instruction, Instruction::MoveToFrame { motion: Motion::Joint, .. }))
        .count();
    assert_eq!(joint_moves, 1);
    for command in &commands {
        if let Instruction::MoveToFrame {
            motion: Motion::Linear,
            zone,
            ..
        } = &command.instruction
        {
            assert_eq!(command.feedback, FeedbackLevel::Done);
            assert_eq!(*zone, Zone::Z10);
        }
    }
}

#[test]
fn test_layer_texts_and_start_coordinates() {
    let job = layered_job(&[3, 2]);
    let settings = PrintSettings {
        z_offset: 5.0,
        ..PrintSettings::default()
    };

    let texts: Vec<String> = CommandGenerator::from_job(&job, &settings)
        .unwrap()
        .filter_map(|c| match c.instruction {
            Instruction::PrintText { text } => Some(text),
            _ => None,
        })
        .collect();

    // coordinates are reported before the offset is applied
    assert_eq!(
        texts,
        vec![
            "Layer 0",
            "Start X: 1.00 Y: 0.00 Z: 0.00",
            "Layer 1",
            "Start X: 0.00 Y: 0.00 Z: 2.00",
        ]
    );
}

#[test]
fn test_generation_leaves_job_untouched() {
    let job = layered_job(&[2, 2]);
    let before = job.clone();
    let settings = PrintSettings::default();

    let first: Vec<_> = CommandGenerator::from_job(&job, &settings).unwrap().collect();
    let second: Vec<_> = CommandGenerator::from_job(&job, &settings).unwrap().collect();

    assert_eq!(job, before);
    assert_eq!(first, second);
}

#[test]
fn test_single_frame_job() {
    let job = layered_job(&[1]);
    let settings = PrintSettings::default();

    let commands: Vec<_> = CommandGenerator::from_job(&job, &settings)
        .unwrap()
        .collect();
    // start move plus the text of the now empty layer
    assert_eq!(commands.len(), 2);
}

#[test]
fn test_layer_progress_is_logged_at_info() {
    let job = layered_job(&[3, 2]);
    let settings = PrintSettings::default();
    let logs = CapturedLogs::default();

    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let count = tracing::subscriber::with_default(subscriber, || {
        CommandGenerator::from_job(&job, &settings).unwrap().count()
    });

    assert_eq!(count, 13);
    let text = logs.text();
    assert!(text.contains("Layer 0 (1/2, 2 frames)"), "{}", text);
    assert!(text.contains("Layer 1 (2/2, 2 frames)"), "{}", text);
}
