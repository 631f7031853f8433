use clay_print_core::{Error, InputError, PrintJob};
use std::io::Write;

const FLAT: &str = r#"{
    "frames": [
        {"point": [0, 0, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]},
        {"point": [10, 0, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]},
        {"point": [10, 10, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]}
    ],
    "extrusion_factors": [0.0, 1.0, 0.5]
}"#;

const NESTED: &str = r#"{
    "frames": [[
        {"point": [0, 0, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]},
        {"point": [10, 0, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]},
        {"point": [10, 10, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]}
    ]],
    "extrusion_factors": [[0.0, 1.0, 0.5]]
}"#;

#[test]
fn test_flat_file_equals_single_layer_file() {
    let flat = PrintJob::from_json_str(FLAT).unwrap();
    let nested = PrintJob::from_json_str(NESTED).unwrap();

    assert_eq!(flat.layer_count(), 1);
    assert_eq!(flat, nested);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(NESTED.as_bytes()).unwrap();

    let job = PrintJob::load_from_file(file.path()).unwrap();
    assert_eq!(job.frame_count(), 3);
    assert!(job.layers()[0][0].is_travel());
    assert!(!job.layers()[0][2].is_travel());
}

#[test]
fn test_load_errors() {
    let missing = PrintJob::load_from_file(std::path::Path::new("/nonexistent/print.json"));
    assert!(matches!(missing, Err(Error::Io(_))));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"frames": [[{"point": [0, 0, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]}]], "extrusion_factors": [[1, 1]]}"#)
        .unwrap();
    let err = PrintJob::load_from_file(file.path()).unwrap_err();
    assert!(err.is_input_error());
    assert!(matches!(
        err,
        Error::Input(InputError::LengthMismatch {
            layer: 0,
            frames: 1,
            factors: 2
        })
    ));
}
