use crate::common::*;
use qtrace::prelude::*;

#[test]
fn serialize_produces_json_of_whole_tree() {
    let trace = query_trace();
    let diagnostics = TraceDiagnostics::new(trace.child(0).unwrap());

    let text = diagnostics.serialize().unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["name"], "ExecuteQuery");
    assert_eq!(json["duration_in_milliseconds"], 120.0);
    assert_eq!(json["start_datetime"], "2024-03-01T12:30:00.000Z");
    assert_eq!(json["summary"]["failed_request_count"], 2);

    let children = json["children"].as_array().unwrap();
    let names: Vec<&str> = children.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Page 1", "Transport", "Page 2", "Page 3"]);
}

#[test]
fn display_matches_serialize() {
    let diagnostics = TraceDiagnostics::new(query_trace());
    assert_eq!(format!("{}", diagnostics), diagnostics.serialize().unwrap());
}

#[test]
fn serialize_is_stable() {
    let diagnostics = TraceDiagnostics::new(query_trace());
    assert_eq!(diagnostics.serialize().unwrap(), diagnostics.serialize().unwrap());
}

#[test]
fn binary_output_decodes() {
    let diagnostics = TraceDiagnostics::new(query_trace());
    let bytes = diagnostics.write_trace(SerializationFormat::Binary).unwrap();
    assert_ne!(bytes.first(), Some(&b'{'));
    assert!(!bytes.is_empty());
}

#[test]
fn default_format_follows_options() {
    let text = TraceDiagnostics::new(query_trace()).write_trace_default().unwrap();
    assert_eq!(text.first(), Some(&b'{'));

    let options = DiagnosticsOptions::new().format(SerializationFormat::Binary);
    let binary = TraceDiagnostics::with_options(query_trace(), options)
        .write_trace_default()
        .unwrap();
    assert_ne!(binary.first(), Some(&b'{'));
}
