use chrono::{Local, TimeZone};

use sonus::domain::{ArtifactKind, FileRef, GeneratedArtifact, PathReference};

#[test]
fn given_base_name_when_naming_artifacts_then_extension_is_appended() {
    let names: Vec<String> = ArtifactKind::ALL
        .iter()
        .map(|kind| kind.file_name("interview"))
        .collect();

    assert_eq!(
        names,
        vec!["interview.tmp", "interview.txt", "interview.json", "interview.err"]
    );
}

#[test]
fn given_start_time_when_creating_in_progress_marker_then_content_carries_timestamp() {
    let started_at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

    let marker = GeneratedArtifact::in_progress("a", started_at);

    assert_eq!(marker.kind, ArtifactKind::Tmp);
    assert_eq!(marker.file_name(), "a.tmp");
    assert_eq!(
        marker.content,
        "Transcription in progress, started at 20240309 140507"
    );
}

#[test]
fn given_error_message_when_creating_error_artifact_then_named_err() {
    let artifact = GeneratedArtifact::error("a", "File not found: a.mp3");

    assert_eq!(artifact.file_name(), "a.err");
    assert_eq!(artifact.content, "File not found: a.mp3");
}

#[test]
fn given_generated_names_when_checking_then_only_marker_extensions_match() {
    assert!(ArtifactKind::is_generated_name("a.TXT"));
    assert!(ArtifactKind::is_generated_name("a.json"));
    assert!(!ArtifactKind::is_generated_name("a.mp3"));
    assert!(!ArtifactKind::is_generated_name("tmp"));
}

#[test]
fn given_source_with_id_when_deriving_artifact_then_sibling_has_no_id() {
    let source = FileRef::new(
        PathReference::new("drive", "folder-1"),
        "talk.final.mp4",
        Some("abc".to_string()),
    );

    let txt = source.artifact(ArtifactKind::Txt);

    assert_eq!(txt.name, "talk.final.txt");
    assert_eq!(txt.location, source.location);
    assert!(txt.file_id.is_none());
}

#[test]
fn given_hidden_file_name_when_splitting_then_leading_dot_is_not_an_extension() {
    let hidden = FileRef::new(PathReference::new("file", "/data"), ".profile", None);
    let dotted = FileRef::new(PathReference::new("file", "/data"), ".rec.wav", None);

    assert_eq!(hidden.base_name(), ".profile");
    assert_eq!(hidden.extension(), None);
    assert_eq!(dotted.base_name(), ".rec");
    assert_eq!(dotted.extension(), Some("wav"));
}
