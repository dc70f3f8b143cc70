use sonus::application::ports::MediaInspector;
use sonus::infrastructure::audio::FfprobeInspector;

#[tokio::test]
async fn given_missing_ffprobe_binary_when_inspecting_then_duration_is_none_but_size_is_read() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), vec![0u8; 3 * 1024 * 1024]).unwrap();
    let inspector = FfprobeInspector::new("sonus-test-no-such-ffprobe");

    let metadata = inspector.inspect(file.path()).await;

    assert_eq!(metadata.duration_secs, None);
    assert_eq!(metadata.file_size_mib, Some(3.0));
}

#[tokio::test]
async fn given_missing_file_when_inspecting_then_all_fields_are_empty() {
    let inspector = FfprobeInspector::new("sonus-test-no-such-ffprobe");

    let metadata = inspector
        .inspect(std::path::Path::new("/nonexistent/a.mp3"))
        .await;

    assert_eq!(metadata.duration_secs, None);
    assert_eq!(metadata.file_size_mib, None);
}

#[tokio::test]
async fn given_small_file_when_inspecting_then_size_is_rounded_to_hundredths() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), vec![0u8; 1_500_000]).unwrap();
    let inspector = FfprobeInspector::new("sonus-test-no-such-ffprobe");

    let metadata = inspector.inspect(file.path()).await;

    assert_eq!(metadata.file_size_mib, Some(1.43));
}
