use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use voxrelay_api::{build_router, state::AppState};
use voxrelay_transcription::{
    RecognitionAlternative, RecognitionConfig, RecognitionResult, RecognitionSegment,
    RecognizedWord, RecognizerBackend,
};

const BOUNDARY: &str = "voxrelay-test-boundary";

enum Script {
    Respond(RecognitionResult),
    Fail(String),
}

struct MockRecognizer {
    calls: AtomicUsize,
    script: Script,
}

impl MockRecognizer {
    fn respond_with(result: RecognitionResult) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Script::Respond(result),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Script::Fail(message.to_string()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecognizerBackend for MockRecognizer {
    async fn recognize(
        &self,
        _audio: Vec<u8>,
        _config: &RecognitionConfig,
    ) -> anyhow::Result<RecognitionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Respond(result) => Ok(result.clone()),
            Script::Fail(message) => Err(anyhow::anyhow!("{message}")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn test_state(recognizer: Arc<MockRecognizer>, word_timings_dir: Option<PathBuf>) -> AppState {
    AppState {
        recognizer,
        file_config: Arc::new(RecognitionConfig::offline("en-US", 8)),
        stream_config: Arc::new(RecognitionConfig::streaming("en-US", 8, 16_000)),
        word_timings_dir,
    }
}

fn diarized_result() -> RecognitionResult {
    RecognitionResult {
        segments: vec![RecognitionSegment {
            alternatives: vec![RecognitionAlternative {
                transcript: "thanks hello everyone".into(),
                words: vec![
                    RecognizedWord::new("thanks", 2),
                    RecognizedWord::new("hello", 1),
                    RecognizedWord::new("everyone", 1),
                ],
            }],
        }],
    }
}

fn wav_fixture() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..1600 {
            writer
                .write_sample(((i as f32 * 0.1).sin() * 12_000.0) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn multipart_body(filename: &str, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: audio/wav\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(filename: &str, payload: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/asr/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(filename, payload)))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let recognizer = MockRecognizer::respond_with(RecognitionResult::default());
    let app = build_router(test_state(recognizer, None));

    let res = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn non_wav_upload_rejected_before_recognition() {
    let recognizer = MockRecognizer::respond_with(diarized_result());
    let app = build_router(test_state(recognizer.clone(), None));

    let res = app
        .oneshot(upload_request("audio.mp3", &wav_fixture()))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = json_body(res).await;
    assert_eq!(json["error"], "bad_request");
    assert_eq!(recognizer.call_count(), 0);
}

#[tokio::test]
async fn upload_without_file_field_rejected() {
    let recognizer = MockRecognizer::respond_with(diarized_result());
    let app = build_router(test_state(recognizer.clone(), None));

    // A form field with no filename is not an audio upload.
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n");
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let req = Request::builder()
        .method("POST")
        .uri("/asr/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(recognizer.call_count(), 0);
}

#[tokio::test]
async fn wav_upload_returns_speaker_sorted_transcript() {
    let recognizer = MockRecognizer::respond_with(diarized_result());
    let app = build_router(test_state(recognizer.clone(), None));

    let res = app
        .oneshot(upload_request("meeting.WAV", &wav_fixture()))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json = json_body(res).await;
    // Speaker 2 spoke first, but rendering sorts by tag.
    assert_eq!(
        json["transcript"],
        "Speaker 1: hello everyone\nSpeaker 2: thanks"
    );
    assert_eq!(recognizer.call_count(), 1);
}

#[tokio::test]
async fn malformed_wav_payload_is_a_server_error() {
    let recognizer = MockRecognizer::respond_with(diarized_result());
    let app = build_router(test_state(recognizer.clone(), None));

    let res = app
        .oneshot(upload_request("broken.wav", b"not really wav data"))
        .await
        .unwrap();

    // Normalization fails before the recognizer is ever invoked.
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(recognizer.call_count(), 0);
}

#[tokio::test]
async fn recognizer_failure_is_a_server_error() {
    let recognizer = MockRecognizer::failing("riva unreachable");
    let app = build_router(test_state(recognizer.clone(), None));

    let res = app
        .oneshot(upload_request("audio.wav", &wav_fixture()))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(res).await;
    assert_eq!(json["error"], "internal");
    assert_eq!(recognizer.call_count(), 1);
}

#[tokio::test]
async fn word_timings_artifact_written_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let recognizer = MockRecognizer::respond_with(diarized_result());
    let app = build_router(test_state(
        recognizer,
        Some(dir.path().to_path_buf()),
    ));

    let res = app
        .oneshot(upload_request("audio.wav", &wav_fixture()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let artifacts: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(artifacts.len(), 1);

    let content: Value =
        serde_json::from_slice(&std::fs::read(&artifacts[0]).unwrap()).unwrap();
    let speaker_two = content["2"].as_array().unwrap();
    assert_eq!(speaker_two[0]["word"], "thanks");
    let speaker_one = content["1"].as_array().unwrap();
    assert_eq!(speaker_one.len(), 2);
    assert!(speaker_one[0]["start_time"].is_null());
}
