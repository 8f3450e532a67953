use std::path::PathBuf;
use std::sync::Arc;

use voxrelay_config::Settings;
use voxrelay_transcription::{RecognitionConfig, RecognizerBackend};

/// Shared, immutable application state. Per-connection streaming state
/// lives in the WebSocket handler, never here.
#[derive(Clone)]
pub struct AppState {
    pub recognizer: Arc<dyn RecognizerBackend>,
    /// Config for one-shot file uploads (encoding self-described by WAV).
    pub file_config: Arc<RecognitionConfig>,
    /// Config for per-chunk streaming recognition (16 kHz mono PCM).
    pub stream_config: Arc<RecognitionConfig>,
    /// Directory for per-speaker timed-word artifacts; `None` disables them.
    pub word_timings_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(recognizer: Arc<dyn RecognizerBackend>, settings: &Settings) -> Self {
        let asr = &settings.asr;
        Self {
            recognizer,
            file_config: Arc::new(RecognitionConfig::offline(
                &asr.language_code,
                asr.max_speakers,
            )),
            stream_config: Arc::new(RecognitionConfig::streaming(
                &asr.language_code,
                asr.max_speakers,
                asr.sample_rate_hertz,
            )),
            word_timings_dir: settings.word_timings_dir.clone(),
        }
    }
}
