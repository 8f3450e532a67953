#[cfg(feature = "remote-riva")]
pub mod remote_riva;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::RecognitionConfig;

/// A single recognized word with its speaker attribution and timing,
/// produced entirely by the recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub text: String,
    /// Diarization label. 0 means the recognizer left the word unlabeled.
    pub speaker_tag: u32,
    pub start_time: Option<Duration>,
    pub end_time: Option<Duration>,
}

impl RecognizedWord {
    pub fn new(text: impl Into<String>, speaker_tag: u32) -> Self {
        Self {
            text: text.into(),
            speaker_tag,
            start_time: None,
            end_time: None,
        }
    }

    pub fn with_timing(mut self, start: Duration, end: Duration) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }
}

/// One candidate transcription hypothesis for a segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionAlternative {
    /// Full-text transcript precomputed by the recognizer.
    pub transcript: String,
    pub words: Vec<RecognizedWord>,
}

/// A contiguous span of recognition output (an utterance or
/// pause-delimited unit). Only the top-ranked alternative is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionSegment {
    pub alternatives: Vec<RecognitionAlternative>,
}

/// The complete structured result of one recognition call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub segments: Vec<RecognitionSegment>,
}

impl RecognitionResult {
    /// Transcript text of the first segment's top alternative, if any.
    /// `None` marks the result as silent/inconclusive.
    pub fn top_transcript(&self) -> Option<&str> {
        self.segments
            .first()
            .and_then(|s| s.alternatives.first())
            .map(|a| a.transcript.as_str())
    }
}

/// Trait for pluggable recognizer backends.
#[async_trait]
pub trait RecognizerBackend: Send + Sync + 'static {
    /// Recognizes a complete audio payload in one call. No retries: a
    /// failure here propagates to the caller as-is.
    async fn recognize(
        &self,
        audio: Vec<u8>,
        config: &RecognitionConfig,
    ) -> anyhow::Result<RecognitionResult>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
