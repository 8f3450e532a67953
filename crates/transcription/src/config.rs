use serde::{Deserialize, Serialize};

/// Audio encoding of the payload handed to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEncoding {
    /// Uncompressed 16-bit linear PCM.
    LinearPcm,
}

/// Recognition configuration passed to the recognizer backend.
///
/// Two instances exist per process, built once at startup: the offline
/// (file upload) config leaves the encoding fields unset because WAV is
/// self-describing; the streaming config pins them to 16 kHz mono PCM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    pub language_code: String,
    /// Hypotheses requested per segment. Always 1 here: only the top
    /// alternative is ever consumed downstream.
    pub max_alternatives: u32,
    pub enable_automatic_punctuation: bool,
    pub enable_word_time_offsets: bool,
    /// Diarization cap; 0 disables diarization.
    pub diarization_max_speakers: u32,
    pub encoding: Option<AudioEncoding>,
    pub sample_rate_hertz: Option<u32>,
    pub audio_channel_count: Option<u32>,
}

impl RecognitionConfig {
    /// Config for one-shot recognition of an uploaded file.
    pub fn offline(language_code: &str, max_speakers: u32) -> Self {
        Self {
            language_code: language_code.to_string(),
            max_alternatives: 1,
            enable_automatic_punctuation: true,
            enable_word_time_offsets: true,
            diarization_max_speakers: max_speakers,
            encoding: None,
            sample_rate_hertz: None,
            audio_channel_count: None,
        }
    }

    /// Config for per-chunk recognition on the streaming endpoint.
    pub fn streaming(language_code: &str, max_speakers: u32, sample_rate_hertz: u32) -> Self {
        Self {
            encoding: Some(AudioEncoding::LinearPcm),
            sample_rate_hertz: Some(sample_rate_hertz),
            audio_channel_count: Some(1),
            ..Self::offline(language_code, max_speakers)
        }
    }
}
