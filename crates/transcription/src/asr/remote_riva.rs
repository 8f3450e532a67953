use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::Channel;
use tracing::debug;

use super::{
    RecognitionAlternative, RecognitionResult, RecognitionSegment, RecognizedWord,
    RecognizerBackend,
};
use crate::config::{AudioEncoding, RecognitionConfig};

/// Generated Riva ASR gRPC client.
pub mod riva_proto {
    tonic::include_proto!("nvidia.riva.asr");
}

use riva_proto::riva_speech_recognition_client::RivaSpeechRecognitionClient;

/// Remote NVIDIA Riva ASR backend via gRPC.
///
/// Stateless: a fresh channel is established per recognition call, so a
/// dropped connection in one call never poisons the next.
pub struct RemoteRivaBackend {
    endpoint: String,
}

impl RemoteRivaBackend {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    async fn connect(&self) -> anyhow::Result<RivaSpeechRecognitionClient<Channel>> {
        let channel = Channel::from_shared(self.endpoint.clone())
            .map_err(|e| anyhow::anyhow!("Invalid Riva endpoint '{}': {}", self.endpoint, e))?
            .connect()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to Riva at '{}': {}", self.endpoint, e))?;
        Ok(RivaSpeechRecognitionClient::new(channel))
    }

    fn to_proto_config(config: &RecognitionConfig) -> riva_proto::RecognitionConfig {
        riva_proto::RecognitionConfig {
            encoding: match config.encoding {
                Some(AudioEncoding::LinearPcm) => riva_proto::AudioEncoding::LinearPcm as i32,
                None => riva_proto::AudioEncoding::EncodingUnspecified as i32,
            },
            sample_rate_hertz: config.sample_rate_hertz.unwrap_or(0) as i32,
            language_code: config.language_code.clone(),
            max_alternatives: config.max_alternatives as i32,
            audio_channel_count: config.audio_channel_count.unwrap_or(0) as i32,
            enable_word_time_offsets: config.enable_word_time_offsets,
            enable_automatic_punctuation: config.enable_automatic_punctuation,
            diarization_config: Some(riva_proto::SpeakerDiarizationConfig {
                enable_speaker_diarization: config.diarization_max_speakers > 0,
                max_speaker_count: config.diarization_max_speakers as i32,
            }),
            verbatim_transcripts: false,
        }
    }

    fn from_proto_response(
        response: riva_proto::RecognizeResponse,
        timing_enabled: bool,
    ) -> RecognitionResult {
        let segments = response
            .results
            .into_iter()
            .map(|result| RecognitionSegment {
                alternatives: result
                    .alternatives
                    .into_iter()
                    .map(|alt| RecognitionAlternative {
                        transcript: alt.transcript,
                        words: alt
                            .words
                            .into_iter()
                            .map(|w| RecognizedWord {
                                text: w.word,
                                speaker_tag: w.speaker_tag.max(0) as u32,
                                start_time: ms_offset(w.start_time, timing_enabled),
                                end_time: ms_offset(w.end_time, timing_enabled),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        RecognitionResult { segments }
    }
}

/// Riva reports word offsets in milliseconds. A 0 offset is valid (the
/// first word starts at 0), so presence is keyed off the request config
/// rather than the value.
fn ms_offset(ms: i32, timing_enabled: bool) -> Option<Duration> {
    timing_enabled.then(|| Duration::from_millis(ms.max(0) as u64))
}

#[async_trait]
impl RecognizerBackend for RemoteRivaBackend {
    async fn recognize(
        &self,
        audio: Vec<u8>,
        config: &RecognitionConfig,
    ) -> anyhow::Result<RecognitionResult> {
        let mut client = self.connect().await?;

        let req = riva_proto::RecognizeRequest {
            config: Some(Self::to_proto_config(config)),
            audio,
        };

        let response = client
            .recognize(req)
            .await
            .map_err(|e| anyhow::anyhow!("Riva Recognize RPC failed: {}", e))?
            .into_inner();

        debug!(segments = response.results.len(), "Riva recognition complete");

        Ok(Self::from_proto_response(
            response,
            config.enable_word_time_offsets,
        ))
    }

    fn name(&self) -> &str {
        "remote_riva"
    }
}
