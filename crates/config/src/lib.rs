use serde::Deserialize;
use std::path::PathBuf;

/// Top-level service settings.
///
/// Defaults are baked in; any field can be overridden with a
/// `VOXRELAY_`-prefixed environment variable, e.g.
/// `VOXRELAY_SERVER__PORT=9000` or `VOXRELAY_RIVA__ENDPOINT=http://riva:50051`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub riva: RivaSettings,
    pub asr: AsrSettings,
    /// When set, the upload endpoint writes a per-request JSON file with
    /// the per-speaker timed word breakdown into this directory.
    pub word_timings_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RivaSettings {
    /// gRPC endpoint of the Riva ASR service.
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AsrSettings {
    /// BCP-47 language code passed to the recognizer.
    pub language_code: String,
    /// Diarization cap: the recognizer will not attribute words to more
    /// than this many distinct speakers.
    pub max_speakers: u32,
    /// Sample rate the streaming endpoint expects (Hz).
    pub sample_rate_hertz: u32,
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("riva.endpoint", "http://localhost:50051")?
            .set_default("asr.language_code", "en-US")?
            .set_default("asr.max_speakers", 8)?
            .set_default("asr.sample_rate_hertz", 16000)?
            .add_source(
                config::Environment::with_prefix("VOXRELAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
