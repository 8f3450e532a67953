pub mod aggregate;
pub mod asr;
pub mod config;
pub mod pipeline;
pub mod session;

pub use aggregate::{SpeakerGroups, aggregate, render_in_order, render_sorted, timed_words};
pub use asr::{
    RecognitionAlternative, RecognitionResult, RecognitionSegment, RecognizedWord,
    RecognizerBackend,
};
pub use config::{AudioEncoding, RecognitionConfig};
pub use pipeline::normalize_wav_16k_mono;
pub use session::{PAUSE_BREAK_THRESHOLD, SessionError, SessionState, StreamingSession};
