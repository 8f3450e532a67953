pub mod wav;

pub use wav::normalize_wav_16k_mono;
