pub mod asr;
