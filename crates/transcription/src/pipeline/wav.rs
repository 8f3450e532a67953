use std::io::Cursor;

use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{
    Async as AsyncResampler, FixedAsync, Resampler as RubatoResampler,
    SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Sample rate the recognizer expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Normalizes uploaded WAV bytes to 16 kHz mono 16-bit PCM WAV.
///
/// Accepts 16/24/32-bit integer and 32-bit float input at any sample
/// rate; stereo and multi-channel audio is down-mixed to mono. A
/// malformed header or unresamplable payload is an error — the caller
/// surfaces it as a server-side failure, never a partial result.
pub fn normalize_wav_16k_mono(bytes: &[u8]) -> anyhow::Result<Vec<u8>> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| anyhow::anyhow!("Failed to decode WAV upload: {}", e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    let sample_rate = spec.sample_rate;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.unwrap_or(0) as f32 / max_val)
                .collect()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.unwrap_or(0.0))
            .collect(),
    };

    // Down-mix to mono if stereo or multi-channel
    let mono: Vec<f32> = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    let resampled = if sample_rate != TARGET_SAMPLE_RATE {
        resample_to_16k(&mono, sample_rate)?
    } else {
        mono
    };

    encode_wav_s16_mono(&resampled)
}

/// Re-encodes f32 mono samples as a 16 kHz mono 16-bit PCM WAV payload.
fn encode_wav_s16_mono(samples: &[f32]) -> anyhow::Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| anyhow::anyhow!("Failed to create WAV writer: {}", e))?;
        for &sample in samples {
            let s16 = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
            writer
                .write_sample(s16)
                .map_err(|e| anyhow::anyhow!("Failed to write WAV sample: {}", e))?;
        }
        writer
            .finalize()
            .map_err(|e| anyhow::anyhow!("Failed to finalize WAV: {}", e))?;
    }
    Ok(cursor.into_inner())
}

/// Resamples mono audio from `src_rate` Hz to 16 kHz using sinc interpolation.
fn resample_to_16k(audio: &[f32], src_rate: u32) -> anyhow::Result<Vec<f32>> {
    let ratio = TARGET_SAMPLE_RATE as f64 / src_rate as f64;
    let chunk_size = 1024;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = AsyncResampler::<f32>::new_sinc(
        ratio,
        2.0,
        &params,
        chunk_size,
        1, // mono
        FixedAsync::Input,
    )
    .map_err(|e| anyhow::anyhow!("Failed to create resampler: {}", e))?;

    let mut output = Vec::with_capacity((audio.len() as f64 * ratio) as usize + 1024);

    for chunk in audio.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let frames = input.len();
        let input_adapter = InterleavedSlice::new(&input, 1, frames)
            .map_err(|e| anyhow::anyhow!("Input adapter error: {}", e))?;

        let result = resampler
            .process(&input_adapter, 0, None)
            .map_err(|e| anyhow::anyhow!("Resample error: {}", e))?;

        output.extend(result.take_data());
    }

    // Trim to expected length (remove zero-padding artifacts)
    let expected_len = (audio.len() as f64 * ratio) as usize;
    output.truncate(expected_len);

    Ok(output)
}
