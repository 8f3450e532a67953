use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use voxrelay_transcription::{aggregate, normalize_wav_16k_mono, render_sorted, timed_words};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub transcript: String,
}

/// One-shot transcription of an uploaded audio file.
///
/// Strict validation: the upload must be a `.wav` file, rejected before
/// any normalizer or recognizer call. One recognition call per upload,
/// no retries; recognizer failure surfaces as a 500.
pub async fn transcribe_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let (filename, audio) = read_audio_field(&mut multipart).await?;

    if !filename.to_lowercase().ends_with(".wav") {
        return Err(ApiError::BadRequest(format!(
            "Invalid file format '{filename}': only .wav files are allowed"
        )));
    }

    let normalized = normalize_wav_16k_mono(&audio)
        .map_err(|e| ApiError::Internal(format!("Audio normalization failed: {e}")))?;

    let result = state
        .recognizer
        .recognize(normalized, &state.file_config)
        .await
        .map_err(|e| ApiError::Internal(format!("Recognition failed: {e}")))?;

    let groups = aggregate(&result);
    let transcript = render_sorted(&groups);

    if let Some(dir) = &state.word_timings_dir {
        let artifact = timed_words(&groups);
        let path = dir.join(format!("{}.json", Uuid::new_v4()));
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to create artifact dir: {e}")))?;
        let payload = serde_json::to_vec_pretty(&artifact)
            .map_err(|e| ApiError::Internal(format!("Failed to encode word timings: {e}")))?;
        tokio::fs::write(&path, payload)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to write word timings: {e}")))?;
        debug!(path = %path.display(), "Word timings artifact written");
    }

    info!(%filename, speakers = groups.len(), "Upload transcribed");

    Ok(Json(TranscribeResponse { transcript }))
}

/// Pulls the first file field out of the multipart body.
async fn read_audio_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(ApiError::BadRequest(
        "No audio file found in the upload".to_string(),
    ))
}
