//! AI chat and transcription HTTP handlers

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::ChatService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Forward a guarded prompt to the assistant
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    // session id comes from the body, falling back to the header the
    // web client sends
    let session_id = body
        .session_id
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            headers
                .get("x-session-id")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_default();

    let service = ChatService::new(state.db.clone(), state.gemini());
    let reply = service
        .chat(body.prompt.as_deref().unwrap_or(""), &session_id)
        .await?;

    Ok(Json(ChatResponse { reply }))
}

/// Transcribe a voice recording uploaded as multipart form data
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<TranscribeResponse>> {
    let mut audio: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                let mime = field
                    .content_type()
                    .unwrap_or("audio/webm")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::ValidationError(format!("Failed to read audio field: {}", e))
                })?;
                audio = Some((bytes.to_vec(), mime));
            }
            // accepted for parity with the chat endpoint
            Some("sessionId") => {
                let _ = field.text().await;
            }
            _ => {}
        }
    }

    let (bytes, mime) = audio.ok_or_else(|| AppError::Validation {
        field: "audio".to_string(),
        message: "Audio file is required".to_string(),
        message_pt: "Arquivo de áudio é obrigatório".to_string(),
    })?;

    let service = ChatService::new(state.db.clone(), state.gemini());
    let text = service.transcribe(&bytes, &mime).await?;

    Ok(Json(TranscribeResponse { text }))
}
