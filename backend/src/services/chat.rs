//! Chat guardrail & history proxy
//!
//! Validates incoming prompts (in order: upstream availability, prompt
//! presence, session, length, forbidden topics), replays the recent
//! session history to the model and persists both turns. No check may
//! be reordered: a rejected prompt must never reach the upstream API.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::GeminiClient;
use shared::{validate_prompt, ChatMessage, ChatRole, PromptViolation, CHAT_HISTORY_WINDOW};

/// Chat service
#[derive(Clone)]
pub struct ChatService {
    db: PgPool,
    gemini: Option<GeminiClient>,
}

#[derive(Debug, sqlx::FromRow)]
struct ChatMessageRow {
    id: Uuid,
    session_id: String,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<ChatMessageRow> for ChatMessage {
    fn from(row: ChatMessageRow) -> Self {
        ChatMessage {
            id: row.id,
            session_id: row.session_id,
            role: ChatRole::from_db(&row.role),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

impl ChatService {
    /// Create a new ChatService. `gemini` is `None` when no API key is
    /// configured; every request then fails as unavailable.
    pub fn new(db: PgPool, gemini: Option<GeminiClient>) -> Self {
        Self { db, gemini }
    }

    /// Run the guardrail, forward the prompt with session context and
    /// persist the exchange.
    pub async fn chat(&self, prompt: &str, session_id: &str) -> AppResult<String> {
        let gemini = self.gemini.as_ref().ok_or(AppError::AiUnavailable)?;

        if prompt.trim().is_empty() {
            return Err(PromptViolation::Empty.into());
        }
        if session_id.trim().is_empty() {
            return Err(AppError::InvalidSession);
        }
        let clean = validate_prompt(prompt)?;

        let history = self.recent_history(session_id).await?;
        let reply = gemini.chat(&history, clean).await?;

        self.persist_exchange(session_id, clean, &reply).await?;
        Ok(reply)
    }

    /// Transcribe a voice recording. The session id is accepted for
    /// parity with `chat` but transcription itself is stateless.
    pub async fn transcribe(&self, audio: &[u8], mime_type: &str) -> AppResult<String> {
        let gemini = self.gemini.as_ref().ok_or(AppError::AiUnavailable)?;

        if audio.is_empty() {
            return Err(AppError::Validation {
                field: "audio".to_string(),
                message: "Audio file is required".to_string(),
                message_pt: "Arquivo de áudio é obrigatório".to_string(),
            });
        }

        let text = gemini.transcribe(audio, mime_type).await?;
        if text.is_empty() {
            return Err(AppError::Validation {
                field: "audio".to_string(),
                message: "Could not transcribe the audio".to_string(),
                message_pt: "Não foi possível transcrever o áudio".to_string(),
            });
        }

        Ok(text)
    }

    /// The most recent messages of a session, ascending in time, capped
    /// at the context window.
    pub async fn recent_history(&self, session_id: &str) -> AppResult<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT id, session_id, role, content, created_at
            FROM (
                SELECT id, session_id, role, content, created_at
                FROM chat_messages
                WHERE session_id = $1
                ORDER BY created_at DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(session_id)
        .bind(CHAT_HISTORY_WINDOW)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    async fn persist_exchange(
        &self,
        session_id: &str,
        prompt: &str,
        reply: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (session_id, role, content)
            VALUES ($1, 'user', $2), ($1, 'model', $3)
            "#,
        )
        .bind(session_id)
        .bind(prompt)
        .bind(reply)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
