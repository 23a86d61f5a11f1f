//! Gemini generateContent client
//!
//! Thin wrapper over the Google generative-language REST API. Holds the
//! fixed persona, safety thresholds and generation parameters; the chat
//! service owns history windowing and guardrails.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::ChatMessage;

use crate::error::{AppError, AppResult};

/// Persona and behavior rules forwarded as the system instruction
pub const SYSTEM_PROMPT: &str = "\
Você é o Adan AI, assistente agrícola do Éden.
Objetivo: orientar produtores com dicas práticas sobre manejo, irrigação, pragas, clima e boas práticas agrícolas.

Regras de comportamento:
- Responda SEMPRE em português do Brasil.
- Seja breve, clara, organizada (use listas quando útil) e prática.
- Se o usuário pedir algo fora de agricultura ou que envolva riscos, leis, medicina, finanças ou instruções perigosas, recuse gentilmente e redirecione para temas agrícolas.
- Não invente dados. Se não souber, diga que não tem certeza e sugira caminhos confiáveis.
- Incentive segurança no trabalho rural e uso responsável de insumos.
- Use emojis para ilustrar sua resposta.
- Caso o usuário diga uma palavra estranha, confirme com ele o que quer dizer, dê duas opções.
";

/// Instruction used when transcribing an audio clip
const TRANSCRIBE_PROMPT: &str = "Transcreva o áudio acima para texto em português brasileiro. \
                                 Retorne apenas o texto transcrito.";

const SAFETY_CATEGORIES: [&str; 5] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_CIVIC_INTEGRITY",
];

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
    generation_config: GenerationConfig,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: String, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData { mime_type, data }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

impl GeminiClient {
    /// Create a new GeminiClient
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(
            api_key,
            model,
            "https://generativelanguage.googleapis.com/v1beta".to_string(),
        )
    }

    /// Create a new GeminiClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            api_key,
            base_url,
            model,
        }
    }

    /// Forward a conversation plus the new user turn and return the
    /// model's reply.
    pub async fn chat(&self, history: &[ChatMessage], prompt: &str) -> AppResult<String> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content {
                role: m.role.as_str().to_string(),
                parts: vec![Part::text(m.content.clone())],
            })
            .collect();
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part::text(prompt)],
        });

        let request = GenerateContentRequest {
            system_instruction: Some(Content {
                role: "system".to_string(),
                parts: vec![Part::text(SYSTEM_PROMPT)],
            }),
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: 0.6,
                top_p: Some(0.9),
                top_k: Some(40),
                max_output_tokens: 800,
                response_mime_type: Some("text/plain".to_string()),
            },
            contents,
        };

        let reply = self
            .generate(&request)
            .await?
            .unwrap_or_else(|| "Sem resposta".to_string());
        Ok(reply)
    }

    /// Transcribe an audio clip by inlining it base64-encoded into a
    /// generateContent call.
    pub async fn transcribe(&self, audio: &[u8], mime_type: &str) -> AppResult<String> {
        // strip ";codecs=..." — the API only accepts the bare mime type
        let mime = mime_type.split(';').next().unwrap_or("audio/webm").trim();
        let mime = if mime.is_empty() { "audio/webm" } else { mime };

        tracing::debug!(
            size = audio.len(),
            mime,
            "forwarding audio for transcription"
        );

        let request = GenerateContentRequest {
            system_instruction: None,
            safety_settings: Vec::new(),
            generation_config: GenerationConfig {
                temperature: 0.1,
                max_output_tokens: 500,
                ..Default::default()
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::inline_data(mime.to_string(), BASE64.encode(audio)),
                    Part::text(TRANSCRIBE_PROMPT),
                ],
            }],
        };

        let text = self.generate(&request).await?.unwrap_or_default();
        Ok(text.trim().to_string())
    }

    async fn generate(&self, request: &GenerateContentRequest) -> AppResult<Option<String>> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Upstream {
                status: 502,
                message: format!("Gemini request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<UpstreamErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| "Erro na API Gemini".to_string());
            tracing::error!(status = status.as_u16(), %message, "Gemini API error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let data: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::Upstream {
                status: 502,
                message: format!("Failed to parse Gemini response: {}", e),
            }
        })?;

        Ok(data.first_text())
    }
}
