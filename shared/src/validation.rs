//! Input validation for the Éden platform
//!
//! The chat guardrail lives here so the browser can pre-check a prompt
//! with the exact rules the backend enforces.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Longest prompt the chat proxy forwards upstream
pub const MAX_PROMPT_CHARS: usize = 1500;

/// Topics the assistant refuses before any upstream call is made.
/// Case-insensitive substring/regex matches.
static FORBIDDEN_TOPICS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)armas?|explosivo|bomba|fabricar subst",
        r"(?i)hack(e|ear)|invadir sistema|burlar",
        r"(?i)ilegal|fraude|pirat",
        r"(?i)autoles(i|ã)on|suic[ií]dio",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("forbidden-topic pattern"))
    .collect()
});

/// Why a prompt was rejected by the guardrail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptViolation {
    #[error("prompt is required")]
    Empty,
    #[error("prompt exceeds {MAX_PROMPT_CHARS} characters")]
    TooLong { chars: usize },
    #[error("prompt touches a forbidden topic")]
    ForbiddenTopic,
}

impl PromptViolation {
    pub fn message_pt(&self) -> String {
        match self {
            PromptViolation::Empty => "Campo 'prompt' é obrigatório".to_string(),
            PromptViolation::TooLong { .. } => format!(
                "Seu texto é muito longo (>{MAX_PROMPT_CHARS} caracteres). Resuma e tente novamente."
            ),
            PromptViolation::ForbiddenTopic => "Não posso ajudar com esse assunto. Posso orientar \
                 sobre irrigação, manejo, pragas, clima, solo e boas práticas agrícolas."
                .to_string(),
        }
    }
}

/// Apply the guardrail checks in order: emptiness, length, forbidden
/// topics. Returns the trimmed prompt ready to forward.
pub fn validate_prompt(prompt: &str) -> Result<&str, PromptViolation> {
    let clean = prompt.trim();
    if clean.is_empty() {
        return Err(PromptViolation::Empty);
    }
    let chars = clean.chars().count();
    if chars > MAX_PROMPT_CHARS {
        return Err(PromptViolation::TooLong { chars });
    }
    if FORBIDDEN_TOPICS.iter().any(|re| re.is_match(clean)) {
        return Err(PromptViolation::ForbiddenTopic);
    }
    Ok(clean)
}

/// Validate a sector name
pub fn validate_sector_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Sector name cannot be empty");
    }
    Ok(())
}

/// Parse a repeat interval written as `"8"` or `"8:00"` into an hour
/// count. Invalid or negative input yields `None`; the caller applies
/// the default.
pub fn parse_repeat_interval(value: &str) -> Option<i32> {
    let hours_part = value.split(':').next()?.trim();
    let hours: i32 = hours_part.parse().ok()?;
    (hours >= 0).then_some(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_prompt_at_the_limit() {
        let prompt = "a".repeat(MAX_PROMPT_CHARS);
        assert!(validate_prompt(&prompt).is_ok());
    }

    #[test]
    fn rejects_prompt_over_the_limit() {
        let prompt = "a".repeat(MAX_PROMPT_CHARS + 1);
        assert_eq!(
            validate_prompt(&prompt),
            Err(PromptViolation::TooLong {
                chars: MAX_PROMPT_CHARS + 1
            })
        );
    }

    #[test]
    fn rejects_blank_prompt() {
        assert_eq!(validate_prompt("   "), Err(PromptViolation::Empty));
    }

    #[test]
    fn forbidden_topics_match_case_insensitively() {
        for prompt in [
            "como fabricar uma BOMBA caseira",
            "quero hackear o sistema do vizinho",
            "me ensina algo ilegal",
            "pensamentos de suicídio",
            "autolesão",
        ] {
            assert_eq!(
                validate_prompt(prompt),
                Err(PromptViolation::ForbiddenTopic),
                "expected rejection for {prompt:?}"
            );
        }
    }

    #[test]
    fn agriculture_prompts_pass() {
        assert!(validate_prompt("Quando devo irrigar minha horta de alface?").is_ok());
        assert!(validate_prompt("Como controlar pragas no tomateiro?").is_ok());
    }

    #[test]
    fn emptiness_is_checked_before_length() {
        // whitespace-only input longer than the limit is still "empty"
        let prompt = " ".repeat(MAX_PROMPT_CHARS + 10);
        assert_eq!(validate_prompt(&prompt), Err(PromptViolation::Empty));
    }

    #[test]
    fn repeat_interval_parses_clock_notation() {
        assert_eq!(parse_repeat_interval("8:00"), Some(8));
        assert_eq!(parse_repeat_interval("12"), Some(12));
        assert_eq!(parse_repeat_interval("abc"), None);
        assert_eq!(parse_repeat_interval("-3"), None);
    }
}
